//! Collected semantic data.
//!
//! When collection is enabled, a matching leaf records its token's payload
//! and every composite records what its children produced. The result is a
//! small tree that mirrors the shape of the grammar that matched:
//!
//! | Rule     | Contributes                                   |
//! |----------|-----------------------------------------------|
//! | Leaf     | `Item(payload)`                               |
//! | Sequence | one entry per child, in order                 |
//! | Choice   | the winning alternative's entry only          |
//! | Optional | its children's entries, or nothing if absent  |
//! | Repeat   | one `Group` per completed pass                |
//!
//! Interpreting the tree (turning a boundary's group into polygon data, for
//! instance) is the consumer's job.

/// A node of collected data.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Collected<P> {
    /// Payload of a single matched token.
    Item(P),
    /// Ordered data gathered by a composite rule.
    Group(Vec<Collected<P>>),
}

impl<P> Collected<P> {
    /// Returns the payload if this is an `Item`.
    pub fn as_item(&self) -> Option<&P> {
        match self {
            Collected::Item(payload) => Some(payload),
            Collected::Group(_) => None,
        }
    }

    /// Returns the children if this is a `Group`.
    pub fn as_group(&self) -> Option<&[Collected<P>]> {
        match self {
            Collected::Item(_) => None,
            Collected::Group(children) => Some(children),
        }
    }

    /// Number of payloads in this subtree.
    pub fn item_count(&self) -> usize {
        match self {
            Collected::Item(_) => 1,
            Collected::Group(children) => children.iter().map(Collected::item_count).sum(),
        }
    }

    /// Payloads in this subtree, depth-first, in input order.
    pub fn items(&self) -> Vec<&P> {
        let mut out = Vec::with_capacity(self.item_count());
        self.push_items(&mut out);
        out
    }

    fn push_items<'a>(&'a self, out: &mut Vec<&'a P>) {
        match self {
            Collected::Item(payload) => out.push(payload),
            Collected::Group(children) => {
                for child in children {
                    child.push_items(out);
                }
            }
        }
    }
}
