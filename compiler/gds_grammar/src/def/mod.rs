//! Declarative grammar definitions.
//!
//! A [`RuleDef`] is plain data: the shape of one node, the kind it matches
//! (leaves only), an optional label, and its children. Definitions are
//! cheap to clone and compare, and with the `serde` feature they can be
//! loaded from configuration. [`RuleDef::build`] validates a definition and
//! instantiates the live rule tree it describes.
//!
//! ```text
//! let library = RuleDef::sequence([
//!     RuleDef::leaf(HEADER),
//!     RuleDef::leaf(BGNLIB),
//!     RuleDef::zero_or_more([structure]).labeled("structures"),
//!     RuleDef::leaf(ENDLIB),
//! ])
//! .labeled("library");
//! let root = library.build::<Record>()?;
//! ```

use gds_ir::Kind;

use crate::rule::{
    BoxedRule, Choice, Leaf, Optional, Payload, Repeat, RepeatMode, RuleShape, Sequence,
};
use crate::GrammarError;

/// One node of a grammar definition.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RuleDef {
    pub shape: RuleShape,
    /// Token kind a leaf matches. Composites carry none.
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub kind: Option<Kind>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Option::is_none")
    )]
    pub label: Option<String>,
    #[cfg_attr(
        feature = "serde",
        serde(default, skip_serializing_if = "Vec::is_empty")
    )]
    pub children: Vec<RuleDef>,
}

impl RuleDef {
    fn composite(shape: RuleShape, children: impl IntoIterator<Item = RuleDef>) -> Self {
        RuleDef {
            shape,
            kind: None,
            label: None,
            children: children.into_iter().collect(),
        }
    }

    pub fn leaf(kind: Kind) -> Self {
        RuleDef {
            shape: RuleShape::Leaf,
            kind: Some(kind),
            label: None,
            children: Vec::new(),
        }
    }

    pub fn sequence(children: impl IntoIterator<Item = RuleDef>) -> Self {
        Self::composite(RuleShape::Sequence, children)
    }

    pub fn optional(children: impl IntoIterator<Item = RuleDef>) -> Self {
        Self::composite(RuleShape::Optional, children)
    }

    pub fn choice(alternatives: impl IntoIterator<Item = RuleDef>) -> Self {
        Self::composite(RuleShape::Choice, alternatives)
    }

    pub fn one_or_more(children: impl IntoIterator<Item = RuleDef>) -> Self {
        Self::composite(RuleShape::OneOrMore, children)
    }

    pub fn zero_or_more(children: impl IntoIterator<Item = RuleDef>) -> Self {
        Self::composite(RuleShape::ZeroOrMore, children)
    }

    #[must_use]
    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// Check this node and every descendant without building anything.
    pub fn validate(&self) -> Result<(), GrammarError> {
        self.check()?;
        self.children.iter().try_for_each(RuleDef::validate)
    }

    /// Number of nodes in this definition, itself included.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(RuleDef::node_count).sum::<usize>()
    }

    /// Validate this definition and instantiate the rule tree it describes.
    ///
    /// Validation fails fast on the first malformed node, parents before
    /// children.
    pub fn build<P: Payload>(&self) -> Result<BoxedRule<P>, GrammarError> {
        self.check()?;
        let label = self.label.as_ref();

        let rule: BoxedRule<P> = match self.shape {
            RuleShape::Leaf => {
                let kind = self.kind.ok_or_else(|| GrammarError::MissingKind {
                    label: self.label.clone(),
                })?;
                Box::new(apply_label(Leaf::<P>::new(kind), label, |r, n| {
                    r.with_label(n)
                }))
            }
            RuleShape::Sequence => {
                let rule = Sequence::new(self.build_children::<P>()?)?;
                Box::new(apply_label(rule, label, |r, n| r.with_label(n)))
            }
            RuleShape::Optional => {
                let rule = Optional::new(self.build_children::<P>()?)?;
                Box::new(apply_label(rule, label, |r, n| r.with_label(n)))
            }
            RuleShape::Choice => {
                let rule = Choice::new(self.build_children::<P>()?)?;
                Box::new(apply_label(rule, label, |r, n| r.with_label(n)))
            }
            RuleShape::OneOrMore | RuleShape::ZeroOrMore => {
                let mode = if self.shape == RuleShape::OneOrMore {
                    RepeatMode::OneOrMore
                } else {
                    RepeatMode::ZeroOrMore
                };
                let rule = Repeat::new(mode, self.build_children::<P>()?)?;
                Box::new(apply_label(rule, label, |r, n| r.with_label(n)))
            }
        };
        Ok(rule)
    }

    fn build_children<P: Payload>(&self) -> Result<Vec<BoxedRule<P>>, GrammarError> {
        self.children.iter().map(RuleDef::build::<P>).collect()
    }

    /// Validate this node alone.
    fn check(&self) -> Result<(), GrammarError> {
        let label = || self.label.clone();
        match (self.shape, self.kind) {
            (RuleShape::Leaf, None) => Err(GrammarError::MissingKind { label: label() }),
            (RuleShape::Leaf, Some(kind)) if !self.children.is_empty() => {
                Err(GrammarError::LeafWithChildren {
                    kind,
                    label: label(),
                })
            }
            (RuleShape::Leaf, Some(_)) => Ok(()),
            (shape, Some(_)) => Err(GrammarError::UnexpectedKind {
                shape,
                label: label(),
            }),
            (shape, None) if self.children.is_empty() => Err(GrammarError::EmptyComposite {
                shape,
                label: label(),
            }),
            (_, None) => Ok(()),
        }
    }
}

fn apply_label<R>(rule: R, label: Option<&String>, with_label: impl FnOnce(R, String) -> R) -> R {
    match label {
        Some(name) => with_label(rule, name.clone()),
        None => rule,
    }
}
