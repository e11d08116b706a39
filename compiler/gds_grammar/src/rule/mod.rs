//! Composable grammar rules.
//!
//! A grammar is a tree of rules built once and evaluated many times. Each
//! rule consumes one token per [`Rule::evaluate`] call and answers with an
//! [`Outcome`]. The token source cannot rewind, so a rule that cannot use a
//! token hands it back through `replayable` and an ancestor re-offers it to
//! a sibling, the next alternative, or the next repetition.
//!
//! | Rule                                | Matches                                  |
//! |-------------------------------------|------------------------------------------|
//! | [`Leaf`]                            | one token of a given kind                |
//! | [`Sequence`]                        | every child, in order, exactly once      |
//! | [`Optional`]                        | its children in order, or nothing        |
//! | [`Choice`]                          | the first alternative that matches       |
//! | [`Repeat::one_or_more`]             | its children one or more times           |
//! | [`Repeat::zero_or_more`]            | its children zero or more times          |
//!
//! Every rule keeps its immutable structure (kind, children, label) apart
//! from its evaluation state. The state is replaced wholesale with its
//! default on [`Rule::reset`] and whenever an attempt concludes, so a rule
//! nested in a repeat or retried after a replay always starts clean.

mod choice;
mod collect;
mod leaf;
mod optional;
mod repeat;
mod replay;
mod sequence;

use std::fmt;

use gds_ir::{Collected, Token};

use crate::Outcome;

pub use choice::Choice;
pub use leaf::Leaf;
pub use optional::Optional;
pub use repeat::{Repeat, RepeatMode};
pub use sequence::Sequence;

pub(crate) use collect::CollectBuffer;
pub(crate) use replay::ReplayQueue;

/// Bounds a token payload must meet to flow through a grammar.
///
/// Payloads are cloned only when collection is enabled and a leaf matches.
pub trait Payload: Clone + fmt::Debug + 'static {}

impl<T: Clone + fmt::Debug + 'static> Payload for T {}

/// The uniform contract every grammar node implements.
pub trait Rule<P>: fmt::Debug {
    /// Advance the rule's state machine by exactly one token.
    fn evaluate(&mut self, token: Token<P>) -> Outcome<P>;

    /// Return this rule and all descendants to their just-built state.
    fn reset(&mut self);

    /// Enable or disable the collection side-channel, recursively.
    fn set_collecting(&mut self, collecting: bool);

    /// Drain the data collected since the last drain.
    ///
    /// Always empty while collection is disabled.
    fn collect(&mut self) -> Vec<Collected<P>>;

    /// Which kind of node this is.
    fn shape(&self) -> RuleShape;

    /// Human-readable name used in traces and diagnostics.
    fn label(&self) -> Option<&str>;
}

/// A grammar node behind a trait object.
pub type BoxedRule<P> = Box<dyn Rule<P>>;

/// The kinds of grammar node.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "snake_case"))]
pub enum RuleShape {
    Leaf,
    Sequence,
    Optional,
    Choice,
    OneOrMore,
    ZeroOrMore,
}

impl RuleShape {
    pub fn as_str(self) -> &'static str {
        match self {
            RuleShape::Leaf => "leaf",
            RuleShape::Sequence => "sequence",
            RuleShape::Optional => "optional",
            RuleShape::Choice => "choice",
            RuleShape::OneOrMore => "one-or-more",
            RuleShape::ZeroOrMore => "zero-or-more",
        }
    }

    /// Returns `true` for every shape that holds children.
    #[inline]
    pub fn is_composite(self) -> bool {
        !matches!(self, RuleShape::Leaf)
    }
}

impl fmt::Display for RuleShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name a rule for tracing: its label, or its shape.
#[inline]
pub(crate) fn trace_name(label: Option<&str>, shape: RuleShape) -> &str {
    label.unwrap_or(shape.as_str())
}
