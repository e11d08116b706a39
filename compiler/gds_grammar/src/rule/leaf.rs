//! Terminal rule: one token of one kind.

use gds_ir::{Collected, Kind, Token};
use tracing::trace;

use super::{trace_name, CollectBuffer, Payload, Rule, RuleShape};
use crate::Outcome;

/// Matches exactly one token whose kind equals `kind`.
///
/// A leaf never returns `Unfinished` and has no evaluation state beyond its
/// collection buffer. It cannot hold children: there is no constructor that
/// takes any.
#[derive(Debug)]
pub struct Leaf<P> {
    kind: Kind,
    label: Option<String>,
    collected: CollectBuffer<P>,
}

impl<P> Leaf<P> {
    pub fn new(kind: Kind) -> Self {
        Leaf {
            kind,
            label: None,
            collected: CollectBuffer::default(),
        }
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    /// The kind this leaf accepts.
    #[inline]
    pub fn kind(&self) -> Kind {
        self.kind
    }
}

impl<P: Payload> Rule<P> for Leaf<P> {
    fn evaluate(&mut self, token: Token<P>) -> Outcome<P> {
        if token.kind() != self.kind {
            trace!(
                rule = trace_name(self.label.as_deref(), RuleShape::Leaf),
                expected = %self.kind,
                found = %token.kind(),
                "leaf mismatch"
            );
            return Outcome::failed([token]);
        }

        trace!(
            rule = trace_name(self.label.as_deref(), RuleShape::Leaf),
            kind = %token.kind(),
            "leaf match"
        );
        if self.collected.is_enabled() {
            self.collected.record(Collected::Item(token.payload().clone()));
            self.collected.conclude();
        }
        Outcome::finished([token], [])
    }

    fn reset(&mut self) {
        self.collected.clear();
    }

    fn set_collecting(&mut self, collecting: bool) {
        self.collected.set_enabled(collecting);
    }

    fn collect(&mut self) -> Vec<Collected<P>> {
        self.collected.drain()
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Leaf
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
