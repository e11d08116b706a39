//! Zero-or-one occurrence.

use gds_ir::{Collected, Token};
use tracing::trace;

use super::{trace_name, BoxedRule, Payload, Rule, RuleShape, Sequence};
use crate::{GrammarError, Outcome, Status};

/// Matches its children in order, or nothing at all.
///
/// Built on a [`Sequence`] over the wrapped children. A failure of that
/// sequence becomes a vacuous success: nothing committed, every consumed
/// token replayed, partial collected data dropped.
#[derive(Debug)]
pub struct Optional<P> {
    inner: Sequence<P>,
    label: Option<String>,
}

impl<P> Optional<P> {
    pub fn new(children: Vec<BoxedRule<P>>) -> Result<Self, GrammarError> {
        let inner = Sequence::new(children).map_err(|_| GrammarError::EmptyComposite {
            shape: RuleShape::Optional,
            label: None,
        })?;
        Ok(Optional { inner, label: None })
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn children(&self) -> &[BoxedRule<P>] {
        self.inner.children()
    }
}

impl<P: Payload> Rule<P> for Optional<P> {
    fn evaluate(&mut self, token: Token<P>) -> Outcome<P> {
        let outcome = self.inner.evaluate(token);
        if outcome.status() != Status::Failed {
            return outcome;
        }

        let (_, committed, replayed) = outcome.into_parts();
        trace!(
            rule = trace_name(self.label.as_deref(), RuleShape::Optional),
            replayed = committed.len() + replayed.len(),
            "optional absent"
        );
        Outcome::finished([], committed.into_iter().chain(replayed))
    }

    fn reset(&mut self) {
        self.inner.reset();
    }

    fn set_collecting(&mut self, collecting: bool) {
        self.inner.set_collecting(collecting);
    }

    fn collect(&mut self) -> Vec<Collected<P>> {
        self.inner.collect()
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Optional
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
