//! One-of-many: the first alternative that matches wins.

use std::mem;

use gds_ir::{Collected, Token};
use tracing::trace;

use super::{trace_name, BoxedRule, CollectBuffer, Payload, ReplayQueue, Rule, RuleShape};
use crate::{GrammarError, Outcome, Status};

/// Tries its alternatives in construction order.
///
/// When an alternative fails, every token it saw goes back on the pending
/// queue so the next alternative starts from the same input. The first
/// alternative to finish wins outright, even if a later one would also
/// match. If the last alternative fails, the whole attempt is replayed.
#[derive(Debug)]
pub struct Choice<P> {
    alternatives: Vec<BoxedRule<P>>,
    label: Option<String>,
    collected: CollectBuffer<P>,
    state: ChoiceState<P>,
}

#[derive(Debug)]
struct ChoiceState<P> {
    /// Index of the alternative currently being tried.
    cursor: usize,
    pending: ReplayQueue<P>,
}

impl<P> Default for ChoiceState<P> {
    fn default() -> Self {
        ChoiceState {
            cursor: 0,
            pending: ReplayQueue::default(),
        }
    }
}

impl<P> Choice<P> {
    pub fn new(alternatives: Vec<BoxedRule<P>>) -> Result<Self, GrammarError> {
        if alternatives.is_empty() {
            return Err(GrammarError::EmptyComposite {
                shape: RuleShape::Choice,
                label: None,
            });
        }
        Ok(Choice {
            alternatives,
            label: None,
            collected: CollectBuffer::default(),
            state: ChoiceState::default(),
        })
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn alternatives(&self) -> &[BoxedRule<P>] {
        &self.alternatives
    }

    /// Index of the alternative the next token goes to.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.state.cursor
    }
}

impl<P: Payload> Rule<P> for Choice<P> {
    fn evaluate(&mut self, token: Token<P>) -> Outcome<P> {
        debug_assert!(
            self.state.pending.is_empty(),
            "choice entered with undrained tokens"
        );
        self.state.pending.push_back(token);

        while let Some(token) = self.state.pending.pop_front() {
            let cursor = self.state.cursor;
            let outcome = self.alternatives[cursor].evaluate(token);
            match outcome.status() {
                Status::Unfinished => {}
                Status::Finished => {
                    trace!(
                        rule = trace_name(self.label.as_deref(), RuleShape::Choice),
                        alternative = cursor,
                        "choice matched"
                    );
                    self.collected
                        .record_child(self.alternatives[cursor].as_mut());
                    self.collected.conclude();

                    let mut state = mem::take(&mut self.state);
                    let (_, committed, replayed) = outcome.into_parts();
                    return Outcome::finished(
                        committed,
                        replayed.into_iter().chain(state.pending.take_all()),
                    );
                }
                Status::Failed => {
                    let (_, committed, replayed) = outcome.into_parts();
                    self.state
                        .pending
                        .requeue_front(committed.into_iter().chain(replayed));

                    if cursor + 1 == self.alternatives.len() {
                        trace!(
                            rule = trace_name(self.label.as_deref(), RuleShape::Choice),
                            replayed = self.state.pending.len(),
                            "choice exhausted"
                        );
                        self.collected.discard();
                        let mut state = mem::take(&mut self.state);
                        return Outcome::failed(state.pending.take_all());
                    }

                    trace!(
                        rule = trace_name(self.label.as_deref(), RuleShape::Choice),
                        alternative = cursor,
                        retry = self.state.pending.len(),
                        "choice alternative failed"
                    );
                    self.state.cursor = cursor + 1;
                }
            }
        }

        Outcome::unfinished()
    }

    fn reset(&mut self) {
        self.state = ChoiceState::default();
        self.collected.clear();
        for alternative in &mut self.alternatives {
            alternative.reset();
        }
    }

    fn set_collecting(&mut self, collecting: bool) {
        self.collected.set_enabled(collecting);
        for alternative in &mut self.alternatives {
            alternative.set_collecting(collecting);
        }
    }

    fn collect(&mut self) -> Vec<Collected<P>> {
        self.collected.drain()
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Choice
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
