//! Required sequence: every child, in order, exactly once.

use std::mem;

use gds_ir::{Collected, Token};
use tracing::trace;

use super::{trace_name, BoxedRule, CollectBuffer, Payload, ReplayQueue, Rule, RuleShape};
use crate::{GrammarError, Outcome, Status};

/// Matches each child in turn.
///
/// Tokens a finished child hands back are offered to the next child before
/// any new input. If any child fails, the whole attempt is replayed in input
/// order: tokens already committed by earlier children, then the failing
/// child's tokens, then whatever was still pending.
#[derive(Debug)]
pub struct Sequence<P> {
    children: Vec<BoxedRule<P>>,
    label: Option<String>,
    collected: CollectBuffer<P>,
    state: SequenceState<P>,
}

#[derive(Debug)]
struct SequenceState<P> {
    /// Index of the child currently being attempted.
    cursor: usize,
    pending: ReplayQueue<P>,
    /// Tokens committed by children that already finished.
    committed: Vec<Token<P>>,
}

impl<P> Default for SequenceState<P> {
    fn default() -> Self {
        SequenceState {
            cursor: 0,
            pending: ReplayQueue::default(),
            committed: Vec::new(),
        }
    }
}

impl<P> Sequence<P> {
    pub fn new(children: Vec<BoxedRule<P>>) -> Result<Self, GrammarError> {
        if children.is_empty() {
            return Err(GrammarError::EmptyComposite {
                shape: RuleShape::Sequence,
                label: None,
            });
        }
        Ok(Sequence {
            children,
            label: None,
            collected: CollectBuffer::default(),
            state: SequenceState::default(),
        })
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn children(&self) -> &[BoxedRule<P>] {
        &self.children
    }

    /// Index of the child the next token goes to.
    #[inline]
    pub fn cursor(&self) -> usize {
        self.state.cursor
    }

    fn finish(&mut self) -> Outcome<P> {
        let mut state = mem::take(&mut self.state);
        self.collected.conclude();
        Outcome::finished(state.committed, state.pending.take_all())
    }

    fn fail(&mut self, failed: Outcome<P>) -> Outcome<P> {
        let mut state = mem::take(&mut self.state);
        self.collected.discard();
        let (_, child_committed, child_replayed) = failed.into_parts();
        let mut replay = state.committed;
        replay.extend(child_committed);
        replay.extend(child_replayed);
        replay.extend(state.pending.take_all());
        Outcome::failed(replay)
    }
}

impl<P: Payload> Rule<P> for Sequence<P> {
    fn evaluate(&mut self, token: Token<P>) -> Outcome<P> {
        debug_assert!(
            self.state.pending.is_empty(),
            "sequence entered with undrained tokens"
        );
        self.state.pending.push_back(token);

        while let Some(token) = self.state.pending.pop_front() {
            let cursor = self.state.cursor;
            let outcome = self.children[cursor].evaluate(token);
            match outcome.status() {
                Status::Unfinished => {}
                Status::Finished => {
                    let (_, committed, replayed) = outcome.into_parts();
                    trace!(
                        rule = trace_name(self.label.as_deref(), RuleShape::Sequence),
                        cursor,
                        committed = committed.len(),
                        replayed = replayed.len(),
                        "sequence child finished"
                    );
                    self.state.committed.extend(committed);
                    self.state.pending.requeue_front(replayed);
                    self.collected.record_child(self.children[cursor].as_mut());

                    if cursor + 1 == self.children.len() {
                        return self.finish();
                    }
                    self.state.cursor = cursor + 1;
                }
                Status::Failed => {
                    trace!(
                        rule = trace_name(self.label.as_deref(), RuleShape::Sequence),
                        cursor,
                        replayed = self.state.committed.len()
                            + outcome.token_count()
                            + self.state.pending.len(),
                        "sequence child failed"
                    );
                    return self.fail(outcome);
                }
            }
        }

        Outcome::unfinished()
    }

    fn reset(&mut self) {
        self.state = SequenceState::default();
        self.collected.clear();
        for child in &mut self.children {
            child.reset();
        }
    }

    fn set_collecting(&mut self, collecting: bool) {
        self.collected.set_enabled(collecting);
        for child in &mut self.children {
            child.set_collecting(collecting);
        }
    }

    fn collect(&mut self) -> Vec<Collected<P>> {
        self.collected.drain()
    }

    fn shape(&self) -> RuleShape {
        RuleShape::Sequence
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
