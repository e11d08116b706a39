//! Greedy repetition of a rule-set.

use std::mem;

use gds_ir::{Collected, Token};
use tracing::trace;

use super::{
    trace_name, BoxedRule, CollectBuffer, Payload, ReplayQueue, Rule, RuleShape, Sequence,
};
use crate::{GrammarError, Outcome, Status};

/// How many passes a [`Repeat`] requires.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum RepeatMode {
    /// At least one pass; zero passes fails.
    OneOrMore,
    /// Any number of passes; never fails.
    ZeroOrMore,
}

impl RepeatMode {
    #[inline]
    fn shape(self) -> RuleShape {
        match self {
            RepeatMode::OneOrMore => RuleShape::OneOrMore,
            RepeatMode::ZeroOrMore => RuleShape::ZeroOrMore,
        }
    }
}

/// Matches its children in order as many times as the input allows.
///
/// Each pass runs an inner [`Sequence`], so a pass only counts once every
/// child has finished. The repetition ends at the first pass that fails.
/// The tokens of that unfinished pass are replayed in full; nothing from a
/// partial pass is committed.
///
/// A pass that finishes without committing anything still counts, and its
/// (empty) group is collected like any other pass, but it ends the
/// repetition. Retrying it would match empty forever.
#[derive(Debug)]
pub struct Repeat<P> {
    mode: RepeatMode,
    inner: Sequence<P>,
    label: Option<String>,
    collected: CollectBuffer<P>,
    state: RepeatState<P>,
}

#[derive(Debug)]
struct RepeatState<P> {
    pending: ReplayQueue<P>,
    /// Tokens of every completed pass.
    committed: Vec<Token<P>>,
    passes: usize,
}

impl<P> Default for RepeatState<P> {
    fn default() -> Self {
        RepeatState {
            pending: ReplayQueue::default(),
            committed: Vec::new(),
            passes: 0,
        }
    }
}

impl<P> Repeat<P> {
    pub fn new(mode: RepeatMode, children: Vec<BoxedRule<P>>) -> Result<Self, GrammarError> {
        let inner = Sequence::new(children).map_err(|_| GrammarError::EmptyComposite {
            shape: mode.shape(),
            label: None,
        })?;
        Ok(Repeat {
            mode,
            inner,
            label: None,
            collected: CollectBuffer::default(),
            state: RepeatState::default(),
        })
    }

    pub fn one_or_more(children: Vec<BoxedRule<P>>) -> Result<Self, GrammarError> {
        Self::new(RepeatMode::OneOrMore, children)
    }

    pub fn zero_or_more(children: Vec<BoxedRule<P>>) -> Result<Self, GrammarError> {
        Self::new(RepeatMode::ZeroOrMore, children)
    }

    #[must_use]
    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    #[inline]
    pub fn mode(&self) -> RepeatMode {
        self.mode
    }

    pub fn children(&self) -> &[BoxedRule<P>] {
        self.inner.children()
    }

    /// Passes completed in the current attempt.
    #[inline]
    pub fn passes(&self) -> usize {
        self.state.passes
    }

    /// Conclude the repetition. `replay` is everything after the last
    /// completed pass, in input order.
    fn conclude(&mut self, replay: Vec<Token<P>>) -> Outcome<P> {
        let state = mem::take(&mut self.state);
        let name = trace_name(self.label.as_deref(), self.mode.shape());
        if state.passes == 0 && self.mode == RepeatMode::OneOrMore {
            trace!(rule = name, replayed = replay.len(), "repeat found nothing");
            self.collected.discard();
            return Outcome::failed(replay);
        }

        trace!(
            rule = name,
            passes = state.passes,
            committed = state.committed.len(),
            replayed = replay.len(),
            "repeat finished"
        );
        self.collected.conclude();
        Outcome::finished(state.committed, replay)
    }
}

impl<P: Payload> Rule<P> for Repeat<P> {
    fn evaluate(&mut self, token: Token<P>) -> Outcome<P> {
        debug_assert!(
            self.state.pending.is_empty(),
            "repeat entered with undrained tokens"
        );
        self.state.pending.push_back(token);

        while let Some(token) = self.state.pending.pop_front() {
            let outcome = self.inner.evaluate(token);
            match outcome.status() {
                Status::Unfinished => {}
                Status::Finished => {
                    let (_, committed, replayed) = outcome.into_parts();
                    if committed.is_empty() {
                        // Empty pass: found, but not worth another try.
                        self.state.passes += 1;
                        self.collected.record_child(&mut self.inner);
                        let mut replay: Vec<_> = replayed.into_iter().collect();
                        replay.extend(self.state.pending.take_all());
                        return self.conclude(replay);
                    }

                    self.state.passes += 1;
                    trace!(
                        rule = trace_name(self.label.as_deref(), self.mode.shape()),
                        pass = self.state.passes,
                        committed = committed.len(),
                        replayed = replayed.len(),
                        "repeat pass finished"
                    );
                    self.state.committed.extend(committed);
                    self.state.pending.requeue_front(replayed);
                    self.collected.record_child(&mut self.inner);
                }
                Status::Failed => {
                    let (_, committed, replayed) = outcome.into_parts();
                    let mut replay: Vec<_> = committed.into_iter().chain(replayed).collect();
                    replay.extend(self.state.pending.take_all());
                    return self.conclude(replay);
                }
            }
        }

        Outcome::unfinished()
    }

    fn reset(&mut self) {
        self.state = RepeatState::default();
        self.collected.clear();
        self.inner.reset();
    }

    fn set_collecting(&mut self, collecting: bool) {
        self.collected.set_enabled(collecting);
        self.inner.set_collecting(collecting);
    }

    fn collect(&mut self) -> Vec<Collected<P>> {
        self.collected.drain()
    }

    fn shape(&self) -> RuleShape {
        self.mode.shape()
    }

    fn label(&self) -> Option<&str> {
        self.label.as_deref()
    }
}
