//! Three-state evaluation outcome.
//!
//! Every call to [`Rule::evaluate`](crate::Rule::evaluate) returns an
//! `Outcome`. It tells the caller where the rule stands and who owns the
//! tokens it has been handed so far:
//!
//! | Status       | `committable`              | `replayable`                      |
//! |--------------|----------------------------|-----------------------------------|
//! | `Unfinished` | empty (rule holds tokens)  | empty                             |
//! | `Finished`   | tokens the match accepted  | tokens to re-offer to the next rule |
//! | `Failed`     | empty                      | every token of the attempt        |
//!
//! Within one attempt, `committable` followed by `replayable` reproduces the
//! tokens that were fed in, in input order. Nothing is created, dropped, or
//! duplicated.

use std::fmt;

use gds_ir::Token;
use smallvec::SmallVec;

use crate::GrammarError;

/// Ordered token queue carried by an outcome.
///
/// Most outcomes hold zero or one token, so a couple of inline slots avoid
/// an allocation per leaf evaluation.
pub type TokenQueue<P> = SmallVec<[Token<P>; 2]>;

/// Where a rule stands after one evaluation step.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum Status {
    /// The rule needs more tokens before it can decide.
    Unfinished = 0,
    /// The rule matched.
    Finished = 1,
    /// The rule cannot match the tokens it was given.
    Failed = 2,
}

impl Status {
    /// Returns `true` once an attempt has concluded either way.
    #[inline]
    pub fn is_concluded(self) -> bool {
        !matches!(self, Status::Unfinished)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Unfinished => "unfinished",
            Status::Finished => "finished",
            Status::Failed => "failed",
        }
    }
}

impl TryFrom<u8> for Status {
    type Error = GrammarError;

    fn try_from(tag: u8) -> Result<Self, Self::Error> {
        match tag {
            0 => Ok(Status::Unfinished),
            1 => Ok(Status::Finished),
            2 => Ok(Status::Failed),
            other => Err(GrammarError::InvalidStatus(other)),
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Result of one evaluation step.
#[derive(Debug)]
pub struct Outcome<P> {
    status: Status,
    committable: TokenQueue<P>,
    replayable: TokenQueue<P>,
}

impl<P> Outcome<P> {
    /// The rule is still mid-attempt and holds every token fed so far.
    #[inline]
    pub fn unfinished() -> Self {
        Outcome {
            status: Status::Unfinished,
            committable: SmallVec::new(),
            replayable: SmallVec::new(),
        }
    }

    /// The rule matched `committable`; `replayable` belongs to whoever
    /// evaluates next.
    pub fn finished(
        committable: impl IntoIterator<Item = Token<P>>,
        replayable: impl IntoIterator<Item = Token<P>>,
    ) -> Self {
        Outcome {
            status: Status::Finished,
            committable: committable.into_iter().collect(),
            replayable: replayable.into_iter().collect(),
        }
    }

    /// The rule cannot match; every token of the attempt goes back.
    pub fn failed(replayable: impl IntoIterator<Item = Token<P>>) -> Self {
        Outcome {
            status: Status::Failed,
            committable: SmallVec::new(),
            replayable: replayable.into_iter().collect(),
        }
    }

    /// Build an outcome from a raw status tag and queues.
    ///
    /// Fails on an unknown tag, and on queues that contradict the status:
    /// an unfinished outcome cannot carry tokens and a failed one cannot
    /// commit any.
    pub fn from_parts(
        tag: u8,
        committable: impl IntoIterator<Item = Token<P>>,
        replayable: impl IntoIterator<Item = Token<P>>,
    ) -> Result<Self, GrammarError> {
        let status = Status::try_from(tag)?;
        let outcome = Outcome {
            status,
            committable: committable.into_iter().collect(),
            replayable: replayable.into_iter().collect(),
        };
        outcome.check_shape()?;
        Ok(outcome)
    }

    fn check_shape(&self) -> Result<(), GrammarError> {
        match self.status {
            Status::Unfinished if !self.committable.is_empty() || !self.replayable.is_empty() => Err(
                GrammarError::MalformedOutcome("an unfinished outcome cannot carry tokens"),
            ),
            Status::Failed if !self.committable.is_empty() => Err(GrammarError::MalformedOutcome(
                "a failed outcome cannot commit tokens",
            )),
            _ => Ok(()),
        }
    }

    #[inline]
    pub fn status(&self) -> Status {
        self.status
    }

    #[inline]
    pub fn is_unfinished(&self) -> bool {
        self.status == Status::Unfinished
    }

    #[inline]
    pub fn is_finished(&self) -> bool {
        self.status == Status::Finished
    }

    #[inline]
    pub fn is_failed(&self) -> bool {
        self.status == Status::Failed
    }

    /// Tokens permanently accepted by this step.
    #[inline]
    pub fn committable(&self) -> &[Token<P>] {
        &self.committable
    }

    /// Tokens to re-offer, in order, before any new input.
    #[inline]
    pub fn replayable(&self) -> &[Token<P>] {
        &self.replayable
    }

    /// Total tokens carried in both queues.
    #[inline]
    pub fn token_count(&self) -> usize {
        self.committable.len() + self.replayable.len()
    }

    /// Take the outcome apart: `(status, committable, replayable)`.
    #[inline]
    pub fn into_parts(self) -> (Status, TokenQueue<P>, TokenQueue<P>) {
        (self.status, self.committable, self.replayable)
    }
}
