//! Reference driver: feeds a token stream through a root rule.
//!
//! The token source is forward-only. Tokens the root hands back when it
//! finishes go on a replay queue that is always drained before the next
//! token is pulled from the source, so every token is fed in stream order
//! exactly once per attempt.

use gds_ir::{Collected, Token};
use tracing::debug;

use crate::rule::{BoxedRule, Payload, ReplayQueue, Rule};
use crate::{DriveError, GrammarError, RuleDef, Status};

/// How a [`Driver`] treats its stream.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct DriverConfig {
    /// Gather collected data for each match.
    pub collecting: bool,
    /// Re-arm the root after each match until input runs out. When off,
    /// the root matches once.
    pub repeat_root: bool,
    /// Return tokens left after the last match instead of failing.
    pub allow_trailing: bool,
}

impl Default for DriverConfig {
    fn default() -> Self {
        DriverConfig {
            collecting: true,
            repeat_root: false,
            allow_trailing: false,
        }
    }
}

impl DriverConfig {
    #[must_use]
    pub fn with_collecting(mut self, collecting: bool) -> Self {
        self.collecting = collecting;
        self
    }

    #[must_use]
    pub fn with_repeat_root(mut self, repeat_root: bool) -> Self {
        self.repeat_root = repeat_root;
        self
    }

    #[must_use]
    pub fn with_allow_trailing(mut self, allow_trailing: bool) -> Self {
        self.allow_trailing = allow_trailing;
        self
    }
}

/// One completed root match.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Match<P> {
    /// Tokens the root committed, in stream order.
    pub tokens: Vec<Token<P>>,
    /// Data the root collected. Empty when collection is off.
    pub collected: Vec<Collected<P>>,
}

/// Result of a successful [`Driver::run`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parsed<P> {
    pub matches: Vec<Match<P>>,
    /// Tokens after the last match. Only non-empty with `allow_trailing`.
    pub trailing: Vec<Token<P>>,
}

impl<P> Parsed<P> {
    /// Tokens committed across all matches.
    pub fn matched_len(&self) -> usize {
        self.matches.iter().map(|m| m.tokens.len()).sum()
    }
}

/// Why the feed loop stopped.
enum Stop {
    /// The source ran dry.
    Exhausted,
    /// The root finished and will not be re-armed.
    Concluded,
}

/// Owns a root rule and validates whole streams against it.
#[derive(Debug)]
pub struct Driver<P> {
    root: BoxedRule<P>,
    config: DriverConfig,
}

impl<P: Payload> Driver<P> {
    pub fn new(root: BoxedRule<P>, config: DriverConfig) -> Self {
        Driver { root, config }
    }

    /// Build the root from a grammar definition.
    pub fn from_def(def: &RuleDef, config: DriverConfig) -> Result<Self, GrammarError> {
        Ok(Driver::new(def.build()?, config))
    }

    #[inline]
    pub fn config(&self) -> &DriverConfig {
        &self.config
    }

    #[inline]
    pub fn root(&self) -> &dyn Rule<P> {
        self.root.as_ref()
    }

    /// Validate `tokens` against the root rule.
    ///
    /// The root is reset first, so a driver can be reused across streams.
    pub fn run<I>(&mut self, tokens: I) -> Result<Parsed<P>, DriveError>
    where
        I: IntoIterator<Item = Token<P>>,
    {
        self.root.reset();
        self.root.set_collecting(self.config.collecting);

        let mut input = tokens.into_iter();
        let mut replay = ReplayQueue::default();
        let mut matches = Vec::new();
        // Stream position of the current attempt's first token, and how many
        // tokens the root has been fed in this attempt.
        let mut attempt_start = 0;
        let mut fed = 0;

        debug!(
            rule = self.root.label().unwrap_or(self.root.shape().as_str()),
            repeat_root = self.config.repeat_root,
            "run started"
        );

        let stop = loop {
            let Some(token) = replay.pop_front().or_else(|| input.next()) else {
                break Stop::Exhausted;
            };
            let kind = token.kind();
            fed += 1;

            let outcome = self.root.evaluate(token);
            debug_assert!(
                outcome.is_unfinished() || outcome.token_count() == fed,
                "root attempt fed {fed} tokens but returned {}",
                outcome.token_count()
            );

            match outcome.status() {
                Status::Unfinished => {}
                Status::Failed => {
                    let position = attempt_start + fed - 1;
                    debug!(position, %kind, attempt_start, "root rule failed");
                    return Err(DriveError::Mismatch {
                        position,
                        kind,
                        attempt_start,
                        rule: self.root.label().map(str::to_owned),
                    });
                }
                Status::Finished => {
                    let (_, committed, replayed) = outcome.into_parts();
                    debug!(
                        attempt_start,
                        committed = committed.len(),
                        replayed = replayed.len(),
                        "root rule finished"
                    );
                    attempt_start += committed.len();
                    fed = 0;
                    replay.requeue_front(replayed);

                    let matched_nothing = committed.is_empty();
                    matches.push(Match {
                        tokens: committed.into_vec(),
                        collected: self.root.collect(),
                    });
                    // An empty match would repeat forever.
                    if !self.config.repeat_root || matched_nothing {
                        break Stop::Concluded;
                    }
                }
            }
        };

        if let Stop::Exhausted = stop {
            if fed > 0 {
                return Err(DriveError::UnexpectedEnd {
                    consumed: attempt_start + fed,
                });
            }
            if matches.is_empty() {
                return Err(DriveError::EmptyInput);
            }
            debug!(matches = matches.len(), "run finished");
            return Ok(Parsed {
                matches,
                trailing: Vec::new(),
            });
        }

        let mut rest = replay.take_all().into_iter().chain(input);
        let trailing: Vec<_> = if self.config.allow_trailing {
            rest.collect()
        } else if let Some(token) = rest.next() {
            return Err(DriveError::TrailingTokens {
                position: attempt_start,
                kind: token.kind(),
            });
        } else {
            Vec::new()
        };

        debug!(
            matches = matches.len(),
            trailing = trailing.len(),
            "run finished"
        );
        Ok(Parsed { matches, trailing })
    }
}

#[cfg(test)]
#[expect(clippy::unwrap_used, reason = "Tests use unwrap for brevity")]
mod tests;
