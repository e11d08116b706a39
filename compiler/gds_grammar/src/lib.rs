//! Incremental backtracking grammar engine for GDS record streams.
//!
//! Validates a forward-only stream of tokens against a tree of composable
//! rules, one token at a time. Rules never see the stream itself: each
//! [`Rule::evaluate`] call hands over one token and returns an [`Outcome`]
//! saying whether the rule needs more, matched, or failed, and which tokens
//! must be replayed to whoever evaluates next. That replay protocol is what
//! lets a choice try its next alternative, or a repeat stop at the first
//! record it cannot use, without rewinding the source.
//!
//! Grammars are assembled either directly from the rule types or from a
//! declarative [`RuleDef`]. The [`Driver`] feeds a whole stream through a
//! root rule and turns a root failure into a [`DriveError`].
//!
//! # Debug Environment Variables
//!
//! - `RUST_LOG=gds_grammar=debug`: driver run boundaries and root outcomes.
//! - `RUST_LOG=gds_grammar=trace`: every rule decision, token by token.
//!
//! Call [`init_tracing`] to install a subscriber that honors `RUST_LOG`.

mod def;
mod driver;
mod error;
mod outcome;
mod rule;

use std::sync::Once;

pub use def::RuleDef;
pub use driver::{Driver, DriverConfig, Match, Parsed};
pub use error::{DriveError, GrammarError};
pub use outcome::{Outcome, Status, TokenQueue};
pub use rule::{
    BoxedRule, Choice, Leaf, Optional, Payload, Repeat, RepeatMode, Rule, RuleShape, Sequence,
};

pub use gds_ir::{Collected, Kind, Token};

static TRACING_INIT: Once = Once::new();

/// Install a tracing subscriber filtered by `RUST_LOG`.
///
/// Safe to call multiple times. Does nothing unless `RUST_LOG` is set, or if
/// the host already installed a global subscriber.
pub fn init_tracing() {
    TRACING_INIT.call_once(|| {
        use tracing_subscriber::{fmt, prelude::*, EnvFilter};

        if std::env::var("RUST_LOG").is_ok() {
            let filter = EnvFilter::from_default_env();
            // A subscriber the host set up first wins.
            tracing_subscriber::registry()
                .with(fmt::layer().with_target(true).with_level(true))
                .with(filter)
                .try_init()
                .ok();
        }
    });
}
