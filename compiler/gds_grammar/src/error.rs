//! Error types for grammar construction and stream validation.
//!
//! Grammar mismatch is not an error inside the engine: rules report it as a
//! `Failed` outcome so that choices, optionals and repeats can recover from
//! it. Only two things surface as `Err`:
//! - [`GrammarError`]: a rule tree or outcome was built wrong (fail fast)
//! - [`DriveError`]: the root rule rejected the stream as a whole

use gds_ir::Kind;

use crate::rule::RuleShape;

/// Errors raised while assembling a grammar or an outcome.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    /// An outcome tag outside `Unfinished`/`Finished`/`Failed`.
    #[error("invalid outcome status tag {0}")]
    InvalidStatus(u8),

    /// An outcome whose queues contradict its status.
    #[error("malformed outcome: {0}")]
    MalformedOutcome(&'static str),

    /// A composite rule was given no children.
    #[error("{shape} rule{} has no children", name_suffix(.label.as_ref()))]
    EmptyComposite {
        shape: RuleShape,
        label: Option<String>,
    },

    /// A leaf rule was given children.
    #[error("leaf rule{} for {kind} cannot have children", name_suffix(.label.as_ref()))]
    LeafWithChildren { kind: Kind, label: Option<String> },

    /// A leaf rule without a token kind to match.
    #[error("leaf rule{} has no token kind", name_suffix(.label.as_ref()))]
    MissingKind { label: Option<String> },

    /// A composite rule carrying a token kind.
    #[error("{shape} rule{} cannot match a token kind directly", name_suffix(.label.as_ref()))]
    UnexpectedKind {
        shape: RuleShape,
        label: Option<String>,
    },
}

/// Errors reported by [`Driver::run`](crate::Driver::run).
///
/// Positions are 0-based ordinals into the token stream.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DriveError {
    /// The root rule failed. `attempt_start` is where the rejected attempt
    /// began; `position` is the token that made it fail.
    #[error(
        "token {position} ({kind}) does not match{} (attempt began at token {attempt_start})",
        name_suffix(.rule.as_ref())
    )]
    Mismatch {
        position: usize,
        kind: Kind,
        attempt_start: usize,
        rule: Option<String>,
    },

    /// Input ran out while the root rule was still mid-attempt.
    #[error("input ended inside an unfinished match after {consumed} tokens")]
    UnexpectedEnd { consumed: usize },

    /// Tokens remained after the root rule finished.
    #[error("unexpected trailing token {position} ({kind})")]
    TrailingTokens { position: usize, kind: Kind },

    /// The stream contained no tokens at all.
    #[error("no tokens to validate")]
    EmptyInput,
}

fn name_suffix(label: Option<&String>) -> String {
    label.map(|name| format!(" `{name}`")).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn grammar_error_messages_name_the_rule() {
        let err = GrammarError::EmptyComposite {
            shape: RuleShape::Choice,
            label: Some("element".to_owned()),
        };
        assert_eq!(err.to_string(), "choice rule `element` has no children");

        let err = GrammarError::LeafWithChildren {
            kind: Kind::new(8),
            label: None,
        };
        assert_eq!(err.to_string(), "leaf rule for #8 cannot have children");
    }

    #[test]
    fn drive_error_messages() {
        let err = DriveError::Mismatch {
            position: 4,
            kind: Kind::new(17),
            attempt_start: 0,
            rule: Some("library".to_owned()),
        };
        assert_eq!(
            err.to_string(),
            "token 4 (#17) does not match `library` (attempt began at token 0)"
        );
        assert_eq!(
            DriveError::UnexpectedEnd { consumed: 3 }.to_string(),
            "input ended inside an unfinished match after 3 tokens"
        );
    }
}
