/*!
error module defines the error types used in rpsl-peering.
*/
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PolicyError {
    /// The braces of a rule do not balance.
    ///
    /// ## Occurs during:
    ///  - Decomposing a rule expression
    #[error("brace count does not fit in rule: {0}")]
    UnbalancedBraces(String),
    /// The selector part of a rule contains neither `FROM` nor `TO`.
    ///
    /// ## Occurs during:
    ///  - Decomposing a rule expression
    #[error("cannot find filter factors in '{selector}' in rule: {rule}")]
    MissingFactor { selector: String, rule: String },
    /// No import, export or default grammar matched the factor.
    ///
    /// ## Occurs during:
    ///  - Matching a factor against the rule grammars
    #[error("cannot parse factor: {0}")]
    UnmatchedFactor(String),
    /// The registry document is not well-formed XML.
    #[error("failed to load registry content in XML format: {0}")]
    InvalidDocument(#[from] roxmltree::Error),
}

impl PolicyError {
    /// `true` for errors raised while splitting a rule into selector and filter.
    pub fn is_decomposition_error(&self) -> bool {
        matches!(
            self,
            PolicyError::UnbalancedBraces(_) | PolicyError::MissingFactor { .. }
        )
    }

    /// `true` when no factor grammar matched.
    pub fn is_grammar_error(&self) -> bool {
        matches!(self, PolicyError::UnmatchedFactor(_))
    }
}
