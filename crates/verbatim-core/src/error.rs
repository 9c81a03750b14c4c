//! Error types for verbatim-core.

use thiserror::Error;

/// Errors that can occur when working with configuration.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// Failed to deserialize configuration.
    #[error("invalid configuration: {0}")]
    Deserialize(#[from] Box<figment::Error>),

    /// Configuration file not found after searching all locations.
    #[error("no configuration file found")]
    NotFound,
}

/// Result type alias using [`ConfigError`].
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Errors raised while compiling normalization rule data.
///
/// Normalizing and matching never fail; only turning configured rule data
/// into a [`Normalizer`](crate::normalize::Normalizer) can.
#[derive(Error, Debug)]
pub enum RuleError {
    /// A boilerplate pattern is not a valid regular expression.
    #[error("invalid boilerplate pattern `{pattern}`: {source}")]
    InvalidPattern {
        /// The pattern as written in configuration.
        pattern: String,
        /// The underlying regex compilation error.
        #[source]
        source: regex::Error,
    },

    /// The boilerplate phrase automaton could not be built.
    #[error("failed to build boilerplate phrase matcher: {0}")]
    PhraseSet(#[from] aho_corasick::BuildError),

    /// A quote style is unusable as configured.
    #[error("invalid quote style `{name}`: {reason}")]
    InvalidQuoteStyle {
        /// Name of the offending style.
        name: String,
        /// What is wrong with it.
        reason: &'static str,
    },
}

/// Result type alias using [`RuleError`].
pub type RuleResult<T> = Result<T, RuleError>;
