//! Core library for verbatim.
//!
//! This crate finds word runs that a candidate text shares verbatim with one
//! or more reference texts, after normalizing both sides so that formatting
//! noise does not hide a copy. It backs the `verbatim` CLI and MCP server.
//!
//! # Modules
//!
//! - [`normalize`] - Text canonicalization (boilerplate, quotes, punctuation)
//! - [`matcher`] - Greedy longest-run search between two texts
//! - [`aggregate`] - One candidate against many labelled sources
//! - [`markup`] - Markdown-to-prose extraction
//! - [`config`] - Configuration loading and management
//! - [`error`] - Error types and result aliases
//!
//! # Quick Start
//!
//! ```
//! use verbatim_core::{Comparator, ComparisonRequest, Source};
//!
//! let request = ComparisonRequest::new("the quick brown fox jumps over the lazy dog")
//!     .with_source(Source::new("fable.txt", "a quick brown fox jumps over the lazy cat"));
//!
//! let report = Comparator::default().compare(&request);
//! let found = report.get("fable.txt").expect("shared run");
//! assert_eq!(found.matches[0].text, "quick brown fox jumps over the lazy");
//! ```
#![deny(unsafe_code)]

pub mod aggregate;
pub mod config;
pub mod error;
pub mod markup;
pub mod matcher;
pub mod normalize;

pub use aggregate::{
    Comparator, ComparisonReport, ComparisonRequest, MANUAL_LABEL, Source, SourceMatches,
};
pub use config::{Config, ConfigLoader, LogLevel, NormalizeConfig};
pub use error::{ConfigError, ConfigResult, RuleError, RuleResult};
pub use matcher::{DEFAULT_MIN_WORDS, MatchRecord, find_matches};
pub use normalize::{Normalizer, RuleSummary, normalize};

/// Default input size limit (5 MiB) applied to every text read from disk,
/// stdin, or an MCP request.
pub const DEFAULT_MAX_INPUT_BYTES: usize = 5 * 1024 * 1024;
