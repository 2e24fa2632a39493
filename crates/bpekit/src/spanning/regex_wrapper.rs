//! # Regex Wrapper
//! This module provides mechanisms to mix `regex` and `fancy_regex` types.
//!
//! The default split pattern uses a lookahead, which the `regex` crate
//! cannot compile; patterns are therefore `Adaptive` by default and fall
//! back to `fancy_regex` when needed.

use core::ops::Range;

use crate::errors::{BpeResult, BpekitError};

/// The default block split pattern.
///
/// Matches a word run, a punctuation run (each optionally prefixed by one
/// whitespace), or a whitespace run that precedes more whitespace.
pub const DEFAULT_SPLIT_PATTERN: &str = r"\s?\w+|\s?[^a-zA-Z0-9\s]+|\s+(?=\s)";

/// Label for split regex patterns.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum SplitPattern {
    /// This is a pattern for the `regex` crate.
    Basic(String),

    /// This is a pattern for the `fancy_regex` crate.
    Fancy(String),

    /// This pattern will try the `regex` crate first,
    /// and fallback to `fancy_regex` if it fails.
    Adaptive(String),
}

impl<S: AsRef<str>> From<S> for SplitPattern {
    fn from(pattern: S) -> Self {
        Self::Adaptive(pattern.as_ref().to_string())
    }
}

impl Default for SplitPattern {
    fn default() -> Self {
        DEFAULT_SPLIT_PATTERN.into()
    }
}

impl SplitPattern {
    /// Get the underlying regex pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(pattern) => pattern,
            Self::Fancy(pattern) => pattern,
            Self::Adaptive(pattern) => pattern,
        }
    }

    /// Compile the pattern into a [`SplitRegex`].
    ///
    /// ## Returns
    /// A `Result` containing the compiled `SplitRegex` or a pattern error.
    pub fn compile(&self) -> BpeResult<SplitRegex> {
        let wrap = |e: String| BpekitError::Pattern(e);

        match self {
            Self::Basic(pattern) => Ok(SplitRegex::Basic(
                regex::Regex::new(pattern).map_err(|e| wrap(e.to_string()))?,
            )),
            Self::Fancy(pattern) => Ok(SplitRegex::Fancy(Box::new(
                fancy_regex::Regex::new(pattern).map_err(|e| wrap(e.to_string()))?,
            ))),
            Self::Adaptive(pattern) => match regex::Regex::new(pattern) {
                Ok(re) => Ok(SplitRegex::Basic(re)),
                Err(_) => Ok(SplitRegex::Fancy(Box::new(
                    fancy_regex::Regex::new(pattern).map_err(|e| wrap(e.to_string()))?,
                ))),
            },
        }
    }
}

/// A compiled split regex, from either engine.
#[derive(Debug, Clone)]
pub enum SplitRegex {
    /// Compiled by the `regex` crate.
    Basic(regex::Regex),

    /// Compiled by the `fancy_regex` crate.
    Fancy(Box<fancy_regex::Regex>),
}

impl SplitRegex {
    /// Get the source pattern.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Basic(re) => re.as_str(),
            Self::Fancy(re) => re.as_str(),
        }
    }

    /// Find all non-overlapping match ranges in `text`, in document order.
    ///
    /// Runtime match failures (`fancy_regex` backtrack limits) surface as
    /// pattern errors.
    pub fn find_ranges(
        &self,
        text: &str,
    ) -> BpeResult<Vec<Range<usize>>> {
        match self {
            Self::Basic(re) => Ok(re.find_iter(text).map(|m| m.start()..m.end()).collect()),
            Self::Fancy(re) => {
                let mut ranges = Vec::new();
                for m in re.find_iter(text) {
                    let m = m.map_err(|e| BpekitError::Pattern(e.to_string()))?;
                    ranges.push(m.start()..m.end());
                }
                Ok(ranges)
            }
        }
    }
}
