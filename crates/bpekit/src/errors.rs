//! # Error Types

/// Errors from bpekit operations.
#[derive(Debug, thiserror::Error)]
pub enum BpekitError {
    /// Vocab size is at or below the byte space; there is nothing to learn.
    #[error("vocab size ({size}) must be > 256")]
    InvalidVocabSize {
        /// The vocab size that was too small.
        size: usize,
    },

    /// Vocab size exceeds the capacity of the target token type.
    #[error("vocab size ({size}) exceeds token type capacity")]
    VocabSizeOverflow {
        /// The vocab size that exceeded the capacity.
        size: usize,
    },

    /// The corpus contains no adjacent symbol pairs.
    #[error("corpus contains no blocks of length >= 2")]
    EmptyCorpus,

    /// A merge file failed header or rule validation on load.
    #[error("malformed merge file: {0}")]
    MalformedMergeFile(String),

    /// Token value out of range for the target representation.
    #[error("token {token} out of range")]
    TokenOutOfRange {
        /// The offending token value.
        token: u64,
    },

    /// A split pattern failed to compile or match.
    #[error("pattern error: {0}")]
    Pattern(String),

    /// I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Result type for bpekit operations.
pub type BpeResult<T> = core::result::Result<T, BpekitError>;
