//! # Text Spanning
//!
//! Pre-tokenization: splitting text into byte blocks before training or
//! encoding. Blocks are non-overlapping and cover the input in document
//! order; the engine never forms pairs across block boundaries.

mod block_spanner;
mod regex_wrapper;

pub use block_spanner::{BlockSpanner, SpanRef};
pub use regex_wrapper::{DEFAULT_SPLIT_PATTERN, SplitPattern, SplitRegex};
