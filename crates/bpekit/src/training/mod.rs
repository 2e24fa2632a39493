//! # Vocabulary Training
//!
//! Support for learning an ordered merge list from pre-tokenized byte
//! blocks.
//!
//! Training builds a [`PairIndex`] over the blocks, then repeatedly merges
//! the highest-count pair until the vocabulary is full or no pair occurs
//! more than once. The iterative merge loop is serial; only the initial
//! index build may be parallelized (the `rayon` feature), which does not
//! change the result.

mod pair_index;
mod trainer;

pub use pair_index::{PairCountMap, PairIndex, PairOccurrenceMap};
pub use trainer::{CancelToken, TrainOutcome, Trainer, TrainerOptions};
