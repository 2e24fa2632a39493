#![warn(missing_docs, unused)]
//! # `bpekit` BPE Tokenizer Engine
//!
//! Trains byte-pair-encoding tokenizers over text corpora and applies them
//! to produce token-id streams for language-model training.
//!
//! ## Client Summary
//!
//! ### Core Client Types
//! * [`TokenType`] - the parameterized integer type used for symbol ids;
//!   choose from `{ u16, u32, u64 }`.
//! * [`MergeList<T>`] - the ordered, immutable merge rules.
//! * [`Tokenizer<T>`] - the user-facing façade: train, encode, decode,
//!   save, load.
//!
//! ## Training
//!
//! Text is pre-tokenized into byte blocks by a configurable split pattern
//! ([`spanning`]); the trainer ([`training`]) learns `vocab_size - 256`
//! ordered pair merges by repeatedly merging the highest-count adjacent
//! pair, with ties broken toward the smallest pair for determinism.
//!
//! ```rust
//! use bpekit::{Tokenizer, TokenizerOptions};
//!
//! let tokenizer: Tokenizer<u32> = Tokenizer::train_from_texts(
//!     ["hello world", "hello san francisco"],
//!     TokenizerOptions::new(300),
//! )
//! .unwrap();
//!
//! let tokens = tokenizer.encode_text("hello world").unwrap();
//! assert_eq!(tokenizer.decode(&tokens).unwrap(), "hello world");
//! ```
//!
//! ## Encoding and Shards
//!
//! Encoding is a pure function of the merge list and is thread-safe;
//! [`Tokenizer::encode_stream`] yields per-document token vectors lazily
//! for a downstream shard writer. Persisted shards use 16-bit ids, so
//! vocabularies meant for shards should stay within `u16`.
//!
//! ## Crate Features
//! * `rayon` (default) - batch-parallel encoding and the parallel
//!   pair-index build prelude.

pub mod decoders;
pub mod encoders;
pub mod io;
pub mod spanning;
pub mod training;

mod errors;
mod merges;
mod tokenizer;
mod types;

#[doc(inline)]
pub use errors::*;
#[doc(inline)]
pub use merges::MergeList;
#[doc(inline)]
pub use tokenizer::*;
#[doc(inline)]
pub use types::*;
