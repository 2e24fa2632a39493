//! # Block Encoders
//!
//! Applying a trained merge list to byte blocks.

mod merge_encoder;

pub use merge_encoder::{append_encoded_block, encode_block};
