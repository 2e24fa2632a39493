//! # Token Decoders
//!
//! Expanding token ids back into bytes and text.

mod pair_decoder;

pub use pair_decoder::{decode_text, try_decode_bytes};
