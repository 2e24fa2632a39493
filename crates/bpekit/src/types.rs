//! # Common Types and Traits
use core::fmt::{Debug, Display};
use core::hash::Hash;
use core::ops::{AddAssign, SubAssign};
use num_traits::{FromPrimitive, PrimInt, ToPrimitive, Unsigned};

/// The number of distinct byte values; also the first merged token id.
pub const BYTE_VOCAB_SIZE: usize = 256;

/// A type that can be used as a symbol id in the BPE engine.
///
/// Ids `0..256` are raw byte values; ids from [`BYTE_VOCAB_SIZE`] upward are
/// assigned sequentially by training.
pub trait TokenType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
{
}

impl<T> TokenType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
{
}

/// A type that can be used as a pair occurrence count.
pub trait CountType:
    'static
    + PrimInt
    + FromPrimitive
    + ToPrimitive
    + Unsigned
    + Hash
    + Default
    + Debug
    + Display
    + Send
    + Sync
    + AddAssign
    + SubAssign
{
}

impl<T> CountType for T where
    T: 'static
        + PrimInt
        + FromPrimitive
        + ToPrimitive
        + Unsigned
        + Hash
        + Default
        + Debug
        + Display
        + Send
        + Sync
        + AddAssign
        + SubAssign
{
}

/// An ordered pair of adjacent symbol ids.
pub type Pair<T> = (T, T);

/// Type Alias for hash maps in this crate.
pub type CommonHashMap<K, V> = ahash::AHashMap<K, V>;

/// Type Alias for hash sets in this crate.
pub type CommonHashSet<V> = ahash::AHashSet<V>;

/// Check if a type is `Send`.
#[cfg(test)]
pub(crate) fn check_is_send<S: Send>(_: S) {}

#[cfg(test)]
/// Check if a type is `Sync`.
pub(crate) fn check_is_sync<S: Sync>(_: S) {}
