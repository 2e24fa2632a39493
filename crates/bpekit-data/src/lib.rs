#![warn(missing_docs, unused)]
//! # `bpekit-data` Dataset and Shard Collaborators
//!
//! The I/O collaborators around the `bpekit` engine:
//!
//! * [`TextDataset`] - loading text corpora and partitioning them across
//!   processes.
//! * [`ShardWriter`] - persisting encoded token streams as fixed-size
//!   16-bit binary shards.
//! * [`rank_and_world_size`] - the OpenMPI distribution environment.
//!
//! The engine never blocks on I/O itself; everything here runs outside it.

mod dataset;
mod dist;
mod shard_writer;

pub use dataset::TextDataset;
pub use dist::{RANK_ENV, WORLD_SIZE_ENV, rank_and_world_size};
pub use shard_writer::ShardWriter;
