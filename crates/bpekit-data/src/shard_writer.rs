//! # Token Shard Writer
//!
//! Persists an encoded token stream as fixed-size binary shards of 16-bit
//! little-endian values, named `{rank}_{split}_{index:06}.bin`. Every
//! shard holds exactly `shard_size` tokens except the trailing one, which
//! is truncated to the actual count and labelled `val` when it is not the
//! only shard.

use std::fs;
use std::io::{Error, ErrorKind};
use std::path::{Path, PathBuf};

use bpekit::{BpeResult, BpekitError, TokenType};

const TRAIN_SPLIT: &str = "train";
const VAL_SPLIT: &str = "val";

/// Writes per-document token arrays into fixed-size shard files.
///
/// Documents that do not fit in the current shard are split at the shard
/// boundary; there is no padding. [`ShardWriter::finish`] must be called
/// to flush the trailing shard.
#[derive(Debug)]
pub struct ShardWriter {
    dir: PathBuf,
    shard_size: usize,
    rank: usize,

    buf: Vec<u16>,
    shard_index: usize,
}

impl ShardWriter {
    /// Create a writer, creating the target directory if absent.
    ///
    /// ## Arguments
    /// * `dir` - the shard directory.
    /// * `shard_size` - tokens per shard; must be > 0.
    /// * `rank` - the process rank used in shard file names.
    pub fn create<P: AsRef<Path>>(
        dir: P,
        shard_size: usize,
        rank: usize,
    ) -> BpeResult<Self> {
        if shard_size == 0 {
            return Err(Error::new(ErrorKind::InvalidInput, "shard_size must be > 0").into());
        }

        let dir = dir.as_ref().to_path_buf();
        fs::create_dir_all(&dir)?;

        Ok(Self {
            dir,
            shard_size,
            rank,
            buf: Vec::with_capacity(shard_size),
            shard_index: 0,
        })
    }

    /// The shard file path for a split label at the current index.
    fn shard_path(
        &self,
        split: &str,
    ) -> PathBuf {
        self.dir
            .join(format!("{}_{}_{:06}.bin", self.rank, split, self.shard_index))
    }

    fn push_tokens<T: TokenType>(
        &mut self,
        tokens: &[T],
    ) -> BpeResult<()> {
        for &token in tokens {
            let value = token.to_u16().ok_or(BpekitError::TokenOutOfRange {
                token: token.to_u64().unwrap_or(u64::MAX),
            })?;
            self.buf.push(value);
        }
        Ok(())
    }

    fn flush_shard(
        &mut self,
        split: &str,
    ) -> BpeResult<()> {
        let path = self.shard_path(split);

        let mut bytes = Vec::with_capacity(self.buf.len() * 2);
        for &value in &self.buf {
            bytes.extend_from_slice(&value.to_le_bytes());
        }
        fs::write(&path, bytes)?;

        log::info!(
            "Wrote shard {} ({} tokens)",
            path.display(),
            self.buf.len()
        );

        self.buf.clear();
        self.shard_index += 1;
        Ok(())
    }

    /// Append one document's tokens, spilling full shards to disk.
    pub fn write_doc<T: TokenType>(
        &mut self,
        tokens: &[T],
    ) -> BpeResult<()> {
        let mut rest = tokens;
        while self.buf.len() + rest.len() >= self.shard_size {
            let fit = self.shard_size - self.buf.len();
            self.push_tokens(&rest[..fit])?;
            rest = &rest[fit..];
            self.flush_shard(TRAIN_SPLIT)?;
        }
        self.push_tokens(rest)
    }

    /// Drain a stream of per-document token arrays into the writer.
    pub fn write_stream<T, I>(
        &mut self,
        stream: I,
    ) -> BpeResult<()>
    where
        T: TokenType,
        I: IntoIterator<Item = BpeResult<Vec<T>>>,
    {
        for tokens in stream {
            self.write_doc(&tokens?)?;
        }
        Ok(())
    }

    /// Flush the trailing shard, if any, and consume the writer.
    ///
    /// The trailing shard is `val` unless it is the first shard.
    pub fn finish(mut self) -> BpeResult<()> {
        if !self.buf.is_empty() {
            let split = if self.shard_index == 0 {
                TRAIN_SPLIT
            } else {
                VAL_SPLIT
            };
            self.flush_shard(split)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_shard_path_naming() {
        let dir = tempdir::TempDir::new("bpekit_shards").unwrap();
        let writer = ShardWriter::create(dir.path(), 16, 3).unwrap();

        assert_eq!(
            writer.shard_path("train"),
            dir.path().join("3_train_000000.bin"),
        );
    }

    #[test]
    fn test_zero_shard_size_rejected() {
        let dir = tempdir::TempDir::new("bpekit_shards").unwrap();
        assert!(ShardWriter::create(dir.path(), 0, 0).is_err());
    }

    #[test]
    fn test_token_out_of_range() {
        let dir = tempdir::TempDir::new("bpekit_shards").unwrap();
        let mut writer = ShardWriter::create(dir.path(), 16, 0).unwrap();

        let err = writer.write_doc(&[70_000u32]).unwrap_err();
        assert!(matches!(err, BpekitError::TokenOutOfRange { token: 70_000 }));
    }

    #[test]
    fn test_single_short_shard_is_train() {
        let dir = tempdir::TempDir::new("bpekit_shards").unwrap();
        let mut writer = ShardWriter::create(dir.path(), 16, 0).unwrap();

        writer.write_doc(&[1u16, 2, 3]).unwrap();
        writer.finish().unwrap();

        let names = shard_names(dir.path());
        assert_eq!(names, vec!["0_train_000000.bin"]);
        assert_eq!(read_shard(&dir.path().join("0_train_000000.bin")), vec![1, 2, 3]);
    }

    fn shard_names(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    fn read_shard(path: &Path) -> Vec<u16> {
        let bytes = fs::read(path).unwrap();
        assert_eq!(bytes.len() % 2, 0);
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_le_bytes([c[0], c[1]]))
            .collect()
    }
}
