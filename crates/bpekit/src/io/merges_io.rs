//! # Merge List IO
//!
//! Binary persistence of merge lists. The file layout is a 16-byte header
//! (magic, format version, rule count) followed by one little-endian
//! `(a: u32, b: u32, c: u32)` triple per rule, in training order.

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::errors::{BpeResult, BpekitError};
use crate::merges::MergeList;
use crate::types::{BYTE_VOCAB_SIZE, Pair, TokenType};

/// The merge file magic bytes.
pub const MERGE_FILE_MAGIC: [u8; 8] = *b"BPEKIT\0\0";

/// The merge file format version.
pub const MERGE_FILE_VERSION: u32 = 1;

/// Save a [`MergeList`] to a file.
///
/// Parent directories are created if absent.
pub fn save_merge_list_to_path<T, P>(
    merges: &MergeList<T>,
    path: P,
) -> BpeResult<()>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);
    write_merge_list(merges, &mut writer)?;
    writer.flush()?;
    Ok(())
}

/// Write a [`MergeList`] to a [`Write`] stream.
pub fn write_merge_list<T, W>(
    merges: &MergeList<T>,
    writer: &mut W,
) -> BpeResult<()>
where
    T: TokenType,
    W: Write,
{
    writer.write_all(&MERGE_FILE_MAGIC)?;
    writer.write_all(&MERGE_FILE_VERSION.to_le_bytes())?;
    writer.write_all(&(merges.len() as u32).to_le_bytes())?;

    for (pair, token) in merges.iter() {
        for value in [pair.0, pair.1, token] {
            let value = value
                .to_u32()
                .ok_or(BpekitError::TokenOutOfRange {
                    token: value.to_u64().unwrap_or(u64::MAX),
                })?;
            writer.write_all(&value.to_le_bytes())?;
        }
    }

    Ok(())
}

/// Load a [`MergeList`] from a file.
pub fn load_merge_list_from_path<T, P>(path: P) -> BpeResult<MergeList<T>>
where
    T: TokenType,
    P: AsRef<Path>,
{
    let file = File::open(path)?;
    read_merge_list(BufReader::new(file))
}

/// Read a [`MergeList`] from a [`Read`] stream.
///
/// Rejects a bad magic or version, truncation, trailing bytes, and any
/// rule violating the merge invariants (`c == 256 + index`, parents
/// resolvable to bytes or earlier rules).
pub fn read_merge_list<T, R>(mut reader: R) -> BpeResult<MergeList<T>>
where
    T: TokenType,
    R: Read,
{
    let malformed = |msg: String| BpekitError::MalformedMergeFile(msg);

    let mut header = [0u8; 16];
    reader
        .read_exact(&mut header)
        .map_err(|_| malformed("truncated header".to_string()))?;

    if header[..8] != MERGE_FILE_MAGIC {
        return Err(malformed(format!("bad magic {:02x?}", &header[..8])));
    }

    let version = u32::from_le_bytes(header[8..12].try_into().unwrap());
    if version != MERGE_FILE_VERSION {
        return Err(malformed(format!("unsupported format version {version}")));
    }

    let count = u32::from_le_bytes(header[12..16].try_into().unwrap()) as usize;

    let mut rules: Vec<Pair<T>> = Vec::with_capacity(count);
    let mut triple = [0u8; 12];
    for i in 0..count {
        reader
            .read_exact(&mut triple)
            .map_err(|_| malformed(format!("truncated at rule {i}")))?;

        let a = u32::from_le_bytes(triple[0..4].try_into().unwrap());
        let b = u32::from_le_bytes(triple[4..8].try_into().unwrap());
        let c = u32::from_le_bytes(triple[8..12].try_into().unwrap());

        if c as usize != BYTE_VOCAB_SIZE + i {
            return Err(malformed(format!(
                "rule {i}: expected merged token {}, found {c}",
                BYTE_VOCAB_SIZE + i
            )));
        }

        let token_of = |value: u32| {
            T::from_u32(value).ok_or(BpekitError::TokenOutOfRange {
                token: value as u64,
            })
        };
        rules.push((token_of(a)?, token_of(b)?));
    }

    let mut trailer = [0u8; 1];
    if reader.read(&mut trailer)? != 0 {
        return Err(malformed("trailing bytes after last rule".to_string()));
    }

    MergeList::from_rules(rules)
}
