//! # Pair Expansion Decoder

use crate::errors::{BpeResult, BpekitError};
use crate::merges::MergeList;
use crate::types::{BYTE_VOCAB_SIZE, TokenType};

/// Decode tokens back into raw bytes.
///
/// Each merged token expands (depth-first, via an explicit stack) into the
/// pair that produced it, bottoming out at raw byte ids; the result is the
/// same byte sequence that replaying the rules in reverse would give.
///
/// ## Arguments
/// * `merges` - the trained merge list.
/// * `tokens` - the tokens to decode.
///
/// ## Returns
/// The recovered bytes, or [`BpekitError::TokenOutOfRange`] for a token
/// beyond the vocabulary.
pub fn try_decode_bytes<T: TokenType>(
    merges: &MergeList<T>,
    tokens: &[T],
) -> BpeResult<Vec<u8>> {
    let mut buf: Vec<u8> = Vec::with_capacity(tokens.len() * 2);
    let mut stack: Vec<T> = Vec::new();

    for &token in tokens {
        stack.push(token);
        while let Some(t) = stack.pop() {
            match t.to_usize() {
                Some(v) if v < BYTE_VOCAB_SIZE => buf.push(v as u8),
                _ => {
                    let (a, b) = merges.pair_for_token(t).ok_or_else(|| {
                        BpekitError::TokenOutOfRange {
                            token: t.to_u64().unwrap_or(u64::MAX),
                        }
                    })?;
                    stack.push(b);
                    stack.push(a);
                }
            }
        }
    }

    Ok(buf)
}

/// Decode tokens into text.
///
/// Invalid UTF-8 in the recovered bytes is replaced with U+FFFD; it is
/// never a hard error.
pub fn decode_text<T: TokenType>(
    merges: &MergeList<T>,
    tokens: &[T],
) -> BpeResult<String> {
    let bytes = try_decode_bytes(merges, tokens)?;
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;

    type T = u32;

    fn merges() -> MergeList<T> {
        // 256 = "aa", 257 = "ab", 258 = "aaab"
        MergeList::from_rules(vec![(97, 97), (97, 98), (256, 257)]).unwrap()
    }

    #[test]
    fn test_decode_bytes() {
        let merges = merges();

        assert_eq!(try_decode_bytes(&merges, &[97, 98]).unwrap(), b"ab");
        assert_eq!(try_decode_bytes(&merges, &[256]).unwrap(), b"aa");
        assert_eq!(try_decode_bytes(&merges, &[258]).unwrap(), b"aaab");
        assert_eq!(
            try_decode_bytes(&merges, &[258, 100, 258, 97, 99]).unwrap(),
            b"aaabdaaabac",
        );
    }

    #[test]
    fn test_decode_text() {
        let merges = merges();
        assert_eq!(decode_text(&merges, &[258, 99]).unwrap(), "aaabc");
    }

    #[test]
    fn test_decode_out_of_range() {
        let merges = merges();
        assert!(matches!(
            try_decode_bytes(&merges, &[259]).unwrap_err(),
            BpekitError::TokenOutOfRange { token: 259 },
        ));
    }

    #[test]
    fn test_decode_invalid_utf8_replaces() {
        let merges = MergeList::<T>::from_rules(vec![]).unwrap();

        // 0xFF is never valid UTF-8.
        let text = decode_text(&merges, &[0xFF, 97]).unwrap();
        assert_eq!(text, "\u{FFFD}a");
    }
}
