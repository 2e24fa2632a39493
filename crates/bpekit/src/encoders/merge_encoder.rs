//! # Merge Scan Encoder

use crate::merges::MergeList;
use crate::types::TokenType;

/// Encode one byte block, appending the tokens to an output buffer.
///
/// The output buffer doubles as working memory: the block's raw byte
/// tokens are appended, then the lowest-ranked rule present in the working
/// region is folded repeatedly until no adjacent pair is in the rule
/// table. Each fold replaces every non-overlapping occurrence of the
/// rule's pair, left to right, reproducing exactly the sequence the
/// trainer would have produced for this block.
///
/// ## Arguments
/// * `merges` - the trained merge list.
/// * `block` - the raw bytes of one pre-tokenized block.
/// * `tokens` - the target token buffer.
pub fn append_encoded_block<T: TokenType>(
    merges: &MergeList<T>,
    block: &[u8],
    tokens: &mut Vec<T>,
) {
    let start = tokens.len();
    tokens.extend(block.iter().map(|&b| T::from_u8(b).unwrap()));

    while tokens.len() - start >= 2 {
        // Find the lowest-ranked rule among the adjacent pairs.
        let best = tokens[start..]
            .windows(2)
            .filter_map(|w| merges.rank(&(w[0], w[1])))
            .min();

        let Some((rank, replacement)) = best else {
            break;
        };
        let pair = merges.rules()[rank as usize];

        // Fold every non-overlapping occurrence, left to right.
        let mut read = start;
        let mut write = start;
        while read < tokens.len() {
            if read + 1 < tokens.len() && (tokens[read], tokens[read + 1]) == pair {
                tokens[write] = replacement;
                read += 2;
            } else {
                tokens[write] = tokens[read];
                read += 1;
            }
            write += 1;
        }
        tokens.truncate(write);
    }
}

/// Encode one byte block into a fresh token vector.
///
/// See [`append_encoded_block`].
pub fn encode_block<T: TokenType>(
    merges: &MergeList<T>,
    block: &[u8],
) -> Vec<T> {
    let mut tokens = Vec::with_capacity(block.len());
    append_encoded_block(merges, block, &mut tokens);
    tokens
}
