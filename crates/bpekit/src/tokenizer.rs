//! # Tokenizer Façade

use std::path::Path;

use crate::decoders;
use crate::encoders::append_encoded_block;
use crate::errors::BpeResult;
use crate::io::{load_merge_list_from_path, save_merge_list_to_path};
use crate::merges::MergeList;
use crate::spanning::{BlockSpanner, SplitPattern};
use crate::training::{CancelToken, Trainer, TrainerOptions};
use crate::types::TokenType;

/// Options for building a [`Tokenizer`] by training.
#[derive(Debug, Clone)]
pub struct TokenizerOptions {
    /// The block split pattern.
    pub pattern: SplitPattern,

    /// The target vocabulary size; must be > 256.
    pub vocab_size: usize,

    /// The process rank, used only for shard-file naming downstream.
    pub rank: usize,

    /// Optional cooperative cancellation signal for training.
    pub cancel: Option<CancelToken>,
}

impl TokenizerOptions {
    /// Create new options with the default split pattern.
    ///
    /// ## Arguments
    /// * `vocab_size` - The target vocabulary size.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            pattern: SplitPattern::default(),
            vocab_size,
            rank: 0,
            cancel: None,
        }
    }

    /// Sets the block split pattern.
    pub fn with_pattern<P: Into<SplitPattern>>(
        self,
        pattern: P,
    ) -> Self {
        Self {
            pattern: pattern.into(),
            ..self
        }
    }

    /// Sets the process rank.
    pub fn with_rank(
        self,
        rank: usize,
    ) -> Self {
        Self { rank, ..self }
    }

    /// Attaches a cancellation token for training.
    pub fn with_cancel_token(
        self,
        cancel: CancelToken,
    ) -> Self {
        Self {
            cancel: Some(cancel),
            ..self
        }
    }
}

/// A trained BPE tokenizer.
///
/// Owns the immutable merge list and the compiled block spanner; encoding
/// and decoding are read-only and safe to share across threads.
#[derive(Debug, Clone)]
pub struct Tokenizer<T: TokenType> {
    /// The ordered merge rules.
    merges: MergeList<T>,

    /// The compiled pre-tokenizer.
    spanner: BlockSpanner,

    /// The process rank tag, used only for shard-file naming.
    rank: usize,
}

impl<T: TokenType> Tokenizer<T> {
    /// Build a tokenizer around an existing merge list.
    pub fn from_merges<P: Into<SplitPattern>>(
        merges: MergeList<T>,
        pattern: P,
        rank: usize,
    ) -> BpeResult<Self> {
        Ok(Self {
            merges,
            spanner: BlockSpanner::from_pattern(pattern)?,
            rank,
        })
    }

    /// Train a tokenizer from pre-tokenized byte blocks.
    ///
    /// If the corpus runs out of repeated pairs before the target
    /// vocabulary is reached, the partial merge list is kept and a warning
    /// is logged; [`Self::vocab_size`] reports the effective size.
    pub fn train_from_blocks<B>(
        blocks: &[B],
        options: TokenizerOptions,
    ) -> BpeResult<Self>
    where
        B: AsRef<[u8]> + Sync,
    {
        let mut trainer_options = TrainerOptions::new(options.vocab_size);
        if let Some(cancel) = options.cancel.clone() {
            trainer_options = trainer_options.with_cancel_token(cancel);
        }

        let trainer: Trainer = trainer_options.init();
        let outcome = trainer.train::<T, B>(blocks)?;

        Self::from_merges(outcome.merges, options.pattern, options.rank)
    }

    /// Train a tokenizer from raw documents.
    ///
    /// Each document is pre-tokenized with the configured pattern; merges
    /// never cross block boundaries.
    pub fn train_from_texts<I>(
        texts: I,
        options: TokenizerOptions,
    ) -> BpeResult<Self>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        let spanner = BlockSpanner::from_pattern(options.pattern.clone())?;

        let mut blocks: Vec<Vec<u8>> = Vec::new();
        for text in texts {
            for block in spanner.split_blocks(text.as_ref())? {
                blocks.push(block.to_vec());
            }
        }

        Self::train_from_blocks(&blocks, options)
    }

    /// Encode one text into token ids.
    pub fn encode_text(
        &self,
        text: &str,
    ) -> BpeResult<Vec<T>> {
        let mut tokens = Vec::with_capacity(text.len() / 2 + 1);
        for block in self.spanner.split_blocks(text)? {
            append_encoded_block(&self.merges, block, &mut tokens);
        }
        Ok(tokens)
    }

    /// Encode a batch of texts serially.
    pub fn encode_batch<S: AsRef<str>>(
        &self,
        batch: &[S],
    ) -> BpeResult<Vec<Vec<T>>> {
        batch.iter().map(|s| self.encode_text(s.as_ref())).collect()
    }

    /// Encode a batch of texts in parallel.
    ///
    /// Encoding is pure over the merge list, so documents parallelize
    /// freely; outputs stay in input order.
    #[cfg(feature = "rayon")]
    pub fn par_encode_batch<S>(
        &self,
        batch: &[S],
    ) -> BpeResult<Vec<Vec<T>>>
    where
        S: AsRef<str> + Sync,
    {
        use rayon::prelude::*;

        batch
            .par_iter()
            .map(|s| self.encode_text(s.as_ref()))
            .collect()
    }

    /// Lazily encode a stream of documents.
    ///
    /// Yields one token vector per document, in order; intended to feed a
    /// shard writer without holding the whole corpus in memory.
    pub fn encode_stream<'a, I>(
        &'a self,
        documents: I,
    ) -> impl Iterator<Item = BpeResult<Vec<T>>> + 'a
    where
        I: IntoIterator + 'a,
        I::IntoIter: 'a,
        I::Item: AsRef<str>,
    {
        documents
            .into_iter()
            .map(move |doc| self.encode_text(doc.as_ref()))
    }

    /// Decode tokens back into raw bytes.
    pub fn try_decode_bytes(
        &self,
        tokens: &[T],
    ) -> BpeResult<Vec<u8>> {
        decoders::try_decode_bytes(&self.merges, tokens)
    }

    /// Decode tokens into text, replacing invalid UTF-8 with U+FFFD.
    pub fn decode(
        &self,
        tokens: &[T],
    ) -> BpeResult<String> {
        decoders::decode_text(&self.merges, tokens)
    }

    /// Save the merge list to a file.
    pub fn save<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> BpeResult<()> {
        save_merge_list_to_path(&self.merges, path)
    }

    /// Load a tokenizer from a merge file, with the default pattern and
    /// rank 0.
    pub fn load<P: AsRef<Path>>(path: P) -> BpeResult<Self> {
        Self::load_with(path, SplitPattern::default(), 0)
    }

    /// Load a tokenizer from a merge file.
    pub fn load_with<P, S>(
        path: P,
        pattern: S,
        rank: usize,
    ) -> BpeResult<Self>
    where
        P: AsRef<Path>,
        S: Into<SplitPattern>,
    {
        Self::from_merges(load_merge_list_from_path(path)?, pattern, rank)
    }

    /// The merge list.
    pub fn merges(&self) -> &MergeList<T> {
        &self.merges
    }

    /// The effective vocabulary size: `256 + merges.len()`.
    pub fn vocab_size(&self) -> usize {
        self.merges.vocab_size()
    }

    /// The process rank tag.
    pub fn rank(&self) -> usize {
        self.rank
    }

    /// The split pattern source string.
    pub fn pattern_str(&self) -> &str {
        self.spanner.pattern_str()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{check_is_send, check_is_sync};

    type T = u32;

    const SAMPLES: &[&str] = &[
        "hello world",
        "hello san francisco",
        "it's not the heat, it's the salt",
    ];

    fn train_samples(vocab_size: usize) -> Tokenizer<T> {
        Tokenizer::train_from_texts(SAMPLES, TokenizerOptions::new(vocab_size)).unwrap()
    }

    #[test]
    fn test_tokenizer_options() {
        let options = TokenizerOptions::new(1000);
        assert_eq!(options.vocab_size, 1000);
        assert_eq!(options.rank, 0);

        let options = options.with_pattern(r"\S+").with_rank(3);
        assert_eq!(options.pattern, r"\S+".into());
        assert_eq!(options.rank, 3);
    }

    #[test]
    fn test_train_encode_decode() {
        let tokenizer = train_samples(300);
        check_is_send(&tokenizer);
        check_is_sync(&tokenizer);

        for sample in SAMPLES {
            let tokens = tokenizer.encode_text(sample).unwrap();
            assert!(!tokens.is_empty());
            assert_eq!(tokenizer.decode(&tokens).unwrap(), *sample);
        }
    }

    #[test]
    fn test_roundtrip_awkward_whitespace() {
        let tokenizer = train_samples(280);

        for text in ["trailing ", "  double", "a  b   c ", "\t tabs\t", ""] {
            let tokens = tokenizer.encode_text(text).unwrap();
            assert_eq!(tokenizer.decode(&tokens).unwrap(), text, "{text:?}");
        }
    }

    #[test]
    fn test_encoding_is_idempotent() {
        let tokenizer = train_samples(300);

        for sample in SAMPLES {
            let tokens = tokenizer.encode_text(sample).unwrap();
            let decoded = tokenizer.decode(&tokens).unwrap();
            assert_eq!(tokenizer.encode_text(&decoded).unwrap(), tokens);
        }
    }

    #[test]
    fn test_encode_batch_matches_single() {
        let tokenizer = train_samples(300);

        let batch = tokenizer.encode_batch(SAMPLES).unwrap();
        assert_eq!(batch.len(), SAMPLES.len());
        for (sample, tokens) in SAMPLES.iter().zip(&batch) {
            assert_eq!(&tokenizer.encode_text(sample).unwrap(), tokens);
        }

        #[cfg(feature = "rayon")]
        assert_eq!(tokenizer.par_encode_batch(SAMPLES).unwrap(), batch);
    }

    #[test]
    fn test_encode_stream() {
        let tokenizer = train_samples(300);

        let streamed: Vec<Vec<T>> = tokenizer
            .encode_stream(SAMPLES.iter())
            .collect::<BpeResult<_>>()
            .unwrap();

        assert_eq!(streamed, tokenizer.encode_batch(SAMPLES).unwrap());
    }

    #[test]
    fn test_partial_vocab_is_usable() {
        // A tiny corpus cannot fill vocab 500; the tokenizer still works.
        let tokenizer =
            Tokenizer::<T>::train_from_texts(["abab abab"], TokenizerOptions::new(500))
                .unwrap();

        assert!(tokenizer.vocab_size() < 500);
        let tokens = tokenizer.encode_text("abab abab").unwrap();
        assert_eq!(tokenizer.decode(&tokens).unwrap(), "abab abab");
    }

    #[test]
    fn test_rank_tag() {
        let tokenizer = Tokenizer::<T>::train_from_texts(
            SAMPLES,
            TokenizerOptions::new(300).with_rank(2),
        )
        .unwrap();
        assert_eq!(tokenizer.rank(), 2);
    }
}
