//! # Merge Trainer

use core::marker::PhantomData;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::errors::{BpeResult, BpekitError};
use crate::merges::MergeList;
use crate::training::pair_index::PairIndex;
use crate::types::{BYTE_VOCAB_SIZE, CountType, TokenType};

/// A cooperative cancellation signal for long-running training.
///
/// Cancellation is observed at merge boundaries; the trainer then returns
/// the partial merge list collected so far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    /// Create a new, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Has cancellation been requested?
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Options for [`Trainer`].
#[derive(Debug, Clone)]
pub struct TrainerOptions {
    /// The target vocabulary size; must be > 256.
    pub vocab_size: usize,

    /// Optional cooperative cancellation signal.
    pub cancel: Option<CancelToken>,
}

impl TrainerOptions {
    /// Create new options.
    ///
    /// ## Arguments
    /// * `vocab_size` - The target vocabulary size.
    pub fn new(vocab_size: usize) -> Self {
        Self {
            vocab_size,
            cancel: None,
        }
    }

    /// Sets the vocab size.
    pub fn with_vocab_size(
        self,
        vocab_size: usize,
    ) -> Self {
        Self { vocab_size, ..self }
    }

    /// Attaches a cancellation token.
    pub fn with_cancel_token(
        self,
        cancel: CancelToken,
    ) -> Self {
        Self {
            cancel: Some(cancel),
            ..self
        }
    }

    /// Initializes a [`Trainer`] from these options.
    pub fn init<C: CountType>(self) -> Trainer<C> {
        Trainer::new(self)
    }
}

/// The result of a training run.
#[derive(Debug, Clone)]
pub struct TrainOutcome<T: TokenType> {
    /// The learned merge rules, in order.
    pub merges: MergeList<T>,

    /// Whether the full `vocab_size - 256` rules were learned.
    ///
    /// `false` when the corpus ran out of repeated pairs, or when training
    /// was cancelled; the effective vocabulary is `256 + merges.len()`.
    pub reached_target: bool,
}

/// Trainer for learning ordered pair merges over byte blocks.
///
/// # Parameters
/// * `C` - the type used for pair occurrence counts.
pub struct Trainer<C = u64>
where
    C: CountType,
{
    /// Trainer options.
    pub options: TrainerOptions,

    _count: PhantomData<C>,
}

impl<C: CountType> Trainer<C> {
    /// Initializes a [`Trainer`].
    pub fn new(options: TrainerOptions) -> Self {
        Self {
            options,
            _count: PhantomData,
        }
    }

    /// Learn the ordered merge list from a sequence of byte blocks.
    ///
    /// The highest-count pair is merged repeatedly until the vocabulary is
    /// full, pairs run out, or every remaining pair occurs only once. Ties
    /// on count break to the smallest pair, which makes the result
    /// deterministic for a fixed corpus.
    ///
    /// ## Arguments
    /// * `blocks` - the pre-tokenized byte blocks.
    ///
    /// ## Returns
    /// The [`TrainOutcome`], or an error for an unusable `vocab_size` or a
    /// corpus with no pairs at all.
    pub fn train<T, B>(
        &self,
        blocks: &[B],
    ) -> BpeResult<TrainOutcome<T>>
    where
        T: TokenType,
        B: AsRef<[u8]> + Sync,
    {
        let vocab_size = self.options.vocab_size;
        if vocab_size <= BYTE_VOCAB_SIZE {
            return Err(BpekitError::InvalidVocabSize { size: vocab_size });
        }
        if T::from_usize(vocab_size - 1).is_none() {
            return Err(BpekitError::VocabSizeOverflow { size: vocab_size });
        }

        let num_merges = vocab_size - BYTE_VOCAB_SIZE;
        log::info!("Starting BPE training: {} merges to compute", num_merges);

        #[cfg(feature = "rayon")]
        let mut index: PairIndex<T, C> = PairIndex::build_parallel(blocks);
        #[cfg(not(feature = "rayon"))]
        let mut index: PairIndex<T, C> = PairIndex::build(blocks);

        if !index.has_pairs() {
            return Err(BpekitError::EmptyCorpus);
        }

        let one = C::one();
        let mut rules = Vec::with_capacity(num_merges);
        let mut last_log_percent = 0;
        let mut cancelled = false;

        while rules.len() < num_merges {
            if let Some(cancel) = &self.options.cancel {
                if cancel.is_cancelled() {
                    log::info!("Training cancelled after {} merges", rules.len());
                    cancelled = true;
                    break;
                }
            }

            let Some((pair, count)) = index.top_pair() else {
                break;
            };
            if count <= one {
                // Merging singleton pairs cannot compress anything.
                break;
            }

            let new_token = T::from_usize(BYTE_VOCAB_SIZE + rules.len())
                .ok_or(BpekitError::VocabSizeOverflow { size: vocab_size })?;

            index.merge(pair, new_token);
            rules.push(pair);

            let current_percent = (rules.len() * 100) / num_merges;
            if current_percent > last_log_percent {
                log::info!(
                    "Progress: {}% ({}/{} merges) - Last merge: {:?} -> {} (frequency: {})",
                    current_percent,
                    rules.len(),
                    num_merges,
                    pair,
                    new_token,
                    count
                );
                last_log_percent = current_percent;
            }
        }

        let reached_target = rules.len() == num_merges;
        if !reached_target && !cancelled {
            log::warn!(
                "Vocab size {} not reached: {} merges available; effective vocab is {}",
                vocab_size,
                rules.len(),
                BYTE_VOCAB_SIZE + rules.len()
            );
        }

        log::info!("Finished training: {} merges completed", rules.len());
        Ok(TrainOutcome {
            merges: MergeList::from_rules(rules)?,
            reached_target,
        })
    }
}
