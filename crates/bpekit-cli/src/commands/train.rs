use std::path::PathBuf;

use bpekit::{Tokenizer, TokenizerOptions};
use bpekit_data::{TextDataset, rank_and_world_size};

use crate::logging::LogArgs;

/// Args for the train command.
#[derive(clap::Args, Debug)]
pub struct TrainArgs {
    /// Path to the dataset: a .txt file or a directory containing one.
    path: PathBuf,

    /// Vocabulary size (must be > 256).
    vocab_size: usize,

    /// Path to save merges to.
    #[arg(short, long, default_value = "tokenizers/tokenizer.bin")]
    merges_path: PathBuf,

    /// Number of dataset entries to train with.
    #[arg(short, long)]
    ndocs: Option<usize>,

    /// Block split regex; defaults to the built-in pattern.
    #[arg(long)]
    pattern: Option<String>,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl TrainArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        if self.merges_path.exists() {
            return Err(format!(
                "a tokenizer already exists at {}; have you trained this tokenizer already?",
                self.merges_path.display()
            )
            .into());
        }

        let (rank, world_size) = rank_and_world_size();
        if world_size > 1 {
            log::info!("Rank {rank} of {world_size} ready to train");
        }

        let dataset = TextDataset::load(&self.path)?
            .limit(self.ndocs)
            .split_by_node(rank, world_size);
        log::info!("Training on {} documents", dataset.len());

        let mut options = TokenizerOptions::new(self.vocab_size).with_rank(rank);
        if let Some(pattern) = &self.pattern {
            options = options.with_pattern(pattern);
        }

        let tokenizer: Tokenizer<u32> = Tokenizer::train_from_texts(dataset.docs(), options)?;
        log::info!("Vocabulary size: {}", tokenizer.vocab_size());

        // Only the root rank persists the merges.
        if rank == 0 {
            tokenizer.save(&self.merges_path)?;
            log::info!("Saved merges to {}", self.merges_path.display());
        }

        Ok(())
    }
}
