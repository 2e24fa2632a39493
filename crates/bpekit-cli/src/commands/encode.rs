use std::path::PathBuf;

use bpekit::Tokenizer;
use bpekit_data::{ShardWriter, TextDataset, rank_and_world_size};

use crate::logging::LogArgs;

/// Args for the encode command.
#[derive(clap::Args, Debug)]
pub struct EncodeArgs {
    /// Path to the dataset: a .txt file or a directory containing one.
    path: PathBuf,

    /// Path to tokenizer merges.
    merges_path: PathBuf,

    /// Path to save encoded token shards to.
    #[arg(long, default_value = "tokens/")]
    tokens_path: PathBuf,

    /// Number of tokens per shard.
    #[arg(short, long, default_value_t = 100_000_000)]
    shard_size: usize,

    /// Number of documents to encode per parallel batch.
    #[arg(short, long, default_value_t = 16)]
    batch_size: usize,

    /// Number of dataset entries to encode.
    #[arg(short, long)]
    ndocs: Option<usize>,

    #[clap(flatten)]
    pub logging: LogArgs,
}

impl EncodeArgs {
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        self.logging.setup_logging(3)?;

        if !self.merges_path.exists() {
            return Err(format!(
                "no tokenizer found at {}; train one first",
                self.merges_path.display()
            )
            .into());
        }
        if self.tokens_path.exists() {
            return Err(format!(
                "a directory named {} already exists; have you already encoded this dataset?",
                self.tokens_path.display()
            )
            .into());
        }

        let (rank, world_size) = rank_and_world_size();

        let dataset = TextDataset::load(&self.path)?
            .limit(self.ndocs)
            .split_by_node(rank, world_size);
        log::info!("Rank {rank}: encoding {} documents", dataset.len());

        // Shards carry 16-bit ids; loading at u16 enforces the bound.
        let tokenizer: Tokenizer<u16> = Tokenizer::load(&self.merges_path)?;

        let mut writer = ShardWriter::create(&self.tokens_path, self.shard_size, rank)?;
        for batch in dataset.docs().chunks(self.batch_size.max(1)) {
            for tokens in tokenizer.par_encode_batch(batch)? {
                writer.write_doc(&tokens)?;
            }
        }
        writer.finish()?;

        log::info!(
            "Dataset encoded and saved to {}",
            self.tokens_path.display()
        );
        Ok(())
    }
}
