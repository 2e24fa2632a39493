mod encode;
mod train;

/// Subcommands for bpekit
#[derive(clap::Subcommand, Debug)]
pub enum Commands {
    /// Train and save a new tokenizer.
    Train(train::TrainArgs),

    /// Encode a dataset into token shards with a trained tokenizer.
    Encode(encode::EncodeArgs),
}

impl Commands {
    /// Run the subcommand.
    pub fn run(&self) -> Result<(), Box<dyn std::error::Error>> {
        match self {
            Commands::Train(cmd) => cmd.run(),
            Commands::Encode(cmd) => cmd.run(),
        }
    }
}
