use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use clef_corpus::LoadOptions;

/// Load a CLEF image-annotation corpus and report what it contains.
#[derive(Debug, Parser)]
#[command(name = "clef-corpus", version, about)]
struct Cli {
    /// Corpus root directory.
    root: PathBuf,

    /// Only load the first two categories.
    #[arg(long)]
    sample: bool,

    /// JSON file with load options (layout overrides).
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Print the summary as JSON.
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let cli = Cli::parse();

    let mut options = match &cli.config {
        Some(path) => LoadOptions::from_json_file(path)?,
        None => LoadOptions::default(),
    };
    if cli.sample {
        options.full_scan = false;
    }

    let corpus = clef_corpus::load(&cli.root, &options)
        .with_context(|| format!("loading corpus at {}", cli.root.display()))?;
    let summary = corpus.summary();

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{summary}");
    }
    Ok(())
}
