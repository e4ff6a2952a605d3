//! huemill - distributed yellow-suppression image recolor

use anyhow::{Context, Result};
use clap::Parser;
use huemill_pipeline::Outcome;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "huemill")]
#[command(author, version, about = "Distributed yellow-suppression image recolor")]
#[command(long_about = "
Recolors an image by suppressing the blue channel of yellow-range pixels.
The buffer is split into near-equal pixel-aligned chunks across a fixed
group of cooperating workers; each transforms its own chunk in place, and
the result is reassembled on a single coordinator for output.

Examples:
  huemill photo.png out.png          # one worker per CPU core
  huemill photo.jpg out.jpg -j 4     # fixed group of 4
  huemill -v photo.png out.png       # with progress logging
")]
struct Cli {
    /// Input image (png, jpg)
    input: PathBuf,

    /// Output image
    output: PathBuf,

    /// Number of worker participants (0 = one per CPU core)
    #[arg(short = 'j', long, default_value = "0")]
    jobs: usize,

    /// Verbose logging (repeat for more detail)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Log errors only
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

fn init_tracing(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);

    let outcome = huemill_pipeline::run(&cli.input, &cli.output, cli.jobs)
        .with_context(|| format!("failed to recolor {}", cli.input.display()))?;

    if cli.verbose > 0 {
        if let Outcome::Written { bytes } = outcome {
            println!(
                "{} -> {} ({} pixel bytes)",
                cli.input.display(),
                cli.output.display(),
                bytes
            );
        }
    }
    Ok(())
}
