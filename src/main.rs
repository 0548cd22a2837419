use anyhow::Result;
use clap::Parser;
use mimalloc::MiMalloc;
use quant_oracle::{cli, pipeline};
use tracing_subscriber::EnvFilter;

#[global_allocator]
static GLOBAL: MiMalloc = MiMalloc;

fn main() -> Result<()> {
    let args = cli::Args::parse();

    // Initialize tracing subscriber
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| {
            if args.quiet {
                EnvFilter::new("warn")
            } else {
                EnvFilter::new("info")
            }
        });
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let stats = pipeline::run(&args)?;
    tracing::info!(
        reference_transcripts = stats.reference_transcripts,
        truth_rows = stats.truth_rows,
        methods = stats.methods,
        oracle_warnings = stats.oracle_warnings,
        comparison_rows = stats.comparison_rows,
        "quant-oracle: comparison complete"
    );
    Ok(())
}
