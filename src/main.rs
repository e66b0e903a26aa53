use anyhow::{Context, Result};
use clap::Parser;

use tabsift::app::{self, Cli};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        tracing::Level::INFO
    } else {
        tracing::Level::WARN
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::builder()
                .with_default_directive(level.into())
                .from_env_lossy(),
        )
        .with_writer(std::io::stderr)
        .init();

    if let Some(threads) = cli.threads {
        rayon::ThreadPoolBuilder::new()
            .num_threads(threads)
            .build_global()
            .context("CLI: Failed to initialize thread pool")?;
    }

    let start = std::time::Instant::now();
    let shown = app::run(&cli)?;

    tracing::info!(
        "Done! {} rows shown in {:.2}s",
        shown,
        start.elapsed().as_secs_f64()
    );

    Ok(())
}
