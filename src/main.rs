//! iuranweb main entry point

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use clap::Parser;
use iuranweb_api::{start_server, AppState};
use iuranweb_config::Config;
use iuranweb_core::{HttpImageSource, ResidentDirectory};
use tokio::runtime::Runtime;

#[derive(Parser, Debug)]
#[command(name = "iuranweb")]
#[command(version = "0.1.0")]
#[command(about = "Residents' dues list with QRIS payment codes", long_about = None)]
struct Args {
    /// Configuration file path
    #[arg(short, long, default_value = "config.yaml")]
    config: PathBuf,

    /// Print the default configuration and exit
    #[arg(long)]
    print_default_config: bool,
}

/// Configured level, unless RUST_LOG says otherwise
fn init_logging(level: &str) {
    let mut builder = env_logger::Builder::new();
    builder.parse_filters(level);
    if let Ok(spec) = std::env::var("RUST_LOG") {
        builder.parse_filters(&spec);
    }
    builder.init();
}

async fn run(args: Args) -> anyhow::Result<()> {
    let config = match Config::load_async(&args.config).await {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e).with_context(|| format!("loading {}", args.config.display()));
        }
    };
    init_logging(&config.logging.level);
    log::info!("Config loaded from {}", args.config.display());

    let residents_file = &config.data.residents_file;
    let directory = match ResidentDirectory::load(residents_file).await {
        Ok(directory) => directory,
        Err(e) => {
            eprintln!("{}", e.to_details());
            return Err(e)
                .with_context(|| format!("loading residents from {}", residents_file.display()));
        }
    };

    let source = HttpImageSource::new(Duration::from_secs(config.export.fetch_timeout_secs))
        .context("building HTTP client")?;
    log::debug!("Exports go to {}", config.export.directory.display());

    let state = AppState::new(config, directory, Arc::new(source));
    start_server(state).await.context("server error")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    if args.print_default_config {
        print!("{}", Config::generate_default());
        return Ok(());
    }

    let rt = Runtime::new()?;
    rt.block_on(run(args))
}
