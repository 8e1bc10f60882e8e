use std::sync::Arc;

use clap::Parser;
use error::AppError;
use hlshash_engine::{ConvertEvent, OnEvent};
use indicatif::MultiProgress;
use tracing::{Level, error, info};
use tracing_subscriber::FmtSubscriber;
use tracing_subscriber::fmt::writer::{BoxMakeWriter, MakeWriterExt};

mod cli;
mod commands;
mod config;
mod error;
mod output;
mod utils;

use cli::{CliArgs, Command};
use utils::progress::ProgressManager;

fn main() {
    if let Err(e) = bootstrap() {
        eprintln!("Error: {e}");
        // Log the full error for debugging
        error!(error = ?e, "Application failed");
        std::process::exit(1);
    }
}

fn init_logging(args: &CliArgs) -> Result<(), AppError> {
    let log_level = if args.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };

    // Logs go to stderr so stdout only carries the resulting paths
    let writer = match &args.log_file {
        Some(path) => {
            let log_file = std::fs::OpenOptions::new()
                .create(true)
                .write(true)
                .truncate(true)
                .open(path)?;
            BoxMakeWriter::new(MakeWriterExt::and(std::io::stderr, log_file))
        }
        None => BoxMakeWriter::new(std::io::stderr),
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_writer(writer)
        .with_ansi(args.log_file.is_none())
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .map_err(|e| AppError::Initialization(e.to_string()))
}

#[tokio::main]
async fn bootstrap() -> Result<(), AppError> {
    // Parse command-line arguments
    let args = CliArgs::parse();
    init_logging(&args)?;

    info!("hlshash {} - content-addressed HLS playlists", env!("CARGO_PKG_VERSION"));

    // Create a progress manager based on show_progress flag
    let multi = MultiProgress::new();
    let progress_manager = if args.show_progress {
        ProgressManager::new(multi.clone())
    } else {
        ProgressManager::new_disabled(multi.clone())
    };
    let on_event: OnEvent = Arc::new(move |event: ConvertEvent| progress_manager.handle_event(event));

    match args.command {
        Command::Convert {
            input,
            output,
            network,
        } => {
            let config = config::converter_config(&network)?;
            let hash = commands::run_convert(&input, &output, config, Some(on_event)).await?;
            info!("Converted {} (root {})", input, hash);
        }
        Command::Upload {
            input,
            server,
            network,
        } => {
            let (config, upload_headers) = config::upload_config(&network)?;
            commands::run_upload(&input, &server, config, upload_headers, Some(on_event)).await?;
        }
        Command::Encode {
            input,
            output,
            ffmpeg,
        } => {
            let master = commands::encode_hls(&ffmpeg, &input, &output).await?;
            println!("{}", master.display());
        }
    }

    Ok(())
}
