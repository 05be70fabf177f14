//! Shorts Maker CLI: assemble images into a short video via the render service.
//!
//! Usage:
//!   shorts generate <IMAGES>... [OPTIONS]   Submit and download the video
//!   shorts plan <IMAGES>... [OPTIONS]       Print the request without sending it
//!   shorts fonts                            List the fonts the service accepts

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use shorts_common::config::AppConfig;
use shorts_common::logging::{init_logging, level_for_verbosity};

mod commands;

use commands::InputArgs;

#[derive(Parser)]
#[command(
    name = "shorts",
    about = "Turn a handful of images into a captioned short video",
    version,
    author
)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a composition and download the generated video
    Generate {
        #[command(flatten)]
        input: InputArgs,

        /// Render service endpoint (overrides config)
        #[arg(long)]
        endpoint: Option<String>,

        /// Request timeout in seconds (overrides config)
        #[arg(long)]
        timeout: Option<u64>,

        /// Directory to save the video in (overrides config)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Only print the video URL, do not download it
        #[arg(long)]
        no_download: bool,
    },

    /// Assemble the request and print its fields without sending it
    Plan {
        #[command(flatten)]
        input: InputArgs,
    },

    /// List font identifiers accepted by the render service
    Fonts,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = AppConfig::load();
    if cli.verbose {
        config.logging.level = level_for_verbosity(true).to_string();
    }
    init_logging(&config.logging)?;

    match cli.command {
        Commands::Generate {
            input,
            endpoint,
            timeout,
            output,
            no_download,
        } => {
            if let Some(endpoint) = endpoint {
                config.service.endpoint = endpoint;
            }
            if timeout.is_some() {
                config.service.timeout_secs = timeout;
            }
            if let Some(output) = output {
                config.download_dir = output;
            }
            commands::generate::run(input, &config, !no_download).await
        }
        Commands::Plan { input } => commands::plan::run(input, &config),
        Commands::Fonts => commands::fonts::run(&config),
    }
}
