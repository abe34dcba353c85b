use aiko::core::config::{self, CliOverrides};
use aiko::tui;
use clap::Parser;
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "aiko", about = "Chat with Aiko, an OpenRouter-powered assistant")]
struct Args {
    /// Model id to request (overrides config and AIKO_MODEL)
    #[arg(short, long)]
    model: Option<String>,

    /// Per-request timeout in seconds
    #[arg(short, long)]
    timeout: Option<u64>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // Initialize file logger - writes to aiko.log in current directory
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("aiko.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().map_err(|e| {
        log::error!("Failed to load config: {}", e);
        std::io::Error::other(e.to_string())
    })?;
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            model: args.model,
            timeout_secs: args.timeout,
        },
    );

    log::info!(
        "Aiko starting up with model: {} (timeout {}s)",
        resolved.model_name,
        resolved.request_timeout.as_secs()
    );

    tui::run(resolved)
}
