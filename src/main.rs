use clap::Parser;
use log::LevelFilter;
use simplelog::{ConfigBuilder, WriteLogger};
use std::fs::File;

use tabula::core::config::{self, CliOverrides, TabulaConfig};
use tabula::core::state::Panel;

#[derive(Parser)]
#[command(name = "tabula", about = "Chat with your spreadsheets from the terminal")]
struct Args {
    /// Base URL of the document chat server
    #[arg(short, long)]
    base_url: Option<String>,

    /// Panel to open on start-up
    #[arg(short, long, value_enum)]
    panel: Option<Panel>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // A broken config file should not keep the client from starting
    let (file_config, config_warning) = match config::load_config() {
        Ok(c) => (c, None),
        Err(e) => (TabulaConfig::default(), Some(e)),
    };
    let resolved = config::resolve(
        &file_config,
        &CliOverrides {
            base_url: args.base_url,
            start_panel: args.panel,
        },
    );

    // Initialize file logger - writes to tabula.log in current directory
    let log_config = ConfigBuilder::new().set_time_format_rfc3339().build();
    let level = resolved
        .log_level
        .parse::<LevelFilter>()
        .unwrap_or(LevelFilter::Debug);
    match File::create("tabula.log") {
        Ok(log_file) => {
            if let Err(e) = WriteLogger::init(level, log_config, log_file) {
                eprintln!("tabula: logging disabled: {e}");
            }
        }
        Err(e) => eprintln!("tabula: could not create tabula.log, logging disabled: {e}"),
    }

    if let Some(e) = config_warning {
        log::warn!("Ignoring config file, using defaults: {}", e);
    }
    log::info!(
        "Tabula starting up against {} (timeout {:?})",
        resolved.base_url,
        resolved.timeout
    );

    tabula::tui::run(resolved)
}
