use clap::Parser;
use log::warn;
use quantum_chat::Provider;
use quantum_chat::core::config::{self, CliOverrides};
use simplelog::{ConfigBuilder, LevelFilter, WriteLogger};
use std::fs::File;

#[derive(Parser)]
#[command(name = "quantum-chat", about = "Terminal chat client for local language models")]
struct Args {
    /// Generation service to use
    #[arg(short, long, value_enum)]
    provider: Option<Provider>,

    /// Model name passed to the generation service
    #[arg(short, long)]
    model: Option<String>,

    /// Sampling temperature (0.0 - 1.0)
    #[arg(short, long)]
    temperature: Option<f32>,
}

#[tokio::main]
async fn main() -> std::io::Result<()> {
    let args = Args::parse();
    dotenv::dotenv().ok();

    // File logger keeps the terminal clean while the TUI owns it
    let log_config = ConfigBuilder::new()
        .set_time_format_rfc3339()
        .build();

    if let Ok(log_file) = File::create("quantum-chat.log") {
        let _ = WriteLogger::init(LevelFilter::Debug, log_config, log_file);
    }

    let file_config = config::load_config().unwrap_or_else(|e| {
        warn!("Ignoring config file: {}", e);
        config::ChatConfig::default()
    });
    let overrides = CliOverrides {
        provider: args.provider,
        model: args.model,
        temperature: args.temperature,
    };
    let resolved = config::resolve(&file_config, &overrides);

    log::info!(
        "Quantum Chat starting up with provider: {:?}, model: {}",
        resolved.provider,
        resolved.model_name
    );

    quantum_chat::tui::run(resolved)
}
