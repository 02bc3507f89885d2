//! JanSeva terminal client - composition root.
//!
//! 1. Parse CLI args and load configuration from TOML
//! 2. Initialize tracing (stderr)
//! 3. Build the reply fetcher and the speech adapters
//! 4. Run the chat session over stdin/stdout

mod cli;
mod repl;

use std::sync::Arc;

use clap::Parser;
use janseva_chat::{ChatSessionController, HttpReplyFetcher};
use janseva_core::{JanSevaConfig, LanguageSelection};
use janseva_speech::{
    SpeechInputAdapter, SpeechOutputAdapter, UnavailableRecognizer, UnavailableSynthesizer,
};

use crate::cli::CliArgs;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = CliArgs::parse();

    // Config.
    let config_file = args.resolve_config_path();
    let mut config = JanSevaConfig::load_or_default(&config_file);
    config.backend.base_url = args.resolve_base_url(&config.backend.base_url);

    // Tracing. Logs go to stderr so they never interleave with the chat.
    let filter = match args.resolve_log_filter(&config.general.log_level) {
        Some(directive) => tracing_subscriber::EnvFilter::new(directive),
        None => tracing_subscriber::EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    tracing::info!("Starting JanSeva v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!(path = %config_file.display(), "Configuration loaded");

    // Session.
    let language = LanguageSelection::new(args.resolve_language(config.general.default_language));
    let fetcher = HttpReplyFetcher::from_config(&config.backend)?;
    tracing::info!(endpoint = %fetcher.endpoint(), "Chat backend configured");

    // A terminal has no speech platform; voice requests report unavailability.
    let voice_input = SpeechInputAdapter::new(Arc::new(UnavailableRecognizer));
    let voice_output = SpeechOutputAdapter::new(Arc::new(UnavailableSynthesizer), &config.speech);

    let controller = Arc::new(ChatSessionController::new(
        language,
        Arc::new(fetcher),
        voice_input,
        voice_output,
    ));
    controller.initialize();
    let language_watch = controller.spawn_language_watch();

    repl::run(Arc::clone(&controller)).await?;

    controller.stop_speaking();
    language_watch.abort();
    tracing::info!("JanSeva stopped");
    Ok(())
}
