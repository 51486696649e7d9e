mod api;
mod chat;
mod logging;
#[cfg(test)]
mod testing;

use clap::{Parser, Subcommand};
use grizzly_core::{
    config, detect_language, languages,
    traits::{ImageAnnotator, LanguageModel},
    SupportedLanguage,
};
use grizzly_providers::{google_vision::GoogleVisionProvider, huggingface::HuggingFaceProvider};
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(
    name = "grizzly",
    version,
    about = "Speak Grizzly: bilingual English/Spanish chat assistant"
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file.
    #[arg(short, long, default_value = "config.toml")]
    config: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP API server.
    Serve,
    /// Print the detected language of a text.
    Detect {
        #[arg(trailing_var_arg = true)]
        text: Vec<String>,
    },
    /// Send a one-shot message and print Grizzly's reply.
    Ask {
        /// The message to send.
        #[arg(trailing_var_arg = true)]
        message: Vec<String>,
    },
    /// Print the welcome message.
    Welcome {
        /// Language name or code (`english`, `es`, ...).
        #[arg(short, long, default_value = "english")]
        language: String,
    },
    /// Show configuration and provider status.
    Status,
}

fn build_providers(cfg: &config::Config) -> (Arc<dyn LanguageModel>, Arc<dyn ImageAnnotator>) {
    let model = HuggingFaceProvider::from_config(&cfg.provider.huggingface);
    let vision = GoogleVisionProvider::from_config(&cfg.provider.google_vision);
    (Arc::new(model), Arc::new(vision))
}

fn configured(yes: bool) -> &'static str {
    if yes {
        "configured"
    } else {
        "missing api_key"
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let cfg = logging::bootstrap(|| config::load(&cli.config))?;
    let _guard = logging::init(&cfg.log, &cfg.grizzly.log_level);

    match cli.command {
        Commands::Serve => {
            let (model, vision) = build_providers(&cfg);
            if !model.is_configured() {
                tracing::warn!("{}: no API key, chat will use canned replies", model.name());
            }
            if !vision.is_configured() {
                tracing::warn!("{}: no API key, image analysis will fail", vision.name());
            }
            info!("{} starting", cfg.grizzly.name);
            let state = api::ApiState::new(&cfg.server, model, vision);
            api::serve(&cfg.server, state).await?;
        }
        Commands::Detect { text } => {
            let lang = detect_language(&text.join(" "));
            println!("{} ({})", lang.name(), lang.code());
        }
        Commands::Ask { message } => {
            if message.is_empty() {
                anyhow::bail!("no message provided. Usage: grizzly ask <message>");
            }
            let (model, vision) = build_providers(&cfg);
            let service = chat::ChatService::new(model, vision);
            let reply = service.reply_to_text(&message.join(" ")).await;
            println!("{}", reply.message.content);
        }
        Commands::Welcome { language } => {
            let lang: SupportedLanguage = language.parse()?;
            let (model, vision) = build_providers(&cfg);
            let service = chat::ChatService::new(model, vision);
            println!("{}", service.welcome(lang).message.content);
        }
        Commands::Status => {
            let (model, vision) = build_providers(&cfg);
            println!("{} status\n", cfg.grizzly.name);
            println!("Config: {}", cli.config);
            println!(
                "Server: http://{}:{} (auth {})",
                cfg.server.host,
                cfg.server.port,
                if cfg.server.api_key.is_empty() {
                    "disabled"
                } else {
                    "enabled"
                }
            );
            println!();
            println!(
                "  {} ({}): {}",
                model.name(),
                cfg.provider.huggingface.model,
                configured(model.is_configured())
            );
            println!("  {}: {}", vision.name(), configured(vision.is_configured()));
            println!();
            println!(
                "Languages: {} supported for chat, {} for translation",
                SupportedLanguage::ALL.len(),
                languages::language_options().len()
            );
        }
    }

    Ok(())
}
