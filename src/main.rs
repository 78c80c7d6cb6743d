use clap::Parser;
use deckweaver::CardResolver;
use deckweaver::utils::{logger, validation::Validate};
use deckweaver::{
    ChatGenerator, CliConfig, DeckError, DeckPipeline, GenerationError, ScryfallClient, Settings,
};
use std::sync::Arc;
use std::time::Duration;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = CliConfig::parse();

    logger::init_cli_logger(config.verbose);

    tracing::info!("Starting deckweaver");
    if config.verbose {
        tracing::debug!("CLI config: {:?}", config);
    }

    if let Err(e) = config.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        eprintln!("❌ {}", e);
        std::process::exit(1);
    }

    let settings = match &config.settings {
        Some(path) => Settings::from_file(path)?,
        None => Settings::default(),
    };

    let api_key = std::env::var(&settings.generator.api_key_env).unwrap_or_default();
    if api_key.is_empty() {
        eprintln!(
            "❌ No API key found; set the {} environment variable",
            settings.generator.api_key_env
        );
        std::process::exit(1);
    }

    let generator = ChatGenerator::new(
        settings.generator.endpoint.clone(),
        api_key,
        settings.generator.model.clone(),
        Duration::from_secs(settings.generator.timeout_seconds),
    );
    let lookup = Arc::new(ScryfallClient::new(settings.lookup.endpoint.clone()));
    let resolver = CardResolver::with_limits(
        lookup,
        settings.lookup.concurrent_lookups,
        Duration::from_millis(settings.lookup.delay_ms),
    );
    let pipeline = DeckPipeline::new(generator, resolver);

    let request = config.to_request()?;
    match pipeline.generate(&request).await {
        Ok(deck) => {
            tracing::info!("✅ Generated a {}-card deck", deck.total_count());
            if config.json {
                println!("{}", serde_json::to_string_pretty(&deck)?);
            } else {
                println!("{}", deck.to_decklist());
                for warning in &deck.warnings {
                    eprintln!("⚠️  {}", warning);
                }
            }
        }
        Err(e) => {
            tracing::error!("❌ Deck generation failed: {}", e);
            let message = match &e {
                DeckError::Generation(GenerationError::RateLimited) => {
                    "The text model is rate limited; wait a moment and retry".to_string()
                }
                DeckError::Generation(GenerationError::Auth) => {
                    "The text model rejected the API key".to_string()
                }
                DeckError::Generation(GenerationError::Network(_)) => {
                    "Could not reach the text model; check your connection".to_string()
                }
                other => other.to_string(),
            };
            eprintln!("❌ {}", message);
            std::process::exit(1);
        }
    }

    Ok(())
}
