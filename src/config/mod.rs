pub mod settings;

use crate::domain::model::{Color, GenerationRequest};
use crate::utils::error::{DeckError, Result};
use crate::utils::validation::{validate_non_empty_string, Validate};
use clap::Parser;

#[derive(Debug, Clone, Parser)]
#[command(name = "deckweaver")]
#[command(about = "Generate format-legal decks from a text model")]
pub struct CliConfig {
    #[arg(long, default_value = "standard")]
    pub format: String,

    #[arg(long, default_value = "midrange")]
    pub archetype: String,

    /// Deck colors as single-letter codes, e.g. "R,G" or "WUB".
    #[arg(long, value_delimiter = ',')]
    pub colors: Vec<String>,

    #[arg(long)]
    pub commander: Option<String>,

    #[arg(long)]
    pub notes: Option<String>,

    /// Rough total budget in USD.
    #[arg(long)]
    pub budget: Option<f64>,

    /// Path to a TOML settings file (endpoints, limits).
    #[arg(long)]
    pub settings: Option<std::path::PathBuf>,

    #[arg(long, help = "Print the result as JSON instead of a decklist")]
    pub json: bool,

    #[arg(long, help = "Enable verbose output")]
    pub verbose: bool,
}

impl CliConfig {
    pub fn parse_colors(&self) -> Result<Vec<Color>> {
        let mut colors = Vec::new();
        for chunk in &self.colors {
            for code in chunk.trim().chars() {
                let color = Color::from_code(code).ok_or_else(|| {
                    DeckError::InvalidConfigValueError {
                        field: "colors".to_string(),
                        value: chunk.clone(),
                        reason: format!("'{}' is not one of W, U, B, R, G", code),
                    }
                })?;
                if !colors.contains(&color) {
                    colors.push(color);
                }
            }
        }
        Ok(colors)
    }

    pub fn to_request(&self) -> Result<GenerationRequest> {
        Ok(GenerationRequest {
            format: self.format.clone(),
            archetype: self.archetype.clone(),
            colors: self.parse_colors()?,
            commander: self.commander.clone(),
            strategy_notes: self.notes.clone(),
            budget: self.budget,
        })
    }
}

impl Validate for CliConfig {
    fn validate(&self) -> Result<()> {
        validate_non_empty_string("format", &self.format)?;
        validate_non_empty_string("archetype", &self.archetype)?;
        self.parse_colors()?;
        if let Some(budget) = self.budget {
            if budget <= 0.0 {
                return Err(DeckError::InvalidConfigValueError {
                    field: "budget".to_string(),
                    value: budget.to_string(),
                    reason: "Budget must be positive".to_string(),
                });
            }
        }
        Ok(())
    }
}
