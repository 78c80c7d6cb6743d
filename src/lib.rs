pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod utils;

pub use crate::adapters::{ChatGenerator, ScryfallClient};
pub use crate::config::{settings::Settings, CliConfig};
pub use crate::core::format::FormatRule;
pub use crate::core::parser::parse_response;
pub use crate::core::pipeline::DeckPipeline;
pub use crate::core::prompt::compile_prompt;
pub use crate::core::resolver::CardResolver;
pub use crate::domain::model::{
    CardRef, Color, DeckWarning, GeneratedDeck, GenerationRequest, ParsedDeck,
};
pub use crate::domain::ports::{CardLookup, TextGenerator};
pub use crate::utils::error::{DeckError, GenerationError, Result};
