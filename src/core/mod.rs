pub mod format;
pub mod normalizer;
pub mod parser;
pub mod pipeline;
pub mod prompt;
pub mod resolver;
pub mod validator;

pub use crate::domain::model::{DeckDraft, GeneratedDeck, GenerationRequest, ParsedDeck};
pub use crate::domain::ports::{CardLookup, TextGenerator};
pub use crate::utils::error::Result;
