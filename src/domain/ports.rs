use crate::domain::model::CardRef;
use crate::utils::error::{GenerationError, Result};
use async_trait::async_trait;

/// Text-generation collaborator: one prompt in, one freeform text block out.
/// No structural contract is enforced on the output; the parser tolerates
/// arbitrary deviation from the requested shape.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> std::result::Result<String, GenerationError>;
}

/// Card database collaborator: fuzzy name lookup. `Ok(None)` is the
/// first-class not-found outcome, distinct from transport failure.
#[async_trait]
pub trait CardLookup: Send + Sync {
    async fn fuzzy(&self, name: &str) -> Result<Option<CardRef>>;
}
