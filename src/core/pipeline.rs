use crate::core::format::FormatRule;
use crate::core::normalizer::{DeckNormalizer, TrimOrder};
use crate::core::parser::parse_response;
use crate::core::prompt::compile_prompt;
use crate::core::resolver::CardResolver;
use crate::core::validator::DeckValidator;
use crate::domain::model::{
    DeckDraft, DeckWarning, GeneratedDeck, GenerationRequest, ParsedDeck,
};
use crate::domain::ports::{CardLookup, TextGenerator};
use crate::utils::error::{DeckError, Result};
use std::sync::Arc;

/// One logical pipeline per generation request: prompt → model → parse →
/// resolve → validate → normalize → assemble. No state is shared across
/// requests; each draft is private to its invocation and committed only
/// once, at assembly.
pub struct DeckPipeline<G: TextGenerator, L: CardLookup> {
    generator: G,
    resolver: CardResolver<L>,
    trim_order: Option<Arc<dyn TrimOrder>>,
}

impl<G: TextGenerator, L: CardLookup + 'static> DeckPipeline<G, L> {
    pub fn new(generator: G, resolver: CardResolver<L>) -> Self {
        Self {
            generator,
            resolver,
            trim_order: None,
        }
    }

    pub fn with_trim_order(mut self, order: impl TrimOrder + 'static) -> Self {
        self.trim_order = Some(Arc::new(order));
        self
    }

    /// Runs the whole pipeline for one request. Per-card problems come back
    /// as warnings on a successful result; only a model failure, an empty
    /// response, zero resolved cards, or a post-normalization size violation
    /// are fatal.
    pub async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedDeck> {
        let rule = FormatRule::for_format(&request.format);
        let prompt = compile_prompt(request);

        tracing::info!(
            "requesting a {} {} deck from the text model",
            request.archetype,
            rule.name
        );
        let response = self.generator.generate(&prompt).await?;
        tracing::debug!("model returned {} characters", response.len());

        let parsed = parse_response(&response);
        if parsed.is_empty() {
            return Err(DeckError::EmptyResponse);
        }
        tracing::info!(
            "parsed {} mainboard entries, {} sideboard entries",
            parsed.mainboard.len(),
            parsed.sideboard.len()
        );

        self.resolve_and_normalize(&parsed, &rule).await
    }

    /// Resolution, validation and normalization for an already-parsed card
    /// list. Public so user-supplied lists skip the text model entirely.
    pub async fn resolve_and_normalize(
        &self,
        parsed: &ParsedDeck,
        rule: &FormatRule,
    ) -> Result<GeneratedDeck> {
        let mut warnings = Vec::new();

        let mut draft = self.resolver.resolve(parsed, &mut warnings).await;
        if draft.mainboard.is_empty() && draft.commander.is_none() {
            return Err(DeckError::NothingResolved);
        }

        DeckValidator::new(rule).validate(&mut draft, &mut warnings);

        let mut normalizer = DeckNormalizer::new(rule);
        if let Some(order) = &self.trim_order {
            normalizer = normalizer.with_trim_order(SharedOrder(Arc::clone(order)));
        }
        normalizer.normalize(&mut draft, &mut warnings)?;

        Ok(assemble(draft, warnings))
    }
}

struct SharedOrder(Arc<dyn TrimOrder>);

impl TrimOrder for SharedOrder {
    fn order(&self, mainboard: &[crate::domain::model::ResolvedEntry]) -> Vec<usize> {
        self.0.order(mainboard)
    }
}

/// Result assembly: freezes the draft into the final deck. Never raises;
/// every problem worth surfacing is already in the warning list.
fn assemble(draft: DeckDraft, warnings: Vec<DeckWarning>) -> GeneratedDeck {
    for warning in &warnings {
        tracing::warn!("{}", warning);
    }
    GeneratedDeck {
        mainboard: draft.mainboard,
        commander: draft.commander,
        sideboard: draft.sideboard,
        warnings,
    }
}
