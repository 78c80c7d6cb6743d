use crate::domain::model::{CardRef, DeckDraft, DeckWarning, ParsedDeck, ResolvedEntry};
use crate::domain::ports::CardLookup;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

/// Maps every distinct proposed name to canonical card data through the
/// fuzzy-lookup port. Fully partial-failure tolerant: a failed or not-found
/// lookup is recorded as an `Unresolved` warning and the batch continues.
///
/// Lookups are mutually independent, so they run behind a bounded concurrency
/// gate; the inter-call delay is injectable so throttling policy stays out of
/// the resolution logic.
pub struct CardResolver<L: CardLookup> {
    lookup: Arc<L>,
    gate: Arc<Semaphore>,
    delay: Duration,
}

impl<L: CardLookup + 'static> CardResolver<L> {
    pub fn new(lookup: Arc<L>) -> Self {
        Self::with_limits(lookup, 5, Duration::ZERO)
    }

    pub fn with_limits(lookup: Arc<L>, concurrent: usize, delay: Duration) -> Self {
        Self {
            lookup,
            gate: Arc::new(Semaphore::new(concurrent.max(1))),
            delay,
        }
    }

    /// Resolves a parsed deck into a draft keyed by canonical card name.
    /// Duplicate mentions of one card merge their quantities; entries that
    /// fail to resolve are dropped and warned about.
    pub async fn resolve(
        &self,
        parsed: &ParsedDeck,
        warnings: &mut Vec<DeckWarning>,
    ) -> DeckDraft {
        let mut names: Vec<String> = Vec::new();
        let mut seen = |name: &str, names: &mut Vec<String>| {
            if !names.iter().any(|n| n == name) {
                names.push(name.to_string());
            }
        };
        for entry in parsed.mainboard.iter().chain(parsed.sideboard.iter()) {
            seen(&entry.name, &mut names);
        }
        if let Some(commander) = &parsed.commander {
            seen(&commander.name, &mut names);
        }

        let resolved = self.lookup_all(names).await;

        let mut draft = DeckDraft::default();
        for entry in &parsed.mainboard {
            match resolved.get(&entry.name).cloned().flatten() {
                Some(card) => draft.add_mainboard(card, entry.quantity),
                None => warnings.push(DeckWarning::Unresolved(entry.name.clone())),
            }
        }
        for entry in &parsed.sideboard {
            match resolved.get(&entry.name).cloned().flatten() {
                Some(card) => match draft.sideboard.iter_mut().find(|e| e.card.name == card.name)
                {
                    Some(existing) => existing.quantity += entry.quantity,
                    None => draft.sideboard.push(ResolvedEntry::new(entry.quantity, card)),
                },
                None => warnings.push(DeckWarning::Unresolved(entry.name.clone())),
            }
        }
        if let Some(commander) = &parsed.commander {
            match resolved.get(&commander.name).cloned().flatten() {
                Some(card) => draft.commander = Some(ResolvedEntry::new(1, card)),
                None => warnings.push(DeckWarning::Unresolved(commander.name.clone())),
            }
        }

        draft
    }

    async fn lookup_all(&self, names: Vec<String>) -> HashMap<String, Option<CardRef>> {
        let mut tasks = JoinSet::new();
        for name in names {
            let lookup = Arc::clone(&self.lookup);
            let gate = Arc::clone(&self.gate);
            let delay = self.delay;
            tasks.spawn(async move {
                // Permit is held across the delay so the delay actually
                // paces the aggregate request rate.
                let _permit = gate.acquire_owned().await;
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
                let card = match lookup.fuzzy(&name).await {
                    Ok(card) => card,
                    Err(e) => {
                        tracing::warn!("lookup for \"{}\" failed: {}", name, e);
                        None
                    }
                };
                (name, card)
            });
        }

        let mut resolved = HashMap::new();
        while let Some(joined) = tasks.join_next().await {
            if let Ok((name, card)) = joined {
                resolved.insert(name, card);
            }
        }
        resolved
    }
}
