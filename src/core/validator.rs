use crate::core::format::FormatRule;
use crate::domain::model::{Color, DeckDraft, DeckWarning};

/// Enforces format legality on a resolved draft: banned-card removal,
/// illegal-commander downgrade, color-identity restriction and copy-limit
/// clamping. Every removal is recorded as a warning; validation never fails.
pub struct DeckValidator<'a> {
    rule: &'a FormatRule,
}

impl<'a> DeckValidator<'a> {
    pub fn new(rule: &'a FormatRule) -> Self {
        Self { rule }
    }

    pub fn validate(&self, draft: &mut DeckDraft, warnings: &mut Vec<DeckWarning>) {
        self.settle_commander(draft, warnings);
        self.remove_banned(draft, warnings);
        self.restrict_color_identity(draft, warnings);
        self.clamp_quantities(draft);
        self.cap_sideboard(draft);
    }

    /// A proposed commander that is not a legendary creature is not installed;
    /// it joins the mainboard as an ordinary entry instead. Formats without a
    /// commander slot fold any captured commander into the mainboard silently.
    fn settle_commander(&self, draft: &mut DeckDraft, warnings: &mut Vec<DeckWarning>) {
        let Some(commander) = draft.commander.take() else {
            return;
        };

        if self.rule.has_commander && commander.card.is_legendary_creature() {
            draft.commander = Some(commander);
            return;
        }

        if self.rule.has_commander {
            tracing::debug!(
                "proposed commander \"{}\" is not a legendary creature",
                commander.name()
            );
            warnings.push(DeckWarning::CommanderDowngraded(commander.name().to_string()));
        }
        draft.add_mainboard(commander.card, commander.quantity);
    }

    fn remove_banned(&self, draft: &mut DeckDraft, warnings: &mut Vec<DeckWarning>) {
        let format = self.rule.name.as_ref();
        draft.mainboard.retain(|entry| {
            if entry.card.is_banned_in(format) {
                warnings.push(DeckWarning::Banned(entry.name().to_string()));
                false
            } else {
                true
            }
        });
        draft.sideboard.retain(|entry| {
            if entry.card.is_banned_in(format) {
                warnings.push(DeckWarning::Banned(entry.name().to_string()));
                false
            } else {
                true
            }
        });
        if let Some(commander) = &draft.commander {
            if commander.card.is_banned_in(format) {
                warnings.push(DeckWarning::Banned(commander.name().to_string()));
                draft.commander = None;
            }
        }
    }

    /// Once a commander is finalized, every mainboard card must fit inside
    /// its color identity.
    fn restrict_color_identity(&self, draft: &mut DeckDraft, warnings: &mut Vec<DeckWarning>) {
        let Some(commander) = &draft.commander else {
            return;
        };
        let identity: Vec<Color> = commander.card.color_identity.clone();

        draft.mainboard.retain(|entry| {
            if entry.card.identity_within(&identity) {
                true
            } else {
                warnings.push(DeckWarning::IdentityExcluded(entry.name().to_string()));
                false
            }
        });
    }

    /// Copy limits apply at validation time, not in the normalizer: excess
    /// quantities are clamped down, never rejected. Basic lands are exempt.
    fn clamp_quantities(&self, draft: &mut DeckDraft) {
        let limit = self.rule.copy_limit();
        for entry in draft.mainboard.iter_mut().chain(draft.sideboard.iter_mut()) {
            if !entry.card.is_basic_land() && entry.quantity > limit {
                tracing::debug!(
                    "clamping \"{}\" from {} to {} copies",
                    entry.name(),
                    entry.quantity,
                    limit
                );
                entry.quantity = limit;
            }
        }
    }

    /// Formats without a sideboard drop it; the rest cap it at the allowed
    /// size, discarding from the tail.
    fn cap_sideboard(&self, draft: &mut DeckDraft) {
        if !self.rule.has_sideboard {
            draft.sideboard.clear();
            return;
        }
        let mut budget = self.rule.sideboard_size;
        draft.sideboard.retain_mut(|entry| {
            entry.quantity = entry.quantity.min(budget);
            budget -= entry.quantity;
            entry.quantity > 0
        });
    }
}
