use crate::core::format::FormatRule;
use crate::domain::model::{CardRef, Color, DeckDraft, DeckWarning, ResolvedEntry};
use crate::utils::error::{DeckError, Result};

/// Produces the order in which mainboard entries are considered for
/// trimming. The default discards from the tail of the proposal: the
/// generation source front-loads its highest-priority suggestions, so later
/// entries are the cheapest to lose. Any deterministic ordering works as
/// long as it is applied consistently.
pub trait TrimOrder: Send + Sync {
    fn order(&self, mainboard: &[ResolvedEntry]) -> Vec<usize>;
}

/// Reverse insertion order: last proposed, first trimmed.
#[derive(Debug, Default, Clone, Copy)]
pub struct ReverseInsertion;

impl TrimOrder for ReverseInsertion {
    fn order(&self, mainboard: &[ResolvedEntry]) -> Vec<usize> {
        (0..mainboard.len()).rev().collect()
    }
}

/// Most-expensive-first, for budget-conscious trimming. Entries without a
/// price sort last.
#[derive(Debug, Default, Clone, Copy)]
pub struct PriceDescending;

impl TrimOrder for PriceDescending {
    fn order(&self, mainboard: &[ResolvedEntry]) -> Vec<usize> {
        let mut indices: Vec<usize> = (0..mainboard.len()).collect();
        indices.sort_by(|&a, &b| {
            let pa = mainboard[a].card.price_usd.unwrap_or(0.0);
            let pb = mainboard[b].card.price_usd.unwrap_or(0.0);
            pb.partial_cmp(&pa).unwrap_or(std::cmp::Ordering::Equal)
        });
        indices
    }
}

/// Brings a validated draft to the format's exact target size: shortfalls
/// are filled with color-weighted basic lands, surplus is trimmed while
/// keeping the recommended land count as a mana-base floor.
pub struct DeckNormalizer<'a> {
    rule: &'a FormatRule,
    trim_order: Box<dyn TrimOrder>,
}

impl<'a> DeckNormalizer<'a> {
    pub fn new(rule: &'a FormatRule) -> Self {
        Self {
            rule,
            trim_order: Box::new(ReverseInsertion),
        }
    }

    pub fn with_trim_order(mut self, order: impl TrimOrder + 'static) -> Self {
        self.trim_order = Box::new(order);
        self
    }

    /// Runs shortage fill then excess trim. On success the draft holds
    /// exactly `target_size` cards counting a reserved commander slot; a
    /// draft that cannot be brought to size is a fatal error, never a
    /// malformed result.
    pub fn normalize(&self, draft: &mut DeckDraft, warnings: &mut Vec<DeckWarning>) -> Result<()> {
        let target = self.rule.target_size();
        let reserved = if self.rule.has_commander && draft.commander.is_some() {
            1
        } else {
            0
        };
        let target_mainboard = target - reserved;

        self.fill_shortage(draft, target_mainboard, warnings);
        self.trim_excess(draft, target, reserved, warnings);

        let total = draft.mainboard_count() + reserved;
        if total != target {
            return Err(DeckError::SizeInvariant {
                expected: target,
                actual: total,
            });
        }
        Ok(())
    }

    /// Step A: fill with basic lands for the colors actually present
    /// (colors field, not identity), WUBRG order, remainder to the earliest
    /// land types. A colorless mainboard falls back to the commander's
    /// identity colors when one is installed, else a fixed two-land set.
    /// Lands are first
    /// topped up to the recommended count so a spell-heavy proposal keeps
    /// its land/spell ratio once the trim step runs, then the remaining
    /// shortfall to target size is filled.
    fn fill_shortage(
        &self,
        draft: &mut DeckDraft,
        target_mainboard: u32,
        warnings: &mut Vec<DeckWarning>,
    ) {
        let land_total: u32 = draft
            .mainboard
            .iter()
            .filter(|e| e.card.is_land())
            .map(|e| e.quantity)
            .sum();
        let land_top_up = self.rule.recommended_lands.saturating_sub(land_total);
        let current = draft.mainboard_count() + land_top_up;
        let shortage = land_top_up + target_mainboard.saturating_sub(current);
        if shortage == 0 {
            return;
        }

        let mut land_colors: Vec<Color> = Color::ALL
            .into_iter()
            .filter(|color| {
                draft
                    .mainboard
                    .iter()
                    .any(|e| e.card.colors.contains(color))
            })
            .collect();
        if land_colors.is_empty() {
            // A colorless mainboard gives no signal; with a commander
            // installed its identity bounds what we may add, otherwise fall
            // back to a fixed two-land set.
            land_colors = match &draft.commander {
                Some(commander) => Color::ALL
                    .into_iter()
                    .filter(|color| commander.card.color_identity.contains(color))
                    .collect(),
                None => vec![Color::White, Color::Blue],
            };
        }
        if land_colors.is_empty() {
            // Colorless commander: only Wastes stays inside an empty identity.
            match draft.find_mainboard_mut("Wastes") {
                Some(entry) => entry.quantity += shortage,
                None => draft.add_mainboard(CardRef::wastes(), shortage),
            }
            warnings.push(DeckWarning::LandsAdded(shortage));
            return;
        }

        let k = land_colors.len() as u32;
        let per_land = shortage / k;
        let remainder = shortage % k;

        tracing::debug!(
            "filling {} missing cards with basics across {:?}",
            shortage,
            land_colors
        );

        for (i, color) in land_colors.into_iter().enumerate() {
            let count = per_land + if (i as u32) < remainder { 1 } else { 0 };
            if count == 0 {
                continue;
            }
            let name = color.basic_land_name();
            match draft.find_mainboard_mut(name) {
                Some(entry) => entry.quantity += count,
                None => draft.add_mainboard(CardRef::basic_land(color), count),
            }
        }

        warnings.push(DeckWarning::LandsAdded(shortage));
    }

    /// Step B: trim surplus in three passes over the trim ordering. Non-basic
    /// lands above the recommended land count go first, then non-lands; a
    /// final pass takes anything left, for pathological inputs.
    fn trim_excess(
        &self,
        draft: &mut DeckDraft,
        target: u32,
        reserved: u32,
        warnings: &mut Vec<DeckWarning>,
    ) {
        let current = draft.mainboard_count() + reserved;
        if current <= target {
            return;
        }
        let excess = current - target;

        let land_total: u32 = draft
            .mainboard
            .iter()
            .filter(|e| e.card.is_land())
            .map(|e| e.quantity)
            .sum();
        let excess_lands = land_total.saturating_sub(self.rule.recommended_lands);
        let mut land_budget = excess_lands.min(excess);

        let order = self.trim_order.order(&draft.mainboard);
        let mut remaining = excess;

        // Pass 1: non-basic lands only. Basics are the mana-base floor.
        for &i in &order {
            if land_budget == 0 || remaining == 0 {
                break;
            }
            let entry = &mut draft.mainboard[i];
            if entry.card.is_land() && !entry.card.is_basic_land() {
                let take = entry.quantity.min(land_budget).min(remaining);
                entry.quantity -= take;
                land_budget -= take;
                remaining -= take;
            }
        }

        // Pass 2: non-land entries.
        for &i in &order {
            if remaining == 0 {
                break;
            }
            let entry = &mut draft.mainboard[i];
            if !entry.card.is_land() {
                let take = entry.quantity.min(remaining);
                entry.quantity -= take;
                remaining -= take;
            }
        }

        // Pass 3: anything left, regardless of type.
        for &i in &order {
            if remaining == 0 {
                break;
            }
            let entry = &mut draft.mainboard[i];
            let take = entry.quantity.min(remaining);
            entry.quantity -= take;
            remaining -= take;
        }

        draft.mainboard.retain(|e| e.quantity > 0);

        tracing::debug!("trimmed {} cards over target", excess - remaining);
        warnings.push(DeckWarning::CardsTrimmed(excess));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn card(name: &str, type_line: &str, colors: Vec<Color>) -> CardRef {
        CardRef {
            id: name.to_lowercase().replace(' ', "-"),
            name: name.to_string(),
            mana_cost: None,
            cmc: 2.0,
            colors,
            color_identity: vec![],
            type_line: type_line.to_string(),
            legalities: HashMap::new(),
            price_usd: None,
        }
    }

    fn spell(name: &str, colors: Vec<Color>) -> CardRef {
        card(name, "Creature — Test", colors)
    }

    fn count(draft: &DeckDraft, name: &str) -> u32 {
        draft
            .mainboard
            .iter()
            .find(|e| e.card.name == name)
            .map(|e| e.quantity)
            .unwrap_or(0)
    }

    #[test]
    fn test_shortage_filled_with_color_weighted_basics() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Goblin Guide", vec![Color::Red]), 4);
        draft.add_mainboard(spell("Llanowar Elves", vec![Color::Green]), 4);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        // 52 missing, split across Mountain and Forest: 26 each.
        assert_eq!(draft.mainboard_count(), 60);
        assert_eq!(count(&draft, "Mountain"), 26);
        assert_eq!(count(&draft, "Forest"), 26);
        assert_eq!(warnings, vec![DeckWarning::LandsAdded(52)]);
    }

    #[test]
    fn test_shortage_remainder_goes_to_earliest_colors() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Grizzly Bears", vec![Color::Green]), 4);
        draft.add_mainboard(spell("Goblin Guide", vec![Color::Red]), 3);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        // 53 missing over [Red, Green] in WUBRG order: 27 Mountains, 26 Forests.
        assert_eq!(count(&draft, "Mountain"), 27);
        assert_eq!(count(&draft, "Forest"), 26);
    }

    #[test]
    fn test_colorless_deck_uses_two_land_fallback() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Ornithopter", vec![]), 4);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        assert_eq!(count(&draft, "Plains"), 28);
        assert_eq!(count(&draft, "Island"), 28);
        assert_eq!(draft.mainboard_count(), 60);
    }

    #[test]
    fn test_colorless_mainboard_fills_within_commander_identity() {
        let rule = FormatRule::for_format("commander");
        let mut commander = card(
            "Zada, Hedron Grinder",
            "Legendary Creature — Goblin Ally",
            vec![Color::Red],
        );
        commander.color_identity = vec![Color::Red];
        let mut draft = DeckDraft::default();
        draft.commander = Some(ResolvedEntry::new(1, commander));
        draft.add_mainboard(card("Sol Ring", "Artifact", vec![]), 1);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        // All fill lands come from the commander's identity, never the
        // colorless two-land fallback.
        assert_eq!(draft.mainboard_count(), 99);
        assert_eq!(count(&draft, "Mountain"), 98);
        assert_eq!(count(&draft, "Plains"), 0);
        assert_eq!(count(&draft, "Island"), 0);
        let identity = vec![Color::Red];
        assert!(draft
            .mainboard
            .iter()
            .all(|e| e.card.identity_within(&identity)));
    }

    #[test]
    fn test_colorless_commander_fills_with_wastes() {
        let rule = FormatRule::for_format("commander");
        let mut draft = DeckDraft::default();
        draft.commander = Some(ResolvedEntry::new(
            1,
            card(
                "Kozilek, the Great Distortion",
                "Legendary Creature — Eldrazi",
                vec![],
            ),
        ));
        draft.add_mainboard(card("Sol Ring", "Artifact", vec![]), 1);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        assert_eq!(draft.mainboard_count(), 99);
        assert_eq!(count(&draft, "Wastes"), 98);
        assert_eq!(warnings, vec![DeckWarning::LandsAdded(98)]);
    }

    #[test]
    fn test_fill_increments_existing_basic_entry() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Goblin Guide", vec![Color::Red]), 4);
        draft.add_mainboard(card("Mountain", "Basic Land — Mountain", vec![]), 10);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        assert_eq!(draft.mainboard.len(), 2);
        assert_eq!(count(&draft, "Mountain"), 56);
    }

    #[test]
    fn test_seventy_nonland_proposal_trims_and_adds_lands() {
        // 70 non-land cards, 0 lands: trim to 36 spells, add 24 basics.
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        for i in 0..35 {
            draft.add_mainboard(spell(&format!("Spell {}", i), vec![Color::Red]), 2);
        }
        assert_eq!(draft.mainboard_count(), 70);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        assert_eq!(draft.mainboard_count(), 60);
        let lands: u32 = draft
            .mainboard
            .iter()
            .filter(|e| e.card.is_land())
            .map(|e| e.quantity)
            .sum();
        let spells = draft.mainboard_count() - lands;
        assert_eq!(lands, 24);
        assert_eq!(spells, 36);
        assert_eq!(
            warnings,
            vec![DeckWarning::LandsAdded(24), DeckWarning::CardsTrimmed(34)]
        );
    }

    #[test]
    fn test_trim_takes_nonbasic_lands_before_spells() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Goblin Guide", vec![Color::Red]), 4);
        for i in 0..8 {
            draft.add_mainboard(spell(&format!("Spell {}", i), vec![Color::Red]), 4);
        }
        draft.add_mainboard(card("Mountain", "Basic Land — Mountain", vec![]), 20);
        draft.add_mainboard(card("Ramunap Ruins", "Land — Desert", vec![]), 10);
        assert_eq!(draft.mainboard_count(), 66);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        // 30 lands against a 24-land floor: all 6 excess cards come out of
        // the non-basic land, basics untouched.
        assert_eq!(draft.mainboard_count(), 60);
        assert_eq!(count(&draft, "Mountain"), 20);
        assert_eq!(count(&draft, "Ramunap Ruins"), 4);
        assert_eq!(warnings, vec![DeckWarning::CardsTrimmed(6)]);
    }

    #[test]
    fn test_basic_lands_never_trimmed_in_land_pass() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Goblin Guide", vec![Color::Red]), 4);
        for i in 0..9 {
            draft.add_mainboard(spell(&format!("Spell {}", i), vec![Color::Red]), 4);
        }
        draft.add_mainboard(card("Mountain", "Basic Land — Mountain", vec![]), 26);
        assert_eq!(draft.mainboard_count(), 66);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        // 26 basics exceed the 24 floor but pass 1 only trims non-basics, so
        // the whole excess comes from the tail-end spells.
        assert_eq!(draft.mainboard_count(), 60);
        assert_eq!(count(&draft, "Mountain"), 26);
        assert_eq!(count(&draft, "Spell 8"), 0);
        assert_eq!(count(&draft, "Spell 7"), 2);
    }

    #[test]
    fn test_trim_fallback_pass_reaches_basics() {
        // Pathological input: almost all basic lands. Passes 1 and 2 cannot
        // cover the excess, so the fallback pass trims basics too.
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Goblin Guide", vec![Color::Red]), 2);
        draft.add_mainboard(card("Mountain", "Basic Land — Mountain", vec![]), 68);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        assert_eq!(draft.mainboard_count(), 60);
        assert_eq!(count(&draft, "Goblin Guide"), 0);
        assert_eq!(count(&draft, "Mountain"), 60);
    }

    #[test]
    fn test_commander_slot_reserves_one_card() {
        let rule = FormatRule::for_format("commander");
        let mut draft = DeckDraft::default();
        draft.commander = Some(ResolvedEntry::new(
            1,
            card(
                "Zada, Hedron Grinder",
                "Legendary Creature — Goblin Ally",
                vec![Color::Red],
            ),
        ));
        draft.add_mainboard(spell("Shock", vec![Color::Red]), 1);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        assert_eq!(draft.mainboard_count(), 99);
        assert_eq!(warnings, vec![DeckWarning::LandsAdded(98)]);
    }

    #[test]
    fn test_normalization_is_idempotent() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        draft.add_mainboard(spell("Goblin Guide", vec![Color::Red]), 4);

        let mut warnings = Vec::new();
        let normalizer = DeckNormalizer::new(&rule);
        normalizer.normalize(&mut draft, &mut warnings).unwrap();

        let before: Vec<(String, u32)> = draft
            .mainboard
            .iter()
            .map(|e| (e.card.name.clone(), e.quantity))
            .collect();

        let mut second_warnings = Vec::new();
        normalizer
            .normalize(&mut draft, &mut second_warnings)
            .unwrap();

        let after: Vec<(String, u32)> = draft
            .mainboard
            .iter()
            .map(|e| (e.card.name.clone(), e.quantity))
            .collect();
        assert_eq!(before, after);
        assert!(second_warnings.is_empty());
    }

    #[test]
    fn test_price_descending_trim_order() {
        let rule = FormatRule::for_format("standard");
        let mut draft = DeckDraft::default();
        let mut cheap = spell("Cheap Spell", vec![Color::Red]);
        cheap.price_usd = Some(0.5);
        let mut pricey = spell("Pricey Spell", vec![Color::Red]);
        pricey.price_usd = Some(40.0);
        draft.add_mainboard(pricey, 4);
        draft.add_mainboard(cheap, 4);
        draft.add_mainboard(card("Mountain", "Basic Land — Mountain", vec![]), 54);

        let mut warnings = Vec::new();
        DeckNormalizer::new(&rule)
            .with_trim_order(PriceDescending)
            .normalize(&mut draft, &mut warnings)
            .unwrap();

        // Two over target; the expensive spell loses copies first even
        // though it was inserted earlier.
        assert_eq!(draft.mainboard_count(), 60);
        assert_eq!(count(&draft, "Pricey Spell"), 2);
        assert_eq!(count(&draft, "Cheap Spell"), 4);
    }
}
