use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// One of the five colors, serialized as the single-letter code used by the
/// card database collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Color {
    #[serde(rename = "W")]
    White,
    #[serde(rename = "U")]
    Blue,
    #[serde(rename = "B")]
    Black,
    #[serde(rename = "R")]
    Red,
    #[serde(rename = "G")]
    Green,
}

impl Color {
    /// Canonical WUBRG iteration order.
    pub const ALL: [Color; 5] = [
        Color::White,
        Color::Blue,
        Color::Black,
        Color::Red,
        Color::Green,
    ];

    pub fn code(self) -> char {
        match self {
            Color::White => 'W',
            Color::Blue => 'U',
            Color::Black => 'B',
            Color::Red => 'R',
            Color::Green => 'G',
        }
    }

    pub fn from_code(code: char) -> Option<Color> {
        match code.to_ascii_uppercase() {
            'W' => Some(Color::White),
            'U' => Some(Color::Blue),
            'B' => Some(Color::Black),
            'R' => Some(Color::Red),
            'G' => Some(Color::Green),
            _ => None,
        }
    }

    /// Name of the basic land that produces this color.
    pub fn basic_land_name(self) -> &'static str {
        match self {
            Color::White => "Plains",
            Color::Blue => "Island",
            Color::Black => "Swamp",
            Color::Red => "Mountain",
            Color::Green => "Forest",
        }
    }

    pub fn display_name(self) -> &'static str {
        match self {
            Color::White => "White",
            Color::Blue => "Blue",
            Color::Black => "Black",
            Color::Red => "Red",
            Color::Green => "Green",
        }
    }
}

/// Per-format legality status as reported by the card database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Legality {
    Legal,
    NotLegal,
    Restricted,
    Banned,
}

/// Canonical card record from the lookup collaborator. Opaque beyond the
/// fields the pipeline consumes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CardRef {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub cmc: f64,
    #[serde(default)]
    pub colors: Vec<Color>,
    #[serde(default)]
    pub color_identity: Vec<Color>,
    #[serde(default)]
    pub type_line: String,
    #[serde(default)]
    pub legalities: HashMap<String, Legality>,
    #[serde(default)]
    pub price_usd: Option<f64>,
}

impl CardRef {
    pub fn is_land(&self) -> bool {
        self.type_line.contains("Land")
    }

    pub fn is_basic_land(&self) -> bool {
        self.type_line.contains("Basic") && self.type_line.contains("Land")
    }

    pub fn is_legendary_creature(&self) -> bool {
        self.type_line.contains("Legendary") && self.type_line.contains("Creature")
    }

    pub fn is_banned_in(&self, format_key: &str) -> bool {
        self.legalities.get(format_key) == Some(&Legality::Banned)
    }

    /// True if every color of this card's identity appears in `identity`.
    pub fn identity_within(&self, identity: &[Color]) -> bool {
        self.color_identity.iter().all(|c| identity.contains(c))
    }

    /// Synthetic record for a basic land, used when the normalizer inserts a
    /// land the lookup stage never saw.
    pub fn basic_land(color: Color) -> CardRef {
        let name = color.basic_land_name();
        CardRef {
            id: format!("basic-{}", name.to_lowercase()),
            name: name.to_string(),
            mana_cost: None,
            cmc: 0.0,
            colors: vec![],
            color_identity: vec![color],
            type_line: format!("Basic Land — {}", name),
            legalities: HashMap::new(),
            price_usd: None,
        }
    }

    /// Synthetic record for Wastes, the colorless basic. The only land that
    /// fits inside an empty commander identity.
    pub fn wastes() -> CardRef {
        CardRef {
            id: "basic-wastes".to_string(),
            name: "Wastes".to_string(),
            mana_cost: None,
            cmc: 0.0,
            colors: vec![],
            color_identity: vec![],
            type_line: "Basic Land — Wastes".to_string(),
            legalities: HashMap::new(),
            price_usd: None,
        }
    }
}

/// A `(quantity, name)` pair as produced by the response parser.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuantityEntry {
    pub quantity: u32,
    pub name: String,
}

impl QuantityEntry {
    pub fn new(quantity: u32, name: impl Into<String>) -> Self {
        Self {
            quantity,
            name: name.into(),
        }
    }
}

/// Parser output: raw card mentions split by section, before any lookup.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedDeck {
    pub mainboard: Vec<QuantityEntry>,
    pub sideboard: Vec<QuantityEntry>,
    pub commander: Option<QuantityEntry>,
}

impl ParsedDeck {
    pub fn is_empty(&self) -> bool {
        self.mainboard.is_empty() && self.sideboard.is_empty() && self.commander.is_none()
    }
}

/// A parsed entry merged with its resolved card record.
#[derive(Debug, Clone, Serialize)]
pub struct ResolvedEntry {
    pub quantity: u32,
    pub card: CardRef,
}

impl ResolvedEntry {
    pub fn new(quantity: u32, card: CardRef) -> Self {
        Self { quantity, card }
    }

    pub fn name(&self) -> &str {
        &self.card.name
    }
}

/// Mutable working deck, private to one pipeline invocation. Mainboard is
/// keyed by canonical card name with quantities merged across duplicate
/// mentions; insertion order is preserved.
#[derive(Debug, Clone, Default)]
pub struct DeckDraft {
    pub mainboard: Vec<ResolvedEntry>,
    pub sideboard: Vec<ResolvedEntry>,
    pub commander: Option<ResolvedEntry>,
}

impl DeckDraft {
    pub fn mainboard_count(&self) -> u32 {
        self.mainboard.iter().map(|e| e.quantity).sum()
    }

    pub fn find_mainboard_mut(&mut self, name: &str) -> Option<&mut ResolvedEntry> {
        self.mainboard.iter_mut().find(|e| e.card.name == name)
    }

    /// Adds to an existing mainboard entry or appends a new one.
    pub fn add_mainboard(&mut self, card: CardRef, quantity: u32) {
        match self.find_mainboard_mut(&card.name) {
            Some(entry) => entry.quantity += quantity,
            None => self.mainboard.push(ResolvedEntry::new(quantity, card)),
        }
    }
}

/// Soft problem accumulated during resolution, validation or normalization.
/// Warnings never abort the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "detail")]
pub enum DeckWarning {
    Unresolved(String),
    Banned(String),
    IdentityExcluded(String),
    CommanderDowngraded(String),
    LandsAdded(u32),
    CardsTrimmed(u32),
}

impl fmt::Display for DeckWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckWarning::Unresolved(name) => write!(f, "could not resolve \"{}\"", name),
            DeckWarning::Banned(name) => write!(f, "\"{}\" is banned in this format", name),
            DeckWarning::IdentityExcluded(name) => {
                write!(f, "\"{}\" is outside the commander's color identity", name)
            }
            DeckWarning::CommanderDowngraded(name) => {
                write!(f, "\"{}\" cannot be a commander, moved to the mainboard", name)
            }
            DeckWarning::LandsAdded(count) => write!(f, "added {} basic lands", count),
            DeckWarning::CardsTrimmed(count) => write!(f, "trimmed {} excess cards", count),
        }
    }
}

/// The caller's request for one generated deck.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationRequest {
    pub format: String,
    pub archetype: String,
    pub colors: Vec<Color>,
    pub commander: Option<String>,
    pub strategy_notes: Option<String>,
    pub budget: Option<f64>,
}

/// Final, frozen pipeline result. Per-card problems are carried as warnings;
/// the deck itself already honors every construction rule.
#[derive(Debug, Clone, Serialize)]
pub struct GeneratedDeck {
    pub mainboard: Vec<ResolvedEntry>,
    pub commander: Option<ResolvedEntry>,
    pub sideboard: Vec<ResolvedEntry>,
    pub warnings: Vec<DeckWarning>,
}

impl GeneratedDeck {
    pub fn mainboard_count(&self) -> u32 {
        self.mainboard.iter().map(|e| e.quantity).sum()
    }

    pub fn total_count(&self) -> u32 {
        self.mainboard_count() + if self.commander.is_some() { 1 } else { 0 }
    }

    /// Renders the deck as `<qty> <name>` lines grouped under type headers,
    /// with Commander/Sideboard section markers. The output re-parses to the
    /// same mainboard/sideboard/commander sets.
    pub fn to_decklist(&self) -> String {
        let mut out = String::new();

        let groups: [(&str, fn(&CardRef) -> bool); 7] = [
            ("Creatures", |c| c.type_line.contains("Creature")),
            ("Planeswalkers", |c| c.type_line.contains("Planeswalker")),
            ("Instants", |c| c.type_line.contains("Instant")),
            ("Sorceries", |c| c.type_line.contains("Sorcery")),
            ("Artifacts", |c| c.type_line.contains("Artifact")),
            ("Enchantments", |c| c.type_line.contains("Enchantment")),
            ("Lands", |c| c.type_line.contains("Land")),
        ];

        let mut grouped = vec![false; self.mainboard.len()];
        for (header, matches) in groups {
            let indices: Vec<usize> = self
                .mainboard
                .iter()
                .enumerate()
                .filter(|(i, e)| !grouped[*i] && matches(&e.card))
                .map(|(i, _)| i)
                .collect();
            if indices.is_empty() {
                continue;
            }
            out.push_str(header);
            out.push('\n');
            for i in indices {
                grouped[i] = true;
                let entry = &self.mainboard[i];
                out.push_str(&format!("{} {}\n", entry.quantity, entry.name()));
            }
            out.push('\n');
        }
        // Anything with an unrecognized type line still has to appear.
        for (i, entry) in self.mainboard.iter().enumerate() {
            if !grouped[i] {
                out.push_str(&format!("{} {}\n", entry.quantity, entry.name()));
            }
        }

        if let Some(commander) = &self.commander {
            out.push_str("Commander\n");
            out.push_str(&format!("1 {}\n", commander.name()));
        }

        if !self.sideboard.is_empty() {
            out.push_str("Sideboard\n");
            for entry in &self.sideboard {
                out.push_str(&format!("{} {}\n", entry.quantity, entry.name()));
            }
        }

        out
    }
}
