use crate::domain::model::{ParsedDeck, QuantityEntry};
use regex::Regex;
use std::sync::OnceLock;

/// Scanner state. Section markers switch state; card lines route to the
/// current section.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Section {
    Main,
    Sideboard,
    Commander,
}

fn card_line_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d+)\s*[xX]?\s+(.+)$").unwrap())
}

/// Cosmetic type dividers the model is asked to emit. Matched after
/// stripping decoration, so "## Creatures (20):" is still a divider.
const TYPE_HEADERS: [&str; 16] = [
    "creature",
    "creatures",
    "instant",
    "instants",
    "sorcery",
    "sorceries",
    "enchantment",
    "enchantments",
    "artifact",
    "artifacts",
    "planeswalker",
    "planeswalkers",
    "land",
    "lands",
    "spells",
    "other spells",
];

/// Strips markdown decoration, a trailing colon and a trailing "(N)" count.
fn normalize_line(line: &str) -> &str {
    let mut line = line.trim();
    line = line.trim_start_matches(['#', '*', '-', '>']).trim_start();
    line = line.trim_end_matches(['*', ':']).trim_end();
    if let Some(open) = line.rfind('(') {
        if line.ends_with(')') && line[open + 1..line.len() - 1].chars().all(|c| c.is_ascii_digit())
        {
            line = line[..open].trim_end();
        }
    }
    line
}

fn is_type_header(line: &str) -> bool {
    let lower = line.to_lowercase();
    TYPE_HEADERS.contains(&lower.as_str())
}

/// Converts arbitrary model output into typed card mentions. Lenient by
/// design: the source is an unstructured text model, so malformed lines are
/// skipped and partial output degrades to a partial result.
pub fn parse_response(text: &str) -> ParsedDeck {
    let mut deck = ParsedDeck::default();
    let mut section = Section::Main;

    for raw in text.lines() {
        let line = normalize_line(raw);
        if line.is_empty() {
            continue;
        }

        let lower = line.to_lowercase();
        if lower.contains("sideboard") {
            section = Section::Sideboard;
            continue;
        }
        if lower.contains("commander") {
            section = Section::Commander;
            continue;
        }
        if is_type_header(line) {
            continue;
        }

        let Some(caps) = card_line_regex().captures(line) else {
            continue;
        };
        let Ok(quantity) = caps[1].parse::<u32>() else {
            continue;
        };
        if quantity == 0 {
            continue;
        }
        let name = caps[2].trim().to_string();
        let entry = QuantityEntry { quantity, name };

        match section {
            Section::Main => deck.mainboard.push(entry),
            Section::Sideboard => deck.sideboard.push(entry),
            Section::Commander => {
                // Only one commander is ever captured; a later Commander
                // marker overwrites an earlier capture.
                deck.commander = Some(QuantityEntry {
                    quantity: 1,
                    ..entry
                });
                section = Section::Main;
            }
        }
    }

    deck
}
