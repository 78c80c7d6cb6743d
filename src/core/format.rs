use std::borrow::Cow;

/// Static per-format construction rules. Looked up by lowercase format key;
/// unknown keys get the 60-card, 4-copy default sizing but keep the caller's
/// key as `name`, so legality lookups still match the card database.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormatRule {
    pub name: Cow<'static, str>,
    pub min_deck_size: u32,
    pub max_deck_size: Option<u32>,
    pub max_copies: u32,
    pub singleton: bool,
    pub has_commander: bool,
    pub recommended_lands: u32,
    pub has_sideboard: bool,
    pub sideboard_size: u32,
}

const STANDARD: FormatRule = FormatRule {
    name: Cow::Borrowed("standard"),
    min_deck_size: 60,
    max_deck_size: None,
    max_copies: 4,
    singleton: false,
    has_commander: false,
    recommended_lands: 24,
    has_sideboard: true,
    sideboard_size: 15,
};

const PIONEER: FormatRule = FormatRule {
    name: Cow::Borrowed("pioneer"),
    ..STANDARD
};

const MODERN: FormatRule = FormatRule {
    name: Cow::Borrowed("modern"),
    ..STANDARD
};

const LEGACY: FormatRule = FormatRule {
    name: Cow::Borrowed("legacy"),
    ..STANDARD
};

const VINTAGE: FormatRule = FormatRule {
    name: Cow::Borrowed("vintage"),
    ..STANDARD
};

const PAUPER: FormatRule = FormatRule {
    name: Cow::Borrowed("pauper"),
    ..STANDARD
};

const COMMANDER: FormatRule = FormatRule {
    name: Cow::Borrowed("commander"),
    min_deck_size: 100,
    max_deck_size: Some(100),
    max_copies: 1,
    singleton: true,
    has_commander: true,
    recommended_lands: 37,
    has_sideboard: false,
    sideboard_size: 0,
};

const BRAWL: FormatRule = FormatRule {
    name: Cow::Borrowed("brawl"),
    min_deck_size: 60,
    max_deck_size: Some(60),
    max_copies: 1,
    singleton: true,
    has_commander: true,
    recommended_lands: 24,
    has_sideboard: false,
    sideboard_size: 0,
};

const LIMITED: FormatRule = FormatRule {
    name: Cow::Borrowed("limited"),
    min_deck_size: 40,
    max_deck_size: None,
    max_copies: u32::MAX,
    singleton: false,
    has_commander: false,
    recommended_lands: 17,
    has_sideboard: false,
    sideboard_size: 0,
};

const DEFAULT: FormatRule = FormatRule {
    name: Cow::Borrowed("default"),
    ..STANDARD
};

impl FormatRule {
    pub fn for_format(key: &str) -> FormatRule {
        let key = key.to_lowercase();
        match key.as_str() {
            "standard" => STANDARD,
            "pioneer" => PIONEER,
            "modern" => MODERN,
            "legacy" => LEGACY,
            "vintage" => VINTAGE,
            "pauper" => PAUPER,
            "commander" | "edh" => COMMANDER,
            "brawl" => BRAWL,
            "limited" | "draft" | "sealed" => LIMITED,
            _ => FormatRule {
                name: Cow::Owned(key),
                ..DEFAULT
            },
        }
    }

    /// Target total deck size: max size where one exists, else minimum.
    pub fn target_size(&self) -> u32 {
        self.max_deck_size.unwrap_or(self.min_deck_size)
    }

    /// Copy ceiling for a non-basic-land card.
    pub fn copy_limit(&self) -> u32 {
        if self.singleton {
            1
        } else {
            self.max_copies
        }
    }
}
