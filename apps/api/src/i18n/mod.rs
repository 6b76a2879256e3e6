//! Localization fallback resolver.
//!
//! Card names and UI strings are stored as JSON objects keyed by language code,
//! e.g. `{"ja": "ピカチュウ", "en": "Pikachu"}`. Lookups walk a fallback chain
//! (requested language, then English, then Japanese) and skip blank entries.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

// ────────────────────────────────────────────────────────────────────────────
// Languages
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    #[serde(rename = "ja")]
    Ja,
    #[serde(rename = "en")]
    En,
    #[serde(rename = "zh-TW")]
    ZhTw,
    #[serde(rename = "ko")]
    Ko,
    #[serde(rename = "fr")]
    Fr,
    #[serde(rename = "es")]
    Es,
    #[serde(rename = "de")]
    De,
    #[serde(rename = "it")]
    It,
}

pub const DEFAULT_LANGUAGE: Language = Language::Ja;

const FALLBACKS: [Language; 2] = [Language::En, Language::Ja];

const BUNDLED_LOCALES: &str = include_str!("../../locales/collage.json");

impl Language {
    /// Parses a language code case-insensitively. `zh-TW` also accepts `zh_tw`.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_ascii_lowercase().replace('_', "-");
        match normalized.as_str() {
            "ja" => Some(Language::Ja),
            "en" => Some(Language::En),
            "zh-tw" => Some(Language::ZhTw),
            "ko" => Some(Language::Ko),
            "fr" => Some(Language::Fr),
            "es" => Some(Language::Es),
            "de" => Some(Language::De),
            "it" => Some(Language::It),
            _ => None,
        }
    }

    /// Key used for this language inside translation objects.
    pub fn code(&self) -> &'static str {
        match self {
            Language::Ja => "ja",
            Language::En => "en",
            Language::ZhTw => "zh-TW",
            Language::Ko => "ko",
            Language::Fr => "fr",
            Language::Es => "es",
            Language::De => "de",
            Language::It => "it",
        }
    }
}

/// Requested language first, then English, then Japanese, without repeats.
pub fn fallback_chain(lang: Language) -> Vec<Language> {
    let mut chain = vec![lang];
    for fallback in FALLBACKS {
        if !chain.contains(&fallback) {
            chain.push(fallback);
        }
    }
    chain
}

// ────────────────────────────────────────────────────────────────────────────
// Localized values
// ────────────────────────────────────────────────────────────────────────────

/// Resolves a localized JSON value to a string for `lang`.
///
/// Plain strings are returned unchanged (legacy single-language rows). Objects are
/// walked along the fallback chain; if no chain language has a non-blank entry the
/// first non-blank string in the object is used.
pub fn resolve_localized(value: &Value, lang: Language) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Object(map) => fallback_chain(lang)
            .into_iter()
            .find_map(|candidate| non_blank(map.get(candidate.code())))
            .or_else(|| map.values().find_map(|v| non_blank(Some(v)))),
        _ => None,
    }
}

fn non_blank(value: Option<&Value>) -> Option<String> {
    value
        .and_then(Value::as_str)
        .filter(|s| !s.trim().is_empty())
        .map(str::to_string)
}

// ────────────────────────────────────────────────────────────────────────────
// Translation tables
// ────────────────────────────────────────────────────────────────────────────

/// Per-language translation trees addressed by dotted keys (`"trade.offered"`).
#[derive(Debug, Clone, Default)]
pub struct Translations {
    trees: HashMap<Language, Value>,
}

impl Translations {
    /// Builds tables from `{ "<code>": { ...tree } }`. Unknown codes are skipped.
    pub fn from_json(value: &Value) -> Self {
        let trees = value
            .as_object()
            .map(|map| {
                map.iter()
                    .filter_map(|(code, tree)| {
                        Language::from_code(code).map(|lang| (lang, tree.clone()))
                    })
                    .collect()
            })
            .unwrap_or_default();
        Self { trees }
    }

    /// Looks up `key` along the fallback chain. A missing key yields the key itself.
    pub fn translate(&self, lang: Language, key: &str) -> String {
        fallback_chain(lang)
            .into_iter()
            .find_map(|candidate| {
                self.trees
                    .get(&candidate)
                    .and_then(|tree| walk_path(tree, key))
            })
            .unwrap_or_else(|| key.to_string())
    }
}

/// UI strings shipped with the service (the collage group titles).
pub fn bundled_translations() -> Result<Translations, serde_json::Error> {
    let value: Value = serde_json::from_str(BUNDLED_LOCALES)?;
    Ok(Translations::from_json(&value))
}

fn walk_path(tree: &Value, key: &str) -> Option<String> {
    key.split('.')
        .try_fold(tree, |node, segment| node.get(segment))
        .and_then(|leaf| non_blank(Some(leaf)))
}
