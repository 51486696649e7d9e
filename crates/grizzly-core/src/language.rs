//! Heuristic language detection.
//!
//! Detection is an ordered list of cheap pattern rules, not a statistical
//! classifier. Each rule only signals a non-default language; when nothing
//! matches the text is treated as English.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::GrizzlyError;

/// A language the assistant can detect and respond in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SupportedLanguage {
    #[default]
    English,
    Spanish,
}

impl SupportedLanguage {
    /// Every supported language, default first.
    pub const ALL: [SupportedLanguage; 2] = [Self::English, Self::Spanish];

    /// ISO 639-1 code.
    pub fn code(self) -> &'static str {
        match self {
            Self::English => "en",
            Self::Spanish => "es",
        }
    }

    /// Lowercase identifier used in JSON and on the command line.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::English => "english",
            Self::Spanish => "spanish",
        }
    }

    /// English display name.
    pub fn name(self) -> &'static str {
        match self {
            Self::English => "English",
            Self::Spanish => "Spanish",
        }
    }

    /// The language a chat message is translated into.
    pub fn opposite(self) -> Self {
        match self {
            Self::English => Self::Spanish,
            Self::Spanish => Self::English,
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SupportedLanguage {
    type Err = GrizzlyError;

    /// Accepts the identifier (`spanish`) or the ISO code (`es`), any case.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| s.eq_ignore_ascii_case(l.as_str()) || s.eq_ignore_ascii_case(l.code()))
            .ok_or_else(|| GrizzlyError::InvalidRequest(format!("unsupported language: {s}")))
    }
}

/// A single detection rule.
#[derive(Debug, Clone, Copy)]
pub enum Pattern {
    /// Matches when any of the characters occurs in the text.
    AnyChar(&'static [char]),
    /// Case-insensitive whole-word match of any phrase. Letters, digits and
    /// `_` are word characters; phrase spacing must match exactly.
    Phrases(&'static [&'static str]),
}

impl Pattern {
    pub fn matches(&self, text: &str) -> bool {
        match self {
            Self::AnyChar(chars) => text.chars().any(|c| chars.contains(&c)),
            Self::Phrases(phrases) => {
                let lower = text.to_lowercase();
                phrases.iter().any(|phrase| contains_word(&lower, phrase))
            }
        }
    }
}

/// Spanish rules, evaluated in order.
pub const SPANISH_PATTERNS: &[Pattern] = &[
    Pattern::AnyChar(&['¿', '¡', 'ñ', 'á', 'é', 'í', 'ó', 'ú']),
    Pattern::Phrases(&[
        "hola",
        "gracias",
        "buenos días",
        "buenas tardes",
        "buenas noches",
        "por favor",
        "cómo",
        "qué",
        "cuál",
        "dónde",
        "cuándo",
        "quién",
        "por qué",
    ]),
];

/// Detect the language of `text`. Never fails; defaults to English.
pub fn detect_language(text: &str) -> SupportedLanguage {
    if SPANISH_PATTERNS.iter().any(|p| p.matches(text)) {
        SupportedLanguage::Spanish
    } else {
        SupportedLanguage::English
    }
}

fn is_word_char(c: char) -> bool {
    c.is_alphanumeric() || c == '_'
}

/// True when `needle` occurs in `haystack` with no word character on either side.
fn contains_word(haystack: &str, needle: &str) -> bool {
    !needle.is_empty()
        && haystack.match_indices(needle).any(|(start, m)| {
            let before = haystack[..start].chars().next_back();
            let after = haystack[start + m.len()..].chars().next();
            !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
        })
}
