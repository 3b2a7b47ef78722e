//! Language detection for free-form user text
//!
//! Classifies input into a small closed set of language/dialect tags using
//! word-boundary keyword matching with score-based tie-breaking. This is a
//! best-effort hint only: an explicit hint from the request always wins, and
//! anything ambiguous falls back to English.

use once_cell::sync::Lazy;
use regex::RegexSet;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Supported response languages/dialects.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum LanguageTag {
    English,
    Pidgin,
    Yoruba,
    Hausa,
    Swahili,
    Igbo,
}

impl LanguageTag {
    pub const ALL: [LanguageTag; 6] = [
        LanguageTag::English,
        LanguageTag::Pidgin,
        LanguageTag::Yoruba,
        LanguageTag::Hausa,
        LanguageTag::Swahili,
        LanguageTag::Igbo,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            LanguageTag::English => "english",
            LanguageTag::Pidgin => "pidgin",
            LanguageTag::Yoruba => "yoruba",
            LanguageTag::Hausa => "hausa",
            LanguageTag::Swahili => "swahili",
            LanguageTag::Igbo => "igbo",
        }
    }

    /// Human-readable name used inside system prompts.
    pub fn display_name(self) -> &'static str {
        match self {
            LanguageTag::English => "English",
            LanguageTag::Pidgin => "Pidgin English",
            LanguageTag::Yoruba => "Yoruba",
            LanguageTag::Hausa => "Hausa",
            LanguageTag::Swahili => "Swahili",
            LanguageTag::Igbo => "Igbo",
        }
    }

    /// Parse an explicit language hint from a request.
    ///
    /// Accepts the canonical tag names plus common short codes. Anything
    /// unrecognized returns `None` so the caller falls back to detection.
    pub fn from_hint(hint: &str) -> Option<Self> {
        match hint.trim().to_lowercase().as_str() {
            "english" | "en" => Some(LanguageTag::English),
            "pidgin" | "pidgin english" | "pcm" => Some(LanguageTag::Pidgin),
            "yoruba" | "yo" => Some(LanguageTag::Yoruba),
            "hausa" | "ha" => Some(LanguageTag::Hausa),
            "swahili" | "kiswahili" | "sw" => Some(LanguageTag::Swahili),
            "igbo" | "ig" => Some(LanguageTag::Igbo),
            _ => None,
        }
    }
}

impl std::fmt::Display for LanguageTag {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Literal keyword seeds per language. English carries no keywords: it is
/// the default whenever nothing else scores.
const KEYWORDS: &[(LanguageTag, &[&str])] = &[
    (LanguageTag::Yoruba, &["bawo", "se", "ni", "owo", "ire"]),
    (LanguageTag::Pidgin, &["how far", "abi", "no be", "wahala", "dem"]),
    (LanguageTag::Hausa, &["sannu", "lafiya", "yaya", "nagode", "ina"]),
    (LanguageTag::Swahili, &["habari", "jambo", "asante", "karibu", "pole"]),
    (LanguageTag::Igbo, &["kedu", "biko", "daalu", "ndewo", "nna"]),
];

static MATCHERS: Lazy<Vec<(LanguageTag, RegexSet)>> = Lazy::new(|| {
    KEYWORDS
        .iter()
        .map(|(tag, words)| {
            let patterns: Vec<String> = words
                .iter()
                .map(|w| format!(r"(?i)\b{}\b", regex::escape(w)))
                .collect();
            let set = RegexSet::new(&patterns).expect("keyword patterns are valid regexes");
            (*tag, set)
        })
        .collect()
});

/// Detect the likely language of `text`.
///
/// Counts word-boundary keyword hits per language and picks the highest
/// score. A tie between two or more languages, or an all-zero score, falls
/// back to English. Total: never fails, always returns a valid tag.
pub fn detect(text: &str) -> LanguageTag {
    let mut best = LanguageTag::English;
    let mut best_score = 0usize;
    let mut tied = false;

    for (tag, set) in MATCHERS.iter() {
        let score = set.matches(text).iter().count();
        if score > best_score {
            best = *tag;
            best_score = score;
            tied = false;
        } else if score > 0 && score == best_score {
            tied = true;
        }
    }

    if best_score == 0 || tied { LanguageTag::English } else { best }
}

/// Resolve the response language for a request: a valid explicit hint wins,
/// otherwise detect from the message text.
pub fn resolve(hint: Option<&str>, text: &str) -> LanguageTag {
    hint.and_then(LanguageTag::from_hint)
        .unwrap_or_else(|| detect(text))
}
