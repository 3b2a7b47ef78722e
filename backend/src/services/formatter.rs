//! Response formatting
//!
//! Re-renders raw model output into the structured, emoji-annotated reply
//! shape: a fixed header line, a per-language greeting, up to three titled
//! sections (one sentence each), and a closing prompt. The same template
//! also drives the language-aware fallback shown when inference is
//! unavailable.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::services::language::LanguageTag;

/// Fixed first line of every reply, language-independent.
pub const HEADER: &str = "🌿 NexaHealth Companion";

/// Per-language reply structure. Read-only, process-wide.
pub struct Template {
    pub greeting: &'static str,
    /// (icon, title) pairs; segment *i* of the raw reply lands under
    /// section *i*. Segments beyond this list are dropped by contract.
    pub sections: &'static [(&'static str, &'static str)],
    pub closing: &'static str,
    /// Apology line used for the inference-unavailable fallback.
    pub apology: &'static str,
}

const ENGLISH: Template = Template {
    greeting: "Hello! Here is what I can share:",
    sections: &[
        ("🩺", "What May Be Going On"),
        ("💡", "What You Can Do"),
        ("🤝", "Extra Support"),
    ],
    closing: "Is there anything else you would like to tell me?",
    apology: "Sorry, I am having trouble responding right now. Please try again in a little while.",
};

const PIDGIN: Template = Template {
    greeting: "How far! See wetin I fit yarn you:",
    sections: &[
        ("🩺", "Wetin Fit Dey Happen"),
        ("💡", "Wetin You Fit Do"),
        ("🤝", "Extra Support"),
    ],
    closing: "You wan tell me anything else?",
    apology: "Abeg no vex, I get small wahala to reply now. Make you try again small time.",
};

const YORUBA: Template = Template {
    greeting: "Bawo! Eyi ni ohun ti mo le so:",
    sections: &[
        ("🩺", "Ohun ti o le fa a"),
        ("💡", "Ohun ti o le se"),
        ("🤝", "Atileyin siwaju"),
    ],
    closing: "Nje ohun miiran wa ti o fe so fun mi?",
    apology: "Ma binu, idiwo kekere wa lowolowo. Jowo gbiyanju lẹẹkansi laipẹ.",
};

const HAUSA: Template = Template {
    greeting: "Sannu! Ga abin da zan iya fada:",
    sections: &[
        ("🩺", "Abin da ka iya faruwa"),
        ("💡", "Abin da za ka iya yi"),
        ("🤝", "Karin tallafi"),
    ],
    closing: "Akwai wani abu da kake son fada mini?",
    apology: "Yi hakuri, ina samun matsala wajen amsawa yanzu. Don Allah sake gwadawa anjima.",
};

const SWAHILI: Template = Template {
    greeting: "Habari! Hivi ndivyo ninavyoweza kushiriki:",
    sections: &[
        ("🩺", "Kinachoweza Kuendelea"),
        ("💡", "Unachoweza Kufanya"),
        ("🤝", "Msaada Zaidi"),
    ],
    closing: "Je, kuna jambo lingine ungependa kuniambia?",
    apology: "Samahani, nina tatizo la kujibu kwa sasa. Tafadhali jaribu tena baadaye.",
};

const IGBO: Template = Template {
    greeting: "Ndewo! Nke a bu ihe m nwere ike ikwu:",
    sections: &[
        ("🩺", "Ihe nwere ike ime"),
        ("💡", "Ihe i nwere ike ime"),
        ("🤝", "Nkwado ozo"),
    ],
    closing: "O nwere ihe ozo i choro igwa m?",
    apology: "Ndo, enwere m nsogbu izaghachi ugbu a. Biko nwaa ozo ma emechaa.",
};

pub fn template(tag: LanguageTag) -> &'static Template {
    match tag {
        LanguageTag::English => &ENGLISH,
        LanguageTag::Pidgin => &PIDGIN,
        LanguageTag::Yoruba => &YORUBA,
        LanguageTag::Hausa => &HAUSA,
        LanguageTag::Swahili => &SWAHILI,
        LanguageTag::Igbo => &IGBO,
    }
}

static EMPHASIS_MARKERS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[*_`]+").expect("emphasis marker pattern is valid"));

/// Remove markdown emphasis markers from raw model output.
///
/// Idempotent: stripping already-stripped text is a no-op.
fn strip_emphasis(text: &str) -> String {
    EMPHASIS_MARKERS.replace_all(text, "").into_owned()
}

/// Split cleaned text into sentence-like segments.
///
/// A segment ends at `.`, `!` or `?` followed by whitespace or end of
/// input. Empty segments are discarded, and a trailing fragment without a
/// terminator is not a segment.
fn split_sentences(text: &str) -> Vec<String> {
    let mut segments = Vec::new();
    let mut start = 0;
    let bytes = text.as_bytes();

    for (i, b) in bytes.iter().enumerate() {
        if matches!(b, b'.' | b'!' | b'?') {
            let at_boundary = match bytes.get(i + 1) {
                None => true,
                Some(next) => next.is_ascii_whitespace(),
            };
            if at_boundary {
                let segment = text[start..=i].trim();
                if !segment.is_empty() && segment.chars().any(|c| c.is_alphanumeric()) {
                    segments.push(segment.to_string());
                }
                start = i + 1;
            }
        }
    }

    segments
}

/// Render raw model output into the structured reply for `tag`.
///
/// Segment *i* fills section *i*; excess segments are dropped. Zero
/// segments degrade to header + greeting + closing only.
pub fn format(raw: &str, tag: LanguageTag) -> String {
    let tpl = template(tag);
    let cleaned = strip_emphasis(raw);
    let segments = split_sentences(&cleaned);

    let mut blocks = Vec::with_capacity(tpl.sections.len() + 3);
    blocks.push(HEADER.to_string());
    blocks.push(tpl.greeting.to_string());

    for ((icon, title), segment) in tpl.sections.iter().zip(segments.iter()) {
        blocks.push(format!("{} **{}**\n{}", icon, title, segment));
    }

    blocks.push(tpl.closing.to_string());
    blocks.join("\n\n")
}

/// Fixed, language-aware apology in the normal reply framing. Returned in
/// place of a reply whenever the remote model is unavailable.
pub fn fallback_message(tag: LanguageTag) -> String {
    let tpl = template(tag);
    [HEADER, tpl.greeting, tpl.apology, tpl.closing].join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_emphasis_idempotent() {
        let raw = "Take **plenty** of _water_ and `rest`.";
        let once = strip_emphasis(raw);
        assert_eq!(once, "Take plenty of water and rest.");
        assert_eq!(strip_emphasis(&once), once);
    }

    #[test]
    fn test_split_sentences_basic() {
        let segments = split_sentences("Try sleep early. Avoid phone before bed.");
        assert_eq!(segments, vec!["Try sleep early.", "Avoid phone before bed."]);
    }

    #[test]
    fn test_split_sentences_drops_unterminated_tail() {
        let segments = split_sentences("Drink water. And also");
        assert_eq!(segments, vec!["Drink water."]);
    }

    #[test]
    fn test_split_sentences_ignores_bare_punctuation() {
        assert!(split_sentences("...").is_empty());
        assert!(split_sentences("").is_empty());
    }

    #[test]
    fn test_format_zero_segments_keeps_frame() {
        let out = format("no terminal punctuation here", LanguageTag::English);
        assert!(out.starts_with(HEADER));
        assert!(out.contains(ENGLISH.greeting));
        assert!(out.ends_with(ENGLISH.closing));
        for (_, title) in ENGLISH.sections {
            assert!(!out.contains(title));
        }
    }

    #[test]
    fn test_format_truncates_excess_sentences() {
        let raw = "One. Two. Three. Four. Five.";
        let out = format(raw, LanguageTag::English);
        assert!(out.contains("One."));
        assert!(out.contains("Three."));
        assert!(!out.contains("Four."));
        assert!(!out.contains("Five."));
    }

    #[test]
    fn test_format_pidgin_scenario() {
        let out = format("Try sleep early. Avoid phone before bed.", LanguageTag::Pidgin);
        assert!(out.contains(PIDGIN.greeting));
        assert!(out.contains("Wetin Fit Dey Happen"));
        assert!(out.contains("Try sleep early."));
        assert!(out.contains("Wetin You Fit Do"));
        assert!(out.contains("Avoid phone before bed."));
        // Only two segments, so the third section stays unrendered
        assert!(!out.contains("Extra Support"));
        assert!(out.ends_with(PIDGIN.closing));
    }

    #[test]
    fn test_fallback_message_uses_reply_framing() {
        for tag in LanguageTag::ALL {
            let out = fallback_message(tag);
            assert!(out.starts_with(HEADER));
            assert!(out.contains(template(tag).greeting));
            assert!(out.contains(template(tag).apology));
            assert!(out.ends_with(template(tag).closing));
        }
    }
}
