//! Prompt composition
//!
//! Builds the system instruction (persona, target language, style rules)
//! and assembles it with prior turns and the new user message into the
//! ordered list sent to the model: exactly one system turn, history
//! verbatim, then exactly one new user turn.

use crate::models::Turn;
use crate::services::language::LanguageTag;

/// Upper bound on the advice sections the model is asked for; matches the
/// section count of the reply templates.
pub const MAX_SECTIONS: usize = 3;

fn system_prompt(tag: LanguageTag) -> String {
    format!(
        "You are Nexa AI Health Companion, a friendly and empathetic health assistant \
         designed for Africans. Speak clearly and kindly in simple language, including \
         African local languages like Yoruba, Pidgin, Hausa, Swahili and Igbo when \
         appropriate. Detected user language: {lang}. Respond in {lang}. \
         Give at most {sections} short pieces of advice, one or two sentences each, \
         about symptoms and mental health, without overwhelming the user. \
         Do not make any medical diagnoses; offer helpful suggestions and encourage \
         users to seek professional help when needed. Always keep your tone supportive \
         and culturally sensitive, and end by gently asking one clarifying question.",
        lang = tag.display_name(),
        sections = MAX_SECTIONS,
    )
}

/// Assemble the ordered message list for one completion call.
///
/// History is cloned in, never mutated in place.
pub fn compose(message: &str, history: &[Turn], tag: LanguageTag) -> Vec<Turn> {
    let mut turns = Vec::with_capacity(history.len() + 2);
    turns.push(Turn::system(system_prompt(tag)));
    turns.extend_from_slice(history);
    turns.push(Turn::user(message));
    turns
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;

    #[test]
    fn test_compose_message_order() {
        let history = vec![Turn::user("hello"), Turn::assistant("hi there")];
        let turns = compose("I no sleep well", &history, LanguageTag::Pidgin);

        assert_eq!(turns.len(), 4);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[1], history[0]);
        assert_eq!(turns[2], history[1]);
        assert_eq!(turns[3].role, Role::User);
        assert_eq!(turns[3].content, "I no sleep well");
    }

    #[test]
    fn test_compose_does_not_touch_history() {
        let history = vec![Turn::user("original")];
        let snapshot = history.clone();
        let _ = compose("new message", &history, LanguageTag::English);
        assert_eq!(history, snapshot);
    }

    #[test]
    fn test_system_prompt_targets_language() {
        let turns = compose("bawo ni", &[], LanguageTag::Yoruba);
        assert!(turns[0].content.contains("Detected user language: Yoruba"));
        assert!(turns[0].content.contains("Respond in Yoruba"));
    }

    #[test]
    fn test_compose_empty_history() {
        let turns = compose("habari", &[], LanguageTag::Swahili);
        assert_eq!(turns.len(), 2);
        assert_eq!(turns[0].role, Role::System);
        assert_eq!(turns[1].role, Role::User);
    }
}
