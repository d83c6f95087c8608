//! Lexical matcher: keyword tables and the two matching modes used by the assistant.
//!
//! Topic keywords match as **substrings** of the lowercased utterance ("weathering" hits
//! "weather"). Sentiment words match as **exact tokens** after punctuation is stripped, so
//! "goodness" never counts as "good".

use crate::panels::Panel;
use once_cell::sync::Lazy;
use std::collections::HashSet;

/// Positive sentiment vocabulary (+10 per token).
pub const POSITIVE_WORDS: &[&str] = &[
    "good", "great", "awesome", "amazing", "excellent",
    "happy", "love", "perfect", "wonderful", "fantastic",
    "brilliant", "outstanding", "superb", "terrific", "marvelous",
    "delightful", "fabulous", "spectacular", "phenomenal", "incredible",
    "nice", "pleasant", "enjoyable", "satisfying", "pleased",
];

/// Negative sentiment vocabulary (-10 per token). "awful" appears twice in the source list.
pub const NEGATIVE_WORDS: &[&str] = &[
    "bad", "terrible", "awful", "hate", "worst",
    "horrible", "sad", "angry", "disappointing", "poor",
    "awful", "dreadful", "atrocious", "abysmal", "appalling",
    "miserable", "pathetic", "useless", "frustrating", "annoying",
    "upset", "unhappy", "dissatisfied", "displeased",
];

pub static POSITIVE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| POSITIVE_WORDS.iter().copied().collect());
pub static NEGATIVE_SET: Lazy<HashSet<&'static str>> =
    Lazy::new(|| NEGATIVE_WORDS.iter().copied().collect());

/// Utterance must *start* with one of these to count as a greeting.
pub const GREETING_PREFIXES: &[&str] = &["hi", "hello", "hey", "greetings"];
pub const THANKS_KEYWORDS: &[&str] = &["thank"];
pub const TASK_CREATE_PHRASES: &[&str] = &["add task", "create task", "new task"];

// Chat topics gathered by the local composer.
pub const TIME_KEYWORDS: &[&str] = &["time", "clock", "stardate"];
pub const WEATHER_KEYWORDS: &[&str] = &["weather", "temperature", "forecast"];
pub const TASKS_KEYWORDS: &[&str] = &["task", "todo", "to-do", "reminder"];
pub const STATUS_KEYWORDS: &[&str] = &["status", "health", "system", "diagnostic"];
pub const JOKE_KEYWORDS: &[&str] = &["joke", "funny", "laugh"];
pub const SWALLOW_KEYWORDS: &[&str] = &["swallow", "african", "european"];
pub const ABOUT_KEYWORDS: &[&str] = &["about", "what is", "tell me about", "explain"];
pub const API_KEYWORDS: &[&str] = &["api", "claude", "anthropic"];

/// Panel keyword table. Row order is the resolution order for single navigation
/// and the tag order for multi-view requests.
pub const PANEL_KEYWORDS: &[(Panel, &[&str])] = &[
    (Panel::Dashboard, &["dashboard", "home"]),
    (Panel::Tasks, &["task", "todo", "to-do"]),
    (Panel::Weather, &["weather", "forecast"]),
    (Panel::Calendar, &["calendar", "schedule", "event"]),
    (Panel::Analytics, &["analytics", "stats", "statistics"]),
    (Panel::Space, &["space", "nasa", "astronomy", "satellite"]),
    (Panel::Travel, &["travel", "route"]),
    (Panel::Notifications, &["notification", "alert"]),
    (Panel::Terminal, &["terminal", "console"]),
    (Panel::Settings, &["settings", "preferences"]),
];

/// Lowercases and trims an utterance for matching.
pub fn normalize(text: &str) -> String {
    text.trim().to_lowercase()
}

/// True if any entry of `words` is a substring of the lowercased `text`.
pub fn matches(text: &str, words: &[&str]) -> bool {
    let lower = text.to_lowercase();
    words.iter().any(|w| lower.contains(w))
}

/// True if the lowercased, left-trimmed `text` starts with any of `prefixes`.
pub fn starts_with_any(text: &str, prefixes: &[&str]) -> bool {
    let lower = text.trim_start().to_lowercase();
    prefixes.iter().any(|p| lower.starts_with(p))
}

/// Sentiment tokenization: lowercase, non-word characters become spaces, split on
/// whitespace, drop tokens of two characters or fewer.
pub fn tokens(text: &str) -> Vec<String> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { ' ' })
        .collect();
    cleaned
        .split_whitespace()
        .filter(|w| w.len() > 2)
        .map(str::to_string)
        .collect()
}

/// Exact-token membership: true if any token of `text` is in `set`.
pub fn contains_word(text: &str, set: &HashSet<&'static str>) -> bool {
    tokens(text).iter().any(|t| set.contains(t.as_str()))
}

/// Panels whose keywords appear in `text`, in table order.
pub fn panel_hits(text: &str) -> Vec<Panel> {
    let lower = text.to_lowercase();
    PANEL_KEYWORDS
        .iter()
        .filter(|(_, words)| words.iter().any(|w| lower.contains(w)))
        .map(|(panel, _)| *panel)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substring_matching_is_loose() {
        assert!(matches("Weathering the storm", WEATHER_KEYWORDS));
        assert!(!matches("sunny outside", WEATHER_KEYWORDS));
    }

    #[test]
    fn word_matching_is_exact() {
        assert!(contains_word("That was GOOD!", &POSITIVE_SET));
        assert!(!contains_word("goodness me", &POSITIVE_SET));
        assert!(!contains_word("greatest hits", &POSITIVE_SET));
    }

    #[test]
    fn tokens_strip_punctuation_and_short_words() {
        assert_eq!(
            tokens("This is great, and... amazing!"),
            vec!["this", "great", "and", "amazing"]
        );
        assert!(tokens("").is_empty());
        assert!(tokens("a an is").is_empty());
    }

    #[test]
    fn greeting_prefix_only_at_start() {
        assert!(starts_with_any("  Hello there", GREETING_PREFIXES));
        assert!(!starts_with_any("well hello", GREETING_PREFIXES));
    }

    #[test]
    fn panel_hits_follow_table_order() {
        assert_eq!(
            panel_hits("show calendar then weather"),
            vec![Panel::Weather, Panel::Calendar]
        );
    }

    #[test]
    fn negative_list_keeps_duplicate() {
        assert_eq!(NEGATIVE_WORDS.iter().filter(|w| **w == "awful").count(), 2);
        assert_eq!(NEGATIVE_SET.len(), NEGATIVE_WORDS.len() - 1);
    }
}
