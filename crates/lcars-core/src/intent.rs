//! Intent classifier: an ordered run of keyword predicates that resolves one utterance
//! to exactly one [`Intent`].
//!
//! Resolution order is fixed: greeting, thanks, task creation, captain quote, multi-view,
//! single navigation, chat fallback. The first rule that fires wins.

use crate::lexicon::{
    self, GREETING_PREFIXES, JOKE_KEYWORDS, STATUS_KEYWORDS, SWALLOW_KEYWORDS,
    TASKS_KEYWORDS, TASK_CREATE_PHRASES, THANKS_KEYWORDS, TIME_KEYWORDS, WEATHER_KEYWORDS,
};
use crate::panels::{multiview_route, Panel, MAX_PANELS};
use crate::quotes::Captain;
use serde::Serialize;

/// A trimmed utterance and its lowercased form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Utterance {
    pub raw: String,
    pub normalized: String,
}

impl Utterance {
    pub fn new(text: &str) -> Self {
        Self {
            raw: text.trim().to_string(),
            normalized: lexicon::normalize(text),
        }
    }
}

/// Resolved action for one utterance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Intent {
    Greeting,
    Thanks,
    CreateTask { title: String },
    /// A task phrase with nothing after it.
    TaskUsage,
    CaptainQuote { captain: Captain },
    MultiView { panels: Vec<Panel> },
    Navigate { panel: Panel },
    Chat { query: String },
}

/// Recognized subject of an utterance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Topic {
    Navigate(Panel),
    CreateTask,
    CaptainQuote,
    Time,
    Weather,
    Tasks,
    Status,
    Joke,
    Swallow,
    Greeting,
    Thanks,
    ChatFallback,
}

impl Intent {
    pub fn topic(&self) -> Topic {
        match self {
            Intent::Greeting => Topic::Greeting,
            Intent::Thanks => Topic::Thanks,
            Intent::CreateTask { .. } | Intent::TaskUsage => Topic::CreateTask,
            Intent::CaptainQuote { .. } => Topic::CaptainQuote,
            Intent::MultiView { panels } => {
                Topic::Navigate(panels.first().copied().unwrap_or(Panel::Dashboard))
            }
            Intent::Navigate { panel } => Topic::Navigate(*panel),
            Intent::Chat { .. } => Topic::ChatFallback,
        }
    }

    /// Client route the host should switch to, if any.
    pub fn route(&self) -> Option<String> {
        match self {
            Intent::CaptainQuote { .. } => Some(Panel::Terminal.route().to_string()),
            Intent::MultiView { panels } => Some(multiview_route(panels)),
            Intent::Navigate { panel } => Some(panel.route().to_string()),
            _ => None,
        }
    }

    /// Short label stored with conversation records.
    pub fn label(&self) -> &'static str {
        match self {
            Intent::Greeting => "greeting",
            Intent::Thanks => "thanks",
            Intent::CreateTask { .. } => "create_task",
            Intent::TaskUsage => "task_usage",
            Intent::CaptainQuote { .. } => "captain_quote",
            Intent::MultiView { .. } => "multi_view",
            Intent::Navigate { .. } => "navigate",
            Intent::Chat { .. } => "chat",
        }
    }
}

/// Classifies `text` into a single intent.
pub fn classify(text: &str) -> Intent {
    let utterance = Utterance::new(text);
    let lower = utterance.normalized.as_str();

    if lexicon::starts_with_any(lower, GREETING_PREFIXES) {
        return Intent::Greeting;
    }
    if lexicon::matches(lower, THANKS_KEYWORDS) {
        return Intent::Thanks;
    }
    if let Some(title) = task_title(&utterance.raw) {
        return if title.is_empty() {
            Intent::TaskUsage
        } else {
            Intent::CreateTask { title }
        };
    }
    if let Some(captain) = Captain::ROSTER.iter().find(|c| lower.contains(c.name())) {
        return Intent::CaptainQuote { captain: *captain };
    }

    let hits = lexicon::panel_hits(lower);
    let mut tiles: Vec<Panel> = hits.iter().copied().filter(Panel::is_tileable).collect();
    if tiles.len() >= 2 {
        tiles.truncate(MAX_PANELS);
        return Intent::MultiView { panels: tiles };
    }
    if let Some(panel) = hits.first() {
        return Intent::Navigate { panel: *panel };
    }

    Intent::Chat {
        query: utterance.raw,
    }
}

/// Title after the first task-creation phrase, or `None` when no phrase is present.
fn task_title(raw: &str) -> Option<String> {
    let lower = raw.to_ascii_lowercase();
    let (phrase, start) = TASK_CREATE_PHRASES
        .iter()
        .find_map(|p| lower.find(p).map(|i| (*p, i)))?;
    let rest = &raw[start + phrase.len()..];
    let title = rest
        .trim_start_matches(|c: char| c == ':' || c == '-' || c.is_whitespace())
        .trim();
    Some(title.to_string())
}

/// Chat topics present in `text`, in fragment order.
pub fn detect_topics(text: &str) -> Vec<Topic> {
    let lower = lexicon::normalize(text);
    let groups: [(Topic, &[&str]); 6] = [
        (Topic::Time, TIME_KEYWORDS),
        (Topic::Tasks, TASKS_KEYWORDS),
        (Topic::Weather, WEATHER_KEYWORDS),
        (Topic::Status, STATUS_KEYWORDS),
        (Topic::Joke, JOKE_KEYWORDS),
        (Topic::Swallow, SWALLOW_KEYWORDS),
    ];
    groups
        .iter()
        .filter(|(_, words)| lexicon::matches(&lower, words))
        .map(|(topic, _)| *topic)
        .collect()
}
