//! Response composer: turns a classified [`Intent`] into reply text.
//!
//! Chat requests go to the configured [`ChatBackend`] first. When it is not configured or
//! fails, the reply is composed locally by gathering one fragment per detected topic
//! (time, tasks, weather, status, joke, swallow) and joining them with a blank line.
//! Collaborator failures become "Unable to fetch" fragments; they never fail the reply.

use crate::intent::{detect_topics, Intent, Topic};
use crate::lexicon::{self, ABOUT_KEYWORDS, API_KEYWORDS, GREETING_PREFIXES, THANKS_KEYWORDS};
use crate::panels::Panel;
use crate::quotes::{self, pick};
use crate::store::{NewTask, Priority, TaskStatus, DEFAULT_CITY};
use crate::traits::{ChatBackend, ChatError, TaskSource, WeatherSource};
use chrono::{DateTime, Duration, Local, Utc};
use rand::rngs::StdRng;
use rand::SeedableRng;
use serde::Serialize;
use std::sync::{Arc, Mutex};

pub const GREETING_REPLY: &str = "Hello! I'm your LCARS AI assistant. How can I help you today?";
pub const THANKS_REPLY: &str = "You're welcome! I'm always here to assist you.";
pub const TASK_USAGE_REPLY: &str = "📋 Usage: add task <title>";
pub const ABOUT_REPLY: &str = "I'm the LCARS AI Console - a Star Trek-themed productivity dashboard. \
I can help with task management, weather info, analytics, and natural language processing.";
pub const API_REPLY: &str = "🤖 Claude AI Integration is ready to activate! Add your ANTHROPIC_API_KEY to .env \
to enable advanced AI conversations. See API-ALTERNATIVES.md for other options (OpenAI, Gemini, Perplexity).";
pub const STATUS_FRAGMENT: &str = "💚 SYSTEM STATUS: All LCARS systems NOMINAL\n  • Core: OPERATIONAL\n  • AI Module: READY\n  • Storage: ACTIVE";
pub const SWALLOW_FRAGMENT: &str = "🐦 SWALLOW ANALYSIS:\nAfrican Swallow: Unladen airspeed ~24 mph (non-migratory)\n\
European Swallow: Unladen airspeed ~20.1 mph\n\n\
Note: Swallows cannot carry coconuts. Bridge of Death protocols do not apply here.";
pub const TASKS_UNAVAILABLE: &str = "📋 TASKS: Unable to fetch task data";
pub const WEATHER_UNAVAILABLE: &str = "🌤️ WEATHER: Unable to fetch weather data";

const STARDATE_YEAR_MS: i64 = 31_536_000_000;
const TOP_TASKS: usize = 3;

/// Stardate for a Unix time in milliseconds, two decimals.
pub fn stardate(unix_ms: i64) -> String {
    let offset = unix_ms.rem_euclid(STARDATE_YEAR_MS) as f64 / 31_536_000.0;
    format!("{:.2}", 41_000.0 + offset)
}

/// Where a chat reply came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReplySource {
    Backend,
    Local,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatReply {
    pub response: String,
    pub source: ReplySource,
}

type Clock = Arc<dyn Fn() -> DateTime<Local> + Send + Sync>;

pub struct Composer {
    tasks: Arc<dyn TaskSource>,
    weather: Arc<dyn WeatherSource>,
    chat: Arc<dyn ChatBackend>,
    city: String,
    rng: Mutex<StdRng>,
    clock: Clock,
}

impl Composer {
    pub fn new(
        tasks: Arc<dyn TaskSource>,
        weather: Arc<dyn WeatherSource>,
        chat: Arc<dyn ChatBackend>,
    ) -> Self {
        Self {
            tasks,
            weather,
            chat,
            city: DEFAULT_CITY.to_string(),
            rng: Mutex::new(StdRng::from_entropy()),
            clock: Arc::new(Local::now),
        }
    }

    /// City used for weather fragments.
    pub fn with_city(mut self, city: impl Into<String>) -> Self {
        self.city = city.into();
        self
    }

    pub fn with_rng(mut self, rng: StdRng) -> Self {
        self.rng = Mutex::new(rng);
        self
    }

    pub fn with_clock(mut self, clock: impl Fn() -> DateTime<Local> + Send + Sync + 'static) -> Self {
        self.clock = Arc::new(clock);
        self
    }

    fn pick(&self, table: &'static [&'static str]) -> &'static str {
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());
        pick(table, &mut *rng)
    }

    /// Reply text for `intent`.
    pub async fn compose(&self, intent: &Intent) -> String {
        match intent {
            Intent::Greeting => GREETING_REPLY.to_string(),
            Intent::Thanks => THANKS_REPLY.to_string(),
            Intent::TaskUsage => TASK_USAGE_REPLY.to_string(),
            Intent::CreateTask { title } => self.create_task(title).await,
            Intent::CaptainQuote { captain } => self.pick(captain.quotes()).to_string(),
            Intent::Navigate { panel } => format!("🖖 Opening {}.", panel.title()),
            Intent::MultiView { panels } => {
                let titles: Vec<&str> = panels.iter().map(Panel::title).collect();
                format!("🖖 Opening multi-view: {}.", titles.join(", "))
            }
            Intent::Chat { query } => self.chat(query).await.response,
        }
    }

    async fn create_task(&self, title: &str) -> String {
        let task = NewTask {
            title: title.to_string(),
            description: String::new(),
            priority: Priority::Medium,
            status: TaskStatus::Active,
            due_date: Utc::now() + Duration::hours(24),
        };
        match self.tasks.create(task).await {
            Ok(created) => format!("✅ Task created: \"{}\" (due in 24 hours)", created.title),
            Err(e) => {
                tracing::warn!(target: "lcars::compose", error = %e, "task creation failed");
                "📋 TASKS: Unable to create task".to_string()
            }
        }
    }

    /// Sends `text` to the chat backend, composing locally when it is unavailable.
    pub async fn chat(&self, text: &str) -> ChatReply {
        match self.chat.send(text).await {
            Ok(response) => ChatReply {
                response,
                source: ReplySource::Backend,
            },
            Err(ChatError::NotConfigured) => ChatReply {
                response: self.local_reply(text).await,
                source: ReplySource::Local,
            },
            Err(ChatError::Failed(reason)) => {
                tracing::warn!(target: "lcars::compose", %reason, "chat backend failed, answering locally");
                ChatReply {
                    response: self.local_reply(text).await,
                    source: ReplySource::Local,
                }
            }
        }
    }

    /// Rule-based reply that gathers every matched topic into one message.
    pub async fn local_reply(&self, text: &str) -> String {
        let lower = lexicon::normalize(text);
        if lexicon::starts_with_any(&lower, GREETING_PREFIXES) {
            return GREETING_REPLY.to_string();
        }
        if lexicon::matches(&lower, THANKS_KEYWORDS) {
            return THANKS_REPLY.to_string();
        }

        let mut fragments: Vec<String> = Vec::new();
        for topic in detect_topics(&lower) {
            match topic {
                Topic::Time => fragments.push(self.time_fragment()),
                Topic::Tasks => fragments.extend(self.task_fragments().await),
                Topic::Weather => fragments.push(self.weather_fragment().await),
                Topic::Status => fragments.push(STATUS_FRAGMENT.to_string()),
                Topic::Joke => fragments.push(format!("😄 {}", self.pick(quotes::CHAT_JOKES))),
                Topic::Swallow => fragments.push(SWALLOW_FRAGMENT.to_string()),
                _ => {}
            }
        }
        if !fragments.is_empty() {
            return fragments.join("\n\n");
        }

        if lexicon::matches(&lower, ABOUT_KEYWORDS) {
            return ABOUT_REPLY.to_string();
        }
        if lexicon::matches(&lower, API_KEYWORDS) {
            return API_REPLY.to_string();
        }
        format!(
            "I understand you're asking about: {}. While I have basic natural language processing, \
adding a Claude AI API key will unlock much more powerful conversations and understanding. \
See the Settings panel for API configuration.",
            text.trim()
        )
    }

    fn time_fragment(&self) -> String {
        let now = (self.clock)();
        format!(
            "⏰ TIME: {} | Stardate: {}",
            now.format("%H:%M:%S"),
            stardate(now.timestamp_millis())
        )
    }

    async fn task_fragments(&self) -> Vec<String> {
        let tasks = match self.tasks.list().await {
            Ok(tasks) => tasks,
            Err(e) => {
                tracing::warn!(target: "lcars::compose", error = %e, "task list unavailable");
                return vec![TASKS_UNAVAILABLE.to_string()];
            }
        };
        let active: Vec<_> = tasks.iter().filter(|t| t.is_active()).collect();
        let completed = tasks.len() - active.len();
        let mut out = vec![format!(
            "📋 TASKS: {} active, {} completed",
            active.len(),
            completed
        )];
        if !active.is_empty() {
            let top: Vec<String> = active
                .iter()
                .take(TOP_TASKS)
                .map(|t| format!("  • {}", t.title))
                .collect();
            out.push(format!("Top priorities:\n{}", top.join("\n")));
        }
        out
    }

    async fn weather_fragment(&self) -> String {
        match self.weather.current(&self.city).await {
            Ok(w) => format!("🌤️ WEATHER: {}°C, {} in {}", w.temp, w.condition, w.city),
            Err(e) => {
                tracing::warn!(target: "lcars::compose", error = %e, "weather unavailable");
                WEATHER_UNAVAILABLE.to_string()
            }
        }
    }
}
