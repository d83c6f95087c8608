//! LCARS Console core library.
//! Utterance classifier, sentiment scorer, response composer, multi-view dispatcher,
//! terminal interpreter, in-memory stores and the third-party feed clients.

pub mod compose;
pub mod config;
pub mod error;
pub mod guard;
pub mod intent;
pub mod lexicon;
pub mod panels;
pub mod quotes;
pub mod sentiment;
pub mod services;
pub mod store;
pub mod terminal;
pub mod traits;

pub use compose::{stardate, ChatReply, Composer, ReplySource};
pub use crate::config::LcarsConfig;
pub use error::{ErrorInfo, ErrorKind, LcarsError, LcarsResult};
pub use guard::{validate_message, RateLimit, RateLimiter};
pub use intent::{classify, detect_topics, Intent, Topic, Utterance};
pub use panels::{dispatch, Panel, PanelLayout};
pub use quotes::Captain;
pub use sentiment::{score_sentiment, Mood, SentimentResult};
pub use store::Console;
pub use terminal::{Terminal, TerminalLine, TerminalResponse};
pub use traits::{ChatBackend, ChatError, CurrentWeather, TaskSource, Unconfigured, WeatherSource};

pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
