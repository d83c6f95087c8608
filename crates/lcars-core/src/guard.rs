//! Input guards: message validation and a sliding-window rate limiter.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Message length presets, in characters.
pub mod message_limits {
    pub const SHORT: usize = 100;
    pub const MEDIUM: usize = 500;
    pub const LONG: usize = 1000;
    pub const VERY_LONG: usize = 5000;
}

/// Request timeout presets, in milliseconds.
pub mod timeouts {
    pub const SHORT: u64 = 5_000;
    pub const MEDIUM: u64 = 10_000;
    pub const LONG: u64 = 30_000;
    pub const VERY_LONG: u64 = 60_000;
}

static SUSPICIOUS: Lazy<Vec<Regex>> = Lazy::new(|| {
    [r"(?i)<script", r"(?i)javascript:", r"(?i)on\w+\s*="]
        .iter()
        .map(|p| Regex::new(p).expect("static pattern"))
        .collect()
});

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Validation {
    pub valid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sanitized: Option<String>,
}

impl Validation {
    fn rejected(error: impl Into<String>) -> Self {
        Self {
            valid: false,
            error: Some(error.into()),
            sanitized: None,
        }
    }

    /// The sanitized text, or the rejection reason.
    pub fn into_result(self) -> Result<String, String> {
        match (self.valid, self.sanitized, self.error) {
            (true, Some(text), _) => Ok(text),
            (_, _, Some(err)) => Err(err),
            _ => Err("Invalid input".to_string()),
        }
    }
}

/// Escapes HTML-significant characters.
pub fn sanitize_input(s: &str) -> String {
    s.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}

/// Checks a chat message: non-empty, at most `max_len` characters after trimming and
/// free of script-injection patterns. Valid messages come back trimmed and escaped.
pub fn validate_message(text: &str, max_len: usize) -> Validation {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Validation::rejected("Message cannot be empty");
    }
    if trimmed.chars().count() > max_len {
        return Validation::rejected(format!("Message too long (max {} characters)", max_len));
    }
    if SUSPICIOUS.iter().any(|re| re.is_match(trimmed)) {
        return Validation::rejected("Message contains invalid content");
    }
    Validation {
        valid: true,
        error: None,
        sanitized: Some(sanitize_input(trimmed)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RateLimit {
    pub max_calls: usize,
    pub window: Duration,
}

impl RateLimit {
    pub const CLAUDE_AI: RateLimit = RateLimit::per_minute(5);
    pub const FREE_AI: RateLimit = RateLimit::per_minute(10);
    pub const LOCAL: RateLimit = RateLimit::per_minute(30);
    pub const PREMIUM: RateLimit = RateLimit::per_minute(2);

    pub const fn per_minute(max_calls: usize) -> Self {
        Self {
            max_calls,
            window: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RateLimitStatus {
    pub used: usize,
    pub remaining: usize,
    pub max_calls: usize,
    pub time_window_ms: u64,
    pub next_available_ms: u64,
}

/// Sliding-window limiter: at most `max_calls` accepted calls in any `window`.
#[derive(Debug)]
pub struct RateLimiter {
    limit: RateLimit,
    calls: VecDeque<Instant>,
}

impl RateLimiter {
    pub fn new(limit: RateLimit) -> Self {
        Self {
            limit,
            calls: VecDeque::new(),
        }
    }

    fn prune(&mut self, now: Instant) {
        while let Some(oldest) = self.calls.front() {
            if now.saturating_duration_since(*oldest) >= self.limit.window {
                self.calls.pop_front();
            } else {
                break;
            }
        }
    }

    /// Records a call and returns true when one is available.
    pub fn can_make_call(&mut self) -> bool {
        self.can_make_call_at(Instant::now())
    }

    pub fn can_make_call_at(&mut self, now: Instant) -> bool {
        self.prune(now);
        if self.calls.len() < self.limit.max_calls {
            self.calls.push_back(now);
            true
        } else {
            false
        }
    }

    pub fn remaining_calls(&mut self) -> usize {
        self.remaining_calls_at(Instant::now())
    }

    pub fn remaining_calls_at(&mut self, now: Instant) -> usize {
        self.prune(now);
        self.limit.max_calls.saturating_sub(self.calls.len())
    }

    /// Zero while calls remain, otherwise the wait until the oldest call leaves the window.
    pub fn time_until_next_call(&mut self) -> Duration {
        self.time_until_next_call_at(Instant::now())
    }

    pub fn time_until_next_call_at(&mut self, now: Instant) -> Duration {
        self.prune(now);
        if self.calls.len() < self.limit.max_calls {
            return Duration::ZERO;
        }
        match self.calls.front() {
            Some(oldest) => (*oldest + self.limit.window).saturating_duration_since(now),
            None => Duration::ZERO,
        }
    }

    pub fn reset(&mut self) {
        self.calls.clear();
    }

    pub fn status(&mut self) -> RateLimitStatus {
        self.status_at(Instant::now())
    }

    pub fn status_at(&mut self, now: Instant) -> RateLimitStatus {
        let remaining = self.remaining_calls_at(now);
        RateLimitStatus {
            used: self.calls.len(),
            remaining,
            max_calls: self.limit.max_calls,
            time_window_ms: self.limit.window.as_millis() as u64,
            next_available_ms: self.time_until_next_call_at(now).as_millis() as u64,
        }
    }
}

/// "now", "N second(s)" or "N minute(s)", rounding up.
pub fn format_time_remaining(wait: Duration) -> String {
    let ms = wait.as_millis() as u64;
    if ms == 0 {
        return "now".to_string();
    }
    let seconds = ms.div_ceil(1000);
    if seconds < 60 {
        return format!("{} second{}", seconds, if seconds == 1 { "" } else { "s" });
    }
    let minutes = seconds.div_ceil(60);
    format!("{} minute{}", minutes, if minutes == 1 { "" } else { "s" })
}

pub fn format_status(status: &RateLimitStatus) -> String {
    if status.remaining > 0 {
        return format!("{}/{} requests available", status.remaining, status.max_calls);
    }
    format!(
        "Rate limit reached. Try again in {}",
        format_time_remaining(Duration::from_millis(status.next_available_ms))
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_and_whitespace() {
        let v = validate_message("   ", message_limits::LONG);
        assert!(!v.valid);
        assert_eq!(v.error.as_deref(), Some("Message cannot be empty"));
    }

    #[test]
    fn rejects_over_length_after_trim() {
        let text = format!("  {}  ", "a".repeat(100));
        assert!(validate_message(&text, message_limits::SHORT).valid);
        let v = validate_message(&"a".repeat(101), message_limits::SHORT);
        assert_eq!(v.error.as_deref(), Some("Message too long (max 100 characters)"));
    }

    #[test]
    fn rejects_script_patterns() {
        for text in [
            "<SCRIPT>alert(1)</script>",
            "click JavaScript:void(0)",
            "<img onerror = x>",
        ] {
            let v = validate_message(text, message_limits::LONG);
            assert_eq!(v.error.as_deref(), Some("Message contains invalid content"), "{}", text);
        }
    }

    #[test]
    fn valid_message_is_escaped() {
        let v = validate_message(" 1 < 2 & \"ok\" ", message_limits::LONG);
        assert_eq!(v.into_result().unwrap(), "1 &lt; 2 &amp; &quot;ok&quot;");
    }

    #[test]
    fn limiter_blocks_after_max_and_recovers() {
        let start = Instant::now();
        let mut limiter = RateLimiter::new(RateLimit::PREMIUM);
        assert!(limiter.can_make_call_at(start));
        assert!(limiter.can_make_call_at(start + Duration::from_secs(10)));
        assert!(!limiter.can_make_call_at(start + Duration::from_secs(20)));
        assert_eq!(limiter.remaining_calls_at(start + Duration::from_secs(20)), 0);
        assert_eq!(
            limiter.time_until_next_call_at(start + Duration::from_secs(20)),
            Duration::from_secs(40)
        );
        // oldest call leaves the window at exactly 60s
        assert!(limiter.can_make_call_at(start + Duration::from_secs(60)));
    }

    #[test]
    fn status_and_reset() {
        let now = Instant::now();
        let mut limiter = RateLimiter::new(RateLimit::per_minute(1));
        assert!(limiter.can_make_call_at(now));
        let status = limiter.status_at(now + Duration::from_millis(500));
        assert_eq!(status.used, 1);
        assert_eq!(status.remaining, 0);
        assert_eq!(status.next_available_ms, 59_500);
        assert_eq!(format_status(&status), "Rate limit reached. Try again in 1 minute");
        limiter.reset();
        assert_eq!(
            format_status(&limiter.status_at(now)),
            "1/1 requests available"
        );
    }

    #[test]
    fn time_remaining_rounds_up() {
        assert_eq!(format_time_remaining(Duration::ZERO), "now");
        assert_eq!(format_time_remaining(Duration::from_millis(1)), "1 second");
        assert_eq!(format_time_remaining(Duration::from_millis(1500)), "2 seconds");
        assert_eq!(format_time_remaining(Duration::from_secs(61)), "2 minutes");
        assert_eq!(format_time_remaining(Duration::from_secs(60)), "1 minute");
    }
}
