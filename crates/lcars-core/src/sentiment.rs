//! Sentiment scorer: word-list scoring mapped to a mood, icon and confidence.

use crate::lexicon::{tokens, NEGATIVE_SET, POSITIVE_SET};
use serde::Serialize;

const WORD_WEIGHT: i32 = 10;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Mood {
    Positive,
    Neutral,
    Negative,
}

impl Mood {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mood::Positive => "positive",
            Mood::Neutral => "neutral",
            Mood::Negative => "negative",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SentimentResult {
    pub mood: Mood,
    pub score: i32,
    pub icon: &'static str,
    /// Share of scored tokens that carried sentiment, in [0, 1].
    pub confidence: f64,
}

/// Scores `text` against the positive and negative word lists.
pub fn score_sentiment(text: &str) -> SentimentResult {
    let words = tokens(text);
    let word_count = words.len();
    let mut score = 0_i32;
    for word in &words {
        if POSITIVE_SET.contains(word.as_str()) {
            score += WORD_WEIGHT;
        }
        if NEGATIVE_SET.contains(word.as_str()) {
            score -= WORD_WEIGHT;
        }
    }

    let sentiment_words = f64::from(score.abs()) / f64::from(WORD_WEIGHT);
    let confidence = (sentiment_words / word_count.max(1) as f64).min(1.0);

    let (mood, icon) = if score > 30 {
        (Mood::Positive, if score > 60 { "😄" } else { "😊" })
    } else if score > 10 {
        (Mood::Positive, "🙂")
    } else if score < -30 {
        (Mood::Negative, if score < -60 { "😢" } else { "😔" })
    } else if score < -10 {
        (Mood::Negative, "😕")
    } else {
        (Mood::Neutral, "😐")
    };

    SentimentResult {
        mood,
        score,
        icon,
        confidence,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_input_is_neutral_with_zero_confidence() {
        let r = score_sentiment("");
        assert_eq!(r.mood, Mood::Neutral);
        assert_eq!(r.score, 0);
        assert_eq!(r.confidence, 0.0);
        assert_eq!(r.icon, "😐");
    }

    #[test]
    fn two_positive_words_score_twenty() {
        let r = score_sentiment("this is great and amazing");
        assert_eq!(r.score, 20);
        assert_eq!(r.mood, Mood::Positive);
        assert_eq!(r.icon, "🙂");
        // 2 sentiment words over 4 retained tokens ("is" is dropped).
        assert!((r.confidence - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn exactly_ten_stays_neutral() {
        let r = score_sentiment("that was good");
        assert_eq!(r.score, 10);
        assert_eq!(r.mood, Mood::Neutral);
    }

    #[test]
    fn strong_positive_uses_big_grin() {
        let r = score_sentiment("good great awesome amazing excellent happy love");
        assert_eq!(r.score, 70);
        assert_eq!(r.icon, "😄");
        assert_eq!(r.confidence, 1.0);
    }

    #[test]
    fn band_edges() {
        let cases = [
            ("good good good", 30, Mood::Positive, "🙂"),
            ("good good good good good good", 60, Mood::Positive, "😊"),
            ("bad", -10, Mood::Neutral, "😐"),
            ("bad bad bad", -30, Mood::Negative, "😕"),
            ("bad bad bad bad bad bad", -60, Mood::Negative, "😔"),
        ];
        for (text, score, mood, icon) in cases {
            let r = score_sentiment(text);
            assert_eq!(r.score, score, "{}", text);
            assert_eq!(r.mood, mood, "{}", text);
            assert_eq!(r.icon, icon, "{}", text);
        }
    }

    #[test]
    fn negative_bands() {
        assert_eq!(score_sentiment("bad terrible day").icon, "😕");
        let r = score_sentiment("bad terrible awful horrible");
        assert_eq!(r.score, -40);
        assert_eq!(r.mood, Mood::Negative);
        assert_eq!(r.icon, "😔");
        let r = score_sentiment("bad terrible awful horrible sad angry worst");
        assert_eq!(r.icon, "😢");
    }

    #[test]
    fn substring_does_not_score() {
        assert_eq!(score_sentiment("goodness gracious badminton").score, 0);
    }
}
