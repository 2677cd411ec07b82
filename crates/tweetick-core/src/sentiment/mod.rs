//! Sentiment polarity for tweet text.
//!
//! The collector only needs a discrete label per tweet, so the contract is a
//! single [`SentimentScorer::polarity`] call. [`LexiconScorer`] is the bundled
//! implementation.

mod lexicon;

use std::sync::OnceLock;

use regex::Regex;

use crate::domain::Polarity;

pub use lexicon::{Lexicon, LexiconScorer};

/// Maps raw text to a discrete polarity label.
pub trait SentimentScorer: Send + Sync {
    fn polarity(&self, text: &str) -> Polarity;
}

/// Strips mentions, links and punctuation, then collapses whitespace.
pub fn clean_tweet(text: &str) -> String {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    let pattern = PATTERN.get_or_init(|| {
        Regex::new(r"(@[A-Za-z0-9]+)|([^0-9A-Za-z \t])|(\w+://\S+)")
            .expect("tweet cleaning pattern is valid")
    });

    pattern
        .replace_all(text, " ")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}
