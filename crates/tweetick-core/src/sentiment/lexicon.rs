use std::collections::HashMap;

use super::{clean_tweet, SentimentScorer};
use crate::domain::Polarity;

/// Word scores in `[-1, 1]`, intensity modifiers and negation words.
#[derive(Debug, Clone)]
pub struct Lexicon {
    scores: HashMap<String, f64>,
    modifiers: HashMap<String, f64>,
    negations: Vec<String>,
}

impl Lexicon {
    pub fn empty() -> Self {
        Self {
            scores: HashMap::new(),
            modifiers: HashMap::new(),
            negations: Vec::new(),
        }
    }

    pub fn with_word(mut self, word: &str, score: f64) -> Self {
        self.scores.insert(word.to_lowercase(), score.clamp(-1.0, 1.0));
        self
    }

    pub fn with_modifier(mut self, word: &str, factor: f64) -> Self {
        self.modifiers.insert(word.to_lowercase(), factor);
        self
    }

    pub fn with_negation(mut self, word: &str) -> Self {
        self.negations.push(word.to_lowercase());
        self
    }

    pub fn score(&self, word: &str) -> Option<f64> {
        self.scores.get(word).copied()
    }

    pub fn modifier(&self, word: &str) -> Option<f64> {
        self.modifiers.get(word).copied()
    }

    pub fn is_negation(&self, word: &str) -> bool {
        self.negations.iter().any(|negation| negation == word)
    }
}

impl Default for Lexicon {
    fn default() -> Self {
        let words: &[(&str, f64)] = &[
            // general
            ("good", 0.7),
            ("great", 0.8),
            ("best", 1.0),
            ("better", 0.5),
            ("love", 0.5),
            ("nice", 0.6),
            ("awesome", 1.0),
            ("amazing", 0.6),
            ("excellent", 1.0),
            ("happy", 0.8),
            ("strong", 0.43),
            ("positive", 0.23),
            ("win", 0.8),
            ("winning", 0.5),
            ("success", 0.3),
            ("exciting", 0.3),
            ("promising", 0.5),
            ("new", 0.14),
            ("bad", -0.7),
            ("worse", -0.4),
            ("worst", -1.0),
            ("terrible", -1.0),
            ("awful", -1.0),
            ("hate", -0.8),
            ("sad", -0.5),
            ("weak", -0.38),
            ("negative", -0.3),
            ("fail", -0.5),
            ("failed", -0.5),
            ("wrong", -0.5),
            ("risky", -0.3),
            ("fear", -0.6),
            ("panic", -0.8),
            // market
            ("bullish", 0.8),
            ("bull", 0.5),
            ("moon", 0.7),
            ("mooning", 0.8),
            ("pump", 0.5),
            ("pumping", 0.6),
            ("rally", 0.6),
            ("breakout", 0.6),
            ("surge", 0.6),
            ("gains", 0.6),
            ("profit", 0.5),
            ("ath", 0.7),
            ("up", 0.3),
            ("green", 0.4),
            ("buy", 0.3),
            ("long", 0.2),
            ("hodl", 0.4),
            ("undervalued", 0.5),
            ("adoption", 0.4),
            ("bearish", -0.8),
            ("bear", -0.5),
            ("dump", -0.6),
            ("dumping", -0.7),
            ("crash", -0.8),
            ("crashing", -0.9),
            ("scam", -0.9),
            ("rug", -0.8),
            ("rekt", -0.8),
            ("hack", -0.8),
            ("hacked", -0.9),
            ("exploit", -0.8),
            ("liquidated", -0.7),
            ("down", -0.3),
            ("red", -0.4),
            ("sell", -0.3),
            ("short", -0.2),
            ("overvalued", -0.5),
            ("fud", -0.4),
        ];
        let modifiers: &[(&str, f64)] = &[
            ("very", 1.3),
            ("really", 1.3),
            ("extremely", 1.5),
            ("super", 1.4),
            ("so", 1.2),
            ("slightly", 0.6),
            ("somewhat", 0.7),
            ("bit", 0.7),
        ];
        let negations = [
            "not", "no", "never", "dont", "don", "doesn", "didn", "isnt", "isn", "wont", "cant",
            "nothing", "without", "aint",
        ];

        let mut lexicon = Self::empty();
        for (word, score) in words {
            lexicon = lexicon.with_word(word, *score);
        }
        for (word, factor) in modifiers {
            lexicon = lexicon.with_modifier(word, *factor);
        }
        for word in negations {
            lexicon = lexicon.with_negation(word);
        }
        lexicon
    }
}

/// Lexicon-based polarity: the sign of the mean score of matched words.
///
/// A modifier scales the next matched word. A negation flips (and damps) the
/// words that follow it within `negation_window` tokens.
#[derive(Debug, Clone)]
pub struct LexiconScorer {
    lexicon: Lexicon,
    negation_window: usize,
}

impl LexiconScorer {
    pub fn new() -> Self {
        Self {
            lexicon: Lexicon::default(),
            negation_window: 3,
        }
    }

    pub fn with_lexicon(mut self, lexicon: Lexicon) -> Self {
        self.lexicon = lexicon;
        self
    }

    pub fn with_negation_window(mut self, window: usize) -> Self {
        self.negation_window = window;
        self
    }

    /// Continuous score in `[-1, 1]`.
    pub fn score(&self, text: &str) -> f64 {
        let cleaned = clean_tweet(text).to_lowercase();

        let mut total = 0.0;
        let mut matched = 0usize;
        let mut modifier = 1.0;
        let mut negation_left = 0usize;

        for token in cleaned.split_whitespace() {
            if self.lexicon.is_negation(token) {
                negation_left = self.negation_window;
                continue;
            }

            if let Some(factor) = self.lexicon.modifier(token) {
                modifier = factor;
                continue;
            }

            if let Some(base) = self.lexicon.score(token) {
                let mut score = (base * modifier).clamp(-1.0, 1.0);
                if negation_left > 0 {
                    score = -score * 0.5;
                }
                total += score;
                matched += 1;
                modifier = 1.0;
            }

            negation_left = negation_left.saturating_sub(1);
        }

        if matched == 0 {
            0.0
        } else {
            (total / matched as f64).clamp(-1.0, 1.0)
        }
    }
}

impl Default for LexiconScorer {
    fn default() -> Self {
        Self::new()
    }
}

impl SentimentScorer for LexiconScorer {
    fn polarity(&self, text: &str) -> Polarity {
        Polarity::from_score(self.score(text))
    }
}
