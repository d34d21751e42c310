//! Word classification and random word selection.
//!
//! Classification uses two closed membership tables (verbs and adjectives);
//! every other word is a noun.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::MorphError;
use crate::model::Category;

static VERBS: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "walk", "run", "jump", "swim", "climb", "build", "break", "carry", "drive", "eat",
        "drink", "sleep", "think", "teach", "learn", "play", "work", "help", "move", "stop",
        "start", "open", "close", "watch", "listen", "talk", "call", "follow", "lead", "push",
        "pull", "catch", "throw", "cut", "grow", "fall", "rise", "win", "lose", "send",
        "receive", "graze", "forage", "float", "rest", "hide", "wander", "groom", "gather",
        "relax", "observe", "communicate", "signal", "escape", "approach", "avoid", "enter",
        "leave", "share", "protect", "adapt",
    ]
    .into_iter()
    .collect()
});

static ADJECTIVES: Lazy<HashSet<&'static str>> = Lazy::new(|| {
    [
        "happy", "sad", "fast", "slow", "big", "small", "young", "old", "easy", "hard",
        "strong", "weak", "quiet", "loud", "bright", "dark", "clean", "dirty", "safe",
        "dangerous", "kind", "mean", "smart", "brave", "calm", "wild", "free", "busy", "ready",
        "tired", "social", "gentle", "alert", "noisy", "steady", "curious", "peaceful", "wet",
        "dry", "warm", "cool", "natural", "domestic", "aquatic", "terrestrial",
    ]
    .into_iter()
    .collect()
});

/// Classify a word by table membership. Adjectives are checked first.
pub fn classify(word: &str) -> Category {
    if ADJECTIVES.contains(word) {
        Category::Adjective
    } else if VERBS.contains(word) {
        Category::Verb
    } else {
        Category::Noun
    }
}

/// A loaded word bank partitioned by category. Immutable once built.
#[derive(Debug, Clone, Default)]
pub struct Lexicon {
    words: Vec<String>,
    nouns: Vec<String>,
    verbs: Vec<String>,
    adjectives: Vec<String>,
}

impl Lexicon {
    pub fn new(words: Vec<String>) -> Self {
        let mut lex = Lexicon::default();
        for w in &words {
            match classify(w) {
                Category::Noun => lex.nouns.push(w.clone()),
                Category::Verb => lex.verbs.push(w.clone()),
                Category::Adjective => lex.adjectives.push(w.clone()),
            }
        }
        lex.words = words;
        lex
    }

    pub fn words(&self) -> &[String] {
        &self.words
    }

    pub fn is_empty(&self) -> bool {
        self.words.is_empty()
    }

    /// All bank words of one category, in bank order (duplicates kept).
    pub fn partition(&self, category: Category) -> &[String] {
        match category {
            Category::Noun => &self.nouns,
            Category::Verb => &self.verbs,
            Category::Adjective => &self.adjectives,
        }
    }

    /// Distinct words of one category, first occurrence order.
    pub fn distinct(&self, category: Category) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.partition(category)
            .iter()
            .map(String::as_str)
            .filter(|w| seen.insert(*w))
            .collect()
    }

    /// Pick a word of `category` uniformly at random.
    pub fn pick<R: Rng + ?Sized>(&self, category: Category, rng: &mut R) -> Result<&str, MorphError> {
        self.partition(category)
            .choose(rng)
            .map(String::as_str)
            .ok_or_else(|| MorphError::insufficient(category, "any word"))
    }

    /// Pick uniformly among the words of `category` that satisfy `pred`.
    ///
    /// Fails with `InsufficientLexicon` when no word qualifies, instead of
    /// drawing until one turns up.
    pub fn pick_where<R, F>(
        &self,
        category: Category,
        requirement: &str,
        rng: &mut R,
        pred: F,
    ) -> Result<&str, MorphError>
    where
        R: Rng + ?Sized,
        F: Fn(&str) -> bool,
    {
        let candidates: Vec<&str> = self
            .partition(category)
            .iter()
            .map(String::as_str)
            .filter(|w| pred(*w))
            .collect();
        candidates
            .choose(rng)
            .copied()
            .ok_or_else(|| MorphError::insufficient(category, requirement))
    }
}
