// Tokenizer — splits review text into lower-cased, stemmed word tokens.
//
// Stemming uses the Snowball English algorithm from `rust-stemmers`, a fixed
// rule set with no learned state. Stop-word removal (off by default) uses the
// English list from the `stop-words` crate.
//
// The settings that shape tokenization are persisted alongside the vocabulary,
// so a model loaded later tokenizes new text exactly the way it was trained.

use std::collections::HashSet;
use std::fmt;
use std::sync::LazyLock;

use regex_lite::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use serde::{Deserialize, Serialize};
use stop_words::{get, LANGUAGE};

/// Markup tags like `<br />`, which the IMDB review corpus is full of.
static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("valid markup pattern"));

/// Knobs that change which tokens come out of a document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenizerSettings {
    /// Fragments shorter than this (in characters) are dropped before stemming
    pub min_token_len: usize,
    /// Replace `<...>` markup tags with whitespace before splitting
    pub strip_markup: bool,
    /// Drop English stop words before stemming
    pub remove_stop_words: bool,
}

impl Default for TokenizerSettings {
    fn default() -> Self {
        Self {
            min_token_len: 2,
            strip_markup: true,
            remove_stop_words: false,
        }
    }
}

/// Deterministic text → stem sequence transform.
pub struct Tokenizer {
    settings: TokenizerSettings,
    stemmer: Stemmer,
    stop_words: HashSet<String>,
}

impl Tokenizer {
    pub fn new(settings: TokenizerSettings) -> Self {
        let stop_words = if settings.remove_stop_words {
            get(LANGUAGE::English).into_iter().collect()
        } else {
            HashSet::new()
        };

        Self {
            settings,
            stemmer: Stemmer::create(Algorithm::English),
            stop_words,
        }
    }

    pub fn settings(&self) -> TokenizerSettings {
        self.settings
    }

    /// Split `text` into stems. Order follows the text, duplicates are kept.
    pub fn tokenize(&self, text: &str) -> Vec<String> {
        let text = if self.settings.strip_markup {
            MARKUP_TAG.replace_all(text, " ")
        } else {
            text.into()
        };
        let lower = text.to_lowercase();

        lower
            .split(|c: char| !c.is_alphanumeric())
            .filter(|fragment| !fragment.is_empty())
            .filter(|fragment| fragment.chars().count() >= self.settings.min_token_len)
            .filter(|fragment| !self.stop_words.contains(*fragment))
            .map(|fragment| self.stem(fragment))
            .collect()
    }

    /// Reduce a single lower-cased word to its stem.
    pub fn stem(&self, word: &str) -> String {
        self.stemmer.stem(word).into_owned()
    }
}

impl Default for Tokenizer {
    fn default() -> Self {
        Self::new(TokenizerSettings::default())
    }
}

impl Clone for Tokenizer {
    fn clone(&self) -> Self {
        Self::new(self.settings)
    }
}

impl fmt::Debug for Tokenizer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Tokenizer")
            .field("settings", &self.settings)
            .field("stop_words", &self.stop_words.len())
            .finish()
    }
}
