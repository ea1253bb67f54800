use std::env;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};

use crate::model::store::ModelStore;
use crate::model::trainer::DEFAULT_ALPHA;
use crate::pipeline::train::{TrainOptions, DEFAULT_MIN_DOC_FREQUENCY};
use crate::text::tokenizer::TokenizerSettings;

/// Central configuration loaded from environment variables.
///
/// The .env file is loaded automatically at startup via dotenvy. CLI flags
/// override whatever is set here.
#[derive(Debug, Clone)]
pub struct Config {
    /// Where the vocabulary and parameter artifacts live (CRITIC_MODEL_DIR)
    pub model_dir: PathBuf,
    /// Minimum document frequency for a stem to enter the vocabulary (CRITIC_MIN_DF)
    pub min_doc_frequency: usize,
    /// Additive smoothing constant (CRITIC_ALPHA)
    pub alpha: f64,
    /// Drop English stop words during tokenization (CRITIC_STOP_WORDS)
    pub remove_stop_words: bool,
}

/// Returns the default directory for storing model artifacts.
/// Uses the platform data directory: ~/.local/share/critic/models/ on Linux.
pub fn default_model_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("critic")
        .join("models")
}

impl Config {
    /// Load configuration from the process environment.
    pub fn load() -> Result<Self> {
        Self::from_lookup(|name| env::var(name).ok())
    }

    /// Load configuration through an arbitrary variable lookup.
    ///
    /// Unset variables fall back to defaults; set-but-malformed ones are errors.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let min_doc_frequency = parse_var(&lookup, "CRITIC_MIN_DF")?
            .unwrap_or(DEFAULT_MIN_DOC_FREQUENCY);

        let alpha = parse_var(&lookup, "CRITIC_ALPHA")?.unwrap_or(DEFAULT_ALPHA);
        if !(alpha.is_finite() && alpha > 0.0) {
            anyhow::bail!("CRITIC_ALPHA must be a positive number, got {alpha}");
        }

        let remove_stop_words = match lookup("CRITIC_STOP_WORDS").as_deref() {
            None | Some("") | Some("0") | Some("false") => false,
            Some("1") | Some("true") => true,
            Some(other) => anyhow::bail!("CRITIC_STOP_WORDS must be true or false, got {other:?}"),
        };

        Ok(Self {
            model_dir: lookup("CRITIC_MODEL_DIR")
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or_else(default_model_dir),
            min_doc_frequency,
            alpha,
            remove_stop_words,
        })
    }

    pub fn store(&self) -> ModelStore {
        ModelStore::new(&self.model_dir)
    }

    /// The model store, provided a trained model has been saved there.
    /// Call this before any command that needs to classify text.
    pub fn require_model(&self) -> Result<ModelStore> {
        let store = self.store();
        if !store.exists() {
            anyhow::bail!(
                "No trained model found in {}\n\
                 Run `critic train --positive-dir <DIR> --negative-dir <DIR>` first.",
                self.model_dir.display()
            );
        }
        Ok(store)
    }

    pub fn train_options(&self) -> TrainOptions {
        TrainOptions {
            tokenizer: TokenizerSettings {
                remove_stop_words: self.remove_stop_words,
                ..TokenizerSettings::default()
            },
            min_doc_frequency: self.min_doc_frequency,
            alpha: self.alpha,
            show_progress: false,
        }
    }
}

fn parse_var<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match lookup(name) {
        None => Ok(None),
        Some(raw) if raw.trim().is_empty() => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .with_context(|| format!("{name} is not a valid value: {raw:?}")),
    }
}
