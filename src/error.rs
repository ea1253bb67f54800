// Error kinds for the classification core.
//
// The core (tokenizer, vectorizer, trainer, classifier, model store) returns
// these typed errors. The CLI layer wraps them in anyhow with extra context.

use std::path::PathBuf;

use thiserror::Error;

use crate::model::sentiment::Sentiment;

pub type Result<T> = std::result::Result<T, CriticError>;

#[derive(Debug, Error)]
pub enum CriticError {
    /// The trainer was handed zero labeled examples.
    #[error("cannot train on an empty training set")]
    EmptyTrainingSet,

    /// Two things that must share a feature dimension don't.
    #[error("dimension mismatch ({context}): expected {expected}, found {found}")]
    DimensionMismatch {
        context: &'static str,
        expected: usize,
        found: usize,
    },

    /// Inference was requested but no trained model has been saved.
    #[error("no trained model at {}", path.display())]
    ModelNotFound { path: PathBuf },

    #[error("failed to read corpus at {}: {source}", path.display())]
    CorpusReadFailure {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Additive smoothing needs a strictly positive, finite constant.
    #[error("smoothing constant must be positive and finite, got {0}")]
    InvalidSmoothing(f64),

    #[error("corrupt model artifact {}: {defect}", path.display())]
    CorruptArtifact {
        path: PathBuf,
        #[source]
        defect: ArtifactDefect,
    },

    #[error("unsupported artifact format in {}: version {found} (expected {expected})", path.display())]
    UnsupportedFormat {
        path: PathBuf,
        found: u32,
        expected: u32,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// What is wrong with a model artifact that parsed as JSON but can't be used,
/// or didn't parse at all.
#[derive(Debug, Error)]
pub enum ArtifactDefect {
    #[error(transparent)]
    Malformed(#[from] serde_json::Error),

    #[error("expected a {expected} artifact, found {found}")]
    WrongKind { expected: &'static str, found: String },

    #[error("declares {declared} stems but lists {listed}")]
    SizeMismatch { declared: usize, listed: usize },

    #[error("stem {0:?} appears more than once")]
    DuplicateStem(String),

    #[error("smoothing constant {0} is not positive")]
    InvalidSmoothing(f64),

    #[error("{class} class has {found} feature probabilities, expected {expected}")]
    FeatureCount {
        class: Sentiment,
        expected: usize,
        found: usize,
    },

    #[error("{class} class has invalid log probability {value}")]
    LogProbability { class: Sentiment, value: f64 },

    #[error("class prior {0} outside [0, 1]")]
    PriorOutOfRange(f64),

    #[error("class priors sum to {0}")]
    PriorSum(f64),
}

impl CriticError {
    pub(crate) fn dimension(context: &'static str, expected: usize, found: usize) -> Self {
        CriticError::DimensionMismatch {
            context,
            expected,
            found,
        }
    }
}
