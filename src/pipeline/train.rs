// Training pipeline: labeled documents → vocabulary → parameters → model.
//
// An explicit call with no hidden state; the caller decides whether to
// persist the returned model.

use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::info;

use crate::corpus::Document;
use crate::model::sentiment::Sentiment;
use crate::model::trainer::{Trainer, DEFAULT_ALPHA};
use crate::model::TrainedModel;
use crate::text::tokenizer::TokenizerSettings;
use crate::text::vectorizer::Vectorizer;

/// Default minimum document frequency for vocabulary pruning.
pub const DEFAULT_MIN_DOC_FREQUENCY: usize = 3;

/// Hyperparameters for a training run.
#[derive(Debug, Clone, Copy)]
pub struct TrainOptions {
    pub tokenizer: TokenizerSettings,
    /// Stems found in fewer documents than this are left out of the vocabulary
    pub min_doc_frequency: usize,
    /// Additive smoothing constant
    pub alpha: f64,
    /// Show a spinner on the terminal while vectorizing
    pub show_progress: bool,
}

impl Default for TrainOptions {
    fn default() -> Self {
        Self {
            tokenizer: TokenizerSettings::default(),
            min_doc_frequency: DEFAULT_MIN_DOC_FREQUENCY,
            alpha: DEFAULT_ALPHA,
            show_progress: false,
        }
    }
}

/// Train a model from labeled documents. Every document must carry a label.
pub fn train(documents: &[Document], options: &TrainOptions) -> Result<TrainedModel> {
    let labels: Vec<Sentiment> = documents
        .iter()
        .map(|d| {
            d.label
                .with_context(|| format!("training document {} has no label", d.display_name()))
        })
        .collect::<Result<_>>()?;

    let trainer = Trainer::new(options.alpha)?;
    let vectorizer = Vectorizer::new(options.tokenizer, options.min_doc_frequency);

    info!(documents = documents.len(), "Extracting binary term features");
    let started = Instant::now();
    let spinner = spinner("Vectorizing", options.show_progress);
    let texts: Vec<&str> = documents.iter().map(|d| d.text.as_str()).collect();
    let (vocabulary, vectors) = vectorizer.fit_transform(&texts);
    spinner.finish_and_clear();
    info!(
        elapsed_secs = started.elapsed().as_secs_f64(),
        "Vectorized training corpus"
    );

    let examples: Vec<_> = vectors.into_iter().zip(labels).collect();
    let parameters = trainer.fit(&examples)?;

    Ok(TrainedModel::new(vocabulary, parameters)?)
}

fn spinner(message: &'static str, show: bool) -> ProgressBar {
    if !show {
        return ProgressBar::hidden();
    }
    let pb = ProgressBar::new_spinner();
    pb.set_style(
        ProgressStyle::default_spinner()
            .template("  {spinner} {msg} ({elapsed})")
            .expect("valid template"),
    );
    pb.set_message(message);
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}
