// Evaluation pipeline: accuracy against labeled test reviews.
//
// Positive is treated as the "relevant" class for precision and recall.

use anyhow::{Context, Result};
use tracing::info;

use super::progress_bar;
use crate::corpus::Document;
use crate::model::sentiment::Sentiment;
use crate::model::TrainedModel;

/// Confusion counts for a labeled test set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Evaluation {
    pub true_positive: usize,
    pub true_negative: usize,
    pub false_positive: usize,
    pub false_negative: usize,
}

impl Evaluation {
    pub fn record(&mut self, actual: Sentiment, predicted: Sentiment) {
        match (actual, predicted) {
            (Sentiment::Positive, Sentiment::Positive) => self.true_positive += 1,
            (Sentiment::Negative, Sentiment::Negative) => self.true_negative += 1,
            (Sentiment::Negative, Sentiment::Positive) => self.false_positive += 1,
            (Sentiment::Positive, Sentiment::Negative) => self.false_negative += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.true_positive + self.true_negative + self.false_positive + self.false_negative
    }

    pub fn correct(&self) -> usize {
        self.true_positive + self.true_negative
    }

    /// Correctly labeled / total, or 0.0 for an empty test set.
    pub fn accuracy(&self) -> f64 {
        ratio(self.correct(), self.total())
    }

    pub fn precision(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_positive)
    }

    pub fn recall(&self) -> f64 {
        ratio(self.true_positive, self.true_positive + self.false_negative)
    }

    pub fn f1(&self) -> f64 {
        let (p, r) = (self.precision(), self.recall());
        if p + r == 0.0 {
            0.0
        } else {
            2.0 * p * r / (p + r)
        }
    }
}

fn ratio(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}

/// Classify every labeled document and tally the outcomes.
pub fn evaluate(
    model: &TrainedModel,
    documents: &[Document],
    show_progress: bool,
) -> Result<Evaluation> {
    let pb = progress_bar(documents.len(), "Evaluating", show_progress);
    let mut evaluation = Evaluation::default();

    for document in documents {
        let actual = document
            .label
            .with_context(|| format!("test document {} has no label", document.display_name()))?;
        let prediction = model
            .predict_text(&document.text)
            .with_context(|| format!("failed to classify {}", document.display_name()))?;
        evaluation.record(actual, prediction.sentiment);
        pb.inc(1);
    }
    pb.finish_and_clear();

    info!(
        total = evaluation.total(),
        correct = evaluation.correct(),
        accuracy = evaluation.accuracy(),
        "Evaluation complete"
    );
    Ok(evaluation)
}
