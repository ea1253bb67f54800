// Classification pipeline: score a batch of unlabeled documents.

use anyhow::{Context, Result};

use super::progress_bar;
use crate::corpus::Document;
use crate::model::classifier::Prediction;
use crate::model::sentiment::Sentiment;
use crate::model::TrainedModel;

/// One scored document.
#[derive(Debug, Clone)]
pub struct Classified {
    pub name: String,
    pub prediction: Prediction,
}

/// Per-document verdicts plus how many landed on each side.
#[derive(Debug, Clone, Default)]
pub struct ClassificationReport {
    pub results: Vec<Classified>,
    pub positive: usize,
    pub negative: usize,
}

impl ClassificationReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn count(&self, sentiment: Sentiment) -> usize {
        match sentiment {
            Sentiment::Positive => self.positive,
            Sentiment::Negative => self.negative,
        }
    }
}

/// Classify each document in order.
pub fn classify_documents(
    model: &TrainedModel,
    documents: &[Document],
    show_progress: bool,
) -> Result<ClassificationReport> {
    let pb = progress_bar(documents.len(), "Classifying", show_progress);
    let mut report = ClassificationReport::default();

    for document in documents {
        let prediction = model
            .predict_text(&document.text)
            .with_context(|| format!("failed to classify {}", document.display_name()))?;
        match prediction.sentiment {
            Sentiment::Positive => report.positive += 1,
            Sentiment::Negative => report.negative += 1,
        }
        report.results.push(Classified {
            name: document.display_name(),
            prediction,
        });
        pb.inc(1);
    }
    pb.finish_and_clear();

    Ok(report)
}
