// Bernoulli Naive Bayes trainer.
//
// Each feature is modeled as an independent present/absent event per class:
//
//   P(c)           = count(label == c) / total
//   P(f_i = 1 | c) = (count(label == c and f_i = 1) + alpha) / (count(label == c) + 2 * alpha)
//
// The 2 * alpha denominator covers both outcomes of a Bernoulli feature, so no
// conditional probability is ever exactly 0 or 1. Conditionals are kept as
// natural logs; the classifier sums them instead of multiplying.

use std::array;

use tracing::info;

use super::sentiment::{Sentiment, NUM_CLASSES};
use crate::error::{ArtifactDefect, CriticError, Result};
use crate::text::vectorizer::FeatureVector;

pub const DEFAULT_ALPHA: f64 = 1.0;

/// Fitted model parameters. Immutable once built.
#[derive(Debug, Clone, PartialEq)]
pub struct ModelParameters {
    feature_dimension: usize,
    alpha: f64,
    class_counts: [u64; NUM_CLASSES],
    class_prior: [f64; NUM_CLASSES],
    class_log_prior: [f64; NUM_CLASSES],
    feature_log_prob: [Vec<f64>; NUM_CLASSES],
}

impl ModelParameters {
    /// Reassemble parameters from their persisted parts, checking that the
    /// pieces agree with each other.
    pub fn from_parts(
        feature_dimension: usize,
        alpha: f64,
        class_counts: [u64; NUM_CLASSES],
        class_prior: [f64; NUM_CLASSES],
        feature_log_prob: [Vec<f64>; NUM_CLASSES],
    ) -> std::result::Result<Self, ArtifactDefect> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(ArtifactDefect::InvalidSmoothing(alpha));
        }
        for (class, probs) in Sentiment::ALL.into_iter().zip(&feature_log_prob) {
            if probs.len() != feature_dimension {
                return Err(ArtifactDefect::FeatureCount {
                    class,
                    expected: feature_dimension,
                    found: probs.len(),
                });
            }
            if let Some(&value) = probs.iter().find(|p| !(p.is_finite() && **p < 0.0)) {
                return Err(ArtifactDefect::LogProbability { class, value });
            }
        }
        if let Some(&bad) = class_prior.iter().find(|p| !(0.0..=1.0).contains(*p)) {
            return Err(ArtifactDefect::PriorOutOfRange(bad));
        }
        let prior_sum: f64 = class_prior.iter().sum();
        if (prior_sum - 1.0).abs() > 1e-9 {
            return Err(ArtifactDefect::PriorSum(prior_sum));
        }

        Ok(Self {
            feature_dimension,
            alpha,
            class_counts,
            class_prior,
            class_log_prior: class_prior.map(f64::ln),
            feature_log_prob,
        })
    }

    pub fn feature_dimension(&self) -> usize {
        self.feature_dimension
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Training examples seen per class, indexed by `Sentiment::index`.
    pub fn class_counts(&self) -> [u64; NUM_CLASSES] {
        self.class_counts
    }

    pub fn prior(&self, class: Sentiment) -> f64 {
        self.class_prior[class.index()]
    }

    /// `log P(class)`; negative infinity for a class with no training examples.
    pub fn log_prior(&self, class: Sentiment) -> f64 {
        self.class_log_prior[class.index()]
    }

    /// `log P(f_i = 1 | class)` for every feature, in vocabulary order.
    pub fn feature_log_probs(&self, class: Sentiment) -> &[f64] {
        &self.feature_log_prob[class.index()]
    }

    /// `P(f_i = 1 | class)`, or `None` if `index` is outside the model.
    pub fn feature_prob(&self, class: Sentiment, index: usize) -> Option<f64> {
        self.feature_log_prob[class.index()]
            .get(index)
            .map(|lp| lp.exp())
    }

    /// The `n` features whose presence shifts the verdict the most, as
    /// `(index, log P(f=1|positive) - log P(f=1|negative))`. Positive values
    /// lean positive. Ordered by magnitude, then by index.
    pub fn most_informative(&self, n: usize) -> Vec<(usize, f64)> {
        let pos = self.feature_log_probs(Sentiment::Positive);
        let neg = self.feature_log_probs(Sentiment::Negative);
        let mut ranked: Vec<(usize, f64)> = pos
            .iter()
            .zip(neg)
            .map(|(p, q)| p - q)
            .enumerate()
            .collect();
        ranked.sort_by(|a, b| {
            b.1.abs()
                .partial_cmp(&a.1.abs())
                .unwrap_or(std::cmp::Ordering::Equal)
                .then(a.0.cmp(&b.0))
        });
        ranked.truncate(n);
        ranked
    }
}

/// Fits `ModelParameters` from labeled feature vectors.
#[derive(Debug, Clone, Copy)]
pub struct Trainer {
    alpha: f64,
}

impl Trainer {
    pub fn new(alpha: f64) -> Result<Self> {
        if !(alpha.is_finite() && alpha > 0.0) {
            return Err(CriticError::InvalidSmoothing(alpha));
        }
        Ok(Self { alpha })
    }

    pub fn alpha(&self) -> f64 {
        self.alpha
    }

    /// Estimate priors and per-feature conditionals.
    ///
    /// Every vector must share the first vector's dimension.
    pub fn fit(&self, examples: &[(FeatureVector, Sentiment)]) -> Result<ModelParameters> {
        let (first, _) = examples.first().ok_or(CriticError::EmptyTrainingSet)?;
        let dimension = first.len();

        let mut class_counts = [0u64; NUM_CLASSES];
        let mut feature_counts: [Vec<u64>; NUM_CLASSES] = array::from_fn(|_| vec![0; dimension]);

        for (vector, label) in examples {
            if vector.len() != dimension {
                return Err(CriticError::dimension(
                    "training vector",
                    dimension,
                    vector.len(),
                ));
            }
            let c = label.index();
            class_counts[c] += 1;
            for &i in vector.active() {
                feature_counts[c][i] += 1;
            }
        }

        let total = examples.len() as f64;
        let class_prior = class_counts.map(|n| n as f64 / total);
        let feature_log_prob = array::from_fn(|c| {
            let denominator = class_counts[c] as f64 + 2.0 * self.alpha;
            feature_counts[c]
                .iter()
                .map(|&n| ((n as f64 + self.alpha) / denominator).ln())
                .collect()
        });

        info!(
            examples = examples.len(),
            features = dimension,
            negative = class_counts[0],
            positive = class_counts[1],
            alpha = self.alpha,
            "Fitted Bernoulli Naive Bayes parameters"
        );

        Ok(ModelParameters {
            feature_dimension: dimension,
            alpha: self.alpha,
            class_counts,
            class_prior,
            class_log_prior: class_prior.map(f64::ln),
            feature_log_prob,
        })
    }
}

impl Default for Trainer {
    fn default() -> Self {
        Self {
            alpha: DEFAULT_ALPHA,
        }
    }
}
