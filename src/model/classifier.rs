// Bernoulli Naive Bayes scoring.
//
// For each class c:
//
//   score(c) = log P(c) + sum_i [ x_i * log p_ic + (1 - x_i) * log(1 - p_ic) ]
//
// Rewritten as a baseline (every feature absent) plus a per-feature delta for
// each present feature, so scoring a sparse vector only touches its active
// indices:
//
//   score(c) = [log P(c) + sum_i log(1 - p_ic)] + sum_{x_i = 1} [log p_ic - log(1 - p_ic)]

use std::array;

use super::sentiment::{Sentiment, NUM_CLASSES};
use super::trainer::ModelParameters;
use crate::error::{CriticError, Result};
use crate::text::vectorizer::FeatureVector;

/// The outcome of scoring one feature vector.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Prediction {
    pub sentiment: Sentiment,
    /// Unnormalized joint log-likelihood per class, indexed by `Sentiment::index`
    pub log_scores: [f64; NUM_CLASSES],
}

impl Prediction {
    /// Posterior probability of the positive class (two-class softmax).
    pub fn positive_probability(&self) -> f64 {
        let neg = self.log_scores[Sentiment::Negative.index()];
        let pos = self.log_scores[Sentiment::Positive.index()];
        let max = neg.max(pos);
        if max == f64::NEG_INFINITY {
            return 0.5;
        }
        let e_neg = (neg - max).exp();
        let e_pos = (pos - max).exp();
        e_pos / (e_neg + e_pos)
    }

    /// Probability assigned to the predicted class.
    pub fn confidence(&self) -> f64 {
        match self.sentiment {
            Sentiment::Positive => self.positive_probability(),
            Sentiment::Negative => 1.0 - self.positive_probability(),
        }
    }

    /// Log-odds of positive over negative.
    pub fn margin(&self) -> f64 {
        self.log_scores[Sentiment::Positive.index()] - self.log_scores[Sentiment::Negative.index()]
    }
}

/// Read-only scorer built from fitted parameters.
#[derive(Debug, Clone)]
pub struct Classifier {
    feature_dimension: usize,
    baseline: [f64; NUM_CLASSES],
    delta: [Vec<f64>; NUM_CLASSES],
}

impl Classifier {
    pub fn new(params: &ModelParameters) -> Self {
        let mut baseline = [0.0; NUM_CLASSES];
        let delta = array::from_fn(|c| {
            let class = Sentiment::ALL[c];
            let mut absent_sum = 0.0;
            let delta: Vec<f64> = params
                .feature_log_probs(class)
                .iter()
                .map(|&log_p| {
                    let log_not_p = ln_one_minus_exp(log_p);
                    absent_sum += log_not_p;
                    log_p - log_not_p
                })
                .collect();
            baseline[c] = params.log_prior(class) + absent_sum;
            delta
        });

        Self {
            feature_dimension: params.feature_dimension(),
            baseline,
            delta,
        }
    }

    pub fn feature_dimension(&self) -> usize {
        self.feature_dimension
    }

    /// Score every class and pick the larger. Ties go to `Negative`.
    pub fn predict(&self, vector: &FeatureVector) -> Result<Prediction> {
        if vector.len() != self.feature_dimension {
            return Err(CriticError::dimension(
                "query vector",
                self.feature_dimension,
                vector.len(),
            ));
        }

        let log_scores: [f64; NUM_CLASSES] = array::from_fn(|c| {
            self.baseline[c] + vector.active().iter().map(|&i| self.delta[c][i]).sum::<f64>()
        });

        let sentiment = if log_scores[Sentiment::Positive.index()]
            > log_scores[Sentiment::Negative.index()]
        {
            Sentiment::Positive
        } else {
            Sentiment::Negative
        };

        Ok(Prediction {
            sentiment,
            log_scores,
        })
    }
}

/// `ln(1 - e^x)` for x < 0, accurate near both ends.
fn ln_one_minus_exp(x: f64) -> f64 {
    if x > -std::f64::consts::LN_2 {
        (-x.exp_m1()).ln()
    } else {
        (-x.exp()).ln_1p()
    }
}
