// Sentiment model — Bernoulli Naive Bayes over a stemmed vocabulary.
//
// A `TrainedModel` pairs a frozen vocabulary with parameters fitted against
// it. The pairing is checked on construction: the parameters' feature
// dimension must equal the vocabulary size, whether the two came straight out
// of training or were loaded from separate files.

pub mod classifier;
pub mod sentiment;
pub mod store;
pub mod trainer;

use chrono::{DateTime, Utc};

use crate::error::{CriticError, Result};
use crate::text::vectorizer::{FeatureVector, Vectorizer, Vocabulary};
use classifier::{Classifier, Prediction};
use trainer::ModelParameters;

/// A vocabulary and the parameters fitted against it, ready for inference.
#[derive(Debug, Clone)]
pub struct TrainedModel {
    vocabulary: Vocabulary,
    parameters: ModelParameters,
    trained_at: DateTime<Utc>,
    vectorizer: Vectorizer,
    classifier: Classifier,
}

impl TrainedModel {
    /// Pair a vocabulary with parameters, stamped with the current time.
    pub fn new(vocabulary: Vocabulary, parameters: ModelParameters) -> Result<Self> {
        Self::with_timestamp(vocabulary, parameters, Utc::now())
    }

    pub fn with_timestamp(
        vocabulary: Vocabulary,
        parameters: ModelParameters,
        trained_at: DateTime<Utc>,
    ) -> Result<Self> {
        if parameters.feature_dimension() != vocabulary.len() {
            return Err(CriticError::dimension(
                "model parameters vs vocabulary",
                vocabulary.len(),
                parameters.feature_dimension(),
            ));
        }

        let vectorizer = Vectorizer::for_vocabulary(&vocabulary);
        let classifier = Classifier::new(&parameters);

        Ok(Self {
            vocabulary,
            parameters,
            trained_at,
            vectorizer,
            classifier,
        })
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn parameters(&self) -> &ModelParameters {
        &self.parameters
    }

    pub fn trained_at(&self) -> DateTime<Utc> {
        self.trained_at
    }

    /// Encode text against this model's vocabulary.
    pub fn vectorize(&self, text: &str) -> FeatureVector {
        self.vectorizer.transform(text, &self.vocabulary)
    }

    pub fn predict_vector(&self, vector: &FeatureVector) -> Result<Prediction> {
        self.classifier.predict(vector)
    }

    /// Vectorize and classify raw text.
    pub fn predict_text(&self, text: &str) -> Result<Prediction> {
        self.predict_vector(&self.vectorize(text))
    }
}
