// Stemmed bag-of-words vectorizer.
//
// `fit` learns a vocabulary from a corpus: every stem whose document frequency
// (number of distinct documents containing it) reaches `min_doc_frequency`
// gets a dense index. Indices follow lexicographic stem order, so identical
// inputs always produce an identical vocabulary.
//
// `transform` encodes a document as a binary presence vector over that
// vocabulary. Stems the vocabulary has never seen are ignored.

use std::collections::{BTreeSet, HashMap, HashSet};

use tracing::{debug, info};

use super::tokenizer::{Tokenizer, TokenizerSettings};
use crate::error::{ArtifactDefect, CriticError, Result};

/// Frozen stem → index mapping learned by `Vectorizer::fit`.
#[derive(Debug, Clone, PartialEq)]
pub struct Vocabulary {
    terms: Vec<String>,
    index: HashMap<String, usize>,
    settings: TokenizerSettings,
    min_doc_frequency: usize,
    document_count: usize,
}

impl Vocabulary {
    /// Rebuild a vocabulary from its ordered stem list (index = position).
    ///
    /// Fails if a stem appears twice, since indices must stay one-to-one.
    pub fn from_terms(
        terms: Vec<String>,
        settings: TokenizerSettings,
        min_doc_frequency: usize,
        document_count: usize,
    ) -> std::result::Result<Self, ArtifactDefect> {
        let mut index = HashMap::with_capacity(terms.len());
        for (i, term) in terms.iter().enumerate() {
            if index.insert(term.clone(), i).is_some() {
                return Err(ArtifactDefect::DuplicateStem(term.clone()));
            }
        }

        Ok(Self {
            terms,
            index,
            settings,
            min_doc_frequency,
            document_count,
        })
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn index_of(&self, stem: &str) -> Option<usize> {
        self.index.get(stem).copied()
    }

    pub fn stem_at(&self, index: usize) -> Option<&str> {
        self.terms.get(index).map(String::as_str)
    }

    /// Stems in index order.
    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// `(index, stem)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.terms.iter().enumerate().map(|(i, t)| (i, t.as_str()))
    }

    /// Tokenizer settings the vocabulary was fitted with.
    pub fn settings(&self) -> TokenizerSettings {
        self.settings
    }

    pub fn min_doc_frequency(&self) -> usize {
        self.min_doc_frequency
    }

    /// Number of documents the vocabulary was fitted on.
    pub fn document_count(&self) -> usize {
        self.document_count
    }
}

/// Binary presence vector over a vocabulary.
///
/// Stored sparsely: the feature dimension plus the sorted set of indices
/// whose value is 1. Every other index is 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeatureVector {
    dimension: usize,
    active: Vec<usize>,
}

impl FeatureVector {
    pub fn zeros(dimension: usize) -> Self {
        Self {
            dimension,
            active: Vec::new(),
        }
    }

    /// Build from the indices set to 1. Duplicates collapse; any index
    /// outside `0..dimension` is rejected.
    pub fn from_active(dimension: usize, indices: impl IntoIterator<Item = usize>) -> Result<Self> {
        let active: BTreeSet<usize> = indices.into_iter().collect();
        if let Some(&max) = active.last() {
            if max >= dimension {
                return Err(CriticError::dimension(
                    "feature index",
                    dimension,
                    max.saturating_add(1),
                ));
            }
        }
        Ok(Self {
            dimension,
            active: active.into_iter().collect(),
        })
    }

    /// Build from a dense 0/1 slice. Any non-zero entry counts as present.
    pub fn from_dense(values: &[u8]) -> Self {
        Self {
            dimension: values.len(),
            active: values
                .iter()
                .enumerate()
                .filter(|(_, v)| **v != 0)
                .map(|(i, _)| i)
                .collect(),
        }
    }

    /// Feature dimension (always equals the vocabulary size it was built with).
    pub fn len(&self) -> usize {
        self.dimension
    }

    pub fn is_empty(&self) -> bool {
        self.dimension == 0
    }

    pub fn get(&self, index: usize) -> Option<u8> {
        if index >= self.dimension {
            return None;
        }
        Some(u8::from(self.active.binary_search(&index).is_ok()))
    }

    /// Sorted indices whose value is 1.
    pub fn active(&self) -> &[usize] {
        &self.active
    }

    pub fn count_ones(&self) -> usize {
        self.active.len()
    }

    pub fn to_dense(&self) -> Vec<u8> {
        let mut dense = vec![0u8; self.dimension];
        for &i in &self.active {
            dense[i] = 1;
        }
        dense
    }
}

/// Learns a vocabulary and encodes documents against it.
///
/// Owns its tokenizer; the vocabulary records the tokenizer settings so the
/// inference side can rebuild an identical vectorizer with `for_vocabulary`.
#[derive(Debug, Clone)]
pub struct Vectorizer {
    tokenizer: Tokenizer,
    min_doc_frequency: usize,
}

impl Vectorizer {
    pub fn new(settings: TokenizerSettings, min_doc_frequency: usize) -> Self {
        Self {
            tokenizer: Tokenizer::new(settings),
            min_doc_frequency: min_doc_frequency.max(1),
        }
    }

    /// A vectorizer that tokenizes the same way `vocabulary` was fitted.
    pub fn for_vocabulary(vocabulary: &Vocabulary) -> Self {
        Self::new(vocabulary.settings(), vocabulary.min_doc_frequency())
    }

    pub fn tokenizer(&self) -> &Tokenizer {
        &self.tokenizer
    }

    pub fn min_doc_frequency(&self) -> usize {
        self.min_doc_frequency
    }

    /// Learn a vocabulary from `documents`.
    pub fn fit<S: AsRef<str>>(&self, documents: &[S]) -> Vocabulary {
        let stem_sets = self.stem_sets(documents);
        self.vocabulary_from(&stem_sets)
    }

    /// Encode a document. Empty text gives the all-zero vector.
    pub fn transform(&self, document: &str, vocabulary: &Vocabulary) -> FeatureVector {
        let stems: HashSet<String> = self.tokenizer.tokenize(document).into_iter().collect();
        encode(&stems, vocabulary)
    }

    /// `fit` followed by `transform` on every training document, tokenizing
    /// each document only once.
    pub fn fit_transform<S: AsRef<str>>(&self, documents: &[S]) -> (Vocabulary, Vec<FeatureVector>) {
        let stem_sets = self.stem_sets(documents);
        let vocabulary = self.vocabulary_from(&stem_sets);
        let vectors = stem_sets
            .iter()
            .map(|stems| encode(stems, &vocabulary))
            .collect();
        (vocabulary, vectors)
    }

    fn stem_sets<S: AsRef<str>>(&self, documents: &[S]) -> Vec<HashSet<String>> {
        documents
            .iter()
            .map(|doc| self.tokenizer.tokenize(doc.as_ref()).into_iter().collect())
            .collect()
    }

    fn vocabulary_from(&self, stem_sets: &[HashSet<String>]) -> Vocabulary {
        let mut doc_frequency: HashMap<&str, usize> = HashMap::new();
        for stems in stem_sets {
            for stem in stems {
                *doc_frequency.entry(stem.as_str()).or_insert(0) += 1;
            }
        }

        let distinct = doc_frequency.len();
        let mut terms: Vec<String> = doc_frequency
            .into_iter()
            .filter(|(_, df)| *df >= self.min_doc_frequency)
            .map(|(stem, _)| stem.to_string())
            .collect();
        terms.sort_unstable();

        debug!(
            distinct_stems = distinct,
            pruned = distinct - terms.len(),
            "Applied document-frequency cutoff"
        );
        info!(
            documents = stem_sets.len(),
            vocabulary = terms.len(),
            min_doc_frequency = self.min_doc_frequency,
            "Fitted vocabulary"
        );

        let index = terms
            .iter()
            .enumerate()
            .map(|(i, t)| (t.clone(), i))
            .collect();

        Vocabulary {
            terms,
            index,
            settings: self.tokenizer.settings(),
            min_doc_frequency: self.min_doc_frequency,
            document_count: stem_sets.len(),
        }
    }
}

fn encode(stems: &HashSet<String>, vocabulary: &Vocabulary) -> FeatureVector {
    let mut active: Vec<usize> = stems
        .iter()
        .filter_map(|stem| vocabulary.index_of(stem))
        .collect();
    active.sort_unstable();
    FeatureVector {
        dimension: vocabulary.len(),
        active,
    }
}
