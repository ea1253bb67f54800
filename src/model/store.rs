// Model store — persists a trained model as two JSON artifacts.
//
//   <dir>/vocabulary.json  — ordered stem list (index = position) plus the
//                            tokenizer settings it was fitted with
//   <dir>/parameters.json  — priors and per-feature log probabilities, with
//                            the feature dimension recorded explicitly
//
// Each artifact carries its own format version and the training timestamp, so
// either can be loaded on its own. Loading both cross-checks the feature
// dimension before a `TrainedModel` is handed out.

use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use super::sentiment::{Sentiment, NUM_CLASSES};
use super::trainer::ModelParameters;
use super::TrainedModel;
use crate::error::{ArtifactDefect, CriticError, Result};
use crate::text::tokenizer::TokenizerSettings;
use crate::text::vectorizer::Vocabulary;

pub const FORMAT_VERSION: u32 = 1;
pub const VOCABULARY_FILE: &str = "vocabulary.json";
pub const PARAMETERS_FILE: &str = "parameters.json";

const VOCABULARY_KIND: &str = "vocabulary";
const PARAMETERS_KIND: &str = "parameters";

/// Fields every artifact starts with; read first so an unknown version is
/// reported as such instead of as a parse failure.
#[derive(Deserialize)]
struct ArtifactHeader {
    format_version: u32,
    kind: String,
}

#[derive(Serialize, Deserialize)]
struct VocabularyArtifact {
    format_version: u32,
    kind: String,
    trained_at: DateTime<Utc>,
    tokenizer: TokenizerSettings,
    min_doc_frequency: usize,
    document_count: usize,
    size: usize,
    stems: Vec<String>,
}

#[derive(Serialize, Deserialize)]
struct ParametersArtifact {
    format_version: u32,
    kind: String,
    trained_at: DateTime<Utc>,
    feature_dimension: usize,
    alpha: f64,
    class_counts: ClassPair<u64>,
    class_prior: ClassPair<f64>,
    feature_log_prob: ClassPair<Vec<f64>>,
}

/// Per-class values keyed by name rather than position in the JSON.
#[derive(Serialize, Deserialize)]
struct ClassPair<T> {
    negative: T,
    positive: T,
}

impl<T> ClassPair<T> {
    fn from_array([negative, positive]: [T; NUM_CLASSES]) -> Self {
        Self { negative, positive }
    }

    fn into_array(self) -> [T; NUM_CLASSES] {
        [self.negative, self.positive]
    }
}

/// A value loaded from the store together with its training timestamp.
#[derive(Debug, Clone)]
pub struct Stored<T> {
    pub value: T,
    pub trained_at: DateTime<Utc>,
}

/// Directory-backed persistence for trained models.
#[derive(Debug, Clone)]
pub struct ModelStore {
    dir: PathBuf,
}

impl ModelStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn vocabulary_path(&self) -> PathBuf {
        self.dir.join(VOCABULARY_FILE)
    }

    pub fn parameters_path(&self) -> PathBuf {
        self.dir.join(PARAMETERS_FILE)
    }

    /// True when both artifacts are present.
    pub fn exists(&self) -> bool {
        self.vocabulary_path().exists() && self.parameters_path().exists()
    }

    /// Write both artifacts, replacing any previous model.
    pub fn save(&self, model: &TrainedModel) -> Result<()> {
        fs::create_dir_all(&self.dir)?;

        let vocabulary = model.vocabulary();
        let vocab_artifact = VocabularyArtifact {
            format_version: FORMAT_VERSION,
            kind: VOCABULARY_KIND.to_string(),
            trained_at: model.trained_at(),
            tokenizer: vocabulary.settings(),
            min_doc_frequency: vocabulary.min_doc_frequency(),
            document_count: vocabulary.document_count(),
            size: vocabulary.len(),
            stems: vocabulary.terms().to_vec(),
        };

        let params = model.parameters();
        let params_artifact = ParametersArtifact {
            format_version: FORMAT_VERSION,
            kind: PARAMETERS_KIND.to_string(),
            trained_at: model.trained_at(),
            feature_dimension: params.feature_dimension(),
            alpha: params.alpha(),
            class_counts: ClassPair::from_array(params.class_counts()),
            class_prior: ClassPair::from_array(Sentiment::ALL.map(|c| params.prior(c))),
            feature_log_prob: ClassPair::from_array(
                Sentiment::ALL.map(|c| params.feature_log_probs(c).to_vec()),
            ),
        };

        write_atomic(&self.vocabulary_path(), &vocab_artifact)?;
        write_atomic(&self.parameters_path(), &params_artifact)?;

        info!(
            dir = %self.dir.display(),
            vocabulary = vocabulary.len(),
            "Saved trained model"
        );
        Ok(())
    }

    /// Load the vocabulary artifact on its own.
    pub fn load_vocabulary(&self) -> Result<Stored<Vocabulary>> {
        let path = self.vocabulary_path();
        let artifact: VocabularyArtifact = read_artifact(&path, VOCABULARY_KIND)?;

        if artifact.size != artifact.stems.len() {
            return Err(CriticError::CorruptArtifact {
                path,
                defect: ArtifactDefect::SizeMismatch {
                    declared: artifact.size,
                    listed: artifact.stems.len(),
                },
            });
        }

        let vocabulary = Vocabulary::from_terms(
            artifact.stems,
            artifact.tokenizer,
            artifact.min_doc_frequency,
            artifact.document_count,
        )
        .map_err(|defect| CriticError::CorruptArtifact { path, defect })?;

        Ok(Stored {
            value: vocabulary,
            trained_at: artifact.trained_at,
        })
    }

    /// Load the parameters artifact on its own.
    pub fn load_parameters(&self) -> Result<Stored<ModelParameters>> {
        let path = self.parameters_path();
        let artifact: ParametersArtifact = read_artifact(&path, PARAMETERS_KIND)?;

        let parameters = ModelParameters::from_parts(
            artifact.feature_dimension,
            artifact.alpha,
            artifact.class_counts.into_array(),
            artifact.class_prior.into_array(),
            artifact.feature_log_prob.into_array(),
        )
        .map_err(|defect| CriticError::CorruptArtifact { path, defect })?;

        Ok(Stored {
            value: parameters,
            trained_at: artifact.trained_at,
        })
    }

    /// Load both artifacts and pair them. Fails with `DimensionMismatch` if
    /// the parameters were fitted against a different-sized vocabulary.
    pub fn load(&self) -> Result<TrainedModel> {
        let vocabulary = self.load_vocabulary()?;
        let parameters = self.load_parameters()?;

        if vocabulary.trained_at != parameters.trained_at {
            warn!(
                vocabulary_trained_at = %vocabulary.trained_at,
                parameters_trained_at = %parameters.trained_at,
                "Vocabulary and parameters come from different training runs"
            );
        }

        let model = TrainedModel::with_timestamp(
            vocabulary.value,
            parameters.value,
            parameters.trained_at,
        )?;

        info!(
            dir = %self.dir.display(),
            vocabulary = model.vocabulary().len(),
            trained_at = %model.trained_at(),
            "Loaded trained model"
        );
        Ok(model)
    }
}

fn read_artifact<T: DeserializeOwned>(path: &Path, expected_kind: &'static str) -> Result<T> {
    let json = match fs::read_to_string(path) {
        Ok(json) => json,
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            return Err(CriticError::ModelNotFound {
                path: path.to_path_buf(),
            })
        }
        Err(e) => return Err(e.into()),
    };

    let corrupt = |defect: ArtifactDefect| CriticError::CorruptArtifact {
        path: path.to_path_buf(),
        defect,
    };

    let header: ArtifactHeader = serde_json::from_str(&json).map_err(|e| corrupt(e.into()))?;
    if header.format_version != FORMAT_VERSION {
        return Err(CriticError::UnsupportedFormat {
            path: path.to_path_buf(),
            found: header.format_version,
            expected: FORMAT_VERSION,
        });
    }
    if header.kind != expected_kind {
        return Err(corrupt(ArtifactDefect::WrongKind {
            expected: expected_kind,
            found: header.kind,
        }));
    }

    serde_json::from_str(&json).map_err(|e| corrupt(e.into()))
}

/// Write to a sibling temp file and rename over the target, so readers never
/// see a half-written artifact.
fn write_atomic<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let tmp = path.with_extension("json.tmp");
    {
        let mut writer = BufWriter::new(File::create(&tmp)?);
        serde_json::to_writer(&mut writer, value)?;
        writer.flush()?;
    }
    fs::rename(&tmp, path)?;
    Ok(())
}
