// Model store tests — persistence round-trips and artifact validation.
//
// Each test works in its own directory under the system temp dir and removes
// it afterwards.

use std::fs;
use std::path::PathBuf;

use critic::error::{ArtifactDefect, CriticError};
use critic::model::sentiment::Sentiment;
use critic::model::store::{ModelStore, PARAMETERS_FILE, VOCABULARY_FILE};
use critic::model::trainer::Trainer;
use critic::model::TrainedModel;
use critic::text::tokenizer::TokenizerSettings;
use critic::text::vectorizer::Vectorizer;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("critic-store-{name}-{}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    dir
}

/// A model whose vocabulary has exactly `size` stems (tok0, tok1, ...).
fn model_with_vocabulary(size: usize) -> TrainedModel {
    let positive: Vec<String> = (0..size).map(|i| format!("tok{i}")).collect();
    let negative: Vec<String> = (0..size).step_by(2).map(|i| format!("tok{i}")).collect();
    let docs = [positive.join(" "), negative.join(" ")];

    let vectorizer = Vectorizer::new(TokenizerSettings::default(), 1);
    let (vocabulary, vectors) = vectorizer.fit_transform(&docs);
    let examples: Vec<_> = vectors
        .into_iter()
        .zip([Sentiment::Positive, Sentiment::Negative])
        .collect();
    let params = Trainer::new(0.5).unwrap().fit(&examples).unwrap();
    TrainedModel::new(vocabulary, params).unwrap()
}

// ============================================================
// Round trip
// ============================================================

#[test]
fn save_then_load_round_trips() {
    let dir = scratch_dir("round-trip");
    let store = ModelStore::new(&dir);
    let model = model_with_vocabulary(12);

    store.save(&model).unwrap();
    assert!(store.exists());
    let loaded = store.load().unwrap();

    assert_eq!(loaded.vocabulary(), model.vocabulary());
    assert_eq!(loaded.trained_at(), model.trained_at());

    let (a, b) = (model.parameters(), loaded.parameters());
    assert_eq!(a.feature_dimension(), b.feature_dimension());
    assert_eq!(a.alpha(), b.alpha());
    assert_eq!(a.class_counts(), b.class_counts());
    for class in Sentiment::ALL {
        assert!((a.prior(class) - b.prior(class)).abs() < 1e-12);
        for (x, y) in a.feature_log_probs(class).iter().zip(b.feature_log_probs(class)) {
            assert!((x - y).abs() < 1e-12);
        }
    }

    let text = "tok1 tok3 tok5";
    let before = model.predict_text(text).unwrap();
    let after = loaded.predict_text(text).unwrap();
    assert_eq!(before.sentiment, after.sentiment);
    assert!((before.margin() - after.margin()).abs() < 1e-9);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn artifacts_load_independently() {
    let dir = scratch_dir("independent");
    let store = ModelStore::new(&dir);
    let model = model_with_vocabulary(8);
    store.save(&model).unwrap();

    fs::remove_file(store.parameters_path()).unwrap();
    let vocabulary = store.load_vocabulary().unwrap();
    assert_eq!(&vocabulary.value, model.vocabulary());
    assert_eq!(vocabulary.trained_at, model.trained_at());

    // Without the parameters the pair can't be loaded
    let err = store.load().unwrap_err();
    assert!(matches!(err, CriticError::ModelNotFound { .. }));

    store.save(&model).unwrap();
    fs::remove_file(store.vocabulary_path()).unwrap();
    let params = store.load_parameters().unwrap();
    assert_eq!(params.value.feature_dimension(), 8);

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn empty_vocabulary_model_round_trips() {
    let dir = scratch_dir("empty-vocab");
    let store = ModelStore::new(&dir);

    let vectorizer = Vectorizer::new(TokenizerSettings::default(), 5);
    let (vocabulary, vectors) = vectorizer.fit_transform(&["only once", "never again"]);
    assert!(vocabulary.is_empty());
    let examples: Vec<_> = vectors
        .into_iter()
        .zip([Sentiment::Positive, Sentiment::Negative])
        .collect();
    let model = TrainedModel::new(vocabulary, Trainer::default().fit(&examples).unwrap()).unwrap();

    store.save(&model).unwrap();
    let loaded = store.load().unwrap();
    assert!(loaded.vocabulary().is_empty());
    assert_eq!(
        loaded.predict_text("anything").unwrap().sentiment,
        Sentiment::Negative
    );

    fs::remove_dir_all(&dir).unwrap();
}

// ============================================================
// Validation on load
// ============================================================

#[test]
fn mismatched_artifacts_fail_before_prediction() {
    let small_dir = scratch_dir("mismatch-40");
    let large_dir = scratch_dir("mismatch-50");
    let small = ModelStore::new(&small_dir);
    let large = ModelStore::new(&large_dir);

    small.save(&model_with_vocabulary(40)).unwrap();
    large.save(&model_with_vocabulary(50)).unwrap();

    // Pair the 40-stem vocabulary with 50-feature parameters
    fs::copy(large.parameters_path(), small.parameters_path()).unwrap();

    let err = small.load().unwrap_err();
    assert!(
        matches!(
            err,
            CriticError::DimensionMismatch {
                expected: 40,
                found: 50,
                ..
            }
        ),
        "got {err:?}"
    );

    fs::remove_dir_all(&small_dir).unwrap();
    fs::remove_dir_all(&large_dir).unwrap();
}

#[test]
fn unknown_format_version_is_reported() {
    let dir = scratch_dir("version");
    let store = ModelStore::new(&dir);
    store.save(&model_with_vocabulary(4)).unwrap();

    let path = dir.join(VOCABULARY_FILE);
    let json = fs::read_to_string(&path).unwrap();
    let mut value: serde_json::Value = serde_json::from_str(&json).unwrap();
    value["format_version"] = serde_json::json!(99);
    fs::write(&path, value.to_string()).unwrap();

    let err = store.load_vocabulary().unwrap_err();
    assert!(matches!(
        err,
        CriticError::UnsupportedFormat { found: 99, .. }
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn duplicate_stems_are_corrupt() {
    let dir = scratch_dir("duplicates");
    let store = ModelStore::new(&dir);
    store.save(&model_with_vocabulary(4)).unwrap();

    let path = dir.join(VOCABULARY_FILE);
    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    value["stems"] = serde_json::json!(["tok0", "tok1", "tok1", "tok3"]);
    fs::write(&path, value.to_string()).unwrap();

    let err = store.load_vocabulary().unwrap_err();
    assert!(matches!(
        err,
        CriticError::CorruptArtifact {
            defect: ArtifactDefect::DuplicateStem(_),
            ..
        }
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn swapped_artifacts_are_corrupt() {
    let dir = scratch_dir("swapped");
    let store = ModelStore::new(&dir);
    store.save(&model_with_vocabulary(4)).unwrap();

    fs::copy(dir.join(PARAMETERS_FILE), dir.join(VOCABULARY_FILE)).unwrap();
    let err = store.load_vocabulary().unwrap_err();
    assert!(matches!(
        err,
        CriticError::CorruptArtifact {
            defect: ArtifactDefect::WrongKind { .. },
            ..
        }
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn truncated_parameters_are_corrupt() {
    let dir = scratch_dir("truncated");
    let store = ModelStore::new(&dir);
    store.save(&model_with_vocabulary(4)).unwrap();

    let path = dir.join(PARAMETERS_FILE);
    let json = fs::read_to_string(&path).unwrap();
    fs::write(&path, &json[..json.len() / 2]).unwrap();

    let err = store.load_parameters().unwrap_err();
    assert!(matches!(
        err,
        CriticError::CorruptArtifact {
            defect: ArtifactDefect::Malformed(_),
            ..
        }
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn parameters_with_short_probability_row_are_corrupt() {
    let dir = scratch_dir("short-row");
    let store = ModelStore::new(&dir);
    store.save(&model_with_vocabulary(4)).unwrap();

    let path = dir.join(PARAMETERS_FILE);
    let mut value: serde_json::Value =
        serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    value["feature_log_prob"]["negative"] = serde_json::json!([-0.5, -0.5]);
    fs::write(&path, value.to_string()).unwrap();

    let err = store.load_parameters().unwrap_err();
    assert!(matches!(
        err,
        CriticError::CorruptArtifact {
            defect: ArtifactDefect::FeatureCount {
                class: Sentiment::Negative,
                expected: 4,
                found: 2,
            },
            ..
        }
    ));

    fs::remove_dir_all(&dir).unwrap();
}
