// Unit tests for the Bernoulli Naive Bayes trainer and classifier.
//
// Tests parameter estimation (smoothing, priors), scoring invariants
// (idempotence, prior-only behavior, dimension checks), and the pairing
// check in TrainedModel.

use critic::error::CriticError;
use critic::model::classifier::Classifier;
use critic::model::sentiment::Sentiment;
use critic::model::trainer::Trainer;
use critic::model::TrainedModel;
use critic::text::tokenizer::TokenizerSettings;
use critic::text::vectorizer::{FeatureVector, Vectorizer};

fn v(bits: &[u8]) -> FeatureVector {
    FeatureVector::from_dense(bits)
}

// ============================================================
// Trainer — parameter estimation
// ============================================================

#[test]
fn conditionals_never_hit_zero_or_one() {
    let examples = vec![
        (v(&[1, 1, 0]), Sentiment::Positive),
        (v(&[1, 1, 0]), Sentiment::Positive),
        (v(&[0, 1, 0]), Sentiment::Negative),
    ];
    let params = Trainer::default().fit(&examples).unwrap();
    for class in Sentiment::ALL {
        for i in 0..3 {
            let p = params.feature_prob(class, i).unwrap();
            assert!(p > 0.0 && p < 1.0, "P(f{i}|{class}) = {p}");
        }
    }
}

#[test]
fn smoothing_constant_changes_estimates() {
    let examples = vec![
        (v(&[1]), Sentiment::Positive),
        (v(&[0]), Sentiment::Negative),
    ];
    let laplace = Trainer::new(1.0).unwrap().fit(&examples).unwrap();
    let light = Trainer::new(0.01).unwrap().fit(&examples).unwrap();

    // (1 + a) / (1 + 2a)
    let p1 = laplace.feature_prob(Sentiment::Positive, 0).unwrap();
    let p2 = light.feature_prob(Sentiment::Positive, 0).unwrap();
    assert!((p1 - 2.0 / 3.0).abs() < 1e-12);
    assert!((p2 - 1.01 / 1.02).abs() < 1e-12);
    assert_eq!(laplace.alpha(), 1.0);
}

#[test]
fn feature_dimension_matches_input() {
    let examples = vec![(FeatureVector::zeros(17), Sentiment::Positive)];
    let params = Trainer::default().fit(&examples).unwrap();
    assert_eq!(params.feature_dimension(), 17);
    assert_eq!(params.class_counts(), [0, 1]);
}

#[test]
fn single_class_training_never_predicts_missing_class() {
    let examples = vec![
        (v(&[1, 0]), Sentiment::Positive),
        (v(&[0, 1]), Sentiment::Positive),
    ];
    let params = Trainer::default().fit(&examples).unwrap();
    assert_eq!(params.prior(Sentiment::Negative), 0.0);
    assert_eq!(params.log_prior(Sentiment::Negative), f64::NEG_INFINITY);

    let classifier = Classifier::new(&params);
    for bits in [[0u8, 0], [1, 0], [0, 1], [1, 1]] {
        let prediction = classifier.predict(&v(&bits)).unwrap();
        assert_eq!(prediction.sentiment, Sentiment::Positive);
        assert!((prediction.positive_probability() - 1.0).abs() < 1e-12);
    }
}

#[test]
fn training_accumulation_is_order_independent() {
    let mut examples = vec![
        (v(&[1, 0, 1, 0]), Sentiment::Positive),
        (v(&[1, 1, 0, 0]), Sentiment::Negative),
        (v(&[0, 0, 1, 1]), Sentiment::Positive),
        (v(&[1, 0, 0, 1]), Sentiment::Negative),
        (v(&[0, 1, 1, 0]), Sentiment::Positive),
    ];
    let forward = Trainer::default().fit(&examples).unwrap();
    examples.reverse();
    let backward = Trainer::default().fit(&examples).unwrap();
    assert_eq!(forward, backward);
}

// ============================================================
// Classifier — scoring invariants
// ============================================================

#[test]
fn prediction_is_idempotent() {
    let examples = vec![
        (v(&[1, 0, 1]), Sentiment::Positive),
        (v(&[0, 1, 1]), Sentiment::Negative),
        (v(&[1, 1, 0]), Sentiment::Negative),
    ];
    let params = Trainer::default().fit(&examples).unwrap();
    let classifier = Classifier::new(&params);
    let query = v(&[1, 0, 0]);
    let first = classifier.predict(&query).unwrap();
    let second = classifier.predict(&query).unwrap();
    assert_eq!(first, second);
}

#[test]
fn zero_feature_model_predicts_from_priors() {
    let examples = vec![
        (FeatureVector::zeros(0), Sentiment::Positive),
        (FeatureVector::zeros(0), Sentiment::Positive),
        (FeatureVector::zeros(0), Sentiment::Negative),
    ];
    let params = Trainer::default().fit(&examples).unwrap();
    let prediction = Classifier::new(&params)
        .predict(&FeatureVector::zeros(0))
        .unwrap();
    assert_eq!(prediction.sentiment, Sentiment::Positive);
    assert!((prediction.log_scores[1] - (2.0f64 / 3.0).ln()).abs() < 1e-12);
    assert!((prediction.log_scores[0] - (1.0f64 / 3.0).ln()).abs() < 1e-12);
    assert!((prediction.positive_probability() - 2.0 / 3.0).abs() < 1e-12);
}

#[test]
fn uninformative_features_leave_the_prior_in_charge() {
    // Every feature fires equally often in both classes, so all-zero input
    // is decided by the prior alone
    let examples = vec![
        (v(&[1, 0]), Sentiment::Negative),
        (v(&[0, 1]), Sentiment::Negative),
        (v(&[1, 0]), Sentiment::Negative),
        (v(&[0, 1]), Sentiment::Negative),
        (v(&[1, 0]), Sentiment::Positive),
        (v(&[0, 1]), Sentiment::Positive),
    ];
    let params = Trainer::default().fit(&examples).unwrap();
    let prediction = Classifier::new(&params).predict(&v(&[0, 0])).unwrap();
    assert_eq!(prediction.sentiment, Sentiment::Negative);
}

#[test]
fn query_dimension_must_match_model() {
    let examples = vec![(v(&[1, 0, 1]), Sentiment::Positive)];
    let classifier = Classifier::new(&Trainer::default().fit(&examples).unwrap());
    let err = classifier.predict(&FeatureVector::zeros(4)).unwrap_err();
    assert!(matches!(
        err,
        CriticError::DimensionMismatch {
            expected: 3,
            found: 4,
            ..
        }
    ));
}

#[test]
fn confidence_and_margin_agree_with_verdict() {
    let examples = vec![
        (v(&[1, 0]), Sentiment::Positive),
        (v(&[0, 1]), Sentiment::Negative),
    ];
    let classifier = Classifier::new(&Trainer::default().fit(&examples).unwrap());
    let pos = classifier.predict(&v(&[1, 0])).unwrap();
    let neg = classifier.predict(&v(&[0, 1])).unwrap();
    assert_eq!(pos.sentiment, Sentiment::Positive);
    assert!(pos.margin() > 0.0 && pos.confidence() > 0.5);
    assert_eq!(neg.sentiment, Sentiment::Negative);
    assert!(neg.margin() < 0.0 && neg.confidence() > 0.5);
}

// ============================================================
// TrainedModel — vocabulary / parameter pairing
// ============================================================

#[test]
fn trained_model_rejects_mismatched_pair() {
    let vectorizer = Vectorizer::new(TokenizerSettings::default(), 1);
    let vocabulary = vectorizer.fit(&["great film", "awful film"]);
    assert_eq!(vocabulary.len(), 3);

    let examples = vec![(FeatureVector::zeros(5), Sentiment::Positive)];
    let params = Trainer::default().fit(&examples).unwrap();

    let err = TrainedModel::new(vocabulary, params).unwrap_err();
    assert!(matches!(
        err,
        CriticError::DimensionMismatch {
            expected: 3,
            found: 5,
            ..
        }
    ));
}

#[test]
fn trained_model_predicts_text() {
    let vectorizer = Vectorizer::new(TokenizerSettings::default(), 1);
    let docs = ["a joyful delight", "a dreary slog"];
    let (vocabulary, vectors) = vectorizer.fit_transform(&docs);
    let examples: Vec<_> = vectors
        .into_iter()
        .zip([Sentiment::Positive, Sentiment::Negative])
        .collect();
    let params = Trainer::default().fit(&examples).unwrap();
    let model = TrainedModel::new(vocabulary, params).unwrap();

    assert_eq!(
        model.predict_text("what a delight").unwrap().sentiment,
        Sentiment::Positive
    );
    assert_eq!(
        model.predict_text("such a slog").unwrap().sentiment,
        Sentiment::Negative
    );
}
