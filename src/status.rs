// Model store status display — artifact presence, sizes, and training stamp.

use std::path::Path;

use anyhow::Result;

use crate::model::store::ModelStore;

/// Display model store status to the terminal.
///
/// Each artifact is loaded on its own, so a half-present or mismatched pair
/// is reported rather than treated as an error.
pub fn show(store: &ModelStore) -> Result<()> {
    println!("Model directory: {}", store.dir().display());

    if !store.vocabulary_path().exists() && !store.parameters_path().exists() {
        println!("Model: not trained yet");
        println!("\nRun `critic train --positive-dir <DIR> --negative-dir <DIR>` to build one.");
        return Ok(());
    }

    let vocabulary = match store.load_vocabulary() {
        Ok(stored) => {
            println!(
                "Vocabulary: {} stems from {} reviews, trained {} ({})",
                stored.value.len(),
                stored.value.document_count(),
                stored.trained_at.format("%Y-%m-%d %H:%M:%S UTC"),
                file_size(&store.vocabulary_path())
            );
            Some(stored)
        }
        Err(e) => {
            println!("Vocabulary: unavailable ({e})");
            None
        }
    };

    let parameters = match store.load_parameters() {
        Ok(stored) => {
            println!(
                "Parameters: {} features, alpha {}, trained {} ({})",
                stored.value.feature_dimension(),
                stored.value.alpha(),
                stored.trained_at.format("%Y-%m-%d %H:%M:%S UTC"),
                file_size(&store.parameters_path())
            );
            Some(stored)
        }
        Err(e) => {
            println!("Parameters: unavailable ({e})");
            None
        }
    };

    if let (Some(vocabulary), Some(parameters)) = (vocabulary, parameters) {
        if vocabulary.value.len() != parameters.value.feature_dimension() {
            println!(
                "Consistency: MISMATCH (vocabulary has {} stems, parameters expect {})",
                vocabulary.value.len(),
                parameters.value.feature_dimension()
            );
            println!("  Retrain with `critic train` to rebuild both artifacts.");
        } else if vocabulary.trained_at != parameters.trained_at {
            println!("Consistency: dimensions match, but artifacts come from different runs");
        } else {
            println!("Consistency: ok");
        }
    }

    Ok(())
}

fn file_size(path: &Path) -> String {
    std::fs::metadata(path)
        .map(|m| format_bytes(m.len()))
        .unwrap_or_else(|_| "unknown".to_string())
}

fn format_bytes(bytes: u64) -> String {
    if bytes < 1024 {
        format!("{} B", bytes)
    } else if bytes < 1024 * 1024 {
        format!("{:.1} KB", bytes as f64 / 1024.0)
    } else {
        format!("{:.1} MB", bytes as f64 / (1024.0 * 1024.0))
    }
}
