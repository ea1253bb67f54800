// Corpus reading — turns directories of review files into documents.
//
// Directories are walked recursively in sorted path order, so the same tree
// always yields the same document sequence. Symlinks to files are read;
// symlinks to directories are not descended into. A file that can't be read
// is recorded as a failure and the walk continues; only a root directory that
// can't be opened aborts the scan.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::{CriticError, Result};
use crate::model::sentiment::Sentiment;

/// One review: raw text plus its ground-truth label, if known.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    pub text: String,
    pub label: Option<Sentiment>,
    /// File the text was read from (None for ad-hoc text like a CLI phrase)
    pub path: Option<PathBuf>,
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            label: None,
            path: None,
        }
    }

    pub fn labeled(text: impl Into<String>, label: Sentiment) -> Self {
        Self {
            text: text.into(),
            label: Some(label),
            path: None,
        }
    }

    /// Short name for display: the file name if there is one.
    pub fn display_name(&self) -> String {
        match &self.path {
            Some(path) => path
                .file_name()
                .map(|n| n.to_string_lossy().into_owned())
                .unwrap_or_else(|| path.display().to_string()),
            None => "<text>".to_string(),
        }
    }
}

/// A file that was found but couldn't be read.
#[derive(Debug)]
pub struct ReadFailure {
    pub path: PathBuf,
    pub error: io::Error,
}

/// Everything a directory scan produced.
#[derive(Debug, Default)]
pub struct CorpusScan {
    pub documents: Vec<Document>,
    pub failures: Vec<ReadFailure>,
}

/// Positive and negative reviews read from two directories.
#[derive(Debug, Default)]
pub struct LabeledCorpus {
    pub documents: Vec<Document>,
    pub failures: Vec<ReadFailure>,
}

impl LabeledCorpus {
    pub fn count(&self, label: Sentiment) -> usize {
        self.documents
            .iter()
            .filter(|d| d.label == Some(label))
            .count()
    }
}

/// Read every file under `root` (recursively). Each document is tagged with
/// `label`.
///
/// Files are decoded as UTF-8, replacing invalid sequences.
pub fn read_directory(root: &Path, label: Option<Sentiment>) -> Result<CorpusScan> {
    let mut scan = CorpusScan::default();
    let entries = sorted_entries(root).map_err(|source| CriticError::CorpusReadFailure {
        path: root.to_path_buf(),
        source,
    })?;

    let mut pending = entries;
    pending.reverse();

    while let Some(path) = pending.pop() {
        let file_type = match fs::symlink_metadata(&path) {
            Ok(metadata) => metadata.file_type(),
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Skipping unreadable entry");
                scan.failures.push(ReadFailure { path, error });
                continue;
            }
        };

        // Directory links are not followed, so a cycle can't repeat documents
        if file_type.is_symlink() && path.is_dir() {
            debug!(path = %path.display(), "Skipping symlinked directory");
            continue;
        }

        if file_type.is_dir() {
            match sorted_entries(&path) {
                Ok(mut children) => {
                    children.reverse();
                    pending.extend(children);
                }
                Err(error) => {
                    warn!(path = %path.display(), error = %error, "Skipping unreadable directory");
                    scan.failures.push(ReadFailure { path, error });
                }
            }
            continue;
        }

        match fs::read(&path) {
            Ok(bytes) => {
                scan.documents.push(Document {
                    text: String::from_utf8_lossy(&bytes).into_owned(),
                    label,
                    path: Some(path),
                });
            }
            Err(error) => {
                warn!(path = %path.display(), error = %error, "Skipping unreadable file");
                scan.failures.push(ReadFailure { path, error });
            }
        }
    }

    debug!(
        root = %root.display(),
        documents = scan.documents.len(),
        failures = scan.failures.len(),
        "Read corpus directory"
    );
    Ok(scan)
}

/// Read a positive directory and a negative directory. Positive documents
/// come first.
pub fn load_labeled(positive_dir: &Path, negative_dir: &Path) -> Result<LabeledCorpus> {
    let positive = read_directory(positive_dir, Some(Sentiment::Positive))?;
    let negative = read_directory(negative_dir, Some(Sentiment::Negative))?;

    info!(
        positive = positive.documents.len(),
        negative = negative.documents.len(),
        failures = positive.failures.len() + negative.failures.len(),
        "Loaded labeled corpus"
    );

    let mut corpus = LabeledCorpus::default();
    for scan in [positive, negative] {
        corpus.documents.extend(scan.documents);
        corpus.failures.extend(scan.failures);
    }
    Ok(corpus)
}

fn sorted_entries(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut entries = fs::read_dir(dir)?
        .map(|entry| entry.map(|e| e.path()))
        .collect::<io::Result<Vec<_>>>()?;
    entries.sort();
    Ok(entries)
}
