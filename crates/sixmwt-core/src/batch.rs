use std::fs;
use std::path::Path;

use blake3::Hasher;
use serde::Serialize;
use sixmwt_parser::{parse_table_bytes, ParserError};
use thiserror::Error;
use tracing::{info, warn};

use crate::boundaries::MarkerScheme;
use crate::config::ExtractionConfig;
use crate::error::ExtractionError;
use crate::record::{build_subject_record, SubjectRecord};

#[derive(Debug)]
pub struct FileInput<'a> {
    pub path: &'a str,
    pub contents: &'a [u8],
}

#[derive(Debug, Error)]
pub enum FileError {
    #[error("failed to read file: {0}")]
    Read(#[from] std::io::Error),
    #[error(transparent)]
    Parser(#[from] ParserError),
    #[error(transparent)]
    Extraction(#[from] ExtractionError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FileStatus {
    Processed,
    Failed,
}

#[derive(Debug, Clone, Serialize)]
pub struct FileReport {
    pub path: String,
    /// blake3 of the raw bytes; absent when the file could not be read.
    pub hash: Option<String>,
    pub status: FileStatus,
    pub scheme: Option<MarkerScheme>,
    pub message: Option<String>,
}

#[derive(Debug)]
pub struct FileOutcome {
    pub report: FileReport,
    pub record: Option<SubjectRecord>,
}

/// Per-file outcomes in submission order.
#[derive(Debug)]
pub struct BatchOutcome {
    pub files: Vec<FileOutcome>,
}

impl BatchOutcome {
    pub fn records(&self) -> Vec<SubjectRecord> {
        self.files
            .iter()
            .filter_map(|outcome| outcome.record.clone())
            .collect()
    }

    pub fn reports(&self) -> Vec<FileReport> {
        self.files
            .iter()
            .map(|outcome| outcome.report.clone())
            .collect()
    }

    pub fn processed_count(&self) -> usize {
        self.files
            .iter()
            .filter(|outcome| outcome.report.status == FileStatus::Processed)
            .count()
    }

    pub fn failed_count(&self) -> usize {
        self.files.len() - self.processed_count()
    }
}

/// Loads and extracts one export.
pub fn process_file(
    path: &str,
    contents: &[u8],
    config: &ExtractionConfig,
) -> Result<SubjectRecord, FileError> {
    let table = parse_table_bytes(contents)?;
    Ok(build_subject_record(path, &table, config)?)
}

/// Processes every input independently. A failing file is reported and the
/// batch moves on.
pub fn process_batch(inputs: &[FileInput<'_>], config: &ExtractionConfig) -> BatchOutcome {
    let files = inputs
        .iter()
        .map(|input| {
            let hash = compute_hash(input.contents);
            let result = process_file(input.path, input.contents, config);
            file_outcome(input.path, Some(hash), result)
        })
        .collect();

    BatchOutcome { files }
}

/// Like [`process_batch`], reading each file from disk first. A file that
/// cannot be read becomes a failed report of its own.
pub fn process_paths<P: AsRef<Path>>(paths: &[P], config: &ExtractionConfig) -> BatchOutcome {
    let files = paths
        .iter()
        .map(|path| {
            let label = path.as_ref().display().to_string();
            match fs::read(path) {
                Ok(contents) => {
                    let hash = compute_hash(&contents);
                    let result = process_file(&label, &contents, config);
                    file_outcome(&label, Some(hash), result)
                }
                Err(err) => file_outcome(&label, None, Err(FileError::Read(err))),
            }
        })
        .collect();

    BatchOutcome { files }
}

fn file_outcome(
    path: &str,
    hash: Option<String>,
    result: Result<SubjectRecord, FileError>,
) -> FileOutcome {
    match result {
        Ok(record) => {
            info!(
                path,
                scheme = %record.scheme(),
                surname = record.surname(),
                "processed walk test"
            );
            FileOutcome {
                report: FileReport {
                    path: path.to_string(),
                    hash,
                    status: FileStatus::Processed,
                    scheme: Some(record.scheme()),
                    message: None,
                },
                record: Some(record),
            }
        }
        Err(err) => {
            warn!(path, error = %err, "failed to process walk test");
            FileOutcome {
                report: FileReport {
                    path: path.to_string(),
                    hash,
                    status: FileStatus::Failed,
                    scheme: failed_scheme(&err),
                    message: Some(err.to_string()),
                },
                record: None,
            }
        }
    }
}

fn failed_scheme(err: &FileError) -> Option<MarkerScheme> {
    match err {
        FileError::Extraction(ExtractionError::Boundary { scheme, .. }) => Some(*scheme),
        _ => None,
    }
}

fn compute_hash(contents: &[u8]) -> String {
    let mut hasher = Hasher::new();
    hasher.update(contents);
    let hash = hasher.finalize();
    hash.to_hex().to_string()
}
