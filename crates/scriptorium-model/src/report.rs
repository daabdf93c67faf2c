use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Why converting a single document failed.
///
/// Every variant is contained at the document boundary: the batch loop
/// records the failure and moves on to the next document.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("malformed XML: {0}")]
    Parse(String),

    #[error("file not found: {0}")]
    NotFound(PathBuf),

    #[error("<{element}> is missing required attribute '{attribute}'")]
    MissingAttribute { element: String, attribute: String },

    #[error("<{element}> attribute '{attribute}' is not an integer: '{value}'")]
    BadAttribute {
        element: String,
        attribute: String,
        value: String,
    },

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Coarse classification used in batch reports.
    pub fn kind(&self) -> FailureKind {
        match self {
            ConvertError::Parse(_) => FailureKind::Parse,
            ConvertError::NotFound(_) => FailureKind::NotFound,
            ConvertError::MissingAttribute { .. } | ConvertError::BadAttribute { .. } => {
                FailureKind::Attribute
            }
            ConvertError::Io(_) => FailureKind::Io,
        }
    }
}

/// Failure classes surfaced in reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Parse,
    NotFound,
    Attribute,
    Io,
}

/// Outcome of one document in a batch run.
#[derive(Debug, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum DocumentStatus {
    Converted { verses: usize },
    Failed { kind: FailureKind, message: String },
}

impl DocumentStatus {
    pub fn failed(err: &ConvertError) -> Self {
        DocumentStatus::Failed {
            kind: err.kind(),
            message: err.to_string(),
        }
    }

    pub fn is_converted(&self) -> bool {
        matches!(self, DocumentStatus::Converted { .. })
    }
}

/// Per-document entry in a [`BatchReport`].
#[derive(Debug, Serialize)]
pub struct DocumentReport {
    pub input: PathBuf,
    /// The record file written, present only when conversion succeeded.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<PathBuf>,
    pub status: DocumentStatus,
}

/// Accounting for one full converter run.
///
/// Collecting explicit per-document outcomes (rather than letting caught
/// errors vanish into the log) keeps failure accounting visible and
/// testable.
#[derive(Debug, Default, Serialize)]
pub struct BatchReport {
    pub documents: Vec<DocumentReport>,
}

impl BatchReport {
    pub fn push(&mut self, report: DocumentReport) {
        self.documents.push(report);
    }

    pub fn converted(&self) -> usize {
        self.documents
            .iter()
            .filter(|d| d.status.is_converted())
            .count()
    }

    pub fn failed(&self) -> usize {
        self.documents.len() - self.converted()
    }
}
