use proposal_layout::LayoutError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ExportError {
    #[error("PDF error: {0}")]
    Pdf(#[from] lopdf::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error(transparent)]
    Layout(#[from] LayoutError),
    #[error("Failed to fetch {label}: {message}")]
    Fetch { label: String, message: String },
    #[error("Page segment {index} is not a valid PDF: {message}")]
    Merge { index: usize, message: String },
    #[error("State file error: {0}")]
    State(#[from] serde_json::Error),
    #[error("No build '{0}' in the state file")]
    MissingBuild(String),
    #[error("Build '{0}' is already in the state file")]
    BuildExists(String),
    #[error("Archive error: {0}")]
    Archive(#[from] zip::result::ZipError),
    #[error("No page segments to export")]
    NoSegments,
}

pub type Result<T> = std::result::Result<T, ExportError>;
