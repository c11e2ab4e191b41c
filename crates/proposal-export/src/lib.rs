mod assemble;
pub mod backend;
mod export;
mod merge;
mod options;
mod output;
mod request;
mod store;
mod types;

pub use assemble::{Artifact, AssembledArtifacts, assemble};
pub use backend::{CredentialSource, EnvCredential, ExportBackend, HttpExportBackend, StaticCredential};
pub use export::{ExportOutcome, export_build};
pub use merge::{document_to_bytes, merge_documents, merge_pdfs};
pub use options::*;
pub use output::*;
pub use request::*;
pub use store::{BuildRecord, MarkerStore};
pub use types::*;
