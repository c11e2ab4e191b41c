//! Cross-phase build state
//!
//! The build phase records its page markers here and the export phase reads
//! them back, possibly from another process. Records are keyed by build id
//! and removed once their export succeeds.

use crate::types::*;
use proposal_layout::{ExportSegment, PageBreakMarkers, resolve_segments};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Everything the export phase needs from one build
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BuildRecord {
    pub build_id: String,
    pub client_name: String,
    /// Build time, `YYYY-MM-DD HH-MM-SS`
    pub created_at: String,
    pub last_column: usize,
    /// Comma-delimited page break rows
    pub markers: String,
}

impl BuildRecord {
    pub fn new(
        build_id: impl Into<String>,
        client_name: impl Into<String>,
        created_at: impl Into<String>,
        last_column: usize,
        markers: &PageBreakMarkers,
    ) -> Self {
        Self {
            build_id: build_id.into(),
            client_name: client_name.into(),
            created_at: created_at.into(),
            last_column,
            markers: markers.to_string(),
        }
    }

    pub fn page_markers(&self) -> Result<PageBreakMarkers> {
        Ok(self.markers.parse::<PageBreakMarkers>()?)
    }

    pub fn segments(&self) -> Result<Vec<ExportSegment>> {
        Ok(resolve_segments(&self.page_markers()?, self.last_column))
    }
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreFile {
    latest: Option<String>,
    builds: BTreeMap<String, BuildRecord>,
}

/// JSON-file backed store of build records
#[derive(Debug)]
pub struct MarkerStore {
    path: PathBuf,
    state: StoreFile,
}

impl MarkerStore {
    /// Open the store at `path`, starting empty if the file does not exist
    pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_owned();
        let state = match tokio::fs::read(&path).await {
            Ok(bytes) => serde_json::from_slice(&bytes)?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => StoreFile::default(),
            Err(e) => return Err(e.into()),
        };
        Ok(Self { path, state })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn get(&self, build_id: &str) -> Result<&BuildRecord> {
        self.state
            .builds
            .get(build_id)
            .ok_or_else(|| ExportError::MissingBuild(build_id.to_string()))
    }

    /// The most recently stored build
    pub fn latest(&self) -> Result<&BuildRecord> {
        let id = self
            .state
            .latest
            .as_deref()
            .ok_or_else(|| ExportError::MissingBuild("<latest>".to_string()))?;
        self.get(id)
    }

    /// A specific build, or the latest one when `build_id` is `None`
    pub fn resolve(&self, build_id: Option<&str>) -> Result<&BuildRecord> {
        match build_id {
            Some(id) => self.get(id),
            None => self.latest(),
        }
    }

    pub fn build_ids(&self) -> impl Iterator<Item = &str> {
        self.state.builds.keys().map(String::as_str)
    }

    /// Store a record and make it the latest build.
    ///
    /// Build ids have one-second resolution; a second build of the same client
    /// within that second is rejected rather than replacing the first.
    pub async fn put(&mut self, record: BuildRecord) -> Result<()> {
        if self.state.builds.contains_key(&record.build_id) {
            return Err(ExportError::BuildExists(record.build_id));
        }
        log::debug!("Storing markers {} for build {}", record.markers, record.build_id);
        self.state.latest = Some(record.build_id.clone());
        self.state.builds.insert(record.build_id.clone(), record);
        self.flush().await
    }

    pub async fn remove(&mut self, build_id: &str) -> Result<Option<BuildRecord>> {
        let removed = self.state.builds.remove(build_id);
        if self.state.latest.as_deref() == Some(build_id) {
            self.state.latest = None;
        }
        self.flush().await?;
        Ok(removed)
    }

    async fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent).await?;
        }
        let json = serde_json::to_vec_pretty(&self.state)?;
        tokio::fs::write(&self.path, json).await?;
        Ok(())
    }
}
