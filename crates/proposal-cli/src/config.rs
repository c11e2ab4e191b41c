use proposal_export::ExportOptions;
use proposal_layout::LayoutOptions;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Layout and export settings kept in one JSON file
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProposalConfig {
    pub layout: LayoutOptions,
    pub export: ExportOptions,
}

impl ProposalConfig {
    /// Load the config file, falling back to defaults when it does not exist
    pub async fn load_or_default(path: impl AsRef<Path>) -> anyhow::Result<Self> {
        let path = path.as_ref();
        match tokio::fs::read(path).await {
            Ok(bytes) => {
                let config = serde_json::from_slice(&bytes).map_err(|e| {
                    anyhow::anyhow!("Failed to parse config {}: {}", path.display(), e)
                })?;
                log::debug!("Loaded config from {}", path.display());
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("No config at {}, using defaults", path.display());
                Ok(Self::default())
            }
            Err(e) => Err(e.into()),
        }
    }

    pub async fn save(&self, path: impl AsRef<Path>) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }
}
