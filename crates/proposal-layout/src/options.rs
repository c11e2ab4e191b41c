use crate::pagebreaks::FIRST_MARKER;
use crate::template::ProposalTemplate;
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Layout configuration
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct LayoutOptions {
    /// First sheet row of the orders table (1-based)
    pub orders_start_row: usize,
    /// Output row the header is placed on (1-based)
    pub header_row: usize,
    pub template: ProposalTemplate,
}

impl Default for LayoutOptions {
    fn default() -> Self {
        Self {
            orders_start_row: 200,
            header_row: 3,
            template: ProposalTemplate::default(),
        }
    }
}

impl LayoutOptions {
    /// Load options from JSON file
    #[cfg(feature = "serde")]
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| LayoutError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    #[cfg(feature = "serde")]
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| LayoutError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.orders_start_row == 0 {
            return Err(LayoutError::Config(
                "orders_start_row is 1-based and cannot be 0".to_string(),
            ));
        }
        if self.header_row <= FIRST_MARKER {
            return Err(LayoutError::Config(format!(
                "header_row must be below row {} so the first page covers it",
                FIRST_MARKER
            )));
        }
        self.template.validate()
    }
}
