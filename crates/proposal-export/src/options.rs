use crate::types::*;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Paper sizes the export endpoint understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PaperSize {
    A3,
    #[default]
    A4,
    A5,
    Letter,
    Legal,
    Tabloid,
}

impl PaperSize {
    pub fn query_value(self) -> &'static str {
        match self {
            PaperSize::A3 => "A3",
            PaperSize::A4 => "A4",
            PaperSize::A5 => "A5",
            PaperSize::Letter => "letter",
            PaperSize::Legal => "legal",
            PaperSize::Tabloid => "tabloid",
        }
    }
}

/// Page margins in inches
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PageMargins {
    pub top_in: f32,
    pub bottom_in: f32,
    pub left_in: f32,
    pub right_in: f32,
}

impl Default for PageMargins {
    fn default() -> Self {
        Self {
            top_in: 0.5,
            bottom_in: 0.25,
            left_in: 0.5,
            right_in: 0.5,
        }
    }
}

/// Fixed geometry applied to every page-range export
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageGeometry {
    pub paper_size: PaperSize,
    pub portrait: bool,
    pub fit_width: bool,
    /// Repeat frozen rows on every page
    pub freeze_rows: bool,
    pub gridlines: bool,
    pub print_title: bool,
    pub sheet_names: bool,
    pub page_numbers: bool,
    pub margins: PageMargins,
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self {
            paper_size: PaperSize::A4,
            portrait: true,
            fit_width: true,
            freeze_rows: true,
            gridlines: false,
            print_title: false,
            sheet_names: false,
            page_numbers: false,
            margins: PageMargins::default(),
        }
    }
}

/// Export configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportOptions {
    /// Document holding the output sheet
    pub spreadsheet_id: String,
    /// Output sheet (`gid`) inside the document
    pub sheet_id: u64,
    pub export_base_url: String,
    /// Environment variable read for the bearer token on every request
    pub token_env: String,
    pub geometry: PageGeometry,
    /// Root under which per-build folders are created
    pub output_dir: PathBuf,
    /// Cross-phase state file
    pub state_file: PathBuf,
    /// Also zip the build folder
    pub archive: bool,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            spreadsheet_id: String::new(),
            sheet_id: 0,
            export_base_url: "https://docs.google.com/spreadsheets/d".to_string(),
            token_env: "KPT_ACCESS_TOKEN".to_string(),
            geometry: PageGeometry::default(),
            output_dir: PathBuf::from("proposals"),
            state_file: PathBuf::from(".kpt-state.json"),
            archive: false,
        }
    }
}

impl ExportOptions {
    /// Load options from JSON file
    pub async fn load(path: impl AsRef<std::path::Path>) -> Result<Self> {
        let bytes = tokio::fs::read(path).await?;
        let options = serde_json::from_slice(&bytes)
            .map_err(|e| ExportError::Config(format!("Failed to parse config: {}", e)))?;
        Ok(options)
    }

    /// Save options to JSON file
    pub async fn save(&self, path: impl AsRef<std::path::Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .map_err(|e| ExportError::Config(format!("Failed to serialize config: {}", e)))?;
        tokio::fs::write(path, json).await?;
        Ok(())
    }

    pub fn validate(&self) -> Result<()> {
        if self.spreadsheet_id.trim().is_empty() {
            return Err(ExportError::Config(
                "spreadsheet_id is not set".to_string(),
            ));
        }
        if self.export_base_url.trim().is_empty() {
            return Err(ExportError::Config(
                "export_base_url is not set".to_string(),
            ));
        }
        let m = &self.geometry.margins;
        if [m.top_in, m.bottom_in, m.left_in, m.right_in]
            .iter()
            .any(|v| !v.is_finite() || *v < 0.0)
        {
            return Err(ExportError::Config(
                "Page margins must be non-negative".to_string(),
            ));
        }
        Ok(())
    }
}
