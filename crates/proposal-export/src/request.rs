//! Export request construction
//!
//! One tabular export of the whole output sheet plus one PDF export per page
//! segment. Request order is page order and is kept through fetch and merge.

use crate::options::{ExportOptions, PageGeometry};
use crate::types::*;
use proposal_layout::ExportSegment;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    Tabular,
    PageRange { page: usize },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportRequest {
    pub kind: RequestKind,
    pub url: String,
}

impl ExportRequest {
    /// Human-readable name used in logs and errors
    pub fn label(&self) -> String {
        match self.kind {
            RequestKind::Tabular => "tabular export".to_string(),
            RequestKind::PageRange { page } => format!("page {}", page),
        }
    }
}

/// Every request of one export run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportPlan {
    pub tabular: ExportRequest,
    /// Page-range requests in page order
    pub pages: Vec<ExportRequest>,
}

impl ExportPlan {
    pub fn request_count(&self) -> usize {
        self.pages.len() + 1
    }
}

fn export_endpoint(options: &ExportOptions) -> String {
    format!(
        "{}/{}/export",
        options.export_base_url.trim_end_matches('/'),
        options.spreadsheet_id
    )
}

pub fn tabular_request(options: &ExportOptions) -> ExportRequest {
    ExportRequest {
        kind: RequestKind::Tabular,
        url: format!("{}?gid={}", export_endpoint(options), options.sheet_id),
    }
}

pub fn page_range_request(options: &ExportOptions, segment: &ExportSegment) -> ExportRequest {
    let g: &PageGeometry = &options.geometry;
    let query = [
        ("format", "pdf".to_string()),
        ("size", g.paper_size.query_value().to_string()),
        ("fzr", g.freeze_rows.to_string()),
        ("portrait", g.portrait.to_string()),
        ("fitw", g.fit_width.to_string()),
        ("gridlines", g.gridlines.to_string()),
        ("printtitle", g.print_title.to_string()),
        ("top_margin", g.margins.top_in.to_string()),
        ("bottom_margin", g.margins.bottom_in.to_string()),
        ("left_margin", g.margins.left_in.to_string()),
        ("right_margin", g.margins.right_in.to_string()),
        ("sheetnames", g.sheet_names.to_string()),
        (
            "pagenum",
            if g.page_numbers { "CENTER" } else { "UNDEFINED" }.to_string(),
        ),
        ("attachment", "true".to_string()),
        ("gid", options.sheet_id.to_string()),
        ("r1", segment.first_row.to_string()),
        ("c1", segment.first_column.to_string()),
        ("r2", segment.last_row.to_string()),
        ("c2", segment.last_column.to_string()),
    ];
    let query: Vec<String> = query
        .iter()
        .map(|(key, value)| format!("{}={}", key, value))
        .collect();

    ExportRequest {
        kind: RequestKind::PageRange { page: segment.page },
        url: format!("{}?{}", export_endpoint(options), query.join("&")),
    }
}

/// Build the tabular request and one page-range request per segment
pub fn plan_exports(options: &ExportOptions, segments: &[ExportSegment]) -> Result<ExportPlan> {
    if segments.is_empty() {
        return Err(ExportError::NoSegments);
    }
    Ok(ExportPlan {
        tabular: tabular_request(options),
        pages: segments
            .iter()
            .map(|segment| page_range_request(options, segment))
            .collect(),
    })
}
