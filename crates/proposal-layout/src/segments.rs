use crate::pagebreaks::PageBreakMarkers;

/// One physical page of the output sheet, exported as its own page range
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ExportSegment {
    /// 1-based page number
    pub page: usize,
    pub first_row: usize,
    pub last_row: usize,
    /// 0-based first column, as the export endpoint expects
    pub first_column: usize,
    pub last_column: usize,
}

/// Turn page markers into one export segment per page, in page order
pub fn resolve_segments(markers: &PageBreakMarkers, last_column: usize) -> Vec<ExportSegment> {
    markers
        .page_ranges()
        .enumerate()
        .map(|(i, (first_row, last_row))| ExportSegment {
            page: i + 1,
            first_row,
            last_row,
            first_column: 0,
            last_column,
        })
        .collect()
}
