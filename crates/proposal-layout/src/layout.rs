//! The output sheet as an in-memory grid
//!
//! Rows and columns are 1-based, matching sheet coordinates. The terminal row
//! only ever grows as blocks are appended.

use crate::column::a1;
use crate::types::*;
use std::path::Path;

#[cfg(feature = "serde")]
use serde::Serialize;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Inclusive rectangle of cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellRange {
    pub first_row: usize,
    pub first_column: usize,
    pub last_row: usize,
    pub last_column: usize,
}

impl CellRange {
    pub fn contains(&self, row: usize, column: usize) -> bool {
        (self.first_row..=self.last_row).contains(&row)
            && (self.first_column..=self.last_column).contains(&column)
    }

    /// A1-style range such as `B17:B30`
    pub fn to_a1(&self) -> String {
        format!(
            "{}:{}",
            a1(self.first_row, self.first_column),
            a1(self.last_row, self.last_column)
        )
    }

    pub fn offset(self, rows: usize, columns: usize) -> Self {
        Self {
            first_row: self.first_row + rows,
            first_column: self.first_column + columns,
            last_row: self.last_row + rows,
            last_column: self.last_column + columns,
        }
    }
}

/// Cosmetic cell border
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Border {
    pub row: usize,
    pub column: usize,
    pub top: bool,
    pub bottom: bool,
    pub color: &'static str,
    pub style: &'static str,
}

impl Border {
    /// Red dotted edge marking the end of a product block
    pub fn block_separator(row: usize, column: usize) -> Self {
        Self {
            row,
            column,
            top: true,
            bottom: true,
            color: "red",
            style: "dotted",
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Layout {
    rows: Vec<Vec<CellValue>>,
    merges: Vec<CellRange>,
    borders: Vec<Border>,
    terminal_row: usize,
    last_column: usize,
}

impl Layout {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last row covered by anything written so far, 0 when empty
    pub fn terminal_row(&self) -> usize {
        self.terminal_row
    }

    /// Rightmost column covered by anything written so far
    pub fn last_column(&self) -> usize {
        self.last_column
    }

    pub fn get(&self, row: usize, column: usize) -> &CellValue {
        if row == 0 || column == 0 {
            return &EMPTY_CELL;
        }
        self.rows
            .get(row - 1)
            .and_then(|r| r.get(column - 1))
            .unwrap_or(&EMPTY_CELL)
    }

    pub fn set(&mut self, row: usize, column: usize, value: CellValue) {
        assert!(row > 0 && column > 0, "sheet coordinates are 1-based");
        if self.rows.len() < row {
            self.rows.resize_with(row, Vec::new);
        }
        let line = &mut self.rows[row - 1];
        if line.len() < column {
            line.resize(column, CellValue::Empty);
        }
        line[column - 1] = value;
        self.terminal_row = self.terminal_row.max(row);
        self.last_column = self.last_column.max(column);
    }

    /// Write a grid with its top-left corner at (`row`, `column`).
    ///
    /// Returns the range the grid now covers.
    pub fn write_block(&mut self, row: usize, column: usize, cells: &[Vec<CellValue>]) -> CellRange {
        let height = cells.len().max(1);
        let width = cells.iter().map(Vec::len).max().unwrap_or(0).max(1);

        for (r, line) in cells.iter().enumerate() {
            for (c, value) in line.iter().enumerate() {
                self.set(row + r, column + c, value.clone());
            }
        }

        let range = CellRange {
            first_row: row,
            first_column: column,
            last_row: row + height - 1,
            last_column: column + width - 1,
        };
        self.terminal_row = self.terminal_row.max(range.last_row);
        self.last_column = self.last_column.max(range.last_column);
        range
    }

    pub fn add_merge(&mut self, range: CellRange) {
        self.merges.push(range);
    }

    pub fn add_border(&mut self, border: Border) {
        self.borders.push(border);
    }

    pub fn merges(&self) -> &[CellRange] {
        &self.merges
    }

    pub fn borders(&self) -> &[Border] {
        &self.borders
    }

    /// All rows, padded to the last column
    pub fn rows(&self) -> Vec<Vec<CellValue>> {
        let mut rows = self.rows.clone();
        rows.resize_with(self.terminal_row, Vec::new);
        for line in &mut rows {
            line.resize(self.last_column, CellValue::Empty);
        }
        rows
    }

    pub fn to_csv_bytes(&self) -> Result<Vec<u8>> {
        rows_to_csv(&self.rows())
    }
}

/// Serialize cell rows as CSV
pub fn rows_to_csv(rows: &[Vec<CellValue>]) -> Result<Vec<u8>> {
    let mut writer = csv::WriterBuilder::new()
        .flexible(true)
        .from_writer(Vec::new());
    for row in rows {
        writer.write_record(row.iter().map(|cell| cell.to_string()))?;
    }
    writer.into_inner().map_err(|e| LayoutError::Io(e.into_error()))
}

/// Write the layout to a CSV file
pub async fn save_layout_csv(layout: &Layout, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let rows = layout.rows();
    let bytes = tokio::task::spawn_blocking(move || rows_to_csv(&rows)).await??;
    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

#[cfg(feature = "serde")]
#[derive(Debug, Serialize)]
struct SheetFormatting {
    merges: Vec<String>,
    borders: Vec<BorderFormat>,
}

#[cfg(feature = "serde")]
#[derive(Debug, Serialize)]
struct BorderFormat {
    cell: String,
    top: bool,
    bottom: bool,
    color: &'static str,
    style: &'static str,
}

/// Formatting the CSV cannot carry, as JSON
#[cfg(feature = "serde")]
pub fn formatting_json(layout: &Layout) -> Result<Vec<u8>> {
    let formatting = SheetFormatting {
        merges: layout.merges().iter().map(CellRange::to_a1).collect(),
        borders: layout
            .borders()
            .iter()
            .map(|border| BorderFormat {
                cell: a1(border.row, border.column),
                top: border.top,
                bottom: border.bottom,
                color: border.color,
                style: border.style,
            })
            .collect(),
    };
    serde_json::to_vec_pretty(&formatting)
        .map_err(|e| LayoutError::Config(format!("Failed to serialize formatting: {}", e)))
}

/// Write merged regions and borders next to the layout CSV
#[cfg(feature = "serde")]
pub async fn save_layout_formatting(layout: &Layout, path: impl AsRef<Path>) -> Result<()> {
    let bytes = formatting_json(layout)?;
    tokio::fs::write(path, bytes).await?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn write_block_advances_terminal_row() {
        let mut layout = Layout::new();
        let grid = vec![vec![CellValue::text("a"), CellValue::Empty]; 3];
        let range = layout.write_block(4, 1, &grid);
        assert_eq!(range.first_row, 4);
        assert_eq!(range.last_row, 6);
        assert_eq!(layout.terminal_row(), 6);
        assert_eq!(layout.last_column(), 2);
    }

    #[test]
    fn trailing_empty_rows_still_count() {
        let mut layout = Layout::new();
        let grid = vec![vec![CellValue::text("x")], vec![CellValue::Empty]];
        layout.write_block(1, 1, &grid);
        assert_eq!(layout.terminal_row(), 2);
        assert_eq!(layout.rows().len(), 2);
    }

    #[test]
    fn get_outside_grid_is_empty() {
        let layout = Layout::new();
        assert!(layout.get(10, 10).is_empty());
        assert!(layout.get(0, 1).is_empty());
    }

    #[test]
    fn csv_output_is_padded() {
        let mut layout = Layout::new();
        layout.set(1, 1, CellValue::text("title"));
        layout.set(2, 3, CellValue::Number(1.5));
        let csv = String::from_utf8(layout.to_csv_bytes().unwrap()).unwrap();
        assert_eq!(csv, "title,,\n,,1.5\n");
    }

    #[test]
    fn range_contains_and_offset() {
        let range = CellRange {
            first_row: 1,
            first_column: 1,
            last_row: 14,
            last_column: 1,
        };
        assert!(range.contains(14, 1));
        assert!(!range.contains(15, 1));
        assert_eq!(range.offset(15, 1).to_a1(), "B16:B29");
        let moved = range.offset(15, 0);
        assert_eq!(moved.first_row, 16);
        assert_eq!(moved.last_row, 29);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn formatting_lists_merges_and_borders() {
        let mut layout = Layout::new();
        layout.add_merge(CellRange {
            first_row: 17,
            first_column: 2,
            last_row: 30,
            last_column: 2,
        });
        layout.add_border(Border::block_separator(32, 7));

        let json: serde_json::Value =
            serde_json::from_slice(&formatting_json(&layout).unwrap()).unwrap();
        assert_eq!(json["merges"], serde_json::json!(["B17:B30"]));
        assert_eq!(json["borders"][0]["cell"], "G32");
        assert_eq!(json["borders"][0]["color"], "red");
        assert_eq!(json["borders"][0]["style"], "dotted");
    }
}
