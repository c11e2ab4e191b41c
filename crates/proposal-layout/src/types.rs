use std::fmt;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No order data found: {0}")]
    NoData(String),
    #[error("At least one order must be selected")]
    NoSelection,
    #[error("No orders found for client '{client}'")]
    NoClientOrders { client: String },
    #[error("Row {row}: {field} in column {column} is not a number: '{value}'")]
    NonNumeric {
        row: usize,
        column: &'static str,
        field: &'static str,
        value: String,
    },
    #[error("Invalid page break markers: {0}")]
    InvalidMarkers(String),
}

pub type Result<T> = std::result::Result<T, LayoutError>;

/// A single value on a sheet
#[derive(Debug, Clone, PartialEq, Default)]
pub enum CellValue {
    #[default]
    Empty,
    Number(f64),
    Text(String),
}

impl CellValue {
    /// Interpret a raw sheet value, keeping anything non-numeric as text
    pub fn from_raw(raw: &str) -> Self {
        if raw.trim().is_empty() {
            return CellValue::Empty;
        }
        match parse_number(raw) {
            Some(n) => CellValue::Number(n),
            None => CellValue::Text(raw.to_string()),
        }
    }

    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Number(n) => write!(f, "{n}"),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

/// Parse a sheet number.
///
/// Accepts surrounding whitespace, spaces or NBSP as thousands separators and
/// `,` as the decimal separator.
pub fn parse_number(raw: &str) -> Option<f64> {
    let cleaned: String = raw
        .trim()
        .chars()
        .filter(|c| !c.is_whitespace() && *c != '\u{a0}')
        .map(|c| if c == ',' { '.' } else { c })
        .collect();
    if cleaned.is_empty() {
        return None;
    }
    cleaned.parse::<f64>().ok().filter(|n| n.is_finite())
}
