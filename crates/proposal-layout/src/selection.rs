//! Order and selection sheet snapshots
//!
//! Both sheets are exchanged as header-less CSV files whose line numbers are
//! the sheet row numbers.

use crate::column::column_index;
use crate::record::{CHECKED, OrderRecord};
use crate::types::*;
use std::path::Path;

/// Column holding the client name on the orders sheet
pub const CLIENT_COLUMN: &str = "C";

/// Snapshot of the selection sheet
#[derive(Debug, Clone, PartialEq)]
pub struct Selection {
    /// Client the proposal is addressed to (cell B1)
    pub client_name: String,
    /// Yuan exchange rate (cell D1)
    pub exchange_rate: CellValue,
    pub records: Vec<OrderRecord>,
}

impl Selection {
    pub fn selected_count(&self) -> usize {
        self.records.iter().filter(|r| r.selected).count()
    }
}

/// Load the orders sheet, keeping rows from `start_row` on
pub async fn load_orders(path: impl AsRef<Path>, start_row: usize) -> Result<Vec<OrderRecord>> {
    let path = path.as_ref().to_owned();
    let contents = tokio::fs::read_to_string(&path).await?;

    let rows = tokio::task::spawn_blocking(move || parse_rows(&contents)).await??;

    let orders: Vec<OrderRecord> = rows
        .into_iter()
        .enumerate()
        .map(|(i, values)| OrderRecord::new(i + 1, values))
        .filter(|record| record.row >= start_row)
        .filter(|record| record.values.iter().any(|v| !v.trim().is_empty()))
        .collect();

    if orders.is_empty() {
        return Err(LayoutError::NoData(format!(
            "{} has no orders from row {}",
            path.display(),
            start_row
        )));
    }
    log::info!("Loaded {} orders from {}", orders.len(), path.display());
    Ok(orders)
}

/// Copy every order of `client` onto a fresh selection, each one ticked
pub fn select_client_orders(orders: &[OrderRecord], client: &str) -> Result<Vec<OrderRecord>> {
    if orders.is_empty() {
        return Err(LayoutError::NoData("order list is empty".to_string()));
    }

    let client = client.trim();
    let client_index = column_index(CLIENT_COLUMN).unwrap_or(2);

    let selected: Vec<OrderRecord> = orders
        .iter()
        .filter(|order| {
            order
                .values
                .get(client_index)
                .is_some_and(|name| name.trim() == client)
        })
        .enumerate()
        .map(|(i, order)| {
            let mut values = order.values.clone();
            values[0] = CHECKED.to_string();
            // Row 1 of the selection sheet holds the client and rate
            OrderRecord::new(i + 2, values)
        })
        .collect();

    if selected.is_empty() {
        return Err(LayoutError::NoClientOrders {
            client: client.to_string(),
        });
    }
    log::info!("Found {} orders for client '{}'", selected.len(), client);
    Ok(selected)
}

/// Load the selection sheet
pub async fn load_selection(path: impl AsRef<Path>) -> Result<Selection> {
    let path = path.as_ref().to_owned();
    let contents = tokio::fs::read_to_string(&path).await?;

    let mut rows = tokio::task::spawn_blocking(move || parse_rows(&contents))
        .await??
        .into_iter();

    let meta = rows
        .next()
        .ok_or_else(|| LayoutError::NoData(format!("{} is empty", path.display())))?;
    let cell = |index: usize| meta.get(index).map(String::as_str).unwrap_or("");

    let records: Vec<OrderRecord> = rows
        .enumerate()
        .map(|(i, values)| OrderRecord::new(i + 2, values))
        .collect();

    if records.is_empty() {
        return Err(LayoutError::NoData(format!(
            "{} has no order rows",
            path.display()
        )));
    }

    Ok(Selection {
        client_name: cell(1).trim().to_string(),
        exchange_rate: CellValue::from_raw(cell(3)),
        records,
    })
}

/// Write a selection in the format [`load_selection`] reads
pub async fn save_selection(selection: &Selection, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();
    let selection = selection.clone();

    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = csv::WriterBuilder::new()
            .flexible(true)
            .from_writer(Vec::new());
        writer.write_record([
            "",
            selection.client_name.as_str(),
            "",
            selection.exchange_rate.to_string().as_str(),
        ])?;
        for record in &selection.records {
            writer.write_record(&record.values)?;
        }
        writer.into_inner().map_err(|e| LayoutError::Io(e.into_error()))
    })
    .await??;

    tokio::fs::write(&path, bytes).await?;
    Ok(())
}

fn parse_rows(contents: &str) -> Result<Vec<Vec<String>>> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(contents.as_bytes());

    let mut rows = Vec::new();
    for result in reader.records() {
        let record = result?;
        rows.push(record.iter().map(str::to_string).collect());
    }
    Ok(rows)
}
