//! Proposal rendering
//!
//! Builds the output sheet from a selection snapshot:
//! 1. Place the header template
//! 2. Append one product block per selected record, tracking page breaks
//! 3. Write the running totals into the header
//! 4. Append the footer and close the page break list

use crate::layout::{Border, Layout};
use crate::options::LayoutOptions;
use crate::pagebreaks::{PageBreakMarkers, PageBreakTracker};
use crate::record::{MappedOrder, map_order};
use crate::segments::{ExportSegment, resolve_segments};
use crate::selection::Selection;
use crate::template::HeaderSlot;
use crate::types::*;

/// Surcharge applied to the purchase total in the header
pub const PURCHASE_MARGIN: f64 = 1.05;

/// Blank rows left between consecutive blocks
const SPACER_ROWS: usize = 1;

/// Blocks and footer start in the first column of the output sheet
const OUTPUT_COLUMN: usize = 1;

/// Sums carried across all selected orders of one build
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RunningTotals {
    pub purchase: f64,
    pub fast_delivery: f64,
    pub slow_delivery: f64,
}

impl RunningTotals {
    pub fn add(&mut self, order: &MappedOrder) {
        self.purchase += order.purchase;
        self.fast_delivery += order.fast_freight_cost;
        self.slow_delivery += order.slow_freight_cost;
    }

    /// Purchase total as written to the header
    pub fn purchase_with_margin(&self) -> f64 {
        self.purchase * PURCHASE_MARGIN
    }
}

/// Everything one build produces
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedProposal {
    pub client_name: String,
    /// The finished output sheet
    pub layout: Layout,
    /// Display payload of each selected record, in block order
    pub preview: Vec<Vec<CellValue>>,
    pub orders: Vec<MappedOrder>,
    pub totals: RunningTotals,
    pub markers: PageBreakMarkers,
}

impl RenderedProposal {
    pub fn segments(&self) -> Vec<ExportSegment> {
        resolve_segments(&self.markers, self.layout.last_column())
    }
}

/// Render every selected record of `selection` into a new output sheet.
///
/// Fails before producing anything when the selection has no rows or no
/// ticked rows.
pub fn render_selected(selection: &Selection, options: &LayoutOptions) -> Result<RenderedProposal> {
    options.validate()?;

    if selection.records.is_empty() {
        return Err(LayoutError::NoData("selection has no order rows".to_string()));
    }
    if !selection.records.iter().any(|r| r.selected) {
        return Err(LayoutError::NoSelection);
    }

    let template = &options.template;
    let mut layout = Layout::new();
    layout.write_block(options.header_row, OUTPUT_COLUMN, &template.header_grid());

    let mut tracker = PageBreakTracker::new();
    let mut totals = RunningTotals::default();
    let mut preview = Vec::new();
    let mut orders = Vec::new();

    for (number, record) in (1..).zip(selection.records.iter().filter(|r| r.selected)) {
        preview.push(
            record
                .display_payload()
                .iter()
                .map(|v| {
                    if v.is_empty() {
                        CellValue::Empty
                    } else {
                        CellValue::text(v.as_str())
                    }
                })
                .collect(),
        );

        let order = map_order(record, number)?;
        let block = template.render_block(&order);

        let start_row = layout.terminal_row() + 1 + SPACER_ROWS;
        let placed = layout.write_block(start_row, OUTPUT_COLUMN, &block.cells);
        for merge in &block.merges {
            layout.add_merge(merge.offset(start_row, OUTPUT_COLUMN));
        }
        log::debug!(
            "Block {} (sheet row {}) placed at rows {}..={}",
            number,
            record.row,
            placed.first_row,
            placed.last_row
        );

        tracker.observe_block(number, layout.terminal_row());
        layout.add_border(Border::block_separator(
            layout.terminal_row(),
            layout.last_column(),
        ));

        totals.add(&order);
        orders.push(order);
    }

    let header_values = [
        (HeaderSlot::ExchangeRate, selection.exchange_rate.clone()),
        (
            HeaderSlot::TotalCostWithMargin,
            CellValue::Number(totals.purchase_with_margin()),
        ),
        (
            HeaderSlot::FastDeliveryTotal,
            CellValue::Number(totals.fast_delivery),
        ),
        (
            HeaderSlot::SlowDeliveryTotal,
            CellValue::Number(totals.slow_delivery),
        ),
    ];
    for (slot, value) in header_values {
        let position = slot.position();
        layout.set(
            options.header_row + position.row,
            OUTPUT_COLUMN + position.column,
            value,
        );
    }

    let footer_row = layout.terminal_row() + 1 + SPACER_ROWS;
    layout.write_block(footer_row, OUTPUT_COLUMN, &template.footer_grid());

    let markers = tracker.finish(orders.len(), layout.terminal_row())?;

    log::info!(
        "Rendered {} blocks for '{}' over {} pages (rows 1..={})",
        orders.len(),
        selection.client_name,
        markers.page_count(),
        layout.terminal_row()
    );

    Ok(RenderedProposal {
        client_name: selection.client_name.clone(),
        layout,
        preview,
        orders,
        totals,
        markers,
    })
}
