//! Header, product block and footer templates
//!
//! Templates carry static label text only. Values are placed into fixed slots
//! when a block is rendered, and each rendered block is a fresh grid, so no
//! template region is ever written to or cleared.

use crate::layout::CellRange;
use crate::record::{MappedOrder, OrderField};
use crate::types::*;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Columns spanned by every template (B..H on the template sheet)
pub const TEMPLATE_WIDTH: usize = 7;
pub const HEADER_HEIGHT: usize = 12;
pub const PRODUCT_HEIGHT: usize = 17;
pub const FOOTER_HEIGHT: usize = 1;

/// 0-based position inside a template grid
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlotPosition {
    pub row: usize,
    pub column: usize,
}

impl SlotPosition {
    pub const fn new(row: usize, column: usize) -> Self {
        Self { row, column }
    }
}

/// Slot receiving a mapped field inside the product block
pub const fn product_slot(field: OrderField) -> SlotPosition {
    match field {
        OrderField::Number => SlotPosition::new(0, 0),
        OrderField::Amount => SlotPosition::new(0, 5),
        OrderField::Volume => SlotPosition::new(2, 6),
        OrderField::Weight => SlotPosition::new(3, 6),
        OrderField::SheathingWeight => SlotPosition::new(4, 6),
        OrderField::TotalWeight => SlotPosition::new(5, 6),
        OrderField::CargoRate14To21 => SlotPosition::new(7, 6),
        OrderField::CargoRate35To45 => SlotPosition::new(8, 6),
        OrderField::CostOfCargoPackaging => SlotPosition::new(9, 6),
        OrderField::UnloadingCost => SlotPosition::new(10, 6),
        OrderField::Insurance => SlotPosition::new(11, 6),
        OrderField::UnitCostIncludingCommission => SlotPosition::new(12, 6),
        OrderField::PriceOfDeliveryInChinaPerBatch => SlotPosition::new(13, 6),
        OrderField::FastFreightCost => SlotPosition::new(14, 6),
        OrderField::SlowFreightCost => SlotPosition::new(15, 6),
        OrderField::Purchase => SlotPosition::new(16, 6),
    }
}

/// Merged region holding the product image
pub const IMAGE_REGION: CellRange = CellRange {
    first_row: 1,
    first_column: 1,
    last_row: 14,
    last_column: 1,
};

/// Value cells of the header, relative to its origin
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HeaderSlot {
    ExchangeRate,
    TotalCostWithMargin,
    FastDeliveryTotal,
    SlowDeliveryTotal,
}

impl HeaderSlot {
    pub const fn position(self) -> SlotPosition {
        match self {
            HeaderSlot::ExchangeRate => SlotPosition::new(0, 2),
            HeaderSlot::TotalCostWithMargin => SlotPosition::new(3, 2),
            HeaderSlot::FastDeliveryTotal => SlotPosition::new(5, 2),
            HeaderSlot::SlowDeliveryTotal => SlotPosition::new(6, 2),
        }
    }
}

/// A product block ready to be appended to the layout
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedBlock {
    pub cells: Vec<Vec<CellValue>>,
    /// Merged regions relative to the block origin
    pub merges: Vec<CellRange>,
}

/// Label text of the three templates
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ProposalTemplate {
    pub header: Vec<Vec<String>>,
    pub product: Vec<Vec<String>>,
    pub footer: Vec<Vec<String>>,
}

impl Default for ProposalTemplate {
    fn default() -> Self {
        let mut header = blank_labels(HEADER_HEIGHT);
        header[0][0] = "Commercial proposal".into();
        header[0][1] = "Yuan exchange rate".into();
        header[3][1] = "Total cost incl. 5%".into();
        header[5][1] = "Fast delivery, total".into();
        header[6][1] = "Slow delivery, total".into();

        let mut product = blank_labels(PRODUCT_HEIGHT);
        product[0][4] = "Quantity, pcs".into();
        product[1][5] = "Logistics".into();
        let rows = [
            (2, "Volume, m³"),
            (3, "Weight, kg"),
            (4, "Sheathing weight, kg"),
            (5, "Total weight, kg"),
            (6, "Cargo rates"),
            (7, "Rate 14-21 days"),
            (8, "Rate 35-45 days"),
            (9, "Cargo packaging"),
            (10, "Unloading"),
            (11, "Insurance"),
            (12, "Unit cost incl. commission"),
            (13, "Delivery in China per batch"),
            (14, "Fast freight"),
            (15, "Slow freight"),
            (16, "Purchase"),
        ];
        for (row, label) in rows {
            product[row][5] = label.into();
        }

        let mut footer = blank_labels(FOOTER_HEIGHT);
        footer[0][0] = "Prices are indicative and subject to confirmation".into();

        Self {
            header,
            product,
            footer,
        }
    }
}

impl ProposalTemplate {
    /// Check that every label grid fits its template footprint
    pub fn validate(&self) -> Result<()> {
        check_grid("header", &self.header, HEADER_HEIGHT)?;
        check_grid("product", &self.product, PRODUCT_HEIGHT)?;
        check_grid("footer", &self.footer, FOOTER_HEIGHT)?;
        Ok(())
    }

    pub fn header_grid(&self) -> Vec<Vec<CellValue>> {
        label_grid(&self.header, HEADER_HEIGHT)
    }

    pub fn footer_grid(&self) -> Vec<Vec<CellValue>> {
        label_grid(&self.footer, FOOTER_HEIGHT)
    }

    /// Fill a fresh copy of the product template with one order
    pub fn render_block(&self, order: &MappedOrder) -> RenderedBlock {
        let mut cells = label_grid(&self.product, PRODUCT_HEIGHT);

        for field in OrderField::ALL {
            let slot = product_slot(field);
            cells[slot.row][slot.column] = order.value(field);
        }

        if order.image.is_empty() {
            log::warn!("Order #{} has no image", order.number);
        }
        cells[IMAGE_REGION.first_row][IMAGE_REGION.first_column] = order.image.clone();

        RenderedBlock {
            cells,
            merges: vec![IMAGE_REGION],
        }
    }
}

fn blank_labels(height: usize) -> Vec<Vec<String>> {
    vec![vec![String::new(); TEMPLATE_WIDTH]; height]
}

fn label_grid(labels: &[Vec<String>], height: usize) -> Vec<Vec<CellValue>> {
    let mut grid = vec![vec![CellValue::Empty; TEMPLATE_WIDTH]; height];
    for (row, line) in labels.iter().enumerate().take(height) {
        for (column, label) in line.iter().enumerate().take(TEMPLATE_WIDTH) {
            if !label.is_empty() {
                grid[row][column] = CellValue::Text(label.clone());
            }
        }
    }
    grid
}

fn check_grid(name: &str, labels: &[Vec<String>], height: usize) -> Result<()> {
    if labels.len() > height {
        return Err(LayoutError::Config(format!(
            "{} template has {} rows, at most {} allowed",
            name,
            labels.len(),
            height
        )));
    }
    if let Some(line) = labels.iter().find(|line| line.len() > TEMPLATE_WIDTH) {
        return Err(LayoutError::Config(format!(
            "{} template row has {} columns, at most {} allowed",
            name,
            line.len(),
            TEMPLATE_WIDTH
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::{OrderRecord, map_order};

    #[test]
    fn slots_fit_inside_block() {
        for field in OrderField::ALL {
            let slot = product_slot(field);
            assert!(slot.row < PRODUCT_HEIGHT, "{:?}", field);
            assert!(slot.column < TEMPLATE_WIDTH, "{:?}", field);
        }
        assert!(IMAGE_REGION.last_row < PRODUCT_HEIGHT);
    }

    #[test]
    fn slots_do_not_collide() {
        let mut seen = std::collections::HashSet::new();
        for field in OrderField::ALL {
            let slot = product_slot(field);
            assert!(seen.insert((slot.row, slot.column)), "{:?}", field);
            assert!(!IMAGE_REGION.contains(slot.row, slot.column));
        }
    }

    #[test]
    fn render_block_fills_slots_and_keeps_labels() {
        let template = ProposalTemplate::default();
        let mut values = vec![String::new(); 40];
        values[0] = "yes".into();
        values[36] = "1500".into();
        let order = map_order(&OrderRecord::new(2, values), 3).unwrap();

        let block = template.render_block(&order);
        assert_eq!(block.cells.len(), PRODUCT_HEIGHT);
        assert_eq!(block.cells[0][0], CellValue::Number(3.0));
        assert_eq!(block.cells[16][6], CellValue::Number(1500.0));
        assert_eq!(block.cells[16][5], CellValue::text("Purchase"));
        assert_eq!(block.merges, vec![IMAGE_REGION]);
    }

    #[test]
    fn rendering_does_not_touch_template() {
        let template = ProposalTemplate::default();
        let before = template.clone();
        let order = map_order(&OrderRecord::new(2, vec!["yes".into()]), 1).unwrap();
        let _ = template.render_block(&order);
        assert_eq!(template, before);
    }

    #[test]
    fn oversized_template_is_rejected() {
        let mut template = ProposalTemplate::default();
        template.footer.push(vec![String::new()]);
        assert!(matches!(template.validate(), Err(LayoutError::Config(_))));
    }
}
