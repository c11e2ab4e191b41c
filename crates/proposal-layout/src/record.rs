//! Order records and their mapping onto named proposal fields

use crate::column::column_index;
use crate::types::*;

/// Checkbox value written into column A of a selected row
pub const CHECKED: &str = "yes";

/// Column holding the product image of an order row
pub const IMAGE_COLUMN: &str = "D";

/// One raw order row from the selection sheet
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRecord {
    /// 1-based row number on the sheet the record was read from
    pub row: usize,
    /// Raw cell values, column A first
    pub values: Vec<String>,
    /// Whether the column A checkbox is ticked
    pub selected: bool,
}

impl OrderRecord {
    pub fn new(row: usize, values: Vec<String>) -> Self {
        let selected = values.first().is_some_and(|v| is_checked(v));
        Self {
            row,
            values,
            selected,
        }
    }

    /// Value at a column letter key. Out-of-range columns read as empty.
    pub fn get(&self, column: &str) -> &str {
        column_index(column)
            .and_then(|i| self.values.get(i))
            .map(String::as_str)
            .unwrap_or("")
    }

    /// Columns B..end, the part of the row shown on the preview sheet
    pub fn display_payload(&self) -> &[String] {
        self.values.get(1..).unwrap_or(&[])
    }
}

/// Checkbox cell semantics: `yes`, `true` or `1`, case-insensitive
pub fn is_checked(raw: &str) -> bool {
    let raw = raw.trim();
    raw.eq_ignore_ascii_case(CHECKED) || raw.eq_ignore_ascii_case("true") || raw == "1"
}

/// Named attributes of a proposal block, in slot-filling order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OrderField {
    Number,
    Amount,
    Volume,
    Weight,
    SheathingWeight,
    TotalWeight,
    CargoRate14To21,
    CargoRate35To45,
    CostOfCargoPackaging,
    UnloadingCost,
    Insurance,
    UnitCostIncludingCommission,
    PriceOfDeliveryInChinaPerBatch,
    FastFreightCost,
    SlowFreightCost,
    Purchase,
}

impl OrderField {
    pub const ALL: [OrderField; 16] = [
        OrderField::Number,
        OrderField::Amount,
        OrderField::Volume,
        OrderField::Weight,
        OrderField::SheathingWeight,
        OrderField::TotalWeight,
        OrderField::CargoRate14To21,
        OrderField::CargoRate35To45,
        OrderField::CostOfCargoPackaging,
        OrderField::UnloadingCost,
        OrderField::Insurance,
        OrderField::UnitCostIncludingCommission,
        OrderField::PriceOfDeliveryInChinaPerBatch,
        OrderField::FastFreightCost,
        OrderField::SlowFreightCost,
        OrderField::Purchase,
    ];

    /// Source column on the order row. `Number` is assigned by the renderer.
    pub fn source_column(self) -> Option<&'static str> {
        match self {
            OrderField::Number => None,
            OrderField::Amount => Some("N"),
            OrderField::Volume => Some("S"),
            OrderField::Weight => Some("T"),
            OrderField::SheathingWeight => Some("U"),
            OrderField::TotalWeight => Some("V"),
            OrderField::CargoRate14To21 => Some("AA"),
            OrderField::CargoRate35To45 => Some("AB"),
            OrderField::CostOfCargoPackaging => Some("AD"),
            OrderField::UnloadingCost => Some("AE"),
            OrderField::Insurance => Some("AT"),
            OrderField::UnitCostIncludingCommission => Some("R"),
            OrderField::PriceOfDeliveryInChinaPerBatch => Some("O"),
            OrderField::FastFreightCost => Some("AL"),
            OrderField::SlowFreightCost => Some("AM"),
            OrderField::Purchase => Some("AK"),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            OrderField::Number => "number",
            OrderField::Amount => "amount",
            OrderField::Volume => "volume",
            OrderField::Weight => "weight",
            OrderField::SheathingWeight => "sheathingWeight",
            OrderField::TotalWeight => "totalWeight",
            OrderField::CargoRate14To21 => "cargoRate14_21",
            OrderField::CargoRate35To45 => "cargoRate35_45",
            OrderField::CostOfCargoPackaging => "costOfCargoPackaging",
            OrderField::UnloadingCost => "unloadingCost",
            OrderField::Insurance => "insurance",
            OrderField::UnitCostIncludingCommission => "unitCostIncludingCommission",
            OrderField::PriceOfDeliveryInChinaPerBatch => "priceOfDeliveryInChinaPerBatch",
            OrderField::FastFreightCost => "fastFreightCost",
            OrderField::SlowFreightCost => "slowFreightCost",
            OrderField::Purchase => "purchase",
        }
    }
}

/// An order row mapped onto proposal fields
#[derive(Debug, Clone, PartialEq)]
pub struct MappedOrder {
    pub number: usize,
    pub amount: CellValue,
    pub volume: CellValue,
    pub weight: CellValue,
    pub sheathing_weight: CellValue,
    pub total_weight: CellValue,
    pub cargo_rate_14_21: CellValue,
    pub cargo_rate_35_45: CellValue,
    pub cost_of_cargo_packaging: CellValue,
    pub unloading_cost: CellValue,
    pub insurance: CellValue,
    pub unit_cost_including_commission: CellValue,
    pub price_of_delivery_in_china_per_batch: CellValue,
    pub fast_freight_cost: f64,
    pub slow_freight_cost: f64,
    pub purchase: f64,
    pub image: CellValue,
}

impl MappedOrder {
    pub fn value(&self, field: OrderField) -> CellValue {
        match field {
            OrderField::Number => CellValue::Number(self.number as f64),
            OrderField::Amount => self.amount.clone(),
            OrderField::Volume => self.volume.clone(),
            OrderField::Weight => self.weight.clone(),
            OrderField::SheathingWeight => self.sheathing_weight.clone(),
            OrderField::TotalWeight => self.total_weight.clone(),
            OrderField::CargoRate14To21 => self.cargo_rate_14_21.clone(),
            OrderField::CargoRate35To45 => self.cargo_rate_35_45.clone(),
            OrderField::CostOfCargoPackaging => self.cost_of_cargo_packaging.clone(),
            OrderField::UnloadingCost => self.unloading_cost.clone(),
            OrderField::Insurance => self.insurance.clone(),
            OrderField::UnitCostIncludingCommission => self.unit_cost_including_commission.clone(),
            OrderField::PriceOfDeliveryInChinaPerBatch => {
                self.price_of_delivery_in_china_per_batch.clone()
            }
            OrderField::FastFreightCost => CellValue::Number(self.fast_freight_cost),
            OrderField::SlowFreightCost => CellValue::Number(self.slow_freight_cost),
            OrderField::Purchase => CellValue::Number(self.purchase),
        }
    }
}

/// Map a raw record onto proposal fields, giving it the block number `number`.
///
/// Accumulated fields (purchase and both freight costs) must be numeric;
/// a blank cell counts as zero.
pub fn map_order(record: &OrderRecord, number: usize) -> Result<MappedOrder> {
    let display = |field: OrderField| {
        field
            .source_column()
            .map(|column| CellValue::from_raw(record.get(column)))
            .unwrap_or_default()
    };

    Ok(MappedOrder {
        number,
        amount: display(OrderField::Amount),
        volume: display(OrderField::Volume),
        weight: display(OrderField::Weight),
        sheathing_weight: display(OrderField::SheathingWeight),
        total_weight: display(OrderField::TotalWeight),
        cargo_rate_14_21: display(OrderField::CargoRate14To21),
        cargo_rate_35_45: display(OrderField::CargoRate35To45),
        cost_of_cargo_packaging: display(OrderField::CostOfCargoPackaging),
        unloading_cost: display(OrderField::UnloadingCost),
        insurance: display(OrderField::Insurance),
        unit_cost_including_commission: display(OrderField::UnitCostIncludingCommission),
        price_of_delivery_in_china_per_batch: display(OrderField::PriceOfDeliveryInChinaPerBatch),
        fast_freight_cost: required_number(record, OrderField::FastFreightCost)?,
        slow_freight_cost: required_number(record, OrderField::SlowFreightCost)?,
        purchase: required_number(record, OrderField::Purchase)?,
        image: CellValue::from_raw(record.get(IMAGE_COLUMN)),
    })
}

fn required_number(record: &OrderRecord, field: OrderField) -> Result<f64> {
    let column = field.source_column().unwrap_or("A");
    let raw = record.get(column);
    if raw.trim().is_empty() {
        return Ok(0.0);
    }
    parse_number(raw).ok_or_else(|| LayoutError::NonNumeric {
        row: record.row,
        column,
        field: field.name(),
        value: raw.to_string(),
    })
}
