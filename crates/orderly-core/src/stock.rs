//! # Stock Item Validation
//!
//! On-hand counts per variant and stock location. The location and variant
//! references are shaped here; whether they exist is for persistence to say.

use crate::changeset::{Changes, Outcome, Params};
use crate::types::{Operation, StockItem};
use crate::validation::{FieldKind, FieldSets, FieldSpec, FieldValidator, Rule};

pub const STOCK_ITEM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("stock_location_id", FieldKind::Reference),
    FieldSpec::new("variant_id", FieldKind::Reference),
    FieldSpec::new("count_on_hand", FieldKind::Integer).with_rules(&[Rule::GreaterThan(-1)]),
    FieldSpec::new("backorderable", FieldKind::Boolean),
];

pub const fn stock_item_field_sets(op: Operation) -> FieldSets {
    match op {
        Operation::Create => FieldSets::new(
            &["stock_location_id", "variant_id", "count_on_hand"],
            &["backorderable"],
        ),
        Operation::Update => FieldSets::new(
            &[],
            &["stock_location_id", "variant_id", "count_on_hand", "backorderable"],
        ),
    }
}

pub fn validate_stock_item(
    current: Option<&StockItem>,
    input: &Params,
    op: Operation,
) -> Outcome<Changes> {
    let snapshot = current.map(StockItem::snapshot).unwrap_or_default();
    FieldValidator::new(STOCK_ITEM_FIELDS)
        .validate(&snapshot, input, &stock_item_field_sets(op))
        .into_outcome()
}
