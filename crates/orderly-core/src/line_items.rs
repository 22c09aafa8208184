//! # Line Item Collection
//!
//! Validates the nested `line_items` list of an order: each child on its
//! own, then one linear pass for the cross-child invariant.
//!
//! ```text
//! raw [ {..}, {..}, {..} ]
//!        │     │     │        per child: FieldValidator + total derivation
//!        ▼     ▼     ▼
//!     LineItem LineItem LineItem   (only if every child passed)
//!        │
//!        ▼
//!  seen = {}; for item in order: insert(variant_id) or FAIL, stop
//! ```
//!
//! The uniqueness pass is fail-fast: it reports the first repeated variant
//! and says nothing about anything after it.

use std::collections::HashSet;

use serde_json::Value;

use crate::changeset::{FieldValue, Params};
use crate::error::{FieldErrors, ValidationError, DUPLICATE_VARIANTS_KEY};
use crate::money::Currency;
use crate::order::{OrderChangeset, LINE_ITEMS_KEY};
use crate::types::LineItem;
use crate::validation::{FieldKind, FieldSets, FieldSpec, FieldValidator, Rule};

pub const LINE_ITEM_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("variant_id", FieldKind::Reference),
    FieldSpec::new("quantity", FieldKind::Integer).with_rules(&[Rule::GreaterThan(0)]),
    FieldSpec::new("price", FieldKind::Money),
    FieldSpec::new("total", FieldKind::Money),
];

const LINE_ITEM_SETS: FieldSets = FieldSets::new(&["variant_id"], &["quantity", "price", "total"]);

/// Validates one raw child into a normalized [`LineItem`].
///
/// A missing `total` is derived from `price × quantity` when both are given.
pub fn validate_line_item(raw: &Params, currency: Currency) -> Result<LineItem, FieldErrors> {
    let mut cs = FieldValidator::new(LINE_ITEM_FIELDS)
        .with_currency(currency)
        .validate(&Params::new(), raw, &LINE_ITEM_SETS);

    if cs.get_change("total").is_none() && !cs.errors().contains("total") {
        let price = cs.get_change("price").and_then(FieldValue::as_money).copied();
        let quantity = cs.get_change("quantity").and_then(FieldValue::as_i64);
        match (price, quantity) {
            (Some(price), Some(qty)) => match price.multiply_quantity(qty) {
                Ok(total) => cs.put_change("total", FieldValue::Money(total)),
                Err(_) => cs.add_error("total", ValidationError::Invalid),
            },
            // A rejected price or quantity already explains the gap.
            _ if cs.errors().contains("price") || cs.errors().contains("quantity") => {}
            _ => cs.add_error("total", ValidationError::Blank),
        }
    }

    let (changes, errors) = cs.into_parts();
    if !errors.is_empty() {
        return Err(errors);
    }

    let text = |field: &str| changes.get(field).and_then(FieldValue::as_str).map(str::to_string);
    let money = |field: &str| changes.get(field).and_then(FieldValue::as_money).copied();

    match (text("variant_id"), money("total")) {
        (Some(variant_id), Some(total)) => Ok(LineItem {
            variant_id,
            quantity: changes.get("quantity").and_then(FieldValue::as_i64),
            price: money("price"),
            total,
        }),
        // Only reachable if LINE_ITEM_FIELDS stops requiring these two.
        _ => {
            let mut errors = FieldErrors::new();
            errors.add("variant_id", ValidationError::Invalid);
            Err(errors)
        }
    }
}

/// Casts the raw `line_items` value into the order changeset.
///
/// Every child is validated even when others fail, so all child errors are
/// reported together under `line_items[<index>].<field>`. The typed list is
/// only stored when every child passed.
pub fn cast_line_items(
    changeset: &mut OrderChangeset,
    raw: Option<&Value>,
    required: bool,
    currency: Currency,
) {
    let items = match raw {
        None | Some(Value::Null) => {
            if required {
                changeset.parent_mut().add_error(LINE_ITEMS_KEY, ValidationError::Blank);
            }
            return;
        }
        Some(Value::Array(items)) => items,
        Some(_) => {
            changeset.parent_mut().add_error(LINE_ITEMS_KEY, ValidationError::Invalid);
            return;
        }
    };

    if items.is_empty() && required {
        changeset.parent_mut().add_error(LINE_ITEMS_KEY, ValidationError::Blank);
        return;
    }

    let mut validated = Vec::with_capacity(items.len());
    let mut all_valid = true;

    for (index, raw_item) in items.iter().enumerate() {
        let prefix = format!("{LINE_ITEMS_KEY}[{index}]");
        let Some(fields) = raw_item.as_object() else {
            changeset.parent_mut().add_error(prefix, ValidationError::Invalid);
            all_valid = false;
            continue;
        };

        match validate_line_item(fields, currency) {
            Ok(item) => validated.push(item),
            Err(errors) => {
                tracing::debug!(index, fields = errors.len(), "line item rejected");
                changeset.parent_mut().merge_nested_errors(&prefix, errors);
                all_valid = false;
            }
        }
    }

    if all_valid {
        changeset.set_line_items(validated);
    }
}

/// Rejects the aggregate if two submitted line items share a variant.
///
/// No-op when the changeset is already invalid.
pub fn validate_unique_variants(changeset: &mut OrderChangeset) {
    if !changeset.is_valid() {
        return;
    }
    let duplicate = changeset
        .line_items()
        .and_then(first_repeated_variant)
        .map(str::to_string);

    if let Some(variant_id) = duplicate {
        tracing::debug!(%variant_id, "duplicate variant in line items");
        changeset
            .parent_mut()
            .add_error(DUPLICATE_VARIANTS_KEY, ValidationError::DuplicateVariants);
    }
}

/// The first variant seen twice, walking the items in order.
fn first_repeated_variant(items: &[LineItem]) -> Option<&str> {
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .map(|item| item.variant_id.as_str())
        .find(|variant_id| !seen.insert(*variant_id))
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::changeset::Changeset;
    use crate::money::Money;
    use rust_decimal_macros::dec;
    use serde_json::json;

    fn params(value: Value) -> Params {
        value.as_object().cloned().unwrap_or_default()
    }

    fn empty_order() -> OrderChangeset {
        OrderChangeset::new(Changeset::default(), Vec::new())
    }

    fn cast(raw: Value, required: bool) -> OrderChangeset {
        let mut cs = empty_order();
        cast_line_items(&mut cs, Some(&raw), required, Currency::USD);
        cs
    }

    #[test]
    fn test_line_item_with_explicit_total() {
        let raw = params(json!({"variant_id": "V1", "total": "10.00"}));
        let item = validate_line_item(&raw, Currency::USD).unwrap();
        assert_eq!(item.variant_id, "V1");
        assert_eq!(item.total, Money::new(dec!(10.00), Currency::USD));
        assert_eq!(item.quantity, None);
    }

    #[test]
    fn test_line_item_total_derived_from_price() {
        let item = validate_line_item(
            &params(json!({"variant_id": 7, "quantity": 3, "price": "2.99"})),
            Currency::USD,
        )
        .unwrap();
        assert_eq!(item.variant_id, "7");
        assert_eq!(item.total.amount(), dec!(8.97));
    }

    #[test]
    fn test_line_item_field_errors() {
        let raw = params(json!({"quantity": 0}));
        let errors = validate_line_item(&raw, Currency::USD).unwrap_err();
        assert_eq!(errors.get("variant_id").unwrap(), ["cannot be blank"]);
        assert_eq!(errors.get("quantity").unwrap(), ["must be greater than 0"]);
        assert!(!errors.contains("total"));

        let raw = params(json!({"variant_id": "V1"}));
        let errors = validate_line_item(&raw, Currency::USD).unwrap_err();
        assert_eq!(errors.get("total").unwrap(), ["cannot be blank"]);
    }

    #[test]
    fn test_required_collection_must_be_present() {
        let mut missing = empty_order();
        cast_line_items(&mut missing, None, true, Currency::USD);
        assert_eq!(
            missing.parent().errors().get("line_items").unwrap(),
            ["cannot be blank"]
        );

        let empty = cast(json!([]), true);
        assert!(empty.parent().errors().contains("line_items"));
    }

    #[test]
    fn test_optional_collection_may_be_absent_or_emptied() {
        let mut absent = empty_order();
        cast_line_items(&mut absent, None, false, Currency::USD);
        assert!(absent.is_valid());
        assert!(absent.line_items().is_none());

        let emptied = cast(json!([]), false);
        assert!(emptied.is_valid());
        assert_eq!(emptied.line_items(), Some(&[][..]));
    }

    #[test]
    fn test_all_failing_children_are_reported() {
        let cs = cast(
            json!([
                {"variant_id": "V1", "total": "1.00"},
                {"total": "1.00"},
                "not-an-object",
                {"variant_id": "V4", "total": "lots"},
            ]),
            false,
        );

        let errors = cs.parent().errors();
        assert_eq!(errors.get("line_items[1].variant_id").unwrap(), ["cannot be blank"]);
        assert_eq!(errors.get("line_items[2]").unwrap(), ["is invalid"]);
        assert_eq!(errors.get("line_items[3].total").unwrap(), ["is invalid"]);
        assert!(cs.line_items().is_none());
    }

    #[test]
    fn test_non_list_is_invalid() {
        let cs = cast(json!({"variant_id": "V1"}), false);
        assert_eq!(cs.parent().errors().get("line_items").unwrap(), ["is invalid"]);
    }

    #[test]
    fn test_duplicate_variants_fail_fast() {
        let mut cs = cast(
            json!([
                {"variant_id": "A", "total": "1.00"},
                {"variant_id": "B", "total": "1.00"},
                {"variant_id": "A", "total": "1.00"},
                {"variant_id": "C", "total": "1.00"},
            ]),
            true,
        );
        assert!(cs.is_valid());

        validate_unique_variants(&mut cs);

        let errors = cs.parent().errors();
        assert_eq!(errors.len(), 1);
        assert_eq!(
            errors.get("duplicate_variants").unwrap(),
            ["line_items must have unique variant_ids"]
        );
    }

    #[test]
    fn test_uniqueness_skipped_when_already_invalid() {
        let mut cs = cast(
            json!([
                {"variant_id": "A", "total": "1.00"},
                {"variant_id": "A", "total": "1.00"},
            ]),
            true,
        );
        cs.parent_mut().add_error("slug", ValidationError::Blank);

        validate_unique_variants(&mut cs);

        assert!(!cs.parent().errors().contains("duplicate_variants"));
        assert_eq!(cs.parent().errors().len(), 1);
    }

    #[test]
    fn test_unique_variants_pass() {
        let mut cs = cast(
            json!([
                {"variant_id": "A", "total": "1.00"},
                {"variant_id": "B", "total": "1.00"},
            ]),
            true,
        );
        validate_unique_variants(&mut cs);
        assert!(cs.is_valid());
    }
}
