//! # Order Rules
//!
//! Static field tables for the order aggregate and the changeset that
//! carries an order plus its line items through the pipeline.
//!
//! ## Operation Table
//! ```text
//! ┌────────────┬──────────────────────────────────────────┬──────────────┐
//! │ Operation  │ Required parent fields                   │ line_items   │
//! ├────────────┼──────────────────────────────────────────┼──────────────┤
//! │ Create     │ slug, state, user_id,                    │ required     │
//! │            │ bill_address_id, ship_address_id         │              │
//! │ Update     │ (none: only supplied fields validated)   │ optional     │
//! └────────────┴──────────────────────────────────────────┴──────────────┘
//! ```
//!
//! `item_total` and `total` are never accepted from input; they are written
//! by the totals step.

use serde::Serialize;

use crate::changeset::{Changes, Changeset, Outcome};
use crate::types::{LineItem, Operation};
use crate::validation::{FieldKind, FieldSets, FieldSpec};

/// Raw input key holding the nested line item list.
pub const LINE_ITEMS_KEY: &str = "line_items";

pub const ORDER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("slug", FieldKind::Text),
    FieldSpec::new("state", FieldKind::Text),
    FieldSpec::new("confirmed", FieldKind::Boolean),
    FieldSpec::new("user_id", FieldKind::Reference),
    FieldSpec::new("bill_address_id", FieldKind::Reference),
    FieldSpec::new("ship_address_id", FieldKind::Reference),
    FieldSpec::new("adjustment_total", FieldKind::Money),
    FieldSpec::new("promo_total", FieldKind::Money),
];

const CREATE_FIELDS: FieldSets = FieldSets::new(
    &["slug", "state", "user_id", "bill_address_id", "ship_address_id"],
    &["confirmed", "adjustment_total", "promo_total"],
);

const UPDATE_FIELDS: FieldSets = FieldSets::new(
    &[],
    &[
        "slug",
        "state",
        "confirmed",
        "user_id",
        "bill_address_id",
        "ship_address_id",
        "adjustment_total",
        "promo_total",
    ],
);

/// Per-operation rule selection for the order aggregate.
#[derive(Debug, Clone, Copy)]
pub struct OrderRules {
    pub fields: FieldSets,
    pub line_items_required: bool,
}

impl OrderRules {
    pub const fn for_operation(op: Operation) -> Self {
        match op {
            Operation::Create => OrderRules {
                fields: CREATE_FIELDS,
                line_items_required: true,
            },
            Operation::Update => OrderRules {
                fields: UPDATE_FIELDS,
                line_items_required: false,
            },
        }
    }
}

// =============================================================================
// Order Changeset
// =============================================================================

/// Parent changeset plus the line item collection.
///
/// Child errors are merged into the parent's errors, so validity is the
/// parent's validity.
#[derive(Debug, Clone)]
pub struct OrderChangeset {
    parent: Changeset,
    line_items: Option<Vec<LineItem>>,
    current_items: Vec<LineItem>,
}

impl OrderChangeset {
    pub fn new(parent: Changeset, current_items: Vec<LineItem>) -> Self {
        OrderChangeset {
            parent,
            line_items: None,
            current_items,
        }
    }

    pub fn is_valid(&self) -> bool {
        self.parent.is_valid()
    }

    pub fn parent(&self) -> &Changeset {
        &self.parent
    }

    pub fn parent_mut(&mut self) -> &mut Changeset {
        &mut self.parent
    }

    /// The submitted, individually valid line items, if any were submitted.
    pub fn line_items(&self) -> Option<&[LineItem]> {
        self.line_items.as_deref()
    }

    pub(crate) fn set_line_items(&mut self, items: Vec<LineItem>) {
        self.line_items = Some(items);
    }

    /// Submitted items when present, otherwise the persisted ones.
    pub fn effective_line_items(&self) -> &[LineItem] {
        self.line_items.as_deref().unwrap_or(&self.current_items)
    }

    pub fn into_outcome(self) -> Outcome<OrderChanges> {
        let (changes, errors) = self.parent.into_parts();
        if errors.is_empty() {
            Outcome::Accepted {
                value: OrderChanges {
                    changes,
                    line_items: self.line_items,
                },
            }
        } else {
            Outcome::Rejected { errors }
        }
    }
}

/// Write-ready changes for an accepted order.
///
/// `line_items`, when present, replaces the whole persisted collection.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OrderChanges {
    pub changes: Changes,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line_items: Option<Vec<LineItem>>,
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ValidationError;
    use crate::money::Money;

    fn item(variant: &str) -> LineItem {
        LineItem {
            variant_id: variant.to_string(),
            quantity: Some(1),
            price: None,
            total: Money::default(),
        }
    }

    #[test]
    fn test_rules_per_operation() {
        let create = OrderRules::for_operation(Operation::Create);
        assert!(create.line_items_required);
        assert!(create.fields.is_required("ship_address_id"));
        assert!(!create.fields.permits("total"));

        let update = OrderRules::for_operation(Operation::Update);
        assert!(!update.line_items_required);
        assert!(update.fields.required.is_empty());
        assert!(update.fields.permits("slug"));
    }

    #[test]
    fn test_every_permitted_field_is_declared() {
        for op in [Operation::Create, Operation::Update] {
            let sets = OrderRules::for_operation(op).fields;
            for name in sets.required.iter().chain(sets.optional) {
                assert!(ORDER_FIELDS.iter().any(|f| f.name == *name), "{name}");
            }
        }
    }

    #[test]
    fn test_effective_items_prefer_submitted() {
        let mut cs = OrderChangeset::new(Changeset::default(), vec![item("V1")]);
        assert_eq!(cs.effective_line_items()[0].variant_id, "V1");

        cs.set_line_items(vec![item("V9")]);
        assert_eq!(cs.effective_line_items()[0].variant_id, "V9");
    }

    #[test]
    fn test_into_outcome_rejects_on_parent_errors() {
        let mut cs = OrderChangeset::new(Changeset::default(), Vec::new());
        cs.parent_mut().add_error("slug", ValidationError::Blank);
        assert!(!cs.into_outcome().is_accepted());
    }
}
