//! # Order Router
//!
//! Entry point for order validation. One call is one pure, complete
//! evaluation of an order aggregate.
//!
//! ## Pipeline
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  route(current, input, op)                                              │
//! │      │                                                                  │
//! │      ├─► OrderRules::for_operation(op)      required/optional sets      │
//! │      │                                                                  │
//! │      ├─► FieldValidator (parent)            errors collected            │
//! │      ├─► cast_line_items (each child)       errors collected            │
//! │      ├─► validate_unique_variants           skipped once invalid        │
//! │      ├─► compute_totals                     skipped once invalid        │
//! │      │                                                                  │
//! │      ▼                                                                  │
//! │  Ok(Accepted { changes + totals })                                      │
//! │  Ok(Rejected { every field + aggregate error })                         │
//! │  Err(CoreError::Money)   ← currency mismatch only                       │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use tracing::{debug, error, info};

use crate::changeset::{Outcome, Params};
use crate::error::CoreError;
use crate::line_items::{cast_line_items, validate_unique_variants};
use crate::money::Currency;
use crate::order::{OrderChangeset, OrderChanges, OrderRules, LINE_ITEMS_KEY, ORDER_FIELDS};
use crate::totals::compute_totals;
use crate::types::{Operation, Order};
use crate::validation::FieldValidator;

/// Validates orders against a fixed reference currency.
#[derive(Debug, Clone, Copy)]
pub struct OrderRouter {
    currency: Currency,
}

impl Default for OrderRouter {
    fn default() -> Self {
        OrderRouter::new(Currency::USD)
    }
}

impl OrderRouter {
    pub fn new(currency: Currency) -> Self {
        OrderRouter { currency }
    }

    /// Validates `input` against `current` and computes totals.
    ///
    /// `current` is the persisted order for an update; it is ignored for a
    /// create.
    ///
    /// ## Errors
    /// Returns `Err` only for [`CoreError::Money`], when line totals cannot
    /// be added because their currencies differ. Every user-correctable
    /// problem is reported through [`Outcome::Rejected`].
    pub fn route(
        &self,
        current: Option<&Order>,
        input: &Params,
        op: Operation,
    ) -> Result<Outcome<OrderChanges>, CoreError> {
        let rules = OrderRules::for_operation(op);
        // A create starts from nothing; persisted values never satisfy presence.
        let current = match op {
            Operation::Create => None,
            Operation::Update => current,
        };
        let snapshot = current.map(Order::snapshot).unwrap_or_default();
        let current_items = current.map(|order| order.line_items.clone()).unwrap_or_default();

        debug!(operation = ?op, "validating order fields");
        let parent = FieldValidator::new(ORDER_FIELDS)
            .with_currency(self.currency)
            .validate(&snapshot, input, &rules.fields);

        let mut changeset = OrderChangeset::new(parent, current_items);

        debug!(required = rules.line_items_required, "validating line items");
        cast_line_items(
            &mut changeset,
            input.get(LINE_ITEMS_KEY),
            rules.line_items_required,
            self.currency,
        );
        validate_unique_variants(&mut changeset);

        let changeset = compute_totals(changeset, self.currency).map_err(|err| {
            error!(%err, "order totals could not be computed");
            err
        })?;

        let outcome = changeset.into_outcome();
        match &outcome {
            Outcome::Accepted { value } => {
                debug!(changes = value.changes.len(), "order accepted");
            }
            Outcome::Rejected { errors } => {
                info!(operation = ?op, error_fields = errors.len(), "order rejected");
            }
        }
        Ok(outcome)
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
