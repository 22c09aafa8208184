//! # Order Totals
//!
//! Derives `item_total` and `total` from validated line items.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  changeset invalid? ──yes──► return it untouched (no stale totals)      │
//! │         │ no                                                            │
//! │         ▼                                                               │
//! │  item_total = zero(ref) + li[0].total + li[1].total + ...  (exact)     │
//! │  total      = item_total                                                │
//! │                                                                         │
//! │  adjustment_total / promo_total are NOT part of the sum today.          │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Mixed currencies abort with [`MoneyError::CurrencyMismatch`]: that is a
//! data-integrity bug, not something the user can fix by resubmitting.

use crate::changeset::FieldValue;
use crate::error::MoneyError;
use crate::money::{Currency, Money};
use crate::order::OrderChangeset;
use crate::types::LineItem;

/// Exact left-to-right sum of line totals, starting from zero.
pub fn sum_line_items(items: &[LineItem], currency: Currency) -> Result<Money, MoneyError> {
    items
        .iter()
        .try_fold(Money::zero(currency), |acc, item| acc.checked_add(&item.total))
}

/// Writes `item_total` and `total` onto a valid order changeset.
///
/// Uses the submitted line items, or the persisted ones when none were
/// submitted. An invalid changeset is returned unchanged.
// TODO: fold adjustment_total and promo_total into `total` once promotions
// and adjustments are computed by this pipeline.
pub fn compute_totals(
    mut changeset: OrderChangeset,
    currency: Currency,
) -> Result<OrderChangeset, MoneyError> {
    if !changeset.is_valid() {
        return Ok(changeset);
    }

    let item_total = sum_line_items(changeset.effective_line_items(), currency)?;
    let total = item_total;

    tracing::debug!(%item_total, %total, "order totals computed");

    let parent = changeset.parent_mut();
    parent.put_change("item_total", FieldValue::Money(item_total));
    parent.put_change("total", FieldValue::Money(total));
    Ok(changeset)
}

// =============================================================================
// Unit Tests
// =============================================================================
