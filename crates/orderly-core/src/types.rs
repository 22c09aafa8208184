//! # Domain Types
//!
//! Persisted shapes of the entities the validators guard, plus the operation
//! tag. These are *snapshots*: the caller loads one from storage, hands its
//! [`Params`] view to a validator as the current state, and writes back the
//! accepted changes.
//!
//! ## Type Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Domain Types                                    │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐               │
//! │  │       Order          │ 1    * │      LineItem        │               │
//! │  │  ──────────────────  │◆──────►│  ──────────────────  │               │
//! │  │  slug, state         │ owns   │  variant_id (unique) │               │
//! │  │  confirmed           │        │  quantity, price     │               │
//! │  │  total, item_total   │        │  total               │               │
//! │  │  adjustment/promo    │        └──────────────────────┘               │
//! │  │  user/address refs   │                                               │
//! │  └──────────────────────┘                                               │
//! │                                                                         │
//! │  ┌──────────────────────┐        ┌──────────────────────┐               │
//! │  │        User          │        │     StockItem        │               │
//! │  │  email, name         │        │  location, variant   │               │
//! │  │  password_hash       │        │  count_on_hand ≥ 0   │               │
//! │  └──────────────────────┘        └──────────────────────┘               │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! Deleting an order deletes its line items; line items have no lifecycle
//! of their own.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use ts_rs::TS;
use uuid::Uuid;

use crate::changeset::Params;
use crate::money::Money;

/// Lifecycle state every new order starts in.
pub const DEFAULT_ORDER_STATE: &str = "cart";

// =============================================================================
// Operation
// =============================================================================

/// Which rule set applies to a validation call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
#[serde(rename_all = "snake_case")]
pub enum Operation {
    /// All required fields must be present; line items are mandatory.
    Create,
    /// Only supplied fields are validated; line items are optional.
    Update,
}

// =============================================================================
// Line Item
// =============================================================================

/// One line of an order, already validated and normalized.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, TS)]
#[ts(export)]
pub struct LineItem {
    /// Product variant; unique within one order.
    pub variant_id: String,
    pub quantity: Option<i64>,
    /// Unit price, when the caller supplied one.
    pub price: Option<Money>,
    /// Line total (given, or unit price × quantity).
    pub total: Money,
}

// =============================================================================
// Order
// =============================================================================

/// The order aggregate root as persisted.
///
/// Missing fields deserialize to the [`Default`] order: zero totals in the
/// reference currency and state `cart`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Order {
    pub id: Option<Uuid>,
    pub slug: String,
    pub state: String,
    pub confirmed: bool,
    pub total: Money,
    pub item_total: Money,
    pub adjustment_total: Money,
    pub promo_total: Money,
    pub user_id: Option<String>,
    pub bill_address_id: Option<String>,
    pub ship_address_id: Option<String>,
    pub line_items: Vec<LineItem>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Default for Order {
    fn default() -> Self {
        Order {
            id: None,
            slug: String::new(),
            state: DEFAULT_ORDER_STATE.to_string(),
            confirmed: false,
            total: Money::default(),
            item_total: Money::default(),
            adjustment_total: Money::default(),
            promo_total: Money::default(),
            user_id: None,
            bill_address_id: None,
            ship_address_id: None,
            line_items: Vec::new(),
            created_at: None,
            updated_at: None,
        }
    }
}

impl Order {
    /// Scalar fields as raw params, for use as a validator's current state.
    ///
    /// Line items are carried separately by the order changeset.
    pub fn snapshot(&self) -> Params {
        into_params(json!({
            "slug": self.slug,
            "state": self.state,
            "confirmed": self.confirmed,
            "total": self.total,
            "item_total": self.item_total,
            "adjustment_total": self.adjustment_total,
            "promo_total": self.promo_total,
            "user_id": self.user_id,
            "bill_address_id": self.bill_address_id,
            "ship_address_id": self.ship_address_id,
        }))
    }
}

// =============================================================================
// User
// =============================================================================

/// A customer account. The raw password is never stored.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    pub id: Option<Uuid>,
    pub email: String,
    pub name: Option<String>,
    #[serde(skip_serializing)]
    pub password_hash: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
}

impl User {
    pub fn snapshot(&self) -> Params {
        into_params(json!({
            "email": self.email,
            "name": self.name,
        }))
    }
}

// =============================================================================
// Stock Item
// =============================================================================

/// On-hand count of one variant at one stock location.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockItem {
    pub id: Option<Uuid>,
    pub stock_location_id: String,
    pub variant_id: String,
    pub count_on_hand: i64,
    pub backorderable: bool,
}

impl StockItem {
    pub fn snapshot(&self) -> Params {
        into_params(json!({
            "stock_location_id": self.stock_location_id,
            "variant_id": self.variant_id,
            "count_on_hand": self.count_on_hand,
            "backorderable": self.backorderable,
        }))
    }
}

fn into_params(value: Value) -> Params {
    match value {
        Value::Object(map) => map,
        _ => Params::new(),
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::money::Currency;

    #[test]
    fn test_order_defaults() {
        let order = Order::default();
        assert_eq!(order.state, "cart");
        assert!(!order.confirmed);
        assert_eq!(order.total, Money::zero(Currency::USD));
        assert!(order.line_items.is_empty());
    }

    #[test]
    fn test_order_snapshot_shape() {
        let order = Order {
            slug: "R100".to_string(),
            user_id: Some("42".to_string()),
            ..Order::default()
        };

        let snapshot = order.snapshot();
        assert_eq!(snapshot["slug"], "R100");
        assert_eq!(snapshot["state"], "cart");
        assert_eq!(snapshot["user_id"], "42");
        assert!(snapshot["bill_address_id"].is_null());
        assert_eq!(snapshot["total"]["currency"], "USD");
        assert!(!snapshot.contains_key("line_items"));
    }

    #[test]
    fn test_partial_order_json_uses_defaults() {
        let order: Order = serde_json::from_str(r#"{"slug": "R7", "user_id": "1"}"#).unwrap();
        assert_eq!(order.slug, "R7");
        assert_eq!(order.state, "cart");
        assert_eq!(order.promo_total, Money::zero(Currency::USD));
        assert!(order.line_items.is_empty());
    }

    #[test]
    fn test_operation_serde() {
        let op: Operation = serde_json::from_str("\"update\"").unwrap();
        assert_eq!(op, Operation::Update);
    }

    #[test]
    fn test_user_never_serializes_hash() {
        let user = User {
            email: "a@b.co".to_string(),
            password_hash: Some("secret-hash".to_string()),
            ..User::default()
        };
        let json = serde_json::to_string(&user).unwrap();
        assert!(!json.contains("secret-hash"));
    }
}
