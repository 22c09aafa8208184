//! Request model and dispatch.
//!
//! A request names the entity, the operation, an optional current-state
//! snapshot, and the raw input:
//!
//! ```json
//! {
//!   "entity": "order",
//!   "operation": "create",
//!   "input": { "slug": "R100", "line_items": [ ... ] }
//! }
//! ```

use orderly_core::{
    validate_stock_item, validate_user, CredentialHasher, Currency, Operation, Order, OrderRouter,
    Params, StockItem, User,
};
use serde::Deserialize;
use serde_json::Value;

use crate::error::CliError;

#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "entity", rename_all = "snake_case")]
pub enum Request {
    Order {
        operation: Operation,
        #[serde(default)]
        current: Option<Order>,
        input: Params,
    },
    User {
        operation: Operation,
        #[serde(default)]
        current: Option<User>,
        input: Params,
    },
    StockItem {
        operation: Operation,
        #[serde(default)]
        current: Option<StockItem>,
        input: Params,
    },
}

impl Request {
    pub fn entity(&self) -> &'static str {
        match self {
            Request::Order { .. } => "order",
            Request::User { .. } => "user",
            Request::StockItem { .. } => "stock_item",
        }
    }
}

/// Serialized outcome plus whether it was accepted.
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    pub accepted: bool,
    pub body: Value,
}

/// Runs one request through the matching validator.
pub fn process(
    request: Request,
    currency: Currency,
    hasher: &dyn CredentialHasher,
) -> Result<Response, CliError> {
    let entity = request.entity();
    tracing::debug!(entity, "processing request");

    let (accepted, body) = match request {
        Request::Order {
            operation,
            current,
            input,
        } => {
            let outcome = OrderRouter::new(currency).route(current.as_ref(), &input, operation)?;
            (outcome.is_accepted(), serde_json::to_value(&outcome)?)
        }
        Request::User {
            operation,
            current,
            input,
        } => {
            let outcome = validate_user(current.as_ref(), &input, operation, hasher)?;
            (outcome.is_accepted(), serde_json::to_value(&outcome)?)
        }
        Request::StockItem {
            operation,
            current,
            input,
        } => {
            let outcome = validate_stock_item(current.as_ref(), &input, operation);
            (outcome.is_accepted(), serde_json::to_value(&outcome)?)
        }
    };

    tracing::info!(entity, accepted, "request processed");
    Ok(Response { accepted, body })
}

#[cfg(test)]
mod tests {
    use super::*;
    use orderly_core::CredentialError;
    use serde_json::json;

    fn fake_hash(secret: &str) -> Result<String, CredentialError> {
        Ok(format!("fake${}", secret.len()))
    }

    fn run(request: Value) -> Response {
        let request: Request = serde_json::from_value(request).unwrap();
        process(request, Currency::USD, &fake_hash).unwrap()
    }

    #[test]
    fn test_order_create_scenario() {
        let response = run(json!({
            "entity": "order",
            "operation": "create",
            "input": {
                "slug": "R100",
                "state": "cart",
                "user_id": 1,
                "bill_address_id": 2,
                "ship_address_id": 3,
                "line_items": [
                    {"variant_id": "V1", "total": "10.00"},
                    {"variant_id": "V2", "total": "20.00"}
                ]
            }
        }));

        assert!(response.accepted);
        assert_eq!(response.body["status"], "accepted");
        assert_eq!(
            response.body["value"]["changes"]["total"],
            json!({"amount": "30.00", "currency": "USD"})
        );
    }

    #[test]
    fn test_order_update_with_snapshot() {
        let response = run(json!({
            "entity": "order",
            "operation": "update",
            "current": {
                "id": null,
                "slug": "R100",
                "state": "cart",
                "confirmed": false,
                "total": {"amount": "0", "currency": "USD"},
                "item_total": {"amount": "0", "currency": "USD"},
                "adjustment_total": {"amount": "0", "currency": "USD"},
                "promo_total": {"amount": "0", "currency": "USD"},
                "user_id": "1",
                "bill_address_id": "2",
                "ship_address_id": "3",
                "created_at": null,
                "updated_at": null
            },
            "input": {"state": "address"}
        }));

        assert!(response.accepted);
        assert_eq!(response.body["value"]["changes"]["state"], "address");
    }

    #[test]
    fn test_user_rejection_body() {
        let response = run(json!({
            "entity": "user",
            "operation": "update",
            "current": {"id": null, "email": "a@b.co", "name": null, "created_at": null},
            "input": {"password": "short", "password_confirmation": "short"}
        }));

        assert!(!response.accepted);
        assert_eq!(
            response.body,
            json!({
                "status": "rejected",
                "errors": {"password": ["should be at least 8 character(s)"]}
            })
        );
    }

    #[test]
    fn test_user_create_uses_injected_hasher() {
        let response = run(json!({
            "entity": "user",
            "operation": "create",
            "input": {
                "email": "a@b.co",
                "password": "password123",
                "password_confirmation": "password123"
            }
        }));

        assert_eq!(response.body["value"]["password_hash"], "fake$11");
        assert!(response.body["value"].get("password").is_none());
    }

    #[test]
    fn test_stock_item_request() {
        let response = run(json!({
            "entity": "stock_item",
            "operation": "create",
            "input": {"stock_location_id": 1, "variant_id": 2, "count_on_hand": -1}
        }));

        assert!(!response.accepted);
        assert_eq!(
            response.body["errors"]["count_on_hand"],
            json!(["must be greater than -1"])
        );
    }

    #[test]
    fn test_unknown_entity_is_a_parse_error() {
        let parsed = serde_json::from_value::<Request>(json!({
            "entity": "invoice",
            "operation": "create",
            "input": {}
        }));
        assert!(parsed.is_err());
    }
}
