//! # orderly-core: Domain Validation for Order Management
//!
//! This crate decides whether a proposed change to a user, a stock item, or
//! an order (with its nested line items) is well-formed, and computes the
//! derived values that go with it. Everything here is a pure function of its
//! input; the only call that leaves the crate is the injected credential
//! hasher.
//!
//! ## Architecture Position
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        Orderly Architecture                             │
//! │                                                                         │
//! │  ┌─────────────────────────────────────────────────────────────────┐   │
//! │  │           Callers (orderly CLI, HTTP handlers, jobs)            │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ raw JSON params + Operation            │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │             ★ orderly-core (THIS CRATE) ★                       │   │
//! │  │                                                                 │   │
//! │  │   ┌────────────┐  ┌────────────┐  ┌────────────┐  ┌──────────┐ │   │
//! │  │   │ validation │  │ line_items │  │   totals   │  │  router  │ │   │
//! │  │   │ per-field  │  │ per-child  │  │ exact sums │  │ pipeline │ │   │
//! │  │   │ rules      │  │ + unique   │  │            │  │          │ │   │
//! │  │   └────────────┘  └────────────┘  └────────────┘  └──────────┘ │   │
//! │  │                                                                 │   │
//! │  │   NO I/O • NO DATABASE • NO NETWORK • PURE FUNCTIONS           │   │
//! │  └─────────────────────────────┬───────────────────────────────────┘   │
//! │                                │ Outcome::Accepted { changes }          │
//! │  ┌─────────────────────────────▼───────────────────────────────────┐   │
//! │  │          Persistence collaborator (not in this repo)            │   │
//! │  │   transactions, foreign keys → FieldErrors::from_foreign_key    │   │
//! │  └─────────────────────────────────────────────────────────────────┘   │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Modules
//!
//! - [`money`] - Exact decimal `Money` with a currency
//! - [`changeset`] - Changesets, typed field values, tagged outcomes
//! - [`validation`] - The field validator and its rule tables
//! - [`line_items`] - Per-child validation and the unique-variant invariant
//! - [`totals`] - `item_total` / `total` derivation
//! - [`router`] - Create/update pipeline for orders
//! - [`user`], [`stock`] - Single-record collaborators
//! - [`credential`] - Injected hashing seam
//! - [`error`] - Error types
//!
//! ## Example Usage
//!
//! ```rust
//! use orderly_core::{Operation, OrderRouter, Params};
//!
//! let input: Params = serde_json::from_str(r#"{
//!     "slug": "R100", "state": "cart",
//!     "user_id": 1, "bill_address_id": 2, "ship_address_id": 3,
//!     "line_items": [
//!         {"variant_id": "V1", "total": "10.00"},
//!         {"variant_id": "V2", "total": "5.50"}
//!     ]
//! }"#).unwrap();
//!
//! let outcome = OrderRouter::default()
//!     .route(None, &input, Operation::Create)
//!     .unwrap();
//!
//! let changes = outcome.accepted().unwrap();
//! assert_eq!(changes.changes["total"].as_money().unwrap().to_string(), "15.50 USD");
//! ```

// =============================================================================
// Module Declarations
// =============================================================================

pub mod changeset;
pub mod credential;
pub mod error;
pub mod line_items;
pub mod money;
pub mod order;
pub mod router;
pub mod stock;
pub mod totals;
pub mod types;
pub mod user;
pub mod validation;

// =============================================================================
// Re-exports for Convenience
// =============================================================================

pub use changeset::{Changes, Changeset, FieldValue, Outcome, Params};
pub use credential::CredentialHasher;
pub use error::{CoreError, CredentialError, FieldErrors, MoneyError, ValidationError};
pub use money::{Currency, Money};
pub use order::OrderChanges;
pub use router::OrderRouter;
pub use stock::validate_stock_item;
pub use types::*;
pub use user::validate_user;
