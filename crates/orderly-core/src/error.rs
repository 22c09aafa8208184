//! # Error Types
//!
//! Domain-specific error types for orderly-core.
//!
//! ## Error Hierarchy
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                         Error Types                                     │
//! │                                                                         │
//! │  User-correctable (collected, never returned as Err)                    │
//! │  ├── ValidationError  - One rule violation on one field                │
//! │  └── FieldErrors      - field → ordered messages, what callers see     │
//! │                                                                         │
//! │  Internal (returned as Err)                                             │
//! │  ├── MoneyError       - Cross-currency addition, overflow              │
//! │  ├── CredentialError  - The injected hasher failed                     │
//! │  └── CoreError        - Wraps the two above                            │
//! │                                                                         │
//! │  Flow: ValidationError → FieldErrors → Outcome::Rejected               │
//! │        MoneyError / CredentialError → CoreError → caller (500-style)    │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Design Principles
//! 1. Use `thiserror` for derive macros (not manual impl)
//! 2. The `Display` text of `ValidationError` is a compatibility surface:
//!    callers and tests match on it verbatim
//! 3. Errors are enum variants, never String, until they reach `FieldErrors`

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::money::Currency;

// =============================================================================
// Core Error
// =============================================================================

/// Internal errors.
///
/// None of these can be fixed by the user resubmitting the same shape of
/// input. They indicate a bug upstream or a broken collaborator.
#[derive(Debug, Error)]
pub enum CoreError {
    /// Money arithmetic failed while computing totals.
    #[error("Money error: {0}")]
    Money(#[from] MoneyError),

    /// The injected credential hasher failed.
    #[error("Credential error: {0}")]
    Credential(#[from] CredentialError),
}

// =============================================================================
// Money Error
// =============================================================================

/// Money construction and arithmetic errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MoneyError {
    /// Addition between two different currencies.
    ///
    /// ## When This Occurs
    /// - A line item priced in EUR on an order whose reference currency is USD
    /// - A persisted snapshot carrying mixed currencies
    ///
    /// Validation does not catch this; it is a data-integrity bug.
    #[error("Cannot add {right} to {left}: currency mismatch")]
    CurrencyMismatch { left: Currency, right: Currency },

    /// Result does not fit in the decimal range.
    #[error("Money amount overflowed")]
    Overflow,

    /// Currency code is not three uppercase ASCII letters.
    #[error("Invalid currency code: {0}")]
    InvalidCurrency(String),

    /// Amount string is not a decimal number.
    #[error("Invalid amount: {0}")]
    InvalidAmount(String),
}

// =============================================================================
// Credential Error
// =============================================================================

/// Errors raised by a [`crate::credential::CredentialHasher`].
#[derive(Debug, Error)]
pub enum CredentialError {
    #[error("Failed to hash credential: {0}")]
    HashFailed(String),
}

// =============================================================================
// Validation Error
// =============================================================================

/// A single rule violation on a single field.
///
/// ## Message Table
/// ```text
/// Blank                 → "cannot be blank"
/// Invalid               → "is invalid"
/// InvalidFormat         → "has invalid format"
/// TooShort { 8 }        → "should be at least 8 character(s)"
/// NotGreaterThan { 0 }  → "must be greater than 0"
/// ConfirmationMismatch  → "does not match confirmation"
/// DuplicateVariants     → "line_items must have unique variant_ids"
/// DoesNotExist          → "does not exist"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or empty.
    #[error("cannot be blank")]
    Blank,

    /// The value could not be cast to the field's type.
    #[error("is invalid")]
    Invalid,

    /// The value does not match the field's pattern (e.g. email).
    #[error("has invalid format")]
    InvalidFormat,

    /// String shorter than the declared minimum.
    #[error("should be at least {min} character(s)")]
    TooShort { min: usize },

    /// Number not strictly greater than the declared bound.
    #[error("must be greater than {bound}")]
    NotGreaterThan { bound: i64 },

    /// Confirmation field differs from the field it confirms.
    #[error("does not match confirmation")]
    ConfirmationMismatch,

    /// Two line items reference the same variant.
    #[error("line_items must have unique variant_ids")]
    DuplicateVariants,

    /// A referenced row is missing (reported by persistence, after the fact).
    #[error("does not exist")]
    DoesNotExist,
}

// =============================================================================
// Field Errors
// =============================================================================

/// Mapping from field name to the ordered list of messages for that field.
///
/// Nested line item errors use `line_items[<index>].<field>` keys. The
/// aggregate-level uniqueness violation uses the literal key
/// [`DUPLICATE_VARIANTS_KEY`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldErrors(BTreeMap<String, Vec<String>>);

/// Aggregate-level key for the line item uniqueness violation.
pub const DUPLICATE_VARIANTS_KEY: &str = "duplicate_variants";

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends one message to `field`, keeping earlier messages in order.
    pub fn add(&mut self, field: impl Into<String>, error: ValidationError) {
        self.0
            .entry(field.into())
            .or_default()
            .push(error.to_string());
    }

    /// Messages for `field`, if it has any.
    pub fn get(&self, field: &str) -> Option<&[String]> {
        self.0.get(field).map(Vec::as_slice)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.0.contains_key(field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of fields with at least one message.
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Merges a child's errors under `prefix.<field>`.
    pub fn merge_nested(&mut self, prefix: &str, child: FieldErrors) {
        for (field, messages) in child.0 {
            self.0
                .entry(format!("{prefix}.{field}"))
                .or_default()
                .extend(messages);
        }
    }

    /// Translates a foreign-key constraint failure reported by the
    /// persistence layer into the field-error shape.
    ///
    /// Constraint names follow the `<table>_<column>_fkey` convention:
    ///
    /// ```rust
    /// use orderly_core::FieldErrors;
    ///
    /// let errors = FieldErrors::from_foreign_key("line_items", "line_items_variant_id_fkey");
    /// assert_eq!(errors.get("variant_id").unwrap(), ["does not exist"]);
    /// ```
    ///
    /// Unrecognised constraint names are reported against the whole table.
    pub fn from_foreign_key(table: &str, constraint: &str) -> Self {
        let column = constraint
            .strip_prefix(table)
            .and_then(|rest| rest.strip_prefix('_'))
            .and_then(|rest| rest.strip_suffix("_fkey"))
            .filter(|column| !column.is_empty())
            .unwrap_or(table);

        let mut errors = FieldErrors::new();
        errors.add(column, ValidationError::DoesNotExist);
        errors
    }
}

// =============================================================================
// Unit Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_messages() {
        assert_eq!(ValidationError::Blank.to_string(), "cannot be blank");
        assert_eq!(ValidationError::InvalidFormat.to_string(), "has invalid format");
        assert_eq!(
            ValidationError::TooShort { min: 8 }.to_string(),
            "should be at least 8 character(s)"
        );
        assert_eq!(
            ValidationError::NotGreaterThan { bound: -1 }.to_string(),
            "must be greater than -1"
        );
        assert_eq!(
            ValidationError::ConfirmationMismatch.to_string(),
            "does not match confirmation"
        );
        assert_eq!(
            ValidationError::DuplicateVariants.to_string(),
            "line_items must have unique variant_ids"
        );
    }

    #[test]
    fn test_field_errors_keep_rule_order() {
        let mut errors = FieldErrors::new();
        errors.add("password", ValidationError::TooShort { min: 8 });
        errors.add("password", ValidationError::InvalidFormat);

        assert_eq!(
            errors.get("password").unwrap(),
            ["should be at least 8 character(s)", "has invalid format"]
        );
        assert_eq!(errors.len(), 1);
    }

    #[test]
    fn test_merge_nested() {
        let mut child = FieldErrors::new();
        child.add("variant_id", ValidationError::Blank);

        let mut parent = FieldErrors::new();
        parent.merge_nested("line_items[2]", child);

        assert!(parent.contains("line_items[2].variant_id"));
    }

    #[test]
    fn test_from_foreign_key() {
        let errors = FieldErrors::from_foreign_key("orders", "orders_bill_address_id_fkey");
        assert_eq!(errors.get("bill_address_id").unwrap(), ["does not exist"]);

        let errors = FieldErrors::from_foreign_key("orders", "something_else");
        assert!(errors.contains("orders"));
    }

    #[test]
    fn test_money_error_converts_to_core_error() {
        let err: CoreError = MoneyError::Overflow.into();
        assert!(matches!(err, CoreError::Money(MoneyError::Overflow)));
    }

    #[test]
    fn test_field_errors_serialize_as_plain_map() {
        let mut errors = FieldErrors::new();
        errors.add(DUPLICATE_VARIANTS_KEY, ValidationError::DuplicateVariants);

        let json = serde_json::to_value(&errors).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "duplicate_variants": ["line_items must have unique variant_ids"]
            })
        );
    }
}
