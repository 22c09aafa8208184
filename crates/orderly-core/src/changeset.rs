//! # Changesets
//!
//! A [`Changeset`] is the working state of one validation call: the current
//! snapshot of the entity, the typed changes accepted so far, and every
//! error found so far. Stages append to it; nothing is thrown.
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  raw Params ──► FieldValidator ──► Changeset ──► (more stages) ──►      │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                        Outcome::Accepted { value: changes }             │
//! │                        Outcome::Rejected { errors }                     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

use std::collections::BTreeMap;

use serde::Serialize;

use crate::credential::CredentialHasher;
use crate::error::{CredentialError, FieldErrors, ValidationError};
use crate::money::Money;

/// Raw, untyped key-value input (and current-state snapshots).
pub type Params = serde_json::Map<String, serde_json::Value>;

/// Typed field changes keyed by field name.
pub type Changes = BTreeMap<String, FieldValue>;

// =============================================================================
// Field Value
// =============================================================================

/// A value after it has been cast to its declared field kind.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum FieldValue {
    Boolean(bool),
    Integer(i64),
    Money(Money),
    Text(String),
}

impl FieldValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_money(&self) -> Option<&Money> {
        match self {
            FieldValue::Money(m) => Some(m),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }
}

// =============================================================================
// Outcome
// =============================================================================

/// The tagged result handed back to callers.
///
/// Serializes as `{"status": "accepted", "value": ...}` or
/// `{"status": "rejected", "errors": {...}}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum Outcome<T> {
    Accepted { value: T },
    Rejected { errors: FieldErrors },
}

impl<T> Outcome<T> {
    pub fn is_accepted(&self) -> bool {
        matches!(self, Outcome::Accepted { .. })
    }

    pub fn accepted(&self) -> Option<&T> {
        match self {
            Outcome::Accepted { value } => Some(value),
            Outcome::Rejected { .. } => None,
        }
    }

    pub fn rejected(&self) -> Option<&FieldErrors> {
        match self {
            Outcome::Accepted { .. } => None,
            Outcome::Rejected { errors } => Some(errors),
        }
    }

}

// =============================================================================
// Changeset
// =============================================================================

/// Accumulated state of a single validation call.
#[derive(Debug, Clone, Default)]
pub struct Changeset {
    data: Params,
    changes: Changes,
    errors: FieldErrors,
}

impl Changeset {
    /// Starts a changeset over the given current-state snapshot.
    pub fn new(data: Params) -> Self {
        Changeset {
            data,
            changes: Changes::new(),
            errors: FieldErrors::new(),
        }
    }

    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    pub fn data(&self) -> &Params {
        &self.data
    }

    pub fn changes(&self) -> &Changes {
        &self.changes
    }

    pub fn errors(&self) -> &FieldErrors {
        &self.errors
    }

    pub fn get_change(&self, field: &str) -> Option<&FieldValue> {
        self.changes.get(field)
    }

    /// True when `field` has a change or a non-blank current value.
    pub fn has_value(&self, field: &str) -> bool {
        self.changes.contains_key(field)
            || self.data.get(field).is_some_and(|value| !is_blank(value))
    }

    pub fn put_change(&mut self, field: impl Into<String>, value: FieldValue) {
        self.changes.insert(field.into(), value);
    }

    pub fn add_error(&mut self, field: impl Into<String>, error: ValidationError) {
        self.errors.add(field, error);
    }

    /// Folds a child's errors in under `prefix.<field>` keys.
    pub fn merge_nested_errors(&mut self, prefix: &str, errors: FieldErrors) {
        self.errors.merge_nested(prefix, errors);
    }

    /// Replaces a submitted secret with its derived hash.
    ///
    /// Only runs for a valid changeset that carries a change for `field`.
    /// The raw secret never survives into the output: the change for
    /// `field` is removed and `<field>_hash` is added in its place.
    pub fn hash_credential(
        &mut self,
        field: &str,
        hasher: &dyn CredentialHasher,
    ) -> Result<(), CredentialError> {
        if !self.is_valid() {
            return Ok(());
        }

        let Some(FieldValue::Text(secret)) = self.changes.remove(field) else {
            return Ok(());
        };

        let hash = hasher.hash(&secret)?;
        self.put_change(format!("{field}_hash"), FieldValue::Text(hash));
        Ok(())
    }

    pub fn into_parts(self) -> (Changes, FieldErrors) {
        (self.changes, self.errors)
    }

    pub fn into_outcome(self) -> Outcome<Changes> {
        if self.errors.is_empty() {
            Outcome::Accepted {
                value: self.changes,
            }
        } else {
            Outcome::Rejected {
                errors: self.errors,
            }
        }
    }
}

/// Missing, `null`, and whitespace-only strings all count as blank.
pub fn is_blank(value: &serde_json::Value) -> bool {
    match value {
        serde_json::Value::Null => true,
        serde_json::Value::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
