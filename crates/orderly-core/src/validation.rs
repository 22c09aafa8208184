//! # Validation Module
//!
//! The field validator: one flat set of raw fields in, one [`Changeset`] out.
//!
//! ## Rule Evaluation Order
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │  For each declared field in table order, if it is required or optional: │
//! │                                                                         │
//! │   1. Presence   missing/blank + required   → "cannot be blank"   (stop) │
//! │   2. Cast       wrong JSON shape           → "is invalid"        (stop) │
//! │   3. Format     Email kind, no @domain     → "has invalid format"       │
//! │   4. Rules      MinLength / GreaterThan    → one message per rule       │
//! │   5. Confirm    Password kind only         → on <name>_confirmation     │
//! │                                                                         │
//! │  Keys not declared for this operation are ignored, never an error.      │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//! ```rust
//! use orderly_core::changeset::Params;
//! use orderly_core::validation::{FieldKind, FieldSets, FieldSpec, FieldValidator, Rule};
//!
//! const FIELDS: &[FieldSpec] = &[
//!     FieldSpec::new("email", FieldKind::Email),
//!     FieldSpec::new("password", FieldKind::Password).with_rules(&[Rule::MinLength(8)]),
//! ];
//! const CREATE: FieldSets = FieldSets::new(&["email"], &["password"]);
//!
//! let input: Params = serde_json::from_str(r#"{"email": "nope"}"#).unwrap();
//! let cs = FieldValidator::new(FIELDS).validate(&Params::new(), &input, &CREATE);
//! assert_eq!(cs.errors().get("email").unwrap(), ["has invalid format"]);
//! ```

use once_cell::sync::Lazy;
use regex::Regex;
use rust_decimal::Decimal;
use serde_json::Value;

use crate::changeset::{is_blank, Changeset, FieldValue, Params};
use crate::error::ValidationError;
use crate::money::{Currency, Money};

/// Local part, `@`, and a domain with at least one dot.
static EMAIL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern compiles")
});

// =============================================================================
// Field Declarations
// =============================================================================

/// How a raw JSON value is cast and which implicit checks apply.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Text,
    /// Text that must look like `local@domain.tld`.
    Email,
    /// Whole number, from a JSON integer or a numeric string.
    Integer,
    /// Decimal string/number, or `{"amount", "currency"}` object.
    Money,
    Boolean,
    /// Foreign key: non-empty string or integer, stored as text.
    Reference,
    /// Secret with a `<name>_confirmation` sibling.
    Password,
}

/// Explicit, declared rules. Evaluated in declaration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rule {
    /// Minimum number of characters.
    MinLength(usize),
    /// Strictly greater than the bound (integers and money amounts).
    GreaterThan(i64),
}

/// One field of an entity's static field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldSpec {
    pub name: &'static str,
    pub kind: FieldKind,
    pub rules: &'static [Rule],
}

impl FieldSpec {
    pub const fn new(name: &'static str, kind: FieldKind) -> Self {
        FieldSpec {
            name,
            kind,
            rules: &[],
        }
    }

    pub const fn with_rules(self, rules: &'static [Rule]) -> Self {
        FieldSpec { rules, ..self }
    }
}

/// Which fields an operation requires and which it merely permits.
#[derive(Debug, Clone, Copy)]
pub struct FieldSets {
    pub required: &'static [&'static str],
    pub optional: &'static [&'static str],
}

impl FieldSets {
    pub const fn new(required: &'static [&'static str], optional: &'static [&'static str]) -> Self {
        FieldSets { required, optional }
    }

    pub fn is_required(&self, field: &str) -> bool {
        self.required.contains(&field)
    }

    pub fn permits(&self, field: &str) -> bool {
        self.is_required(field) || self.optional.contains(&field)
    }
}

// =============================================================================
// Field Validator
// =============================================================================

/// Validates raw input against a static field table.
#[derive(Debug, Clone, Copy)]
pub struct FieldValidator<'a> {
    fields: &'a [FieldSpec],
    currency: Currency,
}

impl<'a> FieldValidator<'a> {
    pub fn new(fields: &'a [FieldSpec]) -> Self {
        FieldValidator {
            fields,
            currency: Currency::USD,
        }
    }

    /// Currency given to bare money amounts such as `"10.00"`.
    pub fn with_currency(self, currency: Currency) -> Self {
        FieldValidator { currency, ..self }
    }

    /// Runs every applicable rule and returns the full changeset.
    pub fn validate(&self, current: &Params, input: &Params, sets: &FieldSets) -> Changeset {
        let mut changeset = Changeset::new(current.clone());

        for spec in self.fields.iter().filter(|spec| sets.permits(spec.name)) {
            let required = sets.is_required(spec.name);

            let raw = match input.get(spec.name) {
                Some(value) if !is_blank(value) => value,
                Some(_) => {
                    if required {
                        changeset.add_error(spec.name, ValidationError::Blank);
                    }
                    continue;
                }
                None => {
                    if required && !changeset.has_value(spec.name) {
                        changeset.add_error(spec.name, ValidationError::Blank);
                    }
                    continue;
                }
            };

            let Some(value) = cast(spec.kind, raw, self.currency) else {
                changeset.add_error(spec.name, ValidationError::Invalid);
                continue;
            };

            check_value(spec, &value, input, &mut changeset);
            if !changeset.errors().contains(spec.name) {
                changeset.put_change(spec.name, value);
            }
        }

        changeset
    }
}

/// Format, declared rules, then confirmation.
fn check_value(spec: &FieldSpec, value: &FieldValue, input: &Params, changeset: &mut Changeset) {
    if spec.kind == FieldKind::Email {
        let matches = value.as_str().is_some_and(|s| EMAIL_PATTERN.is_match(s));
        if !matches {
            changeset.add_error(spec.name, ValidationError::InvalidFormat);
        }
    }

    for rule in spec.rules {
        if let Some(error) = check_rule(*rule, value) {
            changeset.add_error(spec.name, error);
        }
    }

    if spec.kind == FieldKind::Password {
        let confirmation_key = format!("{}_confirmation", spec.name);
        let confirmation = input.get(&confirmation_key).and_then(Value::as_str);
        if confirmation != value.as_str() {
            changeset.add_error(confirmation_key, ValidationError::ConfirmationMismatch);
        }
    }
}

fn check_rule(rule: Rule, value: &FieldValue) -> Option<ValidationError> {
    match rule {
        Rule::MinLength(min) => {
            let len = value.as_str()?.chars().count();
            (len < min).then_some(ValidationError::TooShort { min })
        }
        Rule::GreaterThan(bound) => {
            let passes = match value {
                FieldValue::Integer(n) => *n > bound,
                FieldValue::Money(m) => m.amount() > Decimal::from(bound),
                _ => return None,
            };
            (!passes).then_some(ValidationError::NotGreaterThan { bound })
        }
    }
}

// =============================================================================
// Casting
// =============================================================================

/// Casts a non-blank raw value. `None` means the shape is wrong.
fn cast(kind: FieldKind, raw: &Value, currency: Currency) -> Option<FieldValue> {
    match kind {
        FieldKind::Text | FieldKind::Email | FieldKind::Password => {
            raw.as_str().map(|s| FieldValue::Text(s.to_string()))
        }
        FieldKind::Reference => match raw {
            Value::String(s) => Some(FieldValue::Text(s.trim().to_string())),
            Value::Number(n) if n.is_i64() || n.is_u64() => Some(FieldValue::Text(n.to_string())),
            _ => None,
        },
        FieldKind::Integer => match raw {
            Value::Number(n) => n.as_i64().map(FieldValue::Integer),
            Value::String(s) => s.trim().parse().ok().map(FieldValue::Integer),
            _ => None,
        },
        FieldKind::Boolean => match raw {
            Value::Bool(b) => Some(FieldValue::Boolean(*b)),
            Value::String(s) => s.trim().parse().ok().map(FieldValue::Boolean),
            _ => None,
        },
        FieldKind::Money => cast_money(raw, currency).map(FieldValue::Money),
    }
}

/// Accepts `"10.00"`, `10.5`, or `{"amount": "10.00", "currency": "EUR"}`.
pub(crate) fn cast_money(raw: &Value, default_currency: Currency) -> Option<Money> {
    match raw {
        Value::String(s) => Money::parse(s, default_currency).ok(),
        // Number's own textual form, so no binary float ever reaches Decimal.
        Value::Number(n) => Money::parse(&n.to_string(), default_currency).ok(),
        Value::Object(map) => {
            let currency = match map.get("currency") {
                None | Some(Value::Null) => default_currency,
                Some(Value::String(code)) => code.parse().ok()?,
                Some(_) => return None,
            };
            match map.get("amount")? {
                Value::String(s) => Money::parse(s, currency).ok(),
                Value::Number(n) => Money::parse(&n.to_string(), currency).ok(),
                _ => None,
            }
        }
        _ => None,
    }
}

// =============================================================================
// Unit Tests
// =============================================================================
