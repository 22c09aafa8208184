//! # User Validation
//!
//! Single-record validation for customer accounts, including the
//! password/confirmation pair and credential hashing through the injected
//! [`CredentialHasher`].

use crate::changeset::{Changes, Outcome, Params};
use crate::credential::CredentialHasher;
use crate::error::CoreError;
use crate::types::{Operation, User};
use crate::validation::{FieldKind, FieldSets, FieldSpec, FieldValidator, Rule};

/// Shortest password accepted on create or change.
pub const PASSWORD_MIN_LENGTH: usize = 8;

pub const USER_FIELDS: &[FieldSpec] = &[
    FieldSpec::new("email", FieldKind::Email),
    FieldSpec::new("name", FieldKind::Text),
    FieldSpec::new("password", FieldKind::Password)
        .with_rules(&[Rule::MinLength(PASSWORD_MIN_LENGTH)]),
];

pub const fn user_field_sets(op: Operation) -> FieldSets {
    match op {
        Operation::Create => FieldSets::new(&["email", "password"], &["name"]),
        Operation::Update => FieldSets::new(&[], &["email", "name", "password"]),
    }
}

/// Validates a user change; on success the raw password is replaced by
/// `password_hash`.
///
/// ## Errors
/// Only a failing hasher produces `Err`; rule violations are in
/// [`Outcome::Rejected`].
pub fn validate_user(
    current: Option<&User>,
    input: &Params,
    op: Operation,
    hasher: &dyn CredentialHasher,
) -> Result<Outcome<Changes>, CoreError> {
    let snapshot = current.map(User::snapshot).unwrap_or_default();
    let mut changeset =
        FieldValidator::new(USER_FIELDS).validate(&snapshot, input, &user_field_sets(op));

    changeset.hash_credential("password", hasher)?;

    if !changeset.is_valid() {
        tracing::info!(operation = ?op, error_fields = changeset.errors().len(), "user rejected");
    }
    Ok(changeset.into_outcome())
}
