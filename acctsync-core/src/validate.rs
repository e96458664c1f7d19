//! Uniqueness checks for set-valued declared fields.
//!
//! Regions and associated account ids are sets on the remote side but are
//! carried as ordered lists locally. Duplicates are rejected here, on the
//! declared values, so nothing is sent for an invalid configuration.
//!
//! Account names double as record file names and are checked here too.

use std::collections::HashSet;

use crate::error::ValidationError;
use crate::types::{AccountName, CloudAccountConfig};

pub const FIELD_REGIONS: &str = "regions";
pub const FIELD_ASSOCIATED_ACCOUNT_IDS: &str = "associated_cloud_account_ids";

/// Fails on the first value that repeats, naming `field` in the error.
pub fn ensure_unique<S: AsRef<str>>(field: &'static str, values: &[S]) -> Result<(), ValidationError> {
    let mut seen = HashSet::with_capacity(values.len());
    for value in values {
        let value = value.as_ref();
        if !seen.insert(value) {
            return Err(ValidationError::Duplicate {
                field,
                value: value.to_string(),
            });
        }
    }
    Ok(())
}

/// Rejects names that would not map to a single file under the records dir.
pub fn validate_name(name: &AccountName) -> Result<(), ValidationError> {
    let invalid = |reason| ValidationError::InvalidName {
        name: name.0.clone(),
        reason,
    };
    let name = name.0.as_str();
    if name.is_empty() {
        return Err(invalid("must not be empty"));
    }
    if name.starts_with('.') {
        return Err(invalid("must not start with '.'"));
    }
    if name.chars().any(|c| matches!(c, '/' | '\\' | '\0')) {
        return Err(invalid("must not contain path separators"));
    }
    Ok(())
}

/// Checks every set-valued field sent on create.
pub fn validate_for_create(config: &CloudAccountConfig) -> Result<(), ValidationError> {
    ensure_unique(FIELD_REGIONS, &config.regions)?;
    ensure_unique(FIELD_ASSOCIATED_ACCOUNT_IDS, &config.associated_cloud_account_ids)
}

/// Checks the set-valued fields sent on update. Associated ids are not updatable.
pub fn validate_for_update(config: &CloudAccountConfig) -> Result<(), ValidationError> {
    ensure_unique(FIELD_REGIONS, &config.regions)
}
