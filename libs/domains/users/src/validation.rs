//! Field rules and serde helpers shared by the user payloads.

use serde::{Deserialize, Deserializer};
use validator::{ValidationError, ValidationErrors};

/// Reject values made only of whitespace.
pub fn not_blank(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        let mut err = ValidationError::new("blank");
        err.message = Some("must not be blank".into());
        return Err(err);
    }
    Ok(())
}

/// Canonical form used for storage, lookup and uniqueness.
pub fn normalize_email(raw: &str) -> String {
    raw.trim().to_lowercase()
}

/// One line naming every failing field, sorted for stable output.
pub fn describe(errors: &ValidationErrors) -> String {
    let mut fields: Vec<String> = errors
        .field_errors()
        .iter()
        .map(|(field, errs)| {
            let reason = errs
                .first()
                .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
                .or_else(|| errs.first().map(|e| e.code.to_string()))
                .unwrap_or_else(|| "invalid".to_string());
            format!("{}: {}", field, reason)
        })
        .collect();
    fields.sort();
    fields.join(", ")
}

pub(crate) fn normalized_email<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    String::deserialize(deserializer).map(|raw| normalize_email(&raw))
}

/// Like [`normalized_email`] for patch fields; `null` is rejected.
pub(crate) fn some_normalized_email<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    normalized_email(deserializer).map(Some)
}

/// Marks a patch field as supplied.
///
/// Paired with `#[serde(default)]`: an absent key stays `None`, a present one
/// becomes `Some(value)`. For `Option<Option<T>>` that turns `null` into
/// `Some(None)`; for `Option<String>` it makes `null` a type error.
pub(crate) fn deserialize_some<'de, T, D>(deserializer: D) -> Result<Option<T>, D::Error>
where
    T: Deserialize<'de>,
    D: Deserializer<'de>,
{
    T::deserialize(deserializer).map(Some)
}
