//! GraphQL response envelope and error-message extraction.

use serde::Deserialize;
use serde_json::{Map, Value};

use crate::domain::registration::Group;

/// GraphQL response envelope.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub(super) struct Response {
    /// Root fields of the executed operation.
    data: Option<Map<String, Value>>,

    /// Errors reported for the executed operation.
    errors: Option<Vec<ResponseError>>,
}

impl Response {
    /// Splits this [`Response`] into its data and its errors.
    ///
    /// Any reported error rejects the whole [`Response`], even when partial
    /// data is present.
    pub(super) fn into_result(
        self,
    ) -> Result<Map<String, Value>, Vec<ResponseError>> {
        match self.errors {
            Some(errors) if !errors.is_empty() => Err(errors),
            _ => Ok(self.data.unwrap_or_default()),
        }
    }
}

/// Single structured error reported by the registry.
///
/// Every part of it is optional, so an unexpected shape never fails the
/// decoding.
#[derive(Clone, Debug, Default, Deserialize)]
#[serde(default)]
pub struct ResponseError {
    /// Top-level message of this error.
    pub message: Option<String>,

    /// Free-form extensions attached to this error.
    pub extensions: Option<Value>,
}

impl ResponseError {
    /// Returns the message of the original (validation) error wrapped by
    /// this [`ResponseError`], if any.
    ///
    /// It lives at `extensions.originalError.message` and is either a
    /// string or a list of strings, in which case the first one is taken.
    #[must_use]
    pub fn original_message(&self) -> Option<&str> {
        let message = self
            .extensions
            .as_ref()?
            .get("originalError")?
            .get("message")?;
        match message {
            Value::String(s) => Some(s.as_str()),
            Value::Array(items) => items.first()?.as_str(),
            Value::Null
            | Value::Bool(_)
            | Value::Number(_)
            | Value::Object(_) => None,
        }
    }
}

/// Extracts a human-readable reason out of the provided [`ResponseError`]s.
///
/// Takes the first error's original message, falling back to its top-level
/// message. A leading field path (like `user.`) is stripped.
#[must_use]
pub fn reason(errors: &[ResponseError]) -> Option<String> {
    let first = errors.first()?;
    let message = first
        .original_message()
        .or(first.message.as_deref())
        .map(str::trim)
        .filter(|m| !m.is_empty())?;
    Some(strip_group(message).to_owned())
}

/// Strips a leading `group.` field path prefix out of the provided `message`.
fn strip_group(message: &str) -> &str {
    message
        .split_once('.')
        .filter(|(prefix, _)| {
            [Group::User, Group::ContactInfo, Group::Document]
                .iter()
                .any(|g| g.to_string() == *prefix)
        })
        .map_or(message, |(_, rest)| rest)
}
