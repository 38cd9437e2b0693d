//! Validation failure and chain error types.

use crate::rule::RuleKind;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};

/// A single validation failure.
///
/// Serializes to the shape callers depend on:
///
/// ```json
/// {
///   "sessionName": "CreateOrder",
///   "message": "Invalid Input: code. It is a mandatory field.",
///   "fieldName": "code",
///   "timestamp": "1718000000000"
/// }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, thiserror::Error)]
#[serde(rename_all = "camelCase")]
#[error("{message}")]
pub struct ValidationFailure {
    session_name: String,
    message: String,
    field_name: String,
    timestamp: String,
    #[serde(skip)]
    rule: Option<RuleKind>,
}

impl ValidationFailure {
    /// Create a failure stamped with the current time.
    pub fn new(
        session_name: impl Into<String>,
        message: impl Into<String>,
        field_name: impl Into<String>,
    ) -> Self {
        Self {
            session_name: session_name.into(),
            message: message.into(),
            field_name: field_name.into(),
            timestamp: now_millis(),
            rule: None,
        }
    }

    pub(crate) fn with_rule(mut self, rule: RuleKind) -> Self {
        self.rule = Some(rule);
        self
    }

    /// Name of the validation session that produced this failure.
    pub fn session_name(&self) -> &str {
        &self.session_name
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn field_name(&self) -> &str {
        &self.field_name
    }

    /// Creation time in milliseconds since the Unix epoch.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// The rule that produced this failure.
    ///
    /// `None` for aggregated failures and raw rejections.
    pub fn rule(&self) -> Option<RuleKind> {
        self.rule
    }

    /// HTTP status a failure maps to. Always `400 Bad Request`.
    pub fn status(&self) -> StatusCode {
        StatusCode::BAD_REQUEST
    }
}

fn now_millis() -> String {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis())
        .unwrap_or(0)
        .to_string()
}

/// Error returned by rule methods.
///
/// [`ChainError::Invalid`] is a validation failure raised in immediate mode.
/// Every other variant is a caller mistake: those are never recorded in the
/// error sink, whatever the mode.
#[derive(Debug, thiserror::Error)]
pub enum ChainError {
    #[error(transparent)]
    Invalid(#[from] ValidationFailure),

    /// A numeric rule was applied to a value with no integer form: text
    /// that does not parse, a fractional float, or a `u128` beyond `i128`.
    #[error("field `{field}` holds `{value}`, which has no integer form in range")]
    NotNumeric { field: String, value: String },

    /// A text rule was applied to a value with no string form, such as a list.
    #[error("field `{field}` has no string form")]
    NoTextForm { field: String },

    /// An item-count rule was applied to a scalar value.
    #[error("field `{field}` is not a collection")]
    NotACollection { field: String },

    #[error("invalid regex pattern `{pattern}`")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },
}

impl ChainError {
    /// The validation failure, if this is one.
    pub fn failure(&self) -> Option<&ValidationFailure> {
        match self {
            ChainError::Invalid(failure) => Some(failure),
            _ => None,
        }
    }

    pub fn into_failure(self) -> Option<ValidationFailure> {
        match self {
            ChainError::Invalid(failure) => Some(failure),
            _ => None,
        }
    }

    /// Returns `true` for caller mistakes rather than validation failures.
    pub fn is_contract_violation(&self) -> bool {
        !matches!(self, ChainError::Invalid(_))
    }
}
