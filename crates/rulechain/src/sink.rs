//! Ordered collection of failures recorded during one validation session.

use crate::error::ValidationFailure;
use serde::{Deserialize, Serialize};

/// How [`ErrorSink::joined_message`] renders several failures as one message.
///
/// A single failure is always rendered unwrapped. Missing fields fall back to
/// the defaults when deserializing:
///
/// ```rust,ignore
/// let policy: JoinPolicy = serde_json::from_str(r#"{ "separator": "; " }"#)?;
/// assert_eq!(policy.open, "[ ");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct JoinPolicy {
    /// Placed between messages (default `","`)
    pub separator: String,
    /// Placed before the joined messages (default `"[ "`)
    pub open: String,
    /// Placed after the joined messages (default `" ]"`)
    pub close: String,
}

impl Default for JoinPolicy {
    fn default() -> Self {
        Self {
            separator: ",".to_string(),
            open: "[ ".to_string(),
            close: " ]".to_string(),
        }
    }
}

/// Append-only list of [`ValidationFailure`]s in insertion order.
///
/// Duplicates are kept. Nothing clears the sink except [`ErrorSink::reset`].
#[derive(Debug, Clone, Default)]
pub struct ErrorSink {
    entries: Vec<ValidationFailure>,
    policy: JoinPolicy,
}

impl ErrorSink {
    /// Create an empty sink with the default join policy.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_policy(policy: JoinPolicy) -> Self {
        Self {
            entries: Vec::new(),
            policy,
        }
    }

    pub fn record(&mut self, failure: ValidationFailure) {
        self.entries.push(failure);
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn entries(&self) -> &[ValidationFailure] {
        &self.entries
    }

    pub fn iter(&self) -> std::slice::Iter<'_, ValidationFailure> {
        self.entries.iter()
    }

    pub fn policy(&self) -> &JoinPolicy {
        &self.policy
    }

    /// Messages joined by the policy separator.
    ///
    /// With more than one entry the result is wrapped in the policy's
    /// `open`/`close` markers; a single entry is returned as is.
    pub fn joined_message(&self) -> String {
        let joined = self
            .entries
            .iter()
            .map(ValidationFailure::message)
            .collect::<Vec<_>>()
            .join(&self.policy.separator);

        if self.entries.len() > 1 {
            format!("{}{}{}", self.policy.open, joined, self.policy.close)
        } else {
            joined
        }
    }

    /// Remove every recorded failure.
    pub fn reset(&mut self) {
        self.entries.clear();
    }
}

impl<'a> IntoIterator for &'a ErrorSink {
    type Item = &'a ValidationFailure;
    type IntoIter = std::slice::Iter<'a, ValidationFailure>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn failure(message: &str) -> ValidationFailure {
        ValidationFailure::new("api", message, "field")
    }

    #[test]
    fn empty_sink() {
        let sink = ErrorSink::new();
        assert!(sink.is_empty());
        assert_eq!(sink.len(), 0);
        assert_eq!(sink.joined_message(), "");
    }

    #[test]
    fn single_entry_is_unwrapped() {
        let mut sink = ErrorSink::new();
        sink.record(failure("only"));
        assert_eq!(sink.joined_message(), "only");
    }

    #[test]
    fn several_entries_are_wrapped() {
        let mut sink = ErrorSink::new();
        sink.record(failure("a"));
        sink.record(failure("b"));
        sink.record(failure("a"));
        assert_eq!(sink.len(), 3);
        assert_eq!(sink.joined_message(), "[ a,b,a ]");
    }

    #[test]
    fn keeps_insertion_order() {
        let mut sink = ErrorSink::new();
        for message in ["first", "second", "third"] {
            sink.record(failure(message));
        }
        let messages: Vec<_> = sink.iter().map(|f| f.message()).collect();
        assert_eq!(messages, ["first", "second", "third"]);
    }

    #[test]
    fn reset_clears_entries() {
        let mut sink = ErrorSink::new();
        sink.record(failure("a"));
        sink.reset();
        assert!(sink.is_empty());
    }

    #[test]
    fn custom_policy() {
        let mut sink = ErrorSink::with_policy(JoinPolicy {
            separator: " | ".to_string(),
            open: "<".to_string(),
            close: ">".to_string(),
        });
        sink.record(failure("a"));
        sink.record(failure("b"));
        assert_eq!(sink.joined_message(), "<a | b>");
    }

    #[test]
    fn policy_partial_deserialize() {
        let policy: JoinPolicy = serde_json::from_str(r#"{ "separator": "; " }"#).unwrap();
        assert_eq!(policy.separator, "; ");
        assert_eq!(policy.open, "[ ");
        assert_eq!(policy.close, " ]");
    }
}
