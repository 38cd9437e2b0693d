//! Rule catalog and failure message templates.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identifies which rule produced a [`ValidationFailure`](crate::ValidationFailure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleKind {
    Required,
    MustBeNullWhen,
    OneOf,
    OneOfInt,
    Regex,
    Numeric,
    ExactLength,
    MaxLength,
    MaxItems,
    Email,
    AtMost,
    AtLeast,
    MustBeTrue,
    Unique,
}

impl RuleKind {
    /// Stable rule code, e.g. `"required"` or `"max_length"`.
    pub fn code(&self) -> &'static str {
        match self {
            RuleKind::Required => "required",
            RuleKind::MustBeNullWhen => "must_be_null_when",
            RuleKind::OneOf => "one_of",
            RuleKind::OneOfInt => "one_of_int",
            RuleKind::Regex => "regex",
            RuleKind::Numeric => "numeric",
            RuleKind::ExactLength => "exact_length",
            RuleKind::MaxLength => "max_length",
            RuleKind::MaxItems => "max_items",
            RuleKind::Email => "email",
            RuleKind::AtMost => "at_most",
            RuleKind::AtLeast => "at_least",
            RuleKind::MustBeTrue => "must_be_true",
            RuleKind::Unique => "unique",
        }
    }
}

impl fmt::Display for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// A violated rule together with the parameters its message needs.
///
/// `Display` renders the rule-specific message text, without the
/// `"Invalid Input: <field>. "` prefix.
#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Rule<'a> {
    Required,
    MustBeNullWhen { condition: &'a str },
    OneOf { values: String },
    OneOfInt { values: String, coding_scheme: Option<&'a str> },
    Regex { pattern: &'a str },
    Numeric,
    ExactLength { length: usize },
    MaxLength { length: usize },
    MaxItems { max: usize },
    Email,
    AtMost { max: i64 },
    AtLeast { min: i64 },
    MustBeTrue { message: &'a str },
    Unique { fields: String },
}

impl Rule<'_> {
    pub(crate) fn kind(&self) -> RuleKind {
        match self {
            Rule::Required => RuleKind::Required,
            Rule::MustBeNullWhen { .. } => RuleKind::MustBeNullWhen,
            Rule::OneOf { .. } => RuleKind::OneOf,
            Rule::OneOfInt { .. } => RuleKind::OneOfInt,
            Rule::Regex { .. } => RuleKind::Regex,
            Rule::Numeric => RuleKind::Numeric,
            Rule::ExactLength { .. } => RuleKind::ExactLength,
            Rule::MaxLength { .. } => RuleKind::MaxLength,
            Rule::MaxItems { .. } => RuleKind::MaxItems,
            Rule::Email => RuleKind::Email,
            Rule::AtMost { .. } => RuleKind::AtMost,
            Rule::AtLeast { .. } => RuleKind::AtLeast,
            Rule::MustBeTrue { .. } => RuleKind::MustBeTrue,
            Rule::Unique { .. } => RuleKind::Unique,
        }
    }
}

impl fmt::Display for Rule<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Rule::Required => f.write_str("It is a mandatory field."),
            Rule::MustBeNullWhen { condition } => write!(f, "Should be null when {condition}."),
            Rule::OneOf { values } => write!(f, "Values can only be either {values}."),
            Rule::OneOfInt {
                values,
                coding_scheme,
            } => {
                write!(f, "Values can only be either {values}.")?;
                match coding_scheme {
                    Some(scheme) if !scheme.trim().is_empty() => {
                        write!(f, " Please refer to {scheme} coding scheme.")
                    }
                    _ => Ok(()),
                }
            }
            Rule::Regex { pattern } => write!(f, "Value must match the given regex {pattern}."),
            Rule::Numeric => f.write_str("Value must only contain numbers."),
            Rule::ExactLength { length } => {
                write!(f, "Value must exactly be {length} characters long.")
            }
            Rule::MaxLength { length } => {
                write!(f, "Value must not exceed allowed {length} characters long.")
            }
            Rule::MaxItems { max } => write!(f, "List items must not exceed {max}."),
            Rule::Email => f.write_str("Provide a valid Email Address."),
            Rule::AtMost { max } => write!(f, "Value must be lesser than or equals to {max}."),
            Rule::AtLeast { min } => write!(f, "Value must be greater than or equals to {min}."),
            Rule::MustBeTrue { message } => write!(f, "{message}."),
            Rule::Unique { fields } => write!(f, "Fields : {fields} must be unique."),
        }
    }
}

/// Render a list the way failure messages show it: `[a, b, c]`.
pub(crate) fn bracketed<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    let joined = items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bracketed_lists() {
        assert_eq!(bracketed([1, 2, 3]), "[1, 2, 3]");
        assert_eq!(bracketed(["code", "region"]), "[code, region]");
        assert_eq!(bracketed(Vec::<i32>::new()), "[]");
    }

    #[test]
    fn coded_message_mentions_scheme() {
        let rule = Rule::OneOfInt {
            values: bracketed([1, 2, 3]),
            coding_scheme: Some("ISO-3166"),
        };
        assert_eq!(
            rule.to_string(),
            "Values can only be either [1, 2, 3]. Please refer to ISO-3166 coding scheme."
        );
    }

    #[test]
    fn blank_scheme_is_omitted() {
        let rule = Rule::OneOfInt {
            values: bracketed([7]),
            coding_scheme: Some("  "),
        };
        assert_eq!(rule.to_string(), "Values can only be either [7].");
    }

    #[test]
    fn kind_codes() {
        assert_eq!(Rule::Required.kind().code(), "required");
        assert_eq!(Rule::MaxItems { max: 2 }.kind(), RuleKind::MaxItems);
        assert_eq!(RuleKind::Unique.to_string(), "unique");
    }

    #[test]
    fn kind_serializes_as_code() {
        let json = serde_json::to_string(&RuleKind::ExactLength).unwrap();
        assert_eq!(json, "\"exact_length\"");
    }
}
