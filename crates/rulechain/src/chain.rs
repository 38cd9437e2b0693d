//! The per-session rule chain and its value bindings.

use crate::error::{ChainError, ValidationFailure};
use crate::key::{duplicate_positions, CompositeKey};
use crate::rule::{bracketed, Rule};
use crate::sink::{ErrorSink, JoinPolicy};
use crate::value::{Collection, Inspect};
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::OnceLock;

const INDEX_PLACEHOLDER: &str = "{0}";

static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();

fn email_regex() -> &'static Regex {
    EMAIL_REGEX.get_or_init(|| {
        // local@domain.tld, simplified RFC 5322
        Regex::new(
            r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*\.[a-zA-Z]{2,}$",
        )
        .expect("invalid built-in email regex")
    })
}

/// How a failed rule is reported.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    /// The first failure is returned as `Err` and ends the chain.
    #[default]
    Immediate,
    /// Failures are recorded and surface together from [`RuleChain::finalize`].
    Continuous,
}

/// Progress of the current binding.
///
/// The `"Invalid Input: <field>. "` prefix is emitted only while a binding is
/// still `Bound`; once a failure is recorded the remaining messages of that
/// binding go out bare.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Unbound,
    Bound,
    FirstFailureRecorded,
}

impl Phase {
    fn wants_prefix(self) -> bool {
        !matches!(self, Phase::FirstFailureRecorded)
    }

    fn after_failure(self) -> Phase {
        match self {
            Phase::Unbound => Phase::Unbound,
            Phase::Bound | Phase::FirstFailureRecorded => Phase::FirstFailureRecorded,
        }
    }
}

/// Fluent field validator for one validation session.
///
/// A chain is created per session (one request, one object graph) and must
/// not be shared between sessions. Each value is checked through a
/// [`Binding`] obtained from [`RuleChain::bind`].
///
/// ## Example
///
/// ```rust,ignore
/// use rulechain::prelude::*;
///
/// fn validate(order: &Order) -> Result<(), ChainError> {
///     let mut chain = RuleChain::new("CreateOrder");
///
///     chain.bind(&order.code).field("code").required()?.must_have_max_length(8)?;
///
///     for (i, line) in order.lines.iter().enumerate() {
///         chain
///             .bind(&line.sku)
///             .field_indexed("lines[{0}].sku", i)
///             .continuous()
///             .required()?
///             .must_be_numeric()?;
///     }
///
///     chain.finalize()?;
///     Ok(())
/// }
/// ```
#[derive(Debug)]
pub struct RuleChain {
    session: String,
    field: String,
    mode: Mode,
    phase: Phase,
    sink: ErrorSink,
    patterns: HashMap<String, Regex>,
}

impl RuleChain {
    /// Create a chain for `session` with the default join policy.
    pub fn new(session: impl Into<String>) -> Self {
        Self::builder(session).build()
    }

    pub fn builder(session: impl Into<String>) -> RuleChainBuilder {
        RuleChainBuilder::new(session)
    }

    pub fn session_name(&self) -> &str {
        &self.session
    }

    /// The field name most recently set on this chain.
    pub fn field_name(&self) -> &str {
        &self.field
    }

    pub fn mode(&self) -> Mode {
        self.mode
    }

    /// Failures recorded so far in continuous mode.
    pub fn errors(&self) -> &ErrorSink {
        &self.sink
    }

    /// Bind the next value under test.
    ///
    /// Resets the mode to [`Mode::Immediate`] and starts a fresh binding, so
    /// the next failure carries the field prefix again. The field name is
    /// kept until changed on the binding.
    pub fn bind<V>(&mut self, value: V) -> Binding<'_, V> {
        self.mode = Mode::Immediate;
        self.phase = Phase::Bound;
        Binding { chain: self, value }
    }

    /// Append a failure built elsewhere, regardless of mode.
    pub fn record(&mut self, failure: ValidationFailure) {
        self.sink.record(failure);
    }

    /// Report `message` as is, without the field prefix.
    ///
    /// Follows the current mode: returned as `Err` in immediate mode,
    /// recorded in continuous mode.
    pub fn reject(&mut self, message: impl Into<String>) -> Result<(), ChainError> {
        let failure = ValidationFailure::new(&self.session, message, &self.field);
        self.dispatch(failure)
    }

    /// Drop every recorded failure.
    ///
    /// Needed between independent passes that reuse one chain; nothing else
    /// clears the sink.
    pub fn clear(&mut self) {
        self.sink.reset();
    }

    /// Surface the failures recorded in continuous mode.
    ///
    /// Returns one failure whose message is the joined message of the sink,
    /// tagged with the session name and the last field name set. Skipping
    /// this call discards whatever was recorded.
    pub fn finalize(&self) -> Result<(), ValidationFailure> {
        if self.sink.is_empty() {
            return Ok(());
        }

        trace_debug!(
            session = %self.session,
            errors = self.sink.len(),
            "validation session has errors"
        );

        Err(ValidationFailure::new(
            &self.session,
            self.sink.joined_message(),
            &self.field,
        ))
    }

    fn prefix(&self) -> Cow<'static, str> {
        if self.phase.wants_prefix() {
            Cow::Owned(format!("Invalid Input: {}. ", self.field))
        } else {
            Cow::Borrowed("")
        }
    }

    fn fail(&mut self, rule: Rule<'_>) -> Result<(), ChainError> {
        let message = format!("{}{}", self.prefix(), rule);
        let failure =
            ValidationFailure::new(&self.session, message, &self.field).with_rule(rule.kind());
        self.dispatch(failure)
    }

    fn dispatch(&mut self, failure: ValidationFailure) -> Result<(), ChainError> {
        match self.mode {
            Mode::Immediate => {
                trace_error!(
                    session = %self.session,
                    field = %self.field,
                    "Validation Errors : {}",
                    failure.message()
                );
                Err(ChainError::Invalid(failure))
            }
            Mode::Continuous => {
                trace_debug!(
                    session = %self.session,
                    field = %self.field,
                    "recorded: {}",
                    failure.message()
                );
                self.phase = self.phase.after_failure();
                self.sink.record(failure);
                Ok(())
            }
        }
    }

    fn misuse(&self, error: ChainError) -> ChainError {
        trace_error!(session = %self.session, field = %self.field, "{}", error);
        error
    }

    fn pattern(&mut self, pattern: &str) -> Result<&Regex, ChainError> {
        if !self.patterns.contains_key(pattern) {
            let compiled = Regex::new(&format!("^(?:{pattern})$")).map_err(|source| {
                self.misuse(ChainError::InvalidPattern {
                    pattern: pattern.to_string(),
                    source,
                })
            })?;
            self.patterns.insert(pattern.to_string(), compiled);
        }

        Ok(&self.patterns[pattern])
    }
}

/// Builder for a [`RuleChain`].
#[derive(Debug)]
pub struct RuleChainBuilder {
    session: String,
    policy: JoinPolicy,
}

impl RuleChainBuilder {
    pub fn new(session: impl Into<String>) -> Self {
        Self {
            session: session.into(),
            policy: JoinPolicy::default(),
        }
    }

    /// Set how accumulated messages are joined by `finalize`.
    pub fn join_policy(mut self, policy: JoinPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn build(self) -> RuleChain {
        RuleChain {
            session: self.session,
            field: String::new(),
            mode: Mode::Immediate,
            phase: Phase::Unbound,
            sink: ErrorSink::with_policy(self.policy),
            patterns: HashMap::new(),
        }
    }
}

/// A value bound to a [`RuleChain`] together with the chain's field and mode.
///
/// Rule methods consume the binding and hand it back on success, so rules
/// chain with `?`. In continuous mode rules never return
/// [`ChainError::Invalid`]; caller mistakes such as a numeric rule on text are
/// returned in both modes.
#[derive(Debug)]
pub struct Binding<'c, V> {
    chain: &'c mut RuleChain,
    value: V,
}

impl<'c, V> Binding<'c, V> {
    /// Set the field name used in failure messages.
    pub fn field(self, name: impl Into<String>) -> Self {
        self.chain.field = name.into();
        self
    }

    /// Set the field name, substituting `index` for the `{0}` placeholder.
    ///
    /// `field_indexed("items[{0}].code", 2)` names the field `items[2].code`.
    pub fn field_indexed(self, name: &str, index: usize) -> Self {
        self.chain.field = name.replace(INDEX_PLACEHOLDER, &index.to_string());
        self
    }

    /// Substitute `index` into the `{0}` placeholder of the current field name.
    pub fn index(self, index: usize) -> Self {
        self.chain.field = self
            .chain
            .field
            .replace(INDEX_PLACEHOLDER, &index.to_string());
        self
    }

    /// Record failures instead of returning them, until the next bind.
    pub fn continuous(self) -> Self {
        self.chain.mode = Mode::Continuous;
        self
    }

    pub fn value(&self) -> &V {
        &self.value
    }

    pub fn field_name(&self) -> &str {
        &self.chain.field
    }

    pub fn mode(&self) -> Mode {
        self.chain.mode
    }

    /// Fails unless `condition` holds. Checked even when the value is absent.
    pub fn must_be_true(self, condition: bool, message: &str) -> Result<Self, ChainError> {
        if !condition {
            self.chain.fail(Rule::MustBeTrue { message })?;
        }
        Ok(self)
    }
}

impl<'c, V: Inspect> Binding<'c, V> {
    /// Fails if the value is absent: `None`, a blank string or an empty collection.
    pub fn required(self) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            self.chain.fail(Rule::Required)?;
        }
        Ok(self)
    }

    /// Fails if a value is present while `condition` holds.
    pub fn must_be_null_when(self, condition: bool, description: &str) -> Result<Self, ChainError> {
        if condition && !self.value.is_absent() {
            self.chain.fail(Rule::MustBeNullWhen {
                condition: description,
            })?;
        }
        Ok(self)
    }

    /// Fails if the string form of the value matches none of `values`.
    pub fn must_be_one_of<U: Display>(self, values: &[U]) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        let text = self.text()?;
        if !values.iter().any(|allowed| allowed.to_string() == text) {
            self.chain.fail(Rule::OneOf {
                values: bracketed(values),
            })?;
        }
        Ok(self)
    }

    /// Fails if the integer form of the value is not one of `values`.
    pub fn must_be_one_of_int(self, values: &[i64]) -> Result<Self, ChainError> {
        self.one_of_int(values, None)
    }

    /// Like [`Binding::must_be_one_of_int`], pointing the caller at a coding scheme.
    pub fn must_be_one_of_coded(
        self,
        coding_scheme: &str,
        values: &[i64],
    ) -> Result<Self, ChainError> {
        self.one_of_int(values, Some(coding_scheme))
    }

    /// Fails unless the whole string form of the value matches `pattern`.
    ///
    /// An uncompilable pattern is reported as [`ChainError::InvalidPattern`].
    pub fn must_match_regex(self, pattern: &str) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        let text = self.text()?;
        if !self.chain.pattern(pattern)?.is_match(&text) {
            self.chain.fail(Rule::Regex { pattern })?;
        }
        Ok(self)
    }

    /// Fails unless the string form consists of ASCII digits only.
    pub fn must_be_numeric(self) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        let text = self.text()?;
        if !text.chars().all(|c| c.is_ascii_digit()) {
            self.chain.fail(Rule::Numeric)?;
        }
        Ok(self)
    }

    pub fn must_have_exact_length(self, length: usize) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        if self.text()?.chars().count() != length {
            self.chain.fail(Rule::ExactLength { length })?;
        }
        Ok(self)
    }

    pub fn must_have_max_length(self, length: usize) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        if self.text()?.chars().count() > length {
            self.chain.fail(Rule::MaxLength { length })?;
        }
        Ok(self)
    }

    /// Fails if the bound collection holds more than `max` items.
    pub fn must_not_exceed_max_items(self, max: usize) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        let Some(count) = self.value.item_count() else {
            return Err(self.chain.misuse(ChainError::NotACollection {
                field: self.chain.field.clone(),
            }));
        };
        if count > max {
            self.chain.fail(Rule::MaxItems { max })?;
        }
        Ok(self)
    }

    pub fn email(self) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        let text = self.text()?;
        if !email_regex().is_match(&text) {
            self.chain.fail(Rule::Email)?;
        }
        Ok(self)
    }

    /// Fails if the integer form of the value is greater than `max`.
    pub fn must_be_at_most(self, max: i64) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        if self.integer()? > i128::from(max) {
            self.chain.fail(Rule::AtMost { max })?;
        }
        Ok(self)
    }

    /// Fails if the integer form of the value is less than `min`.
    pub fn must_be_at_least(self, min: i64) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        if self.integer()? < i128::from(min) {
            self.chain.fail(Rule::AtLeast { min })?;
        }
        Ok(self)
    }

    fn one_of_int(self, values: &[i64], coding_scheme: Option<&str>) -> Result<Self, ChainError> {
        if self.value.is_absent() {
            return Ok(self);
        }
        let integer = self.integer()?;
        if !values.iter().any(|&allowed| i128::from(allowed) == integer) {
            self.chain.fail(Rule::OneOfInt {
                values: bracketed(values),
                coding_scheme,
            })?;
        }
        Ok(self)
    }

    fn text(&self) -> Result<String, ChainError> {
        match self.value.text() {
            Some(text) => Ok(text.into_owned()),
            None => Err(self.chain.misuse(ChainError::NoTextForm {
                field: self.chain.field.clone(),
            })),
        }
    }

    fn integer(&self) -> Result<i128, ChainError> {
        self.value.integer().ok_or_else(|| {
            self.chain.misuse(ChainError::NotNumeric {
                field: self.chain.field.clone(),
                value: self
                    .value
                    .text()
                    .map(Cow::into_owned)
                    .unwrap_or_default(),
            })
        })
    }
}

impl<'c, V: Collection> Binding<'c, V> {
    /// Fails once for every element whose key repeats an earlier element's key.
    ///
    /// `fields` names the key fields in the message; `key` builds the key
    /// from an element. The first occurrence of a key is never flagged. A key
    /// with a present part that has no string form is reported as
    /// [`ChainError::NoTextForm`] for that element.
    ///
    /// ```rust,ignore
    /// chain
    ///     .bind(&order.lines)
    ///     .field("lines")
    ///     .must_not_have_duplicates(&["code", "region"], |line| {
    ///         CompositeKey::new().part(&line.code).part(line.region.as_deref())
    ///     })?;
    /// ```
    pub fn must_not_have_duplicates<F>(self, fields: &[&str], key: F) -> Result<Self, ChainError>
    where
        F: FnMut(&V::Item) -> CompositeKey,
    {
        let keys: Vec<CompositeKey> = self.value.elements().iter().map(key).collect();
        if let Some(position) = keys.iter().position(CompositeKey::is_opaque) {
            return Err(self.chain.misuse(ChainError::NoTextForm {
                field: format!("{}[{}]", self.chain.field, position),
            }));
        }

        let duplicates = duplicate_positions(&keys, |k| k);
        if !duplicates.is_empty() {
            trace_debug!(
                session = %self.chain.session,
                field = %self.chain.field,
                positions = ?duplicates,
                "duplicate elements"
            );
        }
        for _ in &duplicates {
            self.chain.fail(Rule::Unique {
                fields: bracketed(fields),
            })?;
        }
        Ok(self)
    }
}
