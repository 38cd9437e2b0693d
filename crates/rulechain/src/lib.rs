//! # RuleChain
//!
//! Fluent, chainable field validation. A [`RuleChain`] is created once per
//! validation session; each value is bound to it, named, and run through a
//! sequence of rules.
//!
//! ## Example
//!
//! ```rust,ignore
//! use rulechain::prelude::*;
//!
//! let mut chain = RuleChain::new("CreateUser");
//!
//! chain.bind(&user.email).field("email").required()?.email()?;
//! chain.bind(user.age).field("age").must_be_at_least(18)?.must_be_at_most(120)?;
//! ```
//!
//! ## Failure Reporting
//!
//! - **Immediate** (default): the first violated rule returns
//!   `Err(ChainError::Invalid(..))` and the chain stops.
//! - **Continuous**: after `.continuous()` violations are recorded and the
//!   chain keeps going; [`RuleChain::finalize`] then returns one failure
//!   holding every message, e.g.
//!   `[ Invalid Input: code. It is a mandatory field.,Value must only contain numbers. ]`.
//!
//! Messages start with `Invalid Input: <field>. ` on the first failure of each
//! binding only.
//!
//! ## Rules
//!
//! - `required` - Value present (not `None`, blank or empty)
//! - `must_be_null_when` - Value absent while a condition holds
//! - `must_be_one_of` / `must_be_one_of_int` / `must_be_one_of_coded` - Membership
//! - `must_match_regex` - Whole-string regex match
//! - `must_be_numeric` - Digits only
//! - `must_have_exact_length` / `must_have_max_length` - Character counts
//! - `must_not_exceed_max_items` - Collection size
//! - `email` - Email address format
//! - `must_be_at_most` / `must_be_at_least` - Integer bounds
//! - `must_be_true` - Custom condition
//! - `must_not_have_duplicates` - Unique composite keys across a collection
//!
//! Every rule except `required` and `must_be_true` skips absent values.

#[macro_use]
mod tracing_macros;

mod chain;
mod error;
mod key;
mod rule;
mod sink;
mod value;


pub use chain::{Binding, Mode, RuleChain, RuleChainBuilder};
pub use error::{ChainError, ValidationFailure};
pub use key::{duplicate_positions, CompositeKey};
pub use rule::RuleKind;
pub use sink::{ErrorSink, JoinPolicy};
pub use value::{Collection, Inspect};

/// Prelude module for rule chains
pub mod prelude {
    pub use crate::chain::{Binding, Mode, RuleChain};
    pub use crate::error::{ChainError, ValidationFailure};
    pub use crate::key::CompositeKey;
    pub use crate::value::{Collection, Inspect};
}
