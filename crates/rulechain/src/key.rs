//! Composite keys and duplicate detection over collections.

use crate::value::Inspect;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hash;

/// Key built from selected field values of a collection element.
///
/// Absent parts are left out, so two elements missing every key field share
/// the empty key and count as duplicates of each other. A part that is present
/// but has no string form, such as a non-empty list, makes the key opaque;
/// duplicate detection refuses opaque keys.
///
/// ```rust,ignore
/// let key = CompositeKey::new().part(&line.code).part(line.region.as_deref());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct CompositeKey {
    parts: Vec<String>,
    opaque: bool,
}

impl CompositeKey {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append the string form of `value`, unless it is absent.
    pub fn part<V: Inspect>(mut self, value: V) -> Self {
        if value.is_absent() {
            return self;
        }
        match value.text() {
            Some(text) => self.parts.push(text.into_owned()),
            None => self.opaque = true,
        }
        self
    }

    pub fn parts(&self) -> &[String] {
        &self.parts
    }

    pub fn is_empty(&self) -> bool {
        self.parts.is_empty()
    }

    /// Returns `true` if a present part had no string form.
    pub fn is_opaque(&self) -> bool {
        self.opaque
    }
}

impl fmt::Display for CompositeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.parts.join(", "))
    }
}

/// Positions of elements whose key was already produced by an earlier element.
///
/// The first occurrence of a key is never reported; every later occurrence is.
pub fn duplicate_positions<'a, T, K, F>(items: &'a [T], mut key: F) -> Vec<usize>
where
    F: FnMut(&'a T) -> K,
    K: Hash + Eq,
{
    let mut seen = HashSet::with_capacity(items.len());
    items
        .iter()
        .enumerate()
        .filter_map(|(position, item)| (!seen.insert(key(item))).then_some(position))
        .collect()
}
