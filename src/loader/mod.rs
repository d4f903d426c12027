//! Record loaders
//!
//! A loader collects raw fragments per field, in document order, and turns
//! them into one record. Each field has an input transform (fragment to
//! zero-or-one value) and a reduction:
//!
//! - `first`: the first fragment that survives its transform wins
//! - `list`: every surviving value, order and duplicates kept
//! - `set`: every surviving value, deduplicated and sorted
//!
//! A field may receive fragments from several lookups; they are appended to
//! the same candidate list before the reduction runs. Fields with no
//! surviving fragment stay `None` (or empty for collections).

mod author;
mod book;

pub use author::{AuthorField, AuthorLoader};
pub use book::{BookField, BookLoader};

use std::collections::{BTreeSet, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

/// A field key usable by a loader
pub trait LoaderField: Copy + Eq + Hash + Debug {
    /// Name used in logs and in the serialized record
    fn name(&self) -> &'static str;
}

/// Raw fragments gathered for each field of one record
#[derive(Debug, Clone)]
pub struct Fragments<F: LoaderField> {
    by_field: HashMap<F, Vec<String>>,
}

impl<F: LoaderField> Default for Fragments<F> {
    fn default() -> Self {
        Self {
            by_field: HashMap::new(),
        }
    }
}

impl<F: LoaderField> Fragments<F> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends fragments to a field's candidate list
    pub fn add<I, S>(&mut self, field: F, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.by_field
            .entry(field)
            .or_default()
            .extend(fragments.into_iter().map(Into::into));
    }

    /// All fragments collected for a field, in insertion order
    pub fn get(&self, field: F) -> &[String] {
        self.by_field.get(&field).map(Vec::as_slice).unwrap_or(&[])
    }

    /// First fragment whose transform yields a value
    pub fn first<T>(&self, field: F, transform: impl Fn(&str) -> Option<T>) -> Option<T> {
        self.get(field).iter().find_map(|raw| apply(field, raw, &transform))
    }

    /// Every transformed value, in order, duplicates kept
    pub fn list<T>(&self, field: F, transform: impl Fn(&str) -> Option<T>) -> Vec<T> {
        self.get(field)
            .iter()
            .filter_map(|raw| apply(field, raw, &transform))
            .collect()
    }

    /// Every transformed value, deduplicated
    pub fn set<T: Ord>(&self, field: F, transform: impl Fn(&str) -> Option<T>) -> BTreeSet<T> {
        self.get(field)
            .iter()
            .filter_map(|raw| apply(field, raw, &transform))
            .collect()
    }
}

fn apply<F: LoaderField, T>(
    field: F,
    raw: &str,
    transform: &impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let value = transform(raw);
    if value.is_none() && !raw.trim().is_empty() {
        tracing::trace!(field = field.name(), fragment = raw, "Dropped malformed fragment");
    }
    value
}
