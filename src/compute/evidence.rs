//! evidence.rs
//! The working assignment threaded through enumeration.

use std::collections::BTreeMap;
use std::fmt;
use std::ops::{Deref, DerefMut};

/// Variable name -> value pins, both observed and temporarily pinned during search.
///
/// Ordered by name so that traces and displays are stable.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Evidence {
    values: BTreeMap<String, String>,
}

impl Evidence {
    pub fn new() -> Self { Self::default() }

    /// Parses `A=a, B=b`. Pairs without `=` are skipped.
    pub fn parse(text: &str) -> Self {
        text.split(',')
            .filter_map(|pair| pair.split_once('='))
            .map(|(name, value)| (name.trim(), value.trim()))
            .collect()
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.values.insert(name.into(), value.into())
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.values.get(name).map(String::as_str)
    }

    pub fn contains(&self, name: &str) -> bool { self.values.contains_key(name) }

    pub fn remove(&mut self, name: &str) -> Option<String> { self.values.remove(name) }

    pub fn len(&self) -> usize { self.values.len() }

    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Pins `name = value` until the returned guard is dropped.
    ///
    /// Whatever `name` mapped to before (or its absence) is restored on drop,
    /// including when the holder returns early through `?`.
    pub fn pin(&mut self, name: &str, value: &str) -> Pinned<'_> {
        let previous = self.values.insert(name.to_string(), value.to_string());
        Pinned { evidence: self, name: name.to_string(), previous }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for Evidence {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self { values: iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect() }
    }
}

impl fmt::Display for Evidence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (name, value)) in self.iter().enumerate() {
            if i > 0 { f.write_str(",")?; }
            write!(f, "{}={}", name, value)?;
        }
        Ok(())
    }
}

/// Scoped override returned by [`Evidence::pin`].
pub struct Pinned<'a> {
    evidence: &'a mut Evidence,
    name: String,
    previous: Option<String>,
}

impl Deref for Pinned<'_> {
    type Target = Evidence;
    fn deref(&self) -> &Evidence { self.evidence }
}

impl DerefMut for Pinned<'_> {
    fn deref_mut(&mut self) -> &mut Evidence { self.evidence }
}

impl Drop for Pinned<'_> {
    fn drop(&mut self) {
        let name = std::mem::take(&mut self.name);
        match self.previous.take() {
            Some(value) => { self.evidence.values.insert(name, value); }
            None => { self.evidence.values.remove(&name); }
        }
    }
}
