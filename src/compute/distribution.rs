//! distribution.rs
//! Posterior distributions and normalization.

use crate::error::InferenceError;
use serde::Serialize;

/// (value, probability) pairs in the query variable's domain order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Distribution {
    pub variable: String,
    pub entries: Vec<(String, f64)>,
}

impl Distribution {
    /// Rescales unnormalized joint probabilities so that they sum to 1.
    ///
    /// Fails when every entry is exactly zero: the evidence is impossible under the model.
    pub fn normalize(variable: &str, unnormalized: Vec<(String, f64)>) -> Result<(Self, f64), InferenceError> {
        let z: f64 = unnormalized.iter().map(|(_, p)| p).sum();
        if z == 0.0 {
            return Err(InferenceError::ZeroNormalization { variable: variable.to_string() });
        }
        let entries = unnormalized.into_iter().map(|(value, p)| (value, p / z)).collect();
        Ok((Self { variable: variable.to_string(), entries }, z))
    }

    pub fn get(&self, value: &str) -> Option<f64> {
        self.entries.iter().find(|(v, _)| v == value).map(|(_, p)| *p)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.entries.iter().map(|(v, p)| (v.as_str(), *p))
    }

    pub fn len(&self) -> usize { self.entries.len() }

    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, p)| p).sum()
    }

    /// The most probable value; the first one wins ties.
    pub fn mode(&self) -> Option<(&str, f64)> {
        self.iter().fold(None, |best, (v, p)| match best {
            Some((_, bp)) if bp >= p => best,
            _ => Some((v, p)),
        })
    }
}
