//! Defines the error type shared by the registry, the tables and the engine.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum InferenceError {
    #[error("Unknown variable '{name}'")]
    UnknownVariable { name: String },
    #[error("Incomplete evidence for '{variable}': missing parent '{parent}'")]
    IncompleteEvidence { variable: String, parent: String },
    #[error("Missing CPT row for '{variable}' (key '{key}')")]
    MissingRow { variable: String, key: String },
    #[error("Variable '{variable}' has no CPT")]
    MissingTable { variable: String },
    #[error("Row for '{variable}' has {actual} probabilities but the domain has {expected} values")]
    ShapeMismatch { variable: String, expected: usize, actual: usize },
    #[error("Row for '{variable}' sums to {sum}, not 1")]
    RowNotNormalized { variable: String, sum: f64 },
    #[error("Normalization degenerates to zero for '{variable}': evidence is inconsistent with the model")]
    ZeroNormalization { variable: String },
    #[error("Cyclic network: only {ordered} of {total} variables could be ordered")]
    CyclicNetwork { ordered: usize, total: usize },
}
