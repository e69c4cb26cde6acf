//! Owns the variables of a network and their conditional probability tables.
pub mod registry;
pub mod table;
pub mod types;

pub use registry::Registry;
pub use table::{canonical_key, ProbabilityTable, TableRow};
pub use types::{Assignment, VarId};
