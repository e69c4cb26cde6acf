//! Structural analysis over the variable DAG.
pub mod topology;
