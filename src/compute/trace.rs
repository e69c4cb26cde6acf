//! trace.rs
//! Observation hooks for step-by-step narration of an enumeration.

use super::distribution::Distribution;
use super::evidence::Evidence;

/// One observable step of `query` / `enumerate_all`, in order of occurrence.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TraceStep<'a> {
    /// Start of the enumeration for one value of the query variable.
    QueryValue { variable: &'a str, value: &'a str, evidence: &'a Evidence },
    /// The variable is bound; its single value is used directly.
    Bound { variable: &'a str, value: &'a str, probability: f64 },
    /// The variable is free and will be summed over its domain.
    Enumerating { variable: &'a str, domain_size: usize },
    /// One candidate value and its one-step conditional probability.
    Candidate { variable: &'a str, value: &'a str, probability: f64 },
    /// The recursive sub-result for the last candidate and its contribution `p * sub`.
    Contribution { sub: f64, contribution: f64 },
    /// Accumulated sum once every candidate of `variable` was tried.
    Sum { variable: &'a str, total: f64 },
    /// Unnormalized joint P(variable = value, evidence).
    Unnormalized { variable: &'a str, value: &'a str, probability: f64 },
    /// Final normalization.
    Normalized { z: f64, distribution: &'a Distribution },
}

/// Receives trace steps. `depth` is the nesting level of the recursion.
pub trait TraceSink {
    fn record(&mut self, depth: usize, step: TraceStep<'_>);
}

/// Sink that discards everything; used by the untraced entry points.
pub struct NoTrace;

impl TraceSink for NoTrace {
    #[inline(always)]
    fn record(&mut self, _depth: usize, _step: TraceStep<'_>) {}
}
