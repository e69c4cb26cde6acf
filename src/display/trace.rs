use crate::compute::{Distribution, TraceSink, TraceStep};
use std::fmt::Write;

/// Renders a query result as `P(Var | evidence)` followed by `value: p` lines.
pub fn format_distribution(distribution: &Distribution, evidence_text: &str, precision: usize) -> String {
    let mut output = String::new();
    let _ = writeln!(output, "P({} | {})", distribution.variable, evidence_text);
    for (value, p) in distribution.iter() {
        let _ = writeln!(output, "{}: {:.*}", value, precision, p);
    }
    output
}

/// Text narration of an enumeration, two spaces of indentation per depth level.
pub struct TextTrace {
    output: String,
    precision: usize,
}

impl Default for TextTrace {
    fn default() -> Self { Self::new() }
}

impl TextTrace {
    pub fn new() -> Self { Self { output: String::new(), precision: 6 } }

    pub fn with_precision(precision: usize) -> Self { Self { output: String::new(), precision } }

    pub fn as_str(&self) -> &str { &self.output }

    pub fn into_string(self) -> String { self.output }
}

impl TraceSink for TextTrace {
    fn record(&mut self, depth: usize, step: TraceStep<'_>) {
        let indent = "  ".repeat(depth);
        let prec = self.precision;
        let out = &mut self.output;

        match step {
            TraceStep::QueryValue { variable, value, evidence } => {
                if evidence.is_empty() {
                    let _ = writeln!(out, "--- Compute P({}={}) ---", variable, value);
                } else {
                    let _ = writeln!(out, "--- Compute P({}={}, {}) ---", variable, value, evidence);
                }
            }
            TraceStep::Bound { variable, value, probability } => {
                let _ = writeln!(out, "{}Using evidence: {}={} -> P={:.*}", indent, variable, value, prec, probability);
            }
            TraceStep::Enumerating { variable, domain_size } => {
                let _ = writeln!(out, "{}Enumerating {} over {} values", indent, variable, domain_size);
            }
            TraceStep::Candidate { variable, value, probability } => {
                let _ = writeln!(out, "{}  Try {}={} -> P={:.*}", indent, variable, value, prec, probability);
            }
            TraceStep::Contribution { sub, contribution } => {
                let _ = writeln!(out, "{}  Recursive result: {:.*} contrib={:.*}", indent, prec, sub, prec, contribution);
            }
            TraceStep::Sum { variable, total } => {
                let _ = writeln!(out, "{}Sum for {} = {:.*}", indent, variable, prec, total);
            }
            TraceStep::Unnormalized { variable, value, probability } => {
                let _ = writeln!(out, "  => P_unnorm({}={}) = {:.*}", variable, value, prec, probability);
                let _ = writeln!(out);
            }
            TraceStep::Normalized { z, distribution } => {
                let _ = writeln!(out, "Normalization Z={:.*}", prec, z);
                let _ = writeln!(out, "Normalized distribution:");
                for (value, p) in distribution.iter() {
                    let _ = writeln!(out, "{}: {:.*}", value, prec, p);
                }
            }
        }
    }
}
