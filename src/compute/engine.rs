//! A synchronous enumeration-ask engine over a borrowed, read-only registry.
use crate::analysis::topology;
use crate::compute::distribution::Distribution;
use crate::compute::evidence::Evidence;
use crate::compute::trace::{NoTrace, TraceSink, TraceStep};
use crate::error::InferenceError;
use crate::store::{Registry, VarId};
use rayon::prelude::*;

pub struct InferenceEngine<'a> {
    registry: &'a Registry,
    order: Vec<VarId>,
}

impl<'a> InferenceEngine<'a> {
    /// Orders the network once. Structural changes to the registry need a new engine.
    pub fn new(registry: &'a Registry) -> Result<Self, InferenceError> {
        let order = topology::sort(registry)?;
        tracing::debug!(
            order = ?order.iter().map(|&id| registry.name(id)).collect::<Vec<_>>(),
            "topological order computed"
        );
        Ok(Self { registry, order })
    }

    pub fn registry(&self) -> &'a Registry { self.registry }

    pub fn order(&self) -> &[VarId] { &self.order }

    /// Posterior distribution of `variable` given `evidence`.
    pub fn query(&self, variable: &str, evidence: &Evidence) -> Result<Distribution, InferenceError> {
        self.query_traced(variable, evidence, &mut NoTrace)
    }

    /// Same as `query`, narrating every step into `sink`.
    pub fn query_traced(
        &self,
        variable: &str,
        evidence: &Evidence,
        sink: &mut dyn TraceSink,
    ) -> Result<Distribution, InferenceError> {
        let query_id = self.registry.require(variable)?;

        let mut unnormalized = Vec::with_capacity(self.registry.domain(query_id).len());
        for value in self.registry.domain(query_id) {
            let mut extended = evidence.clone();
            extended.insert(variable, value.as_str());

            sink.record(0, TraceStep::QueryValue { variable, value, evidence });
            let p = self.enumerate_from(0, &mut extended, sink, 0)?;
            sink.record(0, TraceStep::Unnormalized { variable, value, probability: p });

            unnormalized.push((value.clone(), p));
        }

        let (distribution, z) = Distribution::normalize(variable, unnormalized)?;
        sink.record(0, TraceStep::Normalized { z, distribution: &distribution });
        Ok(distribution)
    }

    /// Runs independent queries in parallel. Each query owns its evidence; the
    /// registry and order are shared read-only. Results keep the input order.
    pub fn query_batch(&self, queries: &[(String, Evidence)]) -> Vec<Result<Distribution, InferenceError>> {
        queries.par_iter()
            .map(|(variable, evidence)| self.query(variable, evidence))
            .collect()
    }

    /// Sum over all hidden assignments of the product of the factors of
    /// `order[index..]`, with bound variables fixed by `evidence`.
    ///
    /// `evidence` has the same contents on return as on entry, whether or not it succeeds.
    pub fn enumerate_all(&self, index: usize, evidence: &mut Evidence) -> Result<f64, InferenceError> {
        self.enumerate_from(index, evidence, &mut NoTrace, 0)
    }

    pub fn enumerate_all_traced(
        &self,
        index: usize,
        evidence: &mut Evidence,
        sink: &mut dyn TraceSink,
    ) -> Result<f64, InferenceError> {
        self.enumerate_from(index, evidence, sink, 0)
    }

    fn enumerate_from(
        &self,
        index: usize,
        evidence: &mut Evidence,
        sink: &mut dyn TraceSink,
        depth: usize,
    ) -> Result<f64, InferenceError> {
        let Some(&y) = self.order.get(index) else {
            return Ok(1.0);
        };
        let name = self.registry.name(y);

        // Case A: bound by observation or by an enclosing pin.
        if let Some(value) = evidence.get(name) {
            let value = value.to_string();
            let p = self.registry.conditional(y, evidence, &value)?;
            sink.record(depth, TraceStep::Bound { variable: name, value: &value, probability: p });
            return Ok(p * self.enumerate_from(index + 1, evidence, sink, depth + 1)?);
        }

        // Case B: free, marginalize over the domain.
        let domain = self.registry.domain(y);
        sink.record(depth, TraceStep::Enumerating { variable: name, domain_size: domain.len() });

        let mut sum = 0.0;
        for value in domain {
            let mut pinned = evidence.pin(name, value);
            let p = self.registry.conditional(y, &pinned, value)?;
            sink.record(depth, TraceStep::Candidate { variable: name, value, probability: p });

            let sub = self.enumerate_from(index + 1, &mut pinned, sink, depth + 2)?;
            let contribution = p * sub;
            sink.record(depth, TraceStep::Contribution { sub, contribution });
            sum += contribution;
        }

        sink.record(depth, TraceStep::Sum { variable: name, total: sum });
        Ok(sum)
    }
}
