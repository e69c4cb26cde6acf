use super::table::ProbabilityTable;
use super::types::*;
use crate::compute::Evidence;
use crate::config::RowPolicy;
use crate::error::InferenceError;
use serde::{Serialize, Deserialize};
use smallvec::SmallVec;
use std::collections::{HashMap, HashSet};

/// Arena owning every variable of one loaded network.
///
/// Parent/child relations and tables refer to variables by `VarId`, so nothing
/// here borrows from anything else. The registry is mutated only while loading;
/// engines borrow it immutably.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Registry {
    // Columnar Arrays
    pub names: Vec<String>,
    pub domains: Vec<Vec<String>>,

    // Topology (declaration order is preserved on both sides)
    pub parents: Vec<SmallVec<[VarId; 4]>>,
    pub children: Vec<SmallVec<[VarId; 4]>>,

    pub tables: Vec<Option<ProbabilityTable>>,

    // Ephemeral state (Not serialized, rebuilt on load)
    #[serde(skip)]
    pub index: HashMap<String, VarId>,
    #[serde(skip)]
    pub policy: RowPolicy,
}

impl Registry {
    pub fn new() -> Self { Self::default() }

    pub fn with_policy(policy: RowPolicy) -> Self {
        Self { policy, ..Self::default() }
    }

    pub fn count(&self) -> usize { self.names.len() }

    pub fn is_empty(&self) -> bool { self.names.is_empty() }

    pub fn variables(&self) -> impl Iterator<Item = VarId> {
        (0..self.count()).map(VarId::new)
    }

    /// Rebuilds the name index after deserialization.
    pub fn rebuild_index(&mut self) {
        self.index = self.names.iter().enumerate()
            .map(|(i, name)| (name.clone(), VarId::new(i)))
            .collect();
    }

    /// Idempotent: a known name always maps back to its existing variable.
    pub fn get_or_create(&mut self, name: &str) -> VarId {
        if let Some(&id) = self.index.get(name) {
            return id;
        }
        let id = VarId::new(self.names.len());
        self.names.push(name.to_string());
        self.domains.push(Vec::new());
        self.parents.push(SmallVec::new());
        self.children.push(SmallVec::new());
        self.tables.push(None);
        self.index.insert(name.to_string(), id);
        id
    }

    pub fn get(&self, name: &str) -> Option<VarId> { self.index.get(name).copied() }

    pub fn require(&self, name: &str) -> Result<VarId, InferenceError> {
        self.get(name).ok_or_else(|| InferenceError::UnknownVariable { name: name.to_string() })
    }

    #[inline(always)]
    pub fn name(&self, id: VarId) -> &str { &self.names[id.index()] }

    #[inline(always)]
    pub fn domain(&self, id: VarId) -> &[String] { &self.domains[id.index()] }

    #[inline(always)]
    pub fn get_parents(&self, id: VarId) -> &[VarId] { &self.parents[id.index()] }

    #[inline(always)]
    pub fn get_children(&self, id: VarId) -> &[VarId] { &self.children[id.index()] }

    pub fn set_domain(&mut self, id: VarId, values: Vec<String>) {
        self.domains[id.index()] = values;
    }

    /// Registers `parent -> child` on both sides. Cycles are not checked here;
    /// they surface when an engine orders the network.
    pub fn add_edge(&mut self, parent: &str, child: &str) -> (VarId, VarId) {
        let p = self.get_or_create(parent);
        let c = self.get_or_create(child);

        if self.parents[c.index()].contains(&p) {
            tracing::debug!(parent, child, "duplicate edge ignored");
            return (p, c);
        }
        self.parents[c.index()].push(p);
        self.children[p.index()].push(c);
        (p, c)
    }

    /// Binds the variable's table to an ordered parent list, creating the table on
    /// first use. Existing rows survive a rebind.
    pub fn set_table(&mut self, id: VarId, parents: &[VarId]) {
        let idx = id.index();
        if let Some(table) = self.tables[idx].as_mut() {
            table.set_target(id, parents);
        } else {
            self.tables[idx] = Some(ProbabilityTable::new(id, parents));
        }
    }

    pub fn table(&self, id: VarId) -> Option<&ProbabilityTable> {
        self.tables[id.index()].as_ref()
    }

    /// Adds a row to the variable's table using the registry's `RowPolicy`.
    pub fn add_row(&mut self, id: VarId, assignment: &[Assignment], probabilities: &[f64]) -> Result<(), InferenceError> {
        let idx = id.index();
        let table = self.tables[idx].get_or_insert_with(|| ProbabilityTable::new(id, &[]));
        table.add_row(&self.names[idx], assignment, &self.domains[idx], probabilities, &self.policy)
    }

    /// P(id = value | parents in `evidence`).
    pub fn conditional(&self, id: VarId, evidence: &Evidence, value: &str) -> Result<f64, InferenceError> {
        match self.table(id) {
            Some(table) => table.conditional(self, evidence, value),
            None => Err(InferenceError::MissingTable { variable: self.name(id).to_string() }),
        }
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Loads a snapshot written by `to_json`. The row policy resets to the default.
    ///
    /// Snapshots whose columns disagree with each other are rejected here rather
    /// than surfacing later as out-of-range ids during inference.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        let mut registry: Self = serde_json::from_str(json)?;
        registry.check_columns().map_err(<serde_json::Error as serde::de::Error>::custom)?;
        registry.rebuild_index();
        Ok(registry)
    }

    fn check_columns(&self) -> Result<(), String> {
        let count = self.count();
        let lengths = [self.domains.len(), self.parents.len(), self.children.len(), self.tables.len()];
        if lengths.iter().any(|&len| len != count) {
            return Err(format!("column lengths {:?} disagree with {} names", lengths, count));
        }

        let mut seen = HashSet::with_capacity(count);
        if let Some(name) = self.names.iter().find(|name| !seen.insert(name.as_str())) {
            return Err(format!("duplicate variable '{}'", name));
        }

        // Children must be the exact inverse of the parent lists.
        let mut mirrored: Vec<Vec<VarId>> = vec![Vec::new(); count];
        for (i, parents) in self.parents.iter().enumerate() {
            for &p in parents {
                if p.index() >= count {
                    return Err(format!("parent {} of '{}' is out of range", p.0, self.names[i]));
                }
                mirrored[p.index()].push(VarId::new(i));
            }
        }
        for (i, children) in self.children.iter().enumerate() {
            let mut actual = children.to_vec();
            actual.sort_unstable();
            if actual != mirrored[i] {
                return Err(format!("children of '{}' do not mirror the parent lists", self.names[i]));
            }
        }

        for (i, table) in self.tables.iter().enumerate() {
            let Some(table) = table else { continue };
            if table.target.index() != i {
                return Err(format!("table of '{}' names target {}", self.names[i], table.target.0));
            }
            if let Some(p) = table.parents.iter().find(|p| p.index() >= count) {
                return Err(format!("table parent {} of '{}' is out of range", p.0, self.names[i]));
            }
        }
        Ok(())
    }
}
