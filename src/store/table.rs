//! table.rs
//! Conditional probability tables keyed by canonical assignment strings.

use super::registry::Registry;
use super::types::{Assignment, VarId};
use crate::compute::Evidence;
use crate::config::RowPolicy;
use crate::error::InferenceError;
use serde::{Serialize, Deserialize};
use smallvec::SmallVec;
use std::collections::HashMap;

/// Builds the canonical row key: pairs sorted by variable name, rendered as
/// `name=value` and joined with commas.
pub fn canonical_key<'a>(pairs: impl IntoIterator<Item = (&'a str, &'a str)>) -> String {
    let mut pairs: SmallVec<[(&str, &str); 5]> = pairs.into_iter().collect();
    pairs.sort_unstable();
    let mut key = String::new();
    for (i, (name, value)) in pairs.iter().enumerate() {
        if i > 0 { key.push(','); }
        key.push_str(name);
        key.push('=');
        key.push_str(value);
    }
    key
}

/// One printable line of a table: a parent combination and P(target | combination)
/// over the target's domain. Missing entries are NaN.
#[derive(Debug, Clone, PartialEq)]
pub struct TableRow {
    pub assignment: Vec<Assignment>,
    pub probabilities: Vec<f64>,
}

/// P(target | parents). The parent order is the declaration order of the table;
/// it shapes printing, not lookups.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProbabilityTable {
    pub target: VarId,
    pub parents: SmallVec<[VarId; 4]>,
    rows: HashMap<String, f64>,
}

impl ProbabilityTable {
    pub fn new(target: VarId, parents: &[VarId]) -> Self {
        Self { target, parents: SmallVec::from_slice(parents), rows: HashMap::new() }
    }

    /// Rebinds target and parent order. Stored rows are kept.
    pub fn set_target(&mut self, target: VarId, parents: &[VarId]) {
        self.target = target;
        self.parents = SmallVec::from_slice(parents);
    }

    pub fn len(&self) -> usize { self.rows.len() }

    pub fn is_empty(&self) -> bool { self.rows.is_empty() }

    pub fn get(&self, key: &str) -> Option<f64> { self.rows.get(key).copied() }

    /// Stores one probability per domain value for the given parent combination,
    /// overwriting earlier entries with the same key.
    pub fn add_row(
        &mut self,
        target_name: &str,
        assignment: &[Assignment],
        domain: &[String],
        probabilities: &[f64],
        policy: &RowPolicy,
    ) -> Result<(), InferenceError> {
        if probabilities.len() != domain.len() {
            return Err(InferenceError::ShapeMismatch {
                variable: target_name.to_string(),
                expected: domain.len(),
                actual: probabilities.len(),
            });
        }

        let sum: f64 = probabilities.iter().sum();
        if !policy.is_normalized(sum) {
            if policy.strict {
                return Err(InferenceError::RowNotNormalized { variable: target_name.to_string(), sum });
            }
            tracing::warn!(variable = target_name, sum, "CPT row does not sum to 1");
        }

        for (value, &p) in domain.iter().zip(probabilities) {
            let pairs = assignment.iter()
                .map(|(n, v)| (n.as_str(), v.as_str()))
                .chain(std::iter::once((target_name, value.as_str())));
            self.rows.insert(canonical_key(pairs), p);
        }
        Ok(())
    }

    /// P(target = value | parents as read from `evidence`). Never mutates `evidence`.
    pub fn conditional(&self, registry: &Registry, evidence: &Evidence, value: &str) -> Result<f64, InferenceError> {
        let target = registry.name(self.target);
        let mut pairs: SmallVec<[(&str, &str); 5]> = SmallVec::with_capacity(self.parents.len() + 1);

        for &parent in &self.parents {
            let parent_name = registry.name(parent);
            let parent_value = evidence.get(parent_name).ok_or_else(|| InferenceError::IncompleteEvidence {
                variable: target.to_string(),
                parent: parent_name.to_string(),
            })?;
            pairs.push((parent_name, parent_value));
        }
        pairs.push((target, value));

        let key = canonical_key(pairs);
        match self.rows.get(&key) {
            Some(&p) => Ok(p),
            None => Err(InferenceError::MissingRow { variable: target.to_string(), key }),
        }
    }

    /// Cartesian product of the parent domains (first parent varies slowest),
    /// each paired with the probability vector over the target's domain.
    pub fn enumerate_rows(&self, registry: &Registry) -> Vec<TableRow> {
        let target = registry.name(self.target);
        let target_domain = registry.domain(self.target);
        let domains: Vec<&[String]> = self.parents.iter().map(|&p| registry.domain(p)).collect();

        if domains.iter().any(|d| d.is_empty()) {
            return Vec::new();
        }

        let mut rows = Vec::new();
        let mut cursor = vec![0usize; domains.len()];
        loop {
            let assignment: Vec<Assignment> = self.parents.iter().zip(&domains).zip(&cursor)
                .map(|((&p, domain), &i)| (registry.name(p).to_string(), domain[i].clone()))
                .collect();

            let probabilities = target_domain.iter()
                .map(|value| {
                    let pairs = assignment.iter()
                        .map(|(n, v)| (n.as_str(), v.as_str()))
                        .chain(std::iter::once((target, value.as_str())));
                    self.get(&canonical_key(pairs)).unwrap_or(f64::NAN)
                })
                .collect();

            rows.push(TableRow { assignment, probabilities });

            // Odometer step, last parent fastest.
            let mut pos = domains.len();
            loop {
                if pos == 0 {
                    return rows;
                }
                pos -= 1;
                cursor[pos] += 1;
                if cursor[pos] < domains[pos].len() {
                    break;
                }
                cursor[pos] = 0;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn values(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn pair(name: &str, value: &str) -> Assignment {
        (name.to_string(), value.to_string())
    }

    /// Rain -> WetGrass with the WetGrass table bound to [Rain].
    fn rain_registry() -> (Registry, VarId, VarId) {
        let mut reg = Registry::new();
        let (rain, wet) = reg.add_edge("Rain", "WetGrass");
        reg.set_domain(rain, values(&["true", "false"]));
        reg.set_domain(wet, values(&["true", "false"]));
        reg.set_table(wet, &[rain]);
        reg.add_row(wet, &[pair("Rain", "true")], &[0.9, 0.1]).unwrap();
        (reg, rain, wet)
    }

    #[rstest]
    #[case(vec![("B", "1"), ("A", "0")], "A=0,B=1")]
    #[case(vec![("A", "0"), ("B", "1")], "A=0,B=1")]
    #[case(vec![("Rain", "true")], "Rain=true")]
    #[case(vec![], "")]
    #[case(vec![("A1", "x"), ("A", "y")], "A=y,A1=x")] // Sorted by name, not by rendered pair
    fn test_canonical_key(#[case] pairs: Vec<(&str, &str)>, #[case] expected: &str) {
        assert_eq!(canonical_key(pairs), expected);
    }

    #[test]
    fn test_conditional_lookup() {
        let (reg, _, wet) = rain_registry();
        let table = reg.table(wet).unwrap();
        let ev = Evidence::parse("Rain=true");
        assert_eq!(table.conditional(&reg, &ev, "true").unwrap(), 0.9);
        assert_eq!(table.conditional(&reg, &ev, "false").unwrap(), 0.1);
        assert_eq!(ev, Evidence::parse("Rain=true"));
    }

    #[test]
    fn test_conditional_incomplete_evidence() {
        let (reg, _, wet) = rain_registry();
        let err = reg.table(wet).unwrap().conditional(&reg, &Evidence::new(), "true").unwrap_err();
        assert_eq!(err, InferenceError::IncompleteEvidence { variable: "WetGrass".into(), parent: "Rain".into() });
    }

    #[test]
    fn test_conditional_missing_row() {
        let (reg, _, wet) = rain_registry();
        let ev = Evidence::parse("Rain=false");
        let err = reg.table(wet).unwrap().conditional(&reg, &ev, "true").unwrap_err();
        match err {
            InferenceError::MissingRow { variable, key } => {
                assert_eq!(variable, "WetGrass");
                assert_eq!(key, "Rain=false,WetGrass=true");
            }
            other => panic!("Wrong error type: {:?}", other),
        }
    }

    #[test]
    fn test_shape_mismatch() {
        let (mut reg, _, wet) = rain_registry();
        let err = reg.add_row(wet, &[pair("Rain", "false")], &[1.0]).unwrap_err();
        assert_eq!(err, InferenceError::ShapeMismatch { variable: "WetGrass".into(), expected: 2, actual: 1 });
    }

    #[test]
    fn test_unnormalized_row_is_tolerated_by_default() {
        let (mut reg, _, wet) = rain_registry();
        reg.add_row(wet, &[pair("Rain", "false")], &[0.5, 0.6]).unwrap();
        let ev = Evidence::parse("Rain=false");
        assert_eq!(reg.conditional(wet, &ev, "false").unwrap(), 0.6);
    }

    #[test]
    fn test_unnormalized_row_rejected_when_strict() {
        let (mut reg, _, wet) = rain_registry();
        reg.policy = RowPolicy::strict();
        let err = reg.add_row(wet, &[pair("Rain", "false")], &[0.5, 0.6]).unwrap_err();
        assert!(matches!(err, InferenceError::RowNotNormalized { .. }));

        // Nothing from the rejected row was stored.
        let ev = Evidence::parse("Rain=false");
        assert!(reg.conditional(wet, &ev, "true").is_err());
    }

    #[test]
    fn test_add_row_overwrites() {
        let (mut reg, _, wet) = rain_registry();
        reg.add_row(wet, &[pair("Rain", "true")], &[0.7, 0.3]).unwrap();
        let table = reg.table(wet).unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("Rain=true,WetGrass=true"), Some(0.7));
    }

    #[test]
    fn test_enumerate_rows_marks_missing_as_nan() {
        let (reg, _, wet) = rain_registry();
        let rows = reg.table(wet).unwrap().enumerate_rows(&reg);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].assignment, vec![pair("Rain", "true")]);
        assert_eq!(rows[0].probabilities, vec![0.9, 0.1]);
        assert_eq!(rows[1].assignment, vec![pair("Rain", "false")]);
        assert!(rows[1].probabilities.iter().all(|p| p.is_nan()));
    }

    #[test]
    fn test_enumerate_rows_cartesian_order() {
        let mut reg = Registry::new();
        let (a, c) = reg.add_edge("A", "C");
        let (b, _) = reg.add_edge("B", "C");
        reg.set_domain(a, values(&["a0", "a1"]));
        reg.set_domain(b, values(&["b0", "b1", "b2"]));
        reg.set_domain(c, values(&["on", "off"]));
        reg.set_table(c, &[a, b]);

        let rows = reg.table(c).unwrap().enumerate_rows(&reg);
        let combos: Vec<String> = rows.iter()
            .map(|r| r.assignment.iter().map(|(_, v)| v.as_str()).collect::<Vec<_>>().join("/"))
            .collect();
        assert_eq!(combos, ["a0/b0", "a0/b1", "a0/b2", "a1/b0", "a1/b1", "a1/b2"]);
    }

    #[test]
    fn test_enumerate_rows_prior() {
        let mut reg = Registry::new();
        let rain = reg.get_or_create("Rain");
        reg.set_domain(rain, values(&["true", "false"]));
        reg.set_table(rain, &[]);
        reg.add_row(rain, &[], &[0.2, 0.8]).unwrap();

        let rows = reg.table(rain).unwrap().enumerate_rows(&reg);
        assert_eq!(rows, vec![TableRow { assignment: vec![], probabilities: vec![0.2, 0.8] }]);
    }
}
