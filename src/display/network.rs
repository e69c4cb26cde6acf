//! network.rs
//! Printers for network structure and tables, and the CPT-file writer.
//!
//! Probabilities are printed with the shortest representation that parses back
//! to the same `f64`, so printed tables reproduce stored values exactly.

use crate::analysis::topology;
use crate::error::InferenceError;
use crate::store::{Registry, TableRow};
use std::fmt::Write;

/// `Structure (predecessors):` followed by `- X <- A,B` per variable in topological order.
pub fn format_structure(registry: &Registry) -> Result<String, InferenceError> {
    let order = topology::sort(registry)?;
    let mut output = String::new();
    let _ = writeln!(output, "Structure (predecessors):");
    for id in order {
        let parents = registry.get_parents(id);
        if parents.is_empty() {
            let _ = writeln!(output, "- {} <- (root)", registry.name(id));
        } else {
            let _ = writeln!(output, "- {} <- {}", registry.name(id), join_names(registry, parents));
        }
    }
    Ok(output)
}

/// Every table in topological order, one line per parent combination.
pub fn format_tables(registry: &Registry) -> Result<String, InferenceError> {
    let order = topology::sort(registry)?;
    let mut output = String::new();

    for id in order {
        let Some(table) = registry.table(id) else { continue };

        if table.parents.is_empty() {
            let _ = writeln!(output, "P({})", registry.name(id));
        } else {
            let _ = writeln!(output, "P({} | {})", registry.name(id), join_names(registry, &table.parents));
        }
        let _ = writeln!(output, "Values: {}", registry.domain(id).join(", "));

        for row in table.enumerate_rows(registry) {
            let lhs = if row.assignment.is_empty() { "<prior>".to_string() } else { format_assignment(&row) };
            let _ = writeln!(output, " {} : {}", lhs, format_probabilities(&row.probabilities));
        }
        let _ = writeln!(output);
    }
    Ok(output)
}

/// Serializes all tables back into the CPT file format read by `loader::parse_cpts`.
///
/// Reloading the output reproduces every fully defined row. A row with any
/// undefined entry is left out entirely, since the format has no way to write a
/// partial row, so its defined entries are lost. This happens when `VALUES:` is
/// widened after rows were added.
pub fn format_cpt_source(registry: &Registry) -> Result<String, InferenceError> {
    let order = topology::sort(registry)?;
    let mut output = String::new();

    for id in order {
        let Some(table) = registry.table(id) else { continue };

        let _ = writeln!(output, "NODE {}", registry.name(id));
        let _ = writeln!(output, "VALUES: {}", registry.domain(id).join(" "));
        if !table.parents.is_empty() {
            let names: Vec<&str> = table.parents.iter().map(|&p| registry.name(p)).collect();
            let _ = writeln!(output, "PARENTS: {}", names.join(" "));
        }
        let _ = writeln!(output, "TABLE");

        for row in table.enumerate_rows(registry) {
            if row.probabilities.iter().any(|p| p.is_nan()) {
                tracing::debug!(variable = registry.name(id), "skipping undefined row");
                continue;
            }
            if row.assignment.is_empty() {
                let _ = writeln!(output, "p: {}", format_probabilities(&row.probabilities));
            } else {
                let _ = writeln!(output, "{}: {}", format_assignment(&row), format_probabilities(&row.probabilities));
            }
        }
        let _ = writeln!(output, "END");
        let _ = writeln!(output);
    }
    Ok(output)
}

fn join_names(registry: &Registry, ids: &[crate::store::VarId]) -> String {
    ids.iter().map(|&id| registry.name(id)).collect::<Vec<_>>().join(",")
}

fn format_assignment(row: &TableRow) -> String {
    row.assignment.iter()
        .map(|(name, value)| format!("{}={}", name, value))
        .collect::<Vec<_>>()
        .join(",")
}

fn format_probabilities(probabilities: &[f64]) -> String {
    probabilities.iter().map(|p| p.to_string()).collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rain_network() -> Registry {
        let mut reg = Registry::new();
        let (rain, wet) = reg.add_edge("Rain", "WetGrass");
        for id in [rain, wet] {
            reg.set_domain(id, vec!["true".into(), "false".into()]);
        }
        reg.set_table(rain, &[]);
        reg.add_row(rain, &[], &[0.2, 0.8]).unwrap();
        reg.set_table(wet, &[rain]);
        reg.add_row(wet, &[("Rain".into(), "true".into())], &[0.9, 0.1]).unwrap();
        reg
    }

    #[test]
    fn test_format_structure() {
        let mut reg = rain_network();
        reg.add_edge("Sprinkler", "WetGrass");
        let text = format_structure(&reg).unwrap();
        assert_eq!(text, "Structure (predecessors):\n- Rain <- (root)\n- Sprinkler <- (root)\n- WetGrass <- Rain,Sprinkler\n");
    }

    #[test]
    fn test_format_tables_shows_missing_as_nan() {
        let reg = rain_network();
        let text = format_tables(&reg).unwrap();
        let expected = "\
P(Rain)
Values: true, false
 <prior> : 0.2 0.8

P(WetGrass | Rain)
Values: true, false
 Rain=true : 0.9 0.1
 Rain=false : NaN NaN

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_format_cpt_source_skips_undefined_rows() {
        let reg = rain_network();
        let text = format_cpt_source(&reg).unwrap();
        let expected = "\
NODE Rain
VALUES: true false
TABLE
p: 0.2 0.8
END

NODE WetGrass
VALUES: true false
PARENTS: Rain
TABLE
Rain=true: 0.9 0.1
END

";
        assert_eq!(text, expected);
    }

    #[test]
    fn test_format_cpt_source_drops_partial_rows() {
        let mut reg = rain_network();
        let wet = reg.get("WetGrass").unwrap();
        reg.set_domain(wet, vec!["true".into(), "false".into(), "unknown".into()]);
        assert_eq!(reg.table(wet).unwrap().len(), 2);

        let text = format_cpt_source(&reg).unwrap();
        assert!(text.contains("NODE WetGrass\nVALUES: true false unknown\nPARENTS: Rain\nTABLE\nEND\n"), "{}", text);
        assert!(!text.contains("Rain=true:"));
    }

    #[test]
    fn test_printers_reject_cycles() {
        let mut reg = Registry::new();
        reg.add_edge("A", "B");
        reg.add_edge("B", "A");
        assert!(format_structure(&reg).is_err());
        assert!(format_tables(&reg).is_err());
    }
}
