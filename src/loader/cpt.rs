//! cpt.rs
//! Block-structured CPT files:
//!
//! ```text
//! NODE WetGrass
//! VALUES: true false
//! PARENTS: Rain
//! TABLE
//! Rain=true: 0.9 0.1
//! Rain=false: 0.1 0.9
//! END
//! ```

use super::LoadError;
use crate::store::{Assignment, Registry, VarId};

/// Block currently being read: its variable and the declared parent order.
struct OpenBlock {
    var: VarId,
    parents: Vec<VarId>,
}

pub fn parse_cpts(registry: &mut Registry, text: &str) -> Result<usize, LoadError> {
    let mut current: Option<OpenBlock> = None;
    let mut rows = 0;

    for (i, raw) in text.lines().enumerate() {
        let line_no = i + 1;
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        if let Some(name) = line.strip_prefix("NODE ") {
            let var = registry.get_or_create(name.trim());
            if registry.table(var).is_none() {
                registry.set_table(var, &[]);
            }
            current = Some(OpenBlock { var, parents: Vec::new() });
            continue;
        }

        let block = current.as_mut().ok_or_else(|| LoadError::Syntax {
            line: line_no,
            message: format!("'{}' outside NODE block", keyword_of(line)),
        })?;

        if let Some(rest) = line.strip_prefix("VALUES:") {
            registry.set_domain(block.var, rest.split_whitespace().map(str::to_string).collect());
        } else if let Some(rest) = line.strip_prefix("PARENTS:") {
            block.parents = rest.split_whitespace().map(|name| registry.get_or_create(name)).collect();
        } else if line == "TABLE" {
            registry.set_table(block.var, &block.parents);
        } else if line == "END" {
            registry.set_table(block.var, &block.parents);
            current = None;
        } else if let Some(rest) = line.strip_prefix("p:") {
            let probabilities = parse_probabilities(rest, line_no)?;
            registry.set_table(block.var, &[]);
            registry.add_row(block.var, &[], &probabilities)
                .map_err(|source| LoadError::Table { line: line_no, source })?;
            rows += 1;
        } else {
            let (lhs, rhs) = line.split_once(':').ok_or_else(|| LoadError::Syntax {
                line: line_no,
                message: "missing ':' in table row".to_string(),
            })?;
            let assignment = parse_assignment(lhs, line_no)?;
            let probabilities = parse_probabilities(rhs, line_no)?;
            registry.add_row(block.var, &assignment, &probabilities)
                .map_err(|source| LoadError::Table { line: line_no, source })?;
            rows += 1;
        }
    }

    tracing::debug!(rows, variables = registry.count(), "CPTs parsed");
    Ok(rows)
}

fn keyword_of(line: &str) -> &str {
    line.split(|c: char| c == ':' || c.is_whitespace()).next().unwrap_or(line)
}

fn parse_assignment(text: &str, line: usize) -> Result<Vec<Assignment>, LoadError> {
    let text = text.trim();
    if text.is_empty() {
        return Ok(Vec::new());
    }
    text.split(',')
        .map(str::trim)
        .filter(|pair| !pair.is_empty())
        .map(|pair| {
            let (name, value) = pair.split_once('=').ok_or_else(|| LoadError::Syntax {
                line,
                message: format!("missing '=' in '{}'", pair),
            })?;
            Ok((name.trim().to_string(), value.trim().to_string()))
        })
        .collect()
}

fn parse_probabilities(text: &str, line: usize) -> Result<Vec<f64>, LoadError> {
    text.split_whitespace()
        .map(|token| token.parse::<f64>().map_err(|_| LoadError::Probability { line, token: token.to_string() }))
        .collect()
}
