//! command.rs
//! Parses the command tokens accepted by the `bn` binary.

use crate::compute::Evidence;
use std::str::FromStr;
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    #[error("Unknown command: {0}")]
    Unknown(String),
    #[error("Missing query variable in '{0}'")]
    MissingVariable(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// `MOSTRAR:ESTRUCT`
    ShowStructure,
    /// `MOSTRAR:CPTS`
    ShowTables,
    /// `MOSTRAR:FUENTE`: tables in CPT-file syntax.
    ShowSource,
    /// `MOSTRAR:JSON`: registry snapshot.
    ShowJson,
    /// `CONSULTAR: Var | A=a,B=b` or `CONSULTAR_TRACE: ...`
    Query {
        variable: String,
        evidence: Evidence,
        /// Evidence exactly as written, for the result header.
        evidence_text: String,
        trace: bool,
    },
}

impl FromStr for Command {
    type Err = CommandError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.starts_with("MOSTRAR:ESTRUCT") {
            return Ok(Command::ShowStructure);
        }
        if s.starts_with("MOSTRAR:CPTS") {
            return Ok(Command::ShowTables);
        }
        if s.starts_with("MOSTRAR:FUENTE") {
            return Ok(Command::ShowSource);
        }
        if s.starts_with("MOSTRAR:JSON") {
            return Ok(Command::ShowJson);
        }

        let (rest, trace) = if let Some(rest) = s.strip_prefix("CONSULTAR_TRACE:") {
            (rest, true)
        } else if let Some(rest) = s.strip_prefix("CONSULTAR:") {
            (rest, false)
        } else {
            return Err(CommandError::Unknown(s.to_string()));
        };

        let (variable, evidence_text) = match rest.split_once('|') {
            Some((variable, evidence)) => (variable.trim(), evidence.trim()),
            None => (rest.trim(), ""),
        };
        if variable.is_empty() {
            return Err(CommandError::MissingVariable(s.to_string()));
        }

        Ok(Command::Query {
            variable: variable.to_string(),
            evidence: Evidence::parse(evidence_text),
            evidence_text: evidence_text.to_string(),
            trace,
        })
    }
}
