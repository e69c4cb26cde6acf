//! Builds a `Registry` from a structure file and a CPT file.
pub mod cpt;
pub mod structure;

pub use cpt::parse_cpts;
pub use structure::parse_structure;

use crate::config::RowPolicy;
use crate::error::InferenceError;
use crate::store::Registry;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Cannot read '{}': {source}", .path.display())]
    Io { path: PathBuf, source: std::io::Error },
    #[error("Line {line}: {message}")]
    Syntax { line: usize, message: String },
    #[error("Line {line}: invalid probability '{token}'")]
    Probability { line: usize, token: String },
    #[error("Line {line}: {source}")]
    Table { line: usize, source: InferenceError },
}

fn read(path: &Path) -> Result<String, LoadError> {
    std::fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(), source })
}

/// Loads the structure first, then the tables, into a fresh registry using `policy`.
pub fn load_network(structure: &Path, cpts: &Path, policy: RowPolicy) -> Result<Registry, LoadError> {
    let mut registry = Registry::with_policy(policy);
    parse_structure(&mut registry, &read(structure)?)?;
    parse_cpts(&mut registry, &read(cpts)?)?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Evidence, InferenceEngine};
    use crate::display::format_cpt_source;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const STRUCTURE: &str = "\
# Cloudy drives both
Cloudy -> Sprinkler
Cloudy -> Rain
Sprinkler -> WetGrass
Rain -> WetGrass
";

    const CPTS: &str = "\
NODE Cloudy
VALUES: T F
TABLE
p: 0.5 0.5
END

NODE Sprinkler
VALUES: T F
PARENTS: Cloudy
TABLE
Cloudy=T: 0.1 0.9
Cloudy=F: 0.5 0.5
END

NODE Rain
VALUES: T F
PARENTS: Cloudy
TABLE
Cloudy=T: 0.8 0.2
Cloudy=F: 0.2 0.8
END

NODE WetGrass
VALUES: T F
PARENTS: Sprinkler Rain
TABLE
Sprinkler=T,Rain=T: 0.99 0.01
Sprinkler=T,Rain=F: 0.9 0.1
Sprinkler=F,Rain=T: 0.9 0.1
Sprinkler=F,Rain=F: 0.0 1.0
END
";

    fn write_temp(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn test_load_network_from_files() {
        let structure = write_temp(STRUCTURE);
        let cpts = write_temp(CPTS);
        let reg = load_network(structure.path(), cpts.path(), RowPolicy::default()).unwrap();

        assert_eq!(reg.count(), 4);
        let engine = InferenceEngine::new(&reg).unwrap();
        let dist = engine.query("Rain", &Evidence::parse("WetGrass=T")).unwrap();
        assert!((dist.get("T").unwrap() - 0.7079).abs() < 1e-4);
    }

    #[test]
    fn test_rain_scenario_from_files() {
        let structure = write_temp("Rain -> WetGrass\n");
        let cpts = write_temp("\
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
Rain=false: 0.1 0.9
END
");
        let reg = load_network(structure.path(), cpts.path(), RowPolicy::default()).unwrap();
        let engine = InferenceEngine::new(&reg).unwrap();

        let wet = engine.query("WetGrass", &Evidence::new()).unwrap();
        assert!((wet.get("true").unwrap() - 0.26).abs() < 1e-9);
        assert!((wet.get("false").unwrap() - 0.74).abs() < 1e-9);

        let rain = engine.query("Rain", &Evidence::parse("WetGrass=true")).unwrap();
        assert!((rain.get("true").unwrap() - 0.6923).abs() < 1e-4);
        assert!((rain.get("false").unwrap() - 0.3077).abs() < 1e-4);
    }

    #[test]
    fn test_written_cpts_reload_identically() {
        let structure = write_temp(STRUCTURE);
        let cpts = write_temp(CPTS);
        let original = load_network(structure.path(), cpts.path(), RowPolicy::default()).unwrap();

        let rewritten = write_temp(&format_cpt_source(&original).unwrap());
        let reloaded = load_network(structure.path(), rewritten.path(), RowPolicy::default()).unwrap();

        for id in original.variables() {
            let name = original.name(id);
            let other = reloaded.get(name).unwrap();
            assert_eq!(original.domain(id), reloaded.domain(other), "domain of {}", name);
            assert_eq!(original.table(id), reloaded.table(other), "table of {}", name);
        }
    }

    #[test]
    fn test_missing_file() {
        let cpts = write_temp(CPTS);
        let err = load_network(Path::new("/nonexistent/structure.txt"), cpts.path(), RowPolicy::default()).unwrap_err();
        assert!(matches!(err, LoadError::Io { .. }));
        assert!(err.to_string().contains("/nonexistent/structure.txt"));
    }
}
