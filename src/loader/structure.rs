//! structure.rs
//! `parent -> child` edge list, one edge per line.

use super::LoadError;
use crate::store::Registry;

pub fn parse_structure(registry: &mut Registry, text: &str) -> Result<usize, LoadError> {
    let mut edges = 0;
    for (i, raw) in text.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        let invalid = || LoadError::Syntax { line: i + 1, message: format!("expected 'parent -> child', got '{}'", line) };
        let (parent, child) = line.split_once("->").ok_or_else(invalid)?;
        let (parent, child) = (parent.trim(), child.trim());
        if parent.is_empty() || child.is_empty() || child.contains("->") {
            return Err(invalid());
        }

        registry.add_edge(parent, child);
        edges += 1;
    }
    tracing::debug!(edges, variables = registry.count(), "structure parsed");
    Ok(edges)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_parse_edges_and_comments() {
        let mut reg = Registry::new();
        let text = "# weather\n\nRain -> WetGrass\n  Sprinkler->WetGrass  \n";
        assert_eq!(parse_structure(&mut reg, text).unwrap(), 2);

        let wet = reg.get("WetGrass").unwrap();
        let names: Vec<&str> = reg.get_parents(wet).iter().map(|&p| reg.name(p)).collect();
        assert_eq!(names, ["Rain", "Sprinkler"]);
    }

    #[rstest]
    #[case("Rain WetGrass", 1)]
    #[case("Rain - WetGrass", 1)]
    #[case("-> WetGrass", 1)]
    #[case("Rain ->", 1)]
    #[case("A -> B\nA -> B -> C", 2)]
    #[case("# ok\nA => B", 2)]
    fn test_invalid_lines(#[case] text: &str, #[case] line: usize) {
        let mut reg = Registry::new();
        match parse_structure(&mut reg, text) {
            Err(LoadError::Syntax { line: at, .. }) => assert_eq!(at, line),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }
}
