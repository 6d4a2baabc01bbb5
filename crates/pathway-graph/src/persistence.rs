//! Catalog persistence.
//!
//! Catalogs are stored as a map of path id to descriptor, in JSON or YAML.
//! Document order is kept, since whole-graph searches break ties by it.

use std::path::Path;

use pathway_core::{Error, Result};

use crate::RelationshipGraph;

// ============================================================================
// Load
// ============================================================================

/// Load a catalog from a file.
///
/// Files ending in `.yaml` or `.yml` are read as YAML; everything else is
/// read as JSON.
pub fn load_graph(path: impl AsRef<Path>) -> Result<RelationshipGraph> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path).map_err(|e| Error::io_with_path(e, path))?;

    let is_yaml = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("yaml") || ext.eq_ignore_ascii_case("yml"));

    let graph = if is_yaml {
        load_graph_from_yaml_str(&content)?
    } else {
        load_graph_from_str(&content)?
    };

    log::debug!("Loaded {} path(s) from {}", graph.len(), path.display());
    Ok(graph)
}

/// Load a catalog from a JSON string.
pub fn load_graph_from_str(json: &str) -> Result<RelationshipGraph> {
    serde_json::from_str(json)
        .map_err(|e| Error::parse(format!("Failed to parse catalog JSON: {e}")))
}

/// Load a catalog from a YAML string.
pub fn load_graph_from_yaml_str(yaml: &str) -> Result<RelationshipGraph> {
    serde_yaml::from_str(yaml)
        .map_err(|e| Error::parse(format!("Failed to parse catalog YAML: {e}")))
}

// ============================================================================
// Save
// ============================================================================

/// Save a catalog to a file as pretty-printed JSON.
pub fn save_graph(graph: &RelationshipGraph, path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(graph)
        .map_err(|e| Error::serialization(format!("Failed to serialize catalog: {e}")))?;

    std::fs::write(path.as_ref(), json).map_err(|e| Error::io_with_path(e, path.as_ref()))?;

    Ok(())
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::*;
    use pathway_core::Level;
    use tempfile::tempdir;

    #[test]
    fn test_save_and_load_graph() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paths.json");

        let graph = sample_catalog();
        save_graph(&graph, &path).unwrap();
        let loaded = load_graph(&path).unwrap();

        assert_eq!(loaded, graph);
        assert_eq!(loaded.ids().next(), Some(FOUNDATION));
    }

    #[test]
    fn test_load_yaml_by_extension() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("paths.yml");
        std::fs::write(
            &path,
            "second:\n  id: second\n  level: Advanced\n  prerequisites: [first]\nfirst:\n  id: first\n  level: beginner\n",
        )
        .unwrap();

        let graph = load_graph(&path).unwrap();
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec!["second", "first"]);
        assert_eq!(graph.get("first").unwrap().level, Some(Level::Beginner));
        assert_eq!(graph.get("second").unwrap().prerequisites, ids(&["first"]));
    }

    #[test]
    fn test_load_graph_from_str() {
        let graph = load_graph_from_str(
            r#"{"p": {"id": "p", "level": "Intermediate", "autoSelectItems": ["x/01-y"]}}"#,
        )
        .unwrap();
        assert_eq!(graph.len(), 1);
        assert_eq!(graph.get("p").unwrap().auto_select_items, ids(&["x/01-y"]));
    }

    #[test]
    fn test_load_graph_invalid_json() {
        let err = load_graph_from_str("not json").unwrap_err();
        assert!(matches!(err, Error::Parse(_)));
    }

    #[test]
    fn test_load_graph_missing_file() {
        let dir = tempdir().unwrap();
        let err = load_graph(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, Error::IoWithPath { .. }));
    }
}
