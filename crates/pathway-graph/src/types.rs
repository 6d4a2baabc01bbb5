//! Catalog data model: path descriptors and the relationship graph.

use std::collections::HashMap;

use indexmap::IndexMap;
use pathway_core::level::level_value;
use pathway_core::{Error, Level, Result};
use petgraph::graph::{DiGraph, NodeIndex};
use serde::{Deserialize, Deserializer, Serialize};

/// Priority assumed for paths that do not declare one.
pub const DEFAULT_PRIORITY: u32 = 999;

// ============================================================================
// PathDescriptor
// ============================================================================

/// A learning path and its relationships to other paths.
///
/// Every field is optional or defaults to empty so that partially filled
/// catalogs still load; completeness is checked separately with
/// [`PathDescriptor::missing_fields`].
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathDescriptor {
    /// Identifier; expected to equal the catalog key.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    /// Display title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,

    /// Skill level. Unrecognised level names load as `None`.
    #[serde(
        default,
        deserialize_with = "deserialize_level",
        skip_serializing_if = "Option::is_none"
    )]
    pub level: Option<Level>,

    /// Free-form grouping such as `foundation`, `skill`, or `expert`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,

    /// Items added when the path is chosen.
    #[serde(default)]
    pub auto_select_items: Vec<String>,

    /// Paths that gate this one.
    #[serde(default)]
    pub prerequisites: Vec<String>,

    /// Individual items that must be completed first.
    #[serde(default)]
    pub dependencies: Vec<String>,

    /// Paths that should not be active at the same time as this one.
    #[serde(default)]
    pub conflicts: Vec<String>,

    /// Non-blocking suggestions.
    #[serde(default)]
    pub related_paths: Vec<String>,

    /// Tie-break ordering within a level; lower comes first.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub priority: Option<u32>,

    /// Sum of item durations, in minutes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub estimated_total_time: Option<u32>,
}

impl PathDescriptor {
    /// Create a descriptor with an id and level.
    pub fn new(id: impl Into<String>, level: Level) -> Self {
        Self {
            id: Some(id.into()),
            level: Some(level),
            ..Self::default()
        }
    }

    /// Set the title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    /// Set the category.
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    /// Set the auto-selectable items.
    pub fn with_items<I, S>(mut self, items: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.auto_select_items = items.into_iter().map(Into::into).collect();
        self
    }

    /// Set the prerequisite paths.
    pub fn with_prerequisites<I, S>(mut self, prerequisites: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.prerequisites = prerequisites.into_iter().map(Into::into).collect();
        self
    }

    /// Set the item dependencies.
    pub fn with_dependencies<I, S>(mut self, dependencies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.dependencies = dependencies.into_iter().map(Into::into).collect();
        self
    }

    /// Set the explicit conflicts.
    pub fn with_conflicts<I, S>(mut self, conflicts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.conflicts = conflicts.into_iter().map(Into::into).collect();
        self
    }

    /// Set the related paths.
    pub fn with_related<I, S>(mut self, related: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.related_paths = related.into_iter().map(Into::into).collect();
        self
    }

    /// Set the priority.
    pub fn with_priority(mut self, priority: u32) -> Self {
        self.priority = Some(priority);
        self
    }

    /// Set the estimated total time in minutes.
    pub fn with_estimated_time(mut self, minutes: u32) -> Self {
        self.estimated_total_time = Some(minutes);
        self
    }

    /// Numeric level value; missing levels count as Beginner.
    pub fn level_value(&self) -> u8 {
        level_value(self.level)
    }

    /// Priority, or [`DEFAULT_PRIORITY`] when absent.
    pub fn effective_priority(&self) -> u32 {
        self.priority.unwrap_or(DEFAULT_PRIORITY)
    }

    /// Level name for messages.
    pub fn level_name(&self) -> &'static str {
        self.level.map_or("Unknown", Level::as_str)
    }

    /// Fields required by the structural validator that are absent.
    pub fn missing_required_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("id");
        }
        if self.level.is_none() {
            missing.push("level");
        }
        missing
    }

    /// Fields required for selection processing that are absent.
    pub fn missing_fields(&self) -> Vec<&'static str> {
        let mut missing = Vec::new();
        if self.id.is_none() {
            missing.push("id");
        }
        if self.title.is_none() {
            missing.push("title");
        }
        if self.level.is_none() {
            missing.push("level");
        }
        if self.category.is_none() {
            missing.push("category");
        }
        missing
    }

    /// Whether all selection-relevant fields are present.
    pub fn is_complete(&self) -> bool {
        self.missing_fields().is_empty()
    }
}

fn deserialize_level<'de, D>(deserializer: D) -> std::result::Result<Option<Level>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    Ok(raw.and_then(|name| match name.parse::<Level>() {
        Ok(level) => Some(level),
        Err(_) => {
            log::warn!("Ignoring unknown path level '{name}'");
            None
        }
    }))
}

// ============================================================================
// RelationshipGraph
// ============================================================================

/// Catalog of learning paths keyed by path id.
///
/// Iteration follows insertion order, which keeps whole-graph traversals
/// and tie-breaks deterministic. The graph is treated as read-only once
/// handed to the engine.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelationshipGraph {
    paths: IndexMap<String, PathDescriptor>,
}

impl RelationshipGraph {
    /// Create an empty graph.
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a descriptor under `id`, replacing any previous one in place.
    pub fn insert(
        &mut self,
        id: impl Into<String>,
        descriptor: PathDescriptor,
    ) -> Option<PathDescriptor> {
        self.paths.insert(id.into(), descriptor)
    }

    /// Add a descriptor keyed by its own `id`.
    ///
    /// Fails if the descriptor has no id or the id is already present.
    pub fn add(&mut self, descriptor: PathDescriptor) -> Result<()> {
        let id = descriptor
            .id
            .clone()
            .ok_or_else(|| Error::invalid_data("Path descriptor has no id"))?;
        if self.contains(&id) {
            return Err(Error::invalid_data(format!("Duplicate path id: {id}")));
        }
        self.insert(id, descriptor);
        Ok(())
    }

    /// Builder-style [`add`](Self::add).
    pub fn with_path(mut self, descriptor: PathDescriptor) -> Result<Self> {
        self.add(descriptor)?;
        Ok(self)
    }

    /// Look up a descriptor.
    pub fn get(&self, id: &str) -> Option<&PathDescriptor> {
        self.paths.get(id)
    }

    /// Whether a path with this id exists.
    pub fn contains(&self, id: &str) -> bool {
        self.paths.contains_key(id)
    }

    /// Number of paths.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    /// Whether the graph has no paths.
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Path ids in insertion order.
    pub fn ids(&self) -> impl Iterator<Item = &str> {
        self.paths.keys().map(String::as_str)
    }

    /// `(id, descriptor)` pairs in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &PathDescriptor)> {
        self.paths.iter().map(|(id, d)| (id.as_str(), d))
    }

    /// Build a petgraph view of the prerequisite relation.
    ///
    /// Edges point from a prerequisite to the path that requires it.
    /// References to paths outside the graph are dropped.
    pub fn prerequisite_digraph(&self) -> (DiGraph<String, ()>, HashMap<String, NodeIndex>) {
        let mut graph = DiGraph::with_capacity(self.len(), 0);
        let mut indices = HashMap::with_capacity(self.len());

        for id in self.ids() {
            let idx = graph.add_node(id.to_string());
            indices.insert(id.to_string(), idx);
        }

        for (id, descriptor) in self.iter() {
            let to = indices[id];
            for prereq in &descriptor.prerequisites {
                if let Some(&from) = indices.get(prereq) {
                    graph.add_edge(from, to, ());
                }
            }
        }

        (graph, indices)
    }
}

impl<K: Into<String>> FromIterator<(K, PathDescriptor)> for RelationshipGraph {
    fn from_iter<I: IntoIterator<Item = (K, PathDescriptor)>>(iter: I) -> Self {
        Self {
            paths: iter.into_iter().map(|(id, d)| (id.into(), d)).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_paths() -> RelationshipGraph {
        RelationshipGraph::new()
            .with_path(PathDescriptor::new("b", Level::Intermediate).with_prerequisites(["a"]))
            .unwrap()
            .with_path(PathDescriptor::new("a", Level::Beginner))
            .unwrap()
    }

    // ------------------------------------------------------------------------
    // PathDescriptor
    // ------------------------------------------------------------------------

    #[test]
    fn test_descriptor_builder() {
        let d = PathDescriptor::new("p", Level::Advanced)
            .with_title("P")
            .with_category("expert")
            .with_items(["x/01-a"])
            .with_priority(3);

        assert_eq!(d.id.as_deref(), Some("p"));
        assert_eq!(d.auto_select_items, vec!["x/01-a"]);
        assert_eq!(d.effective_priority(), 3);
        assert!(d.is_complete());
    }

    #[test]
    fn test_descriptor_defaults() {
        let d = PathDescriptor::default();
        assert_eq!(d.effective_priority(), DEFAULT_PRIORITY);
        assert_eq!(d.level_value(), 0);
        assert_eq!(d.level_name(), "Unknown");
        assert_eq!(d.missing_required_fields(), vec!["id", "level"]);
        assert_eq!(d.missing_fields(), vec!["id", "title", "level", "category"]);
    }

    #[test]
    fn test_descriptor_camel_case_fields() {
        let d: PathDescriptor = serde_json::from_str(
            r#"{
                "id": "p",
                "level": "Intermediate",
                "autoSelectItems": ["a/01-x"],
                "relatedPaths": ["q"],
                "estimatedTotalTime": 90
            }"#,
        )
        .unwrap();

        assert_eq!(d.level, Some(Level::Intermediate));
        assert_eq!(d.auto_select_items, vec!["a/01-x"]);
        assert_eq!(d.related_paths, vec!["q"]);
        assert_eq!(d.estimated_total_time, Some(90));
        assert!(d.prerequisites.is_empty());
    }

    #[test]
    fn test_descriptor_unknown_level_loads_as_none() {
        let d: PathDescriptor = serde_json::from_str(r#"{"id": "p", "level": "Guru"}"#).unwrap();
        assert_eq!(d.level, None);
    }

    // ------------------------------------------------------------------------
    // RelationshipGraph
    // ------------------------------------------------------------------------

    #[test]
    fn test_graph_preserves_insertion_order() {
        let graph = two_paths();
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec!["b", "a"]);
        assert_eq!(graph.len(), 2);
    }

    #[test]
    fn test_graph_add_rejects_duplicates_and_missing_id() {
        let mut graph = two_paths();
        assert!(graph.add(PathDescriptor::new("a", Level::Beginner)).is_err());
        assert!(graph.add(PathDescriptor::default()).is_err());
    }

    #[test]
    fn test_graph_insert_replaces_in_place() {
        let mut graph = two_paths();
        let old = graph.insert("b", PathDescriptor::new("b", Level::Advanced));
        assert!(old.is_some());
        assert_eq!(graph.ids().next(), Some("b"));
        assert_eq!(graph.get("b").unwrap().level, Some(Level::Advanced));
    }

    #[test]
    fn test_graph_serde_keeps_document_order() {
        let json = r#"{"z": {"id": "z"}, "m": {"id": "m"}, "a": {"id": "a"}}"#;
        let graph: RelationshipGraph = serde_json::from_str(json).unwrap();
        assert_eq!(graph.ids().collect::<Vec<_>>(), vec!["z", "m", "a"]);

        let out = serde_json::to_string(&graph).unwrap();
        let z = out.find("\"z\"").unwrap();
        let a = out.find("\"a\"").unwrap();
        assert!(z < a);
    }

    #[test]
    fn test_graph_serializes_as_plain_map() {
        let graph = two_paths();
        let value = serde_json::to_value(&graph).unwrap();
        assert_eq!(value["a"]["id"], "a");
        assert_eq!(value["b"]["prerequisites"][0], "a");

        let back: RelationshipGraph = serde_json::from_value(value).unwrap();
        assert_eq!(back, graph);
        assert_eq!(back.ids().collect::<Vec<_>>(), vec!["b", "a"]);
    }

    #[test]
    fn test_prerequisite_digraph_edges() {
        let mut graph = two_paths();
        graph.insert(
            "c",
            PathDescriptor::new("c", Level::Advanced).with_prerequisites(["b", "ghost"]),
        );

        let (dg, indices) = graph.prerequisite_digraph();
        assert_eq!(dg.node_count(), 3);
        assert_eq!(dg.edge_count(), 2);
        assert!(dg.contains_edge(indices["a"], indices["b"]));
        assert!(dg.contains_edge(indices["b"], indices["c"]));
    }
}
