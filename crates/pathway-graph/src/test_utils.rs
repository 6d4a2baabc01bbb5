//! Sample catalogs for tests.
//!
//! The sample catalog has five paths: one foundation path, two
//! intermediate paths, and two expert paths. The first expert path
//! requires both intermediate paths and the second requires the first.

use pathway_core::Level;

use crate::{PathDescriptor, RelationshipGraph};

/// Foundation path id.
pub const FOUNDATION: &str = "foundation-ai-first-engineering";
/// First intermediate path id.
pub const INFRA: &str = "intermediate-infrastructure-architect";
/// Second intermediate path id.
pub const DEVOPS: &str = "intermediate-devops-excellence";
/// First expert path id.
pub const ENTERPRISE: &str = "expert-enterprise-integration";
/// Second expert path id.
pub const ANALYTICS: &str = "expert-data-analytics-integration";

/// The five-path sample catalog.
pub fn sample_catalog() -> RelationshipGraph {
    let mut graph = RelationshipGraph::new();

    graph.insert(
        FOUNDATION,
        PathDescriptor::new(FOUNDATION, Level::Beginner)
            .with_title("Foundation Builder - AI Engineering")
            .with_items([
                "ai-assisted-engineering/01-ai-development-fundamentals",
                "prompt-engineering/01-prompt-engineering-basics",
                "ai-assisted-engineering/02-ai-code-review-techniques",
                "prompt-engineering/02-advanced-prompt-patterns",
                "ai-assisted-engineering/03-ai-assisted-testing",
            ])
            .with_conflicts([ENTERPRISE])
            .with_related([INFRA, DEVOPS])
            .with_category("foundation")
            .with_estimated_time(210)
            .with_priority(1),
    );

    graph.insert(
        INFRA,
        PathDescriptor::new(INFRA, Level::Intermediate)
            .with_title("Intermediate - Infrastructure Architect")
            .with_items([
                "project-planning/01-basic-prompt-usage",
                "project-planning/02-comprehensive-two-scenario",
                "project-planning/03-advanced-strategic-planning",
            ])
            .with_related([FOUNDATION, DEVOPS])
            .with_category("intermediate")
            .with_estimated_time(135)
            .with_priority(2),
    );

    graph.insert(
        DEVOPS,
        PathDescriptor::new(DEVOPS, Level::Intermediate)
            .with_title("Intermediate - DevOps Excellence")
            .with_items([
                "edge-deployment/01-edge-computing-fundamentals",
                "edge-deployment/02-container-deployment-basics",
                "training-labs/iot-edge/01-basic-setup",
                "system-troubleshooting/01-monitoring-basics",
                "system-troubleshooting/02-edge-troubleshooting",
            ])
            .with_related([FOUNDATION])
            .with_category("intermediate")
            .with_estimated_time(180)
            .with_priority(3),
    );

    graph.insert(
        ENTERPRISE,
        PathDescriptor::new(ENTERPRISE, Level::Advanced)
            .with_title("Expert - Enterprise Integration")
            .with_items([
                "ai-assisted-engineering/04-ai-system-architecture",
                "adr-creation/01-ai-decision-documentation",
                "task-planning/02-ai-driven-planning",
                "system-integration/03-enterprise-ai-patterns",
            ])
            .with_prerequisites([INFRA, DEVOPS])
            .with_dependencies([
                "ai-assisted-engineering/01-ai-development-fundamentals",
                "prompt-engineering/02-advanced-prompt-patterns",
                "system-integration/01-api-integration-patterns",
            ])
            .with_conflicts([FOUNDATION])
            .with_related([ANALYTICS])
            .with_category("expert")
            .with_estimated_time(300)
            .with_priority(4),
    );

    graph.insert(
        ANALYTICS,
        PathDescriptor::new(ANALYTICS, Level::Advanced)
            .with_title("Expert - Data Analytics Integration")
            .with_items([
                "full-stack/01-end-to-end-ai-integration",
                "full-stack/02-production-deployment",
                "full-stack/03-monitoring-and-observability",
            ])
            .with_prerequisites([ENTERPRISE])
            .with_dependencies([
                "ai-assisted-engineering/04-ai-system-architecture",
                "system-integration/02-microservices-architecture",
            ])
            .with_related([ENTERPRISE])
            .with_category("expert")
            .with_estimated_time(400)
            .with_priority(5),
    );

    graph
}

/// Three paths whose prerequisites form the cycle `a -> b -> c -> a`.
pub fn cyclic_catalog() -> RelationshipGraph {
    ["a", "b", "c"]
        .iter()
        .zip(["b", "c", "a"])
        .map(|(id, prereq)| {
            (
                *id,
                PathDescriptor::new(*id, Level::Beginner)
                    .with_title(id.to_uppercase())
                    .with_category("foundation")
                    .with_items([format!("cycle/01-{id}")])
                    .with_prerequisites([prereq]),
            )
        })
        .collect()
}

/// Owned ids from string slices.
pub fn ids(values: &[&str]) -> Vec<String> {
    values.iter().map(|s| s.to_string()).collect()
}
