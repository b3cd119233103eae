//! DOT diagram projection of a resolved collection.
//!
//! The renderer is a pure read-only walk: one node per non-hidden issue,
//! one edge per non-hidden depends-on relation between non-hidden
//! endpoints, iterated in URL order so output is stable. The node and edge
//! attribute mapping is a compatibility contract with downstream diagram
//! consumers, not an implementation detail.

mod label;

use crate::collection::IssueCollection;
use crate::domain::Issue;
use crate::error::{Error, Result};
use label::node_label;
use std::collections::HashSet;

/// Name of the emitted digraph.
const GRAPH_NAME: &str = "issues";

/// A DOT digraph under construction.
///
/// Nodes and edges keep insertion order; node ids must be unique and a
/// duplicate insertion is a structural error, fatal to the render call.
#[derive(Debug, Default)]
pub struct DotGraph {
    nodes: Vec<DotNode>,
    edges: Vec<DotEdge>,
    ids: HashSet<String>,
}

#[derive(Debug)]
struct DotNode {
    id: String,
    /// HTML-like label content, emitted inside `<...>` undelimited.
    html_label: String,
    attrs: Vec<(&'static str, String)>,
}

#[derive(Debug)]
struct DotEdge {
    from: String,
    to: String,
    attrs: Vec<(&'static str, String)>,
}

impl DotGraph {
    /// Creates an empty digraph.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a node.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Render`] when a node with the same id was already
    /// added.
    pub fn add_node(
        &mut self,
        id: &str,
        html_label: String,
        attrs: Vec<(&'static str, String)>,
    ) -> Result<()> {
        if !self.ids.insert(id.to_string()) {
            return Err(Error::Render(format!("duplicate node {id}")));
        }
        self.nodes.push(DotNode {
            id: id.to_string(),
            html_label,
            attrs,
        });
        Ok(())
    }

    /// Adds an edge. Endpoints are not validated; DOT tolerates edges to
    /// undeclared nodes, and the renderer only emits edges between nodes
    /// it has already added.
    pub fn add_edge(&mut self, from: &str, to: &str, attrs: Vec<(&'static str, String)>) {
        self.edges.push(DotEdge {
            from: from.to_string(),
            to: to.to_string(),
            attrs,
        });
    }

    /// Serializes the graph to DOT text.
    #[must_use]
    pub fn to_dot(&self) -> String {
        let mut out = String::new();
        out.push_str(&format!("digraph {GRAPH_NAME} {{\n"));

        for node in &self.nodes {
            let mut attrs = format!("label=<{}>", node.html_label);
            for (key, value) in &node.attrs {
                attrs.push_str(&format!(" {key}={}", quote(value)));
            }
            out.push_str(&format!("  {} [{attrs}];\n", quote(&node.id)));
        }

        for edge in &self.edges {
            let attrs: Vec<String> = edge
                .attrs
                .iter()
                .map(|(key, value)| format!("{key}={}", quote(value)))
                .collect();
            out.push_str(&format!(
                "  {} -> {} [{}];\n",
                quote(&edge.from),
                quote(&edge.to),
                attrs.join(" ")
            ));
        }

        out.push_str("}\n");
        out
    }
}

/// Quotes a DOT identifier or attribute value.
fn quote(value: &str) -> String {
    format!("\"{}\"", value.replace('\\', "\\\\").replace('"', "\\\""))
}

/// Renders the visible part of a resolved collection to DOT text.
///
/// # Errors
///
/// Returns [`Error::Render`] on structural diagram errors. The collection
/// itself is never mutated by rendering.
pub fn render_collection(collection: &IssueCollection, epic_label: &str) -> Result<String> {
    let mut graph = DotGraph::new();

    for issue in collection.iter() {
        if issue.hidden {
            continue;
        }
        graph.add_node(
            issue.url.as_str(),
            node_label(issue, epic_label),
            node_attrs(issue, epic_label),
        )?;
    }

    for issue in collection.iter() {
        if issue.hidden {
            continue;
        }
        for dependency_url in &issue.depends_on {
            let Some(dependency) = collection.get(dependency_url) else {
                continue;
            };
            if dependency.hidden {
                continue;
            }
            graph.add_edge(
                issue.url.as_str(),
                dependency_url.as_str(),
                edge_attrs(issue, dependency, epic_label),
            );
        }
    }

    Ok(graph.to_dot())
}

/// Status-driven node attributes; the first matching condition wins.
fn node_attrs(issue: &Issue, epic_label: &str) -> Vec<(&'static str, String)> {
    let epic = issue.is_epic(epic_label);
    let shape = if epic { "oval" } else { "record" };
    let mut style = "rounded,filled";
    let mut color = "lightblue";

    if issue.is_closed() {
        color = "#cccccc33";
    } else if issue.is_ready() {
        color = "pink";
    } else if epic {
        color = "orange";
        style = "rounded,filled,bold";
    } else if issue.is_orphan || !issue.linked_with_epic {
        color = "gray";
    }

    vec![
        ("shape", shape.to_string()),
        ("style", style.to_string()),
        ("color", color.to_string()),
        ("href", issue.url.to_string()),
    ]
}

/// Edge attributes for a depends-on relation from `issue` to `dependency`.
fn edge_attrs(issue: &Issue, dependency: &Issue, epic_label: &str) -> Vec<(&'static str, String)> {
    let mut color = "lightblue";
    let mut style = None;

    if issue.is_closed() || dependency.is_closed() {
        color = "grey";
        style = Some("dotted");
    }
    if dependency.is_ready() {
        color = "pink";
    }
    if issue.is_epic(epic_label) {
        color = "orange";
        style = Some("dashed");
    }

    let mut attrs = vec![("color", color.to_string()), ("dir", "none".to_string())];
    if let Some(style) = style {
        attrs.push(("style", style.to_string()));
    }
    attrs
}
