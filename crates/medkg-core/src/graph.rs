//! The loaded, read-only knowledge graph.
//!
//! Backed by a petgraph `DiGraph` with a `HashMap` from node id to petgraph's
//! index. Nodes and links keep document order (petgraph indices are assigned
//! in insertion order), which is what every analysis uses for tie-breaking.

use crate::document::GraphDocument;
use crate::error::GraphError;
use crate::types::{Connection, GraphRole, Link, Node, NodeType, Relationship};
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;
use std::collections::{HashMap, HashSet};

/// A validated knowledge graph.
#[derive(Debug, Clone)]
pub struct KnowledgeGraph {
    role: GraphRole,
    graph: DiGraph<Node, Link>,
    /// Map from node id to petgraph's internal index.
    index: HashMap<String, NodeIndex>,
}

impl KnowledgeGraph {
    /// Validate a document and build the graph.
    ///
    /// Rejects duplicate node ids, weights outside `[0, 1]`, and a repeated
    /// `(source, target, relationship)` triple with `MalformedGraph`; rejects
    /// links to undeclared nodes with `UnresolvedReference`.
    pub fn from_document(role: GraphRole, doc: &GraphDocument) -> Result<Self, GraphError> {
        let mut graph = DiGraph::with_capacity(doc.nodes.len(), doc.links.len());
        let mut index = HashMap::with_capacity(doc.nodes.len());

        for node in &doc.nodes {
            if index.contains_key(&node.id) {
                return Err(GraphError::malformed(
                    role,
                    format!("duplicate node id '{}'", node.id),
                ));
            }
            let idx = graph.add_node(node.clone());
            index.insert(node.id.clone(), idx);
        }

        let mut seen: HashSet<(String, String, Relationship)> = HashSet::new();
        for (position, record) in doc.links.iter().enumerate() {
            let link = record.normalize(role);

            let source = *index.get(&link.source).ok_or_else(|| GraphError::UnresolvedReference {
                graph: role,
                link: position,
                node: link.source.clone(),
            })?;
            let target = *index.get(&link.target).ok_or_else(|| GraphError::UnresolvedReference {
                graph: role,
                link: position,
                node: link.target.clone(),
            })?;

            if !(0.0..=1.0).contains(&link.weight) {
                return Err(GraphError::malformed(
                    role,
                    format!("link #{} has weight {} outside 0.0-1.0", position, link.weight),
                ));
            }
            if !seen.insert((link.source.clone(), link.target.clone(), link.relationship)) {
                return Err(GraphError::malformed(
                    role,
                    format!(
                        "duplicate link {} -[{}]-> {}",
                        link.source, link.relationship, link.target
                    ),
                ));
            }

            graph.add_edge(source, target, link);
        }

        Ok(Self { role, graph, index })
    }

    pub fn role(&self) -> GraphRole {
        self.role
    }

    pub fn node(&self, id: &str) -> Option<&Node> {
        self.index.get(id).map(|idx| &self.graph[*idx])
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains_key(id)
    }

    pub fn node_type(&self, id: &str) -> Option<NodeType> {
        self.node(id).map(|n| n.node_type)
    }

    /// All nodes in document order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.graph.node_weights()
    }

    /// All links in document order.
    pub fn links(&self) -> impl Iterator<Item = &Link> {
        self.graph.edge_weights()
    }

    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    pub fn link_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Nodes of one type, in document order.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes().filter(move |n| n.node_type == node_type)
    }

    /// Disease nodes in document order.
    pub fn diseases(&self) -> impl Iterator<Item = &Node> {
        self.nodes_of_type(NodeType::Disease)
    }

    pub fn disease_ids(&self) -> Vec<&str> {
        self.diseases().map(|n| n.id.as_str()).collect()
    }

    pub fn symptom_ids(&self) -> Vec<&str> {
        self.nodes_of_type(NodeType::Symptom).map(|n| n.id.as_str()).collect()
    }

    /// Symptoms added by hand rather than derived from patient records.
    pub fn custom_symptom_ids(&self) -> Vec<&str> {
        self.nodes_of_type(NodeType::Symptom)
            .filter(|n| n.custom)
            .map(|n| n.id.as_str())
            .collect()
    }

    /// A disease's links, or `None` when the graph has no such disease.
    pub fn connections(&self, disease: &str) -> Option<Vec<Connection>> {
        if self.node_type(disease) != Some(NodeType::Disease) {
            return None;
        }
        Some(self.outgoing(disease).into_iter().map(Connection::from).collect())
    }

    /// Outgoing links of a node, in document order. Empty for unknown ids.
    pub fn outgoing(&self, id: &str) -> Vec<&Link> {
        let Some(&idx) = self.index.get(id) else {
            return Vec::new();
        };
        // petgraph walks adjacency newest-first; restore insertion order.
        let mut edges: Vec<_> = self.graph.edges_directed(idx, Direction::Outgoing).collect();
        edges.sort_by_key(|e| e.id().index());
        edges.into_iter().map(|e| e.weight()).collect()
    }

    /// The link `source -[relationship]-> target`, if present.
    pub fn find_link(&self, source: &str, target: &str, relationship: Relationship) -> Option<&Link> {
        let from = *self.index.get(source)?;
        let to = *self.index.get(target)?;
        self.graph
            .edges_connecting(from, to)
            .map(|e| e.weight())
            .find(|link| link.relationship == relationship)
    }

    /// Every link from `source` to `target`, in document order.
    pub fn links_between(&self, source: &str, target: &str) -> Vec<&Link> {
        self.outgoing(source)
            .into_iter()
            .filter(|link| link.target == target)
            .collect()
    }

    /// Distinct targets of a node's outgoing links, first occurrence first.
    pub fn factors(&self, id: &str) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.outgoing(id)
            .into_iter()
            .map(|link| link.target.as_str())
            .filter(|target| seen.insert(*target))
            .collect()
    }

    /// Type of a link's target; falls back to the relationship's usual
    /// target type, which only matters for hand-built graphs.
    pub fn target_type(&self, link: &Link) -> NodeType {
        self.node_type(&link.target)
            .unwrap_or_else(|| link.relationship.target_type())
    }

    /// A link counts as novel when it, or its target node, carries the flag.
    pub fn is_novel_link(&self, link: &Link) -> bool {
        link.is_novel || self.node(&link.target).map(|n| n.is_novel).unwrap_or(false)
    }

    /// Write the graph back out as a document.
    pub fn to_document(&self) -> GraphDocument {
        GraphDocument {
            nodes: self.nodes().cloned().collect(),
            links: self.links().map(Into::into).collect(),
        }
    }
}
