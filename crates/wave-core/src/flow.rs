//! Node/edge flow graphs for Sankey-style rendering.

use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::color::HexColor;

/// Which layer of the two-layer graph a node sits in.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[serde(rename_all = "snake_case")]
pub enum FlowSide {
    Source,
    Target,
}

/// Node identity: a category at a specific wave.
///
/// The same category at both waves yields two distinct nodes, which keeps
/// stable flows from collapsing into self-loops. `side` only matters for a
/// self-transition, where both layers carry the same wave id.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId {
    pub category: String,
    pub wave: String,
    pub side: FlowSide,
}

impl NodeId {
    pub fn source(category: impl Into<String>, wave: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            wave: wave.into(),
            side: FlowSide::Source,
        }
    }

    pub fn target(category: impl Into<String>, wave: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            wave: wave.into(),
            side: FlowSide::Target,
        }
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}@{}", self.category, self.wave)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FlowNode {
    pub id: NodeId,
    /// `"{category} ({SHORT_WAVE})"`, e.g. `Democrat (W1)`.
    pub display_label: String,
    pub color: HexColor,
    /// Outgoing total for source-wave nodes, incoming total for target-wave nodes.
    pub weight: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FlowEdge {
    pub from: NodeId,
    pub to: NodeId,
    pub weight: u64,
    /// Inherited from the source node.
    pub color: HexColor,
}

impl FlowEdge {
    /// Semi-transparent link color.
    #[must_use]
    pub fn rgba(&self, opacity: f64) -> String {
        self.color.rgba(opacity)
    }

    #[must_use]
    pub fn is_stable(&self) -> bool {
        self.from.category == self.to.category
    }
}

/// Directed two-layer graph: source-wave nodes first, then target-wave nodes.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct FlowGraph {
    pub wave_from: String,
    pub wave_to: String,
    pub nodes: Vec<FlowNode>,
    pub edges: Vec<FlowEdge>,
}

impl FlowGraph {
    /// Sum of edge weights; equals the transition matrix total.
    #[must_use]
    pub fn total_weight(&self) -> u64 {
        self.edges.iter().map(|edge| edge.weight).sum()
    }

    /// Look up a node by category and layer.
    #[must_use]
    pub fn node(&self, category: &str, side: FlowSide) -> Option<&FlowNode> {
        self.nodes
            .iter()
            .find(|node| node.id.category == category && node.id.side == side)
    }

    #[must_use]
    pub fn edge(&self, from_category: &str, to_category: &str) -> Option<&FlowEdge> {
        self.edges
            .iter()
            .find(|edge| edge.from.category == from_category && edge.to.category == to_category)
    }

    /// Nodes on the left (source wave) side, in layout order.
    pub fn source_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes
            .iter()
            .filter(|node| node.id.side == FlowSide::Source)
    }

    /// Nodes on the right (target wave) side, in layout order.
    pub fn target_nodes(&self) -> impl Iterator<Item = &FlowNode> {
        self.nodes
            .iter()
            .filter(|node| node.id.side == FlowSide::Target)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.edges.is_empty()
    }
}
