//! Flow graph construction for Sankey-style rendering.
//!
//! Node identity is `(category, wave, side)`: a category seen at both waves
//! yields two nodes, so stable flows are edges between distinct nodes rather
//! than self-loops.

use wave_core::{FlowEdge, FlowGraph, FlowNode, NodeId, TransitionMatrix, WaveDefinition};

use crate::colors::ColorResolver;

pub struct FlowGraphBuilder<'a> {
    colors: &'a ColorResolver,
    variable: &'a str,
}

impl<'a> FlowGraphBuilder<'a> {
    #[must_use]
    pub const fn new(colors: &'a ColorResolver, variable: &'a str) -> Self {
        Self { colors, variable }
    }

    /// Build the two-layer graph for `matrix`.
    ///
    /// Source nodes are ordered by outgoing weight descending, target nodes
    /// by incoming weight descending, ties by category. Categories with no
    /// flow on a side get no node there. Edges follow source order, then
    /// target order.
    #[must_use]
    pub fn build(
        &self,
        matrix: &TransitionMatrix,
        wave_from: &WaveDefinition,
        wave_to: &WaveDefinition,
    ) -> FlowGraph {
        let sources = ordered(matrix.from_categories().map(|c| (c, matrix.row_total(c))));
        let targets = ordered(matrix.to_categories().map(|c| (c, matrix.column_total(c))));

        let from_label = wave_from.short_label();
        let to_label = wave_to.short_label();

        let mut nodes = Vec::with_capacity(sources.len() + targets.len());
        nodes.extend(sources.iter().map(|&(category, weight)| {
            self.node(NodeId::source(category, &wave_from.id), &from_label, weight)
        }));
        nodes.extend(targets.iter().map(|&(category, weight)| {
            self.node(NodeId::target(category, &wave_to.id), &to_label, weight)
        }));

        let mut edges = Vec::new();
        for &(from, _) in &sources {
            let color = self.colors.color_for(self.variable, from);
            for &(to, _) in &targets {
                let weight = matrix.count(from, to);
                if weight == 0 {
                    continue;
                }
                edges.push(FlowEdge {
                    from: NodeId::source(from, &wave_from.id),
                    to: NodeId::target(to, &wave_to.id),
                    weight,
                    color: color.clone(),
                });
            }
        }

        tracing::debug!(
            variable = self.variable,
            wave_from = %wave_from.id,
            wave_to = %wave_to.id,
            nodes = nodes.len(),
            edges = edges.len(),
            "built flow graph"
        );

        FlowGraph {
            wave_from: wave_from.id.clone(),
            wave_to: wave_to.id.clone(),
            nodes,
            edges,
        }
    }

    fn node(&self, id: NodeId, wave_label: &str, weight: u64) -> FlowNode {
        FlowNode {
            display_label: format!("{} ({wave_label})", id.category),
            color: self.colors.color_for(self.variable, &id.category),
            id,
            weight,
        }
    }
}

fn ordered<'m>(totals: impl Iterator<Item = (&'m str, u64)>) -> Vec<(&'m str, u64)> {
    let mut totals: Vec<(&str, u64)> = totals.filter(|(_, weight)| *weight > 0).collect();
    totals.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
    totals
}
