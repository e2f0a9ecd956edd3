//! Merge-rule validation and chain resolution.

use std::collections::{BTreeMap, HashMap};

use rustworkx_core::petgraph::algo::toposort;
use rustworkx_core::petgraph::graph::{DiGraph, NodeIndex};
use wave_core::MergeRule;

use crate::error::{Result, TransitionError};

/// Source value → final target value, with chains collapsed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MergeMap {
    targets: BTreeMap<String, String>,
}

impl MergeMap {
    /// Validate merge rules for one variable and collapse chains.
    ///
    /// Identical duplicate rules are accepted. Conflicting targets for one
    /// source and cycles (including `a -> a`) are rejected.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::AmbiguousMergeRule`] or
    /// [`TransitionError::CyclicMergeRule`].
    pub fn compile<'a>(
        variable: &str,
        rules: impl IntoIterator<Item = &'a MergeRule>,
    ) -> Result<Self> {
        let mut declared: BTreeMap<String, String> = BTreeMap::new();
        for rule in rules {
            match declared.get(&rule.source_value) {
                Some(existing) if existing != &rule.target_value => {
                    return Err(TransitionError::AmbiguousMergeRule {
                        variable: variable.to_string(),
                        source_value: rule.source_value.clone(),
                        first_target: existing.clone(),
                        second_target: rule.target_value.clone(),
                    });
                }
                Some(_) => {}
                None => {
                    declared.insert(rule.source_value.clone(), rule.target_value.clone());
                }
            }
        }

        reject_cycles(variable, &declared)?;

        let targets = declared
            .keys()
            .map(|source| {
                let mut current = source;
                while let Some(next) = declared.get(current) {
                    current = next;
                }
                (source.clone(), current.clone())
            })
            .collect();
        Ok(Self { targets })
    }

    /// Final category for a value; values without a rule map to themselves.
    #[must_use]
    pub fn resolve<'a>(&'a self, value: &'a str) -> &'a str {
        self.targets.get(value).map_or(value, String::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.targets.len()
    }
}

fn reject_cycles(variable: &str, declared: &BTreeMap<String, String>) -> Result<()> {
    let mut graph: DiGraph<&str, ()> = DiGraph::new();
    let mut nodes: HashMap<&str, NodeIndex> = HashMap::new();
    for (source, target) in declared {
        let from = *nodes
            .entry(source.as_str())
            .or_insert_with(|| graph.add_node(source.as_str()));
        let to = *nodes
            .entry(target.as_str())
            .or_insert_with(|| graph.add_node(target.as_str()));
        graph.add_edge(from, to, ());
    }

    let Err(cycle) = toposort(&graph, None) else {
        return Ok(());
    };

    // Every value has at most one outgoing rule, so walking forward from any
    // node on the cycle returns to it.
    let start = graph[cycle.node_id()];
    let mut members = vec![start.to_string()];
    let mut current = start;
    while let Some(next) = declared.get(current) {
        if next == start {
            break;
        }
        members.push(next.clone());
        current = next.as_str();
    }
    members.push(start.to_string());
    Err(TransitionError::CyclicMergeRule {
        variable: variable.to_string(),
        cycle: members,
    })
}
