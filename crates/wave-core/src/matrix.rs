//! Aggregate transition counts between two waves.

use std::collections::{BTreeMap, BTreeSet};

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// Counts indexed by `(category_from, category_to)`.
///
/// Only non-zero cells are stored; row, column and grand totals are always
/// derived from the cells. The axes list every category observed at each
/// wave, so rows and columns with no transitions still render as zeros.
#[derive(Debug, Clone, Default, Serialize, Deserialize, JsonSchema, PartialEq, Eq)]
pub struct TransitionMatrix {
    from_categories: BTreeSet<String>,
    to_categories: BTreeSet<String>,
    cells: BTreeMap<String, BTreeMap<String, u64>>,
}

impl TransitionMatrix {
    /// Build a matrix from declared axes and a stream of transitions.
    ///
    /// Categories that occur in a transition but not on the declared axis are
    /// added to it.
    pub fn from_transitions<'a, A, B, T>(from_axis: A, to_axis: B, transitions: T) -> Self
    where
        A: IntoIterator<Item = String>,
        B: IntoIterator<Item = String>,
        T: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let mut matrix = Self {
            from_categories: from_axis.into_iter().collect(),
            to_categories: to_axis.into_iter().collect(),
            cells: BTreeMap::new(),
        };
        for (from, to) in transitions {
            if !matrix.from_categories.contains(from) {
                matrix.from_categories.insert(from.to_string());
            }
            if !matrix.to_categories.contains(to) {
                matrix.to_categories.insert(to.to_string());
            }
            *matrix
                .cells
                .entry(from.to_string())
                .or_default()
                .entry(to.to_string())
                .or_insert(0) += 1;
        }
        matrix
    }

    /// Row axis, sorted.
    pub fn from_categories(&self) -> impl Iterator<Item = &str> {
        self.from_categories.iter().map(String::as_str)
    }

    /// Column axis, sorted.
    pub fn to_categories(&self) -> impl Iterator<Item = &str> {
        self.to_categories.iter().map(String::as_str)
    }

    #[must_use]
    pub fn count(&self, from: &str, to: &str) -> u64 {
        self.cells
            .get(from)
            .and_then(|row| row.get(to))
            .copied()
            .unwrap_or(0)
    }

    /// Non-zero cells in `(from, to)` lexicographic order.
    pub fn cells(&self) -> impl Iterator<Item = (&str, &str, u64)> {
        self.cells.iter().flat_map(|(from, row)| {
            row.iter()
                .map(move |(to, count)| (from.as_str(), to.as_str(), *count))
        })
    }

    #[must_use]
    pub fn row_total(&self, from: &str) -> u64 {
        self.cells.get(from).map_or(0, |row| row.values().sum())
    }

    #[must_use]
    pub fn column_total(&self, to: &str) -> u64 {
        self.cells.values().filter_map(|row| row.get(to)).sum()
    }

    #[must_use]
    pub fn total(&self) -> u64 {
        self.cells.values().flat_map(BTreeMap::values).sum()
    }

    /// True when no transition was counted (the axes may still be populated).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Row-wise percentages over the full axes; rows with no transitions are
    /// all zeros.
    #[must_use]
    pub fn row_percentages(&self) -> BTreeMap<String, BTreeMap<String, f64>> {
        self.from_categories
            .iter()
            .map(|from| {
                let row_total = self.row_total(from);
                let row = self
                    .to_categories
                    .iter()
                    .map(|to| (to.clone(), percentage(self.count(from, to), row_total)))
                    .collect();
                (from.clone(), row)
            })
            .collect()
    }

    /// Share of each row that stayed in the same category, for categories on
    /// both axes with at least one outgoing transition.
    #[must_use]
    pub fn diagonal_stability(&self) -> BTreeMap<String, f64> {
        self.from_categories
            .intersection(&self.to_categories)
            .filter_map(|category| {
                let row_total = self.row_total(category);
                (row_total > 0).then(|| {
                    (
                        category.clone(),
                        percentage(self.count(category, category), row_total),
                    )
                })
            })
            .collect()
    }

    /// Unweighted mean of [`Self::diagonal_stability`], 0 when it is empty.
    #[must_use]
    pub fn overall_stability(&self) -> f64 {
        let diagonal = self.diagonal_stability();
        if diagonal.is_empty() {
            return 0.0;
        }
        #[allow(clippy::cast_precision_loss)]
        let len = diagonal.len() as f64;
        diagonal.values().sum::<f64>() / len
    }

    /// Stable transitions as a percentage of all transitions.
    #[must_use]
    pub fn stability_rate(&self) -> f64 {
        let stable: u64 = self
            .cells()
            .filter(|(from, to, _)| from == to)
            .map(|(_, _, count)| count)
            .sum();
        percentage(stable, self.total())
    }
}

/// `part / whole × 100`, or 0 when `whole` is 0.
#[must_use]
#[allow(clippy::cast_precision_loss)]
pub fn percentage(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}
