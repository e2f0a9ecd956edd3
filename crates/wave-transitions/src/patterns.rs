//! Pattern ranking.

use std::collections::BTreeMap;

use wave_core::matrix::percentage;
use wave_core::{PatternKind, PatternRecord, TransitionMatrix};

/// Rank distinct `(from, to)` patterns by frequency.
///
/// Ordered by count descending, ties by `(from, to)` ascending. Percentages
/// are relative to the sum of all counts.
#[must_use]
pub fn rank<'a>(transitions: impl IntoIterator<Item = (&'a str, &'a str)>) -> Vec<PatternRecord> {
    let mut counts: BTreeMap<(&str, &str), u64> = BTreeMap::new();
    for pair in transitions {
        *counts.entry(pair).or_insert(0) += 1;
    }
    records(counts)
}

/// Rank the non-zero cells of a matrix. Same ordering as [`rank`].
#[must_use]
pub fn rank_matrix(matrix: &TransitionMatrix) -> Vec<PatternRecord> {
    records(matrix.cells().map(|(from, to, count)| ((from, to), count)))
}

fn records<'a>(counts: impl IntoIterator<Item = ((&'a str, &'a str), u64)>) -> Vec<PatternRecord> {
    let counts: Vec<((&str, &str), u64)> = counts.into_iter().filter(|(_, count)| *count > 0).collect();
    let total: u64 = counts.iter().map(|(_, count)| count).sum();
    let mut records: Vec<PatternRecord> = counts
        .into_iter()
        .map(|((from, to), count)| PatternRecord {
            category_from: from.to_string(),
            category_to: to.to_string(),
            count,
            percentage: percentage(count, total),
            classification: PatternKind::classify(from, to),
            color: None,
        })
        .collect();
    records.sort_by(|a, b| {
        b.count
            .cmp(&a.count)
            .then_with(|| a.category_from.cmp(&b.category_from))
            .then_with(|| a.category_to.cmp(&b.category_to))
    });
    records
}

/// Keep the first `n` records of a ranked list.
#[must_use]
pub fn top_n(mut records: Vec<PatternRecord>, n: usize) -> Vec<PatternRecord> {
    records.truncate(n);
    records
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn labels(records: &[PatternRecord]) -> Vec<String> {
        records.iter().map(PatternRecord::label).collect()
    }

    #[test]
    fn ranks_by_count_then_lexicographically() {
        let records = rank([("b", "a"), ("a", "b"), ("a", "a"), ("b", "a"), ("a", "b")]);
        assert_eq!(labels(&records), vec!["a -> b", "b -> a", "a -> a"]);
        assert_eq!(records[0].count, 2);
        assert!((records[0].percentage - 40.0).abs() < 1e-9);
        assert!((records[2].percentage - 20.0).abs() < 1e-9);
    }

    #[test]
    fn classifies_by_string_equality() {
        let records = rank([("1", "1"), ("1", "01")]);
        assert_eq!(records[0].classification, PatternKind::Changed);
        assert_eq!(records[1].classification, PatternKind::Stable);
    }

    #[test]
    fn empty_input_ranks_nothing() {
        assert!(rank(std::iter::empty()).is_empty());
    }

    #[test]
    fn matrix_ranking_matches_pair_ranking() {
        let pairs = [("x", "y"), ("y", "y"), ("x", "y"), ("z", "x")];
        let matrix = TransitionMatrix::from_transitions(Vec::new(), Vec::new(), pairs);
        assert_eq!(rank_matrix(&matrix), rank(pairs));
    }

    #[test]
    fn top_n_truncates_after_ranking() {
        let records = rank([("a", "a"), ("a", "b"), ("a", "b"), ("c", "c")]);
        let top = top_n(records.clone(), 2);
        assert_eq!(top, records[..2].to_vec());
        assert_eq!(top_n(records.clone(), 10), records);
    }
}
