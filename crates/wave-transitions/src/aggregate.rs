//! Transition aggregation.
//!
//! Joins two cleaned columns on respondent id, applies the optional filter,
//! and counts category pairs. Respondents that fall out are counted in
//! [`Coverage`] instead of failing the computation.

use std::collections::{BTreeMap, BTreeSet};

use wave_core::{CleanedValue, Coverage, TransitionMatrix};

/// Cleaned values of one column keyed by respondent id.
///
/// `None` marks a respondent whose cell was removed by a `drop_rows` rule.
pub type CleanedColumn = BTreeMap<String, Option<CleanedValue>>;

/// A filter column after cleaning, plus the values it accepts.
#[derive(Debug, Clone, Default)]
pub struct CleanedFilter {
    values: CleanedColumn,
    accepted: BTreeSet<String>,
}

impl CleanedFilter {
    pub fn new<I, S>(values: CleanedColumn, accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values,
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }

    /// Respondents with a missing or dropped filter value are rejected.
    #[must_use]
    pub fn accepts(&self, respondent_id: &str) -> bool {
        self.values
            .get(respondent_id)
            .and_then(|value| value.as_ref())
            .and_then(CleanedValue::as_category)
            .is_some_and(|value| self.accepted.contains(value))
    }

    /// Accepted values that never occur in the cleaned filter column.
    pub fn unseen_values(&self) -> impl Iterator<Item = &str> {
        let seen: BTreeSet<&str> = self
            .values
            .values()
            .filter_map(|value| value.as_ref().and_then(CleanedValue::as_category))
            .collect();
        self.accepted
            .iter()
            .map(String::as_str)
            .filter(move |value| !seen.contains(value))
    }
}

/// One respondent's pair of categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub respondent_id: String,
    pub category_from: String,
    pub category_to: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Aggregation {
    pub matrix: TransitionMatrix,
    /// Ordered by respondent id.
    pub transitions: Vec<Transition>,
    pub coverage: Coverage,
}

impl Aggregation {
    /// `(category_from, category_to)` pairs in respondent order.
    pub fn pairs(&self) -> impl Iterator<Item = (&str, &str)> {
        self.transitions
            .iter()
            .map(|t| (t.category_from.as_str(), t.category_to.as_str()))
    }
}

enum Fate<'a> {
    Dropped,
    MissingFrom,
    MissingTo,
    FilteredOut,
    Included(&'a str, &'a str),
}

fn fate<'a>(
    respondent_id: &str,
    from: Option<&'a Option<CleanedValue>>,
    to: Option<&'a Option<CleanedValue>>,
    filter: Option<&CleanedFilter>,
) -> Fate<'a> {
    if matches!(from, Some(None)) || matches!(to, Some(None)) {
        return Fate::Dropped;
    }
    let category = |cell: Option<&'a Option<CleanedValue>>| {
        cell.and_then(Option::as_ref).and_then(CleanedValue::as_category)
    };
    let Some(category_from) = category(from) else {
        return Fate::MissingFrom;
    };
    let Some(category_to) = category(to) else {
        return Fate::MissingTo;
    };
    if filter.is_some_and(|filter| !filter.accepts(respondent_id)) {
        return Fate::FilteredOut;
    }
    Fate::Included(category_from, category_to)
}

/// Count transitions between two cleaned columns.
///
/// Every respondent present in either column is eligible. An empty
/// intersection yields an all-zero matrix, keeping the category axes
/// observed at each wave.
#[must_use]
pub fn aggregate(
    from: &CleanedColumn,
    to: &CleanedColumn,
    filter: Option<&CleanedFilter>,
) -> Aggregation {
    let respondents: BTreeSet<&str> = from
        .keys()
        .chain(to.keys())
        .map(String::as_str)
        .collect();

    let mut coverage = Coverage::default();
    let mut from_axis = BTreeSet::new();
    let mut to_axis = BTreeSet::new();
    let mut transitions = Vec::new();

    for respondent_id in respondents {
        coverage.eligible += 1;
        let (from_cell, to_cell) = (from.get(respondent_id), to.get(respondent_id));
        let fate = fate(respondent_id, from_cell, to_cell, filter);
        if !matches!(fate, Fate::Dropped) {
            let observed = |cell: Option<&Option<CleanedValue>>| {
                cell.and_then(Option::as_ref)
                    .and_then(CleanedValue::as_category)
                    .map(str::to_string)
            };
            from_axis.extend(observed(from_cell));
            to_axis.extend(observed(to_cell));
        }
        match fate {
            Fate::Dropped => coverage.dropped += 1,
            Fate::MissingFrom => coverage.missing_from += 1,
            Fate::MissingTo => coverage.missing_to += 1,
            Fate::FilteredOut => coverage.filtered_out += 1,
            Fate::Included(category_from, category_to) => {
                coverage.included += 1;
                transitions.push(Transition {
                    respondent_id: respondent_id.to_string(),
                    category_from: category_from.to_string(),
                    category_to: category_to.to_string(),
                });
            }
        }
    }

    let matrix = TransitionMatrix::from_transitions(
        from_axis,
        to_axis,
        transitions
            .iter()
            .map(|t| (t.category_from.as_str(), t.category_to.as_str())),
    );

    if transitions.is_empty() {
        tracing::warn!(
            eligible = coverage.eligible,
            dropped = coverage.dropped,
            missing_from = coverage.missing_from,
            missing_to = coverage.missing_to,
            filtered_out = coverage.filtered_out,
            "no respondents survived intersection and filtering"
        );
    } else {
        tracing::debug!(
            included = coverage.included,
            eligible = coverage.eligible,
            cells = matrix.cells().count(),
            "aggregated transitions"
        );
    }

    Aggregation {
        matrix,
        transitions,
        coverage,
    }
}
