//! In-memory survey table.
//!
//! Loading (CSV, SPSS, ...) happens outside this crate; callers hand over an
//! already-materialized table. Cells are raw strings, `None` for absent.

use std::collections::{HashMap, HashSet};

use crate::error::{Result, TransitionError};

/// Anything that can answer "does this column exist?".
pub trait ColumnSchema {
    fn has_column(&self, name: &str) -> bool;
}

/// Respondents as rows, wave-prefixed variables as columns.
#[derive(Debug, Clone, Default)]
pub struct SurveyTable {
    respondent_ids: Vec<String>,
    columns: HashMap<String, Vec<Option<String>>>,
}

impl SurveyTable {
    /// Create a table with the given respondents and no columns.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::DuplicateRespondent`] if an id repeats.
    pub fn new<I, S>(respondent_ids: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let respondent_ids: Vec<String> = respondent_ids.into_iter().map(Into::into).collect();
        let mut seen = HashSet::with_capacity(respondent_ids.len());
        for id in &respondent_ids {
            if !seen.insert(id.as_str()) {
                return Err(TransitionError::DuplicateRespondent {
                    respondent_id: id.clone(),
                });
            }
        }
        Ok(Self {
            respondent_ids,
            columns: HashMap::new(),
        })
    }

    /// Add (or replace) a column. Values are aligned with respondent order.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::ColumnLength`] if the column does not hold
    /// exactly one value per respondent.
    pub fn with_column<I, S>(mut self, name: impl Into<String>, values: I) -> Result<Self>
    where
        I: IntoIterator<Item = Option<S>>,
        S: Into<String>,
    {
        let name = name.into();
        let values: Vec<Option<String>> = values.into_iter().map(|v| v.map(Into::into)).collect();
        if values.len() != self.respondent_ids.len() {
            return Err(TransitionError::ColumnLength {
                column: name,
                expected: self.respondent_ids.len(),
                actual: values.len(),
            });
        }
        self.columns.insert(name, values);
        Ok(self)
    }

    /// Like [`Self::with_column`] for fully-populated text columns; empty
    /// strings become absent cells.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::ColumnLength`] on a length mismatch.
    pub fn with_text_column(self, name: impl Into<String>, values: &[&str]) -> Result<Self> {
        self.with_column(
            name,
            values
                .iter()
                .map(|value| (!value.is_empty()).then_some(*value)),
        )
    }

    #[must_use]
    pub fn respondent_ids(&self) -> &[String] {
        &self.respondent_ids
    }

    #[must_use]
    pub fn column(&self, name: &str) -> Option<&[Option<String>]> {
        self.columns.get(name).map(Vec::as_slice)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.respondent_ids.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.respondent_ids.is_empty()
    }
}

impl ColumnSchema for SurveyTable {
    fn has_column(&self, name: &str) -> bool {
        self.columns.contains_key(name)
    }
}

impl ColumnSchema for HashSet<String> {
    fn has_column(&self, name: &str) -> bool {
        self.contains(name)
    }
}
