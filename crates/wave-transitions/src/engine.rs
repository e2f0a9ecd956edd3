//! Orchestration: the three entry points consumed by renderers.
//!
//! A [`TransitionEngine`] is built once from validated configuration and is
//! immutable afterwards. Every call owns its derived structures, so one
//! engine can serve concurrent requests without coordination.

use wave_config::{AnalysisConfig, WaveflowConfig};
use wave_core::{
    AlluvialData, CleanedObservation, HeatmapData, PatternData, PatternRecord, PatternSummary,
    RowFilter, TransitionWarning, WaveTransitionRequest,
};

use crate::aggregate::{Aggregation, CleanedColumn, CleanedFilter, aggregate};
use crate::cleaning::RuleBook;
use crate::colors::ColorResolver;
use crate::error::{Result, TransitionError};
use crate::flow::FlowGraphBuilder;
use crate::patterns::{rank, rank_matrix, top_n};
use crate::registry::WaveRegistry;
use crate::table::SurveyTable;

#[derive(Debug, Clone)]
pub struct TransitionEngine {
    registry: WaveRegistry,
    rules: RuleBook,
    colors: ColorResolver,
    analysis: AnalysisConfig,
}

impl TransitionEngine {
    /// Validate configuration eagerly: waves, colors, and every variable's
    /// cleaning rules.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::Config`] for invalid settings, or the
    /// registry and rule validation errors.
    pub fn from_config(config: &WaveflowConfig) -> Result<Self> {
        config.validate()?;
        let engine = Self::new(
            WaveRegistry::from_config(config)?,
            RuleBook::from_config(config)?,
            ColorResolver::from_config(config),
            config.analysis.clone(),
        );
        tracing::debug!(
            waves = engine.registry.waves().len(),
            variables = engine.rules.variables().count(),
            "transition engine ready"
        );
        Ok(engine)
    }

    #[must_use]
    pub const fn new(
        registry: WaveRegistry,
        rules: RuleBook,
        colors: ColorResolver,
        analysis: AnalysisConfig,
    ) -> Self {
        Self {
            registry,
            rules,
            colors,
            analysis,
        }
    }

    #[must_use]
    pub const fn registry(&self) -> &WaveRegistry {
        &self.registry
    }

    #[must_use]
    pub const fn rules(&self) -> &RuleBook {
        &self.rules
    }

    #[must_use]
    pub const fn analysis(&self) -> &AnalysisConfig {
        &self.analysis
    }

    /// Cleaned observations of one variable at one wave. Rows removed by
    /// `drop_rows` are omitted.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownWave`],
    /// [`TransitionError::ColumnNotFound`], or
    /// [`TransitionError::NonNumericImputation`].
    pub fn observations(
        &self,
        table: &SurveyTable,
        wave: &str,
        variable: &str,
    ) -> Result<Vec<CleanedObservation>> {
        let column = self.registry.column_for(wave, variable, table)?;
        let cleaned = self.clean(table, &column, variable)?;
        Ok(cleaned
            .into_iter()
            .filter_map(|(respondent_id, value)| {
                value.map(|value| CleanedObservation {
                    respondent_id,
                    wave: wave.to_string(),
                    variable: variable.to_string(),
                    value,
                })
            })
            .collect())
    }

    /// Clean the two referenced columns (and the filter column) and count
    /// transitions. Only those columns are read.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownWave`],
    /// [`TransitionError::SameWaveTransition`],
    /// [`TransitionError::ColumnNotFound`], or
    /// [`TransitionError::NonNumericImputation`]. No partial result is
    /// produced.
    pub fn transitions(
        &self,
        table: &SurveyTable,
        request: &WaveTransitionRequest,
    ) -> Result<Aggregation> {
        self.registry.validate_request(request)?;
        let variable = request.variable.as_str();
        let from_column = self.registry.column_for(&request.wave_from, variable, table)?;
        let to_column = self.registry.column_for(&request.wave_to, variable, table)?;
        let filter = request
            .filter
            .as_ref()
            .map(|filter| self.clean_filter(table, filter))
            .transpose()?;

        tracing::debug!(
            variable,
            wave_from = %request.wave_from,
            wave_to = %request.wave_to,
            from_column = %from_column,
            to_column = %to_column,
            filtered = filter.is_some(),
            "computing transitions"
        );

        let from = self.clean(table, &from_column, variable)?;
        let to = self.clean(table, &to_column, variable)?;
        Ok(aggregate(&from, &to, filter.as_ref()))
    }

    /// Flow graph payload.
    ///
    /// # Errors
    ///
    /// Same as [`Self::transitions`].
    pub fn alluvial_data(
        &self,
        table: &SurveyTable,
        request: &WaveTransitionRequest,
    ) -> Result<AlluvialData> {
        let aggregation = self.transitions(table, request)?;
        let matrix = &aggregation.matrix;
        let colors = self.colors.clone().with_categories(
            &request.variable,
            matrix.from_categories().chain(matrix.to_categories()),
        );
        let graph = FlowGraphBuilder::new(&colors, &request.variable).build(
            matrix,
            self.registry.definition(&request.wave_from)?,
            self.registry.definition(&request.wave_to)?,
        );
        Ok(AlluvialData {
            request: request.clone(),
            title: self.title(request)?,
            graph,
            link_opacity: self.analysis.link_opacity,
            summary: PatternSummary::from_records(&rank_matrix(matrix)),
            stability_rate: matrix.stability_rate(),
            coverage: aggregation.coverage,
            warnings: warnings(&aggregation),
        })
    }

    /// Transition matrix payload with row-wise percentages.
    ///
    /// # Errors
    ///
    /// Same as [`Self::transitions`].
    pub fn heatmap_data(
        &self,
        table: &SurveyTable,
        request: &WaveTransitionRequest,
    ) -> Result<HeatmapData> {
        let aggregation = self.transitions(table, request)?;
        let warnings = warnings(&aggregation);
        let matrix = aggregation.matrix;
        Ok(HeatmapData {
            request: request.clone(),
            title: self.title(request)?,
            row_percentages: matrix.row_percentages(),
            diagonal_stability: matrix.diagonal_stability(),
            overall_stability: matrix.overall_stability(),
            matrix,
            coverage: aggregation.coverage,
            warnings,
        })
    }

    /// Ranked patterns, truncated to `analysis.top_n`, each carrying its
    /// classification color. The summary covers every pattern.
    ///
    /// # Errors
    ///
    /// Same as [`Self::transitions`].
    pub fn pattern_data(
        &self,
        table: &SurveyTable,
        request: &WaveTransitionRequest,
    ) -> Result<PatternData> {
        let aggregation = self.transitions(table, request)?;
        let ranked = rank(aggregation.pairs());
        let summary = PatternSummary::from_records(&ranked);
        let patterns = top_n(ranked, self.analysis.top_n)
            .into_iter()
            .map(|record| PatternRecord {
                color: Some(self.colors.classification_color(record.classification).clone()),
                ..record
            })
            .collect();
        Ok(PatternData {
            request: request.clone(),
            title: self.title(request)?,
            patterns,
            summary,
            coverage: aggregation.coverage,
            warnings: warnings(&aggregation),
        })
    }

    /// The request's own title when set, otherwise `"W1 -> W2 Transitions"`
    /// with `" (<values> subset)"` when filtered.
    ///
    /// # Errors
    ///
    /// Returns [`TransitionError::UnknownWave`].
    pub fn title(&self, request: &WaveTransitionRequest) -> Result<String> {
        if let Some(title) = &request.title {
            return Ok(title.clone());
        }
        let title = format!(
            "{} -> {} Transitions",
            self.registry.short_label(&request.wave_from)?,
            self.registry.short_label(&request.wave_to)?
        );
        Ok(match &request.filter {
            Some(filter) => {
                let values: Vec<&str> = filter.values.iter().map(String::as_str).collect();
                format!("{title} ({} subset)", values.join(", "))
            }
            None => title,
        })
    }

    fn clean(&self, table: &SurveyTable, column: &str, variable: &str) -> Result<CleanedColumn> {
        let raw = table
            .column(column)
            .ok_or_else(|| TransitionError::ColumnNotFound {
                column: column.to_string(),
            })?;
        let cleaned = self.rules.rules_for(variable).clean_column(raw)?;
        Ok(table.respondent_ids().iter().cloned().zip(cleaned).collect())
    }

    fn clean_filter(&self, table: &SurveyTable, filter: &RowFilter) -> Result<CleanedFilter> {
        let column = match &filter.wave {
            Some(wave) => self.registry.column_for(wave, &filter.column, table)?,
            None => filter.column.clone(),
        };
        let cleaned = CleanedFilter::new(
            self.clean(table, &column, &filter.column)?,
            filter.values.iter().cloned(),
        );
        for value in cleaned.unseen_values() {
            tracing::warn!(column = %column, value, "filter value never occurs in cleaned column");
        }
        Ok(cleaned)
    }
}

fn warnings(aggregation: &Aggregation) -> Vec<TransitionWarning> {
    if aggregation.coverage.is_empty() {
        vec![TransitionWarning::EmptyResult]
    } else {
        Vec::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use wave_core::{CleanedValue, CleaningRule, MissingStrategy};

    fn engine() -> TransitionEngine {
        let mut config = WaveflowConfig::default();
        config.variables.insert(
            "PID".to_string(),
            wave_config::VariableConfig {
                rules: vec![
                    CleaningRule::merge("Lean D", "Democrat"),
                    CleaningRule::missing(MissingStrategy::DropRows, ["Refused"]),
                ],
                ..Default::default()
            },
        );
        TransitionEngine::from_config(&config).unwrap()
    }

    fn table() -> SurveyTable {
        SurveyTable::new(["r1", "r2", "r3"])
            .unwrap()
            .with_text_column("W1_PID", &["Democrat", "Lean D", "Refused"])
            .unwrap()
            .with_text_column("W2_PID", &["Democrat", "Republican", "Democrat"])
            .unwrap()
            .with_text_column("W1_REGION", &["north", "south", "north"])
            .unwrap()
    }

    #[test]
    fn engine_is_shareable_across_threads() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<TransitionEngine>();
    }

    #[test]
    fn observations_skip_dropped_rows() {
        let observations = engine().observations(&table(), "Wave1", "PID").unwrap();
        assert_eq!(observations.len(), 2);
        assert_eq!(observations[1].respondent_id, "r2");
        assert_eq!(observations[1].value, CleanedValue::category("Democrat"));
    }

    #[test]
    fn title_names_filter_values() {
        let engine = engine();
        let request = WaveTransitionRequest::new("Wave1", "Wave2", "PID");
        assert_eq!(engine.title(&request).unwrap(), "W1 -> W2 Transitions");
        let filtered = request.with_filter(RowFilter::new("REGION", ["south", "north"]).at_wave("Wave1"));
        assert_eq!(
            engine.title(&filtered).unwrap(),
            "W1 -> W2 Transitions (north, south subset)"
        );
    }

    #[test]
    fn custom_title_replaces_generated_one() {
        let engine = engine();
        let request = WaveTransitionRequest::new("Wave1", "Wave2", "PID")
            .with_filter(RowFilter::new("REGION", ["south"]).at_wave("Wave1"))
            .with_title("Party ID, Southern respondents");
        assert_eq!(engine.title(&request).unwrap(), "Party ID, Southern respondents");
        let data = engine.heatmap_data(&table(), &request).unwrap();
        assert_eq!(data.title, "Party ID, Southern respondents");
    }

    #[test]
    fn transitions_apply_cleaning_before_counting() {
        let aggregation = engine()
            .transitions(&table(), &WaveTransitionRequest::new("Wave1", "Wave2", "PID"))
            .unwrap();
        assert_eq!(aggregation.matrix.count("Democrat", "Democrat"), 1);
        assert_eq!(aggregation.matrix.count("Democrat", "Republican"), 1);
        assert_eq!(aggregation.coverage.dropped, 1);
    }

    #[test]
    fn wave_scoped_filter_resolves_prefixed_column() {
        let request = WaveTransitionRequest::new("Wave1", "Wave2", "PID")
            .with_filter(RowFilter::new("REGION", ["south"]).at_wave("Wave1"));
        let aggregation = engine().transitions(&table(), &request).unwrap();
        assert_eq!(aggregation.coverage.included, 1);
        assert_eq!(aggregation.coverage.filtered_out, 1);
    }

    #[test]
    fn missing_filter_column_is_an_error() {
        let request = WaveTransitionRequest::new("Wave1", "Wave2", "PID")
            .with_filter(RowFilter::new("REGION", ["south"]));
        let err = engine().transitions(&table(), &request).unwrap_err();
        assert!(matches!(err, TransitionError::ColumnNotFound { ref column } if column == "REGION"));
    }

    #[test]
    fn pattern_colors_follow_classification() {
        let data = engine()
            .pattern_data(&table(), &WaveTransitionRequest::new("Wave1", "Wave2", "PID"))
            .unwrap();
        for record in &data.patterns {
            let expected = if record.is_stable() { "#2E8B57" } else { "#FF8C00" };
            assert_eq!(record.color.as_ref().map(|c| c.as_str()), Some(expected));
        }
    }
}
