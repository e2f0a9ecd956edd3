//! # wave-transitions
//!
//! Wave-to-wave transition analysis for longitudinal survey panels.
//!
//! Pipeline for one [`WaveTransitionRequest`](wave_core::WaveTransitionRequest):
//! - [`WaveRegistry`] resolves wave ids to column names
//! - [`RuleBook`] cleans the two referenced columns (missing-value strategies,
//!   then category merges)
//! - [`aggregate`](aggregate::aggregate) joins them on respondent id into a
//!   transition matrix plus coverage diagnostics
//! - [`patterns`] ranks distinct transitions, [`FlowGraphBuilder`] lays them
//!   out as a two-layer flow graph, [`ColorResolver`] colors both
//!
//! [`TransitionEngine`] ties these together behind three entry points:
//! alluvial, heatmap and pattern data.
//!
//! # Usage
//!
//! ```no_run
//! use wave_config::WaveflowConfig;
//! use wave_core::WaveTransitionRequest;
//! use wave_transitions::{SurveyTable, TransitionEngine};
//!
//! let config = WaveflowConfig::load().expect("config");
//! let engine = TransitionEngine::from_config(&config).expect("engine");
//! let table = SurveyTable::new(["r1", "r2"])
//!     .and_then(|t| t.with_text_column("W1_PID", &["Democrat", "Republican"]))
//!     .and_then(|t| t.with_text_column("W2_PID", &["Democrat", "Democrat"]))
//!     .expect("table");
//! let heatmap = engine
//!     .heatmap_data(&table, &WaveTransitionRequest::new("Wave1", "Wave2", "PID"))
//!     .expect("heatmap");
//! println!("{}: {:.1}% stable", heatmap.title, heatmap.overall_stability);
//! ```

pub mod aggregate;
pub mod cleaning;
pub mod colors;
pub mod engine;
pub mod error;
pub mod flow;
pub mod patterns;
pub mod registry;
pub mod table;

pub use aggregate::{Aggregation, CleanedColumn, CleanedFilter, Transition};
pub use cleaning::{CellOutcome, RuleBook, UNLABELED_CATEGORY, VariableRules};
pub use colors::ColorResolver;
pub use engine::TransitionEngine;
pub use error::{Result, TransitionError};
pub use flow::FlowGraphBuilder;
pub use registry::WaveRegistry;
pub use table::{ColumnSchema, SurveyTable};
