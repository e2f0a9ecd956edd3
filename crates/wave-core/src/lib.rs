//! # wave-core
//!
//! Core value types and error types for Waveflow.
//!
//! This crate provides the types shared across all Waveflow crates:
//! - Wave definitions and transition requests
//! - Cleaning rule variants (missing-value strategies and category merges)
//! - Cleaned observations
//! - Transition matrices, flow graphs, and ranked pattern records
//! - Response payloads handed to rendering collaborators
//! - Cross-cutting error types

pub mod color;
pub mod enums;
pub mod errors;
pub mod flow;
pub mod matrix;
pub mod observations;
pub mod patterns;
pub mod responses;
pub mod rules;
pub mod waves;

pub use color::HexColor;
pub use enums::{MissingStrategy, PatternKind, UnlabeledStrategy};
pub use errors::CoreError;
pub use flow::{FlowEdge, FlowGraph, FlowNode, FlowSide, NodeId};
pub use matrix::TransitionMatrix;
pub use observations::{CleanedObservation, CleanedValue};
pub use patterns::{PatternRecord, PatternSummary};
pub use responses::{AlluvialData, Coverage, HeatmapData, PatternData, TransitionWarning};
pub use rules::{CleaningRule, MergeRule, MissingValueRule};
pub use waves::{RowFilter, WaveDefinition, WaveTransitionRequest};
