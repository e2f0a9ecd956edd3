//! Serde roundtrip and JsonSchema validation tests for payload types.

use std::collections::BTreeMap;

use schemars::schema_for;
use wave_core::*;

/// Validate a JSON value against a schemars-generated schema.
fn validate_against_schema(
    schema: &serde_json::Value,
    instance: &serde_json::Value,
) -> Vec<String> {
    let validator = jsonschema::validator_for(schema).expect("schema should be valid");
    validator
        .iter_errors(instance)
        .map(|e| format!("{e}"))
        .collect()
}

macro_rules! roundtrip_and_validate {
    ($name:ident, $ty:ty, $instance:expr) => {
        #[test]
        fn $name() {
            let val: $ty = $instance;

            // Serde roundtrip
            let json_str = serde_json::to_string_pretty(&val).unwrap();
            let recovered: $ty = serde_json::from_str(&json_str).unwrap();
            assert_eq!(
                recovered,
                val,
                "serde roundtrip failed for {}",
                stringify!($ty)
            );

            // Schema validation
            let schema = serde_json::to_value(schema_for!($ty)).unwrap();
            let instance = serde_json::to_value(&val).unwrap();
            let errors = validate_against_schema(&schema, &instance);
            assert!(
                errors.is_empty(),
                "Schema validation failed for {}: {:?}",
                stringify!($ty),
                errors
            );
        }
    };
}

fn color(hex: &str) -> HexColor {
    HexColor::parse(hex).unwrap()
}

fn request() -> WaveTransitionRequest {
    WaveTransitionRequest::new("Wave1", "Wave2", "PID")
        .with_filter(RowFilter::new("Region", ["North", "East"]).at_wave("Wave1"))
}

fn graph() -> FlowGraph {
    FlowGraph {
        wave_from: "Wave1".into(),
        wave_to: "Wave2".into(),
        nodes: vec![
            FlowNode {
                id: NodeId::source("Democrat", "Wave1"),
                display_label: "Democrat (W1)".into(),
                color: color("#1f77b4"),
                weight: 4,
            },
            FlowNode {
                id: NodeId::target("Democrat", "Wave2"),
                display_label: "Democrat (W2)".into(),
                color: color("#1f77b4"),
                weight: 4,
            },
        ],
        edges: vec![FlowEdge {
            from: NodeId::source("Democrat", "Wave1"),
            to: NodeId::target("Democrat", "Wave2"),
            weight: 4,
            color: color("#1f77b4"),
        }],
    }
}

fn patterns() -> Vec<PatternRecord> {
    vec![PatternRecord {
        category_from: "Democrat".into(),
        category_to: "Democrat".into(),
        count: 4,
        percentage: 100.0,
        classification: PatternKind::Stable,
        color: Some(color("#2E8B57")),
    }]
}

roundtrip_and_validate!(
    wave_definition_roundtrip,
    WaveDefinition,
    WaveDefinition::new("Wave1", "W1_", "Baseline, spring").unwrap()
);

roundtrip_and_validate!(request_roundtrip, WaveTransitionRequest, request());

roundtrip_and_validate!(
    cleaning_rules_roundtrip,
    Vec<CleaningRule>,
    vec![
        CleaningRule::merge("Something else", "Independent"),
        MissingValueRule::new(MissingStrategy::MarkUnknown, ["99"])
            .with_label("Unknown")
            .into(),
        CleaningRule::missing(MissingStrategy::ImputeMedian, ["-1"]),
    ]
);

roundtrip_and_validate!(
    observation_roundtrip,
    CleanedObservation,
    CleanedObservation {
        respondent_id: "r-001".into(),
        wave: "Wave2".into(),
        variable: "PID".into(),
        value: CleanedValue::Missing,
    }
);

roundtrip_and_validate!(
    matrix_roundtrip,
    TransitionMatrix,
    TransitionMatrix::from_transitions(
        vec!["1".to_string(), "2".to_string()],
        vec!["1".to_string()],
        [("1", "1"), ("2", "1")],
    )
);

roundtrip_and_validate!(
    alluvial_roundtrip,
    AlluvialData,
    AlluvialData {
        request: request(),
        title: "W1 -> W2 Transitions".into(),
        graph: graph(),
        link_opacity: 0.6,
        summary: PatternSummary::from_records(&patterns()),
        stability_rate: 100.0,
        coverage: Coverage {
            eligible: 6,
            dropped: 0,
            missing_from: 1,
            missing_to: 0,
            filtered_out: 1,
            included: 4,
        },
        warnings: Vec::new(),
    }
);

roundtrip_and_validate!(
    heatmap_roundtrip,
    HeatmapData,
    HeatmapData {
        request: request(),
        title: "W1 -> W2 Transitions".into(),
        matrix: TransitionMatrix::default(),
        row_percentages: BTreeMap::new(),
        diagonal_stability: BTreeMap::new(),
        overall_stability: 0.0,
        coverage: Coverage::default(),
        warnings: vec![TransitionWarning::EmptyResult],
    }
);

roundtrip_and_validate!(
    pattern_data_roundtrip,
    PatternData,
    PatternData {
        request: request(),
        title: "W1 -> W2 Transitions".into(),
        patterns: patterns(),
        summary: PatternSummary::from_records(&patterns()),
        coverage: Coverage::default(),
        warnings: Vec::new(),
    }
);

#[test]
fn invalid_color_fails_schema_and_serde() {
    let schema = serde_json::to_value(schema_for!(HexColor)).unwrap();
    let errors = validate_against_schema(&schema, &serde_json::json!("blue"));
    assert!(!errors.is_empty());
    assert!(serde_json::from_str::<HexColor>("\"blue\"").is_err());
}
