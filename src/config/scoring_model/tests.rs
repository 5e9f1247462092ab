use super::*;

fn metric(key: &str, weight: f64) -> MetricDef {
    MetricDef {
        key: key.to_string(),
        metric_weight: weight,
        source: None,
        normalization: NormalizationSpec::Boolean {
            true_score: 100.0,
            false_score: 0.0,
        },
    }
}

fn dimension(key: &str, metrics: Vec<MetricDef>) -> Dimension {
    Dimension {
        key: key.to_string(),
        name: None,
        metrics,
    }
}

#[test]
fn test_default_model() {
    let model = ScoringModel::default();

    assert_eq!(model.name, "VC-Ready Engineering Score");
    assert!(model.dimensions.is_empty());
    assert_eq!(model.final_score_weights.len(), 7);
    assert!((model.weight_for("velocity") - 0.2).abs() < 1e-9);
    assert!((model.weight_for("bus_factor") - 0.1).abs() < 1e-9);
    assert_eq!(model.weight_for("nonexistent"), 0.0);
    assert_eq!(model.scale, Scale { min: 0.0, max: 100.0 });
}

#[test]
fn test_reference_model_parses_and_is_consistent() {
    let model = ScoringModel::reference().expect("reference model parses");

    assert_eq!(model.dimensions.len(), 7);
    assert!(model.validate().is_empty(), "{:?}", model.validate());

    let bus = model.dimension("bus_factor").expect("bus_factor dimension");
    assert_eq!(bus.metrics.len(), 2);
    assert!(matches!(
        bus.metrics[0].normalization,
        NormalizationSpec::Thresholds {
            direction: Direction::LowerIsBetter,
            interpolate_between_points: true,
            ..
        }
    ));

    let governance = model.dimension("governance").expect("governance dimension");
    assert!(governance.metrics[1].source.is_none());
}

#[test]
fn test_parse_normalization_variants() {
    let json = r#"{
        "dimensions": [{
            "key": "maintainability",
            "metrics": [
                {"key": "a", "metric_weight": 1, "normalization": {"type": "thresholds", "thresholds": [{"gte": 80, "score": 100}, {"lte": 10, "score": 5}]}},
                {"key": "b", "metric_weight": 1, "normalization": {"type": "boolean", "false_score": 25}},
                {"key": "c", "metric_weight": 1, "normalization": {"type": "mapping", "mapping": {"A": 100, "B": 80}}}
            ]
        }]
    }"#;
    let model: ScoringModel = serde_json::from_str(json).expect("parse model");
    let metrics = &model.dimensions[0].metrics;

    match &metrics[0].normalization {
        NormalizationSpec::Thresholds {
            thresholds,
            direction,
            interpolate_between_points,
        } => {
            assert_eq!(thresholds[0], ThresholdPoint::gte(80.0, 100.0));
            assert_eq!(thresholds[1], ThresholdPoint::lte(10.0, 5.0));
            assert_eq!(*direction, Direction::HigherIsBetter);
            assert!(!interpolate_between_points);
        }
        other => panic!("expected thresholds, got {other:?}"),
    }
    assert_eq!(
        metrics[1].normalization,
        NormalizationSpec::Boolean {
            true_score: 100.0,
            false_score: 25.0
        }
    );
    match &metrics[2].normalization {
        NormalizationSpec::Mapping { mapping } => assert_eq!(mapping.get("B"), Some(&80.0)),
        other => panic!("expected mapping, got {other:?}"),
    }
}

#[test]
fn test_bad_normalization_degrades_to_unknown() {
    let json = r#"{
        "dimensions": [{
            "key": "d",
            "metrics": [
                {"key": "unknown_type", "metric_weight": 1, "normalization": {"type": "sigmoid"}},
                {"key": "no_type", "metric_weight": 1, "normalization": {"true_score": 100}},
                {"key": "bad_direction", "metric_weight": 1, "normalization": {"type": "thresholds", "direction": "sideways"}},
                {"key": "missing", "metric_weight": 1}
            ]
        }]
    }"#;
    let model: ScoringModel = serde_json::from_str(json).expect("model still parses");

    for metric in &model.dimensions[0].metrics {
        assert_eq!(
            metric.normalization,
            NormalizationSpec::Unknown,
            "metric {}",
            metric.key
        );
    }
}

#[test]
fn test_parse_toml_model() {
    let toml_content = r#"
name = "Team Score"

[final_score_weights]
security = 1.0

[[dimensions]]
key = "security"

[[dimensions.metrics]]
key = "critical_cves_open"
metric_weight = 1.0
source = { path = "security/deps-sca.json", field = "critical_open" }

[dimensions.metrics.normalization]
type = "thresholds"
direction = "lower_is_better"
thresholds = [{ lte = 0, score = 100 }, { lte = 5, score = 10 }]
"#;
    let model: ScoringModel = toml::from_str(toml_content).expect("parse toml model");

    assert_eq!(model.name, "Team Score");
    assert_eq!(model.version, "1.0.0");
    let metric = &model.dimensions[0].metrics[0];
    assert_eq!(
        metric.source.as_ref().and_then(MetricSource::parts),
        Some(("security/deps-sca.json", "critical_open"))
    );
    assert!(matches!(
        metric.normalization,
        NormalizationSpec::Thresholds {
            direction: Direction::LowerIsBetter,
            ..
        }
    ));
}

#[test]
fn test_source_parts_require_path_and_field() {
    assert!(MetricSource::default().parts().is_none());
    assert!(MetricSource {
        path: Some("a.json".into()),
        field: Some(String::new()),
    }
    .parts()
    .is_none());
    assert_eq!(
        MetricSource::new("a.json", "x.y").parts(),
        Some(("a.json", "x.y"))
    );
}

#[test]
fn test_validate_reports_weight_mismatches() {
    let model = ScoringModel {
        final_score_weights: [("security".to_string(), 0.5), ("velocity".to_string(), 0.5)]
            .into_iter()
            .collect(),
        dimensions: vec![
            dimension("security", vec![metric("a", 1.0)]),
            dimension("bus_factor", vec![metric("b", 1.0)]),
        ],
        ..ScoringModel::default()
    };
    let warnings = model.validate();

    assert!(warnings.contains(&ModelWarning::DimensionWithoutWeight("bus_factor".into())));
    assert!(warnings.contains(&ModelWarning::WeightWithoutDimension("velocity".into())));
    assert_eq!(warnings.len(), 2);
}

#[test]
fn test_validate_reports_degenerate_dimensions() {
    let model = ScoringModel {
        final_score_weights: [
            ("empty".to_string(), 0.3),
            ("zero".to_string(), 0.3),
            ("neg".to_string(), -0.1),
        ]
        .into_iter()
        .collect(),
        dimensions: vec![
            dimension("empty", vec![]),
            dimension("zero", vec![metric("a", 0.0), metric("b", 0.0)]),
            dimension("neg", vec![metric("c", -1.0), metric("d", 2.0)]),
            dimension("neg", vec![metric("e", 1.0)]),
        ],
        ..ScoringModel::default()
    };
    let warnings = model.validate();

    assert!(warnings.contains(&ModelWarning::EmptyDimension("empty".into())));
    assert!(warnings.contains(&ModelWarning::ZeroMetricWeights("zero".into())));
    assert!(warnings.contains(&ModelWarning::NegativeMetricWeight {
        dimension: "neg".into(),
        metric: "c".into(),
    }));
    assert!(warnings.contains(&ModelWarning::DuplicateDimension("neg".into())));
    assert!(warnings.contains(&ModelWarning::NegativeFinalWeight("neg".into())));
}

#[test]
fn test_missing_keys_keep_the_rest_of_the_model() {
    let model: ScoringModel = serde_json::from_str(
        r#"{
            "final_score_weights": {"security": 1.0},
            "dimensions": [
                {"metrics": [{"metric_weight": 1.0}]},
                {"key": "security", "metrics": [
                    {"key": "critical_cves_open", "metric_weight": 0.5},
                    {"metric_weight": 0.5, "source": {"path": "a.json", "field": "b"}}
                ]}
            ]
        }"#,
    )
    .expect("keyless entries are tolerated");

    assert_eq!(model.dimensions.len(), 2);
    assert!(model.dimension("security").is_some());

    let warnings = model.validate();
    assert!(warnings.contains(&ModelWarning::MissingDimensionKey(0)));
    assert!(warnings.contains(&ModelWarning::MissingMetricKey("security".into())));
    assert_eq!(warnings.len(), 2);
    assert!(warnings[0].to_string().contains("dimension #1"));
}

#[test]
fn test_warning_messages_name_the_key() {
    let message = ModelWarning::DimensionWithoutWeight("bus_factor".into()).to_string();
    assert!(message.contains("bus_factor"));
    assert!(message.contains("contributes nothing"));
}
