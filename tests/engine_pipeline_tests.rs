use playdsp::core::{DataFrame, SampleBuffer};
use playdsp::dsp::process;
use playdsp::engine::Pipeline;
use std::io::Write;

fn example_frame() -> DataFrame {
    DataFrame::from_buffer(SampleBuffer::new(vec![1.0, 2.0, 3.0, 4.0], 2, 2).unwrap(), 0, 0)
}

#[tokio::test]
async fn test_single_stage_pipeline() {
    let config = serde_json::json!({
        "nodes": [
            {"id": "gain", "type": "Gain", "config": {"gain_db": -12.0}}
        ]
    });

    let pipeline = Pipeline::from_json(config).await.unwrap();
    assert_eq!(pipeline.order(), &["gain".to_string()]);

    let result = pipeline.execute(example_frame()).await.unwrap();
    let expected = process(&[1.0, 2.0, 3.0, 4.0], 2, 2, -12.0).unwrap();
    assert_eq!(result.to_buffer().unwrap().as_slice(), expected.as_slice());

    let metrics = pipeline.metrics("gain").unwrap();
    assert_eq!(metrics.frames_processed(), 1);
}

#[tokio::test]
async fn test_chained_stages_compound() {
    let config = serde_json::json!({
        "nodes": [
            {"id": "second", "type": "Gain", "config": {"gain_db": -6.0}},
            {"id": "first", "type": "Gain", "config": {"gain_db": -6.0, "block_size": 1}}
        ],
        "connections": [
            {"from": "first", "to": "second"}
        ]
    });

    let pipeline = Pipeline::from_json(config).await.unwrap();
    assert_eq!(pipeline.order(), &["first".to_string(), "second".to_string()]);

    let result = pipeline.execute(example_frame()).await.unwrap();
    let expected = process(&[1.0, 2.0, 3.0, 4.0], 2, 2, -12.0).unwrap();
    for (actual, expected) in result.to_buffer().unwrap().as_slice().iter().zip(&expected) {
        assert!((actual - expected).abs() < 1e-12);
    }
    assert_eq!(result.metadata.get("gain_db").map(String::as_str), Some("-12"));
}

#[tokio::test]
async fn test_rejected_configs() {
    let cases = [
        serde_json::json!({"nodes": []}),
        serde_json::json!({"nodes": [{"type": "Gain"}]}),
        serde_json::json!({"nodes": [{"id": "a", "type": "Print"}]}),
        serde_json::json!({"nodes": [
            {"id": "a", "type": "Gain"},
            {"id": "a", "type": "Gain"}
        ]}),
        serde_json::json!({
            "nodes": [{"id": "a", "type": "Gain"}],
            "connections": [{"from": "a", "to": "missing"}]
        }),
        // Two sources
        serde_json::json!({"nodes": [
            {"id": "a", "type": "Gain"},
            {"id": "b", "type": "Gain"}
        ]}),
        // Branch
        serde_json::json!({
            "nodes": [
                {"id": "a", "type": "Gain"},
                {"id": "b", "type": "Gain"},
                {"id": "c", "type": "Gain"}
            ],
            "connections": [{"from": "a", "to": "b"}, {"from": "a", "to": "c"}]
        }),
        // Cycle
        serde_json::json!({
            "nodes": [{"id": "a", "type": "Gain"}, {"id": "b", "type": "Gain"}],
            "connections": [{"from": "a", "to": "b"}, {"from": "b", "to": "a"}]
        }),
        serde_json::json!({"nodes": [{"id": "a", "type": "Gain", "config": {"gain_db": "x"}}]}),
    ];

    for config in cases {
        assert!(Pipeline::from_json(config.clone()).await.is_err(), "accepted {}", config);
    }
}

#[tokio::test]
async fn test_pipeline_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    write!(
        file,
        r#"{{"nodes": [{{"id": "trim", "type": "Gain", "config": {{"gain_db": 0.0}}}}]}}"#
    )
    .unwrap();

    let pipeline = Pipeline::from_file(file.path()).await.unwrap();
    let result = pipeline.execute(example_frame()).await.unwrap();
    assert_eq!(result.payload, example_frame().payload);
}

#[tokio::test]
async fn test_pipeline_from_missing_or_bad_file() {
    let dir = tempfile::tempdir().unwrap();
    assert!(Pipeline::from_file(dir.path().join("missing.json")).await.is_err());

    let bad = dir.path().join("bad.json");
    std::fs::write(&bad, "{ not json").unwrap();
    assert!(Pipeline::from_file(&bad).await.is_err());
}
