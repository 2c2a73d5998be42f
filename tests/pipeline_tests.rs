use text_charts::api::{ChartPipeline, ContentBlock, PipelineConfig, PipelineOutcome};
use text_charts::core::ChartType;
use text_charts::extract::ExtractOptions;
use text_charts::render::EngineId;
use text_charts::spec::ChartDisplayConfig;

const FRUIT: &str = "- Apples: 12\n- Oranges: 7";

fn pipeline() -> ChartPipeline {
    ChartPipeline::new(PipelineConfig::default()).expect("pipeline init")
}

#[test]
fn gate_rejection_skips_extraction() {
    let mut pipeline = pipeline();
    let outcome = pipeline.run("I have 3 cats.").expect("run");
    assert_eq!(outcome, PipelineOutcome::NotChartable);

    let stats = pipeline.stats();
    assert_eq!(stats.extractions, 0);
    assert_eq!(stats.gate_rejections, 1);
    assert_eq!(stats.misses, 0);
}

#[test]
fn disabled_gate_always_extracts() {
    let config = PipelineConfig::default().with_gate(false);
    let mut pipeline = ChartPipeline::new(config).expect("pipeline init");
    assert_eq!(pipeline.run("I have 3 cats.").expect("run"), PipelineOutcome::NoData);
    assert_eq!(pipeline.stats().extractions, 1);
    assert_eq!(pipeline.stats().gate_rejections, 0);
}

#[test]
fn repeated_text_is_served_from_the_memo() {
    let mut pipeline = pipeline();
    let first = pipeline.run(FRUIT).expect("first run");
    let second = pipeline.run(FRUIT).expect("second run");
    assert_eq!(first, second);

    let spec = first.spec().expect("chart spec");
    assert_eq!(spec.engine(), EngineId::Vector);

    let stats = pipeline.stats();
    assert_eq!(stats.extractions, 1);
    assert_eq!(stats.hits, 1);
    assert_eq!(stats.misses, 1);
    assert_eq!(stats.size, 1);
}

#[test]
fn overrides_are_part_of_the_memo_key() {
    let mut pipeline = pipeline();
    let _ = pipeline.run(FRUIT).expect("run");
    let options = ExtractOptions {
        chart_type: Some(ChartType::Pie),
        title: None,
    };
    let PipelineOutcome::Chart { extraction, spec } =
        pipeline.run_with(FRUIT, &options).expect("run with override")
    else {
        panic!("expected a chart");
    };
    assert_eq!(extraction.chart_type, ChartType::Pie);
    assert_eq!(spec.spec()["data"][0]["type"], "pie");
    assert_eq!(pipeline.stats().extractions, 2);
}

#[test]
fn memo_evicts_least_recently_used_text() {
    let config = PipelineConfig::default().with_memo_capacity(1);
    let mut pipeline = ChartPipeline::new(config).expect("pipeline init");
    let other = "- Pears: 4";

    let _ = pipeline.run(FRUIT).expect("run");
    let _ = pipeline.run(other).expect("run");
    let _ = pipeline.run(FRUIT).expect("run");

    let stats = pipeline.stats();
    assert_eq!(stats.extractions, 3);
    assert_eq!(stats.size, 1);

    pipeline.clear_cache();
    assert_eq!(pipeline.stats().size, 0);
}

#[test]
fn display_engine_drives_the_spec_shape() {
    let display = ChartDisplayConfig::default().with_engine(EngineId::Canvas);
    let config = PipelineConfig::default().with_display(display);
    let mut pipeline = ChartPipeline::new(config).expect("pipeline init");

    let spec = pipeline
        .run(FRUIT)
        .expect("run")
        .into_spec()
        .expect("chart spec");
    assert_eq!(spec.engine(), EngineId::Canvas);
    assert_eq!(spec.spec()["data"]["labels"][1], "Oranges");
}

#[test]
fn process_prefers_embedded_specs_then_extraction() {
    let mut pipeline = pipeline();

    let embedded = "```plotly\n{\"data\":[{\"type\":\"bar\",\"x\":[\"a\"],\"y\":[1]}]}\n```\n- Apples: 12";
    let ContentBlock::Chart(spec) = pipeline.process(embedded).expect("process") else {
        panic!("embedded spec should win");
    };
    assert_eq!(spec.spec()["data"][0]["x"][0], "a");
    assert_eq!(pipeline.stats().extractions, 0);

    let ContentBlock::Chart(spec) = pipeline.process(FRUIT).expect("process") else {
        panic!("bullets should chart");
    };
    assert_eq!(spec.spec()["data"][0]["x"][0], "Apples");

    let prose = "Thanks, that helps!";
    assert_eq!(
        pipeline.process(prose).expect("process"),
        ContentBlock::Text(prose.to_owned())
    );
}

#[test]
fn zero_memo_capacity_is_rejected() {
    let config = PipelineConfig::default().with_memo_capacity(0);
    assert!(ChartPipeline::new(config).is_err());
}

#[test]
fn pipeline_config_json_round_trip() {
    let config = PipelineConfig::default()
        .with_memo_capacity(16)
        .with_gate(false)
        .with_display(ChartDisplayConfig::default().with_engine(EngineId::Canvas));
    let json = config.to_json_pretty().expect("serialize");
    assert_eq!(PipelineConfig::from_json_str(&json).expect("parse"), config);

    let defaults = PipelineConfig::from_json_str("{}").expect("defaults");
    assert_eq!(defaults, PipelineConfig::default());
    assert_eq!(defaults.memo_capacity, 128);
    assert!(defaults.enforce_gate);
    assert!(PipelineConfig::from_json_str(r#"{"memo_capacity": 0}"#).is_err());
}
