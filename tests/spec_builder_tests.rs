use serde_json::json;
use text_charts::core::{ChartType, DataPoint};
use text_charts::render::EngineId;
use text_charts::spec::{
    BuiltChart, ChartDisplayConfig, ChartLabelsRef, ChartSpec, ColorScheme, Theme, build_spec,
};

fn labels(chart_type: ChartType, y_axis_title: &str) -> ChartLabelsRef<'_> {
    ChartLabelsRef {
        chart_type,
        title: "Readings",
        x_axis_title: "Date",
        y_axis_title,
    }
}

fn dated_points() -> Vec<DataPoint> {
    vec![
        DataPoint::new("2025-09-01", 22.5, "2025-09-01").expect("point"),
        DataPoint::new("2025-09-02", 23.1, "2025-09-02").expect("point"),
    ]
}

fn category_points() -> Vec<DataPoint> {
    vec![
        DataPoint::new("Apples", 12.0, "Apples").expect("point"),
        DataPoint::new("Oranges", 7.0, "Oranges").expect("point"),
        DataPoint::new("Pears", 3.0, "Pears").expect("point"),
    ]
}

fn build(
    data: &[DataPoint],
    labels: ChartLabelsRef<'_>,
    config: &ChartDisplayConfig,
) -> ChartSpec {
    build_spec(data, labels, config)
        .expect("build should succeed")
        .into_spec()
        .expect("data is not empty")
}

#[test]
fn empty_data_is_the_no_data_sentinel() {
    let built = build_spec(&[], labels(ChartType::Line, "Value"), &ChartDisplayConfig::default())
        .expect("build should succeed");
    assert_eq!(built, BuiltChart::NoData);
}

#[test]
fn temperature_line_uses_date_axis_and_warm_ramp() {
    let spec = build(
        &dated_points(),
        labels(ChartType::Line, "Temperature (°C)"),
        &ChartDisplayConfig::default(),
    );
    assert_eq!(spec.engine(), EngineId::Vector);

    let value = spec.spec();
    let trace = &value["data"][0];
    assert_eq!(trace["type"], "scatter");
    assert_eq!(trace["mode"], "lines+markers");
    assert_eq!(trace["x"], json!(["2025-09-01", "2025-09-02"]));
    assert_eq!(trace["line"]["color"], ColorScheme::Temperature.primary());
    assert_eq!(trace["line"]["shape"], "linear");

    let layout = &value["layout"];
    assert_eq!(layout["xaxis"]["type"], "date");
    assert_eq!(layout["yaxis"]["tickformat"], ".1f");
    assert_eq!(layout["title"]["text"], "Readings");
    assert_eq!(layout["height"], 400.0);
    assert_eq!(value["config"]["displayModeBar"], false);
}

#[test]
fn color_scheme_priority_is_temperature_then_dates_then_counts() {
    let dated = build(
        &dated_points(),
        labels(ChartType::Bar, "Visitors"),
        &ChartDisplayConfig::default(),
    );
    assert_eq!(dated.spec()["data"][0]["marker"]["color"][0], ColorScheme::TimeSeries.primary());

    let counts = build(
        &category_points(),
        labels(ChartType::Bar, "Count"),
        &ChartDisplayConfig::default(),
    );
    assert_eq!(counts.spec()["data"][0]["marker"]["color"][0], ColorScheme::Count.primary());
    assert_eq!(ColorScheme::Default.cycle(7).len(), 7);
}

#[test]
fn bar_colors_cycle_per_point() {
    let spec = build(
        &category_points(),
        labels(ChartType::Bar, "Value"),
        &ChartDisplayConfig::default(),
    );
    let trace = &spec.spec()["data"][0];
    assert_eq!(trace["type"], "bar");
    assert_eq!(trace["marker"]["color"].as_array().map(Vec::len), Some(3));
    assert_eq!(spec.spec()["layout"]["xaxis"]["type"], "category");
}

#[test]
fn pie_has_labels_values_and_no_axes() {
    let spec = build(
        &category_points(),
        labels(ChartType::Pie, "Value"),
        &ChartDisplayConfig::default(),
    );
    let value = spec.spec();
    assert_eq!(value["data"][0]["type"], "pie");
    assert_eq!(value["data"][0]["labels"], json!(["Apples", "Oranges", "Pears"]));
    assert_eq!(value["data"][0]["values"], json!([12.0, 7.0, 3.0]));
    assert!(value["layout"].get("xaxis").is_none());
}

#[test]
fn area_fills_to_zero() {
    let spec = build(
        &category_points(),
        labels(ChartType::Area, "Value"),
        &ChartDisplayConfig::default(),
    );
    assert_eq!(spec.spec()["data"][0]["fill"], "tozeroy");
}

#[test]
fn canvas_target_uses_named_axes() {
    let config = ChartDisplayConfig::default().with_engine(EngineId::Canvas);
    let spec = build(&category_points(), labels(ChartType::Bar, "Value"), &config);
    assert_eq!(spec.engine(), EngineId::Canvas);

    let value = spec.spec();
    assert_eq!(value["type"], "bar");
    assert_eq!(value["data"]["labels"], json!(["Apples", "Oranges", "Pears"]));
    assert_eq!(value["data"]["datasets"][0]["data"], json!([12.0, 7.0, 3.0]));
    assert_eq!(value["options"]["plugins"]["title"]["text"], "Readings");
    assert_eq!(value["options"]["scales"]["y"]["beginAtZero"], true);
    assert!(value["options"]["scales"].get("yAxes").is_none());
}

#[test]
fn drawing_target_emits_xy_rows() {
    let config = ChartDisplayConfig::default().with_engine(EngineId::Drawing);
    let spec = build(&category_points(), labels(ChartType::Pie, "Value"), &config);
    assert_eq!(spec.engine(), EngineId::Drawing);

    let value = spec.spec();
    assert_eq!(value["type"], "line");
    assert_eq!(value["data"][0], json!({ "x": "Apples", "y": 12.0 }));
}

#[test]
fn dark_theme_changes_layout_colors() {
    let config = ChartDisplayConfig::default().with_theme(Theme::Dark);
    let spec = build(&category_points(), labels(ChartType::Bar, "Value"), &config);
    let layout = &spec.spec()["layout"];
    assert_eq!(layout["paper_bgcolor"], Theme::Dark.colors().background);
    assert_eq!(layout["font"]["color"], Theme::Dark.colors().font);
}

#[test]
fn with_height_returns_a_new_spec() {
    let spec = build(
        &category_points(),
        labels(ChartType::Bar, "Value"),
        &ChartDisplayConfig::default(),
    );
    let taller = spec.with_height(640.0);
    assert_eq!(spec.spec()["layout"]["height"], 400.0);
    assert_eq!(taller.spec()["layout"]["height"], 640.0);
    assert_eq!(taller.engine(), spec.engine());

    let canvas = ChartSpec::new(EngineId::Canvas, json!({ "type": "bar" })).with_height(300.0);
    assert_eq!(canvas.spec()["height"], 300.0);
}

#[test]
fn invalid_display_config_is_rejected() {
    let config = ChartDisplayConfig::default().with_size(None, 0.0);
    assert!(build_spec(&category_points(), labels(ChartType::Bar, "Value"), &config).is_err());
}

#[test]
fn display_config_json_round_trip() {
    let config = ChartDisplayConfig::default()
        .with_engine(EngineId::Drawing)
        .with_theme(Theme::Dark)
        .with_size(Some(800.0), 500.0);
    let json = config.to_json_pretty().expect("serialize");
    assert!(json.contains("\"d3\""));
    assert_eq!(ChartDisplayConfig::from_json_str(&json).expect("parse"), config);

    let defaults = ChartDisplayConfig::from_json_str("{}").expect("defaults");
    assert_eq!(defaults, ChartDisplayConfig::default());
}
