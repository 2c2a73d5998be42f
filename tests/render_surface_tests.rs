use serde_json::{Value, json};
use text_charts::api::detect_visualization;
use text_charts::error::{ChartError, ChartResult};
use text_charts::render::{
    Activation, BackendRegistry, BackendState, ChartBackend, ChartSurface, EngineId, ExportFormat,
    ExportRequest, FALLBACK_NOTICE, LoadOutcome, RenderFrame, RenderedOutput,
};
use text_charts::core::ChartType;
use text_charts::extract::extract_data;
use text_charts::spec::{ChartDisplayConfig, ChartSpec, build_from_extraction};

#[derive(Debug)]
struct ExplodingBackend;

impl ChartBackend for ExplodingBackend {
    fn engine(&self) -> EngineId {
        EngineId::Vector
    }

    fn draw(&mut self, _spec: &Value) -> ChartResult<RenderFrame> {
        Err(ChartError::InvalidData("backend exploded".to_owned()))
    }
}

fn bar_spec() -> ChartSpec {
    ChartSpec::new(
        EngineId::Vector,
        json!({
            "data": [{ "type": "bar", "x": ["Apples", "Oranges", "Pears"], "y": [12, 7, 3] }],
            "layout": { "title": { "text": "Fruit" } }
        }),
    )
}

#[test]
fn vector_chart_renders_svg() {
    let mut surface = ChartSurface::new();
    let output = surface.render(Some(&bar_spec()));

    let RenderedOutput::Chart { engine, markup } = output else {
        panic!("expected chart output, got {output:?}");
    };
    assert_eq!(engine, EngineId::Vector);
    assert!(markup.starts_with("<svg"));
    assert!(markup.contains(r#"data-points="3""#));
    assert!(markup.contains(">Fruit</text>"));
}

#[test]
fn missing_or_null_spec_renders_nothing() {
    let mut surface = ChartSurface::new();
    assert_eq!(surface.render(None), RenderedOutput::Empty);
    let null = ChartSpec::new(EngineId::Vector, Value::Null);
    assert_eq!(surface.render(Some(&null)), RenderedOutput::Empty);
    assert!(surface.current().is_none());
}

#[test]
fn failing_vector_backend_falls_back_with_point_count() {
    let mut surface = ChartSurface::new();
    surface.registry_mut().install(Box::new(ExplodingBackend));

    let output = surface.render(Some(&bar_spec()));
    assert!(output.is_fallback());
    let RenderedOutput::Fallback {
        markup,
        notice,
        error,
    } = output
    else {
        panic!("expected fallback output");
    };
    assert_eq!(notice, FALLBACK_NOTICE);
    assert_eq!(error, "invalid data: backend exploded");
    assert!(markup.contains(r#"data-fallback="true""#));
    assert!(markup.contains(r#"data-points="3""#));
}

#[test]
fn unknown_trace_type_triggers_fallback() {
    let spec = ChartSpec::new(
        EngineId::Vector,
        json!({ "data": [{ "type": "heatmap", "x": [1, 2], "y": [3, 4] }], "layout": {} }),
    );
    let output = ChartSurface::new().render(Some(&spec));
    assert!(output.is_fallback());
    assert!(output.markup().is_some_and(|markup| markup.contains(r#"data-points="2""#)));
}

#[test]
fn rejected_pie_falls_back_with_its_slice_count() {
    let extraction = extract_data("Distribution of change:\n- Alpha: -5\n- Beta: 3\n- Gamma: 4")
        .expect("bullets extracted");
    assert_eq!(extraction.chart_type, ChartType::Pie);
    let spec = build_from_extraction(&extraction, &ChartDisplayConfig::default())
        .expect("build")
        .into_spec()
        .expect("chart spec");

    let output = ChartSurface::new().render(Some(&spec));
    assert!(output.is_fallback());
    let markup = output.markup().expect("fallback markup");
    assert!(markup.contains(r#"data-points="3""#));
    assert!(!markup.contains("No data"));
}

#[test]
fn lazy_engine_loads_then_renders() {
    let mut surface = ChartSurface::new();
    let spec = ChartSpec::new(
        EngineId::Canvas,
        json!({
            "type": "bar",
            "data": { "labels": ["a", "b"], "datasets": [{ "data": [1, 2] }] }
        }),
    );

    let output = surface.render(Some(&spec));
    assert!(matches!(
        output,
        RenderedOutput::Loading {
            engine: EngineId::Canvas,
            ..
        }
    ));
    assert_eq!(surface.registry().state(EngineId::Canvas), BackendState::Loading);

    assert_eq!(surface.poll_loads(), 1);
    assert_eq!(surface.registry().state(EngineId::Canvas), BackendState::Ready);
    let output = surface.refresh();
    assert!(matches!(
        output,
        RenderedOutput::Chart {
            engine: EngineId::Canvas,
            ..
        }
    ));
}

#[test]
fn legacy_canvas_options_are_upgraded_before_drawing() {
    let mut surface = ChartSurface::new();
    let spec = ChartSpec::new(
        EngineId::Canvas,
        json!({
            "type": "line",
            "data": { "labels": ["Mon", "Tue", "Wed"], "datasets": [{ "data": [3, 5, 4] }] },
            "options": {
                "title": { "display": true, "text": "Sales" },
                "scales": {
                    "xAxes": [{ "scaleLabel": { "display": true, "labelString": "Weekday" } }],
                    "yAxes": [{ "ticks": { "beginAtZero": true } }]
                }
            }
        }),
    );
    let _ = surface.render(Some(&spec));
    surface.poll_loads();

    let markup = surface
        .refresh()
        .markup()
        .map(str::to_owned)
        .expect("canvas chart markup");
    assert!(markup.contains(">Sales</text>"));
    assert!(markup.contains(">Weekday</text>"));
}

#[test]
fn lazy_engine_failure_reports_failed_without_fallback() {
    let mut surface = ChartSurface::new();
    let spec = ChartSpec::new(EngineId::Drawing, json!({ "type": "bar", "data": "oops" }));
    let _ = surface.render(Some(&spec));
    surface.poll_loads();

    let output = surface.refresh();
    assert!(matches!(
        output,
        RenderedOutput::Failed {
            engine: EngineId::Drawing,
            ..
        }
    ));
    assert!(!output.is_fallback());
}

#[test]
fn registry_activation_is_idempotent_once_ready() {
    let mut registry = BackendRegistry::new();
    assert_eq!(registry.state(EngineId::Vector), BackendState::Ready);
    assert_eq!(registry.activate(EngineId::Vector), Activation::Ready);

    let Activation::Pending(ticket) = registry.activate(EngineId::Drawing) else {
        panic!("drawing engine should load lazily");
    };
    assert_eq!(ticket.engine(), EngineId::Drawing);
    assert_eq!(registry.complete(ticket), LoadOutcome::Activated);
    assert_eq!(registry.complete(ticket), LoadOutcome::AlreadyReady);
    assert_eq!(registry.activate(EngineId::Drawing), Activation::Ready);
}

#[test]
fn loads_finishing_after_teardown_are_discarded() {
    let mut registry = BackendRegistry::new();
    let Activation::Pending(ticket) = registry.activate(EngineId::Canvas) else {
        panic!("canvas engine should load lazily");
    };

    registry.teardown();
    assert_eq!(registry.generation(), 1);
    assert_eq!(registry.state(EngineId::Canvas), BackendState::Unloaded);
    assert_eq!(registry.complete(ticket), LoadOutcome::Discarded);
    assert_eq!(registry.state(EngineId::Canvas), BackendState::Unloaded);

    let Activation::Pending(fresh) = registry.activate(EngineId::Canvas) else {
        panic!("canvas engine should load again");
    };
    assert_eq!(fresh.generation(), 1);
    assert_eq!(registry.complete(fresh), LoadOutcome::Activated);
}

#[test]
fn unmount_discards_in_flight_loads() {
    let mut surface = ChartSurface::new();
    let spec = ChartSpec::new(EngineId::Drawing, json!({ "type": "line", "data": [] }));
    let RenderedOutput::Loading { ticket, .. } = surface.render(Some(&spec)) else {
        panic!("drawing engine should start loading");
    };

    surface.unmount();
    assert!(surface.current().is_none());
    assert_eq!(surface.registry_mut().complete(ticket), LoadOutcome::Discarded);
    assert_eq!(surface.poll_loads(), 0);
}

#[test]
fn fenced_row_arrays_draw_with_the_drawing_engine() {
    for text in [
        "```d3\n[{\"x\": 1, \"y\": 2}]\n```",
        "```\n[{\"x\": \"a\", \"y\": 1}, {\"x\": \"b\", \"y\": 2}]\n```",
    ] {
        let spec = detect_visualization(text)
            .as_chart()
            .cloned()
            .expect("rows detected as a chart");
        assert_eq!(spec.engine(), EngineId::Drawing);

        let mut surface = ChartSurface::new();
        let _ = surface.render(Some(&spec));
        assert_eq!(surface.poll_loads(), 1);
        let output = surface.refresh();
        let RenderedOutput::Chart { engine, markup } = output else {
            panic!("expected drawn rows, got {output:?}");
        };
        assert_eq!(engine, EngineId::Drawing);
        assert!(markup.starts_with("<svg"));
    }
}

#[test]
fn svg_export_uses_requested_size_and_filename() {
    let mut surface = ChartSurface::new();
    let _ = surface.render(Some(&bar_spec()));

    let request = ExportRequest::new(ExportFormat::Svg)
        .with_size(320, 240)
        .with_filename("fruit");
    let image = surface.download_image(&request).expect("svg export");
    assert_eq!(image.filename, "fruit.svg");
    assert_eq!(image.format, ExportFormat::Svg);

    let markup = String::from_utf8(image.bytes).expect("utf-8 svg");
    assert!(markup.contains(r#"width="320""#));
    assert!(markup.contains(r#"height="240""#));
}

#[test]
fn export_keeps_existing_extension() {
    let request = ExportRequest::new(ExportFormat::Svg).with_filename("chart.SVG");
    assert_eq!(request.resolved_filename(), "chart.SVG");
    assert_eq!(ExportRequest::new(ExportFormat::Png).resolved_filename(), "chart.png");
}

#[test]
fn export_is_vector_only() {
    let mut surface = ChartSurface::new();
    let spec = ChartSpec::new(
        EngineId::Canvas,
        json!({ "type": "bar", "data": { "labels": ["a"], "datasets": [{ "data": [1] }] } }),
    );
    let _ = surface.render(Some(&spec));

    let err = surface
        .download_image(&ExportRequest::new(ExportFormat::Svg))
        .expect_err("canvas export should be refused");
    assert!(matches!(
        err,
        ChartError::UnsupportedExport {
            engine: EngineId::Canvas,
            format: ExportFormat::Svg,
        }
    ));
}

#[test]
fn export_without_a_chart_is_an_error() {
    let mut surface = ChartSurface::new();
    assert!(surface.download_image(&ExportRequest::new(ExportFormat::Svg)).is_err());
}

#[cfg(not(feature = "cairo-backend"))]
#[test]
fn png_export_requires_the_cairo_feature() {
    let mut surface = ChartSurface::new();
    let _ = surface.render(Some(&bar_spec()));
    let err = surface
        .download_image(&ExportRequest::new(ExportFormat::Png))
        .expect_err("png needs cairo");
    assert!(matches!(err, ChartError::UnsupportedExport { .. }));
}

#[cfg(feature = "cairo-backend")]
#[test]
fn png_export_produces_png_bytes() {
    let mut surface = ChartSurface::new();
    let _ = surface.render(Some(&bar_spec()));
    let image = surface
        .download_image(&ExportRequest::new(ExportFormat::Png))
        .expect("png export");
    assert!(image.bytes.starts_with(&[0x89, b'P', b'N', b'G']));
}
