use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use text_charts::api::{ChartPipeline, PipelineConfig};
use text_charts::render::{ChartSurface, EngineId};
use text_charts::spec::{ChartDisplayConfig, build_from_extraction};
use text_charts::{draw_fallback, extract_data};

fn temperature_table(rows: usize) -> String {
    let mut text = String::from("Daily readings:\n\n| Date | Temp (°C) |\n|------|-----------|\n");
    for day in 0..rows {
        let month = day / 28 + 1;
        let dom = day % 28 + 1;
        text.push_str(&format!(
            "| 2024-{month:02}-{dom:02} | {:.1} |\n",
            15.0 + (day as f64 * 0.37).sin() * 8.0
        ));
    }
    text
}

fn bench_extract_table_200(c: &mut Criterion) {
    let text = temperature_table(200);

    c.bench_function("extract_table_200", |b| {
        b.iter(|| {
            let _ = extract_data(black_box(&text)).expect("table should extract");
        })
    });
}

fn bench_extract_inline(c: &mut Criterion) {
    let text = "Revenue grew steadily: Q1: 120, Q2: 135, Q3: 150 and Q4: 171 in total.";

    c.bench_function("extract_inline", |b| {
        b.iter(|| {
            let _ = extract_data(black_box(text));
        })
    });
}

fn bench_build_spec_per_engine(c: &mut Criterion) {
    let extraction = extract_data(&temperature_table(100)).expect("table should extract");

    for engine in EngineId::ALL {
        let config = ChartDisplayConfig::default().with_engine(engine);
        c.bench_function(&format!("build_spec_{engine}"), |b| {
            b.iter(|| {
                let _ = build_from_extraction(black_box(&extraction), black_box(&config))
                    .expect("build should succeed");
            })
        });
    }
}

fn bench_pipeline_memo_hit(c: &mut Criterion) {
    let text = temperature_table(50);
    let mut pipeline = ChartPipeline::new(PipelineConfig::default()).expect("pipeline init");
    let _ = pipeline.run(&text).expect("warm memo");

    c.bench_function("pipeline_memo_hit", |b| {
        b.iter(|| {
            let _ = pipeline.run(black_box(&text)).expect("memo hit");
        })
    });
}

fn bench_render_vector_svg(c: &mut Criterion) {
    let extraction = extract_data(&temperature_table(100)).expect("table should extract");
    let spec = build_from_extraction(&extraction, &ChartDisplayConfig::default())
        .expect("build should succeed")
        .into_spec()
        .expect("spec");
    let mut surface = ChartSurface::new();

    c.bench_function("render_vector_svg_100", |b| {
        b.iter(|| {
            let _ = surface.render(black_box(Some(&spec)));
        })
    });

    c.bench_function("draw_fallback_100", |b| {
        b.iter(|| {
            let _ = draw_fallback(black_box(spec.spec()));
        })
    });
}

criterion_group!(
    benches,
    bench_extract_table_200,
    bench_extract_inline,
    bench_build_spec_per_engine,
    bench_pipeline_memo_hit,
    bench_render_vector_svg
);
criterion_main!(benches);
