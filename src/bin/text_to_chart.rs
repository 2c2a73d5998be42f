use std::fs;
use std::io::{self, Read};
use std::path::PathBuf;

use text_charts::api::{ChartPipeline, ContentBlock, PipelineConfig};
use text_charts::render::{ChartSurface, EngineId, RenderedOutput};
use text_charts::spec::ChartDisplayConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum OutputKind {
    Svg,
    Spec,
}

#[derive(Debug)]
struct CliArgs {
    input: Option<PathBuf>,
    output: Option<PathBuf>,
    engine: EngineId,
    kind: OutputKind,
}

fn main() {
    let _ = text_charts::telemetry::init_default_tracing();
    if let Err(err) = run() {
        eprintln!("error: {err}");
        std::process::exit(1);
    }
}

fn run() -> Result<(), String> {
    let args = parse_args()?;
    let text = read_input(args.input.as_ref())?;

    let config = PipelineConfig::default()
        .with_display(ChartDisplayConfig::default().with_engine(args.engine));
    let mut pipeline = ChartPipeline::new(config).map_err(|err| err.to_string())?;

    let spec = match pipeline.process(&text).map_err(|err| err.to_string())? {
        ContentBlock::Chart(spec) => spec,
        ContentBlock::Text(_) => return Err("no chartable data found".to_owned()),
    };

    let rendered = match args.kind {
        OutputKind::Spec => serde_json::to_string_pretty(spec.spec())
            .map_err(|err| format!("failed to serialize spec: {err}"))?,
        OutputKind::Svg => render_svg(&spec)?,
    };
    write_output(args.output.as_ref(), &rendered)
}

fn render_svg(spec: &text_charts::ChartSpec) -> Result<String, String> {
    let mut surface = ChartSurface::new();
    let mut output = surface.render(Some(spec));
    if matches!(output, RenderedOutput::Loading { .. }) {
        surface.poll_loads();
        output = surface.refresh();
    }

    match output {
        RenderedOutput::Chart { markup, .. } => Ok(markup),
        RenderedOutput::Fallback { markup, notice, error } => {
            eprintln!("{notice}: {error}");
            Ok(markup)
        }
        RenderedOutput::Failed { engine, error } => Err(format!("{engine} backend failed: {error}")),
        RenderedOutput::Empty | RenderedOutput::Loading { .. } => {
            Err("chart did not render".to_owned())
        }
    }
}

fn read_input(path: Option<&PathBuf>) -> Result<String, String> {
    match path {
        Some(path) => fs::read_to_string(path)
            .map_err(|err| format!("failed to read `{}`: {err}", path.display())),
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .map_err(|err| format!("failed to read stdin: {err}"))?;
            Ok(text)
        }
    }
}

fn write_output(path: Option<&PathBuf>, contents: &str) -> Result<(), String> {
    match path {
        Some(path) => fs::write(path, contents)
            .map_err(|err| format!("failed to write `{}`: {err}", path.display())),
        None => {
            println!("{contents}");
            Ok(())
        }
    }
}

fn parse_args() -> Result<CliArgs, String> {
    let mut args = std::env::args().skip(1);
    let mut input = None;
    let mut output = None;
    let mut engine = EngineId::Vector;
    let mut kind = OutputKind::Svg;

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--spec" => kind = OutputKind::Spec,
            "--engine" => {
                let tag = args
                    .next()
                    .ok_or_else(|| "missing value for --engine".to_owned())?;
                engine = EngineId::from_tag(&tag)
                    .ok_or_else(|| format!("unknown engine `{tag}` (plotly, chartjs, d3)"))?;
            }
            "--output" | "-o" => {
                let value = args
                    .next()
                    .ok_or_else(|| "missing value for --output".to_owned())?;
                output = Some(PathBuf::from(value));
            }
            "--help" | "-h" => return Err(usage()),
            flag if flag.starts_with('-') && flag != "-" => {
                return Err(format!("unknown flag `{flag}`\n{}", usage()));
            }
            "-" => input = None,
            path => input = Some(PathBuf::from(path)),
        }
    }

    Ok(CliArgs {
        input,
        output,
        engine,
        kind,
    })
}

fn usage() -> String {
    "usage: text_to_chart [--spec] [--engine plotly|chartjs|d3] [--output FILE] [INPUT|-]"
        .to_owned()
}
