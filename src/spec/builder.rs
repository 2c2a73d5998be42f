use tracing::debug;

use crate::core::{ChartType, DataPoint};
use crate::error::ChartResult;
use crate::extract::ExtractionResult;
use crate::render::EngineId;

use super::characteristics::x_to_json;
use super::convert::{to_canvas_spec, to_drawing_spec};
use super::plot::{
    Axis, ColorValue, Font, LineStyle, Layout, Margin, Marker, PlotConfig, PlotSpec, TitleSpec,
    Trace,
};
use super::{
    BuiltChart, ChartDisplayConfig, ChartSpec, ColorScheme, DataCharacteristics, with_alpha,
};

/// Titles and type for one build; borrowed from an extraction or supplied
/// by the caller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ChartLabelsRef<'a> {
    pub chart_type: ChartType,
    pub title: &'a str,
    pub x_axis_title: &'a str,
    pub y_axis_title: &'a str,
}

/// Builds a spec for `config.engine` from extracted points.
///
/// Empty `data` yields [`BuiltChart::NoData`]. The same inputs always
/// produce the same spec.
pub fn build_spec(
    data: &[DataPoint],
    labels: ChartLabelsRef<'_>,
    config: &ChartDisplayConfig,
) -> ChartResult<BuiltChart> {
    if data.is_empty() {
        return Ok(BuiltChart::NoData);
    }
    let config = config.validate()?;

    let characteristics =
        DataCharacteristics::analyze(data, labels.title, labels.x_axis_title, labels.y_axis_title);
    let scheme = ColorScheme::select(characteristics, labels.y_axis_title);
    debug!(
        chart_type = %labels.chart_type,
        engine = %config.engine,
        ?scheme,
        ?characteristics,
        points = data.len(),
        "building chart spec"
    );

    let spec = match config.engine {
        EngineId::Vector => serde_json::to_value(build_plot(
            data,
            labels,
            &config,
            characteristics,
            scheme,
        ))?,
        EngineId::Canvas => serde_json::to_value(to_canvas_spec(
            data,
            labels,
            &config,
            characteristics,
            scheme,
        )?)?,
        EngineId::Drawing => serde_json::to_value(to_drawing_spec(data, labels, &config, scheme))?,
    };
    Ok(BuiltChart::Ready(ChartSpec::new(config.engine, spec)))
}

/// Builds from an extraction, using its inferred type and titles.
pub fn build_from_extraction(
    extraction: &ExtractionResult,
    config: &ChartDisplayConfig,
) -> ChartResult<BuiltChart> {
    build_spec(
        &extraction.data,
        ChartLabelsRef {
            chart_type: extraction.chart_type,
            title: &extraction.title,
            x_axis_title: &extraction.x_axis_title,
            y_axis_title: &extraction.y_axis_title,
        },
        config,
    )
}

fn build_plot(
    data: &[DataPoint],
    labels: ChartLabelsRef<'_>,
    config: &ChartDisplayConfig,
    characteristics: DataCharacteristics,
    scheme: ColorScheme,
) -> PlotSpec {
    let trace = match labels.chart_type {
        ChartType::Pie => pie_trace(data, scheme),
        ChartType::Scatter => scatter_trace(data, labels, scheme),
        ChartType::Line | ChartType::Area => line_trace(data, labels, characteristics, scheme),
        ChartType::Bar => bar_trace(data, labels, scheme),
    };

    PlotSpec {
        data: vec![trace],
        layout: layout(labels, config, characteristics),
        config: PlotConfig {
            responsive: Some(config.responsive),
            display_mode_bar: Some(config.display_mode_bar),
            display_logo: Some(false),
        },
    }
}

fn pie_trace(data: &[DataPoint], scheme: ColorScheme) -> Trace {
    let mut trace = Trace::new("pie");
    trace.labels = data
        .iter()
        .map(|point| {
            if point.label.is_empty() {
                point.x.to_string()
            } else {
                point.label.clone()
            }
        })
        .collect();
    trace.values = data.iter().map(|point| point.y).collect();
    trace.marker = Some(Marker {
        colors: Some(scheme.cycle(data.len())),
        ..Marker::default()
    });
    trace.textinfo = Some("label+percent".to_owned());
    trace.hovertemplate = Some("%{label}: %{value} (%{percent})<extra></extra>".to_owned());
    trace
}

fn scatter_trace(data: &[DataPoint], labels: ChartLabelsRef<'_>, scheme: ColorScheme) -> Trace {
    let mut trace = xy_trace("scatter", data, labels);
    trace.mode = Some("markers".to_owned());
    trace.marker = Some(Marker {
        color: Some(ColorValue::Single(scheme.primary().to_owned())),
        size: Some(10.0),
        ..Marker::default()
    });
    trace
}

fn line_trace(
    data: &[DataPoint],
    labels: ChartLabelsRef<'_>,
    characteristics: DataCharacteristics,
    scheme: ColorScheme,
) -> Trace {
    let mut trace = xy_trace("scatter", data, labels);
    trace.mode = Some("lines+markers".to_owned());
    trace.line = Some(LineStyle {
        color: Some(scheme.primary().to_owned()),
        width: Some(2.5),
        shape: Some(if characteristics.has_dates { "linear" } else { "spline" }.to_owned()),
    });
    trace.marker = Some(Marker {
        color: Some(ColorValue::Single(scheme.accent().to_owned())),
        size: Some(6.0),
        ..Marker::default()
    });
    if labels.chart_type == ChartType::Area {
        trace.fill = Some("tozeroy".to_owned());
        trace.fillcolor = Some(with_alpha(scheme.primary(), 0.25));
    }
    trace
}

fn bar_trace(data: &[DataPoint], labels: ChartLabelsRef<'_>, scheme: ColorScheme) -> Trace {
    let mut trace = xy_trace("bar", data, labels);
    trace.marker = Some(Marker {
        color: Some(ColorValue::PerPoint(scheme.cycle(data.len()))),
        ..Marker::default()
    });
    trace
}

fn xy_trace(trace_type: &str, data: &[DataPoint], labels: ChartLabelsRef<'_>) -> Trace {
    let mut trace = Trace::new(trace_type);
    trace.x = data.iter().map(|point| x_to_json(&point.x)).collect();
    trace.y = data.iter().map(|point| point.y).collect();
    trace.name = Some(labels.y_axis_title.to_owned());
    trace.hovertemplate = Some("%{x}: %{y}<extra></extra>".to_owned());
    trace
}

fn layout(
    labels: ChartLabelsRef<'_>,
    config: &ChartDisplayConfig,
    characteristics: DataCharacteristics,
) -> Layout {
    let theme = config.theme.colors();
    let (xaxis, yaxis) = if labels.chart_type == ChartType::Pie {
        (None, None)
    } else {
        let x_type = match labels.chart_type {
            ChartType::Scatter => characteristics.scatter_axis_type(),
            _ => characteristics.series_axis_type(),
        };
        (
            Some(Axis {
                title: Some(TitleSpec::object(labels.x_axis_title)),
                axis_type: Some(x_type.to_owned()),
                tickformat: None,
                showgrid: Some(config.show_grid),
                gridcolor: Some(theme.grid.to_owned()),
            }),
            Some(Axis {
                title: Some(TitleSpec::object(labels.y_axis_title)),
                axis_type: None,
                tickformat: Some(characteristics.value_tick_format().to_owned()),
                showgrid: Some(config.show_grid),
                gridcolor: Some(theme.grid.to_owned()),
            }),
        )
    };

    Layout {
        title: Some(TitleSpec::object(labels.title)),
        xaxis,
        yaxis,
        width: config.width,
        height: Some(config.height),
        autosize: Some(config.width.is_none()),
        showlegend: Some(config.show_legend),
        margin: Some(Margin::default()),
        paper_bgcolor: Some(theme.background.to_owned()),
        plot_bgcolor: Some(theme.background.to_owned()),
        font: Some(Font {
            color: Some(theme.font.to_owned()),
            size: Some(12.0),
        }),
        hovermode: Some("closest".to_owned()),
    }
}
