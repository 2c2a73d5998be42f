use indexmap::IndexMap;
use serde_json::Value;

use crate::core::{ChartType, DataPoint};
use crate::error::ChartResult;

use super::builder::ChartLabelsRef;
use super::canvas::{
    CanvasData, CanvasDataset, CanvasDatum, CanvasOptions, CanvasPlugins, CanvasScale,
    CanvasSpec, CanvasTitle, CanvasToggle, ColorList,
};
use super::characteristics::x_to_json;
use super::drawing::{DrawingDatum, DrawingSpec};
use super::{ChartDisplayConfig, ColorScheme, DataCharacteristics, with_alpha};

/// Canvas-imperative equivalent of the built chart.
pub(super) fn to_canvas_spec(
    data: &[DataPoint],
    labels: ChartLabelsRef<'_>,
    config: &ChartDisplayConfig,
    characteristics: DataCharacteristics,
    scheme: ColorScheme,
) -> ChartResult<CanvasSpec> {
    let chart_type = match labels.chart_type {
        ChartType::Bar => "bar",
        ChartType::Line | ChartType::Area => "line",
        ChartType::Pie => "pie",
        ChartType::Scatter => "scatter",
    };

    let (labels_row, points) = if labels.chart_type == ChartType::Scatter {
        (
            Vec::new(),
            data.iter()
                .map(|point| CanvasDatum::Point {
                    x: x_to_json(&point.x),
                    y: point.y,
                })
                .collect(),
        )
    } else {
        (
            data.iter()
                .map(|point| Value::from(point.label.as_str()))
                .collect(),
            data.iter().map(|point| CanvasDatum::Value(point.y)).collect(),
        )
    };

    let per_point = matches!(labels.chart_type, ChartType::Bar | ChartType::Pie);
    let background = if per_point {
        ColorList::Many(scheme.cycle(data.len()))
    } else if labels.chart_type == ChartType::Area {
        ColorList::One(with_alpha(scheme.primary(), 0.25))
    } else {
        ColorList::One(scheme.primary().to_owned())
    };

    let dataset = CanvasDataset {
        label: Some(labels.y_axis_title.to_owned()),
        data: points,
        background_color: Some(background),
        border_color: Some(ColorList::One(scheme.primary().to_owned())),
        border_width: Some(2.0),
        fill: Some(Value::Bool(labels.chart_type == ChartType::Area)),
        tension: (chart_type == "line")
            .then_some(if characteristics.has_dates { 0.0 } else { 0.3 }),
    };

    let mut scales = IndexMap::new();
    if labels.chart_type != ChartType::Pie {
        scales.insert(
            "x".to_owned(),
            scale(labels.x_axis_title, config.show_grid, None),
        );
        scales.insert(
            "y".to_owned(),
            scale(labels.y_axis_title, config.show_grid, Some(true)),
        );
    }

    let options = CanvasOptions {
        responsive: Some(config.responsive),
        plugins: CanvasPlugins {
            title: Some(CanvasTitle {
                display: true,
                text: labels.title.to_owned(),
            }),
            legend: Some(CanvasToggle {
                display: config.show_legend,
            }),
        },
        scales,
    };

    Ok(CanvasSpec {
        chart_type: chart_type.to_owned(),
        data: CanvasData {
            labels: labels_row,
            datasets: vec![dataset],
        },
        options: serde_json::to_value(options)?,
        width: config.width,
        height: Some(config.height),
    })
}

fn scale(title: &str, show_grid: bool, begin_at_zero: Option<bool>) -> CanvasScale {
    CanvasScale {
        scale_type: None,
        title: Some(CanvasTitle {
            display: true,
            text: title.to_owned(),
        }),
        grid: Some(CanvasToggle { display: show_grid }),
        begin_at_zero,
        min: None,
        max: None,
    }
}

/// Low-level-drawing equivalent; that engine only draws bars and lines.
pub(super) fn to_drawing_spec(
    data: &[DataPoint],
    labels: ChartLabelsRef<'_>,
    config: &ChartDisplayConfig,
    scheme: ColorScheme,
) -> DrawingSpec {
    let mark = if labels.chart_type == ChartType::Bar {
        "bar"
    } else {
        "line"
    };
    DrawingSpec {
        mark: mark.to_owned(),
        data: data
            .iter()
            .map(|point| DrawingDatum {
                x: x_to_json(&point.x),
                y: point.y,
            })
            .collect(),
        width: config.width,
        height: Some(config.height),
        title: Some(labels.title.to_owned()),
        x_label: Some(labels.x_axis_title.to_owned()),
        y_label: Some(labels.y_axis_title.to_owned()),
        color: Some(scheme.primary().to_owned()),
    }
}
