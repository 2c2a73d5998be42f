use std::fmt::Write as _;

use crate::error::ChartResult;
use crate::render::{Color, RenderFrame, Renderer, TextHAlign};

/// Serializes frames into standalone SVG documents.
///
/// The renderer keeps the markup of the last successful pass; a frame that
/// fails validation leaves the previous markup untouched.
#[derive(Debug, Default)]
pub struct SvgRenderer {
    background: Option<Color>,
    last_markup: Option<String>,
}

impl SvgRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Paints a full-size background rect before any primitive.
    #[must_use]
    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    #[must_use]
    pub fn markup(&self) -> Option<&str> {
        self.last_markup.as_deref()
    }

    #[must_use]
    pub fn take_markup(&mut self) -> Option<String> {
        self.last_markup.take()
    }

    /// Renders `frame` and returns the document directly.
    pub fn render_to_string(&mut self, frame: &RenderFrame) -> ChartResult<String> {
        self.render(frame)?;
        Ok(self.last_markup.clone().unwrap_or_default())
    }
}

impl Renderer for SvgRenderer {
    fn render(&mut self, frame: &RenderFrame) -> ChartResult<()> {
        frame.validate()?;
        if let Some(background) = self.background {
            background.validate()?;
        }

        let width = frame.viewport.width;
        let height = frame.viewport.height;
        let mut out = String::with_capacity(256 + frame.primitive_count() * 96);

        let _ = write!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" width="{width}" height="{height}" viewBox="0 0 {width} {height}""#
        );
        for (name, value) in &frame.annotations {
            let _ = write!(out, r#" data-{name}="{}""#, escape_xml(value));
        }
        out.push('>');

        if let Some(background) = self.background {
            let _ = write!(
                out,
                r#"<rect x="0" y="0" width="{width}" height="{height}"{}/>"#,
                fill_attrs(background)
            );
        }

        for rect in &frame.rects {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}"{}"#,
                fmt_num(rect.x),
                fmt_num(rect.y),
                fmt_num(rect.width),
                fmt_num(rect.height),
                fill_attrs(rect.fill_color)
            );
            if rect.border_width > 0.0 {
                out.push_str(&stroke_attrs(rect.border_color, rect.border_width));
            }
            out.push_str("/>");
        }

        for polygon in &frame.polygons {
            let points = polygon
                .points
                .iter()
                .map(|(x, y)| format!("{},{}", fmt_num(*x), fmt_num(*y)))
                .collect::<Vec<_>>()
                .join(" ");
            let element = if polygon.closed { "polygon" } else { "polyline" };
            let fill = polygon
                .fill_color
                .map_or_else(|| r#" fill="none""#.to_owned(), fill_attrs);
            let _ = write!(out, r#"<{element} points="{points}"{fill}"#);
            if polygon.stroke_width > 0.0 {
                out.push_str(&stroke_attrs(polygon.stroke_color, polygon.stroke_width));
            }
            out.push_str("/>");
        }

        for line in &frame.lines {
            let _ = write!(
                out,
                r#"<line x1="{}" y1="{}" x2="{}" y2="{}"{}/>"#,
                fmt_num(line.x1),
                fmt_num(line.y1),
                fmt_num(line.x2),
                fmt_num(line.y2),
                stroke_attrs(line.color, line.stroke_width)
            );
        }

        for circle in &frame.circles {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{}"{}/>"#,
                fmt_num(circle.cx),
                fmt_num(circle.cy),
                fmt_num(circle.radius),
                fill_attrs(circle.fill_color)
            );
        }

        for text in &frame.texts {
            let anchor = match text.h_align {
                TextHAlign::Left => "start",
                TextHAlign::Center => "middle",
                TextHAlign::Right => "end",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{}" font-family="sans-serif" text-anchor="{anchor}"{}"#,
                fmt_num(text.x),
                fmt_num(text.y),
                fmt_num(text.font_size_px),
                fill_attrs(text.color)
            );
            if text.rotation_deg != 0.0 {
                let _ = write!(
                    out,
                    r#" transform="rotate({} {} {})""#,
                    fmt_num(-text.rotation_deg),
                    fmt_num(text.x),
                    fmt_num(text.y)
                );
            }
            let _ = write!(out, ">{}</text>", escape_xml(&text.text));
        }

        out.push_str("</svg>");
        self.last_markup = Some(out);
        Ok(())
    }
}

fn fill_attrs(color: Color) -> String {
    if color.alpha < 1.0 {
        format!(
            r#" fill="{}" fill-opacity="{}""#,
            color.to_hex(),
            fmt_num(color.alpha)
        )
    } else {
        format!(r#" fill="{}""#, color.to_hex())
    }
}

fn stroke_attrs(color: Color, width: f64) -> String {
    let mut attrs = format!(
        r#" stroke="{}" stroke-width="{}""#,
        color.to_hex(),
        fmt_num(width)
    );
    if color.alpha < 1.0 {
        let _ = write!(attrs, r#" stroke-opacity="{}""#, fmt_num(color.alpha));
    }
    attrs
}

/// Two-decimal coordinates with trailing zeros dropped.
fn fmt_num(value: f64) -> String {
    let rounded = (value * 100.0).round() / 100.0;
    let rounded = if rounded == 0.0 { 0.0 } else { rounded };
    format!("{rounded}")
}

/// Escapes text for element content and attribute values.
#[must_use]
pub fn escape_xml(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(ch),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Viewport;
    use crate::render::{LinePrimitive, TextPrimitive};

    #[test]
    fn writes_annotations_and_escapes_text() {
        let frame = RenderFrame::new(Viewport::new(100, 50))
            .with_line(LinePrimitive::new(0.0, 0.0, 10.0, 10.0, 1.0, Color::rgb(0.0, 0.0, 0.0)))
            .with_text(TextPrimitive::new(
                "a < b & c",
                5.0,
                5.0,
                12.0,
                Color::rgb(0.0, 0.0, 0.0),
                TextHAlign::Left,
            ))
            .with_annotation("points", "3");

        let markup = SvgRenderer::new()
            .render_to_string(&frame)
            .expect("frame renders");
        assert!(markup.starts_with("<svg"));
        assert!(markup.contains(r#"data-points="3""#));
        assert!(markup.contains("a &lt; b &amp; c"));
        assert!(markup.contains(r#"<line x1="0" y1="0" x2="10" y2="10""#));
        assert!(markup.ends_with("</svg>"));
    }

    #[test]
    fn invalid_frame_keeps_previous_markup() {
        let mut renderer = SvgRenderer::new();
        renderer
            .render(&RenderFrame::new(Viewport::new(10, 10)))
            .expect("empty frame renders");
        let previous = renderer.markup().map(str::to_owned);

        let broken = RenderFrame::new(Viewport::new(10, 10)).with_line(LinePrimitive::new(
            f64::NAN,
            0.0,
            1.0,
            1.0,
            1.0,
            Color::rgb(0.0, 0.0, 0.0),
        ));
        assert!(renderer.render(&broken).is_err());
        assert_eq!(renderer.markup().map(str::to_owned), previous);
    }
}
