use crate::error::{ChartError, ChartResult};

/// RGBA color in normalized 0..=1 channel values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub red: f64,
    pub green: f64,
    pub blue: f64,
    pub alpha: f64,
}

const NAMED_COLORS: &[(&str, Color)] = &[
    ("black", Color::rgb(0.0, 0.0, 0.0)),
    ("white", Color::rgb(1.0, 1.0, 1.0)),
    ("red", Color::rgb(1.0, 0.0, 0.0)),
    ("green", Color::rgb(0.0, 128.0 / 255.0, 0.0)),
    ("blue", Color::rgb(0.0, 0.0, 1.0)),
    ("gray", Color::rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0)),
    ("grey", Color::rgb(128.0 / 255.0, 128.0 / 255.0, 128.0 / 255.0)),
    ("orange", Color::rgb(1.0, 165.0 / 255.0, 0.0)),
    ("purple", Color::rgb(128.0 / 255.0, 0.0, 128.0 / 255.0)),
    ("steelblue", Color::rgb(70.0 / 255.0, 130.0 / 255.0, 180.0 / 255.0)),
    ("transparent", Color::rgba(0.0, 0.0, 0.0, 0.0)),
];

impl Color {
    #[must_use]
    pub const fn rgba(red: f64, green: f64, blue: f64, alpha: f64) -> Self {
        Self {
            red,
            green,
            blue,
            alpha,
        }
    }

    #[must_use]
    pub const fn rgb(red: f64, green: f64, blue: f64) -> Self {
        Self::rgba(red, green, blue, 1.0)
    }

    /// Parses the CSS color forms chart specs carry: `#rgb`, `#rrggbb`,
    /// `rgb(r, g, b)`, `rgba(r, g, b, a)` and a handful of names.
    pub fn parse(input: &str) -> ChartResult<Self> {
        let input = input.trim();
        let invalid = || ChartError::InvalidData(format!("unsupported color `{input}`"));

        if let Some(hex) = input.strip_prefix('#') {
            if !hex.is_ascii() {
                return Err(invalid());
            }
            let digits = match hex.len() {
                3 => hex.chars().flat_map(|ch| [ch, ch]).collect::<String>(),
                6 => hex.to_owned(),
                _ => return Err(invalid()),
            };
            let channel = |offset: usize| {
                u8::from_str_radix(&digits[offset..offset + 2], 16)
                    .map(|value| f64::from(value) / 255.0)
                    .map_err(|_| invalid())
            };
            return Ok(Self::rgb(channel(0)?, channel(2)?, channel(4)?));
        }

        let lower = input.to_ascii_lowercase();
        let functional = lower
            .strip_prefix("rgba(")
            .or_else(|| lower.strip_prefix("rgb("))
            .and_then(|rest| rest.strip_suffix(')'));
        if let Some(body) = functional {
            let parts: Vec<f64> = body
                .split(',')
                .map(|part| part.trim().parse::<f64>().map_err(|_| invalid()))
                .collect::<ChartResult<_>>()?;
            let color = match parts.as_slice() {
                [r, g, b] => Self::rgb(r / 255.0, g / 255.0, b / 255.0),
                [r, g, b, a] => Self::rgba(r / 255.0, g / 255.0, b / 255.0, *a),
                _ => return Err(invalid()),
            };
            color.validate()?;
            return Ok(color);
        }

        NAMED_COLORS
            .iter()
            .find(|(name, _)| *name == lower)
            .map(|(_, color)| *color)
            .ok_or_else(invalid)
    }

    pub fn validate(self) -> ChartResult<()> {
        for (channel, value) in [
            ("red", self.red),
            ("green", self.green),
            ("blue", self.blue),
            ("alpha", self.alpha),
        ] {
            if !value.is_finite() || !(0.0..=1.0).contains(&value) {
                return Err(ChartError::InvalidData(format!(
                    "color channel `{channel}` must be finite and in [0, 1]"
                )));
            }
        }
        Ok(())
    }

    /// `#rrggbb` form of the color channels; alpha is emitted separately.
    #[must_use]
    pub fn to_hex(self) -> String {
        let byte = |value: f64| (value.clamp(0.0, 1.0) * 255.0).round() as u8;
        format!(
            "#{:02x}{:02x}{:02x}",
            byte(self.red),
            byte(self.green),
            byte(self.blue)
        )
    }
}

/// Draw command for one line segment in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LinePrimitive {
    pub x1: f64,
    pub y1: f64,
    pub x2: f64,
    pub y2: f64,
    pub stroke_width: f64,
    pub color: Color,
}

impl LinePrimitive {
    #[must_use]
    pub const fn new(x1: f64, y1: f64, x2: f64, y2: f64, stroke_width: f64, color: Color) -> Self {
        Self {
            x1,
            y1,
            x2,
            y2,
            stroke_width,
            color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x1.is_finite()
            || !self.y1.is_finite()
            || !self.x2.is_finite()
            || !self.y2.is_finite()
        {
            return Err(ChartError::InvalidData(
                "line coordinates must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width <= 0.0 {
            return Err(ChartError::InvalidData(
                "line stroke width must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

/// Filled rectangle with an optional border, in pixel space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RectPrimitive {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub fill_color: Color,
    pub border_width: f64,
    pub border_color: Color,
}

impl RectPrimitive {
    #[must_use]
    pub const fn new(x: f64, y: f64, width: f64, height: f64, fill_color: Color) -> Self {
        Self {
            x,
            y,
            width,
            height,
            fill_color,
            border_width: 0.0,
            border_color: fill_color,
        }
    }

    #[must_use]
    pub const fn with_border(mut self, border_width: f64, border_color: Color) -> Self {
        self.border_width = border_width;
        self.border_color = border_color;
        self
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.x.is_finite() || !self.y.is_finite() {
            return Err(ChartError::InvalidData(
                "rect origin must be finite".to_owned(),
            ));
        }
        if !self.width.is_finite() || !self.height.is_finite() || self.width < 0.0 || self.height < 0.0
        {
            return Err(ChartError::InvalidData(
                "rect size must be finite and >= 0".to_owned(),
            ));
        }
        if !self.border_width.is_finite() || self.border_width < 0.0 {
            return Err(ChartError::InvalidData(
                "rect border width must be finite and >= 0".to_owned(),
            ));
        }
        self.fill_color.validate()?;
        self.border_color.validate()
    }
}

/// Filled point marker.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CirclePrimitive {
    pub cx: f64,
    pub cy: f64,
    pub radius: f64,
    pub fill_color: Color,
}

impl CirclePrimitive {
    #[must_use]
    pub const fn new(cx: f64, cy: f64, radius: f64, fill_color: Color) -> Self {
        Self {
            cx,
            cy,
            radius,
            fill_color,
        }
    }

    pub fn validate(self) -> ChartResult<()> {
        if !self.cx.is_finite() || !self.cy.is_finite() {
            return Err(ChartError::InvalidData(
                "circle center must be finite".to_owned(),
            ));
        }
        if !self.radius.is_finite() || self.radius <= 0.0 {
            return Err(ChartError::InvalidData(
                "circle radius must be finite and > 0".to_owned(),
            ));
        }
        self.fill_color.validate()
    }
}

/// Open polyline or closed filled shape through a list of points.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonPrimitive {
    pub points: Vec<(f64, f64)>,
    pub stroke_width: f64,
    pub stroke_color: Color,
    pub fill_color: Option<Color>,
    pub closed: bool,
}

impl PolygonPrimitive {
    #[must_use]
    pub fn polyline(points: Vec<(f64, f64)>, stroke_width: f64, stroke_color: Color) -> Self {
        Self {
            points,
            stroke_width,
            stroke_color,
            fill_color: None,
            closed: false,
        }
    }

    #[must_use]
    pub fn filled(points: Vec<(f64, f64)>, fill_color: Color, stroke_color: Color) -> Self {
        Self {
            points,
            stroke_width: 1.0,
            stroke_color,
            fill_color: Some(fill_color),
            closed: true,
        }
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.points.len() < 2 {
            return Err(ChartError::InvalidData(
                "polygon needs at least two points".to_owned(),
            ));
        }
        if self
            .points
            .iter()
            .any(|(x, y)| !x.is_finite() || !y.is_finite())
        {
            return Err(ChartError::InvalidData(
                "polygon points must be finite".to_owned(),
            ));
        }
        if !self.stroke_width.is_finite() || self.stroke_width < 0.0 {
            return Err(ChartError::InvalidData(
                "polygon stroke width must be finite and >= 0".to_owned(),
            ));
        }
        self.stroke_color.validate()?;
        if let Some(fill) = self.fill_color {
            fill.validate()?;
        }
        Ok(())
    }
}

/// Horizontal text alignment relative to `TextPrimitive::x`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextHAlign {
    Left,
    Center,
    Right,
}

/// Draw command for one label in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub struct TextPrimitive {
    pub text: String,
    pub x: f64,
    pub y: f64,
    pub font_size_px: f64,
    pub color: Color,
    pub h_align: TextHAlign,
    /// Counter-clockwise rotation in degrees around the anchor.
    pub rotation_deg: f64,
}

impl TextPrimitive {
    #[must_use]
    pub fn new(
        text: impl Into<String>,
        x: f64,
        y: f64,
        font_size_px: f64,
        color: Color,
        h_align: TextHAlign,
    ) -> Self {
        Self {
            text: text.into(),
            x,
            y,
            font_size_px,
            color,
            h_align,
            rotation_deg: 0.0,
        }
    }

    #[must_use]
    pub fn rotated(mut self, rotation_deg: f64) -> Self {
        self.rotation_deg = rotation_deg;
        self
    }

    pub fn validate(&self) -> ChartResult<()> {
        if self.text.is_empty() {
            return Err(ChartError::InvalidData(
                "text primitive must not be empty".to_owned(),
            ));
        }
        if !self.x.is_finite() || !self.y.is_finite() || !self.rotation_deg.is_finite() {
            return Err(ChartError::InvalidData(
                "text coordinates must be finite".to_owned(),
            ));
        }
        if !self.font_size_px.is_finite() || self.font_size_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "font size must be finite and > 0".to_owned(),
            ));
        }
        self.color.validate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_hex_and_functional_colors() {
        let short = Color::parse("#fff").expect("short hex");
        assert_eq!(short, Color::rgb(1.0, 1.0, 1.0));

        let long = Color::parse("#08519c").expect("long hex");
        assert_eq!(long.to_hex(), "#08519c");

        let rgba = Color::parse("rgba(8, 81, 156, 0.25)").expect("rgba");
        assert!((rgba.alpha - 0.25).abs() < 1e-12);
        assert_eq!(rgba.to_hex(), "#08519c");
    }

    #[test]
    fn rejects_unknown_colors() {
        assert!(Color::parse("chartreuse-ish").is_err());
        assert!(Color::parse("#12").is_err());
        assert!(Color::parse("rgb(1, 2)").is_err());
        assert!(Color::parse("rgba(0, 0, 0, 4)").is_err());
    }
}
