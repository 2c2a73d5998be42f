use serde::{Deserialize, Serialize};

use super::DataCharacteristics;

pub static TEMPERATURE_RAMP: [&str; 5] = ["#d73027", "#fc8d59", "#fee090", "#91bfdb", "#4575b4"];
pub static TIME_SERIES_RAMP: [&str; 5] = ["#08519c", "#3182bd", "#6baed6", "#9ecae1", "#c6dbef"];
pub static COUNT_RAMP: [&str; 5] = ["#006d2c", "#31a354", "#74c476", "#a1d99b", "#c7e9c0"];
pub static DEFAULT_RAMP: [&str; 5] = ["#54278f", "#756bb1", "#9e9ac8", "#bcbddc", "#dadaeb"];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColorScheme {
    /// Warm-to-cool ramp for temperature series.
    Temperature,
    TimeSeries,
    Count,
    Default,
}

impl ColorScheme {
    /// Picks exactly one scheme: temperature, then dated data, then counts.
    #[must_use]
    pub fn select(characteristics: DataCharacteristics, y_axis_title: &str) -> Self {
        if characteristics.is_temperature {
            Self::Temperature
        } else if characteristics.has_dates || characteristics.has_years {
            Self::TimeSeries
        } else if y_axis_title.to_lowercase().contains("count") {
            Self::Count
        } else {
            Self::Default
        }
    }

    #[must_use]
    pub fn colors(self) -> &'static [&'static str; 5] {
        match self {
            Self::Temperature => &TEMPERATURE_RAMP,
            Self::TimeSeries => &TIME_SERIES_RAMP,
            Self::Count => &COUNT_RAMP,
            Self::Default => &DEFAULT_RAMP,
        }
    }

    #[must_use]
    pub fn primary(self) -> &'static str {
        self.colors()[0]
    }

    #[must_use]
    pub fn accent(self) -> &'static str {
        self.colors()[1]
    }

    /// Colors for `count` consecutive items, cycling through the ramp.
    #[must_use]
    pub fn cycle(self, count: usize) -> Vec<String> {
        self.colors()
            .iter()
            .cycle()
            .take(count)
            .map(|color| (*color).to_owned())
            .collect()
    }
}

/// Light/dark surface colors applied to layouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThemeColors {
    pub background: &'static str,
    pub font: &'static str,
    pub grid: &'static str,
}

static LIGHT_THEME: ThemeColors = ThemeColors {
    background: "#ffffff",
    font: "#1f2937",
    grid: "#e5e7eb",
};

static DARK_THEME: ThemeColors = ThemeColors {
    background: "#111827",
    font: "#e5e7eb",
    grid: "#374151",
};

impl Theme {
    #[must_use]
    pub fn colors(self) -> ThemeColors {
        match self {
            Self::Light => LIGHT_THEME,
            Self::Dark => DARK_THEME,
        }
    }
}

/// Converts `#rrggbb` into an `rgba(...)` string with the given opacity.
#[must_use]
pub fn with_alpha(hex: &str, alpha: f64) -> String {
    let digits = hex.trim_start_matches('#');
    let channel = |range: std::ops::Range<usize>| {
        digits
            .get(range)
            .and_then(|pair| u8::from_str_radix(pair, 16).ok())
            .unwrap_or(0)
    };
    format!(
        "rgba({}, {}, {}, {alpha})",
        channel(0..2),
        channel(2..4),
        channel(4..6)
    )
}

#[cfg(test)]
mod tests {
    use super::{ColorScheme, with_alpha};
    use crate::spec::DataCharacteristics;

    #[test]
    fn temperature_outranks_dates() {
        let characteristics = DataCharacteristics {
            has_dates: true,
            has_years: false,
            numeric_x: false,
            is_temperature: true,
        };
        assert_eq!(
            ColorScheme::select(characteristics, "Count"),
            ColorScheme::Temperature
        );
    }

    #[test]
    fn cycle_wraps_the_ramp() {
        let colors = ColorScheme::Count.cycle(7);
        assert_eq!(colors.len(), 7);
        assert_eq!(colors[5], colors[0]);
    }

    #[test]
    fn alpha_conversion_reads_hex_channels() {
        assert_eq!(with_alpha("#3182bd", 0.25), "rgba(49, 130, 189, 0.25)");
    }
}
