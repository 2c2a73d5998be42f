use crate::core::{DataPoint, XValue};
use crate::extract::normalize::is_iso_date;

/// Boolean probes over data and titles that drive adaptive styling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct DataCharacteristics {
    pub has_dates: bool,
    pub has_years: bool,
    pub numeric_x: bool,
    pub is_temperature: bool,
}

impl DataCharacteristics {
    #[must_use]
    pub fn analyze(
        data: &[DataPoint],
        title: &str,
        x_axis_title: &str,
        y_axis_title: &str,
    ) -> Self {
        let has_dates = data
            .iter()
            .any(|point| point.x.as_text().is_some_and(is_iso_date));
        let has_years = data.iter().any(|point| {
            point
                .x
                .as_number()
                .is_some_and(|x| (1900.0..=2100.0).contains(&x))
        });
        let numeric_x = !data.is_empty() && data.iter().all(|point| point.x.is_number());
        let is_temperature = [title, x_axis_title, y_axis_title]
            .iter()
            .any(|text| text.to_lowercase().contains("temperature"));

        Self {
            has_dates,
            has_years,
            numeric_x,
            is_temperature,
        }
    }

    /// Axis type shared by bar, line and area traces.
    #[must_use]
    pub fn series_axis_type(self) -> &'static str {
        if self.has_dates {
            "date"
        } else {
            self.scatter_axis_type()
        }
    }

    #[must_use]
    pub fn scatter_axis_type(self) -> &'static str {
        if self.numeric_x { "linear" } else { "category" }
    }

    #[must_use]
    pub fn value_tick_format(self) -> &'static str {
        if self.is_temperature { ".1f" } else { ",.0f" }
    }
}

/// Numeric x values stay JSON numbers; categories and dates stay strings.
pub(crate) fn x_to_json(x: &XValue) -> serde_json::Value {
    match x {
        XValue::Number(value) => serde_json::Value::from(*value),
        XValue::Text(text) => serde_json::Value::from(text.as_str()),
    }
}
