use std::sync::LazyLock;

use regex::Regex;

use crate::core::{DataPoint, parse_numeric_token};
use crate::error::ChartResult;

use super::StrategyOutput;
use super::normalize::normalize_x;

static BULLET_VALUE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^\s*[-•*]\s+([^:\n]+?)\s*:\s*(-?\d+(?:,\d{3})*(?:\.\d+)?)")
        .expect("valid bullet regex")
});

/// Reads `- Label: 12.34` lines (`-`, `•` or `*` bullets).
pub(super) fn try_extract(text: &str) -> ChartResult<Option<StrategyOutput>> {
    let mut output = StrategyOutput::default();

    for caps in BULLET_VALUE.captures_iter(text) {
        let (Some(label), Some(value)) = (caps.get(1), caps.get(2)) else {
            continue;
        };
        let label = label.as_str().trim_matches(|ch| ch == '*' || ch == '_').trim();
        if label.is_empty() {
            continue;
        }
        let y = parse_numeric_token(value.as_str(), "bullet value")?;
        output.points.push(DataPoint::new(normalize_x(label), y, label)?);
    }

    Ok((!output.points.is_empty()).then_some(output))
}

#[cfg(test)]
mod tests {
    use super::try_extract;
    use crate::core::XValue;

    #[test]
    fn bold_labels_are_unwrapped() {
        let output = try_extract("* **Pears**: 3.5\n• Plums: 1,200")
            .expect("no error")
            .expect("points");
        assert_eq!(output.points[0].x, XValue::Text("Pears".to_owned()));
        assert_eq!(output.points[0].y, 3.5);
        assert_eq!(output.points[1].y, 1200.0);
    }
}
