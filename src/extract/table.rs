use std::sync::LazyLock;

use regex::Regex;
use smallvec::SmallVec;

use crate::core::{DataPoint, parse_numeric_token};
use crate::error::ChartResult;

use super::StrategyOutput;
use super::normalize::normalize_x;

static SEPARATOR_ROW: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[\s|:-]+$").expect("valid separator regex"));

static FIRST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d+\.?\d*").expect("valid number regex"));

type Cells<'a> = SmallVec<[&'a str; 4]>;

/// Reads the first markdown table in `text`.
///
/// The first row holds headers; every later row with two or more cells is a
/// data row keyed on its first two columns. Scanning stops at the first
/// non-table line once a data row has been collected.
pub(super) fn try_extract(text: &str) -> ChartResult<Option<StrategyOutput>> {
    let mut output = StrategyOutput::default();

    for line in text.lines() {
        let line = line.trim();
        if !line.contains('|') {
            if !output.points.is_empty() {
                break;
            }
            continue;
        }
        if SEPARATOR_ROW.is_match(line) {
            continue;
        }

        let cells = split_cells(line);
        if output.headers.is_empty() {
            output.headers = cells.iter().map(|cell| (*cell).to_owned()).collect();
            continue;
        }
        if cells.len() < 2 || cells[0].is_empty() {
            continue;
        }
        if let Some(point) = parse_row(cells[0], cells[1])? {
            output.points.push(point);
        }
    }

    Ok((!output.points.is_empty()).then_some(output))
}

/// Cells between the outer pipes; empty cells keep their column.
fn split_cells(line: &str) -> Cells<'_> {
    let line = line.strip_prefix('|').unwrap_or(line);
    let line = line.strip_suffix('|').unwrap_or(line);
    line.split('|').map(str::trim).collect()
}

fn parse_row(x_cell: &str, y_cell: &str) -> ChartResult<Option<DataPoint>> {
    let Some(number) = FIRST_NUMBER.find(y_cell) else {
        return Ok(None);
    };
    let y = parse_numeric_token(number.as_str(), "table value")?;
    DataPoint::new(normalize_x(x_cell), y, x_cell).map(Some)
}
