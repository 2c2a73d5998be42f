use proptest::prelude::*;
use text_charts::core::{ChartType, XValue};
use text_charts::extract::normalize::normalize_x;
use text_charts::extract::{ExtractionSource, determine_chart_type, extract_data};
use text_charts::render::EngineId;
use text_charts::spec::{ChartDisplayConfig, build_from_extraction};

const MONTHS: [&str; 12] = [
    "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
];

fn table(rows: &[(String, u32)]) -> String {
    let mut text = String::from("| Item | Amount |\n|---|---|\n");
    for (label, value) in rows {
        text.push_str(&format!("| {label} | {value} |\n"));
    }
    text
}

proptest! {
    #[test]
    fn tables_yield_one_point_per_numeric_row(
        rows in prop::collection::vec(("[a-z]{3,8}", 0u32..100_000), 1..20)
    ) {
        let result = extract_data(&table(&rows)).expect("table should extract");

        prop_assert_eq!(result.metadata.source, ExtractionSource::MarkdownTable);
        prop_assert_eq!(result.data.len(), rows.len());
        for (point, (label, value)) in result.data.iter().zip(&rows) {
            prop_assert_eq!(&point.label, label);
            prop_assert_eq!(point.y, f64::from(*value));
        }
    }

    #[test]
    fn month_day_tokens_normalize_to_assumed_year(month in 0usize..12, day in 1u32..=28) {
        let token = format!("{} {:02}", MONTHS[month], day);
        let expected = format!("2025-{:02}-{:02}", month + 1, day);
        prop_assert_eq!(normalize_x(&token), XValue::Text(expected));
    }

    #[test]
    fn bare_years_become_numbers(year in 1000u16..=9999) {
        prop_assert_eq!(normalize_x(&year.to_string()), XValue::Number(f64::from(year)));
    }

    #[test]
    fn classification_is_deterministic_and_total(
        text in ".{0,80}",
        header in "[A-Za-z ]{0,12}"
    ) {
        let headers = vec![header];
        let first = determine_chart_type(&text, &headers);
        let second = determine_chart_type(&text, &headers);
        prop_assert_eq!(first, second);
        prop_assert!(matches!(
            first,
            ChartType::Bar | ChartType::Line | ChartType::Area | ChartType::Pie | ChartType::Scatter
        ));
    }

    #[test]
    fn building_twice_gives_identical_specs(
        rows in prop::collection::vec(("[a-z]{3,8}", 0u32..1_000), 1..12),
        engine_index in 0usize..3
    ) {
        let extraction = extract_data(&table(&rows)).expect("table should extract");
        let config = ChartDisplayConfig::default().with_engine(EngineId::ALL[engine_index]);

        let first = build_from_extraction(&extraction, &config).expect("first build");
        let second = build_from_extraction(&extraction, &config).expect("second build");
        prop_assert_eq!(first, second);
    }
}
