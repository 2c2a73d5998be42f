use text_charts::api::{ContentBlock, detect_visualization, fenced_blocks, parse_envelope, sniff_engine};
use text_charts::error::ChartError;
use text_charts::render::EngineId;

#[test]
fn untagged_block_is_sniffed_as_vector() {
    let text = "Here you go:\n```\n{\"data\":[{\"type\":\"bar\",\"x\":[1],\"y\":[2]}],\"layout\":{}}\n```";
    let block = detect_visualization(text);
    let spec = block.as_chart().expect("chart detected");
    assert_eq!(spec.engine(), EngineId::Vector);
    assert_eq!(spec.spec()["data"][0]["type"], "bar");
}

#[test]
fn tagged_blocks_pick_their_engine() {
    let text = "```chartjs\n{\"type\":\"pie\",\"data\":{\"labels\":[\"a\"],\"datasets\":[]}}\n```";
    let spec = detect_visualization(text).as_chart().cloned().expect("chart");
    assert_eq!(spec.engine(), EngineId::Canvas);

    let text = "```D3\n[{\"x\": 1, \"y\": 2}]\n```";
    let spec = detect_visualization(text).as_chart().cloned().expect("chart");
    assert_eq!(spec.engine(), EngineId::Drawing);
}

#[test]
fn malformed_tagged_block_falls_through_to_later_blocks() {
    let text = "```plotly\n{not json\n```\n\n```json\n[{\"x\": \"a\", \"y\": 1}]\n```";
    let spec = detect_visualization(text).as_chart().cloned().expect("chart");
    assert_eq!(spec.engine(), EngineId::Drawing);
}

#[test]
fn envelope_applies_height_override() {
    let text = r#"{"kind":"visualization","library":"plotly","spec":{"data":[],"layout":{"title":"T"}},"meta":{"height":520}}"#;
    let spec = parse_envelope(text).expect("envelope");
    assert_eq!(spec.engine(), EngineId::Vector);
    assert_eq!(spec.spec()["layout"]["height"], 520.0);
    assert_eq!(spec.spec()["layout"]["title"], "T");

    assert_eq!(detect_visualization(text), ContentBlock::Chart(spec));
}

#[test]
fn envelope_with_unsupported_library_stays_text() {
    let text = r#"{"kind":"visualization","library":"vega","spec":{"mark":"bar"}}"#;
    assert!(matches!(
        parse_envelope(text),
        Err(ChartError::UnsupportedLibrary(library)) if library == "vega"
    ));
    assert_eq!(detect_visualization(text), ContentBlock::Text(text.to_owned()));
}

#[test]
fn envelope_spec_must_be_an_object() {
    let text = r#"{"kind":"visualization","library":"plotly","spec":[1,2]}"#;
    assert!(matches!(parse_envelope(text), Err(ChartError::MalformedSpec(_))));
}

#[test]
fn plain_text_and_unrecognized_json_stay_text() {
    let prose = "The weather was lovely today.";
    assert_eq!(detect_visualization(prose), ContentBlock::Text(prose.to_owned()));

    let config = "```json\n{\"name\": \"settings\", \"debug\": true}\n```";
    assert_eq!(detect_visualization(config), ContentBlock::Text(config.to_owned()));

    let rust = "```rust\nfn main() {}\n```";
    assert!(detect_visualization(rust).as_chart().is_none());
}

#[test]
fn fences_keep_their_language_and_body() {
    let blocks = fenced_blocks("a\n~~~\nnot a fence\n````Plotly extra\n{}\n````\n");
    assert_eq!(blocks.len(), 1);
    assert_eq!(blocks[0].language.as_deref(), Some("plotly"));
    assert_eq!(blocks[0].body, "{}");
}

#[test]
fn sniffing_rejects_near_misses() {
    let canvas_without_labels = serde_json::json!({ "type": "bar", "data": { "datasets": [] } });
    assert_eq!(sniff_engine(&canvas_without_labels), None);
}
