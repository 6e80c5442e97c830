use anyhow::Result;
use data_converter::config::options::{HtmlListOptions, HtmlTableOptions};
use data_converter::engine::html;
use data_converter::{execute, ConvertError, Output, Payload, Request};
use serde_json::json;

fn run_html(record: serde_json::Value, payload: Payload) -> data_converter::Result<String> {
    let request = Request::from_record(record)?;
    match execute(&request, payload)? {
        Output::Text(text) => Ok(text),
        other => panic!("expected text output, got {:?}", other),
    }
}

#[test]
fn test_empty_rows_give_placeholder_not_table() -> Result<()> {
    let html = run_html(
        json!({"resource": "html", "operation": "structuredToHtmlTable"}),
        Payload::Structured(json!([])),
    )?;
    assert_eq!(html, "<p>No data to display</p>");
    assert!(!html.contains("<table"));
    Ok(())
}

#[test]
fn test_table_escapes_every_cell() -> Result<()> {
    let html = html::structured_to_html_table(
        &json!([{"<k>": "a & b", "n": 1}, {"n": 2}]),
        &HtmlTableOptions {
            table_class: Some("grid".to_string()),
            ..HtmlTableOptions::default()
        },
    )?;
    assert!(html.starts_with("<table class=\"grid\">"));
    assert!(html.contains("<th>&lt;k&gt;</th>"));
    assert!(html.contains("<td>a &amp; b</td>"));
    assert!(html.contains("<td></td>\n      <td>2</td>"));
    assert!(html.contains("<thead>") && html.contains("<tbody>"));
    Ok(())
}

#[test]
fn test_csv_to_html_table_reads_csv_and_table_options() -> Result<()> {
    let html = run_html(
        json!({
            "resource": "html",
            "operation": "csvToHtmlTable",
            "delimiter": "|",
            "includeIndex": true
        }),
        Payload::Text("sku|price\nA-1|9.5\n".to_string()),
    )?;
    assert!(html.contains("<th>#</th>"));
    assert!(html.contains("<th>sku</th>"));
    assert!(html.contains("<td>1</td>\n      <td>A-1</td>\n      <td>9.5</td>"));
    Ok(())
}

#[test]
fn test_lists_nest_and_describe_mappings() -> Result<()> {
    let html = html::structured_to_html_list(
        &json!(["plain", {"k": "<v>"}, ["inner"]]),
        &HtmlListOptions {
            ordered: true,
            ..HtmlListOptions::default()
        },
    )?;
    assert!(html.starts_with("<ol>"));
    assert!(html.contains("<li>plain</li>"));
    assert!(html.contains("<dt>k</dt>"));
    assert!(html.contains("<dd>&lt;v&gt;</dd>"));
    assert!(html.contains("<ol>\n  <li>inner</li>\n</ol>"));
    Ok(())
}

#[test]
fn test_list_depth_limit() {
    let deep = json!([[[["too deep"]]]]);
    let err = html::structured_to_html_list(
        &deep,
        &HtmlListOptions {
            ordered: false,
            max_depth: 2,
        },
    )
    .unwrap_err();
    assert!(matches!(err, ConvertError::DepthLimitError { limit: 2, .. }));
}

#[test]
fn test_markdown_to_html_uses_line_breaks() -> Result<()> {
    let html = run_html(
        json!({"resource": "html", "operation": "markdownToHtml"}),
        Payload::Text("first\nsecond\n\n- [x] done".to_string()),
    )?;
    assert!(html.contains("first<br />\nsecond"));
    assert!(html.contains("checkbox"));
    Ok(())
}

#[test]
fn test_html_to_markdown_rebuilds_tables() -> Result<()> {
    let md = run_html(
        json!({"resource": "html", "operation": "htmlToMarkdown"}),
        Payload::Text(
            "<h2>Stock</h2>\n<table><thead><tr><td>item</td><td>qty</td></tr></thead>\
             <tbody><tr><td>bolt</td><td>4</td></tr></tbody></table>\n\n\n\n<p>end</p>"
                .to_string(),
        ),
    )?;
    assert_eq!(
        md,
        "## Stock\n\n| item | qty |\n| --- | --- |\n| bolt | 4 |\n\nend"
    );
    Ok(())
}

#[test]
fn test_markdown_html_markdown_keeps_structure() -> Result<()> {
    let html = html::markdown_to_html("# Title\n\nSee [docs](https://docs.rs).");
    let md = html::html_to_markdown(&html);
    assert_eq!(md, "# Title\n\nSee [docs](https://docs.rs).");
    Ok(())
}
