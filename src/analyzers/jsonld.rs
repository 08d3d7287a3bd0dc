// src/analyzers/jsonld.rs
// =============================================================================
// Shared JSON-LD extraction for the structured-data and SERP analyzers:
// pulls <script type="application/ld+json"> blocks, parses them with
// serde_json, flattens @graph arrays, and reads @type values that may be a
// string or an array.
// =============================================================================

use scraper::{Html, Selector};
use serde_json::Value;

/// Parse result for the JSON-LD blocks on a page.
pub struct JsonLdBlocks {
    /// Top-level objects, one per successfully parsed block (arrays are
    /// split into their elements).
    pub items: Vec<Value>,
    /// Number of script blocks that failed to parse as JSON.
    pub invalid_blocks: usize,
    /// Number of script blocks found, valid or not.
    pub block_count: usize,
}

pub fn extract_jsonld(html: &str) -> JsonLdBlocks {
    let document = Html::parse_document(html);
    let selector = Selector::parse(r#"script[type="application/ld+json"]"#).unwrap();

    let mut items = Vec::new();
    let mut invalid_blocks = 0;
    let mut block_count = 0;

    for script in document.select(&selector) {
        block_count += 1;
        let raw = script.text().collect::<String>();
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => items.push(Value::Object(map)),
            Ok(Value::Array(values)) => {
                items.extend(values.into_iter().filter(|v| v.is_object()));
            }
            _ => invalid_blocks += 1,
        }
    }

    JsonLdBlocks { items, invalid_blocks, block_count }
}

/// Flattens @graph containers so callers see one flat list of objects.
pub fn flatten_graph(items: &[Value]) -> Vec<Value> {
    let mut flat = Vec::new();
    for item in items {
        match item.get("@graph").and_then(Value::as_array) {
            Some(graph) => flat.extend(graph.iter().filter(|v| v.is_object()).cloned()),
            None => flat.push(item.clone()),
        }
    }
    flat
}

/// The primary @type of an item; @type may be a string or an array.
pub fn schema_type(item: &Value) -> Option<String> {
    match item.get("@type") {
        Some(Value::String(t)) => Some(t.clone()),
        Some(Value::Array(types)) => types.first().and_then(Value::as_str).map(String::from),
        _ => None,
    }
}

/// Every @type on an item, for analyzers that care about all of them.
pub fn schema_types(item: &Value) -> Vec<String> {
    match item.get("@type") {
        Some(Value::String(t)) => vec![t.clone()],
        Some(Value::Array(types)) => types
            .iter()
            .filter_map(Value::as_str)
            .map(String::from)
            .collect(),
        _ => Vec::new(),
    }
}
