//! Core container printers: `tuple`, `array`/`multi_index`, `thread_buffer`

use super::common::{data_type, error_block, nest, preview_list};
use crate::cktile::config::PrinterConfig;
use crate::cktile::parsing::brackets::split_top_level;
use crate::cktile::parsing::sequences::parse_int_literal;
use crate::cktile::parsing::templates::{extract_template, find_template};
use crate::cktile::value::{TupleElement, ValueSource};

/// An element as text: its integer value, or the host's rendering
fn scalar_text(element: &ValueSource) -> String {
    match element.as_int() {
        Ok(value) => value.to_string(),
        Err(_) => element.render(),
    }
}

/// Up to `limit` leading elements of an array-like value
fn leading_elements(data: &ValueSource, limit: usize) -> Vec<String> {
    (0..limit)
        .map_while(|i| data.element(i).ok().map(|e| scalar_text(&e)))
        .collect()
}

/// Declared element type, shown by its short name when it is a known scalar
fn element_type_name(param: &str) -> String {
    data_type(param)
        .map(str::to_string)
        .unwrap_or_else(|| param.trim().to_string())
}

pub fn render_tuple(source: &ValueSource, config: &PrinterConfig) -> String {
    let elements = source.tuple_elements();
    let total = elements.len();
    if total == 0 {
        return "tuple<0 elements> {}".to_string();
    }

    let plural = if total == 1 { "element" } else { "elements" };
    let mut out = format!("tuple<{} {}> {{\n", total, plural);
    let shown = total.min(config.display.tuple_preview);
    for (i, element) in elements.iter().take(shown).enumerate() {
        let text = match element {
            TupleElement::Int(value) => value.to_string(),
            TupleElement::Value(value) => {
                super::render(value, config).unwrap_or_else(|| value.render())
            }
        };
        out.push_str(&format!("  [{}]: {}\n", i, nest(&text, "    ")));
    }
    if total > shown {
        out.push_str(&format!("  ... ({} total)\n", total));
    }
    out.push('}');
    out
}

pub fn render_array(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();

    let (label, size) = if let Some(content) = extract_template(&type_str, "multi_index") {
        let size = parse_int_literal(content);
        (size.map(|n| format!("multi_index<{}>", n)), size)
    } else if let Some(content) = extract_template(&type_str, "array") {
        let params = split_top_level(content);
        let size = params.get(1).and_then(|n| parse_int_literal(n));
        let element = params.first().map(|t| element_type_name(t)).unwrap_or_default();
        (size.map(|n| format!("array<{}, {}>", element, n)), size)
    } else {
        (None, None)
    };

    let (Some(label), Some(size)) = (label, size) else {
        return error_block("array", "Could not determine array size");
    };
    let size = usize::try_from(size).unwrap_or(0);

    let values = match source.member("data") {
        Ok(data) => {
            let limit = size.min(config.display.array_preview);
            preview_list(&leading_elements(&data, limit), size)
        }
        Err(_) => "<not accessible>".to_string(),
    };
    format!("{} = {}", label, values)
}

pub fn render_thread_buffer(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();
    let Some(span) = find_template(&type_str, "thread_buffer", 0) else {
        return error_block("thread_buffer", "Could not parse thread_buffer type");
    };
    let params = split_top_level(span.content(&type_str));
    let Some(size) = params
        .get(1)
        .and_then(|n| parse_int_literal(n))
        .and_then(|n| usize::try_from(n).ok())
    else {
        return error_block("thread_buffer", "Could not parse thread_buffer type");
    };
    let element = params.first().map(|t| element_type_name(t)).unwrap_or_default();

    let mut out = format!("thread_buffer<{}, {}> {{\n", element, size);
    out.push_str(&format!("  size: {}\n", size));

    let limit = size.min(config.display.thread_buffer_preview);
    let shown = source
        .member("data")
        .map(|data| leading_elements(&data, limit))
        .unwrap_or_default();
    if shown.is_empty() {
        out.push_str("  data: <not accessible>\n");
    } else {
        let list = preview_list(&shown, size);
        out.push_str(&format!("  data (first {}): {}\n", shown.len(), list));
    }
    out.push('}');
    out
}
