//! `tensor_view` printer

use super::common::{access_failure, address_space, data_type, header, nest};
use super::descriptor;
use crate::cktile::config::PrinterConfig;
use crate::cktile::error::AccessError;
use crate::cktile::parsing::brackets::split_top_level;
use crate::cktile::parsing::templates::{extract_template, find_template};
use crate::cktile::value::ValueSource;

pub const NAME: &str = "tensor_view";

pub fn render(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();

    let mut out = header(NAME, source.is_type_only());
    out.push('\n');
    if let Some(data_type) = data_type(&type_str) {
        out.push_str(&format!("  data_type: {}\n", data_type));
    }
    if has_const_elements(&type_str) {
        out.push_str("  const: true\n");
    }

    // The descriptor carries everything in its type, so a view without
    // storage still shows its layout
    match source.member_or_type("desc_", descriptor::NAME) {
        Some(desc) => {
            out.push_str("\n  descriptor: ");
            out.push_str(&nest(&descriptor::render(&desc, config), "  "));
            out.push('\n');
        }
        None => {
            let err = AccessError::MissingMember("desc_".to_string());
            out.push_str(&format!("  descriptor: {}\n", access_failure(&err)));
        }
    }

    if let Some(buffer) = source.member_or_type("buf_view_", "buffer_view") {
        let buffer_type = buffer.type_name();
        if find_template(&buffer_type, "buffer_view", 0).is_some() {
            out.push_str("\n  buffer_view: {\n");
            if let Some(space) = address_space(&buffer_type) {
                out.push_str(&format!("    address_space: {}\n", space));
            }
            out.push_str("  }\n");
        }
    }

    out.push('}');
    out
}

/// Whether the element type of the view's `buffer_view` is const-qualified
fn has_const_elements(type_str: &str) -> bool {
    extract_template(type_str, "buffer_view")
        .map(split_top_level)
        .and_then(|params| params.get(1).copied())
        .is_some_and(|element| element.starts_with("const ") || element.ends_with(" const"))
}

/// Summary printed for a `::BufferView` alias
pub fn describe_buffer_alias(type_str: &str) -> String {
    let mut lines = vec!["buffer_view type alias:".to_string()];
    if let Some(space) = address_space(type_str) {
        lines.push(format!("  address_space: {}", space));
    }
    if let Some(data_type) = data_type(type_str) {
        lines.push(format!("  data_type: {}", data_type));
    }
    lines.join("\n")
}
