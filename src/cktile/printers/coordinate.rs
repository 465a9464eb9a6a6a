//! `tensor_adaptor_coordinate` and `tensor_coordinate` printers
//!
//! ```text
//! tensor_adaptor_coordinate<NDimHidden, BottomDimensionHiddenIds, TopDimensionHiddenIds>
//! tensor_coordinate<NDimHidden, TopDimensionHiddenIds>
//! ```
//!
//! The hidden index lives in `idx_hidden_`; top and bottom indices are just
//! the hidden entries named by the anchor sequences.

use super::common::header;
use crate::cktile::config::PrinterConfig;
use crate::cktile::parsing::brackets::split_top_level;
use crate::cktile::parsing::sequences::{parse_dimension_sequences, parse_int_literal};
use crate::cktile::parsing::templates::extract_template;
use crate::cktile::pipeline::{format_list, DimensionIndex};
use crate::cktile::value::ValueSource;

pub const ADAPTOR_COORDINATE: &str = "tensor_adaptor_coordinate";
pub const TENSOR_COORDINATE: &str = "tensor_coordinate";

/// Leading `NDimHidden` argument and every sequence argument
fn layout(type_str: &str, name: &str) -> (usize, Vec<Vec<DimensionIndex>>) {
    let Some(content) = extract_template(type_str, name) else {
        return (0, Vec::new());
    };
    let ndim_hidden = split_top_level(content)
        .first()
        .and_then(|first| parse_int_literal(first))
        .and_then(|n| usize::try_from(n).ok())
        .unwrap_or(0);
    (ndim_hidden, parse_dimension_sequences(content))
}

/// Read `idx_hidden_` up to `ndim_hidden` entries, stopping at the first unreadable one
fn hidden_values(source: &ValueSource, ndim_hidden: usize, config: &PrinterConfig) -> Vec<i64> {
    let Ok(idx_hidden) = source.member("idx_hidden_") else {
        return Vec::new();
    };
    let cap = if ndim_hidden > 0 {
        ndim_hidden
    } else {
        config.limits.max_hidden_dims
    };

    let read = |array: &ValueSource| -> Vec<i64> {
        (0..cap)
            .map_while(|i| array.element(i).and_then(|e| e.as_int()).ok())
            .collect()
    };

    let values = match idx_hidden.member("data") {
        Ok(data) => read(&data),
        Err(_) => read(&idx_hidden),
    };
    values
}

fn select(values: &[i64], dims: &[DimensionIndex]) -> Vec<i64> {
    dims.iter()
        .filter_map(|d| usize::try_from(*d).ok())
        .filter_map(|d| values.get(d).copied())
        .collect()
}

pub fn render_adaptor_coordinate(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();
    let (ndim_hidden, sequences) = layout(&type_str, ADAPTOR_COORDINATE);
    let (bottom, top) = match sequences.len() {
        0 | 1 => (Vec::new(), Vec::new()),
        n => (sequences[n - 2].clone(), sequences[n - 1].clone()),
    };
    let hidden = hidden_values(source, ndim_hidden, config);

    let mut out = header(ADAPTOR_COORDINATE, source.is_type_only());
    out.push('\n');
    if !hidden.is_empty() {
        out.push_str(&format!("  idx_hidden_ (data): {}\n", format_list(&hidden)));
    }
    if !bottom.is_empty() {
        out.push_str(&format!("  bottom_dimension_ids: {}\n", format_list(&bottom)));
    }
    if !top.is_empty() {
        out.push_str(&format!("  top_dimension_ids: {}\n", format_list(&top)));
    }
    if !hidden.is_empty() {
        if !top.is_empty() {
            out.push_str(&format!("  top_index: {}\n", format_list(&select(&hidden, &top))));
        }
        if !bottom.is_empty() {
            out.push_str(&format!("  bottom_index: {}\n", format_list(&select(&hidden, &bottom))));
        }
    }
    out.push('}');
    out
}

pub fn render_tensor_coordinate(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();
    let (ndim_hidden, sequences) = layout(&type_str, TENSOR_COORDINATE);
    let top = sequences.last().cloned().unwrap_or_default();
    let hidden = hidden_values(source, ndim_hidden, config);

    let mut out = header(TENSOR_COORDINATE, source.is_type_only());
    out.push('\n');
    if !hidden.is_empty() {
        out.push_str(&format!("  idx_hidden_ (data): {}\n", format_list(&hidden)));
    }
    // descriptors always have the single flat offset as bottom
    out.push_str("  bottom_dimension_ids: [0]\n");
    if !top.is_empty() {
        out.push_str(&format!("  top_dimension_ids: {}\n", format_list(&top)));
    }
    if let Some(offset) = hidden.first() {
        if !top.is_empty() {
            out.push_str(&format!("  index (top): {}\n", format_list(&select(&hidden, &top))));
        }
        out.push_str(&format!("  offset (bottom[0]): {}\n", offset));
    }
    out.push('}');
    out
}
