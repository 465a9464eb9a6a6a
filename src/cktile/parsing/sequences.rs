//! `sequence<...>` bodies, `constant<N>` values and integer literals
//!
//! Sequences hold hidden-dimension indices and compile-time lengths. Their
//! position inside a tuple is meaningful: the n-th sequence of the lower/upper
//! tuples belongs to the n-th transform, so an empty `sequence<>` must still
//! produce an (empty) entry.

use super::templates::{extract_all_templates, extract_template, template_argument};

/// Parse a literal such as `8192l`, `-1` or `64ul`
pub fn parse_int_literal(token: &str) -> Option<i64> {
    let trimmed = token
        .trim()
        .trim_end_matches(|c: char| matches!(c, 'u' | 'U' | 'l' | 'L'));
    if trimmed.is_empty() {
        return None;
    }
    let digits = trimmed.strip_prefix('-').unwrap_or(trimmed);
    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    trimmed.parse().ok()
}

/// Parse the comma-separated body of a sequence into integers
///
/// Non-numeric entries are dropped silently.
pub fn parse_sequence_values(body: &str) -> Vec<i64> {
    body.split(',').filter_map(parse_int_literal).collect()
}

/// Every `sequence<...>` in `content`, parsed, in order, empty ones included
pub fn parse_dimension_sequences(content: &str) -> Vec<Vec<i64>> {
    extract_all_templates(content, "sequence")
        .into_iter()
        .map(parse_sequence_values)
        .collect()
}

/// Values of a parameter that is itself a `sequence<...>`
pub fn sequence_argument(param: &str) -> Option<Vec<i64>> {
    template_argument(param, "sequence").map(parse_sequence_values)
}

/// Value of the first `constant<N>` in a type string
pub fn constant_value(type_str: &str) -> Option<i64> {
    extract_template(type_str, "constant").and_then(parse_int_literal)
}

/// Value of a parameter that is exactly a `constant<N>`
pub fn constant_argument(param: &str) -> Option<i64> {
    template_argument(param, "constant").and_then(parse_int_literal)
}

/// Values of a tuple made only of `constant<N>` elements
///
/// Returns `None` as soon as one element is a runtime type, since a partial
/// list would be misaligned with the real lengths.
pub fn constant_tuple(param: &str) -> Option<Vec<i64>> {
    let content = template_argument(param, "tuple")?;
    super::brackets::split_top_level(content)
        .into_iter()
        .map(constant_argument)
        .collect()
}
