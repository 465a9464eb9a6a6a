//! Re-reading rendered descriptor and adaptor blocks
//!
//! Some instantiations reach us with their dimension sequences collapsed
//! behind typedefs, so the type string carries transform names but no
//! `sequence<...>` data. The printed block for the same object still lists
//! every transform, so this module reads it back:
//!
//! ```text
//!   bottom_dimension_ids: [0]
//!   top_dimension_ids: [2, 3]
//!
//!   Transforms:
//!     [0] replicate
//!         upper: [1]
//!     [1] unmerge
//!         lower: [1]
//!         upper: [2, 3]
//! }
//! ```
//!
//! The grammar is line based. A `[N] name` marker opens a transform; the
//! following lines are scanned for labelled lists until the next marker or a
//! line starting with `}`. Missing `lower`/`upper` lines mean empty lists,
//! the same convention the type-string path uses.

use super::sequences::parse_sequence_values;
use crate::cktile::pipeline::{Transform, TransformKind, TransformParameters, TransformPipeline};
use once_cell::sync::Lazy;
use regex::Regex;

static MARKER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\[(\d+)\]\s+(\w+)").unwrap());
static LOWER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\blower:\s*\[([^\]]*)\]").unwrap());
static UPPER_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"\bupper:\s*\[([^\]]*)\]").unwrap());
static UP_LENGTHS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bup_lengths:\s*\[([^\]]*)\]").unwrap());
static LOW_LENGTHS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\blow_lengths:\s*\[([^\]]*)\]").unwrap());
static COEFFICIENTS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\bcoefficients:\s*\[([^\]]*)\]").unwrap());
static BOTTOM_IDS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"bottom_dimension_ids:\s*\[([^\]]*)\]").unwrap());
static TOP_IDS_REGEX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"top_dimension_ids:\s*\[([^\]]*)\]").unwrap());
static NTRANSFORM_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"ntransform:\s*(\d+)").unwrap());

fn captured_list(regex: &Regex, line: &str) -> Option<Vec<i64>> {
    regex
        .captures(line)
        .and_then(|caps| caps.get(1))
        .map(|body| parse_sequence_values(body.as_str()))
}

// Window and view dumps nest the descriptor block after their own anchors, so
// the earliest match belongs to the outermost object. Later matches are ignored.
fn first_list(regex: &Regex, text: &str) -> Vec<i64> {
    text.lines()
        .find_map(|line| captured_list(regex, line))
        .unwrap_or_default()
}

fn is_block_end(line: &str) -> bool {
    MARKER_REGEX.is_match(line) || line.starts_with('}')
}

/// Rebuild a pipeline from a rendered descriptor or adaptor block
///
/// Markers naming an unknown transform close the previous transform and are
/// otherwise dropped. Anchors come from the first `bottom_dimension_ids:` and
/// `top_dimension_ids:` lines.
pub fn parse_rendered_description(text: &str) -> TransformPipeline {
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let mut transforms = Vec::new();
    let mut i = 0;

    while i < lines.len() {
        let Some(caps) = MARKER_REGEX.captures(lines[i]) else {
            i += 1;
            continue;
        };
        let name = caps.get(2).map(|m| m.as_str()).unwrap_or_default();

        let mut lower = Vec::new();
        let mut upper = Vec::new();
        let mut parameters = TransformParameters::default();

        let mut j = i + 1;
        while j < lines.len() && !is_block_end(lines[j]) {
            let line = lines[j];
            if let Some(values) = captured_list(&LOWER_REGEX, line) {
                lower = values;
            }
            if let Some(values) = captured_list(&UPPER_REGEX, line) {
                upper = values;
            }
            if let Some(values) = captured_list(&UP_LENGTHS_REGEX, line) {
                parameters.up_lengths = Some(values);
            }
            if let Some(values) = captured_list(&LOW_LENGTHS_REGEX, line) {
                parameters.low_lengths = Some(values);
            }
            if let Some(values) = captured_list(&COEFFICIENTS_REGEX, line) {
                parameters.coefficients = Some(values);
            }
            j += 1;
        }

        match TransformKind::from_name(name) {
            Some(kind) => {
                transforms.push(Transform::new(kind, lower, upper).with_parameters(parameters))
            }
            None => tracing::debug!(name = name, "skipping unknown transform in rendered text"),
        }
        i = j;
    }

    TransformPipeline {
        transforms,
        bottom_dims: first_list(&BOTTOM_IDS_REGEX, text),
        top_dims: first_list(&TOP_IDS_REGEX, text),
    }
}

/// The `ntransform: N` counter of a rendered block
pub fn parse_ntransform(text: &str) -> Option<usize> {
    NTRANSFORM_REGEX
        .captures(text)
        .and_then(|caps| caps.get(1))
        .and_then(|m| m.as_str().parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replicate_then_unmerge() {
        let text = "[0] replicate\n    upper: [1]\n[1] unmerge\n    lower: [1]\n    upper: [2,3]";
        let pipeline = parse_rendered_description(text);
        assert_eq!(
            pipeline.kinds(),
            vec![TransformKind::Replicate, TransformKind::Unmerge]
        );
        assert_eq!(pipeline.lower_dims(), vec![vec![], vec![1]]);
        assert_eq!(pipeline.upper_dims(), vec![vec![1], vec![2, 3]]);
    }

    #[test]
    fn test_full_block_with_anchors_and_parameters() {
        let text = "tensor_adaptor{\n  ntransform: 2\n  bottom_dimension_ids: [0]\n  top_dimension_ids: [2, 3]\n\n  Transforms:\n    [0] embed\n        lower: [0]\n        upper: [1]\n        up_lengths: [8, 128]\n        coefficients: [128, 1]\n    [1] pass_through\n        lower: [1]\n        upper: [2]\n}";
        let pipeline = parse_rendered_description(text);
        assert_eq!(pipeline.bottom_dims, vec![0]);
        assert_eq!(pipeline.top_dims, vec![2, 3]);
        assert_eq!(pipeline.transforms[0].parameters.up_lengths, Some(vec![8, 128]));
        assert_eq!(pipeline.transforms[0].parameters.coefficients, Some(vec![128, 1]));
        assert_eq!(pipeline.transforms[0].parameters.low_lengths, None);
        assert_eq!(pipeline.transforms[1].kind, TransformKind::PassThrough);
        assert_eq!(parse_ntransform(text), Some(2));
    }

    #[test]
    fn test_outermost_anchors_win_over_nested_ones() {
        let text = "tensor_adaptor{\n  bottom_dimension_ids: [0]\n  top_dimension_ids: [4]\n  inner: tensor_descriptor{\n    bottom_dimension_ids: [9]\n    top_dimension_ids: [7, 8]\n  }\n}";
        let pipeline = parse_rendered_description(text);
        assert_eq!(pipeline.bottom_dims, vec![0]);
        assert_eq!(pipeline.top_dims, vec![4]);
    }

    #[test]
    fn test_fields_on_one_line() {
        let pipeline = parse_rendered_description("[0] merge\n  lower: [0, 1], upper: [2]\n");
        assert_eq!(pipeline.lower_dims(), vec![vec![0, 1]]);
        assert_eq!(pipeline.upper_dims(), vec![vec![2]]);
    }

    #[test]
    fn test_closing_brace_ends_the_block() {
        let text = "[0] freeze\n}\n  lower: [7]\n";
        let pipeline = parse_rendered_description(text);
        assert_eq!(pipeline.lower_dims(), vec![Vec::<i64>::new()]);
    }

    #[test]
    fn test_low_lengths_is_not_read_as_lower() {
        let pipeline = parse_rendered_description("[0] merge\n  low_lengths: [4, 8]\n");
        assert!(pipeline.transforms[0].lower.is_empty());
        assert_eq!(pipeline.transforms[0].parameters.low_lengths, Some(vec![4, 8]));
    }

    #[test]
    fn test_unknown_transform_names_are_dropped() {
        let pipeline = parse_rendered_description("[0] shuffle\n  lower: [0]\n[1] xor\n  lower: [1]\n");
        assert_eq!(pipeline.kinds(), vec![TransformKind::Xor]);
        assert_eq!(pipeline.lower_dims(), vec![vec![1]]);
    }

    #[test]
    fn test_tuple_listing_is_not_a_marker() {
        let pipeline = parse_rendered_description("tuple<1 element> {\n  [0]: 42\n}");
        assert!(pipeline.transforms.is_empty());
    }

    #[test]
    fn test_empty_text() {
        assert_eq!(parse_rendered_description(""), TransformPipeline::default());
        assert_eq!(parse_ntransform("no counter"), None);
    }
}
