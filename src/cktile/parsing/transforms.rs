//! Transform vocabulary matcher
//!
//! Walks the content of the transform tuple (the first parameter of a
//! descriptor or adaptor) and recognizes each element against a fixed,
//! ordered pattern table. The order is load-bearing: `merge_v2_magic_division`
//! must be tried before `merge`, and bare spellings are only accepted at an
//! identifier boundary so `merge<` is never read out of `unmerge<`.

use super::brackets::{find_matching_close, split_top_level};
use super::sequences::constant_tuple;
use super::templates::at_ident_boundary;
use crate::cktile::pipeline::{TransformKind, TransformParameters};
use std::ops::Range;

/// Pattern table in match precedence order, qualified spelling first
pub static TRANSFORM_PATTERNS: &[(&str, TransformKind)] = &[
    ("ck_tile::embed<", TransformKind::Embed),
    ("embed<", TransformKind::Embed),
    ("ck_tile::unmerge<", TransformKind::Unmerge),
    ("unmerge<", TransformKind::Unmerge),
    ("ck_tile::merge_v2_magic_division<", TransformKind::MergeV2),
    ("merge_v2_magic_division<", TransformKind::MergeV2),
    ("ck_tile::merge<", TransformKind::Merge),
    ("merge<", TransformKind::Merge),
    ("ck_tile::replicate<", TransformKind::Replicate),
    ("replicate<", TransformKind::Replicate),
    ("ck_tile::xor_t<", TransformKind::Xor),
    ("xor_t<", TransformKind::Xor),
    ("ck_tile::pass_through<", TransformKind::PassThrough),
    ("pass_through<", TransformKind::PassThrough),
    ("ck_tile::pad<", TransformKind::Pad),
    ("pad<", TransformKind::Pad),
    ("ck_tile::right_pad<", TransformKind::RightPad),
    ("right_pad<", TransformKind::RightPad),
    ("ck_tile::left_pad<", TransformKind::LeftPad),
    ("left_pad<", TransformKind::LeftPad),
    ("ck_tile::slice<", TransformKind::Slice),
    ("slice<", TransformKind::Slice),
    ("ck_tile::freeze<", TransformKind::Freeze),
    ("freeze<", TransformKind::Freeze),
];

/// One recognized transform and the bytes it occupies in the scanned text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformMatch {
    pub kind: TransformKind,
    pub span: Range<usize>,
}

impl TransformMatch {
    /// The matched `name<...>` text, qualifier included when present
    pub fn text<'a>(&self, source: &'a str) -> &'a str {
        &source[self.span.clone()]
    }
}

fn match_pattern_at(bytes: &[u8], text: &str, pos: usize) -> Option<(&'static str, TransformKind)> {
    if !at_ident_boundary(text, pos) {
        return None;
    }
    TRANSFORM_PATTERNS
        .iter()
        .find(|(pattern, _)| bytes[pos..].starts_with(pattern.as_bytes()))
        .copied()
}

/// Recognize every transform in a transform-tuple body, in declaration order
///
/// Each match consumes its whole sub-template. A sub-template whose brackets
/// never close is still reported, with a span running to the end of the
/// text, and ends the scan.
pub fn parse_transform_list(content: &str) -> Vec<TransformMatch> {
    let bytes = content.as_bytes();
    let mut matches = Vec::new();
    let mut pos = 0;

    while pos < bytes.len() {
        let Some((pattern, kind)) = match_pattern_at(bytes, content, pos) else {
            pos += 1;
            continue;
        };

        let open = pos + pattern.len() - 1;
        match find_matching_close(content, open) {
            Some(close) => {
                matches.push(TransformMatch {
                    kind,
                    span: pos..close + 1,
                });
                pos = close + 1;
                while pos < bytes.len() && matches!(bytes[pos], b',' | b' ' | b'\t' | b'\n') {
                    pos += 1;
                }
            }
            None => {
                tracing::debug!(transform = kind.name(), "unterminated transform template");
                matches.push(TransformMatch {
                    kind,
                    span: pos..bytes.len(),
                });
                pos = bytes.len();
            }
        }
    }

    matches
}

/// Shape parameters encoded as constant tuples in a transform's own template arguments
///
/// `template_text` is the full `name<...>` text of one transform. Tuples that
/// hold runtime lengths yield nothing, since their values only exist in a live
/// object.
pub fn type_parameters(kind: TransformKind, template_text: &str) -> TransformParameters {
    let Some(open) = template_text.find('<') else {
        return TransformParameters::default();
    };
    let Some(close) = find_matching_close(template_text, open) else {
        return TransformParameters::default();
    };
    let params = split_top_level(&template_text[open + 1..close]);
    let tuple_at = |index: usize| params.get(index).and_then(|p| constant_tuple(p));

    match kind {
        TransformKind::Embed => TransformParameters {
            up_lengths: tuple_at(0),
            coefficients: tuple_at(1),
            ..Default::default()
        },
        TransformKind::Unmerge | TransformKind::Replicate => TransformParameters {
            up_lengths: tuple_at(0),
            ..Default::default()
        },
        TransformKind::Merge | TransformKind::MergeV2 => TransformParameters {
            low_lengths: tuple_at(0),
            ..Default::default()
        },
        _ => TransformParameters::default(),
    }
}
