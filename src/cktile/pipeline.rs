//! Transform pipeline data model
//!
//! A ck_tile tensor descriptor or adaptor is a chain of coordinate transforms
//! threaded through a flat "hidden dimension" index space. Each transform
//! consumes some hidden indices (`lower`) and produces others (`upper`). The
//! bottom anchors face storage and the top anchors face the logical view.
//!
//! Values of these types are built per query, either from a type string
//! ([`crate::cktile::parsing::parse_pipeline`]) or from already rendered text
//! ([`crate::cktile::parsing::parse_rendered_description`]). Both produce the
//! same shape.

use serde::Serialize;
use std::fmt;

/// Position in the hidden-dimension index space
pub type DimensionIndex = i64;

/// The closed set of coordinate transforms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TransformKind {
    Embed,
    Unmerge,
    Merge,
    MergeV2,
    Replicate,
    Xor,
    PassThrough,
    Pad,
    RightPad,
    LeftPad,
    Slice,
    Freeze,
}

impl TransformKind {
    pub const ALL: [TransformKind; 12] = [
        TransformKind::Embed,
        TransformKind::Unmerge,
        TransformKind::Merge,
        TransformKind::MergeV2,
        TransformKind::Replicate,
        TransformKind::Xor,
        TransformKind::PassThrough,
        TransformKind::Pad,
        TransformKind::RightPad,
        TransformKind::LeftPad,
        TransformKind::Slice,
        TransformKind::Freeze,
    ];

    /// Display name, as printed in the `[i] <name>` transform listing
    pub fn name(&self) -> &'static str {
        match self {
            TransformKind::Embed => "embed",
            TransformKind::Unmerge => "unmerge",
            TransformKind::Merge => "merge",
            TransformKind::MergeV2 => "merge_v2",
            TransformKind::Replicate => "replicate",
            TransformKind::Xor => "xor",
            TransformKind::PassThrough => "pass_through",
            TransformKind::Pad => "pad",
            TransformKind::RightPad => "right_pad",
            TransformKind::LeftPad => "left_pad",
            TransformKind::Slice => "slice",
            TransformKind::Freeze => "freeze",
        }
    }

    /// Parse a display name back; accepts the `xor_t` template spelling too
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "xor_t" => Some(TransformKind::Xor),
            "merge_v2_magic_division" => Some(TransformKind::MergeV2),
            _ => Self::ALL.iter().copied().find(|kind| kind.name() == name),
        }
    }
}

impl fmt::Display for TransformKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Compile-time shape metadata attached to a transform
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformParameters {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub up_lengths: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub low_lengths: Option<Vec<i64>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub coefficients: Option<Vec<i64>>,
}

impl TransformParameters {
    pub fn is_empty(&self) -> bool {
        self.up_lengths.is_none() && self.low_lengths.is_none() && self.coefficients.is_none()
    }

    /// Labelled entries in display order; empty lists are skipped
    pub fn entries(&self) -> Vec<(&'static str, &[i64])> {
        [
            ("up_lengths", &self.up_lengths),
            ("low_lengths", &self.low_lengths),
            ("coefficients", &self.coefficients),
        ]
        .into_iter()
        .filter_map(|(label, values)| match values {
            Some(values) if !values.is_empty() => Some((label, values.as_slice())),
            _ => None,
        })
        .collect()
    }

    /// Fill the fields that are still missing from `other`
    pub fn or(self, other: TransformParameters) -> TransformParameters {
        TransformParameters {
            up_lengths: self.up_lengths.or(other.up_lengths),
            low_lengths: self.low_lengths.or(other.low_lengths),
            coefficients: self.coefficients.or(other.coefficients),
        }
    }
}

/// One coordinate transform with its hidden-dimension bindings
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Transform {
    pub kind: TransformKind,
    pub lower: Vec<DimensionIndex>,
    pub upper: Vec<DimensionIndex>,
    #[serde(skip_serializing_if = "TransformParameters::is_empty")]
    pub parameters: TransformParameters,
}

impl Transform {
    pub fn new(kind: TransformKind, lower: Vec<DimensionIndex>, upper: Vec<DimensionIndex>) -> Self {
        Transform {
            kind,
            lower,
            upper,
            parameters: TransformParameters::default(),
        }
    }

    pub fn with_parameters(mut self, parameters: TransformParameters) -> Self {
        self.parameters = parameters;
        self
    }
}

/// Which ck_tile template a pipeline was read from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PipelineKind {
    /// `tensor_descriptor<...>`: bottom anchor is implicitly `[0]`
    Descriptor,
    /// `tensor_adaptor<...>`: bottom and top anchors are explicit
    Adaptor,
}

impl PipelineKind {
    pub fn template_name(&self) -> &'static str {
        match self {
            PipelineKind::Descriptor => "tensor_descriptor",
            PipelineKind::Adaptor => "tensor_adaptor",
        }
    }

    /// Guess the kind from a type string; descriptors win when both appear
    pub fn detect(type_str: &str) -> Option<Self> {
        use crate::cktile::parsing::templates::{find_template, outer_template_name};

        match outer_template_name(type_str) {
            Some("tensor_descriptor") => return Some(PipelineKind::Descriptor),
            Some("tensor_adaptor") => return Some(PipelineKind::Adaptor),
            _ => {}
        }
        if find_template(type_str, "tensor_descriptor", 0).is_some() {
            Some(PipelineKind::Descriptor)
        } else if find_template(type_str, "tensor_adaptor", 0).is_some() {
            Some(PipelineKind::Adaptor)
        } else {
            None
        }
    }

    /// Title used for diagrams of this kind
    pub fn title(&self) -> &'static str {
        match self {
            PipelineKind::Descriptor => "Tensor Descriptor Transform Flow",
            PipelineKind::Adaptor => "Tensor Adaptor Transform Flow",
        }
    }
}

/// An ordered transform chain plus its anchors
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct TransformPipeline {
    pub transforms: Vec<Transform>,
    pub bottom_dims: Vec<DimensionIndex>,
    pub top_dims: Vec<DimensionIndex>,
}

impl TransformPipeline {
    /// Zip parallel lists into transforms, padding missing dimension lists with empties
    ///
    /// The transform list decides the length; extra dimension lists are ignored.
    pub fn from_parts(
        kinds: &[TransformKind],
        lower: &[Vec<DimensionIndex>],
        upper: &[Vec<DimensionIndex>],
        bottom_dims: Vec<DimensionIndex>,
        top_dims: Vec<DimensionIndex>,
    ) -> Self {
        let transforms = kinds
            .iter()
            .enumerate()
            .map(|(i, kind)| {
                Transform::new(
                    *kind,
                    lower.get(i).cloned().unwrap_or_default(),
                    upper.get(i).cloned().unwrap_or_default(),
                )
            })
            .collect();

        TransformPipeline {
            transforms,
            bottom_dims,
            top_dims,
        }
    }

    pub fn kinds(&self) -> Vec<TransformKind> {
        self.transforms.iter().map(|t| t.kind).collect()
    }

    pub fn lower_dims(&self) -> Vec<Vec<DimensionIndex>> {
        self.transforms.iter().map(|t| t.lower.clone()).collect()
    }

    pub fn upper_dims(&self) -> Vec<Vec<DimensionIndex>> {
        self.transforms.iter().map(|t| t.upper.clone()).collect()
    }

    /// True when no transform carries any dimension data
    ///
    /// This is what alias-heavy instantiations look like after the debugger
    /// collapsed their sequences; callers use it to decide on a fallback.
    pub fn lacks_dimensions(&self) -> bool {
        self.transforms
            .iter()
            .all(|t| t.lower.is_empty() && t.upper.is_empty())
    }

    /// Number of hidden dimensions implied by the largest index seen
    pub fn hidden_dimension_count(&self) -> usize {
        self.transforms
            .iter()
            .flat_map(|t| t.lower.iter().chain(t.upper.iter()))
            .chain(self.bottom_dims.iter())
            .chain(self.top_dims.iter())
            .filter(|dim| **dim >= 0)
            .max()
            .map(|max| *max as usize + 1)
            .unwrap_or(0)
    }
}

/// `[1, 2, 3]`, the list form used throughout the rendered output
pub fn format_list<T: fmt::Display>(values: &[T]) -> String {
    let items: Vec<String> = values.iter().map(|v| v.to_string()).collect();
    format!("[{}]", items.join(", "))
}

/// `[[1, 2], [3]]`
pub fn format_nested(rows: &[Vec<i64>]) -> String {
    let items: Vec<String> = rows.iter().map(|row| format_list(row)).collect();
    format!("[{}]", items.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_lists() {
        assert_eq!(format_list(&[1, 2, 3]), "[1, 2, 3]");
        assert_eq!(format_list::<i64>(&[]), "[]");
        assert_eq!(format_nested(&[vec![1, 2], vec![], vec![3]]), "[[1, 2], [], [3]]");
    }

    #[test]
    fn test_kind_names_round_trip() {
        for kind in TransformKind::ALL {
            assert_eq!(TransformKind::from_name(kind.name()), Some(kind));
        }
        assert_eq!(TransformKind::from_name("xor_t"), Some(TransformKind::Xor));
        assert_eq!(TransformKind::from_name("shuffle"), None);
    }

    #[test]
    fn test_kind_serializes_as_display_name() {
        let json = serde_json::to_string(&TransformKind::MergeV2).unwrap();
        assert_eq!(json, "\"merge_v2\"");
        let json = serde_json::to_string(&TransformKind::PassThrough).unwrap();
        assert_eq!(json, "\"pass_through\"");
    }

    #[test]
    fn test_from_parts_pads_missing_lists() {
        let pipeline = TransformPipeline::from_parts(
            &[TransformKind::Replicate, TransformKind::Unmerge],
            &[vec![]],
            &[vec![1], vec![2, 3], vec![9]],
            vec![0],
            vec![2, 3],
        );
        assert_eq!(pipeline.transforms.len(), 2);
        assert_eq!(pipeline.lower_dims(), vec![Vec::<i64>::new(), Vec::new()]);
        assert_eq!(pipeline.upper_dims(), vec![vec![1], vec![2, 3]]);
    }

    #[test]
    fn test_hidden_dimension_count() {
        let pipeline = TransformPipeline::from_parts(
            &[TransformKind::Embed],
            &[vec![0]],
            &[vec![1, 2]],
            vec![0],
            vec![1, 2],
        );
        assert_eq!(pipeline.hidden_dimension_count(), 3);
        assert_eq!(TransformPipeline::default().hidden_dimension_count(), 0);
    }

    #[test]
    fn test_lacks_dimensions() {
        let pipeline = TransformPipeline::from_parts(
            &[TransformKind::Embed, TransformKind::PassThrough],
            &[],
            &[],
            vec![0],
            vec![],
        );
        assert!(pipeline.lacks_dimensions());
    }

    #[test]
    fn test_parameter_entries_skip_empty() {
        let params = TransformParameters {
            up_lengths: Some(vec![8, 128]),
            low_lengths: Some(vec![]),
            coefficients: Some(vec![128, 1]),
        };
        let labels: Vec<&str> = params.entries().into_iter().map(|(l, _)| l).collect();
        assert_eq!(labels, vec!["up_lengths", "coefficients"]);
    }

    #[test]
    fn test_detect_kind() {
        assert_eq!(
            PipelineKind::detect("ck_tile::tensor_adaptor<a, b, c, d, e>"),
            Some(PipelineKind::Adaptor)
        );
        assert_eq!(
            PipelineKind::detect("ck_tile::tensor_view<ck_tile::tensor_descriptor<x>, y>"),
            Some(PipelineKind::Descriptor)
        );
        assert_eq!(PipelineKind::detect("int"), None);
    }
}
