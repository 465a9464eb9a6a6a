//! Descriptor and adaptor parameter layouts
//!
//! Both templates start with the same three tuples:
//!
//! ```text
//! tensor_descriptor<Transforms, LowerDimensionHiddenIdss, UpperDimensionHiddenIdss,
//!                   TopDimensionHiddenIds, ElementSpaceSize, ...>
//! tensor_adaptor<Transforms, LowerDimensionHiddenIdss, UpperDimensionHiddenIdss,
//!                BottomDimensionHiddenIds, TopDimensionHiddenIds>
//! ```
//!
//! A descriptor never spells out its bottom anchor: it is always hidden
//! dimension `[0]`, the flat storage offset.

use super::brackets::split_top_level;
use super::sequences::{constant_argument, parse_dimension_sequences, sequence_argument};
use super::templates::{find_template, template_argument};
use super::transforms::{parse_transform_list, type_parameters};
use crate::cktile::pipeline::{DimensionIndex, PipelineKind, TransformPipeline};

/// Bottom anchor every descriptor uses
pub const DESCRIPTOR_BOTTOM: [DimensionIndex; 1] = [0];

/// Top-level parameters of the first `kind` template in `type_str`
fn layout_params(type_str: &str, kind: PipelineKind) -> Option<Vec<&str>> {
    let span = find_template(type_str, kind.template_name(), 0)?;
    Some(split_top_level(span.content(type_str)))
}

/// Read the transform pipeline of a descriptor or adaptor from its type
///
/// The template may be nested anywhere in `type_str` (a view, a window, a
/// distribution); the first occurrence is used. Transforms whose lower or
/// upper sequence is missing get empty lists, and parameters come from
/// constant tuples in each transform's own arguments.
pub fn parse_pipeline(type_str: &str, kind: PipelineKind) -> TransformPipeline {
    let Some(params) = layout_params(type_str, kind) else {
        tracing::debug!(kind = kind.template_name(), "template not found in type string");
        return TransformPipeline::default();
    };

    let tuple_param = |index: usize| {
        params
            .get(index)
            .and_then(|param| template_argument(param, "tuple"))
            .unwrap_or("")
    };

    let transforms_content = tuple_param(0);
    let matches = parse_transform_list(transforms_content);
    let kinds: Vec<_> = matches.iter().map(|m| m.kind).collect();
    let lower = parse_dimension_sequences(tuple_param(1));
    let upper = parse_dimension_sequences(tuple_param(2));

    let (bottom_dims, top_dims) = anchors(&params, kind);

    let mut pipeline = TransformPipeline::from_parts(&kinds, &lower, &upper, bottom_dims, top_dims);
    for (transform, found) in pipeline.transforms.iter_mut().zip(&matches) {
        transform.parameters = type_parameters(found.kind, found.text(transforms_content));
    }

    tracing::trace!(
        kind = kind.template_name(),
        transforms = pipeline.transforms.len(),
        lower_lists = lower.len(),
        upper_lists = upper.len(),
        "parsed pipeline signature"
    );
    pipeline
}

fn anchors(params: &[&str], kind: PipelineKind) -> (Vec<DimensionIndex>, Vec<DimensionIndex>) {
    let sequences: Vec<Vec<DimensionIndex>> = params
        .iter()
        .skip(3)
        .filter_map(|param| sequence_argument(param))
        .collect();

    match kind {
        PipelineKind::Descriptor => {
            let top = sequences.into_iter().next().unwrap_or_default();
            (DESCRIPTOR_BOTTOM.to_vec(), top)
        }
        PipelineKind::Adaptor => match sequences.len() {
            0 | 1 => (Vec::new(), Vec::new()),
            n => (sequences[n - 2].clone(), sequences[n - 1].clone()),
        },
    }
}

/// `ElementSpaceSize` of the first descriptor in `type_str`, when it is a compile-time constant
pub fn element_space_size(type_str: &str) -> Option<i64> {
    layout_params(type_str, PipelineKind::Descriptor)?
        .iter()
        .skip(3)
        .find_map(|param| constant_argument(param))
}
