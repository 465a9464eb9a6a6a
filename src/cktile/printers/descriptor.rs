//! `tensor_descriptor` printer
//!
//! Counters come from the runtime members when there are any; transform
//! structure always comes from the type. In type-only mode the counters are
//! derived from the parsed pipeline instead.

use super::common::header;
use crate::cktile::config::PrinterConfig;
use crate::cktile::parsing::signature::{element_space_size, parse_pipeline};
use crate::cktile::pipeline::{format_list, PipelineKind, Transform, TransformParameters, TransformPipeline};
use crate::cktile::value::{Reading, TupleElement, ValueSource};

pub const NAME: &str = "tensor_descriptor";

/// Rendering for a descriptor whose counters are garbage
pub const UNINITIALIZED: &str = "tensor_descriptor{[UNINITIALIZED]}";

pub fn render(source: &ValueSource, config: &PrinterConfig) -> String {
    if source.is_type_only() {
        render_from_type(&source.type_name())
    } else {
        render_live(source, config)
    }
}

fn render_live(source: &ValueSource, config: &PrinterConfig) -> String {
    let limits = &config.limits;
    let type_str = source.type_name();

    let type_size = element_space_size(&type_str)
        .map(|size| Reading::checked(size, limits))
        .unwrap_or(Reading::Unavailable);
    let element_space = source.read_int("element_space_size_", limits).or(type_size);
    let ntransform = source.read_int("ntransform_", limits);
    let ndim_hidden = source.read_int("ndim_hidden_", limits);

    if is_uninitialized(&[element_space, ntransform, ndim_hidden]) {
        tracing::debug!("descriptor counters are not plausible");
        return UNINITIALIZED.to_string();
    }

    let mut out = header(NAME, false);
    out.push('\n');
    let counters = [
        ("element_space_size", element_space),
        ("ntransform", ntransform),
        ("ndim_hidden", ndim_hidden),
        ("ndim_top", source.read_int("ndim_top_", limits)),
        ("ndim_bottom", source.read_int("ndim_bottom_", limits)),
    ];
    for (label, reading) in counters {
        if reading.is_available() {
            out.push_str(&format!("  {}: {}\n", label, reading));
        }
    }

    let mut pipeline = parse_pipeline(&type_str, PipelineKind::Descriptor);
    apply_runtime_parameters(&mut pipeline, source);
    push_anchors(&mut out, &pipeline);

    if let Some(count) = ntransform.known().filter(|n| *n > 0) {
        let shown = pipeline.transforms.len().min(count as usize);
        out.push_str(&transform_listing(&pipeline.transforms[..shown]));
    }

    out.push('}');
    out
}

/// Descriptor block derived from the type string alone
pub fn render_from_type(type_str: &str) -> String {
    let pipeline = parse_pipeline(type_str, PipelineKind::Descriptor);

    let mut out = header(NAME, true);
    out.push('\n');
    if let Some(size) = element_space_size(type_str) {
        out.push_str(&format!("  element_space_size: {}\n", size));
    }
    out.push_str(&format!("  ntransform: {}\n", pipeline.transforms.len()));
    out.push_str(&format!("  ndim_hidden: {}\n", pipeline.hidden_dimension_count()));
    out.push_str(&format!("  ndim_top: {}\n", pipeline.top_dims.len()));
    out.push_str(&format!("  ndim_bottom: {}\n", pipeline.bottom_dims.len()));
    push_anchors(&mut out, &pipeline);
    out.push_str(&transform_listing(&pipeline.transforms));
    out.push('}');
    out
}

/// All core counters missing, or any of them out of bounds
fn is_uninitialized(readings: &[Reading]) -> bool {
    readings.iter().all(|r| *r == Reading::Unavailable)
        || readings.iter().any(|r| *r == Reading::Uninitialized)
}

pub(crate) fn push_anchors(out: &mut String, pipeline: &TransformPipeline) {
    if !pipeline.bottom_dims.is_empty() {
        out.push_str(&format!("  bottom_dimension_ids: {}\n", format_list(&pipeline.bottom_dims)));
    }
    if !pipeline.top_dims.is_empty() {
        out.push_str(&format!("  top_dimension_ids: {}\n", format_list(&pipeline.top_dims)));
    }
}

/// The `Transforms:` section shared by descriptors and adaptors
///
/// Empty `lower`/`upper` lists are left out; that is how a `replicate` with
/// no inputs reads back.
pub(crate) fn transform_listing(transforms: &[Transform]) -> String {
    if transforms.is_empty() {
        return String::new();
    }
    let mut out = String::from("\n  Transforms:\n");
    for (i, transform) in transforms.iter().enumerate() {
        out.push_str(&format!("    [{}] {}\n", i, transform.kind));
        if !transform.lower.is_empty() {
            out.push_str(&format!("        lower: {}\n", format_list(&transform.lower)));
        }
        if !transform.upper.is_empty() {
            out.push_str(&format!("        upper: {}\n", format_list(&transform.upper)));
        }
        for (label, values) in transform.parameters.entries() {
            out.push_str(&format!("        {}: {}\n", label, format_list(values)));
        }
    }
    out
}

/// Overlay lengths read from the `transforms_` member on the type-derived ones
pub(crate) fn apply_runtime_parameters(pipeline: &mut TransformPipeline, source: &ValueSource) {
    let runtime = runtime_parameters(source);
    for (transform, live) in pipeline.transforms.iter_mut().zip(runtime) {
        let from_type = std::mem::take(&mut transform.parameters);
        transform.parameters = live.or(from_type);
    }
}

fn runtime_parameters(source: &ValueSource) -> Vec<TransformParameters> {
    let Ok(transforms) = source.member("transforms_") else {
        return Vec::new();
    };
    transforms
        .tuple_elements()
        .into_iter()
        .map(|element| match element {
            TupleElement::Value(transform) => TransformParameters {
                up_lengths: int_list_member(&transform, "up_lengths_"),
                low_lengths: int_list_member(&transform, "low_lengths_"),
                coefficients: int_list_member(&transform, "coefficients_"),
            },
            TupleElement::Int(_) => TransformParameters::default(),
        })
        .collect()
}

fn int_list_member(transform: &ValueSource, name: &str) -> Option<Vec<i64>> {
    let values = transform.member(name).ok()?.int_tuple();
    if values.is_empty() {
        None
    } else {
        Some(values)
    }
}
