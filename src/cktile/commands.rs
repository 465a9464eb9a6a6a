//! User-facing queries
//!
//! - [`print_value`]: render any value through the dispatch table
//! - [`type_print`]: render a type with no storage, resolving member aliases
//! - [`generate_mermaid`]: flow graph of a descriptor or adaptor
//! - [`resolve_pipeline`] / [`pipeline_report`]: the recovered pipeline itself
//!
//! Command failures are [`CommandError`] values; the CLI prints them as
//! `Error: <message>`.

use crate::cktile::config::PrinterConfig;
use crate::cktile::error::CommandError;
use crate::cktile::formats::to_mermaid;
use crate::cktile::graph::TransformGraph;
use crate::cktile::parsing::rendered::parse_rendered_description;
use crate::cktile::parsing::signature::parse_pipeline;
use crate::cktile::parsing::templates::{extract_full_template, find_template};
use crate::cktile::pipeline::{format_list, DimensionIndex, PipelineKind, TransformPipeline};
use crate::cktile::printers::{self, descriptor, distributed_tensor, distribution, view, PrinterKind};
use crate::cktile::value::ValueSource;
use serde::Serialize;

/// Render a value, falling back to the host's own rendering for unknown types
pub fn print_value(source: &ValueSource, config: &PrinterConfig) -> String {
    printers::render(source, config).unwrap_or_else(|| source.render())
}

/// Note shown for types no printer knows
fn unsupported_type(type_str: &str) -> String {
    format!(
        "Type: {}\nNote: Use type-print for type aliases with no runtime storage",
        type_str
    )
}

/// Type-only value for the first `name<...>` in `type_str`, or the whole string
fn embedded_or_whole(type_str: &str, name: &str) -> ValueSource<'static> {
    ValueSource::type_only(extract_full_template(type_str, name).unwrap_or_else(|| type_str.to_string()))
}

/// Print a value that only exists as a type
///
/// Member aliases such as `Window::BottomTensorView` are resolved to the
/// template they name before printing.
pub fn type_print(type_str: &str, config: &PrinterConfig) -> String {
    let type_str = type_str.trim();
    let has = |name: &str| find_template(type_str, name, 0).is_some();

    if type_str.contains("::BottomTensorView") {
        return view::render(&embedded_or_whole(type_str, view::NAME), config);
    }
    if type_str.contains("::TensorDesc") {
        return match extract_full_template(type_str, descriptor::NAME) {
            Some(desc) => descriptor::render_from_type(&desc),
            None => format!(
                "Type: {}\nNote: TensorDesc alias but no tensor_descriptor found in type",
                type_str
            ),
        };
    }
    if type_str.contains("::BufferView") {
        return view::describe_buffer_alias(type_str);
    }
    if type_str.contains("::WindowLengths") {
        let mut text = "WindowLengths type alias".to_string();
        if has("tuple") {
            text.push_str("\n  (tuple of window dimension sizes)");
        }
        return text;
    }
    if type_str.contains("::TileDistribution") || type_str.contains("::TileDstr") {
        return distribution::render(&embedded_or_whole(type_str, distribution::NAME), config);
    }

    let source = ValueSource::type_only(type_str);
    if has(distributed_tensor::NAME) {
        distributed_tensor::render(&source, config)
    } else if has(distribution::NAME) {
        distribution::render(&source, config)
    } else if has(view::NAME) {
        view::render(&source, config)
    } else if has(descriptor::NAME) {
        match extract_full_template(type_str, descriptor::NAME) {
            Some(desc) => descriptor::render_from_type(&desc),
            None => unsupported_type(type_str),
        }
    } else {
        unsupported_type(type_str)
    }
}

/// Recover the pipeline of a descriptor or adaptor value
///
/// The type string is tried first. When it yields no transforms, or only
/// transforms without dimension lists, rendered text is parsed instead: the
/// host's own rendering for live values, then the printer output.
pub fn resolve_pipeline(
    source: &ValueSource,
    config: &PrinterConfig,
) -> Result<(PipelineKind, TransformPipeline), CommandError> {
    let type_str = source.type_name();
    let kind = PipelineKind::detect(&type_str).ok_or(CommandError::UnsupportedType)?;
    let pipeline = parse_pipeline(&type_str, kind);

    if !pipeline.transforms.is_empty() && !pipeline.lacks_dimensions() {
        return Ok((kind, pipeline));
    }

    tracing::debug!(
        transforms = pipeline.transforms.len(),
        "type string has no dimension data, reading rendered text"
    );
    let printer = match kind {
        PipelineKind::Descriptor => PrinterKind::TensorDescriptor,
        PipelineKind::Adaptor => PrinterKind::TensorAdaptor,
    };
    let mut rendered = Vec::new();
    if !source.is_type_only() {
        rendered.push(source.render());
    }
    rendered.push(printers::render_as(printer, source, config));

    let recovered = rendered
        .iter()
        .map(|text| parse_rendered_description(text))
        .find(|candidate| !candidate.transforms.is_empty());

    match recovered {
        Some(recovered) => Ok((kind, recovered)),
        None if !pipeline.transforms.is_empty() => Ok((kind, pipeline)),
        None => Err(CommandError::NoTransforms),
    }
}

/// Mermaid flow graph of a descriptor or adaptor
pub fn generate_mermaid(source: &ValueSource, config: &PrinterConfig) -> Result<String, CommandError> {
    let (kind, pipeline) = resolve_pipeline(source, config)?;
    let graph = TransformGraph::from_pipeline(&pipeline);
    let disconnected = graph.disconnected_tops();
    if !disconnected.is_empty() {
        tracing::debug!(tops = ?disconnected, "top dimensions without producer");
    }
    Ok(to_mermaid(&graph, kind.title()))
}

/// Structured view of a recovered pipeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PipelineReport {
    pub kind: PipelineKind,
    #[serde(flatten)]
    pub pipeline: TransformPipeline,
    pub hidden_dimensions: usize,
    pub disconnected_tops: Vec<DimensionIndex>,
}

impl PipelineReport {
    pub fn new(kind: PipelineKind, pipeline: TransformPipeline) -> Self {
        let graph = TransformGraph::from_pipeline(&pipeline);
        PipelineReport {
            kind,
            hidden_dimensions: pipeline.hidden_dimension_count(),
            disconnected_tops: graph.disconnected_tops(),
            pipeline,
        }
    }

    /// Same layout as the descriptor and adaptor blocks
    pub fn to_text(&self) -> String {
        let mut out = format!("{} pipeline{{\n", self.kind.template_name());
        out.push_str(&format!("  ntransform: {}\n", self.pipeline.transforms.len()));
        out.push_str(&format!("  ndim_hidden: {}\n", self.hidden_dimensions));
        descriptor::push_anchors(&mut out, &self.pipeline);
        out.push_str(&descriptor::transform_listing(&self.pipeline.transforms));
        if !self.disconnected_tops.is_empty() {
            out.push_str(&format!(
                "\n  unreachable tops: {}\n",
                format_list(&self.disconnected_tops)
            ));
        }
        out.push('}');
        out
    }

    pub fn to_json(&self) -> Result<String, CommandError> {
        serde_json::to_string_pretty(self).map_err(|e| CommandError::Serialize(e.to_string()))
    }
}

pub fn pipeline_report(source: &ValueSource, config: &PrinterConfig) -> Result<PipelineReport, CommandError> {
    let (kind, pipeline) = resolve_pipeline(source, config)?;
    Ok(PipelineReport::new(kind, pipeline))
}

/// Pipeline recovered from already rendered text, as JSON
pub fn parse_rendered_json(text: &str) -> Result<String, CommandError> {
    let pipeline = parse_rendered_description(text);
    serde_json::to_string_pretty(&pipeline).map_err(|e| CommandError::Serialize(e.to_string()))
}
