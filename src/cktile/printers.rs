//! Text printers for ck_tile values
//!
//! Every printer takes a [`ValueSource`] and returns one multi-line block.
//! Printers never fail: members that cannot be read are either derived from
//! the type string or left out.
//!
//! Dispatch goes through [`PRINTER_TABLE`], an ordered list of template names.
//! Types nest heavily (a window holds a view, which holds a descriptor), so
//! lookup first tries the outermost template name and only then falls back to
//! the first table entry found anywhere in the type, most specific first.

pub mod adaptor;
pub mod common;
pub mod containers;
pub mod coordinate;
pub mod descriptor;
pub mod distributed_tensor;
pub mod distribution;
pub mod view;
pub mod window;

use crate::cktile::config::PrinterConfig;
use crate::cktile::parsing::templates::{
    bare_name, find_template, mentions_template, outer_template_name,
};
use crate::cktile::value::{strip_cv_ref, ValueSource};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PrinterKind {
    TileWindow,
    StaticDistributedTensor,
    TileDistribution,
    DistributionEncoding,
    TensorView,
    AdaptorCoordinate,
    TensorCoordinate,
    TensorAdaptor,
    TensorDescriptor,
    ThreadBuffer,
    Array,
    Tuple,
}

impl PrinterKind {
    pub fn name(&self) -> &'static str {
        match self {
            PrinterKind::TileWindow => "tile_window",
            PrinterKind::StaticDistributedTensor => "static_distributed_tensor",
            PrinterKind::TileDistribution => "tile_distribution",
            PrinterKind::DistributionEncoding => "tile_distribution_encoding",
            PrinterKind::TensorView => "tensor_view",
            PrinterKind::AdaptorCoordinate => "tensor_adaptor_coordinate",
            PrinterKind::TensorCoordinate => "tensor_coordinate",
            PrinterKind::TensorAdaptor => "tensor_adaptor",
            PrinterKind::TensorDescriptor => "tensor_descriptor",
            PrinterKind::ThreadBuffer => "thread_buffer",
            PrinterKind::Array => "array",
            PrinterKind::Tuple => "tuple",
        }
    }
}

impl fmt::Display for PrinterKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Template names and their printers, most specific first
///
/// A window contains a view and a distribution, a view contains a
/// descriptor, so containers of other printable types come before them.
pub static PRINTER_TABLE: &[(&str, PrinterKind)] = &[
    ("tile_window_with_static_distribution", PrinterKind::TileWindow),
    ("tile_window_with_static_lengths", PrinterKind::TileWindow),
    ("tile_window", PrinterKind::TileWindow),
    ("static_distributed_tensor", PrinterKind::StaticDistributedTensor),
    ("tile_distribution", PrinterKind::TileDistribution),
    ("tile_distribution_encoding", PrinterKind::DistributionEncoding),
    ("tensor_view", PrinterKind::TensorView),
    ("tensor_adaptor_coordinate", PrinterKind::AdaptorCoordinate),
    ("tensor_coordinate", PrinterKind::TensorCoordinate),
    ("tensor_adaptor", PrinterKind::TensorAdaptor),
    ("tensor_descriptor", PrinterKind::TensorDescriptor),
    ("thread_buffer", PrinterKind::ThreadBuffer),
    ("multi_index", PrinterKind::Array),
    ("array", PrinterKind::Array),
    ("tuple", PrinterKind::Tuple),
];

/// Pick the printer for a type string
///
/// The outer template name wins. Otherwise the first table entry found inside
/// the type is used, with complete `name<...>` spans tried before truncated ones.
pub fn printer_for(type_str: &str) -> Option<PrinterKind> {
    let type_str = strip_cv_ref(type_str);

    if let Some(outer) = outer_template_name(type_str) {
        let outer = bare_name(outer);
        if let Some((_, kind)) = PRINTER_TABLE.iter().find(|(name, _)| *name == outer) {
            return Some(*kind);
        }
    }

    PRINTER_TABLE
        .iter()
        .find(|(name, _)| find_template(type_str, name, 0).is_some())
        .or_else(|| PRINTER_TABLE.iter().find(|(name, _)| mentions_template(type_str, name)))
        .map(|(_, kind)| *kind)
}

/// Render a value with a specific printer
pub fn render_as(kind: PrinterKind, source: &ValueSource, config: &PrinterConfig) -> String {
    match kind {
        PrinterKind::TileWindow => window::render(source, config),
        PrinterKind::StaticDistributedTensor => distributed_tensor::render(source, config),
        PrinterKind::TileDistribution => distribution::render(source, config),
        PrinterKind::DistributionEncoding => distribution::render_encoding(source),
        PrinterKind::TensorView => view::render(source, config),
        PrinterKind::AdaptorCoordinate => coordinate::render_adaptor_coordinate(source, config),
        PrinterKind::TensorCoordinate => coordinate::render_tensor_coordinate(source, config),
        PrinterKind::TensorAdaptor => adaptor::render(source, config),
        PrinterKind::TensorDescriptor => descriptor::render(source, config),
        PrinterKind::ThreadBuffer => containers::render_thread_buffer(source, config),
        PrinterKind::Array => containers::render_array(source, config),
        PrinterKind::Tuple => containers::render_tuple(source, config),
    }
}

/// Render a value through the dispatch table
///
/// Returns `None` when no printer claims the type.
pub fn render(source: &ValueSource, config: &PrinterConfig) -> Option<String> {
    let type_name = source.type_name();
    let kind = printer_for(&type_name)?;
    tracing::trace!(printer = kind.name(), "dispatching");
    Some(render_as(kind, source, config))
}

/// The dispatch table, one line per pattern
pub fn describe_table() -> String {
    let mut lines = vec!["Supported printer types (in dispatch order):".to_string()];
    for (pattern, kind) in PRINTER_TABLE {
        lines.push(format!("  {:50} -> {}", format!("{}<", pattern), kind));
    }
    lines.join("\n")
}
