//! `tile_window` printers
//!
//! Three variants share one layout:
//!
//! ```text
//! tile_window_with_static_lengths<BottomTensorView, WindowLengths>
//! tile_window_with_static_distribution<BottomTensorView, WindowLengths, StaticTileDistribution, NumCoord>
//! tile_window<...>
//! ```
//!
//! Window dimensions are the constant `WindowLengths` tuple.

use super::common::{access_failure, data_type, header, nest};
use super::{distribution, view};
use crate::cktile::config::PrinterConfig;
use crate::cktile::error::AccessError;
use crate::cktile::parsing::brackets::split_top_level;
use crate::cktile::parsing::sequences::constant_tuple;
use crate::cktile::parsing::templates::{find_template, TemplateSpan};
use crate::cktile::value::ValueSource;

pub const STATIC_DISTRIBUTION: &str = "tile_window_with_static_distribution";
pub const STATIC_LENGTHS: &str = "tile_window_with_static_lengths";
pub const PLAIN: &str = "tile_window";

const VARIANTS: [&str; 3] = [STATIC_DISTRIBUTION, STATIC_LENGTHS, PLAIN];

fn variant(type_str: &str) -> (&'static str, Option<TemplateSpan>) {
    VARIANTS
        .iter()
        .find_map(|name| find_template(type_str, name, 0).map(|span| (*name, Some(span))))
        .unwrap_or((PLAIN, None))
}

/// `[A x B]` from the `WindowLengths` parameter
fn window_dims(type_str: &str, span: TemplateSpan) -> Option<String> {
    let params = split_top_level(span.content(type_str));
    let lengths = constant_tuple(params.get(1)?)?;
    if lengths.is_empty() {
        return None;
    }
    let joined: Vec<String> = lengths.iter().map(|n| n.to_string()).collect();
    Some(format!("[{}]", joined.join(" x ")))
}

pub fn render(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();
    let (name, span) = variant(&type_str);

    let mut out = header(name, source.is_type_only());
    out.push('\n');
    if let Some(data_type) = data_type(&type_str) {
        out.push_str(&format!("  data_type: {}\n", data_type));
    }
    if let Some(dims) = span.and_then(|span| window_dims(&type_str, span)) {
        out.push_str(&format!("  window_dims: {}\n", dims));
    }

    if name == STATIC_DISTRIBUTION {
        match source.member_or_type("tile_dstr_", distribution::NAME) {
            Some(dstr) => {
                out.push_str("\n  tile_dstr_: ");
                out.push_str(&nest(&distribution::render(&dstr, config), "  "));
                out.push('\n');
            }
            None => {
                let err = AccessError::MissingMember("tile_dstr_".to_string());
                out.push_str(&format!("  tile_dstr_: {}\n", access_failure(&err)));
            }
        }
    }

    if let Some(bottom_view) = source.member_or_type("bottom_tensor_view_", view::NAME) {
        out.push_str("\n  bottom_tensor_view_: ");
        out.push_str(&nest(&view::render(&bottom_view, config), "  "));
        out.push('\n');
    }

    if source.member("pre_computed_coords_").is_ok() {
        out.push_str("\n  pre_computed_coords_: present\n");
    }

    out.push('}');
    out
}
