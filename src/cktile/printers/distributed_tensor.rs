//! `static_distributed_tensor` printer
//!
//! With a readable thread buffer the block shows the data; otherwise it falls
//! back to the buffer size and the distribution recovered from the type.

use super::common::{data_type, header, nest};
use super::{containers, distribution};
use crate::cktile::config::PrinterConfig;
use crate::cktile::parsing::brackets::split_top_level;
use crate::cktile::parsing::sequences::parse_int_literal;
use crate::cktile::parsing::templates::{extract_full_template, extract_template};
use crate::cktile::value::ValueSource;

pub const NAME: &str = "static_distributed_tensor";

const TYPE_PRINT_HINT: &str = "(use 'type-print' to see tile_distribution encoding details)";

/// A thread buffer counts as live only when its first element can be read
fn live_thread_buffer<'s>(source: &'s ValueSource) -> Option<ValueSource<'s>> {
    let buffer = source.member("thread_buf_").ok()?;
    let readable = buffer
        .member("data")
        .and_then(|data| data.element(0).map(|_| ()))
        .is_ok();
    readable.then_some(buffer)
}

fn thread_buffer_size(buffer_type: &str) -> Option<i64> {
    let content = extract_template(buffer_type, "thread_buffer")?;
    split_top_level(content).get(1).and_then(|n| parse_int_literal(n))
}

pub fn render(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();

    if let Some(buffer) = live_thread_buffer(source) {
        let mut out = header(NAME, false);
        out.push('\n');
        if let Some(data_type) = data_type(&type_str) {
            out.push_str(&format!("  data_type: {}\n", data_type));
        }
        out.push_str("\n  thread_buffer: ");
        out.push_str(&nest(&containers::render_thread_buffer(&buffer, config), "  "));
        out.push_str("\n\n  ");
        out.push_str(TYPE_PRINT_HINT);
        out.push_str("\n}");
        return out;
    }

    let mut out = header(NAME, source.is_type_only());
    out.push('\n');
    if let Some(data_type) = data_type(&type_str) {
        out.push_str(&format!("  data_type: {}\n", data_type));
    }
    let buffer_size = source
        .member("thread_buf_")
        .ok()
        .and_then(|buffer| thread_buffer_size(&buffer.type_name()));
    if let Some(size) = buffer_size {
        out.push_str(&format!("  thread_buffer_size: {}\n", size));
    }

    if let Some(dist_type) = extract_full_template(&type_str, distribution::NAME) {
        let dist = ValueSource::type_only(dist_type);
        out.push_str("\n  tile_distribution: ");
        out.push_str(&nest(&distribution::render(&dist, config), "  "));
        out.push('\n');
    }

    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cktile::value::SnapshotValue;

    const TENSOR: &str = "ck_tile::static_distributed_tensor<float, ck_tile::tile_distribution<\
        ck_tile::tensor_adaptor<ck_tile::tuple<ck_tile::pass_through<int>>, \
        ck_tile::tuple<ck_tile::sequence<0>>, ck_tile::tuple<ck_tile::sequence<1>>, \
        ck_tile::sequence<0>, ck_tile::sequence<1>>, x, y>>";

    #[test]
    fn test_live_buffer() {
        let buffer = SnapshotValue::new("ck_tile::thread_buffer<float, 2>").with_member(
            "data",
            SnapshotValue::new("float[2]").with_elements(vec![
                SnapshotValue::new("float").with_display("0.5"),
                SnapshotValue::new("float").with_display("1.5"),
            ]),
        );
        let snapshot = SnapshotValue::new(TENSOR).with_member("thread_buf_", buffer);
        let text = render(&ValueSource::live(&snapshot), &PrinterConfig::default());
        insta::assert_snapshot!(text, @r###"
        static_distributed_tensor{
          data_type: float

          thread_buffer: thread_buffer<float, 2> {
            size: 2
            data (first 2): [0.5, 1.5]
          }

          (use 'type-print' to see tile_distribution encoding details)
        }
        "###);
    }

    #[test]
    fn test_type_only_falls_back_to_distribution() {
        let text = render(&ValueSource::type_only(TENSOR), &PrinterConfig::default());
        assert!(text.starts_with("static_distributed_tensor [from type] {\n  data_type: float\n"));
        assert!(text.contains("\n  tile_distribution: tile_distribution [from type] {\n"));
        assert!(text.contains("      [0] pass_through\n"));
        assert!(!text.contains("thread_buffer_size"));
    }

    #[test]
    fn test_unreadable_buffer_shows_size() {
        let snapshot = SnapshotValue::new(TENSOR)
            .with_member("thread_buf_", SnapshotValue::new("ck_tile::thread_buffer<float, 16>"));
        let text = render(&ValueSource::live(&snapshot), &PrinterConfig::default());
        assert!(text.starts_with("static_distributed_tensor{\n  data_type: float\n  thread_buffer_size: 16\n"));
    }
}
