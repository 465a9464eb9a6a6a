//! `tensor_adaptor` printer

use super::common::header;
use super::descriptor::{apply_runtime_parameters, push_anchors, transform_listing};
use crate::cktile::config::PrinterConfig;
use crate::cktile::parsing::signature::parse_pipeline;
use crate::cktile::pipeline::PipelineKind;
use crate::cktile::value::ValueSource;

pub const NAME: &str = "tensor_adaptor";

/// Adaptors carry no runtime counters; everything but the lengths comes from the type
pub fn render(source: &ValueSource, _config: &PrinterConfig) -> String {
    let mut pipeline = parse_pipeline(&source.type_name(), PipelineKind::Adaptor);
    apply_runtime_parameters(&mut pipeline, source);

    let mut out = header(NAME, source.is_type_only());
    out.push('\n');
    out.push_str(&format!("  ntransform: {}\n", pipeline.transforms.len()));
    push_anchors(&mut out, &pipeline);
    out.push_str(&transform_listing(&pipeline.transforms));
    out.push('}');
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    const ADAPTOR: &str = "ck_tile::tensor_adaptor<\
        ck_tile::tuple<ck_tile::replicate<ck_tile::tuple<>>, \
        ck_tile::unmerge<ck_tile::tuple<ck_tile::constant<4>, ck_tile::constant<16>>>>, \
        ck_tile::tuple<ck_tile::sequence<>, ck_tile::sequence<0>>, \
        ck_tile::tuple<ck_tile::sequence<1>, ck_tile::sequence<2, 3>>, \
        ck_tile::sequence<0>, ck_tile::sequence<1, 2, 3>>";

    #[test]
    fn test_adaptor_block() {
        let text = render(&ValueSource::type_only(ADAPTOR), &PrinterConfig::default());
        insta::assert_snapshot!(text, @r###"
        tensor_adaptor [from type] {
          ntransform: 2
          bottom_dimension_ids: [0]
          top_dimension_ids: [1, 2, 3]

          Transforms:
            [0] replicate
                upper: [1]
            [1] unmerge
                lower: [0]
                upper: [2, 3]
                up_lengths: [4, 16]
        }
        "###);
    }

    #[test]
    fn test_not_an_adaptor() {
        let text = render(&ValueSource::type_only("int"), &PrinterConfig::default());
        assert_eq!(text, "tensor_adaptor [from type] {\n  ntransform: 0\n}");
    }
}
