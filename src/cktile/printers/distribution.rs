//! `tile_distribution` and `tile_distribution_encoding` printers

use super::common::{access_failure, header, nest};
use super::{adaptor, descriptor};
use crate::cktile::config::PrinterConfig;
use crate::cktile::error::AccessError;
use crate::cktile::parsing::encoding::DistributionEncoding;
use crate::cktile::parsing::templates::find_template;
use crate::cktile::value::ValueSource;

pub const NAME: &str = "tile_distribution";
pub const ENCODING_NAME: &str = "tile_distribution_encoding";

/// Longest type prefix shown for a `ps_ys_to_xs_` that is not an adaptor
const TYPE_PREVIEW: usize = 50;

pub fn render(source: &ValueSource, config: &PrinterConfig) -> String {
    let type_str = source.type_name();

    let mut out = header(NAME, source.is_type_only());
    out.push('\n');

    if let Some(encoding) = DistributionEncoding::parse(&type_str) {
        out.push_str("  encoding: {\n");
        for line in encoding.lines() {
            out.push_str(&format!("    {}\n", line));
        }
        out.push_str("  }\n");
    }

    match source.member_or_type("ps_ys_to_xs_", adaptor::NAME) {
        Some(ps_ys_to_xs) => {
            let member_type = ps_ys_to_xs.type_name();
            out.push_str("\n  ps_ys_to_xs_: ");
            if find_template(&member_type, adaptor::NAME, 0).is_some() {
                out.push_str(&nest(&adaptor::render(&ps_ys_to_xs, config), "  "));
            } else {
                let preview: String = member_type.chars().take(TYPE_PREVIEW).collect();
                out.push_str(&format!("{{\n    type: {}...\n  }}", preview));
            }
            out.push('\n');
        }
        None => {
            let err = AccessError::MissingMember("ps_ys_to_xs_".to_string());
            out.push_str(&format!("  ps_ys_to_xs_: {}\n", access_failure(&err)));
        }
    }

    match source.member_or_type("ys_to_d_", descriptor::NAME) {
        Some(ys_to_d) => {
            out.push_str("\n  ys_to_d_: ");
            out.push_str(&nest(&descriptor::render(&ys_to_d, config), "  "));
            out.push('\n');
        }
        None => {
            let err = AccessError::MissingMember("ys_to_d_".to_string());
            out.push_str(&format!("  ys_to_d_: {}\n", access_failure(&err)));
        }
    }

    out.push('}');
    out
}

/// Encodings have no storage, so the type is all there is
pub fn render_encoding(source: &ValueSource) -> String {
    match DistributionEncoding::parse(&source.type_name()) {
        Some(encoding) => {
            let mut out = format!("{}{{\n", ENCODING_NAME);
            for line in encoding.lines() {
                out.push_str(&format!("  {}\n", line));
            }
            out.push('}');
            out
        }
        None => format!("{}{{}}", ENCODING_NAME),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODING: &str = "ck_tile::tile_distribution_encoding<ck_tile::sequence<>, \
        ck_tile::tuple<ck_tile::sequence<2, 8>, ck_tile::sequence<4, 16>>, \
        ck_tile::tuple<ck_tile::sequence<1, 2>>, \
        ck_tile::tuple<ck_tile::sequence<1, 1>>, \
        ck_tile::sequence<1, 2>, ck_tile::sequence<0, 0>>";

    fn distribution() -> String {
        format!(
            "ck_tile::tile_distribution<\
             ck_tile::tensor_adaptor<ck_tile::tuple<ck_tile::replicate<ck_tile::tuple<>>>, \
             ck_tile::tuple<ck_tile::sequence<>>, ck_tile::tuple<ck_tile::sequence<1>>, \
             ck_tile::sequence<0>, ck_tile::sequence<1>>, \
             ck_tile::tensor_descriptor<ck_tile::tuple<ck_tile::unmerge<ck_tile::tuple<ck_tile::constant<2>, \
             ck_tile::constant<4>>>>, ck_tile::tuple<ck_tile::sequence<0>>, \
             ck_tile::tuple<ck_tile::sequence<1, 2>>, ck_tile::sequence<1, 2>, ck_tile::constant<8l>>, \
             {}, ck_tile::tile_distribution_detail::dummy>",
            ENCODING
        )
    }

    #[test]
    fn test_encoding_block() {
        let text = render_encoding(&ValueSource::type_only(ENCODING));
        insta::assert_snapshot!(text, @r###"
        tile_distribution_encoding{
          HsLengthss: [[2, 8], [4, 16]]
          Ps2RHssMajor: [[1, 2]]
          Ps2RHssMinor: [[1, 1]]
          Ys2RHsMajor: [1, 2]
          Ys2RHsMinor: [0, 0]
          Ps mappings (with lengths):
            P[0]:
              -> H0[1] (length=8)
              -> H1[1] (length=16)
          Ys mappings (with lengths):
            Y[0] -> H0[0] (length=2)
            Y[1] -> H1[0] (length=4)
        }
        "###);
    }

    #[test]
    fn test_encoding_missing() {
        assert_eq!(
            render_encoding(&ValueSource::type_only("int")),
            "tile_distribution_encoding{}"
        );
    }

    #[test]
    fn test_type_only_distribution() {
        let text = render(&ValueSource::type_only(distribution()), &PrinterConfig::default());
        assert!(text.starts_with("tile_distribution [from type] {\n  encoding: {\n    HsLengthss: [[2, 8], [4, 16]]\n"));
        assert!(text.contains("\n  }\n\n  ps_ys_to_xs_: tensor_adaptor [from type] {\n    ntransform: 1\n"));
        assert!(text.contains("\n  ys_to_d_: tensor_descriptor [from type] {\n    element_space_size: 8\n"));
        assert!(text.contains("\n      [0] unmerge\n"));
        assert!(text.ends_with("\n  }\n}"));
    }

    #[test]
    fn test_without_members_or_embedded_types() {
        let text = render(&ValueSource::type_only("ck_tile::tile_distribution<x>"), &PrinterConfig::default());
        assert_eq!(
            text,
            "tile_distribution [from type] {\n  \
             ps_ys_to_xs_: [error: No member named 'ps_ys_to_xs_']\n  \
             ys_to_d_: [error: No member named 'ys_to_d_']\n}"
        );
    }
}
