//! `tile_distribution_encoding` parameters
//!
//! ```text
//! tile_distribution_encoding<RsLengths, HsLengthss, Ps2RHssMajor, Ps2RHssMinor,
//!                            Ys2RHsMajor, Ys2RHsMinor>
//! ```
//!
//! R is the replication space, H the per-axis hierarchical shape. P and Y
//! dimensions point into R/H space through (major, minor) pairs: major 0 is R,
//! major `k > 0` is row `k - 1` of `HsLengthss`.

use super::sequences::{parse_dimension_sequences, sequence_argument};
use super::templates::{find_template, template_argument};
use super::brackets::split_top_level;
use crate::cktile::pipeline::{format_list, format_nested};
use serde::Serialize;

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct DistributionEncoding {
    pub rs_lengths: Vec<i64>,
    pub hs_lengthss: Vec<Vec<i64>>,
    pub ps2rh_major: Vec<Vec<i64>>,
    pub ps2rh_minor: Vec<Vec<i64>>,
    pub ys2rh_major: Vec<i64>,
    pub ys2rh_minor: Vec<i64>,
}

impl DistributionEncoding {
    /// Read the first `tile_distribution_encoding<...>` in a type string
    pub fn parse(type_str: &str) -> Option<Self> {
        let span = find_template(type_str, "tile_distribution_encoding", 0)?;
        let params = split_top_level(span.content(type_str));

        let sequence_at = |index: usize| {
            params
                .get(index)
                .and_then(|p| sequence_argument(p))
                .unwrap_or_default()
        };
        let tuple_at = |index: usize| {
            params
                .get(index)
                .and_then(|p| template_argument(p, "tuple"))
                .map(parse_dimension_sequences)
                .unwrap_or_default()
        };

        Some(DistributionEncoding {
            rs_lengths: sequence_at(0),
            hs_lengthss: tuple_at(1),
            ps2rh_major: tuple_at(2),
            ps2rh_minor: tuple_at(3),
            ys2rh_major: sequence_at(4),
            ys2rh_minor: sequence_at(5),
        })
    }

    /// Length of the R/H dimension addressed by a (major, minor) pair
    pub fn rh_length(&self, major: i64, minor: i64) -> Option<i64> {
        let minor = usize::try_from(minor).ok()?;
        if major == 0 {
            return self.rs_lengths.get(minor).copied();
        }
        let row = usize::try_from(major.checked_sub(1)?).ok()?;
        self.hs_lengthss.get(row)?.get(minor).copied()
    }

    fn rh_label(&self, major: i64, minor: i64) -> String {
        let target = if major == 0 {
            format!("R[{}]", minor)
        } else {
            match major.checked_sub(1) {
                Some(row) => format!("H{}[{}]", row, minor),
                None => format!("H?[{}]", minor),
            }
        };
        match self.rh_length(major, minor) {
            Some(length) => format!("{} (length={})", target, length),
            None => target,
        }
    }

    /// Readable lines, unindented at the top level
    ///
    /// Raw parameter lists come first, then the P and Y mappings resolved to
    /// their R/H targets and lengths. Empty parameters are left out.
    pub fn lines(&self) -> Vec<String> {
        let mut lines = Vec::new();

        if !self.rs_lengths.is_empty() {
            lines.push(format!("RsLengths: {}", format_list(&self.rs_lengths)));
        }
        if !self.hs_lengthss.is_empty() {
            lines.push(format!("HsLengthss: {}", format_nested(&self.hs_lengthss)));
        }

        let has_ps = !self.ps2rh_major.is_empty() && !self.ps2rh_minor.is_empty();
        let has_ys = !self.ys2rh_major.is_empty() && !self.ys2rh_minor.is_empty();

        if has_ps {
            lines.push(format!("Ps2RHssMajor: {}", format_nested(&self.ps2rh_major)));
            lines.push(format!("Ps2RHssMinor: {}", format_nested(&self.ps2rh_minor)));
        }
        if has_ys {
            lines.push(format!("Ys2RHsMajor: {}", format_list(&self.ys2rh_major)));
            lines.push(format!("Ys2RHsMinor: {}", format_list(&self.ys2rh_minor)));
        }

        if has_ps {
            lines.push("Ps mappings (with lengths):".to_string());
            for (p, (majors, minors)) in self.ps2rh_major.iter().zip(&self.ps2rh_minor).enumerate() {
                lines.push(format!("  P[{}]:", p));
                for (major, minor) in majors.iter().zip(minors) {
                    lines.push(format!("    -> {}", self.rh_label(*major, *minor)));
                }
            }
        }
        if has_ys {
            lines.push("Ys mappings (with lengths):".to_string());
            for (y, (major, minor)) in self.ys2rh_major.iter().zip(&self.ys2rh_minor).enumerate() {
                lines.push(format!("  Y[{}] -> {}", y, self.rh_label(*major, *minor)));
            }
        }

        lines
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ENCODING: &str = "ck_tile::tile_distribution_encoding<ck_tile::sequence<1>, \
        ck_tile::tuple<ck_tile::sequence<4, 2, 8>, ck_tile::sequence<4, 16>>, \
        ck_tile::tuple<ck_tile::sequence<1, 2>, ck_tile::sequence<1, 2>>, \
        ck_tile::tuple<ck_tile::sequence<1, 0>, ck_tile::sequence<2, 1>>, \
        ck_tile::sequence<1, 2>, ck_tile::sequence<0, 1>>";

    #[test]
    fn test_parse_positions() {
        let encoding = DistributionEncoding::parse(ENCODING).unwrap();
        assert_eq!(encoding.rs_lengths, vec![1]);
        assert_eq!(encoding.hs_lengthss, vec![vec![4, 2, 8], vec![4, 16]]);
        assert_eq!(encoding.ps2rh_major, vec![vec![1, 2], vec![1, 2]]);
        assert_eq!(encoding.ps2rh_minor, vec![vec![1, 0], vec![2, 1]]);
        assert_eq!(encoding.ys2rh_major, vec![1, 2]);
        assert_eq!(encoding.ys2rh_minor, vec![0, 1]);
    }

    #[test]
    fn test_rh_length() {
        let encoding = DistributionEncoding::parse(ENCODING).unwrap();
        assert_eq!(encoding.rh_length(0, 0), Some(1));
        assert_eq!(encoding.rh_length(1, 2), Some(8));
        assert_eq!(encoding.rh_length(2, 1), Some(16));
        assert_eq!(encoding.rh_length(3, 0), None);
        assert_eq!(encoding.rh_length(1, -1), None);
        assert_eq!(encoding.rh_length(-1, 0), None);
    }

    #[test]
    fn test_extreme_major_does_not_overflow() {
        let encoding = DistributionEncoding::parse(
            "ck_tile::tile_distribution_encoding<ck_tile::sequence<>, \
             ck_tile::tuple<ck_tile::sequence<4>>, ck_tile::tuple<>, ck_tile::tuple<>, \
             ck_tile::sequence<-9223372036854775808>, ck_tile::sequence<0>>",
        )
        .unwrap();
        assert_eq!(encoding.rh_length(i64::MIN, 0), None);
        assert_eq!(encoding.lines().last().map(String::as_str), Some("  Y[0] -> H?[0]"));
    }

    #[test]
    fn test_lines() {
        let encoding = DistributionEncoding::parse(ENCODING).unwrap();
        insta::assert_snapshot!(encoding.lines().join("\n"), @r###"
        RsLengths: [1]
        HsLengthss: [[4, 2, 8], [4, 16]]
        Ps2RHssMajor: [[1, 2], [1, 2]]
        Ps2RHssMinor: [[1, 0], [2, 1]]
        Ys2RHsMajor: [1, 2]
        Ys2RHsMinor: [0, 1]
        Ps mappings (with lengths):
          P[0]:
            -> H0[1] (length=2)
            -> H1[0] (length=4)
          P[1]:
            -> H0[2] (length=8)
            -> H1[1] (length=16)
        Ys mappings (with lengths):
          Y[0] -> H0[0] (length=4)
          Y[1] -> H1[1] (length=16)
        "###);
    }

    #[test]
    fn test_empty_replication_is_omitted() {
        let encoding = DistributionEncoding::parse(
            "tile_distribution_encoding<sequence<>, tuple<sequence<64>>, tuple<sequence<1>>, tuple<sequence<0>>, sequence<>, sequence<>>",
        )
        .unwrap();
        assert_eq!(
            encoding.lines(),
            vec![
                "HsLengthss: [[64]]",
                "Ps2RHssMajor: [[1]]",
                "Ps2RHssMinor: [[0]]",
                "Ps mappings (with lengths):",
                "  P[0]:",
                "    -> H0[0] (length=64)",
            ]
        );
    }

    #[test]
    fn test_not_an_encoding() {
        assert_eq!(DistributionEncoding::parse("ck_tile::tuple<int>"), None);
    }
}
