//! End-to-end parsing of descriptor and adaptor type strings

use rstest::rstest;
use tilescope::cktile::parsing::signature::{element_space_size, parse_pipeline};
use tilescope::cktile::parsing::{parse_dimension_sequences, parse_transform_list};
use tilescope::cktile::pipeline::{PipelineKind, TransformKind};

const EMBED_DESCRIPTOR: &str = "ck_tile::tensor_descriptor<\
    ck_tile::tuple<ck_tile::embed<ck_tile::tuple<ck_tile::constant<8>, ck_tile::constant<128>>, \
    ck_tile::tuple<ck_tile::constant<128>, ck_tile::constant<1>>>>, \
    ck_tile::tuple<ck_tile::sequence<0>>, \
    ck_tile::tuple<ck_tile::sequence<1, 2>>, \
    ck_tile::sequence<1, 2>, ck_tile::constant<1024l>>";

const PADDED_ADAPTOR: &str = "ck_tile::tensor_adaptor<\
    ck_tile::tuple<ck_tile::pass_through<int>, ck_tile::right_pad<int, int, false>, \
    ck_tile::unmerge<ck_tile::tuple<ck_tile::constant<4>, ck_tile::constant<16>>, false>, \
    ck_tile::merge<ck_tile::tuple<ck_tile::constant<4>, ck_tile::constant<16>>>>, \
    ck_tile::tuple<ck_tile::sequence<0>, ck_tile::sequence<1>, ck_tile::sequence<3>, ck_tile::sequence<4, 5>>, \
    ck_tile::tuple<ck_tile::sequence<2>, ck_tile::sequence<3>, ck_tile::sequence<4, 5>, ck_tile::sequence<6>>, \
    ck_tile::sequence<0, 1>, ck_tile::sequence<2, 6>>";

#[test]
fn test_embed_descriptor_end_to_end() {
    let pipeline = parse_pipeline(EMBED_DESCRIPTOR, PipelineKind::Descriptor);
    assert_eq!(pipeline.kinds(), vec![TransformKind::Embed]);
    assert_eq!(pipeline.lower_dims(), vec![vec![0]]);
    assert_eq!(pipeline.upper_dims(), vec![vec![1, 2]]);
    assert_eq!(pipeline.bottom_dims, vec![0]);
    assert_eq!(pipeline.top_dims, vec![1, 2]);
    assert_eq!(element_space_size(EMBED_DESCRIPTOR), Some(1024));
}

#[test]
fn test_adaptor_lists_zip_by_position() {
    let pipeline = parse_pipeline(PADDED_ADAPTOR, PipelineKind::Adaptor);
    assert_eq!(
        pipeline.kinds(),
        vec![
            TransformKind::PassThrough,
            TransformKind::RightPad,
            TransformKind::Unmerge,
            TransformKind::Merge,
        ]
    );
    assert_eq!(pipeline.lower_dims(), vec![vec![0], vec![1], vec![3], vec![4, 5]]);
    assert_eq!(pipeline.upper_dims(), vec![vec![2], vec![3], vec![4, 5], vec![6]]);
    assert_eq!(pipeline.bottom_dims, vec![0, 1]);
    assert_eq!(pipeline.top_dims, vec![2, 6]);
    assert_eq!(pipeline.transforms[2].parameters.up_lengths, Some(vec![4, 16]));
    assert_eq!(pipeline.transforms[3].parameters.low_lengths, Some(vec![4, 16]));
}

#[test]
fn test_nested_descriptor_inside_view() {
    let view = format!(
        "ck_tile::tensor_view<ck_tile::buffer_view<(ck_tile::address_space_enum)1, float, int, true>, {}, ck_tile::null_type>",
        EMBED_DESCRIPTOR
    );
    let pipeline = parse_pipeline(&view, PipelineKind::Descriptor);
    assert_eq!(pipeline.kinds(), vec![TransformKind::Embed]);
    assert_eq!(pipeline.top_dims, vec![1, 2]);
}

#[test]
fn test_replicate_keeps_its_empty_slot() {
    let adaptor = "ck_tile::tensor_adaptor<\
        ck_tile::tuple<ck_tile::replicate<ck_tile::tuple<ck_tile::constant<2>>>, \
        ck_tile::unmerge<ck_tile::tuple<ck_tile::constant<4>, ck_tile::constant<8>>, false>>, \
        ck_tile::tuple<ck_tile::sequence<>, ck_tile::sequence<0>>, \
        ck_tile::tuple<ck_tile::sequence<1>, ck_tile::sequence<2, 3>>, \
        ck_tile::sequence<0>, ck_tile::sequence<1, 2, 3>>";
    let pipeline = parse_pipeline(adaptor, PipelineKind::Adaptor);
    assert_eq!(pipeline.kinds(), vec![TransformKind::Replicate, TransformKind::Unmerge]);
    assert_eq!(pipeline.lower_dims(), vec![vec![], vec![0]]);
    assert_eq!(pipeline.upper_dims(), vec![vec![1], vec![2, 3]]);
}

#[rstest]
#[case("ck_tile::sequence<>, ck_tile::sequence<1, 2>", vec![vec![], vec![1, 2]])]
#[case("sequence<-1, -1>, sequence<0>", vec![vec![-1, -1], vec![0]])]
#[case("sequence<8192l>", vec![vec![8192]])]
#[case("no sequences here", vec![])]
fn test_dimension_sequences(#[case] content: &str, #[case] expected: Vec<Vec<i64>>) {
    assert_eq!(parse_dimension_sequences(content), expected);
}

#[rstest]
#[case("ck_tile::unmerge<ck_tile::tuple<ck_tile::constant<2>>, false>", vec![TransformKind::Unmerge])]
#[case("ck_tile::merge<ck_tile::tuple<int, int>>", vec![TransformKind::Merge])]
#[case(
    "ck_tile::merge<ck_tile::tuple<int>>, ck_tile::unmerge<ck_tile::tuple<int>, false>",
    vec![TransformKind::Merge, TransformKind::Unmerge]
)]
fn test_merge_unmerge_disambiguation(#[case] content: &str, #[case] expected: Vec<TransformKind>) {
    let kinds: Vec<_> = parse_transform_list(content).into_iter().map(|m| m.kind).collect();
    assert_eq!(kinds, expected);
}

#[test]
fn test_unparseable_type_yields_empty_pipeline() {
    let pipeline = parse_pipeline("ck_tile::tensor_descriptor<Ts, Ls, Us, Top, long", PipelineKind::Descriptor);
    assert!(pipeline.transforms.is_empty());
    assert!(pipeline.top_dims.is_empty());
}
