//! Shared formatting helpers

use crate::cktile::error::AccessError;
use crate::cktile::parsing::lexer::identifiers;

/// Header suffix for blocks rendered from a type alone
pub const TYPE_ONLY_MARKER: &str = "[from type]";

/// Block header: `name{` for live values, `name [from type] {` otherwise
pub fn header(name: &str, type_only: bool) -> String {
    if type_only {
        format!("{} {} {{", name, TYPE_ONLY_MARKER)
    } else {
        format!("{}{{", name)
    }
}

/// Indent every continuation line of a block so it nests under a label
pub fn nest(block: &str, indent: &str) -> String {
    block.replace('\n', &format!("\n{}", indent))
}

/// Inline error marker used where a nested block cannot be produced
pub fn access_failure(err: &AccessError) -> String {
    format!("[error: {}]", err)
}

/// Whole-block error for values a printer cannot make sense of
pub fn error_block(context: &str, message: &str) -> String {
    format!("{{error: {}: {}}}", context, message)
}

const DATA_TYPES: &[(&str, &str)] = &[
    ("__bf16", "bfloat16"),
    ("bf16_t", "bfloat16"),
    ("_Float16", "float16"),
    ("half_t", "float16"),
    ("fp8_t", "fp8"),
    ("bf8_t", "bf8"),
    ("float", "float"),
    ("double", "double"),
    ("int", "int"),
];

/// Element type of a tensor-like type, from the first scalar identifier it mentions
pub fn data_type(type_str: &str) -> Option<&'static str> {
    identifiers(type_str).find_map(|ident| {
        DATA_TYPES
            .iter()
            .find(|(spelling, _)| *spelling == ident)
            .map(|(_, name)| *name)
    })
}

/// Address space of a `buffer_view`, from its `(address_space_enum)N` argument
pub fn address_space(type_str: &str) -> Option<&'static str> {
    if type_str.contains("address_space_enum)1") {
        Some("global")
    } else if type_str.contains("address_space_enum)3") {
        Some("lds")
    } else {
        None
    }
}

/// `[a, b, c]`, or `[a, b, ... (n total)]` when `total` exceeds what is shown
pub fn preview_list(items: &[String], total: usize) -> String {
    let joined = items.join(", ");
    if total > items.len() {
        format!("[{}, ... ({} total)]", joined, total)
    } else {
        format!("[{}]", joined)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_type_takes_first_scalar() {
        assert_eq!(
            data_type("ck_tile::buffer_view<(ck_tile::address_space_enum)1, _Float16, int, true>"),
            Some("float16")
        );
        assert_eq!(data_type("ck_tile::thread_buffer<__bf16, 8>"), Some("bfloat16"));
        assert_eq!(data_type("ck_tile::tensor_view<float const>"), Some("float"));
        assert_eq!(data_type("ck_tile::multi_index<4>"), None);
        // identifiers are compared whole, so `interior` is not `int`
        assert_eq!(data_type("interior<point_t>"), None);
    }

    #[test]
    fn test_address_space() {
        assert_eq!(address_space("buffer_view<(ck_tile::address_space_enum)1, float>"), Some("global"));
        assert_eq!(address_space("buffer_view<(ck_tile::address_space_enum)3, float>"), Some("lds"));
        assert_eq!(address_space("buffer_view<float>"), None);
    }

    #[test]
    fn test_header_and_nest() {
        assert_eq!(header("tensor_view", false), "tensor_view{");
        assert_eq!(header("tensor_descriptor", true), "tensor_descriptor [from type] {");
        assert_eq!(nest("a{\n  b\n}", "  "), "a{\n    b\n  }");
    }

    #[test]
    fn test_preview_list() {
        let items: Vec<String> = vec!["1".into(), "2".into()];
        assert_eq!(preview_list(&items, 2), "[1, 2]");
        assert_eq!(preview_list(&items, 40), "[1, 2, ... (40 total)]");
    }
}
