//! Property-based tests for bracket matching and parameter splitting
//!
//! Type strings are generated as nested templates, so the expected closer
//! position and parameter count are known up front.

use proptest::prelude::*;
use tilescope::cktile::parsing::brackets::bracket_balance;
use tilescope::cktile::parsing::{find_matching_close, split_top_level};

#[derive(Debug, Clone)]
enum Param {
    Int(i64),
    Name(String),
    Template(String, Vec<Param>),
}

impl Param {
    fn text(&self) -> String {
        match self {
            Param::Int(value) => value.to_string(),
            Param::Name(name) => name.clone(),
            Param::Template(name, params) => {
                let inner: Vec<String> = params.iter().map(Param::text).collect();
                format!("{}<{}>", name, inner.join(", "))
            }
        }
    }
}

fn name_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        "[a-z_][a-z0-9_]{0,8}",
        "[a-z_][a-z0-9_]{0,8}".prop_map(|name| format!("ck_tile::{}", name)),
    ]
}

fn param_strategy() -> impl Strategy<Value = Param> {
    let leaf = prop_oneof![
        (-1000i64..100_000).prop_map(Param::Int),
        name_strategy().prop_map(Param::Name),
    ];
    leaf.prop_recursive(4, 32, 4, |inner| {
        (name_strategy(), prop::collection::vec(inner, 0..4))
            .prop_map(|(name, params)| Param::Template(name, params))
    })
}

fn template_strategy() -> impl Strategy<Value = (String, Vec<Param>)> {
    (name_strategy(), prop::collection::vec(param_strategy(), 0..5))
}

proptest! {
    #[test]
    fn test_outer_bracket_closes_at_end((name, params) in template_strategy()) {
        let text = Param::Template(name.clone(), params).text();
        let open = text.find('<').unwrap();
        prop_assert_eq!(open, name.len());
        prop_assert_eq!(find_matching_close(&text, open), Some(text.len() - 1));
    }

    #[test]
    fn test_split_recovers_every_parameter((name, params) in template_strategy()) {
        let text = Param::Template(name, params.clone()).text();
        let open = text.find('<').unwrap();
        let content = &text[open + 1..text.len() - 1];
        let expected: Vec<String> = params.iter().map(Param::text).collect();
        prop_assert_eq!(split_top_level(content), expected);
    }

    #[test]
    fn test_truncated_text_never_matches((name, params) in template_strategy(), cut in 1usize..8) {
        let text = Param::Template(name, params).text();
        let open = text.find('<').unwrap();
        let end = text.len().saturating_sub(cut).max(open + 1);
        prop_assert_eq!(find_matching_close(&text[..end], open), None);
    }

    #[test]
    fn test_arbitrary_input_does_not_panic(text in "[a-z<>, :0-9()&*-]{0,64}") {
        let _ = split_top_level(&text);
        for (pos, _) in text.match_indices('<') {
            if let Some(close) = find_matching_close(&text, pos) {
                prop_assert!(close > pos);
                prop_assert_eq!(text.as_bytes()[close], b'>');
                let (opens, closes) = bracket_balance(&text[pos..=close]);
                prop_assert_eq!(opens, closes);
            }
        }
    }
}
