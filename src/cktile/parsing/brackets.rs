//! Angle-bracket matching and top-level parameter splitting
//!
//! Both functions run on the logos token stream, so commas and brackets inside
//! nested template arguments never leak into the outer level. Truncated or
//! unbalanced input is expected (debuggers elide long types) and produces
//! `None` or a best-effort split instead of a panic.

use super::lexer::Token;
use logos::Logos;

/// Find the `>` matching the `<` at `open_pos`
///
/// Returns the byte position of the closer that brings the nesting counter
/// back to zero, or `None` if `open_pos` does not point at `<` or the text ends
/// first.
pub fn find_matching_close(text: &str, open_pos: usize) -> Option<usize> {
    if text.as_bytes().get(open_pos) != Some(&b'<') {
        return None;
    }

    let mut depth = 0usize;
    let mut lexer = Token::lexer(&text[open_pos..]);

    while let Some(result) = lexer.next() {
        match result {
            Ok(Token::Open) => depth += 1,
            Ok(Token::Close) => {
                depth = depth.saturating_sub(1);
                if depth == 0 {
                    return Some(open_pos + lexer.span().start);
                }
            }
            _ => {}
        }
    }

    None
}

/// Split template content on commas at nesting depth zero
///
/// Each parameter is trimmed. Empty content gives an empty list.
pub fn split_top_level(content: &str) -> Vec<&str> {
    if content.trim().is_empty() {
        return Vec::new();
    }

    let mut params = Vec::new();
    let mut depth = 0usize;
    let mut start = 0usize;
    let mut lexer = Token::lexer(content);

    while let Some(result) = lexer.next() {
        match result {
            Ok(Token::Open) => depth += 1,
            Ok(Token::Close) => depth = depth.saturating_sub(1),
            Ok(Token::Comma) if depth == 0 => {
                let span = lexer.span();
                params.push(content[start..span.start].trim());
                start = span.end;
            }
            _ => {}
        }
    }

    let last = content[start..].trim();
    if !last.is_empty() {
        params.push(last);
    }

    params
}

/// Count `<` and `>` in a string, used to check slices are balanced
pub fn bracket_balance(text: &str) -> (usize, usize) {
    let opens = text.bytes().filter(|b| *b == b'<').count();
    let closes = text.bytes().filter(|b| *b == b'>').count();
    (opens, closes)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_find_matching_close() {
        let text = "template<int, tuple<float, double>>";
        assert_eq!(find_matching_close(text, 8), Some(34));

        let text = "nested<outer<inner<>>>";
        assert_eq!(find_matching_close(text, 6), Some(21));
        assert_eq!(find_matching_close(text, 12), Some(20));
    }

    #[test]
    fn test_find_matching_close_not_a_bracket() {
        assert_eq!(find_matching_close("tuple<int>", 0), None);
        assert_eq!(find_matching_close("tuple<int>", 100), None);
    }

    #[test]
    fn test_find_matching_close_truncated() {
        assert_eq!(find_matching_close("tuple<int, sequence<1, 2>", 5), None);
    }

    #[test]
    fn test_split_top_level() {
        assert_eq!(
            split_top_level("int, tuple<float, double>, bool"),
            vec!["int", "tuple<float, double>", "bool"]
        );
        assert_eq!(split_top_level("merge<constant<8>>"), vec!["merge<constant<8>>"]);
    }

    #[test]
    fn test_split_top_level_empty() {
        assert!(split_top_level("").is_empty());
        assert!(split_top_level("   ").is_empty());
    }

    #[test]
    fn test_split_top_level_trims() {
        assert_eq!(
            split_top_level("  sequence<>  ,sequence<1>  "),
            vec!["sequence<>", "sequence<1>"]
        );
    }

    #[test]
    fn test_split_top_level_unbalanced_does_not_panic() {
        let params = split_top_level("a>, b<c, d");
        assert_eq!(params, vec!["a>", "b<c, d"]);
    }

    #[test]
    fn test_bracket_balance() {
        assert_eq!(bracket_balance("a<b<c>>"), (2, 2));
    }
}
