//! Token definitions for ck_tile type signatures
//!
//! Type strings follow a small grammar: `Name<Param, Param, ...>` where a
//! parameter is another signature, a bare integer literal, or a C-style cast
//! such as `(ck_tile::address_space_enum)1`. The tokens are defined using the
//! logos derive macro. Bytes outside the vocabulary (`.`, `=`, ...) surface as
//! lexer errors and are ignored by every consumer.

use logos::Logos;

/// All tokens that can appear in a type signature
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
pub enum Token {
    #[token("<")]
    Open,

    #[token(">")]
    Close,

    #[token(",")]
    Comma,

    #[token("::")]
    PathSep,

    #[token("(")]
    OpenParen,

    #[token(")")]
    CloseParen,

    #[token("&")]
    Reference,

    #[token("*")]
    Pointer,

    // Integer literal with optional sign and long/unsigned suffixes: -1, 8192l, 64ul
    #[regex(r"-?[0-9]+[uUlL]*")]
    Integer,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident,
}

/// Tokenize a type string with byte spans
///
/// Unrecognized bytes are dropped, so the result is always usable.
pub fn tokenize(source: &str) -> Vec<(Token, logos::Span)> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        if let Ok(token) = result {
            tokens.push((token, lexer.span()));
        }
    }

    tokens
}

/// Identifiers in source order, skipping everything else
pub fn identifiers(source: &str) -> impl Iterator<Item = &str> + '_ {
    tokenize(source)
        .into_iter()
        .filter(|(token, _)| *token == Token::Ident)
        .map(move |(_, span)| &source[span])
}
