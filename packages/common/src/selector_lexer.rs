//! Lexer for CSS selectors using logos

use crate::error::DomError;
use logos::Logos;
use std::ops::Range;

/// Token types for the supported selector subset
#[derive(Logos, Debug, Clone, PartialEq, Eq)]
pub enum Token<'src> {
    // Significant: separates compounds in a descendant combinator
    #[regex(r"[ \t\r\n\f]+")]
    Whitespace,

    #[token(">")]
    Child,

    #[token(",")]
    Comma,

    #[token("*")]
    Universal,

    #[token("[")]
    LBracket,

    #[token("]")]
    RBracket,

    #[token("=")]
    Equals,

    #[regex(r"-?[a-zA-Z_][a-zA-Z0-9_-]*", |lex| lex.slice())]
    Ident(&'src str),

    #[regex(r"[0-9]+", |lex| lex.slice())]
    Number(&'src str),

    #[regex(r"#[a-zA-Z0-9_-]+", |lex| &lex.slice()[1..])]
    Hash(&'src str),

    #[regex(r"\.-?[a-zA-Z_][a-zA-Z0-9_-]*", |lex| &lex.slice()[1..])]
    Class(&'src str),

    #[regex(r#""([^"\\]|\\.)*""#, |lex| {
        let s = lex.slice();
        &s[1..s.len()-1]  // Strip quotes
    })]
    String(&'src str),

    #[regex(r"'([^'\\]|\\.)*'", |lex| {
        let s = lex.slice();
        &s[1..s.len()-1]  // Strip quotes
    })]
    SingleQuoteString(&'src str),

    #[regex(r":nth-of-type\([ ]*[0-9]+[ ]*\)", |lex| {
        let s = lex.slice();
        s[":nth-of-type(".len()..s.len()-1].trim().parse::<usize>().ok()
    })]
    NthOfType(usize),
}

/// Tokenize a selector, failing on the first character the grammar does not know
pub fn tokenize(source: &str) -> Result<Vec<(Token<'_>, Range<usize>)>, DomError> {
    let mut lexer = Token::lexer(source);
    let mut tokens = Vec::new();

    while let Some(result) = lexer.next() {
        match result {
            Ok(token) => tokens.push((token, lexer.span())),
            Err(()) => {
                return Err(DomError::invalid_selector(
                    lexer.span().start,
                    format!("unexpected '{}'", lexer.slice()),
                ))
            }
        }
    }

    Ok(tokens)
}
