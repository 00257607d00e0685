//! # Quote-Aware Tokenizer
//!
//! A deliberately small tokenizer for locating the pieces of a SELECT that
//! the rewriter cares about. It is not a SQL parser.
//!
//! ## Rules
//!
//! - Whitespace, `,` and `;` separate tokens and are dropped
//! - `'...'`, `"..."`, `` `...` `` and `[...]` are atomic, so separators
//!   inside them do not split (`''` inside single quotes is an escaped quote)
//! - Separators inside parentheses do not split either, so `count(*)` and
//!   `coalesce(a, b)` stay whole
//!
//! Each token remembers its byte span in the source, which lets callers
//! splice the original text back together around a rewritten section.
//!
//! ```ignore
//! let tokens = tokenize("SELECT a, \"b c\" FROM t;");
//! // ["SELECT", "a", "\"b c\"", "FROM", "t"]
//! ```

use smallvec::SmallVec;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub text: &'a str,
    pub start: usize,
    pub end: usize,
}

impl Token<'_> {
    pub fn is_keyword(&self, keyword: &str) -> bool {
        self.text.eq_ignore_ascii_case(keyword)
    }
}

pub type Tokens<'a> = SmallVec<[Token<'a>; 16]>;

fn closing_quote(open: u8) -> Option<u8> {
    match open {
        b'\'' => Some(b'\''),
        b'"' => Some(b'"'),
        b'`' => Some(b'`'),
        b'[' => Some(b']'),
        _ => None,
    }
}

/// Walks `src` and calls `split` at every byte offset that is a top-level
/// separator according to `is_separator`.
fn scan(src: &str, is_separator: impl Fn(u8) -> bool, mut split: impl FnMut(usize)) {
    let bytes = src.as_bytes();
    let mut depth = 0usize;
    let mut i = 0;

    while i < bytes.len() {
        let b = bytes[i];
        if let Some(close) = closing_quote(b) {
            i += 1;
            while i < bytes.len() {
                if bytes[i] == close {
                    if close == b'\'' && bytes.get(i + 1) == Some(&b'\'') {
                        i += 2;
                        continue;
                    }
                    break;
                }
                i += 1;
            }
        } else if b == b'(' {
            depth += 1;
        } else if b == b')' {
            depth = depth.saturating_sub(1);
        } else if depth == 0 && is_separator(b) {
            split(i);
        }
        i += 1;
    }
}

pub fn tokenize(src: &str) -> Tokens<'_> {
    let mut tokens = Tokens::new();
    let mut start = 0;

    let mut push = |from: usize, to: usize| {
        if to > from {
            tokens.push(Token {
                text: &src[from..to],
                start: from,
                end: to,
            });
        }
    };

    scan(
        src,
        |b| b.is_ascii_whitespace() || b == b',' || b == b';',
        |at| {
            push(start, at);
            start = at + 1;
        },
    );
    push(start, src.len());

    tokens
}

/// Splits a batch on top-level `;`, trimming each statement and dropping
/// blank ones.
pub fn split_statements(src: &str) -> Vec<&str> {
    let mut statements = Vec::new();
    let mut start = 0;

    scan(
        src,
        |b| b == b';',
        |at| {
            statements.push(&src[start..at]);
            start = at + 1;
        },
    );
    statements.push(&src[start..]);

    statements
        .into_iter()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .collect()
}

/// Removes one level of identifier quoting: `"a""b"` -> `a"b`, `[x]` -> `x`.
pub fn unquote_identifier(ident: &str) -> String {
    let bytes = ident.as_bytes();
    if bytes.len() >= 2 {
        let (first, last) = (bytes[0], bytes[bytes.len() - 1]);
        let inner = || &ident[1..ident.len() - 1];
        match (first, last) {
            (b'"', b'"') => return inner().replace("\"\"", "\""),
            (b'`', b'`') => return inner().replace("``", "`"),
            (b'[', b']') => return inner().to_string(),
            _ => {}
        }
    }
    ident.to_string()
}
