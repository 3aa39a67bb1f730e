//! Logos-based lexer for the PHP subset.
//!
//! Operates on PHP code only: inline HTML outside `<?php … ?>` regions is
//! stripped before tokenization (see [`php_code`]).

use logos::Logos;

/// A token with its kind, text, and byte offset into the lexed code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Token<'a> {
    pub kind: TokenKind,
    pub text: &'a str,
    pub offset: usize,
}

/// Lexer wrapping the logos-generated tokenizer.
pub struct Lexer<'a> {
    inner: logos::Lexer<'a, TokenKind>,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str) -> Self {
        Self {
            inner: TokenKind::lexer(input),
        }
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let result = self.inner.next()?;
        let text = self.inner.slice();
        let offset = self.inner.span().start;

        let kind = match result {
            Ok(kind) => kind,
            Err(()) => TokenKind::Error,
        };

        Some(Token { kind, text, offset })
    }
}

/// Tokenize an entire string into a Vec.
pub fn tokenize(input: &str) -> Vec<Token<'_>> {
    Lexer::new(input).collect()
}

/// Extract the PHP code regions of a source file, dropping inline HTML.
///
/// Everything outside `<?php … ?>` (or short `<? … ?>`) regions is
/// discarded; `<?= expr ?>` echo tags are rewritten to `echo expr;` so the
/// expression still reaches the parser. Regions are joined with newlines.
pub fn php_code(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut rest = source;

    while let Some(open) = rest.find("<?") {
        let after = &rest[open + 2..];
        let (is_echo_tag, body_start) = if after.starts_with('=') {
            (true, open + 3)
        } else if after
            .get(..3)
            .is_some_and(|s| s.eq_ignore_ascii_case("php"))
        {
            (false, open + 5)
        } else {
            (false, open + 2)
        };

        let body = &rest[body_start..];
        let (code, remainder) = match find_close_tag(body) {
            Some(close) => (&body[..close], &body[close + 2..]),
            None => (body, ""),
        };

        if is_echo_tag {
            out.push_str("echo ");
            out.push_str(code.trim_end());
            out.push_str(";\n");
        } else {
            out.push_str(code);
            out.push('\n');
        }

        rest = remainder;
    }

    out
}

/// Find the `?>` that ends a PHP region. A close tag inside a `'…'` or
/// `"…"` string literal does not end PHP mode, so string state is tracked
/// while scanning.
fn find_close_tag(body: &str) -> Option<usize> {
    let bytes = body.as_bytes();
    let mut quote: Option<u8> = None;
    let mut i = 0;
    while i < bytes.len() {
        match quote {
            Some(q) => {
                if bytes[i] == b'\\' {
                    i += 1;
                } else if bytes[i] == q {
                    quote = None;
                }
            }
            None => match bytes[i] {
                b'\'' | b'"' => quote = Some(bytes[i]),
                b'?' if bytes.get(i + 1) == Some(&b'>') => return Some(i),
                _ => {}
            },
        }
        i += 1;
    }
    None
}

/// Token kinds for the PHP subset.
///
/// Keywords are not distinguished here: PHP keywords are case-insensitive,
/// so the parser matches identifier text instead.
#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n\f]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"#[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum TokenKind {
    // =========================================================================
    // NAMES AND LITERALS
    // =========================================================================
    #[regex(r"\$[a-zA-Z_\u{80}-\u{ff}][a-zA-Z0-9_\u{80}-\u{ff}]*")]
    Variable,

    #[regex(r"[a-zA-Z_\u{80}-\u{ff}][a-zA-Z0-9_\u{80}-\u{ff}]*")]
    Ident,

    #[regex(r"[0-9]+(\.[0-9]+)?([eE][+-]?[0-9]+)?|0[xX][0-9a-fA-F]+")]
    Number,

    #[regex(r"'([^'\\]|\\.)*'")]
    SingleQuoted,

    // Interpolation is opaque: the contents are never inspected
    #[regex(r#""([^"\\]|\\.)*""#)]
    DoubleQuoted,

    // =========================================================================
    // MULTI-CHARACTER PUNCTUATION (longest first)
    // =========================================================================
    #[token("===")]
    EqEqEq,
    #[token("!==")]
    BangEqEq,
    #[token("<=>")]
    Spaceship,
    #[token("**=")]
    PowEq,
    #[token("...")]
    Ellipsis,
    #[token("??=")]
    CoalesceEq,

    #[token("==")]
    EqEq,
    #[token("!=")]
    BangEq,
    #[token("<>")]
    LtGt,
    #[token("<=")]
    LtEq,
    #[token(">=")]
    GtEq,
    #[token("&&")]
    AndAnd,
    #[token("||")]
    OrOr,
    #[token("??")]
    Coalesce,
    #[token("->")]
    Arrow,
    #[token("=>")]
    FatArrow,
    #[token("::")]
    ColonColon,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("**")]
    Pow,
    #[token("<<")]
    Shl,
    #[token(">>")]
    Shr,
    #[token("+=")]
    PlusEq,
    #[token("-=")]
    MinusEq,
    #[token("*=")]
    StarEq,
    #[token("/=")]
    SlashEq,
    #[token(".=")]
    DotEq,
    #[token("%=")]
    PercentEq,
    #[token("&=")]
    AmpEq,
    #[token("|=")]
    PipeEq,

    // =========================================================================
    // SINGLE-CHARACTER PUNCTUATION
    // =========================================================================
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token("{")]
    LBrace,
    #[token("}")]
    RBrace,
    #[token("[")]
    LBracket,
    #[token("]")]
    RBracket,
    #[token(",")]
    Comma,
    #[token(";")]
    Semicolon,
    #[token(":")]
    Colon,
    #[token("=")]
    Eq,
    #[token("<")]
    Lt,
    #[token(">")]
    Gt,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Star,
    #[token("/")]
    Slash,
    #[token("%")]
    Percent,
    #[token(".")]
    Dot,
    #[token("!")]
    Bang,
    #[token("?")]
    Question,
    #[token("&")]
    Amp,
    #[token("|")]
    Pipe,
    #[token("^")]
    Caret,
    #[token("~")]
    Tilde,
    #[token("@")]
    At,
    #[token("\\")]
    Backslash,

    /// Anything the lexer cannot classify; the parser recovers past it.
    Error,
}
