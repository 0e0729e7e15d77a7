use std::fmt;

use bstr::BString;

use super::keyword::Keyword;

/// Represents a single lexical token of Gluon source.
///
/// The lexer keeps one current token and at most one lookahead token; both are
/// overwritten in place as the input is consumed, and each owns its payload
/// independently.
#[derive(Clone, Debug, PartialEq)]
pub struct Token {
    /// The kind of token.
    pub kind: TokenKind,

    /// The reserved word matched by the token's spelling, if any. Set for
    /// generic-value tokens whose text is in the keyword table; `None`
    /// everywhere else.
    pub kw: Option<Keyword>,

    /// The decoded payload.
    pub value: TokenValue,
}

impl Token {
    pub fn new(kind: TokenKind, kw: Option<Keyword>, value: TokenValue) -> Token {
        Token { kind, kw, value }
    }

    /// A bare single-character token carrying its own byte.
    pub fn punct(byte: u8) -> Token {
        Token { kind: TokenKind::Char(byte), kw: None, value: TokenValue::None }
    }

    pub fn end() -> Token {
        Token { kind: TokenKind::EndOfInput, kw: None, value: TokenValue::None }
    }

    /// The textual form used when naming this token in a diagnostic: the
    /// spelling itself for generic-value tokens, the kind label otherwise.
    pub fn describe(&self) -> String {
        match (self.kind, &self.value) {
            (TokenKind::Value, TokenValue::Text(text)) => text.clone(),
            (kind, _) => kind.to_string(),
        }
    }
}

/// An enumeration of all token shapes the lexer produces.
///
/// The grammar has no multi-character operators, so any punctuation is a
/// [TokenKind::Char] carrying the byte itself.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TokenKind {
    /// A single-character token: brackets, separators, operators.
    Char(u8),

    /// A documentation comment (`/*@ ... */`); the trimmed body is retained
    /// as the payload.
    DocComment,

    /// A quoted string literal with all escapes decoded.
    String,

    /// A numeric literal, decimal or hexadecimal, integer or floating-point.
    Number,

    /// An identifier, reserved word, annotation word, or balanced-text
    /// capture. The grammar decides what to accept based on [Token::kw].
    Value,

    /// Signals that the input is exhausted.
    EndOfInput,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TokenKind::Char(byte) if byte.is_ascii_control() => {
                write!(f, "char({})", byte)
            }
            TokenKind::Char(byte) => write!(f, "{}", char::from(*byte)),
            TokenKind::DocComment => f.write_str("<comment>"),
            TokenKind::String => f.write_str("<string>"),
            TokenKind::Number => f.write_str("<number>"),
            TokenKind::Value => f.write_str("<value>"),
            TokenKind::EndOfInput => f.write_str("<eof>"),
        }
    }
}

/// A token's decoded payload.
#[derive(Clone, Debug, PartialEq)]
pub enum TokenValue {
    None,

    /// Documentation comment bodies, identifier/keyword spellings, and
    /// balanced-text captures.
    Text(String),

    /// Decoded string literal contents. Escapes may produce bytes that are
    /// not valid utf-8, and embedded NUL bytes are preserved, so the payload
    /// is raw bytes of the exact decoded length.
    Bytes(BString),

    /// Numeric literal value and subtype.
    Number(NumberValue),
}

/// The value of a numeric literal, stored at the width its suffix selects.
///
/// Signed and unsigned variants of one width share the same bit
/// representation; the variant alone tells downstream consumers how to read
/// it. `Ldouble` is kept as a distinct subtype for the generator even though
/// it is stored as an `f64`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum NumberValue {
    Int(i32),
    Uint(u32),
    Long(i64),
    Ulong(u64),
    Llong(i64),
    Ullong(u64),
    Float(f32),
    Double(f64),
    Ldouble(f64),
}

#[cfg(test)]
mod tests {
    use super::{Token, TokenKind, TokenValue};

    #[test]
    fn kind_labels() {
        assert_eq!(TokenKind::DocComment.to_string(), "<comment>");
        assert_eq!(TokenKind::String.to_string(), "<string>");
        assert_eq!(TokenKind::Number.to_string(), "<number>");
        assert_eq!(TokenKind::Value.to_string(), "<value>");
        assert_eq!(TokenKind::EndOfInput.to_string(), "<eof>");
        assert_eq!(TokenKind::Char(b'{').to_string(), "{");
        assert_eq!(TokenKind::Char(0x07).to_string(), "char(7)");
    }

    #[test]
    fn describe_prefers_the_spelling() {
        let token = Token::new(
            TokenKind::Value,
            None,
            TokenValue::Text(String::from("width")),
        );
        assert_eq!(token.describe(), "width");
        assert_eq!(Token::punct(b';').describe(), ";");
        assert_eq!(Token::end().describe(), "<eof>");
    }
}
