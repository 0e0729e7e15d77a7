//! A Gluon language lexer, which splits the input `.gidl` source into tokens for parsing.
//!
//! The lexer is a pull interface: the parser asks for one [Token] at a time
//! with [Lexer::get], may peek one token ahead with [Lexer::lookahead], and
//! can capture a raw expression blob between matching delimiters with
//! [Lexer::get_balanced]. All character-level decoding happens here: string
//! escape processing, numeric literal typing, keyword classification, and
//! display-column tracking for diagnostics. A lexical error is fatal to the
//! compilation unit; every scanning call reports it as a [LexError] that
//! propagates back to whoever created the lexer.
//!

pub mod keyword;
pub mod token;

mod cursor;

use std::sync::atomic::{AtomicUsize, Ordering};

use bstr::{BString, ByteSlice};

use crate::toolchain::diagnostics::{LexError, Location};
use crate::toolchain::source::SourceBuffer;

use self::cursor::{is_newline, is_space, Cursor};
use self::keyword::Keyword;
use self::token::{NumberValue, Token, TokenKind, TokenValue};

static INIT_COUNT: AtomicUsize = AtomicUsize::new(0);

/// Process-wide initialization, reference-counted and idempotent. The first
/// call warms the keyword table; the table itself is never torn down.
/// Returns the new count.
pub fn init() -> usize {
    let previous = INIT_COUNT.fetch_add(1, Ordering::SeqCst);
    if previous == 0 {
        let _ = Keyword::lookup("class");
        tracing::debug!("gluon lexer initialized");
    }
    previous + 1
}

/// Balances [init]. Only the final call observes the count reach zero, and
/// even then the keyword table stays alive. Returns the new count.
pub fn shutdown() -> usize {
    match INIT_COUNT.fetch_update(Ordering::SeqCst, Ordering::SeqCst, |count| {
        count.checked_sub(1)
    }) {
        Ok(previous) => {
            if previous == 1 {
                tracing::debug!("gluon lexer shut down");
            }
            previous - 1
        }
        Err(_) => 0,
    }
}

// Positional state saved by [Lexer::context_push]. Restoring rewinds only the
// reported position, never the byte cursor itself.
struct Context {
    line: i32,
    column: i32,
    line_start: usize,
}

/// The lexer state for one source buffer.
///
/// Owns the reusable text accumulation buffer, the current token, the
/// optional pending lookahead token, and the stack of saved positional
/// contexts. The source buffer is borrowed for the lexer's whole lifetime.
pub struct Lexer<'s> {
    source: &'s SourceBuffer<'s>,
    cursor: Cursor<'s>,
    buff: BString,
    t: Token,
    ahead: Option<Token>,
    saved: Vec<Context>,
}

// Internal tag produced by the numeric suffix scan, before conversion picks
// the storage width.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum NumType {
    Int,
    Uint,
    Long,
    Ulong,
    Llong,
    Ullong,
    Float,
    Double,
    Ldouble,
}

impl<'s> Lexer<'s> {
    pub fn new(source: &'s SourceBuffer<'s>) -> Lexer<'s> {
        Lexer {
            source,
            cursor: Cursor::new(source.bytes()),
            buff: BString::from(Vec::new()),
            t: Token::end(),
            ahead: None,
            saved: Vec::new(),
        }
    }

    /// The token most recently produced by [Lexer::get] or
    /// [Lexer::get_balanced].
    pub fn current(&self) -> &Token {
        &self.t
    }

    /// The pending lookahead token, if [Lexer::lookahead] has run without an
    /// intervening [Lexer::get].
    pub fn pending_lookahead(&self) -> Option<&Token> {
        self.ahead.as_ref()
    }

    pub fn line(&self) -> i32 {
        self.cursor.line
    }

    pub fn column(&self) -> i32 {
        self.cursor.column
    }

    pub fn file_name(&self) -> &str {
        self.source.file_name()
    }

    /// Produces the next token, consuming a pending lookahead first if one
    /// exists. The previous current token and its payload are dropped.
    pub fn get(&mut self) -> Result<TokenKind, LexError> {
        if let Some(ahead) = self.ahead.take() {
            self.t = ahead;
            return Ok(self.t.kind);
        }
        self.t = self.lex()?;
        Ok(self.t.kind)
    }

    /// Produces one token ahead of the current one without consuming it.
    ///
    /// The position reported for the current token is saved around the scan,
    /// so diagnostics attributed to the current token keep their original
    /// line and column. The byte cursor is not rewound.
    ///
    /// Requesting a second lookahead while one is pending is a programming
    /// error, not a lexical error, and panics.
    pub fn lookahead(&mut self) -> Result<TokenKind, LexError> {
        assert!(self.ahead.is_none(), "lookahead requested while one is already pending");
        self.context_push();
        let token = self.lex();
        self.context_restore();
        self.context_pop();
        let token = token?;
        let kind = token.kind;
        self.ahead = Some(token);
        Ok(kind)
    }

    /// Captures raw text between one pair of delimiters instead of lexing
    /// normally, tracking nesting depth. The capture becomes the current
    /// token, as a generic value; returns whether the captured token's kind
    /// matched the expected generic-value kind.
    pub fn get_balanced(&mut self, open: u8, close: u8) -> Result<bool, LexError> {
        assert!(self.ahead.is_none(), "balanced capture requested while a lookahead is pending");
        self.t = self.lex_balanced(open, close)?;
        Ok(self.t.kind == TokenKind::Value)
    }

    /// Saves the current line, column, and line start on the context stack.
    pub fn context_push(&mut self) {
        self.saved.push(Context {
            line: self.cursor.line,
            column: self.cursor.column,
            line_start: self.cursor.line_start,
        });
    }

    /// Discards the top of the context stack.
    pub fn context_pop(&mut self) {
        self.saved.pop();
    }

    /// Rewinds the reported position to the top of the context stack, without
    /// popping it and without moving the byte cursor.
    pub fn context_restore(&mut self) {
        if let Some(ctx) = self.saved.last() {
            self.cursor.line = ctx.line;
            self.cursor.column = ctx.column;
            self.cursor.line_start = ctx.line_start;
        }
    }

    pub fn context_clear(&mut self) {
        self.saved.clear();
    }

    /// Reports a lexical error, optionally naming an offending token kind.
    /// The current token's spelling stands in for the generic-value kind.
    pub fn lex_error(&self, message: &str, near: Option<TokenKind>) -> LexError {
        let near = near.map(|kind| match kind {
            TokenKind::Value => self.t.describe(),
            other => other.to_string(),
        });
        self.error(message, near)
    }

    /// Reports a syntax error attributed to the token currently held.
    pub fn syntax_error(&self, message: &str) -> LexError {
        self.lex_error(message, Some(self.t.kind))
    }

    // Builds a LexError at the cursor's position; the diagnostic is formatted
    // and logged by the constructor.
    fn error(&self, message: &str, near: Option<String>) -> LexError {
        LexError::new(
            message,
            Location {
                file_name: String::from(self.source.file_name()),
                line_number: self.cursor.line,
                column_number: self.cursor.column,
            },
            near,
            String::from_utf8_lossy(self.cursor.line_text()).into_owned(),
        )
    }

    fn bump_line(&mut self) -> Result<(), LexError> {
        self.cursor
            .next_line()
            .map_err(|_| self.error("source has too many lines", None))
    }

    fn bump_line_ws(&mut self) -> Result<(), LexError> {
        self.cursor
            .next_line_ws()
            .map_err(|_| self.error("source has too many lines", None))
    }

    // The central dispatch: consumes input until exactly one token is
    // produced, discarding whitespace, line comments, and plain long
    // comments along the way.
    fn lex(&mut self) -> Result<Token, LexError> {
        self.buff.clear();
        loop {
            let Some(c) = self.cursor.current else {
                return Ok(Token::end());
            };
            match c {
                b'\n' | b'\r' => self.bump_line()?,
                b'/' => {
                    self.cursor.advance();
                    match self.cursor.current {
                        Some(b'*') => {
                            self.cursor.advance();
                            let doc = self.cursor.current == Some(b'@');
                            if doc {
                                self.cursor.advance();
                            }
                            if let Some(body) = self.long_comment(doc)? {
                                return Ok(Token::new(
                                    TokenKind::DocComment,
                                    None,
                                    TokenValue::Text(body),
                                ));
                            }
                        }
                        Some(b'/') => {
                            while self.cursor.current.is_some_and(|c| !is_newline(c)) {
                                self.cursor.advance();
                            }
                        }
                        _ => return Ok(Token::punct(b'/')),
                    }
                }
                b'"' | b'\'' => return self.string_token(c),
                b'.' => {
                    self.cursor.advance();
                    if self.cursor.current.is_some_and(|c| c.is_ascii_digit()) {
                        self.buff.clear();
                        self.buff.push(b'.');
                        return self.number_token();
                    }
                    return Ok(Token::punct(b'.'));
                }
                c if is_space(c) => self.cursor.advance(),
                c if c.is_ascii_digit() => {
                    self.buff.clear();
                    return self.number_token();
                }
                c if c.is_ascii_alphanumeric() || c == b'_' || c == b'@' => {
                    return self.value_token(c)
                }
                c => {
                    self.cursor.advance();
                    return Ok(Token::punct(c));
                }
            }
        }
    }

    // Scans a long comment body, the opener (and the '@' marker for
    // documentation comments) already consumed. Documentation comments return
    // their body with line breaks normalized to '\n', re-indentation
    // stripped, and surrounding whitespace trimmed; plain comments return
    // None and are discarded by the caller.
    fn long_comment(&mut self, capture: bool) -> Result<Option<String>, LexError> {
        self.buff.clear();
        if self.cursor.current.is_some_and(is_newline) {
            self.bump_line_ws()?;
        }
        loop {
            match self.cursor.current {
                None => {
                    return Err(
                        self.error("unfinished long comment", Some(String::from("<eof>")))
                    )
                }
                Some(b'*') => {
                    self.cursor.advance();
                    if self.cursor.current == Some(b'/') {
                        self.cursor.advance();
                        break;
                    }
                    self.buff.push(b'*');
                }
                Some(c) if is_newline(c) => {
                    self.buff.push(b'\n');
                    self.bump_line_ws()?;
                }
                Some(c) => {
                    self.buff.push(c);
                    self.cursor.advance();
                }
            }
        }
        if !capture {
            return Ok(None);
        }
        Ok(Some(String::from_utf8_lossy(self.buff.trim()).into_owned()))
    }

    // Scans a string literal delimited by `del`, decoding escapes into the
    // accumulation buffer. The payload excludes the delimiters and keeps the
    // exact decoded bytes, NULs included.
    fn string_token(&mut self, del: u8) -> Result<Token, LexError> {
        self.buff.clear();
        self.cursor.advance();
        loop {
            match self.cursor.current {
                None => {
                    return Err(self.error("unfinished string", Some(String::from("<eof>"))))
                }
                Some(c) if is_newline(c) => {
                    return Err(
                        self.error("unfinished string", Some(TokenKind::String.to_string()))
                    )
                }
                Some(c) if c == del => break,
                Some(b'\\') => {
                    self.cursor.advance();
                    match self.cursor.current {
                        // Consumed; the loop reports the unfinished string at
                        // the end of input with the right context.
                        None => {}
                        Some(b'a') => {
                            self.buff.push(0x07);
                            self.cursor.advance();
                        }
                        Some(b'b') => {
                            self.buff.push(0x08);
                            self.cursor.advance();
                        }
                        Some(b'f') => {
                            self.buff.push(0x0c);
                            self.cursor.advance();
                        }
                        Some(b'n') => {
                            self.buff.push(b'\n');
                            self.cursor.advance();
                        }
                        Some(b'r') => {
                            self.buff.push(b'\r');
                            self.cursor.advance();
                        }
                        Some(b't') => {
                            self.buff.push(b'\t');
                            self.cursor.advance();
                        }
                        Some(b'v') => {
                            self.buff.push(0x0b);
                            self.cursor.advance();
                        }
                        Some(b'x') => {
                            let value = self.hex_escape()?;
                            self.buff.push(value);
                            self.cursor.advance();
                        }
                        Some(c) if is_newline(c) => {
                            // A line continuation contributes a single '\n'.
                            self.bump_line()?;
                            self.buff.push(b'\n');
                        }
                        Some(c @ (b'\\' | b'"' | b'\'')) => {
                            self.buff.push(c);
                            self.cursor.advance();
                        }
                        Some(c) if c.is_ascii_digit() => {
                            let value = self.dec_escape()?;
                            self.buff.push(value);
                        }
                        Some(c) => {
                            let esc = format!("\\{}", char::from(c));
                            return Err(self.error("invalid escape sequence", Some(esc)));
                        }
                    }
                }
                Some(c) => {
                    self.buff.push(c);
                    self.cursor.advance();
                }
            }
        }
        self.cursor.advance();
        Ok(Token::new(TokenKind::String, None, TokenValue::Bytes(self.buff.clone())))
    }

    // Exactly two hex digits after the 'x'. Leaves the cursor on the second
    // digit; the caller advances past it.
    fn hex_escape(&mut self) -> Result<u8, LexError> {
        let mut text = String::from("\\x");
        let mut value: u8 = 0;
        for _ in 0..2 {
            self.cursor.advance();
            match self.cursor.current {
                Some(c) if c.is_ascii_hexdigit() => {
                    text.push(char::from(c));
                    value = (value << 4) | hex_val(c);
                }
                current => {
                    if let Some(c) = current {
                        text.push(char::from(c));
                    }
                    return Err(self.error("hexadecimal digit expected", Some(text)));
                }
            }
        }
        Ok(value)
    }

    // One to three decimal digits forming a byte value. Advances past the
    // digits it consumes.
    fn dec_escape(&mut self) -> Result<u8, LexError> {
        let mut text = String::from("\\");
        let mut value: u32 = 0;
        let mut digits = 0;
        while digits < 3 {
            let Some(c) = self.cursor.current else { break };
            if !c.is_ascii_digit() {
                break;
            }
            text.push(char::from(c));
            value = value * 10 + u32::from(c - b'0');
            self.cursor.advance();
            digits += 1;
        }
        if value > 255 {
            return Err(self.error("decimal escape too large", Some(text)));
        }
        Ok(value as u8)
    }

    // Scans a numeric literal. The accumulation buffer is empty, or holds a
    // leading '.' when the dispatch saw a fraction-first float; the cursor is
    // on the first digit.
    fn number_token(&mut self) -> Result<Token, LexError> {
        let mut is_float = self.buff.first() == Some(&b'.');
        let mut hex = false;
        if !is_float && self.cursor.current == Some(b'0') {
            self.buff.push(b'0');
            self.cursor.advance();
            if let Some(x @ (b'x' | b'X')) = self.cursor.current {
                self.buff.push(x);
                self.cursor.advance();
                hex = true;
            }
        }
        if hex {
            while let Some(c) = self.cursor.current {
                if !c.is_ascii_hexdigit() && c != b'.' {
                    break;
                }
                if c == b'.' {
                    is_float = true;
                }
                self.buff.push(c);
                self.cursor.advance();
            }
            if is_float && !matches!(self.cursor.current, Some(b'p' | b'P')) {
                return Err(self.error(
                    "hex float literals require an exponent",
                    Some(TokenKind::Number.to_string()),
                ));
            }
            if let Some(p @ (b'p' | b'P')) = self.cursor.current {
                is_float = true;
                self.scan_exponent(p);
            }
        } else {
            while let Some(c) = self.cursor.current {
                if !c.is_ascii_digit() && c != b'.' {
                    break;
                }
                if c == b'.' {
                    is_float = true;
                }
                self.buff.push(c);
                self.cursor.advance();
            }
            if let Some(e @ (b'e' | b'E')) = self.cursor.current {
                is_float = true;
                self.scan_exponent(e);
            }
        }
        let value = self.convert_number(is_float, hex)?;
        Ok(Token::new(TokenKind::Number, None, TokenValue::Number(value)))
    }

    // Appends the exponent marker, an optional sign, and the digit run.
    fn scan_exponent(&mut self, marker: u8) {
        self.buff.push(marker);
        self.cursor.advance();
        if let Some(sign @ (b'+' | b'-')) = self.cursor.current {
            self.buff.push(sign);
            self.cursor.advance();
        }
        while let Some(c) = self.cursor.current {
            if !c.is_ascii_digit() {
                break;
            }
            self.buff.push(c);
            self.cursor.advance();
        }
    }

    // Consumes the literal's type suffix: f/l for floats, u combined with up
    // to two l's for integers. Unrecognized trailing characters are left for
    // the next token.
    fn number_suffix(&mut self, is_float: bool) -> NumType {
        if is_float {
            return match self.cursor.current {
                Some(b'f' | b'F') => {
                    self.cursor.advance();
                    NumType::Float
                }
                Some(b'l' | b'L') => {
                    self.cursor.advance();
                    NumType::Ldouble
                }
                _ => NumType::Double,
            };
        }
        let unsigned = matches!(self.cursor.current, Some(b'u' | b'U'));
        if unsigned {
            self.cursor.advance();
        }
        let mut longs = 0;
        while longs < 2 && matches!(self.cursor.current, Some(b'l' | b'L')) {
            self.cursor.advance();
            longs += 1;
        }
        match (unsigned, longs) {
            (false, 0) => NumType::Int,
            (true, 0) => NumType::Uint,
            (false, 1) => NumType::Long,
            (true, 1) => NumType::Ulong,
            (false, _) => NumType::Llong,
            (true, _) => NumType::Ullong,
        }
    }

    // Converts the accumulated literal text at the width the suffix selects.
    // Leftover unconvertible characters and out-of-range values are fatal.
    fn convert_number(&mut self, is_float: bool, hex: bool) -> Result<NumberValue, LexError> {
        let ty = self.number_suffix(is_float);
        let text = match self.buff.to_str() {
            Ok(text) => text,
            Err(_) => {
                return Err(
                    self.error("malformed number", Some(TokenKind::Number.to_string()))
                )
            }
        };
        if is_float {
            let value = if hex { parse_hex_float(text) } else { text.parse::<f64>().ok() };
            let Some(value) = value else {
                return Err(
                    self.error("malformed number", Some(TokenKind::Number.to_string()))
                );
            };
            return Ok(match ty {
                NumType::Float => NumberValue::Float(value as f32),
                NumType::Ldouble => NumberValue::Ldouble(value),
                _ => NumberValue::Double(value),
            });
        }
        let digits = if hex { &text[2..] } else { text };
        let radix = if hex { 16 } else { 10 };
        let wide = match u64::from_str_radix(digits, radix) {
            Ok(wide) => wide,
            Err(e) if matches!(e.kind(), std::num::IntErrorKind::PosOverflow) => {
                return Err(
                    self.error("number out of range", Some(TokenKind::Number.to_string()))
                )
            }
            Err(_) => {
                return Err(
                    self.error("malformed number", Some(TokenKind::Number.to_string()))
                )
            }
        };
        // Signed and unsigned share storage; only the width is checked here.
        if matches!(ty, NumType::Int | NumType::Uint) && wide > u64::from(u32::MAX) {
            return Err(self.error("number out of range", Some(TokenKind::Number.to_string())));
        }
        Ok(match ty {
            NumType::Int => NumberValue::Int(wide as u32 as i32),
            NumType::Uint => NumberValue::Uint(wide as u32),
            NumType::Long => NumberValue::Long(wide as i64),
            NumType::Ulong => NumberValue::Ulong(wide),
            NumType::Llong => NumberValue::Llong(wide as i64),
            NumType::Ullong => NumberValue::Ullong(wide),
            // Float suffixes were handled above.
            NumType::Float | NumType::Double | NumType::Ldouble => {
                return Err(
                    self.error("malformed number", Some(TokenKind::Number.to_string()))
                )
            }
        })
    }

    // Scans an identifier, reserved word, or '@'-annotation word. The column
    // reported afterwards points at the start of the word.
    fn value_token(&mut self, first: u8) -> Result<Token, LexError> {
        let col = self.cursor.column;
        let at_word = first == b'@';
        self.buff.clear();
        self.buff.push(first);
        self.cursor.advance();
        while let Some(c) = self.cursor.current {
            if !c.is_ascii_alphanumeric() && c != b'_' {
                break;
            }
            self.buff.push(c);
            self.cursor.advance();
        }
        // Only ASCII alphanumerics, underscores, and '@' are ever pushed here.
        let text = unsafe { self.buff.as_slice().to_str_unchecked() };
        let kw = Keyword::lookup(text);
        self.cursor.column = col + 1;
        if at_word && kw.is_none() {
            return Err(self.error("invalid keyword", Some(String::from(text))));
        }
        Ok(Token::new(TokenKind::Value, kw, TokenValue::Text(String::from(text))))
    }

    // Captures raw text until an unmatched closing delimiter at depth zero.
    // That delimiter is neither captured nor consumed. Line breaks inside the
    // capture go through normal line accounting and contribute a single '\n'.
    fn lex_balanced(&mut self, open: u8, close: u8) -> Result<Token, LexError> {
        self.buff.clear();
        while let Some(c) = self.cursor.current {
            if is_newline(c) {
                self.bump_line()?;
            } else if is_space(c) {
                self.cursor.advance();
            } else {
                break;
            }
        }
        let col = self.cursor.column;
        let mut depth = 0i32;
        loop {
            let Some(c) = self.cursor.current else {
                return Err(self.error("unfinished balanced text", Some(String::from("<eof>"))));
            };
            if c == open {
                depth += 1;
            } else if c == close {
                if depth == 0 {
                    break;
                }
                depth -= 1;
            }
            if is_newline(c) {
                self.buff.push(b'\n');
                self.bump_line()?;
            } else {
                self.buff.push(c);
                self.cursor.advance();
            }
        }
        let text = String::from_utf8_lossy(self.buff.trim()).into_owned();
        let kw = Keyword::lookup(&text);
        self.cursor.column = col + 1;
        Ok(Token::new(TokenKind::Value, kw, TokenValue::Text(text)))
    }
}

fn hex_val(c: u8) -> u8 {
    match c {
        b'a'..=b'f' => c - b'a' + 10,
        b'A'..=b'F' => c - b'A' + 10,
        _ => c - b'0',
    }
}

// C-style hex float: "0x" prefix, hex mantissa with at most one '.', and a
// mandatory binary exponent after 'p' or 'P'. The standard library float
// parser does not accept the form.
fn parse_hex_float(text: &str) -> Option<f64> {
    let rest = text.strip_prefix("0x").or_else(|| text.strip_prefix("0X"))?;
    let (mantissa, exponent) = rest.split_once(&['p', 'P'][..])?;
    let exponent: i32 = exponent.parse().ok()?;
    let (int_part, frac_part) = match mantissa.split_once('.') {
        Some(parts) => parts,
        None => (mantissa, ""),
    };
    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }
    let mut value = 0f64;
    for digit in int_part.bytes() {
        if !digit.is_ascii_hexdigit() {
            return None;
        }
        value = value * 16.0 + f64::from(hex_val(digit));
    }
    let mut scale = 1.0 / 16.0;
    for digit in frac_part.bytes() {
        if !digit.is_ascii_hexdigit() {
            return None;
        }
        value += f64::from(hex_val(digit)) * scale;
        scale /= 16.0;
    }
    Some(value * 2f64.powi(exponent))
}
