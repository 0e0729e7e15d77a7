//! Production and delivery of diagnostic feedback from the toolchain.
//!
//! A lexical failure is fatal to the compilation unit being processed, so the
//! whole module reduces to one error type: scanning code builds a [LexError]
//! through the lexer's reporting entry points and returns it up through every
//! call, back to whoever created the lexer. The formatted message, including
//! the offending source line and a caret under the error column, is emitted
//! once to the log sink at construction time, tagged with the source file
//! name and line number.

use std::fmt;

use thiserror::Error;

/// A location in source referred to by a diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Location {
    pub file_name: String,

    /// 1-based line number.
    pub line_number: i32,

    /// 1-based display column (one per decoded character, not per byte).
    pub column_number: i32,
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.file_name)?;
        if self.line_number > 0 {
            write!(f, ":{}", self.line_number)?;
        }
        if self.column_number > 0 {
            write!(f, ":{}", self.column_number)?;
        }
        Ok(())
    }
}

/// A fatal lexical or syntax error.
///
/// Carries everything a caller needs to point at the failure: the message,
/// the location, the textual form of the offending token when one is known,
/// and the full text of the offending source line for the caret rendering.
#[derive(Clone, Debug, Error, PartialEq)]
pub struct LexError {
    pub message: String,
    pub location: Location,
    pub near: Option<String>,
    pub line: String,
}

impl fmt::Display for LexError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.location, self.render())
    }
}

impl LexError {
    /// Builds the error and emits the formatted diagnostic to the log sink.
    pub fn new(
        message: &str,
        location: Location,
        near: Option<String>,
        line: String,
    ) -> LexError {
        let err = LexError { message: String::from(message), location, near, line };
        tracing::error!(
            file = %err.location.file_name,
            line = err.location.line_number,
            "{}",
            err.render()
        );
        err
    }

    // The message, the offending source line, and a caret under the error
    // column. The line is indented by one space so a run of column-many
    // spaces lands the caret under the 1-based column.
    fn render(&self) -> String {
        let mut out = String::new();
        match &self.near {
            Some(near) => {
                out.push_str(&format!(
                    "{} at column {} near '{}'",
                    self.message, self.location.column_number, near
                ));
            }
            None => {
                out.push_str(&format!(
                    "{} at column {}",
                    self.message, self.location.column_number
                ));
            }
        }
        out.push('\n');
        out.push(' ');
        out.push_str(&self.line);
        out.push('\n');
        for _ in 0..self.location.column_number {
            out.push(' ');
        }
        out.push('^');
        out
    }
}
