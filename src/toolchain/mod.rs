//! Tools for turning Gluon source text into structured form.

pub mod diagnostics;
pub mod lexer;
pub mod source;
