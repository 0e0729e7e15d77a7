//! Gluon interface-description language toolchain.
//!
//! Gluon is a small C-like language for declaring the classes, methods, and
//! types of a library interface. A downstream generator translates those
//! declarations into C binding code. This crate contains the lexical front
//! end of that toolchain: source buffer management, the tokenizer, and its
//! diagnostics.
//!

#[macro_use]
extern crate static_assertions;

pub mod toolchain;
