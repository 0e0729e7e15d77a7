#![no_main]

use libfuzzer_sys::fuzz_target;

use gluon_idl::toolchain::lexer::token::TokenKind;

// Arbitrary bytes must lex to the end of input or to a single reported
// error without crashing.
fuzz_target!(|data: &[u8]| {
    let source = gluon_idl::toolchain::source::SourceBuffer::new_from_bytes(
        data,
        "fuzz_targets/lex.rs",
    )
    .unwrap();
    let mut lexer = gluon_idl::toolchain::lexer::Lexer::new(&source);
    loop {
        match lexer.get() {
            Ok(TokenKind::EndOfInput) => break,
            Ok(_) => (),
            Err(_) => break,
        }
    }
});
