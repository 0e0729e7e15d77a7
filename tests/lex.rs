use bstr::BString;

use gluon_idl::toolchain;
use gluon_idl::toolchain::lexer::keyword::Keyword;
use gluon_idl::toolchain::lexer::token::{NumberValue, TokenKind, TokenValue};
use gluon_idl::toolchain::lexer::Lexer;

// Lexes a checked-in interface file through the memory-mapped path, the same
// way the compiler driver does.
#[test]
fn lex_display_fixture() {
    toolchain::lexer::init();

    let path = std::path::PathBuf::from("tests/data/display.gidl");
    let source = toolchain::source::SourceBuffer::new_from_file(&path)
        .expect("fixture should open and map");
    let mut lexer = Lexer::new(&source);

    let mut doc_comments = Vec::new();
    let mut strings = Vec::new();
    let mut numbers = Vec::new();
    let mut keywords = Vec::new();
    loop {
        match lexer.get().expect("fixture should lex cleanly") {
            TokenKind::EndOfInput => break,
            TokenKind::DocComment => {
                if let TokenValue::Text(text) = &lexer.current().value {
                    doc_comments.push(text.clone());
                }
            }
            TokenKind::String => {
                if let TokenValue::Bytes(bytes) = &lexer.current().value {
                    strings.push(bytes.clone());
                }
            }
            TokenKind::Number => {
                if let TokenValue::Number(value) = lexer.current().value {
                    numbers.push(value);
                }
            }
            TokenKind::Value => {
                if let Some(kw) = lexer.current().kw {
                    keywords.push(kw);
                }
            }
            TokenKind::Char(_) => {}
        }
    }

    assert_eq!(doc_comments.len(), 2);
    assert!(doc_comments[0].starts_with("A rectangular display surface."));
    // Re-indentation of continuation lines is stripped.
    assert!(doc_comments[0].contains("\nDeclares the size property"));
    assert_eq!(doc_comments[1], "Pushes pending pixels out.");

    assert_eq!(strings, vec![BString::from(b"default\n".to_vec())]);

    assert_eq!(numbers, vec![NumberValue::Double(2.2), NumberValue::Ulong(0x10)]);

    for expected in [
        Keyword::Class,
        Keyword::Properties,
        Keyword::Get,
        Keyword::Set,
        Keyword::Keys,
        Keyword::Values,
        Keyword::Methods,
        Keyword::Return,
        Keyword::Params,
        Keyword::AtIn,
        Keyword::AtNonull,
        Keyword::AtOut,
    ] {
        assert!(keywords.contains(&expected), "missing keyword {:?}", expected);
    }

    toolchain::lexer::shutdown();
}

// The balanced capture entry point is how the grammar reads the free-form
// default value inside parentheses.
#[test]
fn balanced_capture_reads_default_values() {
    let source = toolchain::source::SourceBuffer::new_from_string(
        "(width * height)",
        "defaults.gidl",
    )
    .unwrap();
    let mut lexer = Lexer::new(&source);
    assert_eq!(lexer.get().unwrap(), TokenKind::Char(b'('));
    assert!(lexer.get_balanced(b'(', b')').unwrap());
    assert_eq!(
        lexer.current().value,
        TokenValue::Text(String::from("width * height"))
    );
    assert_eq!(lexer.get().unwrap(), TokenKind::Char(b')'));
}

#[test]
fn missing_source_file_reports_the_os_error() {
    let path = std::path::PathBuf::from("tests/data/no_such_file.gidl");
    assert!(toolchain::source::SourceBuffer::new_from_file(&path).is_err());
}
