use gluon_idl::toolchain;
use gluon_idl::toolchain::lexer::token::TokenKind;

const HELP: &str = "\
    gidlc - the Gluon interface compiler front end

    USAGE:
        gidlc [--quiet] FILENAME

    OPTIONS:
        --quiet             If present, all non-error output is suppressed.

    ARGS:
        FILENAME            The path to the .gidl file to tokenize.
";

#[derive(Debug, Eq, PartialEq)]
struct GidlcArgs {
    quiet: bool,
    source_file: std::path::PathBuf,
}

fn main() {
    tracing_subscriber::fmt().with_writer(std::io::stderr).init();

    let args = match parse_args() {
        Ok(v) => v,
        Err(e) => {
            eprintln!("Error: {}.", e);
            std::process::exit(1);
        }
    };

    let source = toolchain::source::SourceBuffer::new_from_file(&args.source_file);
    let source = match source {
        Ok(source) => source,
        Err(e) => {
            eprintln!(
                "Error opening source file {}: {}",
                args.source_file.display(),
                e
            );
            std::process::exit(1);
        }
    };

    toolchain::lexer::init();
    let status = dump_tokens(&source, args.quiet);
    toolchain::lexer::shutdown();
    std::process::exit(status);
}

fn dump_tokens(source: &toolchain::source::SourceBuffer, quiet: bool) -> i32 {
    let mut lexer = toolchain::lexer::Lexer::new(source);
    if !quiet {
        println!("Tokens [");
    }
    loop {
        match lexer.get() {
            Ok(TokenKind::EndOfInput) => break,
            Ok(_) => {
                if !quiet {
                    println!(
                        "    {}:{}: {:?}",
                        lexer.line(),
                        lexer.column(),
                        lexer.current()
                    );
                }
            }
            Err(e) => {
                eprintln!("{}", e);
                return 1;
            }
        }
    }
    if !quiet {
        println!("]");
    }
    0
}

fn parse_args() -> Result<GidlcArgs, pico_args::Error> {
    let mut pargs = pico_args::Arguments::from_env();

    if pargs.contains(["-h", "--help"]) {
        print!("{}", HELP);
        std::process::exit(0);
    }

    let args = GidlcArgs {
        quiet: pargs.contains("--quiet"),
        source_file: pargs.free_from_str()?,
    };

    let remaining = pargs.finish();
    if !remaining.is_empty() {
        eprintln!("Error: unused arguments left: {:?}.", remaining);
        std::process::exit(1);
    }
    Ok(args)
}
