//! Entrypoint for CLI
mod error;

use std::{
    env, fs,
    num::NonZeroUsize,
    path::{Path, PathBuf},
    process, thread,
};

use error::CliError;
use jack_compiler::{
    error::CompileError,
    lex::{debug_print_lexer, tokenize, Lexer},
    parsing::parse_class,
    preprocess::strip_comments,
    xml::{class_to_xml, tokens_to_xml},
};
use log::{error, info};

static USAGE: &str = r#"
usage: jackc CMD PATH [--jobs N]

PATH is a .jack file or a directory of .jack files.

commands:
    compile   Compile each class into a .vm file next to its source
    xml       Write the token listing (NameT.xml) and parse tree (Name.xml)
    tokens    Print the tokens of each class

options:
    --jobs N  Number of worker threads, defaults to available cores

examples:
    jackc compile Square
    jackc xml Square/Main.jack --jobs 1
"#;

const SOURCE_EXT: &str = "jack";

fn main() -> Result<(), Box<dyn std::error::Error>> {
    simple_logger::SimpleLogger::new().env().init()?;

    let args = match parse_args(env::args().skip(1)) {
        Ok(args) => args,
        Err(err) => {
            error!("{err}");
            print_usage();
            // FreeBSD EX_USAGE (64)
            process::exit(64)
        }
    };

    let files = match discover(&args.path) {
        Ok(files) => files,
        Err(err) => {
            error!("{err}");
            process::exit(1)
        }
    };

    if files.is_empty() {
        error!("no .{SOURCE_EXT} files found in {}", args.path.display());
        process::exit(1)
    }

    // Token dumps go to stdout, which must not interleave.
    let jobs = match args.cmd {
        Cmd::Tokens => 1,
        Cmd::Compile | Cmd::Xml => args.jobs,
    };

    let failures = run_all(args.cmd, &files, jobs);
    if failures > 0 {
        error!("{failures} of {} classes failed", files.len());
        process::exit(1)
    }

    Ok(())
}

/// Process every file, spreading them over at most `jobs` threads.
///
/// Returns the number of files that failed. A failed file does not
/// stop the others.
fn run_all(cmd: Cmd, files: &[PathBuf], jobs: usize) -> usize {
    let chunk_size = (files.len() + jobs - 1) / jobs.max(1);

    thread::scope(|scope| {
        let workers: Vec<_> = files
            .chunks(chunk_size.max(1))
            .map(|chunk| {
                scope.spawn(move || {
                    chunk
                        .iter()
                        .filter(|path| match process_file(cmd, path) {
                            Ok(()) => false,
                            Err(err) => {
                                error!("{err}");
                                true
                            }
                        })
                        .count()
                })
            })
            .collect();

        workers
            .into_iter()
            .map(|worker| worker.join().unwrap_or(1))
            .sum()
    })
}

fn process_file(cmd: Cmd, path: &Path) -> Result<(), CliError> {
    let source = fs::read_to_string(path).map_err(CliError::io(path))?;

    match cmd {
        Cmd::Compile => {
            let code = jack_compiler::compile_str(&source).map_err(CliError::compile(path))?;
            write_output(&path.with_extension("vm"), &code)?;
        }
        Cmd::Xml => {
            let stripped = strip_comments(&source)
                .map_err(CompileError::from)
                .map_err(CliError::compile(path))?;
            let tokens = tokenize(&stripped)
                .map_err(CompileError::from)
                .map_err(CliError::compile(path))?;
            let token_xml = tokens_to_xml(&tokens);
            let class = parse_class(tokens)
                .map_err(CompileError::from)
                .map_err(CliError::compile(path))?;

            write_output(&sibling(path, "T.xml"), &token_xml)?;
            write_output(&sibling(path, ".xml"), &class_to_xml(&class))?;
        }
        Cmd::Tokens => {
            let stripped = strip_comments(&source)
                .map_err(CompileError::from)
                .map_err(CliError::compile(path))?;
            // Reject the file before dumping anything.
            tokenize(&stripped)
                .map_err(CompileError::from)
                .map_err(CliError::compile(path))?;
            println!("{}", path.display());
            debug_print_lexer(Lexer::new(&stripped));
        }
    }

    Ok(())
}

fn write_output(path: &Path, contents: &str) -> Result<(), CliError> {
    fs::write(path, contents).map_err(CliError::io(path))?;
    info!("wrote {}", path.display());
    Ok(())
}

/// Path next to the source with the file stem followed by `suffix`.
fn sibling(path: &Path, suffix: &str) -> PathBuf {
    let stem = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default();
    path.with_file_name(format!("{stem}{suffix}"))
}

/// Source files to compile, sorted by name.
fn discover(path: &Path) -> Result<Vec<PathBuf>, CliError> {
    if path.is_file() {
        return Ok(vec![path.to_path_buf()]);
    }

    let mut files = vec![];
    for entry in fs::read_dir(path).map_err(CliError::io(path))? {
        let entry = entry.map_err(CliError::io(path))?;
        let file = entry.path();
        if file.is_file() && file.extension().map_or(false, |ext| ext == SOURCE_EXT) {
            files.push(file);
        }
    }
    files.sort();

    Ok(files)
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, CliError> {
    let cmd = match args.next().as_deref() {
        Some("compile") => Cmd::Compile,
        Some("xml") => Cmd::Xml,
        Some("tokens") => Cmd::Tokens,
        Some(other) => return Err(CliError::Usage(format!("unknown command '{other}'"))),
        None => return Err(CliError::Usage("missing command".to_string())),
    };

    let mut path = None;
    let mut jobs = thread::available_parallelism()
        .map(NonZeroUsize::get)
        .unwrap_or(1);

    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--jobs" | "-j" => {
                jobs = args
                    .next()
                    .and_then(|n| n.parse::<usize>().ok())
                    .filter(|n| *n > 0)
                    .ok_or_else(|| CliError::Usage("--jobs expects a positive number".to_string()))?;
            }
            _ if path.is_none() => path = Some(PathBuf::from(arg)),
            _ => return Err(CliError::Usage(format!("unexpected argument '{arg}'"))),
        }
    }

    let path = path.ok_or_else(|| CliError::Usage("missing PATH".to_string()))?;

    Ok(Args { cmd, path, jobs })
}

fn print_usage() {
    println!("jackc v{}", env!("CARGO_PKG_VERSION"));
    println!("{USAGE}");
}

struct Args {
    cmd: Cmd,
    path: PathBuf,
    jobs: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cmd {
    /// Generate VM code
    Compile,
    /// Analyzer XML
    Xml,
    /// Dump tokens
    Tokens,
}

#[cfg(test)]
mod test {
    use super::*;

    fn args(line: &str) -> Result<Args, CliError> {
        parse_args(line.split_whitespace().map(String::from))
    }

    #[test]
    fn test_parse_args() {
        let parsed = args("compile Square --jobs 3").unwrap();
        assert_eq!(parsed.cmd, Cmd::Compile);
        assert_eq!(parsed.path, PathBuf::from("Square"));
        assert_eq!(parsed.jobs, 3);

        assert_eq!(args("xml Main.jack").unwrap().cmd, Cmd::Xml);
    }

    #[test]
    fn test_usage_errors() {
        assert!(matches!(args(""), Err(CliError::Usage(_))));
        assert!(matches!(args("run x.jack"), Err(CliError::Usage(_))));
        assert!(matches!(args("compile"), Err(CliError::Usage(_))));
        assert!(matches!(args("compile a b"), Err(CliError::Usage(_))));
        assert!(matches!(args("compile a --jobs 0"), Err(CliError::Usage(_))));
    }

    #[test]
    fn test_tokens_fails_on_lex_error() {
        let dir = env::temp_dir().join(format!("jackc-tokens-{}", process::id()));
        fs::create_dir_all(&dir).unwrap();
        let bad = dir.join("Bad.jack");
        fs::write(&bad, "class Bad { function void f() { let s = \"open; } }").unwrap();
        let good = dir.join("Good.jack");
        fs::write(&good, "class Good { }").unwrap();

        assert!(matches!(
            process_file(Cmd::Tokens, &bad),
            Err(CliError::Compile { .. })
        ));
        assert!(process_file(Cmd::Tokens, &good).is_ok());
        assert_eq!(run_all(Cmd::Tokens, &[bad, good], 1), 1);

        fs::remove_dir_all(&dir).unwrap();
    }

    #[test]
    fn test_sibling() {
        let path = Path::new("Square/Main.jack");
        assert_eq!(sibling(path, "T.xml"), PathBuf::from("Square/MainT.xml"));
        assert_eq!(path.with_extension("vm"), PathBuf::from("Square/Main.vm"));
    }
}
