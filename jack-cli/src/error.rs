//! Application errors
use jack_compiler::error::CompileError;
use std::{fmt, io, path::PathBuf};

#[derive(Debug)]
pub enum CliError {
    /// A compilation unit was rejected by the compiler.
    Compile { path: PathBuf, err: CompileError },
    Io { path: PathBuf, err: io::Error },
    /// Malformed command line.
    Usage(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Compile { path, err } => write!(f, "{}: {err}", path.display()),
            Self::Io { path, err } => write!(f, "{}: {err}", path.display()),
            Self::Usage(msg) => write!(f, "usage error: {msg}"),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Compile { err, .. } => Some(err),
            Self::Io { err, .. } => Some(err),
            Self::Usage(_) => None,
        }
    }
}

impl CliError {
    pub fn io(path: impl Into<PathBuf>) -> impl FnOnce(io::Error) -> Self {
        let path = path.into();
        move |err| Self::Io { path, err }
    }

    pub fn compile(path: impl Into<PathBuf>) -> impl FnOnce(CompileError) -> Self {
        let path = path.into();
        move |err| Self::Compile { path, err }
    }
}
