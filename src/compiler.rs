//! The seam between classification and whatever type-checks the files.
//!
//! [`FrontEnd`] builds a compilation unit over an exact set of files and
//! [`CompilationUnit`] reports its semantic diagnostics. The shipped
//! implementation lives in [`crate::tsc`]; tests substitute their own.

use std::{error::Error, fmt::Display, path::PathBuf, process::ExitStatus, string};

use serde::Serialize;
use serde_json::Value;

use crate::path::AbsolutePath;

/// The `compilerOptions` of a project, forwarded to the compiler verbatim.
///
/// Nothing in this crate reads individual options; only the front end
/// needs to understand their shape.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(transparent)]
pub struct CompilerOptions(Value);

impl Default for CompilerOptions {
    fn default() -> Self {
        Self(Value::Object(Default::default()))
    }
}

impl From<Value> for CompilerOptions {
    fn from(value: Value) -> Self {
        Self(value)
    }
}

impl CompilerOptions {
    pub fn as_value(&self) -> &Value {
        &self.0
    }
}

/// One issue reported by the compiler against a single file.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub file: AbsolutePath,
    /// Numeric diagnostic code (`2322` for `TS2322`); `0` means no code.
    pub code: u32,
    pub message: String,
    /// Byte offset into the file's text.
    pub offset: usize,
    /// 1-based line.
    pub line: u32,
    /// 1-based column.
    pub column: u32,
}

impl Diagnostic {
    /// Diagnostics without a code are informational and never count as
    /// errors.
    pub fn is_error(&self) -> bool {
        self.code != 0
    }
}

pub trait FrontEnd {
    type Unit: CompilationUnit;

    /// Prepare a type-checking unit over exactly `files`.
    fn build_unit(
        &self,
        files: &[AbsolutePath],
        options: &CompilerOptions,
    ) -> Result<Self::Unit, CompilerError>;
}

pub trait CompilationUnit {
    /// Every semantic diagnostic of the unit, in the order the compiler
    /// reported them. This may include diagnostics for files the unit pulled
    /// in through imports or type references.
    fn semantic_diagnostics(&self) -> Result<Vec<Diagnostic>, CompilerError>;
}

#[derive(Debug)]
#[non_exhaustive]
pub struct CompilerError {
    kind: CompilerErrorKind,
}

impl CompilerError {
    pub fn kind(&self) -> &CompilerErrorKind {
        &self.kind
    }
}

impl From<CompilerErrorKind> for CompilerError {
    fn from(kind: CompilerErrorKind) -> Self {
        Self { kind }
    }
}

impl Display for CompilerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            CompilerErrorKind::NotFound { searched_from } => write!(
                f,
                "unable to find tsc in node_modules above {:?} or on PATH",
                searched_from
            ),
            CompilerErrorKind::Project(_) => {
                write!(f, "unable to write temporary project for tsc")
            }
            CompilerErrorKind::Serialize(_) => {
                write!(f, "unable to serialize temporary project for tsc")
            }
            CompilerErrorKind::Command(_) => write!(f, "unable to spawn child process"),
            CompilerErrorKind::TypescriptCompiler {
                command,
                status,
                error,
            } => {
                writeln!(f, "tsc failed with {} for command {:?}:", status, command)?;
                write!(f, "{}", String::from_utf8_lossy(error))
            }
            CompilerErrorKind::InvalidUtf8(_) => {
                write!(f, "command output included invalid UTF-8")
            }
        }
    }
}

impl Error for CompilerError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            CompilerErrorKind::NotFound { .. } => None,
            CompilerErrorKind::Project(err) => Some(err),
            CompilerErrorKind::Serialize(err) => Some(err),
            CompilerErrorKind::Command(err) => Some(err),
            CompilerErrorKind::TypescriptCompiler { .. } => None,
            CompilerErrorKind::InvalidUtf8(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum CompilerErrorKind {
    #[non_exhaustive]
    NotFound { searched_from: PathBuf },
    #[non_exhaustive]
    Project(std::io::Error),
    #[non_exhaustive]
    Serialize(serde_json::Error),
    #[non_exhaustive]
    Command(std::io::Error),
    #[non_exhaustive]
    TypescriptCompiler {
        command: String,
        status: ExitStatus,
        error: Vec<u8>,
    },
    #[non_exhaustive]
    InvalidUtf8(string::FromUtf8Error),
}

impl From<string::FromUtf8Error> for CompilerErrorKind {
    fn from(err: string::FromUtf8Error) -> Self {
        Self::InvalidUtf8(err)
    }
}
