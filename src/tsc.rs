//! Drive the TypeScript compiler CLI as the compiler front end.
//!
//! `tsc` offers no way to hand it a file list and options without a project
//! file, so every unit writes a temporary project beside the real
//! configuration. Keeping it in the same directory means relative option
//! values (`baseUrl`, `typeRoots`, `paths`) resolve exactly as they would for
//! the real configuration.

use std::{
    collections::HashMap,
    fs,
    io::{self, Write},
    path::{Path, PathBuf},
    process::Command,
};

use log::{debug, trace, warn};
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use tempfile::NamedTempFile;

use crate::{
    compiler::{
        CompilationUnit, CompilerError, CompilerErrorKind, CompilerOptions, Diagnostic, FrontEnd,
    },
    find_up::find_file,
    path::{normalize, normalize_from_cwd, AbsolutePath},
};

// e.g. `src/a.ts(10,5): error TS2322: Type 'string' is not assignable to type 'number'.`
static DIAGNOSTIC_LINE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^(?P<file>.+)\((?P<line>\d+),(?P<column>\d+)\): (?P<category>error|warning|suggestion|message) TS(?P<code>\d+): (?P<message>.*)$",
    )
    .expect("diagnostic pattern should compile")
});

// tsc exits with 1 or 2 when it reports diagnostics.
const SUCCESSFUL_EXIT_CODES: [i32; 3] = [0, 1, 2];

#[derive(Clone, Debug)]
pub struct Tsc {
    executable: PathBuf,
    working_directory: AbsolutePath,
    extends: Option<Value>,
}

impl Tsc {
    /// Use `executable`, running it from `working_directory`. Temporary
    /// projects are written to `working_directory` as well.
    pub fn new<P: Into<PathBuf>>(executable: P, working_directory: AbsolutePath) -> Self {
        Self {
            executable: executable.into(),
            working_directory,
            extends: None,
        }
    }

    /// Use an `executable` given on the command line. A bare program name is
    /// looked up on `PATH`; anything with a directory part is resolved
    /// against the process working directory, not `working_directory`.
    pub fn from_command_line<P: AsRef<Path>>(
        executable: P,
        working_directory: AbsolutePath,
    ) -> io::Result<Self> {
        let executable = executable.as_ref();
        let executable = if executable.components().count() > 1 {
            normalize_from_cwd(executable)?.into_path_buf()
        } else {
            executable.to_owned()
        };
        Ok(Self::new(executable, working_directory))
    }

    /// Find `tsc` for a project rooted at `project_directory`: the nearest
    /// `node_modules/.bin/tsc` at or above it, else `tsc` on `PATH`.
    pub fn locate(project_directory: AbsolutePath) -> Result<Self, CompilerError> {
        let executable = find_file(project_directory.as_path(), local_tsc())
            .or_else(|| which::which("tsc").ok())
            .ok_or_else(|| CompilerErrorKind::NotFound {
                searched_from: project_directory.as_path().to_owned(),
            })?;
        debug!("using tsc at {:?}", executable);
        Ok(Self::new(executable, project_directory))
    }

    /// Inherit from the same base configuration(s) as the project, given as
    /// the raw value of its `extends` key.
    pub fn extending(mut self, extends: Option<Value>) -> Self {
        self.extends = extends;
        self
    }
}

fn local_tsc() -> PathBuf {
    let name = if cfg!(windows) { "tsc.cmd" } else { "tsc" };
    Path::new("node_modules").join(".bin").join(name)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TemporaryProject<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    extends: Option<&'a Value>,
    compiler_options: &'a CompilerOptions,
    // Empty so a base configuration's `include` is not inherited.
    include: &'a [String],
    files: &'a [AbsolutePath],
}

impl FrontEnd for Tsc {
    type Unit = TscUnit;

    fn build_unit(
        &self,
        files: &[AbsolutePath],
        options: &CompilerOptions,
    ) -> Result<Self::Unit, CompilerError> {
        (|| -> Result<TscUnit, CompilerErrorKind> {
            let contents = serde_json::to_vec_pretty(&TemporaryProject {
                extends: self.extends.as_ref(),
                compiler_options: options,
                include: &[],
                files,
            })
            .map_err(CompilerErrorKind::Serialize)?;

            let mut project = tempfile::Builder::new()
                .prefix(".tscfc-")
                .suffix(".json")
                .tempfile_in(self.working_directory.as_path())
                .map_err(CompilerErrorKind::Project)?;
            project
                .write_all(&contents)
                .map_err(CompilerErrorKind::Project)?;
            trace!("temporary project {:?} lists {} file(s)", project.path(), files.len());

            Ok(TscUnit {
                tsc: self.clone(),
                project,
            })
        })()
        .map_err(CompilerError::from)
    }
}

/// A temporary project file; removed from disk when dropped.
#[derive(Debug)]
pub struct TscUnit {
    tsc: Tsc,
    project: NamedTempFile,
}

impl CompilationUnit for TscUnit {
    fn semantic_diagnostics(&self) -> Result<Vec<Diagnostic>, CompilerError> {
        (|| -> Result<Vec<Diagnostic>, CompilerErrorKind> {
            let mut command = Command::new(&self.tsc.executable);
            command
                .current_dir(self.tsc.working_directory.as_path())
                .arg("--project")
                .arg(self.project.path())
                .args(["--noEmit", "--pretty", "false"]);
            debug!("running {:?}", command);

            let child = command.output().map_err(CompilerErrorKind::Command)?;
            if !child
                .status
                .code()
                .map(|code| SUCCESSFUL_EXIT_CODES.contains(&code))
                .unwrap_or(false)
            {
                return Err(CompilerErrorKind::TypescriptCompiler {
                    command: format!("{:?}", command),
                    status: child.status,
                    error: child.stderr,
                });
            }
            let stdout = String::from_utf8(child.stdout)?;

            let mut sources = SourceCache::default();
            let diagnostics = parse_diagnostics(&stdout)
                .into_iter()
                .map(|reported| {
                    let file = normalize(&reported.file, &self.tsc.working_directory);
                    let offset = sources.offset(&file, reported.line, reported.column);
                    Diagnostic {
                        file,
                        code: reported.code,
                        message: reported.message,
                        offset,
                        line: reported.line,
                        column: reported.column,
                    }
                })
                .collect();
            Ok(diagnostics)
        })()
        .map_err(CompilerError::from)
    }
}

#[derive(Debug, PartialEq, Eq)]
struct ReportedDiagnostic {
    file: String,
    line: u32,
    column: u32,
    code: u32,
    message: String,
}

/// Parse `tsc --pretty false` output. Indented lines continue the message
/// of the diagnostic above them; diagnostics without a file location are
/// dropped since they cannot be attributed.
fn parse_diagnostics(output: &str) -> Vec<ReportedDiagnostic> {
    let mut diagnostics: Vec<ReportedDiagnostic> = Vec::new();
    let mut continues_previous = false;

    for line in output.lines() {
        if line.trim().is_empty() {
            continue;
        }
        if line.starts_with(char::is_whitespace) {
            if continues_previous {
                if let Some(previous) = diagnostics.last_mut() {
                    previous.message.push('\n');
                    previous.message.push_str(line.trim_end());
                }
            }
            continue;
        }

        match parse_diagnostic_line(line) {
            Some(diagnostic) => {
                diagnostics.push(diagnostic);
                continues_previous = true;
            }
            None => {
                warn!("ignoring tsc output without a file location: {}", line);
                continues_previous = false;
            }
        }
    }

    diagnostics
}

fn parse_diagnostic_line(line: &str) -> Option<ReportedDiagnostic> {
    let captures = DIAGNOSTIC_LINE.captures(line)?;
    Some(ReportedDiagnostic {
        file: captures["file"].to_owned(),
        line: captures["line"].parse().ok()?,
        column: captures["column"].parse().ok()?,
        code: captures["code"].parse().ok()?,
        message: captures["message"].to_owned(),
    })
}

/// Source text of every file a diagnostic points into, read at most once.
#[derive(Default)]
struct SourceCache {
    sources: HashMap<AbsolutePath, String>,
}

impl SourceCache {
    /// Offset of `line` and `column` in `file`, or 0 when the file cannot
    /// be read. Such diagnostics usually belong to files the compiler pulled
    /// in by itself and are dropped later on.
    fn offset(&mut self, file: &AbsolutePath, line: u32, column: u32) -> usize {
        if !self.sources.contains_key(file) {
            match fs::read_to_string(file) {
                Ok(text) => {
                    self.sources.insert(file.clone(), text);
                }
                Err(err) => {
                    warn!("unable to read {} for diagnostic offsets: {}", file, err);
                    return 0;
                }
            }
        }
        self.sources
            .get(file)
            .map(|text| line_column_to_offset(text, line, column))
            .unwrap_or_default()
    }
}

/// Byte offset of a 1-based line and column. Columns count characters and
/// are clamped to the end of their line.
fn line_column_to_offset(text: &str, line: u32, column: u32) -> usize {
    let mut offset = 0;
    for (index, content) in text.split_inclusive('\n').enumerate() {
        if index + 1 == line as usize {
            let within_line: usize = content
                .chars()
                .take(column.saturating_sub(1) as usize)
                .map(char::len_utf8)
                .sum();
            return offset + within_line;
        }
        offset += content.len();
    }
    offset
}
