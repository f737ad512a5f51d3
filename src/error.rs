use std::path::PathBuf;

use crate::{
    compiler::CompilerError,
    config::{LoadConfigError, LoadConfigErrorKind, WriteConfigError, WriteConfigErrorKind},
    discover::{DiscoverError, DiscoverErrorKind},
    reconcile::NoFilesToAnalyzeError,
};

/// Everything that stops a run before it can report.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("no tsconfig.json found in {directory:?} or any parent, pass one with --project")]
    MissingProject { directory: PathBuf },

    #[error("unable to determine the working directory")]
    WorkingDirectory(#[source] std::io::Error),

    #[error(transparent)]
    LoadConfig(#[from] LoadConfigError),

    #[error(transparent)]
    Discover(#[from] DiscoverError),

    #[error("there are no typescript files in {source_root:?}")]
    NoFilesToAnalyze {
        source_root: PathBuf,
        #[source]
        source: NoFilesToAnalyzeError,
    },

    #[error("error invoking the TypeScript compiler")]
    Compiler(#[from] CompilerError),

    #[error(transparent)]
    WriteConfig(#[from] WriteConfigError),

    #[error("unable to write report")]
    Report(#[from] std::io::Error),
}

impl Error {
    /// Stable, machine-readable name of the failure.
    pub fn code(&self) -> &'static str {
        match self {
            Error::MissingProject { .. } => "MISSING_PROJECT",
            Error::WorkingDirectory(_) => "WORKING_DIRECTORY_ERROR",
            Error::LoadConfig(err) => match err.kind() {
                LoadConfigErrorKind::NotFound => "CONFIG_NOT_FOUND",
                LoadConfigErrorKind::Unreadable(_) => "CONFIG_UNREADABLE",
                LoadConfigErrorKind::Parse(_)
                | LoadConfigErrorKind::NotAnObject
                | LoadConfigErrorKind::InvalidFiles => "CONFIG_PARSE_ERROR",
            },
            Error::Discover(err) => match err.kind() {
                DiscoverErrorKind::MissingSourcePath => "MISSING_SOURCE_PATH",
                DiscoverErrorKind::Pattern(_) | DiscoverErrorKind::Walk(_) => "DISCOVERY_ERROR",
            },
            Error::NoFilesToAnalyze { .. } => "NO_FILES_TO_ANALYZE",
            Error::Compiler(_) => "COMPILER_ERROR",
            Error::WriteConfig(err) => match err.kind() {
                WriteConfigErrorKind::NotFound => "CONFIG_NOT_FOUND",
                _ => "CONFIG_WRITE_ERROR",
            },
            Error::Report(_) => "REPORT_ERROR",
        }
    }
}
