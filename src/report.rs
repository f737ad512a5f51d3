//! Human-readable summary of a run.

use std::{fmt::Display, io::Write};

use owo_colors::OwoColorize;

use crate::{classify::Verdicts, path::AbsolutePath, reconcile::Partitions};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ReportOptions {
    /// List every error-free and every failing file.
    pub verbose: bool,
    /// List files that still fail and are not yet declared.
    pub show_remaining: bool,
    pub color: bool,
}

/// Terminal status of a run that completed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RunStatus {
    /// No declared file fails.
    Clean,
    /// At least one declared file fails.
    Broken,
}

impl RunStatus {
    pub fn from_partitions(partitions: &Partitions) -> Self {
        if partitions.has_broken() {
            Self::Broken
        } else {
            Self::Clean
        }
    }

    pub fn exit_code(self) -> i32 {
        match self {
            Self::Clean => 0,
            Self::Broken => 1,
        }
    }
}

/// Renders paths relative to the configuration directory.
#[derive(Debug)]
pub struct Reporter {
    options: ReportOptions,
    base_directory: AbsolutePath,
    config_name: String,
}

impl Reporter {
    pub fn new(options: ReportOptions, base_directory: AbsolutePath, config_name: String) -> Self {
        Self {
            options,
            base_directory,
            config_name,
        }
    }

    pub fn analyzing<W: Write>(&self, out: &mut W, file_count: usize) -> std::io::Result<()> {
        writeln!(out, "Analyzing {} typescript files ...", file_count)
    }

    pub fn report<W: Write>(
        &self,
        out: &mut W,
        partitions: &Partitions,
        verdicts: &Verdicts,
    ) -> std::io::Result<()> {
        if self.options.verbose {
            let ok: Vec<&AbsolutePath> = verdicts.error_free().collect();
            writeln!(out, "--- Files Ok: {} ---", ok.len())?;
            for file in ok {
                writeln!(out, "{}", self.relative(file))?;
            }
            writeln!(out, "--- Files with errors: {} ---", verdicts.errors().len())?;
            for file in verdicts.errors().keys() {
                writeln!(out, "{}", self.relative(file))?;
            }
        }

        if !partitions.to_include.is_empty() {
            writeln!(
                out,
                "\nInclude {} file(s) to '{}'",
                partitions.to_include.len(),
                self.config_name
            )?;
            for file in &partitions.to_include {
                writeln!(out, "{}", self.highlight(self.relative(file)))?;
            }
        }

        if self.options.show_remaining {
            writeln!(
                out,
                "Remaining {}/{} files to be fixed",
                partitions.remaining.len(),
                partitions.total()
            )?;
            for file in &partitions.remaining {
                writeln!(out, "\t{}", self.relative(file))?;
            }
        }

        if partitions.has_broken() {
            writeln!(out, "Found errors in {} file(s)", partitions.broken.len())?;
            for file in &partitions.broken {
                let diagnostics = verdicts.diagnostics(file).unwrap_or_default();
                writeln!(
                    out,
                    "File {} was broken with {} error(s)",
                    self.alarm(self.relative(file)),
                    diagnostics.len()
                )?;
                for diagnostic in diagnostics {
                    writeln!(
                        out,
                        "\tTS{}: {}",
                        diagnostic.code,
                        self.alarm(&diagnostic.message)
                    )?;
                }
            }
        }

        Ok(())
    }

    pub fn updated<W: Write>(&self, out: &mut W, added: usize) -> std::io::Result<()> {
        writeln!(out, "Updated '{}' with {} file(s)", self.config_name, added)
    }

    fn relative(&self, file: &AbsolutePath) -> String {
        file.relative_to(&self.base_directory).display().to_string()
    }

    fn highlight<T: Display>(&self, text: T) -> String {
        if self.options.color {
            text.bright_yellow().to_string()
        } else {
            text.to_string()
        }
    }

    fn alarm<T: Display>(&self, text: T) -> String {
        if self.options.color {
            text.red().to_string()
        } else {
            text.to_string()
        }
    }
}
