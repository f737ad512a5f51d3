//! The whole run: load, discover, classify, reconcile, report, persist.

use std::{io::Write, path::PathBuf};

use log::{debug, info};

use crate::{
    classify::{classify, Verdicts},
    compiler::FrontEnd,
    config::{load_config, update_config, ProjectConfig},
    discover::discover,
    error::Error,
    find_up::find_file,
    path::{normalize, normalize_from_cwd, AbsolutePath, VendorFilter},
    reconcile::{reconcile, NoFilesToAnalyzeError, Partitions},
    report::{ReportOptions, Reporter, RunStatus},
};

pub const DEFAULT_CONFIG_NAME: &str = "tsconfig.json";

#[derive(Clone, Debug)]
pub struct CheckOptions {
    /// The project configuration; relative paths resolve against the
    /// working directory.
    pub config_path: PathBuf,
    /// Directory searched recursively for source files.
    pub source_root: PathBuf,
    /// Write newly passing files into the configuration's `files` list.
    pub update: bool,
    pub vendor_filter: VendorFilter,
    /// File extensions to discover, without the leading dot.
    pub extensions: Vec<String>,
    pub report: ReportOptions,
}

impl CheckOptions {
    pub fn new<P: Into<PathBuf>, Q: Into<PathBuf>>(config_path: P, source_root: Q) -> Self {
        Self {
            config_path: config_path.into(),
            source_root: source_root.into(),
            update: false,
            vendor_filter: VendorFilter::default(),
            extensions: vec![String::from("ts")],
            report: ReportOptions::default(),
        }
    }
}

/// Everything a completed classification produced.
#[derive(Debug)]
pub struct Classification {
    pub config: ProjectConfig,
    pub verdicts: Verdicts,
    pub partitions: Partitions,
}

/// Nearest `tsconfig.json` at or above `directory`.
pub fn find_config(directory: &AbsolutePath) -> Result<AbsolutePath, Error> {
    find_file(directory.as_path(), DEFAULT_CONFIG_NAME)
        .map(|found| normalize(found, directory))
        .ok_or_else(|| Error::MissingProject {
            directory: directory.as_path().to_owned(),
        })
}

/// Load the configuration and discover source files, failing before any
/// compiler work when there is nothing to analyze.
pub fn prepare(options: &CheckOptions) -> Result<(ProjectConfig, Vec<AbsolutePath>), Error> {
    let config_path = normalize_from_cwd(&options.config_path).map_err(Error::WorkingDirectory)?;
    let source_root = normalize_from_cwd(&options.source_root).map_err(Error::WorkingDirectory)?;

    let config = load_config(&config_path)?;
    let discovered = discover(&source_root, &options.extensions)?;
    if discovered.is_empty() {
        return Err(Error::NoFilesToAnalyze {
            source_root: source_root.into_path_buf(),
            source: NoFilesToAnalyzeError,
        });
    }
    Ok((config, discovered))
}

/// Classify `discovered` under the configuration's compiler options and
/// reconcile the verdicts against its declared files.
pub fn classify_project<F: FrontEnd>(
    front_end: &F,
    config: ProjectConfig,
    discovered: &[AbsolutePath],
    vendor_filter: &VendorFilter,
) -> Result<Classification, Error> {
    let verdicts = classify(
        front_end,
        discovered,
        config.compiler_options(),
        vendor_filter,
    )?;
    let partitions = reconcile(discovered, config.declared_files(), &verdicts).map_err(
        |source| Error::NoFilesToAnalyze {
            source_root: config.directory().as_path().to_owned(),
            source,
        },
    )?;
    debug!(
        "{} to include, {} broken, {} remaining, {} already ok",
        partitions.to_include.len(),
        partitions.broken.len(),
        partitions.remaining.len(),
        partitions.already_ok.len()
    );

    Ok(Classification {
        config,
        verdicts,
        partitions,
    })
}

/// Run the full pipeline against `front_end`, reporting to `out`.
///
/// The configuration is written only after classification and reporting
/// both succeeded, and only when `options.update` is set and there is
/// something to add.
pub fn run<F, W>(options: &CheckOptions, front_end: &F, out: &mut W) -> Result<RunStatus, Error>
where
    F: FrontEnd,
    W: Write,
{
    let (config, discovered) = prepare(options)?;
    run_prepared(options, front_end, config, discovered, out)
}

/// [`run`] for a caller that already loaded the configuration and
/// discovered the files, e.g. to pick a front end from the configuration's
/// location.
pub fn run_prepared<F, W>(
    options: &CheckOptions,
    front_end: &F,
    config: ProjectConfig,
    discovered: Vec<AbsolutePath>,
    out: &mut W,
) -> Result<RunStatus, Error>
where
    F: FrontEnd,
    W: Write,
{
    let reporter = Reporter::new(
        options.report,
        config.directory().clone(),
        config.file_name(),
    );
    reporter.analyzing(out, discovered.len())?;

    let Classification {
        config,
        verdicts,
        partitions,
    } = classify_project(front_end, config, &discovered, &options.vendor_filter)?;
    reporter.report(out, &partitions, &verdicts)?;

    if options.update && !partitions.to_include.is_empty() {
        let added = update_config(config.path(), config.document(), &partitions.to_include)?;
        info!("added {} file(s) to {}", added, config.path());
        reporter.updated(out, added)?;
    }

    Ok(RunStatus::from_partitions(&partitions))
}
