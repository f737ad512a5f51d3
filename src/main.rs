use std::{
    io::{self, Write},
    path::PathBuf,
    process::ExitCode,
};

use clap::Parser;
use log::LevelFilter;
use owo_colors::OwoColorize;
use tsconfig_files_check::{
    check::{find_config, prepare, run_prepared, CheckOptions},
    error::Error,
    path::{normalize_from_cwd, VendorFilter},
    report::{ReportOptions, RunStatus},
    tsc::Tsc,
};

// Fatal errors exit with a status distinct from the "broken files" status.
const FATAL_EXIT_CODE: u8 = 2;

/// Find TypeScript files that type-check under a (stricter) tsconfig and add
/// them to its `files` list.
///
/// Example: tscfc --project ../App/tsconfig.strict.json ../App/src
#[derive(Debug, Parser)]
#[command(name = "tscfc", author, version, about)]
struct Cli {
    /// Path to your tsconfig.json; defaults to the nearest one above the
    /// working directory
    #[arg(short, long)]
    project: Option<PathBuf>,

    /// Include newly passing files in the tsconfig
    #[arg(long)]
    update: bool,

    /// Print every file that still fails and is not yet included
    #[arg(long)]
    remaining: bool,

    /// Print all logs, useful for debugging
    #[arg(long)]
    verbose: bool,

    /// Do not colorize output
    #[arg(long)]
    no_color: bool,

    /// Path to the tsc executable; defaults to node_modules/.bin/tsc or tsc
    /// on PATH
    #[arg(long)]
    tsc: Option<PathBuf>,

    /// Directory name whose contents are never checked
    #[arg(long = "vendor-dir", default_value = "node_modules")]
    vendor_dirs: Vec<String>,

    /// Extension of the source files to check
    #[arg(long = "extension", default_value = "ts")]
    extensions: Vec<String>,

    /// Directory containing the source files to check
    #[arg()]
    source_path: PathBuf,
}

fn init_logging(verbose: bool) {
    let default_level = if verbose {
        LevelFilter::Debug
    } else {
        LevelFilter::Warn
    };
    env_logger::Builder::new()
        .filter_level(default_level)
        .parse_default_env()
        .init();
}

fn check(cli: Cli) -> Result<RunStatus, Error> {
    let project = match cli.project {
        Some(project) => project,
        None => {
            let cwd = normalize_from_cwd(".").map_err(Error::WorkingDirectory)?;
            find_config(&cwd)?.into_path_buf()
        }
    };

    let options = CheckOptions {
        config_path: project,
        source_root: cli.source_path,
        update: cli.update,
        vendor_filter: VendorFilter::new(cli.vendor_dirs),
        extensions: cli.extensions,
        report: ReportOptions {
            verbose: cli.verbose,
            show_remaining: cli.remaining,
            color: !cli.no_color,
        },
    };

    let (config, discovered) = prepare(&options)?;
    let tsc = match cli.tsc {
        Some(executable) => Tsc::from_command_line(executable, config.directory().clone())
            .map_err(Error::WorkingDirectory)?,
        None => Tsc::locate(config.directory().clone())?,
    }
    .extending(config.extends().cloned());

    let stdout = io::stdout();
    let mut out = stdout.lock();
    let status = run_prepared(&options, &tsc, config, discovered, &mut out)?;
    out.flush()?;
    Ok(status)
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let color = !cli.no_color;

    match check(cli) {
        Ok(status) => ExitCode::from(status.exit_code() as u8),
        Err(err) => {
            let code = err.code();
            let message = format!("{:#}", anyhow::Error::from(err));
            if color {
                eprintln!("{}\n{}", code.red(), message.red());
            } else {
                eprintln!("{}\n{}", code, message);
            }
            ExitCode::from(FATAL_EXIT_CODE)
        }
    }
}
