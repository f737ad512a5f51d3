//! Read a project configuration and write newly passing files back into it.
//!
//! The configuration is kept as the parsed [`serde_json::Value`] alongside the
//! extracted fields, so a rewrite only touches the `files` list and leaves
//! every other key (and its position) as it was.

use std::{error::Error, fmt::Display, fs, io, path::PathBuf};

use indexmap::IndexSet;
use log::{debug, info};
use serde_json::{Map, Value};

use crate::{
    compiler::CompilerOptions,
    io::{read_jsonc_from_file, write_atomically, FromFileError, FromFileErrorKind},
    path::{normalize, AbsolutePath},
};

const FILES: &str = "files";
const COMPILER_OPTIONS: &str = "compilerOptions";
const EXTENDS: &str = "extends";

#[derive(Debug, Clone)]
pub struct ProjectConfig {
    path: AbsolutePath,
    directory: AbsolutePath,
    compiler_options: CompilerOptions,
    declared_files: Vec<AbsolutePath>,
    document: Value,
}

impl ProjectConfig {
    pub fn path(&self) -> &AbsolutePath {
        &self.path
    }

    /// The directory every relative `files` entry is resolved against.
    pub fn directory(&self) -> &AbsolutePath {
        &self.directory
    }

    /// File name of the configuration, for display.
    pub fn file_name(&self) -> String {
        self.path
            .as_path()
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string())
    }

    pub fn compiler_options(&self) -> &CompilerOptions {
        &self.compiler_options
    }

    /// Entries of `files`, resolved and de-duplicated in declaration order.
    pub fn declared_files(&self) -> &[AbsolutePath] {
        &self.declared_files
    }

    /// The raw `extends` value: one base configuration or a list of them,
    /// relative to [`ProjectConfig::directory`].
    pub fn extends(&self) -> Option<&Value> {
        self.document.get(EXTENDS)
    }

    /// The complete parsed document.
    pub fn document(&self) -> &Value {
        &self.document
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct LoadConfigError {
    path: PathBuf,
    kind: LoadConfigErrorKind,
}

impl LoadConfigError {
    pub fn kind(&self) -> &LoadConfigErrorKind {
        &self.kind
    }
}

impl Display for LoadConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            LoadConfigErrorKind::NotFound => write!(
                f,
                "provided project path {:?} doesn't exist, make sure that the project path is correct",
                self.path
            ),
            LoadConfigErrorKind::Unreadable(_) => write!(
                f,
                "cannot read provided project path {:?}, make sure that the project path is correct",
                self.path
            ),
            LoadConfigErrorKind::Parse(_) => write!(
                f,
                "cannot parse provided project {:?}, make sure that the tsconfig is valid",
                self.path
            ),
            LoadConfigErrorKind::NotAnObject => {
                write!(f, "project {:?} is not a JSON object", self.path)
            }
            LoadConfigErrorKind::InvalidFiles => write!(
                f,
                "project {:?} has a `files` entry that is not a list of paths",
                self.path
            ),
        }
    }
}

impl Error for LoadConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            LoadConfigErrorKind::Unreadable(err) => Some(err),
            LoadConfigErrorKind::Parse(err) => Some(err),
            LoadConfigErrorKind::NotFound
            | LoadConfigErrorKind::NotAnObject
            | LoadConfigErrorKind::InvalidFiles => None,
        }
    }
}

#[derive(Debug)]
pub enum LoadConfigErrorKind {
    #[non_exhaustive]
    NotFound,
    #[non_exhaustive]
    Unreadable(FromFileError),
    #[non_exhaustive]
    Parse(FromFileError),
    #[non_exhaustive]
    NotAnObject,
    #[non_exhaustive]
    InvalidFiles,
}

impl From<FromFileError> for LoadConfigErrorKind {
    fn from(err: FromFileError) -> Self {
        if matches!(err.kind(), FromFileErrorKind::NotFound) {
            Self::NotFound
        } else if matches!(err.kind(), FromFileErrorKind::Parse(_)) {
            Self::Parse(err)
        } else {
            Self::Unreadable(err)
        }
    }
}

/// Load the project configuration at `path`.
///
/// Missing `files` means nothing is declared yet; missing `compilerOptions`
/// forwards an empty options object.
pub fn load_config(path: &AbsolutePath) -> Result<ProjectConfig, LoadConfigError> {
    (|| -> Result<ProjectConfig, LoadConfigErrorKind> {
        info!("Reading tsconfig {}", path);
        let document: Value = read_jsonc_from_file(path)?;
        let object = document.as_object().ok_or(LoadConfigErrorKind::NotAnObject)?;
        let directory = path.parent();

        let declared_files = match object.get(FILES) {
            None => Vec::new(),
            Some(Value::Array(entries)) => entries
                .iter()
                .map(|entry| {
                    entry
                        .as_str()
                        .map(|relative| normalize(relative, &directory))
                        .ok_or(LoadConfigErrorKind::InvalidFiles)
                })
                .collect::<Result<IndexSet<_>, _>>()?
                .into_iter()
                .collect(),
            Some(_) => return Err(LoadConfigErrorKind::InvalidFiles),
        };
        debug!("{} declares {} file(s)", path, declared_files.len());

        let compiler_options = object
            .get(COMPILER_OPTIONS)
            .cloned()
            .map(CompilerOptions::from)
            .unwrap_or_default();

        Ok(ProjectConfig {
            path: path.clone(),
            directory,
            compiler_options,
            declared_files,
            document,
        })
    })()
    .map_err(|kind| LoadConfigError {
        path: path.as_path().to_owned(),
        kind,
    })
}

#[derive(Debug)]
#[non_exhaustive]
pub struct WriteConfigError {
    path: PathBuf,
    kind: WriteConfigErrorKind,
}

impl WriteConfigError {
    pub fn kind(&self) -> &WriteConfigErrorKind {
        &self.kind
    }
}

impl Display for WriteConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            WriteConfigErrorKind::NotFound => write!(
                f,
                "project {:?} disappeared before it could be updated",
                self.path
            ),
            WriteConfigErrorKind::NotAnObject => {
                write!(f, "project {:?} is not a JSON object", self.path)
            }
            WriteConfigErrorKind::InvalidFiles => write!(
                f,
                "project {:?} has a `files` entry that is not a list",
                self.path
            ),
            WriteConfigErrorKind::NonUtf8Path(file) => {
                write!(f, "cannot express {:?} as a UTF-8 `files` entry", file)
            }
            WriteConfigErrorKind::Serialize(_) => {
                write!(f, "unable to serialize project {:?}", self.path)
            }
            WriteConfigErrorKind::Write(_) => write!(f, "unable to write project {:?}", self.path),
        }
    }
}

impl Error for WriteConfigError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            WriteConfigErrorKind::Serialize(err) => Some(err),
            WriteConfigErrorKind::Write(err) => Some(err),
            WriteConfigErrorKind::NotFound
            | WriteConfigErrorKind::NotAnObject
            | WriteConfigErrorKind::InvalidFiles
            | WriteConfigErrorKind::NonUtf8Path(_) => None,
        }
    }
}

#[derive(Debug)]
pub enum WriteConfigErrorKind {
    #[non_exhaustive]
    NotFound,
    #[non_exhaustive]
    NotAnObject,
    #[non_exhaustive]
    InvalidFiles,
    #[non_exhaustive]
    NonUtf8Path(PathBuf),
    #[non_exhaustive]
    Serialize(serde_json::Error),
    #[non_exhaustive]
    Write(std::io::Error),
}

/// Append every path in `to_add` that is not already listed to the `files`
/// entry of `original_document` and write the result to `path`.
///
/// Entries are stored relative to the configuration's directory. An entry
/// counts as already listed when it resolves to the same file, so `./a.ts`
/// and `a.ts` are never both present. Returns how many entries were added.
///
/// The document is serialized completely before the file is touched; on any
/// failure the file on disk is left as it was.
pub fn update_config(
    path: &AbsolutePath,
    original_document: &Value,
    to_add: &[AbsolutePath],
) -> Result<usize, WriteConfigError> {
    (|| -> Result<usize, WriteConfigErrorKind> {
        if let Err(err) = fs::metadata(path) {
            return Err(if err.kind() == io::ErrorKind::NotFound {
                WriteConfigErrorKind::NotFound
            } else {
                WriteConfigErrorKind::Write(err)
            });
        }
        let directory = path.parent();

        let mut document = original_document.clone();
        let object = document
            .as_object_mut()
            .ok_or(WriteConfigErrorKind::NotAnObject)?;
        let added = append_files(object, &directory, to_add)?;

        let mut serialized =
            serde_json::to_string_pretty(&document).map_err(WriteConfigErrorKind::Serialize)?;
        serialized.push('\n');
        write_atomically(path.as_path(), serialized.as_bytes())
            .map_err(WriteConfigErrorKind::Write)?;
        debug!("wrote {} new file(s) to {}", added, path);
        Ok(added)
    })()
    .map_err(|kind| WriteConfigError {
        path: path.as_path().to_owned(),
        kind,
    })
}

fn append_files(
    object: &mut Map<String, Value>,
    directory: &AbsolutePath,
    to_add: &[AbsolutePath],
) -> Result<usize, WriteConfigErrorKind> {
    let files = object
        .entry(FILES)
        .or_insert_with(|| Value::Array(Vec::new()))
        .as_array_mut()
        .ok_or(WriteConfigErrorKind::InvalidFiles)?;

    let mut listed: IndexSet<AbsolutePath> = files
        .iter()
        .filter_map(Value::as_str)
        .map(|entry| normalize(entry, directory))
        .collect();

    let mut added = 0;
    for file in to_add {
        if !listed.insert(file.clone()) {
            continue;
        }
        let relative = file.relative_to(directory);
        let entry = relative
            .to_str()
            .ok_or_else(|| WriteConfigErrorKind::NonUtf8Path(relative.clone()))?
            .to_owned();
        files.push(Value::String(entry));
        added += 1;
    }
    Ok(added)
}
