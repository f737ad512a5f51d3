use std::{
    error::Error,
    fmt::Display,
    fs::{self, File},
    io::{self, Read, Write},
    path::{Path, PathBuf},
};

use serde::Deserialize;

#[derive(Debug)]
#[non_exhaustive]
pub struct FromFileError {
    path: PathBuf,
    kind: FromFileErrorKind,
}

impl FromFileError {
    pub fn kind(&self) -> &FromFileErrorKind {
        &self.kind
    }
}

impl Display for FromFileError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            FromFileErrorKind::NotFound => write!(f, "file {:?} does not exist", self.path),
            FromFileErrorKind::Open(_) => write!(f, "unable to open file {:?}", self.path),
            FromFileErrorKind::Read(_) => write!(f, "unable to read file {:?}", self.path),
            FromFileErrorKind::Parse(_) => write!(f, "unable to parse file {:?}", self.path),
        }
    }
}

impl Error for FromFileError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            FromFileErrorKind::NotFound => None,
            FromFileErrorKind::Open(err) => Some(err),
            FromFileErrorKind::Read(err) => Some(err),
            FromFileErrorKind::Parse(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum FromFileErrorKind {
    #[non_exhaustive]
    NotFound,
    #[non_exhaustive]
    Open(io::Error),
    #[non_exhaustive]
    Read(io::Error),
    #[non_exhaustive]
    Parse(json5::Error),
}

/// Read a JSON document that may contain comments and trailing commas,
/// the dialect accepted for tsconfig files.
pub(crate) fn read_jsonc_from_file<P, T>(path: P) -> Result<T, FromFileError>
where
    P: AsRef<Path>,
    for<'de> T: Deserialize<'de>,
{
    fn inner<T>(path: &Path) -> Result<T, FromFileError>
    where
        for<'de> T: Deserialize<'de>,
    {
        (|| -> Result<T, FromFileErrorKind> {
            let mut string = String::new();
            File::open(path)
                .map_err(|err| match err.kind() {
                    io::ErrorKind::NotFound => FromFileErrorKind::NotFound,
                    _ => FromFileErrorKind::Open(err),
                })?
                .read_to_string(&mut string)
                .map_err(FromFileErrorKind::Read)?;
            let json = json5::from_str(&string).map_err(FromFileErrorKind::Parse)?;
            Ok(json)
        })()
        .map_err(|kind| FromFileError {
            path: path.to_owned(),
            kind,
        })
    }
    inner(path.as_ref())
}

/// Replace the contents of `path` with `contents` in one step.
///
/// The bytes land in a temporary sibling first and are renamed over the
/// target, so readers never observe a half-written file. A symlinked `path`
/// stays a symlink: the file it points to is replaced, keeping its
/// permissions.
pub(crate) fn write_atomically(path: &Path, contents: &[u8]) -> io::Result<()> {
    let target = fs::canonicalize(path)?;
    let permissions = fs::metadata(&target)?.permissions();
    let directory = target.parent().unwrap_or_else(|| Path::new("."));

    let mut staged = tempfile::NamedTempFile::new_in(directory)?;
    staged.write_all(contents)?;
    staged.as_file().set_permissions(permissions)?;
    staged.as_file().sync_all()?;
    staged.persist(&target).map_err(|err| err.error)?;
    Ok(())
}
