use std::{error::Error, fmt::Display, path::PathBuf};

use globwalk::{FileType, GlobWalkerBuilder};
use indexmap::IndexSet;
use log::debug;

use crate::path::{normalize, AbsolutePath};

#[derive(Debug)]
#[non_exhaustive]
pub struct DiscoverError {
    root: PathBuf,
    kind: DiscoverErrorKind,
}

impl DiscoverError {
    pub fn kind(&self) -> &DiscoverErrorKind {
        &self.kind
    }
}

impl Display for DiscoverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            DiscoverErrorKind::MissingSourcePath => {
                write!(f, "source path {:?} does not exist", self.root)
            }
            DiscoverErrorKind::Pattern(_) => {
                write!(f, "unable to build file patterns for {:?}", self.root)
            }
            DiscoverErrorKind::Walk(_) => write!(f, "unable to walk directory tree {:?}", self.root),
        }
    }
}

impl Error for DiscoverError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match &self.kind {
            DiscoverErrorKind::MissingSourcePath => None,
            DiscoverErrorKind::Pattern(err) => Some(err),
            DiscoverErrorKind::Walk(err) => Some(err),
        }
    }
}

#[derive(Debug)]
pub enum DiscoverErrorKind {
    #[non_exhaustive]
    MissingSourcePath,
    #[non_exhaustive]
    Pattern(globwalk::GlobError),
    #[non_exhaustive]
    Walk(globwalk::WalkError),
}

/// Every file under `root` ending in one of `extensions` (given without the
/// leading dot), recursively, sorted and de-duplicated.
///
/// Declaration files match too: `index.d.ts` ends in `.ts`.
pub fn discover<S: AsRef<str>>(
    root: &AbsolutePath,
    extensions: &[S],
) -> Result<Vec<AbsolutePath>, DiscoverError> {
    (|| -> Result<Vec<AbsolutePath>, DiscoverErrorKind> {
        if !root.as_path().is_dir() {
            return Err(DiscoverErrorKind::MissingSourcePath);
        }

        let patterns: Vec<String> = extensions
            .iter()
            .map(|extension| format!("**/*.{}", extension.as_ref().trim_start_matches('.')))
            .collect();

        let mut files: Vec<AbsolutePath> = GlobWalkerBuilder::from_patterns(root, &patterns)
            .file_type(FileType::FILE)
            .follow_links(false)
            .min_depth(0)
            .build()
            .map_err(DiscoverErrorKind::Pattern)?
            .map(|maybe_dir_entry| -> Result<AbsolutePath, DiscoverErrorKind> {
                let dir_entry = maybe_dir_entry.map_err(DiscoverErrorKind::Walk)?;
                Ok(normalize(dir_entry.path(), root))
            })
            .collect::<Result<IndexSet<_>, _>>()?
            .into_iter()
            .collect();
        files.sort_unstable();

        debug!("discovered {} file(s) under {}", files.len(), root);
        Ok(files)
    })()
    .map_err(|kind| DiscoverError {
        root: root.as_path().to_owned(),
        kind,
    })
}
