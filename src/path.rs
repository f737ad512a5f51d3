use std::{
    collections::HashSet,
    fmt::Display,
    io,
    path::{Component, Path, PathBuf},
};

use serde::Serialize;

/// A lexically normalized absolute path.
///
/// Two `AbsolutePath`s are equal iff their normalized forms are equal. No
/// case-folding and no symlink resolution takes place, so `/a/B.ts` and
/// `/a/b.ts` are different files even on case-insensitive filesystems.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(transparent)]
pub struct AbsolutePath(PathBuf);

impl AbsolutePath {
    pub fn as_path(&self) -> &Path {
        &self.0
    }

    pub fn into_path_buf(self) -> PathBuf {
        self.0
    }

    /// Directory containing this path; the root is its own parent.
    pub fn parent(&self) -> AbsolutePath {
        match self.0.parent() {
            Some(parent) => AbsolutePath(parent.to_owned()),
            None => self.clone(),
        }
    }

    /// Express this path relative to `base`, climbing with `..` where
    /// the two paths diverge.
    pub fn relative_to(&self, base: &AbsolutePath) -> PathBuf {
        relative_path(base.as_path(), self.as_path())
    }
}

impl AsRef<Path> for AbsolutePath {
    fn as_ref(&self) -> &Path {
        &self.0
    }
}

impl Display for AbsolutePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0.display())
    }
}

/// Resolve `path` against `base_dir` into an [`AbsolutePath`] without
/// touching the filesystem. Absolute inputs ignore `base_dir`.
pub fn normalize<P, B>(path: P, base_dir: B) -> AbsolutePath
where
    P: AsRef<Path>,
    B: AsRef<Path>,
{
    let path = path.as_ref();
    if path.is_absolute() {
        AbsolutePath(lexical_normalize(path))
    } else {
        AbsolutePath(lexical_normalize(&base_dir.as_ref().join(path)))
    }
}

/// Like [`normalize`], resolving against the process working directory.
pub fn normalize_from_cwd<P: AsRef<Path>>(path: P) -> io::Result<AbsolutePath> {
    let cwd = std::env::current_dir()?;
    Ok(normalize(path, cwd))
}

// `..` never climbs above the root.
fn lexical_normalize(path: &Path) -> PathBuf {
    let mut components: Vec<Component> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match components.last().copied() {
                Some(Component::Normal(_)) => {
                    components.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => components.push(component),
            },
            other => components.push(other),
        }
    }
    components.iter().collect()
}

fn relative_path(base: &Path, target: &Path) -> PathBuf {
    let base: Vec<Component> = base.components().collect();
    let target: Vec<Component> = target.components().collect();
    let shared = base
        .iter()
        .zip(target.iter())
        .take_while(|(left, right)| left == right)
        .count();

    let mut relative = PathBuf::new();
    for _ in shared..base.len() {
        relative.push("..");
    }
    for component in &target[shared..] {
        relative.push(component.as_os_str());
    }
    relative
}

/// Directory names whose contents belong to third parties and must never
/// be type-checked or classified.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct VendorFilter {
    directories: HashSet<String>,
}

impl Default for VendorFilter {
    fn default() -> Self {
        Self::new(["node_modules"])
    }
}

impl VendorFilter {
    pub fn new<I, S>(directories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            directories: directories.into_iter().map(Into::into).collect(),
        }
    }

    /// True iff any component of `path` is one of the vendor directories.
    pub fn is_vendored<P: AsRef<Path>>(&self, path: P) -> bool {
        path.as_ref().components().any(|component| match component {
            Component::Normal(name) => name
                .to_str()
                .map(|name| self.directories.contains(name))
                .unwrap_or(false),
            _ => false,
        })
    }
}
