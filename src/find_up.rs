use std::path::{Path, PathBuf};

/// Search `starting_from` and each of its ancestors for `target`, which may
/// span several components (`node_modules/.bin/tsc`). Returns the first
/// existing file found.
pub(crate) fn find_file<T: AsRef<Path>>(starting_from: &Path, target: T) -> Option<PathBuf> {
    let starting_directory = if starting_from.is_dir() {
        starting_from
    } else {
        starting_from.parent().unwrap_or_else(|| Path::new("."))
    };

    starting_directory
        .ancestors()
        .map(|directory| directory.join(target.as_ref()))
        .find(|candidate| candidate.is_file())
}
