use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use crate::{
    compiler::{CompilationUnit, CompilerError, CompilerOptions, Diagnostic, FrontEnd},
    path::{AbsolutePath, VendorFilter},
};

/// Per-file outcome of one compilation.
#[derive(Debug, Default, Clone)]
pub struct Verdicts {
    checked: IndexSet<AbsolutePath>,
    errors: IndexMap<AbsolutePath, Vec<Diagnostic>>,
}

impl Verdicts {
    pub fn is_checked(&self, file: &AbsolutePath) -> bool {
        self.checked.contains(file)
    }

    /// Files with at least one error, in the order their first error was
    /// reported, each with its errors in reporting order.
    pub fn errors(&self) -> &IndexMap<AbsolutePath, Vec<Diagnostic>> {
        &self.errors
    }

    pub fn diagnostics(&self, file: &AbsolutePath) -> Option<&[Diagnostic]> {
        self.errors.get(file).map(Vec::as_slice)
    }

    pub fn has_errors(&self, file: &AbsolutePath) -> bool {
        self.errors.contains_key(file)
    }

    /// Checked files without any error.
    pub fn error_free(&self) -> impl Iterator<Item = &AbsolutePath> {
        self.checked
            .iter()
            .filter(move |file| !self.errors.contains_key(*file))
    }
}

/// Type-check `candidate_files` and attribute every error to its file.
///
/// Vendored candidates are never compiled. An error is kept only when its
/// file is one of the candidates; the compiler also reports on files it
/// pulled in by itself (declaration files, imports), and those are dropped.
pub fn classify<F: FrontEnd>(
    front_end: &F,
    candidate_files: &[AbsolutePath],
    options: &CompilerOptions,
    vendor_filter: &VendorFilter,
) -> Result<Verdicts, CompilerError> {
    let candidates: IndexSet<&AbsolutePath> = candidate_files.iter().collect();
    let checked: IndexSet<AbsolutePath> = candidates
        .iter()
        .filter(|file| !vendor_filter.is_vendored(file))
        .map(|file| (*file).clone())
        .collect();
    debug!(
        "skipped {} vendored file(s)",
        candidates.len() - checked.len()
    );
    debug!("running program against {} file(s)", checked.len());

    let files: Vec<AbsolutePath> = checked.iter().cloned().collect();
    let unit = front_end.build_unit(&files, options)?;

    let mut errors: IndexMap<AbsolutePath, Vec<Diagnostic>> = IndexMap::new();
    for diagnostic in unit.semantic_diagnostics()? {
        if !diagnostic.is_error() {
            continue;
        }
        if !candidates.contains(&diagnostic.file) {
            trace!(
                "dropping TS{} for {} outside the requested files",
                diagnostic.code,
                diagnostic.file
            );
            continue;
        }
        errors
            .entry(diagnostic.file.clone())
            .or_default()
            .push(diagnostic);
    }

    Ok(Verdicts { checked, errors })
}
