use std::{collections::HashSet, error::Error, fmt::Display};

use indexmap::IndexSet;

use crate::{classify::Verdicts, path::AbsolutePath};

/// The discovered files, split four ways. Every checked file lands in
/// exactly one list; each list keeps discovery order.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Partitions {
    /// Error-free and not yet declared: ready to be promoted.
    pub to_include: Vec<AbsolutePath>,
    /// Declared but failing: a regression.
    pub broken: Vec<AbsolutePath>,
    /// Failing and not yet declared: outstanding work.
    pub remaining: Vec<AbsolutePath>,
    /// Error-free and already declared.
    pub already_ok: Vec<AbsolutePath>,
}

impl Partitions {
    /// Number of files across all four partitions.
    pub fn total(&self) -> usize {
        self.to_include.len() + self.broken.len() + self.remaining.len() + self.already_ok.len()
    }

    pub fn has_broken(&self) -> bool {
        !self.broken.is_empty()
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct NoFilesToAnalyzeError;

impl Display for NoFilesToAnalyzeError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "there are no files to analyze")
    }
}

impl Error for NoFilesToAnalyzeError {}

/// Split `discovered` by comparing each file's verdict against `declared`.
///
/// Discovered files the compiler never saw (vendored ones) belong to no
/// partition.
pub fn reconcile(
    discovered: &[AbsolutePath],
    declared: &[AbsolutePath],
    verdicts: &Verdicts,
) -> Result<Partitions, NoFilesToAnalyzeError> {
    if discovered.is_empty() {
        return Err(NoFilesToAnalyzeError);
    }
    let declared: HashSet<&AbsolutePath> = declared.iter().collect();
    let universe: IndexSet<&AbsolutePath> = discovered
        .iter()
        .filter(|file| verdicts.is_checked(file))
        .collect();

    let mut partitions = Partitions::default();
    for file in universe {
        let target = match (verdicts.has_errors(file), declared.contains(file)) {
            (false, false) => &mut partitions.to_include,
            (false, true) => &mut partitions.already_ok,
            (true, true) => &mut partitions.broken,
            (true, false) => &mut partitions.remaining,
        };
        target.push(file.clone());
    }
    Ok(partitions)
}
