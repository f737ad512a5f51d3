#![allow(dead_code)]

use std::{
    cell::{Cell, RefCell},
    fs,
};

use tempfile::TempDir;
use tsconfig_files_check::{
    compiler::{CompilationUnit, CompilerError, CompilerOptions, Diagnostic, FrontEnd},
    path::{normalize, AbsolutePath},
};

/// A front end that reports canned diagnostics, regardless of the files it
/// is asked to check.
#[derive(Default)]
pub struct ScriptedFrontEnd {
    diagnostics: Vec<Diagnostic>,
    pub builds: Cell<usize>,
    pub requested: RefCell<Vec<AbsolutePath>>,
    pub options: RefCell<Option<CompilerOptions>>,
}

impl ScriptedFrontEnd {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_error(mut self, file: &AbsolutePath, code: u32, message: &str) -> Self {
        self.diagnostics.push(Diagnostic {
            file: file.clone(),
            code,
            message: message.to_owned(),
            offset: 0,
            line: 1,
            column: 1,
        });
        self
    }
}

pub struct ScriptedUnit(Vec<Diagnostic>);

impl CompilationUnit for ScriptedUnit {
    fn semantic_diagnostics(&self) -> Result<Vec<Diagnostic>, CompilerError> {
        Ok(self.0.clone())
    }
}

impl FrontEnd for ScriptedFrontEnd {
    type Unit = ScriptedUnit;

    fn build_unit(
        &self,
        files: &[AbsolutePath],
        options: &CompilerOptions,
    ) -> Result<Self::Unit, CompilerError> {
        self.builds.set(self.builds.get() + 1);
        self.requested.borrow_mut().extend(files.iter().cloned());
        *self.options.borrow_mut() = Some(options.clone());
        Ok(ScriptedUnit(self.diagnostics.clone()))
    }
}

/// A throwaway project directory.
pub struct Fixture {
    directory: TempDir,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            directory: tempfile::tempdir().expect("should be able to create a temporary directory"),
        }
    }

    pub fn root(&self) -> AbsolutePath {
        normalize(self.directory.path(), "/")
    }

    pub fn path(&self, relative: &str) -> AbsolutePath {
        normalize(relative, self.root())
    }

    pub fn write(&self, relative: &str, contents: &str) -> AbsolutePath {
        let path = self.path(relative);
        if let Some(parent) = path.as_path().parent() {
            fs::create_dir_all(parent).expect("should be able to create fixture directories");
        }
        fs::write(&path, contents).expect("should be able to write fixture file");
        path
    }

    pub fn mkdir(&self, relative: &str) -> AbsolutePath {
        let path = self.path(relative);
        fs::create_dir_all(&path).expect("should be able to create fixture directories");
        path
    }

    pub fn read(&self, relative: &str) -> String {
        fs::read_to_string(self.path(relative)).expect("should be able to read fixture file")
    }

    pub fn files_entry(&self, relative: &str) -> Vec<String> {
        let document: serde_json::Value =
            serde_json::from_str(&self.read(relative)).expect("fixture should be valid JSON");
        document["files"]
            .as_array()
            .map(|files| {
                files
                    .iter()
                    .filter_map(|file| file.as_str().map(ToOwned::to_owned))
                    .collect()
            })
            .unwrap_or_default()
    }
}
