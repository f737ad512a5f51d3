//! Tighten a TypeScript project file by file.
//!
//! A project migrating towards a stricter compiler configuration usually
//! keeps a second tsconfig (say `tsconfig.strict.json`) whose `files` list
//! names every file already known to pass under the strict options. This
//! crate type-checks every source file under those options and compares the
//! outcome with that list:
//!
//! - **to include**: passes and is not listed yet, so it can be promoted
//! - **broken**: listed but failing, a regression
//! - **remaining**: failing and not listed, outstanding work
//! - **already ok**: listed and passing
//!
//! With `update` set, files to include are appended to the `files` list,
//! leaving the rest of the configuration untouched.
//!
//! Type-checking itself is delegated to a [`compiler::FrontEnd`]; the
//! [`tsc::Tsc`] front end drives the TypeScript compiler's CLI. The compiler
//! is the source of truth for what type-checks, and no attempt is made to
//! reimplement any part of it.
//!
//! Files inside vendor directories (`node_modules` by default) are never
//! handed to the compiler and never classified.

#![forbid(unsafe_code)]
#![deny(missing_debug_implementations)]

pub mod check;
pub mod classify;
pub mod compiler;
pub mod config;
pub mod discover;
pub mod error;
mod find_up;
pub mod io;
pub mod path;
pub mod reconcile;
pub mod report;
pub mod tsc;
