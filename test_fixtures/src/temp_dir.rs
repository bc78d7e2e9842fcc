// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use miette::IntoDiagnostic;
use std::{path::{Path, PathBuf},
          sync::atomic::{AtomicUsize, Ordering}};

static TEMP_DIR_COUNTER: AtomicUsize = AtomicUsize::new(0);

/// A scratch directory (eg for log files written by tests). It is deleted, along with
/// everything in it, when this is dropped.
#[derive(Debug)]
pub struct TempDir {
    pub path: PathBuf,
}

impl TempDir {
    /// Join a path to the temporary directory.
    pub fn join<P: AsRef<Path>>(&self, path: P) -> PathBuf { self.path.join(path) }
}

/// Create a temporary directory with a name that is unique across the tests running in
/// this process, and across processes.
///
/// # Errors
///
/// Returns an error if the directory can't be created.
pub fn try_create_temp_dir() -> miette::Result<TempDir> {
    let count = TEMP_DIR_COUNTER.fetch_add(1, Ordering::Relaxed);
    let name = format!("r3bl_test_fixtures_{}_{count}", std::process::id());
    let new_temp_dir = std::env::temp_dir().join(name);
    std::fs::create_dir_all(&new_temp_dir).into_diagnostic()?;
    Ok(TempDir { path: new_temp_dir })
}

impl Drop for TempDir {
    fn drop(&mut self) {
        // We don't care about the result of this operation.
        std::fs::remove_dir_all(&self.path).ok();
    }
}
