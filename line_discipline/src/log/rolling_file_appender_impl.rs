// Copyright (c) 2025 R3BL LLC. Licensed under Apache License, Version 2.0.

use super::DEFAULT_LOG_FILE_NAME;
use miette::IntoDiagnostic;
use std::path::{Path, PathBuf};
use tracing_appender::rolling::RollingFileAppender;

/// Creates an appender for session logs at `path_str`, without rotation.
///
/// - A bare file name lands in the current directory.
/// - An existing directory gets [`DEFAULT_LOG_FILE_NAME`] inside it.
/// - Missing parent directories are created.
///
/// Note that if you wrap this up in a non blocking writer, it doesn't work, since the
/// worker guard would have to outlive the subscriber.
///
/// # Errors
///
/// Returns an error if the path has no file name, or its parent directory can't be
/// created.
pub fn try_create(path_str: &str) -> miette::Result<RollingFileAppender> {
    let path = resolve_log_file_path(path_str);

    let file_name = path.file_name().ok_or_else(|| {
        miette::miette!("Log file path {} has no file name.", path.display())
    })?;

    let parent = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(parent).into_diagnostic()?;

    Ok(tracing_appender::rolling::never(parent, file_name))
}

fn resolve_log_file_path(path_str: &str) -> PathBuf {
    let path = PathBuf::from(path_str);
    if path.is_dir() {
        path.join(DEFAULT_LOG_FILE_NAME)
    } else {
        path
    }
}
