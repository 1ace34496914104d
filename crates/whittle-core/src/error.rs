// Copyright 2026 James Casey
// SPDX-License-Identifier: Apache-2.0

//! Error types for loading source trees.
//!
//! Only the loader can fail: lexing and parsing are error-tolerant by
//! design and always produce a tree. Errors integrate with [`miette`] for
//! rich reporting in the driving tool.

use camino::Utf8PathBuf;
use miette::Diagnostic;
use thiserror::Error;

/// A failure while loading a file or directory tree.
#[derive(Debug, Error, Diagnostic)]
pub enum LoadError {
    /// The given path is neither a file nor a directory.
    #[error("path '{0}' does not exist")]
    NotFound(Utf8PathBuf),

    /// Reading a file or directory entry failed.
    #[error("failed to read '{path}'")]
    Io {
        /// The file or directory that could not be read.
        path: Utf8PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// A path under the load root is not valid UTF-8.
    #[error("non-UTF-8 path under '{0}'")]
    NonUtf8Path(Utf8PathBuf),

    /// A user-supplied split rule has an invalid glob pattern.
    #[error("invalid split rule pattern '{pattern}'")]
    InvalidPattern {
        /// The pattern that failed to compile.
        pattern: String,
        /// The underlying glob error.
        #[source]
        source: globset::Error,
    },
}

impl LoadError {
    /// Wraps an I/O error with the path it occurred on.
    pub(crate) fn io(path: impl Into<Utf8PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
