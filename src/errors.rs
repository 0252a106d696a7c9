// This file is part of listenbrainz-cf.
// Licensed under the MIT license, see LICENSE.md for details.
// SPDX-License-Identifier: MIT

//! Error types.

use std::path::PathBuf;

use thiserror::Error;

use crate::als::FitError;

/// Errors raised while loading data or fitting models.
#[derive(Error, Debug)]
pub enum CFError {
    /// A data file was missing, unreadable, or malformed.
    #[error("cannot parse {}: {}", .path.display(), .message)]
    Parse { path: PathBuf, message: String },
    /// An identifier lookup found no match.
    #[error("artist {0} not found")]
    NotFound(String),
    /// An identifier lookup found more than one match.
    #[error("artist {id} unexpectedly found {count} times")]
    AmbiguousResult { id: String, count: usize },
    /// The factorization step failed.
    #[error("factorization failed: {0}")]
    Factorization(#[from] FitError),
    /// Invalid arguments or configuration.
    #[error("invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, CFError>;

impl CFError {
    /// Build a parse error for a file.
    pub fn parse<P: Into<PathBuf>, M: ToString>(path: P, message: M) -> CFError {
        CFError::Parse {
            path: path.into(),
            message: message.to_string(),
        }
    }
}

#[macro_export]
macro_rules! ok_or_parse {
    ($opt:expr, $path:expr, $($arg:expr),*) => {
        $opt.ok_or_else(|| $crate::errors::CFError::parse($path, format!($($arg),*)))
    };
}
