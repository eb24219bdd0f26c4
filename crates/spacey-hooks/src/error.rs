// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Error types for the loader hooks

use thiserror::Error;

/// Result type for hook operations
pub type Result<T> = std::result::Result<T, HookError>;

/// Errors that can occur while resolving or loading a module
#[derive(Debug, Error)]
pub enum HookError {
    /// Module not found (raised by default continuations)
    #[error("Cannot find module '{0}'")]
    ModuleNotFound(String),

    /// Specifier could not be turned into a URL
    #[error("Invalid URL '{specifier}': {source}")]
    InvalidUrl {
        /// Specifier as written
        specifier: String,
        /// Underlying parse failure
        #[source]
        source: url::ParseError,
    },

    /// URL does not map to a local file path
    #[error("URL is not a local file path: {0}")]
    NotAFilePath(String),

    /// File system error
    #[error("File system error: {0}")]
    Io(#[from] std::io::Error),

    /// Transform engine rejected the source
    #[error("{0}")]
    Transform(String),

    /// Transform engine could not be started
    #[error("Transform engine '{engine}' is unavailable: {reason}")]
    EngineUnavailable {
        /// Engine name or binary path
        engine: String,
        /// Reason for failure
        reason: String,
    },
}

impl HookError {
    /// Create a module not found error
    pub fn module_not_found(module: impl Into<String>) -> Self {
        Self::ModuleNotFound(module.into())
    }

    /// Create an invalid URL error for a specifier
    pub fn invalid_url(specifier: impl Into<String>, source: url::ParseError) -> Self {
        Self::InvalidUrl {
            specifier: specifier.into(),
            source,
        }
    }
}
