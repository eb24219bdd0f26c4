// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Project configuration cache
//!
//! The raw text of `tsconfig.json` is handed to the transform engine as-is.
//! It is read at most once; concurrent first callers wait on the same read.
//! A missing or unreadable file is cached as "no configuration".

use std::path::PathBuf;
use std::sync::Arc;
use tokio::sync::OnceCell;
use tracing::debug;

/// Lazily read, never invalidated project configuration text
#[derive(Debug)]
pub struct ProjectConfig {
    path: PathBuf,
    raw: OnceCell<Option<Arc<str>>>,
}

impl ProjectConfig {
    /// Cache for the configuration file at `path`
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            raw: OnceCell::new(),
        }
    }

    /// Raw configuration text, reading it on first use
    pub async fn get(&self) -> Option<Arc<str>> {
        self.raw
            .get_or_init(|| async {
                match tokio::fs::read_to_string(&self.path).await {
                    Ok(text) => {
                        debug!("Loaded project configuration from {}", self.path.display());
                        Some(Arc::from(text))
                    }
                    Err(e) => {
                        debug!(
                            "No project configuration at {}: {}",
                            self.path.display(),
                            e
                        );
                        None
                    }
                }
            })
            .await
            .clone()
    }

    /// Whether the configuration has been read yet
    pub fn is_initialized(&self) -> bool {
        self.raw.initialized()
    }
}
