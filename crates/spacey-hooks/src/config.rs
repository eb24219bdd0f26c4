// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Hook configuration

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

/// Default location of the project's type-checking configuration
pub const DEFAULT_PROJECT_CONFIG: &str = "tsconfig.json";

/// Default transform engine binary
pub const DEFAULT_ESBUILD: &str = "esbuild";

/// Configuration for the loader hooks.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HooksConfig {
    /// Project configuration file, relative to the working directory
    pub project_config: PathBuf,

    /// Path or name of the esbuild binary
    pub esbuild: PathBuf,

    /// Initial state of the source map flag
    pub source_maps: bool,
}

impl Default for HooksConfig {
    fn default() -> Self {
        Self {
            project_config: PathBuf::from(DEFAULT_PROJECT_CONFIG),
            esbuild: PathBuf::from(DEFAULT_ESBUILD),
            source_maps: false,
        }
    }
}

impl HooksConfig {
    /// Defaults overlaid with environment variables.
    pub fn from_env() -> Self {
        let mut config = Self::default();
        config.load_from_env(|key| std::env::var(key).ok());
        config
    }

    /// Overlay values from an environment lookup.
    ///
    /// - `SPACEY_TSCONFIG`: project configuration path
    /// - `SPACEY_ESBUILD`: esbuild binary
    /// - `NODE_OPTIONS`: `--enable-source-maps` turns source maps on
    pub fn load_from_env(&mut self, var: impl Fn(&str) -> Option<String>) {
        if let Some(path) = var("SPACEY_TSCONFIG").filter(|v| !v.is_empty()) {
            self.project_config = PathBuf::from(path);
        }

        if let Some(bin) = var("SPACEY_ESBUILD").filter(|v| !v.is_empty()) {
            self.esbuild = PathBuf::from(bin);
        }

        if let Some(options) = var("NODE_OPTIONS")
            && options
                .split_whitespace()
                .any(|opt| opt == "--enable-source-maps")
        {
            self.source_maps = true;
        }
    }
}

/// Process-wide switch for inline source maps.
///
/// Cloning shares the underlying flag. Loads read it on every call.
#[derive(Debug, Clone, Default)]
pub struct SourceMapsFlag(Arc<AtomicBool>);

impl SourceMapsFlag {
    /// Create a flag with the given initial state
    pub fn new(enabled: bool) -> Self {
        Self(Arc::new(AtomicBool::new(enabled)))
    }

    /// Whether source maps are currently requested
    pub fn enabled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }

    /// Turn source maps on or off
    pub fn set(&self, enabled: bool) {
        self.0.store(enabled, Ordering::Relaxed);
    }
}
