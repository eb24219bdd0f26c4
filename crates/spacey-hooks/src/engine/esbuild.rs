// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! esbuild-backed transform engine
//!
//! Runs the esbuild CLI in transform mode: source on stdin, code on stdout,
//! diagnostics on stderr.

use super::{SourceMapMode, TransformEngine, TransformOptions, TransformOutput};
use crate::error::{HookError, Result};
use async_trait::async_trait;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;
use tracing::{debug, instrument};

/// Transform engine spawning the esbuild binary once per call
#[derive(Debug, Clone)]
pub struct EsbuildEngine {
    binary: PathBuf,
}

impl EsbuildEngine {
    /// Engine using the given binary
    pub fn new(binary: impl Into<PathBuf>) -> Self {
        Self {
            binary: binary.into(),
        }
    }

    /// Command-line flags for a transform
    pub fn args(options: &TransformOptions) -> Vec<String> {
        let mut args = vec![format!("--loader={}", options.variant)];

        if let Some(raw) = &options.project_config {
            args.push(format!("--tsconfig-raw={}", raw));
        }

        if let Some(map) = &options.source_map {
            match map.mode {
                SourceMapMode::Inline => args.push("--sourcemap=inline".to_string()),
            }
            args.push(format!("--sourcefile={}", map.source_file));
            args.push(format!("--sources-content={}", map.sources_content));
        }

        args
    }
}

#[async_trait]
impl TransformEngine for EsbuildEngine {
    #[instrument(skip(self, source, options), fields(loader = %options.variant))]
    async fn transform(&self, source: &str, options: &TransformOptions) -> Result<TransformOutput> {
        let args = Self::args(options);
        debug!("Running {} {}", self.binary.display(), args.join(" "));

        let unavailable = |e: std::io::Error| HookError::EngineUnavailable {
            engine: self.binary.display().to_string(),
            reason: e.to_string(),
        };

        let mut child = Command::new(&self.binary)
            .args(&args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(unavailable)?;

        let stdin = child.stdin.take();
        let write = async move {
            match stdin {
                // Dropped at the end of the block, closing the pipe so esbuild sees EOF
                Some(mut stdin) => stdin.write_all(source.as_bytes()).await,
                None => Ok(()),
            }
        };

        // An engine that exits early breaks the pipe; its stderr still wins
        let (written, output) = tokio::join!(write, child.wait_with_output());
        let output = output?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr).trim_end().to_string();
            return Err(HookError::Transform(stderr));
        }
        written?;

        let code = String::from_utf8(output.stdout)
            .map_err(|e| HookError::Transform(format!("esbuild produced invalid UTF-8: {}", e)))?;

        Ok(TransformOutput { code })
    }
}
