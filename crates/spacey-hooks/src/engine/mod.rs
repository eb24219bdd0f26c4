// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Transform engine seam
//!
//! The hooks never parse source themselves. They hand the text, its syntax
//! variant and the project configuration to a [`TransformEngine`] and use
//! whatever code comes back.

mod esbuild;

pub use esbuild::EsbuildEngine;

use crate::error::Result;
use crate::extension::Variant;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// How a source map is emitted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SourceMapMode {
    /// Appended to the code as a base64 data URL comment
    Inline,
}

/// Source map request attached to a transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SourceMapOptions {
    /// Emission mode
    pub mode: SourceMapMode,
    /// File name recorded as the map's source
    pub source_file: String,
    /// Whether the original text is embedded in the map
    pub sources_content: bool,
}

impl SourceMapOptions {
    /// Inline map referencing `source_file` without embedding its content
    pub fn inline(source_file: impl Into<String>) -> Self {
        Self {
            mode: SourceMapMode::Inline,
            source_file: source_file.into(),
            sources_content: false,
        }
    }
}

/// Options for one transform
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransformOptions {
    /// Syntax variant of the input
    pub variant: Variant,
    /// Raw project configuration text
    #[serde(skip_serializing_if = "Option::is_none")]
    pub project_config: Option<Arc<str>>,
    /// Source map request, when enabled
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_map: Option<SourceMapOptions>,
}

impl TransformOptions {
    /// Options with only a variant set
    pub fn new(variant: Variant) -> Self {
        Self {
            variant,
            project_config: None,
            source_map: None,
        }
    }
}

/// Output of a transform
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformOutput {
    /// Transformed code, complete
    pub code: String,
}

/// An external source transformer.
#[async_trait]
pub trait TransformEngine: Send + Sync {
    /// Transform `source`; syntax errors are returned as [`HookError::Transform`].
    ///
    /// [`HookError::Transform`]: crate::error::HookError::Transform
    async fn transform(&self, source: &str, options: &TransformOptions) -> Result<TransformOutput>;
}

#[async_trait]
impl<T: TransformEngine + ?Sized> TransformEngine for Arc<T> {
    async fn transform(&self, source: &str, options: &TransformOptions) -> Result<TransformOutput> {
        (**self).transform(source, options).await
    }
}
