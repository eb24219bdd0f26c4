// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Hook chain types
//!
//! Resolve and load hooks are composed like middleware. Every layer receives
//! the next layer as a continuation, and when it declines a request it calls
//! that continuation with the continuation itself as the fallback:
//!
//! ```rust,ignore
//! next.resolve(specifier, context, next).await
//! ```
//!
//! so any layers stacked beneath keep working.

use crate::error::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::path::Path;

/// Outcome of a single hook decision
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    /// The hook produced a result and short-circuits the chain
    Handled(T),
    /// The hook declines; the continuation decides
    Deferred,
}

impl<T> Outcome<T> {
    /// Whether the hook handled the request
    pub fn is_handled(&self) -> bool {
        matches!(self, Outcome::Handled(_))
    }

    /// Convert into an `Option`
    pub fn handled(self) -> Option<T> {
        match self {
            Outcome::Handled(value) => Some(value),
            Outcome::Deferred => None,
        }
    }
}

/// Context for one resolve call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResolveContext {
    /// Module-system conditions in effect (`import`, `node`, ...)
    #[serde(default)]
    pub conditions: Vec<String>,
    /// URL of the importing module, if any
    #[serde(rename = "parentURL", default, skip_serializing_if = "Option::is_none")]
    pub parent_url: Option<String>,
}

impl ResolveContext {
    /// Context for an import made from `parent_url`
    pub fn with_parent(parent_url: impl Into<String>) -> Self {
        Self {
            conditions: Vec::new(),
            parent_url: Some(parent_url.into()),
        }
    }
}

/// Result of a resolve call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resolved {
    /// Fully-qualified URL of the module
    pub url: String,
    /// Whether later resolvers must be skipped
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub short_circuit: bool,
}

impl Resolved {
    /// Result that stops the chain at this layer
    pub fn short_circuit(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            short_circuit: true,
        }
    }
}

/// Module format understood by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ModuleFormat {
    /// Host built-in module
    Builtin,
    /// CommonJS module
    CommonJs,
    /// JSON document
    Json,
    /// ECMAScript module
    Module,
    /// WebAssembly module
    Wasm,
}

impl ModuleFormat {
    /// Guess a format from a file extension, as a host would without hooks
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|e| e.to_str()) {
            Some("cjs") => ModuleFormat::CommonJs,
            Some("json") => ModuleFormat::Json,
            Some("wasm") => ModuleFormat::Wasm,
            _ => ModuleFormat::Module,
        }
    }
}

/// Context for one load call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoadContext {
    /// Format the host currently believes applies
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<ModuleFormat>,
    /// Module-system conditions in effect
    #[serde(default)]
    pub conditions: Vec<String>,
}

/// Module source as handed back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Source {
    /// UTF-8 text
    Text(String),
    /// Raw bytes
    Bytes(Vec<u8>),
}

impl Source {
    /// Borrow the source as text, if it is valid UTF-8
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Source::Text(text) => Some(text),
            Source::Bytes(bytes) => std::str::from_utf8(bytes).ok(),
        }
    }
}

impl Source {
    /// Text of the source, replacing invalid UTF-8 with U+FFFD
    pub fn to_text_lossy(&self) -> Cow<'_, str> {
        match self {
            Source::Text(text) => Cow::Borrowed(text),
            Source::Bytes(bytes) => String::from_utf8_lossy(bytes),
        }
    }
}

impl From<String> for Source {
    fn from(text: String) -> Self {
        Source::Text(text)
    }
}

impl From<Vec<u8>> for Source {
    fn from(bytes: Vec<u8>) -> Self {
        Source::Bytes(bytes)
    }
}

/// Result of a load call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Loaded {
    /// Module source
    pub source: Source,
    /// Module format
    pub format: ModuleFormat,
    /// Whether later loaders must be skipped
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub short_circuit: bool,
}

/// A resolve layer
#[async_trait]
pub trait Resolve: Send + Sync {
    /// Resolve `specifier`, falling back to `next` when declining
    async fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
        next: &dyn Resolve,
    ) -> Result<Resolved>;
}

/// A load layer
#[async_trait]
pub trait Load: Send + Sync {
    /// Load `url`, falling back to `next` when declining
    async fn load(&self, url: &str, context: &LoadContext, next: &dyn Load) -> Result<Loaded>;
}
