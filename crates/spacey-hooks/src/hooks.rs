// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Resolve and load hooks
//!
//! [`Hooks`] is the layer a host installs in front of its own resolver and
//! loader. It handles what it can transform and defers everything else.

use crate::chain::{Load, LoadContext, Loaded, ModuleFormat, Outcome, Resolve, ResolveContext, Resolved, Source};
use crate::config::{HooksConfig, SourceMapsFlag};
use crate::engine::{EsbuildEngine, SourceMapOptions, TransformEngine, TransformOptions};
use crate::error::Result;
use crate::extension::{Variant, classify, is_eligible};
use crate::project_config::ProjectConfig;
use crate::resolve::{resolve_specifier, to_file_path, to_url};
use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, trace};

/// Resolve/load layer transforming TypeScript and JSX sources
pub struct Hooks<E = EsbuildEngine> {
    /// Engine performing the transform
    engine: E,
    /// Cached project configuration
    project_config: ProjectConfig,
    /// Inline source map switch, read per load
    source_maps: SourceMapsFlag,
}

impl Hooks<EsbuildEngine> {
    /// Hooks backed by the esbuild binary named in `config`
    pub fn from_config(config: &HooksConfig) -> Self {
        Self::new(
            EsbuildEngine::new(&config.esbuild),
            ProjectConfig::new(&config.project_config),
            SourceMapsFlag::new(config.source_maps),
        )
    }
}

impl<E: TransformEngine> Hooks<E> {
    /// Create hooks from their parts
    pub fn new(engine: E, project_config: ProjectConfig, source_maps: SourceMapsFlag) -> Self {
        Self {
            engine,
            project_config,
            source_maps,
        }
    }

    /// The project configuration cache
    pub fn project_config(&self) -> &ProjectConfig {
        &self.project_config
    }

    /// The source map switch
    pub fn source_maps(&self) -> &SourceMapsFlag {
        &self.source_maps
    }

    /// Resolve decision without a continuation
    pub async fn try_resolve(&self, specifier: &str, context: &ResolveContext) -> Result<Outcome<Resolved>> {
        resolve_specifier(specifier, context).await
    }

    /// Load decision without a continuation
    pub async fn try_load(&self, url: &str, _context: &LoadContext) -> Result<Outcome<Loaded>> {
        if !is_eligible(url) {
            return Ok(Outcome::Deferred);
        }
        let Some(variant) = classify(url) else {
            return Ok(Outcome::Deferred);
        };

        let path = to_file_path(&to_url(url, None)?)?;
        let source = Source::Bytes(tokio::fs::read(&path).await?);
        let source_file = file_name(&path).unwrap_or_default();

        let code = self
            .transform(&source.to_text_lossy(), variant, &source_file)
            .await?;
        Ok(Outcome::Handled(Loaded {
            source: Source::Text(code),
            format: ModuleFormat::Module,
            short_circuit: true,
        }))
    }

    /// Options for transforming a file named `source_file`
    pub async fn transform_options(&self, variant: Variant, source_file: &str) -> TransformOptions {
        TransformOptions {
            variant,
            project_config: self.project_config.get().await,
            source_map: self
                .source_maps
                .enabled()
                .then(|| SourceMapOptions::inline(source_file)),
        }
    }

    pub(crate) async fn transform(&self, source: &str, variant: Variant, source_file: &str) -> Result<String> {
        let options = self.transform_options(variant, source_file).await;
        debug!("Transforming {} as {}", source_file, variant);
        let output = self.engine.transform(source, &options).await?;
        Ok(output.code)
    }
}

/// Decoded base name of a path
pub(crate) fn file_name(path: &Path) -> Option<String> {
    path.file_name().map(|name| name.to_string_lossy().into_owned())
}

#[async_trait]
impl<E: TransformEngine> Resolve for Hooks<E> {
    async fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
        next: &dyn Resolve,
    ) -> Result<Resolved> {
        match self.try_resolve(specifier, context).await? {
            Outcome::Handled(resolved) => Ok(resolved),
            Outcome::Deferred => {
                trace!("Deferring resolve of {}", specifier);
                next.resolve(specifier, context, next).await
            }
        }
    }
}

#[async_trait]
impl<E: TransformEngine> Load for Hooks<E> {
    async fn load(&self, url: &str, context: &LoadContext, next: &dyn Load) -> Result<Loaded> {
        match self.try_load(url, context).await? {
            Outcome::Handled(loaded) => Ok(loaded),
            Outcome::Deferred => {
                trace!("Deferring load of {}", url);
                next.load(url, context, next).await
            }
        }
    }
}
