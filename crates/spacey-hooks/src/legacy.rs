// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Three-phase hook protocol
//!
//! Older hosts split loading into `getFormat` and `transformSource` phases
//! instead of a single `load`. [`Hooks`] serves those phases too, using the
//! same eligibility rules and transform options.

use crate::chain::{ModuleFormat, Source};
use crate::engine::TransformEngine;
use crate::error::Result;
use crate::extension::{classify, is_eligible};
use crate::filter::is_excluded;
use crate::hooks::{Hooks, file_name};
use crate::resolve::to_url;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::trace;

/// Context for a `getFormat` call
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormatContext {}

/// Result of a `getFormat` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Formatted {
    /// Module format
    pub format: ModuleFormat,
}

/// Context for a `transformSource` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransformSourceContext {
    /// URL the source was loaded from
    pub url: String,
    /// Format decided by `getFormat`
    pub format: ModuleFormat,
}

/// Result of a `transformSource` call
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transformed {
    /// Possibly transformed source
    pub source: Source,
}

/// A `getFormat` layer
#[async_trait]
pub trait GetFormat: Send + Sync {
    /// Decide the format of `url`, falling back to `next`
    async fn get_format(
        &self,
        url: &str,
        context: &FormatContext,
        next: &dyn GetFormat,
    ) -> Result<Formatted>;
}

/// A `transformSource` layer
#[async_trait]
pub trait TransformSource: Send + Sync {
    /// Transform already-loaded `source`, falling back to `next`
    async fn transform_source(
        &self,
        source: Source,
        context: &TransformSourceContext,
        next: &dyn TransformSource,
    ) -> Result<Transformed>;
}

#[async_trait]
impl<E: TransformEngine> GetFormat for Hooks<E> {
    async fn get_format(
        &self,
        url: &str,
        context: &FormatContext,
        next: &dyn GetFormat,
    ) -> Result<Formatted> {
        if is_eligible(url) {
            return Ok(Formatted {
                format: ModuleFormat::Module,
            });
        }
        trace!("Deferring format of {}", url);
        next.get_format(url, context, next).await
    }
}

#[async_trait]
impl<E: TransformEngine> TransformSource for Hooks<E> {
    async fn transform_source(
        &self,
        source: Source,
        context: &TransformSourceContext,
        next: &dyn TransformSource,
    ) -> Result<Transformed> {
        let variant = if is_excluded(&context.url) {
            None
        } else {
            classify(&context.url)
        };

        let Some(variant) = variant else {
            trace!("Deferring transform of {}", context.url);
            return next.transform_source(source, context, next).await;
        };

        let code = self
            .transform(&source.to_text_lossy(), variant, &source_file_of(&context.url))
            .await?;

        Ok(Transformed {
            source: Source::Text(code),
        })
    }
}

/// Base name recorded in source maps for a URL
fn source_file_of(url: &str) -> String {
    to_url(url, None)
        .ok()
        .and_then(|url| url.to_file_path().ok())
        .and_then(|path| file_name(&path))
        .unwrap_or_else(|| {
            let base = crate::extension::strip_query(url);
            base.rsplit('/').next().unwrap_or(base).to_string()
        })
}
