// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Host default continuations
//!
//! What the CLI does when the hooks decline: resolve only URLs that exist on
//! disk, and load files verbatim.

use async_trait::async_trait;
use spacey_hooks::resolve::{to_file_path, to_url};
use spacey_hooks::{
    HookError, Load, LoadContext, Loaded, ModuleFormat, Resolve, ResolveContext, Resolved, Result,
    Source, is_bare_import,
};
use tracing::debug;

/// Default resolver: file URLs that exist, nothing else
pub struct HostResolve;

#[async_trait]
impl Resolve for HostResolve {
    async fn resolve(
        &self,
        specifier: &str,
        context: &ResolveContext,
        _next: &dyn Resolve,
    ) -> Result<Resolved> {
        if is_bare_import(specifier) {
            // Package lookup is not available in this host
            return Err(HookError::module_not_found(specifier));
        }

        let url = to_url(specifier, context.parent_url.as_deref())?;
        let path = to_file_path(&url)?;
        if tokio::fs::metadata(&path).await.is_ok_and(|m| m.is_file()) {
            debug!("Host resolved {} to {}", specifier, url);
            Ok(Resolved {
                url: url.into(),
                short_circuit: false,
            })
        } else {
            Err(HookError::module_not_found(specifier))
        }
    }
}

/// Default loader: raw bytes, format from context or extension
pub struct HostLoad;

#[async_trait]
impl Load for HostLoad {
    async fn load(&self, url: &str, context: &LoadContext, _next: &dyn Load) -> Result<Loaded> {
        let path = to_file_path(&to_url(url, None)?)?;
        let bytes = tokio::fs::read(&path).await?;
        let format = context
            .format
            .unwrap_or_else(|| ModuleFormat::from_path(&path));

        debug!("Host loaded {} as {:?}", url, format);
        Ok(Loaded {
            source: Source::Bytes(bytes),
            format,
            short_circuit: false,
        })
    }
}
