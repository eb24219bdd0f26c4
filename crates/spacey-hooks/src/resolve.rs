// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Path resolver
//!
//! Turns a candidate specifier into a file URL. Specifiers without a
//! supported extension are resolved by appending each extension in
//! [`EXTENSIONS`] order and taking the first regular file that exists.

use crate::chain::{Outcome, ResolveContext, Resolved};
use crate::error::{HookError, Result};
use crate::extension::{EXTENSIONS, is_supported_extension};
use crate::filter::is_candidate;
use std::ffi::OsString;
use std::path::{Path, PathBuf};
use tracing::{debug, trace};
use url::Url;

/// Parse `specifier` relative to an optional base URL.
pub fn to_url(specifier: &str, base: Option<&str>) -> Result<Url> {
    let parsed = match base {
        Some(base) => Url::parse(base).and_then(|base| base.join(specifier)),
        None => Url::parse(specifier),
    };
    parsed.map_err(|e| HookError::invalid_url(specifier, e))
}

/// Local path of a `file:` URL
pub fn to_file_path(url: &Url) -> Result<PathBuf> {
    url.to_file_path()
        .map_err(|_| HookError::NotAFilePath(url.to_string()))
}

/// Returns the first `path + ext` that is an existing regular file.
///
/// Extensions are appended, never substituted, so `foo.config` probes
/// `foo.config.js` rather than `foo.js`.
pub async fn probe(path: &Path, extensions: &[&str]) -> Option<PathBuf> {
    for ext in extensions {
        let mut candidate = OsString::from(path.as_os_str());
        candidate.push(ext);
        let candidate = PathBuf::from(candidate);

        match tokio::fs::metadata(&candidate).await {
            Ok(meta) if meta.is_file() => {
                trace!("Probe hit {}", candidate.display());
                return Some(candidate);
            }
            _ => trace!("Probe miss {}", candidate.display()),
        }
    }
    None
}

/// Decide how a specifier resolves, without consulting any continuation.
pub async fn resolve_specifier(specifier: &str, context: &ResolveContext) -> Result<Outcome<Resolved>> {
    if !is_candidate(specifier) {
        return Ok(Outcome::Deferred);
    }

    let url = to_url(specifier, context.parent_url.as_deref())?;
    if url.scheme() != "file" || is_supported_extension(specifier) {
        debug!("Resolved {} to {}", specifier, url);
        return Ok(Outcome::Handled(Resolved::short_circuit(url)));
    }

    let path = to_file_path(&url)?;
    match probe(&path, &EXTENSIONS).await {
        Some(found) => {
            let url = Url::from_file_path(&found)
                .map_err(|_| HookError::NotAFilePath(found.display().to_string()))?;
            debug!("Resolved extensionless {} to {}", specifier, url);
            Ok(Outcome::Handled(Resolved::short_circuit(url)))
        }
        None => {
            debug!("No transformable file for {}", specifier);
            Ok(Outcome::Deferred)
        }
    }
}
