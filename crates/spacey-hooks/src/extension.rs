// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Extension classifier
//!
//! Maps a path's trailing extension onto the syntax variant the transform
//! engine should parse it as. Query fragments (`?raw`) never influence the
//! result.

use crate::filter::is_candidate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::Path;

/// Syntax dialect of a source file, derived from its extension
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Variant {
    /// Plain JavaScript (`.js`)
    Js,
    /// JavaScript with JSX (`.jsx`)
    Jsx,
    /// TypeScript (`.ts`)
    Ts,
    /// TypeScript with JSX (`.tsx`)
    Tsx,
}

impl Variant {
    /// Variants in probe priority order.
    pub const ALL: [Variant; 4] = [Variant::Js, Variant::Ts, Variant::Jsx, Variant::Tsx];

    /// Variant for a bare extension (no leading dot).
    pub fn from_extension(ext: &str) -> Option<Self> {
        match ext {
            "js" => Some(Variant::Js),
            "jsx" => Some(Variant::Jsx),
            "ts" => Some(Variant::Ts),
            "tsx" => Some(Variant::Tsx),
            _ => None,
        }
    }

    /// Loader tag understood by the transform engine
    pub fn as_str(self) -> &'static str {
        match self {
            Variant::Js => "js",
            Variant::Jsx => "jsx",
            Variant::Ts => "ts",
            Variant::Tsx => "tsx",
        }
    }

    /// File extension including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            Variant::Js => ".js",
            Variant::Jsx => ".jsx",
            Variant::Ts => ".ts",
            Variant::Tsx => ".tsx",
        }
    }
}

impl fmt::Display for Variant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Supported extensions in resolution order.
pub const EXTENSIONS: [&str; 4] = [".js", ".ts", ".jsx", ".tsx"];

/// Returns the path with any `?query` suffix removed.
pub fn strip_query(path: &str) -> &str {
    match path.split_once('?') {
        Some((base, _)) => base,
        None => path,
    }
}

/// Classify a path or URL by its extension.
pub fn classify(path: &str) -> Option<Variant> {
    Path::new(strip_query(path))
        .extension()
        .and_then(|e| e.to_str())
        .and_then(Variant::from_extension)
}

/// Returns `true` if the path carries a supported extension.
pub fn is_supported_extension(path: &str) -> bool {
    classify(path).is_some()
}

/// Returns `true` if the specifier should be transformed on load.
pub fn is_eligible(specifier: &str) -> bool {
    is_candidate(specifier) && is_supported_extension(specifier)
}
