// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! Candidate filter
//!
//! Decides whether a specifier is worth considering at all. Package imports
//! and anything living under a dependency directory are left to the host.

/// Directory name marking dependency code. Matched as a raw substring.
pub const EXCLUDED_DIR: &str = "node_modules";

/// Returns `true` for bare or package-style imports.
///
/// A specifier is bare unless it starts with `.`, `/` or the `file:` scheme.
/// Other schemes (`node:`, `data:`, `https:`) are therefore bare as well.
pub fn is_bare_import(specifier: &str) -> bool {
    !(specifier.starts_with('.') || specifier.starts_with('/') || specifier.starts_with("file:"))
}

/// Returns `true` if the specifier points inside a dependency directory.
pub fn is_excluded(specifier: &str) -> bool {
    specifier.contains(EXCLUDED_DIR)
}

/// Returns `true` if the specifier may be a candidate for transformation.
pub fn is_candidate(specifier: &str) -> bool {
    !is_excluded(specifier) && !is_bare_import(specifier)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bare_import() {
        assert!(is_bare_import("esbuild-esm-loader"));
        assert!(is_bare_import("@scope/pkg/sub"));
        assert!(!is_bare_import("./foo"));
        assert!(!is_bare_import("../foo"));
        assert!(!is_bare_import("/foo"));
        assert!(!is_bare_import("file:foo"));
        assert!(!is_bare_import("file:///foo/bar.ts"));
    }

    #[test]
    fn test_other_schemes_are_bare() {
        assert!(is_bare_import("data:text/javascript,export{}"));
        assert!(is_bare_import("node:foo"));
        assert!(is_bare_import("node:fs"));
        assert!(is_bare_import("https://example.com/mod.js"));
    }

    #[test]
    fn test_file_scheme_must_be_a_prefix() {
        assert!(is_bare_import("pkg/file:thing"));
        assert!(!is_candidate("pkg/file:thing.ts"));
    }

    #[test]
    fn test_is_candidate() {
        assert!(!is_candidate("esbuild-esm-loader"));
        assert!(!is_candidate("../node_modules/esbuild-esm-loader/hooks.js"));
        assert!(!is_candidate("file:///app/node_modules/pkg/index.ts"));
        assert!(is_candidate("./esbuild-esm-loader"));
        assert!(is_candidate("./esbuild-esm-loader.js"));
        assert!(is_candidate("file:///app/src/main.tsx"));
    }

    #[test]
    fn test_empty_specifier() {
        assert!(is_bare_import(""));
        assert!(!is_candidate(""));
    }
}
