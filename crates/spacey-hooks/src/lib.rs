// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! # spacey-hooks
//!
//! Module resolve/load hooks that transform TypeScript and JSX on the fly.
//!
//! A host installs [`Hooks`] in front of its own resolver and loader. For every
//! specifier the hooks decide whether the module is theirs to handle:
//!
//! - Package imports (`react`, `node:fs`) and anything under `node_modules`
//!   are passed to the host untouched.
//! - Relative, absolute and `file:` specifiers with a `.js`, `.jsx`, `.ts` or
//!   `.tsx` extension are resolved directly.
//! - Extensionless specifiers are resolved by probing `.js`, `.ts`, `.jsx`,
//!   `.tsx` in that order.
//! - Loading an eligible file runs it through a [`TransformEngine`] and
//!   returns the result as an ES module.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use spacey_hooks::{Hooks, HooksConfig, Load, LoadContext, Resolve, ResolveContext};
//!
//! let hooks = Hooks::from_config(&HooksConfig::from_env());
//! let ctx = ResolveContext::with_parent("file:///app/main.js");
//! let resolved = hooks.resolve("./view", &ctx, &host_resolver).await?;
//! let loaded = hooks.load(&resolved.url, &LoadContext::default(), &host_loader).await?;
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod chain;
pub mod config;
pub mod engine;
pub mod error;
pub mod extension;
pub mod filter;
pub mod hooks;
pub mod legacy;
pub mod project_config;
pub mod resolve;

// Re-exports
pub use chain::{Load, LoadContext, Loaded, ModuleFormat, Outcome, Resolve, ResolveContext, Resolved, Source};
pub use config::{HooksConfig, SourceMapsFlag};
pub use engine::{EsbuildEngine, SourceMapOptions, TransformEngine, TransformOptions, TransformOutput};
pub use error::{HookError, Result};
pub use extension::{EXTENSIONS, Variant, classify, is_eligible, is_supported_extension};
pub use filter::{EXCLUDED_DIR, is_bare_import, is_candidate};
pub use hooks::Hooks;
pub use legacy::{GetFormat, TransformSource};
pub use project_config::ProjectConfig;

/// Version of the hooks crate
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
