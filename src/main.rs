// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.
//
// Copyright (c) 2025 Pegasus Heavy Industries, LLC

//! spacey-loader CLI - drive the transform hooks for a single module

mod host;

use clap::{Parser, Subcommand};
use host::{HostLoad, HostResolve};
use owo_colors::OwoColorize;
use spacey_hooks::{Hooks, HooksConfig, Load, LoadContext, Resolve, ResolveContext, VERSION};
use std::path::PathBuf;
use std::process::ExitCode;
use url::Url;

#[derive(Parser)]
#[command(
    name = "spacey-loader",
    about = "Resolve and load modules through the Spacey transform hooks",
    version = VERSION,
    author = "Pegasus Heavy Industries"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,

    /// Project configuration passed to the transform engine
    #[arg(long, global = true)]
    tsconfig: Option<PathBuf>,

    /// esbuild binary
    #[arg(long, global = true)]
    esbuild: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Command {
    /// Resolve a specifier and print the result as JSON
    Resolve {
        /// Specifier as written in source
        specifier: String,

        /// URL of the importing module (defaults to the working directory)
        #[arg(long)]
        parent: Option<String>,
    },

    /// Load a module and print its (transformed) source
    Load {
        /// File URL or path of the module
        url: String,

        /// Request an inline source map
        #[arg(long)]
        enable_source_maps: bool,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        "spacey_hooks=debug,spacey_loader=debug"
    } else {
        "spacey_hooks=warn,spacey_loader=warn"
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{}: {}", "Error".red().bold(), e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let mut config = HooksConfig::from_env();
    if let Some(tsconfig) = cli.tsconfig {
        config.project_config = tsconfig;
    }
    if let Some(esbuild) = cli.esbuild {
        config.esbuild = esbuild;
    }

    let hooks = Hooks::from_config(&config);

    match cli.command {
        Command::Resolve { specifier, parent } => {
            let parent = match parent {
                Some(parent) => parent,
                None => cwd_url()?,
            };
            let context = ResolveContext::with_parent(parent);
            let resolved = hooks.resolve(&specifier, &context, &HostResolve).await?;
            println!("{}", serde_json::to_string_pretty(&resolved)?);
        }
        Command::Load {
            url,
            enable_source_maps,
        } => {
            if enable_source_maps {
                hooks.source_maps().set(true);
            }
            let url = to_module_url(&url)?;
            let loaded = hooks.load(&url, &LoadContext::default(), &HostLoad).await?;
            match loaded.source.as_text() {
                Some(text) => print!("{}", text),
                None => anyhow::bail!("{} is not valid UTF-8", url),
            }
        }
    }

    Ok(())
}

/// URL of the working directory, usable as a parent for relative specifiers
fn cwd_url() -> anyhow::Result<String> {
    let cwd = std::env::current_dir()?;
    Url::from_directory_path(&cwd)
        .map(String::from)
        .map_err(|_| anyhow::anyhow!("Cannot express {} as a URL", cwd.display()))
}

/// Accept either a URL or a filesystem path
fn to_module_url(input: &str) -> anyhow::Result<String> {
    if input.starts_with("file:") {
        return Ok(input.to_string());
    }
    let path = std::path::absolute(input)?;
    Url::from_file_path(&path)
        .map(String::from)
        .map_err(|_| anyhow::anyhow!("Cannot express {} as a URL", path.display()))
}
