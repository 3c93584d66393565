// src/main.rs

mod cli;
mod commands;

use anyhow::Result;
use clap::Parser;

use tlbtool::{Engine, FsResolver};

use cli::{Cli, Commands};

#[cfg(windows)]
use tlbtool::platform::windows::{OleAut as HostApi, TypeInfoConverter as HostConverter};

#[cfg(not(windows))]
use tlbtool::platform::unsupported::{
    Unsupported as HostApi, UnsupportedConverter as HostConverter,
};

fn main() -> Result<()> {
    // Initialize tracing subscriber for logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    let engine = Engine::new(HostApi::default(), FsResolver);

    match cli.command {
        Commands::Get { source, json } => commands::cmd_get(&engine, &source, json),
        Commands::Import { source } => commands::cmd_import(&engine, &source),
        Commands::Convert {
            source,
            name,
            out_dir,
        } => {
            let converter = HostConverter::new(out_dir);
            commands::cmd_convert(&engine, &converter, &source, &name)
        }
        Commands::Register {
            paths,
            literal_path,
            scope,
            help_directory,
        } => commands::cmd_register(
            &engine,
            &paths,
            &literal_path,
            scope.as_deref(),
            help_directory.as_deref(),
        ),
        Commands::Unregister {
            guid,
            version,
            lcid,
            syskind,
            scope,
        } => commands::cmd_unregister(&engine, guid, version, lcid, syskind, scope.as_deref()),
        Commands::Completions { shell } => commands::cmd_completions(shell),
    }
}
