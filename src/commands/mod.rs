// src/commands/mod.rs
//! Command handlers for the tlbtool CLI

mod convert;
mod get;
mod import;
mod register;

pub use convert::cmd_convert;
pub use get::cmd_get;
pub use import::cmd_import;
pub use register::{cmd_register, cmd_unregister};

use std::io;

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{generate, Shell};

use tlbtool::{LibraryKey, LibrarySource};

use crate::cli::{Cli, SourceArgs};

/// Build the tagged library source from the CLI arguments
///
/// clap's argument groups guarantee the shapes are mutually exclusive; this
/// only picks the populated one.
pub(crate) fn source_from_args<L>(args: &SourceArgs) -> Result<LibrarySource<'_, L>> {
    if !args.paths.is_empty() {
        return Ok(LibrarySource::Paths(&args.paths));
    }
    if !args.literal_path.is_empty() {
        return Ok(LibrarySource::LiteralPaths(&args.literal_path));
    }
    match (args.guid, args.version, args.lcid) {
        (Some(guid), Some(version), Some(lcid)) => Ok(LibrarySource::Registered(
            LibraryKey::new(guid, version, lcid),
        )),
        _ => anyhow::bail!("specify paths, --literal-path, or --guid with --version and --lcid"),
    }
}

/// Fold a batch into a command result after all items were reported
pub(crate) fn fail_if_any(failures: usize, total: usize) -> Result<()> {
    if failures > 0 {
        anyhow::bail!("{} of {} input(s) failed", failures, total);
    }
    Ok(())
}

/// Generate shell completion scripts
pub fn cmd_completions(shell: Shell) -> Result<()> {
    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(shell, &mut cmd, name, &mut io::stdout());
    Ok(())
}
