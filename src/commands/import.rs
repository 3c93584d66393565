// src/commands/import.rs
//! Handle import command

use anyhow::Result;
use tracing::info;

use tlbtool::{Engine, PathResolver, TypeLibApi};

use crate::cli::SourceArgs;

/// Load every library the arguments name and report the acquired handles
///
/// The handles live until the command completes; each one releases when it
/// drops.
pub fn cmd_import<A: TypeLibApi, R: PathResolver>(
    engine: &Engine<A, R>,
    args: &SourceArgs,
) -> Result<()> {
    let source = super::source_from_args(args)?;
    let outcomes = engine.import(&source);

    let total = outcomes.len();
    let mut failures = 0usize;

    for outcome in &outcomes {
        match outcome {
            Ok(imported) => match &imported.source_file {
                Some(path) => println!("imported '{}'", path.display()),
                None => println!("imported registered library"),
            },
            Err(err) => {
                failures += 1;
                eprintln!("tlbtool: {err}");
            }
        }
    }

    info!("imported {} of {} input(s)", total - failures, total);
    super::fail_if_any(failures, total)
}
