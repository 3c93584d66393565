// src/commands/convert.rs
//! Module conversion command

use anyhow::Result;
use tracing::info;

use tlbtool::{Engine, LoggingSink, ModuleConverter, PathResolver, TypeLibApi};

use crate::cli::SourceArgs;

/// Convert every library the arguments name into an importable module
///
/// Converter diagnostics are forwarded to the log; external references are
/// declined, so a library that leans on a not-yet-imported library fails
/// conversion for that reference.
pub fn cmd_convert<A, R, C>(
    engine: &Engine<A, R>,
    converter: &C,
    args: &SourceArgs,
    name: &str,
) -> Result<()>
where
    A: TypeLibApi,
    R: PathResolver,
    C: ModuleConverter<A::Lib>,
{
    let source = super::source_from_args(args)?;
    let mut sink = LoggingSink;
    let outcomes = engine.convert(&source, converter, name, &mut sink);

    let total = outcomes.len();
    let mut failures = 0usize;

    for outcome in &outcomes {
        match outcome {
            Ok(module) => {
                println!("wrote module '{}' to '{}'", module.name, module.path.display());
            }
            Err(err) => {
                failures += 1;
                eprintln!("tlbtool: {err}");
            }
        }
    }

    info!("converted {} of {} input(s)", total - failures, total);
    super::fail_if_any(failures, total)
}
