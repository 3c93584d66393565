// src/commands/get.rs
//! Metadata inspection command

use anyhow::Result;
use tracing::info;

use tlbtool::{Engine, LibraryMetadata, PathResolver, TypeLibApi};

use crate::cli::SourceArgs;

/// Show the attributes and documentation of every library the arguments name
pub fn cmd_get<A: TypeLibApi, R: PathResolver>(
    engine: &Engine<A, R>,
    args: &SourceArgs,
    json: bool,
) -> Result<()> {
    let source = super::source_from_args(args)?;
    let outcomes = engine.metadata(&source);

    let total = outcomes.len();
    let mut failures = 0usize;
    let mut records = Vec::new();

    for outcome in outcomes {
        match outcome {
            Ok(metadata) => {
                if json {
                    records.push(metadata);
                } else {
                    print_metadata(&metadata);
                }
            }
            Err(err) => {
                failures += 1;
                eprintln!("tlbtool: {err}");
            }
        }
    }

    if json {
        println!("{}", serde_json::to_string_pretty(&records)?);
    }

    info!("inspected {} of {} input(s)", total - failures, total);
    super::fail_if_any(failures, total)
}

fn print_metadata(metadata: &LibraryMetadata) {
    if let Some(file) = &metadata.source_file {
        println!("File          : {}", file.display());
    }
    println!("Guid          : {}", metadata.attributes.guid);
    println!("Version       : {}", metadata.attributes.version);
    println!("LCID          : {}", metadata.attributes.lcid);
    println!("SysKind       : {}", metadata.attributes.syskind);
    println!("Flags         : 0x{:04X}", metadata.attributes.flags.bits());
    println!("Name          : {}", metadata.name);
    if let Some(doc) = &metadata.documentation {
        println!("Documentation : {}", doc);
    }
    println!("HelpContext   : {}", metadata.help_context);
    if let Some(help) = &metadata.help_file {
        println!("HelpFile      : {}", help);
    }
    println!();
}
