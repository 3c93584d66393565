// src/commands/register.rs
//! Registration and unregistration commands

use std::path::Path;

use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use tlbtool::{
    Engine, LibraryIdentity, LibrarySource, LibraryVersion, PathResolver, RegistrationScope,
    SysKind, TypeLibApi,
};

/// Register every library the arguments name for the given scope
pub fn cmd_register<A: TypeLibApi, R: PathResolver>(
    engine: &Engine<A, R>,
    paths: &[String],
    literal_paths: &[String],
    scope: Option<&str>,
    help_directory: Option<&Path>,
) -> Result<()> {
    let source: LibrarySource<'_, A::Lib> = if !paths.is_empty() {
        LibrarySource::Paths(paths)
    } else if !literal_paths.is_empty() {
        LibrarySource::LiteralPaths(literal_paths)
    } else {
        anyhow::bail!("specify paths or --literal-path");
    };

    let scope = RegistrationScope::from_option(scope);
    info!("registering for scope {}", scope);

    let outcomes = engine.register(&source, scope, help_directory);

    let total = outcomes.len();
    let mut failures = 0usize;
    for outcome in &outcomes {
        if let Err(err) = outcome {
            failures += 1;
            eprintln!("tlbtool: {err}");
        }
    }

    println!("registered {} of {} library(ies) for {}", total - failures, total, scope);
    super::fail_if_any(failures, total)
}

/// Remove the registration identified by guid, version, locale and syskind
pub fn cmd_unregister<A: TypeLibApi, R: PathResolver>(
    engine: &Engine<A, R>,
    guid: Uuid,
    version: LibraryVersion,
    lcid: u32,
    syskind: SysKind,
    scope: Option<&str>,
) -> Result<()> {
    let identity = LibraryIdentity::new(guid, version, lcid, syskind);
    let scope = RegistrationScope::from_option(scope);

    engine.unregister(&identity, scope)?;
    println!("unregistered {} from {}", identity, scope);
    Ok(())
}
