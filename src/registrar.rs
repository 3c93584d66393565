// src/registrar.rs
//! Registration and unregistration of type libraries
//!
//! Registration is an explicit step: the target is loaded with the
//! non-registering entry point, then handed to the scope-appropriate
//! registration call. Unregistration works from identity alone and never
//! loads the library.

use std::path::Path;

use tracing::info;

use crate::error::{Result, Subject};
use crate::identifier::{LibraryIdentity, RegistrationScope};
use crate::platform::TypeLibApi;

/// Load the library at `path` and register it for `scope`
///
/// The loaded handle is scoped to this call and released when it returns,
/// on success and failure alike.
pub fn register<A: TypeLibApi>(
    api: &A,
    path: &Path,
    scope: RegistrationScope,
    help_dir: Option<&Path>,
) -> Result<()> {
    let subject = Subject::path(path);
    let lib = api
        .load_path(path)
        .map_err(|err| err.invalid_result(subject.clone()))?;
    api.register(&lib, path, scope, help_dir)
        .map_err(|err| err.invalid_result(subject))?;
    info!("registered '{}' for {}", path.display(), scope);
    Ok(())
}

/// Remove the registration identified by `identity` from `scope`
pub fn unregister<A: TypeLibApi>(
    api: &A,
    identity: &LibraryIdentity,
    scope: RegistrationScope,
) -> Result<()> {
    api.unregister(identity, scope)
        .map_err(|err| err.invalid_result(Subject::Identity(identity.clone())))?;
    info!("unregistered {} from {}", identity, scope);
    Ok(())
}
