// src/lib.rs

//! tlbtool
//!
//! Inspection, conversion, registration and unregistration of COM type
//! libraries.
//!
//! # Architecture
//!
//! - Boundary-first identifiers: the four mutually exclusive input shapes
//!   (wildcarded paths, literal paths, registry triple, open handle) are one
//!   tagged enum built at the CLI boundary
//! - Scoped native resources: library handles release on drop, attribute
//!   blocks through an RAII guard that releases on every exit path
//! - Continue-on-error batches: per-item classified outcomes, reported in
//!   input order; one failing item never aborts its siblings
//! - Injected collaborators: path resolution, the platform loader/registrar
//!   and the module converter sit behind traits, with the COM runtime as the
//!   one production backend

pub mod attributes;
pub mod convert;
pub mod engine;
mod error;
pub mod identifier;
pub mod inspect;
pub mod platform;
pub mod registrar;
pub mod resolver;

pub use attributes::{
    lock_attributes, with_attributes, AttributeGuard, LibFlags, LibraryAttributes,
};
pub use convert::{
    ConversionSink, ConvertError, EventKind, ExternalReference, LoggingSink, Module,
    ModuleConverter,
};
pub use engine::{Engine, Imported, Outcome};
pub use error::{Error, ErrorKind, HResult, Result, Subject};
pub use identifier::{
    LibraryIdentity, LibraryKey, LibrarySource, LibraryVersion, RegistrationScope, SysKind,
    VersionParseError,
};
pub use inspect::{inspect, LibraryMetadata};
pub use platform::{Documentation, NativeError, TypeLib, TypeLibApi};
pub use resolver::{FsResolver, PathResolver, Resolved, ResolveError};
