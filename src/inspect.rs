// src/inspect.rs
//! Metadata extraction from a loaded library

use std::path::{Path, PathBuf};

use serde::Serialize;

use crate::attributes::{self, LibraryAttributes};
use crate::platform::{NativeError, TypeLib, LIBRARY_DOC_INDEX};

/// Immutable description of an inspected library
///
/// `source_file` is absent when the library came from an open handle or
/// from a registry entry whose backing file is unknown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LibraryMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<PathBuf>,
    pub attributes: LibraryAttributes,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub documentation: Option<String>,
    pub help_context: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub help_file: Option<String>,
}

/// Extract the attribute block and the library-level documentation tuple
///
/// The attribute block stays acquired across the documentation call and is
/// released on every exit path, including a documentation failure.
pub fn inspect<L: TypeLib + ?Sized>(
    lib: &L,
    source_file: Option<&Path>,
) -> Result<LibraryMetadata, NativeError> {
    let attrs = attributes::lock_attributes(lib)?;
    let doc = lib.documentation(LIBRARY_DOC_INDEX)?;

    Ok(LibraryMetadata {
        source_file: source_file.map(Path::to_path_buf),
        attributes: *attrs,
        name: doc.name,
        documentation: doc.doc_string,
        help_context: doc.help_context,
        help_file: doc.help_file,
    })
}
