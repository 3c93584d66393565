// src/convert.rs
//! Conversion of a loaded library into an importable module
//!
//! The converter itself is an external collaborator; this module defines the
//! contract the core drives: the converter, the notification sink it reports
//! through, and the classification of its failures. The sink also answers
//! external-reference queries; the default answer is to decline, so a
//! library referencing types from a not-yet-imported library fails
//! conversion rather than picking up a placeholder.

use std::path::PathBuf;

use serde::Serialize;
use thiserror::Error;
use tracing::debug;
use uuid::Uuid;

use crate::error::{Error, Subject};
use crate::platform::{NativeError, TypeLib};

/// Importer notification kinds forwarded through the sink
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventKind {
    /// A type was converted
    TypeConverted,
    /// A type was converted with a caveat
    ConvertWarning,
    /// A reference pointed at a library that could not be used
    InvalidReference,
}

/// A type defined in a different library than the one being converted
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalReference {
    /// Name of the referenced library
    pub library: String,
    pub guid: Option<Uuid>,
}

/// Module artifact produced by a conversion
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Module {
    pub name: String,
    pub path: PathBuf,
}

/// Receives converter diagnostics and external-reference queries
pub trait ConversionSink {
    /// Forward one diagnostic event; must never fail the conversion
    fn on_event(&mut self, kind: EventKind, code: i32, message: &str);

    /// Offer an already-imported module for an external reference, or
    /// decline with `None`
    fn resolve_external(&mut self, reference: &ExternalReference) -> Option<Module>;
}

/// Turns a loaded library into an importable module
pub trait ModuleConverter<L: TypeLib> {
    fn convert(
        &self,
        lib: &L,
        output_name: &str,
        sink: &mut dyn ConversionSink,
    ) -> Result<Module, ConvertError>;
}

/// Converter failure, before classification
#[derive(Debug, Error)]
pub enum ConvertError {
    /// A native call failed during conversion
    #[error("{0}")]
    Native(NativeError),
    /// The produced module could not be realized as the expected artifact
    #[error("type load failed: {0}")]
    TypeLoad(String),
    /// Writing the module artifact failed
    #[error("module write failed: {0}")]
    Io(#[from] std::io::Error),
}

impl ConvertError {
    /// Classify, scoped to the identifier being converted
    pub fn classify(self, subject: Subject) -> Error {
        match self {
            ConvertError::Native(err) => err.invalid_result(subject),
            ConvertError::TypeLoad(message) => Error::InvalidType { subject, message },
            ConvertError::Io(err) => Error::InvalidResult {
                subject,
                code: crate::error::HResult::FAIL,
                message: err.to_string(),
            },
        }
    }
}

/// Default sink: diagnostics go to the log as verbose messages and every
/// external reference is declined
#[derive(Debug, Default, Clone, Copy)]
pub struct LoggingSink;

impl ConversionSink for LoggingSink {
    fn on_event(&mut self, kind: EventKind, code: i32, message: &str) {
        debug!(?kind, code, "{message}");
    }

    fn resolve_external(&mut self, reference: &ExternalReference) -> Option<Module> {
        debug!("declining external reference to '{}'", reference.library);
        None
    }
}
