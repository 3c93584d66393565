// src/error.rs
//! Classified errors for type library operations
//!
//! Every native failure is wrapped at the boundary where it occurs with one
//! of four kinds and the identifier that was being processed. Classified
//! errors are reported per input; a failing item never aborts the rest of
//! its batch.

use std::fmt;

use thiserror::Error;

use crate::identifier::{LibraryIdentity, LibraryKey};

/// Result type for type library operations
pub type Result<T> = std::result::Result<T, Error>;

/// A COM-style result code
///
/// Negative values are failures. Displayed in the conventional `0x%08X`
/// form so codes can be looked up directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HResult(pub i32);

impl HResult {
    /// HRESULT_FROM_WIN32(ERROR_FILE_NOT_FOUND): 0x80070002
    pub const FILE_NOT_FOUND: HResult = HResult(-2147024894);
    /// TYPE_E_CANTLOADLIBRARY: 0x80029C4A
    pub const CANT_LOAD_LIBRARY: HResult = HResult(-2147312566);
    /// TYPE_E_LIBNOTREGISTERED: 0x8002801D
    pub const LIB_NOT_REGISTERED: HResult = HResult(-2147319779);
    /// E_NOTIMPL: 0x80004001
    pub const NOT_IMPLEMENTED: HResult = HResult(-2147467263);
    /// E_FAIL: 0x80004005
    pub const FAIL: HResult = HResult(-2147467259);

    /// Whether the code signals failure
    pub fn is_failure(self) -> bool {
        self.0 < 0
    }
}

impl fmt::Display for HResult {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "0x{:08X}", self.0 as u32)
    }
}

/// The input a failed operation was acting on
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Subject {
    /// A path argument, wildcarded or concrete
    Path(String),
    /// A path provider other than the plain file system
    Provider(String),
    /// A registry lookup key (guid + version + locale)
    Key(LibraryKey),
    /// A full registration identity (guid + version + locale + syskind)
    Identity(LibraryIdentity),
    /// A caller-supplied open handle
    Handle,
    /// An identifier shape the operation does not support
    Shape(&'static str),
}

impl Subject {
    /// Convenience constructor from anything path-like
    pub fn path(path: impl AsRef<std::path::Path>) -> Self {
        Subject::Path(path.as_ref().display().to_string())
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Subject::Path(path) => write!(f, "'{}'", path),
            Subject::Provider(provider) => write!(f, "provider '{}'", provider),
            Subject::Key(key) => write!(f, "registered library {}", key),
            Subject::Identity(identity) => write!(f, "library {}", identity),
            Subject::Handle => write!(f, "open handle"),
            Subject::Shape(shape) => write!(f, "identifier shape '{}'", shape),
        }
    }
}

/// Discriminant of a classified error
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    ResourceUnavailable,
    NotImplemented,
    InvalidResult,
    InvalidType,
}

/// A classified, identifier-scoped failure
#[derive(Debug, Error)]
pub enum Error {
    /// The input does not exist or resolved to nothing
    #[error("resource unavailable: {subject}")]
    ResourceUnavailable {
        subject: Subject,
        code: Option<HResult>,
    },

    /// The input addressed an unsupported provider or identifier shape
    #[error("not implemented: {subject}")]
    NotImplemented { subject: Subject },

    /// The native subsystem returned a failure result
    #[error("native failure {code} for {subject}: {message}")]
    InvalidResult {
        subject: Subject,
        code: HResult,
        message: String,
    },

    /// The native subsystem produced something that could not become the
    /// expected artifact
    #[error("type load failure for {subject}: {message}")]
    InvalidType { subject: Subject, message: String },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::ResourceUnavailable { .. } => ErrorKind::ResourceUnavailable,
            Error::NotImplemented { .. } => ErrorKind::NotImplemented,
            Error::InvalidResult { .. } => ErrorKind::InvalidResult,
            Error::InvalidType { .. } => ErrorKind::InvalidType,
        }
    }

    pub fn subject(&self) -> &Subject {
        match self {
            Error::ResourceUnavailable { subject, .. }
            | Error::NotImplemented { subject }
            | Error::InvalidResult { subject, .. }
            | Error::InvalidType { subject, .. } => subject,
        }
    }

    /// The native result code, when the failure originated in a native call
    pub fn native_code(&self) -> Option<HResult> {
        match self {
            Error::ResourceUnavailable { code, .. } => *code,
            Error::InvalidResult { code, .. } => Some(*code),
            Error::NotImplemented { .. } | Error::InvalidType { .. } => None,
        }
    }
}
