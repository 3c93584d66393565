// src/identifier.rs
//! Library identifiers: versions, system kinds, registry keys and the
//! tagged input shapes
//!
//! The four mutually exclusive ways of naming a type library (wildcarded
//! paths, literal paths, a registry triple, an open handle) are one explicit
//! enum built once at the CLI boundary. The core dispatches on the tag; it
//! never re-derives which shape was used.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use strum_macros::{Display, EnumString};
use thiserror::Error;
use uuid::Uuid;

/// Two-part version of a type library
///
/// Format: `major.minor`, e.g. `2.1`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct LibraryVersion {
    pub major: u16,
    pub minor: u16,
}

impl LibraryVersion {
    pub fn new(major: u16, minor: u16) -> Self {
        Self { major, minor }
    }

    /// Parse a `major.minor` version string
    ///
    /// Examples:
    /// - "2.1" → major=2, minor=1
    /// - "1.0" → major=1, minor=0
    pub fn parse(s: &str) -> Result<Self, VersionParseError> {
        let (major_str, minor_str) = s
            .split_once('.')
            .ok_or_else(|| VersionParseError::MissingDot(s.to_string()))?;

        let major = major_str
            .parse::<u16>()
            .map_err(|_| VersionParseError::InvalidComponent(s.to_string()))?;
        let minor = minor_str
            .parse::<u16>()
            .map_err(|_| VersionParseError::InvalidComponent(s.to_string()))?;

        Ok(Self { major, minor })
    }
}

impl fmt::Display for LibraryVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

impl FromStr for LibraryVersion {
    type Err = VersionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

/// Errors from parsing a `major.minor` version string
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum VersionParseError {
    #[error("version '{0}' is missing the '.' separator")]
    MissingDot(String),
    #[error("version '{0}' has a component that is not a 16-bit number")]
    InvalidComponent(String),
}

/// Target environment recorded in a library's attribute block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum SysKind {
    Win16,
    Win32,
    Mac,
    Win64,
}

impl SysKind {
    /// Map the raw SYSKIND value from the attribute block
    pub fn from_raw(value: u32) -> Option<Self> {
        match value {
            0 => Some(SysKind::Win16),
            1 => Some(SysKind::Win32),
            2 => Some(SysKind::Mac),
            3 => Some(SysKind::Win64),
            _ => None,
        }
    }

    pub fn as_raw(self) -> u32 {
        match self {
            SysKind::Win16 => 0,
            SysKind::Win32 => 1,
            SysKind::Mac => 2,
            SysKind::Win64 => 3,
        }
    }
}

/// Registry lookup key for a registered type library
///
/// This is the triple the catalog is queried with; it does not carry a
/// syskind because lookup is version- and locale-scoped only.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryKey {
    pub guid: Uuid,
    pub version: LibraryVersion,
    pub lcid: u32,
}

impl LibraryKey {
    pub fn new(guid: Uuid, version: LibraryVersion, lcid: u32) -> Self {
        Self {
            guid,
            version,
            lcid,
        }
    }
}

impl fmt::Display for LibraryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} lcid {}", self.guid, self.version, self.lcid)
    }
}

/// Full identity used to remove a registration
///
/// Unregistration needs identity only, never content; no handle is loaded
/// for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct LibraryIdentity {
    pub guid: Uuid,
    pub version: LibraryVersion,
    pub lcid: u32,
    pub syskind: SysKind,
}

impl LibraryIdentity {
    pub fn new(guid: Uuid, version: LibraryVersion, lcid: u32, syskind: SysKind) -> Self {
        Self {
            guid,
            version,
            lcid,
            syskind,
        }
    }
}

impl fmt::Display for LibraryIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} lcid {} ({})",
            self.guid, self.version, self.lcid, self.syskind
        )
    }
}

/// Whether a registration applies to the current user or the whole machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumString)]
#[strum(ascii_case_insensitive)]
pub enum RegistrationScope {
    CurrentUser,
    AllUsers,
}

impl RegistrationScope {
    /// Resolve an optional scope argument
    ///
    /// Absent, or case-insensitively equal to `CurrentUser`, selects the
    /// per-user scope; any other value selects the machine-wide scope.
    pub fn from_option(scope: Option<&str>) -> Self {
        match scope {
            None => RegistrationScope::CurrentUser,
            Some(s) if s.eq_ignore_ascii_case("CurrentUser") => RegistrationScope::CurrentUser,
            Some(_) => RegistrationScope::AllUsers,
        }
    }

    pub fn is_per_user(self) -> bool {
        matches!(self, RegistrationScope::CurrentUser)
    }
}

/// One invocation's input, exactly one shape populated
///
/// `Handle` borrows an already-open library from the caller; the borrow is
/// why the core never releases it.
#[derive(Debug)]
pub enum LibrarySource<'a, L> {
    /// Wildcard-capable path arguments, expanded by the path resolver
    Paths(&'a [String]),
    /// Paths taken verbatim, without wildcard expansion
    LiteralPaths(&'a [String]),
    /// A registered library addressed by guid, version and locale
    Registered(LibraryKey),
    /// An already-open handle borrowed from the caller
    Handle(&'a L),
}

impl<L> LibrarySource<'_, L> {
    /// Name of the shape, for unsupported-shape reporting
    pub fn shape(&self) -> &'static str {
        match self {
            LibrarySource::Paths(_) => "path",
            LibrarySource::LiteralPaths(_) => "literal",
            LibrarySource::Registered(_) => "registered",
            LibrarySource::Handle(_) => "handle",
        }
    }
}
