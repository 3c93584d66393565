// src/attributes.rs
//! Library attribute blocks and their scoped acquisition
//!
//! The attribute block is a native resource distinct from the library handle
//! and must be released after every acquisition. [`lock_attributes`] wraps
//! the acquire/release pair in an RAII guard so release runs on every exit
//! path; call sites never pair the two by hand.

use std::ops::Deref;

use bitflags::bitflags;
use serde::{Serialize, Serializer};
use uuid::Uuid;

use crate::identifier::{LibraryIdentity, LibraryVersion, SysKind};
use crate::platform::{NativeError, TypeLib};

bitflags! {
    /// LIBFLAG bits from the attribute block
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct LibFlags: u16 {
        const RESTRICTED = 0x1;
        const CONTROL = 0x2;
        const HIDDEN = 0x4;
        const HAS_DISK_IMAGE = 0x8;
    }
}

impl Serialize for LibFlags {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u16(self.bits())
    }
}

/// Value snapshot of a library's native attribute block
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LibraryAttributes {
    pub guid: Uuid,
    pub lcid: u32,
    pub syskind: SysKind,
    pub version: LibraryVersion,
    pub flags: LibFlags,
}

impl LibraryAttributes {
    /// The four-part identity used for unregistration
    pub fn identity(&self) -> LibraryIdentity {
        LibraryIdentity::new(self.guid, self.version, self.lcid, self.syskind)
    }
}

/// Scoped view of a library's attribute block
///
/// The native block stays acquired for the guard's lifetime and is released
/// exactly once when the guard drops, whether the scope ends by normal
/// return, `?` propagation or unwind.
pub struct AttributeGuard<'l, L: TypeLib + ?Sized> {
    lib: &'l L,
    attrs: LibraryAttributes,
}

impl<L: TypeLib + ?Sized> Deref for AttributeGuard<'_, L> {
    type Target = LibraryAttributes;

    fn deref(&self) -> &LibraryAttributes {
        &self.attrs
    }
}

impl<L: TypeLib + ?Sized> Drop for AttributeGuard<'_, L> {
    fn drop(&mut self) {
        self.lib.release_attributes();
    }
}

/// Acquire a library's attribute block behind a release-on-drop guard
pub fn lock_attributes<L: TypeLib + ?Sized>(
    lib: &L,
) -> Result<AttributeGuard<'_, L>, NativeError> {
    let attrs = lib.acquire_attributes()?;
    Ok(AttributeGuard { lib, attrs })
}

/// Run `f` against the attribute block, releasing it on every exit path
pub fn with_attributes<L, T, F>(lib: &L, f: F) -> Result<T, NativeError>
where
    L: TypeLib + ?Sized,
    F: FnOnce(&LibraryAttributes) -> Result<T, NativeError>,
{
    let guard = lock_attributes(lib)?;
    f(&guard)
}
