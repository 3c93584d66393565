// src/platform/unsupported.rs
//! Stub backend for hosts without a type library runtime
//!
//! Type libraries are a Windows facility; on any other host every entry
//! point fails with E_NOTIMPL at run time. The library type is uninhabited,
//! so none of the handle-level code paths exist on these hosts.

use std::path::{Path, PathBuf};

use crate::attributes::LibraryAttributes;
use crate::convert::{ConversionSink, ConvertError, Module, ModuleConverter};
use crate::error::HResult;
use crate::identifier::{LibraryIdentity, LibraryKey, RegistrationScope};
use crate::platform::{Documentation, NativeError, TypeLib, TypeLibApi};

const MESSAGE: &str = "type libraries are not available on this host";

fn not_available() -> NativeError {
    NativeError::new(HResult::NOT_IMPLEMENTED, MESSAGE)
}

/// Uninhabited library type; no handle can exist on this host
pub enum NeverLib {}

impl TypeLib for NeverLib {
    fn acquire_attributes(&self) -> Result<LibraryAttributes, NativeError> {
        match *self {}
    }

    fn release_attributes(&self) {
        match *self {}
    }

    fn documentation(&self, _index: i32) -> Result<Documentation, NativeError> {
        match *self {}
    }
}

/// Backend whose every entry point reports E_NOTIMPL
#[derive(Debug, Default, Clone, Copy)]
pub struct Unsupported;

impl TypeLibApi for Unsupported {
    type Lib = NeverLib;

    fn load_path(&self, _path: &Path) -> Result<NeverLib, NativeError> {
        Err(not_available())
    }

    fn load_registered(&self, _key: &LibraryKey) -> Result<NeverLib, NativeError> {
        Err(not_available())
    }

    fn registered_path(&self, _key: &LibraryKey) -> Result<PathBuf, NativeError> {
        Err(not_available())
    }

    fn register(
        &self,
        lib: &NeverLib,
        _path: &Path,
        _scope: RegistrationScope,
        _help_dir: Option<&Path>,
    ) -> Result<(), NativeError> {
        match *lib {}
    }

    fn unregister(
        &self,
        _identity: &LibraryIdentity,
        _scope: RegistrationScope,
    ) -> Result<(), NativeError> {
        Err(not_available())
    }
}

/// Converter counterpart of [`Unsupported`]; unreachable because no
/// [`NeverLib`] value can be produced
#[derive(Debug, Default, Clone, Copy)]
pub struct UnsupportedConverter;

impl UnsupportedConverter {
    pub fn new(_out_dir: impl Into<PathBuf>) -> Self {
        Self
    }
}

impl ModuleConverter<NeverLib> for UnsupportedConverter {
    fn convert(
        &self,
        lib: &NeverLib,
        _output_name: &str,
        _sink: &mut dyn ConversionSink,
    ) -> Result<Module, ConvertError> {
        match *lib {}
    }
}
