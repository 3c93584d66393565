// src/platform/windows.rs
//! COM-backed platform implementation over the system type library runtime
//!
//! All unsafe lives here. Each block carries a SAFETY note; everything
//! above this module sees only the [`TypeLib`]/[`TypeLibApi`] traits.

use std::cell::Cell;
use std::fs;
use std::path::{Path, PathBuf};

use serde_json::json;
use uuid::Uuid;
use windows::core::{BSTR, GUID, HSTRING, PCWSTR};
use windows::Win32::System::Com::{ITypeLib, SYSKIND, TLIBATTR};
use windows::Win32::System::Ole::{
    LoadRegTypeLib, LoadTypeLibEx, QueryPathOfRegTypeLib, RegisterTypeLib,
    RegisterTypeLibForUser, UnRegisterTypeLib, UnRegisterTypeLibForUser, REGKIND_NONE,
};

use crate::attributes::{LibFlags, LibraryAttributes};
use crate::convert::{
    ConversionSink, ConvertError, EventKind, ExternalReference, Module, ModuleConverter,
};
use crate::error::HResult;
use crate::identifier::{LibraryIdentity, LibraryKey, LibraryVersion, RegistrationScope, SysKind};
use crate::inspect;
use crate::platform::{Documentation, NativeError, TypeLib, TypeLibApi, LIBRARY_DOC_INDEX};

impl From<windows::core::Error> for NativeError {
    fn from(err: windows::core::Error) -> Self {
        NativeError::new(HResult(err.code().0), err.message().to_string())
    }
}

fn guid_from_uuid(uuid: &Uuid) -> GUID {
    let (data1, data2, data3, data4) = uuid.as_fields();
    GUID {
        data1,
        data2,
        data3,
        data4: *data4,
    }
}

fn uuid_from_guid(guid: &GUID) -> Uuid {
    Uuid::from_fields(guid.data1, guid.data2, guid.data3, &guid.data4)
}

fn syskind_to_raw(kind: SysKind) -> SYSKIND {
    SYSKIND(kind.as_raw() as i32)
}

fn opt_string(value: BSTR) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

/// Owned reference to a loaded library
///
/// The COM reference releases when the value drops. The raw attribute block
/// pointer lives in `attrs` between acquire and release so the release call
/// can return it to the runtime.
pub struct ComTypeLib {
    lib: ITypeLib,
    attrs: Cell<*mut TLIBATTR>,
}

impl ComTypeLib {
    fn new(lib: ITypeLib) -> Self {
        Self {
            lib,
            attrs: Cell::new(std::ptr::null_mut()),
        }
    }

    /// The underlying COM interface
    pub fn raw(&self) -> &ITypeLib {
        &self.lib
    }
}

impl TypeLib for ComTypeLib {
    fn acquire_attributes(&self) -> Result<LibraryAttributes, NativeError> {
        // SAFETY: GetLibAttr hands out a block owned by the library; the
        // pointer is stashed so release_attributes can return it.
        let ptr = unsafe { self.lib.GetLibAttr() }.map_err(NativeError::from)?;
        let raw = unsafe { *ptr };
        self.attrs.set(ptr);

        Ok(LibraryAttributes {
            guid: uuid_from_guid(&raw.guid),
            lcid: raw.lcid,
            syskind: SysKind::from_raw(raw.syskind.0 as u32).unwrap_or(SysKind::Win32),
            version: LibraryVersion::new(raw.wMajorVerNum, raw.wMinorVerNum),
            flags: LibFlags::from_bits_truncate(raw.wLibFlags),
        })
    }

    fn release_attributes(&self) {
        let ptr = self.attrs.replace(std::ptr::null_mut());
        if !ptr.is_null() {
            // SAFETY: ptr came from GetLibAttr on this library and is
            // returned exactly once.
            unsafe { self.lib.ReleaseTLibAttr(ptr) };
        }
    }

    fn documentation(&self, index: i32) -> Result<Documentation, NativeError> {
        let mut name = BSTR::default();
        let mut doc_string = BSTR::default();
        let mut help_context = 0u32;
        let mut help_file = BSTR::default();

        // SAFETY: all out pointers are valid for the duration of the call.
        unsafe {
            self.lib.GetDocumentation(
                index,
                Some(&mut name),
                Some(&mut doc_string),
                &mut help_context,
                Some(&mut help_file),
            )
        }
        .map_err(NativeError::from)?;

        Ok(Documentation {
            name: name.to_string(),
            doc_string: opt_string(doc_string),
            help_context,
            help_file: opt_string(help_file),
        })
    }
}

impl Drop for ComTypeLib {
    fn drop(&mut self) {
        // Return any attribute block still outstanding.
        self.release_attributes();
    }
}

/// Entry points of the system type library runtime
#[derive(Debug, Default, Clone, Copy)]
pub struct OleAut;

impl TypeLibApi for OleAut {
    type Lib = ComTypeLib;

    fn load_path(&self, path: &Path) -> Result<ComTypeLib, NativeError> {
        let file = HSTRING::from(path.as_os_str());
        // SAFETY: `file` outlives the call; REGKIND_NONE loads without
        // registering as a side effect.
        let lib = unsafe { LoadTypeLibEx(&file, REGKIND_NONE) }.map_err(NativeError::from)?;
        Ok(ComTypeLib::new(lib))
    }

    fn load_registered(&self, key: &LibraryKey) -> Result<ComTypeLib, NativeError> {
        let guid = guid_from_uuid(&key.guid);
        // SAFETY: the guid pointer is valid for the duration of the call.
        let lib = unsafe {
            LoadRegTypeLib(&guid, key.version.major, key.version.minor, key.lcid)
        }
        .map_err(NativeError::from)?;
        Ok(ComTypeLib::new(lib))
    }

    fn registered_path(&self, key: &LibraryKey) -> Result<PathBuf, NativeError> {
        let guid = guid_from_uuid(&key.guid);
        // SAFETY: the guid pointer is valid for the duration of the call.
        let path = unsafe {
            QueryPathOfRegTypeLib(&guid, key.version.major, key.version.minor, key.lcid)
        }
        .map_err(NativeError::from)?;
        Ok(PathBuf::from(path.to_string()))
    }

    fn register(
        &self,
        lib: &ComTypeLib,
        path: &Path,
        scope: RegistrationScope,
        help_dir: Option<&Path>,
    ) -> Result<(), NativeError> {
        let full_path = HSTRING::from(path.as_os_str());
        let help = help_dir.map(|dir| HSTRING::from(dir.as_os_str()));
        let help_param = help
            .as_ref()
            .map_or(PCWSTR::null(), |h| PCWSTR(h.as_ptr()));

        // SAFETY: all strings outlive the call; a null help directory means
        // the library has none.
        let result = match scope {
            RegistrationScope::CurrentUser => unsafe {
                RegisterTypeLibForUser(&lib.lib, &full_path, help_param)
            },
            RegistrationScope::AllUsers => unsafe {
                RegisterTypeLib(&lib.lib, &full_path, help_param)
            },
        };
        result.map_err(NativeError::from)
    }

    fn unregister(
        &self,
        identity: &LibraryIdentity,
        scope: RegistrationScope,
    ) -> Result<(), NativeError> {
        let guid = guid_from_uuid(&identity.guid);
        let syskind = syskind_to_raw(identity.syskind);

        // SAFETY: the guid pointer is valid for the duration of the call.
        let result = match scope {
            RegistrationScope::CurrentUser => unsafe {
                UnRegisterTypeLibForUser(
                    &guid,
                    identity.version.major,
                    identity.version.minor,
                    identity.lcid,
                    syskind,
                )
            },
            RegistrationScope::AllUsers => unsafe {
                UnRegisterTypeLib(
                    &guid,
                    identity.version.major,
                    identity.version.minor,
                    identity.lcid,
                    syskind,
                )
            },
        };
        result.map_err(NativeError::from)
    }
}

fn type_kind_name(kind: i32) -> &'static str {
    match kind {
        0 => "enum",
        1 => "record",
        2 => "module",
        3 => "interface",
        4 => "dispinterface",
        5 => "coclass",
        6 => "alias",
        7 => "union",
        _ => "unknown",
    }
}

/// Converts a loaded library into an importable interop module: a JSON
/// manifest describing the library and every type it defines
///
/// External references are routed through the sink; when the sink declines,
/// the conversion fails for that type rather than substituting a
/// placeholder.
pub struct TypeInfoConverter {
    out_dir: PathBuf,
}

impl TypeInfoConverter {
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    fn library_guid(lib: &ITypeLib) -> Result<GUID, NativeError> {
        // SAFETY: the attribute block is returned before this function
        // exits on both paths.
        unsafe {
            let ptr = lib.GetLibAttr().map_err(NativeError::from)?;
            let guid = (*ptr).guid;
            lib.ReleaseTLibAttr(ptr);
            Ok(guid)
        }
    }

    /// Walk the implemented types of one type info and route anything that
    /// lives in another library through the sink
    fn check_external_refs(
        own_guid: &GUID,
        info: &windows::Win32::System::Com::ITypeInfo,
        type_name: &str,
        sink: &mut dyn ConversionSink,
    ) -> Result<(), ConvertError> {
        // SAFETY: the type attribute block is released right after the
        // implemented-type count is read.
        let impl_count = unsafe {
            let attr = info.GetTypeAttr().map_err(NativeError::from).map_err(ConvertError::Native)?;
            let count = (*attr).cImplTypes;
            info.ReleaseTypeAttr(attr);
            count
        };

        for impl_index in 0..u32::from(impl_count) {
            // SAFETY: impl_index is below the count read above; out
            // pointers are valid for the call.
            let (container, ref_name) = unsafe {
                let href = info
                    .GetRefTypeOfImplType(impl_index)
                    .map_err(NativeError::from)
                    .map_err(ConvertError::Native)?;
                let ref_info = info
                    .GetRefTypeInfo(href)
                    .map_err(NativeError::from)
                    .map_err(ConvertError::Native)?;
                let mut container: Option<ITypeLib> = None;
                let mut index = 0u32;
                ref_info
                    .GetContainingTypeLib(&mut container, &mut index)
                    .map_err(NativeError::from)
                    .map_err(ConvertError::Native)?;
                let mut ref_name = BSTR::default();
                ref_info
                    .GetDocumentation(LIBRARY_DOC_INDEX, Some(&mut ref_name), None, std::ptr::null_mut(), None)
                    .ok();
                (container, ref_name.to_string())
            };

            let Some(container) = container else {
                continue;
            };
            let container_guid = Self::library_guid(&container).map_err(ConvertError::Native)?;
            if container_guid == *own_guid {
                continue;
            }

            let mut container_name = BSTR::default();
            // SAFETY: out pointers are valid for the call.
            unsafe {
                container
                    .GetDocumentation(
                        LIBRARY_DOC_INDEX,
                        Some(&mut container_name),
                        None,
                        std::ptr::null_mut(),
                        None,
                    )
                    .ok();
            }

            let reference = ExternalReference {
                library: container_name.to_string(),
                guid: Some(uuid_from_guid(&container_guid)),
            };
            sink.on_event(
                EventKind::InvalidReference,
                HResult::CANT_LOAD_LIBRARY.0,
                &format!(
                    "type '{}' references '{}' from library '{}'",
                    type_name, ref_name, reference.library
                ),
            );
            if sink.resolve_external(&reference).is_none() {
                return Err(ConvertError::TypeLoad(format!(
                    "external reference to library '{}' was not resolved",
                    reference.library
                )));
            }
        }

        Ok(())
    }
}

impl ModuleConverter<ComTypeLib> for TypeInfoConverter {
    fn convert(
        &self,
        lib: &ComTypeLib,
        output_name: &str,
        sink: &mut dyn ConversionSink,
    ) -> Result<Module, ConvertError> {
        let metadata = inspect::inspect(lib, None).map_err(ConvertError::Native)?;
        let own_guid = guid_from_uuid(&metadata.attributes.guid);

        // SAFETY: GetTypeInfoCount has no failure mode.
        let count = unsafe { lib.raw().GetTypeInfoCount() };
        let mut types = Vec::with_capacity(count as usize);

        for index in 0..count {
            let doc = lib
                .documentation(index as i32)
                .map_err(ConvertError::Native)?;
            // SAFETY: index is below GetTypeInfoCount.
            let kind = unsafe { lib.raw().GetTypeInfoType(index) }
                .map_err(|err| ConvertError::TypeLoad(format!("type '{}': {}", doc.name, err.message())))?;
            // SAFETY: index is below GetTypeInfoCount.
            let info = unsafe { lib.raw().GetTypeInfo(index) }
                .map_err(NativeError::from)
                .map_err(ConvertError::Native)?;

            Self::check_external_refs(&own_guid, &info, &doc.name, sink)?;

            sink.on_event(
                EventKind::TypeConverted,
                0,
                &format!("converted type '{}'", doc.name),
            );
            types.push(json!({
                "name": doc.name,
                "kind": type_kind_name(kind.0),
            }));
        }

        let manifest = json!({
            "module": output_name,
            "library": {
                "name": metadata.name,
                "guid": metadata.attributes.guid,
                "version": metadata.attributes.version,
                "lcid": metadata.attributes.lcid,
                "syskind": metadata.attributes.syskind,
            },
            "types": types,
        });

        let rendered = serde_json::to_vec_pretty(&manifest)
            .map_err(|err| ConvertError::TypeLoad(err.to_string()))?;
        fs::create_dir_all(&self.out_dir)?;
        let path = self.out_dir.join(format!("{output_name}.json"));
        fs::write(&path, rendered)?;

        Ok(Module {
            name: output_name.to_string(),
            path,
        })
    }
}
