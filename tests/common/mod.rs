// tests/common/mod.rs

//! Shared fakes and fixtures for integration tests.
//!
//! `FakeApi` stands in for the platform loader/catalog/registrar and counts
//! loads, attribute acquisitions/releases and handle drops so lifecycle
//! properties can be asserted. `FakeResolver` maps path arguments to
//! preconfigured outcomes.

#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use tlbtool::platform::{Documentation, NativeError, TypeLib, TypeLibApi, LIBRARY_DOC_INDEX};
use tlbtool::resolver::{PathResolver, Resolved, ResolveError};
use tlbtool::{
    ConversionSink, ConvertError, Engine, EventKind, ExternalReference, HResult, LibFlags,
    LibraryAttributes, LibraryIdentity, LibraryKey, LibraryVersion, Module, ModuleConverter,
    RegistrationScope, SysKind,
};
use uuid::Uuid;

/// Counters shared between a `FakeApi` and the libraries it hands out
#[derive(Debug, Default)]
pub struct Counters {
    pub loads: Cell<usize>,
    pub acquired: Cell<usize>,
    pub released: Cell<usize>,
    pub dropped_libs: Cell<usize>,
}

/// Attribute block with the given identity and Win32 syskind
pub fn win32_attrs(guid: Uuid, major: u16, minor: u16, lcid: u32) -> LibraryAttributes {
    LibraryAttributes {
        guid,
        lcid,
        syskind: SysKind::Win32,
        version: LibraryVersion::new(major, minor),
        flags: LibFlags::empty(),
    }
}

/// Blueprint for one fake library
#[derive(Debug, Clone)]
pub struct LibSpec {
    pub attrs: LibraryAttributes,
    pub doc: Documentation,
    pub fail_doc: bool,
}

impl LibSpec {
    pub fn new(name: &str, attrs: LibraryAttributes) -> Self {
        Self {
            attrs,
            doc: Documentation {
                name: name.to_string(),
                doc_string: Some(format!("{name} documentation")),
                help_context: 0,
                help_file: None,
            },
            fail_doc: false,
        }
    }

    /// Make the documentation call fail after attributes were acquired
    pub fn with_failing_doc(mut self) -> Self {
        self.fail_doc = true;
        self
    }
}

#[derive(Debug)]
pub struct FakeLib {
    pub spec: LibSpec,
    pub counters: Rc<Counters>,
}

impl FakeLib {
    pub fn new(spec: LibSpec, counters: Rc<Counters>) -> Self {
        Self { spec, counters }
    }
}

impl TypeLib for FakeLib {
    fn acquire_attributes(&self) -> Result<LibraryAttributes, NativeError> {
        self.counters.acquired.set(self.counters.acquired.get() + 1);
        Ok(self.spec.attrs)
    }

    fn release_attributes(&self) {
        self.counters.released.set(self.counters.released.get() + 1);
    }

    fn documentation(&self, index: i32) -> Result<Documentation, NativeError> {
        if self.spec.fail_doc {
            return Err(NativeError::new(HResult::FAIL, "documentation unavailable"));
        }
        if index == LIBRARY_DOC_INDEX {
            Ok(self.spec.doc.clone())
        } else {
            Err(NativeError::new(HResult::FAIL, format!("no member {index}")))
        }
    }
}

impl Drop for FakeLib {
    fn drop(&mut self) {
        self.counters.dropped_libs.set(self.counters.dropped_libs.get() + 1);
    }
}

/// In-memory platform: libraries by path, a registry catalog and a
/// registration table
#[derive(Default)]
pub struct FakeApi {
    pub counters: Rc<Counters>,
    pub libraries: RefCell<HashMap<PathBuf, LibSpec>>,
    pub catalog: RefCell<HashMap<LibraryKey, PathBuf>>,
    pub registered:
        RefCell<HashMap<(LibraryIdentity, RegistrationScope), (PathBuf, Option<PathBuf>)>>,
}

impl FakeApi {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_library(&self, path: &str, spec: LibSpec) {
        self.libraries.borrow_mut().insert(PathBuf::from(path), spec);
    }

    pub fn add_catalog_entry(&self, key: LibraryKey, path: &str) {
        self.catalog.borrow_mut().insert(key, PathBuf::from(path));
    }

    pub fn is_registered(&self, identity: &LibraryIdentity, scope: RegistrationScope) -> bool {
        self.registered
            .borrow()
            .contains_key(&(identity.clone(), scope))
    }

    pub fn registration_count(&self) -> usize {
        self.registered.borrow().len()
    }

    pub fn help_dir_of(
        &self,
        identity: &LibraryIdentity,
        scope: RegistrationScope,
    ) -> Option<PathBuf> {
        self.registered
            .borrow()
            .get(&(identity.clone(), scope))
            .and_then(|(_, help)| help.clone())
    }
}

impl TypeLibApi for FakeApi {
    type Lib = FakeLib;

    fn load_path(&self, path: &Path) -> Result<FakeLib, NativeError> {
        self.counters.loads.set(self.counters.loads.get() + 1);
        match self.libraries.borrow().get(path) {
            Some(spec) => Ok(FakeLib::new(spec.clone(), Rc::clone(&self.counters))),
            None => Err(NativeError::new(
                HResult::CANT_LOAD_LIBRARY,
                format!("cannot load '{}'", path.display()),
            )),
        }
    }

    fn load_registered(&self, key: &LibraryKey) -> Result<FakeLib, NativeError> {
        let path = self.registered_path(key)?;
        self.load_path(&path)
    }

    fn registered_path(&self, key: &LibraryKey) -> Result<PathBuf, NativeError> {
        self.catalog.borrow().get(key).cloned().ok_or_else(|| {
            NativeError::new(
                HResult::LIB_NOT_REGISTERED,
                format!("{key} is not registered"),
            )
        })
    }

    fn register(
        &self,
        lib: &FakeLib,
        path: &Path,
        scope: RegistrationScope,
        help_dir: Option<&Path>,
    ) -> Result<(), NativeError> {
        let identity = lib.spec.attrs.identity();
        self.registered.borrow_mut().insert(
            (identity, scope),
            (path.to_path_buf(), help_dir.map(Path::to_path_buf)),
        );
        Ok(())
    }

    fn unregister(
        &self,
        identity: &LibraryIdentity,
        scope: RegistrationScope,
    ) -> Result<(), NativeError> {
        match self
            .registered
            .borrow_mut()
            .remove(&(identity.clone(), scope))
        {
            Some(_) => Ok(()),
            None => Err(NativeError::new(
                HResult::LIB_NOT_REGISTERED,
                format!("{identity} is not registered"),
            )),
        }
    }
}

/// Path resolution from preconfigured maps
#[derive(Default)]
pub struct FakeResolver {
    pub patterns: HashMap<String, Resolved>,
    pub literals: HashMap<String, PathBuf>,
}

impl FakeResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// A wildcard pattern resolving to the given file system matches
    pub fn wildcard(mut self, pattern: &str, matches: &[&str]) -> Self {
        self.patterns.insert(
            pattern.to_string(),
            Resolved::file_system(matches.iter().map(PathBuf::from).collect()),
        );
        self
    }

    /// A pattern addressing a provider other than the file system
    pub fn provider(mut self, pattern: &str, provider: &str) -> Self {
        self.patterns.insert(
            pattern.to_string(),
            Resolved {
                provider: provider.to_string(),
                paths: Vec::new(),
            },
        );
        self
    }

    /// A literal path that exists
    pub fn literal(mut self, path: &str) -> Self {
        self.literals.insert(path.to_string(), PathBuf::from(path));
        self
    }
}

impl PathResolver for FakeResolver {
    fn resolve(&self, pattern: &str) -> Result<Resolved, ResolveError> {
        self.patterns
            .get(pattern)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(pattern.to_string()))
    }

    fn resolve_literal(&self, path: &str) -> Result<PathBuf, ResolveError> {
        self.literals
            .get(path)
            .cloned()
            .ok_or_else(|| ResolveError::NotFound(path.to_string()))
    }
}

/// Converter that reads attributes through the scoped guard, reports one
/// event per pretend type, and routes a configured external reference
/// through the sink
#[derive(Default)]
pub struct FakeConverter {
    pub type_names: Vec<String>,
    pub external: Option<ExternalReference>,
}

impl FakeConverter {
    pub fn with_types(names: &[&str]) -> Self {
        Self {
            type_names: names.iter().map(|n| n.to_string()).collect(),
            external: None,
        }
    }

    pub fn with_external(mut self, reference: ExternalReference) -> Self {
        self.external = Some(reference);
        self
    }
}

impl ModuleConverter<FakeLib> for FakeConverter {
    fn convert(
        &self,
        lib: &FakeLib,
        output_name: &str,
        sink: &mut dyn ConversionSink,
    ) -> Result<Module, ConvertError> {
        let attrs =
            tlbtool::with_attributes(lib, |attrs| Ok(*attrs)).map_err(ConvertError::Native)?;

        for (index, name) in self.type_names.iter().enumerate() {
            sink.on_event(
                EventKind::TypeConverted,
                index as i32,
                &format!("converted type '{name}' from {}", attrs.guid),
            );
        }

        if let Some(reference) = &self.external {
            sink.on_event(
                EventKind::InvalidReference,
                HResult::CANT_LOAD_LIBRARY.0,
                &format!("external reference to '{}'", reference.library),
            );
            if sink.resolve_external(reference).is_none() {
                return Err(ConvertError::TypeLoad(format!(
                    "external reference to library '{}' was not resolved",
                    reference.library
                )));
            }
        }

        Ok(Module {
            name: output_name.to_string(),
            path: PathBuf::from(format!("{output_name}.json")),
        })
    }
}

/// Sink that records every event and resolution query
#[derive(Default)]
pub struct CollectingSink {
    pub events: Vec<(EventKind, i32, String)>,
    pub queries: Vec<ExternalReference>,
    /// Module to answer external-reference queries with; `None` declines
    pub provide: Option<Module>,
}

impl ConversionSink for CollectingSink {
    fn on_event(&mut self, kind: EventKind, code: i32, message: &str) {
        self.events.push((kind, code, message.to_string()));
    }

    fn resolve_external(&mut self, reference: &ExternalReference) -> Option<Module> {
        self.queries.push(reference.clone());
        self.provide.clone()
    }
}

/// Engine over fakes, with the shared counters kept reachable
pub fn engine_with(
    api: FakeApi,
    resolver: FakeResolver,
) -> (Engine<FakeApi, FakeResolver>, Rc<Counters>) {
    let counters = Rc::clone(&api.counters);
    (Engine::new(api, resolver), counters)
}
