// src/engine.rs
//! Composition of resolver, loader, inspector, conversion driver and
//! registration controller
//!
//! Batch inputs are processed strictly in input order, one item at a time.
//! A failing item is reported as a classified outcome and never aborts its
//! siblings. Handles loaded here are scoped to the item that needed them
//! and release when the item completes; a borrowed handle stays with its
//! owner.

use std::path::{Path, PathBuf};

use tracing::debug;

use crate::convert::{ConversionSink, Module, ModuleConverter};
use crate::error::{Error, Subject};
use crate::identifier::{LibraryIdentity, LibraryKey, LibrarySource, RegistrationScope};
use crate::inspect::{self, LibraryMetadata};
use crate::platform::TypeLibApi;
use crate::registrar;
use crate::resolver::{resolve_literals, resolve_patterns, PathResolver};

/// Per-item outcome of a batch operation, reported in input order
pub type Outcome<T> = std::result::Result<T, Error>;

/// A handle imported for the caller, with its backing file when known
#[derive(Debug)]
pub struct Imported<L> {
    pub lib: L,
    pub source_file: Option<PathBuf>,
}

/// The resolution and lifecycle engine behind every command
pub struct Engine<A, R> {
    api: A,
    resolver: R,
}

impl<A: TypeLibApi, R: PathResolver> Engine<A, R> {
    pub fn new(api: A, resolver: R) -> Self {
        Self { api, resolver }
    }

    pub fn api(&self) -> &A {
        &self.api
    }

    /// Inspect every library the source names
    pub fn metadata(&self, source: &LibrarySource<'_, A::Lib>) -> Vec<Outcome<LibraryMetadata>> {
        match source {
            LibrarySource::Paths(patterns) => self.each_target(
                resolve_patterns(&self.resolver, patterns),
                |path| self.metadata_at(path),
            ),
            LibrarySource::LiteralPaths(paths) => self.each_target(
                resolve_literals(&self.resolver, paths),
                |path| self.metadata_at(path),
            ),
            LibrarySource::Registered(key) => vec![self.metadata_registered(key)],
            LibrarySource::Handle(lib) => {
                vec![inspect::inspect(*lib, None)
                    .map_err(|err| err.invalid_result(Subject::Handle))]
            }
        }
    }

    /// Load every library the source names, handing ownership to the caller
    pub fn import(&self, source: &LibrarySource<'_, A::Lib>) -> Vec<Outcome<Imported<A::Lib>>> {
        match source {
            LibrarySource::Paths(patterns) => self.each_target(
                resolve_patterns(&self.resolver, patterns),
                |path| self.import_at(path),
            ),
            LibrarySource::LiteralPaths(paths) => self.each_target(
                resolve_literals(&self.resolver, paths),
                |path| self.import_at(path),
            ),
            LibrarySource::Registered(key) => {
                let outcome = self
                    .api
                    .load_registered(key)
                    .map(|lib| Imported {
                        lib,
                        source_file: None,
                    })
                    .map_err(|err| err.invalid_result(Subject::Key(key.clone())));
                vec![outcome]
            }
            LibrarySource::Handle(_) => vec![Err(Error::NotImplemented {
                subject: Subject::Shape(source.shape()),
            })],
        }
    }

    /// Convert every library the source names into a module
    pub fn convert<C: ModuleConverter<A::Lib>>(
        &self,
        source: &LibrarySource<'_, A::Lib>,
        converter: &C,
        output_name: &str,
        sink: &mut dyn ConversionSink,
    ) -> Vec<Outcome<Module>> {
        match source {
            LibrarySource::Paths(patterns) => {
                let targets = resolve_patterns(&self.resolver, patterns);
                targets
                    .into_iter()
                    .map(|target| {
                        target.and_then(|path| {
                            self.convert_at(&path, converter, output_name, sink)
                        })
                    })
                    .collect()
            }
            LibrarySource::LiteralPaths(paths) => {
                let targets = resolve_literals(&self.resolver, paths);
                targets
                    .into_iter()
                    .map(|target| {
                        target.and_then(|path| {
                            self.convert_at(&path, converter, output_name, sink)
                        })
                    })
                    .collect()
            }
            LibrarySource::Registered(key) => {
                let subject = Subject::Key(key.clone());
                let outcome = self
                    .api
                    .load_registered(key)
                    .map_err(|err| err.invalid_result(subject.clone()))
                    .and_then(|lib| {
                        converter
                            .convert(&lib, output_name, sink)
                            .map_err(|err| err.classify(subject))
                    });
                vec![outcome]
            }
            LibrarySource::Handle(lib) => {
                vec![converter
                    .convert(*lib, output_name, sink)
                    .map_err(|err| err.classify(Subject::Handle))]
            }
        }
    }

    /// Register every library the source names for `scope`
    pub fn register(
        &self,
        source: &LibrarySource<'_, A::Lib>,
        scope: RegistrationScope,
        help_dir: Option<&Path>,
    ) -> Vec<Outcome<()>> {
        match source {
            LibrarySource::Paths(patterns) => self.each_target(
                resolve_patterns(&self.resolver, patterns),
                |path| registrar::register(&self.api, path, scope, help_dir),
            ),
            LibrarySource::LiteralPaths(paths) => self.each_target(
                resolve_literals(&self.resolver, paths),
                |path| registrar::register(&self.api, path, scope, help_dir),
            ),
            LibrarySource::Registered(_) | LibrarySource::Handle(_) => {
                vec![Err(Error::NotImplemented {
                    subject: Subject::Shape(source.shape()),
                })]
            }
        }
    }

    /// Remove the registration identified by `identity` from `scope`
    pub fn unregister(
        &self,
        identity: &LibraryIdentity,
        scope: RegistrationScope,
    ) -> Outcome<()> {
        registrar::unregister(&self.api, identity, scope)
    }

    fn each_target<T>(
        &self,
        targets: Vec<Outcome<PathBuf>>,
        per_path: impl Fn(&Path) -> Outcome<T>,
    ) -> Vec<Outcome<T>> {
        targets
            .into_iter()
            .map(|target| target.and_then(|path| per_path(&path)))
            .collect()
    }

    fn metadata_at(&self, path: &Path) -> Outcome<LibraryMetadata> {
        let subject = Subject::path(path);
        debug!("inspecting '{}'", path.display());
        let lib = self
            .api
            .load_path(path)
            .map_err(|err| err.invalid_result(subject.clone()))?;
        inspect::inspect(&lib, Some(path)).map_err(|err| err.invalid_result(subject))
    }

    fn metadata_registered(&self, key: &LibraryKey) -> Outcome<LibraryMetadata> {
        let subject = Subject::Key(key.clone());
        let path = self
            .api
            .registered_path(key)
            .map_err(|err| err.invalid_result(subject.clone()))?;
        let lib = self
            .api
            .load_path(&path)
            .map_err(|err| err.invalid_result(subject.clone()))?;
        inspect::inspect(&lib, Some(&path)).map_err(|err| err.invalid_result(subject))
    }

    fn import_at(&self, path: &Path) -> Outcome<Imported<A::Lib>> {
        let subject = Subject::path(path);
        debug!("importing '{}'", path.display());
        self.api
            .load_path(path)
            .map(|lib| Imported {
                lib,
                source_file: Some(path.to_path_buf()),
            })
            .map_err(|err| err.invalid_result(subject))
    }

    fn convert_at<C: ModuleConverter<A::Lib>>(
        &self,
        path: &Path,
        converter: &C,
        output_name: &str,
        sink: &mut dyn ConversionSink,
    ) -> Outcome<Module> {
        let subject = Subject::path(path);
        debug!("converting '{}' to module '{}'", path.display(), output_name);
        let lib = self
            .api
            .load_path(path)
            .map_err(|err| err.invalid_result(subject.clone()))?;
        converter
            .convert(&lib, output_name, sink)
            .map_err(|err| err.classify(subject))
    }
}
