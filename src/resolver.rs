// src/resolver.rs
//! Path argument resolution
//!
//! Turns wildcard-capable and literal path arguments into concrete load
//! targets. Every input that resolves to nothing, or that addresses a
//! provider other than the plain file system, surfaces as a classified
//! error in input order; nothing is silently dropped.

use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::debug;

use crate::error::{Error, HResult, Subject};

/// Provider tag for paths backed by the local file system
pub const FILE_SYSTEM_PROVIDER: &str = "FileSystem";

/// Outcome of expanding one path argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolved {
    /// Which provider the argument addressed
    pub provider: String,
    /// Concrete matches; empty is a valid outcome for a wildcard
    pub paths: Vec<PathBuf>,
}

impl Resolved {
    pub fn file_system(paths: Vec<PathBuf>) -> Self {
        Self {
            provider: FILE_SYSTEM_PROVIDER.to_string(),
            paths,
        }
    }
}

/// Failure to resolve a path argument at all
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveError {
    /// The item does not exist
    #[error("no such item: '{0}'")]
    NotFound(String),
    /// The wildcard pattern is malformed
    #[error("invalid pattern '{pattern}': {message}")]
    Pattern { pattern: String, message: String },
}

/// Resolves path arguments into concrete paths
pub trait PathResolver {
    /// Expand a possibly-wildcarded pattern
    ///
    /// A wildcard matching nothing yields an empty path list, not an error;
    /// a non-wildcard argument that does not exist is an error.
    fn resolve(&self, pattern: &str) -> Result<Resolved, ResolveError>;

    /// Take a path verbatim, without wildcard expansion
    fn resolve_literal(&self, path: &str) -> Result<PathBuf, ResolveError>;
}

/// Path resolution against the local file system
///
/// Arguments of the form `Name::rest` address the provider `Name`; anything
/// else is a file system path, expanded with [`glob`] when it carries
/// wildcard characters.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsResolver;

fn provider_of(pattern: &str) -> Option<&str> {
    let (provider, _rest) = pattern.split_once("::")?;
    // A lone drive letter is a path, not a provider tag.
    if provider.is_empty() || provider.contains(['/', '\\']) {
        return None;
    }
    Some(provider)
}

fn has_wildcards(pattern: &str) -> bool {
    pattern.contains(['*', '?', '['])
}

impl PathResolver for FsResolver {
    fn resolve(&self, pattern: &str) -> Result<Resolved, ResolveError> {
        if let Some(provider) = provider_of(pattern) {
            return Ok(Resolved {
                provider: provider.to_string(),
                paths: Vec::new(),
            });
        }

        if has_wildcards(pattern) {
            let matches = glob::glob(pattern).map_err(|err| ResolveError::Pattern {
                pattern: pattern.to_string(),
                message: err.msg.to_string(),
            })?;
            let paths: Vec<PathBuf> = matches.filter_map(|entry| entry.ok()).collect();
            debug!("pattern '{}' matched {} path(s)", pattern, paths.len());
            Ok(Resolved::file_system(paths))
        } else {
            let path = Path::new(pattern);
            if path.exists() {
                Ok(Resolved::file_system(vec![path.to_path_buf()]))
            } else {
                Err(ResolveError::NotFound(pattern.to_string()))
            }
        }
    }

    fn resolve_literal(&self, path: &str) -> Result<PathBuf, ResolveError> {
        let candidate = Path::new(path);
        if candidate.exists() {
            Ok(candidate.to_path_buf())
        } else {
            Err(ResolveError::NotFound(path.to_string()))
        }
    }
}

/// Expand a batch of wildcard-capable inputs into load targets
///
/// One entry per concrete match, one classified error per failed input,
/// in input order.
pub fn resolve_patterns<R: PathResolver>(
    resolver: &R,
    patterns: &[String],
) -> Vec<Result<PathBuf, Error>> {
    let mut targets = Vec::new();
    for pattern in patterns {
        match resolver.resolve(pattern) {
            Ok(resolved) if resolved.provider != FILE_SYSTEM_PROVIDER => {
                targets.push(Err(Error::NotImplemented {
                    subject: Subject::Provider(resolved.provider),
                }));
            }
            Ok(resolved) if resolved.paths.is_empty() => {
                targets.push(Err(Error::ResourceUnavailable {
                    subject: Subject::Path(pattern.clone()),
                    code: Some(HResult::FILE_NOT_FOUND),
                }));
            }
            Ok(resolved) => targets.extend(resolved.paths.into_iter().map(Ok)),
            Err(_err) => {
                targets.push(Err(Error::ResourceUnavailable {
                    subject: Subject::Path(pattern.clone()),
                    code: None,
                }));
            }
        }
    }
    targets
}

/// Take a batch of literal paths as load targets, no expansion
pub fn resolve_literals<R: PathResolver>(
    resolver: &R,
    paths: &[String],
) -> Vec<Result<PathBuf, Error>> {
    paths
        .iter()
        .map(|path| {
            resolver.resolve_literal(path).map_err(|_err| {
                Error::ResourceUnavailable {
                    subject: Subject::Path(path.clone()),
                    code: None,
                }
            })
        })
        .collect()
}
