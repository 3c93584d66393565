// src/cli.rs
//! CLI definitions for tlbtool
//!
//! This module contains all command-line interface definitions using clap.
//! The actual command implementations are in the `commands` module. The
//! argument groups below enforce that exactly one identifier shape is used
//! per invocation; the engine only ever sees the resulting tagged source.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use clap_complete::Shell;
use uuid::Uuid;

use tlbtool::{LibraryVersion, SysKind};

#[derive(Parser)]
#[command(name = "tlbtool")]
#[command(author = "tlbtool Contributors")]
#[command(version)]
#[command(about = "Inspect, convert, register and unregister COM type libraries", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// The mutually exclusive ways of naming the libraries to operate on
#[derive(Args)]
pub struct SourceArgs {
    /// Type library paths; wildcards are expanded
    #[arg(value_name = "PATH")]
    pub paths: Vec<String>,

    /// Paths taken verbatim, without wildcard expansion
    #[arg(long, value_name = "PATH", conflicts_with = "paths")]
    pub literal_path: Vec<String>,

    /// GUID of a registered type library
    #[arg(
        long,
        requires = "version",
        requires = "lcid",
        conflicts_with_all = ["paths", "literal_path"]
    )]
    pub guid: Option<Uuid>,

    /// Version (major.minor) of the registered type library
    #[arg(long, requires = "guid")]
    pub version: Option<LibraryVersion>,

    /// Locale identifier of the registered type library
    #[arg(long, requires = "guid")]
    pub lcid: Option<u32>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Show the attributes and documentation of type libraries
    Get {
        #[command(flatten)]
        source: SourceArgs,

        /// Emit JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Load type libraries and report the acquired handles
    Import {
        #[command(flatten)]
        source: SourceArgs,
    },

    /// Convert type libraries into importable interop modules
    Convert {
        #[command(flatten)]
        source: SourceArgs,

        /// Name of the module to produce
        #[arg(short, long)]
        name: String,

        /// Directory to write the module into
        #[arg(long, value_name = "DIR", default_value = ".")]
        out_dir: PathBuf,
    },

    /// Register type libraries for the current user or the whole machine
    Register {
        /// Type library paths; wildcards are expanded
        #[arg(value_name = "PATH")]
        paths: Vec<String>,

        /// Paths taken verbatim, without wildcard expansion
        #[arg(long, value_name = "PATH", conflicts_with = "paths")]
        literal_path: Vec<String>,

        /// Registration scope (default: CurrentUser)
        #[arg(long, value_parser = ["CurrentUser", "AllUsers"], ignore_case = true)]
        scope: Option<String>,

        /// Directory holding the library's help files
        #[arg(long, value_name = "DIR")]
        help_directory: Option<PathBuf>,
    },

    /// Remove a type library registration
    Unregister {
        /// GUID of the registered type library
        #[arg(long)]
        guid: Uuid,

        /// Version (major.minor) of the registered type library
        #[arg(long)]
        version: LibraryVersion,

        /// Locale identifier of the registered type library
        #[arg(long)]
        lcid: u32,

        /// System kind the library was registered for
        #[arg(long)]
        syskind: SysKind,

        /// Registration scope (default: CurrentUser)
        #[arg(long, value_parser = ["CurrentUser", "AllUsers"], ignore_case = true)]
        scope: Option<String>,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell type
        shell: Shell,
    },
}
