// build.rs

use clap::{Arg, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Common arguments: the mutually exclusive library identifiers
fn source_args(cmd: Command) -> Command {
    cmd.arg(Arg::new("paths").value_name("PATH").num_args(0..).help("Type library paths; wildcards are expanded"))
        .arg(
            Arg::new("literal_path")
                .long("literal-path")
                .value_name("PATH")
                .help("Paths taken verbatim, without wildcard expansion"),
        )
        .arg(Arg::new("guid").long("guid").help("GUID of a registered type library"))
        .arg(
            Arg::new("version")
                .long("version")
                .help("Version (major.minor) of the registered type library"),
        )
        .arg(
            Arg::new("lcid")
                .long("lcid")
                .help("Locale identifier of the registered type library"),
        )
}

fn scope_arg() -> Arg {
    Arg::new("scope")
        .long("scope")
        .value_parser(["CurrentUser", "AllUsers"])
        .help("Registration scope (default: CurrentUser)")
}

fn build_cli() -> Command {
    Command::new("tlbtool")
        .version(env!("CARGO_PKG_VERSION"))
        .author("tlbtool Contributors")
        .about("Inspect, convert, register and unregister COM type libraries")
        .subcommand_required(true)
        .subcommand(source_args(
            Command::new("get")
                .about("Show the attributes and documentation of type libraries")
                .arg(
                    Arg::new("json")
                        .long("json")
                        .action(clap::ArgAction::SetTrue)
                        .help("Emit JSON instead of text"),
                ),
        ))
        .subcommand(source_args(
            Command::new("import").about("Load type libraries and report the acquired handles"),
        ))
        .subcommand(source_args(
            Command::new("convert")
                .about("Convert type libraries into importable interop modules")
                .arg(
                    Arg::new("name")
                        .short('n')
                        .long("name")
                        .required(true)
                        .help("Name of the module to produce"),
                )
                .arg(
                    Arg::new("out_dir")
                        .long("out-dir")
                        .value_name("DIR")
                        .default_value(".")
                        .help("Directory to write the module into"),
                ),
        ))
        .subcommand(
            Command::new("register")
                .about("Register type libraries for the current user or the whole machine")
                .arg(Arg::new("paths").value_name("PATH").num_args(0..).help("Type library paths; wildcards are expanded"))
                .arg(
                    Arg::new("literal_path")
                        .long("literal-path")
                        .value_name("PATH")
                        .help("Paths taken verbatim, without wildcard expansion"),
                )
                .arg(scope_arg())
                .arg(
                    Arg::new("help_directory")
                        .long("help-directory")
                        .value_name("DIR")
                        .help("Directory holding the library's help files"),
                ),
        )
        .subcommand(
            Command::new("unregister")
                .about("Remove a type library registration")
                .arg(Arg::new("guid").long("guid").required(true).help("GUID of the registered type library"))
                .arg(
                    Arg::new("version")
                        .long("version")
                        .required(true)
                        .help("Version (major.minor) of the registered type library"),
                )
                .arg(
                    Arg::new("lcid")
                        .long("lcid")
                        .required(true)
                        .help("Locale identifier of the registered type library"),
                )
                .arg(
                    Arg::new("syskind")
                        .long("syskind")
                        .required(true)
                        .help("System kind the library was registered for"),
                )
                .arg(scope_arg()),
        )
        .subcommand(
            Command::new("completions")
                .about("Generate shell completion scripts")
                .arg(
                    Arg::new("shell")
                        .required(true)
                        .value_parser(["bash", "zsh", "fish", "powershell"])
                        .help("Shell type"),
                ),
        )
}

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    // Create man directory - use CARGO_MANIFEST_DIR which is always set by cargo
    let manifest_dir = match env::var("CARGO_MANIFEST_DIR") {
        Ok(dir) => PathBuf::from(dir),
        Err(e) => {
            println!("cargo:warning=CARGO_MANIFEST_DIR not set: {}", e);
            return;
        }
    };
    let man_dir = manifest_dir.join("man");

    if let Err(e) = fs::create_dir_all(&man_dir) {
        println!("cargo:warning=Failed to create man directory: {}", e);
        return;
    }

    // Generate main man page
    let cmd = build_cli();
    let man = Man::new(cmd);
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("tlbtool.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
        return;
    }

    println!("cargo:warning=Man page generated at {}", man_path.display());
}
