// build.rs

use clap::{Arg, ArgAction, Command};
use clap_mangen::Man;
use std::env;
use std::fs;
use std::path::PathBuf;

/// Flag argument with a short and long form
fn flag(id: &'static str, short: char, long: &'static str, help: &'static str) -> Arg {
    Arg::new(id)
        .short(short)
        .long(long)
        .action(ArgAction::SetTrue)
        .help(help)
}

fn build_cli() -> Command {
    Command::new("pacpartial")
        .version(env!("CARGO_PKG_VERSION"))
        .author("pacpartial Contributors")
        .about("Intelligently upgrade or install specific packages on a partially-updated system")
        .arg(
            Arg::new("packages")
                .value_name("PACKAGE")
                .num_args(0..)
                .help("Packages to install or upgrade"),
        )
        .arg(flag("all", 'A', "all", "Update all packages (honours -k)"))
        .arg(flag("verbose", 'v', "verbose", "Output in more detail"))
        .arg(flag(
            "checkupdates",
            'c',
            "checkupdates",
            "Use checkupdates' default temporary database (implies -n)",
        ))
        .arg(flag("dry_run", 'n', "dry-run", "Simulate; don't install anything"))
        .arg(
            Arg::new("keep")
                .short('k')
                .long("keep")
                .value_name("PACKAGE")
                .action(ArgAction::Append)
                .help("Keep this package from being updated or installed (can be specified multiple times)"),
        )
        .arg(
            Arg::new("asdeps")
                .short('D')
                .long("asdeps")
                .value_name("PACKAGE")
                .num_args(1..)
                .help("Install all succeeding packages as dependencies"),
        )
        .arg(
            Arg::new("config")
                .long("config")
                .value_name("PATH")
                .default_value("/etc/pacman.d/partial.toml")
                .help("Settings file"),
        )
        .arg(
            Arg::new("completions")
                .long("completions")
                .value_name("SHELL")
                .value_parser(["bash", "elvish", "fish", "powershell", "zsh"])
                .help("Print a shell completion script and exit"),
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

    let man = Man::new(build_cli());
    let mut buffer = Vec::new();

    if let Err(e) = man.render(&mut buffer) {
        println!("cargo:warning=Failed to render man page: {}", e);
        return;
    }

    let man_path = man_dir.join("pacpartial.1");
    if let Err(e) = fs::write(&man_path, buffer) {
        println!("cargo:warning=Failed to write man page: {}", e);
    }
}
