use clap::CommandFactory;
use clap_complete::{generate_to, Shell};
use std::env;
use std::fs;
use std::io::Error;

include!("src/cli.rs");

const BIN_NAME: &str = "pixmeta";

/// Shells worth generating for the target being built, not the build host
fn target_shells() -> Vec<Shell> {
    let mut shells = vec![Shell::PowerShell];
    if env::var_os("CARGO_CFG_UNIX").is_some() {
        shells.extend([Shell::Bash, Shell::Fish, Shell::Zsh, Shell::Elvish]);
    }
    shells
}

fn main() -> Result<(), Error> {
    println!("cargo:rerun-if-changed=src/cli.rs");
    println!("cargo:rerun-if-changed=build.rs");

    let Some(out_dir) = env::var_os("OUT_DIR") else {
        return Ok(());
    };

    let completions = PathBuf::from(out_dir).join("completions");
    fs::create_dir_all(&completions)?;

    let mut cmd = Cli::command();
    for shell in target_shells() {
        generate_to(shell, &mut cmd, BIN_NAME, &completions)?;
    }

    Ok(())
}
