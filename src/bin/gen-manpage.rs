//! Render the ftflash(1) man page from the command line definition
//!
//! Usage: gen-manpage [output-dir]   (default: ./man)

use clap::CommandFactory;
use std::path::{Path, PathBuf};

#[path = "../cli.rs"]
mod cli;
// Only the help text helpers are used here
#[allow(dead_code)]
#[path = "../programmers.rs"]
mod programmers;

/// Write `<name>.1` into `output_dir` and return its path
fn render(output_dir: &Path) -> std::io::Result<PathBuf> {
    std::fs::create_dir_all(output_dir)?;

    let cmd = cli::Cli::command();
    let path = output_dir.join(format!("{}.1", cmd.get_name()));

    let mut page = Vec::new();
    clap_mangen::Man::new(cmd).render(&mut page)?;
    std::fs::write(&path, page)?;
    Ok(path)
}

fn main() -> std::io::Result<()> {
    let output_dir = std::env::args_os()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("man"));

    let path = render(&output_dir)?;
    println!("{}", path.display());
    Ok(())
}
