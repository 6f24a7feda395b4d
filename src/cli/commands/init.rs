//! `tsa init` command - Initialize a new workspace

use console::style;
use miette::{IntoDiagnostic, Result};
use std::path::PathBuf;

use crate::core::{Workspace, WorkspaceError};

#[derive(clap::Args, Debug)]
pub struct InitArgs {
    /// Directory to initialize (default: current directory)
    #[arg(default_value = ".")]
    pub path: PathBuf,

    /// Rewrite the config even if .tsa/ already exists (projects are kept)
    #[arg(long)]
    pub force: bool,
}

pub fn run(args: InitArgs) -> Result<()> {
    let path = if args.path.as_os_str() == "." {
        std::env::current_dir().into_diagnostic()?
    } else {
        args.path.clone()
    };

    match Workspace::init(&path, args.force) {
        Ok(workspace) => {
            println!(
                "{} Initialized tsa workspace at {}",
                style("✓").green(),
                style(workspace.root().display()).cyan()
            );
            println!();
            println!("Next steps:");
            println!(
                "  {} Create an inspection project",
                style("tsa project new --name <NAME>").yellow()
            );
            println!(
                "  {} Add a structural section",
                style("tsa section add <PROJECT>").yellow()
            );
            println!(
                "  {} Try the scoring rules on one span",
                style("tsa score --crack 0.4").yellow()
            );
            Ok(())
        }
        Err(WorkspaceError::AlreadyExists(path)) => {
            println!(
                "{} tsa workspace already exists at {}",
                style("!").yellow(),
                style(path.display()).cyan()
            );
            println!();
            println!("Use {} to reinitialize", style("tsa init --force").yellow());
            Ok(())
        }
        Err(e) => Err(miette::miette!("{}", e)),
    }
}
