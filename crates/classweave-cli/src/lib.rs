//! CLI logic for the Classweave class diagram editor.
//!
//! This module contains the core CLI logic: it loads the configuration and
//! an optional initial diagram, then runs either a command script or the
//! interactive editor.

pub mod command;
pub mod error_adapter;
pub mod session;

mod args;
mod config;
mod error;

pub use args::Args;
pub use error::CliError;
pub use session::{Flow, Session};

use std::{fs, io, path::Path};

use log::info;

use classweave::ClassweaveError;

/// Run the Classweave CLI application
///
/// # Arguments
///
/// * `args` - Command-line arguments
///
/// # Errors
///
/// Returns `CliError` for:
/// - Configuration loading errors
/// - Diagram loading or saving errors
/// - Script reading errors
/// - The first failing line of a script
pub fn run(args: &Args) -> Result<(), CliError> {
    let app_config = config::load_config(args.config.as_ref())?;

    let mut session = Session::new(app_config);
    if args.no_banner {
        session.set_banner(false);
    }

    if let Some(path) = &args.load {
        info!(path = path.as_str(); "Loading initial diagram");
        session.load(Path::new(path))?;
    }

    let stdout = io::stdout();
    let mut out = stdout.lock();

    match &args.script {
        Some(script) => {
            info!(script = script.as_str(); "Running command script");
            let source = fs::read_to_string(script).map_err(ClassweaveError::from)?;
            session.run_script(&source, &mut out)
        }
        None => session.run_interactive(io::stdin().lock(), &mut out, &mut io::stderr()),
    }
}
