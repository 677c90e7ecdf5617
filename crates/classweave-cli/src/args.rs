//! Command-line argument definitions for the Classweave CLI.
//!
//! This module defines the [`Args`] structure parsed from the command line
//! using [`clap`]. Arguments select a command script or the interactive
//! editor, an initial diagram, the configuration file, and logging verbosity.

use clap::Parser;

/// Command-line arguments for the Classweave editor
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Script of editor commands; starts the interactive editor when omitted
    #[arg(help = "Path to a command script")]
    pub script: Option<String>,

    /// Diagram file (JSON) to load before running commands
    #[arg(short, long)]
    pub load: Option<String>,

    /// Path to configuration file (TOML)
    #[arg(short, long)]
    pub config: Option<String>,

    /// Log level (off, error, warn, info, debug, trace)
    #[arg(long, default_value = "warn")]
    pub log_level: String,

    /// Skip the greeting of the interactive editor
    #[arg(long)]
    pub no_banner: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let args = Args::parse_from(["classweave"]);
        assert!(args.script.is_none());
        assert!(args.load.is_none());
        assert_eq!(args.log_level, "warn");
        assert!(!args.no_banner);
    }

    #[test]
    fn test_all_arguments() {
        let args = Args::parse_from([
            "classweave",
            "build.cw",
            "--load",
            "car.json",
            "-c",
            "cfg.toml",
            "--log-level",
            "debug",
            "--no-banner",
        ]);
        assert_eq!(args.script.as_deref(), Some("build.cw"));
        assert_eq!(args.load.as_deref(), Some("car.json"));
        assert_eq!(args.config.as_deref(), Some("cfg.toml"));
        assert_eq!(args.log_level, "debug");
        assert!(args.no_banner);
    }
}
