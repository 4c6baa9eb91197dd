//! CLI argument definitions for logrecycler.
//!
//! Uses `clap` v4 derive macros to parse command-line arguments.

use std::path::PathBuf;

use clap::Parser;

/// Turn plain log lines into JSON records and metrics.
///
/// Reads lines from stdin, writes one JSON object per line to stdout,
/// and counts each line in the configured Prometheus/StatsD sinks.
///
/// Example: `my-app 2>&1 | logrecycler --config logrecycler.yaml`
#[derive(Parser, Debug)]
#[command(name = "logrecycler")]
#[command(version, about, long_about = None)]
pub struct RecyclerCli {
    /// Path to logrecycler.yaml configuration file.
    #[arg(short, long, default_value = "logrecycler.yaml")]
    pub config: PathBuf,

    /// Diagnostic log level (trace, debug, info, warn, error).
    ///
    /// `RUST_LOG` takes precedence when set.
    #[arg(long, default_value = "info")]
    pub log_level: String,

    /// Diagnostic log format (json, pretty). Diagnostics go to stderr.
    #[arg(long, default_value = "json")]
    pub log_format: String,

    /// Validate configuration file and exit without reading stdin.
    #[arg(long)]
    pub validate: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        RecyclerCli::command().debug_assert();
    }

    #[test]
    fn defaults() {
        let cli = RecyclerCli::parse_from(["logrecycler"]);
        assert_eq!(cli.config, PathBuf::from("logrecycler.yaml"));
        assert_eq!(cli.log_level, "info");
        assert_eq!(cli.log_format, "json");
        assert!(!cli.validate);
    }

    #[test]
    fn explicit_arguments() {
        let cli = RecyclerCli::parse_from([
            "logrecycler",
            "-c",
            "/etc/logrecycler.yaml",
            "--log-level",
            "debug",
            "--log-format",
            "pretty",
            "--validate",
        ]);
        assert_eq!(cli.config, PathBuf::from("/etc/logrecycler.yaml"));
        assert_eq!(cli.log_level, "debug");
        assert_eq!(cli.log_format, "pretty");
        assert!(cli.validate);
    }
}
