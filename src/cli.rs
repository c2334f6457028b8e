//! CLI argument parsing for synguard

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Output format for step traces
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable table (default)
    Text,
    /// Newline-delimited JSON events for machine consumption
    Json,
    /// CSV format for spreadsheet analysis
    Csv,
}

#[derive(Parser, Debug)]
#[command(name = "synguard")]
#[command(version)]
#[command(
    about = "Validate TCP-style session lifecycles with a pushdown automaton",
    long_about = None
)]
pub struct Cli {
    /// Run a single catalogue scenario, by 1-based index or name
    #[arg(short = 's', long = "scenario", value_name = "NAME|INDEX")]
    pub scenario: Option<String>,

    /// Run an ad-hoc packet sequence (e.g., -p SYN,ACK,HTTP_GET,FIN)
    #[arg(
        short = 'p',
        long = "packets",
        value_name = "LIST",
        conflicts_with = "scenario"
    )]
    pub packets: Option<String>,

    /// Name reported for an ad-hoc packet sequence
    #[arg(long = "name", value_name = "NAME", default_value = "custom", requires = "packets")]
    pub name: String,

    /// Load the scenario catalogue from a TOML file instead of the built-ins
    #[arg(long = "scenarios-file", value_name = "PATH")]
    pub scenarios_file: Option<PathBuf>,

    /// List catalogue scenarios and exit
    #[arg(short = 'l', long = "list")]
    pub list: bool,

    /// Output format
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,

    /// Omit rule explanations from text and CSV output
    #[arg(long = "no-analysis")]
    pub no_analysis: bool,

    /// Exit with status 2 when any scenario is rejected
    #[arg(long = "strict")]
    pub strict: bool,

    /// Enable debug tracing on stderr
    #[arg(long = "debug")]
    pub debug: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["synguard"]);
        assert!(cli.scenario.is_none());
        assert!(cli.packets.is_none());
        assert_eq!(cli.name, "custom");
        assert_eq!(cli.format, OutputFormat::Text);
        assert!(!cli.list);
        assert!(!cli.strict);
        assert!(!cli.no_analysis);
        assert!(!cli.debug);
    }

    #[test]
    fn test_cli_scenario_selector() {
        let cli = Cli::parse_from(["synguard", "-s", "3"]);
        assert_eq!(cli.scenario.as_deref(), Some("3"));
    }

    #[test]
    fn test_cli_packets_with_name() {
        let cli = Cli::parse_from(["synguard", "-p", "SYN,FIN", "--name", "probe"]);
        assert_eq!(cli.packets.as_deref(), Some("SYN,FIN"));
        assert_eq!(cli.name, "probe");
    }

    #[test]
    fn test_cli_scenario_conflicts_with_packets() {
        let result = Cli::try_parse_from(["synguard", "-s", "1", "-p", "SYN"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_name_requires_packets() {
        let result = Cli::try_parse_from(["synguard", "--name", "probe"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_format_json() {
        let cli = Cli::parse_from(["synguard", "--format", "json"]);
        assert_eq!(cli.format, OutputFormat::Json);
    }

    #[test]
    fn test_cli_format_csv() {
        let cli = Cli::parse_from(["synguard", "--format", "csv"]);
        assert_eq!(cli.format, OutputFormat::Csv);
    }

    #[test]
    fn test_cli_invalid_format() {
        let result = Cli::try_parse_from(["synguard", "--format", "html"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_cli_scenarios_file() {
        let cli = Cli::parse_from(["synguard", "--scenarios-file", "scenarios.toml", "--list"]);
        assert_eq!(cli.scenarios_file, Some(PathBuf::from("scenarios.toml")));
        assert!(cli.list);
    }

    #[test]
    fn test_cli_strict_and_debug_flags() {
        let cli = Cli::parse_from(["synguard", "--strict", "--debug", "--no-analysis"]);
        assert!(cli.strict);
        assert!(cli.debug);
        assert!(cli.no_analysis);
    }
}
