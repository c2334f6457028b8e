//! Scenario catalogue
//!
//! A scenario is a named packet sequence. The built-in catalogue holds the
//! classic lifecycle and attack patterns; a TOML file can replace it.
//!
//! # Example scenarios.toml
//!
//! ```toml
//! [[scenario]]
//! name = "Web Browsing"
//! packets = ["SYN", "ACK", "HTTP_GET", "FIN"]
//!
//! [[scenario]]
//! name = "Nmap FIN Scan"
//! packets = ["FIN"]
//! ```

use crate::automaton::PacketLabel;
use crate::runner::{self, SessionTrace};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashSet;
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Errors raised while building or querying a catalogue
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ScenarioError {
    #[error("Unknown scenario: {0}")]
    UnknownScenario(String),

    #[error("Scenario index {index} out of range (1..={len})")]
    IndexOutOfRange { index: usize, len: usize },

    #[error("Scenario catalogue is empty")]
    EmptyCatalogue,

    #[error("Duplicate scenario name: {0}")]
    DuplicateName(String),

    #[error("Scenario #{0} has an empty name")]
    EmptyName(usize),

    #[error("Scenario name '{0}' is numeric and would be read as an index")]
    NumericName(String),
}

/// Named, ordered packet sequence
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Scenario {
    pub name: String,
    #[serde(default)]
    pub packets: Vec<PacketLabel>,
}

impl Scenario {
    pub fn new(name: impl Into<String>, packets: Vec<PacketLabel>) -> Self {
        Self {
            name: name.into(),
            packets,
        }
    }

    /// Build a scenario from raw labels
    pub fn from_labels(name: impl Into<String>, labels: &[&str]) -> Self {
        Self::new(name, labels.iter().map(|l| PacketLabel::parse(l)).collect())
    }

    /// Run this scenario through the automaton
    pub fn run(&self) -> SessionTrace {
        runner::run(&self.name, &self.packets)
    }

    /// Packets joined with commas, for listings
    pub fn packet_summary(&self) -> String {
        self.packets
            .iter()
            .map(PacketLabel::as_str)
            .collect::<Vec<_>>()
            .join(",")
    }
}

/// Ordered collection of scenarios with unique names
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ScenarioCatalogue {
    #[serde(default, rename = "scenario")]
    scenarios: Vec<Scenario>,
}

impl ScenarioCatalogue {
    /// Build a catalogue, rejecting empty or duplicate names
    pub fn new(scenarios: Vec<Scenario>) -> Result<Self, ScenarioError> {
        let catalogue = Self { scenarios };
        catalogue.validate()?;
        Ok(catalogue)
    }

    /// The six canonical lifecycle and attack patterns
    pub fn builtin() -> Self {
        Self {
            scenarios: vec![
                Scenario::from_labels(
                    "Standard Web Browsing (Valid)",
                    &["SYN", "ACK", "HTTP_GET", "JPG_DATA", "FIN"],
                ),
                Scenario::from_labels(
                    "SSH Secure Session (Valid)",
                    &["SYN", "ACK", "SSH_KEY", "ENCRYPTED_CMD", "FIN"],
                ),
                Scenario::from_labels("Nmap FIN Scan (Invalid Start)", &["FIN"]),
                Scenario::from_labels(
                    "Session Hijack (Data after FIN)",
                    &["SYN", "ACK", "SSH_KEY", "FIN", "ROOT_CMD"],
                ),
                Scenario::from_labels("Spoofed Start (No Handshake)", &["ACK", "HTTP_GET"]),
                Scenario::from_labels(
                    "Zombie Data Attack",
                    &["SYN", "ACK", "FIN", "MALICIOUS_DATA"],
                ),
            ],
        }
    }

    /// Load a catalogue from a TOML file
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Invalid scenario file {}", path.display()))
    }

    /// Load a catalogue from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let catalogue: Self = toml::from_str(content).context("Failed to parse TOML")?;
        catalogue.validate()?;
        tracing::debug!(scenarios = catalogue.len(), "loaded scenario catalogue");
        Ok(catalogue)
    }

    fn validate(&self) -> Result<(), ScenarioError> {
        if self.scenarios.is_empty() {
            return Err(ScenarioError::EmptyCatalogue);
        }

        let mut seen = HashSet::new();
        for (i, scenario) in self.scenarios.iter().enumerate() {
            let name = scenario.name.trim();
            if name.is_empty() {
                return Err(ScenarioError::EmptyName(i + 1));
            }
            if name.parse::<usize>().is_ok() {
                return Err(ScenarioError::NumericName(scenario.name.clone()));
            }
            if !seen.insert(name.to_lowercase()) {
                return Err(ScenarioError::DuplicateName(scenario.name.clone()));
            }
        }
        Ok(())
    }

    /// Look a scenario up by 1-based index or case-insensitive name
    pub fn select(&self, selector: &str) -> Result<&Scenario, ScenarioError> {
        let selector = selector.trim();

        if let Ok(index) = selector.parse::<usize>() {
            return index
                .checked_sub(1)
                .and_then(|i| self.scenarios.get(i))
                .ok_or(ScenarioError::IndexOutOfRange {
                    index,
                    len: self.scenarios.len(),
                });
        }

        self.scenarios
            .iter()
            .find(|s| s.name.trim().eq_ignore_ascii_case(selector))
            .ok_or_else(|| ScenarioError::UnknownScenario(selector.to_string()))
    }

    pub fn scenarios(&self) -> &[Scenario] {
        &self.scenarios
    }

    pub fn len(&self) -> usize {
        self.scenarios.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenarios.is_empty()
    }

    /// Run every scenario in order
    pub fn run_all(&self) -> Vec<SessionTrace> {
        self.scenarios.iter().map(Scenario::run).collect()
    }
}

impl Default for ScenarioCatalogue {
    fn default() -> Self {
        Self::builtin()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::automaton::AutomatonState;
    use crate::verdict::SessionVerdict;

    #[test]
    fn test_builtin_catalogue_verdicts() {
        let verdicts: Vec<SessionVerdict> = ScenarioCatalogue::builtin()
            .run_all()
            .iter()
            .map(SessionTrace::verdict)
            .collect();

        assert_eq!(
            verdicts,
            vec![
                SessionVerdict::Validated,
                SessionVerdict::Validated,
                SessionVerdict::Rejected,
                SessionVerdict::Rejected,
                SessionVerdict::Rejected,
                SessionVerdict::Rejected,
            ]
        );
    }

    #[test]
    fn test_builtin_catalogue_is_valid() {
        let builtin = ScenarioCatalogue::builtin();
        assert!(builtin.validate().is_ok());
        assert_eq!(builtin.len(), 6);
    }

    #[test]
    fn test_select_by_index() {
        let catalogue = ScenarioCatalogue::builtin();
        let scenario = catalogue.select("3").unwrap();
        assert_eq!(scenario.name, "Nmap FIN Scan (Invalid Start)");
    }

    #[test]
    fn test_select_by_name_ignores_case() {
        let catalogue = ScenarioCatalogue::builtin();
        let scenario = catalogue.select("zombie data attack").unwrap();
        assert_eq!(scenario.packets.len(), 4);
    }

    #[test]
    fn test_select_out_of_range() {
        let catalogue = ScenarioCatalogue::builtin();
        assert_eq!(
            catalogue.select("0"),
            Err(ScenarioError::IndexOutOfRange { index: 0, len: 6 })
        );
        assert_eq!(
            catalogue.select("7"),
            Err(ScenarioError::IndexOutOfRange { index: 7, len: 6 })
        );
    }

    #[test]
    fn test_select_unknown_name() {
        let err = ScenarioCatalogue::builtin().select("ftp").unwrap_err();
        assert_eq!(err, ScenarioError::UnknownScenario("ftp".to_string()));
        assert_eq!(err.to_string(), "Unknown scenario: ftp");
    }

    #[test]
    fn test_parse_toml_catalogue() {
        let toml = r#"
            [[scenario]]
            name = "Web"
            packets = ["SYN", "ACK", "HTTP_GET", "FIN"]

            [[scenario]]
            name = "Empty"
        "#;

        let catalogue = ScenarioCatalogue::from_toml_str(toml).unwrap();
        assert_eq!(catalogue.len(), 2);

        let web = catalogue.select("web").unwrap();
        assert!(web.packets[0].is_syn());
        assert_eq!(web.run().final_state, AutomatonState::Closed);

        let empty = catalogue.select("2").unwrap();
        assert!(empty.packets.is_empty());
        assert_eq!(empty.run().final_state, AutomatonState::Listen);
    }

    #[test]
    fn test_toml_without_scenarios_is_rejected() {
        let err = ScenarioCatalogue::from_toml_str("").unwrap_err();
        assert_eq!(
            err.downcast_ref::<ScenarioError>(),
            Some(&ScenarioError::EmptyCatalogue)
        );
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let result = ScenarioCatalogue::new(vec![
            Scenario::from_labels("web", &["SYN"]),
            Scenario::from_labels("WEB", &["FIN"]),
        ]);
        assert_eq!(result, Err(ScenarioError::DuplicateName("WEB".to_string())));
    }

    #[test]
    fn test_blank_name_is_rejected() {
        let result = ScenarioCatalogue::new(vec![Scenario::from_labels("  ", &["SYN"])]);
        assert_eq!(result, Err(ScenarioError::EmptyName(1)));
    }

    #[test]
    fn test_numeric_name_is_rejected() {
        let result = ScenarioCatalogue::new(vec![
            Scenario::from_labels("web", &["SYN"]),
            Scenario::from_labels(" 443 ", &["SYN", "FIN"]),
        ]);
        assert_eq!(
            result,
            Err(ScenarioError::NumericName(" 443 ".to_string()))
        );
    }

    #[test]
    fn test_names_with_digits_stay_selectable() {
        let catalogue = ScenarioCatalogue::new(vec![
            Scenario::from_labels("web", &["SYN"]),
            Scenario::from_labels("port 443", &["SYN", "FIN"]),
        ])
        .unwrap();
        assert_eq!(catalogue.select("PORT 443").unwrap().packets.len(), 2);
        assert_eq!(catalogue.select("2").unwrap().name, "port 443");
    }

    #[test]
    fn test_malformed_toml() {
        assert!(ScenarioCatalogue::from_toml_str("[[scenario]\nname=").is_err());
    }

    #[test]
    fn test_packet_summary() {
        let scenario = Scenario::from_labels("web", &["SYN", "ACK", "FIN"]);
        assert_eq!(scenario.packet_summary(), "SYN,ACK,FIN");
    }
}
