//! CSV output format for step traces
//!
//! One row per step record, with the scenario name in the first column so
//! several traces can share a single file.

use crate::automaton::StepRecord;
use crate::runner::SessionTrace;

/// CSV output formatter
#[derive(Debug)]
pub struct CsvOutput {
    rows: Vec<(String, StepRecord)>,
    include_analysis: bool,
}

impl CsvOutput {
    /// Create a new CSV output formatter
    pub fn new(include_analysis: bool) -> Self {
        Self {
            rows: Vec::new(),
            include_analysis,
        }
    }

    /// Add every step of a trace
    pub fn add_trace(&mut self, trace: &SessionTrace) {
        for step in &trace.steps {
            self.rows.push((trace.scenario.clone(), step.clone()));
        }
    }

    /// Generate CSV header row based on enabled flags
    fn header(&self) -> String {
        let mut headers = vec![
            "scenario",
            "step",
            "packet",
            "from",
            "to",
            "stack_action",
            "stack_top",
            "description",
        ];

        if self.include_analysis {
            headers.push("analysis");
        }
        headers.push("is_attack");

        headers.join(",")
    }

    /// Escape CSV field (handle commas, quotes, newlines)
    fn escape_field(field: &str) -> String {
        if field.contains([',', '"', '\n', '\r']) {
            format!("\"{}\"", field.replace('"', "\"\""))
        } else {
            field.to_string()
        }
    }

    fn format_row(&self, scenario: &str, step: &StepRecord) -> String {
        let mut fields = vec![
            Self::escape_field(scenario),
            step.index.to_string(),
            Self::escape_field(step.packet.as_str()),
            step.from.code().to_string(),
            step.to.code().to_string(),
            step.stack_action.to_string(),
            step.stack_top.to_string(),
            Self::escape_field(&step.description),
        ];

        if self.include_analysis {
            fields.push(Self::escape_field(&step.analysis));
        }
        fields.push(step.is_attack.to_string());

        fields.join(",")
    }

    /// Generate CSV output as string
    pub fn to_csv(&self) -> String {
        let mut output = String::new();

        output.push_str(&self.header());
        output.push('\n');

        for (scenario, step) in &self.rows {
            output.push_str(&self.format_row(scenario, step));
            output.push('\n');
        }

        output
    }
}
