//! Fixed-width text report for a step trace

use crate::automaton::{AutomatonState, SessionStack};
use crate::runner::SessionTrace;

const RULE_WIDE: &str = "===========================================================";
const RULE_THIN: &str = "-----------------------------------------------------------";

/// Text report formatter
///
/// Layout options are carried by value; nothing here is global.
#[derive(Debug, Clone, Copy)]
pub struct TextReport {
    /// Print the rule explanation under each row
    pub show_analysis: bool,
}

impl Default for TextReport {
    fn default() -> Self {
        Self {
            show_analysis: true,
        }
    }
}

impl TextReport {
    pub fn new(show_analysis: bool) -> Self {
        Self { show_analysis }
    }

    /// Render one trace as a table with a verdict banner
    pub fn render(&self, trace: &SessionTrace) -> String {
        let mut out = String::new();

        out.push_str(&format!("{}\n", RULE_WIDE));
        out.push_str(&format!(" SCENARIO: {}\n", trace.scenario));
        out.push_str(&format!("{}\n", RULE_WIDE));
        out.push_str(&format!("START STATE: {}\n", AutomatonState::Listen));
        out.push_str(&format!("INIT STACK:  {}\n", SessionStack::new()));
        out.push_str(&format!("{}\n", RULE_THIN));
        out.push_str(&format!(
            "{:<4} {:<15} | {:<6} | {:<25} | NEW STATE\n",
            "#", "INPUT", "STACK", "ACTION / LOGIC"
        ));
        out.push_str(&format!("{}\n", RULE_THIN));

        for step in &trace.steps {
            let marker = if step.is_attack { " !!" } else { "" };
            out.push_str(&format!(
                "{:<4} {:<15} | {:<6} | {:<25} | {}{}\n",
                step.index,
                step.packet.as_str(),
                step.stack_action.as_str(),
                step.description,
                step.to,
                marker
            ));
            if self.show_analysis {
                out.push_str(&format!("     └─ {}\n", step.analysis));
            }
        }

        let skipped = trace.skipped();
        if skipped > 0 {
            out.push_str(&format!(
                "     ({} packet(s) not processed after trap)\n",
                skipped
            ));
        }

        out.push_str(&format!("{}\n", RULE_THIN));
        out.push_str(&format!("FINAL STACK: {}\n", trace.final_stack));
        out.push_str(trace.verdict().banner());
        out.push('\n');
        out
    }

    /// Render several traces followed by a one-line-per-scenario summary
    pub fn render_all(&self, traces: &[SessionTrace]) -> String {
        let mut out = String::new();
        for trace in traces {
            out.push_str(&self.render(trace));
            out.push('\n');
        }

        if traces.len() > 1 {
            out.push_str("=== Summary ===\n");
            for trace in traces {
                out.push_str(&format!(
                    "  {:<40} {:>3} step(s)  {}\n",
                    trace.scenario,
                    trace.len(),
                    trace.verdict()
                ));
            }
        }
        out
    }
}
