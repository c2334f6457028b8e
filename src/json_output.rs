//! Newline-delimited JSON event stream
//!
//! One JSON object per line, for consumption by an external front end:
//!
//! ```text
//! {"type":"init","packet":"","state":0,"stackTop":"Z0","desc":"Loaded: Web","analysis":"Ready to analyze.","isAttack":false}
//! {"type":"packet_start","packet":"SYN","state":0,"stackTop":"Z0",...}
//! {"type":"step","packet":"SYN","state":1,"stackTop":"S","desc":"Handshake Valid",...}
//! ...
//! {"type":"done","packet":"","state":2,"stackTop":"","desc":"Simulation Complete",...}
//! ```
//!
//! Events are derived from an already-computed [`SessionTrace`]; no pacing is
//! applied here.

use crate::automaton::{AutomatonState, StackSymbol, StepRecord};
use crate::runner::SessionTrace;
use serde::{Deserialize, Serialize};
use std::io::{self, Write};

/// Kind of event in the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// Scenario loaded
    Init,
    /// Packet about to be processed (pre-step state)
    PacketStart,
    /// Packet processed (post-step state)
    Step,
    /// End of scenario
    Done,
}

/// A single line of the event stream
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct JsonEvent {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub packet: String,
    /// State index 0-3 (q0, q1, q2, trap)
    pub state: u8,
    pub stack_top: String,
    pub desc: String,
    pub analysis: String,
    pub is_attack: bool,
}

impl JsonEvent {
    fn init(scenario: &str) -> Self {
        Self {
            kind: EventKind::Init,
            packet: String::new(),
            state: AutomatonState::Listen.index(),
            stack_top: StackSymbol::Base.as_str().to_string(),
            desc: format!("Loaded: {}", scenario),
            analysis: "Ready to analyze.".to_string(),
            is_attack: false,
        }
    }

    /// Arrival of a packet, reported against the state it arrives in
    fn packet_start(step: &StepRecord, stack_top: StackSymbol) -> Self {
        Self {
            kind: EventKind::PacketStart,
            packet: step.packet.to_string(),
            state: step.from.index(),
            stack_top: stack_top.as_str().to_string(),
            desc: format!("Processing {}...", step.packet),
            analysis: format!("Packet arriving at state q{}", step.from.index()),
            is_attack: false,
        }
    }

    fn step(step: &StepRecord) -> Self {
        Self {
            kind: EventKind::Step,
            packet: step.packet.to_string(),
            state: step.to.index(),
            stack_top: step.stack_top.as_str().to_string(),
            desc: step.description.clone(),
            analysis: step.analysis.clone(),
            is_attack: step.is_attack,
        }
    }

    fn done(final_state: AutomatonState) -> Self {
        Self {
            kind: EventKind::Done,
            packet: String::new(),
            state: final_state.index(),
            stack_top: String::new(),
            desc: "Simulation Complete".to_string(),
            analysis: "End of stream.".to_string(),
            is_attack: false,
        }
    }
}

/// Expand a trace into its ordered event list
pub fn trace_events(trace: &SessionTrace) -> Vec<JsonEvent> {
    let mut events = Vec::with_capacity(trace.len() * 2 + 2);
    events.push(JsonEvent::init(&trace.scenario));

    let mut stack_top = StackSymbol::Base;
    for step in &trace.steps {
        events.push(JsonEvent::packet_start(step, stack_top));
        events.push(JsonEvent::step(step));
        stack_top = step.stack_top;
    }

    events.push(JsonEvent::done(trace.final_state));
    events
}

/// Write a trace as newline-delimited JSON
pub fn write_trace<W: Write>(writer: &mut W, trace: &SessionTrace) -> io::Result<()> {
    for event in trace_events(trace) {
        serde_json::to_writer(&mut *writer, &event)?;
        writer.write_all(b"\n")?;
    }
    writer.flush()
}
