//! Scenario runner: drives the engine over a packet sequence
//!
//! The runner starts every scenario in `Listen` with only the base marker on
//! the stack, feeds packets in order and stops right after the first step
//! that lands in `Trap`. The trapping step is part of the trace; the packets
//! after it are never looked at.

use crate::automaton::{AutomatonState, PacketLabel, SessionStack, StepRecord};
use crate::engine;
use crate::verdict::SessionVerdict;

/// Ordered, append-only result of one scenario run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTrace {
    /// Scenario name
    pub scenario: String,
    /// One record per processed packet, in input order
    pub steps: Vec<StepRecord>,
    /// State after the last processed packet
    pub final_state: AutomatonState,
    /// Stack after the last processed packet
    pub final_stack: SessionStack,
    /// Number of packets supplied, processed or not
    pub input_len: usize,
}

impl SessionTrace {
    pub fn verdict(&self) -> SessionVerdict {
        SessionVerdict::from_state(self.final_state)
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// Packets left unprocessed because the run trapped early
    pub fn skipped(&self) -> usize {
        self.input_len.saturating_sub(self.steps.len())
    }

    /// First step flagged as an attack, if any
    pub fn first_attack(&self) -> Option<&StepRecord> {
        self.steps.iter().find(|s| s.is_attack)
    }
}

/// Lazy step-by-step view of a run
///
/// Yields the same records [`run`] collects. Fused: once a step reaches
/// `Trap`, every later call returns `None`.
#[derive(Debug)]
pub struct Steps<'a> {
    packets: std::slice::Iter<'a, PacketLabel>,
    state: AutomatonState,
    stack: SessionStack,
    index: usize,
}

impl<'a> Steps<'a> {
    pub fn new(packets: &'a [PacketLabel]) -> Self {
        Self {
            packets: packets.iter(),
            state: AutomatonState::Listen,
            stack: SessionStack::new(),
            index: 0,
        }
    }

    /// Current automaton state
    pub fn state(&self) -> AutomatonState {
        self.state
    }

    /// Current stack contents
    pub fn stack(&self) -> &SessionStack {
        &self.stack
    }
}

impl Iterator for Steps<'_> {
    type Item = StepRecord;

    fn next(&mut self) -> Option<StepRecord> {
        if self.state.is_trap() {
            return None;
        }
        let packet = self.packets.next()?;

        let transition = engine::step(self.state, &self.stack, packet);
        self.index += 1;
        self.state = transition.state;
        self.stack = transition.stack;

        let mut record = transition.record;
        record.index = self.index;

        tracing::debug!(
            step = record.index,
            packet = %record.packet,
            from = record.from.code(),
            to = record.to.code(),
            action = record.stack_action.as_str(),
            "pda step"
        );
        if record.is_attack {
            tracing::warn!(
                step = record.index,
                packet = %record.packet,
                "{}",
                record.description
            );
        }

        Some(record)
    }
}

impl std::iter::FusedIterator for Steps<'_> {}

/// Stream the step records of a packet sequence
pub fn steps(packets: &[PacketLabel]) -> Steps<'_> {
    Steps::new(packets)
}

/// Run a scenario to completion and collect its trace
///
/// # Example
/// ```
/// use synguard::automaton::{AutomatonState, PacketLabel};
/// use synguard::runner::run;
///
/// let packets = PacketLabel::parse_list("SYN,ACK,HTTP_GET,FIN");
/// let trace = run("web", &packets);
/// assert_eq!(trace.final_state, AutomatonState::Closed);
/// assert!(trace.steps.iter().all(|s| !s.is_attack));
/// ```
pub fn run(name: &str, packets: &[PacketLabel]) -> SessionTrace {
    let _span = tracing::debug_span!("scenario", name).entered();

    let mut steps = Steps::new(packets);
    let records: Vec<StepRecord> = steps.by_ref().collect();

    let trace = SessionTrace {
        scenario: name.to_string(),
        steps: records,
        final_state: steps.state(),
        final_stack: steps.stack().clone(),
        input_len: packets.len(),
    };

    tracing::debug!(
        steps = trace.len(),
        skipped = trace.skipped(),
        verdict = %trace.verdict(),
        "scenario finished"
    );

    trace
}
