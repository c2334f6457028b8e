//! Transition function of the session pushdown automaton
//!
//! `step` is pure: it takes the current control state, the current stack and
//! one packet, and returns the next state, the next stack and the record of
//! what happened. Every (state, packet, stack-top) combination has a rule, so
//! the function is total.

use crate::automaton::{AutomatonState, PacketLabel, SessionStack, StackAction, StepRecord};

/// Outcome of a single transition
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Transition {
    pub state: AutomatonState,
    pub stack: SessionStack,
    pub record: StepRecord,
}

/// Apply one packet to the automaton
///
/// Rules, first match wins:
///
/// | state  | packet | top   | next   | stack | attack |
/// |--------|--------|-------|--------|-------|--------|
/// | Listen | SYN    | any   | Active | push  | no     |
/// | Listen | other  | any   | Trap   |       | yes    |
/// | Active | FIN    | S     | Closed | pop   | no     |
/// | Active | FIN    | Z0    | Trap   |       | yes    |
/// | Active | other  | S     | Active |       | no     |
/// | Active | other  | Z0    | Trap   |       | yes    |
/// | Closed | any    | any   | Trap   |       | yes    |
/// | Trap   | any    | any   | Trap   |       | yes    |
///
/// The returned record has `index == 0`; runners number the records they
/// collect.
///
/// # Example
/// ```
/// use synguard::automaton::{AutomatonState, PacketLabel, SessionStack, StackAction};
/// use synguard::engine::step;
///
/// let t = step(AutomatonState::Listen, &SessionStack::new(), &PacketLabel::Syn);
/// assert_eq!(t.state, AutomatonState::Active);
/// assert_eq!(t.record.stack_action, StackAction::Push);
/// assert!(t.stack.has_session());
/// ```
pub fn step(state: AutomatonState, stack: &SessionStack, packet: &PacketLabel) -> Transition {
    let mut next_stack = stack.clone();

    let (next_state, action, description, analysis) = match state {
        AutomatonState::Listen => {
            if packet.is_syn() {
                let action = if next_stack.push_session() {
                    StackAction::Push
                } else {
                    StackAction::None
                };
                (
                    AutomatonState::Active,
                    action,
                    "Handshake Valid",
                    "Input: SYN. Rule: Transition q0->q1. Action: PUSH Session Token.".to_string(),
                )
            } else {
                (
                    AutomatonState::Trap,
                    StackAction::None,
                    "VIOLATION: No Handshake",
                    format!(
                        "Input: {}. Error: Protocol demands SYN first. Rejected.",
                        packet
                    ),
                )
            }
        }
        AutomatonState::Active => match (packet.is_fin(), stack.has_session()) {
            (true, true) => {
                next_stack.pop_session();
                (
                    AutomatonState::Closed,
                    StackAction::Pop,
                    "Session Closed",
                    "Input: FIN. Stack Check: OK. Action: POP Token, Move to q2.".to_string(),
                )
            }
            (true, false) => (
                AutomatonState::Trap,
                StackAction::None,
                "HIJACK ATTEMPT",
                "CRITICAL: FIN in q1, but Stack holds no Session Token. Teardown rejected."
                    .to_string(),
            ),
            (false, true) => (
                AutomatonState::Active,
                StackAction::None,
                "Traffic Authorized",
                format!(
                    "Input: {}. Stack Check: OK (Token Present). Tunnel Active.",
                    packet
                ),
            ),
            (false, false) => (
                AutomatonState::Trap,
                StackAction::None,
                "HIJACK ATTEMPT",
                "CRITICAL: State is q1, but Stack is EMPTY. Session ID missing.".to_string(),
            ),
        },
        AutomatonState::Closed => (
            AutomatonState::Trap,
            StackAction::None,
            "INTRUSION DETECTED",
            format!(
                "State: q2 (Closed). Event: '{}'. Result: No transition allows Data here. Default -> TRAP.",
                packet
            ),
        ),
        AutomatonState::Trap => (
            AutomatonState::Trap,
            StackAction::None,
            "Blocked",
            "System in TRAP state. Traffic dropped.".to_string(),
        ),
    };

    let record = StepRecord {
        index: 0,
        packet: packet.clone(),
        from: state,
        to: next_state,
        stack_action: action,
        stack_top: next_stack.top(),
        description: description.to_string(),
        analysis,
        is_attack: next_state.is_trap(),
    };

    Transition {
        state: next_state,
        stack: next_stack,
        record,
    }
}
