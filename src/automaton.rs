//! Automaton vocabulary: states, stack symbols, packet labels and step records
//!
//! The session automaton has four control states and a stack whose alphabet
//! is a single session token sitting on top of a permanent base marker.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Control state of the session automaton
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum AutomatonState {
    /// q0: waiting for the opening SYN
    #[default]
    Listen,
    /// q1: session open, token on the stack
    Active,
    /// q2: session torn down cleanly
    Closed,
    /// Absorbing rejection state
    Trap,
}

impl AutomatonState {
    /// Short state code (`q0`, `q1`, `q2`, `qtrap`)
    pub fn code(self) -> &'static str {
        match self {
            AutomatonState::Listen => "q0",
            AutomatonState::Active => "q1",
            AutomatonState::Closed => "q2",
            AutomatonState::Trap => "qtrap",
        }
    }

    /// Long display name used in tables and reports
    pub fn display_name(self) -> &'static str {
        match self {
            AutomatonState::Listen => "q0 (Listen)",
            AutomatonState::Active => "q1 (Active Session)",
            AutomatonState::Closed => "q2 (Closed)",
            AutomatonState::Trap => "TRAP (REJECTED)",
        }
    }

    /// Numeric index (0-3) used by the JSON event stream
    pub fn index(self) -> u8 {
        match self {
            AutomatonState::Listen => 0,
            AutomatonState::Active => 1,
            AutomatonState::Closed => 2,
            AutomatonState::Trap => 3,
        }
    }

    pub fn is_trap(self) -> bool {
        self == AutomatonState::Trap
    }
}

impl fmt::Display for AutomatonState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

/// Symbol stored on the session stack
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StackSymbol {
    /// Bottom-of-stack sentinel (`Z0`), never removed
    Base,
    /// Marks an open session (`S`)
    SessionToken,
}

impl StackSymbol {
    pub fn as_str(self) -> &'static str {
        match self {
            StackSymbol::Base => "Z0",
            StackSymbol::SessionToken => "S",
        }
    }
}

impl fmt::Display for StackSymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// LIFO session memory: a permanent base marker plus at most one token
///
/// The only way to change the stack is [`push_session`](Self::push_session)
/// and [`pop_session`](Self::pop_session), so the base marker is always at
/// the bottom and the token count never exceeds one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionStack {
    symbols: Vec<StackSymbol>,
}

impl SessionStack {
    /// Create a stack holding only the base marker
    pub fn new() -> Self {
        Self {
            symbols: vec![StackSymbol::Base],
        }
    }

    /// Push the session token; returns false (and leaves the stack unchanged)
    /// when a token is already present
    pub fn push_session(&mut self) -> bool {
        if self.has_session() {
            return false;
        }
        self.symbols.push(StackSymbol::SessionToken);
        true
    }

    /// Pop the session token if it is on top; the base marker is never popped
    pub fn pop_session(&mut self) -> Option<StackSymbol> {
        match self.top() {
            StackSymbol::SessionToken => self.symbols.pop(),
            StackSymbol::Base => None,
        }
    }

    /// Symbol currently on top of the stack
    pub fn top(&self) -> StackSymbol {
        self.symbols
            .last()
            .copied()
            .unwrap_or(StackSymbol::Base)
    }

    pub fn has_session(&self) -> bool {
        self.top() == StackSymbol::SessionToken
    }

    pub fn depth(&self) -> usize {
        self.symbols.len()
    }

    /// Iterate symbols from bottom to top
    pub fn iter(&self) -> impl Iterator<Item = &StackSymbol> {
        self.symbols.iter()
    }
}

impl Default for SessionStack {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for SessionStack {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let rendered: Vec<&str> = self.symbols.iter().map(|s| s.as_str()).collect();
        write!(f, "[ {} ]", rendered.join(", "))
    }
}

/// Label of a payload packet
///
/// Only built by [`PacketLabel::parse`], so it never reads `SYN` or `FIN`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Payload(String);

impl Payload {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Payload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Packet semantics relevant to the automaton
///
/// Anything that is not exactly `SYN` or `FIN` is payload and is handled
/// uniformly; the original label is kept for reporting.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PacketLabel {
    Syn,
    Fin,
    Data(Payload),
}

impl PacketLabel {
    /// Classify a raw label. Never fails.
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "SYN" => PacketLabel::Syn,
            "FIN" => PacketLabel::Fin,
            other => PacketLabel::Data(Payload(other.to_string())),
        }
    }

    /// Parse a comma separated list such as `SYN,ACK,FIN`
    ///
    /// Empty segments are skipped, so `""` yields an empty sequence.
    pub fn parse_list(list: &str) -> Vec<Self> {
        list.split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(Self::parse)
            .collect()
    }

    pub fn as_str(&self) -> &str {
        match self {
            PacketLabel::Syn => "SYN",
            PacketLabel::Fin => "FIN",
            PacketLabel::Data(payload) => payload.as_str(),
        }
    }

    pub fn is_syn(&self) -> bool {
        matches!(self, PacketLabel::Syn)
    }

    pub fn is_fin(&self) -> bool {
        matches!(self, PacketLabel::Fin)
    }
}

impl From<&str> for PacketLabel {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for PacketLabel {
    fn from(raw: String) -> Self {
        Self::parse(&raw)
    }
}

impl fmt::Display for PacketLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for PacketLabel {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for PacketLabel {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        Ok(Self::parse(&raw))
    }
}

/// Stack mutation performed by a single step
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StackAction {
    None,
    Push,
    Pop,
}

impl StackAction {
    pub fn as_str(self) -> &'static str {
        match self {
            StackAction::None => "NONE",
            StackAction::Push => "PUSH",
            StackAction::Pop => "POP",
        }
    }
}

impl fmt::Display for StackAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Immutable result of processing one packet
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepRecord {
    /// 1-based position in the trace (0 when produced outside a runner)
    pub index: usize,
    /// Packet that drove the step
    pub packet: PacketLabel,
    /// State before the step
    pub from: AutomatonState,
    /// State after the step
    pub to: AutomatonState,
    /// Stack mutation performed
    pub stack_action: StackAction,
    /// Symbol on top of the stack after the step
    pub stack_top: StackSymbol,
    /// Short human-readable outcome ("Handshake Valid", "HIJACK ATTEMPT", ...)
    pub description: String,
    /// Which rule fired and why
    pub analysis: String,
    /// True when the step is a protocol violation
    pub is_attack: bool,
}
