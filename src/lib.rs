//! synguard - TCP-style session lifecycle validation with a pushdown automaton
//!
//! The engine is a pure transition function over (state, stack, packet).
//! The runner feeds packet sequences through it and collects an ordered step
//! trace; output adapters turn traces into text, CSV or a JSON event stream.
//!
//! ```
//! use synguard::scenario::ScenarioCatalogue;
//!
//! let catalogue = ScenarioCatalogue::builtin();
//! let trace = catalogue.select("Session Hijack (Data after FIN)").unwrap().run();
//! assert!(trace.verdict().is_rejected());
//! assert_eq!(trace.first_attack().unwrap().description, "INTRUSION DETECTED");
//! ```

pub mod automaton;
pub mod cli;
pub mod csv_output;
pub mod engine;
pub mod json_output;
pub mod runner;
pub mod scenario;
pub mod text_output;
pub mod verdict;
