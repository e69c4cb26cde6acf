//! Executes enumeration-ask queries against a loaded network.
pub mod distribution;
pub mod engine;
pub mod evidence;
pub mod trace;

pub use distribution::Distribution;
pub use engine::InferenceEngine;
pub use evidence::{Evidence, Pinned};
pub use trace::{NoTrace, TraceSink, TraceStep};
