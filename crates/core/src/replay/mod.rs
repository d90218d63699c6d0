//! Trace replay.
//!
//! This module turns a parsed trace into observable side effects. It provides:
//! 1. **Step Engine:** Cursor, grouped stepping, and restart-on-completion.
//! 2. **Observers:** The [`StepObserver`] trait the caller implements to render records.
//! 3. **Injections:** The ordered list of manual RAM writes and its file format.
//! 4. **Statistics:** Per-kind counters of applied records.

/// The step engine state machine and observer trait.
pub mod engine;

/// Injection records and the injection list.
pub mod injection;

/// Replay counters.
pub mod stats;

pub use engine::{EngineState, NullObserver, StepEngine, StepObserver};
pub use injection::{Injection, InjectionList};
pub use stats::ReplayStats;
