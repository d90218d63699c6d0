//! Trace replay state machine.
//!
//! The engine owns a loaded [`Trace`] and a cursor into it. It provides:
//! 1. **Loading:** [`StepEngine::load_trace`] always rewinds to position 0.
//! 2. **Running:** [`StepEngine::run_all`] applies every remaining record.
//! 3. **Grouped Stepping:** [`StepEngine::step`] applies one `Exec` plus the non-`Exec`
//!    records that follow it, restarting from 0 once the trace is exhausted.
//! 4. **Resynchronisation:** [`StepEngine::replay_to`] re-applies a prefix of a fresh
//!    trace so a cursor survives re-simulation.
//!
//! The engine never renders anything itself; every applied record is handed to a
//! caller-supplied [`StepObserver`].

use serde::Serialize;
use tracing::debug;

use crate::common::{Nibble, ReplayError};
use crate::replay::stats::ReplayStats;
use crate::trace::{ExecRecord, ExecutionStep, Trace};

/// Receives the side effects of applied trace records, one method per record kind.
pub trait StepObserver {
    /// An instruction executed; front ends log it and highlight its source line.
    fn on_exec(&mut self, record: &ExecRecord);

    /// A RAM cell changed; front ends update the cell and log the write.
    fn on_ram_write(&mut self, addr: Nibble, val: Nibble);

    /// The program halted.
    fn on_done(&mut self);

    /// Stepping wrapped around to the start; clear per-step markers.
    fn on_restart(&mut self) {}

    /// The whole session was reset; clear all displayed state.
    fn on_reset(&mut self) {}
}

impl<T: StepObserver + ?Sized> StepObserver for &mut T {
    fn on_exec(&mut self, record: &ExecRecord) {
        (**self).on_exec(record);
    }

    fn on_ram_write(&mut self, addr: Nibble, val: Nibble) {
        (**self).on_ram_write(addr, val);
    }

    fn on_done(&mut self) {
        (**self).on_done();
    }

    fn on_restart(&mut self) {
        (**self).on_restart();
    }

    fn on_reset(&mut self) {
        (**self).on_reset();
    }
}

/// Observer that discards everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullObserver;

impl StepObserver for NullObserver {
    fn on_exec(&mut self, _record: &ExecRecord) {}
    fn on_ram_write(&mut self, _addr: Nibble, _val: Nibble) {}
    fn on_done(&mut self) {}
}

/// Where the engine is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EngineState {
    /// No trace loaded.
    Idle,
    /// The next record to apply is at this index.
    Positioned(usize),
    /// Every record has been applied.
    Completed,
}

/// Cursor-based replay over one trace.
#[derive(Clone, Debug, Default)]
pub struct StepEngine {
    trace: Option<Trace>,
    position: usize,
    stats: ReplayStats,
}

impl StepEngine {
    /// Creates an idle engine.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the current trace and rewinds to position 0.
    ///
    /// An empty trace is immediately [`EngineState::Completed`].
    pub fn load_trace(&mut self, trace: Trace) -> EngineState {
        debug!(records = trace.len(), "trace loaded into step engine");
        self.trace = Some(trace);
        self.position = 0;
        self.stats = ReplayStats::default();
        self.state()
    }

    /// Drops the trace and returns to [`EngineState::Idle`].
    pub fn unload(&mut self) -> Option<Trace> {
        self.position = 0;
        self.stats = ReplayStats::default();
        self.trace.take()
    }

    /// Current lifecycle state.
    pub fn state(&self) -> EngineState {
        match &self.trace {
            None => EngineState::Idle,
            Some(trace) if self.position >= trace.len() => EngineState::Completed,
            Some(_) => EngineState::Positioned(self.position),
        }
    }

    /// Index of the next record to apply; `0` when idle.
    pub const fn position(&self) -> usize {
        self.position
    }

    /// The loaded trace, if any.
    pub const fn trace(&self) -> Option<&Trace> {
        self.trace.as_ref()
    }

    /// Counters for records applied since the last load.
    pub const fn stats(&self) -> &ReplayStats {
        &self.stats
    }

    /// Applies every remaining record and leaves the engine completed.
    ///
    /// Returns the number of records applied.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NoTrace`] when no trace is loaded.
    pub fn run_all<O: StepObserver>(&mut self, observer: &mut O) -> Result<usize, ReplayError> {
        let len = self.loaded_len()?;
        self.advance_to(len, observer)
    }

    /// Applies one grouped step.
    ///
    /// If the trace is already exhausted the cursor first wraps to 0 and
    /// [`StepObserver::on_restart`] is called. The record at the cursor is applied,
    /// followed by every record up to (not including) the next `Exec`.
    ///
    /// Returns the number of records applied.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NoTrace`] when no trace is loaded.
    pub fn step<O: StepObserver>(&mut self, observer: &mut O) -> Result<usize, ReplayError> {
        let len = self.loaded_len()?;

        if self.position >= len {
            debug!("trace exhausted, restarting from the first record");
            self.position = 0;
            self.stats.restarts += 1;
            observer.on_restart();
        }
        if len == 0 {
            return Ok(0);
        }

        let end = self.group_end(self.position);
        self.advance_to(end, observer)
    }

    /// Applies records from the cursor up to `target`, capped at the trace length.
    ///
    /// Used to restore a saved position on a freshly loaded trace. Never moves the
    /// cursor backwards and never goes past `target`.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NoTrace`] when no trace is loaded.
    pub fn replay_to<O: StepObserver>(
        &mut self,
        target: usize,
        observer: &mut O,
    ) -> Result<usize, ReplayError> {
        let len = self.loaded_len()?;
        self.advance_to(target.min(len), observer)
    }

    /// Program counter an injection made now should be attached to.
    ///
    /// At the very start or end of the trace (or when idle) this is 0. Otherwise it
    /// is the PC of the record under the cursor, or of the nearest `Exec` before it.
    pub fn injection_target_pc(&self) -> u32 {
        let Some(trace) = &self.trace else {
            return 0;
        };
        if self.position == 0 || self.position >= trace.len() {
            return 0;
        }
        trace.pc_at_or_before(self.position).unwrap_or(0)
    }

    fn loaded_len(&self) -> Result<usize, ReplayError> {
        self.trace
            .as_ref()
            .map(Trace::len)
            .ok_or(ReplayError::NoTrace)
    }

    /// Exclusive end of the step group starting at `start`.
    fn group_end(&self, start: usize) -> usize {
        let Some(trace) = &self.trace else {
            return start;
        };
        let steps = trace.steps();
        let mut end = start + 1;
        while end < steps.len() && !steps[end].is_exec() {
            end += 1;
        }
        end.min(steps.len())
    }

    fn advance_to<O: StepObserver>(
        &mut self,
        end: usize,
        observer: &mut O,
    ) -> Result<usize, ReplayError> {
        let trace = self.trace.as_ref().ok_or(ReplayError::NoTrace)?;
        let start = self.position;
        if end <= start {
            return Ok(0);
        }

        for (index, step) in trace.steps()[start..end].iter().enumerate() {
            apply(start + index, step, &mut self.stats, observer);
        }
        self.position = end;
        Ok(end - start)
    }
}

fn apply<O: StepObserver>(
    index: usize,
    step: &ExecutionStep,
    stats: &mut ReplayStats,
    observer: &mut O,
) {
    match step {
        ExecutionStep::Exec(record) => {
            debug!(
                index,
                pc = record.pc,
                op = %record.op,
                dest = %record.dest,
                src = %record.src,
                "apply exec"
            );
            stats.execs += 1;
            observer.on_exec(record);
        }
        ExecutionStep::RamWrite { addr, val } => {
            debug!(index, addr = addr.get(), val = val.get(), "apply ram write");
            stats.ram_writes += 1;
            observer.on_ram_write(*addr, *val);
        }
        ExecutionStep::Done => {
            debug!(index, "apply done");
            stats.halts += 1;
            observer.on_done();
        }
    }
}
