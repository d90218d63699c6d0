//! Interactive session state.
//!
//! A [`Session`] owns everything that changes while a user works on one program:
//! the assembled program, the loaded trace and its cursor, the injection list, and
//! the snapshot file. It provides:
//! 1. **Full Runs:** Assemble, write the image, simulate, and replay the whole trace.
//! 2. **Stepping:** Grouped single steps over the loaded trace.
//! 3. **Injection:** Record a RAM write, re-simulate, and restore the cursor.
//! 4. **Snapshot Mode:** Single-instruction simulation against the persisted CPU state.
//! 5. **Reset:** Return every file and in-memory structure to its initial state.
//!
//! Any operation that calls the simulator leaves the trace and cursor untouched when
//! the simulator fails.

use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{info, warn};

use crate::asm::{Program, SourceMap, assemble, write_image};
use crate::common::{Nibble, ReplayError, SessionError, TraceWarning};
use crate::config::WorkspaceConfig;
use crate::replay::injection::remove_if_exists;
use crate::replay::{EngineState, Injection, InjectionList, StepEngine, StepObserver};
use crate::sim::Simulator;
use crate::snapshot::{CpuSnapshot, SnapshotStore};
use crate::trace::{ParsedLog, Trace, parse_log};

/// Point-in-time summary of a session.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct SessionStatus {
    /// Engine lifecycle state.
    pub state: EngineState,
    /// Cursor into the trace.
    pub position: usize,
    /// Records in the loaded trace; 0 when idle.
    pub trace_len: usize,
    /// Words in the last assembled program.
    pub program_len: usize,
    /// Injections recorded since the last full run.
    pub injections: usize,
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let state = match self.state {
            EngineState::Idle => "idle",
            EngineState::Positioned(_) => "positioned",
            EngineState::Completed => "completed",
        };
        write!(
            f,
            "state={state} position={}/{} program={} word(s) injections={}",
            self.position, self.trace_len, self.program_len, self.injections
        )
    }
}

/// One user's working session over one program.
#[derive(Debug)]
pub struct Session<S: Simulator> {
    simulator: S,
    workspace: WorkspaceConfig,
    engine: StepEngine,
    injections: InjectionList,
    snapshots: SnapshotStore,
    program: Program,
    source_map: SourceMap,
    warnings: Vec<TraceWarning>,
}

impl<S: Simulator> Session<S> {
    /// Creates an idle session whose files live in `workspace`.
    pub fn new(simulator: S, workspace: WorkspaceConfig) -> Self {
        let snapshots = SnapshotStore::new(workspace.snapshot_path());
        Self {
            simulator,
            workspace,
            engine: StepEngine::new(),
            injections: InjectionList::new(),
            snapshots,
            program: Program::default(),
            source_map: SourceMap::default(),
            warnings: Vec::new(),
        }
    }

    /// Assembles `source` and writes the memory image.
    ///
    /// On assembly errors nothing is written and the previous program is kept.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::Assembly`] with every diagnostic, or
    /// [`SessionError::Image`] if the image cannot be written.
    pub fn assemble(&mut self, source: &str) -> Result<&Program, SessionError> {
        let program = assemble(source).into_result()?;
        write_image(&program, &self.workspace.program_image_path())?;
        self.program = program;
        self.source_map = SourceMap::new(source);
        Ok(&self.program)
    }

    /// Runs `source` from reset and replays the whole trace through `observer`.
    ///
    /// Earlier injections are discarded, both in memory and on disk, before the
    /// simulator starts. Returns the number of records applied.
    ///
    /// # Errors
    ///
    /// Assembly errors abort before anything is cleared. A simulator failure leaves
    /// the previous trace and cursor in place.
    pub fn run<O: StepObserver>(
        &mut self,
        source: &str,
        observer: &mut O,
    ) -> Result<usize, SessionError> {
        let _ = self.assemble(source)?;

        self.injections.clear();
        let injections_path = self.workspace.injections_path();
        remove_if_exists(&injections_path).map_err(|source| io_error(&injections_path, source))?;

        let log = self.simulator.run_full(&self.workspace)?;
        let trace = self.ingest(&log);
        let _ = self.engine.load_trace(trace);
        let applied = self.engine.run_all(observer)?;
        info!(applied, "full run replayed");
        Ok(applied)
    }

    /// Applies one grouped step of the loaded trace.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NoTrace`] if nothing has been run yet.
    pub fn step<O: StepObserver>(&mut self, observer: &mut O) -> Result<usize, SessionError> {
        Ok(self.engine.step(observer)?)
    }

    /// Applies every remaining record of the loaded trace.
    ///
    /// # Errors
    ///
    /// Returns [`ReplayError::NoTrace`] if nothing has been run yet.
    pub fn finish<O: StepObserver>(&mut self, observer: &mut O) -> Result<usize, SessionError> {
        Ok(self.engine.run_all(observer)?)
    }

    /// Injects `value` into RAM cell `addr` at the current point of the trace.
    ///
    /// The injection is attached to the PC under the cursor, appended to the list,
    /// and the whole list is persisted. The program is then re-simulated and the
    /// fresh trace is replayed up to the old cursor position (or its end, if
    /// shorter).
    ///
    /// # Errors
    ///
    /// - [`SessionError::InvalidNibble`] if `addr` or `value` exceeds `0xF`.
    /// - [`ReplayError::NoTrace`] if nothing has been run yet.
    /// - [`SessionError::Io`] if the injection list cannot be written.
    /// - [`SessionError::Simulation`] if re-simulation fails. The injection stays
    ///   recorded; trace and cursor are unchanged.
    pub fn inject<O: StepObserver>(
        &mut self,
        addr: u8,
        value: u8,
        observer: &mut O,
    ) -> Result<Injection, SessionError> {
        let addr = checked_nibble("address", addr)?;
        let value = checked_nibble("value", value)?;
        if self.engine.state() == EngineState::Idle {
            return Err(ReplayError::NoTrace.into());
        }

        let injection = Injection {
            target_pc: self.engine.injection_target_pc(),
            addr,
            value,
        };
        self.injections.push(injection);

        let path = self.workspace.injections_path();
        self.injections
            .persist(&path)
            .map_err(|source| io_error(&path, source))?;
        info!(
            %injection,
            total = self.injections.len(),
            "injection list persisted"
        );

        let saved = self.engine.position();
        let log = self.simulator.run_full(&self.workspace).inspect_err(|err| {
            warn!(%err, "re-simulation after injection failed; keeping current trace");
        })?;

        let trace = self.ingest(&log);
        let _ = self.engine.load_trace(trace);
        observer.on_restart();
        let restored = self.engine.replay_to(saved, observer)?;
        if restored < saved {
            warn!(
                saved,
                restored, "new trace is shorter than the old cursor; stopped at its end"
            );
        }
        Ok(injection)
    }

    /// Executes one instruction in snapshot mode.
    ///
    /// The program is assembled and written, the snapshot PC is validated against
    /// its length, and the single-step simulator is run. Its short trace is applied
    /// through `observer` in full. The step engine is left idle because the
    /// snapshot, not a trace, is the state in this mode.
    ///
    /// # Errors
    ///
    /// Returns assembly, image, snapshot, and simulator errors. An empty program is
    /// [`crate::common::SnapshotError::EmptyProgram`].
    pub fn step_snapshot<O: StepObserver>(
        &mut self,
        source: &str,
        observer: &mut O,
    ) -> Result<CpuSnapshot, SessionError> {
        let program_len = self.assemble(source)?.len();
        let _ = self.snapshots.clamp_pc(program_len)?;

        let log = self.simulator.run_single_step(&self.workspace)?;
        let trace = self.ingest(&log);

        let mut engine = StepEngine::new();
        let _ = engine.load_trace(trace);
        let _ = engine.run_all(observer)?;
        let _ = self.engine.unload();

        Ok(self.snapshots.read()?)
    }

    /// Writes `value` into RAM cell `addr` of the snapshot for the next single step.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::InvalidNibble`] for out-of-range input, or the
    /// snapshot I/O error.
    pub fn poke_snapshot(&mut self, addr: u8, value: u8) -> Result<CpuSnapshot, SessionError> {
        let addr = checked_nibble("address", addr)?;
        let value = checked_nibble("value", value)?;
        Ok(self.snapshots.poke(addr, value)?)
    }

    /// Reads the persisted snapshot, creating it if absent.
    ///
    /// # Errors
    ///
    /// Returns the snapshot I/O or format error.
    pub fn snapshot(&self) -> Result<CpuSnapshot, SessionError> {
        Ok(self.snapshots.read()?)
    }

    /// Clears the trace, cursor, and injections; deletes the log and injection list;
    /// writes a zero snapshot; then tells `observer` to clear its display.
    ///
    /// # Errors
    ///
    /// Returns the first file error. In-memory state is cleared regardless.
    pub fn reset<O: StepObserver>(&mut self, observer: &mut O) -> Result<(), SessionError> {
        let _ = self.engine.unload();
        self.injections.clear();
        self.warnings.clear();

        for path in [
            self.workspace.log_path(),
            self.workspace.injections_path(),
        ] {
            remove_if_exists(&path).map_err(|source| io_error(&path, source))?;
        }
        let _ = self.snapshots.reset()?;

        observer.on_reset();
        info!("session reset");
        Ok(())
    }

    /// Path of the waveform dump from the last full run.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::NoWaveform`] if the simulator has not produced one.
    pub fn waveform(&self) -> Result<PathBuf, SessionError> {
        let path = self.workspace.waveform_path();
        if path.is_file() {
            Ok(path)
        } else {
            Err(SessionError::NoWaveform { path })
        }
    }

    /// Summary of the current state.
    pub fn status(&self) -> SessionStatus {
        SessionStatus {
            state: self.engine.state(),
            position: self.engine.position(),
            trace_len: self.engine.trace().map_or(0, Trace::len),
            program_len: self.program.len(),
            injections: self.injections.len(),
        }
    }

    /// The step engine.
    pub const fn engine(&self) -> &StepEngine {
        &self.engine
    }

    /// Injections recorded since the last full run.
    pub const fn injections(&self) -> &InjectionList {
        &self.injections
    }

    /// The last successfully assembled program.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// PC to source line mapping for the last assembled program.
    pub const fn source_map(&self) -> &SourceMap {
        &self.source_map
    }

    /// Malformed records skipped while parsing the last log.
    pub fn warnings(&self) -> &[TraceWarning] {
        &self.warnings
    }

    /// Session file locations.
    pub const fn workspace(&self) -> &WorkspaceConfig {
        &self.workspace
    }

    /// The simulator backend.
    pub fn simulator_mut(&mut self) -> &mut S {
        &mut self.simulator
    }

    fn ingest(&mut self, log: &str) -> Trace {
        let ParsedLog { trace, warnings } = parse_log(log);
        self.warnings = warnings;
        trace
    }
}

fn checked_nibble(what: &'static str, value: u8) -> Result<Nibble, SessionError> {
    Nibble::new(value).ok_or(SessionError::InvalidNibble { what, value })
}

fn io_error(path: &Path, source: io::Error) -> SessionError {
    SessionError::Io {
        path: path.to_path_buf(),
        source,
    }
}
