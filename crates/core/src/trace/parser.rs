//! Simulator log parser.
//!
//! The simulator prints free-form text; only three tagged line shapes matter:
//!
//! ```text
//! [EXEC] PC:<dec> | Op:<mnemonic> | Dest:<n> | Src:<n>
//! [RAM] Addr:<hex> Val:<hex>
//! [DONE]
//! ```
//!
//! Every other line is a simulator diagnostic and is ignored. A tagged line whose
//! fields cannot be extracted is logged, reported as a [`TraceWarning`], and skipped;
//! it never stops the lines after it from being parsed.

use tracing::{info, warn};

use crate::common::{Nibble, TraceWarning};
use crate::trace::step::{ExecRecord, ExecutionStep, Trace};

/// Tag of an executed-instruction line.
pub const EXEC_TAG: &str = "[EXEC]";
/// Tag of a RAM-write line.
pub const RAM_TAG: &str = "[RAM]";
/// Tag of the halt marker.
pub const DONE_TAG: &str = "[DONE]";

/// A freshly parsed trace together with the records that were skipped.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ParsedLog {
    /// Records in log order.
    pub trace: Trace,
    /// One entry per malformed tagged line.
    pub warnings: Vec<TraceWarning>,
}

impl Trace {
    /// Parses `log`, discarding warnings (they are still emitted via `tracing`).
    pub fn parse(log: &str) -> Self {
        parse_log(log).trace
    }
}

/// Parses a complete simulator log into a new trace.
pub fn parse_log(log: &str) -> ParsedLog {
    let mut steps = Vec::new();
    let mut warnings = Vec::new();

    for (idx, raw) in log.lines().enumerate() {
        let line = raw.trim();
        if line.is_empty() {
            continue;
        }

        let (tag, parsed) = if line.starts_with(EXEC_TAG) {
            (EXEC_TAG, parse_exec(line).map(ExecutionStep::Exec))
        } else if line.starts_with(RAM_TAG) {
            (RAM_TAG, parse_ram(line))
        } else if line.starts_with(DONE_TAG) {
            (DONE_TAG, Ok(ExecutionStep::Done))
        } else {
            continue;
        };

        match parsed {
            Ok(step) => steps.push(step),
            Err(reason) => {
                let warning = TraceWarning {
                    line: idx + 1,
                    tag,
                    reason,
                };
                warn!("{warning}");
                warnings.push(warning);
            }
        }
    }

    info!(
        steps = steps.len(),
        skipped = warnings.len(),
        "simulation trace loaded"
    );

    ParsedLog {
        trace: Trace::from_steps(steps),
        warnings,
    }
}

/// Value after the first `:` of a `Key:value` field, trimmed.
fn field_value<'a>(field: &'a str, name: &str) -> Result<&'a str, String> {
    field
        .split_once(':')
        .map(|(_, value)| value.trim())
        .ok_or_else(|| format!("{name} field '{}' has no ':'", field.trim()))
}

fn parse_exec(line: &str) -> Result<ExecRecord, String> {
    let parts: Vec<&str> = line.split('|').collect();
    if parts.len() < 4 {
        return Err(format!(
            "expected 4 '|'-separated fields, found {}",
            parts.len()
        ));
    }

    let pc_text = field_value(parts[0], "PC")?;
    let pc = pc_text
        .parse::<u32>()
        .map_err(|_| format!("PC '{pc_text}' is not a decimal number"))?;

    Ok(ExecRecord {
        pc,
        op: field_value(parts[1], "Op")?.to_string(),
        dest: field_value(parts[2], "Dest")?.to_string(),
        src: field_value(parts[3], "Src")?.to_string(),
    })
}

fn parse_ram(line: &str) -> Result<ExecutionStep, String> {
    let parts: Vec<&str> = line.split_whitespace().collect();
    if parts.len() < 3 {
        return Err(format!(
            "expected 'Addr:<hex> Val:<hex>', found {} field(s)",
            parts.len().saturating_sub(1)
        ));
    }

    let nibble = |text: &str, name: &str| -> Result<Nibble, String> {
        let value = field_value(text, name)?;
        Nibble::from_hex(value).ok_or_else(|| format!("{name} '{value}' is not a hex digit 0-F"))
    };

    Ok(ExecutionStep::RamWrite {
        addr: nibble(parts[1], "Addr")?,
        val: nibble(parts[2], "Val")?,
    })
}
