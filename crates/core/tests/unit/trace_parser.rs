//! # Trace Parser Tests
//!
//! Tag recognition, field extraction, and the skip-and-continue policy for
//! malformed records.

use nibble_core::common::Nibble;
use nibble_core::trace::{DONE_TAG, EXEC_TAG, ExecRecord, ExecutionStep, RAM_TAG, Trace, parse_log};
use pretty_assertions::assert_eq;
use rstest::rstest;

use crate::common::harness::{GROUPED_LOG, SIX_STEP_LOG};

fn exec(pc: u32, op: &str, dest: &str, src: &str) -> ExecutionStep {
    ExecutionStep::Exec(ExecRecord {
        pc,
        op: op.to_string(),
        dest: dest.to_string(),
        src: src.to_string(),
    })
}

fn ram(addr: u8, val: u8) -> ExecutionStep {
    ExecutionStep::RamWrite {
        addr: Nibble::new(addr).unwrap(),
        val: Nibble::new(val).unwrap(),
    }
}

#[test]
fn test_all_three_tags() {
    let parsed = parse_log(GROUPED_LOG);
    assert!(parsed.warnings.is_empty());
    assert_eq!(
        parsed.trace.steps(),
        &[
            exec(0, "STO", "7", "2"),
            ram(7, 2),
            exec(1, "NOT", "7", "0"),
            ExecutionStep::Done,
        ]
    );
}

#[test]
fn test_untagged_lines_are_ignored() {
    let log = "VCD info: dumpfile opened\nWARNING: something\n  \n[EXEC] PC:3 | Op:OR | Dest:1 | Src:2\n$finish called\n";
    let trace = Trace::parse(log);
    assert_eq!(trace.steps(), &[exec(3, "OR", "1", "2")]);
}

#[test]
fn test_done_mid_stream_does_not_stop_parsing() {
    let trace = Trace::parse("[DONE]\n[EXEC] PC:0 | Op:STO | Dest:1 | Src:1\n[DONE]\n");
    assert_eq!(trace.len(), 3);
    assert_eq!(trace.get(0), Some(&ExecutionStep::Done));
    assert!(trace.get(1).is_some_and(ExecutionStep::is_exec));
}

#[rstest]
#[case("[EXEC] PC:x | Op:ADD | Dest:1 | Src:2", EXEC_TAG)]
#[case("[EXEC] PC:1 | Op:ADD | Dest:1", EXEC_TAG)]
#[case("[EXEC] PC:1 | Op ADD | Dest:1 | Src:2", EXEC_TAG)]
#[case("[RAM] Addr:1", RAM_TAG)]
#[case("[RAM] Addr:1 Val:G", RAM_TAG)]
#[case("[RAM] Addr:10 Val:1", RAM_TAG)]
#[case("[RAM] Addr 1 Val:1", RAM_TAG)]
fn test_malformed_record_is_skipped(#[case] bad: &str, #[case] tag: &'static str) {
    let log = format!("[EXEC] PC:0 | Op:STO | Dest:1 | Src:1\n{bad}\n[DONE]\n");
    let parsed = parse_log(&log);

    assert_eq!(
        parsed.trace.steps(),
        &[exec(0, "STO", "1", "1"), ExecutionStep::Done]
    );
    assert_eq!(parsed.warnings.len(), 1);
    assert_eq!(parsed.warnings[0].line, 2);
    assert_eq!(parsed.warnings[0].tag, tag);
}

#[test]
fn test_each_parse_starts_fresh() {
    let first = Trace::parse(SIX_STEP_LOG);
    let second = Trace::parse(GROUPED_LOG);
    assert_eq!(first.len(), 6);
    assert_eq!(second.len(), 4);
}

#[test]
fn test_ram_values_are_hex() {
    let trace = Trace::parse("[RAM] Addr:F Val:a\n[RAM]  Addr:0b   Val:0C \n");
    assert_eq!(trace.steps(), &[ram(15, 10), ram(11, 12)]);
}

#[test]
fn test_pc_lookup_walks_back_to_exec() {
    let trace = Trace::parse(SIX_STEP_LOG);
    assert_eq!(trace.pc_at_or_before(0), Some(0));
    assert_eq!(trace.pc_at_or_before(1), Some(0));
    assert_eq!(trace.pc_at_or_before(3), Some(1));
    assert_eq!(trace.pc_at_or_before(5), Some(2));
    assert_eq!(Trace::parse("[DONE]\n").pc_at_or_before(0), None);
}

#[test]
fn test_json_dump_tags_records() {
    let trace = Trace::parse(GROUPED_LOG);
    let json = serde_json::to_value(&trace).unwrap();
    assert_eq!(json[0]["type"], "EXEC");
    assert_eq!(json[0]["pc"], 0);
    assert_eq!(json[1]["type"], "RAM_WRITE");
    assert_eq!(json[1]["addr"], 7);
    assert_eq!(json[3]["type"], "DONE");
    assert_eq!(DONE_TAG, "[DONE]");
}
