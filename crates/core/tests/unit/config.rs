//! # Configuration Tests

use std::path::PathBuf;

use nibble_core::Config;
use nibble_core::common::ConfigError;
use nibble_core::config::WorkspaceConfig;
use pretty_assertions::assert_eq;

use crate::common::harness::Workspace;

#[test]
fn test_defaults_match_hardware_project() {
    let config = Config::default();

    assert_eq!(config.workspace.dir, PathBuf::from("."));
    assert_eq!(config.workspace.program_image, "program.hex");
    assert_eq!(config.workspace.injections, "injections.txt");
    assert_eq!(config.workspace.log, "simulation.log");
    assert_eq!(config.workspace.snapshot, "cpu_state.hex");
    assert_eq!(config.workspace.waveform, "simulation.vcd");

    assert_eq!(config.simulator.compiler, "iverilog");
    assert_eq!(config.simulator.runtime, "vvp");
    assert_eq!(config.simulator.full_executable, "cpu_sim");
    assert_eq!(config.simulator.step_executable, "cpu_sim_step");
    assert_eq!(config.simulator.sources.len(), 7);
    assert!(
        config
            .simulator
            .step_testbench
            .ends_with("bridge_tb_step.v")
    );
}

#[test]
fn test_empty_json_is_default() {
    let config = Config::from_json_str("{}").unwrap();
    assert_eq!(config.workspace.log, "simulation.log");
    assert_eq!(config.simulator.runtime, "vvp");
}

#[test]
fn test_partial_override_keeps_other_fields() {
    let config = Config::from_json_str(
        r#"{ "workspace": { "snapshot": "state.txt" }, "simulator": { "sources": ["cpu.v"] } }"#,
    )
    .unwrap();

    assert_eq!(config.workspace.snapshot, "state.txt");
    assert_eq!(config.workspace.injections, "injections.txt");
    assert_eq!(config.simulator.sources, vec![PathBuf::from("cpu.v")]);
    assert_eq!(config.simulator.compiler, "iverilog");
}

#[test]
fn test_paths_join_workspace_dir() {
    let ws = WorkspaceConfig::in_dir("/work");
    assert_eq!(ws.program_image_path(), PathBuf::from("/work/program.hex"));
    assert_eq!(ws.injections_path(), PathBuf::from("/work/injections.txt"));
    assert_eq!(ws.log_path(), PathBuf::from("/work/simulation.log"));
    assert_eq!(ws.snapshot_path(), PathBuf::from("/work/cpu_state.hex"));
    assert_eq!(ws.waveform_path(), PathBuf::from("/work/simulation.vcd"));
}

#[test]
fn test_load_from_file() {
    let ws = Workspace::new();
    ws.write("nibble.json", r#"{ "simulator": { "runtime": "vvp-12" } }"#);

    let config = Config::load(&ws.path("nibble.json")).unwrap();
    assert_eq!(config.simulator.runtime, "vvp-12");
}

#[test]
fn test_load_errors() {
    let ws = Workspace::new();
    assert!(matches!(
        Config::load(&ws.path("missing.json")),
        Err(ConfigError::Io { .. })
    ));

    ws.write("bad.json", r#"{ "workspace": { "log": 3 } }"#);
    assert!(matches!(
        Config::load(&ws.path("bad.json")),
        Err(ConfigError::Json(_))
    ));
}
