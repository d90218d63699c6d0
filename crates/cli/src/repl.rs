//! Line-oriented interactive session.
//!
//! Reads one command per line from stdin and drives a [`Session`]. The source file is
//! re-read before every command that assembles, so edits made in another window are
//! picked up without restarting.

use std::fs;
use std::io::{self, BufRead, Write};
use std::path::Path;

use anyhow::{Context, Result, bail};
use nibble_core::Session;
use nibble_core::sim::Simulator;
use tracing::debug;

use crate::observer::ConsoleObserver;
use crate::report::print_session_error;

const HELP: &str = "\
commands:
  run                 assemble, simulate, and replay the whole program
  step                apply one instruction of the loaded trace
  finish              apply the rest of the loaded trace
  inject <addr> <val> write RAM at the current point and re-simulate (hex)
  snap                execute one instruction in snapshot mode
  poke <addr> <val>   write RAM in the snapshot file (hex)
  state               print the snapshot file
  ram                 print RAM as last seen in the trace
  reset               clear trace, injections, log, and snapshot
  wave                show the waveform file path
  status              show the replay position
  help                show this text
  quit                leave the session";

/// One parsed REPL command.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Command {
    Run,
    Step,
    Finish,
    Inject(u8, u8),
    Snap,
    Poke(u8, u8),
    State,
    Ram,
    Reset,
    Wave,
    Status,
    Help,
    Quit,
}

fn parse_hex(token: Option<&str>, what: &str) -> Result<u8> {
    let token = token.with_context(|| format!("missing {what}"))?;
    let digits = token
        .strip_prefix("0x")
        .or_else(|| token.strip_prefix("0X"))
        .unwrap_or(token);
    u8::from_str_radix(digits, 16).with_context(|| format!("{what} '{token}' is not hex"))
}

fn parse_command(line: &str) -> Result<Option<Command>> {
    let mut words = line.split_whitespace();
    let Some(head) = words.next() else {
        return Ok(None);
    };
    let cmd = match head.to_ascii_lowercase().as_str() {
        "run" | "r" => Command::Run,
        "step" | "s" => Command::Step,
        "finish" | "f" => Command::Finish,
        "inject" | "i" => Command::Inject(
            parse_hex(words.next(), "address")?,
            parse_hex(words.next(), "value")?,
        ),
        "snap" => Command::Snap,
        "poke" => Command::Poke(
            parse_hex(words.next(), "address")?,
            parse_hex(words.next(), "value")?,
        ),
        "state" => Command::State,
        "ram" => Command::Ram,
        "reset" => Command::Reset,
        "wave" => Command::Wave,
        "status" => Command::Status,
        "help" | "?" => Command::Help,
        "quit" | "exit" | "q" => Command::Quit,
        other => bail!("unknown command '{other}' (try 'help')"),
    };
    Ok(Some(cmd))
}

fn read_source(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

/// Runs the interactive loop until `quit` or end of input.
///
/// # Errors
///
/// Returns an error only if stdin or stdout fail; command failures are printed and
/// the loop continues.
pub fn run<S: Simulator>(session: &mut Session<S>, source_path: &Path) -> Result<()> {
    let mut observer = ConsoleObserver::with_source(&read_source(source_path)?);
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    println!("nibble session on {} (type 'help')", source_path.display());
    loop {
        print!("nibble> ");
        stdout.flush()?;

        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            println!();
            return Ok(());
        }

        let cmd = match parse_command(&line) {
            Ok(Some(cmd)) => cmd,
            Ok(None) => continue,
            Err(err) => {
                eprintln!("[ERROR] {err:#}");
                continue;
            }
        };
        debug!(?cmd, "repl command");
        if cmd == Command::Quit {
            return Ok(());
        }
        if let Err(err) = execute(session, &mut observer, source_path, cmd) {
            print_session_error(&err);
        }
    }
}

fn execute<S: Simulator>(
    session: &mut Session<S>,
    observer: &mut ConsoleObserver,
    source_path: &Path,
    cmd: Command,
) -> Result<()> {
    match cmd {
        Command::Run => {
            let source = read_source(source_path)?;
            *observer = ConsoleObserver::with_source(&source);
            let applied = session.run(&source, observer)?;
            println!("[INFO] Simulation trace loaded: {applied} record(s).");
        }
        Command::Step => {
            let _ = session.step(observer)?;
        }
        Command::Finish => {
            let _ = session.finish(observer)?;
        }
        Command::Inject(addr, value) => {
            let injection = session.inject(addr, value, observer)?;
            println!(
                "[INJECT] RAM[{:X}] = {:X} at PC {}",
                injection.addr, injection.value, injection.target_pc
            );
        }
        Command::Snap => {
            let source = read_source(source_path)?;
            *observer = ConsoleObserver::with_source(&source);
            let snap = session.step_snapshot(&source, observer)?;
            print!("{snap}");
        }
        Command::Poke(addr, value) => {
            let snap = session.poke_snapshot(addr, value)?;
            println!("[MANUAL] RAM[{addr:X}]={value:X} (PC={})", snap.pc);
        }
        Command::State => print!("{}", session.snapshot()?),
        Command::Ram => observer.print_ram(),
        Command::Reset => session.reset(observer)?,
        Command::Wave => println!("{}", session.waveform()?.display()),
        Command::Status => println!("{}", session.status()),
        Command::Help => println!("{HELP}"),
        Command::Quit => {}
    }
    Ok(())
}
