//! 4-bit CPU toolkit CLI.
//!
//! This binary provides a single entry point for every workflow. It performs:
//! 1. **Assembly:** Validate a source file, print its listing, and write the memory image.
//! 2. **Inspection:** Disassemble an image or replay an existing simulator log.
//! 3. **Simulation:** Full runs and snapshot single steps through the external simulator.
//! 4. **Interactive Session:** A REPL with stepping, injection, and reset.

mod observer;
mod repl;
mod report;

use std::fs;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use nibble_core::Session;
use nibble_core::asm::{assemble, read_image, write_image};
use nibble_core::common::SessionError;
use nibble_core::config::Config;
use nibble_core::isa::disasm::listing;
use nibble_core::replay::StepEngine;
use nibble_core::sim::IcarusSimulator;
use nibble_core::trace::parse_log;

use crate::observer::ConsoleObserver;
use crate::report::{print_session_error, print_trace_warnings};

#[derive(Parser, Debug)]
#[command(
    name = "nibble",
    author,
    version,
    about = "Assembler and trace replayer for a 4-bit teaching CPU",
    long_about = "Assemble 4-bit CPU programs, run them through the HDL simulator, and replay the trace.\n\nExamples:\n  nibble asm prog.asm\n  nibble trace simulation.log --steps 3\n  nibble run prog.asm\n  nibble session prog.asm"
)]
struct Cli {
    /// JSON configuration file (workspace files and simulator tools).
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v info, -vv debug). `RUST_LOG` overrides.
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Assemble a source file and write its memory image.
    Asm {
        /// Assembly source.
        file: PathBuf,

        /// Output image (defaults to the source path with a `.hex` extension).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print the listing of an existing memory image.
    Disasm {
        /// Memory image.
        image: PathBuf,
    },

    /// Parse a simulator log and replay it.
    Trace {
        /// Simulator log.
        log: PathBuf,

        /// Replay only this many grouped steps.
        #[arg(long)]
        steps: Option<usize>,

        /// Dump the parsed records as JSON instead of replaying them.
        #[arg(long)]
        json: bool,
    },

    /// Assemble, simulate, and replay the whole program.
    Run {
        /// Assembly source.
        file: PathBuf,
    },

    /// Execute one instruction in snapshot mode.
    Step {
        /// Assembly source.
        file: PathBuf,
    },

    /// Start an interactive session.
    Session {
        /// Assembly source.
        file: PathBuf,
    },
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logger(cli.verbose);

    match dispatch(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            print_session_error(&err);
            ExitCode::FAILURE
        }
    }
}

/// Installs the global tracing subscriber on stderr.
///
/// `RUST_LOG` wins over `-v` when set.
fn init_logger(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn dispatch(cli: Cli) -> Result<()> {
    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    match cli.command {
        Commands::Asm { file, output } => cmd_asm(&file, output),
        Commands::Disasm { image } => cmd_disasm(&image),
        Commands::Trace { log, steps, json } => cmd_trace(&log, steps, json),
        Commands::Run { file } => cmd_run(config, &file),
        Commands::Step { file } => cmd_step(config, &file),
        Commands::Session { file } => {
            let mut session = new_session(config);
            repl::run(&mut session, &file)
        }
    }
}

fn read_text(path: &Path) -> Result<String> {
    fs::read_to_string(path).with_context(|| format!("failed to read {}", path.display()))
}

fn new_session(config: Config) -> Session<IcarusSimulator> {
    Session::new(IcarusSimulator::new(config.simulator), config.workspace)
}

/// Assembles `file`; on success writes the image and prints the listing.
fn cmd_asm(file: &Path, output: Option<PathBuf>) -> Result<()> {
    let source = read_text(file)?;
    let program = assemble(&source)
        .into_result()
        .map_err(SessionError::from)?;

    let out = output.unwrap_or_else(|| file.with_extension("hex"));
    write_image(&program, &out).map_err(SessionError::from)?;

    print!("{}", listing(program.words()));
    println!(
        "[SUCCESS] {} instruction(s) written to {}",
        program.len(),
        out.display()
    );
    Ok(())
}

fn cmd_disasm(image: &Path) -> Result<()> {
    let program = read_image(image)?;
    print!("{}", listing(program.words()));
    Ok(())
}

/// Replays an existing log without invoking the simulator.
fn cmd_trace(log: &Path, steps: Option<usize>, json: bool) -> Result<()> {
    let parsed = parse_log(&read_text(log)?);
    print_trace_warnings(&parsed.warnings);

    if json {
        println!("{}", serde_json::to_string_pretty(&parsed.trace)?);
        return Ok(());
    }

    let mut engine = StepEngine::new();
    let mut observer = ConsoleObserver::default();
    let _ = engine.load_trace(parsed.trace);
    match steps {
        Some(n) => {
            for _ in 0..n {
                let _ = engine.step(&mut observer)?;
            }
        }
        None => {
            let _ = engine.run_all(&mut observer)?;
        }
    }
    observer.print_ram();
    engine.stats().print();
    Ok(())
}

fn cmd_run(config: Config, file: &Path) -> Result<()> {
    let source = read_text(file)?;
    let mut session = new_session(config);
    let mut observer = ConsoleObserver::with_source(&source);

    let applied = session.run(&source, &mut observer)?;
    print_trace_warnings(session.warnings());
    println!("[INFO] Simulation trace loaded: {applied} record(s).");
    observer.print_ram();
    session.engine().stats().print();
    Ok(())
}

fn cmd_step(config: Config, file: &Path) -> Result<()> {
    let source = read_text(file)?;
    let mut session = new_session(config);
    let mut observer = ConsoleObserver::with_source(&source);

    let snap = session.step_snapshot(&source, &mut observer)?;
    print_trace_warnings(session.warnings());
    print!("{snap}");
    if usize::try_from(snap.pc).is_ok_and(|pc| pc >= session.program().len()) {
        println!("[INFO] End of program reached; the next step restarts at PC 0.");
    }
    Ok(())
}
