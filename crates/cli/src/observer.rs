//! Terminal rendering of replayed trace records.

use nibble_core::asm::SourceMap;
use nibble_core::common::{Nibble, RAM_CELLS};
use nibble_core::replay::StepObserver;
use nibble_core::trace::ExecRecord;

/// Prints each applied record and mirrors RAM so it can be dumped on request.
#[derive(Debug, Default)]
pub struct ConsoleObserver {
    source: Vec<String>,
    source_map: SourceMap,
    ram: [Nibble; RAM_CELLS],
    highlighted: Option<usize>,
}

impl ConsoleObserver {
    /// Creates an observer that highlights lines of `source`.
    pub fn with_source(source: &str) -> Self {
        Self {
            source: source.lines().map(str::to_string).collect(),
            source_map: SourceMap::new(source),
            ..Self::default()
        }
    }

    /// Last RAM contents seen in the trace.
    pub const fn ram(&self) -> &[Nibble; RAM_CELLS] {
        &self.ram
    }

    /// Source line of the last executed instruction.
    pub const fn highlighted(&self) -> Option<usize> {
        self.highlighted
    }

    /// Prints the mirrored RAM as a 16-cell table.
    pub fn print_ram(&self) {
        let header: Vec<String> = (0..RAM_CELLS).map(|a| format!("{a:X}")).collect();
        let cells: Vec<String> = self.ram.iter().map(|v| format!("{v:X}")).collect();
        println!("ADDR {}", header.join(" "));
        println!("DATA {}", cells.join(" "));
    }
}

impl StepObserver for ConsoleObserver {
    fn on_exec(&mut self, record: &ExecRecord) {
        println!(
            "[PC {}] {} {}, {}",
            record.pc, record.op, record.dest, record.src
        );
        self.highlighted = self.source_map.line_for_pc(record.pc);
        if let Some(line) = self.highlighted {
            let text = self
                .source
                .get(line.saturating_sub(1))
                .map_or("", String::as_str);
            println!("    > {line:>3} | {}", text.trim_end());
        }
    }

    fn on_ram_write(&mut self, addr: Nibble, val: Nibble) {
        self.ram[addr.index()] = val;
        println!("    RAM[{addr:X}] updated to {val:X}");
    }

    fn on_done(&mut self) {
        println!("[STOP] Program halted.");
    }

    fn on_restart(&mut self) {
        self.ram = [Nibble::ZERO; RAM_CELLS];
        self.highlighted = None;
        println!("[RESTART] Replaying from the first instruction.");
    }

    fn on_reset(&mut self) {
        self.ram = [Nibble::ZERO; RAM_CELLS];
        self.highlighted = None;
        println!("[RESET] Session cleared.");
    }
}
