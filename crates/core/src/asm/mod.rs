//! Assembler, program container, and memory image I/O.
//!
//! This module covers everything between source text and the file the simulator
//! loads. It provides:
//! 1. **Assembly:** [`assemble`] collects every per-line diagnostic in one pass.
//! 2. **Operands:** Hex, binary, and decimal immediates with strict 4-bit ranges.
//! 3. **Memory Image:** Writing and reading the 3-hex-digit-per-line image.
//! 4. **Source Map:** PC to source line lookup for execution highlighting.

/// Line assembler and the `Assembly` result type.
pub mod assembler;

/// Memory image rendering, writing, and reading.
pub mod image;

/// Operand token parsing.
pub mod operand;

/// The `Program` container.
pub mod program;

/// PC to source line mapping.
pub mod source_map;

pub use assembler::{Assembly, assemble, assemble_line, strip_comment};
pub use image::{parse_image, read_image, render_image, write_image};
pub use operand::parse_operand;
pub use program::Program;
pub use source_map::SourceMap;
