//! Memory image files.
//!
//! The memory image is the only program-load interchange with the external
//! simulator: one line per word, exactly three hex digits, address equal to the
//! 0-based line index, no header. It is suitable for Verilog `$readmemh`.

use std::fs;
use std::path::Path;

use tracing::info;

use crate::asm::program::Program;
use crate::common::ImageError;
use crate::isa::Word;

/// Renders the image text for `program`; every line ends with `\n`.
pub fn render_image(program: &Program) -> String {
    let mut out = String::with_capacity(program.len() * 4);
    for word in program.iter() {
        out.push_str(&word.to_hex());
        out.push('\n');
    }
    out
}

/// Writes `program` to `path`, replacing any existing file.
///
/// # Errors
///
/// Returns [`ImageError::Io`] if the file cannot be written.
pub fn write_image(program: &Program, path: &Path) -> Result<(), ImageError> {
    fs::write(path, render_image(program)).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    info!(path = %path.display(), words = program.len(), "memory image written");
    Ok(())
}

/// Parses image text back into a program. Blank lines are skipped.
///
/// # Errors
///
/// Returns [`ImageError::Malformed`] for the first line that is not a valid word.
pub fn parse_image(text: &str) -> Result<Program, ImageError> {
    let mut words = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let word = Word::from_hex(line).ok_or_else(|| ImageError::Malformed {
            line: idx + 1,
            text: line.to_string(),
        })?;
        words.push(word);
    }
    Ok(Program::from_words(words))
}

/// Reads and parses the image at `path`.
///
/// # Errors
///
/// Returns [`ImageError::Io`] if the file cannot be read, or
/// [`ImageError::Malformed`] if its content is invalid.
pub fn read_image(path: &Path) -> Result<Program, ImageError> {
    let text = fs::read_to_string(path).map_err(|source| ImageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    parse_image(&text)
}
