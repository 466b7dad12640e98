//! jsnorm_emitter: canonical text output.
//!
//! Prints a normalized program, proves the text parses back to the same
//! tree, and writes the results under an output directory:
//! 1. Print to text
//! 2. Re-parse, resolve and compare structurally
//! 3. Write output files

use jsnorm_ast::node::Program;
use jsnorm_printer::{Printer, PrinterOptions};
use jsnorm_rewrite::InvariantViolation;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum EmitError {
    #[error(transparent)]
    Invariant(#[from] InvariantViolation),

    #[error("cannot write '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Print `program` with default settings and verify the round trip.
pub fn emit(program: &Program) -> Result<String, InvariantViolation> {
    Emitter::new().emit_text(program)
}

/// Check that `text` parses and resolves to a tree isomorphic to `program`.
pub fn verify_round_trip(program: &Program, text: &str) -> Result<(), InvariantViolation> {
    let mut reparsed = jsnorm_parser::parse(text).map_err(|e| InvariantViolation::RoundTrip {
        detail: format!("emitted text does not parse: {e}"),
    })?;
    jsnorm_resolver::resolve(&mut reparsed);
    if reparsed == *program {
        return Ok(());
    }

    let expected = &program.statements;
    let found = &reparsed.statements;
    let detail = match expected.iter().zip(found).position(|(a, b)| a != b) {
        Some(index) => format!(
            "statement {} ({}) reads back differently",
            index + 1,
            expected[index].describe()
        ),
        None => format!(
            "{} statements were emitted but {} read back",
            expected.len(),
            found.len()
        ),
    };
    Err(InvariantViolation::RoundTrip { detail })
}

/// The emitter produces output files from normalized programs.
pub struct Emitter {
    /// Re-parse the printed text and compare it with the tree.
    pub verify_round_trip: bool,
    /// Spaces per indentation level.
    pub indent_width: usize,
    /// Output directory; without one nothing is written.
    pub out_dir: Option<PathBuf>,
    /// Root directory for calculating relative paths.
    pub root_dir: Option<PathBuf>,
}

/// The result of emitting a program.
#[derive(Debug)]
pub struct EmitResult {
    /// The canonical text.
    pub text: String,
    /// Output file paths.
    pub output_files: Vec<OutputFile>,
}

/// A file produced by the emitter.
#[derive(Debug, Clone)]
pub struct OutputFile {
    /// The output file path.
    pub path: PathBuf,
    /// The content of the file.
    pub text: String,
}

impl Emitter {
    pub fn new() -> Self {
        Self {
            verify_round_trip: true,
            indent_width: 4,
            out_dir: None,
            root_dir: None,
        }
    }

    /// Print `program`, verifying the round trip unless disabled.
    pub fn emit_text(&self, program: &Program) -> Result<String, InvariantViolation> {
        let mut printer = Printer::with_options(PrinterOptions::with_indent_width(self.indent_width));
        let text = printer.print_program(program);
        if self.verify_round_trip {
            verify_round_trip(program, &text)?;
        }
        Ok(text)
    }

    /// Emit the program normalized from `source_path`.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %source_path.display()))]
    pub fn emit(&self, program: &Program, source_path: &Path) -> Result<EmitResult, EmitError> {
        let text = self.emit_text(program)?;
        let output_files = match self.get_output_path(source_path) {
            Some(path) => vec![OutputFile {
                path,
                text: text.clone(),
            }],
            None => Vec::new(),
        };
        debug!(bytes = text.len(), "emitted");
        Ok(EmitResult { text, output_files })
    }

    /// Write output files to disk.
    pub fn write_output_files(&self, result: &EmitResult) -> Result<(), EmitError> {
        for file in &result.output_files {
            let io_error = |source| EmitError::Io {
                path: file.path.clone(),
                source,
            };
            if let Some(parent) = file.path.parent() {
                std::fs::create_dir_all(parent).map_err(io_error)?;
            }
            std::fs::write(&file.path, &file.text).map_err(io_error)?;
        }
        Ok(())
    }

    /// Where the output for `source` goes: its path relative to the root
    /// directory, placed under the output directory.
    pub fn get_output_path(&self, source: &Path) -> Option<PathBuf> {
        let out_dir = self.out_dir.as_ref()?;
        let under_root = self
            .root_dir
            .as_ref()
            .and_then(|root| source.strip_prefix(root).ok());
        let relative: PathBuf = match under_root {
            Some(relative) => relative.to_path_buf(),
            None if source.is_relative() => source
                .components()
                .filter(|c| matches!(c, Component::Normal(_)))
                .collect(),
            None => PathBuf::from(source.file_name().unwrap_or_default()),
        };
        Some(out_dir.join(relative))
    }
}

impl Default for Emitter {
    fn default() -> Self {
        Self::new()
    }
}
