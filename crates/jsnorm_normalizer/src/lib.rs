//! jsnorm_normalizer: Per-file pipeline and batch driver.
//!
//! Each file runs parse -> resolve -> rewrite -> emit on its own, with its
//! own scope tree and interner, so a batch can fan out across threads
//! without sharing anything.

mod error;

pub use error::NormalizeError;
pub use jsnorm_rewrite::RewriteOptions;

use jsnorm_core::text::LineMap;
use jsnorm_diagnostics::Diagnostic;
use jsnorm_emitter::{EmitError, Emitter, OutputFile};
use jsnorm_options::JsnormConfig;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Stack reserved for each batch worker. Parsing and rewriting recurse
/// over the tree.
pub const WORKER_STACK_SIZE: usize = 16 * 1024 * 1024;

/// Settings for a normalization run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizerOptions {
    pub rewrite: RewriteOptions,
    /// Re-parse emitted text before accepting it.
    pub verify_round_trip: bool,
    pub indent_width: usize,
    /// Where output files go; without one nothing is written.
    pub out_dir: Option<PathBuf>,
    /// Input paths are made relative to this before landing in `out_dir`.
    pub root_dir: Option<PathBuf>,
    /// Worker threads for batches. `0` uses one per core.
    pub jobs: usize,
}

impl Default for NormalizerOptions {
    fn default() -> Self {
        Self {
            rewrite: RewriteOptions::default(),
            verify_round_trip: true,
            indent_width: 4,
            out_dir: None,
            root_dir: None,
            jobs: 0,
        }
    }
}

impl NormalizerOptions {
    /// Options from a project file whose relative paths resolve against `root`.
    pub fn from_config(config: &JsnormConfig, root: &Path) -> Self {
        let mut options = Self::default();
        if let Some(normalize) = &config.normalize_options {
            if let Some(verify) = normalize.verify_round_trip {
                options.verify_round_trip = verify;
            }
            if let Some(check) = normalize.check_canonical {
                options.rewrite.check_canonical = check;
            }
            if let Some(explicit) = normalize.explicit_returns {
                options.rewrite.explicit_returns = explicit;
            }
            if let Some(reference_errors) = normalize.reference_errors {
                options.rewrite.reference_errors = reference_errors;
            }
            if let Some(unify) = normalize.unify_returns {
                options.rewrite.unify_returns = unify;
            }
            if let Some(unfold) = normalize.unfold_ifs {
                options.rewrite.unfold_ifs = unfold;
            }
            if let Some(width) = normalize.indent_width {
                options.indent_width = width;
            }
            options.rewrite.max_rewrites = normalize.max_rewrites;
        }
        options.out_dir = config.out_dir_in(root);
        options.root_dir = Some(root.to_path_buf());
        options
    }
}

/// A successfully normalized file.
#[derive(Debug, Clone)]
pub struct NormalizedFile {
    pub path: PathBuf,
    /// The input text.
    pub source: String,
    /// The canonical text.
    pub text: String,
    /// Warnings for constructs left as written, located and sorted.
    pub diagnostics: Vec<Diagnostic>,
    pub sweeps: usize,
    pub rewrites: usize,
    /// Files to write; empty without an output directory.
    pub output_files: Vec<OutputFile>,
}

impl NormalizedFile {
    /// Whether normalization changed the text.
    pub fn changed(&self) -> bool {
        self.text != self.source
    }
}

/// Runs the pipeline with one set of options.
pub struct Normalizer {
    options: NormalizerOptions,
    emitter: Emitter,
}

impl Normalizer {
    pub fn new(options: NormalizerOptions) -> Self {
        let emitter = Emitter {
            verify_round_trip: options.verify_round_trip,
            indent_width: options.indent_width,
            out_dir: options.out_dir.clone(),
            root_dir: options.root_dir.clone(),
        };
        Self { options, emitter }
    }

    pub fn options(&self) -> &NormalizerOptions {
        &self.options
    }

    /// Normalize `source`, reporting failures against `path`.
    #[tracing::instrument(level = "debug", skip_all, fields(file = %path.display()))]
    pub fn normalize_source(&self, path: &Path, source: String) -> Result<NormalizedFile, NormalizeError> {
        let mut program = jsnorm_parser::parse(&source).map_err(|error| NormalizeError::Parse {
            path: path.to_path_buf(),
            error,
        })?;

        let invariant = |error| NormalizeError::Invariant {
            path: path.to_path_buf(),
            error,
        };
        let outcome = jsnorm_rewrite::normalize(&mut program, &self.options.rewrite).map_err(invariant)?;

        let emitted = self.emitter.emit(&program, path).map_err(|e| match e {
            EmitError::Invariant(error) => invariant(error),
            EmitError::Io { path, source } => NormalizeError::Io { path, source },
        })?;

        let mut diagnostics = outcome.diagnostics;
        diagnostics.locate_all(&path.display().to_string(), &LineMap::new(&source));
        diagnostics.sort();
        debug!(
            sweeps = outcome.sweeps,
            rewrites = outcome.rewrites,
            warnings = diagnostics.len(),
            "normalized"
        );

        Ok(NormalizedFile {
            path: path.to_path_buf(),
            source,
            text: emitted.text,
            diagnostics: diagnostics.into_diagnostics(),
            sweeps: outcome.sweeps,
            rewrites: outcome.rewrites,
            output_files: emitted.output_files,
        })
    }

    /// Read `path` as UTF-8 and normalize it.
    pub fn normalize_file(&self, path: &Path) -> Result<NormalizedFile, NormalizeError> {
        let bytes = std::fs::read(path).map_err(|source| NormalizeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let source = simdutf8::compat::from_utf8(&bytes)
            .map_err(|e| NormalizeError::InvalidUtf8 {
                path: path.to_path_buf(),
                valid_up_to: e.valid_up_to(),
            })?
            .to_string();
        self.normalize_source(path, source)
    }

    /// Normalize every file, in parallel when there is more than one.
    /// Results come back in input order.
    pub fn normalize_files(&self, paths: &[PathBuf]) -> Vec<Result<NormalizedFile, NormalizeError>> {
        if paths.len() <= 1 || self.options.jobs == 1 {
            return paths.iter().map(|p| self.normalize_file(p)).collect();
        }

        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(self.options.jobs)
            .stack_size(WORKER_STACK_SIZE)
            .thread_name(|index| format!("jsnorm-worker-{index}"))
            .build();
        match pool {
            Ok(pool) => pool.install(|| paths.par_iter().map(|p| self.normalize_file(p)).collect()),
            Err(e) => {
                warn!(error = %e, "cannot start worker threads, normalizing sequentially");
                paths.iter().map(|p| self.normalize_file(p)).collect()
            }
        }
    }

    /// Write the output files of `file` to disk.
    pub fn write_outputs(&self, file: &NormalizedFile) -> Result<(), NormalizeError> {
        debug!(file = %file.path.display(), outputs = file.output_files.len(), "writing");
        let result = jsnorm_emitter::EmitResult {
            text: file.text.clone(),
            output_files: file.output_files.clone(),
        };
        self.emitter.write_output_files(&result).map_err(|e| match e {
            EmitError::Io { path, source } => NormalizeError::Io { path, source },
            EmitError::Invariant(error) => NormalizeError::Invariant {
                path: file.path.clone(),
                error,
            },
        })
    }
}

impl Default for Normalizer {
    fn default() -> Self {
        Self::new(NormalizerOptions::default())
    }
}

/// Normalize one in-memory script with default options.
pub fn normalize_str(source: &str) -> Result<String, NormalizeError> {
    Normalizer::default()
        .normalize_source(Path::new("<input>"), source.to_string())
        .map(|file| file.text)
}
