//! jsnorm: The JavaScript normalizer CLI.
//!
//! Usage:
//!   jsnorm [options] [FILE|DIR...]
//!
//! Rewrites each script into the canonical subset. Without `-o` the
//! normalized text goes to stdout.
//!
//! Exit status: 0 on success (warnings allowed), 1 when a file fails to
//! parse or cannot be read or written (or differs under `--check`), 2 on an
//! internal invariant violation.

mod render;

use clap::Parser as ClapParser;
use jsnorm_diagnostics::Diagnostic;
use jsnorm_normalizer::{NormalizeError, NormalizedFile, Normalizer, NormalizerOptions};
use jsnorm_options::{ConfigError, JsnormConfig, CONFIG_FILE_NAME};
use serde::Serialize;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::process;
use std::time::Instant;
use tracing::debug;

#[derive(ClapParser, Debug)]
#[command(name = "jsnorm", version, about = "jsnorm - Rewrite JavaScript into a canonical subset for static analysis")]
struct Cli {
    /// Scripts to normalize. Directories are searched for `*.js` files.
    #[arg(value_name = "FILE|DIR")]
    paths: Vec<PathBuf>,

    /// Write normalized files under this directory instead of stdout.
    #[arg(short = 'o', long = "out-dir", value_name = "DIR")]
    out_dir: Option<PathBuf>,

    /// Path to jsnorm.json.
    #[arg(short = 'p', long = "project", value_name = "FILE")]
    project: Option<PathBuf>,

    /// Print results and diagnostics as JSON on stdout.
    #[arg(long)]
    json: bool,

    /// Do not re-parse the emitted text.
    #[arg(long = "no-verify")]
    no_verify: bool,

    /// List files whose normalized text differs from the input. Writes nothing.
    #[arg(long)]
    check: bool,

    /// Keep reads of never-declared globals throwing: write them through
    /// the global object instead of declaring them.
    #[arg(long = "reference-errors")]
    reference_errors: bool,

    /// Leave every function with a single trailing `return`.
    #[arg(long = "unify-returns")]
    unify_returns: bool,

    /// Split `if`/`else` into two one-branch `if`s.
    #[arg(long = "unfold-ifs")]
    unfold_ifs: bool,

    /// Log engine activity (-v debug, -vv trace). RUST_LOG takes precedence.
    #[arg(short = 'v', long = "verbose", action = clap::ArgAction::Count)]
    verbose: u8,

    /// Only report errors.
    #[arg(short = 'q', long)]
    quiet: bool,

    /// Worker threads; 0 uses one per core.
    #[arg(short = 'j', long, default_value_t = 0)]
    jobs: usize,
}

// ANSI color codes
const RED: &str = "\x1b[31m";
const GRAY: &str = "\x1b[90m";
const BOLD: &str = "\x1b[1m";
const RESET: &str = "\x1b[0m";

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose, cli.quiet);
    let exit_code = run(&cli);
    process::exit(exit_code);
}

fn init_tracing(verbose: u8, quiet: bool) {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    let level = match (quiet, verbose) {
        (true, _) => "error",
        (false, 0) => "warn",
        (false, 1) => "debug",
        _ => "trace",
    };
    let filter = match std::env::var("RUST_LOG") {
        Ok(_) => EnvFilter::from_default_env(),
        Err(_) => EnvFilter::new(level),
    };
    let _ = tracing_subscriber::registry()
        .with(fmt::layer().with_writer(std::io::stderr).with_target(true))
        .with(filter)
        .try_init();
}

fn run(cli: &Cli) -> i32 {
    let start = Instant::now();

    let project = match load_project(cli) {
        Ok(project) => project,
        Err(e) => {
            print_error(&e.to_string());
            return 1;
        }
    };

    let files = resolve_input_files(cli, project.as_ref());
    if files.is_empty() {
        print_error("No input files found.");
        return 1;
    }
    debug!(files = files.len(), "inputs resolved");

    let normalizer = Normalizer::new(build_options(cli, project.as_ref()));
    let results = normalizer.normalize_files(&files);

    let use_color = !cli.json && stderr_is_terminal();
    let writes_files = normalizer.options().out_dir.is_some();
    let mut exit_code = 0;
    let mut failures = 0;
    let mut warnings = 0;
    let mut reports = Vec::new();
    let mut stdout = std::io::stdout().lock();

    for result in &results {
        match result {
            Ok(file) => {
                warnings += file.diagnostics.len();
                if !cli.json && !cli.quiet {
                    for diag in &file.diagnostics {
                        print_diagnostic(diag, &file.source, use_color);
                    }
                }

                if cli.check {
                    if file.changed() {
                        exit_code = exit_code.max(1);
                        if !cli.json && writeln!(stdout, "{}", file.path.display()).is_err() {
                            return 1;
                        }
                    }
                } else if writes_files {
                    if let Err(e) = normalizer.write_outputs(file) {
                        failures += 1;
                        exit_code = exit_code.max(e.exit_code());
                        print_failure(&e, use_color);
                    }
                } else if !cli.json {
                    if let Err(e) = write_text(&mut stdout, file, files.len() > 1) {
                        print_error(&format!("cannot write to stdout: {}", e));
                        return 1;
                    }
                }

                if cli.json {
                    reports.push(FileReport::normalized(file, cli.check || writes_files));
                }
            }
            Err(e) => {
                failures += 1;
                exit_code = exit_code.max(e.exit_code());
                if cli.json {
                    reports.push(FileReport::failed(e));
                } else {
                    print_failure(e, use_color);
                }
            }
        }
    }

    if cli.json {
        let written = serde_json::to_string_pretty(&reports)
            .map_err(|e| e.to_string())
            .and_then(|json| writeln!(stdout, "{}", json).map_err(|e| e.to_string()));
        if let Err(e) = written {
            print_error(&format!("cannot write JSON report: {}", e));
            return 1;
        }
    } else if !cli.quiet && use_color {
        print_summary(results.len(), failures, warnings, start);
    }

    exit_code
}

/// The project file named by `-p`, or `./jsnorm.json` when no paths are given.
fn load_project(cli: &Cli) -> Result<Option<(PathBuf, JsnormConfig)>, ConfigError> {
    let path = match &cli.project {
        Some(path) => path.clone(),
        None if cli.paths.is_empty() && Path::new(CONFIG_FILE_NAME).is_file() => {
            PathBuf::from(CONFIG_FILE_NAME)
        }
        None => return Ok(None),
    };
    let config = jsnorm_options::parse_config_file(&path)?;
    Ok(Some((jsnorm_options::config_root(&path), config)))
}

fn resolve_input_files(cli: &Cli, project: Option<&(PathBuf, JsnormConfig)>) -> Vec<PathBuf> {
    if !cli.paths.is_empty() {
        return cli
            .paths
            .iter()
            .flat_map(|path| jsnorm_options::collect_js_files(path))
            .collect();
    }
    match project {
        Some((root, config)) => jsnorm_options::discover_source_files(root, config),
        None => Vec::new(),
    }
}

/// Project settings with command-line flags applied on top.
fn build_options(cli: &Cli, project: Option<&(PathBuf, JsnormConfig)>) -> NormalizerOptions {
    let mut options = match project {
        Some((root, config)) => NormalizerOptions::from_config(config, root),
        None => NormalizerOptions::default(),
    };

    if let Some(dir) = &cli.out_dir {
        options.out_dir = Some(dir.clone());
    }
    // A single directory argument is mirrored from its own root.
    if let [only] = cli.paths.as_slice() {
        if only.is_dir() {
            options.root_dir = Some(only.clone());
        }
    }
    if cli.no_verify {
        options.verify_round_trip = false;
    }
    options.rewrite.reference_errors |= cli.reference_errors;
    options.rewrite.unify_returns |= cli.unify_returns;
    options.rewrite.unfold_ifs |= cli.unfold_ifs;
    if cli.check {
        options.out_dir = None;
    }
    options.jobs = cli.jobs;
    options
}

fn write_text(out: &mut impl Write, file: &NormalizedFile, with_header: bool) -> std::io::Result<()> {
    if with_header {
        writeln!(out, "// ==> {} <==", file.path.display())?;
    }
    out.write_all(file.text.as_bytes())
}

/// One entry of the `--json` report.
#[derive(Debug, Serialize)]
struct FileReport<'a> {
    file: String,
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    changed: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<&'a str>,
    diagnostics: Vec<Diagnostic>,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

impl<'a> FileReport<'a> {
    fn normalized(file: &'a NormalizedFile, omit_text: bool) -> Self {
        Self {
            file: file.path.display().to_string(),
            status: "ok",
            changed: Some(file.changed()),
            text: (!omit_text).then_some(file.text.as_str()),
            diagnostics: file.diagnostics.clone(),
            error: None,
        }
    }

    fn failed(error: &NormalizeError) -> Self {
        let status = match error {
            NormalizeError::Parse { .. } => "parse-error",
            NormalizeError::Invariant { .. } => "internal-error",
            NormalizeError::Io { .. } | NormalizeError::InvalidUtf8 { .. } => "io-error",
        };
        Self {
            file: error.path().display().to_string(),
            status,
            changed: None,
            text: None,
            diagnostics: error.to_diagnostic().into_iter().collect(),
            error: Some(error.to_string()),
        }
    }
}

fn print_diagnostic(diag: &Diagnostic, source: &str, use_color: bool) {
    if use_color {
        let file_name = diag.file.as_deref().unwrap_or("<input>");
        eprintln!("{:?}", render::report(diag, file_name, source));
    } else {
        eprintln!("{}", diag);
    }
}

fn print_failure(error: &NormalizeError, use_color: bool) {
    match error.to_diagnostic() {
        Some(diag) => {
            // Parse failures keep no copy of the text; read it back for the snippet.
            let source = if use_color {
                std::fs::read_to_string(error.path()).ok()
            } else {
                None
            };
            match source {
                Some(source) => print_diagnostic(&diag, &source, true),
                None => eprintln!("{}", diag),
            }
        }
        None => print_error(&error.to_string()),
    }
}

fn print_summary(files: usize, failures: usize, warnings: usize, start: Instant) {
    let elapsed = start.elapsed();
    if failures > 0 {
        eprintln!(
            "\n{}Found {} failing file{}.{}",
            RED,
            failures,
            if failures == 1 { "" } else { "s" },
            RESET
        );
    }
    eprintln!(
        "{}Normalized {} file{} with {} warning{} in {:.2}s.{}",
        GRAY,
        files - failures,
        if files - failures == 1 { "" } else { "s" },
        warnings,
        if warnings == 1 { "" } else { "s" },
        elapsed.as_secs_f64(),
        RESET
    );
}

fn print_error(msg: &str) {
    if stderr_is_terminal() {
        eprintln!("{}{}error{}: {}", BOLD, RED, RESET, msg);
    } else {
        eprintln!("error: {}", msg);
    }
}

fn stderr_is_terminal() -> bool {
    #[cfg(unix)]
    {
        unsafe { libc::isatty(libc::STDERR_FILENO) != 0 }
    }
    #[cfg(not(unix))]
    {
        false
    }
}
