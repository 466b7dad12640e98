//! Source discovery for project files and directory arguments.

use crate::JsnormConfig;
use std::path::{Path, PathBuf};

/// Include pattern used when a project file names neither `files` nor `include`.
pub const DEFAULT_INCLUDE: &str = "**/*.js";

/// Directories never walked into.
pub const SKIPPED_DIRECTORIES: &[&str] = &["node_modules", ".git"];

/// Expand one command-line argument: a directory yields every `*.js` file
/// beneath it in path order, anything else is taken as a file.
pub fn collect_js_files(path: &Path) -> Vec<PathBuf> {
    if !path.is_dir() {
        return vec![path.to_path_buf()];
    }
    let mut result = Vec::new();
    walk_directory(path, &mut result);
    result.sort();
    result
}

/// The source files a project file selects, relative to `root`.
///
/// An explicit `files` list is taken in order and missing entries are
/// dropped. Otherwise every `*.js` file under `root` matched by an
/// `include` pattern and by no `exclude` pattern is returned, sorted.
/// Patterns are `/`-separated; `*` and `?` match within one component
/// and `**` matches any number of directories. A pattern naming a
/// directory covers everything beneath it.
pub fn discover_source_files(root: &Path, config: &JsnormConfig) -> Vec<PathBuf> {
    if let Some(files) = &config.files {
        return files
            .iter()
            .map(|file| root.join(file))
            .filter(|path| path.is_file())
            .collect();
    }

    let include: Vec<Vec<&str>> = match &config.include {
        Some(patterns) => patterns.iter().map(|p| pattern_components(p)).collect(),
        None => vec![pattern_components(DEFAULT_INCLUDE)],
    };
    let exclude: Vec<Vec<&str>> = config
        .exclude
        .iter()
        .flatten()
        .map(|p| pattern_components(p))
        .collect();

    let mut candidates = Vec::new();
    walk_directory(root, &mut candidates);

    let mut result: Vec<PathBuf> = candidates
        .into_iter()
        .filter(|path| {
            let Ok(relative) = path.strip_prefix(root) else {
                return false;
            };
            let parts: Vec<String> = relative
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect();
            include.iter().any(|p| covers(p, &parts)) && !exclude.iter().any(|p| covers(p, &parts))
        })
        .collect();
    result.sort();
    result.dedup();
    result
}

fn walk_directory(dir: &Path, result: &mut Vec<PathBuf>) {
    let entries = match std::fs::read_dir(dir) {
        Ok(e) => e,
        Err(_) => return,
    };

    for entry in entries.flatten() {
        let path = entry.path();
        if path.is_dir() {
            let skipped = path
                .file_name()
                .and_then(|n| n.to_str())
                .map_or(false, |name| SKIPPED_DIRECTORIES.contains(&name));
            if !skipped {
                walk_directory(&path, result);
            }
        } else if path.is_file() && path.extension().map_or(false, |ext| ext == "js") {
            result.push(path);
        }
    }
}

fn pattern_components(pattern: &str) -> Vec<&str> {
    pattern
        .split(['/', '\\'])
        .filter(|part| !part.is_empty() && *part != ".")
        .collect()
}

/// Whether the pattern matches the path or one of its ancestor directories.
fn covers(pattern: &[&str], parts: &[String]) -> bool {
    !pattern.is_empty() && (1..=parts.len()).any(|len| glob_match(pattern, &parts[..len]))
}

fn glob_match(pattern: &[&str], parts: &[String]) -> bool {
    match pattern.split_first() {
        None => parts.is_empty(),
        Some((&"**", rest)) => (0..=parts.len()).any(|skip| glob_match(rest, &parts[skip..])),
        Some((first, rest)) => match parts.split_first() {
            Some((name, tail)) => wildcard_match(first, name) && glob_match(rest, tail),
            None => false,
        },
    }
}

/// `*` and `?` within a single path component.
fn wildcard_match(pattern: &str, name: &str) -> bool {
    let pattern: Vec<char> = pattern.chars().collect();
    let name: Vec<char> = name.chars().collect();
    let (mut p, mut n) = (0, 0);
    let mut backtrack: Option<(usize, usize)> = None;

    while n < name.len() {
        if p < pattern.len() && (pattern[p] == '?' || pattern[p] == name[n]) {
            p += 1;
            n += 1;
        } else if p < pattern.len() && pattern[p] == '*' {
            backtrack = Some((p, n));
            p += 1;
        } else if let Some((star, matched)) = backtrack {
            p = star + 1;
            n = matched + 1;
            backtrack = Some((star, matched + 1));
        } else {
            return false;
        }
    }
    pattern[p..].iter().all(|&c| c == '*')
}
