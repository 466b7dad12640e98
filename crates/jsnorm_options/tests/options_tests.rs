//! Project file and discovery tests.

use jsnorm_options::{
    collect_js_files, discover_source_files, parse_config, parse_config_file, ConfigError,
    JsnormConfig, NormalizeOptions,
};
use pretty_assertions::assert_eq;
use std::fs;
use std::path::{Path, PathBuf};

/// A fresh directory tree under the system temp dir.
fn fixture(name: &str, files: &[&str]) -> PathBuf {
    let root = std::env::temp_dir().join(format!("jsnorm_options_{}_{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&root);
    for file in files {
        let path = root.join(file);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "x;\n").unwrap();
    }
    fs::create_dir_all(&root).unwrap();
    root
}

fn relative(root: &Path, paths: Vec<PathBuf>) -> Vec<String> {
    paths
        .iter()
        .map(|p| {
            p.strip_prefix(root)
                .unwrap()
                .components()
                .map(|c| c.as_os_str().to_string_lossy().into_owned())
                .collect::<Vec<_>>()
                .join("/")
        })
        .collect()
}

// ============================================================================
// Parsing
// ============================================================================

#[test]
fn test_parse_full_config() {
    let config = parse_config(
        r#"{
            "normalizeOptions": {
                "verifyRoundTrip": false,
                "checkCanonical": true,
                "explicitReturns": false,
                "referenceErrors": true,
                "unifyReturns": true,
                "unfoldIfs": false,
                "indentWidth": 2,
                "maxRewrites": 500
            },
            "include": ["src/**/*.js"],
            "exclude": ["src/vendor"],
            "outDir": "dist"
        }"#,
    )
    .unwrap();

    assert_eq!(
        config.normalize_options,
        Some(NormalizeOptions {
            verify_round_trip: Some(false),
            check_canonical: Some(true),
            explicit_returns: Some(false),
            reference_errors: Some(true),
            unify_returns: Some(true),
            unfold_ifs: Some(false),
            indent_width: Some(2),
            max_rewrites: Some(500),
        })
    );
    assert_eq!(config.include, Some(vec!["src/**/*.js".to_string()]));
    assert_eq!(config.exclude, Some(vec!["src/vendor".to_string()]));
    assert_eq!(config.out_dir.as_deref(), Some("dist"));
    assert_eq!(config.files, None);
}

#[test]
fn test_partial_normalize_options() {
    let config = parse_config(r#"{ "normalizeOptions": { "indentWidth": 8 } }"#).unwrap();
    let options = config.normalize_options.unwrap();
    assert_eq!(options.indent_width, Some(8));
    assert_eq!(options.verify_round_trip, None);
    assert_eq!(options.max_rewrites, None);
    assert_eq!(options.reference_errors, None);
    assert_eq!(options.unify_returns, None);
    assert_eq!(options.unfold_ifs, None);
}

#[test]
fn test_malformed_json_is_rejected() {
    assert!(parse_config(r#"{ "include": "src" }"#).is_err());
    assert!(parse_config("{ not json").is_err());
}

#[test]
fn test_invalid_indent_width() {
    for width in [0, 17] {
        let config = JsnormConfig {
            normalize_options: Some(NormalizeOptions {
                indent_width: Some(width),
                ..Default::default()
            }),
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(matches!(err, ConfigError::InvalidOption { option: "indentWidth", .. }));
    }
}

#[test]
fn test_zero_max_rewrites() {
    let config = parse_config(r#"{ "normalizeOptions": { "maxRewrites": 0 } }"#).unwrap();
    let err = config.validate().unwrap_err();
    assert_eq!(err.to_string(), "invalid value for 'maxRewrites': must be at least 1");
}

#[test]
fn test_parse_config_file_errors_name_the_path() {
    let root = fixture("config_errors", &[]);

    let missing = root.join("jsnorm.json");
    let err = parse_config_file(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Io { .. }));
    assert!(err.to_string().contains("jsnorm.json"));

    fs::write(&missing, "[1, 2]").unwrap();
    let err = parse_config_file(&missing).unwrap_err();
    assert!(matches!(err, ConfigError::Json { .. }));
    assert!(err.to_string().contains("is not a valid jsnorm.json"));

    fs::write(&missing, r#"{ "outDir": "out" }"#).unwrap();
    assert_eq!(parse_config_file(&missing).unwrap().out_dir.as_deref(), Some("out"));
}

// ============================================================================
// Discovery
// ============================================================================

#[test]
fn test_default_include_walks_everything() {
    let root = fixture(
        "default_include",
        &["b.js", "a.js", "lib/c.js", "notes.txt", "node_modules/dep/index.js", ".git/hook.js"],
    );
    let files = discover_source_files(&root, &JsnormConfig::default());
    assert_eq!(relative(&root, files), vec!["a.js", "b.js", "lib/c.js"]);
}

#[test]
fn test_include_and_exclude() {
    let root = fixture(
        "include_exclude",
        &["src/app.js", "src/vendor/jq.js", "src/deep/x/y.js", "test/t.js"],
    );
    let config = JsnormConfig {
        include: Some(vec!["src/**/*.js".to_string()]),
        exclude: Some(vec!["src/vendor".to_string()]),
        ..Default::default()
    };
    let files = discover_source_files(&root, &config);
    assert_eq!(relative(&root, files), vec!["src/app.js", "src/deep/x/y.js"]);
}

#[test]
fn test_include_directory_name() {
    let root = fixture("include_dir", &["lib/a.js", "lib/sub/b.js", "other.js"]);
    let config = JsnormConfig {
        include: Some(vec!["lib".to_string()]),
        ..Default::default()
    };
    let files = discover_source_files(&root, &config);
    assert_eq!(relative(&root, files), vec!["lib/a.js", "lib/sub/b.js"]);
}

#[test]
fn test_explicit_files_keep_their_order() {
    let root = fixture("explicit_files", &["z.js", "a.js"]);
    let config = JsnormConfig {
        files: Some(vec!["z.js".to_string(), "missing.js".to_string(), "a.js".to_string()]),
        include: Some(vec!["nothing".to_string()]),
        ..Default::default()
    };
    let files = discover_source_files(&root, &config);
    assert_eq!(relative(&root, files), vec!["z.js", "a.js"]);
}

#[test]
fn test_collect_js_files() {
    let root = fixture("collect", &["one.js", "sub/two.js", "sub/readme.md", "node_modules/m.js"]);
    assert_eq!(relative(&root, collect_js_files(&root)), vec!["one.js", "sub/two.js"]);

    let single = root.join("sub/readme.md");
    assert_eq!(collect_js_files(&single), vec![single.clone()]);
}
