use clap::Parser;
use dirdiff::engine::{
    Cli, check_key, diff_maps, digest_hex, extra_keys, file_key, glob_match, hash_file,
    hash_file_chunked, is_excluded, key_to_string, path_relative_to, resolve_opts,
};
use dirdiff::utils::{HashingConsts, apply_file_to_opts, parse_dirdiff_toml};
use dirdiff::{
    DiffKind, Difference, DigestMap, DirDiffError, HashAlgorithm, KeyMode, Opts,
};
use std::fs;
use std::path::{Path, PathBuf};

// --- path_relative_to / key_to_string / file_key ---

#[test]
fn test_path_relative_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/foo/bar/baz/qux");
    assert_eq!(
        path_relative_to(&path, &base),
        Some(PathBuf::from("baz/qux"))
    );
}

#[test]
fn test_path_relative_not_under_base() {
    let base = PathBuf::from("/foo/bar");
    let path = PathBuf::from("/other/qux");
    assert_eq!(path_relative_to(&path, &base), None);
}

#[test]
fn test_key_to_string_forward_slashes() {
    assert_eq!(key_to_string(Path::new("sub/a.txt")), "sub/a.txt");
}

#[test]
fn test_file_key_flat_uses_name() {
    let root = PathBuf::from("/data");
    let path = root.join("a.txt");
    assert_eq!(file_key(&path, &root, false, KeyMode::Relative),
        PathBuf::from("a.txt")
    );
}

#[test]
fn test_file_key_recursive_relative() {
    let root = PathBuf::from("/data");
    let path = root.join("sub").join("a.txt");
    assert_eq!(file_key(&path, &root, true, KeyMode::Relative),
        PathBuf::from("sub").join("a.txt")
    );
}

#[test]
fn test_file_key_recursive_file_name() {
    let root = PathBuf::from("/data");
    let path = root.join("sub").join("a.txt");
    assert_eq!(file_key(&path, &root, true, KeyMode::FileName),
        PathBuf::from("a.txt")
    );
}

// --- glob_match / is_excluded ---

#[test]
fn test_glob_match_literal() {
    assert!(glob_match("node_modules", "node_modules"));
    assert!(!glob_match("node_modules", "node_module"));
}

#[test]
fn test_glob_match_star() {
    assert!(glob_match("*.log", "foo.log"));
    assert!(glob_match("*.log", ".log"));
    assert!(!glob_match("*.log", "foo.log.txt"));
    assert!(glob_match("node_*", "node_modules"));
    assert!(glob_match("a*b*c", "a_x_b_y_c"));
}

#[test]
fn test_glob_match_question_mark() {
    assert!(glob_match("file?.txt", "file1.txt"));
    assert!(!glob_match("file?.txt", "file.txt"));
}

#[test]
fn test_glob_match_many_stars_without_match_is_fast() {
    let text = "a".repeat(60);
    let start = std::time::Instant::now();
    assert!(!glob_match("*a*a*a*a*a*a*a*a*a*a*b", &text));
    assert!(glob_match("*a*a*a*a*a*a*a*a*a*a*", &text));
    assert!(start.elapsed() < std::time::Duration::from_secs(1));
}

#[test]
fn test_is_excluded_by_name_or_key() {
    let patterns = vec!["*.tmp".to_string(), "build/*".to_string()];
    assert!(is_excluded("sub/scratch.tmp", &patterns));
    assert!(is_excluded("build/out.bin", &patterns));
    assert!(!is_excluded("src/build.rs", &patterns));
    assert!(!is_excluded("a.txt", &[]));
}

// --- hashing ---

fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(&path, content).unwrap();
    path
}

#[test]
fn test_hash_file_sha256_known_vector() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "hello", b"hello");
    let digest = hash_file(&path, HashAlgorithm::Sha256).unwrap();
    assert_eq!(
        digest_hex(&digest),
        "2cf24dba5fb0a30e26e83b2ac5b9e29e1b161e5c1fa7425e73043362938b9824"
    );
}

#[test]
fn test_hash_file_blake3_matches_library() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "hello", b"hello");
    let digest = hash_file(&path, HashAlgorithm::Blake3).unwrap();
    assert_eq!(digest, *blake3::hash(b"hello").as_bytes());
}

#[test]
fn test_hash_file_empty_blake3() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "empty", b"");
    let digest = hash_file(&path, HashAlgorithm::Blake3).unwrap();
    assert_eq!(
        digest_hex(&digest),
        "af1349b9f5f9a1a6a0404dea36dcc9499bcb25c9adc112b7cc9a93cae41f3262"
    );
}

#[test]
fn test_hash_deterministic_across_chunk_sizes() {
    let dir = tempfile::tempdir().unwrap();
    let content: Vec<u8> = (0..100_000u32).map(|i| (i % 251) as u8).collect();
    let path = write_file(dir.path(), "data.bin", &content);
    for algorithm in [HashAlgorithm::Blake3, HashAlgorithm::Sha256] {
        let reference = hash_file(&path, algorithm).unwrap();
        for chunk in [1, 7, 4096, 65_536, 1 << 20] {
            assert_eq!(hash_file_chunked(&path, algorithm, chunk).unwrap(), reference);
        }
    }
}

#[test]
fn test_hash_algorithms_differ() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "a", b"same bytes");
    assert_ne!(
        hash_file(&path, HashAlgorithm::Blake3).unwrap(),
        hash_file(&path, HashAlgorithm::Sha256).unwrap()
    );
}

#[test]
fn test_hash_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = hash_file(&dir.path().join("nope"), HashAlgorithm::Blake3).unwrap_err();
    assert!(matches!(err, DirDiffError::Io { .. }));
}

#[test]
fn test_hash_zero_chunk_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "a", b"x");
    let err = hash_file_chunked(&path, HashAlgorithm::Blake3, 0).unwrap_err();
    assert!(matches!(err, DirDiffError::Config(_)));
}

#[test]
fn test_hash_oversized_chunk_is_config_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = write_file(dir.path(), "a", b"x");
    let err =
        hash_file_chunked(&path, HashAlgorithm::Blake3, HashingConsts::MAX_CHUNK_SIZE + 1)
            .unwrap_err();
    assert!(matches!(err, DirDiffError::Config(_)));
    assert!(hash_file_chunked(&path, HashAlgorithm::Blake3, HashingConsts::MAX_CHUNK_SIZE).is_ok());
}

#[test]
fn test_digest_hex_is_lowercase_and_full_width() {
    let mut digest = [0u8; 32];
    digest[0] = 0xAB;
    digest[31] = 0x01;
    let hex = digest_hex(&digest);
    assert_eq!(hex.len(), 64);
    assert!(hex.starts_with("ab00"));
    assert!(hex.ends_with("0001"));
}

// --- differ ---

fn map(entries: &[(&str, u8)]) -> DigestMap {
    entries
        .iter()
        .map(|(k, b)| (PathBuf::from(*k), [*b; 32]))
        .collect()
}

#[test]
fn test_check_key_same_digest() {
    let b = map(&[("a", 1)]);
    assert_eq!(check_key(&PathBuf::from("a"), &[1; 32], &b), None);
}

#[test]
fn test_check_key_missing() {
    let b = map(&[]);
    assert_eq!(
        check_key(&PathBuf::from("a"), &[1; 32], &b),
        Some(Difference {
            key: PathBuf::from("a"),
            kind: DiffKind::Missing
        })
    );
}

#[test]
fn test_check_key_changed() {
    let b = map(&[("a", 2)]);
    assert_eq!(
        check_key(&PathBuf::from("a"), &[1; 32], &b).map(|d| d.kind),
        Some(DiffKind::Changed)
    );
}

#[test]
fn test_diff_maps_is_directional_and_sorted() {
    let a = map(&[("c", 1), ("a", 1), ("b", 1)]);
    let b = map(&[("a", 1), ("b", 9), ("only_in_b", 1)]);
    let diff = diff_maps(&a, &b, 1).unwrap();
    assert_eq!(
        diff,
        vec![
            Difference {
                key: PathBuf::from("b"),
                kind: DiffKind::Changed
            },
            Difference {
                key: PathBuf::from("c"),
                kind: DiffKind::Missing
            },
        ]
    );
}

#[test]
fn test_diff_maps_thread_count_does_not_change_result() {
    let a: DigestMap = (0..500u32)
        .map(|i| (PathBuf::from(format!("f{i}")), [(i % 7) as u8; 32]))
        .collect();
    let b: DigestMap = (0..500u32)
        .filter(|i| i % 5 != 0)
        .map(|i| (PathBuf::from(format!("f{i}")), [(i % 3) as u8; 32]))
        .collect();
    let serial = diff_maps(&a, &b, 1).unwrap();
    let parallel = diff_maps(&a, &b, 8).unwrap();
    assert_eq!(serial, parallel);
    assert!(!serial.is_empty());
}

#[test]
fn test_diff_maps_zero_threads_rejected() {
    let a = map(&[("a", 1)]);
    let err = diff_maps(&a, &a, 0).unwrap_err();
    assert!(matches!(
        err.downcast_ref::<DirDiffError>(),
        Some(DirDiffError::Config(_))
    ));
}

#[test]
fn test_extra_keys_only_in_second() {
    let a = map(&[("a", 1)]);
    let b = map(&[("a", 2), ("z", 1), ("m", 1)]);
    let extras = extra_keys(&a, &b, 2).unwrap();
    let keys: Vec<&Path> = extras.iter().map(|d| d.key.as_path()).collect();
    assert_eq!(keys, vec![Path::new("m"), Path::new("z")]);
    assert!(extras.iter().all(|d| d.kind == DiffKind::Extra));
}

// --- opts / settings file ---

#[test]
fn test_opts_default_is_sequential_flat() {
    let opts = Opts::default();
    assert_eq!(opts.num_threads, 1);
    assert!(!opts.recursive);
    assert!(!opts.symmetric);
    assert_eq!(opts.key_mode, KeyMode::Relative);
    assert!(opts.validate().is_ok());
}

#[test]
fn test_opts_zero_threads_invalid() {
    let opts = Opts {
        num_threads: 0,
        ..Default::default()
    };
    assert!(matches!(opts.validate(), Err(DirDiffError::Config(_))));
}

#[test]
fn test_opts_oversized_chunk_invalid() {
    let opts = Opts {
        chunk_size: HashingConsts::MAX_CHUNK_SIZE + 1,
        ..Default::default()
    };
    assert!(matches!(opts.validate(), Err(DirDiffError::Config(_))));
    let opts = Opts {
        chunk_size: usize::MAX,
        ..Default::default()
    };
    assert!(matches!(opts.validate(), Err(DirDiffError::Config(_))));
}

#[test]
fn test_settings_file_applies_present_fields_only() {
    let file = parse_dirdiff_toml(
        r#"
[settings]
recursive = true
threads = 4
algorithm = "sha256"
key_mode = "file-name"
exclude = ["*.tmp"]
"#,
        Path::new(".dirdiff.toml"),
    )
    .unwrap();
    let mut opts = Opts::default();
    apply_file_to_opts(&file, &mut opts);
    assert!(opts.recursive);
    assert_eq!(opts.num_threads, 4);
    assert_eq!(opts.algorithm, HashAlgorithm::Sha256);
    assert_eq!(opts.key_mode, KeyMode::FileName);
    assert_eq!(opts.exclude, vec!["*.tmp".to_string()]);
    assert!(!opts.strict);
    assert!(!opts.symmetric);
}

#[test]
fn test_settings_file_unknown_key_is_config_error() {
    let err = parse_dirdiff_toml("[settings]\nthreadz = 2\n", Path::new(".dirdiff.toml"))
        .unwrap_err();
    assert!(matches!(err, DirDiffError::Config(_)));
}

// --- resolve_opts: defaults < settings file < flags ---

fn settings_file(dir: &Path, body: &str) -> PathBuf {
    write_file(dir, ".dirdiff.toml", body.as_bytes())
}

fn config_error(err: &anyhow::Error) -> bool {
    matches!(err.downcast_ref::<DirDiffError>(), Some(DirDiffError::Config(_)))
}

#[test]
fn test_resolve_opts_empty_file_keeps_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let empty = settings_file(dir.path(), "");
    let cli = Cli::parse_from(["dirdiff", "--config", empty.to_str().unwrap(), "a", "b"]);
    let opts = resolve_opts(&cli).unwrap();
    assert_eq!(opts.num_threads, 1);
    assert!(!opts.recursive);
    assert!(opts.exclude.is_empty());
    assert_eq!(opts.algorithm, HashAlgorithm::Blake3);
}

#[test]
fn test_resolve_opts_settings_file_overrides_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = settings_file(
        dir.path(),
        "[settings]\nthreads = 4\nrecursive = true\nexclude = [\"*.tmp\"]\nalgorithm = \"sha256\"\n",
    );
    let cli = Cli::parse_from(["dirdiff", "--config", path.to_str().unwrap(), "a", "b"]);
    let opts = resolve_opts(&cli).unwrap();
    assert_eq!(opts.num_threads, 4);
    assert!(opts.recursive);
    assert_eq!(opts.exclude, vec!["*.tmp".to_string()]);
    assert_eq!(opts.algorithm, HashAlgorithm::Sha256);
}

#[test]
fn test_resolve_opts_flags_override_settings_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = settings_file(
        dir.path(),
        "[settings]\nthreads = 4\nrecursive = true\nexclude = [\"*.tmp\"]\nalgorithm = \"sha256\"\n",
    );
    let cli = Cli::parse_from([
        "dirdiff",
        "--config",
        path.to_str().unwrap(),
        "-t",
        "2",
        "-e",
        "*.bak",
        "-e",
        ".git",
        "-a",
        "blake3",
        "-s",
        "a",
        "b",
    ]);
    let opts = resolve_opts(&cli).unwrap();
    assert_eq!(opts.num_threads, 2);
    assert_eq!(opts.exclude, vec!["*.bak".to_string(), ".git".to_string()]);
    assert_eq!(opts.algorithm, HashAlgorithm::Blake3);
    // Not given on the command line, so the file's value stays.
    assert!(opts.recursive);
    assert!(opts.symmetric);
}

#[test]
fn test_resolve_opts_missing_config_file_is_error() {
    let dir = tempfile::tempdir().unwrap();
    let missing = dir.path().join("absent.toml");
    let cli = Cli::parse_from(["dirdiff", "--config", missing.to_str().unwrap(), "a", "b"]);
    let err = resolve_opts(&cli).unwrap_err();
    assert!(config_error(&err));
}

#[test]
fn test_resolve_opts_rejects_zero_threads_from_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = settings_file(dir.path(), "[settings]\nthreads = 0\n");
    let cli = Cli::parse_from(["dirdiff", "--config", path.to_str().unwrap(), "a", "b"]);
    assert!(config_error(&resolve_opts(&cli).unwrap_err()));

    // A valid count on the command line wins over the bad file value.
    let cli = Cli::parse_from([
        "dirdiff",
        "--config",
        path.to_str().unwrap(),
        "-t",
        "3",
        "a",
        "b",
    ]);
    assert_eq!(resolve_opts(&cli).unwrap().num_threads, 3);
}
