#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

use clap::Parser;
use pdfsqueeze_web::cli::{Args, Command};
use pdfsqueeze_web::compress_file;
use tempfile::TempDir;

/// Stand-in for `gs` that truncates its input to 32 bytes.
const TRUNCATING_TOOL: &str = r#"#!/bin/sh
for arg in "$@"; do
  case "$arg" in
    -sOutputFile=*) out="${arg#-sOutputFile=}" ;;
  esac
  last="$arg"
done
head -c 32 "$last" > "$out"
"#;

fn install_tool(dir: &Path) -> PathBuf {
    let path = dir.join("fake-gs");
    fs::write(&path, TRUNCATING_TOOL).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

fn parse(args: &[&str]) -> pdfsqueeze_web::cli::CompressArgs {
    match Args::try_parse_from(args).unwrap().command {
        Command::Compress(compress) => compress,
        other => panic!("unexpected command {other:?}"),
    }
}

#[test]
fn writes_compressed_copy_next_to_input() {
    let work = TempDir::new().unwrap();
    let scratch = TempDir::new().unwrap();
    let tool = install_tool(work.path());
    let input = work.path().join("sample.pdf");
    fs::write(&input, [b"%PDF-1.4\n".as_slice(), &[b'z'; 400][..]].concat()).unwrap();

    let args = parse(&[
        "pdfsqueeze",
        "compress",
        input.to_str().unwrap(),
        "--preset",
        "screen",
        "--tool",
        tool.to_str().unwrap(),
        "--scratch-dir",
        scratch.path().to_str().unwrap(),
    ]);
    let written = compress_file(&args).expect("compress ok");

    assert_eq!(written, work.path().join("compressed_sample.pdf"));
    assert_eq!(fs::read(&written).unwrap().len(), 32);
    assert!(input.exists());
    assert!(fs::read_dir(scratch.path()).unwrap().next().is_none());
}

#[test]
fn missing_tool_is_reported() {
    let work = TempDir::new().unwrap();
    let input = work.path().join("sample.pdf");
    fs::write(&input, b"%PDF-1.4\nbody").unwrap();
    let missing = work.path().join("no-gs-here");

    let args = parse(&[
        "pdfsqueeze",
        "compress",
        input.to_str().unwrap(),
        "--tool",
        missing.to_str().unwrap(),
        "--scratch-dir",
        work.path().to_str().unwrap(),
    ]);
    let err = compress_file(&args).expect_err("tool missing");

    assert!(format!("{err:#}").contains("not available"));
    assert!(!work.path().join("compressed_sample.pdf").exists());
}

#[test]
fn refuses_to_overwrite_input() {
    let work = TempDir::new().unwrap();
    let input = work.path().join("sample.pdf");
    fs::write(&input, b"%PDF-1.4\nbody").unwrap();

    let args = parse(&[
        "pdfsqueeze",
        "compress",
        input.to_str().unwrap(),
        "-o",
        input.to_str().unwrap(),
    ]);

    assert!(compress_file(&args).is_err());
    assert_eq!(fs::read(&input).unwrap(), b"%PDF-1.4\nbody");
}
