//! Binary-level integration tests: invoke the built `mosaic` executable
//! and check its stdout contract (two timing lines, spec.md §6) and exit
//! codes (0 on success, 1 on a fatal error) the way a user of the CLI
//! actually experiences it.

use mosaic_core::{Image, Rgba16};
use std::process::Command;

fn mosaic_bin() -> Command {
    Command::new(env!("CARGO_BIN_EXE_mosaic"))
}

fn solid(w: u32, h: u32, px: Rgba16) -> Image {
    let mut img = Image::new(w, h).unwrap();
    for y in 0..h {
        for x in 0..w {
            img.set(x, y, px).unwrap();
        }
    }
    img
}

#[test]
fn successful_run_prints_two_timing_lines_and_exits_zero() {
    let dir = tempfile::tempdir().unwrap();
    mosaic_io::png::write(&dir.path().join("in.png"), &solid(4, 4, Rgba16::new(100, 200, 300, 65535))).unwrap();
    std::fs::create_dir(dir.path().join("tiles")).unwrap();
    mosaic_io::png::write(&dir.path().join("tiles/a.png"), &solid(2, 2, Rgba16::new(1000, 2000, 3000, 65535))).unwrap();

    let output = mosaic_bin()
        .args([
            "-i",
            dir.path().join("in.png").to_str().unwrap(),
            "-o",
            dir.path().join("out.png").to_str().unwrap(),
            "-d",
            dir.path().join("tiles").to_str().unwrap(),
            "-s",
            "2",
            "--seed",
            "1",
        ])
        .output()
        .expect("failed to run mosaic binary");

    assert!(output.status.success(), "stderr: {}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    let lines: Vec<&str> = stdout.lines().collect();
    assert_eq!(lines.len(), 2, "expected exactly two stdout lines, got: {stdout:?}");
    assert!(lines[0].starts_with("stage a: ") && lines[0].ends_with('s'));
    assert!(lines[1].starts_with("stage b: ") && lines[1].ends_with('s'));
    assert!(dir.path().join("out.png").exists());
}

#[test]
fn empty_tiles_directory_exits_nonzero() {
    let dir = tempfile::tempdir().unwrap();
    mosaic_io::png::write(&dir.path().join("in.png"), &solid(4, 4, Rgba16::new(1, 2, 3, 65535))).unwrap();
    std::fs::create_dir(dir.path().join("tiles")).unwrap();

    let output = mosaic_bin()
        .args([
            "-i",
            dir.path().join("in.png").to_str().unwrap(),
            "-o",
            dir.path().join("out.png").to_str().unwrap(),
            "-d",
            dir.path().join("tiles").to_str().unwrap(),
            "-s",
            "2",
        ])
        .output()
        .expect("failed to run mosaic binary");

    assert!(!output.status.success());
    assert_eq!(output.status.code(), Some(1));
}

#[test]
fn missing_required_flag_exits_nonzero_without_touching_the_filesystem() {
    let dir = tempfile::tempdir().unwrap();
    let output = mosaic_bin()
        .args(["-i", dir.path().join("in.png").to_str().unwrap()])
        .output()
        .expect("failed to run mosaic binary");

    assert!(!output.status.success());
    assert!(!dir.path().join("out.png").exists());
}
