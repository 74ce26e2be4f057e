//! End-to-end runs of the `coreplay` binary against fixture recordings.

use std::path::{Path, PathBuf};
use std::process::Command;

use coreplay::prelude::*;
use coreplay_test_utils::{RandomEvents, RecordingBuilder};

// ── Helpers ─────────────────────────────────────────────────────

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("coreplay-cli-{}-{name}", std::process::id()));
    std::fs::create_dir_all(&dir).unwrap();
    dir
}

fn write_fixture(dir: &Path) -> PathBuf {
    let events = RandomEvents::new(21, 120, 8000)
        .eliminating(WarriorId::FIRST)
        .generate();
    let path = dir.join("battle.rec");
    let bytes = RecordingBuilder::new(8000)
        .names("Mice", "Chang 1")
        .events(events)
        .bytes();
    std::fs::write(&path, bytes).unwrap();
    path
}

fn coreplay(args: &[&str]) -> std::process::Output {
    Command::new(env!("CARGO_BIN_EXE_coreplay"))
        .args(args)
        .env("RUST_LOG", "warn")
        .output()
        .unwrap()
}

// ── Commands ────────────────────────────────────────────────────

#[test]
fn inspect_prints_summary() {
    let dir = scratch_dir("inspect");
    let file = write_fixture(&dir);
    let out = coreplay(&["inspect", file.to_str().unwrap()]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.contains("\"Mice\""));
    assert!(stdout.contains("120 read"));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn resolve_prints_outcome() {
    let dir = scratch_dir("resolve");
    let file = write_fixture(&dir);
    let out = coreplay(&["resolve", file.to_str().unwrap()]);

    assert!(out.status.success());
    let stdout = String::from_utf8_lossy(&out.stdout);
    assert!(stdout.starts_with("warrior 2 wins"));
    assert!(stdout.contains("Elimination"));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn export_writes_default_named_frames() {
    let dir = scratch_dir("export");
    let file = write_fixture(&dir);
    let out = coreplay(&[
        "export",
        file.to_str().unwrap(),
        "--fps",
        "10",
        "--speed",
        "40",
        "--settle",
        "1",
    ]);
    assert!(out.status.success());

    let frames = dir.join("battle_Mice_vs_Chang_1.frames");
    let text = std::fs::read_to_string(&frames).unwrap();
    // Header line, 30 frames of play at 4 events per frame, 10 of settle.
    assert_eq!(text.lines().count(), 1 + 30 + 10);
    assert!(text.lines().last().unwrap().ends_with("warrior 2 wins"));
    std::fs::remove_dir_all(&dir).unwrap();
}

#[test]
fn missing_file_fails() {
    let out = coreplay(&["resolve", "/nonexistent/coreplay.rec"]);
    assert!(!out.status.success());
}

#[test]
fn short_file_fails() {
    let dir = scratch_dir("short");
    let path = dir.join("short.rec");
    std::fs::write(&path, [0u8; 100]).unwrap();
    let out = coreplay(&["inspect", path.to_str().unwrap()]);
    assert!(!out.status.success());
    std::fs::remove_dir_all(&dir).unwrap();
}

// ── Library API ─────────────────────────────────────────────────

#[test]
fn export_through_the_facade() {
    let rec = RecordingBuilder::new(8000)
        .events(RandomEvents::new(5, 60, 8000).generate())
        .recording();
    let replay = Replay::from_recording(rec, ReplayConfig::default()).unwrap();
    let config = ExportConfig {
        settle_seconds: 0.0,
        ..ExportConfig::default()
    };
    let mut sink = TextFrameSink::new(Vec::new());
    let report = Exporter::new(replay, config)
        .unwrap()
        .run(&mut sink)
        .unwrap();

    assert_eq!(report.frames, 60);
    assert_eq!(sink.frames(), 60);
    let text = String::from_utf8(sink.into_inner()).unwrap();
    assert!(text.starts_with("# Imp vs Dwarf"));
}
