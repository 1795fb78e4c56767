//! CLI tests for `labseed flag`, `expand` and `mutate`.
//!
//! Spawns the labseed binary and verifies stdout records, written files and
//! exit codes.

use std::fs;
use std::process::{Command, Output};

use labseed::core::derive::{MUTATION_MARKER, derive_flag, mutation_trailer};
use labseed::core::types::ParamValue;
use labseed::exit_codes;
use labseed::expand::ExpandOutcome;
use labseed::flag::FlagRecord;
use labseed::test_support::{LabDir, choice_param, hex_param, int_param, lab_with};

fn labseed(dir: &LabDir, args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_labseed"))
        .current_dir(dir.path())
        .args(args)
        .output()
        .expect("run labseed")
}

#[test]
fn flag_prints_seed_and_flag_record() {
    let dir = LabDir::new().expect("dir");
    let first = labseed(&dir, &["flag", "--seed", "abc"]);
    assert_eq!(first.status.code(), Some(exit_codes::OK));
    let record: FlagRecord = serde_json::from_slice(&first.stdout).expect("json");
    assert_eq!(record.seed, "abc");
    assert_eq!(record.flag, derive_flag("abc", "OMNIHACK"));

    let second = labseed(&dir, &["flag", "--seed", "abc"]);
    assert_eq!(first.stdout, second.stdout);
}

#[test]
fn flag_label_comes_from_config_unless_overridden() {
    let dir = LabDir::new().expect("dir");
    dir.write_file("labseed.toml", b"flag_label = \"CTF\"\n")
        .expect("config");

    let configured = labseed(&dir, &["flag", "--seed", "abc"]);
    let record: FlagRecord = serde_json::from_slice(&configured.stdout).expect("json");
    assert_eq!(record.flag, derive_flag("abc", "CTF"));

    let overridden = labseed(&dir, &["flag", "--seed", "abc", "--label", "LAB"]);
    let record: FlagRecord = serde_json::from_slice(&overridden.stdout).expect("json");
    assert!(record.flag.starts_with("LAB{"));
}

#[test]
fn expand_writes_artifacts_and_prints_record() {
    let dir = LabDir::new().expect("dir");
    let lab = lab_with(
        vec![
            hex_param("SEED", Some(4)),
            int_param("PORT", Some(0), Some(0)),
            choice_param("USER", vec![ParamValue::from("alice")]),
        ],
        &[("flag", "FLAG-{{SEED}}"), ("conn", "{{USER}}@db:{{PORT}}")],
    );
    let lab_path = dir.write_lab("demo", &lab).expect("lab");
    let lab_arg = lab_path.to_str().expect("utf8 path");

    let output = labseed(&dir, &["expand", lab_arg, "--seed", "abcd", "--output", "out"]);
    assert_eq!(output.status.code(), Some(exit_codes::OK), "{output:?}");
    let outcome: ExpandOutcome = serde_json::from_slice(&output.stdout).expect("json");

    let seed_value = outcome.parameters["SEED"].to_string();
    assert_eq!(seed_value.len(), 4);
    assert_eq!(outcome.parameters["PORT"], ParamValue::Int(0));
    assert_eq!(outcome.artifacts["conn"], "alice@db:0");

    let flag_file = fs::read_to_string(dir.path().join("out/flag.txt")).expect("flag.txt");
    assert_eq!(flag_file, format!("FLAG-{seed_value}"));
    assert!(dir.path().join("out/conn.txt").is_file());
}

#[test]
fn expand_rejects_unsupported_type_without_writing() {
    let dir = LabDir::new().expect("dir");
    let path = dir
        .write_file(
            "broken/lab.yaml",
            b"id: broken\nparameters:\n  - name: X\n    type: uuid\nartifacts:\n  a: \"{{X}}\"\n",
        )
        .expect("lab");

    let output = labseed(
        &dir,
        &["expand", path.to_str().expect("utf8"), "--seed", "s", "--output", "out"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::INVALID));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("uuid"), "{stderr}");
    assert!(!dir.path().join("out").exists());
}

#[test]
fn mutate_appends_marker_after_original_bytes() {
    let dir = LabDir::new().expect("dir");
    dir.write_file("source.bin", b"HELLO").expect("source");

    let output = labseed(
        &dir,
        &["mutate", "source.bin", "--output", "mut.bin", "--seed", "seed"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::OK));

    let data = fs::read(dir.path().join("mut.bin")).expect("read");
    assert!(data.starts_with(b"HELLO"));
    assert_eq!(&data[5..], mutation_trailer("seed").as_slice());
    let markers = data
        .windows(MUTATION_MARKER.len())
        .filter(|window| *window == MUTATION_MARKER)
        .count();
    assert_eq!(markers, 1);
}

#[test]
fn mutate_missing_input_exits_not_found() {
    let dir = LabDir::new().expect("dir");
    let output = labseed(
        &dir,
        &["mutate", "missing.bin", "--output", "mut.bin", "--seed", "seed"],
    );
    assert_eq!(output.status.code(), Some(exit_codes::NOT_FOUND));
    assert!(!dir.path().join("mut.bin").exists());
}
