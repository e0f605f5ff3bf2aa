use std::{fs, path::PathBuf};

use assert_cmd::Command;
use uuid::Uuid;

fn temp_root() -> PathBuf {
    let root = std::env::temp_dir().join(format!("differate-cli-{}", Uuid::new_v4()));
    fs::create_dir_all(&root).expect("create temp root");
    root
}

#[test]
fn diff_writes_reports_into_new_save_dir() {
    let root = temp_root();
    let lab = root.join("Lab 7");
    for (dir, body) in [("lena_1", "x = 1\ny = 2\n"), ("marc_2", "x = 1\ny = 3\n")] {
        fs::create_dir_all(lab.join(dir)).expect("create submission");
        fs::write(lab.join(dir).join("Lab7_zad1.py"), body).expect("write submission");
    }
    let save = root.join("out/nested");

    let output = Command::cargo_bin("differate")
        .expect("binary exists")
        .env("NO_COLOR", "1")
        .arg("diff")
        .arg("-d")
        .arg(&lab)
        .arg("-s")
        .arg(&save)
        .output()
        .expect("run differate");

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Similarity for Lab7_zad1"));
    assert!(stdout.contains("lena"));

    assert!(save.join("Lab7_zad1_similarity.csv").is_file());
    assert!(save.join("Lab7_zad1_similarity.svg").is_file());
    assert!(save.join("Lab7_zad1_lena_marc.diff").is_file());

    let _ = fs::remove_dir_all(root);
}

#[test]
fn unknown_action_is_rejected() {
    let root = temp_root();

    Command::cargo_bin("differate")
        .expect("binary exists")
        .current_dir(&root)
        .arg("merge")
        .assert()
        .failure();

    let _ = fs::remove_dir_all(root);
}

#[test]
fn convert_only_leaves_no_reports() {
    let root = temp_root();
    let lab = root.join("Lab 8");
    fs::create_dir_all(lab.join("nora_1")).expect("create submission");
    fs::write(
        lab.join("nora_1/Lab8_zad1.ipynb"),
        r#"{"nbformat": 4, "nbformat_minor": 5, "metadata": {},
            "cells": [{"cell_type": "code", "metadata": {}, "outputs": [], "source": ["print(1)"]}]}"#,
    )
    .expect("write notebook");
    let save = root.join("results");

    Command::cargo_bin("differate")
        .expect("binary exists")
        .arg("convert")
        .arg("--dir")
        .arg(&lab)
        .arg("--save")
        .arg(&save)
        .assert()
        .success();

    let script = fs::read_to_string(lab.join("nora_1/Lab8_zad1.py")).expect("script written");
    assert_eq!(script, "#cell 0\nprint(1)\n\n");
    assert_eq!(fs::read_dir(&save).expect("save dir created").count(), 0);

    let _ = fs::remove_dir_all(root);
}
