//! # differate
//!
//! Helps check student submissions for academic integrity: extracts code
//! cells from notebooks into plain scripts, then compares every pair of
//! submissions of an exercise and reports how similar they are.

#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Pairwise comparison of submissions within an exercise
pub mod compare;
/// Run configuration
pub mod config;
/// A module defining a bunch of constant values to be used throughout
pub mod constants;
/// Ratcliff/Obershelp similarity of two sequences
pub mod matcher;
/// Notebook parsing and conversion to scripts
pub mod notebook;
/// Writing matrices, heatmaps and diffs
pub mod report;
/// Selecting the part of a script to compare
pub mod snippet;
/// Lab, exercise and submission naming conventions
pub mod submission;
/// Utility functions for convenience
pub mod util;

use anyhow::{Context, Result};
use compare::{Comparison, compare_group, group_by_exercise};
use config::{Action, Config};
use report::{Report, write_report};
use submission::LabIndex;
use util::find_files_in;

/// The result of comparing one exercise.
#[derive(Debug, Clone)]
pub struct Outcome {
    /// Matrix and diffs.
    pub comparison: Comparison,
    /// Where they were written.
    pub report:     Report,
}

/// Compares the files of every exercise and writes the reports.
pub fn diff(config: &Config) -> Result<Vec<Outcome>> {
    let lab = LabIndex::resolve(config.dirs())?;
    let files = find_files_in(config.filetype(), config.dirs())?;
    tracing::info!(
        "Comparing {} .{} file(s) from lab {lab} across {} exercise(s)",
        files.len(),
        config.filetype(),
        config.exercises()
    );

    group_by_exercise(&files, lab, config.exercises())
        .iter()
        .map(|group| {
            let comparison = compare_group(group, config.start_cell())?;
            let report = write_report(&comparison, config.save_dir())?;
            Ok(Outcome { comparison, report })
        })
        .collect()
}

/// Runs the requested actions in order: conversion, then comparison.
pub fn run(config: &Config) -> Result<Vec<Outcome>> {
    let save_dir = config.save_dir();
    if !save_dir.is_dir() {
        std::fs::create_dir_all(save_dir)
            .with_context(|| format!("Could not create {}", save_dir.display()))?;
    }

    if config.wants(Action::Convert) {
        notebook::convert_all(config.dirs())?;
    }

    if config.wants(Action::Diff) {
        return diff(config);
    }

    Ok(Vec::new())
}
