#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Naming conventions for labs, exercises and student submissions.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    sync::LazyLock,
};

use anyhow::{Context, Result};
use regex::Regex;
use thiserror::Error;

/// Matches the lab token in a directory path, e.g. `Lab 3` or `Lab3`.
static LAB_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"Lab ?(\d+)").expect("lab pattern is valid"));

/// Errors raised while deriving names from paths.
#[derive(Error, Debug)]
pub enum SubmissionError {
    /// No lab token anywhere in a search directory's path.
    #[error("Could not find a lab number (e.g. `Lab 3`) in {}", dir.display())]
    MissingLab {
        /// The search directory.
        dir: PathBuf,
    },

    /// Search directories from different labs were given together.
    #[error(
        "Compared files must be from the same class: {} is lab {found}, expected lab {expected}",
        dir.display()
    )]
    MismatchedLab {
        /// The disagreeing search directory.
        dir:      PathBuf,
        /// Lab number of the earlier directories.
        expected: u32,
        /// Lab number of `dir`.
        found:    u32,
    },
}

/// The class/lab number shared by every compared file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LabIndex(pub u32);

impl Display for LabIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl LabIndex {
    /// Parses the first lab token in `text`.
    pub fn find_in(text: &str) -> Option<Self> {
        LAB_PATTERN
            .captures(text)
            .and_then(|caps| caps.get(1))
            .and_then(|m| m.as_str().parse().ok())
            .map(LabIndex)
    }

    /// Lab number of one search directory. The path as given is tried first,
    /// then its canonical form, so relative roots such as `.` work from
    /// inside a lab folder.
    pub fn from_dir(dir: &Path) -> Result<Self> {
        if let Some(lab) = Self::find_in(&dir.to_string_lossy()) {
            return Ok(lab);
        }

        let canonical = dir
            .canonicalize()
            .with_context(|| format!("Could not resolve {}", dir.display()))?;
        Self::find_in(&canonical.to_string_lossy())
            .ok_or_else(|| SubmissionError::MissingLab {
                dir: dir.to_path_buf(),
            })
            .map_err(Into::into)
    }

    /// Lab number shared by all `dirs`; fails if any two disagree.
    pub fn resolve(dirs: &[PathBuf]) -> Result<Self> {
        let mut resolved: Option<LabIndex> = None;
        for dir in dirs {
            let lab = Self::from_dir(dir)?;
            match resolved {
                None => resolved = Some(lab),
                Some(expected) if expected != lab => {
                    return Err(SubmissionError::MismatchedLab {
                        dir:      dir.clone(),
                        expected: expected.0,
                        found:    lab.0,
                    }
                    .into());
                }
                Some(_) => {}
            }
        }

        resolved
            .ok_or_else(|| SubmissionError::MissingLab {
                dir: PathBuf::from("."),
            })
            .map_err(Into::into)
    }

    /// Label of exercise `exercise` of this lab, e.g. `Lab3_zad2`. Used to
    /// name every output file of that exercise.
    pub fn exercise_label(&self, exercise: u32) -> String {
        format!("Lab{}_zad{exercise}", self.0)
    }

    /// Case-insensitive matcher for file names belonging to `exercise`.
    /// `zad1` does not match `zad10`.
    pub fn exercise_pattern(&self, exercise: u32) -> Regex {
        // Built from integers only, so it always compiles.
        Regex::new(&format!(r"(?i)lab{}_zad{exercise}(?:\D|$)", self.0))
            .expect("exercise pattern is valid")
    }
}

/// Submission identity of `file`: the part of its parent directory's name
/// before the first underscore.
pub fn submission_name(file: &Path) -> String {
    file.parent()
        .and_then(Path::file_name)
        .map(|name| name.to_string_lossy())
        .and_then(|name| name.split('_').next().map(str::to_owned))
        .unwrap_or_default()
}
