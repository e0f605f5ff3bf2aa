#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Run configuration, resolved once from the command line and passed down
//! explicitly.

use std::{
    fmt::Display,
    path::{Path, PathBuf},
    str::FromStr,
};

use bon::Builder;

use crate::{constants::DEFAULT_FILETYPE, util::normalize_extension};

/// A step of a run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Action {
    /// Turn notebooks into scripts.
    Convert,
    /// Compare files and write reports.
    Diff,
}

impl FromStr for Action {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "convert" => Ok(Action::Convert),
            "diff" => Ok(Action::Diff),
            other => Err(format!("unknown action `{other}`, expected `convert` or `diff`")),
        }
    }
}

impl Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Convert => write!(f, "convert"),
            Action::Diff => write!(f, "diff"),
        }
    }
}

/// Everything a run needs to know.
#[derive(Debug, Clone, Builder)]
pub struct Config {
    /// Directories searched recursively for input files.
    #[builder(default = vec![PathBuf::from(".")])]
    dirs:       Vec<PathBuf>,
    /// Cell from which comparisons start; `0` compares whole files.
    #[builder(default)]
    start_cell: usize,
    /// Number of exercises, each compared separately.
    #[builder(default = 1)]
    exercises:  u32,
    /// Where reports are written; created when missing.
    #[builder(into, default = PathBuf::from("."))]
    save_dir:   PathBuf,
    /// Extension of the files compared by `diff`.
    #[builder(into, default = DEFAULT_FILETYPE.to_string())]
    filetype:   String,
    /// Requested actions; none means all of them.
    #[builder(default)]
    actions:    Vec<Action>,
}

impl Default for Config {
    fn default() -> Self {
        Config::builder().build()
    }
}

impl Config {
    /// Directories searched for input files.
    pub fn dirs(&self) -> &[PathBuf] {
        &self.dirs
    }

    /// Cell from which comparisons start.
    pub fn start_cell(&self) -> usize {
        self.start_cell
    }

    /// Number of exercises.
    pub fn exercises(&self) -> u32 {
        self.exercises
    }

    /// Output directory.
    pub fn save_dir(&self) -> &Path {
        &self.save_dir
    }

    /// Compared extension without its leading dot.
    pub fn filetype(&self) -> &str {
        normalize_extension(&self.filetype)
    }

    /// Actions to run, in execution order and without repeats.
    pub fn actions(&self) -> Vec<Action> {
        if self.actions.is_empty() {
            return vec![Action::Convert, Action::Diff];
        }
        let mut actions = self.actions.clone();
        actions.sort();
        actions.dedup();
        actions
    }

    /// Whether `action` is part of this run.
    pub fn wants(&self, action: Action) -> bool {
        self.actions().contains(&action)
    }
}
