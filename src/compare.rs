#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Pairwise comparison of submissions within each exercise.

use std::path::{Path, PathBuf};

use anyhow::Result;
use itertools::Itertools;
use similar::TextDiff;

use crate::{
    constants::DIFF_CONTEXT_RADIUS,
    matcher,
    snippet::{Snippet, select_snippet},
    submission::{LabIndex, submission_name},
};

/// Files of one exercise, in discovery order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExerciseGroup {
    /// Exercise number, starting at 1.
    exercise: u32,
    /// Prefix of every output file, e.g. `Lab3_zad1`.
    label:    String,
    /// Matching files.
    files:    Vec<PathBuf>,
}

impl ExerciseGroup {
    /// Exercise number, starting at 1.
    pub fn exercise(&self) -> u32 {
        self.exercise
    }

    /// Prefix of every output file of this exercise.
    pub fn label(&self) -> &str {
        &self.label
    }

    /// Files taking part in the comparison.
    pub fn files(&self) -> &[PathBuf] {
        &self.files
    }
}

/// Splits `files` into one group per exercise `1..=exercises`, keeping
/// discovery order inside each group. A file whose name matches no exercise
/// is left out.
pub fn group_by_exercise(files: &[PathBuf], lab: LabIndex, exercises: u32) -> Vec<ExerciseGroup> {
    (1..=exercises)
        .map(|exercise| {
            let pattern = lab.exercise_pattern(exercise);
            let files = files
                .iter()
                .filter(|f| {
                    f.file_name()
                        .is_some_and(|name| pattern.is_match(&name.to_string_lossy()))
                })
                .cloned()
                .collect();

            ExerciseGroup {
                exercise,
                label: lab.exercise_label(exercise),
                files,
            }
        })
        .collect()
}

/// Directional similarity of every submission against every other.
///
/// `get(row, col)` is the ratio with `row`'s snippet as reference and `col`'s
/// as candidate, so the matrix is not symmetric in general. The diagonal
/// stays zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SimilarityMatrix {
    /// Row and column labels, unique, in first-seen order.
    names:  Vec<String>,
    /// Row-major values.
    values: Vec<Vec<f64>>,
}

impl SimilarityMatrix {
    /// Zero matrix over the distinct `names`.
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let names: Vec<String> = names.into_iter().map(Into::into).unique().collect();
        let values = vec![vec![0.0; names.len()]; names.len()];
        Self { names, values }
    }

    /// Row and column labels.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of rows (and columns).
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Whether the matrix has no rows.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Position of `name` on either axis.
    pub fn index_of(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Value at (`row`, `col`), if both names exist.
    pub fn get(&self, row: &str, col: &str) -> Option<f64> {
        Some(self.values[self.index_of(row)?][self.index_of(col)?])
    }

    /// Stores `value` at (`row`, `col`). Unknown names are ignored.
    pub fn set(&mut self, row: &str, col: &str, value: f64) {
        if let (Some(r), Some(c)) = (self.index_of(row), self.index_of(col)) {
            self.values[r][c] = value;
        }
    }

    /// Labelled rows, in `names` order.
    pub fn rows(&self) -> impl Iterator<Item = (&str, &[f64])> {
        self.names
            .iter()
            .map(String::as_str)
            .zip(self.values.iter().map(Vec::as_slice))
    }
}

/// Unified diff between two submissions of the same exercise.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PairwiseDiff {
    /// Submission whose snippet is the "old" side.
    pub first:  String,
    /// Submission whose snippet is the "new" side.
    pub second: String,
    /// Diff text; empty when the snippets are identical.
    pub text:   String,
}

impl PairwiseDiff {
    /// Name of the file the diff is saved to, e.g. `Lab3_zad1_alice_bob.diff`.
    pub fn file_name(&self, label: &str) -> String {
        format!("{label}_{}_{}.diff", self.first, self.second)
    }

    /// Number of hunks in the diff.
    pub fn hunk_count(&self) -> usize {
        self.text.lines().filter(|l| l.starts_with("@@")).count()
    }
}

/// Everything computed for one exercise.
#[derive(Debug, Clone)]
pub struct Comparison {
    /// Prefix of every output file, e.g. `Lab3_zad1`.
    pub label:  String,
    /// Directional ratios between all submissions.
    pub matrix: SimilarityMatrix,
    /// One diff per unordered pair, in pair order.
    pub diffs:  Vec<PairwiseDiff>,
}

/// Line-level unified diff of `old` against `new` with empty file labels.
/// Identical snippets produce an empty string.
pub fn unified_diff(old: &Snippet, new: &Snippet) -> String {
    let (old, new) = (old.text(), new.text());
    TextDiff::from_lines(&old, &new)
        .unified_diff()
        .context_radius(DIFF_CONTEXT_RADIUS)
        .missing_newline_hint(false)
        .header("", "")
        .to_string()
}

/// Compares every unordered pair of files in `group`, each from cell
/// `start_cell` onwards.
pub fn compare_group(group: &ExerciseGroup, start_cell: usize) -> Result<Comparison> {
    let entries: Vec<(String, &Path, Snippet)> = group
        .files()
        .iter()
        .map(|path| {
            let snippet = select_snippet(path, start_cell)?;
            Ok((submission_name(path), path.as_path(), snippet))
        })
        .collect::<Result<_>>()?;

    let mut matrix = SimilarityMatrix::new(entries.iter().map(|(name, ..)| name.clone()));
    if matrix.len() < entries.len() {
        tracing::warn!(
            "{}: {} files share {} submission names; later pairs overwrite earlier ones \
             and pairs within one submission stay off the matrix",
            group.label(),
            entries.len(),
            matrix.len()
        );
    }
    if entries.len() < 2 {
        tracing::warn!(
            "{}: found {} file(s), nothing to compare",
            group.label(),
            entries.len()
        );
    }

    let mut diffs = Vec::new();
    for ((name1, path1, snippet1), (name2, path2, snippet2)) in
        entries.iter().tuple_combinations()
    {
        let r1 = matcher::ratio(snippet1.lines(), snippet2.lines());
        let r2 = matcher::ratio(snippet2.lines(), snippet1.lines());
        tracing::debug!(
            "{} vs {}: {r1:.3} / {r2:.3}",
            path1.display(),
            path2.display()
        );

        if name1 != name2 {
            matrix.set(name1, name2, r1);
            matrix.set(name2, name1, r2);
        }

        diffs.push(PairwiseDiff {
            first:  name1.clone(),
            second: name2.clone(),
            text:   unified_diff(snippet1, snippet2),
        });
    }

    Ok(Comparison {
        label: group.label().to_string(),
        matrix,
        diffs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snippet(text: &str) -> Snippet {
        Snippet::new(text.split_inclusive('\n').map(str::to_owned).collect())
    }

    #[test]
    fn identical_snippets_have_empty_diff() {
        let a = snippet("x = 1\ny = 2\n");
        assert_eq!(unified_diff(&a, &a), "");
    }

    #[test]
    fn inserted_line_is_one_addition_hunk() {
        let a = snippet("a\nb\nc\nd\n");
        let b = snippet("a\nb\nnew\nc\nd\n");
        let diff = PairwiseDiff {
            first:  "a".into(),
            second: "b".into(),
            text:   unified_diff(&a, &b),
        };

        assert_eq!(diff.hunk_count(), 1);
        let added: Vec<_> = diff
            .text
            .lines()
            .filter(|l| l.starts_with('+') && !l.starts_with("+++"))
            .collect();
        let removed = diff
            .text
            .lines()
            .filter(|l| l.starts_with('-') && !l.starts_with("---"))
            .count();
        assert_eq!(added, vec!["+new"]);
        assert_eq!(removed, 0);
    }

    #[test]
    fn missing_final_newline_adds_no_hint() {
        let a = snippet("a\nb\nc");
        let b = snippet("a\nb\nd");
        let text = unified_diff(&a, &b);

        assert!(!text.contains("No newline"));
        assert!(text.lines().any(|l| l == "-c"));
        assert!(text.lines().any(|l| l == "+d"));
    }

    #[test]
    fn matrix_deduplicates_names_and_keeps_zero_diagonal() {
        let mut m = SimilarityMatrix::new(["alice", "bob", "alice"]);
        assert_eq!(m.names(), ["alice", "bob"]);
        m.set("alice", "bob", 0.5);
        m.set("bob", "alice", 0.25);
        assert_eq!(m.get("alice", "bob"), Some(0.5));
        assert_eq!(m.get("bob", "alice"), Some(0.25));
        assert_eq!(m.get("alice", "alice"), Some(0.0));
        assert_eq!(m.get("carol", "alice"), None);
    }

    #[test]
    fn groups_follow_exercise_numbers() {
        let files = vec![
            PathBuf::from("Lab 1/alice_1/Lab1_zad1.py"),
            PathBuf::from("Lab 1/alice_1/Lab1_zad2.py"),
            PathBuf::from("Lab 1/bob_2/lab1_ZAD1.py"),
            PathBuf::from("Lab 1/bob_2/notes.py"),
        ];
        let groups = group_by_exercise(&files, LabIndex(1), 2);

        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].label(), "Lab1_zad1");
        assert_eq!(groups[0].files(), [files[0].clone(), files[2].clone()]);
        assert_eq!(groups[1].exercise(), 2);
        assert_eq!(groups[1].files(), &files[1..2]);
    }

    #[test]
    fn diff_file_name_follows_convention() {
        let diff = PairwiseDiff {
            first:  "alice".into(),
            second: "bob".into(),
            text:   String::new(),
        };
        assert_eq!(diff.file_name("Lab2_zad1"), "Lab2_zad1_alice_bob.diff");
    }
}
