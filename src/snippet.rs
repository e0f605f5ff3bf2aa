#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Selection of the part of a script that takes part in a comparison.

use std::path::Path;

use anyhow::Result;

use crate::{constants::CELL_MARKER_PREFIX, util::read_lines};

/// Lines of a file taken from some cell marker to the end of the file.
///
/// Every line keeps its terminator, so concatenating the lines yields the
/// selected text byte for byte.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Snippet {
    /// Selected lines.
    lines: Vec<String>,
}

impl Snippet {
    /// Wraps already split lines.
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Selected lines.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Number of selected lines.
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Whether nothing was selected.
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// The selected text as one string.
    pub fn text(&self) -> String {
        self.lines.concat()
    }
}

/// Returns the cell index of a marker line, or `None` if `line` is not a
/// numbered marker.
pub fn marker_index(line: &str) -> Option<usize> {
    line.strip_prefix(CELL_MARKER_PREFIX)?
        .trim()
        .parse()
        .ok()
}

/// Picks the lines to compare out of `lines`, starting at cell `start_cell`.
///
/// `path` only appears in warnings. A `start_cell` of zero, a file without
/// numbered markers, or a `start_cell` past the highest marker all select
/// the whole file. When no marker equals `start_cell`, the next higher
/// marker present is used.
pub fn select_lines(path: &Path, mut lines: Vec<String>, start_cell: usize) -> Snippet {
    if start_cell == 0 {
        return Snippet::new(lines);
    }

    let markers: Vec<(usize, usize)> = lines
        .iter()
        .enumerate()
        .filter_map(|(pos, line)| marker_index(line).map(|idx| (pos, idx)))
        .collect();

    let Some(highest) = markers.iter().map(|&(_, idx)| idx).max() else {
        tracing::warn!("Cells not numbered in file {}, returning whole file", path.display());
        return Snippet::new(lines);
    };

    if highest < start_cell {
        tracing::warn!(
            "Cell number {start_cell} not found in file {}, highest number: {highest}; \
             returning whole file",
            path.display()
        );
        return Snippet::new(lines);
    }

    // `highest >= start_cell`, so some index in the range is always present.
    let start = (start_cell..=highest)
        .find_map(|wanted| {
            markers
                .iter()
                .find(|&&(_, idx)| idx == wanted)
                .map(|&(pos, _)| pos)
        })
        .unwrap_or(0);

    Snippet::new(lines.split_off(start))
}

/// Reads `path` and selects the lines to compare from cell `start_cell`.
pub fn select_snippet(path: &Path, start_cell: usize) -> Result<Snippet> {
    let lines = read_lines(path)?;
    Ok(select_lines(path, lines, start_cell))
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.split_inclusive('\n').map(str::to_owned).collect()
    }

    fn path() -> PathBuf {
        PathBuf::from("alice_1/Lab1_zad1.py")
    }

    const SCRIPT: &str = "#cell 0\nimport os\n\n\n#cell 2\nx = 1\n\n\n#cell 5\nprint(x)\n\n\n";

    #[test]
    fn start_zero_returns_everything() {
        let snippet = select_lines(&path(), lines(SCRIPT), 0);
        assert_eq!(snippet.text(), SCRIPT);
    }

    #[test]
    fn exact_marker_is_used() {
        let snippet = select_lines(&path(), lines(SCRIPT), 2);
        assert_eq!(snippet.text(), "#cell 2\nx = 1\n\n\n#cell 5\nprint(x)\n\n\n");
    }

    #[test]
    fn gap_in_numbering_moves_to_next_marker() {
        let snippet = select_lines(&path(), lines(SCRIPT), 3);
        assert_eq!(snippet.text(), "#cell 5\nprint(x)\n\n\n");
    }

    #[test]
    fn start_past_highest_marker_returns_everything() {
        let snippet = select_lines(&path(), lines(SCRIPT), 6);
        assert_eq!(snippet.text(), SCRIPT);
    }

    #[test]
    fn unnumbered_file_returns_everything() {
        let text = "a = 1\nb = 2\n";
        let snippet = select_lines(&path(), lines(text), 1);
        assert_eq!(snippet.text(), text);
    }

    #[test]
    fn marker_match_is_exact_not_prefix() {
        let text = "#cell 12\nlate\n#cell 1\nearly\n";
        let snippet = select_lines(&path(), lines(text), 1);
        assert_eq!(snippet.text(), "#cell 1\nearly\n");
    }

    #[test]
    fn multi_digit_markers_count_toward_highest() {
        let text = "#cell 3\na\n#cell 10\nb\n";
        let snippet = select_lines(&path(), lines(text), 9);
        assert_eq!(snippet.text(), "#cell 10\nb\n");
    }

    #[test]
    fn marker_index_parses_only_numbered_markers() {
        assert_eq!(marker_index("#cell 4\n"), Some(4));
        assert_eq!(marker_index("#cell 17"), Some(17));
        assert_eq!(marker_index("#cell\n"), None);
        assert_eq!(marker_index("# cell 4\n"), None);
        assert_eq!(marker_index("x = 1\n"), None);
    }

    #[test]
    fn selection_is_idempotent() {
        let first = select_lines(&path(), lines(SCRIPT), 2);
        let second = select_lines(&path(), lines(SCRIPT), 2);
        assert_eq!(first, second);
    }
}
