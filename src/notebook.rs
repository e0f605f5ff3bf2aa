#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Notebook parsing and extraction of code cells into plain scripts.

use std::{
    fmt::Write as _,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use serde::Deserialize;
use thiserror::Error;

use crate::{
    constants::{CELL_MARKER_PREFIX, MODERN_NBFORMAT, NOTEBOOK_EXTENSION, SCRIPT_EXTENSION},
    util::find_files_in,
};

/// Errors raised while reading a notebook document.
#[derive(Error, Debug)]
pub enum NotebookError {
    /// The document could not be read from disk.
    #[error("Could not read notebook {}: {source}", path.display())]
    Read {
        /// Path of the offending document.
        path:   PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },

    /// The document is not valid JSON or does not match the expected schema.
    #[error("Could not parse notebook {}: {source}", path.display())]
    Parse {
        /// Path of the offending document.
        path:   PathBuf,
        /// Underlying JSON error.
        source: serde_json::Error,
    },

    /// A legacy document without any worksheet to take cells from.
    #[error("Notebook {} (nbformat {nbformat}) has no worksheets", path.display())]
    NoWorksheets {
        /// Path of the offending document.
        path:     PathBuf,
        /// Declared format version.
        nbformat: u32,
    },
}

/// Cell text, stored either as a list of lines or as one string.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum CellText {
    /// One entry per line, each usually ending in `\n`.
    Lines(Vec<String>),
    /// The whole cell as a single string.
    Joined(String),
}

impl Default for CellText {
    fn default() -> Self {
        CellText::Lines(Vec::new())
    }
}

impl CellText {
    /// Returns the text as a list of lines.
    fn into_lines(self) -> Vec<String> {
        match self {
            CellText::Lines(lines) => lines,
            CellText::Joined(text) => text.split_inclusive('\n').map(str::to_owned).collect(),
        }
    }
}

/// Only the version field, read before committing to a schema.
#[derive(Deserialize)]
struct Header {
    /// Major notebook format version.
    nbformat: u32,
}

/// A cell in the flat (`nbformat >= 4`) layout.
#[derive(Deserialize)]
struct ModernCell {
    /// `code`, `markdown`, `raw`, ...
    cell_type: String,
    /// Cell text.
    #[serde(default)]
    source:    CellText,
}

/// A cell in the worksheet (`nbformat < 4`) layout.
#[derive(Deserialize)]
struct LegacyCell {
    /// `code`, `markdown`, `heading`, ...
    cell_type: String,
    /// Code cells keep their text in `input`.
    #[serde(default)]
    input:     CellText,
}

/// Top level of a modern document.
#[derive(Deserialize)]
struct ModernDocument {
    /// Cells in display order.
    cells: Vec<ModernCell>,
}

/// One worksheet of a legacy document.
#[derive(Deserialize)]
struct Worksheet {
    /// Cells in display order.
    #[serde(default)]
    cells: Vec<LegacyCell>,
}

/// Top level of a legacy document.
#[derive(Deserialize)]
struct LegacyDocument {
    /// Only the first worksheet is used.
    #[serde(default)]
    worksheets: Vec<Worksheet>,
}

/// A single notebook cell, normalised across both schemas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cell {
    /// Position among all cells of the document.
    pub index:   usize,
    /// Whether this is a code cell.
    pub is_code: bool,
    /// Source lines, verbatim.
    pub lines:   Vec<String>,
}

/// A parsed notebook document, tagged by schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notebook {
    /// `nbformat >= 4`: cells live in a flat `cells` list.
    Modern {
        /// Declared format version.
        nbformat: u32,
        /// All cells, in order.
        cells:    Vec<Cell>,
    },
    /// `nbformat < 4`: cells live in the first worksheet.
    Legacy {
        /// Declared format version.
        nbformat: u32,
        /// All cells of the first worksheet, in order.
        cells:    Vec<Cell>,
    },
}

impl Notebook {
    /// Parses a notebook from its JSON text. `path` is only used in errors.
    pub fn parse(path: &Path, json: &str) -> Result<Self, NotebookError> {
        let parse_err = |source| NotebookError::Parse {
            path: path.to_path_buf(),
            source,
        };

        let Header { nbformat } = serde_json::from_str(json).map_err(parse_err)?;

        if nbformat >= MODERN_NBFORMAT {
            let doc: ModernDocument = serde_json::from_str(json).map_err(parse_err)?;
            let cells = doc
                .cells
                .into_iter()
                .enumerate()
                .map(|(index, c)| Cell {
                    index,
                    is_code: c.cell_type == "code",
                    lines: c.source.into_lines(),
                })
                .collect();
            Ok(Notebook::Modern { nbformat, cells })
        } else {
            let doc: LegacyDocument = serde_json::from_str(json).map_err(parse_err)?;
            let worksheet =
                doc.worksheets
                    .into_iter()
                    .next()
                    .ok_or_else(|| NotebookError::NoWorksheets {
                        path: path.to_path_buf(),
                        nbformat,
                    })?;
            let cells = worksheet
                .cells
                .into_iter()
                .enumerate()
                .map(|(index, c)| Cell {
                    index,
                    is_code: c.cell_type == "code",
                    lines: c.input.into_lines(),
                })
                .collect();
            Ok(Notebook::Legacy { nbformat, cells })
        }
    }

    /// Reads and parses the notebook at `path`.
    pub fn from_path(path: &Path) -> Result<Self, NotebookError> {
        let json = std::fs::read_to_string(path).map_err(|source| NotebookError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(path, &json)
    }

    /// Declared format version.
    pub fn nbformat(&self) -> u32 {
        match self {
            Notebook::Modern { nbformat, .. } | Notebook::Legacy { nbformat, .. } => *nbformat,
        }
    }

    /// All cells, whatever their type.
    pub fn cells(&self) -> &[Cell] {
        match self {
            Notebook::Modern { cells, .. } | Notebook::Legacy { cells, .. } => cells,
        }
    }

    /// Code cells only, keeping their original indices.
    pub fn code_cells(&self) -> impl Iterator<Item = &Cell> {
        self.cells().iter().filter(|c| c.is_code)
    }

    /// Renders the code cells as a script, each preceded by its marker line
    /// and followed by a blank line.
    pub fn to_script(&self) -> String {
        let mut script = String::new();
        for cell in self.code_cells() {
            let _ = writeln!(script, "{CELL_MARKER_PREFIX} {}", cell.index);
            for line in &cell.lines {
                script.push_str(line);
            }
            script.push_str("\n\n");
        }
        script
    }
}

/// Path of the script written next to `notebook`.
pub fn script_path(notebook: &Path) -> PathBuf {
    notebook.with_extension(SCRIPT_EXTENSION)
}

/// Converts one notebook into a sibling script and returns the script's path.
pub fn convert_notebook(path: &Path) -> Result<PathBuf> {
    tracing::info!("Converting file {}...", path.display());

    let notebook = Notebook::from_path(path)?;
    let out = script_path(path);
    std::fs::write(&out, notebook.to_script())
        .with_context(|| format!("Could not write {}", out.display()))?;

    Ok(out)
}

/// Every notebook below `roots`, in root order, skipping hidden directories.
pub fn find_notebooks(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    find_files_in(NOTEBOOK_EXTENSION, roots)
}

/// Finds every notebook under `roots` and converts it. The first failure
/// aborts the remaining conversions.
pub fn convert_all(roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let notebooks = find_notebooks(roots)?;
    if notebooks.is_empty() {
        tracing::warn!("No .{NOTEBOOK_EXTENSION} files found to convert");
    }

    notebooks.iter().map(|nb| convert_notebook(nb.as_path())).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    const MODERN: &str = r##"{
        "nbformat": 4,
        "nbformat_minor": 5,
        "metadata": {},
        "cells": [
            {"cell_type": "markdown", "metadata": {}, "source": ["# Title\n"]},
            {"cell_type": "code", "metadata": {}, "outputs": [], "source": ["x = 1\n", "print(x)"]},
            {"cell_type": "markdown", "metadata": {}, "source": "notes"},
            {"cell_type": "code", "metadata": {}, "outputs": [], "source": "y = 2"}
        ]
    }"##;

    const LEGACY: &str = r#"{
        "nbformat": 3,
        "nbformat_minor": 0,
        "metadata": {},
        "worksheets": [
            {"cells": [
                {"cell_type": "code", "input": ["a = 1\n", "b = 2"], "language": "python"},
                {"cell_type": "heading", "level": 1, "source": ["Part 2"]},
                {"cell_type": "code", "input": ["c = a + b"], "language": "python"}
            ]}
        ]
    }"#;

    fn path() -> PathBuf {
        PathBuf::from("test.ipynb")
    }

    #[test]
    fn modern_schema_emits_one_marker_per_code_cell() {
        let nb = Notebook::parse(&path(), MODERN).expect("parse");
        assert!(matches!(nb, Notebook::Modern { .. }));
        assert_eq!(nb.nbformat(), 4);
        assert_eq!(nb.to_script(), "#cell 1\nx = 1\nprint(x)\n\n#cell 3\ny = 2\n\n");
    }

    #[test]
    fn legacy_schema_reads_first_worksheet_input() {
        let nb = Notebook::parse(&path(), LEGACY).expect("parse");
        assert!(matches!(nb, Notebook::Legacy { .. }));
        assert_eq!(nb.cells().len(), 3);
        assert_eq!(nb.to_script(), "#cell 0\na = 1\nb = 2\n\n#cell 2\nc = a + b\n\n");
    }

    #[test]
    fn non_code_cells_leave_no_marker() {
        let nb = Notebook::parse(&path(), MODERN).expect("parse");
        let script = nb.to_script();
        let markers: Vec<_> = script
            .lines()
            .filter(|l| l.starts_with(CELL_MARKER_PREFIX))
            .collect();
        assert_eq!(markers, vec!["#cell 1", "#cell 3"]);
        assert!(!script.contains("Title"));
        assert!(!script.contains("notes"));
    }

    #[test]
    fn legacy_without_worksheets_is_an_error() {
        let err = Notebook::parse(&path(), r#"{"nbformat": 3, "worksheets": []}"#)
            .expect_err("no worksheets");
        assert!(matches!(err, NotebookError::NoWorksheets { nbformat: 3, .. }));
    }

    #[test]
    fn malformed_json_is_a_parse_error() {
        let err = Notebook::parse(&path(), "{ not json").expect_err("malformed");
        assert!(matches!(err, NotebookError::Parse { .. }));
    }

    #[test]
    fn modern_without_cells_is_a_parse_error() {
        let err = Notebook::parse(&path(), r#"{"nbformat": 4}"#).expect_err("no cells");
        assert!(matches!(err, NotebookError::Parse { .. }));
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let err = Notebook::from_path(Path::new("no/such/dir/Lab1_zad1.ipynb"))
            .expect_err("missing file");
        assert!(matches!(err, NotebookError::Read { .. }));
    }

    #[test]
    fn script_path_swaps_extension() {
        assert_eq!(
            script_path(Path::new("dir/Lab1_zad1.ipynb")),
            PathBuf::from("dir/Lab1_zad1.py")
        );
    }
}
