#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

use std::path::{Component, Path, PathBuf};

use anyhow::{Context, Result};
use glob::{MatchOptions, Pattern, glob_with};
use itertools::Itertools;

/// Strips an optional leading dot so `.py` and `py` name the same file type.
pub fn normalize_extension(extension: &str) -> &str {
    extension.trim_start_matches('.')
}

/// A glob utility function to find paths to files with certain extension,
/// searching every directory below `root_dir`. Hidden files and anything
/// inside a hidden directory (e.g. `.ipynb_checkpoints/`) are skipped.
///
/// * `extension`: the file extension to find paths for, with or without dot
/// * `root_dir`: the root directory where search starts
pub fn find_files(extension: &str, root_dir: &Path) -> Result<Vec<PathBuf>> {
    let root = root_dir
        .to_str()
        .with_context(|| format!("Could not convert {} to string", root_dir.display()))?;

    let mut pattern = PathBuf::from(Pattern::escape(root));
    pattern.push("**");
    pattern.push(format!("*.{}", normalize_extension(extension)));
    let pattern = pattern
        .to_str()
        .context("Could not convert glob pattern to string")?
        .to_string();

    let options = MatchOptions {
        require_literal_leading_dot: true,
        ..MatchOptions::new()
    };

    Ok(glob_with(&pattern, options)
        .with_context(|| format!("Could not create glob from {pattern}"))?
        .filter_map(Result::ok)
        .filter(|p| p.is_file() && !is_hidden_below(root_dir, p))
        .collect())
}

/// Whether any component of `path` below `root` starts with a dot.
fn is_hidden_below(root: &Path, path: &Path) -> bool {
    path.strip_prefix(root)
        .unwrap_or(path)
        .components()
        .any(|c| matches!(c, Component::Normal(name) if name.to_string_lossy().starts_with('.')))
}

/// Runs [`find_files`] over each root in order and concatenates the results.
/// A file reachable from several roots is kept once, at its first position.
pub fn find_files_in(extension: &str, roots: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();
    for root in roots {
        files.extend(find_files(extension, root)?);
    }
    Ok(files.into_iter().unique().collect())
}

/// Splits text into lines, keeping each line's terminator. `\r\n` and lone
/// `\r` are read as `\n`, so the same file saved on different systems gives
/// the same lines.
pub fn split_lines(text: &str) -> Vec<String> {
    text.replace("\r\n", "\n")
        .replace('\r', "\n")
        .split_inclusive('\n')
        .map(str::to_owned)
        .collect()
}

/// Reads a text file into lines as [`split_lines`] does.
pub fn read_lines(path: &Path) -> Result<Vec<String>> {
    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("Could not read {}", path.display()))?;

    Ok(split_lines(&contents))
}
