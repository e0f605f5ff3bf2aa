#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

/// Prefix of the marker line written before every extracted code cell.
/// The cell index follows after a single space, e.g. `#cell 3`.
pub const CELL_MARKER_PREFIX: &str = "#cell";

/// Extension of notebook documents picked up by the extractor.
pub const NOTEBOOK_EXTENSION: &str = "ipynb";

/// Extension of the scripts the extractor writes.
pub const SCRIPT_EXTENSION: &str = "py";

/// File type compared when none is given on the command line.
pub const DEFAULT_FILETYPE: &str = ".py";

/// First `nbformat` version that stores cells in a flat `cells` list.
pub const MODERN_NBFORMAT: u32 = 4;

/// Candidates shorter than this never have popular elements discarded by
/// the sequence matcher.
pub const AUTOJUNK_MIN_LEN: usize = 200;

/// Lines of unchanged context around each hunk of a pairwise diff.
pub const DIFF_CONTEXT_RADIUS: usize = 3;

/// Suffix shared by the matrix CSV and heatmap of an exercise group.
pub const SIMILARITY_SUFFIX: &str = "similarity";

/// Pixel size of one heatmap cell.
pub const HEATMAP_CELL_PX: u32 = 72;

/// Pixel margin reserved for axis labels around the heatmap grid.
pub const HEATMAP_MARGIN_PX: u32 = 140;
