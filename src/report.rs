#![warn(missing_docs)]
#![warn(clippy::missing_docs_in_private_items)]

//! Writing comparison results: matrix CSV, heatmap, pairwise diffs and a
//! terminal summary.

use std::{
    iter,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result, anyhow};
use plotters::{
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};
use tabled::{
    builder::Builder,
    settings::{Alignment, Modify, Panel, Style, object::Rows},
};

use crate::{
    compare::{Comparison, SimilarityMatrix},
    constants::{HEATMAP_CELL_PX, HEATMAP_MARGIN_PX, SIMILARITY_SUFFIX},
};

/// Stops of the heatmap colour ramp, from ratio 0 (light) to ratio 1 (dark).
const RAMP: [(u8, u8, u8); 6] = [
    (252, 253, 191),
    (254, 159, 109),
    (222, 73, 104),
    (140, 41, 129),
    (59, 15, 112),
    (0, 0, 4),
];

/// Padding on the sides of the heatmap that carry no labels.
const PADDING_PX: u32 = 40;

/// Width of the colour legend, including its labels.
const LEGEND_PX: u32 = 90;

/// Paths of everything written for one exercise.
#[derive(Debug, Clone, Default)]
pub struct Report {
    /// Matrix as CSV.
    pub csv:     PathBuf,
    /// Rendered heatmap.
    pub heatmap: PathBuf,
    /// One diff file per compared pair.
    pub diffs:   Vec<PathBuf>,
}

/// Path of an exercise's matrix or heatmap, e.g. `Lab1_zad1_similarity.csv`.
fn similarity_path(save_dir: &Path, label: &str, extension: &str) -> PathBuf {
    save_dir.join(format!("{label}_{SIMILARITY_SUFFIX}.{extension}"))
}

/// Writes the matrix as CSV: an empty corner cell and the names as header,
/// then one row per name.
pub fn write_csv(matrix: &SimilarityMatrix, path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(path)
        .with_context(|| format!("Could not create {}", path.display()))?;

    wtr.write_record(iter::once("").chain(matrix.names().iter().map(String::as_str)))?;
    for (name, row) in matrix.rows() {
        wtr.write_record(iter::once(name.to_string()).chain(row.iter().map(|v| format!("{v:?}"))))?;
    }
    wtr.flush()
        .with_context(|| format!("Could not write {}", path.display()))?;

    Ok(())
}

/// Colour of a cell holding `value`, clamped to `[0, 1]`.
pub fn ramp_color(value: f64) -> RGBColor {
    let value = value.clamp(0.0, 1.0);
    let scaled = value * (RAMP.len() - 1) as f64;
    let lower = (scaled.floor() as usize).min(RAMP.len() - 2);
    let t = scaled - lower as f64;

    let mix = |from: u8, to: u8| (from as f64 + (to as f64 - from as f64) * t).round() as u8;
    let (from, to) = (RAMP[lower], RAMP[lower + 1]);
    RGBColor(mix(from.0, to.0), mix(from.1, to.1), mix(from.2, to.2))
}

/// Renders the matrix as an annotated heatmap in SVG.
pub fn render_heatmap(matrix: &SimilarityMatrix, title: &str, path: &Path) -> Result<()> {
    let n = matrix.len() as u32;
    let cell = HEATMAP_CELL_PX;
    let grid = n * cell;
    let width = HEATMAP_MARGIN_PX + grid + LEGEND_PX + PADDING_PX;
    let height = PADDING_PX + grid.max(cell) + HEATMAP_MARGIN_PX;

    let draw_err = |e| anyhow!("Could not draw heatmap {}: {e}", path.display());

    let root = SVGBackend::new(path, (width, height)).into_drawing_area();
    root.fill(&WHITE).map_err(draw_err)?;

    let left = HEATMAP_MARGIN_PX as i32;
    let top = PADDING_PX as i32;
    let step = cell as i32;
    let centered = Pos::new(HPos::Center, VPos::Center);
    let label_style = ("sans-serif", 14).into_font().color(&BLACK);

    root.draw(&Text::new(
        title.to_string(),
        (left + grid as i32 / 2, top / 2),
        ("sans-serif", 18).into_font().color(&BLACK).pos(centered),
    ))
    .map_err(draw_err)?;

    let names = matrix.names();
    for (r, (name, row)) in matrix.rows().enumerate() {
        let y = top + r as i32 * step;

        root.draw(&Text::new(
            name.to_string(),
            (left - 8, y + step / 2),
            label_style.pos(Pos::new(HPos::Right, VPos::Center)),
        ))
        .map_err(draw_err)?;

        for (c, value) in row.iter().enumerate() {
            let x = left + c as i32 * step;
            root.draw(&Rectangle::new(
                [(x, y), (x + step, y + step)],
                ramp_color(*value).filled(),
            ))
            .map_err(draw_err)?;

            let ink = if *value > 0.5 { WHITE } else { BLACK };
            root.draw(&Text::new(
                format!("{value:.2}"),
                (x + step / 2, y + step / 2),
                ("sans-serif", 14).into_font().color(&ink).pos(centered),
            ))
            .map_err(draw_err)?;
        }
    }

    let bottom = top + grid as i32;
    for (c, name) in names.iter().enumerate() {
        let x = left + c as i32 * step + step / 2;
        root.draw(&Text::new(
            name.clone(),
            (x, bottom + 8),
            label_style.pos(Pos::new(HPos::Center, VPos::Top)),
        ))
        .map_err(draw_err)?;
    }

    // Legend: a vertical bar running from 1.0 at the top to 0.0 at the bottom.
    let legend_x = left + grid as i32 + 24;
    let legend_h = grid.max(cell) as i32;
    let bands = 20;
    for band in 0..bands {
        let y0 = top + band * legend_h / bands;
        let y1 = top + (band + 1) * legend_h / bands;
        let value = 1.0 - (band as f64 + 0.5) / bands as f64;
        root.draw(&Rectangle::new(
            [(legend_x, y0), (legend_x + 16, y1)],
            ramp_color(value).filled(),
        ))
        .map_err(draw_err)?;
    }
    for (value, y) in [(1.0, top), (0.0, top + legend_h)] {
        root.draw(&Text::new(
            format!("{value:.1}"),
            (legend_x + 22, y),
            label_style.pos(Pos::new(HPos::Left, VPos::Center)),
        ))
        .map_err(draw_err)?;
    }

    root.present().map_err(draw_err)?;
    Ok(())
}

/// Writes every pairwise diff of `comparison` to its own file.
pub fn write_diffs(comparison: &Comparison, save_dir: &Path) -> Result<Vec<PathBuf>> {
    comparison
        .diffs
        .iter()
        .map(|diff| {
            let path = save_dir.join(diff.file_name(&comparison.label));
            std::fs::write(&path, &diff.text)
                .with_context(|| format!("Could not write {}", path.display()))?;
            Ok(path)
        })
        .collect()
}

/// The matrix as a table for the terminal, with ratios to two decimals.
pub fn summary_table(comparison: &Comparison) -> String {
    let matrix = &comparison.matrix;
    let mut builder = Builder::default();
    builder.push_record(iter::once(String::new()).chain(matrix.names().iter().cloned()));
    for (name, row) in matrix.rows() {
        builder.push_record(
            iter::once(name.to_string()).chain(row.iter().map(|v| format!("{v:.2}"))),
        );
    }

    builder
        .build()
        .with(Panel::header(format!("Similarity for {}", comparison.label)))
        .with(
            Modify::new(Rows::first())
                .with(Alignment::center())
                .with(Alignment::center_vertical()),
        )
        .with(Style::modern())
        .to_string()
}

/// Writes the CSV, heatmap and diffs of one exercise into `save_dir`.
pub fn write_report(comparison: &Comparison, save_dir: &Path) -> Result<Report> {
    let csv = similarity_path(save_dir, &comparison.label, "csv");
    write_csv(&comparison.matrix, &csv)?;

    let heatmap = similarity_path(save_dir, &comparison.label, "svg");
    render_heatmap(&comparison.matrix, &comparison.label, &heatmap)?;

    let diffs = write_diffs(comparison, save_dir)?;

    tracing::info!(
        "{}: wrote {}, {} and {} diff file(s)",
        comparison.label,
        csv.display(),
        heatmap.display(),
        diffs.len()
    );

    Ok(Report {
        csv,
        heatmap,
        diffs,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ramp_runs_from_light_to_dark() {
        assert_eq!(ramp_color(0.0), RGBColor(252, 253, 191));
        assert_eq!(ramp_color(1.0), RGBColor(0, 0, 4));
        assert_eq!(ramp_color(-3.0), ramp_color(0.0));
        assert_eq!(ramp_color(7.0), ramp_color(1.0));
    }

    #[test]
    fn summary_table_lists_every_name() {
        let mut matrix = SimilarityMatrix::new(["alice", "bob"]);
        matrix.set("alice", "bob", 0.8);
        let comparison = Comparison {
            label: "Lab1_zad1".into(),
            matrix,
            diffs: Vec::new(),
        };

        let table = summary_table(&comparison);
        assert!(table.contains("Similarity for Lab1_zad1"));
        assert!(table.contains("alice"));
        assert!(table.contains("bob"));
        assert!(table.contains("0.80"));
    }
}
