//! Diagnostic chart rendering.
//!
//! Histograms, geographic scatter plots, top-N category bar charts, and
//! the confusion-matrix heatmap, rendered with plotters into PNG files
//! under a configured output directory.
//!
//! The visualizer is stateless: every render returns the plot's
//! identifier and file path instead of accumulating a history, so
//! callers own the record of what was drawn. Subsampling is seeded and
//! reproducible.

use crate::error::{LearnError, Result};
use crate::types::ConfusionMatrix;
use plotters::prelude::*;
use polars::prelude::*;
use rand::SeedableRng;
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::path::PathBuf;
use tracing::debug;

/// Seed for every reproducible subsample.
pub const SAMPLE_SEED: u64 = 42;

/// Default number of histogram bins.
pub const DEFAULT_HISTOGRAM_BINS: usize = 30;

/// Default point budget for the geographic scatter plot.
pub const DEFAULT_SCATTER_SAMPLE: usize = 5000;

/// A rendered chart: its identifier and the file it was written to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlotArtifact {
    pub id: String,
    pub path: PathBuf,
}

/// Renders diagnostic charts as PNG files.
pub struct Visualizer {
    out_dir: PathBuf,
}

impl Visualizer {
    /// Create a visualizer writing into `out_dir` (created on demand).
    pub fn new(out_dir: impl Into<PathBuf>) -> Self {
        Self {
            out_dir: out_dir.into(),
        }
    }

    /// Histogram of a numeric column.
    ///
    /// Missing cells are dropped; an optional seeded subsample bounds the
    /// amount of data considered. Fails with
    /// [`LearnError::InvalidArgument`] when the column is absent or not
    /// numeric, and with [`LearnError::EmptyInput`] when no values remain
    /// to plot.
    pub fn histogram(
        &self,
        df: &DataFrame,
        column: &str,
        bins: usize,
        sample: Option<usize>,
    ) -> Result<PlotArtifact> {
        if bins == 0 {
            return Err(LearnError::InvalidArgument(
                "bins must be at least 1".to_string(),
            ));
        }
        let series = numeric_column(df, column)?;
        let mut values: Vec<f64> = series
            .f64()?
            .into_iter()
            .flatten()
            .filter(|v| v.is_finite())
            .collect();
        if let Some(n) = sample {
            if n < values.len() {
                let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
                values = values.choose_multiple(&mut rng, n).copied().collect();
            }
        }
        if values.is_empty() {
            return Err(LearnError::EmptyInput(format!(
                "column '{column}' has no data to plot"
            )));
        }

        let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        let span = if max > min { max - min } else { 1.0 };
        let bin_width = span / bins as f64;
        let mut counts = vec![0u32; bins];
        for value in &values {
            let bin = (((value - min) / bin_width) as usize).min(bins - 1);
            counts[bin] += 1;
        }
        let max_count = counts.iter().copied().max().unwrap_or(0);

        let id = format!("hist_{column}");
        let path = self.target_path(&id)?;
        {
            let root = BitMapBackend::new(&path, (800, 500)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            let mut chart = ChartBuilder::on(&root)
                .caption(format!("Histogram: {column}"), ("sans-serif", 24))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(min..(min + span), 0u32..(max_count + 1))
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .x_desc(column)
                .y_desc("Frequency")
                .draw()
                .map_err(render_err)?;
            chart
                .draw_series(counts.iter().enumerate().map(|(i, &count)| {
                    let x0 = min + bin_width * i as f64;
                    let x1 = x0 + bin_width;
                    Rectangle::new([(x0, 0), (x1, count)], BLUE.mix(0.5).filled())
                }))
                .map_err(render_err)?;
            root.present().map_err(render_err)?;
        }

        debug!("Rendered {} ({} values)", id, values.len());
        Ok(PlotArtifact { id, path })
    }

    /// Geographic scatter of longitude/latitude pairs, optionally colored
    /// by a category column and subsampled (seeded, reproducible).
    pub fn scatter_world(
        &self,
        df: &DataFrame,
        lon_col: &str,
        lat_col: &str,
        color_by: Option<&str>,
        sample: Option<usize>,
    ) -> Result<PlotArtifact> {
        let lon = numeric_column(df, lon_col)?;
        let lat = numeric_column(df, lat_col)?;
        let categories: Option<&StringChunked> = match color_by {
            Some(name) => Some(string_column(df, name)?),
            None => None,
        };

        let lon_ca = lon.f64()?;
        let lat_ca = lat.f64()?;
        let mut points: Vec<(f64, f64, Option<String>)> = Vec::new();
        for i in 0..df.height() {
            if let (Some(x), Some(y)) = (lon_ca.get(i), lat_ca.get(i)) {
                let category = categories
                    .map(|ca| ca.get(i).unwrap_or("(missing)").to_string());
                points.push((x, y, category));
            }
        }
        if let Some(n) = sample {
            if n < points.len() {
                let mut rng = StdRng::seed_from_u64(SAMPLE_SEED);
                points = points.choose_multiple(&mut rng, n).cloned().collect();
            }
        }
        if points.is_empty() {
            return Err(LearnError::EmptyInput(
                "no coordinate pairs to plot".to_string(),
            ));
        }

        // stable palette assignment: category -> color index
        let mut palette: HashMap<&str, usize> = HashMap::new();
        for (_, _, category) in &points {
            if let Some(c) = category.as_deref() {
                let next = palette.len();
                palette.entry(c).or_insert(next);
            }
        }

        let id = "scatter_world".to_string();
        let path = self.target_path(&id)?;
        {
            let root = BitMapBackend::new(&path, (1200, 600)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            let mut chart = ChartBuilder::on(&root)
                .caption("Airport positions (plate carree)", ("sans-serif", 24))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(-180.0..180.0, -90.0..90.0)
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .x_desc(lon_col)
                .y_desc(lat_col)
                .draw()
                .map_err(render_err)?;
            chart
                .draw_series(points.iter().map(|(x, y, category)| {
                    let color = match category.as_deref().and_then(|c| palette.get(c)) {
                        Some(&idx) => Palette99::pick(idx).mix(0.7),
                        None => BLUE.mix(0.6),
                    };
                    Circle::new((*x, *y), 2, color.filled())
                }))
                .map_err(render_err)?;
            root.present().map_err(render_err)?;
        }

        debug!("Rendered {} ({} points)", id, points.len());
        Ok(PlotArtifact { id, path })
    }

    /// Bar chart of the `top_n` most frequent values of a category
    /// column, ranked by count descending (first appearance on ties).
    pub fn countplot_top_countries(
        &self,
        df: &DataFrame,
        country_col: &str,
        top_n: usize,
    ) -> Result<PlotArtifact> {
        let ca = string_column(df, country_col)?;

        let mut counts: HashMap<&str, (u32, usize)> = HashMap::new();
        for (idx, cell) in ca.into_iter().enumerate() {
            if let Some(value) = cell {
                let entry = counts.entry(value).or_insert((0, idx));
                entry.0 += 1;
            }
        }
        let mut ranked: Vec<(&str, u32, usize)> = counts
            .into_iter()
            .map(|(value, (count, first_seen))| (value, count, first_seen))
            .collect();
        ranked.sort_by(|a, b| b.1.cmp(&a.1).then(a.2.cmp(&b.2)));
        ranked.truncate(top_n);
        if ranked.is_empty() {
            return Err(LearnError::EmptyInput(format!(
                "column '{country_col}' has no values to count"
            )));
        }

        let names: Vec<String> = ranked.iter().map(|(v, _, _)| v.to_string()).collect();
        let max_count = ranked.iter().map(|(_, n, _)| *n).max().unwrap_or(0);

        let id = "count_countries".to_string();
        let path = self.target_path(&id)?;
        {
            let root = BitMapBackend::new(&path, (1000, 500)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            let mut chart = ChartBuilder::on(&root)
                .caption(
                    format!("Top {} values of {}", ranked.len(), country_col),
                    ("sans-serif", 24),
                )
                .margin(10)
                .x_label_area_size(80)
                .y_label_area_size(50)
                .build_cartesian_2d(0i32..ranked.len() as i32, 0u32..(max_count + 1))
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .x_labels(names.len())
                .x_label_formatter(&|x: &i32| {
                    names
                        .get(*x as usize)
                        .cloned()
                        .unwrap_or_default()
                })
                .y_desc("Count")
                .draw()
                .map_err(render_err)?;
            chart
                .draw_series(ranked.iter().enumerate().map(|(i, (_, count, _))| {
                    Rectangle::new(
                        [(i as i32, 0), (i as i32 + 1, *count)],
                        GREEN.mix(0.6).filled(),
                    )
                }))
                .map_err(render_err)?;
            root.present().map_err(render_err)?;
        }

        debug!("Rendered {} ({} bars)", id, names.len());
        Ok(PlotArtifact { id, path })
    }

    /// Annotated 2x2 confusion-matrix heatmap.
    pub fn confusion_heatmap(&self, confusion: &ConfusionMatrix) -> Result<PlotArtifact> {
        let total = confusion.total();
        if total == 0 {
            return Err(LearnError::EmptyInput(
                "confusion matrix has no observations".to_string(),
            ));
        }
        let max_count = confusion
            .counts
            .iter()
            .flatten()
            .copied()
            .max()
            .unwrap_or(0)
            .max(1);

        let id = "confusion_matrix".to_string();
        let path = self.target_path(&id)?;
        {
            let root = BitMapBackend::new(&path, (500, 450)).into_drawing_area();
            root.fill(&WHITE).map_err(render_err)?;
            let mut chart = ChartBuilder::on(&root)
                .caption("Confusion matrix", ("sans-serif", 24))
                .margin(10)
                .x_label_area_size(40)
                .y_label_area_size(50)
                .build_cartesian_2d(0.0..2.0, 0.0..2.0)
                .map_err(render_err)?;
            chart
                .configure_mesh()
                .disable_x_mesh()
                .disable_y_mesh()
                .x_desc("Predicted")
                .y_desc("True")
                .draw()
                .map_err(render_err)?;

            let cells = (0..2usize).flat_map(|actual| {
                (0..2usize).map(move |predicted| (actual, predicted))
            });
            chart
                .draw_series(cells.clone().map(|(actual, predicted)| {
                    let count = confusion.counts[actual][predicted];
                    let intensity = 0.15 + 0.7 * (count as f64 / max_count as f64);
                    Rectangle::new(
                        [
                            (predicted as f64, actual as f64),
                            (predicted as f64 + 1.0, actual as f64 + 1.0),
                        ],
                        BLUE.mix(intensity).filled(),
                    )
                }))
                .map_err(render_err)?;
            chart
                .draw_series(cells.map(|(actual, predicted)| {
                    let count = confusion.counts[actual][predicted];
                    Text::new(
                        format!("{count}"),
                        (predicted as f64 + 0.45, actual as f64 + 0.5),
                        ("sans-serif", 26).into_font(),
                    )
                }))
                .map_err(render_err)?;
            root.present().map_err(render_err)?;
        }

        debug!("Rendered {}", id);
        Ok(PlotArtifact { id, path })
    }

    fn target_path(&self, id: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.out_dir)?;
        Ok(self.out_dir.join(format!("{id}.png")))
    }
}

fn numeric_column(df: &DataFrame, name: &str) -> Result<Series> {
    let column = df
        .column(name)
        .map_err(|_| LearnError::InvalidArgument(format!("no column '{name}'")))?;
    if !matches!(
        column.dtype(),
        DataType::Int8
            | DataType::Int16
            | DataType::Int32
            | DataType::Int64
            | DataType::UInt8
            | DataType::UInt16
            | DataType::UInt32
            | DataType::UInt64
            | DataType::Float32
            | DataType::Float64
    ) {
        return Err(LearnError::InvalidArgument(format!(
            "column '{name}' is not numeric"
        )));
    }
    Ok(column.as_materialized_series().cast(&DataType::Float64)?)
}

fn string_column<'a>(df: &'a DataFrame, name: &str) -> Result<&'a StringChunked> {
    let column = df
        .column(name)
        .map_err(|_| LearnError::InvalidArgument(format!("no column '{name}'")))?;
    column
        .as_materialized_series()
        .str()
        .map_err(|_| LearnError::InvalidArgument(format!("column '{name}' is not categorical")))
}

fn render_err<E: std::fmt::Display>(e: E) -> LearnError {
    LearnError::RenderFailed(e.to_string())
}

static_assertions::assert_impl_all!(Visualizer: Send, Sync);

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_frame() -> DataFrame {
        df![
            "latitude" => [Some(40.6), Some(33.9), None, Some(48.7), Some(52.5)],
            "longitude" => [Some(-73.8), Some(-118.4), Some(2.5), Some(2.4), Some(13.3)],
            "altitude" => [Some(13.0), Some(125.0), Some(392.0), Some(291.0), Some(122.0)],
            "country" => [Some("US"), Some("US"), Some("FR"), Some("FR"), Some("DE")],
        ]
        .unwrap()
    }

    #[test]
    fn test_histogram_renders_and_returns_id() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let artifact = viz
            .histogram(&sample_frame(), "altitude", DEFAULT_HISTOGRAM_BINS, None)
            .unwrap();

        assert_eq!(artifact.id, "hist_altitude");
        assert!(artifact.path.exists());
    }

    #[test]
    fn test_histogram_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let err = viz
            .histogram(&sample_frame(), "population", 10, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_histogram_all_null_column_is_empty_input() {
        let df = df!["empty" => [None::<f64>, None, None]].unwrap();
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let err = viz.histogram(&df, "empty", 10, None).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_INPUT");
    }

    #[test]
    fn test_histogram_zero_bins_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let err = viz
            .histogram(&sample_frame(), "altitude", 0, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_scatter_world_drops_incomplete_pairs() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        // row 2 has a null latitude and must be dropped, not fail
        let artifact = viz
            .scatter_world(&sample_frame(), "longitude", "latitude", Some("country"), None)
            .unwrap();
        assert_eq!(artifact.id, "scatter_world");
        assert!(artifact.path.exists());
    }

    #[test]
    fn test_scatter_world_missing_coordinates() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let err = viz
            .scatter_world(&sample_frame(), "lon", "lat", None, None)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_countplot_renders() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let artifact = viz
            .countplot_top_countries(&sample_frame(), "country", 2)
            .unwrap();
        assert_eq!(artifact.id, "count_countries");
        assert!(artifact.path.exists());
    }

    #[test]
    fn test_countplot_missing_column() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let err = viz
            .countplot_top_countries(&sample_frame(), "continent", 5)
            .unwrap_err();
        assert_eq!(err.error_code(), "INVALID_ARGUMENT");
    }

    #[test]
    fn test_confusion_heatmap_renders() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let mut cm = ConfusionMatrix::new();
        cm.record(0, 0);
        cm.record(1, 1);
        cm.record(1, 0);
        let artifact = viz.confusion_heatmap(&cm).unwrap();
        assert_eq!(artifact.id, "confusion_matrix");
        assert!(artifact.path.exists());
    }

    #[test]
    fn test_confusion_heatmap_empty_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let err = viz.confusion_heatmap(&ConfusionMatrix::new()).unwrap_err();
        assert_eq!(err.error_code(), "EMPTY_INPUT");
    }

    #[test]
    fn test_renders_are_stateless_and_repeatable() {
        let dir = tempfile::tempdir().unwrap();
        let viz = Visualizer::new(dir.path());
        let first = viz
            .histogram(&sample_frame(), "altitude", 10, Some(3))
            .unwrap();
        let second = viz
            .histogram(&sample_frame(), "altitude", 10, Some(3))
            .unwrap();
        // same id, same path; the seeded subsample makes re-renders identical
        assert_eq!(first, second);
    }
}
