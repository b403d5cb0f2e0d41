#![cfg_attr(feature = "fail-on-warnings", deny(warnings))]
#![warn(clippy::all, clippy::pedantic, clippy::nursery, clippy::cargo)]
#![allow(clippy::multiple_crate_versions, clippy::cargo_common_metadata)]

//! Chart specifications and the external renderer seam.
//!
//! Chart *images* are produced by an external rendering collaborator;
//! this crate defines what it consumes: a [`ChartSpec`] per aggregation
//! view and the [`ChartRenderer`] trait the collaborator implements. The
//! in-repo [`SpecFileRenderer`] writes each spec as a JSON document into
//! the output directory, which is also what the pipeline's tests assert
//! against.

pub mod specs;

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors that can occur while emitting chart specs.
#[derive(Debug, Error)]
pub enum ChartError {
    /// Writing the spec document failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serializing the spec document failed.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// The chart shapes the external renderer knows how to draw.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ChartKind {
    /// Categorical bars.
    Bar,
    /// One line per series.
    Line,
    /// Bars stacked by series.
    StackedBar,
    /// X/Y point cloud.
    Scatter,
}

/// One named series of values, aligned with the spec's category labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSeries {
    /// Legend label.
    pub name: String,
    /// One value per category label.
    pub values: Vec<u64>,
}

/// One point of a scatter chart.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScatterPoint {
    /// X coordinate.
    pub x: f64,
    /// Y coordinate.
    pub y: f64,
    /// Color group (cluster id).
    pub group: usize,
}

/// The data payload of a chart, shaped by its kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ChartData {
    /// Labeled categories with one or more aligned series (bar, line,
    /// stacked bar).
    Series {
        /// Category labels along the x axis.
        labels: Vec<String>,
        /// Aligned value series.
        series: Vec<ChartSeries>,
    },
    /// A point cloud with optional emphasized markers (scatter).
    Points {
        /// Data points.
        points: Vec<ScatterPoint>,
        /// Emphasized overlay points (cluster centroids).
        markers: Vec<ScatterPoint>,
    },
}

/// A complete chart specification for the external renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChartSpec {
    /// Chart shape.
    pub kind: ChartKind,
    /// Chart title.
    pub title: String,
    /// X-axis label.
    pub x_label: String,
    /// Y-axis label.
    pub y_label: String,
    /// The data payload.
    pub data: ChartData,
}

/// The seam the external image renderer implements.
pub trait ChartRenderer {
    /// Renders one chart under the given view name, returning the path
    /// of the produced artifact.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`] if the chart cannot be produced.
    fn render(&self, name: &str, spec: &ChartSpec) -> Result<PathBuf, ChartError>;
}

/// Renderer that writes each [`ChartSpec`] as a pretty-printed JSON
/// document `<out_dir>/<name>.json` for the external image renderer to
/// pick up.
pub struct SpecFileRenderer {
    out_dir: PathBuf,
}

impl SpecFileRenderer {
    /// Creates a renderer targeting `out_dir`, creating the directory if
    /// needed.
    ///
    /// # Errors
    ///
    /// Returns [`ChartError`] if the directory cannot be created.
    pub fn new(out_dir: &Path) -> Result<Self, ChartError> {
        std::fs::create_dir_all(out_dir)?;
        Ok(Self {
            out_dir: out_dir.to_path_buf(),
        })
    }
}

impl ChartRenderer for SpecFileRenderer {
    fn render(&self, name: &str, spec: &ChartSpec) -> Result<PathBuf, ChartError> {
        let path = self.out_dir.join(format!("{name}.json"));
        let file = std::fs::File::create(&path)?;
        serde_json::to_writer_pretty(file, spec)?;
        log::debug!("Wrote chart spec {}", path.display());
        Ok(path)
    }
}
