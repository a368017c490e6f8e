use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use serde::{Deserialize, Serialize};

use crate::color::parse_color;

/// Largest canvas accepted before cropping, in pixels (the RGB buffer is
/// three bytes per pixel).
const MAX_CANVAS_PIXELS: u64 = 50_000_000;

// ---------------------------------------------------------------------------
// Marker style
// ---------------------------------------------------------------------------

/// Styling of one scatter series. Sizes are in points, like matplotlib's
/// `markersize`, and scale with the DPI.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkerStyle {
    /// Marker diameter in points.
    pub marker_size: f64,
    pub face: String,
    pub edge: String,
    /// Edge line width in points.
    #[serde(default = "default_edge_width")]
    pub edge_width: f64,
}

fn default_edge_width() -> f64 {
    1.0
}

impl MarkerStyle {
    fn enb() -> Self {
        Self {
            marker_size: 20.0,
            face: "orange".into(),
            edge: "black".into(),
            edge_width: default_edge_width(),
        }
    }

    fn ue() -> Self {
        Self {
            marker_size: 10.0,
            face: "green".into(),
            edge: "black".into(),
            edge_width: default_edge_width(),
        }
    }
}

// ---------------------------------------------------------------------------
// Plot settings
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlotConfig {
    pub dpi: f64,
    /// Figure width and height in inches.
    pub figure_size: [f64; 2],
    pub grid: bool,
    /// Crop to the drawn content, like `bbox_inches='tight'`.
    pub tight: bool,
    /// Padding kept around the content when cropping, in inches.
    pub pad_inches: f64,
    /// Draw axis tick labels (needs a font).
    pub tick_labels: bool,
    /// Write each node's label next to its marker (needs a font).
    pub annotate: bool,
    /// TrueType font for text. Common system locations are probed when unset.
    pub font: Option<PathBuf>,
    pub enb: MarkerStyle,
    pub ue: MarkerStyle,
}

impl Default for PlotConfig {
    fn default() -> Self {
        Self {
            dpi: 500.0,
            figure_size: [6.4, 4.8],
            grid: true,
            tight: true,
            pad_inches: 0.1,
            tick_labels: true,
            annotate: false,
            font: None,
            enb: MarkerStyle::enb(),
            ue: MarkerStyle::ue(),
        }
    }
}

impl PlotConfig {
    /// Pixels per typographic point.
    pub fn px_per_pt(&self) -> f64 {
        self.dpi / 72.0
    }

    /// Canvas size in pixels before cropping.
    pub fn canvas_px(&self) -> (u32, u32) {
        let [w, h] = self.figure_size;
        (
            (w * self.dpi).round() as u32,
            (h * self.dpi).round() as u32,
        )
    }
}

// ---------------------------------------------------------------------------
// Top-level configuration
// ---------------------------------------------------------------------------

/// Everything a run needs. The defaults reproduce the fixed behaviour of
/// the original plotting script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub enbs: PathBuf,
    pub ues: PathBuf,
    /// Optional ns-3 building script drawn under the nodes.
    pub buildings: Option<PathBuf>,
    pub output: PathBuf,
    /// 1-based field holding the `x,y` coordinate.
    pub field: usize,
    /// Also write `<stem>_tem.txt` and `<stem>_loc.txt` next to each input.
    /// Off by default, unlike the awk/sed script, which always wrote them.
    pub keep_intermediates: bool,
    pub plot: PlotConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            enbs: PathBuf::from("enbs.txt"),
            ues: PathBuf::from("ues.txt"),
            buildings: None,
            output: PathBuf::from("topo.png"),
            field: 5,
            keep_intermediates: false,
            plot: PlotConfig::default(),
        }
    }
}

impl Config {
    /// Read a JSON config file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Config = serde_json::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        Ok(config)
    }

    /// Reject settings that cannot produce a figure.
    pub fn validate(&self) -> Result<()> {
        if self.field == 0 {
            bail!("field index is 1-based, got 0");
        }
        let plot = &self.plot;
        if !(plot.dpi.is_finite() && plot.dpi > 0.0) {
            bail!("dpi must be positive, got {}", plot.dpi);
        }
        for side in plot.figure_size {
            if !(side.is_finite() && side > 0.0) {
                bail!("figure size must be positive, got {:?}", plot.figure_size);
            }
        }
        let [w, h] = plot.figure_size.map(|side| side * plot.dpi);
        if w * h > MAX_CANVAS_PIXELS as f64 {
            bail!(
                "canvas of {:?} in at {} dpi is {:.0} px, more than {MAX_CANVAS_PIXELS}",
                plot.figure_size,
                plot.dpi,
                w * h
            );
        }
        let (w_px, h_px) = plot.canvas_px();
        if w_px == 0 || h_px == 0 {
            bail!(
                "canvas of {:?} in at {} dpi is less than one pixel wide",
                plot.figure_size,
                plot.dpi
            );
        }
        if !(plot.pad_inches.is_finite() && plot.pad_inches >= 0.0) {
            bail!("pad_inches must not be negative, got {}", plot.pad_inches);
        }
        for (name, style) in [("enb", &plot.enb), ("ue", &plot.ue)] {
            if !(style.marker_size.is_finite() && style.marker_size > 0.0) {
                bail!("{name} marker size must be positive, got {}", style.marker_size);
            }
            if !(style.edge_width.is_finite() && style.edge_width >= 0.0) {
                bail!("{name} edge width must not be negative, got {}", style.edge_width);
            }
            parse_color(&style.face).with_context(|| format!("{name} face color"))?;
            parse_color(&style.edge).with_context(|| format!("{name} edge color"))?;
        }
        Ok(())
    }
}
