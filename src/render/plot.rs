use image::RgbImage;
use plotters::coord::types::RangedCoordf64;
use plotters::coord::Shift;
use plotters::prelude::*;
use plotters::style::{FontDesc, FontFamily, FontStyle};

use crate::color::parse_color;
use crate::config::{MarkerStyle, PlotConfig};
use crate::data::model::{NodeSet, Topology};
use crate::error::{draw_err, TopoError};

use super::font;

/// Fraction of the data span added on each side of the axes.
const AXIS_MARGIN: f64 = 0.05;
/// Tick label size in points (matplotlib default).
const TICK_FONT_PT: f64 = 10.0;
/// Grid and frame line widths in points.
const GRID_PT: f64 = 0.8;
const FRAME_PT: f64 = 0.8;

const GRID_COLOR: RGBColor = RGBColor(176, 176, 176);
const BUILDING_FILL: RGBColor = RGBColor(215, 215, 215);
const BUILDING_EDGE: RGBColor = RGBColor(120, 120, 120);

// ---------------------------------------------------------------------------
// Topology scatter plot
// ---------------------------------------------------------------------------

/// Resolved marker geometry for one series, in pixels.
struct Marker {
    radius: i32,
    edge: i32,
    face_color: RGBColor,
    edge_color: RGBColor,
}

impl Marker {
    fn resolve(style: &MarkerStyle, px_per_pt: f64) -> Result<Self, TopoError> {
        let radius = (style.marker_size / 2.0 * px_per_pt).round().max(1.0) as i32;
        let edge = (style.edge_width * px_per_pt).round() as i32;
        Ok(Self {
            radius,
            edge: edge.min(radius),
            face_color: parse_color(&style.face)?,
            edge_color: parse_color(&style.edge)?,
        })
    }
}

/// Render the topology into an RGB image of the configured canvas size.
///
/// Nothing is written to disk here; see [`super::export`].
pub fn render(topology: &Topology, config: &PlotConfig) -> Result<RgbImage, TopoError> {
    let (width, height) = config.canvas_px();
    let px_per_pt = config.px_per_pt();

    let wants_text = config.tick_labels || config.annotate;
    let has_font = if wants_text {
        let ok = font::ensure_registered(config.font.as_deref())?;
        if !ok {
            log::warn!("No usable font found, drawing without tick labels or annotations");
        }
        ok
    } else {
        false
    };

    let enb = Marker::resolve(&config.enb, px_per_pt)?;
    let ue = Marker::resolve(&config.ue, px_per_pt)?;

    let mut buffer = vec![255u8; width as usize * height as usize * 3];
    {
        let root = BitMapBackend::with_buffer(&mut buffer, (width, height)).into_drawing_area();
        draw(&root, topology, config, has_font, &enb, &ue)?;
        root.present().map_err(draw_err)?;
    }

    RgbImage::from_raw(width, height, buffer)
        .ok_or_else(|| TopoError::Draw("pixel buffer does not match canvas size".into()))
}

fn draw<DB>(
    root: &DrawingArea<DB, Shift>,
    topology: &Topology,
    config: &PlotConfig,
    has_font: bool,
    enb: &Marker,
    ue: &Marker,
) -> Result<(), TopoError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    let px_per_pt = config.px_per_pt();
    let pt = |v: f64| (v * px_per_pt).round().max(1.0) as u32;

    root.fill(&WHITE).map_err(draw_err)?;

    let data_bounds = topology
        .bounds()
        .ok_or_else(|| TopoError::Draw("nothing to plot".into()))?;
    let bounds = data_bounds.padded(AXIS_MARGIN).ok_or_else(|| {
        TopoError::Draw(format!("coordinate range {data_bounds:?} cannot be drawn"))
    })?;
    log::debug!("Axis range {bounds:?}");

    let tick_labels = has_font && config.tick_labels;
    let label_font = FontDesc::new(
        FontFamily::Name(font::FAMILY),
        TICK_FONT_PT * px_per_pt,
        FontStyle::Normal,
    );

    let mut builder = ChartBuilder::on(root);
    builder.margin(pt(12.0));
    if tick_labels {
        builder
            .x_label_area_size(pt(TICK_FONT_PT * 2.2))
            .y_label_area_size(pt(TICK_FONT_PT * 4.5));
    }
    let mut chart = builder
        .build_cartesian_2d(bounds.x_min..bounds.x_max, bounds.y_min..bounds.y_max)
        .map_err(draw_err)?;

    {
        let mut mesh = chart.configure_mesh();
        mesh.light_line_style(TRANSPARENT);
        if config.grid {
            mesh.bold_line_style(GRID_COLOR.stroke_width(pt(GRID_PT)));
        } else {
            mesh.disable_mesh();
        }
        if tick_labels {
            mesh.label_style(label_font.clone())
                .axis_style(BLACK.stroke_width(pt(FRAME_PT)));
        }
        mesh.draw().map_err(draw_err)?;
    }

    // Axes frame.
    chart
        .draw_series(std::iter::once(Rectangle::new(
            [(bounds.x_min, bounds.y_min), (bounds.x_max, bounds.y_max)],
            BLACK.stroke_width(pt(FRAME_PT)),
        )))
        .map_err(draw_err)?;

    for b in &topology.buildings {
        let corners = [(b.x_min, b.y_min), (b.x_max, b.y_max)];
        chart
            .draw_series([
                Rectangle::new(corners, BUILDING_FILL.filled()),
                Rectangle::new(corners, BUILDING_EDGE.stroke_width(pt(0.5))),
            ])
            .map_err(draw_err)?;
    }

    // eNBs first so UEs stay visible on top.
    for (set, marker) in [(&topology.enbs, enb), (&topology.ues, ue)] {
        draw_markers(&mut chart, set, marker)?;
    }

    if config.annotate && has_font {
        let style = label_font.color(&BLACK);
        for (set, marker) in [(&topology.enbs, enb), (&topology.ues, ue)] {
            let offset = marker.radius + pt(2.0) as i32;
            chart
                .draw_series(set.nodes.iter().filter_map(|n| {
                    let label = n.label.as_ref()?;
                    let at = (n.position.x, n.position.y);
                    Some(
                        EmptyElement::at(at)
                            + Text::new(label.clone(), (offset, -offset), style.clone()),
                    )
                }))
                .map_err(draw_err)?;
        }
    }

    Ok(())
}

/// Filled circle in the edge color with the face drawn inside it.
fn draw_markers<DB>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    set: &NodeSet,
    marker: &Marker,
) -> Result<(), TopoError>
where
    DB: DrawingBackend,
    DB::ErrorType: 'static,
{
    log::debug!(
        "Drawing {} {} markers, radius {} px",
        set.len(),
        set.kind,
        marker.radius
    );
    let inner = marker.radius - marker.edge;
    chart
        .draw_series(set.positions().map(|p| {
            Circle::new((p.x, p.y), marker.radius, marker.edge_color.filled())
        }))
        .map_err(draw_err)?;
    if inner > 0 {
        chart
            .draw_series(
                set.positions()
                    .map(|p| Circle::new((p.x, p.y), inner, marker.face_color.filled())),
            )
            .map_err(draw_err)?;
    }
    Ok(())
}
