//! Shadowgram rendering
//!
//! Bitmap plots of Foucault and Ronchi shadowgrams next to a view of the masking plane.

use crate::{
    geometry::{circle_polygon, knife_polygon},
    mask::MaskingElement,
    pattern::{Pattern, Shadowgram},
    surface::Surface,
    Result,
};
use plotters::{
    coord::{types::RangedCoordf64, Shift},
    prelude::*,
};
use std::{ops::Range, path::Path};

#[derive(Debug, thiserror::Error)]
pub enum PlotError {
    #[error("failed to draw: {0}")]
    Drawing(String),
    #[error("expected a {0} masking element")]
    Element(&'static str),
}
impl<E: std::error::Error + Send + Sync> From<DrawingAreaErrorKind<E>> for PlotError {
    fn from(e: DrawingAreaErrorKind<E>) -> Self {
        PlotError::Drawing(e.to_string())
    }
}

/// Styling of a shadowgram panel
struct Panel<'a> {
    title: String,
    label: &'a str,
    extent: f64,
    point_size: u32,
    color: RGBColor,
    background: RGBColor,
    foreground: RGBColor,
}

type Chart<'a, DB> = ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>;

fn aperture<DB: DrawingBackend>(
    chart: &mut Chart<'_, DB>,
    radius: f64,
) -> std::result::Result<(), PlotError> {
    let (x, y) = circle_polygon(radius, 0f64, 0f64);
    chart.draw_series(LineSeries::new(x.into_iter().zip(y), &GREEN))?;
    Ok(())
}

fn chart_range(extent: f64) -> Range<f64> {
    -extent..extent
}

fn draw_pattern<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    pattern: &Pattern,
    radius: f64,
    panel: Panel,
) -> std::result::Result<(), PlotError> {
    area.fill(&panel.background)?;
    let fg = panel.foreground;
    let mut chart = ChartBuilder::on(area)
        .caption(&panel.title, ("sans-serif", 16).into_font().color(&fg))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(chart_range(panel.extent), chart_range(panel.extent))?;
    chart
        .configure_mesh()
        .disable_mesh()
        .axis_style(&fg)
        .label_style(("sans-serif", 12).into_font().color(&fg))
        .axis_desc_style(("sans-serif", 14).into_font().color(&fg))
        .x_desc(panel.label)
        .y_desc(panel.label)
        .draw()?;
    let size = panel.point_size;
    let color = panel.color;
    chart.draw_series(
        pattern
            .iter_visible()
            .map(|(x, y)| Circle::new((x, y), size, color.filled())),
    )?;
    aperture(&mut chart, radius)?;
    Ok(())
}

impl Pattern {
    /// Plots the visible points in a bitmap
    pub fn plot<P: AsRef<Path>>(&self, path: P, surface: &Surface, title: &str) -> Result<()> {
        let root = BitMapBackend::new(path.as_ref(), (512, 512)).into_drawing_area();
        let radius = 0.5 * surface.diameter * self.scale;
        draw_pattern(
            &root,
            self,
            radius,
            Panel {
                title: title.to_string(),
                label: "Mirror/Lens Plane (mm)",
                extent: 1.2 * radius,
                point_size: 1,
                color: WHITE,
                background: BLACK,
                foreground: WHITE,
            },
        )?;
        root.present().map_err(PlotError::from)?;
        log::info!("{:?} saved", path.as_ref());
        Ok(())
    }
}

/// Plots a Foucault shadowgram and the knife edge in front of the beam
pub fn plot_knife_and_screen<P: AsRef<Path>>(gram: &Shadowgram, path: P) -> Result<()> {
    let (surface, element) = (gram.surface(), gram.element());
    let &MaskingElement::KnifeEdge {
        x_offset,
        z_offset,
        phi,
    } = element
    else {
        return Err(PlotError::Element("knife edge").into());
    };
    let pattern = gram.compute()?;
    let root = BitMapBackend::new(path.as_ref(), (1024, 512)).into_drawing_area();
    let panels = root.split_evenly((1, 2));
    let radius = 0.5 * surface.diameter;
    draw_pattern(
        &panels[0],
        &pattern,
        radius,
        Panel {
            title: surface.to_string(),
            label: "Mirror/Lens Plane (mm)",
            extent: 1.2 * radius,
            point_size: 1,
            color: WHITE,
            background: BLACK,
            foreground: WHITE,
        },
    )?;

    let spot = 0.5 * surface.spot_diameter(z_offset);
    let extent = if spot > 0f64 { 4f64 * spot } else { radius };
    let area = &panels[1];
    area.fill(&WHITE).map_err(PlotError::from)?;
    let mut chart = ChartBuilder::on(area)
        .caption(element.to_string(), ("sans-serif", 16))
        .set_label_area_size(LabelAreaPosition::Left, 50)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .margin(10)
        .build_cartesian_2d(chart_range(extent), chart_range(extent))
        .map_err(PlotError::from)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .x_desc("Knife Edge Plane (mm)")
        .draw()
        .map_err(PlotError::from)?;
    aperture(&mut chart, spot)?;
    let (x, y) = knife_polygon(radius, phi, x_offset);
    chart
        .draw_series(std::iter::once(Polygon::new(
            x.into_iter().zip(y).collect::<Vec<_>>(),
            BLACK.mix(0.8).filled(),
        )))
        .map_err(PlotError::from)?;
    root.present().map_err(PlotError::from)?;
    log::info!("{:?} saved", path.as_ref());
    Ok(())
}

/// Plots a Ronchi shadowgram and the beam footprint on the ruling
pub fn plot_ruling_and_screen<P: AsRef<Path>>(gram: &Shadowgram, path: P) -> Result<()> {
    let (surface, element) = (gram.surface(), gram.element());
    let &MaskingElement::RonchiRuling { z_offset, .. } = element else {
        return Err(PlotError::Element("Ronchi ruling").into());
    };
    let root = BitMapBackend::new(path.as_ref(), (1024, 512)).into_drawing_area();
    let panels = root.split_evenly((1, 2));
    let radius = 0.5 * surface.diameter;
    draw_pattern(
        &panels[0],
        &gram.clone().at_mask(false).compute()?,
        radius,
        Panel {
            title: surface.to_string(),
            label: "Mirror/Lens Plane (mm)",
            extent: 1.2 * radius,
            point_size: 1,
            color: WHITE,
            background: BLACK,
            foreground: WHITE,
        },
    )?;
    let spot = 0.5 * surface.spot_diameter(z_offset);
    let extent = if spot > 0f64 { 1.2 * spot } else { radius };
    draw_pattern(
        &panels[1],
        &gram.clone().at_mask(true).compute()?,
        spot,
        Panel {
            title: element.to_string(),
            label: "Ronchi Ruling Plane (mm)",
            extent,
            point_size: 1,
            color: WHITE,
            background: BLACK,
            foreground: WHITE,
        },
    )?;
    root.present().map_err(PlotError::from)?;
    log::info!("{:?} saved", path.as_ref());
    Ok(())
}

/// Plots a grid of Ronchi shadowgrams, one per axial offset of the ruling
pub fn plot_ronchi_sweep<P: AsRef<Path>>(
    patterns: &[(f64, Pattern)],
    surface: &Surface,
    grid: (usize, usize),
    path: P,
) -> Result<()> {
    let (rows, cols) = grid;
    let root =
        BitMapBackend::new(path.as_ref(), (400 * cols as u32, 400 * rows as u32)).into_drawing_area();
    let panels = root.split_evenly((rows, cols));
    let radius = 0.5 * surface.diameter;
    let colors = colorous::TABLEAU10.iter().cycle();
    for ((area, (z_offset, pattern)), color) in panels.iter().zip(patterns).zip(colors) {
        draw_pattern(
            area,
            pattern,
            radius,
            Panel {
                title: format!("{:.0}mm from focus", z_offset),
                label: "",
                extent: 1.1 * radius,
                point_size: 1,
                color: RGBColor(color.r, color.g, color.b),
                background: WHITE,
                foreground: BLACK,
            },
        )?;
    }
    root.present().map_err(PlotError::from)?;
    log::info!("{:?} saved", path.as_ref());
    Ok(())
}
