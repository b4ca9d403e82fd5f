//! Outlines for drawing apertures, beam footprints and knife edges

use nalgebra as na;
use std::f64::consts::{FRAC_PI_2, PI};

const N_CIRCLE: usize = 100;

/// Closed circle outline of radius `radius` centered at (x0,y0)
pub fn circle_polygon(radius: f64, x0: f64, y0: f64) -> (Vec<f64>, Vec<f64>) {
    (0..N_CIRCLE)
        .map(|i| {
            let theta = 2f64 * PI * i as f64 / (N_CIRCLE - 1) as f64;
            let (s, c) = theta.sin_cos();
            (x0 + radius * s, y0 + radius * c)
        })
        .unzip()
}

/// Closed outline of a knife edge rotated by `phi` [rd] and offset by `dx` [mm]
///
/// The outline is a rectangle of width `1.5·radius` and height `3·radius`, its edge goes
/// through (`dx`cos`phi`,`dx`sin`phi`) and it covers the blocked half-plane.
pub fn knife_polygon(radius: f64, phi: f64, dx: f64) -> (Vec<f64>, Vec<f64>) {
    let side = 1.5 * radius;
    let turn = na::Rotation2::new(FRAC_PI_2);
    let start = na::Point2::new(dx * phi.cos(), dx * phi.sin());
    let mut direction = na::Rotation2::new(phi + FRAC_PI_2) * na::Vector2::x();
    let mut vertices = vec![start];
    for length in [side, side, 2f64 * side, side] {
        let last = vertices[vertices.len() - 1];
        vertices.push(last + direction * length);
        direction = turn * direction;
    }
    vertices.push(start);
    vertices.into_iter().map(|p| (p.x, p.y)).unzip()
}
