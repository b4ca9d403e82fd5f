//! Ray projection onto the masking plane
//!
//! The point source sits at the center of curvature of the surface.
//! The ray reflected from the surface point (x,y) crosses the plane located `z_offset` from
//! focus at the transverse coordinate
//! $$ L_x = x_\phi \frac{-\Delta z - \kappa z(\rho)}{R + \kappa z(\rho)} $$
//! where $x_\phi = x\cos\phi + y\sin\phi$ is the coordinate along the direction normal to
//! the masking element.

use crate::{
    sampling::SamplePoints,
    surface::{Surface, SurfaceError},
};

type Result<T> = std::result::Result<T, SurfaceError>;

/// Coordinate along the axis rotated by `phi` [rd]
pub fn rotate(x: f64, y: f64, phi: f64) -> f64 {
    let (s, c) = phi.sin_cos();
    x * c + y * s
}

/// Transverse intercept of the ray from (x,y) at the masking plane
///
/// With `at_mask`, the surface shape is ignored and the beam footprint at the masking plane
/// is returned instead.
pub fn intercept(
    surface: &Surface,
    z_offset: f64,
    x: f64,
    y: f64,
    phi: f64,
    at_mask: bool,
) -> Result<f64> {
    let sagitta = if at_mask {
        0f64
    } else {
        surface.sagitta(x, y)?
    };
    // flat surfaces have an infinite conic constant and a null sagitta
    let aspheric = if sagitta == 0f64 {
        0f64
    } else {
        sagitta * surface.conic
    };
    let xr = rotate(x, y, phi);
    Ok(xr * (-z_offset - aspheric) / (surface.radius + aspheric))
}

/// Transverse intercepts of the rays from all the sample points
///
/// Invalid samples get a NaN intercept.
pub fn project(
    surface: &Surface,
    z_offset: f64,
    points: &SamplePoints,
    phi: f64,
    at_mask: bool,
) -> Result<Vec<f64>> {
    points
        .x
        .iter()
        .zip(points.y.iter())
        .zip(points.valid.iter())
        .map(|((&x, &y), &valid)| {
            if valid {
                intercept(surface, z_offset, x, y, phi, at_mask)
            } else {
                Ok(f64::NAN)
            }
        })
        .collect()
}
