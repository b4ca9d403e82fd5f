//! Masking elements
//!
//! A knife edge (Foucault test) or a Ronchi ruling (Ronchi test) intercepting the
//! reflected cone of light.
//!
//! Classifiers return `Some(true)` when the ray reaches the screen, `Some(false)` when it is
//! blocked and `None` when the intercept is not finite.

use std::fmt;

#[derive(Debug, thiserror::Error)]
pub enum MaskError {
    #[error("Ronchi ruling frequency must be positive and finite, found {0}lp/mm")]
    Frequency(f64),
}
type Result<T> = std::result::Result<T, MaskError>;

/// Knife edge: rays left of the edge are blocked
pub fn knife_edge(lx: f64, x_offset: f64) -> Option<bool> {
    lx.is_finite().then(|| lx >= x_offset)
}

/// Ronchi ruling with a dark line centered on the axis
///
/// Rays crossing the ruling at an even number of half line pairs from the axis,
/// rounded half away from zero, are blocked.
pub fn ronchi_ruling(lx: f64, lines_per_mm: f64) -> Option<bool> {
    if !lx.is_finite() {
        return None;
    }
    let t = ((2f64 * lines_per_mm * lx).abs() + 0.5).trunc();
    Some(t % 2f64 != 0f64)
}

/// Masking element
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MaskingElement {
    KnifeEdge {
        /// transverse offset from the axis [mm]
        x_offset: f64,
        /// axial offset from focus [mm]
        z_offset: f64,
        /// rotation [rd]
        phi: f64,
    },
    RonchiRuling {
        /// line pairs per mm
        lines_per_mm: f64,
        /// axial offset from focus [mm]
        z_offset: f64,
        /// rotation [rd]
        phi: f64,
    },
}
impl MaskingElement {
    pub fn knife_edge(x_offset: f64, z_offset: f64) -> Self {
        MaskingElement::KnifeEdge {
            x_offset,
            z_offset,
            phi: 0f64,
        }
    }
    pub fn ronchi(lines_per_mm: f64, z_offset: f64) -> Self {
        MaskingElement::RonchiRuling {
            lines_per_mm,
            z_offset,
            phi: 0f64,
        }
    }
    /// Rotates the element counter-clockwise by `phi` [rd]
    pub fn rotation(self, phi: f64) -> Self {
        match self {
            MaskingElement::KnifeEdge {
                x_offset, z_offset, ..
            } => MaskingElement::KnifeEdge {
                x_offset,
                z_offset,
                phi,
            },
            MaskingElement::RonchiRuling {
                lines_per_mm,
                z_offset,
                ..
            } => MaskingElement::RonchiRuling {
                lines_per_mm,
                z_offset,
                phi,
            },
        }
    }
    pub fn validate(self) -> Result<Self> {
        match self {
            MaskingElement::RonchiRuling { lines_per_mm, .. }
                if lines_per_mm <= 0f64 || !lines_per_mm.is_finite() =>
            {
                Err(MaskError::Frequency(lines_per_mm))
            }
            _ => Ok(self),
        }
    }
    pub fn z_offset(&self) -> f64 {
        match *self {
            MaskingElement::KnifeEdge { z_offset, .. } => z_offset,
            MaskingElement::RonchiRuling { z_offset, .. } => z_offset,
        }
    }
    pub fn phi(&self) -> f64 {
        match *self {
            MaskingElement::KnifeEdge { phi, .. } => phi,
            MaskingElement::RonchiRuling { phi, .. } => phi,
        }
    }
    /// Transmission at the intercept `lx`, flipped if `invert`
    pub fn classify(&self, lx: f64, invert: bool) -> Option<bool> {
        let transmitted = match *self {
            MaskingElement::KnifeEdge { x_offset, .. } => knife_edge(lx, x_offset),
            MaskingElement::RonchiRuling { lines_per_mm, .. } => ronchi_ruling(lx, lines_per_mm),
        };
        transmitted.map(|t| t ^ invert)
    }
}
impl fmt::Display for MaskingElement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match *self {
            MaskingElement::KnifeEdge {
                x_offset,
                z_offset,
                phi,
            } => write!(
                f,
                "Δz={:.2}mm, Δx={:.2}mm, ϕ={:.0}°",
                z_offset,
                x_offset,
                phi.to_degrees()
            ),
            MaskingElement::RonchiRuling {
                lines_per_mm,
                z_offset,
                phi,
            } => write!(
                f,
                "Δz={:.2}mm, {} lp/mm, ϕ={:.0}°",
                z_offset,
                lines_per_mm,
                phi.to_degrees()
            ),
        }
    }
}
