//! Conic surface model
//!
//! A rotationally symmetric conic of radius of curvature $R$ and conic constant $\kappa$
//! with sagitta
//! $$ z(\rho) = \frac{\rho^2}{R+\sqrt{R^2-(1+\kappa)\rho^2}} + A_1\rho^4 + \delta\rho^2 $$
//! where $A_1$ is the spherical aberration coefficient and $\delta$ the defocus coefficient.
//! The conic term is evaluated as $c\rho^2/(1+\sqrt{(R^2-(1+\kappa)\rho^2)c^2})$ with $c=1/R$,
//! which keeps the sign of $R$ for concave and convex surfaces alike.

use std::fmt;
use strum_macros::EnumIter;

#[derive(Debug, thiserror::Error)]
pub enum SurfaceError {
    #[error("surface diameter must be positive, found {0}mm")]
    Diameter(f64),
    #[error("radius of curvature must be finite and non-zero")]
    Radius,
    #[error("conic constant must be finite or +inf, found {0}")]
    Conic(f64),
    #[error("{0} coefficient must be finite, found {1}")]
    Coefficient(&'static str, f64),
    #[error("expected as many x as y coordinates, found {0} and {1}")]
    Length(usize, usize),
    #[error("conic {conic} with radius of curvature {radius}mm is undefined at {rho}mm from the axis")]
    Geometry { rho: f64, radius: f64, conic: f64 },
}
type Result<T> = std::result::Result<T, SurfaceError>;

/// Conic section classification
#[derive(EnumIter, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConicKind {
    Flat,
    OblateSpheroid,
    Sphere,
    ProlateSpheroid,
    Paraboloid,
    Hyperboloid,
}
impl From<f64> for ConicKind {
    fn from(conic: f64) -> Self {
        use ConicKind::*;
        if conic == f64::INFINITY {
            Flat
        } else if conic > 0f64 {
            OblateSpheroid
        } else if conic == 0f64 {
            Sphere
        } else if conic > -1f64 {
            ProlateSpheroid
        } else if conic == -1f64 {
            Paraboloid
        } else {
            Hyperboloid
        }
    }
}
impl fmt::Display for ConicKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use ConicKind::*;
        match self {
            Flat => write!(f, "flat"),
            OblateSpheroid => write!(f, "oblate spheroid"),
            Sphere => write!(f, "sphere"),
            ProlateSpheroid => write!(f, "prolate spheroid"),
            Paraboloid => write!(f, "paraboloid"),
            Hyperboloid => write!(f, "hyperboloid"),
        }
    }
}

/// Conic constant of a conic of eccentricity `e`: $\kappa=-e^2$
///
/// Oblate spheroids have an imaginary eccentricity, use [conic_from_oblate_eccentricity]
pub fn conic_from_eccentricity(e: f64) -> f64 {
    -e * e
}
/// Conic constant of an oblate spheroid of imaginary eccentricity `i·e`: $\kappa=e^2$
pub fn conic_from_oblate_eccentricity(e: f64) -> f64 {
    e * e
}

/// Sagitta of a conic surface at (x,y)
///
/// Fails if the surface is not defined that far from the axis
pub fn sagitta(radius: f64, conic: f64, x: f64, y: f64, a1: f64, defocus: f64) -> Result<f64> {
    if radius == 0f64 || !radius.is_finite() {
        return Err(SurfaceError::Radius);
    }
    if conic.is_nan() || conic == f64::NEG_INFINITY {
        return Err(SurfaceError::Conic(conic));
    }
    if !a1.is_finite() {
        return Err(SurfaceError::Coefficient("spherical aberration", a1));
    }
    if !defocus.is_finite() {
        return Err(SurfaceError::Coefficient("defocus", defocus));
    }
    let rho2 = x * x + y * y;
    if conic == f64::INFINITY {
        return Ok(0f64);
    }
    // R² - (1+κ)ρ² vanishes exactly on the boundary, unlike 1 - (1+κ)c²ρ²
    let domain = radius * radius - (1f64 + conic) * rho2;
    if domain < 0f64 || domain.is_nan() {
        return Err(SurfaceError::Geometry {
            rho: rho2.sqrt(),
            radius,
            conic,
        });
    }
    let c = radius.recip();
    let delta = domain * c * c;
    let height = c * rho2 / (1f64 + delta.sqrt());
    Ok(height + a1 * rho2 * rho2 + defocus * rho2)
}

/// Mirror or lens surface
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surface {
    /// diameter [mm]
    pub diameter: f64,
    /// radius of curvature [mm]
    pub radius: f64,
    /// conic constant, `f64::INFINITY` for a flat
    pub conic: f64,
    /// spherical aberration [1/mm^3]
    pub spherical_aberration: f64,
    /// defocus [1/mm]
    pub defocus: f64,
}
impl Surface {
    /// Creates a spherical surface
    pub fn new(diameter: f64, radius: f64) -> Self {
        Self {
            diameter,
            radius,
            conic: 0f64,
            spherical_aberration: 0f64,
            defocus: 0f64,
        }
    }
    pub fn sphere(diameter: f64, radius: f64) -> Self {
        Self::new(diameter, radius)
    }
    pub fn paraboloid(diameter: f64, radius: f64) -> Self {
        Self::new(diameter, radius).conic(-1f64)
    }
    pub fn conic(self, conic: f64) -> Self {
        Self { conic, ..self }
    }
    pub fn spherical_aberration(self, spherical_aberration: f64) -> Self {
        Self {
            spherical_aberration,
            ..self
        }
    }
    pub fn defocus(self, defocus: f64) -> Self {
        Self { defocus, ..self }
    }
    /// Checks that the surface is defined over the whole aperture
    pub fn validate(self) -> Result<Self> {
        if self.diameter <= 0f64 || !self.diameter.is_finite() {
            return Err(SurfaceError::Diameter(self.diameter));
        }
        // also rejects an undefined radius, conic or coefficient
        self.sagitta(0.5 * self.diameter, 0f64)?;
        Ok(self)
    }
    pub fn kind(&self) -> ConicKind {
        self.conic.into()
    }
    /// Sagitta at (x,y)
    pub fn sagitta(&self, x: f64, y: f64) -> Result<f64> {
        sagitta(
            self.radius,
            self.conic,
            x,
            y,
            self.spherical_aberration,
            self.defocus,
        )
    }
    /// Sagittas at the points (x,y)
    pub fn sagittas(&self, x: &[f64], y: &[f64]) -> Result<Vec<f64>> {
        if x.len() != y.len() {
            return Err(SurfaceError::Length(x.len(), y.len()));
        }
        x.iter()
            .zip(y.iter())
            .map(|(&x, &y)| self.sagitta(x, y))
            .collect()
    }
    /// Diameter of the beam footprint at `z_offset` from focus [mm]
    pub fn spot_diameter(&self, z_offset: f64) -> f64 {
        (z_offset * self.diameter / self.radius).abs()
    }
}
impl fmt::Display for Surface {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "D={:.1}mm, RoC={:.1}mm, K={:.2} ({})",
            self.diameter,
            self.radius,
            self.conic,
            self.kind()
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error;
    use strum::IntoEnumIterator;

    #[test]
    fn vertex() -> std::result::Result<(), Box<dyn Error>> {
        for conic in [f64::INFINITY, 1., 0., -0.5, -1., -2., -10.] {
            for radius in [7.8, 200., -400.] {
                assert_eq!(sagitta(radius, conic, 0., 0., 0., 0.)?, 0f64);
            }
        }
        Ok(())
    }

    #[test]
    fn sphere() -> std::result::Result<(), Box<dyn Error>> {
        let radius = 200f64;
        for rho in [0.5, 10., 50., 99., 150., 199.] {
            let sag = sagitta(radius, 0., 0., rho, 0., 0.)?;
            let exact = radius - (radius * radius - rho * rho).sqrt();
            assert!(((sag - exact) / exact).abs() < 1e-6, "{sag} vs {exact}");
        }
        Ok(())
    }

    #[test]
    fn contact_lens() -> std::result::Result<(), Box<dyn Error>> {
        let sag = sagitta(7.8, 0., 0., 0.5, 0., 0.)?;
        assert!((sag - 0.016).abs() < 3e-3);
        Ok(())
    }

    // Benjamin & Rosenblum, "Radii of Curvature and Sagittal Depths of Conic Sections",
    // ICLC, Vol. 19, pp. 76-83, 1992, Table 1 (R=7.80mm)
    #[test]
    fn sagitta_table() -> std::result::Result<(), Box<dyn Error>> {
        let conics = [
            conic_from_oblate_eccentricity(0.504),
            conic_from_eccentricity(0.),
            conic_from_eccentricity(0.45),
            conic_from_eccentricity(1.),
            conic_from_eccentricity(2.),
        ];
        let table = [
            [1.0, 0.016, 0.016, 0.016, 0.016, 0.016],
            [2.0, 0.064, 0.064, 0.064, 0.064, 0.063],
            [3.0, 0.146, 0.146, 0.145, 0.144, 0.140],
            [4.0, 0.262, 0.261, 0.260, 0.256, 0.245],
            [5.0, 0.414, 0.412, 0.409, 0.401, 0.374],
            [6.0, 0.606, 0.600, 0.595, 0.577, 0.524],
            [7.0, 0.842, 0.829, 0.820, 0.785, 0.693],
            [8.0, 1.128, 1.104, 1.086, 1.026, 0.878],
            [9.0, 1.472, 1.429, 1.400, 1.298, 1.076],
            [10.0, 1.890, 1.813, 1.761, 1.603, 1.285],
            [11.0, 2.403, 2.269, 2.183, 1.939, 1.504],
            [12.0, 3.061, 2.816, 2.673, 2.308, 1.731],
        ];
        for row in table.iter() {
            let y = 0.5 * row[0];
            for (conic, expected) in conics.iter().zip(&row[1..]) {
                let sag = sagitta(7.8, *conic, 0., y, 0., 0.)?;
                assert!(
                    (sag - expected).abs() <= 3e-3 + 3e-3 * expected.abs(),
                    "K={conic}, y={y}: {sag} vs {expected}"
                );
            }
        }
        Ok(())
    }

    #[test]
    fn flat() -> std::result::Result<(), Box<dyn Error>> {
        let surface = Surface::new(100., 200.).conic(f64::INFINITY).validate()?;
        assert_eq!(surface.sagitta(30., 40.)?, 0f64);
        assert_eq!(surface.kind(), ConicKind::Flat);
        Ok(())
    }

    #[test]
    fn aberrations() -> std::result::Result<(), Box<dyn Error>> {
        let base = Surface::paraboloid(100., 400.);
        let rho2 = 25f64;
        let s0 = base.sagitta(3., 4.)?;
        let s1 = base.spherical_aberration(1e-6).sagitta(3., 4.)?;
        let s2 = base.defocus(1e-4).sagitta(3., 4.)?;
        assert!((s1 - s0 - 1e-6 * rho2 * rho2).abs() < 1e-12);
        assert!((s2 - s0 - 1e-4 * rho2).abs() < 1e-12);
        Ok(())
    }

    #[test]
    fn geometry_exceeded() {
        // an oblate spheroid closes before the aperture edge
        let surface = Surface::new(100., 20.).conic(1.);
        assert!(matches!(
            surface.validate(),
            Err(SurfaceError::Geometry { .. })
        ));
        assert!(sagitta(10., 0., 11., 0., 0., 0.).is_err());
        // hyperboloids are defined everywhere
        assert!(Surface::new(100., 20.).conic(-3.).validate().is_ok());
    }

    #[test]
    fn hemisphere() -> std::result::Result<(), Box<dyn Error>> {
        for radius in [0.3, 3., 7., 10., 200.] {
            let surface = Surface::sphere(2. * radius, radius).validate()?;
            let sag = surface.sagitta(radius, 0.)?;
            assert!((sag - radius).abs() < 1e-9 * radius, "R={radius}: {sag}");
        }
        Ok(())
    }

    #[test]
    fn invalid_arguments() {
        assert!(matches!(
            Surface::new(0., 200.).validate(),
            Err(SurfaceError::Diameter(_))
        ));
        assert!(matches!(
            Surface::new(f64::NAN, 200.).validate(),
            Err(SurfaceError::Diameter(_))
        ));
        assert!(matches!(
            Surface::new(100., 0.).validate(),
            Err(SurfaceError::Radius)
        ));
        assert!(matches!(
            sagitta(0., 0., 0., 0., 0., 0.),
            Err(SurfaceError::Radius)
        ));
        assert!(matches!(
            sagitta(f64::NAN, 0., 1., 0., 0., 0.),
            Err(SurfaceError::Radius)
        ));
        for conic in [f64::NAN, f64::NEG_INFINITY] {
            assert!(matches!(
                Surface::new(100., 200.).conic(conic).validate(),
                Err(SurfaceError::Conic(_))
            ));
            assert!(sagitta(200., conic, 0., 0., 0., 0.).is_err());
        }
        assert!(matches!(
            Surface::new(100., 200.).spherical_aberration(f64::NAN).validate(),
            Err(SurfaceError::Coefficient(..))
        ));
        assert!(matches!(
            Surface::new(100., 200.).defocus(f64::INFINITY).validate(),
            Err(SurfaceError::Coefficient(..))
        ));
        assert!(matches!(
            sagitta(200., 0., f64::NAN, 0., 0., 0.),
            Err(SurfaceError::Geometry { .. })
        ));
    }

    #[test]
    fn sagittas() -> std::result::Result<(), Box<dyn Error>> {
        let surface = Surface::paraboloid(100., 400.).spherical_aberration(1e-8);
        let x = [0., 10., -25., 30.];
        let y = [0., 0., 5., -40.];
        let sags = surface.sagittas(&x, &y)?;
        assert_eq!(sags.len(), 4);
        for ((x, y), sag) in x.iter().zip(y.iter()).zip(sags) {
            assert_eq!(sag, surface.sagitta(*x, *y)?);
        }
        assert!(matches!(
            surface.sagittas(&x, &y[..3]),
            Err(SurfaceError::Length(4, 3))
        ));
        assert!(surface.sagittas(&[60.], &[0.]).is_ok());
        assert!(Surface::new(100., 20.)
            .conic(1.)
            .sagittas(&[0., 15.], &[0., 0.])
            .is_err());
        Ok(())
    }

    #[test]
    fn conic_kinds() {
        let names: Vec<_> = ConicKind::iter().map(|k| k.to_string()).collect();
        assert_eq!(
            names,
            vec![
                "flat",
                "oblate spheroid",
                "sphere",
                "prolate spheroid",
                "paraboloid",
                "hyperboloid"
            ]
        );
        assert_eq!(ConicKind::from(0.5), ConicKind::OblateSpheroid);
        assert_eq!(ConicKind::from(0.), ConicKind::Sphere);
        assert_eq!(ConicKind::from(-0.5), ConicKind::ProlateSpheroid);
        assert_eq!(ConicKind::from(-1.), ConicKind::Paraboloid);
        assert_eq!(ConicKind::from(-1.5), ConicKind::Hyperboloid);
    }
}
