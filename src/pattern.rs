//! Foucault and Ronchi shadowgrams
//!
//! A [Shadowgram] samples the surface aperture, projects each sample onto the masking
//! element and keeps track of the samples that reach the screen.

use crate::{
    mask::MaskingElement,
    projection,
    sampling::{self, SamplePoints, Sampling, Shape},
    surface::Surface,
    Error,
};
use std::time::Instant;

type Result<T> = std::result::Result<T, Error>;

/// Default number of sample points
pub const N_SAMPLE: usize = 100_000;

/// Shadowgram builder
#[derive(Debug, Clone)]
pub struct Shadowgram {
    surface: Surface,
    element: MaskingElement,
    n_sample: usize,
    sampling: Sampling,
    invert: bool,
    at_mask: bool,
}
impl Shadowgram {
    pub fn new(surface: Surface, element: MaskingElement) -> Self {
        Self {
            surface,
            element,
            n_sample: N_SAMPLE,
            sampling: Sampling::default(),
            invert: false,
            at_mask: false,
        }
    }
    /// Number of sample points
    pub fn samples(self, n_sample: usize) -> Self {
        Self { n_sample, ..self }
    }
    pub fn sampling(self, sampling: Sampling) -> Self {
        Self { sampling, ..self }
    }
    /// Swaps light and dark
    pub fn invert(self, invert: bool) -> Self {
        Self { invert, ..self }
    }
    /// Shows the beam at the masking element instead of the surface
    pub fn at_mask(self, at_mask: bool) -> Self {
        Self { at_mask, ..self }
    }
    pub fn surface(&self) -> &Surface {
        &self.surface
    }
    pub fn element(&self) -> &MaskingElement {
        &self.element
    }
    /// Classifies a given set of sample points
    ///
    /// Returns one entry per sample: `Some(true)` for light, `Some(false)` for dark and
    /// `None` for samples outside the aperture
    pub fn transmission(&self, points: &SamplePoints) -> Result<Vec<Option<bool>>> {
        let surface = self.surface.validate()?;
        let element = self.element.validate()?;
        let lx = projection::project(
            &surface,
            element.z_offset(),
            points,
            element.phi(),
            self.at_mask,
        )?;
        Ok(lx
            .into_iter()
            .zip(points.valid.iter())
            .map(|(lx, &valid)| {
                if valid {
                    element.classify(lx, self.invert)
                } else {
                    None
                }
            })
            .collect())
    }
    /// Samples the aperture and computes the shadowgram
    pub fn compute(&self) -> Result<Pattern> {
        let now = Instant::now();
        log::debug!("{} | {}", self.surface, self.element);
        let surface = self.surface.validate()?;
        self.element.validate()?;
        let points = sampling::sample(surface.diameter, self.n_sample, self.sampling)?;
        let transmission = self.transmission(&points)?;
        let undefined = transmission
            .iter()
            .zip(points.valid.iter())
            .filter(|&(t, &v)| v && t.is_none())
            .count();
        if undefined > 0 {
            log::warn!("{undefined} rays miss the masking plane");
        }
        let visible: Vec<bool> = transmission
            .into_iter()
            .map(|t| t.unwrap_or_default())
            .collect();
        let scale = match self.element {
            MaskingElement::RonchiRuling { z_offset, .. } if self.at_mask => {
                (z_offset / self.surface.radius).abs()
            }
            _ => 1f64,
        };
        let SamplePoints { x, y, shape, .. } = points;
        let pattern = Pattern {
            x: x.into_iter().map(|x| x * scale).collect(),
            y: y.into_iter().map(|y| y * scale).collect(),
            visible,
            shape,
            scale,
        };
        log::info!(
            "{}/{} visible points in {}ms",
            pattern.n_visible(),
            pattern.len(),
            now.elapsed().as_millis()
        );
        Ok(pattern)
    }
}

/// Shadowgram sample points
///
/// The points are in the same order as the aperture samples; `visible` is `false` for
/// samples that are dark or outside the aperture.
#[derive(Debug, Clone)]
pub struct Pattern {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    pub visible: Vec<bool>,
    pub shape: Shape,
    /// coordinates scaling from the surface to the display plane
    pub scale: f64,
}
impl Pattern {
    pub fn len(&self) -> usize {
        self.x.len()
    }
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
    pub fn n_visible(&self) -> usize {
        self.visible.iter().filter(|&&v| v).count()
    }
    /// Ratio of visible points to the total number of points
    pub fn visible_fraction(&self) -> f64 {
        if self.is_empty() {
            0f64
        } else {
            self.n_visible() as f64 / self.len() as f64
        }
    }
    /// Iterator over the (x,y) coordinates of the visible points
    pub fn iter_visible(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .zip(self.visible.iter())
            .filter_map(|((&x, &y), &v)| v.then_some((x, y)))
    }
    /// Mask of the hidden points
    pub fn hidden(&self) -> Vec<bool> {
        self.visible.iter().map(|v| !v).collect()
    }
}

/// Foucault knife edge shadowgram
///
/// * `diameter`: surface diameter [mm]
/// * `radius`: radius of curvature [mm]
/// * `x_offset`: knife edge transverse offset [mm]
/// * `z_offset`: knife edge axial offset from focus [mm]
/// * `conic`: conic constant
/// * `phi`: knife edge rotation [rd]
#[allow(clippy::too_many_arguments)]
pub fn foucaugram(
    diameter: f64,
    radius: f64,
    x_offset: f64,
    z_offset: f64,
    conic: f64,
    phi: f64,
    n_sample: usize,
    invert: bool,
    sampling: Sampling,
) -> Result<Pattern> {
    Shadowgram::new(
        Surface::new(diameter, radius).conic(conic),
        MaskingElement::knife_edge(x_offset, z_offset).rotation(phi),
    )
    .samples(n_sample)
    .sampling(sampling)
    .invert(invert)
    .compute()
}

/// Ronchi ruling shadowgram
///
/// * `diameter`: surface diameter [mm]
/// * `radius`: radius of curvature [mm]
/// * `lines_per_mm`: ruling frequency [lp/mm]
/// * `z_offset`: ruling axial offset from focus [mm]
/// * `conic`: conic constant
/// * `phi`: ruling rotation [rd]
/// * `at_mask`: shows the beam footprint on the ruling
#[allow(clippy::too_many_arguments)]
pub fn ronchigram(
    diameter: f64,
    radius: f64,
    lines_per_mm: f64,
    z_offset: f64,
    conic: f64,
    phi: f64,
    n_sample: usize,
    invert: bool,
    sampling: Sampling,
    at_mask: bool,
) -> Result<Pattern> {
    Shadowgram::new(
        Surface::new(diameter, radius).conic(conic),
        MaskingElement::ronchi(lines_per_mm, z_offset).rotation(phi),
    )
    .samples(n_sample)
    .sampling(sampling)
    .invert(invert)
    .at_mask(at_mask)
    .compute()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::SurfaceError;

    const SEED: Sampling = Sampling::Random { seed: Some(2021) };

    #[test]
    fn foucault_shape() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let pattern = foucaugram(100., 200., 10., 10., 0., 0., N_SAMPLE, false, SEED)?;
        assert_eq!(pattern.len(), 100_000);
        assert_eq!(pattern.y.len(), 100_000);
        assert_eq!(pattern.visible.len(), 100_000);
        assert_eq!(pattern.shape, Shape::Scattered(100_000));
        Ok(())
    }

    #[test]
    fn ronchi_shape() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let pattern = ronchigram(100., 200., 10., 10., 0., 0., N_SAMPLE, true, SEED, false)?;
        assert_eq!(pattern.len(), 100_000);
        assert!(pattern.n_visible() > 0);
        Ok(())
    }

    #[test]
    fn invert_is_complement() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let surface = Surface::paraboloid(100., 400.);
        for element in [
            MaskingElement::knife_edge(0.5, 5.).rotation(0.4),
            MaskingElement::ronchi(2., -8.),
        ] {
            let gram = Shadowgram::new(surface, element).samples(5_000).sampling(SEED);
            let a = gram.clone().compute()?;
            let b = gram.invert(true).compute()?;
            assert_eq!(a.x, b.x);
            assert!(a.visible.iter().zip(b.visible.iter()).all(|(a, b)| a ^ b));
            assert_eq!(a.hidden(), b.visible);
        }
        Ok(())
    }

    #[test]
    fn grid_keeps_positions() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let gram = Shadowgram::new(Surface::sphere(100., 200.), MaskingElement::ronchi(1., 20.))
            .samples(2_500)
            .sampling(Sampling::Grid);
        let points = sampling::sample(100., 2_500, Sampling::Grid)?;
        let transmission = gram.transmission(&points)?;
        let pattern = gram.compute()?;
        assert_eq!(pattern.shape, Shape::Grid { rows: 50, cols: 50 });
        assert_eq!(pattern.x, points.x);
        for ((t, v), &valid) in transmission
            .iter()
            .zip(pattern.visible.iter())
            .zip(points.valid.iter())
        {
            assert_eq!(t.is_some(), valid);
            assert_eq!(t.unwrap_or_default(), *v);
        }
        // inverting never lights up samples outside the aperture
        let inverted = gram.invert(true).compute()?;
        assert!(inverted
            .visible
            .iter()
            .zip(points.valid.iter())
            .all(|(&v, &valid)| valid || !v));
        Ok(())
    }

    #[test]
    fn knife_monotonic() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let surface = Surface::paraboloid(100., 200.);
        let mut last = f64::INFINITY;
        for k in 0..=20 {
            let x_offset = -3. + 0.3 * k as f64;
            let fraction = Shadowgram::new(surface, MaskingElement::knife_edge(x_offset, 10.))
                .samples(20_000)
                .sampling(SEED)
                .compute()?
                .visible_fraction();
            println!("x_offset={x_offset:+.1}mm: {fraction:.3}");
            assert!(fraction <= last);
            last = fraction;
        }
        Ok(())
    }

    #[test]
    fn knife_on_axis_halves_sphere() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let pattern = foucaugram(100., 200., 0., 10., 0., 0., 40_000, false, SEED)?;
        let fraction = pattern.visible_fraction();
        assert!((fraction - 0.5).abs() < 0.02, "{fraction}");
        // beyond focus the rays cross over: the lit half faces the knife
        assert!(pattern.iter_visible().all(|(x, _)| x <= 0.));
        Ok(())
    }

    #[test]
    fn degenerate_knife_at_focus() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let pattern = foucaugram(100., 200., 5., 0., 0., 0., 10_000, false, SEED)?;
        assert_eq!(pattern.n_visible(), 0);
        let pattern = foucaugram(100., 200., -5., 0., 0., 0., 10_000, false, SEED)?;
        assert_eq!(pattern.n_visible(), pattern.len());
        Ok(())
    }

    #[test]
    fn ronchi_at_mask_scaling() -> std::result::Result<(), Box<dyn std::error::Error>> {
        let gram = Shadowgram::new(Surface::sphere(100., 200.), MaskingElement::ronchi(1., 20.))
            .samples(1_000)
            .sampling(SEED);
        let surface = gram.clone().compute()?;
        let mask = gram.at_mask(true).compute()?;
        assert_eq!(mask.scale, 0.1);
        for (a, b) in surface.x.iter().zip(mask.x.iter()) {
            assert!((a * 0.1 - b).abs() < 1e-12);
        }
        let spot = 0.5 * Surface::sphere(100., 200.).spot_diameter(20.);
        assert!(mask.iter_visible().all(|(x, y)| x.hypot(y) <= spot + 1e-9));
        Ok(())
    }

    #[test]
    fn invalid_inputs() {
        let err = Shadowgram::new(Surface::sphere(100., 200.), MaskingElement::ronchi(0., 5.))
            .samples(10)
            .compute();
        assert!(matches!(err, Err(Error::Mask(_))));
        let err = foucaugram(0., 200., 0., 5., 0., 0., 10, false, SEED);
        assert!(matches!(err, Err(Error::Surface(SurfaceError::Diameter(_)))));
        let err = foucaugram(100., 0., 0., 5., 0., 0., 10, false, SEED);
        assert!(matches!(err, Err(Error::Surface(SurfaceError::Radius))));
        let err = foucaugram(100., 20., 0., 5., 1., 0., 10, false, SEED);
        assert!(matches!(
            err,
            Err(Error::Surface(SurfaceError::Geometry { .. }))
        ));
        let err = foucaugram(100., 200., 0., 5., f64::NAN, 0., 10, false, SEED);
        assert!(matches!(err, Err(Error::Surface(SurfaceError::Conic(_)))));
        let err = Shadowgram::new(
            Surface::sphere(100., 200.).spherical_aberration(f64::NAN),
            MaskingElement::ronchi(1., 5.),
        )
        .samples(10)
        .compute();
        assert!(matches!(
            err,
            Err(Error::Surface(SurfaceError::Coefficient(..)))
        ));
    }

    #[test]
    fn hemisphere_on_grid() -> std::result::Result<(), Box<dyn std::error::Error>> {
        // grid samples reach the rim of a surface that is defined up to its edge
        let gram = Shadowgram::new(Surface::sphere(20., 10.), MaskingElement::knife_edge(0., 2.))
            .samples(441)
            .sampling(Sampling::Grid);
        let pattern = gram.compute()?;
        assert_eq!(pattern.shape, Shape::Grid { rows: 21, cols: 21 });
        assert!(pattern.n_visible() > 0);
        let pattern = gram.sampling(SEED).compute()?;
        assert_eq!(pattern.len(), 441);
        Ok(())
    }
}
