//! Aperture sampling
//!
//! Test points are drawn either uniformly at random over the aperture disc or on a
//! regular grid clipped to the disc.
//! Grid points outside the disc are kept but flagged invalid so that the samples can be
//! reshaped into an image.

use itertools::iproduct;
use rand::{rngs::StdRng, Rng, SeedableRng};
use std::{env, f64::consts::PI};

#[derive(Debug, thiserror::Error)]
pub enum SamplingError {
    #[error("aperture diameter must be positive, found {0}mm")]
    Diameter(f64),
}
type Result<T> = std::result::Result<T, SamplingError>;

/// Sampling strategy of the aperture
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sampling {
    /// Area-uniform random points, reproducible if seeded
    Random { seed: Option<u64> },
    /// Square grid clipped to the aperture
    Grid,
}
impl Default for Sampling {
    fn default() -> Self {
        Sampling::Random { seed: None }
    }
}
impl Sampling {
    /// Random sampling seeded from the `LENSTEST_SEED` env var, if set and valid
    pub fn from_env() -> Self {
        let seed = match env::var("LENSTEST_SEED") {
            Ok(value) => match value.trim().parse::<u64>() {
                Ok(seed) => Some(seed),
                Err(e) => {
                    log::warn!("ignoring LENSTEST_SEED={value}: {e}");
                    None
                }
            },
            Err(_) => None,
        };
        Sampling::Random { seed }
    }
}

/// Layout of the samples
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    /// Unordered points
    Scattered(usize),
    /// Row-major grid, `y` is constant along a row
    Grid { rows: usize, cols: usize },
}
impl Shape {
    pub fn len(&self) -> usize {
        match *self {
            Shape::Scattered(n) => n,
            Shape::Grid { rows, cols } => rows * cols,
        }
    }
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Aperture sample points
///
/// `x`, `y` and `valid` are parallel vectors
#[derive(Debug, Clone)]
pub struct SamplePoints {
    pub x: Vec<f64>,
    pub y: Vec<f64>,
    /// `false` for grid points outside the aperture
    pub valid: Vec<bool>,
    pub shape: Shape,
}
impl SamplePoints {
    pub fn len(&self) -> usize {
        self.x.len()
    }
    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
    /// Number of points inside the aperture
    pub fn n_valid(&self) -> usize {
        self.valid.iter().filter(|&&v| v).count()
    }
    /// Iterator over the (x,y) coordinates of the points inside the aperture
    pub fn iter_valid(&self) -> impl Iterator<Item = (f64, f64)> + '_ {
        self.x
            .iter()
            .zip(self.y.iter())
            .zip(self.valid.iter())
            .filter_map(|((&x, &y), &v)| v.then_some((x, y)))
    }
}

/// Samples `n` points within an aperture of diameter `diameter` [mm]
///
/// In grid mode, the grid has `⌊√n⌋` points on each side.
pub fn sample(diameter: f64, n: usize, sampling: Sampling) -> Result<SamplePoints> {
    if diameter <= 0f64 || !diameter.is_finite() {
        return Err(SamplingError::Diameter(diameter));
    }
    let radius = 0.5 * diameter;
    let points = match sampling {
        Sampling::Random { seed } => {
            let mut rng = match seed {
                Some(seed) => StdRng::seed_from_u64(seed),
                None => StdRng::from_entropy(),
            };
            let (x, y): (Vec<f64>, Vec<f64>) = (0..n)
                .map(|_| {
                    let u1: f64 = rng.gen();
                    let u2: f64 = rng.gen();
                    let r = radius * u2.sqrt();
                    let (s, c) = (2f64 * PI * u1).sin_cos();
                    (r * c, r * s)
                })
                .unzip();
            SamplePoints {
                valid: vec![true; n],
                x,
                y,
                shape: Shape::Scattered(n),
            }
        }
        Sampling::Grid => {
            let m = (n as f64).sqrt().floor() as usize;
            let ticks = linspace(-radius, radius, m);
            let (y, x): (Vec<f64>, Vec<f64>) = iproduct!(ticks.iter(), ticks.iter())
                .map(|(&y, &x)| (y, x))
                .unzip();
            let r2 = radius * radius;
            let valid = x
                .iter()
                .zip(y.iter())
                .map(|(x, y)| x * x + y * y <= r2)
                .collect();
            SamplePoints {
                x,
                y,
                valid,
                shape: Shape::Grid { rows: m, cols: m },
            }
        }
    };
    log::debug!(
        "sampled {} points ({} inside the {}mm aperture)",
        points.len(),
        points.n_valid(),
        diameter
    );
    Ok(points)
}

fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => vec![],
        1 => vec![start],
        _ => {
            let step = (end - start) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { end } else { start + step * i as f64 })
                .collect()
        }
    }
}
