//! # Non-interferometric lens and mirror testing
//!
//! Simulation of the shadowgrams seen when testing a conic mirror or lens with
//! a Foucault knife edge or with a Ronchi ruling.
//!
//! A point source located at the center of curvature of the surface illuminates the whole
//! aperture; the reflected cone of light is intercepted by the masking element located
//! `z_offset` from focus before reaching the screen.
//! The aperture is sampled with random or gridded points and each point is shown lit or
//! dark depending on whether its ray goes past the masking element.
//!
//! ```no_run
//! use lenstest::{MaskingElement, Sampling, Shadowgram, Surface};
//!
//! # fn main() -> lenstest::Result<()> {
//! let mirror = Surface::paraboloid(200., 1600.);
//! let pattern = Shadowgram::new(mirror, MaskingElement::ronchi(10., 5.))
//!     .sampling(Sampling::Grid)
//!     .compute()?;
//! println!("{} lit points", pattern.n_visible());
//! # Ok(())
//! # }
//! ```

mod error;
pub mod export;
pub mod geometry;
pub mod mask;
pub mod pattern;
#[cfg(feature = "plot")]
pub mod plot;
pub mod projection;
pub mod sampling;
pub mod surface;

pub use error::Error;
pub use mask::MaskingElement;
pub use pattern::{foucaugram, ronchigram, Pattern, Shadowgram, N_SAMPLE};
pub use sampling::{sample, SamplePoints, Sampling, Shape};
pub use surface::{sagitta, ConicKind, Surface};

pub type Result<T> = std::result::Result<T, Error>;
