use lenstest::{MaskingElement, Sampling, Shadowgram, Surface};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
struct SurfaceOpt {
    /// Surface diameter [mm]
    #[structopt(short, long)]
    diameter: f64,
    /// Surface radius of curvature [mm]
    #[structopt(short, long)]
    radius: f64,
    /// Conic constant (inf for a flat)
    #[structopt(short, long, default_value = "0")]
    conic: f64,
    /// Spherical aberration coefficient [1/mm^3]
    #[structopt(long, default_value = "0")]
    a1: f64,
    /// Defocus coefficient [1/mm]
    #[structopt(long, default_value = "0")]
    defocus: f64,
}
impl From<&SurfaceOpt> for Surface {
    fn from(opt: &SurfaceOpt) -> Self {
        Surface::new(opt.diameter, opt.radius)
            .conic(opt.conic)
            .spherical_aberration(opt.a1)
            .defocus(opt.defocus)
    }
}

#[derive(Debug, StructOpt)]
struct SamplingOpt {
    /// Number of sample points
    #[structopt(short, default_value = "100000")]
    n: usize,
    /// Sample the aperture on a grid
    #[structopt(long)]
    grid: bool,
    /// Random sampling seed, defaults to $LENSTEST_SEED
    #[structopt(long)]
    seed: Option<u64>,
    /// Swap light and dark
    #[structopt(long)]
    invert: bool,
    /// Save the shadowgram points to a CSV file
    #[structopt(long)]
    csv: Option<String>,
    /// Plot the shadowgram to a PNG file
    #[structopt(long)]
    plot: Option<String>,
}
impl SamplingOpt {
    fn sampling(&self) -> Sampling {
        match (self.grid, self.seed) {
            (true, _) => Sampling::Grid,
            (false, Some(seed)) => Sampling::Random { seed: Some(seed) },
            (false, None) => Sampling::from_env(),
        }
    }
}

#[derive(Debug, StructOpt)]
#[structopt(name = "lenstest", about = "Foucault and Ronchi shadowgrams of conic surfaces")]
enum Opt {
    /// Foucault knife edge test
    Foucault {
        #[structopt(flatten)]
        surface: SurfaceOpt,
        /// Knife edge axial offset from focus [mm]
        #[structopt(short, long)]
        z_offset: f64,
        /// Knife edge transverse offset [mm]
        #[structopt(short, long, default_value = "0")]
        x_offset: f64,
        /// Knife edge rotation [deg]
        #[structopt(long, default_value = "0")]
        phi: f64,
        #[structopt(flatten)]
        sampling: SamplingOpt,
    },
    /// Ronchi ruling test
    Ronchi {
        #[structopt(flatten)]
        surface: SurfaceOpt,
        /// Ruling axial offset from focus [mm]
        #[structopt(short, long)]
        z_offset: f64,
        /// Ruling frequency [lp/mm]
        #[structopt(short, long)]
        lpm: f64,
        /// Ruling rotation [deg]
        #[structopt(long, default_value = "0")]
        phi: f64,
        /// Show the beam on the ruling instead of the surface
        #[structopt(long)]
        at_mask: bool,
        #[structopt(flatten)]
        sampling: SamplingOpt,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let opt = Opt::from_args();

    let (gram, opts) = match &opt {
        Opt::Foucault {
            surface,
            z_offset,
            x_offset,
            phi,
            sampling,
        } => (
            Shadowgram::new(
                surface.into(),
                MaskingElement::knife_edge(*x_offset, *z_offset).rotation(phi.to_radians()),
            ),
            sampling,
        ),
        Opt::Ronchi {
            surface,
            z_offset,
            lpm,
            phi,
            at_mask,
            sampling,
        } => (
            Shadowgram::new(
                surface.into(),
                MaskingElement::ronchi(*lpm, *z_offset).rotation(phi.to_radians()),
            )
            .at_mask(*at_mask),
            sampling,
        ),
    };
    let gram = gram
        .samples(opts.n)
        .sampling(opts.sampling())
        .invert(opts.invert);

    let pattern = gram.compute()?;
    println!("{}", gram.surface());
    println!("{}", gram.element());
    println!(
        "{}/{} points lit ({:.1}%)",
        pattern.n_visible(),
        pattern.len(),
        1e2 * pattern.visible_fraction()
    );

    if let Some(filename) = &opts.csv {
        pattern.to_csv(filename)?;
    }
    if let Some(filename) = &opts.plot {
        plot(&gram, filename)?;
    }

    Ok(())
}

#[cfg(feature = "plot")]
fn plot(gram: &Shadowgram, filename: &str) -> lenstest::Result<()> {
    match gram.element() {
        MaskingElement::KnifeEdge { .. } => lenstest::plot::plot_knife_and_screen(gram, filename),
        MaskingElement::RonchiRuling { .. } => lenstest::plot::plot_ruling_and_screen(gram, filename),
    }
}
#[cfg(not(feature = "plot"))]
fn plot(_gram: &Shadowgram, filename: &str) -> lenstest::Result<()> {
    log::warn!("{filename} skipped: lenstest was built without the `plot` feature");
    Ok(())
}
