//! Illustrations
//!
//! Renders:
//!  - `foucault.png`: Foucault test of a 200mm sphere with the knife edge 10mm past focus
//!  - `ronchi.png`: Ronchi test through focus of a 10m F/5 paraboloid

use indicatif::{ParallelProgressIterator, ProgressBar};
use lenstest::{plot, MaskingElement, Pattern, Shadowgram, Surface};
use rayon::prelude::*;

fn foucault() -> anyhow::Result<()> {
    let (diameter, radius) = (200., 400.);
    let (x_offset, z_offset) = (-0.5, 10.);
    let gram = Shadowgram::new(
        Surface::sphere(diameter, radius),
        MaskingElement::knife_edge(x_offset, z_offset),
    );
    plot::plot_knife_and_screen(&gram, "foucault.png")?;
    Ok(())
}

fn ronchi() -> anyhow::Result<()> {
    let diameter = 10_000f64;
    let f_number = 5f64;
    let lp_per_mm = 0.133;
    let radius = f_number * diameter * 2f64;

    println!("    Mirror Diameter = {:.0} mm", diameter);
    println!("                 F# = {:.1}", f_number);
    println!("Radius of Curvature = {:.0} mm", radius);
    println!("       Focal Length = {:.0} mm", radius / 2f64);
    println!("   Ronchi Frequency = {:.3} lp/mm", lp_per_mm);

    let mirror = Surface::paraboloid(diameter, radius);
    let z_offsets = [-63f64, 35., 133., 231., 329., 429.];
    let pb = ProgressBar::new(z_offsets.len() as u64);
    let patterns = z_offsets
        .par_iter()
        .progress_with(pb)
        .map(|&z_offset| {
            Shadowgram::new(mirror, MaskingElement::ronchi(lp_per_mm, z_offset))
                .compute()
                .map(|pattern| (z_offset, pattern))
        })
        .collect::<lenstest::Result<Vec<(f64, Pattern)>>>()?;
    plot::plot_ronchi_sweep(&patterns, &mirror, (2, 3), "ronchi.png")?;
    Ok(())
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    foucault()?;
    ronchi()?;
    Ok(())
}
