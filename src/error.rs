use crate::{
    export::ExportError, mask::MaskError, sampling::SamplingError, surface::SurfaceError,
};

#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("Error in the `surface` module")]
    Surface(#[from] SurfaceError),
    #[error("Error in the `sampling` module")]
    Sampling(#[from] SamplingError),
    #[error("Error in the `mask` module")]
    Mask(#[from] MaskError),
    #[error("Error in the `export` module")]
    Export(#[from] ExportError),
    #[cfg(feature = "plot")]
    #[error("Error in the `plot` module")]
    Plot(#[from] crate::plot::PlotError),
}
