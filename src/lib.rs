//! Phasecorr estimates the translation between two 2D images with
//! frequency-domain phase correlation.
//!
//! The pipeline pads both inputs onto a common centered canvas, takes their
//! centered spectra, normalizes the cross-power spectrum to unit magnitude and
//! inverse-transforms it into a correlation surface whose maximum scores how
//! well the inputs align. A stroke mask builder turns grayscale drawings into
//! binary inputs for the correlator. FFT passes can run on rayon with the
//! `rayon` feature.

pub mod correlate;
pub mod grid;
pub mod image;
pub mod mask;
pub mod pad;
pub mod spectral;
mod trace;
pub mod util;

pub use crate::image::io;

pub use crate::correlate::{
    correlate, correlate_with, correlation_peak, normalized_cross_power, CorrelateConfig,
    CorrelationOutput, CorrelationSurface, Peak, PhaseCorrelator, SPECTRUM_EPSILON,
};
pub use crate::grid::Grid;
pub use crate::image::ImageView;
pub use crate::mask::{build_mask, MaskBuilder, MaskConfig, StrokeMaskBuilder};
pub use crate::pad::{center_and_pad, crop, reconcile, CanvasSize, PadOffsets};
pub use crate::spectral::{
    transform, Direction, Representation, Sample, SpectralTransform, Spectrum, TransformMode,
};
pub use crate::util::{PhaseCorrError, PhaseCorrResult};
pub use num_complex::{Complex32, Complex64};
