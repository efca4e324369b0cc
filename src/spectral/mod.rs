//! Forward and inverse discrete Fourier transforms with centering shifts.
//!
//! The forward path computes the DFT and then moves the zero-frequency bin to
//! the center of the grid. The inverse path undoes that centering before the
//! normalized inverse DFT, so `inverse(forward(x)) == x` up to rounding. A
//! [`Representation`] is extracted from the complex result, and an optional
//! extra shift rolls the extracted output once more with the un-centering
//! convention, independently of direction.
//!
//! All arithmetic is `f64` complex regardless of the input element type.

mod fft;
mod mode;
pub(crate) mod shift;

pub use mode::{Direction, Representation, TransformMode};

use num_complex::{Complex32, Complex64};
use rustfft::FftPlanner;
use std::f64::consts::{PI, TAU};
use std::fmt;

use crate::grid::Grid;
use crate::trace::{trace_event, trace_span};
use crate::util::{PhaseCorrError, PhaseCorrResult};
use shift::{roll, Shift};

/// Numeric element types accepted by the transform.
pub trait Sample: Copy {
    /// Widens the value to a double-precision complex number.
    fn to_complex(self) -> Complex64;
}

macro_rules! impl_real_sample {
    ($($ty:ty),* $(,)?) => {
        $(
            impl Sample for $ty {
                #[inline]
                fn to_complex(self) -> Complex64 {
                    Complex64::new(self as f64, 0.0)
                }
            }
        )*
    };
}

impl_real_sample!(u8, u16, u32, i8, i16, i32, i64, f32, f64);

impl Sample for Complex32 {
    #[inline]
    fn to_complex(self) -> Complex64 {
        Complex64::new(self.re as f64, self.im as f64)
    }
}

impl Sample for Complex64 {
    #[inline]
    fn to_complex(self) -> Complex64 {
        self
    }
}

/// Output of a transform: complex values or one real-valued representation.
#[derive(Clone, Debug, PartialEq)]
pub enum Spectrum {
    Complex(Grid<Complex64>),
    Real(Grid<f64>),
}

impl Spectrum {
    /// Shape of the underlying grid.
    pub fn shape(&self) -> &[usize] {
        match self {
            Spectrum::Complex(grid) => grid.shape(),
            Spectrum::Real(grid) => grid.shape(),
        }
    }

    /// Returns the complex grid, if this is a complex spectrum.
    pub fn as_complex(&self) -> Option<&Grid<Complex64>> {
        match self {
            Spectrum::Complex(grid) => Some(grid),
            Spectrum::Real(_) => None,
        }
    }

    /// Returns the real grid, if this is a real representation.
    pub fn as_real(&self) -> Option<&Grid<f64>> {
        match self {
            Spectrum::Real(grid) => Some(grid),
            Spectrum::Complex(_) => None,
        }
    }

    /// Consumes the spectrum and returns the complex grid.
    pub fn into_complex(self) -> Option<Grid<Complex64>> {
        match self {
            Spectrum::Complex(grid) => Some(grid),
            Spectrum::Real(_) => None,
        }
    }

    /// Consumes the spectrum and returns the real grid.
    pub fn into_real(self) -> Option<Grid<f64>> {
        match self {
            Spectrum::Real(grid) => Some(grid),
            Spectrum::Complex(_) => None,
        }
    }

    fn uncentered(self, height: usize, width: usize) -> Self {
        match self {
            Spectrum::Complex(grid) => Spectrum::Complex(roll_grid(&grid, height, width)),
            Spectrum::Real(grid) => Spectrum::Real(roll_grid(&grid, height, width)),
        }
    }
}

fn roll_grid<T: Copy>(grid: &Grid<T>, height: usize, width: usize) -> Grid<T> {
    let data = roll(grid.as_slice(), height, width, Shift::Uncenter);
    Grid::from_raw(grid.shape().to_vec(), data)
}

/// Applies one `ifftshift` to a rank-1 or rank-2 grid.
pub(crate) fn uncenter<T: Copy>(grid: &Grid<T>) -> PhaseCorrResult<Grid<T>> {
    let (height, width) = spectral_dims(grid)?;
    Ok(roll_grid(grid, height, width))
}

impl Representation {
    fn extract(self, grid: Grid<Complex64>) -> Spectrum {
        match self {
            Representation::Complex => Spectrum::Complex(grid),
            Representation::Magnitude => Spectrum::Real(grid.map(|z| z.norm())),
            Representation::Phase => Spectrum::Real(grid.map(|z| principal_arg(*z))),
            Representation::Real => Spectrum::Real(grid.map(|z| z.re)),
            Representation::Imag => Spectrum::Real(grid.map(|z| z.im)),
        }
    }
}

/// Argument of `z` folded into `(-pi, pi]`.
fn principal_arg(z: Complex64) -> f64 {
    let arg = z.arg();
    if arg <= -PI {
        arg + TAU
    } else {
        arg
    }
}

/// Reusable transform engine that caches FFT plans across calls.
pub struct SpectralTransform {
    planner: FftPlanner<f64>,
    parallel: bool,
}

impl Default for SpectralTransform {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for SpectralTransform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpectralTransform")
            .field("parallel", &self.parallel)
            .finish_non_exhaustive()
    }
}

impl SpectralTransform {
    /// Creates a sequential transform engine.
    pub fn new() -> Self {
        Self {
            planner: FftPlanner::new(),
            parallel: false,
        }
    }

    /// Runs row and column passes on the rayon pool when the `rayon` feature
    /// is enabled. Ignored otherwise.
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Transforms a rank-1 or rank-2 grid and extracts `mode.representation`.
    ///
    /// With `extra_shift` the extracted output is un-centered once more.
    pub fn transform<T: Sample>(
        &mut self,
        grid: &Grid<T>,
        mode: TransformMode,
        extra_shift: bool,
    ) -> PhaseCorrResult<Spectrum> {
        let (height, width) = spectral_dims(grid)?;
        let _span = trace_span!(
            "transform",
            mode = %mode,
            height = height,
            width = width,
            extra_shift = extra_shift
        )
        .entered();

        let complex = self.complex(grid, mode.direction)?;
        let spectrum = mode.representation.extract(complex);
        if extra_shift {
            return Ok(spectrum.uncentered(height, width));
        }
        Ok(spectrum)
    }

    /// Core transform without representation extraction or extra shift.
    pub(crate) fn complex<T: Sample>(
        &mut self,
        grid: &Grid<T>,
        direction: Direction,
    ) -> PhaseCorrResult<Grid<Complex64>> {
        let (height, width) = spectral_dims(grid)?;
        let mut data: Vec<Complex64> = grid.as_slice().iter().map(|v| v.to_complex()).collect();

        let data = match direction {
            Direction::Forward => {
                fft::dft_2d(
                    &mut self.planner,
                    &mut data,
                    height,
                    width,
                    direction,
                    self.parallel,
                );
                roll(&data, height, width, Shift::Center)
            }
            Direction::Inverse => {
                let mut data = roll(&data, height, width, Shift::Uncenter);
                fft::dft_2d(
                    &mut self.planner,
                    &mut data,
                    height,
                    width,
                    direction,
                    self.parallel,
                );
                data
            }
        };
        trace_event!(trace, "dft", len = data.len());
        Ok(Grid::from_raw(grid.shape().to_vec(), data))
    }
}

/// One-shot transform with a temporary plan cache.
pub fn transform<T: Sample>(
    grid: &Grid<T>,
    mode: TransformMode,
    extra_shift: bool,
) -> PhaseCorrResult<Spectrum> {
    SpectralTransform::new().transform(grid, mode, extra_shift)
}

fn spectral_dims<T>(grid: &Grid<T>) -> PhaseCorrResult<(usize, usize)> {
    match grid.shape() {
        [width] => Ok((1, *width)),
        [height, width] => Ok((*height, *width)),
        _ => Err(PhaseCorrError::UnsupportedRank {
            rank: grid.rank(),
            supported: "1 or 2",
            context: "spectral transform",
        }),
    }
}
