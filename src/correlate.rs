//! Phase correlation of two grids.
//!
//! Both inputs are padded onto their common canvas, transformed, and combined
//! into the cross-power spectrum `conj(F_a) * F_b`. Normalizing every bin to
//! unit magnitude keeps only phase information, so the inverse transform is a
//! sharp peak at the translation that maps `a` onto `b`. The surface holds the
//! magnitude of that inverse transform.

use num_complex::Complex64;

use crate::grid::Grid;
use crate::pad::reconcile;
use crate::spectral::{uncenter, Direction, Sample, SpectralTransform};
use crate::trace::{trace_event, trace_span};
use crate::util::math::wrap_signed;
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Added to `|C|` before dividing the cross-power spectrum by it.
///
/// Bins where both spectra vanish would otherwise divide zero by zero.
pub const SPECTRUM_EPSILON: f64 = 1e-20;

/// Configuration for a correlation call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CorrelateConfig {
    /// Un-center the inverse transform output once more.
    pub extra_shift: bool,
    /// Return only the surface maximum instead of the full surface.
    pub maximum_only: bool,
}

impl Default for CorrelateConfig {
    fn default() -> Self {
        Self {
            extra_shift: true,
            maximum_only: false,
        }
    }
}

/// Location and value of the correlation maximum.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Peak {
    /// Row index of the maximum.
    pub row: usize,
    /// Column index of the maximum.
    pub col: usize,
    /// Surface value at the maximum.
    pub value: f64,
}

/// Real-valued correlation surface together with its shift convention.
#[derive(Clone, Debug, PartialEq)]
pub struct CorrelationSurface {
    values: Grid<f64>,
    extra_shift: bool,
}

impl CorrelationSurface {
    /// Returns the surface values.
    pub fn values(&self) -> &Grid<f64> {
        &self.values
    }

    /// Consumes the surface and returns its grid.
    pub fn into_grid(self) -> Grid<f64> {
        self.values
    }

    /// Whether the extra un-centering shift was applied.
    pub fn extra_shift(&self) -> bool {
        self.extra_shift
    }

    /// Largest value on the surface.
    pub fn max_value(&self) -> f64 {
        self.values.max_value()
    }

    /// First maximum in row-major order.
    pub fn peak(&self) -> Peak {
        let width = self.values.width();
        let mut best = Peak {
            row: 0,
            col: 0,
            value: f64::NEG_INFINITY,
        };
        for (idx, &value) in self.values.as_slice().iter().enumerate() {
            if value > best.value {
                best = Peak {
                    row: idx / width,
                    col: idx % width,
                    value,
                };
            }
        }
        best
    }

    /// Integer translation `(dy, dx)` of the second input relative to the
    /// first, decoded from the peak position.
    ///
    /// Displacements wrap circularly, so values above half the canvas are
    /// reported as negative shifts.
    pub fn offset(&self) -> (isize, isize) {
        let peak = self.peak();
        let height = self.values.height();
        let width = self.values.width();
        let (row, col) = if self.extra_shift {
            ((peak.row + height / 2) % height, (peak.col + width / 2) % width)
        } else {
            (peak.row, peak.col)
        };
        (wrap_signed(row, height), wrap_signed(col, width))
    }
}

/// Result of [`correlate_with`].
#[derive(Clone, Debug, PartialEq)]
pub enum CorrelationOutput {
    Surface(CorrelationSurface),
    Peak(f64),
}

impl CorrelationOutput {
    /// Peak value, computing it from the surface when needed.
    pub fn peak_value(&self) -> f64 {
        match self {
            CorrelationOutput::Surface(surface) => surface.max_value(),
            CorrelationOutput::Peak(value) => *value,
        }
    }

    /// Returns the surface if one was produced.
    pub fn into_surface(self) -> Option<CorrelationSurface> {
        match self {
            CorrelationOutput::Surface(surface) => Some(surface),
            CorrelationOutput::Peak(_) => None,
        }
    }
}

/// Phase correlator reusing FFT plans across calls.
#[derive(Debug, Default)]
pub struct PhaseCorrelator {
    spectral: SpectralTransform,
    cfg: CorrelateConfig,
}

impl PhaseCorrelator {
    /// Creates a correlator with the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: CorrelateConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Enables row-parallel FFT passes (requires the `rayon` feature).
    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.spectral = self.spectral.with_parallel(parallel);
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &CorrelateConfig {
        &self.cfg
    }

    /// Correlates `a` with `b` according to the configuration.
    pub fn correlate<A: Sample, B: Sample>(
        &mut self,
        a: &Grid<A>,
        b: &Grid<B>,
    ) -> PhaseCorrResult<CorrelationOutput> {
        let surface = self.surface(a, b)?;
        if self.cfg.maximum_only {
            return Ok(CorrelationOutput::Peak(surface.max_value()));
        }
        Ok(CorrelationOutput::Surface(surface))
    }

    /// Computes the full correlation surface.
    pub fn surface<A: Sample, B: Sample>(
        &mut self,
        a: &Grid<A>,
        b: &Grid<B>,
    ) -> PhaseCorrResult<CorrelationSurface> {
        let _span = trace_span!(
            "correlate",
            extra_shift = self.cfg.extra_shift,
            maximum_only = self.cfg.maximum_only
        )
        .entered();

        let a = a.map(|v| v.to_complex());
        let b = b.map(|v| v.to_complex());
        let (a, b) = reconcile(&a, &b)?;

        let spectrum_a = self.spectral.complex(&a, Direction::Forward)?;
        let spectrum_b = self.spectral.complex(&b, Direction::Forward)?;
        let normalized = normalized_cross_power(&spectrum_a, &spectrum_b)?;

        let magnitude = self
            .spectral
            .complex(&normalized, Direction::Inverse)?
            .map(|z| z.norm());
        let values = if self.cfg.extra_shift {
            uncenter(&magnitude)?
        } else {
            magnitude
        };

        let surface = CorrelationSurface {
            values,
            extra_shift: self.cfg.extra_shift,
        };
        let peak = surface.peak();
        trace_event!(
            debug,
            "correlation_peak",
            row = peak.row,
            col = peak.col,
            value = peak.value
        );
        Ok(surface)
    }
}

/// Cross-power spectrum `conj(a) * b` with every bin scaled to unit magnitude.
pub fn normalized_cross_power(
    a: &Grid<Complex64>,
    b: &Grid<Complex64>,
) -> PhaseCorrResult<Grid<Complex64>> {
    if a.shape() != b.shape() {
        return Err(PhaseCorrError::Shape {
            reason: format!(
                "cross-power spectra differ in shape: {:?} vs {:?}",
                a.shape(),
                b.shape()
            ),
        });
    }
    let data = a
        .as_slice()
        .iter()
        .zip(b.as_slice())
        .map(|(fa, fb)| {
            let cross = fa.conj() * fb;
            cross / (cross.norm() + SPECTRUM_EPSILON)
        })
        .collect();
    Ok(Grid::from_raw(a.shape().to_vec(), data))
}

/// Correlates two grids and returns a surface or its peak per `cfg`.
pub fn correlate_with<A: Sample, B: Sample>(
    a: &Grid<A>,
    b: &Grid<B>,
    cfg: &CorrelateConfig,
) -> PhaseCorrResult<CorrelationOutput> {
    PhaseCorrelator::new().with_config(*cfg).correlate(a, b)
}

/// Computes the full correlation surface of two grids.
pub fn correlate<A: Sample, B: Sample>(
    a: &Grid<A>,
    b: &Grid<B>,
    extra_shift: bool,
) -> PhaseCorrResult<CorrelationSurface> {
    let cfg = CorrelateConfig {
        extra_shift,
        maximum_only: false,
    };
    PhaseCorrelator::new().with_config(cfg).surface(a, b)
}

/// Returns only the correlation peak value of two grids.
pub fn correlation_peak<A: Sample, B: Sample>(
    a: &Grid<A>,
    b: &Grid<B>,
    extra_shift: bool,
) -> PhaseCorrResult<f64> {
    Ok(correlate(a, b, extra_shift)?.max_value())
}
