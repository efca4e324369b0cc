//! Stroke masks: binarized grayscale images used as correlation inputs.
//!
//! The stroke builder assumes dark strokes on a light, evenly lit background.
//! It smooths the image repeatedly, applies an inverse global threshold so
//! strokes become the high value, then cleans the result with a closing, an
//! opening and a final erosion. The threshold is global, so the input should
//! contain little besides the strokes.
//!
//! The filters come from `imageproc`: blurring replicates edge pixels, and
//! the square morphology only looks at pixels inside the image. Blur passes
//! accumulate in `f32` and are rounded to `u8` before thresholding.

use image::{GrayImage, ImageBuffer, Luma};
use imageproc::contrast::{threshold, ThresholdType};
use imageproc::distance_transform::Norm;
use imageproc::filter::separable_filter_equal;
use imageproc::morphology::{close, erode, open};

use crate::grid::Grid;
use crate::image::io::{gray_image_from_view, grid_from_owned_gray_image};
use crate::image::ImageView;
use crate::trace::{trace_event, trace_span};
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Produces a two-valued mask with the same shape as the input image.
pub trait MaskBuilder {
    /// Builds the mask; foreground pixels carry the high value.
    fn build_mask(&self, image: ImageView<'_, u8>) -> PhaseCorrResult<Grid<u8>>;
}

/// Parameters of the stroke mask recipe.
#[derive(Clone, Debug, PartialEq)]
pub struct MaskConfig {
    /// Number of Gaussian blur passes.
    pub blur_passes: usize,
    /// Gaussian kernel size (odd).
    pub blur_kernel: usize,
    /// Gaussian sigma; `None` derives it from the kernel size.
    pub blur_sigma: Option<f32>,
    /// Pixels at or below this value are strokes.
    pub threshold: u8,
    /// Value written for stroke pixels; background is 0.
    pub foreground: u8,
    /// Square closing kernel size (odd).
    pub close_kernel: usize,
    /// Square opening kernel size (odd).
    pub open_kernel: usize,
    /// Square erosion kernel size (odd).
    pub erode_kernel: usize,
    /// Number of final erosion passes.
    pub erode_iterations: usize,
}

impl Default for MaskConfig {
    fn default() -> Self {
        Self {
            blur_passes: 10,
            blur_kernel: 5,
            blur_sigma: None,
            threshold: 100,
            foreground: 255,
            close_kernel: 5,
            open_kernel: 5,
            erode_kernel: 3,
            erode_iterations: 2,
        }
    }
}

impl MaskConfig {
    fn validate(&self) -> PhaseCorrResult<()> {
        let kernels = [self.blur_kernel, self.close_kernel, self.open_kernel, self.erode_kernel];
        if kernels.iter().any(|&k| k == 0 || k % 2 == 0) {
            return Err(PhaseCorrError::InvalidConfig {
                reason: "kernel sizes must be odd and non-zero",
            });
        }
        if self.blur_sigma.is_some_and(|sigma| !sigma.is_finite()) {
            return Err(PhaseCorrError::InvalidConfig {
                reason: "blur sigma must be finite",
            });
        }
        if self.foreground == 0 {
            return Err(PhaseCorrError::InvalidConfig {
                reason: "foreground must differ from the zero background",
            });
        }
        Ok(())
    }
}

/// Chebyshev radius of a square structuring element of odd side `size`.
fn square_radius(size: usize) -> PhaseCorrResult<u8> {
    u8::try_from(size / 2).map_err(|_| PhaseCorrError::InvalidConfig {
        reason: "morphology kernels are limited to 511 pixels",
    })
}

/// Normalized 1D Gaussian kernel of odd length `size`.
///
/// Without a positive sigma, sizes up to 7 use the binomial taps
/// (`[1, 4, 6, 4, 1] / 16` for size 5) and larger sizes use
/// `sigma = 0.3 * ((size - 1) / 2 - 1) + 0.8`.
pub(crate) fn gaussian_kernel(size: usize, sigma: Option<f32>) -> Vec<f32> {
    const BINOMIAL: [&[f32]; 4] = [
        &[1.0],
        &[0.25, 0.5, 0.25],
        &[0.0625, 0.25, 0.375, 0.25, 0.0625],
        &[0.03125, 0.109375, 0.21875, 0.28125, 0.21875, 0.109375, 0.03125],
    ];
    let sigma = match sigma {
        Some(sigma) if sigma > 0.0 => sigma,
        _ if size <= 7 => return BINOMIAL[size / 2].to_vec(),
        _ => 0.3 * ((size as f32 - 1.0) * 0.5 - 1.0) + 0.8,
    };
    let mean = (size - 1) as f32 / 2.0;
    let denom = 2.0 * sigma * sigma;
    let mut kernel: Vec<f32> = (0..size)
        .map(|i| {
            let x = i as f32 - mean;
            (-(x * x) / denom).exp()
        })
        .collect();
    let norm: f32 = kernel.iter().sum();
    kernel.iter_mut().for_each(|k| *k /= norm);
    kernel
}

/// Runs the blur passes in `f32` and rounds back to `u8` once.
fn smooth(gray: &GrayImage, cfg: &MaskConfig) -> GrayImage {
    if cfg.blur_passes == 0 {
        return gray.clone();
    }
    let kernel = gaussian_kernel(cfg.blur_kernel, cfg.blur_sigma);
    let mut acc: ImageBuffer<Luma<f32>, Vec<f32>> =
        ImageBuffer::from_fn(gray.width(), gray.height(), |x, y| {
            Luma([f32::from(gray.get_pixel(x, y)[0])])
        });
    for _ in 0..cfg.blur_passes {
        acc = separable_filter_equal(&acc, &kernel);
    }
    GrayImage::from_fn(gray.width(), gray.height(), |x, y| {
        Luma([acc.get_pixel(x, y)[0].round().clamp(0.0, 255.0) as u8])
    })
}

/// Blur, inverse threshold, close, open and erode.
#[derive(Clone, Debug, Default)]
pub struct StrokeMaskBuilder {
    cfg: MaskConfig,
}

impl StrokeMaskBuilder {
    /// Creates a builder with the default recipe.
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the configuration.
    pub fn with_config(mut self, cfg: MaskConfig) -> Self {
        self.cfg = cfg;
        self
    }

    /// Returns the active configuration.
    pub fn config(&self) -> &MaskConfig {
        &self.cfg
    }
}

impl MaskBuilder for StrokeMaskBuilder {
    fn build_mask(&self, image: ImageView<'_, u8>) -> PhaseCorrResult<Grid<u8>> {
        self.cfg.validate()?;
        let cfg = &self.cfg;
        let close_radius = square_radius(cfg.close_kernel)?;
        let open_radius = square_radius(cfg.open_kernel)?;
        let erode_radius = square_radius(cfg.erode_kernel)?;
        let _span = trace_span!("build_mask", width = image.width(), height = image.height())
            .entered();

        let gray = gray_image_from_view(image)?;
        let smoothed = smooth(&gray, cfg);

        let mut img = threshold(&smoothed, cfg.threshold, ThresholdType::BinaryInverted);
        img = close(&img, Norm::LInf, close_radius);
        img = open(&img, Norm::LInf, open_radius);
        for _ in 0..cfg.erode_iterations {
            img = erode(&img, Norm::LInf, erode_radius);
        }

        let mut mask = grid_from_owned_gray_image(img)?;
        let mut foreground = 0usize;
        for v in mask.as_mut_slice().iter_mut().filter(|v| **v != 0) {
            *v = cfg.foreground;
            foreground += 1;
        }
        trace_event!(debug, "mask", foreground = foreground, total = mask.len());
        Ok(mask)
    }
}

/// Builds a stroke mask with the default recipe.
pub fn build_mask(image: ImageView<'_, u8>) -> PhaseCorrResult<Grid<u8>> {
    StrokeMaskBuilder::new().build_mask(image)
}
