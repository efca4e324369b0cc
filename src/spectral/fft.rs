//! Separable row/column DFT passes on top of `rustfft`.
//!
//! Forward transforms are unnormalized; inverse transforms scale by
//! `1 / (height * width)` so a forward/inverse pair is the identity.

use num_complex::Complex64;
use rustfft::{Fft, FftPlanner};
use std::sync::Arc;

#[cfg(feature = "rayon")]
use rayon::prelude::*;

use super::Direction;

/// Runs the DFT over every row, then every column, of a row-major buffer.
///
/// Rank-1 data is passed with `height == 1` and only gets the row pass.
pub(crate) fn dft_2d(
    planner: &mut FftPlanner<f64>,
    data: &mut [Complex64],
    height: usize,
    width: usize,
    direction: Direction,
    parallel: bool,
) {
    debug_assert_eq!(data.len(), height * width);

    let row_fft = plan(planner, width, direction);
    process_lines(&row_fft, data, width, parallel);

    if height > 1 {
        let col_fft = plan(planner, height, direction);
        let mut columns = transpose(data, height, width);
        process_lines(&col_fft, &mut columns, height, parallel);
        let rows = transpose(&columns, width, height);
        data.copy_from_slice(&rows);
    }

    if direction == Direction::Inverse {
        let scale = 1.0 / (height * width) as f64;
        data.iter_mut().for_each(|v| *v *= scale);
    }
}

fn plan(planner: &mut FftPlanner<f64>, len: usize, direction: Direction) -> Arc<dyn Fft<f64>> {
    match direction {
        Direction::Forward => planner.plan_fft_forward(len),
        Direction::Inverse => planner.plan_fft_inverse(len),
    }
}

#[cfg(feature = "rayon")]
fn process_lines(fft: &Arc<dyn Fft<f64>>, data: &mut [Complex64], len: usize, parallel: bool) {
    if parallel {
        data.par_chunks_mut(len).for_each(|line| fft.process(line));
    } else {
        fft.process(data);
    }
}

#[cfg(not(feature = "rayon"))]
fn process_lines(fft: &Arc<dyn Fft<f64>>, data: &mut [Complex64], _len: usize, _parallel: bool) {
    // rustfft batches buffers that hold a whole number of lines.
    fft.process(data);
}

fn transpose(data: &[Complex64], rows: usize, cols: usize) -> Vec<Complex64> {
    let mut out = vec![Complex64::new(0.0, 0.0); data.len()];
    for y in 0..rows {
        for x in 0..cols {
            out[x * rows + y] = data[y * cols + x];
        }
    }
    out
}
