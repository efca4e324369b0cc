//! Borrowed image views for grayscale inputs.
//!
//! `ImageView` is a borrowed 2D view into a 1D buffer with an explicit stride.
//! The stride counts elements between the starts of consecutive rows, so a
//! stride larger than the width represents padded rows. Views are the entry
//! point for pixel data coming from outside the crate; `to_grid` copies the
//! visible pixels into a contiguous [`Grid`].

use crate::grid::Grid;
use crate::util::{PhaseCorrError, PhaseCorrResult};

pub mod io;

/// Borrowed 2D image view with an explicit stride.
#[derive(Copy, Clone, Debug)]
pub struct ImageView<'a, T> {
    data: &'a [T],
    width: usize,
    height: usize,
    stride: usize,
}

impl<'a, T> ImageView<'a, T> {
    /// Creates a contiguous view with `stride == width`.
    pub fn from_slice(data: &'a [T], width: usize, height: usize) -> PhaseCorrResult<Self> {
        Self::new(data, width, height, width)
    }

    /// Creates a view with an explicit stride.
    pub fn new(data: &'a [T], width: usize, height: usize, stride: usize) -> PhaseCorrResult<Self> {
        let needed = required_len(width, height, stride)?;
        if data.len() < needed {
            return Err(PhaseCorrError::BufferTooSmall {
                needed,
                got: data.len(),
            });
        }
        Ok(Self {
            data,
            width,
            height,
            stride,
        })
    }

    /// Returns the image width in pixels.
    pub fn width(&self) -> usize {
        self.width
    }

    /// Returns the image height in pixels.
    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns the stride in elements between row starts.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Returns the element at `(x, y)` if it is within bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&'a T> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = y.checked_mul(self.stride)?.checked_add(x)?;
        self.data.get(idx)
    }

    /// Returns a contiguous slice for row `y` with length `width`.
    pub fn row(&self, y: usize) -> Option<&'a [T]> {
        if y >= self.height {
            return None;
        }
        let start = y.checked_mul(self.stride)?;
        let end = start.checked_add(self.width)?;
        self.data.get(start..end)
    }
}

impl<T: Copy> ImageView<'_, T> {
    /// Copies the visible pixels into a contiguous `height x width` grid.
    pub fn to_grid(&self) -> PhaseCorrResult<Grid<T>> {
        let mut data = Vec::with_capacity(self.width * self.height);
        for y in 0..self.height {
            let Some(row) = self.row(y) else {
                return Err(PhaseCorrError::BufferTooSmall {
                    needed: required_len(self.width, y + 1, self.stride)?,
                    got: self.data.len(),
                });
            };
            data.extend_from_slice(row);
        }
        Grid::from_vec2(data, self.height, self.width)
    }
}

fn required_len(width: usize, height: usize, stride: usize) -> PhaseCorrResult<usize> {
    if width == 0 || height == 0 {
        return Err(PhaseCorrError::InvalidDimensions { width, height });
    }
    if stride < width {
        return Err(PhaseCorrError::InvalidStride { width, stride });
    }
    (height - 1)
        .checked_mul(stride)
        .and_then(|v| v.checked_add(width))
        .ok_or(PhaseCorrError::InvalidDimensions { width, height })
}

#[cfg(test)]
mod tests {
    use super::ImageView;
    use crate::util::PhaseCorrError;

    #[test]
    fn strided_view_skips_row_padding() {
        let data = [1u8, 2, 9, 3, 4, 9];
        let view = ImageView::new(&data, 2, 2, 3).unwrap();
        assert_eq!(view.row(1).unwrap(), &[3u8, 4]);
        assert_eq!(view.get(1, 0).copied(), Some(2));
        assert!(view.get(2, 0).is_none());

        let grid = view.to_grid().unwrap();
        assert_eq!(grid.shape(), &[2, 2]);
        assert_eq!(grid.as_slice(), &[1u8, 2, 3, 4]);
    }

    #[test]
    fn view_rejects_bad_layouts() {
        let data = [0u8; 3];
        assert_eq!(
            ImageView::from_slice(&data, 0, 1).err(),
            Some(PhaseCorrError::InvalidDimensions {
                width: 0,
                height: 1
            })
        );
        assert_eq!(
            ImageView::new(&data, 2, 1, 1).err(),
            Some(PhaseCorrError::InvalidStride {
                width: 2,
                stride: 1
            })
        );
        assert_eq!(
            ImageView::from_slice(&data, 2, 2).err(),
            Some(PhaseCorrError::BufferTooSmall { needed: 4, got: 3 })
        );
    }
}
