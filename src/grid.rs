//! Owned row-major numeric grids.
//!
//! A `Grid<T>` stores its elements contiguously together with a shape. Rank 1
//! and rank 2 are what the pipeline operates on; higher ranks can be built so
//! that stages are able to reject them with a typed error instead of
//! misreading the buffer.

use crate::image::ImageView;
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Owned row-major grid with an explicit shape.
#[derive(Clone, Debug, PartialEq)]
pub struct Grid<T> {
    data: Vec<T>,
    shape: Vec<usize>,
}

impl<T> Grid<T> {
    /// Builds a grid from a shape and a row-major buffer.
    ///
    /// Every axis must be non-empty and the element count must match the
    /// product of the shape.
    pub fn from_shape_vec(shape: &[usize], data: Vec<T>) -> PhaseCorrResult<Self> {
        if shape.is_empty() {
            return Err(PhaseCorrError::Shape {
                reason: "grid needs at least one axis".to_string(),
            });
        }
        if let Some(axis) = shape.iter().position(|&n| n == 0) {
            return Err(PhaseCorrError::Shape {
                reason: format!("axis {axis} of shape {shape:?} is empty"),
            });
        }
        let count = shape
            .iter()
            .try_fold(1usize, |acc, &n| acc.checked_mul(n))
            .ok_or_else(|| PhaseCorrError::Shape {
                reason: format!("shape {shape:?} overflows"),
            })?;
        if count != data.len() {
            return Err(PhaseCorrError::Shape {
                reason: format!(
                    "shape {shape:?} needs {count} elements, got {}",
                    data.len()
                ),
            });
        }
        Ok(Self {
            data,
            shape: shape.to_vec(),
        })
    }

    /// Builds a rank-1 grid.
    pub fn from_vec1(data: Vec<T>) -> PhaseCorrResult<Self> {
        let len = data.len();
        Self::from_shape_vec(&[len], data)
    }

    /// Builds a rank-2 grid with `height` rows and `width` columns.
    pub fn from_vec2(data: Vec<T>, height: usize, width: usize) -> PhaseCorrResult<Self> {
        Self::from_shape_vec(&[height, width], data)
    }

    /// Internal constructor for buffers whose length already matches `shape`.
    pub(crate) fn from_raw(shape: Vec<usize>, data: Vec<T>) -> Self {
        debug_assert_eq!(shape.iter().product::<usize>(), data.len());
        Self { data, shape }
    }

    /// Returns the shape, one entry per axis.
    pub fn shape(&self) -> &[usize] {
        &self.shape
    }

    /// Returns the number of axes.
    pub fn rank(&self) -> usize {
        self.shape.len()
    }

    /// Returns the number of elements.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Returns true when the grid holds no elements.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of rows. Rank-1 grids count as a single row.
    pub fn height(&self) -> usize {
        match self.shape.as_slice() {
            [_] => 1,
            [rows, ..] => *rows,
            [] => 0,
        }
    }

    /// Number of columns (length of the last axis).
    pub fn width(&self) -> usize {
        self.shape.last().copied().unwrap_or(0)
    }

    /// Returns `(height, width)` for rank-2 grids.
    pub(crate) fn dims2(&self, context: &'static str) -> PhaseCorrResult<(usize, usize)> {
        match self.shape.as_slice() {
            [h, w] => Ok((*h, *w)),
            _ => Err(PhaseCorrError::UnsupportedRank {
                rank: self.rank(),
                supported: "2",
                context,
            }),
        }
    }

    /// Returns the row-major backing slice.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    /// Returns the row-major backing slice mutably.
    pub fn as_mut_slice(&mut self) -> &mut [T] {
        &mut self.data
    }

    /// Consumes the grid and returns its buffer.
    pub fn into_vec(self) -> Vec<T> {
        self.data
    }

    /// Returns the element at a full multi-axis index.
    pub fn get(&self, index: &[usize]) -> Option<&T> {
        if index.len() != self.shape.len() {
            return None;
        }
        let mut flat = 0usize;
        for (&i, &n) in index.iter().zip(&self.shape) {
            if i >= n {
                return None;
            }
            flat = flat * n + i;
        }
        self.data.get(flat)
    }

    /// Returns row `y` of a rank-1 or rank-2 grid.
    pub fn row(&self, y: usize) -> Option<&[T]> {
        if self.rank() > 2 || y >= self.height() {
            return None;
        }
        let width = self.width();
        self.data.get(y * width..(y + 1) * width)
    }

    /// Applies `f` to every element, keeping the shape.
    pub fn map<U, F>(&self, f: F) -> Grid<U>
    where
        F: FnMut(&T) -> U,
    {
        Grid {
            data: self.data.iter().map(f).collect(),
            shape: self.shape.clone(),
        }
    }

    /// Borrows a rank-2 grid as an image view.
    pub fn view(&self) -> PhaseCorrResult<ImageView<'_, T>> {
        let (height, width) = self.dims2("image view")?;
        ImageView::from_slice(&self.data, width, height)
    }
}

impl<T: Clone> Grid<T> {
    /// Builds a grid of `shape` with every element set to `value`.
    pub fn filled(shape: &[usize], value: T) -> PhaseCorrResult<Self> {
        let count = shape.iter().try_fold(1usize, |acc, &n| acc.checked_mul(n));
        let data = vec![value; count.unwrap_or(0)];
        Self::from_shape_vec(shape, data)
    }

    /// Builds a rank-2 grid from equally long rows.
    pub fn from_rows(rows: &[Vec<T>]) -> PhaseCorrResult<Self> {
        let height = rows.len();
        let width = rows.first().map_or(0, Vec::len);
        if let Some(bad) = rows.iter().position(|r| r.len() != width) {
            return Err(PhaseCorrError::Shape {
                reason: format!("row {bad} has {} columns, expected {width}", rows[bad].len()),
            });
        }
        let data = rows.iter().flat_map(|r| r.iter().cloned()).collect();
        Self::from_vec2(data, height, width)
    }
}

impl Grid<f64> {
    /// Returns the largest element, skipping NaN.
    pub fn max_value(&self) -> f64 {
        self.data
            .iter()
            .copied()
            .filter(|v| !v.is_nan())
            .fold(f64::NEG_INFINITY, f64::max)
    }
}

#[cfg(test)]
mod tests {
    use super::Grid;
    use crate::util::PhaseCorrError;

    #[test]
    fn shape_must_match_buffer() {
        let err = Grid::from_shape_vec(&[2, 3], vec![0u8; 5]).unwrap_err();
        assert!(matches!(err, PhaseCorrError::Shape { .. }));

        let err = Grid::<u8>::from_shape_vec(&[2, 0], Vec::new()).unwrap_err();
        assert!(matches!(err, PhaseCorrError::Shape { .. }));
    }

    #[test]
    fn multi_axis_indexing_is_row_major() {
        let grid = Grid::from_shape_vec(&[2, 2, 2], (0u8..8).collect()).unwrap();
        assert_eq!(grid.rank(), 3);
        assert_eq!(grid.get(&[1, 0, 1]).copied(), Some(5));
        assert!(grid.get(&[2, 0, 0]).is_none());
        assert!(grid.get(&[0, 0]).is_none());
        assert!(grid.row(0).is_none());
    }

    #[test]
    fn rows_and_dimensions() {
        let grid = Grid::from_rows(&[vec![1, 2, 3], vec![4, 5, 6]]).unwrap();
        assert_eq!((grid.height(), grid.width()), (2, 3));
        assert_eq!(grid.len(), 6);
        assert!(!grid.is_empty());
        assert_eq!(grid.row(1).unwrap(), &[4, 5, 6]);

        let line = Grid::from_vec1(vec![1.0f64, 2.0]).unwrap();
        assert_eq!((line.height(), line.width()), (1, 2));
        assert_eq!(line.row(0).unwrap(), &[1.0, 2.0]);

        let err = Grid::from_rows(&[vec![1], vec![2, 3]]).unwrap_err();
        assert!(matches!(err, PhaseCorrError::Shape { .. }));
    }

    #[test]
    fn max_value_ignores_nan() {
        let grid = Grid::from_vec1(vec![0.5, f64::NAN, 2.0, -1.0]).unwrap();
        assert_eq!(grid.max_value(), 2.0);
    }
}
