//! Centered constant padding and shape reconciliation.
//!
//! Padding never crops: the target canvas grows to cover the source on each
//! axis. When the amount to add on an axis is odd, the leading side (top or
//! left) receives `ceil(diff / 2)` and the trailing side the remainder, so the
//! source lands one pixel closer to the bottom-right than a floor split would
//! place it.

use crate::grid::Grid;
use crate::trace::{trace_event, trace_span};
use crate::util::math::ceil_half;
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Target `(height, width)` of a padding operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct CanvasSize {
    /// Number of rows.
    pub height: usize,
    /// Number of columns.
    pub width: usize,
}

impl CanvasSize {
    /// Creates a canvas size.
    pub fn new(height: usize, width: usize) -> Self {
        Self { height, width }
    }

    /// Returns the canvas grown to cover `other` on both axes.
    pub fn covering(self, other: CanvasSize) -> Self {
        Self {
            height: self.height.max(other.height),
            width: self.width.max(other.width),
        }
    }

    /// Returns the size of a rank-2 grid.
    pub fn of<T>(grid: &Grid<T>) -> PhaseCorrResult<Self> {
        let (height, width) = grid.dims2("padding")?;
        Ok(Self { height, width })
    }

    /// Number of cells, or a shape error when `height * width` overflows.
    pub fn cell_count(self) -> PhaseCorrResult<usize> {
        self.height
            .checked_mul(self.width)
            .ok_or_else(|| PhaseCorrError::Shape {
                reason: format!("canvas {}x{} overflows usize", self.height, self.width),
            })
    }
}

/// Rows and columns added on each side of a padded grid.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct PadOffsets {
    pub top: usize,
    pub bottom: usize,
    pub left: usize,
    pub right: usize,
}

impl PadOffsets {
    /// Computes the centered offsets that place `source` on `target`.
    ///
    /// `target` is first grown to cover `source`.
    pub fn centered(source: CanvasSize, target: CanvasSize) -> PhaseCorrResult<Self> {
        let target = target.covering(source);
        let rows = target
            .height
            .checked_sub(source.height)
            .ok_or_else(|| negative_offset(source, target))?;
        let cols = target
            .width
            .checked_sub(source.width)
            .ok_or_else(|| negative_offset(source, target))?;

        let top = ceil_half(rows);
        let left = ceil_half(cols);
        Ok(Self {
            top,
            bottom: rows - top,
            left,
            right: cols - left,
        })
    }

    /// Returns true when no padding is added on any side.
    pub fn is_zero(&self) -> bool {
        *self == Self::default()
    }

    /// Size of `source` after applying these offsets.
    pub fn padded_size(&self, source: CanvasSize) -> PhaseCorrResult<CanvasSize> {
        let height = self
            .vertical()
            .and_then(|rows| rows.checked_add(source.height));
        let width = self
            .horizontal()
            .and_then(|cols| cols.checked_add(source.width));
        match (height, width) {
            (Some(height), Some(width)) => Ok(CanvasSize { height, width }),
            _ => Err(PhaseCorrError::Shape {
                reason: format!(
                    "offsets {self:?} overflow source {}x{}",
                    source.height, source.width
                ),
            }),
        }
    }

    fn vertical(&self) -> Option<usize> {
        self.top.checked_add(self.bottom)
    }

    fn horizontal(&self) -> Option<usize> {
        self.left.checked_add(self.right)
    }
}

fn negative_offset(source: CanvasSize, target: CanvasSize) -> PhaseCorrError {
    PhaseCorrError::Shape {
        reason: format!(
            "canvas {}x{} cannot hold source {}x{}",
            target.height, target.width, source.height, source.width
        ),
    }
}

/// Centers a rank-2 grid on `target`, filling new cells with `fill`.
pub fn center_and_pad<T: Clone>(
    grid: &Grid<T>,
    target: CanvasSize,
    fill: T,
) -> PhaseCorrResult<Grid<T>> {
    let source = CanvasSize::of(grid)?;
    let offsets = PadOffsets::centered(source, target)?;
    if offsets.is_zero() {
        return Ok(grid.clone());
    }

    let out_size = offsets.padded_size(source)?;
    let cells = out_size.cell_count()?;
    if cells
        .checked_mul(std::mem::size_of::<T>())
        .map_or(true, |bytes| bytes > isize::MAX as usize)
    {
        return Err(PhaseCorrError::Shape {
            reason: format!(
                "canvas {}x{} exceeds the addressable size",
                out_size.height, out_size.width
            ),
        });
    }

    let mut data = Vec::with_capacity(cells);
    data.resize(offsets.top * out_size.width, fill.clone());
    for y in 0..source.height {
        let row = grid.row(y).ok_or_else(|| PhaseCorrError::Shape {
            reason: format!("row {y} missing from {}x{} grid", source.height, source.width),
        })?;
        data.extend(std::iter::repeat(fill.clone()).take(offsets.left));
        data.extend_from_slice(row);
        data.extend(std::iter::repeat(fill.clone()).take(offsets.right));
    }
    data.resize(cells, fill);

    Ok(Grid::from_raw(vec![out_size.height, out_size.width], data))
}

/// Pads two rank-2 grids with zeros onto their common bounding canvas.
///
/// Each grid is centered independently, so both outputs share the shape
/// `(max(h_a, h_b), max(w_a, w_b))`.
pub fn reconcile<T: Clone + Default>(
    a: &Grid<T>,
    b: &Grid<T>,
) -> PhaseCorrResult<(Grid<T>, Grid<T>)> {
    let size_a = CanvasSize::of(a)?;
    let size_b = CanvasSize::of(b)?;
    let common = size_a.covering(size_b);
    let _span = trace_span!("reconcile", height = common.height, width = common.width).entered();

    let padded_a = center_and_pad(a, common, T::default())?;
    let padded_b = center_and_pad(b, common, T::default())?;
    trace_event!(
        debug,
        "reconciled",
        a_rows = common.height - size_a.height,
        a_cols = common.width - size_a.width,
        b_rows = common.height - size_b.height,
        b_cols = common.width - size_b.width,
    );
    Ok((padded_a, padded_b))
}

/// Removes `offsets` from the borders of a rank-2 grid.
///
/// This is the inverse of [`center_and_pad`] when given the offsets it used.
pub fn crop<T: Clone>(grid: &Grid<T>, offsets: PadOffsets) -> PhaseCorrResult<Grid<T>> {
    let size = CanvasSize::of(grid)?;
    let too_large = || PhaseCorrError::Shape {
        reason: format!(
            "offsets {offsets:?} exceed {}x{} grid",
            size.height, size.width
        ),
    };
    let height = offsets
        .vertical()
        .and_then(|rows| size.height.checked_sub(rows))
        .filter(|&h| h > 0)
        .ok_or_else(too_large)?;
    let width = offsets
        .horizontal()
        .and_then(|cols| size.width.checked_sub(cols))
        .filter(|&w| w > 0)
        .ok_or_else(too_large)?;

    let mut data = Vec::with_capacity(height * width);
    for y in offsets.top..offsets.top + height {
        let row = grid.row(y).ok_or_else(too_large)?;
        data.extend_from_slice(&row[offsets.left..offsets.left + width]);
    }
    Ok(Grid::from_raw(vec![height, width], data))
}

#[cfg(test)]
mod tests {
    use super::{center_and_pad, crop, reconcile, CanvasSize, PadOffsets};
    use crate::grid::Grid;
    use crate::util::PhaseCorrError;

    #[test]
    fn odd_difference_puts_extra_cell_on_leading_side() {
        let offsets = PadOffsets::centered(CanvasSize::new(2, 3), CanvasSize::new(5, 6)).unwrap();
        assert_eq!(
            offsets,
            PadOffsets {
                top: 2,
                bottom: 1,
                left: 2,
                right: 1,
            }
        );
    }

    #[test]
    fn target_never_shrinks_source() {
        let offsets = PadOffsets::centered(CanvasSize::new(4, 4), CanvasSize::new(2, 7)).unwrap();
        assert_eq!(offsets.top + offsets.bottom, 0);
        assert_eq!((offsets.left, offsets.right), (2, 1));
    }

    #[test]
    fn pads_with_constant_fill() {
        let grid = Grid::from_rows(&[vec![1u8, 2], vec![3, 4]]).unwrap();
        let padded = center_and_pad(&grid, CanvasSize::new(3, 4), 9).unwrap();
        assert_eq!(padded.shape(), &[3, 4]);
        assert_eq!(
            padded.as_slice(),
            &[9, 9, 9, 9, 9, 1, 2, 9, 9, 3, 4, 9]
        );
    }

    #[test]
    fn crop_undoes_padding() {
        let grid = Grid::from_rows(&[vec![1i32, 2, 3], vec![4, 5, 6]]).unwrap();
        let target = CanvasSize::new(7, 4);
        let offsets = PadOffsets::centered(CanvasSize::of(&grid).unwrap(), target).unwrap();
        let padded = center_and_pad(&grid, target, 0).unwrap();
        assert_eq!(crop(&padded, offsets).unwrap(), grid);
    }

    #[test]
    fn crop_rejects_oversized_offsets() {
        let grid = Grid::from_rows(&[vec![1u8, 2]]).unwrap();
        let offsets = PadOffsets {
            left: 1,
            right: 1,
            ..PadOffsets::default()
        };
        assert!(matches!(
            crop(&grid, offsets),
            Err(PhaseCorrError::Shape { .. })
        ));
    }

    #[test]
    fn reconcile_requires_rank_two() {
        let line = Grid::from_vec1(vec![1.0f64, 2.0]).unwrap();
        let err = reconcile(&line, &line).unwrap_err();
        assert_eq!(
            err,
            PhaseCorrError::UnsupportedRank {
                rank: 1,
                supported: "2",
                context: "padding",
            }
        );
    }
}
