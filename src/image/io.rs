//! Conversions between `image` crate buffers and phasecorr types.

use crate::grid::Grid;
use crate::image::ImageView;
use crate::util::{PhaseCorrError, PhaseCorrResult};

/// Creates a borrowed view from a grayscale image buffer.
pub fn view_from_gray_image(img: &image::GrayImage) -> PhaseCorrResult<ImageView<'_, u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    ImageView::from_slice(img.as_raw(), width, height)
}

/// Copies a grayscale image into a rank-2 grid.
pub fn grid_from_gray_image(img: &image::GrayImage) -> PhaseCorrResult<Grid<u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Grid::from_vec2(img.as_raw().clone(), height, width)
}

/// Converts any dynamic image to luma and copies it into a grid.
pub fn grid_from_dynamic_image(img: &image::DynamicImage) -> PhaseCorrResult<Grid<u8>> {
    grid_from_gray_image(&img.to_luma8())
}

/// Copies the visible pixels of a view into an owned grayscale image.
pub fn gray_image_from_view(view: ImageView<'_, u8>) -> PhaseCorrResult<image::GrayImage> {
    let width = u32::try_from(view.width()).map_err(|_| PhaseCorrError::ImageIo {
        reason: format!("width {} exceeds u32", view.width()),
    })?;
    let height = u32::try_from(view.height()).map_err(|_| PhaseCorrError::ImageIo {
        reason: format!("height {} exceeds u32", view.height()),
    })?;
    let mut pixels = Vec::with_capacity(view.width() * view.height());
    for y in 0..view.height() {
        if let Some(row) = view.row(y) {
            pixels.extend_from_slice(row);
        }
    }
    image::GrayImage::from_raw(width, height, pixels).ok_or_else(|| PhaseCorrError::ImageIo {
        reason: format!("buffer does not fit {width}x{height}"),
    })
}

/// Moves the pixels of a grayscale image into a rank-2 grid.
pub fn grid_from_owned_gray_image(img: image::GrayImage) -> PhaseCorrResult<Grid<u8>> {
    let width = img.width() as usize;
    let height = img.height() as usize;
    Grid::from_vec2(img.into_raw(), height, width)
}

/// Wraps a rank-2 `u8` grid, such as a stroke mask, in a grayscale image.
pub fn gray_image_from_grid(grid: &Grid<u8>) -> PhaseCorrResult<image::GrayImage> {
    gray_image_from_view(grid.view()?)
}

#[cfg(test)]
mod tests {
    use super::{
        gray_image_from_grid, gray_image_from_view, grid_from_gray_image, view_from_gray_image,
    };
    use crate::image::ImageView;

    #[test]
    fn gray_image_round_trips_through_grid() {
        let img = image::GrayImage::from_fn(5, 3, |x, y| image::Luma([(x * 10 + y) as u8]));
        let grid = grid_from_gray_image(&img).unwrap();
        assert_eq!(grid.shape(), &[3, 5]);
        assert_eq!(grid.get(&[2, 4]).copied(), Some(42));
        assert_eq!(gray_image_from_grid(&grid).unwrap(), img);

        let view = view_from_gray_image(&img).unwrap();
        assert_eq!(view.get(4, 2).copied(), Some(42));
    }

    #[test]
    fn strided_view_drops_row_padding() {
        let data = [1u8, 2, 3, 99, 4, 5, 6, 99];
        let view = ImageView::new(&data, 3, 2, 4).unwrap();
        let img = gray_image_from_view(view).unwrap();
        assert_eq!((img.width(), img.height()), (3, 2));
        assert_eq!(img.as_raw(), &vec![1u8, 2, 3, 4, 5, 6]);
    }
}
