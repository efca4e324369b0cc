//! Quadrant swaps that move the zero-frequency bin to or from the center.

/// Direction of a centering roll.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Shift {
    /// Moves index 0 to `n / 2` on every axis (`fftshift`).
    Center,
    /// Moves index `n / 2` back to 0 on every axis (`ifftshift`).
    Uncenter,
}

impl Shift {
    /// Forward roll amount along an axis of length `n`.
    fn amount(self, n: usize) -> usize {
        match self {
            Shift::Center => n / 2,
            Shift::Uncenter => n - n / 2,
        }
    }
}

/// Rolls a row-major `height x width` buffer along both axes.
///
/// Rank-1 data is passed with `height == 1`, where the row roll is a no-op.
/// For odd lengths `Center` and `Uncenter` differ by one cell and are exact
/// inverses of each other.
pub(crate) fn roll<T: Copy>(data: &[T], height: usize, width: usize, shift: Shift) -> Vec<T> {
    debug_assert_eq!(data.len(), height * width);
    let ry = shift.amount(height);
    let rx = shift.amount(width);
    let mut out = Vec::with_capacity(data.len());
    for y in 0..height {
        let src_y = (y + height - ry) % height;
        let src_row = &data[src_y * width..(src_y + 1) * width];
        let split = (width - rx) % width;
        out.extend_from_slice(&src_row[split..]);
        out.extend_from_slice(&src_row[..split]);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{roll, Shift};

    #[test]
    fn center_moves_origin_to_middle() {
        let data: Vec<u8> = (0..5).collect();
        assert_eq!(roll(&data, 1, 5, Shift::Center), vec![3, 4, 0, 1, 2]);
        assert_eq!(roll(&data, 1, 5, Shift::Uncenter), vec![2, 3, 4, 0, 1]);

        let even: Vec<u8> = (0..4).collect();
        assert_eq!(roll(&even, 1, 4, Shift::Center), vec![2, 3, 0, 1]);
        assert_eq!(roll(&even, 1, 4, Shift::Uncenter), vec![2, 3, 0, 1]);
    }

    #[test]
    fn shifts_are_mutual_inverses_in_two_dimensions() {
        let data: Vec<u16> = (0..15).collect();
        let centered = roll(&data, 3, 5, Shift::Center);
        assert_eq!(centered[5 + 2], 0);
        assert_eq!(roll(&centered, 3, 5, Shift::Uncenter), data);
    }
}
