//! Transform mode selectors and their legacy encodings.
//!
//! Integer codes put the direction in the sign (positive forward, negative
//! inverse) and the representation in the magnitude: 1 complex, 2 magnitude,
//! 3 phase, 4 real part, 5 imaginary part. Names follow the `fft2` /
//! `ifft2` family with an optional `_magnitude`, `_phase`, `_real` or `_imag`
//! suffix; `_module` is accepted as an alias for `_magnitude`.

use std::fmt;
use std::str::FromStr;

use crate::util::PhaseCorrError;

/// Transform direction.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Direction {
    /// DFT followed by a centering shift.
    Forward,
    /// Un-centering shift followed by the normalized inverse DFT.
    Inverse,
}

/// Element-wise view extracted from the complex transform result.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Representation {
    /// The complex values unchanged.
    Complex,
    /// Absolute value `|z|`.
    Magnitude,
    /// Argument of `z` in radians, in `(-pi, pi]`.
    Phase,
    /// Real part.
    Real,
    /// Imaginary part.
    Imag,
}

impl Representation {
    fn code(self) -> i32 {
        match self {
            Representation::Complex => 1,
            Representation::Magnitude => 2,
            Representation::Phase => 3,
            Representation::Real => 4,
            Representation::Imag => 5,
        }
    }

    fn suffix(self) -> &'static str {
        match self {
            Representation::Complex => "",
            Representation::Magnitude => "_magnitude",
            Representation::Phase => "_phase",
            Representation::Real => "_real",
            Representation::Imag => "_imag",
        }
    }
}

/// A direction paired with the representation to extract.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct TransformMode {
    pub direction: Direction,
    pub representation: Representation,
}

impl TransformMode {
    /// Forward transform returning complex values.
    pub const FORWARD: Self = Self::forward(Representation::Complex);
    /// Inverse transform returning complex values.
    pub const INVERSE: Self = Self::inverse(Representation::Complex);

    /// Creates a mode from its two axes.
    pub const fn new(direction: Direction, representation: Representation) -> Self {
        Self {
            direction,
            representation,
        }
    }

    /// Forward transform with the given representation.
    pub const fn forward(representation: Representation) -> Self {
        Self::new(Direction::Forward, representation)
    }

    /// Inverse transform with the given representation.
    pub const fn inverse(representation: Representation) -> Self {
        Self::new(Direction::Inverse, representation)
    }

    /// Returns the signed integer code of this mode.
    pub fn code(self) -> i32 {
        match self.direction {
            Direction::Forward => self.representation.code(),
            Direction::Inverse => -self.representation.code(),
        }
    }
}

impl TryFrom<i32> for TransformMode {
    type Error = PhaseCorrError;

    fn try_from(code: i32) -> Result<Self, Self::Error> {
        let direction = if code > 0 {
            Direction::Forward
        } else {
            Direction::Inverse
        };
        let representation = match code.unsigned_abs() {
            1 => Representation::Complex,
            2 => Representation::Magnitude,
            3 => Representation::Phase,
            4 => Representation::Real,
            5 => Representation::Imag,
            _ => {
                return Err(PhaseCorrError::InvalidMode {
                    mode: code.to_string(),
                })
            }
        };
        Ok(Self::new(direction, representation))
    }
}

impl FromStr for TransformMode {
    type Err = PhaseCorrError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || PhaseCorrError::InvalidMode {
            mode: s.to_string(),
        };
        let normalized = s.trim().to_ascii_lowercase();
        let (direction, rest) = if let Some(rest) = normalized.strip_prefix("ifft2") {
            (Direction::Inverse, rest)
        } else if let Some(rest) = normalized.strip_prefix("fft2") {
            (Direction::Forward, rest)
        } else {
            return Err(invalid());
        };
        let representation = match rest {
            "" => Representation::Complex,
            "_magnitude" | "_module" => Representation::Magnitude,
            "_phase" => Representation::Phase,
            "_real" => Representation::Real,
            "_imag" => Representation::Imag,
            _ => return Err(invalid()),
        };
        Ok(Self::new(direction, representation))
    }
}

impl fmt::Display for TransformMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let prefix = match self.direction {
            Direction::Forward => "fft2",
            Direction::Inverse => "ifft2",
        };
        write!(f, "{prefix}{}", self.representation.suffix())
    }
}
