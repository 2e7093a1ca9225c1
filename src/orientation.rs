use std::fmt;
use std::str::FromStr;

use ndarray::{Array3, Axis};

use crate::error::Error;

const AXIS_PAIRS: [(char, char); 3] = [('L', 'R'), ('P', 'A'), ('I', 'S')];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct AxisTarget {
    position: usize,
    flip: bool,
}

/// Three-letter axis code such as `"LPI"`, one letter from each of L/R,
/// P/A and I/S. Letter `k` moves array axis `k` to the position of its
/// pair, flipped when the letter is the first of the pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OrientationCode {
    letters: [char; 3],
    targets: [AxisTarget; 3],
}

impl OrientationCode {
    pub fn lpi() -> Self {
        let flipped = |position| AxisTarget {
            position,
            flip: true,
        };
        Self {
            letters: ['L', 'P', 'I'],
            targets: [flipped(0), flipped(1), flipped(2)],
        }
    }

    pub fn parse(code: &str) -> Result<Self, Error> {
        let invalid = |reason| Error::invalid("orientation", code, reason);

        let letters: Vec<char> = code.chars().map(|c| c.to_ascii_uppercase()).collect();
        let letters: [char; 3] = letters
            .try_into()
            .map_err(|_| invalid("expected exactly three axis letters"))?;

        let mut targets = [AxisTarget {
            position: 0,
            flip: false,
        }; 3];
        let mut seen = [false; 3];
        for (target, letter) in targets.iter_mut().zip(letters) {
            let (position, (first, _)) = AXIS_PAIRS
                .iter()
                .enumerate()
                .find(|(_, (a, b))| letter == *a || letter == *b)
                .ok_or_else(|| invalid("letters must be drawn from L/R, P/A and I/S"))?;
            if seen[position] {
                return Err(invalid("each of L/R, P/A and I/S must appear once"));
            }
            seen[position] = true;
            *target = AxisTarget {
                position,
                flip: letter == *first,
            };
        }

        Ok(Self { letters, targets })
    }

    /// Flip and permute the axes of `data` according to this code.
    pub fn apply<T>(&self, mut data: Array3<T>) -> Array3<T> {
        let mut permutation = [0usize; 3];
        for (axis, target) in self.targets.iter().enumerate() {
            if target.flip {
                data.invert_axis(Axis(axis));
            }
            permutation[target.position] = axis;
        }
        data.permuted_axes(permutation)
    }
}

impl Default for OrientationCode {
    fn default() -> Self {
        Self::lpi()
    }
}

impl FromStr for OrientationCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for OrientationCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.letters.iter().try_for_each(|c| write!(f, "{c}"))
    }
}

/// Rotate every slice by `turns` counter-clockwise quarter turns in the
/// (row, column) plane. Negative values turn clockwise.
pub fn rot90<T>(mut data: Array3<T>, turns: i32) -> Array3<T> {
    match turns.rem_euclid(4) {
        1 => {
            data.invert_axis(Axis(1));
            data.swap_axes(0, 1);
        }
        2 => {
            data.invert_axis(Axis(0));
            data.invert_axis(Axis(1));
        }
        3 => {
            data.swap_axes(0, 1);
            data.invert_axis(Axis(1));
        }
        _ => {}
    }
    data
}

/// Reorient then rotate, returning a standard-layout array.
pub fn normalize_orientation<T: Clone>(
    data: Array3<T>,
    code: &OrientationCode,
    n_rot90: i32,
) -> Array3<T> {
    let data = rot90(code.apply(data), n_rot90);
    if data.is_standard_layout() {
        data
    } else {
        data.as_standard_layout().into_owned()
    }
}
