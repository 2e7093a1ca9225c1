use tracing::warn;

use crate::error::{Error, Result};
use crate::volume::Volume;

/// Intensity window shared by every frame of an animation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ValueRange {
    min: f32,
    max: f32,
}

impl ValueRange {
    /// Build a range from explicit bounds. Both must be finite and `min <= max`.
    pub fn new(min: f32, max: f32) -> Result<Self> {
        if !min.is_finite() {
            return Err(Error::invalid("vmin", min, "must be finite"));
        }
        if !max.is_finite() {
            return Err(Error::invalid("vmax", max, "must be finite"));
        }
        if min > max {
            return Err(Error::invalid("vmax", max, "must not be below vmin"));
        }
        Ok(Self { min, max })
    }

    /// Use `explicit` when given, otherwise the global extrema of `volume`.
    pub fn resolve(volume: &Volume, explicit: Option<ValueRange>) -> Result<Self> {
        if volume.is_empty() {
            return Err(Error::EmptyInput);
        }
        let range = match explicit {
            Some(range) => range,
            None => {
                let (min, max) = volume.min_max().ok_or(Error::EmptyInput)?;
                Self { min, max }
            }
        };
        if range.is_degenerate() {
            warn!(value = range.min, "intensity range is a single value");
        }
        Ok(range)
    }

    pub fn min(&self) -> f32 {
        self.min
    }

    pub fn max(&self) -> f32 {
        self.max
    }

    pub fn is_degenerate(&self) -> bool {
        self.max == self.min
    }

    /// Map `value` to [0, 1]. A degenerate range, or a NaN voxel, maps to 0.
    #[inline]
    pub fn normalize(&self, value: f32) -> f32 {
        if self.is_degenerate() || value.is_nan() {
            return 0.0;
        }
        ((value - self.min) / (self.max - self.min)).clamp(0.0, 1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn resolves_global_extrema() {
        let data = Array3::from_shape_fn((2, 2, 3), |(_, _, s)| s as f32 * 2.0 - 1.0);
        let range = ValueRange::resolve(&Volume::new(data), None).unwrap();
        assert_eq!((range.min(), range.max()), (-1.0, 3.0));
        assert_eq!(range.normalize(1.0), 0.5);
        assert_eq!(range.normalize(10.0), 1.0);
        assert_eq!(range.normalize(-10.0), 0.0);
    }

    #[test]
    fn explicit_range_wins() {
        let volume = Volume::new(Array3::from_elem((2, 2, 2), 5.0));
        let explicit = ValueRange::new(0.0, 10.0).unwrap();
        assert_eq!(ValueRange::resolve(&volume, Some(explicit)).unwrap(), explicit);
    }

    #[test]
    fn degenerate_range_never_divides_by_zero() {
        let volume = Volume::new(Array3::from_elem((2, 2, 2), 1.0));
        let range = ValueRange::resolve(&volume, None).unwrap();
        assert!(range.is_degenerate());
        assert_eq!(range.normalize(1.0), 0.0);
        assert_eq!(range.normalize(7.0), 0.0);
    }

    #[test]
    fn empty_volume_is_rejected() {
        let volume = Volume::new(Array3::zeros((0, 4, 4)));
        assert!(matches!(
            ValueRange::resolve(&volume, None),
            Err(Error::EmptyInput)
        ));
    }

    #[test]
    fn invalid_bounds_are_rejected() {
        assert!(ValueRange::new(2.0, 1.0).is_err());
        assert!(ValueRange::new(f32::NAN, 1.0).is_err());
        assert!(ValueRange::new(0.0, f32::INFINITY).is_err());
        assert!(ValueRange::new(1.0, 1.0).is_ok());
    }
}
