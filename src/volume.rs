use crate::enums::SliceAxis;

use ndarray::Array3;
use ndarray::ArrayView2;
use ndarray::Axis;
use rayon::prelude::*;

/// Scan intensities laid out as (row, column, slice).
#[derive(Clone, Debug, Default)]
pub struct Volume {
    data: Array3<f32>,
}

/// Integer class labels aligned with a [`Volume`]. Zero is background.
#[derive(Clone, Debug, Default)]
pub struct Mask {
    data: Array3<u32>,
}

fn slice_along<T>(data: &Array3<T>, index: usize, axis: SliceAxis) -> Option<ArrayView2<'_, T>> {
    let axis = axis.array_axis();
    if index >= data.len_of(axis) {
        return None;
    }
    Some(data.index_axis(axis, index))
}

impl Volume {
    pub fn new(data: Array3<f32>) -> Self {
        Self { data }
    }

    /// Get the dimensions of the volume (rows, columns, slices)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<f32> {
        &self.data
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Number of slices along `axis`.
    pub fn depth(&self, axis: SliceAxis) -> usize {
        self.data.len_of(axis.array_axis())
    }

    pub fn get_slice_from_axis(&self, index: usize, axis: SliceAxis) -> Option<ArrayView2<'_, f32>> {
        slice_along(&self.data, index, axis)
    }

    /// Global minimum and maximum over all finite voxels.
    ///
    /// Returns `None` when the volume holds no finite value.
    pub fn min_max(&self) -> Option<(f32, f32)> {
        self.data
            .as_slice_memory_order()
            .map(|values| {
                values
                    .par_iter()
                    .copied()
                    .filter(|v| v.is_finite())
                    .fold(|| None, fold_min_max)
                    .reduce(|| None, merge_min_max)
            })
            .unwrap_or_else(|| {
                self.data
                    .iter()
                    .copied()
                    .filter(|v| v.is_finite())
                    .fold(None, fold_min_max)
            })
    }
}

fn fold_min_max(acc: Option<(f32, f32)>, v: f32) -> Option<(f32, f32)> {
    match acc {
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        None => Some((v, v)),
    }
}

fn merge_min_max(a: Option<(f32, f32)>, b: Option<(f32, f32)>) -> Option<(f32, f32)> {
    match (a, b) {
        (Some((a_lo, a_hi)), Some((b_lo, b_hi))) => Some((a_lo.min(b_lo), a_hi.max(b_hi))),
        (a, None) => a,
        (None, b) => b,
    }
}

impl Mask {
    pub fn new(data: Array3<u32>) -> Self {
        Self { data }
    }

    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    pub fn data(&self) -> &Array3<u32> {
        &self.data
    }

    pub fn get_slice_from_axis(&self, index: usize, axis: SliceAxis) -> Option<ArrayView2<'_, u32>> {
        slice_along(&self.data, index, axis)
    }

    /// Largest label anywhere in the mask, 0 for an empty or all-background mask.
    pub fn max_label(&self) -> u32 {
        self.data
            .axis_iter(Axis(2))
            .into_par_iter()
            .map(|slice| slice.iter().copied().max().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    #[test]
    fn min_max_spans_whole_volume() {
        let data = Array3::from_shape_fn((2, 3, 4), |(r, c, s)| (r + c * 10 + s * 100) as f32);
        let volume = Volume::new(data);
        assert_eq!(volume.min_max(), Some((0.0, 321.0)));
    }

    #[test]
    fn min_max_skips_non_finite_voxels() {
        let mut data = Array3::from_elem((2, 2, 2), 3.0_f32);
        data[[0, 0, 0]] = f32::NAN;
        data[[1, 1, 1]] = -1.0;
        let volume = Volume::new(data);
        assert_eq!(volume.min_max(), Some((-1.0, 3.0)));
    }

    #[test]
    fn min_max_of_empty_volume_is_none() {
        let volume = Volume::new(Array3::zeros((4, 4, 0)));
        assert!(volume.is_empty());
        assert_eq!(volume.min_max(), None);
    }

    #[test]
    fn slices_follow_the_requested_axis() {
        let data = Array3::from_shape_fn((2, 3, 4), |(r, c, s)| (r * 100 + c * 10 + s) as f32);
        let volume = Volume::new(data);

        let axial = volume.get_slice_from_axis(3, SliceAxis::Axial).unwrap();
        assert_eq!(axial.dim(), (2, 3));
        assert_eq!(axial[[1, 2]], 123.0);

        let coronal = volume.get_slice_from_axis(1, SliceAxis::Coronal).unwrap();
        assert_eq!(coronal.dim(), (2, 4));
        assert_eq!(coronal[[1, 3]], 113.0);

        let sagittal = volume.get_slice_from_axis(0, SliceAxis::Sagittal).unwrap();
        assert_eq!(sagittal.dim(), (3, 4));

        assert!(volume.get_slice_from_axis(4, SliceAxis::Axial).is_none());
        assert_eq!(volume.depth(SliceAxis::Coronal), 3);
    }

    #[test]
    fn max_label_is_global() {
        let mut data = Array3::zeros((3, 3, 3));
        data[[0, 0, 0]] = 2;
        data[[2, 1, 2]] = 7;
        assert_eq!(Mask::new(data).max_label(), 7);
        assert_eq!(Mask::new(Array3::zeros((2, 2, 2))).max_label(), 0);
    }
}
