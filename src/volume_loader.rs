use crate::enums::SortBy;

use dicom::{
    object::{FileDicomObject, InMemDicomObject, open_file},
    pixeldata::{ConvertOptions, PixelDecoder, VoiLutOption},
};
use dicom_dictionary_std::tags;
use ndarray::{Array2, Array3, ShapeBuilder, s};
use nifti::{IntoNdArray, NiftiObject, ReaderOptions};
use std::{
    fs,
    path::{Path, PathBuf},
};
use thiserror::Error;
use tracing::{debug, info};

#[derive(Debug, Error)]
pub enum VolumeLoaderError {
    #[error("No valid DICOM images found in {}", .0.display())]
    NoValidImages(PathBuf),

    #[error("Inconsistent image dimensions")]
    InconsistentDimensions,

    #[error("Unsupported volume shape {shape:?} in {}: expected three spatial axes", .path.display())]
    UnsupportedDimensionality { path: PathBuf, shape: Vec<usize> },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("DICOM error: {0}")]
    Dicom(#[from] dicom::object::ReadError),

    #[error("NIfTI error: {0}")]
    Nifti(#[from] nifti::NiftiError),

    #[error("Shape error: {0}")]
    Shape(#[from] ndarray::ShapeError),
}

/// Reads scans and label masks into (row, column, slice) arrays.
pub struct VolumeLoader;

impl VolumeLoader {
    /// Load intensities from a NIfTI file, or from every `.dcm` file when
    /// `path` is a directory.
    pub fn load(path: impl AsRef<Path>, sort_by: SortBy) -> Result<Array3<f32>, VolumeLoaderError> {
        let path = path.as_ref();
        let data = if path.is_dir() {
            Self::load_from_directory(path, sort_by)?
        } else {
            Self::load_nifti(path)?
        };
        info!(path = %path.display(), shape = ?data.dim(), "loaded volume");
        Ok(data)
    }

    /// Load a label mask. Values are rounded to the nearest integer and
    /// negative labels become background.
    pub fn load_labels(
        path: impl AsRef<Path>,
        sort_by: SortBy,
    ) -> Result<Array3<u32>, VolumeLoaderError> {
        Ok(Self::load(path, sort_by)?.mapv(|v| v.round().max(0.0) as u32))
    }

    /// Load a single-file NIfTI volume (`.nii` or `.nii.gz`).
    ///
    /// 4D files are accepted as long as every axis past the third has
    /// length one; 2D files become a single slice.
    pub fn load_nifti(path: impl AsRef<Path>) -> Result<Array3<f32>, VolumeLoaderError> {
        let path = path.as_ref();
        let obj = ReaderOptions::new().read_file(path)?;
        let data = obj.into_volume().into_ndarray::<f32>()?;

        let shape = data.shape().to_vec();
        if shape.is_empty() || shape.iter().skip(3).any(|&len| len != 1) {
            return Err(VolumeLoaderError::UnsupportedDimensionality {
                path: path.to_path_buf(),
                shape,
            });
        }
        let extent = |axis: usize| shape.get(axis).copied().unwrap_or(1);

        // Reversing the axes walks voxels with the first axis fastest,
        // which is column-major order for the (x, y, z) shape.
        let voxels: Vec<f32> = data.t().iter().copied().collect();
        let volume = Array3::from_shape_vec((extent(0), extent(1), extent(2)).f(), voxels)?;

        Ok(volume)
    }

    /// Load a volume from DICOM objects
    ///
    /// # Arguments
    ///
    /// * `dicom_objects` - Slice of DICOM file objects
    /// * `sort_by` - Method to sort the slices
    ///
    /// # Errors
    ///
    /// Returns error if no valid images found or dimensions are inconsistent
    pub fn load_from_dicom_objects(
        dicom_objects: &[FileDicomObject<InMemDicomObject>],
        sort_by: SortBy,
        source: &Path,
    ) -> Result<Array3<f32>, VolumeLoaderError> {
        let mut images_with_order: Vec<_> = dicom_objects
            .iter()
            .filter_map(|dicom_object| Self::extract_image_with_order(dicom_object, &sort_by))
            .collect();

        if images_with_order.is_empty() {
            return Err(VolumeLoaderError::NoValidImages(source.to_path_buf()));
        }
        debug!(
            decoded = images_with_order.len(),
            skipped = dicom_objects.len() - images_with_order.len(),
            "decoded DICOM slices"
        );

        Self::sort_images(&mut images_with_order, sort_by);

        let images: Vec<_> = images_with_order
            .into_iter()
            .map(|(_, image)| image)
            .collect();

        Self::validate_dimensions(&images)?;

        Ok(Self::build_volume_array(&images))
    }

    /// Load a volume from file paths
    pub fn load_from_file_paths(
        paths: &[impl AsRef<Path>],
        sort_by: SortBy,
        source: &Path,
    ) -> Result<Array3<f32>, VolumeLoaderError> {
        let objects: Result<Vec<_>, _> =
            paths.iter().map(|path| open_file(path.as_ref())).collect();

        Self::load_from_dicom_objects(&objects?, sort_by, source)
    }

    /// Load a volume from a directory containing .dcm files
    pub fn load_from_directory(
        path: impl AsRef<Path>,
        sort_by: SortBy,
    ) -> Result<Array3<f32>, VolumeLoaderError> {
        let path = path.as_ref();
        let paths: Vec<_> = fs::read_dir(path)?
            .filter_map(Result::ok)
            .map(|entry| entry.path())
            .filter(|path| {
                path.extension()
                    .and_then(|s| s.to_str())
                    .is_some_and(|ext| ext.eq_ignore_ascii_case("dcm"))
            })
            .collect();

        if paths.is_empty() {
            return Err(VolumeLoaderError::NoValidImages(path.to_path_buf()));
        }

        Self::load_from_file_paths(&paths, sort_by, path)
    }

    fn extract_image_with_order(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: &SortBy,
    ) -> Option<(Option<f32>, Array2<f32>)> {
        let order = Self::get_sort_order(dicom_object, sort_by)?;
        let image_2d = Self::decode_image(dicom_object)?;
        Some((order, image_2d))
    }

    fn get_sort_order(
        dicom_object: &FileDicomObject<InMemDicomObject>,
        sort_by: &SortBy,
    ) -> Option<Option<f32>> {
        match sort_by {
            SortBy::ImagePositionPatient => {
                let pos = dicom_object
                    .element(tags::IMAGE_POSITION_PATIENT)
                    .ok()?
                    .to_multi_float32()
                    .ok()?;
                Some(pos.get(2).copied())
            }
            SortBy::TablePosition => {
                let pos = dicom_object
                    .element(tags::TABLE_POSITION)
                    .ok()?
                    .to_float32()
                    .ok();
                Some(pos)
            }
            SortBy::InstanceNumber => {
                let num = dicom_object
                    .element(tags::INSTANCE_NUMBER)
                    .ok()?
                    .to_int::<i32>()
                    .ok()
                    .map(|n| n as f32);
                Some(num)
            }
            SortBy::None => Some(Some(0.0)),
        }
    }

    /// Decode the first frame with the modality rescale applied and no VOI window.
    fn decode_image(dicom_object: &FileDicomObject<InMemDicomObject>) -> Option<Array2<f32>> {
        let pixel_data = dicom_object.decode_pixel_data().ok()?;
        let options = ConvertOptions::new().with_voi_lut(VoiLutOption::Identity);
        pixel_data
            .to_ndarray_with_options::<f32>(&options)
            .ok()
            .map(|arr| arr.slice_move(s![0, .., .., 0]))
    }

    fn sort_images(images_with_order: &mut [(Option<f32>, Array2<f32>)], sort_by: SortBy) {
        if !matches!(sort_by, SortBy::None) {
            images_with_order
                .sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        }

        if matches!(sort_by, SortBy::ImagePositionPatient) {
            images_with_order.reverse();
        }
    }

    fn validate_dimensions(images: &[Array2<f32>]) -> Result<(), VolumeLoaderError> {
        let first_dim = images[0].dim();
        if images.iter().any(|img| img.dim() != first_dim) {
            return Err(VolumeLoaderError::InconsistentDimensions);
        }
        Ok(())
    }

    /// Stack slices along the last axis: (rows, columns, slices).
    fn build_volume_array(images: &[Array2<f32>]) -> Array3<f32> {
        let (height, width) = images[0].dim();
        let depth = images.len();
        let mut volume = Array3::<f32>::zeros((height, width, depth));

        for (i, image) in images.iter().enumerate() {
            volume.slice_mut(s![.., .., i]).assign(image);
        }

        volume
    }
}
