use ndarray::Axis;

/// Anatomical plane the animation steps through.
///
/// Axes refer to the reoriented volume, so with the default "LPI" code
/// axial slices run along the last array axis.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SliceAxis {
    #[default]
    Axial,
    Coronal,
    Sagittal,
}

impl SliceAxis {
    pub fn array_axis(self) -> Axis {
        match self {
            SliceAxis::Axial => Axis(2),
            SliceAxis::Coronal => Axis(1),
            SliceAxis::Sagittal => Axis(0),
        }
    }
}

/// Resampling used when a slice is drawn onto the canvas.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Interpolation {
    #[default]
    Nearest,
    Bilinear,
}

/// Ordering of DICOM files when they are stacked into a volume.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SortBy {
    #[default]
    ImagePositionPatient,
    TablePosition,
    InstanceNumber,
    None,
}
