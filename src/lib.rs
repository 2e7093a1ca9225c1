//! # volume-gif
//!
//! Renders a 3D scan, optionally with a co-registered segmentation mask,
//! into a looping GIF with one frame per slice.
//!
//! Volumes are read from single-file NIfTI (`.nii`, `.nii.gz`) or from a
//! directory of DICOM files. Before rendering, volume and mask are
//! reoriented with an axis code (default `"LPI"`) and rotated by a number
//! of quarter turns. Each slice is then composited:
//!
//!  - intensities through a named color map over a value range shared by
//!    every frame (the volume's global extrema unless given explicitly)
//!  - labelled pixels blended with a categorical color map at a fixed alpha
//!  - class boundaries, found with a per-class Laplacian, drawn darker and
//!    nearly opaque on top
//!
//! The composited slice is scaled onto a square canvas of
//! `figsize * dpi` pixels. Slices are rendered in parallel using rayon and
//! reassembled in slice order before encoding.
//!
//! # Examples
//!
//! ## Converting a scan with its mask
//!
//! ```no_run
//! # use volume_gif::{ConvertOptions, convert};
//! let mut options = ConvertOptions::new("scan.nii.gz");
//! options.mask = Some("labels.nii.gz".into());
//! options.output = "scan.gif".into();
//! let report = convert(&options).expect("should have written scan.gif");
//! println!("{} frames", report.frames);
//! ```
//!
//! ## Rendering frames from arrays
//!
//! ```
//! # use volume_gif::{RenderConfig, Volume, stack_slices};
//! # use ndarray::Array3;
//! let volume = Volume::new(Array3::from_elem((4, 4, 3), 1.0));
//! let frames = stack_slices(&volume, None, &RenderConfig::default())
//!     .expect("should have rendered three frames");
//! assert_eq!(frames.len(), 3);
//! ```

pub mod boundary;
pub mod color_maps;
pub mod compositor;
pub mod config;
pub mod convert;
pub mod encoder;
pub mod enums;
pub mod error;
mod interpolator;
pub mod orientation;
pub mod range;
pub mod sequencer;
pub mod volume;
pub mod volume_loader;

pub use compositor::{Raster, RenderContext};
pub use config::{ConvertOptions, RenderConfig};
pub use convert::{ConvertReport, convert};
pub use encoder::save_as_gif;
pub use enums::{Interpolation, SliceAxis, SortBy};
pub use error::{Error, Result};
pub use orientation::OrientationCode;
pub use range::ValueRange;
pub use sequencer::{FrameSequencer, stack_slices};
pub use volume::{Mask, Volume};
pub use volume_loader::{VolumeLoader, VolumeLoaderError};
