use std::path::PathBuf;

use crate::color_maps::ColorMap;
use crate::enums::{Interpolation, SliceAxis, SortBy};
use crate::error::{Error, Result};
use crate::orientation::OrientationCode;
use crate::range::ValueRange;

/// Pixels per unit of `figsize`.
pub const DEFAULT_DPI: u32 = 100;
/// Largest canvas side a GIF logical screen can hold.
pub const MAX_CANVAS_SIZE: u32 = u16::MAX as u32;
/// Opacity of class boundaries drawn over the fill overlay.
pub const EDGE_ALPHA: f32 = 0.9;
/// Amount subtracted from each channel of the label colors for boundaries.
pub const EDGE_DARKEN: f32 = 0.4;
/// Categorical map used for mask labels.
pub const LABEL_COLOR_MAP: &str = "jet";

/// Display parameters shared by every frame of one animation.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderConfig {
    pub cmap: String,
    pub alpha: f32,
    pub highlight_edges: bool,
    pub figsize: u32,
    pub dpi: u32,
    pub interpolation: Interpolation,
    pub axis: SliceAxis,
    /// Fixed intensity window. `None` uses the volume's global extrema.
    pub value_range: Option<ValueRange>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            cmap: "bone".to_string(),
            alpha: 0.3,
            highlight_edges: true,
            figsize: 4,
            dpi: DEFAULT_DPI,
            interpolation: Interpolation::default(),
            axis: SliceAxis::default(),
            value_range: None,
        }
    }
}

impl RenderConfig {
    /// Side length of the square canvas in pixels.
    pub fn canvas_size(&self) -> u32 {
        self.figsize.saturating_mul(self.dpi)
    }

    pub fn validate(&self) -> Result<()> {
        if self.figsize < 1 {
            return Err(Error::invalid("figsize", self.figsize, "must be a positive integer"));
        }
        if self.dpi < 1 {
            return Err(Error::invalid("dpi", self.dpi, "must be a positive integer"));
        }
        if self
            .figsize
            .checked_mul(self.dpi)
            .is_none_or(|side| side > MAX_CANVAS_SIZE)
        {
            return Err(Error::invalid(
                "figsize",
                self.figsize,
                "figsize * dpi exceeds the 65535 pixel GIF limit",
            ));
        }
        if !(self.alpha > 0.0 && self.alpha <= 1.0) {
            return Err(Error::invalid("alpha", self.alpha, "must be in (0, 1]"));
        }
        if ColorMap::from_name(&self.cmap).is_none() {
            return Err(Error::invalid("cmap", &self.cmap, "unknown color map"));
        }
        Ok(())
    }
}

/// Everything needed for one volume-to-animation conversion.
#[derive(Clone, Debug, PartialEq)]
pub struct ConvertOptions {
    pub image: PathBuf,
    pub mask: Option<PathBuf>,
    pub output: PathBuf,
    /// Display time of each frame in milliseconds.
    pub duration: u32,
    pub orientation: String,
    pub n_rot90: i32,
    pub sort_by: SortBy,
    pub render: RenderConfig,
}

impl ConvertOptions {
    pub fn new(image: impl Into<PathBuf>) -> Self {
        Self {
            image: image.into(),
            mask: None,
            output: PathBuf::from("output.gif"),
            duration: 80,
            orientation: "LPI".to_string(),
            n_rot90: 1,
            sort_by: SortBy::default(),
            render: RenderConfig::default(),
        }
    }

    /// Check every option, parameters first and input paths last, so a bad
    /// value is reported without touching the filesystem.
    pub fn validate(&self) -> Result<OrientationCode> {
        if self.duration < 1 {
            return Err(Error::invalid("duration", self.duration, "must be a positive integer"));
        }
        self.render.validate()?;
        let orientation = OrientationCode::parse(&self.orientation)?;

        if !self.image.exists() {
            return Err(Error::InputNotFound {
                path: self.image.clone(),
            });
        }
        if let Some(mask) = &self.mask
            && !mask.exists()
        {
            return Err(Error::InputNotFound { path: mask.clone() });
        }

        Ok(orientation)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> ConvertOptions {
        ConvertOptions::new("does/not/exist.nii")
    }

    #[test]
    fn defaults_follow_the_cli() {
        let opts = options();
        assert_eq!(opts.output, PathBuf::from("output.gif"));
        assert_eq!(opts.duration, 80);
        assert_eq!(opts.orientation, "LPI");
        assert_eq!(opts.n_rot90, 1);
        assert_eq!(opts.render.cmap, "bone");
        assert_eq!(opts.render.alpha, 0.3);
        assert!(opts.render.highlight_edges);
        assert_eq!(opts.render.canvas_size(), 400);
    }

    #[test]
    fn oversized_canvas_is_rejected_before_paths() {
        let mut opts = options();
        opts.render.figsize = 700;
        assert!(matches!(
            opts.validate(),
            Err(Error::InvalidParameter { name: "figsize", .. })
        ));

        opts.render.figsize = u32::MAX;
        opts.render.dpi = 2;
        assert!(opts.render.validate().is_err());

        opts.render.figsize = 655;
        assert!(opts.render.validate().is_ok());
    }

    #[test]
    fn alpha_out_of_range_is_rejected_before_paths() {
        for alpha in [0.0, 1.5, -0.1, f32::NAN] {
            let mut opts = options();
            opts.render.alpha = alpha;
            assert!(matches!(
                opts.validate(),
                Err(Error::InvalidParameter { name: "alpha", .. })
            ));
        }
    }

    #[test]
    fn integer_options_must_be_positive() {
        let mut opts = options();
        opts.duration = 0;
        assert!(matches!(
            opts.validate(),
            Err(Error::InvalidParameter { name: "duration", .. })
        ));

        let mut opts = options();
        opts.render.figsize = 0;
        assert!(matches!(
            opts.validate(),
            Err(Error::InvalidParameter { name: "figsize", .. })
        ));
    }

    #[test]
    fn unknown_color_map_is_rejected() {
        let mut opts = options();
        opts.render.cmap = "sepia".to_string();
        assert!(matches!(
            opts.validate(),
            Err(Error::InvalidParameter { name: "cmap", .. })
        ));
    }

    #[test]
    fn missing_image_is_reported_with_its_path() {
        match options().validate() {
            Err(Error::InputNotFound { path }) => {
                assert_eq!(path, PathBuf::from("does/not/exist.nii"))
            }
            other => panic!("expected InputNotFound, got {other:?}"),
        }
    }
}
