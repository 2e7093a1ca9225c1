use image::{Rgb as Pixel, RgbImage, imageops};
use ndarray::{Array2, ArrayView2, Zip};

use crate::boundary::class_boundaries;
use crate::color_maps::ColorMap;
use crate::config::{EDGE_ALPHA, EDGE_DARKEN, LABEL_COLOR_MAP, RenderConfig};
use crate::enums::Interpolation;
use crate::error::{Error, Result};
use crate::interpolator::{Interpolator, Rgb};
use crate::range::ValueRange;

/// One rendered frame.
pub type Raster = RgbImage;

const BACKGROUND: Pixel<u8> = Pixel([255, 255, 255]);

/// Drawing state resolved once per conversion and shared by every slice.
#[derive(Clone, Debug)]
pub struct RenderContext {
    range: ValueRange,
    base_map: ColorMap,
    label_map: ColorMap,
    edge_map: ColorMap,
    max_label: u32,
    alpha: f32,
    highlight_edges: bool,
    canvas_size: u32,
    interpolation: Interpolation,
}

impl RenderContext {
    /// `max_label` is the largest label of the whole mask and fixes the
    /// label color domain for every frame.
    pub fn new(config: &RenderConfig, range: ValueRange, max_label: u32) -> Result<Self> {
        config.validate()?;
        let base_map = ColorMap::from_name(&config.cmap)
            .ok_or_else(|| Error::invalid("cmap", &config.cmap, "unknown color map"))?;
        let label_map = ColorMap::from_name(LABEL_COLOR_MAP)
            .ok_or_else(|| Error::invalid("cmap", LABEL_COLOR_MAP, "unknown color map"))?;
        let edge_map = label_map.darkened(EDGE_DARKEN);

        Ok(Self {
            range,
            base_map,
            label_map,
            edge_map,
            max_label,
            alpha: config.alpha,
            highlight_edges: config.highlight_edges,
            canvas_size: config.canvas_size(),
            interpolation: config.interpolation,
        })
    }

    pub fn value_range(&self) -> ValueRange {
        self.range
    }

    pub fn canvas_size(&self) -> u32 {
        self.canvas_size
    }

    #[inline]
    fn label_position(&self, label: u32) -> f32 {
        if self.max_label == 0 {
            0.0
        } else {
            label as f32 / self.max_label as f32
        }
    }

    /// Composite one slice on its native grid, in linear [0, 1] RGB.
    pub fn composite(
        &self,
        intensity: &ArrayView2<'_, f32>,
        labels: Option<&ArrayView2<'_, u32>>,
    ) -> Array2<[f32; 3]> {
        let mut pixels = intensity.map(|&v| self.base_map.sample(self.range.normalize(v)));

        let Some(labels) = labels else {
            return pixels;
        };

        Zip::from(&mut pixels).and(labels).for_each(|pixel, &label| {
            if label > 0 {
                let fill = self.label_map.sample(self.label_position(label));
                *pixel = over(fill, *pixel, self.alpha);
            }
        });

        if self.highlight_edges {
            let boundary = class_boundaries(labels);
            Zip::from(&mut pixels).and(&boundary).for_each(|pixel, &label| {
                if label > 0 {
                    let edge = self.edge_map.sample(self.label_position(label));
                    *pixel = over(edge, *pixel, EDGE_ALPHA);
                }
            });
        }

        pixels
    }

    /// Render one slice onto the square canvas.
    ///
    /// The slice is scaled to the largest aspect-preserving rectangle and
    /// centred; the rest of the canvas is white.
    pub fn render_slice(
        &self,
        intensity: &ArrayView2<'_, f32>,
        labels: Option<&ArrayView2<'_, u32>>,
    ) -> Raster {
        let side = self.canvas_size;
        let mut canvas = RgbImage::from_pixel(side, side, BACKGROUND);
        if intensity.is_empty() {
            return canvas;
        }

        let pixels = self.composite(intensity, labels);
        let (width, height) = Interpolator::fit_dimensions(pixels.dim(), side);
        let scaled = Interpolator::resample(&pixels.view(), width, height, self.interpolation);

        let tile = RgbImage::from_fn(width, height, |x, y| {
            to_pixel(scaled[[y as usize, x as usize]])
        });
        let x0 = (side - width) / 2;
        let y0 = (side - height) / 2;
        imageops::replace(&mut canvas, &tile, i64::from(x0), i64::from(y0));

        canvas
    }
}

/// `alpha * fg + (1 - alpha) * bg`, per channel.
#[inline]
fn over(fg: Rgb, bg: Rgb, alpha: f32) -> Rgb {
    std::array::from_fn(|c| alpha * fg[c] + (1.0 - alpha) * bg[c])
}

#[inline]
fn to_pixel(color: Rgb) -> Pixel<u8> {
    Pixel(color.map(|c| (c.clamp(0.0, 1.0) * 255.0).round() as u8))
}
