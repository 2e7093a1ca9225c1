use ndarray::{Array2, ArrayView2, Zip};

use crate::enums::Interpolation;

pub(crate) type Rgb = [f32; 3];

pub(crate) struct Interpolator;

impl Interpolator {
    /// Largest (width, height) with the slice's aspect ratio that fits a
    /// `side` x `side` canvas. Never returns a zero extent.
    pub(crate) fn fit_dimensions(slice_dim: (usize, usize), side: u32) -> (u32, u32) {
        let (rows, cols) = slice_dim;
        let longest = rows.max(cols).max(1) as f32;
        let scale = side as f32 / longest;
        let width = ((cols as f32 * scale).round() as u32).clamp(1, side);
        let height = ((rows as f32 * scale).round() as u32).clamp(1, side);
        (width, height)
    }

    /// Resample `slice` to `width` x `height`, returned as (height, width).
    pub(crate) fn resample(
        slice: &ArrayView2<'_, Rgb>,
        width: u32,
        height: u32,
        interpolation: Interpolation,
    ) -> Array2<Rgb> {
        let (slice_height, slice_width) = slice.dim();
        let mut out = Array2::from_elem((height as usize, width as usize), [0.0; 3]);

        Zip::indexed(&mut out).par_for_each(|(y, x), pixel| {
            // Normalized coordinates with half-pixel offset
            let norm_x = (x as f32 + 0.5) / width as f32;
            let norm_y = (y as f32 + 0.5) / height as f32;

            *pixel = match interpolation {
                Interpolation::Nearest => {
                    let src_x = ((norm_x * slice_width as f32) as usize).min(slice_width - 1);
                    let src_y = ((norm_y * slice_height as f32) as usize).min(slice_height - 1);
                    slice[[src_y, src_x]]
                }
                Interpolation::Bilinear => {
                    // Convert back to source coordinates
                    let src_x = norm_x * slice_width as f32 - 0.5;
                    let src_y = norm_y * slice_height as f32 - 0.5;

                    // Clamp to valid range
                    let src_x = src_x.max(0.0).min((slice_width - 1) as f32);
                    let src_y = src_y.max(0.0).min((slice_height - 1) as f32);

                    Self::bilinear_interpolate(slice, src_y, src_x)
                }
            };
        });

        out
    }

    #[inline]
    pub(crate) fn bilinear_interpolate(slice: &ArrayView2<'_, Rgb>, y: f32, x: f32) -> Rgb {
        let (height, width) = slice.dim();

        let y0 = y.floor() as usize;
        let x0 = x.floor() as usize;
        let y1 = (y0 + 1).min(height - 1);
        let x1 = (x0 + 1).min(width - 1);

        let dy = y - y0 as f32;
        let dx = x - x0 as f32;
        let one_minus_dx = 1.0 - dx;
        let one_minus_dy = 1.0 - dy;

        let v00 = slice[[y0, x0]];
        let v01 = slice[[y0, x1]];
        let v10 = slice[[y1, x0]];
        let v11 = slice[[y1, x1]];

        std::array::from_fn(|c| {
            let v0 = v00[c].mul_add(one_minus_dx, v01[c] * dx);
            let v1 = v10[c].mul_add(one_minus_dx, v11[c] * dx);
            v0.mul_add(one_minus_dy, v1 * dy)
        })
    }
}
