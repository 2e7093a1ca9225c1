use std::sync::atomic::{AtomicUsize, Ordering};

use rayon::prelude::*;
use tracing::{debug, info, warn};

use crate::compositor::{Raster, RenderContext};
use crate::config::RenderConfig;
use crate::enums::SliceAxis;
use crate::error::{Error, Result};
use crate::range::ValueRange;
use crate::volume::{Mask, Volume};

/// Renders every slice of a volume along one axis with a shared context.
pub struct FrameSequencer<'a> {
    volume: &'a Volume,
    mask: Option<&'a Mask>,
    axis: SliceAxis,
    context: RenderContext,
}

impl<'a> FrameSequencer<'a> {
    /// Validate inputs and resolve the value range and label domain.
    ///
    /// Fails before any frame is drawn when the mask and volume shapes
    /// differ or the volume is empty.
    pub fn new(volume: &'a Volume, mask: Option<&'a Mask>, config: &RenderConfig) -> Result<Self> {
        config.validate()?;
        if let Some(mask) = mask
            && mask.dim() != volume.dim()
        {
            return Err(Error::ShapeMismatch {
                volume: volume.dim(),
                mask: mask.dim(),
            });
        }

        let range = ValueRange::resolve(volume, config.value_range)?;
        let max_label = mask.map_or(0, Mask::max_label);
        if mask.is_some() && max_label == 0 {
            warn!("mask contains no labels");
        }
        info!(
            min = range.min(),
            max = range.max(),
            max_label,
            "resolved display range"
        );

        Ok(Self {
            volume,
            mask,
            axis: config.axis,
            context: RenderContext::new(config, range, max_label)?,
        })
    }

    pub fn len(&self) -> usize {
        self.volume.depth(self.axis)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn context(&self) -> &RenderContext {
        &self.context
    }

    /// Render a single slice, or `None` when `index` is out of range.
    pub fn render_frame(&self, index: usize) -> Option<Raster> {
        let intensity = self.volume.get_slice_from_axis(index, self.axis)?;
        let labels = match self.mask {
            Some(mask) => Some(mask.get_slice_from_axis(index, self.axis)?),
            None => None,
        };
        Some(self.context.render_slice(&intensity, labels.as_ref()))
    }

    /// Render all slices in ascending index order.
    ///
    /// Slices are drawn in parallel; the indexed collect keeps the output
    /// aligned with slice indices.
    pub fn render_all(&self) -> Vec<Raster> {
        let axis = self.axis.array_axis();
        let progress = Progress::new(self.len());
        let slices = self.volume.data().axis_iter(axis).into_par_iter().enumerate();

        let frames: Vec<Raster> = match self.mask {
            Some(mask) => slices
                .zip(mask.data().axis_iter(axis).into_par_iter())
                .map(|((index, intensity), labels)| {
                    debug!(index, "rendering slice");
                    let frame = self.context.render_slice(&intensity, Some(&labels));
                    progress.tick();
                    frame
                })
                .collect(),
            None => slices
                .map(|(index, intensity)| {
                    debug!(index, "rendering slice");
                    let frame = self.context.render_slice(&intensity, None);
                    progress.tick();
                    frame
                })
                .collect(),
        };

        info!(frames = frames.len(), "rendered frame sequence");
        frames
    }
}

/// Counts finished slices across rayon workers and logs roughly every
/// tenth of the sequence.
struct Progress {
    done: AtomicUsize,
    total: usize,
    step: usize,
}

impl Progress {
    const REPORTS: usize = 10;

    fn new(total: usize) -> Self {
        Self {
            done: AtomicUsize::new(0),
            total,
            step: total.div_ceil(Self::REPORTS).max(1),
        }
    }

    fn tick(&self) -> usize {
        let done = self.done.fetch_add(1, Ordering::Relaxed) + 1;
        if done % self.step == 0 || done == self.total {
            info!(done, total = self.total, "rendering slices");
        }
        done
    }
}

/// Render every slice of `volume` along `config.axis`.
pub fn stack_slices(
    volume: &Volume,
    mask: Option<&Mask>,
    config: &RenderConfig,
) -> Result<Vec<Raster>> {
    Ok(FrameSequencer::new(volume, mask, config)?.render_all())
}
