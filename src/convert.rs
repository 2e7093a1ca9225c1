use tracing::info;

use crate::config::ConvertOptions;
use crate::encoder::save_as_gif;
use crate::error::Result;
use crate::orientation::normalize_orientation;
use crate::sequencer::FrameSequencer;
use crate::volume::{Mask, Volume};
use crate::volume_loader::VolumeLoader;

/// Summary of a finished conversion.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvertReport {
    pub frames: usize,
    pub canvas_size: u32,
}

/// Load, render and encode in one pass.
///
/// Every option is validated before any file is opened, and the mask is
/// checked against the volume before the first frame is drawn.
#[tracing::instrument(skip(options), fields(image = %options.image.display()))]
pub fn convert(options: &ConvertOptions) -> Result<ConvertReport> {
    let orientation = options.validate()?;

    let volume = VolumeLoader::load(&options.image, options.sort_by)?;
    let volume = Volume::new(normalize_orientation(volume, &orientation, options.n_rot90));

    let mask = match &options.mask {
        Some(path) => {
            let labels = VolumeLoader::load_labels(path, options.sort_by)?;
            Some(Mask::new(normalize_orientation(
                labels,
                &orientation,
                options.n_rot90,
            )))
        }
        None => None,
    };

    let sequencer = FrameSequencer::new(&volume, mask.as_ref(), &options.render)?;
    info!(
        frames = sequencer.len(),
        orientation = %orientation,
        n_rot90 = options.n_rot90,
        "rendering slices"
    );
    let frames = sequencer.render_all();

    save_as_gif(&frames, &options.output, options.duration)?;

    Ok(ConvertReport {
        frames: frames.len(),
        canvas_size: sequencer.context().canvas_size(),
    })
}
