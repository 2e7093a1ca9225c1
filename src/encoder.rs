use std::fs;
use std::path::Path;

use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, DynamicImage, Frame};
use tracing::{info, warn};

use crate::compositor::Raster;
use crate::error::{Error, Result};

/// Palette quantisation speed handed to the GIF encoder (1 = best, 30 = fastest).
const GIF_SPEED: i32 = 10;

/// GIF stores frame delays in whole centiseconds.
const DELAY_UNIT_MS: u32 = 10;

/// Write `frames` as a GIF that loops forever, showing each frame for
/// `duration_ms` milliseconds. Missing parent directories are created.
///
/// The delay is rounded to the nearest 10 ms, and never below 10 ms, since
/// GIF cannot store finer delays and viewers treat 0 as "as fast as possible".
pub fn save_as_gif(frames: &[Raster], path: impl AsRef<Path>, duration_ms: u32) -> Result<()> {
    let path = path.as_ref();
    if duration_ms < 1 {
        return Err(Error::invalid("duration", duration_ms, "must be a positive integer"));
    }
    if frames.is_empty() {
        return Err(Error::encoding(path, "no frames to encode"));
    }

    let delay_ms = gif_delay_ms(duration_ms);
    if delay_ms != duration_ms {
        warn!(duration_ms, delay_ms, "frame duration rounded to GIF centiseconds");
    }

    // GifEncoder writes the trailer on drop.
    let mut bytes = Vec::new();
    {
        let mut encoder = GifEncoder::new_with_speed(&mut bytes, GIF_SPEED);
        encoder
            .set_repeat(Repeat::Infinite)
            .map_err(|e| Error::encoding(path, e))?;

        let delay = Delay::from_numer_denom_ms(delay_ms, 1);
        for raster in frames {
            let rgba = DynamicImage::ImageRgb8(raster.clone()).into_rgba8();
            encoder
                .encode_frame(Frame::from_parts(rgba, 0, 0, delay))
                .map_err(|e| Error::encoding(path, e))?;
        }
    }

    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| Error::encoding(path, e))?;
    }
    fs::write(path, &bytes).map_err(|e| Error::encoding(path, e))?;

    info!(path = %path.display(), frames = frames.len(), delay_ms, bytes = bytes.len(), "wrote animation");
    Ok(())
}

/// Nearest representable GIF delay in milliseconds, at least one centisecond.
fn gif_delay_ms(duration_ms: u32) -> u32 {
    let centis = (duration_ms.saturating_add(DELAY_UNIT_MS / 2) / DELAY_UNIT_MS)
        .clamp(1, u32::from(u16::MAX));
    centis * DELAY_UNIT_MS
}
