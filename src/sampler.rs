extern crate alloc;
use alloc::vec::Vec;

use crate::PixelSource;
use crate::error::PaletteError;

/// Pixels with alpha at or below this are treated as transparent.
pub const ALPHA_THRESHOLD: u8 = 125;

/// Pixels with every channel above this are treated as white background.
pub const WHITE_THRESHOLD: u8 = 250;

/// The pixels kept after strided sampling and filtering.
#[derive(Debug, Clone, Default)]
pub struct SampleSet {
    /// Opaque, non-background colors in visiting order.
    pub samples: Vec<rgb::RGB<u8>>,
    /// Number of pixel positions visited, before filtering.
    pub visited: usize,
}

impl SampleSet {
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }
}

/// Whether a pixel should take part in quantization.
#[inline]
pub fn keep_pixel(pixel: rgb::RGBA<u8>, ignore_white: bool) -> bool {
    if pixel.a <= ALPHA_THRESHOLD {
        return false;
    }
    let is_white =
        pixel.r > WHITE_THRESHOLD && pixel.g > WHITE_THRESHOLD && pixel.b > WHITE_THRESHOLD;
    !(ignore_white && is_white)
}

/// Visit every `quality`-th pixel of `source` and keep the ones that pass
/// [`keep_pixel`].
///
/// Visits positions `0, quality, 2 * quality, ...` below `width * height`, so
/// exactly `ceil(width * height / quality)` pixels are inspected.
pub fn sample_pixels<S: PixelSource + ?Sized>(
    source: &S,
    quality: u32,
    ignore_white: bool,
) -> Result<SampleSet, PaletteError> {
    if quality < 1 {
        return Err(PaletteError::InvalidQuality(quality));
    }

    let (width, height) = (source.width(), source.height());
    let pixel_count = width
        .checked_mul(height)
        .ok_or(PaletteError::DimensionOverflow { width, height })?;
    let step = quality as usize;
    let mut samples = Vec::with_capacity(pixel_count.div_ceil(step));
    let mut visited = 0usize;

    for index in (0..pixel_count).step_by(step) {
        visited += 1;
        let pixel = source.pixel(index);
        if keep_pixel(pixel, ignore_white) {
            samples.push(rgb::RGB {
                r: pixel.r,
                g: pixel.g,
                b: pixel.b,
            });
        }
    }

    log::debug!(
        "sampled {} of {} pixels (stride {}), kept {}",
        visited,
        pixel_count,
        quality,
        samples.len()
    );

    Ok(SampleSet { samples, visited })
}
