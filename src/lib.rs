#![forbid(unsafe_code)]
#![cfg_attr(not(feature = "std"), no_std)]

//! Dominant color and palette extraction by median-cut quantization.
//!
//! Pixels are sampled with a stride, bucketed into a reduced-resolution RGB
//! histogram, and the occupied region of the color cube is split into boxes
//! until the requested number of colors is reached. Each box contributes its
//! average color; the palette is ordered by how many samples each box holds.
//!
//! ```
//! use colorcut::{PaletteConfig, RgbaImage};
//!
//! let pixels = vec![rgb::RGBA { r: 200, g: 30, b: 30, a: 255 }; 16];
//! let image = RgbaImage::new(&pixels, 4, 4).unwrap();
//! let palette = colorcut::palette(&image, &PaletteConfig::new().count(4)).unwrap();
//! assert_eq!(palette.hex_colors(), vec!["C81E1E"]);
//! ```

extern crate alloc;

pub mod color_box;
pub mod error;
pub mod histogram;
pub mod median_cut;
pub mod palette;
pub mod sampler;

pub use color_box::{Averaging, ColorBox};
pub use error::PaletteError;
pub use histogram::Histogram;
pub use palette::{Palette, Swatch, to_hex};

/// Read access to an image's pixels by linear index (`y * width + x`).
pub trait PixelSource {
    fn width(&self) -> usize;
    fn height(&self) -> usize;
    /// Pixel at `index`, for `index < width * height`.
    fn pixel(&self, index: usize) -> rgb::RGBA<u8>;
}

/// A borrowed RGBA pixel buffer.
#[derive(Debug, Clone, Copy)]
pub struct RgbaImage<'a> {
    pixels: &'a [rgb::RGBA<u8>],
    width: usize,
    height: usize,
}

impl<'a> RgbaImage<'a> {
    pub fn new(
        pixels: &'a [rgb::RGBA<u8>],
        width: usize,
        height: usize,
    ) -> Result<Self, PaletteError> {
        validate_dimensions(pixels.len(), width, height)?;
        Ok(Self {
            pixels,
            width,
            height,
        })
    }
}

impl PixelSource for RgbaImage<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, index: usize) -> rgb::RGBA<u8> {
        self.pixels[index]
    }
}

/// A borrowed RGB pixel buffer; every pixel is treated as fully opaque.
#[derive(Debug, Clone, Copy)]
pub struct RgbImage<'a> {
    pixels: &'a [rgb::RGB<u8>],
    width: usize,
    height: usize,
}

impl<'a> RgbImage<'a> {
    pub fn new(
        pixels: &'a [rgb::RGB<u8>],
        width: usize,
        height: usize,
    ) -> Result<Self, PaletteError> {
        validate_dimensions(pixels.len(), width, height)?;
        Ok(Self {
            pixels,
            width,
            height,
        })
    }
}

impl PixelSource for RgbImage<'_> {
    fn width(&self) -> usize {
        self.width
    }

    fn height(&self) -> usize {
        self.height
    }

    fn pixel(&self, index: usize) -> rgb::RGBA<u8> {
        let p = self.pixels[index];
        rgb::RGBA {
            r: p.r,
            g: p.g,
            b: p.b,
            a: 255,
        }
    }
}

/// Configuration for palette extraction.
#[derive(Debug, Clone)]
pub struct PaletteConfig {
    /// Sampling stride: every `quality`-th pixel is inspected (>= 1).
    /// 1 is the most accurate; larger values trade accuracy for speed.
    pub quality: u32,
    /// Maximum number of palette colors (>= 2).
    pub count: u32,
    /// Significant bits kept per channel in the histogram (1..=8).
    pub sigbits: u8,
    /// Skip near-white pixels as background.
    pub ignore_white: bool,
    /// How each box's representative color is computed.
    pub averaging: Averaging,
}

impl Default for PaletteConfig {
    fn default() -> Self {
        Self {
            quality: 10,
            count: 10,
            sigbits: histogram::DEFAULT_SIGBITS,
            ignore_white: true,
            averaging: Averaging::SampleMean,
        }
    }
}

impl PaletteConfig {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn quality(mut self, q: u32) -> Self {
        self.quality = q;
        self
    }

    pub fn count(mut self, n: u32) -> Self {
        self.count = n;
        self
    }

    pub fn sigbits(mut self, bits: u8) -> Self {
        self.sigbits = bits;
        self
    }

    pub fn ignore_white(mut self, ignore: bool) -> Self {
        self.ignore_white = ignore;
        self
    }

    pub fn averaging(mut self, averaging: Averaging) -> Self {
        self.averaging = averaging;
        self
    }
}

/// Extract up to `config.count` representative colors, most dominant first.
///
/// A palette shorter than requested means the sampled pixels do not have
/// enough distinct colors to split further; it is not an error.
pub fn palette<S: PixelSource + ?Sized>(
    source: &S,
    config: &PaletteConfig,
) -> Result<Palette, PaletteError> {
    if config.count < 2 {
        return Err(PaletteError::InvalidCount(config.count));
    }
    extract(source, config, config.count as usize)
}

/// The single most representative color of the image.
///
/// Equivalent to running the quantizer with a target of one box; the `count`
/// field of `config` is ignored.
pub fn dominant_color<S: PixelSource + ?Sized>(
    source: &S,
    config: &PaletteConfig,
) -> Result<rgb::RGB<u8>, PaletteError> {
    let palette = extract(source, config, 1)?;
    palette
        .dominant()
        .map(|s| s.color)
        .ok_or(PaletteError::NoValidPixels)
}

fn extract<S: PixelSource + ?Sized>(
    source: &S,
    config: &PaletteConfig,
    target: usize,
) -> Result<Palette, PaletteError> {
    if !(1..=8).contains(&config.sigbits) {
        return Err(PaletteError::InvalidSigbits(config.sigbits));
    }

    // 1. Strided sampling with alpha / background filtering
    let samples = sampler::sample_pixels(source, config.quality, config.ignore_white)?;
    if samples.is_empty() {
        return Err(PaletteError::NoValidPixels);
    }

    // 2. Reduced-resolution histogram
    let hist = Histogram::from_samples(&samples.samples, config.sigbits);

    // 3. Two-phase median cut
    let boxes = median_cut::median_cut(&hist, target);

    // 4. One color per box, most populous first
    let palette = Palette::from_boxes(&boxes, config.averaging);
    log::debug!(
        "palette: {} of {} colors from {} samples",
        palette.len(),
        target,
        samples.len()
    );
    Ok(palette)
}

fn validate_dimensions(
    pixel_count: usize,
    width: usize,
    height: usize,
) -> Result<(), PaletteError> {
    if width == 0 || height == 0 {
        return Err(PaletteError::ZeroDimension);
    }
    if width.checked_mul(height) != Some(pixel_count) {
        return Err(PaletteError::DimensionMismatch {
            len: pixel_count,
            width,
            height,
        });
    }
    Ok(())
}
