use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum PaletteError {
    #[error("image dimensions cannot be zero")]
    ZeroDimension,

    #[error("pixel buffer length {len} does not match dimensions {width}x{height}")]
    DimensionMismatch {
        len: usize,
        width: usize,
        height: usize,
    },

    #[error("image dimensions {width}x{height} overflow the addressable pixel count")]
    DimensionOverflow { width: usize, height: usize },

    #[error("quality must be at least 1, got {0}")]
    InvalidQuality(u32),

    #[error("count must be at least 2, got {0}; use dominant_color for a single color")]
    InvalidCount(u32),

    #[error("sigbits must be between 1 and 8, got {0}")]
    InvalidSigbits(u8),

    /// Every sampled pixel was transparent or near-white.
    #[error("no opaque, non-white pixels left after sampling")]
    NoValidPixels,
}
