extern crate alloc;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt::Write;

use crate::color_box::{Averaging, ColorBox};

/// One palette entry: a representative color and how many samples it stands for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Swatch {
    pub color: rgb::RGB<u8>,
    /// Population of the box this color was taken from.
    pub population: u64,
}

impl Swatch {
    /// Uppercase hex form without a leading `#`, e.g. `"FF8000"`.
    pub fn hex(&self) -> String {
        to_hex(self.color)
    }
}

/// Format a color as six uppercase hex digits.
pub fn to_hex(color: rgb::RGB<u8>) -> String {
    let mut s = String::with_capacity(6);
    // Writing to a String cannot fail
    let _ = write!(s, "{:02X}{:02X}{:02X}", color.r, color.g, color.b);
    s
}

/// Extracted colors, most dominant first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    swatches: Vec<Swatch>,
}

impl Palette {
    /// Build a palette from boxes already ordered by descending population.
    pub fn from_boxes(boxes: &[ColorBox<'_>], averaging: Averaging) -> Self {
        let swatches = boxes
            .iter()
            .map(|b| Swatch {
                color: b.average_color(averaging),
                population: b.population(),
            })
            .collect();
        Self { swatches }
    }

    /// Get palette entries with their populations.
    pub fn swatches(&self) -> &[Swatch] {
        &self.swatches
    }

    /// Get just the colors, in palette order.
    pub fn colors(&self) -> Vec<rgb::RGB<u8>> {
        self.swatches.iter().map(|s| s.color).collect()
    }

    /// Colors as uppercase hex strings, in palette order.
    pub fn hex_colors(&self) -> Vec<String> {
        self.swatches.iter().map(Swatch::hex).collect()
    }

    /// The most populous entry.
    pub fn dominant(&self) -> Option<&Swatch> {
        self.swatches.first()
    }

    /// Number of palette entries.
    pub fn len(&self) -> usize {
        self.swatches.len()
    }

    /// Whether the palette is empty.
    pub fn is_empty(&self) -> bool {
        self.swatches.is_empty()
    }

    pub fn iter(&self) -> core::slice::Iter<'_, Swatch> {
        self.swatches.iter()
    }
}

impl<'a> IntoIterator for &'a Palette {
    type Item = &'a Swatch;
    type IntoIter = core::slice::Iter<'a, Swatch>;

    fn into_iter(self) -> Self::IntoIter {
        self.swatches.iter()
    }
}
