extern crate alloc;
use alloc::collections::BTreeMap;

/// Default number of significant bits kept per channel.
pub const DEFAULT_SIGBITS: u8 = 5;

/// A histogram bucket: pixel count and exact channel sums for one quantized cell.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistEntry {
    /// Number of sampled pixels in this cell
    pub count: u32,
    /// Sum of the original 8-bit red values
    pub r_sum: u64,
    /// Sum of the original 8-bit green values
    pub g_sum: u64,
    /// Sum of the original 8-bit blue values
    pub b_sum: u64,
}

/// Inclusive quantized range observed on each channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Extent {
    pub r: (u8, u8),
    pub g: (u8, u8),
    pub b: (u8, u8),
}

/// Reduced-resolution color histogram keyed by quantized index.
///
/// Built once from a sample set and read-only afterwards. Buckets live in an
/// ordered map so every sum taken over them is iteration-order stable.
#[derive(Debug, Clone)]
pub struct Histogram {
    sigbits: u8,
    buckets: BTreeMap<u32, HistEntry>,
    total: u64,
}

/// Drop the low `8 - sigbits` bits of a channel.
#[inline]
pub fn quantize_channel(value: u8, sigbits: u8) -> u8 {
    value >> (8 - sigbits)
}

/// Pack quantized channel values into a single histogram key.
#[inline]
pub fn color_index(r: u8, g: u8, b: u8, sigbits: u8) -> u32 {
    let bits = sigbits as u32;
    ((r as u32) << (2 * bits)) | ((g as u32) << bits) | b as u32
}

/// Inverse of [`color_index`].
#[inline]
pub fn split_index(index: u32, sigbits: u8) -> (u8, u8, u8) {
    let bits = sigbits as u32;
    let mask = (1u32 << bits) - 1;
    (
        ((index >> (2 * bits)) & mask) as u8,
        ((index >> bits) & mask) as u8,
        (index & mask) as u8,
    )
}

impl Histogram {
    /// Tally every sample into its quantized cell.
    ///
    /// `sigbits` must be in `1..=8`; callers validate it up front.
    pub fn from_samples(samples: &[rgb::RGB<u8>], sigbits: u8) -> Self {
        debug_assert!((1..=8).contains(&sigbits));

        let mut buckets: BTreeMap<u32, HistEntry> = BTreeMap::new();
        for p in samples {
            let key = color_index(
                quantize_channel(p.r, sigbits),
                quantize_channel(p.g, sigbits),
                quantize_channel(p.b, sigbits),
                sigbits,
            );
            let entry = buckets.entry(key).or_default();
            entry.count += 1;
            entry.r_sum += p.r as u64;
            entry.g_sum += p.g as u64;
            entry.b_sum += p.b as u64;
        }

        log::debug!(
            "histogram: {} samples in {} cells at {} bits",
            samples.len(),
            buckets.len(),
            sigbits
        );

        Self {
            sigbits,
            buckets,
            total: samples.len() as u64,
        }
    }

    pub fn sigbits(&self) -> u8 {
        self.sigbits
    }

    /// Total number of samples tallied.
    pub fn total(&self) -> u64 {
        self.total
    }

    /// Number of occupied cells.
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Pixel count for a quantized index; absent cells count zero.
    pub fn count(&self, index: u32) -> u32 {
        self.buckets.get(&index).map_or(0, |e| e.count)
    }

    pub fn get(&self, index: u32) -> Option<&HistEntry> {
        self.buckets.get(&index)
    }

    /// Occupied cells as `((rq, gq, bq), entry)`, in index order.
    pub fn cells(&self) -> impl Iterator<Item = ((u8, u8, u8), &HistEntry)> + '_ {
        self.buckets
            .iter()
            .map(move |(&k, e)| (split_index(k, self.sigbits), e))
    }

    /// Smallest box enclosing every occupied cell, or `None` when empty.
    pub fn extent(&self) -> Option<Extent> {
        let mut cells = self.cells().map(|(c, _)| c);
        let (r, g, b) = cells.next()?;
        let mut ext = Extent {
            r: (r, r),
            g: (g, g),
            b: (b, b),
        };
        for (r, g, b) in cells {
            ext.r = (ext.r.0.min(r), ext.r.1.max(r));
            ext.g = (ext.g.0.min(g), ext.g.1.max(g));
            ext.b = (ext.b.0.min(b), ext.b.1.max(b));
        }
        Some(ext)
    }
}
