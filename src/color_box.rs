use crate::histogram::{HistEntry, Histogram, quantize_channel};

/// How a box's representative color is derived from the cells it covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Averaging {
    /// Mean of the original sampled colors. A box holding a single color
    /// reports that exact color.
    #[default]
    SampleMean,
    /// Population-weighted mean of cell centers, truncated. Matches the
    /// classic MMCQ output, which is off by up to half a cell.
    CellCenter,
}

/// Channel axis of the quantized color cube.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    Red,
    Green,
    Blue,
}

/// An axis-aligned box over the quantized color cube.
///
/// Ranges are inclusive quantized channel values. The population is computed
/// once on construction since neither the ranges nor the histogram change.
#[derive(Debug, Clone, Copy)]
pub struct ColorBox<'h> {
    pub r: (u8, u8),
    pub g: (u8, u8),
    pub b: (u8, u8),
    hist: &'h Histogram,
    population: u64,
}

impl<'h> ColorBox<'h> {
    pub fn new(r: (u8, u8), g: (u8, u8), b: (u8, u8), hist: &'h Histogram) -> Self {
        debug_assert!(r.0 <= r.1 && g.0 <= g.1 && b.0 <= b.1);
        let mut cbox = Self {
            r,
            g,
            b,
            hist,
            population: 0,
        };
        let population = cbox.entries().map(|e| e.count as u64).sum();
        cbox.population = population;
        cbox
    }

    /// Smallest box covering every occupied cell of `hist`.
    pub fn enclosing(hist: &'h Histogram) -> Option<Self> {
        let ext = hist.extent()?;
        Some(Self::new(ext.r, ext.g, ext.b, hist))
    }

    /// Inclusive range along one axis.
    pub fn range(&self, axis: Axis) -> (u8, u8) {
        match axis {
            Axis::Red => self.r,
            Axis::Green => self.g,
            Axis::Blue => self.b,
        }
    }

    /// Copy of this box with one axis' range replaced.
    pub fn with_range(&self, axis: Axis, range: (u8, u8)) -> Self {
        let (mut r, mut g, mut b) = (self.r, self.g, self.b);
        match axis {
            Axis::Red => r = range,
            Axis::Green => g = range,
            Axis::Blue => b = range,
        }
        Self::new(r, g, b, self.hist)
    }

    /// Number of cells along one axis.
    pub fn width(&self, axis: Axis) -> u32 {
        let (lo, hi) = self.range(axis);
        (hi - lo) as u32 + 1
    }

    /// Geometric size in quantized cells.
    pub fn volume(&self) -> u32 {
        self.width(Axis::Red) * self.width(Axis::Green) * self.width(Axis::Blue)
    }

    /// Number of sampled pixels falling inside the box.
    pub fn population(&self) -> u64 {
        self.population
    }

    fn contains_cell(&self, (r, g, b): (u8, u8, u8)) -> bool {
        (self.r.0..=self.r.1).contains(&r)
            && (self.g.0..=self.g.1).contains(&g)
            && (self.b.0..=self.b.1).contains(&b)
    }

    /// Occupied cells inside this box with their quantized coordinates.
    pub(crate) fn cells(&self) -> impl Iterator<Item = ((u8, u8, u8), &'h HistEntry)> + '_ {
        self.hist
            .cells()
            .filter(move |&(cell, _)| self.contains_cell(cell))
    }

    fn entries(&self) -> impl Iterator<Item = &'h HistEntry> + '_ {
        self.cells().map(|(_, e)| e)
    }

    /// Whether the color's quantized value lies inside the box.
    pub fn contains(&self, color: rgb::RGB<u8>) -> bool {
        let sigbits = self.hist.sigbits();
        self.contains_cell((
            quantize_channel(color.r, sigbits),
            quantize_channel(color.g, sigbits),
            quantize_channel(color.b, sigbits),
        ))
    }

    /// Population-weighted average color.
    ///
    /// An empty box falls back to the geometric center of its ranges.
    pub fn average_color(&self, averaging: Averaging) -> rgb::RGB<u8> {
        if self.population == 0 {
            return self.midpoint();
        }
        match averaging {
            Averaging::SampleMean => self.sample_mean(),
            Averaging::CellCenter => self.cell_center_mean(),
        }
    }

    fn sample_mean(&self) -> rgb::RGB<u8> {
        let (mut r_sum, mut g_sum, mut b_sum) = (0u64, 0u64, 0u64);
        for e in self.entries() {
            r_sum += e.r_sum;
            g_sum += e.g_sum;
            b_sum += e.b_sum;
        }
        let n = self.population;
        let avg = |sum: u64| ((sum + n / 2) / n).min(255) as u8;
        rgb::RGB {
            r: avg(r_sum),
            g: avg(g_sum),
            b: avg(b_sum),
        }
    }

    fn cell_center_mean(&self) -> rgb::RGB<u8> {
        let mult = (1u32 << (8 - self.hist.sigbits())) as f64;
        let (mut ntot, mut r_sum, mut g_sum, mut b_sum) = (0.0f64, 0.0f64, 0.0f64, 0.0f64);
        for ((r, g, b), e) in self.cells() {
            let h = e.count as f64;
            ntot += h;
            r_sum += h * (r as f64 + 0.5) * mult;
            g_sum += h * (g as f64 + 0.5) * mult;
            b_sum += h * (b as f64 + 0.5) * mult;
        }
        let avg = |sum: f64| (sum / ntot).min(255.0) as u8;
        rgb::RGB {
            r: avg(r_sum),
            g: avg(g_sum),
            b: avg(b_sum),
        }
    }

    fn midpoint(&self) -> rgb::RGB<u8> {
        let mult = 1u32 << (8 - self.hist.sigbits());
        let mid = |(lo, hi): (u8, u8)| (mult * (lo as u32 + hi as u32 + 1) / 2).min(255) as u8;
        rgb::RGB {
            r: mid(self.r),
            g: mid(self.g),
            b: mid(self.b),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::histogram::DEFAULT_SIGBITS;
    use alloc::vec;
    use alloc::vec::Vec;

    fn px(r: u8, g: u8, b: u8) -> rgb::RGB<u8> {
        rgb::RGB { r, g, b }
    }

    #[test]
    fn volume_counts_cells() {
        let hist = Histogram::from_samples(&[px(0, 0, 0)], DEFAULT_SIGBITS);
        let cbox = ColorBox::new((0, 3), (2, 2), (10, 14), &hist);
        assert_eq!(cbox.volume(), 4 * 5);
        assert_eq!(ColorBox::new((0, 31), (0, 31), (0, 31), &hist).volume(), 32768);
    }

    #[test]
    fn population_only_counts_inside() {
        let pixels = vec![px(0, 0, 0), px(0, 0, 0), px(100, 0, 0), px(255, 255, 255)];
        let hist = Histogram::from_samples(&pixels, DEFAULT_SIGBITS);
        assert_eq!(ColorBox::new((0, 31), (0, 31), (0, 31), &hist).population(), 4);
        assert_eq!(ColorBox::new((0, 12), (0, 0), (0, 0), &hist).population(), 3);
        assert_eq!(ColorBox::new((0, 11), (0, 0), (0, 0), &hist).population(), 2);
        assert_eq!(ColorBox::new((13, 30), (0, 31), (0, 31), &hist).population(), 0);
    }

    #[test]
    fn uniform_box_average_is_exact() {
        let pixels = vec![px(10, 20, 30); 50];
        let hist = Histogram::from_samples(&pixels, DEFAULT_SIGBITS);
        let cbox = ColorBox::enclosing(&hist).unwrap();
        assert_eq!(cbox.average_color(Averaging::SampleMean), px(10, 20, 30));
        // Cell (1, 2, 3) has center (12, 20, 28)
        assert_eq!(cbox.average_color(Averaging::CellCenter), px(12, 20, 28));
    }

    #[test]
    fn average_is_population_weighted() {
        let mut pixels = vec![px(0, 0, 0); 3];
        pixels.push(px(200, 0, 0));
        let hist = Histogram::from_samples(&pixels, DEFAULT_SIGBITS);
        let cbox = ColorBox::enclosing(&hist).unwrap();
        assert_eq!(cbox.average_color(Averaging::SampleMean).r, 50);
        // (3 * 4 + 1 * 204) / 4 = 54
        assert_eq!(cbox.average_color(Averaging::CellCenter).r, 54);
    }

    #[test]
    fn empty_box_uses_midpoint() {
        let hist = Histogram::from_samples(&[px(0, 0, 0)], DEFAULT_SIGBITS);
        let cbox = ColorBox::new((4, 7), (0, 31), (31, 31), &hist);
        assert_eq!(cbox.population(), 0);
        let expected = px(48, 128, 252);
        assert_eq!(cbox.average_color(Averaging::SampleMean), expected);
        assert_eq!(cbox.average_color(Averaging::CellCenter), expected);
    }

    #[test]
    fn contains_checks_every_channel() {
        let hist = Histogram::from_samples(&[px(0, 0, 0)], DEFAULT_SIGBITS);
        let cbox = ColorBox::new((0, 3), (4, 7), (0, 31), &hist);
        assert!(cbox.contains(px(31, 32, 255)));
        assert!(!cbox.contains(px(32, 32, 0)));
        // Red in range but green outside
        assert!(!cbox.contains(px(0, 0, 0)));
    }

    #[test]
    fn with_range_recomputes_population() {
        let pixels: Vec<_> = (0..8u8).map(|i| px(i * 32, 0, 0)).collect();
        let hist = Histogram::from_samples(&pixels, DEFAULT_SIGBITS);
        let cbox = ColorBox::enclosing(&hist).unwrap();
        assert_eq!(cbox.r, (0, 28));
        let lower = cbox.with_range(Axis::Red, (0, 11));
        assert_eq!(lower.population(), 3);
        assert_eq!(lower.g, cbox.g);
    }
}
