extern crate alloc;
use alloc::vec;
use alloc::vec::Vec;

use crate::color_box::{Axis, ColorBox};
use crate::histogram::Histogram;

/// Upper bound on split attempts in the volume-weighted phase.
pub const MAX_ITERATION: usize = 1000;

/// Box count the population phase splits toward: `ceil(0.75 * target)`.
pub fn population_goal(target: usize) -> usize {
    (3 * target).div_ceil(4)
}

/// All three axes, widest first; equal widths keep red, green, blue order.
fn axes_by_width(cbox: &ColorBox<'_>) -> [Axis; 3] {
    let mut axes = [Axis::Red, Axis::Green, Axis::Blue];
    axes.sort_by(|a, b| cbox.width(*b).cmp(&cbox.width(*a)));
    axes
}

/// Widest axis of the box; equal widths favor red, then green, then blue.
pub fn widest_axis(cbox: &ColorBox<'_>) -> Axis {
    axes_by_width(cbox)[0]
}

/// Cumulative population along `axis`, one slot per coordinate of the box.
fn partial_sums(cbox: &ColorBox<'_>, axis: Axis) -> Vec<u64> {
    let (lo, _) = cbox.range(axis);
    let mut sums = vec![0u64; cbox.width(axis) as usize];
    for ((r, g, b), entry) in cbox.cells() {
        let coord = match axis {
            Axis::Red => r,
            Axis::Green => g,
            Axis::Blue => b,
        };
        sums[(coord - lo) as usize] += entry.count as u64;
    }
    let mut running = 0u64;
    for slot in sums.iter_mut() {
        running += *slot;
        *slot = running;
    }
    sums
}

/// Pick the cut coordinate along an axis from its partial sums.
///
/// Returns the last coordinate of the lower child, or `None` if every
/// coordinate would leave one side empty.
fn find_cut(partial: &[u64], lo: i32, hi: i32) -> Option<i32> {
    let total = *partial.last()?;
    if lo == hi || total < 2 {
        return None;
    }

    let median = partial.iter().position(|&s| s > total / 2)? as i32 + lo;

    let left = median - lo;
    let right = hi - median;
    let balanced = if left <= right {
        (hi - 1).min(median + right / 2)
    } else {
        lo.max(median - 1 - left / 2)
    };

    let valid = |cut: i32| {
        if cut < lo || cut >= hi {
            return false;
        }
        let below = partial[(cut - lo) as usize];
        below > 0 && below < total
    };

    // Nearest valid cut, looking up before down at each distance
    let span = hi - lo;
    for dist in 0..=span {
        if valid(balanced + dist) {
            return Some(balanced + dist);
        }
        if dist > 0 && valid(balanced - dist) {
            return Some(balanced - dist);
        }
    }
    None
}

/// Split a box at a population-balanced point along its widest axis.
///
/// When every cut along the widest axis would leave one side empty, the
/// remaining axes are tried from widest to narrowest. Returns the two
/// children, or the box itself and `None` when it cannot be split: population
/// below 2, or all occupied cells collapse to a single cell.
pub fn split_box<'h>(cbox: &ColorBox<'h>) -> (ColorBox<'h>, Option<ColorBox<'h>>) {
    if cbox.population() < 2 {
        return (*cbox, None);
    }

    for axis in axes_by_width(cbox) {
        let (lo, hi) = cbox.range(axis);
        let partial = partial_sums(cbox, axis);
        let Some(cut) = find_cut(&partial, lo as i32, hi as i32) else {
            continue;
        };
        let cut = cut as u8;

        let lower = cbox.with_range(axis, (lo, cut));
        let upper = cbox.with_range(axis, (cut + 1, hi));
        debug_assert_eq!(lower.population() + upper.population(), cbox.population());

        log::trace!(
            "split {:?} [{}, {}] at {}: {} + {}",
            axis,
            lo,
            hi,
            cut,
            lower.population(),
            upper.population()
        );
        return (lower, Some(upper));
    }

    log::trace!(
        "box {:?}/{:?}/{:?} not splittable",
        cbox.r,
        cbox.g,
        cbox.b
    );
    (*cbox, None)
}

#[derive(Debug, Clone, Copy)]
struct WorkBox<'h> {
    cbox: ColorBox<'h>,
    /// The splitter already rejected this box.
    exhausted: bool,
}

impl WorkBox<'_> {
    fn splittable(&self) -> bool {
        !self.exhausted && self.cbox.population() >= 2
    }
}

/// Population-phase priority.
fn by_population(cbox: &ColorBox<'_>) -> u64 {
    cbox.population()
}

/// Volume-phase priority.
fn by_volume(cbox: &ColorBox<'_>) -> u64 {
    cbox.volume() as u64 * cbox.population()
}

/// Index of the splittable box with the highest priority; first wins on ties.
fn select(boxes: &[WorkBox<'_>], priority: impl Fn(&ColorBox<'_>) -> u64) -> Option<usize> {
    let mut best: Option<(usize, u64)> = None;
    for (i, wb) in boxes.iter().enumerate() {
        if !wb.splittable() {
            continue;
        }
        let p = priority(&wb.cbox);
        if best.map_or(true, |(_, bp)| p > bp) {
            best = Some((i, p));
        }
    }
    best.map(|(i, _)| i)
}

/// Split boxes chosen by `priority` until `target` boxes exist, nothing is
/// splittable, or `max_attempts` splits were tried. Returns attempts made.
fn split_until(
    boxes: &mut Vec<WorkBox<'_>>,
    target: usize,
    max_attempts: usize,
    priority: impl Fn(&ColorBox<'_>) -> u64,
) -> usize {
    let mut attempts = 0;
    while boxes.len() < target && attempts < max_attempts {
        let Some(idx) = select(boxes, &priority) else {
            break;
        };
        attempts += 1;

        match split_box(&boxes[idx].cbox) {
            (lower, Some(upper)) => {
                boxes[idx] = WorkBox {
                    cbox: lower,
                    exhausted: false,
                };
                boxes.push(WorkBox {
                    cbox: upper,
                    exhausted: false,
                });
            }
            (_, None) => boxes[idx].exhausted = true,
        }
    }
    attempts
}

/// Run two-phase median cut over `hist` toward `target` boxes.
///
/// Phase one splits by population until `ceil(0.75 * target)` boxes exist;
/// phase two splits by `volume * population`. The result is ordered by
/// descending population, ties keeping collection order.
///
/// The result holds fewer than `target` boxes when every remaining box is a
/// single occupied cell (or the phase-two attempt bound is hit). It is empty
/// only for an empty histogram.
pub fn median_cut(hist: &Histogram, target: usize) -> Vec<ColorBox<'_>> {
    let Some(seed) = ColorBox::enclosing(hist) else {
        return Vec::new();
    };

    let mut boxes = Vec::with_capacity(target.max(1));
    boxes.push(WorkBox {
        cbox: seed,
        exhausted: false,
    });

    if target > 1 {
        let goal = population_goal(target);
        let attempts = split_until(&mut boxes, goal, usize::MAX, by_population);
        log::debug!(
            "population phase: {} boxes after {} attempts (goal {})",
            boxes.len(),
            attempts,
            goal
        );

        let attempts = split_until(&mut boxes, target, MAX_ITERATION, by_volume);
        log::debug!(
            "volume phase: {} boxes after {} attempts (goal {})",
            boxes.len(),
            attempts,
            target
        );
        if attempts >= MAX_ITERATION && boxes.len() < target {
            log::warn!(
                "median cut stopped after {} split attempts with {} of {} boxes",
                MAX_ITERATION,
                boxes.len(),
                target
            );
        }
    }

    let mut result: Vec<ColorBox<'_>> = boxes.into_iter().map(|wb| wb.cbox).collect();
    result.sort_by(|a, b| b.population().cmp(&a.population()));
    result
}
