//! Top-level packing pipeline: padding and validation up front, then one
//! page at a time, each found by a binary search over candidate bin sizes
//! with every heuristic tried at every candidate.

use tracing::{debug, instrument};

use crate::config::{Heuristic, PackerConfig};
use crate::error::{AtlasPackerError, Result};
use crate::maxrects::{BinPage, Entry, MaxRects};
use crate::model::{Frame, InputRect, Page, Rect};
use crate::search::{BinarySearch, next_pow2, round_mod4};

#[cfg(feature = "parallel")]
use rayon::prelude::*;

/// Progress report, delivered once per completed page.
#[derive(Debug, Clone, Copy)]
pub struct PackProgress {
    /// Pages completed so far.
    pub pages: usize,
    /// Input rects placed so far, across all pages.
    pub placed: usize,
    /// Total input rects.
    pub total: usize,
}

/// Packs `inputs` into one or more pages using configuration `cfg`.
///
/// Every input appears exactly once across the returned pages. Output is
/// deterministic for identical inputs and configuration.
#[instrument(skip_all)]
pub fn pack_rects(inputs: Vec<InputRect>, cfg: PackerConfig) -> Result<Vec<Page>> {
    pack_rects_with_progress(inputs, cfg, |_| true)
}

/// Like [`pack_rects`], with a progress callback invoked once per completed
/// page. Returning `false` stops packing cooperatively between pages; the
/// pages built so far are returned.
#[instrument(skip_all)]
pub fn pack_rects_with_progress<F>(
    inputs: Vec<InputRect>,
    cfg: PackerConfig,
    mut progress: F,
) -> Result<Vec<Page>>
where
    F: FnMut(PackProgress) -> bool,
{
    cfg.validate()?;
    if inputs.is_empty() {
        return Err(AtlasPackerError::Empty);
    }

    // Apply padding to every rect exactly once up front. Entries keep an
    // index into `inputs` so identity survives the whole run.
    let mut entries: Vec<Entry> = inputs
        .iter()
        .enumerate()
        .map(|(index, r)| Entry {
            index,
            w: r.w + cfg.padding_x,
            h: r.h + cfg.padding_y,
            can_rotate: r.allow_rotation,
        })
        .collect();

    validate_sizes(&inputs, &entries, &cfg)?;

    if cfg.fast {
        // First-fit insertion is order dependent; sort so big rects go
        // early. Stable key tie-break keeps runs deterministic.
        if cfg.allow_rotation {
            entries.sort_by(|a, b| {
                b.w.max(b.h)
                    .cmp(&a.w.max(a.h))
                    .then_with(|| inputs[a.index].key.cmp(&inputs[b.index].key))
            });
        } else {
            entries.sort_by(|a, b| {
                b.w.cmp(&a.w)
                    .then_with(|| inputs[a.index].key.cmp(&inputs[b.index].key))
            });
        }
    }

    let total = entries.len();
    let mut placed = 0usize;
    let mut pages: Vec<Page> = Vec::new();
    while !entries.is_empty() {
        let mut bin = pack_page(&cfg, entries)?;
        placed += bin.placements.len();
        entries = std::mem::take(&mut bin.remaining);
        let page = finish_page(&cfg, &inputs, pages.len(), bin);
        debug!(
            page = page.id,
            width = page.width,
            height = page.height,
            frames = page.frames.len(),
            remaining = entries.len(),
            occupancy = page.occupancy,
            "packed page"
        );
        pages.push(page);
        if !progress(PackProgress {
            pages: pages.len(),
            placed,
            total,
        }) {
            debug!("packing stopped by progress callback");
            break;
        }
    }
    Ok(pages)
}

/// Max dimensions actually available to content once edge padding is
/// reserved.
fn effective_max(cfg: &PackerConfig) -> (u32, u32) {
    if cfg.edge_padding {
        if cfg.duplicate_padding {
            // Edges get only half padding on each side.
            (
                cfg.max_width.saturating_sub(cfg.padding_x),
                cfg.max_height.saturating_sub(cfg.padding_y),
            )
        } else {
            (
                cfg.max_width.saturating_sub(cfg.padding_x * 2),
                cfg.max_height.saturating_sub(cfg.padding_y * 2),
            )
        }
    } else {
        (cfg.max_width, cfg.max_height)
    }
}

/// Rejects any rect that cannot fit a maximal page in any orientation it is
/// allowed to take. Fatal: aborts the run before any placement attempt.
fn validate_sizes(inputs: &[InputRect], entries: &[Entry], cfg: &PackerConfig) -> Result<()> {
    let (max_w, max_h) = effective_max(cfg);
    for entry in entries {
        let w = entry.w - cfg.padding_x;
        let h = entry.h - cfg.padding_y;
        let rotate = cfg.allow_rotation && entry.can_rotate;
        let too_large = if rotate {
            (w > max_w || h > max_h) && (w > max_h || h > max_w)
        } else {
            w > max_w || h > max_h
        };
        if too_large {
            return Err(AtlasPackerError::RectTooLarge {
                name: inputs[entry.index].key.clone(),
                width: w,
                height: h,
                max_width: cfg.max_width,
                max_height: cfg.max_height,
            });
        }
    }
    Ok(())
}

/// Candidate bins are inflated by the per-axis padding (rects carry
/// trailing padding), reduced by the edge-padding reservation.
fn bin_adjust(cfg: &PackerConfig) -> (i64, i64) {
    if cfg.edge_padding {
        if cfg.duplicate_padding {
            (0, 0)
        } else {
            (-(cfg.padding_x as i64), -(cfg.padding_y as i64))
        }
    } else {
        (cfg.padding_x as i64, cfg.padding_y as i64)
    }
}

fn adjusted(size: u32, adjust: i64) -> u32 {
    (size as i64 + adjust).max(0) as u32
}

/// Packs one page from `entries`: searches candidate bin sizes for the
/// smallest bin holding everything, or falls back to a maximal page that
/// carries leftovers to the next iteration.
fn pack_page(cfg: &PackerConfig, entries: Vec<Entry>) -> Result<BinPage> {
    // Search floor from the smallest entry, clamped up to the configured
    // minimums.
    let mut min_w_floor = u32::MAX;
    let mut min_h_floor = u32::MAX;
    for e in &entries {
        min_w_floor = min_w_floor.min(e.w - cfg.padding_x);
        min_h_floor = min_h_floor.min(e.h - cfg.padding_y);
    }
    let min_w_floor = min_w_floor.max(cfg.min_width);
    let min_h_floor = min_h_floor.max(cfg.min_height);

    let (adjust_x, adjust_y) = bin_adjust(cfg);
    let fuzziness = if cfg.fast { 25 } else { 15 };

    let best = if cfg.square {
        let min_size = min_w_floor.max(min_h_floor);
        let max_size = cfg.max_width.min(cfg.max_height);
        let mut search = BinarySearch::new(min_size, max_size, fuzziness, cfg.pot, cfg.multiple_of_four);
        let mut best: Option<BinPage> = None;
        let mut size = Some(search.reset());
        while let Some(s) = size {
            let result = pack_at_size(cfg, true, adjusted(s, adjust_x), adjusted(s, adjust_y), &entries);
            let fits = result.is_some();
            best = keep_best(best, result);
            size = search.next(fits);
        }
        match best {
            Some(b) => Some(b),
            None => pack_at_size(
                cfg,
                false,
                adjusted(max_size, adjust_x),
                adjusted(max_size, adjust_y),
                &entries,
            ),
        }
    } else {
        // Nested search: outer over height, the inner width search fully
        // re-run per outer candidate.
        let mut width_search =
            BinarySearch::new(min_w_floor, cfg.max_width, fuzziness, cfg.pot, cfg.multiple_of_four);
        let mut height_search =
            BinarySearch::new(min_h_floor, cfg.max_height, fuzziness, cfg.pot, cfg.multiple_of_four);
        let mut best: Option<BinPage> = None;
        let mut height = Some(height_search.reset());
        while let Some(h) = height {
            let mut best_width: Option<BinPage> = None;
            let mut width = Some(width_search.reset());
            while let Some(w) = width {
                let result =
                    pack_at_size(cfg, true, adjusted(w, adjust_x), adjusted(h, adjust_y), &entries);
                let fits = result.is_some();
                best_width = keep_best(best_width, result);
                width = width_search.next(fits);
            }
            let row_fits = best_width.is_some();
            best = keep_best(best, best_width);
            height = height_search.next(row_fits);
        }
        match best {
            Some(b) => Some(b),
            None => pack_at_size(
                cfg,
                false,
                adjusted(cfg.max_width, adjust_x),
                adjusted(cfg.max_height, adjust_y),
                &entries,
            ),
        }
    };

    // Size validation guarantees the maximal fallback page places at least
    // one rect; anything else is a configuration pathology.
    best.ok_or_else(|| {
        AtlasPackerError::InvalidConfig(
            "no rect could be placed on a maximal page; check padding against max page size".into(),
        )
    })
}

/// Tries every heuristic at one candidate bin size and keeps the
/// highest-occupancy result. With `fully` set, results leaving entries
/// behind are discarded; a result placing nothing never counts.
fn pack_at_size(
    cfg: &PackerConfig,
    fully: bool,
    bin_w: u32,
    bin_h: u32,
    entries: &[Entry],
) -> Option<BinPage> {
    #[cfg(feature = "parallel")]
    let results: Vec<BinPage> = Heuristic::ALL
        .par_iter()
        .map(|&heuristic| run_heuristic(cfg, heuristic, bin_w, bin_h, entries))
        .collect();
    #[cfg(not(feature = "parallel"))]
    let results: Vec<BinPage> = Heuristic::ALL
        .iter()
        .map(|&heuristic| run_heuristic(cfg, heuristic, bin_w, bin_h, entries))
        .collect();

    // Reduced in heuristic order: identical outcome serial or parallel.
    let mut best: Option<BinPage> = None;
    for result in results {
        if fully && !result.remaining.is_empty() {
            continue;
        }
        if result.placements.is_empty() {
            continue;
        }
        best = keep_best(best, Some(result));
    }
    best
}

fn run_heuristic(
    cfg: &PackerConfig,
    heuristic: Heuristic,
    bin_w: u32,
    bin_h: u32,
    entries: &[Entry],
) -> BinPage {
    let mut tracker = MaxRects::new(cfg);
    tracker.init(bin_w, bin_h);
    if cfg.fast {
        // Greedy single-pass: on the first failure, the failed entry and
        // all entries after it become the remainder.
        let mut remaining: Vec<Entry> = Vec::new();
        for (i, entry) in entries.iter().enumerate() {
            if tracker.insert(entry, heuristic).is_none() {
                remaining.extend_from_slice(&entries[i..]);
                break;
            }
        }
        let mut page = tracker.result();
        page.remaining = remaining;
        page
    } else {
        tracker.pack(entries.to_vec(), heuristic)
    }
}

/// Higher occupancy wins; on a tie the incumbent (earlier candidate) stays.
fn keep_best(best: Option<BinPage>, result: Option<BinPage>) -> Option<BinPage> {
    match (best, result) {
        (None, r) => r,
        (b, None) => b,
        (Some(b), Some(r)) => {
            if r.occupancy > b.occupancy {
                Some(r)
            } else {
                Some(b)
            }
        }
    }
}

/// Turns a bin result into the final page artifact: trims trailing padding,
/// applies edge-padding offsets, quantizes, clamps to the minimums, and
/// sorts frames by key.
fn finish_page(cfg: &PackerConfig, inputs: &[InputRect], id: usize, bin: BinPage) -> Page {
    let mut width = bin.width.saturating_sub(cfg.padding_x);
    let mut height = bin.height.saturating_sub(cfg.padding_y);
    if cfg.square {
        let size = width.max(height);
        width = size;
        height = size;
    }

    let (shift_x, shift_y) = if cfg.edge_padding {
        if cfg.duplicate_padding {
            (cfg.padding_x / 2, cfg.padding_y / 2)
        } else {
            (cfg.padding_x, cfg.padding_y)
        }
    } else {
        (0, 0)
    };
    width += shift_x * 2;
    height += shift_y * 2;

    if cfg.pot {
        width = next_pow2(width.max(1));
        height = next_pow2(height.max(1));
    }
    if cfg.multiple_of_four {
        width = round_mod4(width);
        height = round_mod4(height);
    }
    width = width.max(cfg.min_width);
    height = height.max(cfg.min_height);

    let mut frames: Vec<Frame> = bin
        .placements
        .iter()
        .map(|p| {
            let input = &inputs[p.index];
            // Frames report post-rotation content sizes; padding is never
            // part of a reported frame.
            let (w, h) = if p.rotated {
                (input.h, input.w)
            } else {
                (input.w, input.h)
            };
            Frame {
                key: input.key.clone(),
                frame: Rect::new(p.rect.x + shift_x, p.rect.y + shift_y, w, h),
                rotated: p.rotated,
            }
        })
        .collect();
    frames.sort_by(|a, b| a.key.cmp(&b.key));

    Page {
        id,
        width,
        height,
        occupancy: bin.occupancy,
        frames,
    }
}
