//! Maximal-rectangles free-space tracker for one bin.
//!
//! Free space is a list of maximal free rectangles that may overlap each
//! other; placing a rect splits every intersecting free rect into up to four
//! residual fragments and then prunes any free rect wholly contained in
//! another. Entries handed to the tracker are already padded by the pipeline.

use crate::config::{Heuristic, PackerConfig};
use crate::model::Rect;

/// A padded placement request, tied back to the input by index.
#[derive(Debug, Clone, Copy)]
pub struct Entry {
    pub index: usize,
    pub w: u32,
    pub h: u32,
    pub can_rotate: bool,
}

/// A committed placement within the current bin.
#[derive(Debug, Clone, Copy)]
pub struct Placement {
    pub index: usize,
    pub rect: Rect,
    pub rotated: bool,
}

/// Outcome of packing one bin: what was placed, what never fit, and the
/// occupied extent plus occupancy for the candidate bin size.
#[derive(Debug, Clone)]
pub struct BinPage {
    pub placements: Vec<Placement>,
    pub remaining: Vec<Entry>,
    pub width: u32,
    pub height: u32,
    pub occupancy: f64,
}

/// Transient scoring result for one candidate placement. Scores never live
/// on a persistent type; lower always wins at comparison sites.
#[derive(Debug, Clone, Copy)]
struct Candidate {
    rect: Rect,
    rotated: bool,
    score1: i32,
    score2: i32,
}

pub struct MaxRects {
    bin_width: u32,
    bin_height: u32,
    padding_x: u32,
    padding_y: u32,
    allow_rotation: bool,
    used: Vec<Placement>,
    free: Vec<Rect>,
}

impl MaxRects {
    pub fn new(cfg: &PackerConfig) -> Self {
        Self {
            bin_width: 0,
            bin_height: 0,
            padding_x: cfg.padding_x,
            padding_y: cfg.padding_y,
            allow_rotation: cfg.allow_rotation,
            used: Vec::new(),
            free: Vec::new(),
        }
    }

    /// Resets the tracker to a single full-bin free rectangle.
    pub fn init(&mut self, width: u32, height: u32) {
        self.bin_width = width;
        self.bin_height = height;
        self.used.clear();
        self.free.clear();
        self.free.push(Rect::new(0, 0, width, height));
    }

    /// Current free list, for invariant checks.
    pub fn free_rects(&self) -> &[Rect] {
        &self.free
    }

    /// Scores and commits a single entry under the given heuristic.
    /// Returns `None` when no free rect fits it in any allowed orientation.
    /// Placement order is decided by the caller (the fast packing path).
    pub fn insert(&mut self, entry: &Entry, heuristic: Heuristic) -> Option<Placement> {
        let cand = self.score_entry(entry, heuristic)?;
        Some(self.place(entry.index, cand))
    }

    /// Exhaustive variant: repeatedly scores all remaining entries, commits
    /// the globally best candidate, and repeats until nothing fits. O(n²)
    /// per heuristic, but packs tighter than the single-pass insert loop.
    pub fn pack(&mut self, entries: Vec<Entry>, heuristic: Heuristic) -> BinPage {
        let mut remaining = entries;
        loop {
            let mut best: Option<(usize, Candidate)> = None;
            for (i, entry) in remaining.iter().enumerate() {
                if let Some(cand) = self.score_entry(entry, heuristic) {
                    let better = match &best {
                        None => true,
                        Some((_, b)) => {
                            cand.score1 < b.score1
                                || (cand.score1 == b.score1 && cand.score2 < b.score2)
                        }
                    };
                    if better {
                        best = Some((i, cand));
                    }
                }
            }
            match best {
                Some((i, cand)) => {
                    let entry = remaining.remove(i);
                    self.place(entry.index, cand);
                }
                None => break,
            }
        }
        let mut page = self.result();
        page.remaining = remaining;
        page
    }

    /// Occupied extent and occupancy of the current bin state.
    pub fn result(&self) -> BinPage {
        let mut width = 0u32;
        let mut height = 0u32;
        let mut used_area = 0u64;
        for p in &self.used {
            width = width.max(p.rect.max_x());
            height = height.max(p.rect.max_y());
            used_area += p.rect.area();
        }
        let bin_area = (self.bin_width as u64) * (self.bin_height as u64);
        let occupancy = if bin_area > 0 {
            used_area as f64 / bin_area as f64
        } else {
            0.0
        };
        BinPage {
            placements: self.used.clone(),
            remaining: Vec::new(),
            width,
            height,
            occupancy,
        }
    }

    fn score_entry(&self, entry: &Entry, heuristic: Heuristic) -> Option<Candidate> {
        let w = entry.w;
        let h = entry.h;
        // Rotation swaps the content dimensions but keeps per-axis padding.
        let rotated_w = entry.h + self.padding_x - self.padding_y;
        let rotated_h = entry.w + self.padding_y - self.padding_x;
        let rotate = self.allow_rotation && entry.can_rotate;

        let mut best: Option<Candidate> = None;
        for fr in &self.free {
            if fr.w >= w && fr.h >= h {
                let (score1, score2) = self.score_at(fr, w, h, heuristic);
                Self::consider(
                    &mut best,
                    Candidate {
                        rect: Rect::new(fr.x, fr.y, w, h),
                        rotated: false,
                        score1,
                        score2,
                    },
                );
            }
            if rotate && fr.w >= rotated_w && fr.h >= rotated_h {
                let (score1, score2) = self.score_at(fr, rotated_w, rotated_h, heuristic);
                Self::consider(
                    &mut best,
                    Candidate {
                        rect: Rect::new(fr.x, fr.y, rotated_w, rotated_h),
                        rotated: true,
                        score1,
                        score2,
                    },
                );
            }
        }
        best
    }

    /// Strictly-better comparisons only; the earliest candidate wins ties,
    /// which keeps runs deterministic.
    fn consider(best: &mut Option<Candidate>, cand: Candidate) {
        let better = match best {
            None => true,
            Some(b) => {
                cand.score1 < b.score1 || (cand.score1 == b.score1 && cand.score2 < b.score2)
            }
        };
        if better {
            *best = Some(cand);
        }
    }

    fn score_at(&self, fr: &Rect, w: u32, h: u32, heuristic: Heuristic) -> (i32, i32) {
        let leftover_h = (fr.w - w) as i32;
        let leftover_v = (fr.h - h) as i32;
        let short_fit = leftover_h.min(leftover_v);
        let long_fit = leftover_h.max(leftover_v);
        match heuristic {
            Heuristic::BestShortSideFit => (short_fit, long_fit),
            Heuristic::BestLongSideFit => (long_fit, short_fit),
            Heuristic::BestAreaFit => {
                let area_fit = (fr.w * fr.h) as i32 - (w * h) as i32;
                (area_fit, short_fit)
            }
            Heuristic::BottomLeft => ((fr.y + h) as i32, fr.x as i32),
            Heuristic::ContactPoint => {
                // Contact point maximizes shared edge length; negate so the
                // unified lower-wins comparison applies. Deliberate
                // convention, not a defect.
                let contact = self.contact_point_score(fr.x, fr.y, w, h);
                (-(contact as i32), 0)
            }
        }
    }

    /// Shared-edge length of the candidate with the bin border and every
    /// placed slot.
    fn contact_point_score(&self, x: u32, y: u32, w: u32, h: u32) -> u32 {
        let mut score = 0u32;
        if x == 0 || x + w == self.bin_width {
            score += h;
        }
        if y == 0 || y + h == self.bin_height {
            score += w;
        }
        for p in &self.used {
            let u = &p.rect;
            if u.x == x + w || u.max_x() == x {
                score += overlap_1d(u.y, u.max_y(), y, y + h);
            }
            if u.y == y + h || u.max_y() == y {
                score += overlap_1d(u.x, u.max_x(), x, x + w);
            }
        }
        score
    }

    fn place(&mut self, index: usize, cand: Candidate) -> Placement {
        let node = cand.rect;
        let mut fragments: Vec<Rect> = Vec::new();
        let mut i = 0;
        while i < self.free.len() {
            if self.free[i].intersects(&node) {
                let fr = self.free.swap_remove(i);
                split_free_node(fr, &node, &mut fragments);
            } else {
                i += 1;
            }
        }
        self.free.extend(fragments);
        self.prune_free_list();
        let placement = Placement {
            index,
            rect: node,
            rotated: cand.rotated,
        };
        self.used.push(placement);
        placement
    }

    /// Removes every free rect wholly contained in another. Must run after
    /// every placement or the free list grows unboundedly.
    fn prune_free_list(&mut self) {
        let mut i = 0;
        while i < self.free.len() {
            let mut removed_i = false;
            let mut j = i + 1;
            while j < self.free.len() {
                let a = self.free[i];
                let b = self.free[j];
                if b.contains(&a) {
                    self.free.swap_remove(i);
                    removed_i = true;
                    break;
                }
                if a.contains(&b) {
                    self.free.swap_remove(j);
                    continue;
                }
                j += 1;
            }
            if !removed_i {
                i += 1;
            }
        }
    }
}

/// Standard maximal-rectangles split: top/bottom fragments span the free
/// rect's full width, left/right fragments its full height. Fragments may
/// overlap each other; pruning removes contained duplicates afterwards.
fn split_free_node(fr: Rect, node: &Rect, out: &mut Vec<Rect>) {
    // top
    if node.y > fr.y {
        out.push(Rect::new(fr.x, fr.y, fr.w, node.y - fr.y));
    }
    // bottom
    if node.max_y() < fr.max_y() {
        out.push(Rect::new(fr.x, node.max_y(), fr.w, fr.max_y() - node.max_y()));
    }
    // left
    if node.x > fr.x {
        out.push(Rect::new(fr.x, fr.y, node.x - fr.x, fr.h));
    }
    // right
    if node.max_x() < fr.max_x() {
        out.push(Rect::new(node.max_x(), fr.y, fr.max_x() - node.max_x(), fr.h));
    }
}

fn overlap_1d(a1: u32, a2: u32, b1: u32, b2: u32) -> u32 {
    a2.min(b2).saturating_sub(a1.max(b1))
}
