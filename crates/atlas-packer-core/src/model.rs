use serde::{Deserialize, Serialize};

/// Axis-aligned rectangle (pixels). `x,y` is top-left; `w,h` are sizes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rect {
    pub x: u32,
    pub y: u32,
    pub w: u32,
    pub h: u32,
}

impl Rect {
    pub fn new(x: u32, y: u32, w: u32, h: u32) -> Self {
        Self { x, y, w, h }
    }
    /// Exclusive right edge coordinate (`x + w`).
    pub fn max_x(&self) -> u32 {
        self.x + self.w
    }
    /// Exclusive bottom edge coordinate (`y + h`).
    pub fn max_y(&self) -> u32 {
        self.y + self.h
    }
    pub fn area(&self) -> u64 {
        (self.w as u64) * (self.h as u64)
    }
    /// Returns true if `r` is fully inside `self`.
    pub fn contains(&self, r: &Rect) -> bool {
        r.x >= self.x && r.y >= self.y && r.max_x() <= self.max_x() && r.max_y() <= self.max_y()
    }
    /// Returns true if `self` and `r` overlap (shared edges do not count).
    pub fn intersects(&self, r: &Rect) -> bool {
        !(self.x >= r.max_x() || r.x >= self.max_x() || self.y >= r.max_y() || r.y >= self.max_y())
    }
}

/// A placement request: a named size, not yet positioned.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InputRect {
    /// User-specified key (e.g., filename or asset path). Carried through
    /// unchanged so results can be correlated back to the input.
    pub key: String,
    pub w: u32,
    pub h: u32,
    /// Per-rect rotation permission; only matters when the global
    /// `PackerConfig::allow_rotation` is also set.
    #[serde(default = "default_allow_rotation")]
    pub allow_rotation: bool,
}

fn default_allow_rotation() -> bool {
    true
}

impl InputRect {
    pub fn new(key: impl Into<String>, w: u32, h: u32) -> Self {
        Self {
            key: key.into(),
            w,
            h,
            allow_rotation: true,
        }
    }
    pub fn with_rotation(mut self, allow: bool) -> Self {
        self.allow_rotation = allow;
        self
    }
}

/// A placed frame within a page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Frame {
    /// Key of the input rect this frame was placed for.
    pub key: String,
    /// Placed rectangle within the page (post-rotation width/height).
    pub frame: Rect,
    /// True if the frame was rotated 90° when placed.
    pub rotated: bool,
}

/// A single packed page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    pub id: usize,
    pub width: u32,
    pub height: u32,
    /// Used-area / candidate-bin-area for the bin size chosen during the
    /// search, in `[0,1]`. Not recomputed for the final trimmed page size.
    pub occupancy: f64,
    /// Placed frames, ordered by key.
    pub frames: Vec<Frame>,
}

/// Statistics about packing efficiency across a whole run.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct PackStats {
    /// Total number of pages.
    pub num_pages: usize,
    /// Total number of frames packed.
    pub num_frames: usize,
    /// Sum of width * height over all pages.
    pub total_page_area: u64,
    /// Sum of frame width * height over all frames.
    pub used_frame_area: u64,
    /// used_frame_area / total_page_area (0.0 to 1.0). Higher is better.
    pub occupancy: f64,
    /// Largest page dimensions.
    pub max_page_width: u32,
    pub max_page_height: u32,
    /// Number of rotated frames.
    pub num_rotated: usize,
}

impl PackStats {
    /// Computes statistics for a sequence of packed pages.
    pub fn from_pages(pages: &[Page]) -> PackStats {
        let mut num_frames = 0;
        let mut total_page_area = 0u64;
        let mut used_frame_area = 0u64;
        let mut max_page_width = 0u32;
        let mut max_page_height = 0u32;
        let mut num_rotated = 0;

        for page in pages {
            total_page_area += (page.width as u64) * (page.height as u64);
            max_page_width = max_page_width.max(page.width);
            max_page_height = max_page_height.max(page.height);
            for frame in &page.frames {
                num_frames += 1;
                used_frame_area += frame.frame.area();
                if frame.rotated {
                    num_rotated += 1;
                }
            }
        }

        let occupancy = if total_page_area > 0 {
            used_frame_area as f64 / total_page_area as f64
        } else {
            0.0
        };

        PackStats {
            num_pages: pages.len(),
            num_frames,
            total_page_area,
            used_frame_area,
            occupancy,
            max_page_width,
            max_page_height,
            num_rotated,
        }
    }

    /// Returns a human-readable summary of the statistics.
    pub fn summary(&self) -> String {
        format!(
            "Pages: {}, Frames: {}, Occupancy: {:.2}%, Total Area: {} px², Used Area: {} px², Rotated: {}",
            self.num_pages,
            self.num_frames,
            self.occupancy * 100.0,
            self.total_page_area,
            self.used_frame_area,
            self.num_rotated,
        )
    }

    /// Returns wasted space in pixels.
    pub fn wasted_area(&self) -> u64 {
        self.total_page_area.saturating_sub(self.used_frame_area)
    }

    /// Returns wasted space as a percentage (0.0 to 100.0).
    pub fn waste_percentage(&self) -> f64 {
        if self.total_page_area > 0 {
            (self.wasted_area() as f64 / self.total_page_area as f64) * 100.0
        } else {
            0.0
        }
    }
}
