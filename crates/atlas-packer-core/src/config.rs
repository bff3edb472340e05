use serde::{Deserialize, Serialize};
use std::str::FromStr;

use crate::error::{AtlasPackerError, Result};

/// MaxRects placement heuristics.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Heuristic {
    BestShortSideFit,
    BestLongSideFit,
    BestAreaFit,
    BottomLeft,
    ContactPoint,
}

impl Heuristic {
    /// All heuristics, in the order the page packer evaluates them.
    pub const ALL: [Heuristic; 5] = [
        Heuristic::BestShortSideFit,
        Heuristic::BestLongSideFit,
        Heuristic::BestAreaFit,
        Heuristic::BottomLeft,
        Heuristic::ContactPoint,
    ];
}

impl FromStr for Heuristic {
    type Err = ();
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bssf" | "bestshortsidefit" => Ok(Self::BestShortSideFit),
            "blsf" | "bestlongsidefit" => Ok(Self::BestLongSideFit),
            "baf" | "bestareafit" => Ok(Self::BestAreaFit),
            "bl" | "bottomleft" => Ok(Self::BottomLeft),
            "cp" | "contactpoint" => Ok(Self::ContactPoint),
            _ => Err(()),
        }
    }
}

/// Packing configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PackerConfig {
    /// Minimum page width in pixels; also the floor of the bin-size search.
    pub min_width: u32,
    /// Minimum page height in pixels.
    pub min_height: u32,
    /// Maximum page width in pixels (hard bound).
    pub max_width: u32,
    /// Maximum page height in pixels (hard bound).
    pub max_height: u32,

    /// Horizontal padding between frames.
    pub padding_x: u32,
    /// Vertical padding between frames.
    pub padding_y: u32,
    /// Reserve padding along page borders.
    pub edge_padding: bool,
    /// Page edges get only half padding; the downstream writer duplicates
    /// edge pixels into the gap.
    pub duplicate_padding: bool,

    /// Allow 90° rotations for placements where beneficial.
    pub allow_rotation: bool,
    /// Force square pages.
    pub square: bool,
    /// Force page dimensions to powers of two.
    pub pot: bool,
    /// Force page dimensions to multiples of four.
    pub multiple_of_four: bool,

    /// Greedy single-pass insertion instead of exhaustive per-rect
    /// evaluation. Faster, usually looser packing.
    pub fast: bool,
}

impl Default for PackerConfig {
    fn default() -> Self {
        Self {
            min_width: 16,
            min_height: 16,
            max_width: 1024,
            max_height: 1024,
            padding_x: 2,
            padding_y: 2,
            edge_padding: true,
            duplicate_padding: false,
            allow_rotation: false,
            square: false,
            pot: true,
            multiple_of_four: false,
            fast: false,
        }
    }
}

fn is_pot(v: u32) -> bool {
    v != 0 && (v & (v - 1)) == 0
}

impl PackerConfig {
    /// Validates the configuration. Errors here are fatal and are reported
    /// before any placement attempt.
    pub fn validate(&self) -> Result<()> {
        if self.max_width == 0 || self.max_height == 0 {
            return Err(AtlasPackerError::InvalidConfig(format!(
                "max page size must be non-zero: {}x{}",
                self.max_width, self.max_height
            )));
        }
        if self.min_width > self.max_width {
            return Err(AtlasPackerError::InvalidConfig(format!(
                "min_width ({}) exceeds max_width ({})",
                self.min_width, self.max_width
            )));
        }
        if self.min_height > self.max_height {
            return Err(AtlasPackerError::InvalidConfig(format!(
                "min_height ({}) exceeds max_height ({})",
                self.min_height, self.max_height
            )));
        }
        if self.pot && self.multiple_of_four {
            return Err(AtlasPackerError::InvalidConfig(
                "pot and multiple_of_four are mutually exclusive".into(),
            ));
        }
        if self.pot && (!is_pot(self.max_width) || !is_pot(self.max_height)) {
            return Err(AtlasPackerError::InvalidConfig(format!(
                "pot requires power-of-two max page size, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        if self.multiple_of_four && (self.max_width % 4 != 0 || self.max_height % 4 != 0) {
            return Err(AtlasPackerError::InvalidConfig(format!(
                "multiple_of_four requires max page size divisible by four, got {}x{}",
                self.max_width, self.max_height
            )));
        }
        Ok(())
    }

    /// Create a fluent builder for `PackerConfig`.
    pub fn builder() -> PackerConfigBuilder {
        PackerConfigBuilder::new()
    }
}

/// Builder for `PackerConfig` for ergonomic construction.
#[derive(Debug, Default, Clone)]
pub struct PackerConfigBuilder {
    cfg: PackerConfig,
}

impl PackerConfigBuilder {
    pub fn new() -> Self {
        Self {
            cfg: PackerConfig::default(),
        }
    }
    pub fn with_min_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.min_width = w;
        self.cfg.min_height = h;
        self
    }
    pub fn with_max_dimensions(mut self, w: u32, h: u32) -> Self {
        self.cfg.max_width = w;
        self.cfg.max_height = h;
        self
    }
    pub fn padding(mut self, x: u32, y: u32) -> Self {
        self.cfg.padding_x = x;
        self.cfg.padding_y = y;
        self
    }
    pub fn edge_padding(mut self, v: bool) -> Self {
        self.cfg.edge_padding = v;
        self
    }
    pub fn duplicate_padding(mut self, v: bool) -> Self {
        self.cfg.duplicate_padding = v;
        self
    }
    pub fn allow_rotation(mut self, v: bool) -> Self {
        self.cfg.allow_rotation = v;
        self
    }
    pub fn square(mut self, v: bool) -> Self {
        self.cfg.square = v;
        self
    }
    pub fn pot(mut self, v: bool) -> Self {
        self.cfg.pot = v;
        self
    }
    pub fn multiple_of_four(mut self, v: bool) -> Self {
        self.cfg.multiple_of_four = v;
        self
    }
    pub fn fast(mut self, v: bool) -> Self {
        self.cfg.fast = v;
        self
    }
    pub fn build(self) -> PackerConfig {
        self.cfg
    }
}
