//! Rectangle bin packing for sprite atlases.
//!
//! - Algorithm: maximal-rectangles free-space tracking with five placement
//!   heuristics (BSSF/BLSF/BAF/BL/CP)
//! - Pipeline: `pack_rects` takes named sizes and returns pages; the bin
//!   size per page is found by a binary search, and leftovers carry over to
//!   the next page
//! - Data model is serde-serializable; the CLI crate handles file I/O.
//!
//! Quick example:
//! ```
//! use atlas_packer_core::{pack_rects, InputRect, PackerConfig};
//! # fn main() -> atlas_packer_core::Result<()> {
//! let inputs = vec![
//!     InputRect::new("hero", 64, 48),
//!     InputRect::new("tile", 32, 32),
//! ];
//! let cfg = PackerConfig::default();
//! let pages = pack_rects(inputs, cfg)?;
//! println!("pages: {}", pages.len());
//! # Ok(()) }
//! ```

pub mod config;
pub mod error;
pub mod maxrects;
pub mod model;
pub mod pipeline;
pub mod search;

pub use config::*;
pub use error::*;
pub use model::*;
pub use pipeline::*;

/// Convenience prelude for common types and functions.
/// Importing `atlas_packer_core::prelude::*` brings the primary APIs into scope.
pub mod prelude {
    pub use crate::config::{Heuristic, PackerConfig, PackerConfigBuilder};
    pub use crate::error::{AtlasPackerError, Result};
    pub use crate::model::{Frame, InputRect, PackStats, Page, Rect};
    pub use crate::pipeline::{PackProgress, pack_rects, pack_rects_with_progress};
}
