//! Binpack is a small library for packing rectangles into a bin using the
//! MaxRects algorithm. It was built for fontpack, a content pipeline tool that
//! packs font glyphs and sprites into texture atlases.
//!
//! The bin keeps a list of maximal free rectangles. Every placement is scored
//! against that list with a selectable [`Heuristic`][Heuristic], and bins can
//! optionally grow when they run out of room.
//!
//! ## Example
//! ```
//! use binpack::{GrowRule, Heuristic, MaxRectsBin};
//!
//! // Start with a 64x64 bin that doubles its width or height, alternating,
//! // whenever something doesn't fit.
//! let mut bin = MaxRectsBin::new(64, 64, GrowRule::Both, -2, false);
//! bin.set_padding(1, 1);
//!
//! // Place a batch of rectangles. The results line up with the input.
//! let sizes = [(48, 48), (32, 16), (16, 32), (100, 10)];
//! let placed = bin.insert_all(&sizes, Heuristic::BestShortSideFit)?;
//!
//! assert_eq!(placed.len(), sizes.len());
//! assert!(bin.bin_width() >= 102);
//! # Ok::<(), binpack::PackError>(())
//! ```
//!
//! [Heuristic]: enum.Heuristic.html

mod error;
mod geometry;
mod packer;
mod types;

pub use error::*;
pub use geometry::*;
pub use packer::*;
pub use types::*;
