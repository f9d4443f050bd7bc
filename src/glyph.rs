use std::sync::Arc;

use binpack::Rectangle;
use serde::{Deserialize, Serialize};

use crate::image::Image;

/// The A, B and C spacing of a character: the space before the glyph, the
/// width of the glyph itself, and the space after it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WidthMetrics {
    pub a: f32,
    pub b: f32,
    pub c: f32,
}

/// A rasterized character.
///
/// The glyph's pixels are the `subrect` portion of `bitmap`. Several glyphs can
/// share one bitmap, which is what happens once they've been arranged into an
/// atlas.
#[derive(Debug, Clone)]
pub struct Glyph {
    pub character: char,
    pub bitmap: Arc<Image>,
    pub subrect: Rectangle,

    pub x_offset: f32,
    pub y_offset: f32,
    pub x_advance: f32,
    pub widths: WidthMetrics,
}

impl Glyph {
    /// Creates a glyph covering all of `bitmap`, advancing by its width.
    pub fn new(character: char, bitmap: Arc<Image>) -> Self {
        let subrect = bitmap.bounds();
        let width = subrect.width as f32;

        Self {
            character,
            bitmap,
            subrect,
            x_offset: 0.0,
            y_offset: 0.0,
            x_advance: width,
            widths: WidthMetrics {
                a: 0.0,
                b: width,
                c: 0.0,
            },
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.subrect.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.subrect.height
    }
}
