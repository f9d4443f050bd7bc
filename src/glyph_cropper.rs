use binpack::Rectangle;

use crate::glyph::Glyph;

/// Trims fully transparent rows and columns off the edges of a glyph, moving
/// its offsets so it still draws in the same place. Glyphs are never cropped
/// smaller than a single pixel.
pub fn crop_glyph(glyph: &mut Glyph) {
    let bitmap = glyph.bitmap.clone();
    let rect = &mut glyph.subrect;

    while rect.height > 1
        && bitmap.is_alpha_entirely(0, Rectangle::new(rect.x, rect.y, rect.width, 1))
    {
        rect.y += 1;
        rect.height -= 1;
        glyph.y_offset += 1.0;
    }

    while rect.height > 1
        && bitmap.is_alpha_entirely(0, Rectangle::new(rect.x, rect.bottom() - 1, rect.width, 1))
    {
        rect.height -= 1;
    }

    while rect.width > 1
        && bitmap.is_alpha_entirely(0, Rectangle::new(rect.x, rect.y, 1, rect.height))
    {
        rect.x += 1;
        rect.width -= 1;
        glyph.x_offset += 1.0;
    }

    while rect.width > 1
        && bitmap.is_alpha_entirely(0, Rectangle::new(rect.right() - 1, rect.y, 1, rect.height))
    {
        rect.width -= 1;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    use std::sync::Arc;

    use crate::image::{Image, Pixel};

    fn glyph_with_pixels(size: (u32, u32), opaque: &[(u32, u32)]) -> Glyph {
        let mut bitmap = Image::new_empty_rgba8(size);

        for &pos in opaque {
            bitmap.set_pixel(pos, Pixel::new(255, 255, 255, 255));
        }

        Glyph::new('g', Arc::new(bitmap))
    }

    #[test]
    fn crops_to_opaque_pixels() {
        let mut glyph = glyph_with_pixels((10, 12), &[(2, 3), (6, 8)]);

        crop_glyph(&mut glyph);

        assert_eq!(glyph.subrect, Rectangle::new(2, 3, 5, 6));
        assert_eq!(glyph.x_offset, 2.0);
        assert_eq!(glyph.y_offset, 3.0);

        // Advance is a property of the character, not of its pixels.
        assert_eq!(glyph.x_advance, 10.0);
    }

    #[test]
    fn fully_opaque_glyph_is_untouched() {
        let mut glyph = glyph_with_pixels((2, 2), &[(0, 0), (1, 1)]);

        crop_glyph(&mut glyph);

        assert_eq!(glyph.subrect, Rectangle::new(0, 0, 2, 2));
        assert_eq!(glyph.x_offset, 0.0);
    }

    #[test]
    fn blank_glyph_keeps_one_pixel() {
        let mut glyph = glyph_with_pixels((8, 5), &[]);

        crop_glyph(&mut glyph);

        assert_eq!(glyph.subrect, Rectangle::new(7, 4, 1, 1));
        assert_eq!(glyph.x_offset, 7.0);
        assert_eq!(glyph.y_offset, 4.0);
    }
}
