//! Arranges a fixed set of glyphs into a single atlas image.
//!
//! Unlike the bins in `binpack`, this never rotates or grows anything: the
//! output width is guessed up front, glyphs are placed greedily from tallest to
//! shortest, and the height is whatever the placements end up needing.

use std::{cmp::Ordering, sync::Arc};

use binpack::Rectangle;

use crate::{glyph::Glyph, image::Image};

/// Every glyph is surrounded by this many transparent pixels so that texture
/// filtering never samples a neighbor.
const BORDER: u32 = 1;

/// Texture compression works on 4x4 blocks.
const BLOCK_SIZE: u32 = 4;

/// Glyphs are sorted by `height * HEIGHT_WEIGHT + width`.
const HEIGHT_WEIGHT: u32 = 1024;

/// A glyph waiting to be placed, along with the box it will take up including
/// its border.
#[derive(Debug)]
struct ArrangedGlyph {
    index: usize,
    character: char,
    x: u32,
    y: u32,
    width: u32,
    height: u32,
}

impl ArrangedGlyph {
    fn size_key(&self) -> u32 {
        self.height * HEIGHT_WEIGHT + self.width
    }

    fn overlaps(&self, x: u32, y: u32, width: u32, height: u32) -> bool {
        self.x < x + width
            && x < self.x + self.width
            && self.y < y + height
            && y < self.y + self.height
    }
}

/// Largest glyphs first, then by character so the result is reproducible.
fn compare_glyph_sizes(a: &ArrangedGlyph, b: &ArrangedGlyph) -> Ordering {
    b.size_key()
        .cmp(&a.size_key())
        .then_with(|| a.character.cmp(&b.character))
}

/// Copies every glyph into one new image and points the glyphs at it.
///
/// Each glyph's `bitmap` is replaced with the returned atlas, and its
/// `subrect` with the glyph's location inside the atlas.
pub fn arrange_glyphs(
    glyphs: &mut [Glyph],
    require_power_of_two: bool,
    require_square: bool,
) -> Arc<Image> {
    let mut arranged: Vec<ArrangedGlyph> = glyphs
        .iter()
        .enumerate()
        .map(|(index, glyph)| ArrangedGlyph {
            index,
            character: glyph.character,
            x: 0,
            y: 0,
            width: glyph.width() + BORDER * 2,
            height: glyph.height() + BORDER * 2,
        })
        .collect();

    arranged.sort_by(compare_glyph_sizes);

    let mut output_width = guess_output_width(&arranged);
    let mut output_height = 0;

    for index in 0..arranged.len() {
        position_glyph(&mut arranged, index, output_width);

        let glyph = &arranged[index];
        output_height = output_height.max(glyph.y + glyph.height);
    }

    output_height = make_valid_texture_size(output_height, require_power_of_two);

    if require_square {
        output_height = output_height.max(output_width);
        output_width = output_height;
    }

    log::debug!(
        "Arranged {} glyphs into a {}x{} atlas",
        arranged.len(),
        output_width,
        output_height
    );

    copy_glyphs_to_output(glyphs, &arranged, (output_width, output_height))
}

/// Slides the glyph at `index` right past anything it collides with,
/// dropping down a line whenever it runs off the right edge.
fn position_glyph(arranged: &mut [ArrangedGlyph], index: usize, output_width: u32) {
    let (placed, rest) = arranged.split_at_mut(index);
    let glyph = &mut rest[0];

    let mut x = 0;
    let mut y = 0;

    loop {
        let collision = placed
            .iter()
            .find(|other| other.overlaps(x, y, glyph.width, glyph.height));

        match collision {
            None => {
                glyph.x = x;
                glyph.y = y;
                return;
            }
            Some(other) => {
                x = other.x + other.width;

                if x + glyph.width > output_width {
                    x = 0;
                    y += 1;
                }
            }
        }
    }
}

/// Picks a width that would make a roughly square atlas, wide enough for the
/// widest glyph.
fn guess_output_width(arranged: &[ArrangedGlyph]) -> u32 {
    let max_width = arranged.iter().map(|glyph| glyph.width).max().unwrap_or(0);
    let total_area: u64 = arranged
        .iter()
        .map(|glyph| u64::from(glyph.width) * u64::from(glyph.height))
        .sum();

    let width = ((total_area as f64).sqrt() as u32).max(max_width);

    make_valid_texture_size(width, true)
}

/// Rounds `value` up to a size textures can have: a power of two no smaller
/// than the block size, or else a multiple of the block size.
pub fn make_valid_texture_size(value: u32, require_power_of_two: bool) -> u32 {
    if require_power_of_two {
        value.max(BLOCK_SIZE).next_power_of_two()
    } else {
        (value + BLOCK_SIZE - 1) / BLOCK_SIZE * BLOCK_SIZE
    }
}

fn copy_glyphs_to_output(
    glyphs: &mut [Glyph],
    arranged: &[ArrangedGlyph],
    size: (u32, u32),
) -> Arc<Image> {
    let mut output = Image::new_empty_rgba8(size);
    let mut destinations = vec![Rectangle::default(); glyphs.len()];

    for placement in arranged {
        let glyph = &glyphs[placement.index];
        let destination = Rectangle::new(
            placement.x + BORDER,
            placement.y + BORDER,
            glyph.width(),
            glyph.height(),
        );

        output.blit(&glyph.bitmap, glyph.subrect, destination.position());
        destinations[placement.index] = destination;
    }

    let output = Arc::new(output);

    for (glyph, destination) in glyphs.iter_mut().zip(destinations) {
        glyph.bitmap = Arc::clone(&output);
        glyph.subrect = destination;
    }

    output
}

#[cfg(test)]
mod test {
    use super::*;

    use crate::image::Pixel;

    fn solid_glyph(character: char, size: (u32, u32)) -> Glyph {
        let mut bitmap = Image::new_empty_rgba8(size);

        for y in 0..size.1 {
            for x in 0..size.0 {
                bitmap.set_pixel((x, y), Pixel::new(255, 255, 255, character as u8));
            }
        }

        Glyph::new(character, Arc::new(bitmap))
    }

    fn placements(glyphs: &[Glyph]) -> Vec<Rectangle> {
        glyphs.iter().map(|glyph| glyph.subrect).collect()
    }

    #[test]
    fn texture_sizes() {
        assert_eq!(make_valid_texture_size(0, true), 4);
        assert_eq!(make_valid_texture_size(3, true), 4);
        assert_eq!(make_valid_texture_size(5, true), 8);
        assert_eq!(make_valid_texture_size(64, true), 64);
        assert_eq!(make_valid_texture_size(65, true), 128);

        assert_eq!(make_valid_texture_size(0, false), 0);
        assert_eq!(make_valid_texture_size(1, false), 4);
        assert_eq!(make_valid_texture_size(8, false), 8);
        assert_eq!(make_valid_texture_size(9, false), 12);
    }

    #[test]
    fn sorts_tallest_first_then_by_character() {
        let glyph = |character, width, height| ArrangedGlyph {
            index: 0,
            character,
            x: 0,
            y: 0,
            width,
            height,
        };

        let mut arranged = vec![
            glyph('b', 10, 10),
            glyph('c', 30, 5),
            glyph('a', 10, 10),
            glyph('d', 11, 10),
        ];
        arranged.sort_by(compare_glyph_sizes);

        let order: String = arranged.iter().map(|glyph| glyph.character).collect();
        assert_eq!(order, "dabc");
    }

    #[test]
    fn arranges_mixed_sizes() {
        let mut glyphs = vec![
            solid_glyph('a', (8, 8)),
            solid_glyph('b', (8, 8)),
            solid_glyph('c', (16, 16)),
            solid_glyph('d', (4, 4)),
        ];

        let atlas = arrange_glyphs(&mut glyphs, true, false);

        assert_eq!(atlas.size(), (32, 32));
        assert_eq!(
            placements(&glyphs),
            vec![
                Rectangle::new(19, 1, 8, 8),
                Rectangle::new(19, 11, 8, 8),
                Rectangle::new(1, 1, 16, 16),
                Rectangle::new(1, 19, 4, 4),
            ]
        );
    }

    #[test]
    fn glyphs_keep_a_border() {
        let mut glyphs = vec![
            solid_glyph('a', (8, 8)),
            solid_glyph('b', (8, 8)),
            solid_glyph('c', (16, 16)),
            solid_glyph('d', (4, 4)),
        ];

        let atlas = arrange_glyphs(&mut glyphs, true, false);
        let (width, height) = atlas.size();

        assert!(width.is_power_of_two() && width >= 4);
        assert!(height.is_power_of_two() && height >= 4);

        for (i, glyph) in glyphs.iter().enumerate() {
            assert!(Arc::ptr_eq(&glyph.bitmap, &atlas));
            assert!(atlas.bounds().contains(&glyph.subrect));

            let rect = glyph.subrect;
            let with_border =
                Rectangle::new(rect.x - 1, rect.y - 1, rect.width + 2, rect.height + 2);

            for other in &glyphs[i + 1..] {
                assert!(!with_border.intersects(&other.subrect));
            }
        }
    }

    #[test]
    fn copies_pixels_into_atlas() {
        let mut glyphs = vec![solid_glyph('A', (3, 5)), solid_glyph('B', (2, 2))];

        let atlas = arrange_glyphs(&mut glyphs, false, false);

        for glyph in &glyphs {
            let rect = glyph.subrect;
            assert!(atlas.is_alpha_entirely(glyph.character as u8, rect));

            // The border row above each glyph is left transparent.
            let border_above = Rectangle::new(rect.x, rect.y - 1, rect.width, 1);
            assert!(atlas.is_alpha_entirely(0, border_above));
        }
    }

    #[test]
    fn square_output() {
        let mut glyphs: Vec<_> = "abcdefgh"
            .chars()
            .map(|character| solid_glyph(character, (30, 6)))
            .collect();

        let atlas = arrange_glyphs(&mut glyphs, true, true);
        let (width, height) = atlas.size();

        assert_eq!(width, height);
        assert!(width.is_power_of_two());
    }

    #[test]
    fn arrangement_is_deterministic() {
        let make = || -> Vec<Glyph> {
            "qwertyuiopasdfghjkl"
                .chars()
                .enumerate()
                .map(|(i, character)| {
                    let i = i as u32;
                    solid_glyph(character, (3 + i * 7 % 11, 4 + i * 5 % 9))
                })
                .collect()
        };

        let mut first = make();
        let mut second = make();
        second.reverse();

        let first_atlas = arrange_glyphs(&mut first, false, false);
        let second_atlas = arrange_glyphs(&mut second, false, false);
        second.reverse();

        assert_eq!(first_atlas.size(), second_atlas.size());
        assert_eq!(placements(&first), placements(&second));
    }

    #[test]
    fn no_glyphs() {
        let atlas = arrange_glyphs(&mut [], true, false);

        assert_eq!(atlas.size(), (4, 4));
    }

    #[test]
    fn widest_glyph_always_fits() {
        let mut glyphs = vec![solid_glyph('x', (16, 16))];

        let atlas = arrange_glyphs(&mut glyphs, true, false);

        assert_eq!(atlas.size(), (32, 32));
        assert_eq!(glyphs[0].subrect, Rectangle::new(1, 1, 16, 16));
    }
}
