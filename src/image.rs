//! Simple containers to track images and perform operations on them.

use std::io::{Read, Write};

use binpack::Rectangle;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ImageFormat {
    Rgba8,
}

impl ImageFormat {
    fn stride(&self) -> u32 {
        match self {
            ImageFormat::Rgba8 => 4,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Pixel {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

#[derive(Debug, Error)]
pub enum ImageError {
    #[error(transparent)]
    Decode(#[from] png::DecodingError),

    #[error(transparent)]
    Encode(#[from] png::EncodingError),

    #[error("Unsupported PNG format: {color_type:?} at bit depth {bit_depth:?}")]
    UnsupportedFormat {
        color_type: png::ColorType,
        bit_depth: png::BitDepth,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Image {
    size: (u32, u32),
    data: Vec<u8>,
    format: ImageFormat,
}

impl Image {
    pub fn new_rgba8<D: Into<Vec<u8>>>(size: (u32, u32), data: D) -> Self {
        let data = data.into();
        let format = ImageFormat::Rgba8;

        assert!(data.len() == (size.0 * size.1 * format.stride()) as usize);

        Self { size, data, format }
    }

    pub fn new_empty_rgba8(size: (u32, u32)) -> Self {
        let data = vec![0; (size.0 * size.1 * ImageFormat::Rgba8.stride()) as usize];
        Self::new_rgba8(size, data)
    }

    pub fn decode_png<R: Read>(input: R) -> Result<Self, ImageError> {
        let mut decoder = png::Decoder::new(input);

        // Palettes and low bit depths are expanded to 8 bits per channel so
        // that only the channel layout is left to convert.
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);

        let (info, mut reader) = decoder.read_info()?;

        let mut buffer = vec![0; info.buffer_size()];
        reader.next_frame(&mut buffer)?;

        if info.bit_depth != png::BitDepth::Eight {
            return Err(ImageError::UnsupportedFormat {
                color_type: info.color_type,
                bit_depth: info.bit_depth,
            });
        }

        let data = match info.color_type {
            png::ColorType::RGBA => buffer,
            png::ColorType::RGB => buffer
                .chunks_exact(3)
                .flat_map(|rgb| vec![rgb[0], rgb[1], rgb[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => buffer
                .chunks_exact(2)
                .flat_map(|ga| vec![ga[0], ga[0], ga[0], ga[1]])
                .collect(),
            png::ColorType::Grayscale => buffer
                .iter()
                .flat_map(|&g| vec![g, g, g, 255])
                .collect(),
            color_type => {
                return Err(ImageError::UnsupportedFormat {
                    color_type,
                    bit_depth: info.bit_depth,
                })
            }
        };

        let size = (info.width, info.height);

        Ok(Self::new_rgba8(size, data))
    }

    pub fn encode_png<W: Write>(&self, output: W) -> Result<(), ImageError> {
        let mut encoder = png::Encoder::new(output, self.size.0, self.size.1);

        match self.format {
            ImageFormat::Rgba8 => {
                encoder.set_color(png::ColorType::RGBA);
                encoder.set_depth(png::BitDepth::Eight);
            }
        }

        let mut output_writer = encoder.write_header()?;
        output_writer.write_image_data(&self.data)?;

        // On drop, output_writer will write the last chunk of the PNG file.
        Ok(())
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// The rectangle covering the whole image.
    pub fn bounds(&self) -> Rectangle {
        Rectangle::new(0, 0, self.size.0, self.size.1)
    }

    /// Copies the `region` portion of `other` into this image, with its top
    /// left corner at `pos`.
    pub fn blit(&mut self, other: &Image, region: Rectangle, pos: (u32, u32)) {
        assert!(self.format == ImageFormat::Rgba8 && other.format == ImageFormat::Rgba8);
        assert!(other.bounds().contains(&region));
        assert!(self
            .bounds()
            .contains(&Rectangle::new(pos.0, pos.1, region.width, region.height)));

        let stride = self.format.stride() as usize;
        let row_bytes = region.width as usize * stride;

        for row in 0..region.height {
            let other_start = stride * (region.x + (region.y + row) * other.size.0) as usize;
            let self_start = stride * (pos.0 + (pos.1 + row) * self.size.0) as usize;

            let other_row = &other.data[other_start..other_start + row_bytes];
            self.data[self_start..self_start + row_bytes].copy_from_slice(other_row);
        }
    }

    /// Returns a copy of this image rotated 90 degrees clockwise.
    pub fn rotated_clockwise(&self) -> Image {
        let (width, height) = self.size;
        let mut rotated = Image::new_empty_rgba8((height, width));

        for y in 0..height {
            for x in 0..width {
                rotated.set_pixel((height - 1 - y, x), self.get_pixel((x, y)));
            }
        }

        rotated
    }

    /// Tells whether every pixel in `region` has the given alpha value.
    pub fn is_alpha_entirely(&self, alpha: u8, region: Rectangle) -> bool {
        (region.top()..region.bottom())
            .all(|y| (region.left()..region.right()).all(|x| self.get_pixel((x, y)).a == alpha))
    }

    pub fn get_pixel(&self, pos: (u32, u32)) -> Pixel {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let stride = self.format.stride() as usize;
        let start = stride * (pos.0 + pos.1 * self.size.0) as usize;

        Pixel {
            r: self.data[start],
            g: self.data[start + 1],
            b: self.data[start + 2],
            a: self.data[start + 3],
        }
    }

    pub fn set_pixel(&mut self, pos: (u32, u32), pixel: Pixel) {
        assert!(pos.0 < self.size.0);
        assert!(pos.1 < self.size.1);

        let stride = self.format.stride() as usize;
        let start = stride * (pos.0 + pos.1 * self.size.0) as usize;

        self.data[start] = pixel.r;
        self.data[start + 1] = pixel.g;
        self.data[start + 2] = pixel.b;
        self.data[start + 3] = pixel.a;
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn blit_zero() {
        let source = Image::new_empty_rgba8((17, 20));
        let mut target = Image::new_empty_rgba8((17, 20));

        target.blit(&source, source.bounds(), (0, 0));
    }

    #[test]
    fn blit_corner() {
        let mut source = Image::new_empty_rgba8((4, 4));
        source.set_pixel((3, 3), Pixel::new(9, 9, 9, 9));
        let mut target = Image::new_empty_rgba8((8, 8));

        target.blit(&source, source.bounds(), (4, 4));

        assert_eq!(target.get_pixel((7, 7)), Pixel::new(9, 9, 9, 9));
        assert_eq!(target.get_pixel((3, 3)), Pixel::new(0, 0, 0, 0));
    }

    #[test]
    fn blit_region() {
        let mut source = Image::new_empty_rgba8((6, 6));
        source.set_pixel((2, 3), Pixel::new(1, 2, 3, 4));
        source.set_pixel((3, 4), Pixel::new(5, 6, 7, 8));
        let mut target = Image::new_empty_rgba8((4, 4));

        target.blit(&source, Rectangle::new(2, 3, 2, 2), (1, 1));

        assert_eq!(target.get_pixel((1, 1)), Pixel::new(1, 2, 3, 4));
        assert_eq!(target.get_pixel((2, 2)), Pixel::new(5, 6, 7, 8));
        assert_eq!(target.get_pixel((0, 0)), Pixel::new(0, 0, 0, 0));
    }

    #[test]
    #[should_panic]
    fn blit_out_of_bounds() {
        let source = Image::new_empty_rgba8((4, 4));
        let mut target = Image::new_empty_rgba8((4, 4));

        target.blit(&source, source.bounds(), (1, 0));
    }

    #[test]
    fn get_pixel() {
        let source = Image::new_empty_rgba8((4, 4));

        assert_eq!(source.get_pixel((0, 0)), Pixel::new(0, 0, 0, 0));
        assert_eq!(source.get_pixel((3, 3)), Pixel::new(0, 0, 0, 0));
    }

    #[test]
    fn set_pixel() {
        let mut source = Image::new_empty_rgba8((3, 3));

        source.set_pixel((0, 0), Pixel::new(1, 2, 3, 4));
        assert_eq!(source.get_pixel((0, 0)), Pixel::new(1, 2, 3, 4));

        source.set_pixel((2, 2), Pixel::new(5, 6, 7, 8));
        assert_eq!(source.get_pixel((2, 2)), Pixel::new(5, 6, 7, 8));

        assert_eq!(&source.data[0..4], &[1, 2, 3, 4]);
        assert_eq!(&source.data[(source.data.len() - 4)..], &[5, 6, 7, 8]);
    }

    #[test]
    fn rotate_clockwise() {
        let mut source = Image::new_empty_rgba8((3, 2));
        source.set_pixel((0, 0), Pixel::new(1, 0, 0, 255));
        source.set_pixel((2, 1), Pixel::new(2, 0, 0, 255));

        let rotated = source.rotated_clockwise();

        assert_eq!(rotated.size(), (2, 3));
        assert_eq!(rotated.get_pixel((1, 0)), Pixel::new(1, 0, 0, 255));
        assert_eq!(rotated.get_pixel((0, 2)), Pixel::new(2, 0, 0, 255));
    }

    #[test]
    fn alpha_queries() {
        let mut source = Image::new_empty_rgba8((4, 4));
        source.set_pixel((1, 2), Pixel::new(0, 0, 0, 10));

        assert!(source.is_alpha_entirely(0, Rectangle::new(0, 0, 4, 2)));
        assert!(!source.is_alpha_entirely(0, Rectangle::new(0, 2, 4, 1)));
        assert!(source.is_alpha_entirely(10, Rectangle::new(1, 2, 1, 1)));
    }

    #[test]
    fn png_round_trip() {
        let mut source = Image::new_empty_rgba8((5, 3));
        source.set_pixel((4, 2), Pixel::new(10, 20, 30, 40));

        let mut encoded = Vec::new();
        source.encode_png(&mut encoded).unwrap();
        let decoded = Image::decode_png(encoded.as_slice()).unwrap();

        assert_eq!(decoded, source);
    }
}
