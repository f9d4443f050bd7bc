use std::fmt;

/// An axis-aligned rectangle with integer coordinates.
///
/// The origin is the top-left corner of the bin or image the rectangle lives
/// in. `right` and `bottom` are exclusive edges.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Rectangle {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

impl Rectangle {
    #[inline]
    pub const fn new(x: u32, y: u32, width: u32, height: u32) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn left(&self) -> u32 {
        self.x
    }

    #[inline]
    pub fn top(&self) -> u32 {
        self.y
    }

    #[inline]
    pub fn right(&self) -> u32 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> u32 {
        self.y + self.height
    }

    #[inline]
    pub fn position(&self) -> (u32, u32) {
        (self.x, self.y)
    }

    #[inline]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn area(&self) -> u64 {
        u64::from(self.width) * u64::from(self.height)
    }

    /// Zero-area rectangles are legal, but never take up space in a bin.
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Tells whether the two rectangles share any area. Rectangles that only
    /// touch along an edge do not intersect.
    pub fn intersects(&self, other: &Rectangle) -> bool {
        self.x < other.right()
            && other.x < self.right()
            && self.y < other.bottom()
            && other.y < self.bottom()
    }

    /// Tells whether `other` lies entirely inside this rectangle.
    pub fn contains(&self, other: &Rectangle) -> bool {
        self.x <= other.x
            && self.y <= other.y
            && other.right() <= self.right()
            && other.bottom() <= self.bottom()
    }
}

impl fmt::Display for Rectangle {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(
            formatter,
            "{},{} {}x{}",
            self.x, self.y, self.width, self.height
        )
    }
}
