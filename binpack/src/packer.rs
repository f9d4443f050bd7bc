use crate::{
    error::PackError,
    geometry::Rectangle,
    types::{grown_size, GrowRule, Heuristic},
};

const DEFAULT_GROW_LIMIT: u32 = 16;

/// A bin that rectangles are packed into using the MaxRects algorithm.
///
/// The bin tracks its empty space as a list of maximal free rectangles. Free
/// rectangles may overlap each other, but no free rectangle is ever contained
/// in another one.
///
/// When a rectangle doesn't fit, the bin can grow according to its
/// [`GrowRule`][GrowRule]. Bins never shrink.
///
/// After an insert fails with [`PackError::CapacityExceeded`], the bin may
/// have grown or placed part of a batch. It should be thrown away rather than
/// used for more inserts.
///
/// [GrowRule]: enum.GrowRule.html
/// [`PackError::CapacityExceeded`]: enum.PackError.html
#[derive(Debug, Clone)]
pub struct MaxRectsBin {
    bin_width: u32,
    bin_height: u32,
    used_width: u32,
    used_height: u32,

    allow_rotation: bool,
    padding_width: u32,
    padding_height: u32,
    include_padding: bool,

    grow: GrowRule,
    grow_increment: i32,
    grow_limit: u32,

    /// Under `GrowRule::Both`, whether the next growth step widens the bin.
    grow_width_next: bool,

    free_rects: Vec<Rectangle>,
    used_rects: Vec<Rectangle>,
}

/// Lower is better. Compared lexicographically.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
struct Score(i64, i64);

/// A candidate position for a padded rectangle.
#[derive(Debug, Clone, Copy)]
struct Placement {
    rect: Rectangle,
    rotated: bool,
    score: Score,
}

impl MaxRectsBin {
    pub fn new(
        width: u32,
        height: u32,
        grow: GrowRule,
        grow_increment: i32,
        allow_rotation: bool,
    ) -> Self {
        Self {
            bin_width: width,
            bin_height: height,
            used_width: 0,
            used_height: 0,
            allow_rotation,
            padding_width: 0,
            padding_height: 0,
            include_padding: false,
            grow,
            grow_increment,
            grow_limit: DEFAULT_GROW_LIMIT,
            grow_width_next: true,
            free_rects: vec![Rectangle::new(0, 0, width, height)],
            used_rects: Vec::new(),
        }
    }

    /// Creates a bin with a fixed size.
    pub fn with_fixed_size(width: u32, height: u32, allow_rotation: bool) -> Self {
        Self::new(width, height, GrowRule::None, 0, allow_rotation)
    }

    #[inline]
    pub fn bin_width(&self) -> u32 {
        self.bin_width
    }

    #[inline]
    pub fn bin_height(&self) -> u32 {
        self.bin_height
    }

    /// The right edge of the rightmost rectangle placed so far.
    #[inline]
    pub fn used_width(&self) -> u32 {
        self.used_width
    }

    /// The bottom edge of the lowest rectangle placed so far.
    #[inline]
    pub fn used_height(&self) -> u32 {
        self.used_height
    }

    #[inline]
    pub fn allow_rotation(&self) -> bool {
        self.allow_rotation
    }

    #[inline]
    pub fn padding(&self) -> (u32, u32) {
        (self.padding_width, self.padding_height)
    }

    /// Sets the margin reserved on each side of every rectangle inserted from
    /// now on.
    pub fn set_padding(&mut self, padding_width: u32, padding_height: u32) {
        self.padding_width = padding_width;
        self.padding_height = padding_height;
    }

    #[inline]
    pub fn include_padding(&self) -> bool {
        self.include_padding
    }

    /// Controls whether inserts return the rectangle with its padding margin,
    /// or just the tight rectangle that was asked for.
    pub fn set_include_padding(&mut self, include_padding: bool) {
        self.include_padding = include_padding;
    }

    #[inline]
    pub fn grow(&self) -> GrowRule {
        self.grow
    }

    pub fn set_grow(&mut self, grow: GrowRule) {
        self.grow = grow;
    }

    #[inline]
    pub fn grow_increment(&self) -> i32 {
        self.grow_increment
    }

    pub fn set_grow_increment(&mut self, grow_increment: i32) {
        self.grow_increment = grow_increment;
    }

    #[inline]
    pub fn grow_limit(&self) -> u32 {
        self.grow_limit
    }

    /// Sets how many times the bin may grow during a single insert before
    /// giving up.
    pub fn set_grow_limit(&mut self, grow_limit: u32) -> Result<(), PackError> {
        if grow_limit == 0 {
            return Err(PackError::invalid_argument(
                "grow limit must be greater than zero",
            ));
        }

        self.grow_limit = grow_limit;
        Ok(())
    }

    /// The empty regions of the bin that new rectangles can be placed in.
    pub fn free_rectangles(&self) -> &[Rectangle] {
        &self.free_rects
    }

    /// Every rectangle placed so far, including padding.
    pub fn used_rectangles(&self) -> &[Rectangle] {
        &self.used_rects
    }

    /// Places a single rectangle in the bin, growing the bin if allowed.
    ///
    /// Zero-sized rectangles are returned at the origin without taking up any
    /// space. If rotation is allowed and the rectangle is placed rotated, the
    /// returned rectangle has its width and height swapped.
    pub fn insert(
        &mut self,
        width: u32,
        height: u32,
        heuristic: Heuristic,
    ) -> Result<Rectangle, PackError> {
        if width == 0 || height == 0 {
            return Ok(Rectangle::new(0, 0, width, height));
        }

        let (padded_width, padded_height) = self.padded_size(width, height);
        let placement = self.search_with_growth((width, height), |bin| {
            bin.find_position(padded_width, padded_height, heuristic)
        })?;

        log::trace!(
            "Placed {}x{} at {} (rotated: {})",
            width,
            height,
            placement.rect,
            placement.rotated
        );

        self.place(placement.rect);
        Ok(self.strip_padding(placement))
    }

    /// Places every rectangle in `sizes`, returning their bounds in the same
    /// order as the input.
    ///
    /// At each step, every remaining rectangle is scored against the current
    /// free space and the best one overall is placed next. This adapts the
    /// placement order to the state of the bin, which usually packs tighter
    /// than inserting rectangles one at a time.
    pub fn insert_all(
        &mut self,
        sizes: &[(u32, u32)],
        heuristic: Heuristic,
    ) -> Result<Vec<Rectangle>, PackError> {
        let mut bounds = vec![Rectangle::default(); sizes.len()];
        self.insert_into(sizes, &mut bounds, 0, heuristic)?;

        Ok(bounds)
    }

    /// Like [`insert_all`][MaxRectsBin::insert_all], but writes the bounds of
    /// `sizes[i]` into `bounds[index_offset + i]`.
    ///
    /// This lets several batches fill different parts of one larger table of
    /// bounds.
    pub fn insert_into(
        &mut self,
        sizes: &[(u32, u32)],
        bounds: &mut [Rectangle],
        index_offset: usize,
        heuristic: Heuristic,
    ) -> Result<(), PackError> {
        let fits_in_bounds = index_offset
            .checked_add(sizes.len())
            .map(|end| end <= bounds.len())
            .unwrap_or(false);

        if !fits_in_bounds {
            return Err(PackError::invalid_argument(format!(
                "bounds has room for {} rectangles, but {} were requested at offset {}",
                bounds.len(),
                sizes.len(),
                index_offset
            )));
        }

        // Pairs of (input index, padded size) still waiting to be placed.
        let mut remaining = Vec::with_capacity(sizes.len());

        for (index, &(width, height)) in sizes.iter().enumerate() {
            if width == 0 || height == 0 {
                bounds[index_offset + index] = Rectangle::new(0, 0, width, height);
            } else {
                remaining.push((index, self.padded_size(width, height)));
            }
        }

        log::trace!(
            "Packing {} rectangles into {}x{} bin",
            remaining.len(),
            self.bin_width,
            self.bin_height
        );

        while let Some(&(first_index, _)) = remaining.first() {
            let (slot, placement) = self.search_with_growth(sizes[first_index], |bin| {
                bin.find_best_of(&remaining, heuristic)
            })?;

            let (index, _) = remaining.remove(slot);

            log::trace!(
                "Placed rectangle {} ({}x{}) at {} (rotated: {})",
                index,
                sizes[index].0,
                sizes[index].1,
                placement.rect,
                placement.rotated
            );

            self.place(placement.rect);
            bounds[index_offset + index] = self.strip_padding(placement);
        }

        Ok(())
    }

    /// The fraction of the bin covered by placed rectangles.
    ///
    /// If `crop` is set, the fraction is taken of the bounding box of the
    /// placed rectangles instead of the whole bin.
    pub fn occupancy(&self, crop: bool) -> f32 {
        let used_area: u64 = self.used_rects.iter().map(Rectangle::area).sum();

        let total_area = if crop {
            u64::from(self.used_width) * u64::from(self.used_height)
        } else {
            u64::from(self.bin_width) * u64::from(self.bin_height)
        };

        if total_area == 0 {
            return 0.0;
        }

        (used_area as f64 / total_area as f64) as f32
    }

    fn padded_size(&self, width: u32, height: u32) -> (u32, u32) {
        (
            width.saturating_add(self.padding_width.saturating_mul(2)),
            height.saturating_add(self.padding_height.saturating_mul(2)),
        )
    }

    fn strip_padding(&self, placement: Placement) -> Rectangle {
        if self.include_padding {
            return placement.rect;
        }

        let (padding_x, padding_y) = if placement.rotated {
            (self.padding_height, self.padding_width)
        } else {
            (self.padding_width, self.padding_height)
        };

        let rect = placement.rect;
        Rectangle::new(
            rect.x + padding_x,
            rect.y + padding_y,
            rect.width - padding_x * 2,
            rect.height - padding_y * 2,
        )
    }

    /// Runs `search` against the bin, growing the bin and retrying until it
    /// finds something or growth is exhausted.
    fn search_with_growth<T, F>(&mut self, size: (u32, u32), search: F) -> Result<T, PackError>
    where
        F: Fn(&Self) -> Option<T>,
    {
        let mut attempts = 0;

        loop {
            if let Some(found) = search(self) {
                return Ok(found);
            }

            if self.grow == GrowRule::None || attempts >= self.grow_limit {
                return Err(PackError::CapacityExceeded {
                    size,
                    bin_size: (self.bin_width, self.bin_height),
                    occupancy: self.occupancy(false),
                });
            }

            self.grow_bin();
            attempts += 1;
        }
    }

    fn grow_bin(&mut self) {
        let grow_width = match self.grow {
            GrowRule::None => return,
            GrowRule::Width => true,
            GrowRule::Height => false,
            GrowRule::Both => {
                let grow_width = self.grow_width_next;
                self.grow_width_next = !grow_width;
                grow_width
            }
        };

        if grow_width {
            let old_width = self.bin_width;
            self.bin_width = grown_size(old_width, self.grow_increment);

            if self.bin_width > old_width {
                self.free_rects.push(Rectangle::new(
                    old_width,
                    0,
                    self.bin_width - old_width,
                    self.bin_height,
                ));
            }
        } else {
            let old_height = self.bin_height;
            self.bin_height = grown_size(old_height, self.grow_increment);

            if self.bin_height > old_height {
                self.free_rects.push(Rectangle::new(
                    0,
                    old_height,
                    self.bin_width,
                    self.bin_height - old_height,
                ));
            }
        }

        log::debug!("Grew bin to {}x{}", self.bin_width, self.bin_height);
    }

    /// Finds the best remaining rectangle to place next, returning its slot in
    /// `remaining` and where it would go. Earlier slots win ties.
    fn find_best_of(
        &self,
        remaining: &[(usize, (u32, u32))],
        heuristic: Heuristic,
    ) -> Option<(usize, Placement)> {
        let mut best: Option<(usize, Placement)> = None;

        for (slot, &(_, (width, height))) in remaining.iter().enumerate() {
            if let Some(placement) = self.find_position(width, height, heuristic) {
                let is_better = match &best {
                    Some((_, current)) => placement.score < current.score,
                    None => true,
                };

                if is_better {
                    best = Some((slot, placement));
                }
            }
        }

        best
    }

    /// Scores every free rectangle that can hold a `width` by `height`
    /// rectangle, in either orientation if rotation is allowed. The upright
    /// orientation wins ties.
    fn find_position(&self, width: u32, height: u32, heuristic: Heuristic) -> Option<Placement> {
        let rotate = self.allow_rotation && width != height;
        let mut best: Option<Placement> = None;

        for free in &self.free_rects {
            let orientations = [(width, height, false), (height, width, true)];
            let count = if rotate { 2 } else { 1 };

            for &(candidate_width, candidate_height, rotated) in &orientations[..count] {
                if free.width < candidate_width || free.height < candidate_height {
                    continue;
                }

                let rect = Rectangle::new(free.x, free.y, candidate_width, candidate_height);
                let score = self.score(free, &rect, heuristic);

                let is_better = match &best {
                    Some(current) => score < current.score,
                    None => true,
                };

                if is_better {
                    best = Some(Placement {
                        rect,
                        rotated,
                        score,
                    });
                }
            }
        }

        best
    }

    fn score(&self, free: &Rectangle, rect: &Rectangle, heuristic: Heuristic) -> Score {
        let leftover_horizontal = i64::from(free.width - rect.width);
        let leftover_vertical = i64::from(free.height - rect.height);
        let short_side = leftover_horizontal.min(leftover_vertical);
        let long_side = leftover_horizontal.max(leftover_vertical);

        match heuristic {
            Heuristic::BestShortSideFit => Score(short_side, long_side),
            Heuristic::BestLongSideFit => Score(long_side, short_side),
            Heuristic::BestAreaFit => {
                let wasted = free.area() - rect.area();
                Score(wasted as i64, short_side)
            }
            Heuristic::BottomLeft => Score(i64::from(rect.bottom()), i64::from(rect.x)),
            Heuristic::ContactPoint => Score(-(self.contact_score(rect) as i64), 0),
        }
    }

    /// Sums the lengths of the edges of `rect` that touch the bin boundary or
    /// an already placed rectangle.
    fn contact_score(&self, rect: &Rectangle) -> u64 {
        let mut score = 0;

        if rect.left() == 0 || rect.right() == self.bin_width {
            score += u64::from(rect.height);
        }

        if rect.top() == 0 || rect.bottom() == self.bin_height {
            score += u64::from(rect.width);
        }

        for used in &self.used_rects {
            if used.left() == rect.right() || used.right() == rect.left() {
                score += common_interval(used.top(), used.bottom(), rect.top(), rect.bottom());
            }

            if used.top() == rect.bottom() || used.bottom() == rect.top() {
                score += common_interval(used.left(), used.right(), rect.left(), rect.right());
            }
        }

        score
    }

    fn place(&mut self, rect: Rectangle) {
        let mut free_rects = Vec::with_capacity(self.free_rects.len() + 4);

        for free in self.free_rects.drain(..) {
            if free.intersects(&rect) {
                split_free_rect(&free, &rect, &mut free_rects);
            } else {
                free_rects.push(free);
            }
        }

        self.free_rects = prune_contained(free_rects);
        self.used_rects.push(rect);

        self.used_width = self.used_width.max(rect.right());
        self.used_height = self.used_height.max(rect.bottom());
    }
}

/// The length of the overlap between the intervals `[a_start, a_end]` and
/// `[b_start, b_end]`.
fn common_interval(a_start: u32, a_end: u32, b_start: u32, b_end: u32) -> u64 {
    if a_end < b_start || b_end < a_start {
        return 0;
    }

    u64::from(a_end.min(b_end) - a_start.max(b_start))
}

/// Pushes the parts of `free` that are not covered by `used` onto `output`.
/// Each part extends along a whole side of `free`, so parts may overlap.
fn split_free_rect(free: &Rectangle, used: &Rectangle, output: &mut Vec<Rectangle>) {
    if used.left() < free.right() && used.right() > free.left() {
        if used.top() > free.top() && used.top() < free.bottom() {
            output.push(Rectangle::new(
                free.x,
                free.y,
                free.width,
                used.top() - free.top(),
            ));
        }

        if used.bottom() < free.bottom() {
            output.push(Rectangle::new(
                free.x,
                used.bottom(),
                free.width,
                free.bottom() - used.bottom(),
            ));
        }
    }

    if used.top() < free.bottom() && used.bottom() > free.top() {
        if used.left() > free.left() && used.left() < free.right() {
            output.push(Rectangle::new(
                free.x,
                free.y,
                used.left() - free.left(),
                free.height,
            ));
        }

        if used.right() < free.right() {
            output.push(Rectangle::new(
                used.right(),
                free.y,
                free.right() - used.right(),
                free.height,
            ));
        }
    }
}

/// Removes every rectangle contained in another one. Of several identical
/// rectangles, only the first is kept.
fn prune_contained(rects: Vec<Rectangle>) -> Vec<Rectangle> {
    rects
        .iter()
        .enumerate()
        .filter(|&(index, rect)| {
            !rects.iter().enumerate().any(|(other_index, other)| {
                other_index != index
                    && other.contains(rect)
                    && (other != rect || other_index < index)
            })
        })
        .map(|(_, rect)| *rect)
        .collect()
}
