use std::{fmt, str::FromStr};

/// The rule used to choose between the free rectangles that can hold a new
/// rectangle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Heuristic {
    /// Minimize the shorter of the leftover gaps, then the longer one.
    BestShortSideFit,

    /// Minimize the longer of the leftover gaps, then the shorter one.
    BestLongSideFit,

    /// Minimize the wasted area of the free rectangle, then the shorter
    /// leftover gap.
    BestAreaFit,

    /// Place rectangles as low as possible, then as far left as possible, like
    /// stacking Tetris pieces.
    BottomLeft,

    /// Maximize the length of edges touching the bin boundary or rectangles
    /// that were already placed.
    ContactPoint,
}

impl Default for Heuristic {
    fn default() -> Self {
        Heuristic::BestShortSideFit
    }
}

impl FromStr for Heuristic {
    type Err = String;

    fn from_str(value: &str) -> Result<Heuristic, Self::Err> {
        match value {
            "bssf" => Ok(Heuristic::BestShortSideFit),
            "blsf" => Ok(Heuristic::BestLongSideFit),
            "baf" => Ok(Heuristic::BestAreaFit),
            "bl" => Ok(Heuristic::BottomLeft),
            "cp" => Ok(Heuristic::ContactPoint),

            _ => Err(String::from(
                "Invalid heuristic. Valid options are 'bssf', 'blsf', 'baf', 'bl' and 'cp'.",
            )),
        }
    }
}

impl fmt::Display for Heuristic {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Heuristic::BestShortSideFit => "bssf",
            Heuristic::BestLongSideFit => "blsf",
            Heuristic::BestAreaFit => "baf",
            Heuristic::BottomLeft => "bl",
            Heuristic::ContactPoint => "cp",
        };

        formatter.write_str(name)
    }
}

/// Which dimension of a bin is allowed to grow when a rectangle does not fit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GrowRule {
    /// The bin has a fixed size. Running out of space is an error.
    None,

    /// Only the width grows.
    Width,

    /// Only the height grows.
    Height,

    /// Alternate between growing the width and the height, starting with the
    /// width.
    Both,
}

impl Default for GrowRule {
    fn default() -> Self {
        GrowRule::None
    }
}

impl FromStr for GrowRule {
    type Err = String;

    fn from_str(value: &str) -> Result<GrowRule, Self::Err> {
        match value {
            "none" => Ok(GrowRule::None),
            "width" => Ok(GrowRule::Width),
            "height" => Ok(GrowRule::Height),
            "both" => Ok(GrowRule::Both),

            _ => Err(String::from(
                "Invalid grow rule. Valid options are 'none', 'width', 'height' and 'both'.",
            )),
        }
    }
}

/// Computes the new length of a bin dimension after one growth step.
///
/// A positive increment adds a fixed number of pixels. A negative increment is
/// a multiplier: `-2` doubles the dimension, `-3` triples it, and `-1` leaves
/// it unchanged.
pub fn grown_size(dimension: u32, increment: i32) -> u32 {
    if increment < 0 {
        let factor = -(increment + 1) as u32;
        dimension.saturating_add(dimension.saturating_mul(factor))
    } else {
        dimension.saturating_add(increment as u32)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn parse_heuristics() {
        assert_eq!("bssf".parse(), Ok(Heuristic::BestShortSideFit));
        assert_eq!("cp".parse(), Ok(Heuristic::ContactPoint));
        assert!("best".parse::<Heuristic>().is_err());

        for heuristic in &[
            Heuristic::BestShortSideFit,
            Heuristic::BestLongSideFit,
            Heuristic::BestAreaFit,
            Heuristic::BottomLeft,
            Heuristic::ContactPoint,
        ] {
            assert_eq!(heuristic.to_string().parse(), Ok(*heuristic));
        }
    }

    #[test]
    fn parse_grow_rules() {
        assert_eq!("both".parse(), Ok(GrowRule::Both));
        assert_eq!("none".parse(), Ok(GrowRule::None));
        assert!("sideways".parse::<GrowRule>().is_err());
    }

    #[test]
    fn multiplicative_growth() {
        assert_eq!(grown_size(64, -2), 128);
        assert_eq!(grown_size(64, -3), 192);
        assert_eq!(grown_size(64, -1), 64);
    }

    #[test]
    fn additive_growth() {
        assert_eq!(grown_size(64, 16), 80);
        assert_eq!(grown_size(64, 0), 64);
    }

    #[test]
    fn growth_saturates() {
        assert_eq!(grown_size(u32::max_value() - 1, -2), u32::max_value());
        assert_eq!(grown_size(u32::max_value(), 1), u32::max_value());
    }
}
