//! Ranges of characters that a font should contain.

use std::{fmt, ops::RangeInclusive, str::FromStr};

use regex::Regex;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize, Serializer};
use thiserror::Error;

/// An inclusive range of characters, like `A-Z`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CharacterRegion {
    start: char,
    end: char,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegionError {
    #[error("Character regions cannot be empty")]
    Empty,

    #[error("Character region starts at {start:?}, after its end {end:?}")]
    InvalidRange { start: char, end: char },

    #[error("{0:#x} is not a valid character")]
    InvalidCodepoint(u32),

    #[error("Couldn't parse character region {0:?}")]
    Malformed(String),
}

impl CharacterRegion {
    pub fn new(start: char, end: char) -> Result<Self, RegionError> {
        if start > end {
            return Err(RegionError::InvalidRange { start, end });
        }

        Ok(Self { start, end })
    }

    pub fn single(character: char) -> Self {
        Self {
            start: character,
            end: character,
        }
    }

    #[inline]
    pub fn start(&self) -> char {
        self.start
    }

    #[inline]
    pub fn end(&self) -> char {
        self.end
    }

    /// Every character in the region, in order. Surrogate codepoints are
    /// skipped since they aren't characters.
    pub fn characters(&self) -> RangeInclusive<char> {
        self.start..=self.end
    }

    /// Parses one character in any of the forms a region accepts.
    ///
    /// Multi-digit numbers are codepoints, so `"65"` is `A`, but a lone digit
    /// like `"5"` is the digit itself.
    pub fn parse_character(text: &str) -> Result<char, RegionError> {
        lazy_static::lazy_static! {
            static ref HEX: Regex = Regex::new(r"^0[xX]([0-9a-fA-F]+)$").unwrap();
            static ref HEX_ENTITY: Regex = Regex::new(r"^&#[xX]([0-9a-fA-F]+);$").unwrap();
            static ref DECIMAL_ENTITY: Regex = Regex::new(r"^&#([0-9]+);$").unwrap();
            static ref DECIMAL: Regex = Regex::new(r"^[0-9]{2,}$").unwrap();
        }

        let mut chars = text.chars();
        if let (Some(character), None) = (chars.next(), chars.next()) {
            return Ok(character);
        }

        let (digits, radix) = if let Some(captures) = HEX.captures(text) {
            (captures.get(1), 16)
        } else if let Some(captures) = HEX_ENTITY.captures(text) {
            (captures.get(1), 16)
        } else if let Some(captures) = DECIMAL_ENTITY.captures(text) {
            (captures.get(1), 10)
        } else if DECIMAL.is_match(text) {
            return codepoint_to_char(text, 10);
        } else {
            return Err(RegionError::Malformed(text.to_owned()));
        };

        match digits {
            Some(digits) => codepoint_to_char(digits.as_str(), radix),
            None => Err(RegionError::Malformed(text.to_owned())),
        }
    }
}

fn codepoint_to_char(digits: &str, radix: u32) -> Result<char, RegionError> {
    let codepoint =
        u32::from_str_radix(digits, radix).map_err(|_| RegionError::Malformed(digits.to_owned()))?;

    std::char::from_u32(codepoint).ok_or(RegionError::InvalidCodepoint(codepoint))
}

impl Default for CharacterRegion {
    /// Printable ASCII, from space to tilde.
    fn default() -> Self {
        Self {
            start: ' ',
            end: '~',
        }
    }
}

impl FromStr for CharacterRegion {
    type Err = RegionError;

    /// Accepts a single character (`A`, `0x41`, `65`, `&#65;`) or two of them
    /// joined by a dash (`A-Z`, `32-127`, `0x20-0x7F`).
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        if text.is_empty() {
            return Err(RegionError::Empty);
        }

        let whole_error = match Self::parse_character(text) {
            Ok(character) => return Ok(Self::single(character)),
            Err(err) => err,
        };

        // The dash can itself be an endpoint, as in "--/", so try every dash
        // that isn't the first character.
        for (index, _) in text.match_indices('-').filter(|&(index, _)| index > 0) {
            let start = Self::parse_character(&text[..index]);
            let end = Self::parse_character(&text[index + 1..]);

            if let (Ok(start), Ok(end)) = (start, end) {
                return Self::new(start, end);
            }
        }

        Err(whole_error)
    }
}

impl fmt::Display for CharacterRegion {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        if self.start == self.end {
            write!(formatter, "{:#x}", self.start as u32)
        } else {
            write!(formatter, "{:#x}-{:#x}", self.start as u32, self.end as u32)
        }
    }
}

impl Serialize for CharacterRegion {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for CharacterRegion {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let region = <String as Deserialize>::deserialize(deserializer)?;

        region.parse().map_err(D::Error::custom)
    }
}
