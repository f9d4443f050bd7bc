//! Layout files written next to packed atlases, describing where every input
//! ended up.

use std::{collections::BTreeMap, io, path::Path};

use binpack::Rectangle;
use fs_err as fs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{
    glyph::{Glyph, WidthMetrics},
    sprite_name::SpriteName,
};

/// A slice of an atlas image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageSlice {
    pub offset: (u32, u32),
    pub size: (u32, u32),
}

impl From<Rectangle> for ImageSlice {
    fn from(rect: Rectangle) -> Self {
        Self {
            offset: rect.position(),
            size: rect.size(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct FontManifest {
    pub name: String,
    pub atlas_size: (u32, u32),
    pub default_character: Option<char>,
    pub glyphs: Vec<GlyphManifest>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct GlyphManifest {
    pub character: char,
    pub slice: ImageSlice,
    pub x_offset: f32,
    pub y_offset: f32,
    pub x_advance: f32,
    pub widths: WidthMetrics,
}

impl From<&Glyph> for GlyphManifest {
    fn from(glyph: &Glyph) -> Self {
        Self {
            character: glyph.character,
            slice: glyph.subrect.into(),
            x_offset: glyph.x_offset,
            y_offset: glyph.y_offset,
            x_advance: glyph.x_advance,
            widths: glyph.widths,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct SpriteManifest {
    pub sheet_size: (u32, u32),
    pub sprites: BTreeMap<SpriteName, SpriteSlice>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpriteSlice {
    pub slice: ImageSlice,

    /// Whether the sprite was rotated 90 degrees clockwise to fit.
    pub rotated: bool,
}

#[derive(Debug, Error)]
pub enum ManifestError {
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Writes any manifest as pretty-printed JSON.
pub fn write_manifest<T: Serialize, P: AsRef<Path>>(
    manifest: &T,
    path: P,
) -> Result<(), ManifestError> {
    let path = path.as_ref();
    let serialized = serde_json::to_vec_pretty(manifest)?;
    fs::write(path, serialized)?;

    log::trace!("Saved manifest to {}", path.display());

    Ok(())
}
