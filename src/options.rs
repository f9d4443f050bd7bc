use std::path::PathBuf;

use binpack::{GrowRule, Heuristic};
use structopt::StructOpt;

#[derive(Debug, StructOpt)]
#[structopt(about = "Packs font glyphs and sprites into texture atlases")]
pub struct Options {
    #[structopt(subcommand)]
    pub command: Subcommand,
}

#[derive(Debug, StructOpt)]
pub enum Subcommand {
    /// Arrange the glyphs of a font into a single atlas image, described by a
    /// fontpack.toml file. Writes the atlas and a JSON file describing where
    /// each glyph is.
    Font(FontOptions),

    /// Pack every PNG image in a folder into a single sprite sheet.
    Sprites(SpritesOptions),
}

#[derive(Debug, StructOpt)]
pub struct FontOptions {
    /// The path to a fontpack.toml file, or a folder containing one. Defaults
    /// to the current working directory.
    pub config_path: Option<PathBuf>,
}

#[derive(Debug, StructOpt)]
pub struct SpritesOptions {
    /// The folder to search for PNG images, recursively.
    pub folder: PathBuf,

    /// Where to write the packed sprite sheet.
    #[structopt(long)]
    pub output: PathBuf,

    /// Where to write the JSON layout of the sheet. Defaults to the output
    /// path with a .json extension.
    #[structopt(long)]
    pub manifest: Option<PathBuf>,

    /// The starting width of the sheet.
    #[structopt(long, default_value = "256")]
    pub width: u32,

    /// The starting height of the sheet.
    #[structopt(long, default_value = "256")]
    pub height: u32,

    /// How to choose where each sprite goes.
    ///
    /// Options: bssf, blsf, baf, bl, cp
    #[structopt(long, default_value = "bssf")]
    pub heuristic: Heuristic,

    /// Which dimension of the sheet may grow when sprites don't fit.
    ///
    /// Options: none, width, height, both
    #[structopt(long, default_value = "both")]
    pub grow: GrowRule,

    /// How much the sheet grows by. Positive values add that many pixels,
    /// negative values multiply: -2 doubles the size.
    #[structopt(long, default_value = "-2", allow_hyphen_values = true)]
    pub grow_increment: i32,

    /// How many times the sheet may grow while placing one sprite.
    #[structopt(long, default_value = "16")]
    pub grow_limit: u32,

    /// Transparent pixels to keep on every side of each sprite.
    #[structopt(long, default_value = "0")]
    pub padding: u32,

    /// Whether sprites may be rotated 90 degrees to fit better.
    #[structopt(long)]
    pub rotate: bool,
}
