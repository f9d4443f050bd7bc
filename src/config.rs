use std::{
    collections::BTreeSet,
    io,
    path::{Path, PathBuf},
};

use fs_err as fs;
use serde::{de::Error as _, Deserialize, Deserializer, Serialize};
use thiserror::Error;

use crate::character_region::CharacterRegion;

static CONFIG_FILENAME: &str = "fontpack.toml";

/// Describes a font to pack, contained in a fontpack.toml file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct Config {
    /// The name of the font, used to name output files.
    pub name: String,

    /// The folder containing one PNG per character, named after the
    /// character's hexadecimal codepoint, like `0041.png`.
    #[serde(default = "default_glyph_folder")]
    pub glyphs: PathBuf,

    /// The characters the font should contain.
    #[serde(default = "default_regions")]
    pub regions: Vec<CharacterRegion>,

    /// The character drawn in place of characters the font doesn't contain.
    /// Its glyph must exist.
    #[serde(default, deserialize_with = "deserialize_character")]
    pub default_character: Option<char>,

    /// Whether the atlas dimensions must be powers of two.
    #[serde(default = "default_true")]
    pub power_of_two: bool,

    /// Whether the atlas must be square.
    #[serde(default)]
    pub square: bool,

    /// Whether transparent edges should be trimmed off of glyphs before they
    /// are packed.
    #[serde(default = "default_true")]
    pub crop: bool,

    /// Where to write the atlas image. Defaults to `<name>.png`.
    #[serde(default)]
    pub output: Option<PathBuf>,

    /// Where to write the glyph layout. Defaults to `<name>.json`.
    #[serde(default)]
    pub manifest: Option<PathBuf>,

    /// The path that this config came from. Paths from this config should be
    /// relative to the folder containing this file.
    #[serde(skip)]
    pub file_path: PathBuf,
}

impl Config {
    pub fn read_from_folder_or_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let meta = fs::metadata(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        if meta.is_file() {
            Self::read_from_file(path)
        } else {
            Self::read_from_folder(path)
        }
    }

    pub fn read_from_folder<P: AsRef<Path>>(folder_path: P) -> Result<Self, ConfigError> {
        let folder_path = folder_path.as_ref();
        let file_path = &folder_path.join(CONFIG_FILENAME);

        Self::read_from_file(file_path)
    }

    pub fn read_from_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = fs::read(path).map_err(|source| ConfigError::Io {
            path: path.to_owned(),
            source,
        })?;

        let mut config = Self::from_slice(&contents).map_err(|source| ConfigError::Toml {
            path: path.to_owned(),
            source,
        })?;
        config.file_path = path.to_owned();

        Ok(config)
    }

    fn from_slice(contents: &[u8]) -> Result<Self, toml::de::Error> {
        toml::from_slice(contents)
    }

    /// The path that paths in this Config should be considered relative to.
    pub fn folder(&self) -> &Path {
        self.file_path.parent().unwrap_or_else(|| Path::new(""))
    }

    pub fn glyph_folder(&self) -> PathBuf {
        self.folder().join(&self.glyphs)
    }

    pub fn output_path(&self) -> PathBuf {
        match &self.output {
            Some(output) => self.folder().join(output),
            None => self.folder().join(format!("{}.png", self.name)),
        }
    }

    pub fn manifest_path(&self) -> PathBuf {
        match &self.manifest {
            Some(manifest) => self.folder().join(manifest),
            None => self.folder().join(format!("{}.json", self.name)),
        }
    }

    /// Every character from every region, in codepoint order and without
    /// duplicates.
    pub fn characters(&self) -> BTreeSet<char> {
        self.regions
            .iter()
            .flat_map(CharacterRegion::characters)
            .chain(self.default_character)
            .collect()
    }
}

fn default_glyph_folder() -> PathBuf {
    PathBuf::from("glyphs")
}

fn default_regions() -> Vec<CharacterRegion> {
    vec![CharacterRegion::default()]
}

fn default_true() -> bool {
    true
}

fn deserialize_character<'de, D: Deserializer<'de>>(
    deserializer: D,
) -> Result<Option<char>, D::Error> {
    let text = <String as Deserialize>::deserialize(deserializer)?;

    CharacterRegion::parse_character(&text)
        .map(Some)
        .map_err(D::Error::custom)
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("{source} in {}", .path.display())]
    Toml {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("{source} in {}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}

impl ConfigError {
    /// Tells whether this ConfigError originated because of a path not
    /// existing.
    pub fn is_not_found(&self) -> bool {
        match self {
            ConfigError::Io { source, .. } => source.kind() == io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn minimal_config() {
        let config = Config::from_slice(b"name = \"Body\"").unwrap();

        assert_eq!(config.name, "Body");
        assert_eq!(config.glyphs, PathBuf::from("glyphs"));
        assert_eq!(config.regions, vec![CharacterRegion::default()]);
        assert_eq!(config.default_character, None);
        assert!(config.power_of_two);
        assert!(!config.square);
        assert!(config.crop);
        assert_eq!(config.characters().len(), 95);
    }

    #[test]
    fn full_config() {
        let source = r#"
            name = "Title"
            glyphs = "art/glyphs"
            regions = ["A-Z", "0x30-0x39", "&#12354;"]
            default-character = "?"
            power-of-two = false
            square = true
            crop = false
            output = "out/title.png"
        "#;

        let mut config = Config::from_slice(source.as_bytes()).unwrap();
        config.file_path = PathBuf::from("fonts/fontpack.toml");

        assert_eq!(config.default_character, Some('?'));
        assert!(!config.power_of_two);
        assert!(config.square);

        let characters = config.characters();
        assert_eq!(characters.len(), 26 + 10 + 1 + 1);
        assert!(characters.contains(&'あ'));
        assert!(characters.contains(&'?'));

        assert_eq!(config.glyph_folder(), PathBuf::from("fonts/art/glyphs"));
        assert_eq!(config.output_path(), PathBuf::from("fonts/out/title.png"));
        assert_eq!(config.manifest_path(), PathBuf::from("fonts/Title.json"));
    }

    #[test]
    fn overlapping_regions_are_merged() {
        let source = r#"
            name = "Overlap"
            regions = ["a-f", "d-h", "e"]
        "#;

        let config = Config::from_slice(source.as_bytes()).unwrap();
        let characters: String = config.characters().into_iter().collect();

        assert_eq!(characters, "abcdefgh");
    }

    #[test]
    fn bad_region_is_an_error() {
        let source = r#"
            name = "Broken"
            regions = ["Z-A"]
        "#;

        assert!(Config::from_slice(source.as_bytes()).is_err());
    }

    #[test]
    fn unknown_fields_are_rejected() {
        assert!(Config::from_slice(b"name = \"x\"\nkerning = true").is_err());
    }
}
