use std::{
    env,
    io::{self, BufReader, BufWriter, Write},
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{anyhow, bail, Context};
use fs_err as fs;

use crate::{
    config::Config,
    glyph::Glyph,
    glyph_cropper::crop_glyph,
    glyph_packer::arrange_glyphs,
    image::Image,
    manifest::{write_manifest, FontManifest, GlyphManifest},
    options::FontOptions,
};

pub fn font(options: FontOptions) -> anyhow::Result<()> {
    let config_path = match options.config_path {
        Some(path) => path,
        None => env::current_dir()?,
    };

    let config = Config::read_from_folder_or_file(&config_path).map_err(|err| {
        if err.is_not_found() {
            anyhow!("Could not find a fontpack.toml at {}", config_path.display())
        } else {
            err.into()
        }
    })?;

    log::trace!("Packing font \"{}\"", config.name);

    for region in &config.regions {
        log::debug!(
            "Including region {} ({:?} to {:?})",
            region,
            region.start(),
            region.end()
        );
    }

    let glyph_folder = config.glyph_folder();
    let mut glyphs = Vec::new();

    for character in config.characters() {
        match load_glyph(&glyph_folder, character)? {
            Some(glyph) => glyphs.push(glyph),
            None if config.default_character == Some(character) => {
                bail!(
                    "The default character {:?} has no glyph image at {}",
                    character,
                    glyph_path(&glyph_folder, character).display()
                );
            }
            None => {
                log::warn!(
                    "Skipping {:?}, which has no glyph image at {}",
                    character,
                    glyph_path(&glyph_folder, character).display()
                );
            }
        }
    }

    if config.crop {
        glyphs.iter_mut().for_each(crop_glyph);
    }

    let atlas = arrange_glyphs(&mut glyphs, config.power_of_two, config.square);

    let output_path = config.output_path();
    write_png(&atlas, &output_path)?;

    let manifest = FontManifest {
        name: config.name.clone(),
        atlas_size: atlas.size(),
        default_character: config.default_character,
        glyphs: glyphs.iter().map(GlyphManifest::from).collect(),
    };
    write_manifest(&manifest, config.manifest_path())?;

    println!(
        "Packed {} glyphs into a {}x{} atlas at {}",
        glyphs.len(),
        atlas.size().0,
        atlas.size().1,
        output_path.display()
    );

    Ok(())
}

/// Glyph images are named after the character's codepoint in hexadecimal,
/// padded to four digits.
fn glyph_path(folder: &Path, character: char) -> PathBuf {
    folder.join(format!("{:04X}.png", character as u32))
}

fn load_glyph(folder: &Path, character: char) -> anyhow::Result<Option<Glyph>> {
    let path = glyph_path(folder, character);

    let file = match fs::File::open(&path) {
        Ok(file) => file,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.into()),
    };

    let bitmap = Image::decode_png(BufReader::new(file))
        .with_context(|| format!("Could not decode glyph image {}", path.display()))?;

    Ok(Some(Glyph::new(character, Arc::new(bitmap))))
}

pub(crate) fn write_png(image: &Image, path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    let mut file = BufWriter::new(fs::File::create(path)?);
    image.encode_png(&mut file)?;
    file.flush()?;

    log::trace!("Saved image to {}", path.display());

    Ok(())
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn glyph_paths() {
        let folder = Path::new("glyphs");

        assert_eq!(glyph_path(folder, 'A'), folder.join("0041.png"));
        assert_eq!(glyph_path(folder, 'あ'), folder.join("3042.png"));
        assert_eq!(glyph_path(folder, '😀'), folder.join("1F600.png"));
    }

    #[test]
    fn missing_glyph_is_none() {
        let folder = Path::new("this-folder-does-not-exist");

        assert!(load_glyph(folder, 'A').unwrap().is_none());
    }
}
