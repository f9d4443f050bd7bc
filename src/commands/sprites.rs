use std::{collections::BTreeMap, ffi::OsStr, io::BufReader};

use anyhow::{bail, Context};
use binpack::MaxRectsBin;
use fs_err as fs;
use walkdir::WalkDir;

use crate::{
    commands::font::write_png,
    image::Image,
    manifest::{write_manifest, SpriteManifest, SpriteSlice},
    options::SpritesOptions,
    sprite_name::SpriteName,
};

pub fn sprites(options: SpritesOptions) -> anyhow::Result<()> {
    let manifest_path = options
        .manifest
        .clone()
        .unwrap_or_else(|| options.output.with_extension("json"));

    let sprites = collect_sprites(&options)?;

    if sprites.is_empty() {
        bail!("No PNG images found in {}", options.folder.display());
    }

    let mut bin = MaxRectsBin::new(
        options.width,
        options.height,
        options.grow,
        options.grow_increment,
        options.rotate,
    );
    bin.set_padding(options.padding, options.padding);
    bin.set_grow_limit(options.grow_limit)?;

    let sizes: Vec<_> = sprites.iter().map(|(_, image)| image.size()).collect();
    let bounds = bin.insert_all(&sizes, options.heuristic)?;

    let sheet_size = (bin.used_width(), bin.used_height());
    let mut sheet = Image::new_empty_rgba8(sheet_size);
    let mut slices = BTreeMap::new();

    for ((name, image), rect) in sprites.iter().zip(&bounds) {
        // Rotated placements come back with their width and height swapped.
        let rotated = rect.width != image.size().0;

        if rotated {
            let rotated_image = image.rotated_clockwise();
            sheet.blit(&rotated_image, rotated_image.bounds(), rect.position());
        } else {
            sheet.blit(image, image.bounds(), rect.position());
        }

        slices.insert(
            name.clone(),
            SpriteSlice {
                slice: (*rect).into(),
                rotated,
            },
        );
    }

    write_png(&sheet, &options.output)?;

    let manifest = SpriteManifest {
        sheet_size,
        sprites: slices,
    };
    write_manifest(&manifest, &manifest_path)?;

    println!(
        "Packed {} sprites into a {}x{} sheet at {} ({:.1}% occupied)",
        sprites.len(),
        sheet_size.0,
        sheet_size.1,
        options.output.display(),
        bin.occupancy(true) * 100.0
    );

    Ok(())
}

/// Decodes every PNG under the sprite folder, in a stable order. The output
/// sheet is skipped in case it was written inside the folder by an earlier
/// run.
fn collect_sprites(options: &SpritesOptions) -> anyhow::Result<Vec<(SpriteName, Image)>> {
    let mut sprites = Vec::new();
    let walker = WalkDir::new(&options.folder).sort_by(|a, b| a.file_name().cmp(b.file_name()));

    for entry in walker {
        let entry = entry?;
        let path = entry.path();

        if !entry.file_type().is_file() || path.extension() != Some(OsStr::new("png")) {
            continue;
        }

        if path == options.output.as_path() {
            log::debug!("Skipping the output sheet {}", path.display());
            continue;
        }

        let file = BufReader::new(fs::File::open(path)?);
        let image = Image::decode_png(file)
            .with_context(|| format!("Could not decode sprite {}", path.display()))?;

        log::trace!("Found sprite {} ({:?})", path.display(), image.size());

        sprites.push((SpriteName::from_paths(&options.folder, path), image));
    }

    Ok(sprites)
}
