mod character_region;
mod commands;
mod config;
mod glyph;
mod glyph_cropper;
mod glyph_packer;
mod image;
mod manifest;
mod options;
mod sprite_name;

use std::process;

use structopt::StructOpt;

use crate::options::{Options, Subcommand};

fn main() {
    env_logger::init();

    let options = Options::from_args();

    match run(options) {
        Ok(_) => {}
        Err(err) => {
            eprintln!("Error: {:?}", err);
            process::exit(1);
        }
    }
}

fn run(options: Options) -> anyhow::Result<()> {
    match options.command {
        Subcommand::Font(font_options) => commands::font(font_options)?,
        Subcommand::Sprites(sprites_options) => commands::sprites(sprites_options)?,
    }

    Ok(())
}
