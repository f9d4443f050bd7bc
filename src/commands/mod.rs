mod font;
mod sprites;

pub use font::*;
pub use sprites::*;
