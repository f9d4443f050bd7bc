use std::{
    fmt,
    path::{self, Path},
    sync::Arc,
};

use serde::{Deserialize, Serialize};

/// The name of a sprite in a packed sheet: its path relative to the folder the
/// sprites were collected from, always using `/` as a separator.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SpriteName(Arc<str>);

impl SpriteName {
    /// Paths outside of `root_path` keep their full path as their name.
    pub fn from_paths(root_path: &Path, sprite_path: &Path) -> Self {
        let relative = sprite_path.strip_prefix(root_path).unwrap_or(sprite_path);

        let displayed = format!("{}", relative.display());

        // In order to make relative paths behave cross-platform, fix the path
        // separator to always be / on platforms where it isn't the main separator.
        let displayed = if path::MAIN_SEPARATOR == '/' {
            displayed
        } else {
            displayed.replace(path::MAIN_SEPARATOR, "/")
        };

        SpriteName(displayed.into())
    }
}

impl AsRef<str> for SpriteName {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SpriteName {
    fn fmt(&self, formatter: &mut fmt::Formatter) -> fmt::Result {
        write!(formatter, "{}", self.0)
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn relative_to_root() {
        let root = Path::new("assets");
        let sprite = Path::new("assets").join("ui").join("button.png");

        assert_eq!(SpriteName::from_paths(root, &sprite).as_ref(), "ui/button.png");
    }

    #[test]
    fn outside_root() {
        let name = SpriteName::from_paths(Path::new("assets"), Path::new("other.png"));

        assert_eq!(name.to_string(), "other.png");
    }
}
