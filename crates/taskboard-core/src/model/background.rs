// ── Board backgrounds ──

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

/// Preset background images offered when creating or editing a board.
pub const PRESET_IMAGES: [&str; 4] = [
    "https://images.unsplash.com/photo-1506905925346-21bda4d32df4?w=400",
    "https://images.unsplash.com/photo-1518837695005-2083093ee35b?w=400",
    "https://images.unsplash.com/photo-1441974231531-c6227db76b6e?w=400",
    "https://images.unsplash.com/photo-1511497584788-876760111969?w=400",
];

/// Preset gradient backgrounds.
pub const PRESET_COLORS: [&str; 6] = [
    "linear-gradient(122.53deg, #FFB100 0%, #FA0C00 100%)",
    "linear-gradient(122.53deg, #2609FF 0%, #D20CFF 100%)",
    "linear-gradient(122.53deg, #00FF2F 0%, #00FFC8 100%)",
    "linear-gradient(122.53deg, #00FFE5 0%, #004BFA 100%)",
    "linear-gradient(122.53deg, #FFA200 0%, #EDFA00 100%)",
    "linear-gradient(122.53deg, #FF00EA 0%, #FA0C00 100%)",
];

/// Discriminator for [`Background`].
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString, AsRefStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum BackgroundKind {
    Image,
    Color,
}

/// A board's visual background: an image URL or a CSS color/gradient.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "lowercase")]
pub enum Background {
    Image(String),
    Color(String),
}

impl Background {
    pub fn new(kind: BackgroundKind, value: impl Into<String>) -> Self {
        match kind {
            BackgroundKind::Image => Self::Image(value.into()),
            BackgroundKind::Color => Self::Color(value.into()),
        }
    }

    /// Preset image `index` (wrapping), used by `--preset` style pickers.
    pub fn preset_image(index: usize) -> Self {
        Self::Image(PRESET_IMAGES[index % PRESET_IMAGES.len()].to_owned())
    }

    /// Preset gradient `index` (wrapping).
    pub fn preset_color(index: usize) -> Self {
        Self::Color(PRESET_COLORS[index % PRESET_COLORS.len()].to_owned())
    }

    pub fn kind(&self) -> BackgroundKind {
        match self {
            Self::Image(_) => BackgroundKind::Image,
            Self::Color(_) => BackgroundKind::Color,
        }
    }

    pub fn value(&self) -> &str {
        match self {
            Self::Image(v) | Self::Color(v) => v,
        }
    }
}

impl Default for Background {
    fn default() -> Self {
        Self::preset_image(0)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn default_is_first_preset_image() {
        let bg = Background::default();
        assert_eq!(bg.kind(), BackgroundKind::Image);
        assert_eq!(bg.value(), PRESET_IMAGES[0]);
    }

    #[test]
    fn presets_wrap_around() {
        assert_eq!(Background::preset_color(6), Background::preset_color(0));
        assert_eq!(Background::preset_image(5).value(), PRESET_IMAGES[1]);
    }

    #[test]
    fn kind_parses_case_insensitively() {
        assert_eq!("Color".parse::<BackgroundKind>().unwrap(), BackgroundKind::Color);
        assert_eq!(BackgroundKind::Image.to_string(), "image");
        assert!("video".parse::<BackgroundKind>().is_err());
    }
}
