//! Display preferences and the palettes they select.

use serde::{Deserialize, Serialize};

/// Light or dark appearance.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    #[default]
    Light,
    Dark,
}

impl ThemeMode {
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Light => Self::Dark,
            Self::Dark => Self::Light,
        }
    }

    /// Storage representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Light => "light",
            Self::Dark => "dark",
        }
    }

    /// Parse the storage representation; anything unknown is `None`.
    #[must_use]
    pub fn from_stored(value: &str) -> Option<Self> {
        match value.trim() {
            "light" => Some(Self::Light),
            "dark" => Some(Self::Dark),
            _ => None,
        }
    }

    #[must_use]
    pub const fn palette(self) -> Palette {
        match self {
            Self::Light => Palette::LIGHT,
            Self::Dark => Palette::DARK,
        }
    }
}

/// Colours used by every view, as CSS colour strings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub background: [&'static str; 3],
    pub card_background: [&'static str; 2],
    pub text_primary: &'static str,
    pub text_secondary: &'static str,
    pub accent: &'static str,
}

impl Palette {
    pub const LIGHT: Self = Self {
        background: [
            "rgba(46, 125, 50, 0.98)",
            "rgba(33, 150, 243, 0.96)",
            "rgba(0, 0, 0, 0.85)",
        ],
        card_background: ["rgba(255, 255, 255, 0.95)", "rgba(255, 255, 255, 0.9)"],
        text_primary: "#333333",
        text_secondary: "#666666",
        accent: "#4CAF50",
    };

    pub const DARK: Self = Self {
        background: [
            "rgba(18, 32, 47, 0.98)",
            "rgba(25, 39, 52, 0.96)",
            "rgba(0, 0, 0, 0.95)",
        ],
        card_background: ["rgba(40, 44, 52, 0.95)", "rgba(35, 39, 47, 0.9)"],
        text_primary: "#FFFFFF",
        text_secondary: "#B0B0B0",
        accent: "#66BB6A",
    };
}

/// The user's display preferences.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DisplaySettings {
    pub theme: ThemeMode,
    pub background_animation: bool,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            theme: ThemeMode::Light,
            background_animation: true,
        }
    }
}

impl DisplaySettings {
    #[must_use]
    pub const fn palette(&self) -> Palette {
        self.theme.palette()
    }

    #[must_use]
    pub const fn is_dark(&self) -> bool {
        matches!(self.theme, ThemeMode::Dark)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_round_trip() {
        assert_eq!(ThemeMode::Light.toggled(), ThemeMode::Dark);
        assert_eq!(ThemeMode::Dark.toggled().toggled(), ThemeMode::Dark);
    }

    #[test]
    fn test_stored_representation() {
        for mode in [ThemeMode::Light, ThemeMode::Dark] {
            assert_eq!(ThemeMode::from_stored(mode.as_str()), Some(mode));
        }
        assert_eq!(ThemeMode::from_stored("sepia"), None);
    }

    #[test]
    fn test_palette_follows_theme() {
        let mut settings = DisplaySettings::default();
        assert_eq!(settings.palette().accent, "#4CAF50");
        assert!(settings.background_animation);

        settings.theme = ThemeMode::Dark;
        assert!(settings.is_dark());
        assert_eq!(settings.palette().text_primary, "#FFFFFF");
    }
}
