//! Built-in named palettes offered by the picker and the CLI.

use crate::theme::Theme;

pub struct PaletteEntry {
    pub name: &'static str,
    pub colors: [&'static str; 7],
}

impl PaletteEntry {
    pub fn to_theme(&self) -> Theme {
        Theme::new(self.colors).named(self.name)
    }
}

pub const PALETTES: [PaletteEntry; 9] = [
    PaletteEntry {
        name: "Tropical",
        colors: ["#FFFAF5", "#FFE5CC", "#FFB547", "#FF8A65", "#00897B", "#004D40", "#37474F"],
    },
    PaletteEntry {
        name: "Dark",
        colors: ["#F5F5F5", "#E0E0E0", "#1A237E", "#283593", "#3F51B5", "#512DA8", "#0D47A1"],
    },
    PaletteEntry {
        name: "Pink",
        colors: ["#FFF5F7", "#FFE5EC", "#FF80AB", "#FF4081", "#D81B60", "#880E4F", "#433A4B"],
    },
    PaletteEntry {
        name: "Rainbow",
        colors: ["#FFFE50", "#B6E86B", "#52B788", "#2D95DE", "#6C5CE7", "#C83E4D", "#FD7272"],
    },
    PaletteEntry {
        name: "Ocean",
        colors: ["#E8F4F8", "#B3E5FC", "#4DD0E1", "#0097A7", "#00838F", "#00546B", "#263238"],
    },
    PaletteEntry {
        name: "Retro",
        colors: ["#FEF5E7", "#F9E79F", "#F5B041", "#E67E22", "#D35400", "#78281F", "#2C3E50"],
    },
    PaletteEntry {
        name: "Autumn",
        colors: ["#FDEBD0", "#F8B88B", "#E59866", "#D68910", "#BA4A00", "#7B241C", "#2C1810"],
    },
    PaletteEntry {
        name: "Neon",
        colors: ["#0A0E27", "#1A1A2E", "#10FF00", "#FF006E", "#8338EC", "#FB5607", "#FFBE0B"],
    },
    PaletteEntry {
        name: "Serene",
        colors: ["#F0F7F4", "#D1E8E4", "#A8D8D8", "#6DBCD0", "#4A95A4", "#2E5F6C", "#1E3D43"],
    },
];

/// Palette at `index`, wrapping past the end of the catalog.
pub fn by_index(index: usize) -> &'static PaletteEntry {
    &PALETTES[index % PALETTES.len()]
}

pub fn by_name(name: &str) -> Option<&'static PaletteEntry> {
    PALETTES
        .iter()
        .find(|entry| entry.name.eq_ignore_ascii_case(name.trim()))
}

/// Accepts either a catalog index or a palette name.
pub fn lookup(key: &str) -> Option<&'static PaletteEntry> {
    match key.trim().parse::<usize>() {
        Ok(index) => Some(by_index(index)),
        Err(_) => by_name(key),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::contrast::is_valid_hex;

    #[test]
    fn catalog_colors_are_valid_hex() {
        for entry in &PALETTES {
            for color in entry.colors {
                assert!(is_valid_hex(color), "{} has bad color {}", entry.name, color);
            }
        }
    }

    #[test]
    fn index_wraps() {
        assert_eq!(by_index(0).name, "Tropical");
        assert_eq!(by_index(9).name, "Tropical");
        assert_eq!(by_index(16).name, "Neon");
    }

    #[test]
    fn lookup_by_name_or_index() {
        assert_eq!(lookup("ocean").map(|p| p.name), Some("Ocean"));
        assert_eq!(lookup("3").map(|p| p.name), Some("Rainbow"));
        assert!(lookup("mauve").is_none());
    }

    #[test]
    fn theme_conversion_keeps_name() {
        let theme = by_name("Serene").unwrap().to_theme();
        assert_eq!(theme.name.as_deref(), Some("Serene"));
        assert_eq!(theme.colors[0], "#F0F7F4");
    }
}
