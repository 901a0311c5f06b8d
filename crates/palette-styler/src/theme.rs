use serde::{Deserialize, Serialize};

use crate::contrast::{readable_text, WHITE};

pub const DEFAULT_FONT: &str = "Arial, sans-serif";
pub const DEFAULT_BACKGROUND: &str = "#0b0b0b";

/// Number of color variables pushed into a page.
pub const SLOT_COUNT: usize = 7;

/// Color/typography descriptor pushed into page contexts.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Theme {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default)]
    pub colors: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub font: Option<String>,
}

impl Theme {
    pub fn new(colors: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: None,
            colors: colors.into_iter().map(Into::into).collect(),
            font: None,
        }
    }

    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_font(mut self, font: impl Into<String>) -> Self {
        self.font = Some(font.into());
        self
    }

    fn color(&self, idx: usize) -> Option<&str> {
        self.colors
            .get(idx)
            .map(|c| c.trim())
            .filter(|c| !c.is_empty())
    }
}

/// Theme with every slot filled and the text color settled.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedTheme {
    pub slots: [String; SLOT_COUNT],
    pub text: String,
    pub font: String,
}

impl ResolvedTheme {
    pub fn resolve(theme: &Theme) -> Self {
        let c = |idx: usize| theme.color(idx);
        let background = c(0).unwrap_or(DEFAULT_BACKGROUND);
        let preferred = c(1).unwrap_or(WHITE);
        let text = readable_text(background, preferred);

        let slots = [
            background.to_string(),
            c(1).unwrap_or(text.as_str()).to_string(),
            c(2).or(c(1)).unwrap_or("#1a73e8").to_string(),
            c(3).or(c(2)).unwrap_or("#444").to_string(),
            c(4).or(c(1)).unwrap_or("#888").to_string(),
            c(5).or(c(0)).unwrap_or("#111").to_string(),
            c(6).or(c(0)).unwrap_or("#222").to_string(),
        ];
        let font = theme
            .font
            .as_deref()
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .unwrap_or(DEFAULT_FONT)
            .to_string();

        Self { slots, text, font }
    }

    pub fn background(&self) -> &str {
        &self.slots[0]
    }
}
