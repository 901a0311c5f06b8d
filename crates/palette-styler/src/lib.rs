//! Page restyling: resolves a [`Theme`] into CSS variables, settles a readable
//! text color, and (re)injects a single stylesheet into a page context.

pub mod catalog;
pub mod contrast;
pub mod css;
pub mod theme;

pub use theme::{ResolvedTheme, Theme};

use async_trait::async_trait;
use thiserror::Error;
use tracing::debug;

use wander_core_types::WanderError;

/// Fixed id of the injected `<style>` element; re-applying replaces it.
pub const STYLE_ELEMENT_ID: &str = "ext-palette-style";

#[derive(Clone, Debug, Error)]
pub enum StyleError {
    #[error("page has no document head")]
    NoDocument,
    #[error("style injection failed: {0}")]
    Injection(String),
}

impl From<StyleError> for WanderError {
    fn from(err: StyleError) -> Self {
        WanderError::new(err.to_string())
    }
}

/// Page-side surface the styler writes into.
#[async_trait]
pub trait StyleHost: Send + Sync {
    /// Removes the style element with `id`; returns whether one existed.
    async fn remove_style(&self, id: &str) -> Result<bool, StyleError>;
    async fn insert_style(&self, id: &str, css: &str) -> Result<(), StyleError>;
}

/// Stylesheet ready for injection.
#[derive(Clone, Debug)]
pub struct Stylesheet {
    pub resolved: ResolvedTheme,
    pub css: String,
}

#[derive(Clone, Copy, Debug, Default)]
pub struct PaletteStyler;

impl PaletteStyler {
    pub fn new() -> Self {
        Self
    }

    pub fn stylesheet(&self, theme: &Theme) -> Stylesheet {
        let resolved = ResolvedTheme::resolve(theme);
        let css = css::render(&resolved);
        Stylesheet { resolved, css }
    }

    /// Replaces any previous injection with one built from `theme`.
    pub async fn apply_theme(
        &self,
        host: &dyn StyleHost,
        theme: &Theme,
    ) -> Result<ResolvedTheme, StyleError> {
        let sheet = self.stylesheet(theme);
        let replaced = host.remove_style(STYLE_ELEMENT_ID).await?;
        host.insert_style(STYLE_ELEMENT_ID, &sheet.css).await?;
        debug!(
            theme = theme.name.as_deref().unwrap_or("custom"),
            replaced,
            text = %sheet.resolved.text,
            "palette injected"
        );
        Ok(sheet.resolved)
    }

    pub async fn clear(&self, host: &dyn StyleHost) -> Result<bool, StyleError> {
        host.remove_style(STYLE_ELEMENT_ID).await
    }
}
