use std::collections::BTreeMap;

use async_trait::async_trait;
use palette_styler::{catalog, PaletteStyler, StyleError, StyleHost, Theme, STYLE_ELEMENT_ID};
use parking_lot::Mutex;

#[derive(Default)]
struct FakeHead {
    styles: Mutex<BTreeMap<String, String>>,
    detached: bool,
}

#[async_trait]
impl StyleHost for FakeHead {
    async fn remove_style(&self, id: &str) -> Result<bool, StyleError> {
        Ok(self.styles.lock().remove(id).is_some())
    }

    async fn insert_style(&self, id: &str, css: &str) -> Result<(), StyleError> {
        if self.detached {
            return Err(StyleError::NoDocument);
        }
        let mut styles = self.styles.lock();
        assert!(!styles.contains_key(id), "style inserted twice");
        styles.insert(id.to_string(), css.to_string());
        Ok(())
    }
}

#[tokio::test]
async fn reapplying_replaces_previous_stylesheet() {
    let head = FakeHead::default();
    let styler = PaletteStyler::new();

    styler
        .apply_theme(&head, &catalog::by_name("Neon").unwrap().to_theme())
        .await
        .unwrap();
    let resolved = styler
        .apply_theme(&head, &catalog::by_name("Serene").unwrap().to_theme())
        .await
        .unwrap();

    let styles = head.styles.lock();
    assert_eq!(styles.len(), 1);
    let css = styles.get(STYLE_ELEMENT_ID).unwrap();
    assert!(css.contains("--ext-1: #F0F7F4;"));
    assert_eq!(resolved.text, "#000000");
}

#[tokio::test]
async fn clear_removes_injection() {
    let head = FakeHead::default();
    let styler = PaletteStyler::new();
    styler.apply_theme(&head, &Theme::default()).await.unwrap();
    assert!(styler.clear(&head).await.unwrap());
    assert!(!styler.clear(&head).await.unwrap());
}

#[tokio::test]
async fn detached_document_reports_error() {
    let head = FakeHead {
        detached: true,
        ..FakeHead::default()
    };
    let err = PaletteStyler::new()
        .apply_theme(&head, &Theme::default())
        .await
        .unwrap_err();
    assert!(matches!(err, StyleError::NoDocument));
}
