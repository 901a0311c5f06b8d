//! Stylesheet text injected into page contexts.

use std::fmt::Write;

use crate::theme::ResolvedTheme;

/// Elements that keep their native look (embedded frames and dialogs).
const PRESERVED: &str = "iframe, embed, object, [role=\"dialog\"], [role=\"alertdialog\"], .modal, .dialog";
const PRESERVED_DESCENDANTS: &str = "iframe *, embed *, object *, [role=\"dialog\"] *, [role=\"alertdialog\"] *, .modal *, .dialog *";
const ICON_SVGS: &str = "svg[class*=\"icon\"], svg[class*=\"status\"], svg[role=\"img\"]";
const ICON_SVG_DESCENDANTS: &str = "svg[class*=\"icon\"] *, svg[class*=\"status\"] *, svg[role=\"img\"] *";

fn root_variables(theme: &ResolvedTheme) -> String {
    let mut out = String::from(":root {");
    for (idx, value) in theme.slots.iter().enumerate() {
        let _ = write!(out, " --ext-{}: {};", idx + 1, value);
    }
    let _ = write!(
        out,
        " --ext-text: {}; --ext-font: {}; }}",
        theme.text, theme.font
    );
    out
}

/// Renders the full page override stylesheet.
pub fn render(theme: &ResolvedTheme) -> String {
    let mut css = root_variables(theme);
    css.push('\n');

    let rules: [(&str, &str); 16] = [
        (
            "*",
            "background-color: var(--ext-1) !important; color: var(--ext-text) !important; \
             font-family: var(--ext-font) !important; background-image: none !important; \
             box-shadow: none !important; text-shadow: none !important; \
             border-color: var(--ext-3) !important;",
        ),
        (
            PRESERVED,
            "background-color: revert !important; color: revert !important; \
             box-shadow: revert !important; border-color: revert !important;",
        ),
        (
            PRESERVED_DESCENDANTS,
            "background-color: revert !important; color: revert !important; \
             box-shadow: revert !important; border-color: revert !important; \
             background-image: revert !important;",
        ),
        (ICON_SVGS, "fill: revert !important; stroke: revert !important;"),
        (
            ICON_SVG_DESCENDANTS,
            "fill: revert !important; stroke: revert !important;",
        ),
        (
            "body, html, main, section, article, header, nav, footer, aside, div, p, ul, ol, li, table, tr, td, th",
            "background-color: var(--ext-1) !important; color: var(--ext-text) !important;",
        ),
        ("a, a *", "color: var(--ext-3) !important;"),
        (
            "svg:not([class*=\"icon\"]):not([class*=\"status\"]):not([role=\"img\"]) *",
            "fill: var(--ext-3) !important; stroke: var(--ext-3) !important;",
        ),
        (
            "button, input[type=button], input[type=submit], .btn",
            "background-color: var(--ext-4) !important; color: var(--ext-text) !important; \
             border-color: var(--ext-3) !important;",
        ),
        (
            "input, textarea, select, option",
            "background-color: var(--ext-7) !important; color: var(--ext-text) !important; \
             border-color: var(--ext-3) !important;",
        ),
        (
            "h1, h2, h3, h4, h5, h6, strong, b",
            "color: var(--ext-5) !important;",
        ),
        (
            "nav, header, footer",
            "background-color: var(--ext-6) !important; color: var(--ext-text) !important;",
        ),
        (
            "img, video, picture",
            "filter: saturate(0.4) brightness(0.95) !important; opacity: 0.85 !important; \
             mix-blend-mode: overlay !important;",
        ),
        (
            "pre, code, kbd, samp",
            "background-color: var(--ext-7) !important; color: var(--ext-text) !important;",
        ),
        (":focus", "outline-color: var(--ext-4) !important;"),
        (
            "textarea, input, [contenteditable]",
            "caret-color: var(--ext-3) !important;",
        ),
    ];

    for (selector, body) in rules {
        let _ = writeln!(css, "{selector} {{ {body} }}");
    }
    let _ = writeln!(
        css,
        "*:not(iframe):not(embed):not(object):not([role=\"dialog\"]):not([role=\"alertdialog\"]):not(.modal):not(.dialog) {{ border-color: var(--ext-3) !important; }}"
    );
    let _ = writeln!(
        css,
        "::placeholder {{ color: rgba(255,255,255,0.7) !important; }}"
    );
    css
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::theme::Theme;

    fn rendered(colors: &[&str]) -> String {
        render(&ResolvedTheme::resolve(&Theme::new(colors.iter().copied())))
    }

    #[test]
    fn declares_all_variables() {
        let css = rendered(&["#0A0E27", "#1A1A2E"]);
        for n in 1..=7 {
            assert!(css.contains(&format!("--ext-{n}:")), "missing slot {n}");
        }
        assert!(css.contains("--ext-text: #ffffff;"));
        assert!(css.contains("--ext-font: Arial, sans-serif;"));
    }

    #[test]
    fn keeps_native_styling_for_frames_dialogs_and_icons() {
        let css = rendered(&[]);
        assert!(css.contains("iframe, embed, object, [role=\"dialog\"]"));
        assert!(css.contains("svg[role=\"img\"] *"));
        assert!(css.contains("fill: revert !important"));
    }

    #[test]
    fn media_is_softened_not_recolored() {
        let css = rendered(&[]);
        assert!(css.contains("img, video, picture { filter: saturate(0.4) brightness(0.95)"));
    }

    #[test]
    fn rendering_is_deterministic() {
        assert_eq!(rendered(&["#111111"]), rendered(&["#111111"]));
    }
}
