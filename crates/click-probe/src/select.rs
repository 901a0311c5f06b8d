use crate::model::ElementSnapshot;

/// Mirrors `a, button, [role=button], input[type=button], input[type=submit], .btn`.
pub fn is_interactive(element: &ElementSnapshot) -> bool {
    let tag = element.tag.to_ascii_lowercase();
    if tag == "a" || tag == "button" {
        return true;
    }
    if element
        .role
        .as_deref()
        .is_some_and(|role| role.eq_ignore_ascii_case("button"))
    {
        return true;
    }
    if tag == "input"
        && element
            .input_type
            .as_deref()
            .is_some_and(|kind| kind.eq_ignore_ascii_case("button") || kind.eq_ignore_ascii_case("submit"))
    {
        return true;
    }
    element.classes.iter().any(|class| class == "btn")
}

pub fn is_visible(element: &ElementSnapshot) -> bool {
    element.rect.has_area()
        && element.display != "none"
        && element.visibility != "hidden"
        && element.pointer_events != "none"
}

/// Nearest element of `path` (event target first, then its ancestors)
/// matching the interactive selector set.
pub fn closest_interactive(path: &[ElementSnapshot]) -> Option<&ElementSnapshot> {
    path.iter().find(|element| is_interactive(element))
}

pub fn clickable(elements: &[ElementSnapshot]) -> Vec<&ElementSnapshot> {
    elements
        .iter()
        .filter(|element| is_interactive(element) && is_visible(element))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Rect;
    use wander_core_types::ElementId;

    fn el(id: u64, tag: &str) -> ElementSnapshot {
        ElementSnapshot::new(ElementId(id), tag, Rect::new(0.0, 0.0, 40.0, 20.0))
    }

    #[test]
    fn matches_interactive_selectors() {
        assert!(is_interactive(&el(1, "A")));
        assert!(is_interactive(&el(2, "button")));
        assert!(is_interactive(&el(3, "div").with_role("button")));
        assert!(is_interactive(&el(4, "input").with_input_type("submit")));
        assert!(is_interactive(&el(5, "span").with_class("btn")));
        assert!(!is_interactive(&el(6, "input").with_input_type("text")));
        assert!(!is_interactive(&el(7, "div").with_class("btn-primary")));
    }

    #[test]
    fn filters_hidden_and_empty_boxes() {
        let zero = ElementSnapshot::new(ElementId(1), "a", Rect::new(0.0, 0.0, 0.0, 10.0));
        let hidden = el(2, "a").with_visibility("hidden");
        let none = el(3, "a").with_display("none");
        let inert = el(4, "a").with_pointer_events("none");
        let shown = el(5, "a");
        let all = vec![zero, hidden, none, inert, shown];
        let picked = clickable(&all);
        assert_eq!(picked.len(), 1);
        assert_eq!(picked[0].id, ElementId(5));
    }

    #[test]
    fn closest_interactive_walks_up_the_path() {
        let icon = el(1, "svg").with_parent(ElementId(2));
        let label = el(2, "span").with_parent(ElementId(3));
        let link = el(3, "a");
        let path = vec![icon.clone(), label, link];
        assert_eq!(closest_interactive(&path).map(|found| found.id), Some(ElementId(3)));
        assert!(closest_interactive(&[icon]).is_none());
    }
}
