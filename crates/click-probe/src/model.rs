use serde::{Deserialize, Serialize};
use wander_core_types::ElementId;

/// Rendered box in viewport coordinates.
#[derive(Clone, Copy, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    pub fn center(&self) -> (f64, f64) {
        (self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn has_area(&self) -> bool {
        self.width > 0.0 && self.height > 0.0
    }
}

/// What the probe needs to know about one element of the page.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    pub id: ElementId,
    pub tag: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub input_type: Option<String>,
    #[serde(default)]
    pub classes: Vec<String>,
    pub rect: Rect,
    #[serde(default = "default_display")]
    pub display: String,
    #[serde(default = "default_visibility")]
    pub visibility: String,
    #[serde(default = "default_pointer_events")]
    pub pointer_events: String,
    /// Element carries the `data-no-reload` opt-out.
    #[serde(default)]
    pub no_reload: bool,
    #[serde(default)]
    pub parent: Option<ElementId>,
}

fn default_display() -> String {
    "block".into()
}

fn default_visibility() -> String {
    "visible".into()
}

fn default_pointer_events() -> String {
    "auto".into()
}

impl ElementSnapshot {
    pub fn new(id: ElementId, tag: impl Into<String>, rect: Rect) -> Self {
        Self {
            id,
            tag: tag.into(),
            role: None,
            input_type: None,
            classes: Vec::new(),
            rect,
            display: default_display(),
            visibility: default_visibility(),
            pointer_events: default_pointer_events(),
            no_reload: false,
            parent: None,
        }
    }

    pub fn with_role(mut self, role: impl Into<String>) -> Self {
        self.role = Some(role.into());
        self
    }

    pub fn with_input_type(mut self, input_type: impl Into<String>) -> Self {
        self.input_type = Some(input_type.into());
        self
    }

    pub fn with_class(mut self, class: impl Into<String>) -> Self {
        self.classes.push(class.into());
        self
    }

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = display.into();
        self
    }

    pub fn with_visibility(mut self, visibility: impl Into<String>) -> Self {
        self.visibility = visibility.into();
        self
    }

    pub fn with_pointer_events(mut self, pointer_events: impl Into<String>) -> Self {
        self.pointer_events = pointer_events.into();
        self
    }

    pub fn without_reload(mut self) -> Self {
        self.no_reload = true;
        self
    }

    pub fn with_parent(mut self, parent: ElementId) -> Self {
        self.parent = Some(parent);
        self
    }
}

/// Handle for a rendered click marker.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MarkerId(pub u64);

/// Outcome of one auto-explore pass, for logs and tests.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExploreReport {
    pub candidates: usize,
    pub visible: usize,
    pub clicked: Option<ElementId>,
    pub marker_shown: bool,
}

/// What the reload watchdog decided after a click.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ReloadVerdict {
    Navigated,
    Changed,
    Reloaded,
}
