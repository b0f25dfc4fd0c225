use crate::background::{classify_background, BackgroundClassification};
use crate::color::colors_equal;
use quickedit_common::{Dom, NodeId};
use std::collections::BTreeMap;

/// Style properties captured for rollback and offered for editing
pub const TRACKED_PROPERTIES: [&str; 10] = [
    "color",
    "font-size",
    "padding",
    "background-color",
    "background-image",
    "background",
    "margin",
    "width",
    "height",
    "border-radius",
];

pub fn is_tracked(property: &str) -> bool {
    TRACKED_PROPERTIES.contains(&property)
}

/// Immutable capture of an element's state, the target of a rollback
///
/// A new capture replaces a baseline; an existing one is never modified.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Snapshot {
    html: String,
    computed_styles: BTreeMap<String, String>,
    inline_style_text: String,
    background: BackgroundClassification,
}

impl Snapshot {
    pub fn capture<D: Dom + ?Sized>(dom: &D, node: NodeId) -> Self {
        let computed_styles = TRACKED_PROPERTIES
            .iter()
            .map(|property| (property.to_string(), dom.computed_style(node, property)))
            .collect();

        Self {
            html: dom.inner_html(node),
            computed_styles,
            inline_style_text: dom.inline_style(node),
            background: classify_background(dom, node),
        }
    }

    pub fn html(&self) -> &str {
        &self.html
    }

    pub fn computed_styles(&self) -> &BTreeMap<String, String> {
        &self.computed_styles
    }

    pub fn computed(&self, property: &str) -> Option<&str> {
        self.computed_styles.get(property).map(String::as_str)
    }

    pub fn inline_style_text(&self) -> &str {
        &self.inline_style_text
    }

    pub fn background(&self) -> &BackgroundClassification {
        &self.background
    }

    /// Value of `property` as offered in a draft and used for diffing:
    /// the resolved hex color for backgrounds, the computed value otherwise
    pub fn baseline_value(&self, property: &str) -> Option<&str> {
        if property == "background-color" {
            return self.background.baseline_color();
        }
        self.computed(property).filter(|v| !v.is_empty())
    }

    /// Whether a draft `value` for `property` is a change from this capture
    pub fn differs(&self, property: &str, value: &str) -> bool {
        let value = value.trim();
        match self.baseline_value(property) {
            None => !value.is_empty(),
            Some(baseline) if property == "color" || property == "background-color" => {
                !colors_equal(baseline, value)
            }
            Some(baseline) => baseline.trim() != value,
        }
    }
}
