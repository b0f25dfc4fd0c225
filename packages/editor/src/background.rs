//! Background classification
//!
//! Decides whether a style write may touch an element's background.
//! Gradients are never overwritten; everything that cannot be classified
//! with confidence falls back to `transparent`.

use crate::color::parse_color;
use quickedit_common::style::StyleDeclarations;
use quickedit_common::{Dom, NodeId};
use serde::{Deserialize, Serialize};
use tracing::warn;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackgroundKind {
    Gradient,
    Inline,
    Transparent,
    Color,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackgroundClassification {
    pub kind: BackgroundKind,
    /// Gradient function, inline declaration value or resolved hex color
    pub value: String,
}

/// Style properties a gradient element never receives
pub const BACKGROUND_PROPERTIES: [&str; 3] = ["background-color", "background", "background-image"];

impl BackgroundClassification {
    pub fn transparent() -> Self {
        Self {
            kind: BackgroundKind::Transparent,
            value: String::new(),
        }
    }

    pub fn is_gradient(&self) -> bool {
        self.kind == BackgroundKind::Gradient
    }

    /// Background color to prefill drafts with and to diff against
    pub fn baseline_color(&self) -> Option<&str> {
        match self.kind {
            BackgroundKind::Color | BackgroundKind::Inline => Some(self.value.as_str()),
            BackgroundKind::Gradient | BackgroundKind::Transparent => None,
        }
    }
}

/// Whether a property writes to the background
pub fn is_background_property(property: &str) -> bool {
    BACKGROUND_PROPERTIES.contains(&property)
}

/// Classify from raw computed values and the inline `style` attribute
pub fn classify_background_values(
    background_image: &str,
    background_color: &str,
    inline_style: &str,
) -> BackgroundClassification {
    if background_image.to_ascii_lowercase().contains("gradient(") {
        return BackgroundClassification {
            kind: BackgroundKind::Gradient,
            value: background_image.trim().to_string(),
        };
    }

    let color = if background_color.trim().is_empty() {
        None
    } else {
        match parse_color(background_color) {
            Some(color) => Some(color),
            None => {
                warn!(background_color, "Ambiguous background color, treating as transparent");
                return BackgroundClassification::transparent();
            }
        }
    };

    match color {
        Some(color) if !(color.is_transparent() || color.is_white() || color.is_black()) => {
            BackgroundClassification {
                kind: BackgroundKind::Color,
                value: color.to_hex(),
            }
        }
        _ => {
            let inline = StyleDeclarations::parse(inline_style);
            match inline.get("background-color").or_else(|| inline.get("background")) {
                Some(value) => BackgroundClassification {
                    kind: BackgroundKind::Inline,
                    value: value.to_string(),
                },
                None => BackgroundClassification::transparent(),
            }
        }
    }
}

pub fn classify_background<D: Dom + ?Sized>(dom: &D, node: NodeId) -> BackgroundClassification {
    classify_background_values(
        &dom.computed_style(node, "background-image"),
        &dom.computed_style(node, "background-color"),
        &dom.inline_style(node),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use quickedit_common::{ElementSpec, MemoryDom};

    #[test]
    fn test_gradient_wins() {
        let c = classify_background_values("linear-gradient(90deg, red, blue)", "rgb(255, 0, 0)", "");
        assert_eq!(c.kind, BackgroundKind::Gradient);
        assert!(c.is_gradient());
        assert_eq!(c.baseline_color(), None);
    }

    #[test]
    fn test_solid_color_keeps_hex_baseline() {
        let c = classify_background_values("none", "rgb(51, 102, 153)", "");
        assert_eq!(c.kind, BackgroundKind::Color);
        assert_eq!(c.value, "#336699");
        assert_eq!(c.baseline_color(), Some("#336699"));
    }

    #[test]
    fn test_white_with_inline_declaration_is_inline() {
        let c = classify_background_values("none", "rgb(255, 255, 255)", "background-color: #fff; color: red");
        assert_eq!(c.kind, BackgroundKind::Inline);
        assert_eq!(c.value, "#fff");
    }

    #[test]
    fn test_transparent_without_inline_is_transparent() {
        let c = classify_background_values("none", "rgba(0, 0, 0, 0)", "color: red");
        assert_eq!(c, BackgroundClassification::transparent());

        let c = classify_background_values("none", "rgb(0, 0, 0)", "");
        assert_eq!(c.kind, BackgroundKind::Transparent);
    }

    #[test]
    fn test_unparseable_color_is_conservatively_transparent() {
        let c = classify_background_values("none", "color-mix(in srgb, red, blue)", "");
        assert_eq!(c.kind, BackgroundKind::Transparent);
    }

    #[test]
    fn test_classify_from_dom() {
        let mut dom = MemoryDom::new();
        let root = dom.root();
        let hero = dom.append(
            root,
            ElementSpec::new("section").sheet("background-image", "radial-gradient(circle, #fff, #000)"),
        );
        let card = dom.append(root, ElementSpec::new("div").sheet("background-color", "#eeeeee"));

        assert!(classify_background(&dom, hero).is_gradient());
        assert_eq!(classify_background(&dom, card).value, "#eeeeee");
    }
}
