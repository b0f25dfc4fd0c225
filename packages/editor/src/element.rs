use quickedit_common::NodeId;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Classification tag carried by every editable element
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ElementType {
    Header,
    Footer,
    Content,
    Heading,
    Paragraph,
    Image,
    Button,
    Card,
    Template,
    Hero,
    Custom,
}

impl ElementType {
    pub const ALL: [ElementType; 11] = [
        ElementType::Header,
        ElementType::Footer,
        ElementType::Content,
        ElementType::Heading,
        ElementType::Paragraph,
        ElementType::Image,
        ElementType::Button,
        ElementType::Card,
        ElementType::Template,
        ElementType::Hero,
        ElementType::Custom,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ElementType::Header => "header",
            ElementType::Footer => "footer",
            ElementType::Content => "content",
            ElementType::Heading => "heading",
            ElementType::Paragraph => "paragraph",
            ElementType::Image => "image",
            ElementType::Button => "button",
            ElementType::Card => "card",
            ElementType::Template => "template",
            ElementType::Hero => "hero",
            ElementType::Custom => "custom",
        }
    }

    /// Lenient parse used for markup attributes: unknown names are `Custom`
    pub fn from_attribute(value: &str) -> Self {
        value.parse().unwrap_or(ElementType::Custom)
    }
}

impl fmt::Display for ElementType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ElementType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        ElementType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| format!("unknown element type '{}'", s))
    }
}

/// Structural page regions located by the classifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Region {
    Header,
    Footer,
    Content,
}

impl Region {
    pub fn as_str(&self) -> &'static str {
        match self {
            Region::Header => "header",
            Region::Footer => "footer",
            Region::Content => "content",
        }
    }

    pub fn element_type(&self) -> ElementType {
        match self {
            Region::Header => ElementType::Header,
            Region::Footer => ElementType::Footer,
            Region::Content => ElementType::Content,
        }
    }

    pub fn from_attribute(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "header" => Some(Region::Header),
            "footer" => Some(Region::Footer),
            "content" => Some(Region::Content),
            _ => None,
        }
    }
}

/// A live node plus its durable identity and classification
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EditableElement {
    pub node: NodeId,
    pub stable_id: String,
    pub element_type: ElementType,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_element_type_parsing() {
        assert_eq!("Heading".parse::<ElementType>(), Ok(ElementType::Heading));
        assert!("widget".parse::<ElementType>().is_err());
        assert_eq!(ElementType::from_attribute("widget"), ElementType::Custom);
    }

    #[test]
    fn test_element_type_serializes_lowercase() {
        let json = serde_json::to_string(&ElementType::Paragraph).unwrap();
        assert_eq!(json, "\"paragraph\"");
    }
}
