//! Inline style declarations
//!
//! Parses and rewrites the contents of a `style` attribute one property at a
//! time, so editing `color` never disturbs a `transform` the theme set.

use std::fmt;

/// Ordered list of `property: value` pairs from a `style` attribute
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StyleDeclarations {
    entries: Vec<(String, String)>,
}

impl StyleDeclarations {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a raw `style` attribute. Malformed declarations are skipped.
    pub fn parse(text: &str) -> Self {
        let mut entries: Vec<(String, String)> = Vec::new();

        for declaration in split_declarations(text) {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let property = normalize_property(property);
            let value = value.trim();
            if property.is_empty() || value.is_empty() {
                continue;
            }
            // Later declarations win, as in the cascade
            if let Some(existing) = entries.iter_mut().find(|(p, _)| *p == property) {
                existing.1 = value.to_string();
            } else {
                entries.push((property, value.to_string()));
            }
        }

        Self { entries }
    }

    pub fn get(&self, property: &str) -> Option<&str> {
        let property = normalize_property(property);
        self.entries
            .iter()
            .find(|(p, _)| *p == property)
            .map(|(_, v)| v.as_str())
    }

    pub fn contains(&self, property: &str) -> bool {
        self.get(property).is_some()
    }

    pub fn set(&mut self, property: &str, value: &str) {
        let property = normalize_property(property);
        match self.entries.iter_mut().find(|(p, _)| *p == property) {
            Some(existing) => existing.1 = value.trim().to_string(),
            None => self.entries.push((property, value.trim().to_string())),
        }
    }

    /// Returns true if the property was present
    pub fn remove(&mut self, property: &str) -> bool {
        let property = normalize_property(property);
        let before = self.entries.len();
        self.entries.retain(|(p, _)| *p != property);
        self.entries.len() != before
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(p, v)| (p.as_str(), v.as_str()))
    }
}

impl fmt::Display for StyleDeclarations {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, (property, value)) in self.entries.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{}: {};", property, value)?;
        }
        Ok(())
    }
}

/// Normalize a property name to its kebab-case CSS form
///
/// `backgroundColor` → `background-color`, `Font-Size ` → `font-size`.
/// Custom properties (`--brand`) keep their case.
pub fn normalize_property(property: &str) -> String {
    let property = property.trim();
    if property.starts_with("--") {
        return property.to_string();
    }
    if !property.chars().any(|c| c.is_ascii_lowercase()) {
        return property.to_ascii_lowercase();
    }

    let mut normalized = String::with_capacity(property.len() + 4);
    for (i, c) in property.chars().enumerate() {
        if c.is_ascii_uppercase() {
            if i > 0 && !normalized.ends_with('-') {
                normalized.push('-');
            }
            normalized.push(c.to_ascii_lowercase());
        } else {
            normalized.push(c);
        }
    }
    normalized
}

/// Split on `;` outside of parentheses and quotes
fn split_declarations(text: &str) -> Vec<&str> {
    let mut parts = Vec::new();
    let mut depth = 0usize;
    let mut quote: Option<char> = None;
    let mut start = 0;

    for (i, c) in text.char_indices() {
        match (c, quote) {
            ('"' | '\'', None) => quote = Some(c),
            (q, Some(open)) if q == open => quote = None,
            ('(', None) => depth += 1,
            (')', None) => depth = depth.saturating_sub(1),
            (';', None) if depth == 0 => {
                parts.push(&text[start..i]);
                start = i + 1;
            }
            _ => {}
        }
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }

    parts
}
