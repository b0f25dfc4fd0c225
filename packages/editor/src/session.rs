//! # Edit Session
//!
//! The single open edit: which element is selected, its snapshot at
//! selection time and the operator's in-progress draft.
//!
//! A session is created by `select`, mutated by every draft change and
//! consumed by save or cancel.

use crate::background::is_background_property;
use crate::element::EditableElement;
use crate::snapshot::{is_tracked, Snapshot};
use chrono::{DateTime, Utc};
use quickedit_common::style::normalize_property;
use std::collections::BTreeMap;

/// Properties offered as draft fields
pub const DRAFT_PROPERTIES: [&str; 8] = [
    "color",
    "font-size",
    "padding",
    "background-color",
    "margin",
    "width",
    "height",
    "border-radius",
];

/// Mutable, unpersisted counterpart of a snapshot
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftEdit {
    pub content: String,
    pub styles: BTreeMap<String, String>,
}

impl DraftEdit {
    /// Prefill from the element's current content and classified styles
    pub fn from_snapshot(snapshot: &Snapshot) -> Self {
        let styles = DRAFT_PROPERTIES
            .iter()
            .filter_map(|property| {
                snapshot
                    .baseline_value(property)
                    .map(|value| (property.to_string(), value.to_string()))
            })
            .collect();

        Self {
            content: snapshot.html().to_string(),
            styles,
        }
    }
}

/// Field values entered by the operator
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DraftFields {
    pub content: Option<String>,
    pub styles: BTreeMap<String, String>,
}

impl DraftFields {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn content(mut self, content: impl Into<String>) -> Self {
        self.content = Some(content.into());
        self
    }

    /// Property names may be camelCase or kebab-case
    pub fn style(mut self, property: &str, value: impl Into<String>) -> Self {
        self.styles.insert(normalize_property(property), value.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_none() && self.styles.is_empty()
    }
}

/// Changes accepted into a draft, ready to be previewed
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AcceptedFields {
    pub content: Option<String>,
    pub styles: Vec<(String, String)>,
    /// Background writes dropped because the element has a gradient
    pub suppressed: Vec<String>,
    /// Properties the editor does not track and therefore cannot revert
    pub rejected: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct EditSession {
    element: EditableElement,
    snapshot: Snapshot,
    draft: DraftEdit,
    has_unsaved_changes: bool,
    opened_at: DateTime<Utc>,
}

impl EditSession {
    pub fn new(element: EditableElement, snapshot: Snapshot) -> Self {
        let draft = DraftEdit::from_snapshot(&snapshot);
        Self {
            element,
            snapshot,
            draft,
            has_unsaved_changes: false,
            opened_at: Utc::now(),
        }
    }

    pub fn element(&self) -> &EditableElement {
        &self.element
    }

    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    pub fn draft(&self) -> &DraftEdit {
        &self.draft
    }

    pub fn has_unsaved_changes(&self) -> bool {
        self.has_unsaved_changes
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// Merge operator input into the draft
    ///
    /// Background properties are dropped for gradient elements and never
    /// reach the draft. Untracked properties are rejected.
    pub fn merge(&mut self, fields: DraftFields) -> AcceptedFields {
        let gradient = self.snapshot.background().is_gradient();
        let mut accepted = AcceptedFields::default();

        if let Some(content) = fields.content {
            self.draft.content = content.clone();
            accepted.content = Some(content);
        }

        for (property, value) in fields.styles {
            if !is_tracked(&property) {
                accepted.rejected.push(property);
                continue;
            }
            if gradient && is_background_property(&property) {
                accepted.suppressed.push(property);
                continue;
            }
            self.draft.styles.insert(property.clone(), value.clone());
            accepted.styles.push((property, value));
        }

        if accepted.content.is_some() || !accepted.styles.is_empty() {
            self.has_unsaved_changes = true;
        }
        accepted
    }

    /// Make the current state the new rollback target after a save
    pub fn rebase(&mut self, snapshot: Snapshot) {
        self.snapshot = snapshot;
        self.has_unsaved_changes = false;
    }
}
