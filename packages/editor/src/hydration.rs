//! Saved-state hydration
//!
//! On page load the host hands over previously committed content and
//! styles. Entries are keyed by element id, stable id or selector and may
//! carry their own `selector` / `stable_id` for re-resolution:
//!
//! ```json
//! {
//!   "content": {
//!     "qe-heading-0-home": "Welcome",
//!     "hero": { "content": "Hi", "selector": "body > section:nth-of-type(1)" }
//!   },
//!   "styles": {
//!     "qe-heading-0-home": { "color": "#ff0000" },
//!     "hero": { "styles": "{\"padding\":\"8px\"}", "stable_id": "qe-hero-0-home" }
//!   }
//! }
//! ```

use crate::background::{classify_background, is_background_property};
use crate::locator::{Locator, LocatorChain};
use crate::remote::StylePayload;
use quickedit_common::style::normalize_property;
use quickedit_common::Dom;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, warn};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedContent {
    Entry {
        content: String,
        #[serde(default)]
        selector: Option<String>,
        #[serde(default)]
        stable_id: Option<String>,
    },
    Plain(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SavedStyles {
    Entry {
        styles: StylePayload,
        #[serde(default)]
        selector: Option<String>,
        #[serde(default)]
        stable_id: Option<String>,
    },
    Plain(StylePayload),
}

/// Previously committed edits, as provided by the host page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SavedState {
    #[serde(default)]
    pub content: BTreeMap<String, SavedContent>,
    #[serde(default)]
    pub styles: BTreeMap<String, SavedStyles>,
}

impl SavedState {
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty() && self.styles.is_empty()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HydrationReport {
    /// Entries written to the DOM
    pub applied: usize,
    /// Keys of entries that could not be resolved or decoded
    pub skipped: Vec<String>,
}

/// Resolution chain for one entry: stable id, selector, then bare id
fn chain_for(identity_attribute: &str, key: &str, selector: Option<&str>, stable_id: Option<&str>) -> LocatorChain {
    let mut chain = LocatorChain::default();
    chain.push(Locator::stable_id(identity_attribute, stable_id.unwrap_or(key)));
    if let Some(selector) = selector.filter(|s| !s.is_empty()) {
        chain.push(Locator::Selector(selector.to_string()));
    }
    chain.push(Locator::DomId(key.to_string()));
    if stable_id.is_some() {
        chain.push(Locator::stable_id(identity_attribute, key));
    }
    chain
}

/// Apply saved content and styles to the live document
pub fn hydrate<D: Dom + ?Sized>(dom: &mut D, state: &SavedState, identity_attribute: &str) -> HydrationReport {
    let mut report = HydrationReport::default();

    for (key, entry) in &state.content {
        let (content, selector, stable_id) = match entry {
            SavedContent::Entry { content, selector, stable_id } => {
                (content, selector.as_deref(), stable_id.as_deref())
            }
            SavedContent::Plain(content) => (content, None, None),
        };

        match chain_for(identity_attribute, key, selector, stable_id).locate(&*dom) {
            Some(node) => {
                dom.set_inner_html(node, content);
                report.applied += 1;
            }
            None => {
                warn!(key = %key, selector = ?selector, "Saved content matches no element");
                report.skipped.push(key.clone());
            }
        }
    }

    for (key, entry) in &state.styles {
        let (payload, selector, stable_id) = match entry {
            SavedStyles::Entry { styles, selector, stable_id } => (styles, selector.as_deref(), stable_id.as_deref()),
            SavedStyles::Plain(styles) => (styles, None, None),
        };

        let styles = match payload.decode() {
            Ok(styles) => styles,
            Err(error) => {
                warn!(key = %key, error = %error, "Undecodable saved styles");
                report.skipped.push(key.clone());
                continue;
            }
        };

        let Some(node) = chain_for(identity_attribute, key, selector, stable_id).locate(&*dom) else {
            warn!(key = %key, selector = ?selector, "Saved styles match no element");
            report.skipped.push(key.clone());
            continue;
        };

        let gradient = classify_background(&*dom, node).is_gradient();
        for (property, value) in styles {
            let property = normalize_property(&property);
            if gradient && is_background_property(&property) {
                debug!(key = %key, property = %property, "Skipping background write on gradient element");
                continue;
            }
            dom.set_style_property(node, &property, &value);
        }
        report.applied += 1;
    }

    debug!(applied = report.applied, skipped = report.skipped.len(), "Hydrated saved state");
    report
}
