//! # Rollback Manager
//!
//! Restores edited elements to captured snapshots.
//!
//! Restoring is surgical: markup first, then each tracked property on its
//! own, then the inline `style` attribute verbatim. Properties the editor
//! never tracks are left as they are unless the original inline text brings
//! them back.
//!
//! Two snapshots are kept per stable id:
//!
//! - the *original*, captured on first selection and replaced by the
//!   committed state once a commit is confirmed; the target of `revert_all`
//! - the *baseline*, the first capture ever made in this editor, which
//!   staged style maps are diffed against

use crate::locator::{Locator, LocatorChain};
use crate::pending::{PendingEdit, PendingQueue};
use crate::snapshot::{Snapshot, TRACKED_PROPERTIES};
use quickedit_common::style::StyleDeclarations;
use quickedit_common::{Dom, NodeId};
use std::collections::HashMap;
use tracing::{debug, warn};

/// Outcome of a `revert_all` pass
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RevertReport {
    pub reverted: Vec<String>,
    /// Keys whose element or original could not be found
    pub skipped: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct RollbackManager {
    identity_attribute: String,
    originals: HashMap<String, Snapshot>,
    baselines: HashMap<String, Snapshot>,
}

impl RollbackManager {
    pub fn new(identity_attribute: impl Into<String>) -> Self {
        Self {
            identity_attribute: identity_attribute.into(),
            originals: HashMap::new(),
            baselines: HashMap::new(),
        }
    }

    /// Record `snapshot` as the original unless one is already held
    pub fn remember_original(&mut self, stable_id: &str, snapshot: &Snapshot) -> bool {
        self.baselines
            .entry(stable_id.to_string())
            .or_insert_with(|| snapshot.clone());
        if self.originals.contains_key(stable_id) {
            return false;
        }
        self.originals.insert(stable_id.to_string(), snapshot.clone());
        true
    }

    pub fn original(&self, stable_id: &str) -> Option<&Snapshot> {
        self.originals.get(stable_id)
    }

    pub fn baseline(&self, stable_id: &str) -> Option<&Snapshot> {
        self.baselines.get(stable_id)
    }

    /// Make the committed state the new original
    pub fn rebase(&mut self, stable_id: &str, committed: Snapshot) {
        self.originals.insert(stable_id.to_string(), committed);
    }

    pub fn forget_originals(&mut self) {
        self.originals.clear();
    }

    /// Restore `node` to `snapshot`
    pub fn revert_to<D: Dom + ?Sized>(&self, dom: &mut D, node: NodeId, snapshot: &Snapshot) {
        restore_snapshot(dom, node, snapshot);
    }

    /// Restore the element carrying `stable_id` to its original
    pub fn revert<D: Dom + ?Sized>(&self, dom: &mut D, stable_id: &str) -> bool {
        let Some(original) = self.originals.get(stable_id) else {
            warn!(stable_id, "No original snapshot to revert to");
            return false;
        };
        let chain = LocatorChain::new(vec![Locator::stable_id(&self.identity_attribute, stable_id)]);
        match chain.locate(&*dom) {
            Some(node) => {
                self.revert_to(dom, node, original);
                true
            }
            None => {
                warn!(stable_id, "Element to revert no longer resolves");
                false
            }
        }
    }

    /// Revert every element in `queue` to its original
    ///
    /// Elements are located by stable id, then by stored selector, then by
    /// DOM id. Entries that cannot be resolved are logged and skipped.
    pub fn revert_all<D: Dom + ?Sized>(&self, dom: &mut D, queue: &PendingQueue) -> RevertReport {
        let mut report = RevertReport::default();

        for (stable_id, edit) in queue {
            let Some(original) = self.originals.get(stable_id) else {
                warn!(stable_id = %stable_id, "No original snapshot to revert to");
                report.skipped.push(stable_id.clone());
                continue;
            };

            match self.locator_for(edit).locate(&*dom) {
                Some(node) => {
                    self.revert_to(dom, node, original);
                    report.reverted.push(stable_id.clone());
                }
                None => {
                    warn!(stable_id = %stable_id, selector = %edit.selector, "Element to revert no longer resolves");
                    report.skipped.push(stable_id.clone());
                }
            }
        }

        debug!(
            reverted = report.reverted.len(),
            skipped = report.skipped.len(),
            "Reverted pending edits"
        );
        report
    }

    /// Lookup chain for a staged edit
    pub fn locator_for(&self, edit: &PendingEdit) -> LocatorChain {
        let mut chain = LocatorChain::new(vec![Locator::stable_id(&self.identity_attribute, &edit.stable_id)]);
        if !edit.selector.is_empty() {
            chain.push(Locator::Selector(edit.selector.clone()));
        }
        if !edit.element_id.is_empty() {
            chain.push(Locator::DomId(edit.element_id.clone()));
        }
        chain
    }
}

/// Restore `node` to `snapshot`: markup, each tracked property, then the
/// inline `style` attribute
pub fn restore_snapshot<D: Dom + ?Sized>(dom: &mut D, node: NodeId, snapshot: &Snapshot) {
    dom.set_inner_html(node, snapshot.html());

    let original_inline = StyleDeclarations::parse(snapshot.inline_style_text());
    for property in TRACKED_PROPERTIES {
        match original_inline.get(property) {
            Some(value) => dom.set_style_property(node, property, value),
            None => dom.remove_style_property(node, property),
        }
    }

    if snapshot.inline_style_text().trim().is_empty() {
        // Only tracked properties are editor-introduced; they are gone now
        for property in TRACKED_PROPERTIES {
            dom.remove_style_property(node, property);
        }
    } else {
        dom.set_attribute(node, "style", snapshot.inline_style_text());
    }
}
