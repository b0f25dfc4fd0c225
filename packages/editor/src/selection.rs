//! # Selection Controller
//!
//! Owns the single open [`EditSession`].
//!
//! ```text
//!          select                update_draft
//!  Idle ──────────► Selected ──────────────► Editing
//!   ▲                  ▲                        │
//!   │                  └──── save (local) ──────┤
//!   │                                           │ save (remote)
//!   ├────────────── commit settled ◄─ Committing┘
//!   └────────────── cancel / close ◄─ Selected | Editing
//! ```
//!
//! Opening a session while another one has unsaved changes reverts the
//! old element first. Draft changes are previewed on the live node and
//! nothing here persists them.

use crate::element::EditableElement;
use crate::errors::{EditorError, EditorResult};
use crate::rollback::restore_snapshot;
use crate::session::{AcceptedFields, DraftFields, EditSession};
use crate::snapshot::Snapshot;
use quickedit_common::Dom;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EditorPhase {
    #[default]
    Idle,
    Selected,
    Editing,
    Committing,
}

#[derive(Debug, Default)]
pub struct SelectionController {
    session: Option<EditSession>,
    phase: EditorPhase,
}

impl SelectionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> EditorPhase {
        self.phase
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.session.as_ref()
    }

    pub fn is_active(&self) -> bool {
        self.session.is_some()
    }

    /// Open a session on `element`, resolving any open one first
    pub fn select<D: Dom + ?Sized>(&mut self, dom: &mut D, element: EditableElement) -> EditorResult<&EditSession> {
        if !dom.is_attached(element.node) {
            return Err(EditorError::Detached(element.stable_id));
        }
        self.close(dom);

        let snapshot = Snapshot::capture(&*dom, element.node);
        info!(
            stable_id = %element.stable_id,
            element_type = %element.element_type,
            background = ?snapshot.background().kind,
            "Selected element"
        );

        self.phase = EditorPhase::Selected;
        Ok(&*self.session.insert(EditSession::new(element, snapshot)))
    }

    /// Merge `fields` into the draft and preview them on the live node
    pub fn update_draft<D: Dom + ?Sized>(&mut self, dom: &mut D, fields: DraftFields) -> EditorResult<AcceptedFields> {
        let session = self.session.as_mut().ok_or(EditorError::NoActiveSession)?;
        let node = session.element().node;
        if !dom.is_attached(node) {
            return Err(EditorError::Detached(session.element().stable_id.clone()));
        }

        let accepted = session.merge(fields);
        if let Some(content) = &accepted.content {
            dom.set_inner_html(node, content);
        }
        for (property, value) in &accepted.styles {
            dom.set_style_property(node, property, value);
        }
        for property in &accepted.suppressed {
            debug!(
                stable_id = %session.element().stable_id,
                property = %property,
                "Suppressed background change on gradient element"
            );
        }
        if !accepted.rejected.is_empty() {
            warn!(
                stable_id = %session.element().stable_id,
                rejected = ?accepted.rejected,
                "Ignored untracked style properties"
            );
        }

        if self.phase != EditorPhase::Committing {
            self.phase = EditorPhase::Editing;
        }
        Ok(accepted)
    }

    /// Accept the previewed state as the session's new rollback target
    pub fn mark_saved<D: Dom + ?Sized>(&mut self, dom: &D) -> EditorResult<&EditSession> {
        let session = self.session.as_mut().ok_or(EditorError::NoActiveSession)?;
        let node = session.element().node;
        if !dom.is_attached(node) {
            return Err(EditorError::Detached(session.element().stable_id.clone()));
        }

        session.rebase(Snapshot::capture(dom, node));
        self.phase = EditorPhase::Selected;
        Ok(&*session)
    }

    /// The saved session is being pushed remotely
    pub fn begin_committing(&mut self) -> EditorResult<()> {
        if self.session.is_none() {
            return Err(EditorError::NoActiveSession);
        }
        self.phase = EditorPhase::Committing;
        Ok(())
    }

    /// End the session once its remote commit settled
    pub fn finish_committing(&mut self) -> Option<EditSession> {
        if self.phase != EditorPhase::Committing {
            return None;
        }
        self.phase = EditorPhase::Idle;
        self.session.take()
    }

    /// Leave `Committing` without closing when a commit is abandoned
    pub fn abandon_committing(&mut self) {
        if self.phase == EditorPhase::Committing {
            self.phase = EditorPhase::Selected;
        }
    }

    /// Revert to the session snapshot and close without staging
    ///
    /// Returns `false` when no session was open.
    pub fn cancel<D: Dom + ?Sized>(&mut self, dom: &mut D) -> bool {
        let Some(session) = self.session.take() else {
            return false;
        };
        revert_session(dom, &session);
        info!(stable_id = %session.element().stable_id, "Cancelled edit");
        self.phase = EditorPhase::Idle;
        true
    }

    /// Close the session, reverting unsaved changes first
    pub fn close<D: Dom + ?Sized>(&mut self, dom: &mut D) -> Option<EditSession> {
        let session = self.session.take()?;
        if session.has_unsaved_changes() {
            revert_session(dom, &session);
            debug!(stable_id = %session.element().stable_id, "Reverted unsaved changes on close");
        }
        self.phase = EditorPhase::Idle;
        Some(session)
    }
}

fn revert_session<D: Dom + ?Sized>(dom: &mut D, session: &EditSession) {
    let node = session.element().node;
    if dom.is_attached(node) {
        restore_snapshot(dom, node, session.snapshot());
    } else {
        debug!(stable_id = %session.element().stable_id, "Session element detached, nothing to revert");
    }
}
