//! # Editor
//!
//! [`QuickEditor`] wires the components together around one document.
//! Every collaborator is injected, so independent editors can coexist
//! (one per test, one per frame).
//!
//! ```text
//! tag_regions ─► select ─► update_draft* ─► save_draft ─► stage
//!                                                          │
//!                  commit_all ◄──────────────────── pending queue
//!                      │                                   │
//!          confirmed: rebase originals           exit: revert_all + clear
//!          failed:    keep queued, notify
//! ```

use crate::background::{classify_background, is_background_property};
use crate::cache::CacheStore;
use crate::changes::{change_channel, DomChangeFeed, DomChangeSender};
use crate::classifier::{ElementClassifier, TaggingReport};
use crate::config::EditorConfig;
use crate::element::{EditableElement, ElementType};
use crate::errors::{EditorError, EditorResult};
use crate::hydration::{self, HydrationReport, SavedState};
use crate::identity::StableIdentity;
use crate::notices::{Notice, NoticeLog, NoticeSink};
use crate::pending::{PendingEdit, PendingEditStore};
use crate::persistence::{BatchOutcome, CommitResult, CommitTicket, PersistenceCoordinator};
use crate::remote::RemoteStore;
use crate::rollback::{RevertReport, RollbackManager};
use crate::selection::{EditorPhase, SelectionController};
use crate::session::{AcceptedFields, DraftFields, EditSession};
use crate::snapshot::Snapshot;
use chrono::Utc;
use quickedit_common::{selector_path, Dom, NodeId};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// How `save_draft` hands the edit on
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SaveOptions {
    /// Commit this edit right away instead of only staging it
    pub persist_remotely: bool,
}

impl SaveOptions {
    pub fn local() -> Self {
        Self { persist_remotely: false }
    }

    pub fn remote() -> Self {
        Self { persist_remotely: true }
    }
}

pub struct QuickEditor<D: Dom> {
    config: EditorConfig,
    dom: D,
    identity: StableIdentity,
    classifier: ElementClassifier,
    selection: SelectionController,
    pending: PendingEditStore,
    persistence: PersistenceCoordinator,
    rollback: RollbackManager,
    notices: Box<dyn NoticeSink>,
    changes: Option<(DomChangeSender, DomChangeFeed)>,
}

impl<D: Dom> QuickEditor<D> {
    pub fn new(
        config: EditorConfig,
        dom: D,
        remote: Arc<dyn RemoteStore>,
        cache: Box<dyn CacheStore>,
    ) -> EditorResult<Self> {
        config.validate()?;

        Ok(Self {
            identity: StableIdentity::from_config(&config),
            classifier: ElementClassifier::default(),
            selection: SelectionController::new(),
            pending: PendingEditStore::new(cache, config.cache_key()),
            persistence: PersistenceCoordinator::new(remote, config.encode_styles_as_json),
            rollback: RollbackManager::new(config.identity_attribute.clone()),
            notices: Box::new(NoticeLog::new()),
            changes: None,
            config,
            dom,
        })
    }

    pub fn with_classifier(mut self, classifier: ElementClassifier) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_notice_sink(mut self, sink: Box<dyn NoticeSink>) -> Self {
        self.notices = sink;
        self
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    pub fn dom(&self) -> &D {
        &self.dom
    }

    pub fn dom_mut(&mut self) -> &mut D {
        &mut self.dom
    }

    pub fn identity(&self) -> &StableIdentity {
        &self.identity
    }

    pub fn pending(&self) -> &PendingEditStore {
        &self.pending
    }

    pub fn rollback(&self) -> &RollbackManager {
        &self.rollback
    }

    pub fn phase(&self) -> EditorPhase {
        self.selection.phase()
    }

    pub fn session(&self) -> Option<&EditSession> {
        self.selection.session()
    }

    pub fn into_dom(self) -> D {
        self.dom
    }

    // ---------------------------------------------------------------------
    // Regions and change notification
    // ---------------------------------------------------------------------

    pub fn tag_regions(&mut self) -> TaggingReport {
        self.classifier.tag_editable_regions(&mut self.dom)
    }

    /// Sender the host's mutation observer reports through
    pub fn watch_changes(&mut self) -> DomChangeSender {
        let (sender, _) = self.changes.get_or_insert_with(change_channel);
        sender.clone()
    }

    /// Drain reported changes and re-tag once if any of them matter
    pub fn pump_changes(&mut self) -> Option<TaggingReport> {
        let (_, feed) = self.changes.as_ref()?;
        let changes = feed.drain();
        if !changes.iter().any(|change| change.needs_retag()) {
            return None;
        }
        debug!(changes = changes.len(), "Re-tagging after DOM changes");
        Some(self.tag_regions())
    }

    /// Schedule the configured delayed re-tags on the change feed
    #[cfg(feature = "tokio")]
    pub fn start_retag_retries(&mut self) -> tokio::task::JoinHandle<()> {
        let sender = self.watch_changes();
        crate::changes::spawn_retag_retries(sender, self.config.retag_delays())
    }

    // ---------------------------------------------------------------------
    // Selection and drafts
    // ---------------------------------------------------------------------

    /// Open an edit session on `node`
    pub fn select(&mut self, node: NodeId) -> EditorResult<&EditSession> {
        if !self.dom.is_attached(node) {
            return Err(EditorError::Detached(selector_path(&self.dom, node)));
        }

        let element_type = self
            .classifier
            .classify_element(&self.dom, node)
            .unwrap_or(ElementType::Custom);
        let stable_id = self
            .identity
            .assign(&mut self.dom, node, element_type, &self.classifier);
        let element = EditableElement {
            node,
            stable_id,
            element_type,
        };

        let session = self.selection.select(&mut self.dom, element)?;
        self.rollback
            .remember_original(&session.element().stable_id, session.snapshot());
        Ok(session)
    }

    pub fn update_draft(&mut self, fields: DraftFields) -> EditorResult<AcceptedFields> {
        self.selection.update_draft(&mut self.dom, fields)
    }

    /// Stage the session's draft, optionally committing it immediately
    ///
    /// A local save keeps the session open on the new baseline. A remote
    /// save closes it once the commit has settled and returns its result.
    /// Dropping the future before that leaves the session open and the edit
    /// queued.
    pub async fn save_draft(&mut self, options: SaveOptions) -> EditorResult<Option<CommitResult>> {
        let session = self.selection.mark_saved(&self.dom)?;
        let edit = build_pending_edit(&self.config, &self.dom, &self.pending, &self.rollback, session);
        self.pending.stage(edit.clone());

        if !options.persist_remotely {
            return Ok(None);
        }

        self.selection.begin_committing()?;
        let committing = CommittingGuard::new(&mut self.selection);
        let result = self.persistence.commit(&edit).await;
        committing.settle();

        let outcome = BatchOutcome {
            edits: vec![edit],
            results: BTreeMap::from([(result.stable_id.clone(), result.clone())]),
        };
        self.apply_outcome(&outcome);
        self.selection.finish_committing();
        Ok(Some(result))
    }

    /// Stage an edit built outside a session
    pub fn stage(&mut self, edit: PendingEdit) -> Option<PendingEdit> {
        self.pending.stage(edit)
    }

    /// Revert the session to its snapshot and end it without staging
    pub fn cancel(&mut self) -> bool {
        self.selection.cancel(&mut self.dom)
    }

    /// End the session, reverting unsaved changes first
    pub fn close(&mut self) -> bool {
        self.selection.close(&mut self.dom).is_some()
    }

    // ---------------------------------------------------------------------
    // Commits
    // ---------------------------------------------------------------------

    /// Start committing the whole queue; `None` when nothing is pending
    pub fn begin_commit_all(&self) -> Option<CommitTicket> {
        if self.pending.is_empty() {
            return None;
        }
        let edits = self.pending.all().values().cloned().collect();
        Some(self.persistence.begin(edits))
    }

    /// Apply a settled batch: notify, drop confirmed edits, rebase originals
    pub fn finish_commit(&mut self, outcome: BatchOutcome) -> BTreeMap<String, CommitResult> {
        self.apply_outcome(&outcome);

        let total = outcome.results.len();
        let failed = outcome.failed().len();
        if total > 1 {
            let summary = if failed == 0 {
                Notice::success(format!("Saved {} changes", total), None)
            } else {
                Notice::error(format!("{} of {} changes failed to save", failed, total), None)
            };
            self.notify(summary);
        }
        outcome.results
    }

    /// Commit every pending edit and wait for all of them to settle
    #[instrument(skip_all, fields(pending = self.pending.len()))]
    pub async fn commit_all(&mut self) -> BTreeMap<String, CommitResult> {
        match self.begin_commit_all() {
            Some(ticket) => {
                let outcome = ticket.await;
                self.finish_commit(outcome)
            }
            None => BTreeMap::new(),
        }
    }

    fn apply_outcome(&mut self, outcome: &BatchOutcome) {
        for result in outcome.results.values() {
            self.notify(result.notice());
        }

        for edit in outcome.confirmed() {
            if !self.pending.remove_confirmed(edit) {
                // Re-staged while in flight; the page no longer shows the committed state
                continue;
            }

            let Some(node) = self.rollback.locator_for(edit).locate(&self.dom) else {
                warn!(stable_id = %edit.stable_id, "Committed element no longer resolves");
                continue;
            };
            let committed = match self.selection.session() {
                Some(session) if session.element().stable_id == edit.stable_id => session.snapshot().clone(),
                _ => Snapshot::capture(&self.dom, node),
            };
            self.rollback.rebase(&edit.stable_id, committed);
        }

        if self.pending.is_empty() {
            self.pending.clear();
        }
    }

    fn notify(&mut self, notice: Notice) {
        if notice.is_error() {
            warn!(stable_id = ?notice.stable_id, message = %notice.message, "Commit notice");
        } else {
            info!(stable_id = ?notice.stable_id, message = %notice.message, "Commit notice");
        }
        self.notices.notify(notice);
    }

    // ---------------------------------------------------------------------
    // Leaving, recovery and hydration
    // ---------------------------------------------------------------------

    /// Leave editing mode: revert every pending edit and empty the queue
    pub fn exit(&mut self) -> RevertReport {
        self.selection.close(&mut self.dom);
        let report = self.rollback.revert_all(&mut self.dom, self.pending.all());
        self.pending.clear();
        self.rollback.forget_originals();
        info!(reverted = report.reverted.len(), "Exited editing mode");
        report
    }

    /// Recover the cached queue and replay it onto the page
    pub fn restore_pending(&mut self) -> HydrationReport {
        let recovered = self.pending.load_from_cache();
        let mut report = HydrationReport::default();

        let edits: Vec<PendingEdit> = self.pending.all().values().cloned().collect();
        for edit in edits {
            let Some(node) = self.rollback.locator_for(&edit).locate(&self.dom) else {
                warn!(stable_id = %edit.stable_id, selector = %edit.selector, "Recovered edit matches no element");
                report.skipped.push(edit.stable_id);
                continue;
            };

            if self.identity.resolve(&self.dom, node).is_none() {
                self.dom
                    .set_attribute(node, self.identity.attribute(), &edit.stable_id);
            }
            let original = Snapshot::capture(&self.dom, node);
            self.rollback.remember_original(&edit.stable_id, &original);

            self.dom.set_inner_html(node, &edit.content);
            let gradient = original.background().is_gradient();
            for (property, value) in &edit.styles {
                if gradient && is_background_property(property) {
                    continue;
                }
                self.dom.set_style_property(node, property, value);
            }
            report.applied += 1;
        }

        info!(recovered, replayed = report.applied, "Restored pending edits");
        report
    }

    /// Apply previously committed state provided by the host page
    pub fn hydrate(&mut self, state: &SavedState) -> HydrationReport {
        hydration::hydrate(&mut self.dom, state, &self.config.identity_attribute)
    }
}

/// Queue record for the saved session
///
/// Styles are the draft values that differ from the element's baseline,
/// merged over what is already staged for it. Background properties never
/// appear for a gradient element.
/// Steps out of `Committing` if the commit future is dropped unsettled
struct CommittingGuard<'a> {
    selection: &'a mut SelectionController,
    settled: bool,
}

impl<'a> CommittingGuard<'a> {
    fn new(selection: &'a mut SelectionController) -> Self {
        Self {
            selection,
            settled: false,
        }
    }

    fn settle(mut self) {
        self.settled = true;
    }
}

impl Drop for CommittingGuard<'_> {
    fn drop(&mut self) {
        if !self.settled {
            debug!("Remote save dropped before its commit settled");
            self.selection.abandon_committing();
        }
    }
}

fn build_pending_edit<D: Dom>(
    config: &EditorConfig,
    dom: &D,
    pending: &PendingEditStore,
    rollback: &RollbackManager,
    session: &EditSession,
) -> PendingEdit {
    let element = session.element();
    let baseline = rollback.baseline(&element.stable_id).unwrap_or(session.snapshot());
    let gradient = baseline.background().is_gradient()
        || session.snapshot().background().is_gradient()
        || classify_background(dom, element.node).is_gradient();

    let mut styles = pending
        .get(&element.stable_id)
        .map(|staged| staged.styles.clone())
        .unwrap_or_default();
    for (property, value) in &session.draft().styles {
        if baseline.differs(property, value) {
            styles.insert(property.clone(), value.clone());
        } else {
            styles.remove(property);
        }
    }
    if gradient {
        styles.retain(|property, _| !is_background_property(property));
    }

    PendingEdit {
        element_id: dom.dom_id(element.node).unwrap_or_else(|| element.stable_id.clone()),
        stable_id: element.stable_id.clone(),
        element_type: element.element_type,
        selector: selector_path(dom, element.node),
        content: session.draft().content.clone(),
        styles,
        page_id: config.page_id,
        page_identifier: config.page_identifier.clone(),
        staged_at: Utc::now(),
    }
}

impl<D: Dom + std::fmt::Debug> std::fmt::Debug for QuickEditor<D> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuickEditor")
            .field("config", &self.config)
            .field("dom", &self.dom)
            .field("phase", &self.selection.phase())
            .field("pending", &self.pending.len())
            .finish_non_exhaustive()
    }
}
