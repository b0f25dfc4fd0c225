//! # Persistence Coordinator
//!
//! Pushes staged edits to the [`RemoteStore`].
//!
//! ```text
//! commit(edit) ──┬── write_content ──┐
//!                └── write_styles  ──┴── join ──► CommitResult
//!
//! commit_all(edits) ── join_all(commit(e) for e in edits) ──► BatchOutcome
//! ```
//!
//! Both writes of an edit are in flight together and the result exists only
//! once both have settled, in whichever order they arrive. A failed write
//! still settles; it is reported, never raised.

use crate::notices::Notice;
use crate::pending::PendingEdit;
use crate::remote::{ContentWrite, RemoteError, RemoteStore, StyleWrite, WriteAck};
use futures::future::{join_all, BoxFuture};
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll};
use tracing::{info, instrument, warn};

/// How one of the two writes settled
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "status", content = "message")]
pub enum WriteOutcome {
    Acknowledged,
    /// The endpoint answered `success: false`
    Rejected(String),
    /// The endpoint could not be reached
    Failed(String),
}

impl WriteOutcome {
    pub fn from_response(response: Result<WriteAck, RemoteError>) -> Self {
        match response {
            Ok(ack) if ack.success => WriteOutcome::Acknowledged,
            Ok(ack) => WriteOutcome::Rejected(ack.message.unwrap_or_else(|| "rejected".to_string())),
            Err(error) => WriteOutcome::Failed(error.to_string()),
        }
    }

    pub fn is_ack(&self) -> bool {
        matches!(self, WriteOutcome::Acknowledged)
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            WriteOutcome::Acknowledged => None,
            WriteOutcome::Rejected(message) | WriteOutcome::Failed(message) => Some(message),
        }
    }
}

/// Settled state of both writes for one edit
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CommitResult {
    pub element_id: String,
    pub stable_id: String,
    pub content: WriteOutcome,
    pub style: WriteOutcome,
}

impl CommitResult {
    pub fn content_ack(&self) -> bool {
        self.content.is_ack()
    }

    pub fn style_ack(&self) -> bool {
        self.style.is_ack()
    }

    /// Both writes acknowledged
    pub fn is_complete(&self) -> bool {
        self.content_ack() && self.style_ack()
    }

    pub fn notice(&self) -> Notice {
        if self.is_complete() {
            return Notice::success("Changes saved", Some(self.stable_id.clone()));
        }

        let mut failures = Vec::new();
        if let Some(message) = self.content.message() {
            failures.push(format!("content: {}", message));
        }
        if let Some(message) = self.style.message() {
            failures.push(format!("styles: {}", message));
        }
        Notice::error(
            format!("Failed to save changes ({})", failures.join(", ")),
            Some(self.stable_id.clone()),
        )
    }
}

/// Results of a batch, with the edits exactly as they were sent
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BatchOutcome {
    pub edits: Vec<PendingEdit>,
    pub results: BTreeMap<String, CommitResult>,
}

impl BatchOutcome {
    pub fn is_complete(&self) -> bool {
        self.results.values().all(CommitResult::is_complete)
    }

    pub fn failed(&self) -> Vec<&CommitResult> {
        self.results.values().filter(|r| !r.is_complete()).collect()
    }

    pub fn confirmed(&self) -> impl Iterator<Item = &PendingEdit> {
        self.edits
            .iter()
            .filter(|edit| self.results.get(&edit.stable_id).is_some_and(CommitResult::is_complete))
    }
}

/// A batch commit that owns its in-flight writes
///
/// Awaiting the ticket yields the [`BatchOutcome`]. Dropping it abandons
/// the result but not requests already handed to the transport.
pub struct CommitTicket {
    stable_ids: Vec<String>,
    future: BoxFuture<'static, BatchOutcome>,
}

impl CommitTicket {
    pub fn stable_ids(&self) -> &[String] {
        &self.stable_ids
    }
}

impl Future for CommitTicket {
    type Output = BatchOutcome;

    fn poll(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Self::Output> {
        self.future.as_mut().poll(cx)
    }
}

impl std::fmt::Debug for CommitTicket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CommitTicket")
            .field("stable_ids", &self.stable_ids)
            .finish_non_exhaustive()
    }
}

#[derive(Clone)]
pub struct PersistenceCoordinator {
    remote: Arc<dyn RemoteStore>,
    encode_styles: bool,
}

impl PersistenceCoordinator {
    pub fn new(remote: Arc<dyn RemoteStore>, encode_styles: bool) -> Self {
        Self { remote, encode_styles }
    }

    /// Issue both writes for `edit` and wait for both to settle
    #[instrument(skip(self, edit), fields(stable_id = %edit.stable_id))]
    pub async fn commit(&self, edit: &PendingEdit) -> CommitResult {
        let content = self.remote.write_content(ContentWrite::from(edit));
        let styles = self.remote.write_styles(StyleWrite::from_edit(edit, self.encode_styles));
        let (content, style) = futures::join!(content, styles);

        let result = CommitResult {
            element_id: edit.element_id.clone(),
            stable_id: edit.stable_id.clone(),
            content: WriteOutcome::from_response(content),
            style: WriteOutcome::from_response(style),
        };

        if let Some(message) = result.content.message() {
            warn!(stable_id = %edit.stable_id, error = %message, "Content write failed");
        }
        if let Some(message) = result.style.message() {
            warn!(stable_id = %edit.stable_id, error = %message, "Style write failed");
        }
        result
    }

    /// Commit every edit concurrently; resolves once all have settled
    #[instrument(skip(self, edits), fields(count = edits.len()))]
    pub async fn commit_all(&self, edits: Vec<PendingEdit>) -> BatchOutcome {
        let results = join_all(edits.iter().map(|edit| self.commit(edit))).await;
        let results: BTreeMap<String, CommitResult> =
            results.into_iter().map(|r| (r.stable_id.clone(), r)).collect();

        let outcome = BatchOutcome { edits, results };
        info!(
            total = outcome.results.len(),
            failed = outcome.failed().len(),
            "Batch commit settled"
        );
        outcome
    }

    /// Start a batch that can be awaited later or elsewhere
    pub fn begin(&self, edits: Vec<PendingEdit>) -> CommitTicket {
        let coordinator = self.clone();
        let stable_ids = edits.iter().map(|e| e.stable_id.clone()).collect();
        CommitTicket {
            stable_ids,
            future: async move { coordinator.commit_all(edits).await }.boxed(),
        }
    }
}

impl std::fmt::Debug for PersistenceCoordinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PersistenceCoordinator")
            .field("encode_styles", &self.encode_styles)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementType;
    use crate::remote::{RecordingRemote, StylePayload};
    use chrono::Utc;

    fn edit(stable_id: &str) -> PendingEdit {
        PendingEdit {
            element_id: stable_id.to_string(),
            stable_id: stable_id.to_string(),
            element_type: ElementType::Paragraph,
            selector: String::new(),
            content: "text".to_string(),
            styles: BTreeMap::from([("color".to_string(), "blue".to_string())]),
            page_id: 3,
            page_identifier: "home".to_string(),
            staged_at: Utc::now(),
        }
    }

    #[test]
    fn test_write_outcome_mapping() {
        assert!(WriteOutcome::from_response(Ok(WriteAck::ok())).is_ack());
        assert_eq!(
            WriteOutcome::from_response(Ok(WriteAck { success: false, message: None })),
            WriteOutcome::Rejected("rejected".to_string())
        );
        assert_eq!(
            WriteOutcome::from_response(Err(RemoteError::Timeout)),
            WriteOutcome::Failed("Request timed out".to_string())
        );
    }

    #[tokio::test]
    async fn test_commit_issues_both_writes() {
        let remote = RecordingRemote::new();
        let coordinator = PersistenceCoordinator::new(Arc::new(remote.clone()), false);

        let result = coordinator.commit(&edit("p1")).await;
        assert!(result.is_complete());

        let calls = remote.calls_for("p1");
        assert_eq!(calls.len(), 2);
        assert_eq!(calls.iter().filter(|c| c.is_content()).count(), 1);
    }

    #[tokio::test]
    async fn test_partial_failure_is_reported_not_raised() {
        let remote = RecordingRemote::new();
        remote.fail_styles_for("p1");
        let coordinator = PersistenceCoordinator::new(Arc::new(remote.clone()), false);

        let result = coordinator.commit(&edit("p1")).await;
        assert!(result.content_ack());
        assert!(!result.style_ack());
        assert!(!result.is_complete());

        let notice = result.notice();
        assert!(notice.is_error());
        assert!(notice.message.contains("styles: Transport error"));
    }

    #[tokio::test]
    async fn test_encoded_styles() {
        let remote = RecordingRemote::new();
        let coordinator = PersistenceCoordinator::new(Arc::new(remote.clone()), true);
        coordinator.commit(&edit("p1")).await;

        let sent = remote.calls().into_iter().find_map(|call| match call {
            crate::remote::RemoteCall::Styles(request) => Some(request.styles),
            _ => None,
        });
        assert_eq!(sent, Some(StylePayload::Encoded("{\"color\":\"blue\"}".to_string())));
    }

    #[tokio::test]
    async fn test_ticket_resolves_batch() {
        let remote = RecordingRemote::new();
        remote.reject_for("b", "locked");
        let coordinator = PersistenceCoordinator::new(Arc::new(remote.clone()), false);

        let ticket = coordinator.begin(vec![edit("a"), edit("b")]);
        assert_eq!(ticket.stable_ids(), ["a".to_string(), "b".to_string()]);

        let outcome = ticket.await;
        assert!(!outcome.is_complete());
        assert_eq!(outcome.failed().len(), 1);
        assert_eq!(
            outcome.confirmed().map(|e| e.stable_id.as_str()).collect::<Vec<_>>(),
            vec!["a"]
        );
        assert_eq!(remote.calls().len(), 4);
    }
}
