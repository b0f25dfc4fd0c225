//! # QuickEdit Editor
//!
//! Direct-manipulation editing core: select an element on a rendered page,
//! preview text and style changes live, stage them, persist them and roll
//! them back.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │ common: Dom trait, MemoryDom, selectors     │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ editor: QuickEditor                         │
//! │  - ElementClassifier: regions, candidates   │
//! │  - StableIdentity: durable element ids      │
//! │  - SelectionController: session + preview   │
//! │  - PendingEditStore: queue + cache mirror   │
//! │  - PersistenceCoordinator: joined writes    │
//! │  - RollbackManager: snapshot restore        │
//! └─────────────────────────────────────────────┘
//!                     ↓
//! ┌─────────────────────────────────────────────┐
//! │ RemoteStore (content + style writes)        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! ## Core Principles
//!
//! 1. **Snapshots are the rollback target**: captured once, never mutated
//! 2. **Memory wins**: the cached queue never overrides what was staged now
//! 3. **Barrier, not race**: an edit's result waits for both of its writes
//! 4. **Gradients are untouchable**: no background write reaches them
//! 5. **Failures are notices**: remote errors never escape as errors
//!
//! ## Usage
//!
//! ```rust,ignore
//! use quickedit_editor::{DraftFields, EditorConfig, QuickEditor, SaveOptions};
//!
//! let mut editor = QuickEditor::new(config, dom, remote, cache)?;
//! editor.restore_pending();
//! editor.tag_regions();
//!
//! editor.select(node)?;
//! editor.update_draft(DraftFields::new().content("Hello").style("fontSize", "20px"))?;
//! editor.save_draft(SaveOptions::local()).await?;
//!
//! let results = editor.commit_all().await;
//! ```

pub mod background;
pub mod cache;
pub mod changes;
pub mod classifier;
pub mod color;
mod config;
mod editor;
mod element;
mod errors;
pub mod hydration;
pub mod identity;
pub mod locator;
pub mod notices;
pub mod pending;
pub mod persistence;
pub mod remote;
pub mod rollback;
mod selection;
mod session;
mod snapshot;

pub use background::{classify_background, classify_background_values, BackgroundClassification, BackgroundKind};
pub use cache::{CacheError, CacheStore, FileCache, MemoryCache};
pub use changes::{change_channel, DomChange, DomChangeFeed, DomChangeSender};
pub use classifier::{ElementClassifier, RegionRules, TaggingReport};
pub use config::EditorConfig;
pub use editor::{QuickEditor, SaveOptions};
pub use element::{EditableElement, ElementType, Region};
pub use errors::{EditorError, EditorResult};
pub use hydration::{HydrationReport, SavedState};
pub use identity::{compose_stable_id, StableIdentity};
pub use locator::{Locator, LocatorChain, StructuralPosition};
pub use notices::{Notice, NoticeKind, NoticeLog, NoticeSink};
pub use pending::{merge_queues, parse_queue, PendingEdit, PendingEditStore, PendingQueue};
pub use persistence::{BatchOutcome, CommitResult, CommitTicket, PersistenceCoordinator, WriteOutcome};
pub use remote::{ContentWrite, RecordingRemote, RemoteCall, RemoteError, RemoteStore, StylePayload, StyleWrite, WriteAck};
pub use rollback::{RevertReport, RollbackManager};
pub use selection::{EditorPhase, SelectionController};
pub use session::{AcceptedFields, DraftEdit, DraftFields, EditSession};
pub use snapshot::{Snapshot, TRACKED_PROPERTIES};

#[cfg(feature = "tokio")]
pub use changes::spawn_retag_retries;

// Re-export common types for convenience
pub use quickedit_common::{Dom, ElementSpec, MemoryDom, NodeId};
