//! Integration tests for the editor crate

use async_trait::async_trait;
use futures::poll;
use quickedit_editor::{
    CacheStore, ContentWrite, DraftFields, EditorConfig, EditorPhase, ElementSpec, ElementType, FileCache,
    MemoryCache, MemoryDom, NodeId, NoticeKind, NoticeLog, PendingEdit, PersistenceCoordinator, QuickEditor,
    RecordingRemote, RemoteError, RemoteStore, SaveOptions, SavedState, StyleWrite, WriteAck,
    TRACKED_PROPERTIES,
};
use quickedit_editor::Dom;
use std::collections::{BTreeMap, HashMap};
use std::sync::{Arc, Mutex};
use std::task::Poll;
use tokio::sync::oneshot;

struct Page {
    dom: MemoryDom,
    h1: NodeId,
    p: NodeId,
    hero: NodeId,
}

fn page() -> Page {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    dom.append(root, ElementSpec::new("header").class("site-header"));
    let main = dom.append(root, ElementSpec::new("main"));
    let h1 = dom.append(main, ElementSpec::new("h1").html("Welcome").sheet("font-size", "32px"));
    let p = dom.append(
        main,
        ElementSpec::new("p")
            .html("Intro <em>text</em>")
            .style("color:red; line-height: 1.5")
            .sheet("padding", "8px"),
    );
    let hero = dom.append(
        main,
        ElementSpec::new("section")
            .class("hero")
            .html("<h2>Big</h2>")
            .style("background: linear-gradient(90deg, #000, #fff)"),
    );
    dom.append(root, ElementSpec::new("footer"));
    Page { dom, h1, p, hero }
}

fn editor_with(
    dom: MemoryDom,
    remote: Arc<dyn RemoteStore>,
    cache: Box<dyn CacheStore>,
) -> (QuickEditor<MemoryDom>, NoticeLog) {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
    let log = NoticeLog::new();
    let mut editor = QuickEditor::new(EditorConfig::new(42, "home-page"), dom, remote, cache)
        .unwrap()
        .with_notice_sink(Box::new(log.clone()));
    editor.tag_regions();
    (editor, log)
}

fn pending_edit(stable_id: &str, content: &str) -> PendingEdit {
    PendingEdit {
        element_id: stable_id.to_string(),
        stable_id: stable_id.to_string(),
        element_type: ElementType::Heading,
        selector: String::new(),
        content: content.to_string(),
        styles: BTreeMap::from([("color".to_string(), "#ff0000".to_string())]),
        page_id: 42,
        page_identifier: "home-page".to_string(),
        staged_at: chrono::Utc::now(),
    }
}

/// Element state the rollback guarantees cover
fn observed(dom: &MemoryDom, node: NodeId) -> (String, Vec<String>, String) {
    let styles = TRACKED_PROPERTIES
        .iter()
        .map(|property| dom.computed_style(node, property))
        .collect();
    (dom.inner_html(node), styles, dom.inline_style(node))
}

/// Remote whose writes block until the test opens their gate
#[derive(Default)]
struct GatedRemote {
    gates: Mutex<HashMap<(&'static str, String), oneshot::Receiver<()>>>,
    settled: Mutex<Vec<(&'static str, String)>>,
}

impl GatedRemote {
    fn gate(&self, kind: &'static str, stable_id: &str) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.gates.lock().unwrap().insert((kind, stable_id.to_string()), rx);
        tx
    }

    fn settled(&self) -> Vec<(&'static str, String)> {
        self.settled.lock().unwrap().clone()
    }

    async fn pass(&self, kind: &'static str, stable_id: String) {
        let gate = self.gates.lock().unwrap().remove(&(kind, stable_id.clone()));
        if let Some(gate) = gate {
            let _ = gate.await;
        }
        self.settled.lock().unwrap().push((kind, stable_id));
    }
}

#[async_trait]
impl RemoteStore for GatedRemote {
    async fn write_content(&self, request: ContentWrite) -> Result<WriteAck, RemoteError> {
        self.pass("content", request.stable_id).await;
        Ok(WriteAck::ok())
    }

    async fn write_styles(&self, request: StyleWrite) -> Result<WriteAck, RemoteError> {
        self.pass("styles", request.stable_id).await;
        Ok(WriteAck::ok())
    }
}

#[test]
fn test_identity_is_idempotent_across_selections() -> anyhow::Result<()> {
    let page = page();
    let h1 = page.h1;
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    let first = editor.select(h1)?.element().stable_id.clone();
    editor.close();
    let second = editor.select(h1)?.element().stable_id.clone();

    assert_eq!(first, "qe-heading-0-homepage");
    assert_eq!(first, second);
    assert_eq!(editor.identity().find(editor.dom(), &first), Some(h1));
    Ok(())
}

#[tokio::test]
async fn test_same_type_elements_selected_in_reverse_order_get_distinct_ids() -> anyhow::Result<()> {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    dom.append(root, ElementSpec::new("header"));
    let main = dom.append(root, ElementSpec::new("main"));
    let a = dom.append(main, ElementSpec::new("div").html("A"));
    let b = dom.append(main, ElementSpec::new("div").html("B"));
    dom.append(root, ElementSpec::new("footer"));
    let (mut editor, _) = editor_with(dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));
    editor.tag_regions();

    let id_b = editor.select(b)?.element().stable_id.clone();
    editor.update_draft(DraftFields::new().content("B2"))?;
    editor.save_draft(SaveOptions::local()).await?;
    editor.close();
    let id_a = editor.select(a)?.element().stable_id.clone();
    editor.update_draft(DraftFields::new().content("A2"))?;
    editor.save_draft(SaveOptions::local()).await?;

    assert_ne!(id_a, id_b);
    assert_eq!(editor.pending().len(), 2);
    assert_eq!(editor.pending().get(&id_a).map(|e| e.content.as_str()), Some("A2"));
    assert_eq!(editor.pending().get(&id_b).map(|e| e.content.as_str()), Some("B2"));
    Ok(())
}

#[tokio::test]
async fn test_gradient_element_never_gets_background_styles() -> anyhow::Result<()> {
    let page = page();
    let hero = page.hero;
    let remote = RecordingRemote::new();
    let (mut editor, _) = editor_with(page.dom, Arc::new(remote.clone()), Box::new(MemoryCache::new()));

    let stable_id = editor.select(hero)?.element().stable_id.clone();
    assert!(editor.session().unwrap().snapshot().background().is_gradient());

    let accepted = editor.update_draft(DraftFields::new().style("backgroundColor", "#ffffff"))?;
    assert_eq!(accepted.suppressed, vec!["background-color".to_string()]);
    editor.save_draft(SaveOptions::local()).await?;

    editor.update_draft(
        DraftFields::new()
            .style("background", "#000")
            .style("background-image", "none")
            .style("padding", "24px"),
    )?;
    editor.save_draft(SaveOptions::local()).await?;

    let staged = editor.pending().get(&stable_id).unwrap();
    assert!(!staged.styles.contains_key("background-color"));
    assert!(!staged.styles.contains_key("background"));
    assert!(!staged.styles.contains_key("background-image"));
    assert_eq!(staged.styles.get("padding").map(String::as_str), Some("24px"));

    editor.commit_all().await;
    let committed = remote.committed_styles(&stable_id).unwrap();
    assert!(!committed.contains_key("background-color"));
    assert!(editor.dom().inline_style(hero).contains("linear-gradient"));
    Ok(())
}

#[tokio::test]
async fn test_gradient_white_draft_is_not_saved() -> anyhow::Result<()> {
    let page = page();
    let hero = page.hero;
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    let stable_id = editor.select(hero)?.element().stable_id.clone();
    editor.update_draft(DraftFields::new().style("backgroundColor", "#ffffff"))?;
    editor.save_draft(SaveOptions::local()).await?;

    let saved = &editor.pending().get(&stable_id).unwrap().styles;
    assert!(!saved.contains_key("background-color"));
    Ok(())
}

#[test]
fn test_cancel_restores_inline_color() -> anyhow::Result<()> {
    let mut dom = MemoryDom::new();
    let root = dom.root();
    let p = dom.append(root, ElementSpec::new("p").html("Hi").style("color:red"));
    let (mut editor, _) = editor_with(dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    editor.select(p)?;
    editor.update_draft(DraftFields::new().style("color", "blue"))?;
    assert_eq!(editor.dom().computed_style(p, "color"), "blue");

    assert!(editor.cancel());
    assert_eq!(editor.dom().computed_style(p, "color"), "red");
    assert_eq!(editor.dom().inline_style(p), "color:red");
    assert!(!editor.dom().inline_style(p).contains("blue"));
    assert_eq!(editor.phase(), EditorPhase::Idle);
    assert!(editor.pending().is_empty());
    Ok(())
}

#[test]
fn test_rollback_fidelity_for_every_element() -> anyhow::Result<()> {
    let page = page();
    let nodes = [page.h1, page.p, page.hero];
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    for node in nodes {
        let before = observed(editor.dom(), node);
        editor.select(node)?;
        editor.update_draft(
            DraftFields::new()
                .content("<b>changed</b>")
                .style("color", "#123456")
                .style("fontSize", "40px")
                .style("margin", "3em")
                .style("borderRadius", "50%")
                .style("width", "10px")
                .style("fontWeight", "bold"),
        )?;
        assert_ne!(observed(editor.dom(), node), before);

        editor.cancel();
        assert_eq!(observed(editor.dom(), node), before);
    }
    Ok(())
}

#[test]
fn test_cancel_leaves_no_inline_style_on_unstyled_element() -> anyhow::Result<()> {
    let page = page();
    let h1 = page.h1;
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));
    assert_eq!(editor.dom().inline_style(h1), "");

    editor.select(h1)?;
    let accepted = editor.update_draft(DraftFields::new().style("fontWeight", "bold").style("color", "blue"))?;
    assert_eq!(accepted.rejected, vec!["font-weight".to_string()]);

    assert!(editor.cancel());
    assert_eq!(editor.dom().inline_style(h1), "");
    Ok(())
}

#[tokio::test]
async fn test_selecting_elsewhere_reverts_unsaved_preview() -> anyhow::Result<()> {
    let page = page();
    let (h1, p) = (page.h1, page.p);
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));
    let before = observed(editor.dom(), h1);

    editor.select(h1)?;
    editor.update_draft(DraftFields::new().content("draft only"))?;
    editor.select(p)?;

    assert_eq!(observed(editor.dom(), h1), before);
    assert!(editor.pending().is_empty());
    Ok(())
}

#[test]
fn test_staging_same_key_is_last_write_wins() {
    let (mut editor, _) = editor_with(page().dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    editor.stage(pending_edit("K", "A"));
    editor.stage(pending_edit("K", "B"));

    assert_eq!(editor.pending().len(), 1);
    assert_eq!(editor.pending().get("K").map(|e| e.content.as_str()), Some("B"));
}

async fn assert_commit_is_barrier(content_first: bool) {
    let remote = Arc::new(GatedRemote::default());
    let content_gate = remote.gate("content", "h1");
    let style_gate = remote.gate("styles", "h1");
    let coordinator = PersistenceCoordinator::new(remote.clone(), false);

    let edit = pending_edit("h1", "Title");
    let commit = coordinator.commit(&edit);
    futures::pin_mut!(commit);

    assert!(poll!(commit.as_mut()).is_pending());

    let (first, second) = if content_first {
        (content_gate, style_gate)
    } else {
        (style_gate, content_gate)
    };
    first.send(()).unwrap();
    assert!(poll!(commit.as_mut()).is_pending());
    assert_eq!(remote.settled().len(), 1);

    second.send(()).unwrap();
    match poll!(commit.as_mut()) {
        Poll::Ready(result) => {
            assert!(result.content_ack());
            assert!(result.style_ack());
            assert!(result.is_complete());
        }
        Poll::Pending => panic!("commit did not resolve after both writes settled"),
    }

    let kinds: Vec<&str> = remote.settled().into_iter().map(|(kind, _)| kind).collect();
    let expected = if content_first { ["content", "styles"] } else { ["styles", "content"] };
    assert_eq!(kinds, expected);
}

#[tokio::test]
async fn test_dropped_remote_save_leaves_session_selected() -> anyhow::Result<()> {
    let page = page();
    let h1 = page.h1;
    let remote = Arc::new(GatedRemote::default());
    let (mut editor, _) = editor_with(page.dom, remote.clone(), Box::new(MemoryCache::new()));

    let stable_id = editor.select(h1)?.element().stable_id.clone();
    let _content_gate = remote.gate("content", &stable_id);
    editor.update_draft(DraftFields::new().content("Hello"))?;

    {
        let save = editor.save_draft(SaveOptions::remote());
        futures::pin_mut!(save);
        assert!(poll!(save.as_mut()).is_pending());
    }

    assert_eq!(editor.phase(), EditorPhase::Selected);
    assert_eq!(editor.session().map(|s| s.element().node), Some(h1));
    assert_eq!(editor.pending().get(&stable_id).map(|e| e.content.as_str()), Some("Hello"));
    Ok(())
}

#[tokio::test]
async fn test_commit_waits_for_both_writes_content_first() {
    assert_commit_is_barrier(true).await;
}

#[tokio::test]
async fn test_commit_waits_for_both_writes_styles_first() {
    assert_commit_is_barrier(false).await;
}

#[tokio::test]
async fn test_commit_all_clears_queue_only_after_all_four_writes() {
    let remote = Arc::new(GatedRemote::default());
    let gates = vec![
        remote.gate("content", "h1"),
        remote.gate("styles", "p1"),
        remote.gate("styles", "h1"),
        remote.gate("content", "p1"),
    ];
    let (mut editor, log) = editor_with(page().dom, remote.clone(), Box::new(MemoryCache::new()));
    editor.stage(pending_edit("h1", "Title"));
    editor.stage(pending_edit("p1", "Body"));

    let ticket = editor.begin_commit_all().unwrap();
    futures::pin_mut!(ticket);
    assert!(poll!(ticket.as_mut()).is_pending());

    let mut outcome = None;
    for (released, gate) in gates.into_iter().enumerate() {
        assert_eq!(editor.pending().len(), 2);
        gate.send(()).unwrap();
        match poll!(ticket.as_mut()) {
            Poll::Ready(done) => {
                assert_eq!(released, 3, "batch resolved before every write settled");
                outcome = Some(done);
            }
            Poll::Pending => assert!(released < 3),
        }
    }

    let settled = remote.settled();
    assert_eq!(settled.len(), 4);
    for key in ["h1", "p1"] {
        assert!(settled.contains(&("content", key.to_string())));
        assert!(settled.contains(&("styles", key.to_string())));
    }

    let results = editor.finish_commit(outcome.unwrap());
    assert_eq!(results.len(), 2);
    assert!(results.values().all(|r| r.is_complete()));
    assert!(editor.pending().is_empty());
    assert_eq!(log.last().map(|n| n.message), Some("Saved 2 changes".to_string()));
}

#[tokio::test]
async fn test_failed_write_keeps_edit_queued_for_retry() -> anyhow::Result<()> {
    let page = page();
    let p = page.p;
    let remote = RecordingRemote::new();
    let cache = MemoryCache::new();
    let (mut editor, log) = editor_with(page.dom, Arc::new(remote.clone()), Box::new(cache.clone()));

    let stable_id = editor.select(p)?.element().stable_id.clone();
    editor.update_draft(DraftFields::new().content("Updated"))?;
    editor.save_draft(SaveOptions::local()).await?;

    remote.fail_styles_for(&stable_id);
    let results = editor.commit_all().await;
    let result = &results[&stable_id];
    assert!(result.content_ack());
    assert!(!result.style_ack());

    // Preview stays applied and the edit stays queued and cached
    assert_eq!(editor.dom().inner_html(p), "Updated");
    assert!(editor.pending().contains(&stable_id));
    assert!(cache.peek(editor.pending().cache_key()).is_some());
    assert_eq!(log.errors().len(), 1);

    remote.heal(&stable_id);
    let retried = editor.commit_all().await;
    assert!(retried[&stable_id].is_complete());
    assert!(editor.pending().is_empty());
    assert_eq!(cache.peek(editor.pending().cache_key()), None);
    assert_eq!(remote.calls_for(&stable_id).len(), 4);
    assert_eq!(log.last().map(|n| n.kind), Some(NoticeKind::Success));
    Ok(())
}

#[tokio::test]
async fn test_restaged_during_commit_stays_pending() -> anyhow::Result<()> {
    let page = page();
    let h1 = page.h1;
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    let stable_id = editor.select(h1)?.element().stable_id.clone();
    editor.update_draft(DraftFields::new().content("First"))?;
    editor.save_draft(SaveOptions::local()).await?;

    let ticket = editor.begin_commit_all().unwrap();
    editor.update_draft(DraftFields::new().content("Second"))?;
    editor.save_draft(SaveOptions::local()).await?;

    let outcome = ticket.await;
    editor.finish_commit(outcome);

    let pending = editor.pending().get(&stable_id).unwrap();
    assert_eq!(pending.content, "Second");
    Ok(())
}

#[tokio::test]
async fn test_exit_reverts_every_pending_edit() -> anyhow::Result<()> {
    let page = page();
    let (h1, p) = (page.h1, page.p);
    let cache = MemoryCache::new();
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(cache.clone()));
    let before_h1 = observed(editor.dom(), h1);
    let before_p = observed(editor.dom(), p);

    editor.select(h1)?;
    editor.update_draft(DraftFields::new().content("New title").style("color", "green"))?;
    editor.save_draft(SaveOptions::local()).await?;
    editor.select(p)?;
    editor.update_draft(DraftFields::new().style("padding", "1px"))?;
    editor.save_draft(SaveOptions::local()).await?;
    editor.update_draft(DraftFields::new().content("unsaved"))?;

    let report = editor.exit();
    assert_eq!(report.reverted.len(), 2);
    assert!(report.skipped.is_empty());
    assert_eq!(observed(editor.dom(), h1), before_h1);
    assert_eq!(observed(editor.dom(), p), before_p);
    assert!(editor.pending().is_empty());
    assert_eq!(cache.peek(editor.pending().cache_key()), None);
    assert_eq!(editor.phase(), EditorPhase::Idle);
    Ok(())
}

#[tokio::test]
async fn test_exit_after_commit_keeps_committed_state() -> anyhow::Result<()> {
    let page = page();
    let h1 = page.h1;
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    editor.select(h1)?;
    editor.update_draft(DraftFields::new().content("Committed"))?;
    editor.save_draft(SaveOptions::remote()).await?;

    editor.select(h1)?;
    editor.update_draft(DraftFields::new().content("Pending"))?;
    editor.save_draft(SaveOptions::local()).await?;

    editor.exit();
    assert_eq!(editor.dom().inner_html(h1), "Committed");
    Ok(())
}

#[tokio::test]
async fn test_styles_accumulate_across_saves() -> anyhow::Result<()> {
    let page = page();
    let p = page.p;
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    let stable_id = editor.select(p)?.element().stable_id.clone();
    editor.update_draft(DraftFields::new().style("fontSize", "18px"))?;
    editor.save_draft(SaveOptions::local()).await?;
    editor.close();

    editor.select(p)?;
    editor.update_draft(DraftFields::new().style("color", "rgb(0, 0, 255)"))?;
    editor.save_draft(SaveOptions::local()).await?;

    let styles = &editor.pending().get(&stable_id).unwrap().styles;
    assert_eq!(styles.get("font-size").map(String::as_str), Some("18px"));
    assert_eq!(styles.get("color").map(String::as_str), Some("rgb(0, 0, 255)"));
    assert_eq!(styles.len(), 2);
    Ok(())
}

#[tokio::test]
async fn test_interrupted_session_is_replayed_and_revertible() -> anyhow::Result<()> {
    let cache = MemoryCache::new();
    let stable_id;
    {
        let page = page();
        let p = page.p;
        let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(cache.clone()));
        stable_id = editor.select(p)?.element().stable_id.clone();
        editor.update_draft(DraftFields::new().content("Recovered").style("fontSize", "22px"))?;
        editor.save_draft(SaveOptions::local()).await?;
    }

    // Fresh page load over the same markup
    let page = page();
    let p = page.p;
    let before = observed(&page.dom, p);
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(cache.clone()));

    let report = editor.restore_pending();
    assert_eq!(report.applied, 1);
    assert_eq!(editor.dom().inner_html(p), "Recovered");
    assert_eq!(editor.dom().computed_style(p, "font-size"), "22px");
    assert_eq!(editor.identity().resolve(editor.dom(), p), Some(stable_id));

    editor.exit();
    assert_eq!(observed(editor.dom(), p), before);
    Ok(())
}

#[test]
fn test_corrupt_cache_starts_empty() {
    let mut cache = MemoryCache::new();
    let key = EditorConfig::new(42, "home-page").cache_key();
    cache.set(&key, "[[[ definitely not json").unwrap();

    let (mut editor, _) = editor_with(page().dom, Arc::new(RecordingRemote::new()), Box::new(cache));
    let report = editor.restore_pending();

    assert_eq!(report.applied, 0);
    assert!(editor.pending().is_empty());
}

#[tokio::test]
async fn test_file_cache_survives_editor() -> anyhow::Result<()> {
    let dir = tempfile::tempdir()?;
    {
        let page = page();
        let h1 = page.h1;
        let cache = FileCache::new(dir.path());
        let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(cache));
        editor.select(h1)?;
        editor.update_draft(DraftFields::new().content("On disk"))?;
        editor.save_draft(SaveOptions::local()).await?;
    }

    let page = page();
    let h1 = page.h1;
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(FileCache::new(dir.path())));
    assert_eq!(editor.restore_pending().applied, 1);
    assert_eq!(editor.dom().inner_html(h1), "On disk");
    Ok(())
}

#[test]
fn test_hydrate_saved_state() -> anyhow::Result<()> {
    let page = page();
    let (h1, p, hero) = (page.h1, page.p, page.hero);
    let (mut editor, _) = editor_with(page.dom, Arc::new(RecordingRemote::new()), Box::new(MemoryCache::new()));

    let heading_id = editor.select(h1)?.element().stable_id.clone();
    editor.close();

    let state = SavedState::from_json(&format!(
        r##"{{
            "content": {{
                "{heading_id}": "Saved title",
                "intro": {{ "content": "Saved intro", "selector": "main > p" }}
            }},
            "styles": {{
                "{heading_id}": "{{\"color\":\"#336699\"}}",
                "hero": {{ "styles": {{ "background-color": "#fff", "padding": "2rem" }}, "selector": "section.hero" }},
                "ghost": {{ "color": "red" }}
            }}
        }}"##
    ))?;

    let report = editor.hydrate(&state);
    assert_eq!(report.applied, 4);
    assert_eq!(report.skipped, vec!["ghost".to_string()]);
    assert_eq!(editor.dom().inner_html(h1), "Saved title");
    assert_eq!(editor.dom().inner_html(p), "Saved intro");
    assert_eq!(editor.dom().computed_style(h1, "color"), "#336699");
    assert_eq!(editor.dom().computed_style(hero, "padding"), "2rem");
    assert!(!editor.dom().inline_style(hero).contains("background-color"));
    Ok(())
}
