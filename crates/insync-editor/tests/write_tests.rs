//! Rename / Delete Tests
//!
//! Tests for identity-gated remote writes and their notifications.

use insync_client::{RemoteError, ServerReply};
use insync_editor::session::{MSG_DELETED, MSG_DELETE_FAILED, MSG_RENAMED, MSG_RENAME_FAILED};
use insync_editor::{EditorError, EditorSession, Notification, SessionState, StaticIdentity};
use insync_model::UserId;
use insync_test_utils::{
    create_test_scenario, scenario_id, FakeStore, Harness, StoreCall, StoreOp,
};
use pretty_assertions::assert_eq;
use std::sync::Arc;

async fn loaded(h: &Harness) -> EditorSession {
    h.select_project("P1");
    let mut session = h.session();
    session.load(scenario_id("S1")).await.unwrap();
    h.notifier.clear();
    session
}

fn store() -> FakeStore {
    FakeStore::new().with_scenario(create_test_scenario("S1", "P1"))
}

fn writes(h: &Harness) -> Vec<StoreCall> {
    h.store
        .calls()
        .into_iter()
        .filter(|c| !matches!(c, StoreCall::Fetch(_)))
        .collect()
}

#[tokio::test]
async fn test_rename_and_delete_wait_for_identity() {
    for identity in [StaticIdentity::unresolved(), StaticIdentity::signed_out()] {
        let h = Harness::new(store()).with_identity(identity);
        let mut session = loaded(&h).await;

        let renamed = session.rename(&scenario_id("S1"), "New title").await;
        let deleted = session.delete(&scenario_id("S1")).await;

        assert!(matches!(renamed, Err(EditorError::NotReady)));
        assert!(matches!(deleted, Err(EditorError::NotReady)));
        assert!(writes(&h).is_empty());
        assert!(h.notifier.notifications().is_empty());
        assert!(!session.pending());
    }
}

#[tokio::test]
async fn test_rename_after_identity_resolves() {
    let identity = Arc::new(StaticIdentity::unresolved());
    let mut h = Harness::new(store());
    h.identity = Arc::clone(&identity);
    let mut session = loaded(&h).await;

    assert!(session.rename(&scenario_id("S1"), "Later").await.is_err());
    identity.resolve(Some(UserId::new("user_1").unwrap()));

    assert!(session.rename(&scenario_id("S1"), "Later").await.is_ok());
    assert_eq!(
        writes(&h),
        vec![StoreCall::Rename(scenario_id("S1"), "Later".to_string())]
    );
}

#[tokio::test]
async fn test_rename_success_notifies_and_marks_pending() {
    let h = Harness::new(store());
    let mut session = loaded(&h).await;

    let reply = session.rename(&scenario_id("S1"), "Checkout").await.unwrap();

    assert_eq!(reply.message, "Scenario renamed successfully.");
    assert_eq!(h.notifier.last(), Some(Notification::success(&reply.message)));
    assert!(session.take_pending());
    assert!(!session.pending());
    // In-memory title is left for the caller to refresh
    assert_eq!(session.scenario().unwrap().title, "Scenario S1");
    assert_eq!(h.store.get(&scenario_id("S1")).unwrap().title, "Checkout");
}

#[tokio::test]
async fn test_rename_rejection_surfaces_server_title() {
    let h = Harness::new(store());
    h.store.fail(
        StoreOp::Rename,
        RemoteError::rejected(409, Some("A scenario with this name already exists".into())),
    );
    let mut session = loaded(&h).await;

    let err = session.rename(&scenario_id("S1"), "Dup").await.unwrap_err();

    assert!(matches!(err, EditorError::RemoteWriteFailure { .. }));
    assert_eq!(
        h.notifier.last(),
        Some(Notification::error("A scenario with this name already exists"))
    );
    assert!(session.pending());
}

#[tokio::test]
async fn test_rename_transport_failure_uses_generic_message() {
    let h = Harness::new(store());
    h.store
        .fail(StoreOp::Rename, RemoteError::Transport("timed out".into()));
    let mut session = loaded(&h).await;

    let err = session.rename(&scenario_id("S1"), "New").await.unwrap_err();

    assert!(matches!(err, EditorError::TransportFailure(_)));
    assert_eq!(h.notifier.last(), Some(Notification::error(MSG_RENAME_FAILED)));
    assert!(!session.pending());
}

#[tokio::test]
async fn test_rename_rejects_blank_title_locally() {
    let h = Harness::new(store());
    let mut session = loaded(&h).await;

    let err = session.rename(&scenario_id("S1"), "  ").await.unwrap_err();

    assert!(matches!(err, EditorError::EmptyTitle));
    assert!(writes(&h).is_empty());
}

#[tokio::test]
async fn test_writes_require_the_loaded_scenario() {
    let h = Harness::new(store());
    let mut session = loaded(&h).await;

    let err = session.delete(&scenario_id("S9")).await.unwrap_err();
    assert!(matches!(err, EditorError::NotLoaded(ref id) if *id == scenario_id("S9")));

    let fresh = Harness::new(store());
    let mut unloaded = fresh.session();
    assert!(matches!(
        unloaded.rename(&scenario_id("S1"), "x").await,
        Err(EditorError::NotLoaded(_))
    ));
    assert!(writes(&h).is_empty());
    assert_eq!(fresh.store.call_count(), 0);
}

#[tokio::test]
async fn test_delete_success_stays_loaded() {
    let h = Harness::new(store());
    let mut session = loaded(&h).await;

    let reply = session.delete(&scenario_id("S1")).await.unwrap();

    assert_eq!(reply.message, "Scenario deleted successfully.");
    assert_eq!(h.notifier.last(), Some(Notification::success(&reply.message)));
    assert_eq!(session.state(), SessionState::Loaded);
    assert_eq!(h.navigator.back_count(), 0);
    assert!(session.pending());
    assert!(h.store.get(&scenario_id("S1")).is_none());
}

#[tokio::test]
async fn test_delete_failures_notify() {
    let h = Harness::new(store());
    h.store.fail(StoreOp::Delete, RemoteError::rejected(403, None));
    let mut session = loaded(&h).await;

    assert!(session.delete(&scenario_id("S1")).await.is_err());
    assert_eq!(h.notifier.last(), Some(Notification::error(MSG_DELETE_FAILED)));

    h.store
        .fail(StoreOp::Delete, RemoteError::Transport("dns".into()));
    let err = session.delete(&scenario_id("S1")).await.unwrap_err();
    assert!(matches!(err, EditorError::TransportFailure(_)));
    assert_eq!(h.notifier.notifications().len(), 2);
}

#[tokio::test]
async fn test_empty_success_reply_uses_default_message() {
    let h = Harness::new(store());
    h.store.reply_with(StoreOp::Rename, ServerReply::default());
    h.store.reply_with(StoreOp::Delete, ServerReply::new("  "));
    let mut session = loaded(&h).await;

    session.rename(&scenario_id("S1"), "Checkout").await.unwrap();
    session.delete(&scenario_id("S1")).await.unwrap();

    assert_eq!(
        h.notifier.notifications(),
        vec![Notification::success(MSG_RENAMED), Notification::success(MSG_DELETED)]
    );
}
