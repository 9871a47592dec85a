//! Integration tests for list membership semantics: idempotence, wholesale
//! replacement, and the ignore-list command flow.

mod common;

use common::engine;
use fennec::{CharacterStatus, ListKind, Update, WireCommand};
use serde_json::json;
use std::collections::HashSet;

#[tokio::test]
async fn test_add_twice_reports_no_change() {
    let t = engine();
    let roster = t.engine.roster();

    for kind in ListKind::ALL {
        assert!(roster.add("Bob", kind), "first add changes membership for {kind:?}");
        assert!(!roster.add("Bob", kind), "second add is a no-op for {kind:?}");
        assert_eq!(roster.names(kind, false).len(), 1);
    }
}

#[tokio::test]
async fn test_remove_absent_reports_no_change() {
    let t = engine();
    let roster = t.engine.roster();

    for kind in ListKind::ALL {
        assert!(!roster.remove("Nobody", kind), "removing an absent name is a no-op for {kind:?}");
    }
}

#[tokio::test]
async fn test_set_then_names_round_trips() {
    let t = engine();
    let roster = t.engine.roster();
    let names = vec!["Ada".to_string(), "Bee".to_string(), "Cyn".to_string()];

    roster.add("Stale", ListKind::Bookmark);
    roster.set(&names, ListKind::Bookmark);
    assert_eq!(
        roster.names(ListKind::Bookmark, false),
        names.iter().cloned().collect::<HashSet<_>>()
    );
}

#[tokio::test]
async fn test_roster_and_ignore_scenario() {
    let mut t = engine();

    // Presence asserted for a single identity.
    let lis: WireCommand =
        serde_json::from_value(json!({"type": "LIS", "identity": "Alice", "status": "online"}))
            .unwrap();
    t.engine.receive(lis).await;
    assert_eq!(t.engine.roster().find("Alice").read().status, CharacterStatus::Online);

    // Wholesale ignore-list replacement.
    let set: WireCommand =
        serde_json::from_value(json!({"type": "ignore_list_set", "names": ["Bob", "Carol"]}))
            .unwrap();
    t.engine.receive(set).await;
    assert_eq!(
        t.engine.roster().names(ListKind::Ignored, false),
        HashSet::from(["Bob".to_string(), "Carol".to_string()])
    );

    // Single delete.
    let del: WireCommand =
        serde_json::from_value(json!({"type": "ignore", "character": "Bob", "action": "delete"}))
            .unwrap();
    t.engine.receive(del).await;
    assert_eq!(
        t.engine.roster().names(ListKind::Ignored, false),
        HashSet::from(["Carol".to_string()])
    );

    let changes =
        t.drain().into_iter().filter(|u| matches!(u, Update::ListChanged { .. })).count();
    assert_eq!(changes, 2, "one update per actual list mutation");
}

#[tokio::test]
async fn test_redundant_ignore_publishes_nothing() {
    let mut t = engine();
    t.feed(r#"IGN {"action": "add", "character": "Bob"}"#).await;
    t.drain();

    t.feed(r#"IGN {"action": "add", "character": "Bob"}"#).await;
    t.feed(r#"IGN {"action": "delete", "character": "Unknown"}"#).await;
    assert!(t.drain().is_empty(), "no-op mutations are silently absorbed");
}

#[tokio::test]
async fn test_interested_and_not_interested_can_coexist() {
    // The reference behavior: the two marks are not mutually exclusive.
    // This pins the current semantics; flipping it is a product decision.
    let t = engine();
    let roster = t.engine.roster();

    roster.add("Mara", ListKind::Interested);
    roster.add("Mara", ListKind::NotInterested);
    assert!(roster.is_on_list("Mara", ListKind::Interested, false));
    assert!(roster.is_on_list("Mara", ListKind::NotInterested, false));
    // The dismissal still wins for interest derivation.
    assert!(!roster.is_of_interest("Mara"));
}

#[tokio::test]
async fn test_list_membership_before_presence() {
    let mut t = engine();
    t.feed(r#"FRL {"characters": ["Ghost"]}"#).await;

    let roster = t.engine.roster();
    assert!(roster.is_on_list("Ghost", ListKind::Friend, false));
    assert!(!roster.is_on_list("Ghost", ListKind::Friend, true), "offline membership hidden");
    assert_eq!(roster.find("Ghost").read().status, CharacterStatus::Offline);

    t.feed(r#"NLN {"identity": "Ghost", "gender": "Female", "status": "online"}"#).await;
    assert!(roster.is_on_list("Ghost", ListKind::Friend, true));
}

#[tokio::test]
async fn test_global_op_roster_and_singles() {
    let mut t = engine();
    t.feed(r#"ADL {"ops": ["Sable", "Rook"]}"#).await;
    assert!(t.engine.roster().is_on_list("Sable", ListKind::Moderator, false));

    t.feed(r#"AOP {"character": "Wren"}"#).await;
    t.feed(r#"DOP {"character": "Rook"}"#).await;
    assert_eq!(
        t.engine.roster().names(ListKind::Moderator, false),
        HashSet::from(["Sable".to_string(), "Wren".to_string()])
    );

    let updates = t.drain();
    assert!(updates.iter().any(|u| matches!(u, Update::Promoted { character, channel: None } if character == "Wren")));
    assert!(updates.iter().any(|u| matches!(u, Update::Demoted { character, channel: None } if character == "Rook")));
}

#[tokio::test]
async fn test_bulk_roster_page() {
    let mut t = engine();
    t.feed(
        r#"LIS {"characters": [["Ada", "Female", "online", ""], ["Bee", "Male", "looking", "rp?"], ["Cyn", "None", "away", "brb"]]}"#,
    )
    .await;

    let roster = t.engine.roster();
    assert!(roster.is_online("Ada"));
    assert_eq!(roster.find("Bee").read().status, CharacterStatus::Looking);
    assert_eq!(roster.find("Cyn").read().status_message, "brb");

    // One page, one update.
    let updates = t.drain();
    assert_eq!(updates.len(), 1);
    assert!(matches!(updates[0], Update::RosterPage { count: 3 }));
}

#[tokio::test]
async fn test_bridge_events_move_pending_requests() {
    let mut t = engine();
    t.feed(r#"RTB {"type": "friendrequest", "name": "Dove"}"#).await;
    assert!(t.engine.roster().is_on_list("Dove", ListKind::FriendRequestReceived, false));
    assert!(t.drain().iter().any(|u| matches!(u, Update::FriendRequest { .. })));

    t.feed(r#"RTB {"type": "friendadd", "name": "Dove"}"#).await;
    let roster = t.engine.roster();
    assert!(roster.is_on_list("Dove", ListKind::Friend, false));
    assert!(!roster.is_on_list("Dove", ListKind::FriendRequestReceived, false));
}
