//! Integration tests for end-to-end flows: ad dedup, messaging, typing,
//! moderation, and the error-text classifier.

mod common;

use common::engine;
use fennec::{CharacterStatus, ErrorClass, ListKind, TypingStatus, Update};

async fn join_frontier(t: &common::TestEngine) {
    t.feed(r#"JCH {"channel": "Frontier", "character": {"identity": "Mara"}, "title": "Frontier"}"#)
        .await;
}

#[tokio::test]
async fn test_duplicate_ad_suppressed_then_new_text_delivered() {
    let mut t = engine();
    join_frontier(&t).await;
    t.feed(r#"NLN {"identity": "Dan", "status": "online"}"#).await;
    t.drain();

    t.feed(r#"LRP {"channel": "Frontier", "character": "Dan", "message": "buy my wares"}"#).await;
    t.feed(r#"LRP {"channel": "Frontier", "character": "Dan", "message": "buy my wares"}"#).await;
    t.feed(r#"LRP {"channel": "Frontier", "character": "Dan", "message": "new stock today"}"#).await;

    let ads: Vec<String> = t
        .drain()
        .into_iter()
        .filter_map(|u| match u {
            Update::Ad { message, .. } => Some(message),
            _ => None,
        })
        .collect();
    assert_eq!(ads, ["buy my wares", "new stock today"]);
    assert_eq!(
        t.engine.roster().find("Dan").read().last_ad.as_deref(),
        Some("new stock today")
    );
}

#[tokio::test]
async fn test_sign_off_clears_ad_fingerprint() {
    let mut t = engine();
    join_frontier(&t).await;
    t.feed(r#"NLN {"identity": "Dan", "status": "online"}"#).await;
    t.feed(r#"LRP {"channel": "Frontier", "character": "Dan", "message": "buy my wares"}"#).await;

    t.feed(r#"FLN {"character": "Dan"}"#).await;
    t.feed(r#"NLN {"identity": "Dan", "status": "online"}"#).await;
    t.drain();

    // Same text again after a fresh login is not a duplicate.
    t.feed(r#"LRP {"channel": "Frontier", "character": "Dan", "message": "buy my wares"}"#).await;
    assert!(t.drain().iter().any(|u| matches!(u, Update::Ad { .. })));
}

#[tokio::test]
async fn test_ignored_character_content_is_dropped() {
    let mut t = engine();
    join_frontier(&t).await;
    t.feed(r#"IGN {"action": "add", "character": "Pest"}"#).await;
    t.drain();

    t.feed(r#"MSG {"channel": "Frontier", "character": "Pest", "message": "hi"}"#).await;
    t.feed(r#"PRI {"character": "Pest", "message": "hi"}"#).await;
    t.feed(r#"LRP {"channel": "Frontier", "character": "Pest", "message": "ad"}"#).await;
    assert!(t.drain().is_empty(), "ignored content produces no updates");
}

#[tokio::test]
async fn test_private_message_opens_surface_and_typing_flows() {
    let mut t = engine();
    t.feed(r#"NLN {"identity": "Dan", "status": "online"}"#).await;
    t.feed(r#"PRI {"character": "Dan", "message": "hey"}"#).await;

    let updates = t.drain();
    assert!(updates.iter().any(|u| matches!(u, Update::PrivateMessage { character, .. } if character == "Dan")));
    assert!(t.engine.roster().has_channel("Dan"), "conversation surface exists");

    t.feed(r#"TPN {"character": "Dan", "status": "typing"}"#).await;
    assert!(t
        .drain()
        .iter()
        .any(|u| matches!(u, Update::TypingChanged { status: TypingStatus::Typing, .. })));

    // Repeating the same state is absorbed.
    t.feed(r#"TPN {"character": "Dan", "status": "typing"}"#).await;
    assert!(t.drain().is_empty());

    // Sign-off clears presence and transient state; later updates no-op.
    t.feed(r#"FLN {"character": "Dan"}"#).await;
    t.drain();
    t.feed(r#"TPN {"character": "Dan", "status": "paused"}"#).await;
    assert!(t.drain().is_empty());
}

#[tokio::test]
async fn test_status_change_updates_record() {
    let mut t = engine();
    t.feed(r#"NLN {"identity": "Dan", "status": "online"}"#).await;
    t.feed(r#"STA {"character": "Dan", "status": "busy", "statusmsg": "writing"}"#).await;

    let record = t.engine.roster().find("Dan");
    assert_eq!(record.read().status, CharacterStatus::Busy);
    assert_eq!(record.read().status_message, "writing");
    assert!(t
        .drain()
        .iter()
        .any(|u| matches!(u, Update::StatusChanged { status: CharacterStatus::Busy, .. })));
}

#[tokio::test]
async fn test_kick_of_self_removes_channel() {
    let mut t = engine();
    join_frontier(&t).await;
    t.drain();

    t.feed(r#"CKU {"channel": "Frontier", "operator": "Sable", "character": "Mara"}"#).await;
    assert!(!t.engine.roster().has_channel("Frontier"));
    assert!(t
        .drain()
        .iter()
        .any(|u| matches!(u, Update::Kicked { character, .. } if character == "Mara")));
}

#[tokio::test]
async fn test_ban_persists_for_offline_name() {
    let mut t = engine();
    join_frontier(&t).await;
    t.feed(r#"JCH {"channel": "Frontier", "character": {"identity": "Vex"}}"#).await;
    t.feed(r#"CBU {"channel": "Frontier", "operator": "Sable", "character": "Vex"}"#).await;
    t.feed(r#"FLN {"character": "Vex"}"#).await;

    let channel = t.engine.roster().channel("Frontier").expect("channel exists");
    assert!(!channel.read().roles.is_present("Vex"));
    assert!(channel.read().roles.is_on_list("Vex", ListKind::Banned));

    // Unban lifts it; a second unban is a no-op with no update.
    t.drain();
    t.feed(r#"CUB {"channel": "Frontier", "operator": "Sable", "character": "Vex"}"#).await;
    assert!(t.drain().iter().any(|u| matches!(u, Update::Unbanned { .. })));
    t.feed(r#"CUB {"channel": "Frontier", "operator": "Sable", "character": "Vex"}"#).await;
    assert!(t.drain().is_empty());
}

#[tokio::test]
async fn test_channel_snapshot_and_mode() {
    let mut t = engine();
    join_frontier(&t).await;
    t.feed(
        r#"ICH {"channel": "Frontier", "users": [{"identity": "Mara"}, {"identity": "Dan"}], "mode": "ads"}"#,
    )
    .await;

    let channel = t.engine.roster().channel("Frontier").expect("channel exists");
    assert_eq!(channel.read().user_count, 2);
    assert!(channel.read().roles.is_present("Dan"));
    assert_eq!(
        channel.read().roles.present_names(),
        ["Mara".to_string(), "Dan".to_string()].into_iter().collect()
    );

    t.feed(r#"RMO {"channel": "Frontier", "mode": "chat"}"#).await;
    assert!(t.drain().iter().any(|u| matches!(u, Update::ChannelModeChanged { .. })));
}

#[tokio::test]
async fn test_message_interest_classification() {
    let mut t = engine();
    join_frontier(&t).await;
    t.feed(r#"FRL {"characters": ["Dan"]}"#).await;
    t.drain();

    t.feed(r#"MSG {"channel": "Frontier", "character": "Dan", "message": "hi"}"#).await;
    t.feed(r#"MSG {"channel": "Frontier", "character": "Stranger", "message": "hi"}"#).await;

    let flags: Vec<bool> = t
        .drain()
        .into_iter()
        .filter_map(|u| match u {
            Update::ChannelMessage { of_interest, .. } => Some(of_interest),
            _ => None,
        })
        .collect();
    assert_eq!(flags, [true, false]);
}

#[tokio::test]
async fn test_error_text_is_classified() {
    let mut t = engine();
    t.feed(r#"ERR {"message": "Vex has been promoted in Frontier."}"#).await;
    t.feed(r#"ERR {"message": "inexplicable server mood"}"#).await;

    let classes: Vec<ErrorClass> = t
        .drain()
        .into_iter()
        .filter_map(|u| match u {
            Update::ClassifiedError { class, .. } => Some(class),
            _ => None,
        })
        .collect();
    assert_eq!(classes, [ErrorClass::Promotion, ErrorClass::Unclassified]);
}

#[tokio::test]
async fn test_directory_snapshot() {
    let mut t = engine();
    t.feed(
        r#"CHA {"channels": [{"name": "Frontier", "characters": 120}, {"name": "Dockside", "characters": 8}]}"#,
    )
    .await;

    let rows = t.engine.roster().directory(true);
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].id, "Frontier");
    assert!(t
        .drain()
        .iter()
        .any(|u| matches!(u, Update::ChannelDirectory { public: true, count: 2 })));
}

#[tokio::test]
async fn test_server_state_announcements() {
    let mut t = engine();
    t.feed(r#"CON {"count": 4021}"#).await;
    t.feed(r#"VAR {"variable": "chat_max", "value": 4096}"#).await;
    t.feed(r#"UPT {"users": 4021, "channels": 780, "maxusers": 5120}"#).await;
    t.feed(r#"BRO {"message": "maintenance at midnight", "character": "Sable"}"#).await;

    assert_eq!(t.engine.roster().variable("chat_max"), Some(serde_json::json!(4096)));

    let updates = t.drain();
    assert!(updates.iter().any(|u| matches!(u, Update::UserCountChanged { count: 4021 })));
    assert!(updates.iter().any(|u| matches!(u, Update::ServerVariable { .. })));
    assert!(updates.iter().any(|u| matches!(u, Update::ServerUptime { channels: 780, .. })));
    assert!(updates
        .iter()
        .any(|u| matches!(u, Update::Broadcast { character: Some(c), .. } if c == "Sable")));
}

#[tokio::test]
async fn test_channel_scoped_notice_defers_like_any_channel_command() {
    let mut t = engine();
    t.feed(r#"SYS {"channel": "Frontier", "message": "channel rules updated"}"#).await;
    assert_eq!(t.engine.pending_requeues(), 1);
    assert!(t.drain().is_empty());

    join_frontier(&t).await;
    let updates = t.drain();
    assert!(updates
        .iter()
        .any(|u| matches!(u, Update::SystemNotice { channel: Some(c), .. } if c == "Frontier")));
}

#[tokio::test]
async fn test_staff_report_remembered_for_replay() {
    let mut t = engine();
    t.feed(
        r#"SFC {"action": "report", "character": "Witness", "report": "spam in Frontier", "callid": 77}"#,
    )
    .await;
    t.feed(r#"SFC {"action": "confirm", "moderator": "Sable", "character": "Witness"}"#).await;

    assert_eq!(
        t.engine.roster().find("Witness").read().last_report.as_deref(),
        Some("spam in Frontier")
    );
    let reports =
        t.drain().into_iter().filter(|u| matches!(u, Update::Report { .. })).count();
    assert_eq!(reports, 1, "confirmation traffic raises no new report");
}

#[tokio::test]
async fn test_stopped_engine_discards_input() {
    let mut t = engine();
    t.engine.shutdown();
    t.feed(r#"NLN {"identity": "Dan", "status": "online"}"#).await;
    assert!(t.drain().is_empty());
    assert!(!t.engine.roster().is_online("Dan"));
}
