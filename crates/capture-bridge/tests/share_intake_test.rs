//! End-to-end share intake tests.
//!
//! Drives the bridge the way a host and a consumer would: share events in,
//! fetches and pushes out.

mod helpers;

use capture_bridge::{
    Attachment, IntakeEvent, RawShareIntent, SharePayload, FETCH_METHOD,
};
use capture_storage::FileSource;
use helpers::{attachment, setup_bridge, staged_count};

#[tokio::test]
async fn test_plain_text_share() {
    let app = setup_bridge().await;

    app.bridge
        .on_share_event(IntakeEvent::text("remember the milk", None))
        .await;

    let payload = app.bridge.fetch();
    assert_eq!(payload.text.as_deref(), Some("remember the milk"));
    assert_eq!(payload.url, None);
    assert!(payload.file_paths.is_empty());
}

#[tokio::test]
async fn test_bare_url_share_with_subject() {
    let app = setup_bridge().await;

    app.bridge
        .on_share_event(IntakeEvent::text("https://example.com", None))
        .await;
    let payload = app.bridge.fetch();
    assert_eq!(payload.url.as_deref(), Some("https://example.com"));
    assert_eq!(payload.text.as_deref(), Some(""));

    app.bridge
        .on_share_event(IntakeEvent::text(
            "https://example.com",
            Some("My Link".to_string()),
        ))
        .await;
    let payload = app.bridge.fetch();
    assert_eq!(payload.url.as_deref(), Some("https://example.com"));
    assert_eq!(payload.text.as_deref(), Some("My Link"));
}

#[tokio::test]
async fn test_embedded_url_share() {
    let app = setup_bridge().await;

    app.bridge
        .on_share_event(IntakeEvent::text("check this out https://x.co/a see", None))
        .await;

    let payload = app.bridge.fetch();
    assert_eq!(payload.url.as_deref(), Some("https://x.co/a"));
    assert_eq!(
        payload.text.as_deref(),
        Some("check this out https://x.co/a see")
    );
}

#[tokio::test]
async fn test_png_attachment_staged_byte_for_byte() {
    let app = setup_bridge().await;
    let source_path = app.dir.path().join("photo-from-gallery");
    let data: Vec<u8> = (0..=255u8).cycle().take(64 * 1024 + 7).collect();
    std::fs::write(&source_path, &data).unwrap();

    app.bridge
        .on_share_event(IntakeEvent::SingleAttachment(Attachment::new(
            Some("image/png".to_string()),
            FileSource::new(&source_path),
        )))
        .await;

    let payload = app.bridge.fetch();
    assert_eq!(payload.file_paths.len(), 1);
    let staged = &payload.file_paths[0];
    assert!(staged.ends_with(".png"));
    assert!(std::path::Path::new(staged).is_absolute());
    assert_eq!(std::fs::read(staged).unwrap(), data);
}

#[tokio::test]
async fn test_unknown_mime_attachment_dropped_silently() {
    let app = setup_bridge().await;

    app.bridge
        .on_share_event(IntakeEvent::SingleAttachment(attachment(
            "application/x-unknown-weird",
            b"mystery",
        )))
        .await;

    let payload = app.bridge.fetch();
    assert!(payload.file_paths.is_empty());
    assert!(payload.is_empty());
    assert_eq!(staged_count(&app.bridge), 0);
}

#[tokio::test]
async fn test_fetch_twice_returns_payload_once() {
    let app = setup_bridge().await;
    app.bridge
        .on_share_event(IntakeEvent::text("once", None))
        .await;

    assert_eq!(app.bridge.fetch(), SharePayload::from_text("once", None));
    assert_eq!(app.bridge.fetch(), SharePayload::empty());
}

#[tokio::test]
async fn test_multiple_attachments_order() {
    let app = setup_bridge().await;

    app.bridge
        .on_share_event(IntakeEvent::MultipleAttachments(vec![
            attachment("image/png", b"a"),
            attachment("application/pdf", b"b"),
            attachment("application/x-unsupported", b"c"),
            attachment("audio/mpeg", b"d"),
        ]))
        .await;

    let payload = app.bridge.fetch();
    let contents: Vec<Vec<u8>> = payload
        .file_paths
        .iter()
        .map(|p| std::fs::read(p).unwrap())
        .collect();
    assert_eq!(contents, vec![b"a".to_vec(), b"b".to_vec(), b"d".to_vec()]);
    assert_eq!(staged_count(&app.bridge), 3);
}

#[tokio::test]
async fn test_last_write_wins() {
    let app = setup_bridge().await;

    app.bridge
        .on_share_event(IntakeEvent::SingleAttachment(attachment("image/gif", b"GIF89a")))
        .await;
    app.bridge
        .on_share_event(IntakeEvent::text("second", None))
        .await;

    assert_eq!(app.bridge.fetch(), SharePayload::from_text("second", None));
    assert!(app.bridge.fetch().is_empty());
    // The first event's file is not cleaned up by the bridge.
    assert_eq!(staged_count(&app.bridge), 1);
}

#[tokio::test]
async fn test_push_and_pull_deliver_same_payload() {
    let app = setup_bridge().await;
    let mut sub = app.bridge.attach();

    app.bridge
        .on_share_event(IntakeEvent::text("pushed https://a.example/b", None))
        .await;

    let pushed = sub.recv().await.expect("push delivered");
    let pulled = app.bridge.handle_method_call(FETCH_METHOD).unwrap();
    assert_eq!(serde_json::to_value(&pushed.payload).unwrap(), pulled);
}

#[tokio::test]
async fn test_no_consumer_attached_keeps_payload() {
    let app = setup_bridge().await;
    assert!(!app.bridge.is_attached());

    app.bridge
        .on_share_event(IntakeEvent::text("waiting", None))
        .await;

    // Attaching later does not replay the missed push.
    let mut sub = app.bridge.attach();
    assert!(sub.try_recv().is_none());
    assert_eq!(app.bridge.fetch(), SharePayload::from_text("waiting", None));
}

#[tokio::test]
async fn test_raw_intent_paths() {
    let app = setup_bridge().await;

    let handled = app
        .bridge
        .on_intent(RawShareIntent {
            action: Some("android.intent.action.SEND".to_string()),
            mime_type: Some("text/plain".to_string()),
            text: Some("https://example.com/article".to_string()),
            subject: Some("Article".to_string()),
            streams: Vec::new(),
        })
        .await;
    assert!(handled);

    // Ignored trigger leaves the pending payload alone.
    let handled = app
        .bridge
        .on_intent(RawShareIntent {
            action: Some("android.intent.action.VIEW".to_string()),
            mime_type: Some("text/plain".to_string()),
            text: Some("ignored".to_string()),
            ..Default::default()
        })
        .await;
    assert!(!handled);

    let payload = app.bridge.fetch();
    assert_eq!(payload.url.as_deref(), Some("https://example.com/article"));
    assert_eq!(payload.text.as_deref(), Some("Article"));

    let handled = app
        .bridge
        .on_intent(RawShareIntent {
            action: Some("send-multiple".to_string()),
            mime_type: Some("image/*".to_string()),
            streams: vec![
                attachment("image/webp", b"webp"),
                Attachment::new(None, capture_storage::BytesSource::new(&b"wild"[..])),
            ],
            ..Default::default()
        })
        .await;
    assert!(handled);

    // The second stream inherits "image/*", which maps to no extension.
    let payload = app.bridge.fetch();
    assert_eq!(payload.file_paths.len(), 1);
    assert!(payload.file_paths[0].ends_with(".webp"));
}

#[test]
fn test_concurrent_events_and_fetches_from_threads() {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .enable_all()
        .build()
        .unwrap();
    let app = runtime.block_on(setup_bridge());

    let producer = {
        let bridge = app.bridge.clone();
        let handle = runtime.handle().clone();
        std::thread::spawn(move || {
            for i in 0..50 {
                handle.block_on(bridge.on_share_event(IntakeEvent::text(format!("note {i}"), None)));
            }
        })
    };

    let consumer = {
        let bridge = app.bridge.clone();
        std::thread::spawn(move || {
            let mut seen = Vec::new();
            for _ in 0..200 {
                let payload = bridge.fetch();
                if let Some(text) = payload.text {
                    seen.push(text);
                }
                std::thread::yield_now();
            }
            seen
        })
    };

    producer.join().unwrap();
    let mut seen = consumer.join().unwrap();
    if let Some(text) = app.bridge.fetch().text {
        seen.push(text);
    }

    // Every payload is delivered at most once and in arrival order.
    let numbers: Vec<u32> = seen
        .iter()
        .map(|t| t.trim_start_matches("note ").parse().unwrap())
        .collect();
    assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    assert_eq!(numbers.last(), Some(&49));
}
