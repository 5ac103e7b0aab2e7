//! Shared setup for bridge integration tests.

#![allow(dead_code)]

use capture_bridge::{Attachment, IntakeBridge};
use capture_core::IntakeConfig;
use capture_storage::BytesSource;
use tempfile::TempDir;

pub struct TestBridge {
    pub bridge: IntakeBridge,
    // Keeps the staging directory alive for the duration of the test.
    pub dir: TempDir,
}

pub async fn setup_bridge() -> TestBridge {
    let dir = tempfile::tempdir().expect("create temp dir");
    let config = IntakeConfig {
        sync_staged_files: false,
        ..IntakeConfig::default()
    }
    .with_staging_dir(dir.path().join("shared"));

    let bridge = IntakeBridge::from_config(&config)
        .await
        .expect("create bridge");

    TestBridge { bridge, dir }
}

pub fn attachment(mime: &str, data: &'static [u8]) -> Attachment {
    Attachment::new(Some(mime.to_string()), BytesSource::new(data))
}

pub fn staged_count(bridge: &IntakeBridge) -> usize {
    std::fs::read_dir(bridge.builder().stager().staging_dir())
        .expect("read staging dir")
        .count()
}
