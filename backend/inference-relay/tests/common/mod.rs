//! Shared fixtures for pipeline integration tests
#![allow(dead_code)]

use image::{DynamicImage, ImageOutputFormat, Rgb, RgbImage};
use inference_relay::{Config, Credentials, EventPipeline, ObjectStore, RelayError};
use mockall::mock;
use std::io::{Cursor, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};
use wiremock::MockServer;

pub const API_KEY: &str = "key-123";
pub const EMAIL: &str = "user@example.com";
pub const PASSWORD: &str = "hunter2";

mock! {
    pub Store {}

    #[async_trait::async_trait]
    impl ObjectStore for Store {
        async fn download_to_path(&self, bucket: &str, key: &str, dest: &Path) -> inference_relay::Result<u64>;
    }
}

/// RGB JPEG with a simple gradient
pub fn jpeg_fixture(width: u32, height: u32) -> Vec<u8> {
    let img = RgbImage::from_fn(width, height, |x, y| {
        Rgb([(x % 256) as u8, (y % 256) as u8, ((x * y) % 256) as u8])
    });
    let mut buf = Vec::new();
    DynamicImage::ImageRgb8(img)
        .write_to(&mut Cursor::new(&mut buf), ImageOutputFormat::Jpeg(90))
        .expect("encode fixture");
    buf
}

/// Store that serves `bytes` for every download
pub fn store_serving(bytes: Vec<u8>, times: usize) -> MockStore {
    let mut store = MockStore::new();
    store
        .expect_download_to_path()
        .times(times)
        .returning(move |_, _, dest| {
            std::fs::write(dest, &bytes).map_err(|e| RelayError::Fetch(e.to_string()))?;
            Ok(bytes.len() as u64)
        });
    store
}

/// Store that must never be called
pub fn untouched_store() -> MockStore {
    let mut store = MockStore::new();
    store.expect_download_to_path().never();
    store
}

pub fn credentials() -> Credentials {
    Credentials::new(API_KEY, EMAIL, PASSWORD)
}

pub fn pipeline(server: &MockServer, store: MockStore, staging_dir: &Path) -> EventPipeline {
    let config = Config {
        auth_url: format!("{}/auth", server.uri()),
        predict_url: format!("{}/predict", server.uri()),
        thumbnail_width: 28,
        staging_dir: staging_dir.to_path_buf(),
        http_timeout_secs: Some(5),
    };
    let store: Arc<dyn ObjectStore> = Arc::new(store);
    EventPipeline::new(&config, credentials(), store).expect("pipeline builds")
}

pub fn staged_files(dir: &Path) -> usize {
    std::fs::read_dir(dir).expect("staging dir readable").count()
}

/// In-memory log sink for asserting on log output
#[derive(Clone, Default)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl CapturedLogs {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
