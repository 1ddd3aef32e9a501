//! Shared helpers for the wiremock-backed integration tests.

use std::io;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use reqres::config::parse_base_url;
use reqres::{ResultCache, RetryPolicy, UserDirectoryClient};
use serde_json::{json, Value};
use tracing_subscriber::fmt::MakeWriter;
use wiremock::MockServer;

/// Backoff unit used in tests; the real schedule uses whole seconds.
pub const TEST_BACKOFF_UNIT: Duration = Duration::from_millis(20);

/// Client pointed at `server` with a shortened retry schedule.
pub fn client_for(server: &MockServer) -> UserDirectoryClient {
    client_with_cache(server, ResultCache::new())
}

#[allow(dead_code)]
pub fn client_with_cache(server: &MockServer, cache: ResultCache) -> UserDirectoryClient {
    let base_url = parse_base_url(&server.uri()).unwrap();
    UserDirectoryClient::new(base_url, cache)
        .with_retry_policy(RetryPolicy::new(3, TEST_BACKOFF_UNIT))
}

pub fn user_json(id: i64, first_name: &str, last_name: &str) -> Value {
    json!({
        "id": id,
        "email": format!("{}.{}@reqres.in", first_name.to_lowercase(), last_name.to_lowercase()),
        "first_name": first_name,
        "last_name": last_name,
    })
}

#[allow(dead_code)]
pub fn page_json(page: u32, total_pages: u32, users: Vec<Value>) -> Value {
    json!({
        "page": page,
        "per_page": 6,
        "total": total_pages.saturating_mul(6),
        "total_pages": total_pages,
        "data": users,
    })
}

/// In-memory log sink for asserting on formatted `tracing` output.
#[derive(Clone, Default)]
#[allow(dead_code)]
pub struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

#[allow(dead_code)]
impl CapturedLogs {
    pub fn lines(&self) -> Vec<String> {
        let bytes = self.0.lock().unwrap();
        String::from_utf8_lossy(&bytes)
            .lines()
            .map(str::to_string)
            .collect()
    }
}

impl io::Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedLogs;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}
