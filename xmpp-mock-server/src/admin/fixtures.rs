use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CannedResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// Responses a test harness pre-seeds for the HTTP fixtures the client fetches.
pub trait FixtureStore: Send + Sync {
    fn inject(&self, key: &str, status: u16, headers: Vec<(String, String)>, body: String);
    fn reset(&self);
    fn get(&self, key: &str) -> Option<CannedResponse>;
}

#[derive(Debug, Default)]
pub struct CannedResponses {
    responses: Mutex<HashMap<String, CannedResponse>>,
}

impl CannedResponses {
    pub fn new() -> Self {
        CannedResponses::default()
    }

    fn responses(&self) -> MutexGuard<'_, HashMap<String, CannedResponse>> {
        self.responses
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

fn normalize(key: &str) -> &str {
    key.trim().trim_start_matches('/')
}

impl FixtureStore for CannedResponses {
    fn inject(&self, key: &str, status: u16, headers: Vec<(String, String)>, body: String) {
        self.responses().insert(
            normalize(key).to_string(),
            CannedResponse {
                status,
                headers,
                body,
            },
        );
    }

    fn reset(&self) {
        self.responses().clear();
    }

    fn get(&self, key: &str) -> Option<CannedResponse> {
        self.responses().get(normalize(key)).cloned()
    }
}
