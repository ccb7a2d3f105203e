#![allow(dead_code)]

use fpl_spider::fetch::Fetch;
use fpl_spider::{Error, Result};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Mutex;

pub const BASE: &str = "https://fantasy.premierleague.com/api/";

/// Reads a fixture from `tests/files`.
pub async fn fixture(name: &str) -> Value {
    let path = format!("{}/tests/files/{name}", env!("CARGO_MANIFEST_DIR"));
    fpl_spider::fs::read_json(&path)
        .await
        .unwrap_or_else(|err| panic!("fixture {path}: {err}"))
}

/// Serves canned bodies by URL and records every request.
///
/// Unknown URLs fail like an unreachable server would.
#[derive(Default)]
pub struct FixtureFetcher {
    bodies: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl FixtureFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Serves `json` at `BASE` + `path`.
    pub fn with(mut self, path: &str, json: &Value) -> Self {
        self.bodies.insert(format!("{BASE}{path}"), json.to_string());
        self
    }

    /// Serves a raw body, which need not be JSON.
    pub fn with_raw(mut self, path: &str, body: &str) -> Self {
        self.bodies.insert(format!("{BASE}{path}"), body.to_string());
        self
    }

    pub fn requests(&self) -> Vec<String> {
        self.requests.lock().unwrap().clone()
    }

    pub fn request_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

impl Fetch for FixtureFetcher {
    async fn get_json(&self, url: &str) -> Result<Value> {
        self.requests.lock().unwrap().push(url.to_string());

        let Some(body) = self.bodies.get(url) else {
            return Err(Error::Transport {
                url: url.to_string(),
                source: transport_error().await,
            });
        };

        serde_json::from_str(body).map_err(|source| Error::MalformedJson {
            url: url.to_string(),
            source,
        })
    }
}

// a genuine reqwest error, produced without touching the network
async fn transport_error() -> reqwest::Error {
    reqwest::Client::new()
        .get("http://")
        .send()
        .await
        .expect_err("request without a host cannot be sent")
}
