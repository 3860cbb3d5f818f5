//! Pluggable frequency signals for hypothesis costing.
//!
//! A [`FrequencyEstimator`] maps a hypothesis query string to a proxy for
//! real-world frequency. Estimators are insulated from their own transient
//! failures: a backend error yields the configured default frequency, never
//! an error, because IG* aggregation must not fall over on a flaky lookup.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde_json::Value;

/// Capability interface for frequency lookups.
#[async_trait]
pub trait FrequencyEstimator: Send + Sync {
    /// Estimated frequency for a query. Infallible by contract; failing
    /// backends return a conservative default.
    async fn frequency(&self, query: &str) -> u64;
}

/// In-memory frequency cache with TTL.
#[derive(Debug)]
pub struct FrequencyCache {
    ttl: Duration,
    store: Mutex<HashMap<String, (Instant, u64)>>,
}

impl FrequencyCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            store: Mutex::new(HashMap::new()),
        }
    }

    pub fn get(&self, key: &str) -> Option<u64> {
        let mut store = self.store.lock().expect("frequency cache poisoned");
        match store.get(key) {
            Some((at, freq)) if at.elapsed() <= self.ttl => Some(*freq),
            Some(_) => {
                store.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn set(&self, key: &str, freq: u64) {
        let mut store = self.store.lock().expect("frequency cache poisoned");
        store.insert(key.to_string(), (Instant::now(), freq));
    }
}

impl Default for FrequencyCache {
    fn default() -> Self {
        // One week, matching typical churn of web result counts.
        Self::new(Duration::from_secs(7 * 24 * 3600))
    }
}

/// Offline stub estimator backed by a fixed map. Useful for tests and
/// air-gapped runs.
#[derive(Debug, Clone)]
pub struct StaticEstimator {
    frequencies: HashMap<String, u64>,
    default_freq: u64,
}

impl StaticEstimator {
    pub fn new(frequencies: HashMap<String, u64>, default_freq: u64) -> Self {
        Self {
            frequencies,
            default_freq,
        }
    }
}

#[async_trait]
impl FrequencyEstimator for StaticEstimator {
    async fn frequency(&self, query: &str) -> u64 {
        self.frequencies
            .get(query)
            .copied()
            .unwrap_or(self.default_freq)
    }
}

/// Web-frequency estimator using the Serper.dev search API.
///
/// Returns the estimated total result count for the query, clamped to
/// `[min_freq, max_freq]`. Any transport or parse failure yields
/// `default_freq`.
pub struct SerperEstimator {
    client: reqwest::Client,
    api_key: String,
    cache: Option<FrequencyCache>,
    default_freq: u64,
    min_freq: u64,
    max_freq: Option<u64>,
    timeout: Duration,
}

impl SerperEstimator {
    pub const SERPER_URL: &'static str = "https://google.serper.dev/search";

    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            api_key: api_key.into(),
            cache: Some(FrequencyCache::default()),
            default_freq: 1,
            min_freq: 1,
            max_freq: None,
            timeout: Duration::from_secs(20),
        }
    }

    pub fn with_cache(mut self, cache: Option<FrequencyCache>) -> Self {
        self.cache = cache;
        self
    }

    pub fn with_default_freq(mut self, default_freq: u64) -> Self {
        self.default_freq = default_freq;
        self
    }

    pub fn with_bounds(mut self, min_freq: u64, max_freq: Option<u64>) -> Self {
        self.min_freq = min_freq;
        self.max_freq = max_freq;
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    async fn lookup(&self, query: &str) -> Option<u64> {
        let payload = serde_json::json!({ "q": query, "num": 1 });
        let response = self
            .client
            .post(Self::SERPER_URL)
            .header("X-API-KEY", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .ok()?
            .error_for_status()
            .ok()?;

        let data: Value = response.json().await.ok()?;
        Some(extract_frequency(&data))
    }
}

/// Pull a result-count estimate out of a Serper response. Field names vary
/// across API variants, so several paths are tried before falling back to a
/// crude organic-results proxy.
fn extract_frequency(data: &Value) -> u64 {
    const PATHS: &[&[&str]] = &[
        &["searchInformation", "totalResults"],
        &["search_information", "total_results"],
        &["answerBox", "totalResults"],
    ];

    for path in PATHS {
        let mut node = data;
        let mut found = true;
        for key in *path {
            match node.get(key) {
                Some(next) => node = next,
                None => {
                    found = false;
                    break;
                }
            }
        }
        if found {
            if let Some(total) = value_as_u64(node) {
                if total > 0 {
                    return total;
                }
            }
        }
    }

    let organic = data
        .get("organic")
        .and_then(Value::as_array)
        .map(|a| a.len() as u64)
        .unwrap_or(0);
    (organic * 1000).max(1)
}

fn value_as_u64(value: &Value) -> Option<u64> {
    match value {
        Value::Number(n) => n.as_u64().or_else(|| n.as_f64().map(|f| f.max(0.0) as u64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[async_trait]
impl FrequencyEstimator for SerperEstimator {
    async fn frequency(&self, query: &str) -> u64 {
        let cache_key = format!("serper::{query}");
        if let Some(cache) = &self.cache {
            if let Some(cached) = cache.get(&cache_key) {
                return cached;
            }
        }

        let freq = match self.lookup(query).await {
            Some(freq) => freq,
            None => {
                tracing::warn!("serper lookup failed for {query:?}, using default");
                self.default_freq
            }
        };

        let mut freq = freq.max(self.min_freq);
        if let Some(max) = self.max_freq {
            freq = freq.min(max);
        }

        if let Some(cache) = &self.cache {
            cache.set(&cache_key, freq);
        }
        freq
    }
}
