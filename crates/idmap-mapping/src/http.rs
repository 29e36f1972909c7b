//! HTTP access for the readers
//!
//! Readers never talk to `reqwest` directly. They receive a `&dyn Fetcher`,
//! which is [`HttpFetcher`] in production and [`MockFetcher`] in tests.

use crate::error::{MappingError, Result};
use flate2::read::MultiGzDecoder;
use parking_lot::Mutex;
use std::collections::{HashMap, VecDeque};
use std::io::Read;
use std::time::Duration;
use tracing::debug;

const GZIP_MAGIC: [u8; 2] = [0x1f, 0x8b];

/// Blocking byte-level access to remote resources.
///
/// Gzip bodies are inflated before they are returned.
pub trait Fetcher: Send + Sync {
    fn get_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>>;

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Vec<u8>>;

    fn get(&self, url: &str) -> Result<Vec<u8>> {
        self.get_with_query(url, &[])
    }

    fn get_text(&self, url: &str, query: &[(&str, &str)]) -> Result<String> {
        let bytes = self.get_with_query(url, query)?;
        String::from_utf8(bytes).map_err(|e| MappingError::parse(url, e))
    }
}

/// Inflate `data` when it starts with the gzip magic bytes, otherwise return it as is
pub fn decompress_if_gzip(data: Vec<u8>) -> Result<Vec<u8>> {
    if !data.starts_with(&GZIP_MAGIC) {
        return Ok(data);
    }

    let mut decoder = MultiGzDecoder::new(data.as_slice());
    let mut inflated = Vec::new();
    decoder.read_to_end(&mut inflated)?;
    debug!("Decompressed {} -> {} bytes", data.len(), inflated.len());
    Ok(inflated)
}

fn url_with_query(url: &str, query: &[(&str, &str)]) -> String {
    if query.is_empty() {
        return url.to_string();
    }
    match reqwest::Url::parse_with_params(url, query) {
        Ok(parsed) => parsed.to_string(),
        Err(_) => url.to_string(),
    }
}

// ============================================================================
// HttpFetcher
// ============================================================================

pub struct HttpFetcher {
    client: reqwest::blocking::Client,
}

impl HttpFetcher {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("idmap/", env!("CARGO_PKG_VERSION")))
            .redirect(reqwest::redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    fn finish(url: &str, response: reqwest::blocking::Response) -> Result<Vec<u8>> {
        let status = response.status();
        if !status.is_success() {
            return Err(MappingError::Network {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }
        let body = response.bytes()?.to_vec();
        debug!(url = %url, bytes = body.len(), "Fetched");
        decompress_if_gzip(body)
    }
}

impl Fetcher for HttpFetcher {
    fn get_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        let response = self.client.get(url).query(query).send()?;
        Self::finish(url, response)
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Vec<u8>> {
        let response = self.client.post(url).form(form).send()?;
        Self::finish(url, response)
    }
}

// ============================================================================
// MockFetcher
// ============================================================================

#[derive(Debug, Clone)]
enum MockResponse {
    Body(Vec<u8>),
    Status(u16),
}

/// One request seen by a [`MockFetcher`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRequest {
    pub method: &'static str,
    /// Full URL including the encoded query string
    pub url: String,
    pub form: Vec<(String, String)>,
}

/// Canned responses keyed by URL prefix.
///
/// The longest matching prefix wins. A sequence of responses is consumed in
/// order and its last element repeats. Unknown URLs answer with a 404
/// [`MappingError::Network`].
#[derive(Default)]
pub struct MockFetcher {
    routes: Mutex<HashMap<String, VecDeque<MockResponse>>>,
    requests: Mutex<Vec<RecordedRequest>>,
}

impl MockFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(self, url_prefix: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.routes
            .lock()
            .insert(url_prefix.into(), VecDeque::from([MockResponse::Body(body.into())]));
        self
    }

    pub fn with_sequence<B: Into<Vec<u8>>>(
        self,
        url_prefix: impl Into<String>,
        bodies: impl IntoIterator<Item = B>,
    ) -> Self {
        let queue = bodies.into_iter().map(|b| MockResponse::Body(b.into())).collect();
        self.routes.lock().insert(url_prefix.into(), queue);
        self
    }

    pub fn with_status(self, url_prefix: impl Into<String>, status: u16) -> Self {
        self.routes
            .lock()
            .insert(url_prefix.into(), VecDeque::from([MockResponse::Status(status)]));
        self
    }

    pub fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().clone()
    }

    /// Number of recorded requests whose URL starts with `url_prefix`
    pub fn request_count(&self, url_prefix: &str) -> usize {
        self.requests
            .lock()
            .iter()
            .filter(|r| r.url.starts_with(url_prefix))
            .count()
    }

    fn respond(&self, method: &'static str, url: String, form: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.requests.lock().push(RecordedRequest {
            method,
            url: url.clone(),
            form: form
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        });

        let mut routes = self.routes.lock();
        let prefix = routes
            .keys()
            .filter(|prefix| url.starts_with(prefix.as_str()))
            .max_by_key(|prefix| prefix.len())
            .cloned();

        let response = prefix.and_then(|prefix| {
            let queue = routes.get_mut(&prefix)?;
            if queue.len() > 1 {
                queue.pop_front()
            } else {
                queue.front().cloned()
            }
        });

        match response {
            Some(MockResponse::Body(body)) => decompress_if_gzip(body),
            Some(MockResponse::Status(status)) => Err(MappingError::Network { url, status }),
            None => Err(MappingError::Network { url, status: 404 }),
        }
    }
}

impl Fetcher for MockFetcher {
    fn get_with_query(&self, url: &str, query: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.respond("GET", url_with_query(url, query), &[])
    }

    fn post_form(&self, url: &str, form: &[(&str, &str)]) -> Result<Vec<u8>> {
        self.respond("POST", url.to_string(), form)
    }
}
