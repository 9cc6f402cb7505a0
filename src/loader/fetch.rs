use std::collections::HashMap;
use std::sync::Arc;
#[cfg(feature = "http")]
use std::time::Duration;

use crate::foundation::error::{NinError, NinResult};
use crate::loader::resolve::strip_query;

/// Blocking network access for network-mode batches.
pub trait Fetcher: Send + Sync {
    /// GET `url` as text.
    fn get_text(&self, url: &str) -> NinResult<String>;
    /// GET `url` as bytes.
    fn get_bytes(&self, url: &str) -> NinResult<Vec<u8>>;
}

/// HTTP(S) fetcher.
///
/// Every request is bounded by the agent timeout, so a server that accepts the connection and
/// never answers settles the request as failed instead of stalling its batch.
#[cfg(feature = "http")]
#[derive(Clone, Debug)]
pub struct HttpFetcher {
    agent: ureq::Agent,
    timeout: Duration,
}

#[cfg(feature = "http")]
impl HttpFetcher {
    /// Overall per-request timeout used by [`HttpFetcher::new`].
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

    /// Fetcher with [`HttpFetcher::DEFAULT_TIMEOUT`].
    pub fn new() -> Self {
        Self::with_timeout(Self::DEFAULT_TIMEOUT)
    }

    /// Fetcher whose requests fail once `timeout` elapses, covering connect and body read.
    pub fn with_timeout(timeout: Duration) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(timeout).build();
        Self { agent, timeout }
    }

    /// Overall per-request timeout.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    fn call(&self, url: &str) -> NinResult<ureq::Response> {
        self.agent.get(url).call().map_err(|e| match e {
            ureq::Error::Status(code, _) => NinError::load(format!("GET {url}: HTTP {code}")),
            other => NinError::load(format!("GET {url}: {other}")),
        })
    }
}

#[cfg(feature = "http")]
impl Default for HttpFetcher {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(feature = "http")]
impl Fetcher for HttpFetcher {
    fn get_text(&self, url: &str) -> NinResult<String> {
        self.call(url)?
            .into_string()
            .map_err(|e| NinError::load(format!("read body of {url}: {e}")))
    }

    fn get_bytes(&self, url: &str) -> NinResult<Vec<u8>> {
        use std::io::Read as _;

        let mut buf = Vec::new();
        self.call(url)?
            .into_reader()
            .read_to_end(&mut buf)
            .map_err(|e| NinError::load(format!("read body of {url}: {e}")))?;
        Ok(buf)
    }
}

/// Fetcher answering from an in-memory map. Query strings are ignored when looking up a URL.
#[derive(Clone, Debug, Default)]
pub struct MemoryFetcher {
    entries: HashMap<String, Vec<u8>>,
}

impl MemoryFetcher {
    /// Empty fetcher; every request fails.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `body` at `url`.
    pub fn with(mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) -> Self {
        self.insert(url, body);
        self
    }

    /// Serve `body` at `url`, replacing any previous body.
    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<Vec<u8>>) {
        self.entries.insert(url.into(), body.into());
    }

    fn lookup(&self, url: &str) -> NinResult<&[u8]> {
        self.entries
            .get(strip_query(url))
            .map(Vec::as_slice)
            .ok_or_else(|| NinError::load(format!("GET {url}: not found")))
    }
}

impl Fetcher for MemoryFetcher {
    fn get_text(&self, url: &str) -> NinResult<String> {
        Ok(String::from_utf8_lossy(self.lookup(url)?).into_owned())
    }

    fn get_bytes(&self, url: &str) -> NinResult<Vec<u8>> {
        Ok(self.lookup(url)?.to_vec())
    }
}

/// The fetcher a default [`crate::loader::batch::Loader`] uses.
pub fn default_fetcher() -> Arc<dyn Fetcher> {
    #[cfg(feature = "http")]
    {
        Arc::new(HttpFetcher::new())
    }
    #[cfg(not(feature = "http"))]
    {
        Arc::new(MemoryFetcher::new())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/loader/fetch.rs"]
mod tests;
