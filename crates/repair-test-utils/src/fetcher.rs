//! In-memory archive source.

use std::io::Write;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use repair_core::{Error, Fetcher, Result};

/// Serves fixed bytes for any URL and counts requests.
#[derive(Debug)]
pub struct CountingFetcher {
    body: Mutex<Vec<u8>>,
    requests: AtomicUsize,
}

impl CountingFetcher {
    pub fn new(body: impl Into<Vec<u8>>) -> Self {
        Self {
            body: Mutex::new(body.into()),
            requests: AtomicUsize::new(0),
        }
    }

    /// Number of `fetch` calls so far.
    pub fn requests(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }

    /// Replace the served bytes, e.g. to simulate a corrupted mirror.
    pub fn set_body(&self, body: impl Into<Vec<u8>>) {
        *self.body.lock().unwrap() = body.into();
    }
}

impl Fetcher for CountingFetcher {
    fn fetch(&self, url: &str, sink: &mut dyn Write) -> Result<u64> {
        self.requests.fetch_add(1, Ordering::SeqCst);
        let body = self.body.lock().unwrap().clone();
        sink.write_all(&body).map_err(|e| Error::Download {
            url: url.to_string(),
            message: e.to_string(),
        })?;
        Ok(body.len() as u64)
    }
}
