use std::collections::{BTreeMap, BTreeSet};

use crate::request::Request;
use crate::residency::{Residency, ResidencyState};

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct CachePolicy {
    /// Share one in-flight fetch between concurrent lookups of the same file.
    /// With this off, every miss issues its own fetch.
    pub dedupe_in_flight: bool,
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            dedupe_in_flight: true,
        }
    }
}

/// Outcome of `ContentCache::lookup`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    /// Resident; no fetch needed.
    Hit(String),
    /// The caller must fetch the file and report back with this request.
    Fetch(Request),
    /// A fetch for the file is already in flight under this request.
    Pending(Request),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    /// The server answered with a non-success status.
    Status(u16),
    /// The request never produced a response (network, CORS, decoding).
    Transport(String),
}

impl std::fmt::Display for FetchError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FetchError::Status(code) => write!(f, "unexpected HTTP status {code}"),
            FetchError::Transport(msg) => write!(f, "transport error: {msg}"),
        }
    }
}

impl std::error::Error for FetchError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CacheError {
    /// The request was already completed, or dropped by `clear`.
    UnknownRequest(Request),
    Fetch {
        filename: String,
        source: FetchError,
    },
}

impl std::fmt::Display for CacheError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CacheError::UnknownRequest(req) => write!(f, "unknown content request #{}", req.0),
            CacheError::Fetch { filename, source } => {
                write!(f, "failed to fetch {filename}: {source}")
            }
        }
    }
}

impl std::error::Error for CacheError {}

#[derive(Debug, Clone)]
struct CacheEntry {
    residency: Residency,
    body: Option<String>,
}

/// In-memory cache of long-form content, keyed by filename.
///
/// Only successful fetch completions write to it. Entries are never evicted;
/// the set of content files is small and fixed by the event document.
#[derive(Debug, Default)]
pub struct ContentCache {
    policy: CachePolicy,
    next_request: u64,
    entries: BTreeMap<String, CacheEntry>,
    requests: BTreeMap<Request, String>,
}

impl ContentCache {
    pub fn new(policy: CachePolicy) -> Self {
        Self {
            policy,
            next_request: 1,
            entries: BTreeMap::new(),
            requests: BTreeMap::new(),
        }
    }

    pub fn policy(&self) -> CachePolicy {
        self.policy
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn state(&self, filename: &str) -> Option<ResidencyState> {
        self.entries.get(filename).map(|e| e.residency.state)
    }

    /// Resident text for `filename`, if any.
    pub fn get(&self, filename: &str) -> Option<&str> {
        self.entries.get(filename).and_then(|e| e.body.as_deref())
    }

    pub fn in_flight(&self) -> usize {
        self.requests.len()
    }

    pub fn lookup(&mut self, filename: &str) -> Lookup {
        if let Some(body) = self.get(filename) {
            return Lookup::Hit(body.to_string());
        }

        if self.policy.dedupe_in_flight {
            if let Some(req) = self.request_for(filename) {
                return Lookup::Pending(req);
            }
        }

        self.entries
            .entry(filename.to_string())
            .or_insert_with(|| CacheEntry {
                residency: Residency::new(),
                body: None,
            });

        let req = Request(self.next_request.max(1));
        self.next_request = req.0 + 1;
        self.requests.insert(req, filename.to_string());
        Lookup::Fetch(req)
    }

    /// Records the outcome of the fetch issued for `req`.
    ///
    /// On success the text becomes resident and is returned. On failure nothing
    /// is stored; the entry is dropped once no other fetch for it is in flight.
    pub fn complete(
        &mut self,
        req: Request,
        result: Result<String, FetchError>,
    ) -> Result<&str, CacheError> {
        let filename = self
            .requests
            .remove(&req)
            .ok_or(CacheError::UnknownRequest(req))?;

        match result {
            Ok(body) => {
                let entry = self
                    .entries
                    .entry(filename)
                    .or_insert_with(|| CacheEntry {
                        residency: Residency::new(),
                        body: None,
                    });
                entry.residency.state = ResidencyState::Resident;
                Ok(entry.body.insert(body).as_str())
            }
            Err(source) => {
                let still_requested = self.state(&filename) == Some(ResidencyState::Requested);
                if still_requested && self.request_for(&filename).is_none() {
                    self.entries.remove(&filename);
                }
                Err(CacheError::Fetch { filename, source })
            }
        }
    }

    /// Drops all content and forgets outstanding requests.
    pub fn clear(&mut self) {
        self.entries.clear();
        self.requests.clear();
    }

    /// Filenames currently resident, sorted.
    pub fn resident_files(&self) -> BTreeSet<&str> {
        self.entries
            .iter()
            .filter(|(_, e)| e.residency.state == ResidencyState::Resident)
            .map(|(k, _)| k.as_str())
            .collect()
    }

    /// Outstanding requests for `filename`, oldest first.
    pub fn requests_for<'a>(&'a self, filename: &'a str) -> impl Iterator<Item = Request> + 'a {
        self.requests
            .iter()
            .filter(move |(_, f)| f.as_str() == filename)
            .map(|(r, _)| *r)
    }

    fn request_for(&self, filename: &str) -> Option<Request> {
        self.requests_for(filename).next()
    }
}
