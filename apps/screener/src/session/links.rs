//! Transient links — revocable handles to uploaded bytes held in memory.
//!
//! Every scored batch issues one link per resume. When the batch is replaced
//! or its flow is discarded, the batch's links are revoked and stop resolving.

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

use bytes::Bytes;
use parking_lot::Mutex;
use tracing::debug;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct LinkId(Uuid);

impl LinkId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Path the link is served under.
    pub fn view_url(&self) -> String {
        format!("/files/{}", self.0)
    }

    pub fn download_url(&self) -> String {
        format!("/files/{}?download=true", self.0)
    }
}

impl fmt::Display for LinkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for LinkId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// What a link resolves to.
#[derive(Debug, Clone)]
pub struct LinkTarget {
    pub name: String,
    pub content: Bytes,
}

#[derive(Default)]
pub struct LinkRegistry {
    targets: Mutex<HashMap<LinkId, LinkTarget>>,
}

impl LinkRegistry {
    pub fn issue(&self, name: &str, content: Bytes) -> LinkId {
        let id = LinkId::new();
        self.targets.lock().insert(
            id,
            LinkTarget {
                name: name.to_string(),
                content,
            },
        );
        id
    }

    pub fn resolve(&self, id: &LinkId) -> Option<LinkTarget> {
        self.targets.lock().get(id).cloned()
    }

    /// Revokes the given links; ids that are already gone are ignored.
    /// Returns how many were actually removed.
    pub fn revoke<'a>(&self, ids: impl IntoIterator<Item = &'a LinkId>) -> usize {
        let mut targets = self.targets.lock();
        let removed = ids
            .into_iter()
            .filter(|id| targets.remove(id).is_some())
            .count();
        if removed > 0 {
            debug!(removed, live = targets.len(), "Revoked transient links");
        }
        removed
    }

    pub fn len(&self) -> usize {
        self.targets.lock().len()
    }

    #[cfg(test)]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
