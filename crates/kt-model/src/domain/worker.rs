use std::fmt;

use serde::{Deserialize, Serialize};

/// Prefix of every worker host name; worker `i` is reachable as `worker{i}`.
pub const WORKER_NAME_PREFIX: &str = "worker";

/// Position of a worker inside one attempt, in `[0, N)`.
///
/// Assigned by enumeration order when rendering and never changed afterwards.
/// The pod, its `app` label and its service are all named from it, which is what
/// lets peers resolve each other by DNS.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct WorkerIndex(u32);

impl WorkerIndex {
    pub const fn new(index: u32) -> Self {
        Self(index)
    }

    pub const fn get(self) -> u32 {
        self.0
    }

    /// Every index of an attempt with `total` workers, in order.
    pub fn all(total: u32) -> impl Iterator<Item = WorkerIndex> {
        (0..total).map(WorkerIndex)
    }

    /// Resource and host name: `worker{index}`.
    pub fn host(self) -> String {
        format!("{WORKER_NAME_PREFIX}{}", self.0)
    }

    /// Peer address: `worker{index}:{port}`.
    pub fn address(self, port: u16) -> String {
        format!("{WORKER_NAME_PREFIX}{}:{port}", self.0)
    }
}

impl fmt::Display for WorkerIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u32> for WorkerIndex {
    fn from(index: u32) -> Self {
        Self(index)
    }
}
