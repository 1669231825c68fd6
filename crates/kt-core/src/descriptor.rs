//! Per-worker `TF_CONFIG` generation.
//!
//! Peer addresses are derived from index and port alone (`worker{i}:{port}`); no
//! lookup of real addresses happens. Endpoints are created under the same
//! `worker{i}` names, which is what makes those addresses resolvable.
use kt_model::{ClusterDescriptor, WorkerIndex};

/// Stamps [`ClusterDescriptor`]s for one attempt.
///
/// The peer list is computed once, so every descriptor from the same builder
/// carries an identical list.
#[derive(Debug, Clone)]
pub struct ClusterDescriptorBuilder {
    peers: Vec<String>,
}

impl ClusterDescriptorBuilder {
    /// # Panics
    /// If `total_workers` is zero.
    pub fn new(total_workers: u32, port: u16) -> Self {
        assert!(total_workers > 0, "a cluster needs at least one worker");
        let peers = WorkerIndex::all(total_workers)
            .map(|idx| idx.address(port))
            .collect();
        Self { peers }
    }

    pub fn total_workers(&self) -> u32 {
        self.peers.len() as u32
    }

    pub fn peers(&self) -> &[String] {
        &self.peers
    }

    /// Descriptor for worker `index`.
    ///
    /// # Panics
    /// If `index` is outside `[0, total_workers)`.
    pub fn descriptor(&self, index: WorkerIndex) -> ClusterDescriptor {
        assert!(
            (index.get() as usize) < self.peers.len(),
            "worker index {index} outside of a {}-worker cluster",
            self.peers.len()
        );
        ClusterDescriptor::new(self.peers.clone(), index)
    }

    /// One-shot form: `build(N, i, port)`.
    ///
    /// # Panics
    /// If `total_workers == 0` or `self_index >= total_workers`.
    pub fn build(total_workers: u32, self_index: u32, port: u16) -> ClusterDescriptor {
        Self::new(total_workers, port).descriptor(WorkerIndex::new(self_index))
    }
}
