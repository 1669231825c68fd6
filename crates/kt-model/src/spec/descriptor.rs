use serde::{Deserialize, Serialize};

use crate::{ModelError, ModelResult, WorkerIndex};

/// Per-worker membership payload injected as `TF_CONFIG`.
///
/// Wire shape is fixed:
/// `{"cluster": {"worker": ["worker0:1999", ...]}, "task": {"type": "worker", "index": 0}}`.
/// Every worker of an attempt carries the same `cluster.worker` list; only
/// `task.index` differs.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterDescriptor {
    pub cluster: ClusterSpec,
    pub task: TaskSpec,
}

/// Peer list of the cluster, ordered by worker index.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClusterSpec {
    pub worker: Vec<String>,
}

/// Role and rank of the process reading the descriptor.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaskSpec {
    #[serde(rename = "type")]
    pub kind: TaskType,
    pub index: u32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskType {
    Worker,
}

impl ClusterDescriptor {
    /// Descriptor for worker `index` over the given peer list.
    pub fn new(peers: Vec<String>, index: WorkerIndex) -> Self {
        Self {
            cluster: ClusterSpec { worker: peers },
            task: TaskSpec {
                kind: TaskType::Worker,
                index: index.get(),
            },
        }
    }

    pub fn peers(&self) -> &[String] {
        &self.cluster.worker
    }

    pub fn index(&self) -> WorkerIndex {
        WorkerIndex::new(self.task.index)
    }

    /// Compact JSON, the form stored in the worker environment.
    pub fn to_json(&self) -> ModelResult<String> {
        serde_json::to_string(self).map_err(|e| ModelError::InvalidDescriptor(e.to_string()))
    }

    /// Parse a descriptor as a worker would read it back.
    ///
    /// Rejects descriptors whose own index falls outside the peer list.
    pub fn from_json(s: &str) -> ModelResult<Self> {
        let desc: Self =
            serde_json::from_str(s).map_err(|e| ModelError::InvalidDescriptor(e.to_string()))?;
        if desc.task.index as usize >= desc.cluster.worker.len() {
            return Err(ModelError::InvalidDescriptor(format!(
                "task index {} outside of {} peers",
                desc.task.index,
                desc.cluster.worker.len()
            )));
        }
        Ok(desc)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn peers() -> Vec<String> {
        vec!["worker0:1999".into(), "worker1:1999".into()]
    }

    #[test]
    fn serializes_to_fixed_wire_shape() {
        let desc = ClusterDescriptor::new(peers(), WorkerIndex::new(1));
        let value = serde_json::to_value(&desc).unwrap();
        assert_eq!(
            value,
            serde_json::json!({
                "cluster": {"worker": ["worker0:1999", "worker1:1999"]},
                "task": {"type": "worker", "index": 1}
            })
        );
    }

    #[test]
    fn to_json_is_compact_and_parses_back() {
        let desc = ClusterDescriptor::new(peers(), WorkerIndex::new(0));
        let json = desc.to_json().unwrap();
        assert_eq!(
            json,
            r#"{"cluster":{"worker":["worker0:1999","worker1:1999"]},"task":{"type":"worker","index":0}}"#
        );
        assert_eq!(ClusterDescriptor::from_json(&json).unwrap(), desc);
    }

    #[test]
    fn from_json_accepts_spaced_input() {
        let json = r#"{"cluster": {"worker": ["worker0:1999"]}, "task": {"type": "worker", "index": 0}}"#;
        let desc = ClusterDescriptor::from_json(json).unwrap();
        assert_eq!(desc.index(), WorkerIndex::new(0));
        assert_eq!(desc.peers(), ["worker0:1999"]);
    }

    #[test]
    fn from_json_rejects_index_out_of_range() {
        let json = r#"{"cluster": {"worker": ["worker0:1999"]}, "task": {"type": "worker", "index": 1}}"#;
        assert!(matches!(
            ClusterDescriptor::from_json(json),
            Err(ModelError::InvalidDescriptor(_))
        ));
    }

    #[test]
    fn from_json_rejects_unknown_task_type() {
        let json = r#"{"cluster": {"worker": ["worker0:1999"]}, "task": {"type": "ps", "index": 0}}"#;
        assert!(ClusterDescriptor::from_json(json).is_err());
    }
}
