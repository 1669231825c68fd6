use std::fmt;

use serde::{Deserialize, Serialize};

/// Kinds of cluster resources an attempt is made of.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum ResourceKind {
    /// Config map holding the payload script text.
    PayloadHolder,
    /// One pod per worker.
    Worker,
    /// One service per worker, exposing it under `worker{index}`.
    Endpoint,
}

impl ResourceKind {
    /// Every kind teardown has to sweep.
    pub const ALL: [ResourceKind; 3] = [
        ResourceKind::PayloadHolder,
        ResourceKind::Worker,
        ResourceKind::Endpoint,
    ];

    /// Short name used in logs and errors.
    pub fn as_str(&self) -> &'static str {
        match self {
            ResourceKind::PayloadHolder => "payload-holder",
            ResourceKind::Worker => "worker",
            ResourceKind::Endpoint => "endpoint",
        }
    }

    /// Kubernetes object kind backing this resource.
    pub fn api_kind(&self) -> &'static str {
        match self {
            ResourceKind::PayloadHolder => "ConfigMap",
            ResourceKind::Worker => "Pod",
            ResourceKind::Endpoint => "Service",
        }
    }
}

impl fmt::Display for ResourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::ResourceKind;

    #[test]
    fn all_covers_every_kind_once() {
        let names: Vec<_> = ResourceKind::ALL.iter().map(|k| k.as_str()).collect();
        assert_eq!(names, ["payload-holder", "worker", "endpoint"]);
    }

    #[test]
    fn api_kinds_map_to_core_v1() {
        assert_eq!(ResourceKind::PayloadHolder.api_kind(), "ConfigMap");
        assert_eq!(ResourceKind::Worker.api_kind(), "Pod");
        assert_eq!(ResourceKind::Endpoint.api_kind(), "Service");
    }
}
