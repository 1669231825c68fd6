mod descriptor;
pub use descriptor::{ClusterDescriptor, ClusterSpec, TaskSpec, TaskType};

mod launch;
pub use launch::{Invocation, LaunchSpec, Mode};
