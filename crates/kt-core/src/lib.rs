pub mod descriptor;
pub mod error;
pub mod lifecycle;
pub mod naming;
pub mod orchestrator;
pub mod template;

pub use descriptor::ClusterDescriptorBuilder;
pub use error::{ControlPlaneError, CoreError, TemplateError};
pub use lifecycle::{ControlPlane, ResourceHandle, ResourceLifecycleManager, TeardownReport};
pub use naming::NameGenerator;
pub use orchestrator::{LaunchOrchestrator, LaunchReport, Outcome, resolve_mode};
pub use template::{
    BaseTemplate, RenderedResource, TemplateRole, entrypoint_command, payload_holder,
    render_endpoint, render_payload_holder, render_worker, shell_command,
};

#[cfg(any(test, feature = "testkit"))]
pub use lifecycle::memory::{ControlPlaneCall, MemoryControlPlane, StoredObject};

pub mod prelude {
    pub use crate::error::{ControlPlaneError, CoreError};
    pub use crate::lifecycle::{ControlPlane, ResourceHandle};
    pub use crate::orchestrator::{LaunchOrchestrator, Outcome};
    pub use crate::template::RenderedResource;
}
