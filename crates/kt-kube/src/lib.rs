//! Kubernetes control plane for the launcher.
//!
//! Payload holders map to `ConfigMap`, workers to `Pod`, endpoints to `Service`,
//! all in one namespace.
mod error;
pub use error::KubeError;

mod config;
pub use config::KubeConfig;

mod client;
pub use client::connect;

mod plane;
pub use plane::KubeControlPlane;
