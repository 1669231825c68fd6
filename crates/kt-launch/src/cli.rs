use std::path::PathBuf;

use clap::Parser;
use kt_kube::KubeConfig;
use kt_model::{
    DEFAULT_IMAGE, DEFAULT_NAMESPACE, DEFAULT_PORT, DEFAULT_WORKERS, Invocation, KeyValue,
};
use kt_observe::{LoggerConfig, LoggerFormat, LoggerLevel, LoggerTimeZone};

/// Launch a distributed TensorFlow training attempt on Kubernetes, or tear one down.
#[derive(Parser, Debug)]
#[command(name = "kt-launch")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Training script shipped to every worker
    #[arg(value_name = "PATH", required_unless_present = "delete")]
    pub script: Option<PathBuf>,

    /// Delete every resource of the attempt with this label
    #[arg(short, long, value_name = "LABEL", conflicts_with = "script")]
    pub delete: Option<String>,

    /// Number of workers
    #[arg(short, long, default_value_t = DEFAULT_WORKERS)]
    pub workers: u32,

    /// Namespace to work in
    #[arg(short, long, env = "KT_NAMESPACE", default_value = DEFAULT_NAMESPACE)]
    pub namespace: String,

    /// Port every worker listens on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Script whose lines replace the container command
    #[arg(short, long, value_name = "PATH")]
    pub entrypoint: Option<PathBuf>,

    /// Container image for the workers
    #[arg(short, long, default_value = DEFAULT_IMAGE)]
    pub image: String,

    /// Extra worker env var, repeatable
    #[arg(long = "env", value_name = "KEY=VALUE")]
    pub env: Vec<KeyValue>,

    /// Worker pod template
    #[arg(long, default_value = "templates/pod.yaml")]
    pub pod_template: PathBuf,

    /// Endpoint service template
    #[arg(long, default_value = "templates/service.yaml")]
    pub service_template: PathBuf,

    /// Kubeconfig file; inferred when omitted
    #[arg(long, value_name = "PATH")]
    pub kubeconfig: Option<PathBuf>,

    /// Kubeconfig context; current context when omitted
    #[arg(long)]
    pub context: Option<String>,

    /// Validate every request server-side without persisting anything
    #[arg(long)]
    pub dry_run: bool,

    /// Log filter (debug, info, kt_core=trace, ...)
    #[arg(long, env = "KT_LOG", default_value = "info")]
    pub log_level: LoggerLevel,

    /// Log output format (text, json, journald)
    #[arg(long, default_value = "text")]
    pub log_format: LoggerFormat,

    /// Timezone of log timestamps (utc, local)
    #[arg(long, env = "KT_LOG_TZ", default_value = "utc")]
    pub log_tz: LoggerTimeZone,

    /// Print the module path of every log event
    #[arg(long)]
    pub log_targets: bool,

    /// Never colour log output
    #[arg(long)]
    pub no_color: bool,
}

impl Cli {
    pub fn invocation(&self) -> Invocation {
        Invocation {
            script: self.script.clone(),
            delete: self.delete.clone(),
            workers: self.workers,
            port: self.port,
            image: self.image.clone(),
            entrypoint: self.entrypoint.clone(),
            env: self.env.clone(),
            pod_template: self.pod_template.clone(),
            service_template: self.service_template.clone(),
        }
    }

    pub fn kube_config(&self) -> KubeConfig {
        KubeConfig {
            namespace: self.namespace.clone(),
            kubeconfig: self.kubeconfig.clone(),
            context: self.context.clone(),
            dry_run: self.dry_run,
        }
    }

    pub fn logger_config(&self) -> LoggerConfig {
        LoggerConfig {
            with_targets: self.log_targets,
            use_color: !self.no_color,
            ..LoggerConfig::default()
        }
        .with_level(self.log_level.clone())
        .with_format(self.log_format)
        .with_time_zone(self.log_tz)
    }
}
