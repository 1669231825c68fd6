mod cli;

use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tracing::info;

use kt_core::{LaunchOrchestrator, Outcome, resolve_mode};
use kt_kube::{KubeControlPlane, connect};
use kt_observe::{LoggerTimeZone, init_local_offset, init_logger};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1) logger; the offset probe has to happen while single-threaded
    let logger = cli.logger_config();
    if logger.tz == LoggerTimeZone::Local {
        init_local_offset();
    }
    init_logger(&logger)?;

    // 2) runtime
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("failed to start runtime")?;
    runtime.block_on(run(cli))
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    // 3) mode; rejected invocations never reach the cluster
    let mode = resolve_mode(cli.invocation())?;

    // 4) control plane
    let kube = cli.kube_config();
    let client = connect(&kube).await?;
    let plane = Arc::new(KubeControlPlane::new(client, &kube));
    info!(namespace = plane.namespace(), dry_run = kube.dry_run, "connected");

    // 5) launch or teardown
    let orchestrator = LaunchOrchestrator::new(plane);
    match orchestrator.run_mode(mode).await? {
        Outcome::Launched(report) => {
            info!(
                label = %report.label,
                workers = report.workers,
                "delete with: kt-launch --delete {}",
                report.label
            );
            println!("{}", report.label);
        }
        Outcome::TornDown(label, report) => {
            info!(label = %label, deleted = report.total(), "teardown complete");
        }
    }
    Ok(())
}
