// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use anyhow::{Context, Result};
use clap::Parser;
use dd_statsd_agent::cli::Args;
use dd_statsd_agent::config::{Settings, config_path, load_config};
use dd_statsd_agent::docker::DockerClient;
use dd_statsd_agent::domains::{
    CpuPercentDomain, CpuTimesDomain, DiskDomain, DockerDomain, MemoryDomain, MiscDomain,
    NetworkDomain,
};
use dd_statsd_agent::host;
use dd_statsd_agent::metric::MetricScope;
use dd_statsd_agent::scheduler::run_domain;
use dd_statsd_agent::shutdown;
use dd_statsd_agent::sink::{MetricSink, StatsdSink};
use log::{error, info};
use std::sync::Arc;

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let path = config_path(&args);
    let file = load_config(&path)?;

    let level = if args.debug || file.debug {
        log::Level::Debug
    } else {
        log::Level::Info
    };
    simple_logger::init_with_level(level)?;
    info!(
        "dd-statsd-agent starting (version {})",
        env!("CARGO_PKG_VERSION")
    );

    let hostname = hostname::get()
        .context("reading hostname")?
        .to_string_lossy()
        .into_owned();
    let settings = Settings::resolve(&args, file, &hostname)?;
    let nic = host::resolve_nic(settings.nic.as_deref())?;
    info!("measuring network interface {nic}");

    let sink: Arc<dyn MetricSink> = Arc::new(
        StatsdSink::connect(&settings.statsd_host, settings.statsd_port).with_context(|| {
            format!(
                "resolving statsd server {}:{}",
                settings.statsd_host, settings.statsd_port
            )
        })?,
    );
    info!(
        "sending to statsd {}:{} with prefix {:?}",
        settings.statsd_host, settings.statsd_port, settings.prefix
    );

    let (trigger, signal) = shutdown::channel();
    let scope = MetricScope::new(settings.prefix.clone(), settings.tags.clone());
    let every = settings.interval;

    let mut tasks = vec![
        tokio::spawn(run_domain(DiskDomain::new(scope.clone()), every, sink.clone(), signal.clone())),
        tokio::spawn(run_domain(CpuTimesDomain::new(scope.clone()), every, sink.clone(), signal.clone())),
        tokio::spawn(run_domain(CpuPercentDomain::new(scope.clone()), every, sink.clone(), signal.clone())),
        tokio::spawn(run_domain(MemoryDomain::new(scope.clone()), every, sink.clone(), signal.clone())),
        tokio::spawn(run_domain(NetworkDomain::new(nic, scope.clone()), every, sink.clone(), signal.clone())),
        tokio::spawn(run_domain(MiscDomain::new(scope), every, sink.clone(), signal.clone())),
    ];

    if let Some(docker) = &settings.docker {
        info!("container metrics enabled ({})", docker.address.display());
        let client = DockerClient::new(&docker.address, docker.timeout, docker.max_response_bytes);
        tasks.push(tokio::spawn(run_domain(
            DockerDomain::new(client),
            docker.interval,
            sink.clone(),
            signal.clone(),
        )));
    }

    shutdown::wait_for_signal().await?;
    info!("dd-statsd-agent shutting down");
    trigger.trigger();

    for task in tasks {
        if let Err(e) = task.await {
            error!("domain task ended abnormally: {e}");
        }
    }
    info!("dd-statsd-agent stopped");
    Ok(())
}
