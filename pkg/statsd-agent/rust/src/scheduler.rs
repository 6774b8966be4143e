// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::domains::Domain;
use crate::shutdown::ShutdownSignal;
use crate::sink::MetricSink;
use futures::FutureExt;
use log::{debug, error, info};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::time::Instant;

/// Run `domain` every `interval` until shutdown. A cycle that fails or panics
/// is logged and the loop carries on; a cycle that overruns is followed
/// immediately by the next one.
pub async fn run_domain<D: Domain>(
    mut domain: D,
    interval: Duration,
    sink: Arc<dyn MetricSink>,
    mut shutdown: ShutdownSignal,
) {
    let name = domain.name();
    info!("[{name}] sampling every {}s", interval.as_secs_f64());

    while !shutdown.is_triggered() {
        let start = Instant::now();
        run_cycle(&mut domain, sink.as_ref()).await;
        let elapsed = start.elapsed();
        debug!("[{name}] cycle took {}ms", elapsed.as_millis());

        tokio::select! {
            _ = tokio::time::sleep(interval.saturating_sub(elapsed)) => {}
            _ = shutdown.wait() => {}
        }
    }
    info!("[{name}] stopped");
}

async fn run_cycle<D: Domain>(domain: &mut D, sink: &dyn MetricSink) {
    let name = domain.name();
    match AssertUnwindSafe(domain.collect()).catch_unwind().await {
        Ok(Ok(metrics)) => {
            if metrics.is_empty() {
                return;
            }
            if let Err(e) = sink.emit(&metrics) {
                error!("[{name}] failed to emit {} metrics: {e}", metrics.len());
            }
        }
        Ok(Err(e)) => error!("[{name}] cycle failed: {e:#}"),
        Err(panic) => {
            let msg = panic
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| panic.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            error!("[{name}] cycle panicked: {msg}");
        }
    }
}
