// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::Domain;
use crate::docker::{ContainerStats, DockerClient, list_entities, stats_path};
use crate::engine::RateEngine;
use crate::metric::{DerivedMetric, MetricScope};
use crate::tags::sanitize;
use log::debug;
use std::time::Instant;

/// Container metrics always go out under this prefix, whatever the host prefix.
pub const CONTAINER_PREFIX: &str = "system";

/// Per-container memory, CPU and network metrics.
pub struct DockerDomain {
    client: DockerClient,
    engine: RateEngine,
}

impl DockerDomain {
    pub fn new(client: DockerClient) -> Self {
        Self {
            client,
            engine: RateEngine::new("docker"),
        }
    }

    pub fn engine(&self) -> &RateEngine {
        &self.engine
    }
}

pub fn container_scope(name: &str) -> MetricScope {
    MetricScope::new(CONTAINER_PREFIX, format!(",service={}", sanitize(name)))
}

/// The runtime reads its counters somewhere inside a slow stats call; the
/// midpoint keeps that call's latency out of the elapsed time between samples.
fn sample_time(requested: Instant, received: Instant) -> Instant {
    requested + received.saturating_duration_since(requested) / 2
}

impl Domain for DockerDomain {
    fn name(&self) -> &'static str {
        "docker"
    }

    async fn collect(&mut self) -> anyhow::Result<Vec<DerivedMetric>> {
        let entities = list_entities(&self.client).await;
        let mut out = Vec::new();
        for entity in &entities {
            let requested = Instant::now();
            let Some(stats) = self
                .client
                .get_json::<ContainerStats>(&stats_path(&entity.id))
                .await
            else {
                continue;
            };
            let sample = stats.to_sample(sample_time(requested, Instant::now()));
            debug!(
                "[docker] {}: mem {}/{}",
                entity.name, stats.memory_stats.usage, stats.memory_stats.limit
            );
            out.extend(
                self.engine
                    .update(entity, sample, &container_scope(&entity.name)),
            );
        }

        let removed = self.engine.retain_live(entities.iter().map(|e| e.id.as_str()));
        if !removed.is_empty() {
            debug!("[docker] forgot {} containers", removed.len());
        }
        Ok(out)
    }
}
