// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::Domain;
use crate::engine::{Entity, RateEngine};
use crate::host;
use crate::metric::{DerivedMetric, MetricScope};
use log::warn;
use std::time::Instant;
use sysinfo::Networks;

/// Throughput and error counters of a single host interface.
pub struct NetworkDomain {
    networks: Networks,
    nic: String,
    engine: RateEngine,
    scope: MetricScope,
}

impl NetworkDomain {
    pub fn new(nic: impl Into<String>, scope: MetricScope) -> Self {
        Self {
            networks: Networks::new_with_refreshed_list(),
            nic: nic.into(),
            engine: RateEngine::new("network"),
            scope,
        }
    }
}

impl Domain for NetworkDomain {
    fn name(&self) -> &'static str {
        "network"
    }

    async fn collect(&mut self) -> anyhow::Result<Vec<DerivedMetric>> {
        self.networks.refresh(true);
        let sample = host::network_sample(&self.networks, &self.nic, Instant::now());
        if sample.counters().next().is_none() {
            warn!("[network] interface {} not found", self.nic);
            self.engine.retain_live(std::iter::empty::<&str>());
            return Ok(Vec::new());
        }
        Ok(self.engine.update(&Entity::host(), sample, &self.scope))
    }
}
