// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::Domain;
use crate::host::MemorySnapshot;
use crate::metric::{Batch, DerivedMetric, MetricScope};
use sysinfo::System;

pub struct MemoryDomain {
    sys: System,
    scope: MetricScope,
}

impl MemoryDomain {
    pub fn new(scope: MetricScope) -> Self {
        Self {
            sys: System::new(),
            scope,
        }
    }
}

impl Domain for MemoryDomain {
    fn name(&self) -> &'static str {
        "memory"
    }

    async fn collect(&mut self) -> anyhow::Result<Vec<DerivedMetric>> {
        self.sys.refresh_memory();
        let mut batch = Batch::new();
        push_snapshot(&mut batch, &self.scope, &MemorySnapshot::from_system(&self.sys));

        #[cfg(target_os = "linux")]
        {
            use anyhow::Context;
            let mem = crate::host::procfs::MemoryBreakdown::read().context("reading meminfo")?;
            batch.gauge(&self.scope, "memory.virtual.active", mem.active as f64);
            batch.gauge(&self.scope, "memory.virtual.inactive", mem.inactive as f64);
            batch.gauge(&self.scope, "memory.virtual.buffers", mem.buffers as f64);
            batch.gauge(&self.scope, "memory.virtual.cached", mem.cached as f64);
        }

        Ok(batch.into_metrics())
    }
}

fn push_snapshot(batch: &mut Batch, scope: &MetricScope, mem: &MemorySnapshot) {
    batch.gauge(scope, "memory.virtual.total", mem.total as f64);
    batch.gauge(scope, "memory.virtual.available", mem.available as f64);
    batch.gauge(scope, "memory.virtual.used", mem.used as f64);
    batch.gauge(scope, "memory.virtual.free", mem.free as f64);
    batch.gauge(scope, "memory.virtual.percent", mem.percent());
    batch.gauge(scope, "memory.swap.total", mem.swap_total as f64);
    batch.gauge(scope, "memory.swap.used", mem.swap_used as f64);
    batch.gauge(scope, "memory.swap.free", mem.swap_free as f64);
    batch.gauge(scope, "memory.swap.percent", mem.swap_percent());
}
