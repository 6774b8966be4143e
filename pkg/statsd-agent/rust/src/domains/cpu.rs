// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::Domain;
use crate::metric::{Batch, DerivedMetric, MetricScope};
use std::time::Duration;
use sysinfo::{MINIMUM_CPU_UPDATE_INTERVAL, System};

#[cfg(target_os = "linux")]
use crate::host::procfs::CpuTimes;

/// Length of the window `cpu.percent` is measured over.
pub const PERCENT_WINDOW: Duration = Duration::from_secs(1);

/// Cumulative CPU times and load average.
pub struct CpuTimesDomain {
    scope: MetricScope,
}

impl CpuTimesDomain {
    pub fn new(scope: MetricScope) -> Self {
        Self { scope }
    }
}

impl Domain for CpuTimesDomain {
    fn name(&self) -> &'static str {
        "cpu"
    }

    async fn collect(&mut self) -> anyhow::Result<Vec<DerivedMetric>> {
        let mut batch = Batch::new();

        #[cfg(target_os = "linux")]
        {
            use anyhow::Context;
            let times = CpuTimes::read().context("reading cpu times")?;
            for (mode, secs) in times.fields() {
                batch.gauge(&self.scope, &format!("cpu.times.{mode}"), secs);
            }
        }

        #[cfg(unix)]
        {
            let load = System::load_average();
            batch.gauge(&self.scope, "cpu.loadavg.1", load.one);
            batch.gauge(&self.scope, "cpu.loadavg.5", load.five);
            batch.gauge(&self.scope, "cpu.loadavg.15", load.fifteen);
        }

        Ok(batch.into_metrics())
    }
}

/// Busy percentage over [`PERCENT_WINDOW`], plus the per-mode split on Linux.
pub struct CpuPercentDomain {
    sys: System,
    scope: MetricScope,
}

impl CpuPercentDomain {
    pub fn new(scope: MetricScope) -> Self {
        Self {
            sys: System::new(),
            scope,
        }
    }
}

impl Domain for CpuPercentDomain {
    fn name(&self) -> &'static str {
        "cpu-percent"
    }

    async fn collect(&mut self) -> anyhow::Result<Vec<DerivedMetric>> {
        self.sys.refresh_cpu_usage();
        #[cfg(target_os = "linux")]
        let before = CpuTimes::read()?;

        tokio::time::sleep(PERCENT_WINDOW.max(MINIMUM_CPU_UPDATE_INTERVAL)).await;

        self.sys.refresh_cpu_usage();
        let mut batch = Batch::new();
        batch.gauge(&self.scope, "cpu.percent", self.sys.global_cpu_usage());

        #[cfg(target_os = "linux")]
        {
            let after = CpuTimes::read()?;
            push_mode_percent(&mut batch, &self.scope, &after, &before);
        }

        Ok(batch.into_metrics())
    }
}

#[cfg(target_os = "linux")]
fn push_mode_percent(batch: &mut Batch, scope: &MetricScope, after: &CpuTimes, before: &CpuTimes) {
    if let Some(modes) = after.percent_since(before) {
        for (mode, pct) in modes {
            batch.gauge(scope, &format!("cpu.percent.{mode}"), pct);
        }
    }
}
