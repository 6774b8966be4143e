// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::Domain;
use crate::host::{self, RootDisk};
use crate::metric::{Batch, DerivedMetric, MetricScope};
use log::warn;
use sysinfo::Disks;

pub struct DiskDomain {
    scope: MetricScope,
}

impl DiskDomain {
    pub fn new(scope: MetricScope) -> Self {
        Self { scope }
    }
}

impl Domain for DiskDomain {
    fn name(&self) -> &'static str {
        "disk"
    }

    async fn collect(&mut self) -> anyhow::Result<Vec<DerivedMetric>> {
        let mut batch = Batch::new();
        let disks = Disks::new_with_refreshed_list();
        match host::root_disk(&disks) {
            Some(root) => push_root(&mut batch, &self.scope, &root),
            None => warn!("[disk] no filesystem mounted at /"),
        }

        #[cfg(target_os = "linux")]
        {
            use anyhow::Context;
            let times = host::procfs::DiskTimes::read().context("reading diskstats")?;
            push_io_times(&mut batch, &self.scope, &times);
        }

        Ok(batch.into_metrics())
    }
}

fn push_root(batch: &mut Batch, scope: &MetricScope, root: &RootDisk) {
    batch.gauge(scope, "disk.root.total", root.total as f64);
    batch.gauge(scope, "disk.root.used", root.used as f64);
    batch.gauge(scope, "disk.root.free", root.free as f64);
    batch.gauge(scope, "disk.root.percent", root.percent());
}

#[cfg(target_os = "linux")]
fn push_io_times(batch: &mut Batch, scope: &MetricScope, times: &host::procfs::DiskTimes) {
    batch.gauge(scope, "disk.all.read_time", times.read_time as f64);
    batch.gauge(scope, "disk.all.write_time", times.write_time as f64);
    batch.gauge(scope, "disk.all.busy_time", times.busy_time as f64);
}
