// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::Domain;
use crate::metric::{Batch, DerivedMetric, MetricScope};
use log::debug;
use sysinfo::{ProcessesToUpdate, System};

/// Uptime, process count and, on Linux, logged-in sessions.
pub struct MiscDomain {
    sys: System,
    scope: MetricScope,
}

impl MiscDomain {
    pub fn new(scope: MetricScope) -> Self {
        Self {
            sys: System::new(),
            scope,
        }
    }
}

impl Domain for MiscDomain {
    fn name(&self) -> &'static str {
        "misc"
    }

    async fn collect(&mut self) -> anyhow::Result<Vec<DerivedMetric>> {
        let uptime = System::uptime();
        debug!("[misc] uptime={uptime}");
        self.sys.refresh_processes(ProcessesToUpdate::All, true);

        let mut batch = Batch::new();
        batch.gauge(&self.scope, "uptime", uptime as f64);
        #[cfg(target_os = "linux")]
        {
            use anyhow::Context;
            let users = crate::host::procfs::logged_in_users().context("reading utmp")?;
            batch.gauge(&self.scope, "users", users as f64);
        }
        batch.gauge(&self.scope, "processes", self.sys.processes().len() as f64);
        Ok(batch.into_metrics())
    }
}
