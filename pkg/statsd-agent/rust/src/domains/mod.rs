// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Metric domains. Each one owns whatever state it needs between cycles and
//! is driven by its own scheduler task.

pub mod cpu;
pub mod disk;
pub mod docker;
pub mod memory;
pub mod misc;
pub mod network;

use crate::metric::DerivedMetric;
use std::future::Future;

pub use cpu::{CpuPercentDomain, CpuTimesDomain};
pub use disk::DiskDomain;
pub use docker::DockerDomain;
pub use memory::MemoryDomain;
pub use misc::MiscDomain;
pub use network::NetworkDomain;

pub trait Domain: Send + 'static {
    /// Short name used in log prefixes, e.g. `cpu-percent`.
    fn name(&self) -> &'static str;

    /// Gather one cycle's worth of metrics.
    fn collect(&mut self) -> impl Future<Output = anyhow::Result<Vec<DerivedMetric>>> + Send;
}
