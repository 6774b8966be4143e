// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Host-level readers. sysinfo covers what it can; Linux-only details come
//! from [`procfs`].

#[cfg(target_os = "linux")]
pub mod procfs;

use crate::engine::{CounterKey, RawSample};
use crate::error::ConfigError;
use std::net::IpAddr;
use std::path::Path;
use std::time::Instant;
use sysinfo::{Disks, Networks, System};

pub fn percent(part: u64, whole: u64) -> f64 {
    if whole == 0 {
        0.0
    } else {
        part as f64 / whole as f64 * 100.0
    }
}

/// Usage of the filesystem mounted at `/`, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RootDisk {
    pub total: u64,
    pub used: u64,
    pub free: u64,
}

impl RootDisk {
    pub fn percent(&self) -> f64 {
        percent(self.used, self.used + self.free)
    }
}

pub fn root_disk(disks: &Disks) -> Option<RootDisk> {
    disks
        .list()
        .iter()
        .find(|d| d.mount_point() == Path::new("/"))
        .map(|d| RootDisk {
            total: d.total_space(),
            used: d.total_space().saturating_sub(d.available_space()),
            free: d.available_space(),
        })
}

/// Physical and swap memory, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemorySnapshot {
    pub total: u64,
    pub available: u64,
    pub used: u64,
    pub free: u64,
    pub swap_total: u64,
    pub swap_used: u64,
    pub swap_free: u64,
}

impl MemorySnapshot {
    pub fn from_system(sys: &System) -> Self {
        Self {
            total: sys.total_memory(),
            available: sys.available_memory(),
            used: sys.used_memory(),
            free: sys.free_memory(),
            swap_total: sys.total_swap(),
            swap_used: sys.used_swap(),
            swap_free: sys.free_swap(),
        }
    }

    pub fn percent(&self) -> f64 {
        percent(self.total.saturating_sub(self.available), self.total)
    }

    pub fn swap_percent(&self) -> f64 {
        percent(self.swap_used, self.swap_total)
    }
}

/// Counters of `nic` as a rate-engine sample. Empty when the interface is gone.
pub fn network_sample(networks: &Networks, nic: &str, taken_at: Instant) -> RawSample {
    let mut sample = RawSample::new(taken_at);
    if let Some(data) = networks.get(nic) {
        let nic = nic.to_string();
        sample.set(CounterKey::TxBytes(nic.clone()), data.total_transmitted());
        sample.set(CounterKey::RxBytes(nic.clone()), data.total_received());
        sample.set(CounterKey::TxErrors(nic.clone()), data.total_errors_on_transmitted());
        sample.set(CounterKey::RxErrors(nic), data.total_errors_on_received());
    }
    sample
}

/// The interface whose traffic the network domain reports.
pub fn resolve_nic(configured: Option<&str>) -> Result<String, ConfigError> {
    let networks = Networks::new_with_refreshed_list();
    let interfaces: Vec<(String, Vec<IpAddr>)> = networks
        .iter()
        .map(|(name, data)| {
            (
                name.clone(),
                data.ip_networks().iter().map(|n| n.addr).collect(),
            )
        })
        .collect();
    pick_nic(configured, &interfaces)
}

/// A configured name must exist; otherwise the first interface (by name)
/// holding a 10.0.0.0/8 IPv4 address wins.
pub fn pick_nic(
    configured: Option<&str>,
    interfaces: &[(String, Vec<IpAddr>)],
) -> Result<String, ConfigError> {
    if let Some(name) = configured {
        return if interfaces.iter().any(|(n, _)| n == name) {
            Ok(name.to_string())
        } else {
            Err(ConfigError::UnknownInterface(name.to_string()))
        };
    }

    let mut candidates: Vec<&str> = interfaces
        .iter()
        .filter(|(_, addrs)| {
            addrs
                .iter()
                .any(|a| matches!(a, IpAddr::V4(v4) if v4.octets()[0] == 10))
        })
        .map(|(name, _)| name.as_str())
        .collect();
    candidates.sort_unstable();
    candidates
        .first()
        .map(|n| n.to_string())
        .ok_or(ConfigError::NoInterface)
}
