// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Typed views of the container runtime's JSON payloads. Only the fields the
//! sampler reads are declared; anything absent decodes to zero/empty.

use crate::engine::{CounterKey, RawSample};
use serde::Deserialize;
use std::collections::BTreeMap;
use std::time::Instant;

/// One entry of `GET /containers/json`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ContainerSummary {
    #[serde(rename = "Id", default)]
    pub id: String,
    #[serde(rename = "Names", default)]
    pub names: Vec<String>,
    #[serde(rename = "State", default)]
    pub state: Option<String>,
    #[serde(rename = "Status", default)]
    pub status: Option<String>,
}

/// `GET /containers/<id>/stats?stream=0`
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ContainerStats {
    pub memory_stats: MemoryStats,
    pub cpu_stats: CpuStats,
    pub networks: Option<BTreeMap<String, NetworkStats>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MemoryStats {
    pub usage: u64,
    pub limit: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuStats {
    pub cpu_usage: CpuUsage,
    pub system_cpu_usage: u64,
    pub online_cpus: u64,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct CpuUsage {
    pub total_usage: u64,
    /// Absent on cgroup v2 hosts.
    pub percpu_usage: Option<Vec<u64>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NetworkStats {
    pub rx_bytes: u64,
    pub tx_bytes: u64,
    pub rx_errors: u64,
    pub tx_errors: u64,
}

impl ContainerStats {
    /// CPUs visible to the container in this payload.
    pub fn num_cpus(&self) -> u64 {
        match &self.cpu_stats.cpu_usage.percpu_usage {
            Some(percpu) if !percpu.is_empty() => percpu.len() as u64,
            _ if self.cpu_stats.online_cpus > 0 => self.cpu_stats.online_cpus,
            _ => 1,
        }
    }

    pub fn to_sample(&self, taken_at: Instant) -> RawSample {
        let mut sample = RawSample::new(taken_at)
            .with(CounterKey::MemoryUsage, self.memory_stats.usage)
            .with(CounterKey::MemoryLimit, self.memory_stats.limit)
            .with(CounterKey::CpuTotalUsage, self.cpu_stats.cpu_usage.total_usage)
            .with(CounterKey::CpuSystemUsage, self.cpu_stats.system_cpu_usage)
            .with(CounterKey::CpuNumCpus, self.num_cpus());

        for (nic, net) in self.networks.iter().flatten() {
            sample.set(CounterKey::TxBytes(nic.clone()), net.tx_bytes);
            sample.set(CounterKey::RxBytes(nic.clone()), net.rx_bytes);
            sample.set(CounterKey::TxErrors(nic.clone()), net.tx_errors);
            sample.set(CounterKey::RxErrors(nic.clone()), net.rx_errors);
        }
        sample
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const STATS: &str = r#"{
        "read": "2016-11-29T21:41:53.385446745Z",
        "memory_stats": {"usage": 14282752, "max_usage": 15589376, "limit": 2096275456},
        "cpu_stats": {
            "cpu_usage": {
                "total_usage": 1212891838,
                "percpu_usage": [361414541, 286357442, 284566213, 280553642],
                "usage_in_kernelmode": 250000000,
                "usage_in_usermode": 900000000
            },
            "system_cpu_usage": 4317340000000,
            "throttling_data": {"periods": 0, "throttled_periods": 0, "throttled_time": 0}
        },
        "networks": {
            "eth0": {"rx_bytes": 5338, "rx_packets": 40, "rx_errors": 0, "rx_dropped": 0,
                     "tx_bytes": 648, "tx_packets": 8, "tx_errors": 0, "tx_dropped": 0},
            "eth5": {"rx_bytes": 4641, "rx_errors": 2, "tx_bytes": 880, "tx_errors": 1}
        }
    }"#;

    #[test]
    fn test_decode_stats() {
        let stats: ContainerStats = serde_json::from_str(STATS).unwrap();
        assert_eq!(stats.memory_stats.usage, 14282752);
        assert_eq!(stats.memory_stats.limit, 2096275456);
        assert_eq!(stats.cpu_stats.cpu_usage.total_usage, 1212891838);
        assert_eq!(stats.cpu_stats.system_cpu_usage, 4317340000000);
        assert_eq!(stats.num_cpus(), 4);
        let networks = stats.networks.as_ref().unwrap();
        assert_eq!(networks["eth5"].rx_errors, 2);
    }

    #[test]
    fn test_sample_covers_every_interface() {
        let stats: ContainerStats = serde_json::from_str(STATS).unwrap();
        let sample = stats.to_sample(Instant::now());
        assert_eq!(sample.get(&CounterKey::TxBytes("eth0".into())), Some(648));
        assert_eq!(sample.get(&CounterKey::TxBytes("eth5".into())), Some(880));
        assert_eq!(sample.get(&CounterKey::RxErrors("eth5".into())), Some(2));
        assert_eq!(sample.get(&CounterKey::CpuNumCpus), Some(4));
    }

    #[test]
    fn test_stopped_container_payload_decodes_to_zero() {
        let stats: ContainerStats = serde_json::from_str(
            r#"{"memory_stats": {}, "cpu_stats": {"cpu_usage": {"total_usage": 0}}}"#,
        )
        .unwrap();
        assert_eq!(stats.memory_stats.limit, 0);
        assert_eq!(stats.cpu_stats.system_cpu_usage, 0);
        assert!(stats.networks.is_none());
        assert_eq!(stats.num_cpus(), 1);
    }

    #[test]
    fn test_cgroup_v2_uses_online_cpus() {
        let stats: ContainerStats = serde_json::from_str(
            r#"{"cpu_stats": {"cpu_usage": {"total_usage": 10, "percpu_usage": null}, "online_cpus": 6}}"#,
        )
        .unwrap();
        assert_eq!(stats.num_cpus(), 6);
    }

    #[test]
    fn test_decode_summary() {
        let list: Vec<ContainerSummary> = serde_json::from_str(
            r#"[{"Id": "8dfafdbc3a40", "Names": ["/boring_feynman"], "State": "running",
                 "Status": "Up 2 hours", "Image": "ubuntu:latest"}]"#,
        )
        .unwrap();
        assert_eq!(list[0].id, "8dfafdbc3a40");
        assert_eq!(list[0].names, vec!["/boring_feynman"]);
        assert_eq!(list[0].state.as_deref(), Some("running"));
    }
}
