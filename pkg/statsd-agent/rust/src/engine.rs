// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Differential rate engine.
//!
//! Cumulative counters (bytes transferred, CPU nanoseconds) are only
//! meaningful as deltas. The engine keeps exactly one prior sample per live
//! entity and folds each new sample against it:
//!
//! - the first sample of an entity only records a baseline,
//! - a zero or negative elapsed time suppresses every time-dependent metric,
//! - a counter that went backwards (restart, reset, wraparound) suppresses
//!   the metrics built on it for one cycle.
//!
//! In every case the new sample replaces the prior one.

use crate::metric::{DerivedMetric, MetricScope};
use crate::state::EntityState;
use log::debug;
use std::collections::{BTreeMap, HashMap, HashSet};
use std::fmt;
use std::time::Instant;

/// Identity used for host-wide samples.
pub const HOST_ENTITY_ID: &str = "host";

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Entity {
    pub id: String,
    pub name: String,
}

impl Entity {
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    pub fn host() -> Self {
        Self::new(HOST_ENTITY_ID, HOST_ENTITY_ID)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CounterKey {
    CpuTotalUsage,
    CpuSystemUsage,
    CpuNumCpus,
    MemoryUsage,
    MemoryLimit,
    TxBytes(String),
    RxBytes(String),
    TxErrors(String),
    RxErrors(String),
}

impl fmt::Display for CounterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CounterKey::CpuTotalUsage => write!(f, "cpu.total_usage"),
            CounterKey::CpuSystemUsage => write!(f, "cpu.system_usage"),
            CounterKey::CpuNumCpus => write!(f, "cpu.num_cpus"),
            CounterKey::MemoryUsage => write!(f, "memory.usage"),
            CounterKey::MemoryLimit => write!(f, "memory.limit"),
            CounterKey::TxBytes(nic) => write!(f, "net.{nic}.tx_bytes"),
            CounterKey::RxBytes(nic) => write!(f, "net.{nic}.rx_bytes"),
            CounterKey::TxErrors(nic) => write!(f, "net.{nic}.tx_errors"),
            CounterKey::RxErrors(nic) => write!(f, "net.{nic}.rx_errors"),
        }
    }
}

/// Raw counters of one entity, read once per cycle.
#[derive(Debug, Clone)]
pub struct RawSample {
    taken_at: Instant,
    counters: BTreeMap<CounterKey, u64>,
}

impl RawSample {
    pub fn new(taken_at: Instant) -> Self {
        Self {
            taken_at,
            counters: BTreeMap::new(),
        }
    }

    pub fn with(mut self, key: CounterKey, value: u64) -> Self {
        self.set(key, value);
        self
    }

    pub fn set(&mut self, key: CounterKey, value: u64) {
        self.counters.insert(key, value);
    }

    pub fn get(&self, key: &CounterKey) -> Option<u64> {
        self.counters.get(key).copied()
    }

    pub fn counters(&self) -> impl Iterator<Item = (&CounterKey, u64)> {
        self.counters.iter().map(|(k, v)| (k, *v))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Delta {
    /// No prior value for this counter.
    Cold,
    /// The counter went backwards.
    Reset,
    Value(u64),
}

fn delta(prev: &RawSample, next: &RawSample, key: &CounterKey) -> Delta {
    match (prev.get(key), next.get(key)) {
        (Some(p), Some(n)) => match n.checked_sub(p) {
            Some(d) => Delta::Value(d),
            None => Delta::Reset,
        },
        _ => Delta::Cold,
    }
}

/// `100 * usage / limit`, or `0` without a usable limit.
pub fn memory_percent(usage: u64, limit: u64) -> f64 {
    if limit == 0 {
        return 0.0;
    }
    100.0 * usage as f64 / limit as f64
}

/// Container CPU share of the host, scaled by the number of CPUs the
/// container can use. `0` unless both deltas are strictly positive.
pub fn cpu_percent(cpu_delta: u64, system_delta: u64, num_cpus: u64) -> f64 {
    if cpu_delta == 0 || system_delta == 0 {
        return 0.0;
    }
    (cpu_delta as f64 / system_delta as f64) * num_cpus.max(1) as f64 * 100.0
}

/// Folds raw samples into rates. One instance per domain; never shared.
pub struct RateEngine {
    domain: &'static str,
    prior: HashMap<String, RawSample>,
}

impl RateEngine {
    pub fn new(domain: &'static str) -> Self {
        Self {
            domain,
            prior: HashMap::new(),
        }
    }

    pub fn state(&self, entity_id: &str) -> EntityState {
        if self.prior.contains_key(entity_id) {
            EntityState::Active
        } else {
            EntityState::Unseen
        }
    }

    /// Number of entities holding a baseline.
    pub fn len(&self) -> usize {
        self.prior.len()
    }

    pub fn is_empty(&self) -> bool {
        self.prior.is_empty()
    }

    /// Derive the metrics of `sample` against the entity's prior sample, then
    /// make `sample` the new prior.
    pub fn update(
        &mut self,
        entity: &Entity,
        sample: RawSample,
        scope: &MetricScope,
    ) -> Vec<DerivedMetric> {
        let mut out = Vec::new();
        self.levels(&sample, scope, &mut out);

        let from = self.state(&entity.id);
        match self.prior.remove(&entity.id) {
            None => debug!(
                "[{}] {}: first sample, recording baseline",
                self.domain, entity.name
            ),
            Some(prev) => self.rates(entity, &prev, &sample, scope, &mut out),
        }

        debug_assert!(from.can_transition_to(EntityState::Active));
        self.prior.insert(entity.id.clone(), sample);
        out
    }

    /// Drop the prior sample of every entity not in `live`. Returns the IDs
    /// that were removed.
    pub fn retain_live<'a, I>(&mut self, live: I) -> Vec<String>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let live: HashSet<&str> = live.into_iter().collect();
        let removed: Vec<String> = self
            .prior
            .keys()
            .filter(|id| !live.contains(id.as_str()))
            .cloned()
            .collect();
        for id in &removed {
            debug_assert!(self.state(id).can_transition_to(EntityState::Removed));
            self.prior.remove(id);
            debug!(
                "[{}] {id}: {} -> {}",
                self.domain,
                EntityState::Active,
                EntityState::Removed
            );
        }
        removed
    }

    fn levels(&self, sample: &RawSample, scope: &MetricScope, out: &mut Vec<DerivedMetric>) {
        if let Some(usage) = sample.get(&CounterKey::MemoryUsage) {
            let limit = sample.get(&CounterKey::MemoryLimit).unwrap_or(0);
            out.push(scope.gauge("memory.virtual.percent", memory_percent(usage, limit)));
        }

        let mut tx_errors = None;
        let mut rx_errors = None;
        for (key, value) in sample.counters() {
            match key {
                CounterKey::TxErrors(_) => *tx_errors.get_or_insert(0u64) += value,
                CounterKey::RxErrors(_) => *rx_errors.get_or_insert(0u64) += value,
                _ => {}
            }
        }
        if let Some(v) = tx_errors {
            out.push(scope.gauge("network.send_errors", v as f64));
        }
        if let Some(v) = rx_errors {
            out.push(scope.gauge("network.recv_errors", v as f64));
        }
    }

    fn rates(
        &self,
        entity: &Entity,
        prev: &RawSample,
        next: &RawSample,
        scope: &MetricScope,
        out: &mut Vec<DerivedMetric>,
    ) {
        let elapsed = match next.taken_at.checked_duration_since(prev.taken_at) {
            Some(d) if !d.is_zero() => d.as_secs_f64(),
            _ => {
                debug!(
                    "[{}] {}: non-positive elapsed time, skipping rates",
                    self.domain, entity.name
                );
                return;
            }
        };

        if next.get(&CounterKey::CpuTotalUsage).is_some() {
            let cpu = delta(prev, next, &CounterKey::CpuTotalUsage);
            let system = delta(prev, next, &CounterKey::CpuSystemUsage);
            match (cpu, system) {
                (Delta::Value(c), Delta::Value(s)) => {
                    let num_cpus = next.get(&CounterKey::CpuNumCpus).unwrap_or(1);
                    let pct = cpu_percent(c, s, num_cpus);
                    debug!(
                        "[{}] {}: cpu {c}/{s} x{num_cpus} = {pct:.2}%",
                        self.domain, entity.name
                    );
                    out.push(scope.gauge("cpu.percent", pct));
                }
                (Delta::Reset, _) | (_, Delta::Reset) => debug!(
                    "[{}] {}: cpu counters went backwards, resetting baseline",
                    self.domain, entity.name
                ),
                _ => {}
            }
        }

        for (path, is_direction) in [
            ("network.send_rate", is_tx as fn(&CounterKey) -> bool),
            ("network.recv_rate", is_rx),
        ] {
            if let Some(rate) = self.byte_rate(entity, prev, next, elapsed, is_direction) {
                out.push(scope.gauge(path, rate));
            }
        }
    }

    /// Bytes per second summed over every interface of `next`. Interfaces
    /// without a prior value are left out; a single reset suppresses the sum.
    fn byte_rate(
        &self,
        entity: &Entity,
        prev: &RawSample,
        next: &RawSample,
        elapsed: f64,
        is_direction: fn(&CounterKey) -> bool,
    ) -> Option<f64> {
        let mut total = 0u64;
        let mut seen = false;
        for (key, _) in next.counters().filter(|(k, _)| is_direction(k)) {
            match delta(prev, next, key) {
                Delta::Value(d) => {
                    total = total.saturating_add(d);
                    seen = true;
                }
                Delta::Reset => {
                    debug!(
                        "[{}] {}: {key} went backwards, resetting baseline",
                        self.domain, entity.name
                    );
                    return None;
                }
                Delta::Cold => {}
            }
        }
        seen.then(|| total as f64 / elapsed)
    }
}

fn is_tx(key: &CounterKey) -> bool {
    matches!(key, CounterKey::TxBytes(_))
}

fn is_rx(key: &CounterKey) -> bool {
    matches!(key, CounterKey::RxBytes(_))
}
