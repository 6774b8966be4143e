// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricKind {
    Gauge,
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetricKind::Gauge => write!(f, "g"),
        }
    }
}

/// A single value handed to the sink. `name` already carries the prefix and
/// the tag suffix.
#[derive(Debug, Clone, PartialEq)]
pub struct DerivedMetric {
    pub name: String,
    pub value: f64,
    pub kind: MetricKind,
}

impl DerivedMetric {
    pub fn gauge(name: impl Into<String>, value: f64) -> Self {
        Self {
            name: name.into(),
            value,
            kind: MetricKind::Gauge,
        }
    }
}

/// Naming context for one domain: an optional dotted prefix and an opaque tag
/// suffix (`,key=value,...` or empty) appended verbatim.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetricScope {
    prefix: String,
    tags: String,
}

impl MetricScope {
    pub fn new(prefix: impl Into<String>, tags: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            tags: tags.into(),
        }
    }

    /// Full metric name for `path`, e.g. `system.network.send_rate,host=web-1`.
    pub fn name(&self, path: &str) -> String {
        if self.prefix.is_empty() {
            format!("{path}{}", self.tags)
        } else {
            format!("{}.{path}{}", self.prefix, self.tags)
        }
    }

    pub fn gauge(&self, path: &str, value: f64) -> DerivedMetric {
        DerivedMetric::gauge(self.name(path), value)
    }
}

/// Collects the gauges of one cycle in emission order.
#[derive(Debug, Default)]
pub struct Batch {
    metrics: Vec<DerivedMetric>,
}

impl Batch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gauge(&mut self, scope: &MetricScope, path: &str, value: impl Into<f64>) {
        self.metrics.push(scope.gauge(path, value.into()));
    }

    pub fn is_empty(&self) -> bool {
        self.metrics.is_empty()
    }

    pub fn into_metrics(self) -> Vec<DerivedMetric> {
        self.metrics
    }
}
