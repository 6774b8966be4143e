// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Host and container metrics sampler.
//!
//! Each metric domain runs on its own fixed interval, turns cumulative OS and
//! container-runtime counters into gauges, and pushes them to a statsd
//! collector over UDP. Container statistics are read from the runtime's HTTP
//! API over its Unix socket.

// Panicking code
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![deny(clippy::todo)]
// Debug code that shouldn't be in production
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]

pub mod cli;
pub mod config;
pub mod docker;
pub mod domains;
pub mod engine;
pub mod error;
pub mod host;
pub mod metric;
pub mod scheduler;
pub mod shutdown;
pub mod sink;
pub mod state;
pub mod tags;

pub use engine::{Entity, RateEngine, RawSample};
pub use metric::{DerivedMetric, MetricKind};
