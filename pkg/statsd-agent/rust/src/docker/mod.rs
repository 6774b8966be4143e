// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Container runtime access over its Unix socket.

pub mod client;
pub mod registry;
pub mod stats;

pub use client::DockerClient;
pub use registry::{list_entities, stats_path};
pub use stats::{ContainerStats, ContainerSummary};
