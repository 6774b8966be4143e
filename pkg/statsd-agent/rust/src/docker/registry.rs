// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use super::client::DockerClient;
use super::stats::ContainerSummary;
use crate::engine::Entity;
use log::debug;

pub const CONTAINERS_PATH: &str = "/containers/json?all=1";

const SHORT_ID_LEN: usize = 12;

pub fn stats_path(id: &str) -> String {
    format!("/containers/{id}/stats?stream=0")
}

/// Running containers, resolved fresh on every call. An unreachable runtime
/// yields an empty list.
pub async fn list_entities(client: &DockerClient) -> Vec<Entity> {
    let summaries: Vec<ContainerSummary> = client
        .get_json(CONTAINERS_PATH)
        .await
        .unwrap_or_default();
    entities_from(summaries)
}

pub fn entities_from(summaries: Vec<ContainerSummary>) -> Vec<Entity> {
    summaries
        .into_iter()
        .filter_map(|c| {
            if c.id.is_empty() {
                return None;
            }
            if let Some(state) = c.state.as_deref()
                && state != "running"
            {
                debug!("skipping {} ({state})", c.id);
                return None;
            }
            let name = c
                .names
                .first()
                .map(|n| n.trim_start_matches('/').to_string())
                .filter(|n| !n.is_empty())
                .unwrap_or_else(|| c.id.chars().take(SHORT_ID_LEN).collect());
            debug!("{name}: {}", c.status.as_deref().unwrap_or("unknown"));
            Some(Entity::new(c.id, name))
        })
        .collect()
}
