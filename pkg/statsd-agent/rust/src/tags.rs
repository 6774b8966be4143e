// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use log::error;
use std::collections::HashSet;

const PLACEHOLDER: &str = "<insert service";

/// Make a `key=value` pair safe to append to a metric name.
pub fn sanitize(field: &str) -> String {
    field.replace([',', ' '], "_").replace('.', "-")
}

/// Build the `,k=v,k=v` suffix appended to every host metric.
///
/// `cli_fields` are `key=value` strings and win over `cfg_fields` with the same
/// key. `host=<hostname>` is appended when requested and no `host` field is set.
/// Returns an empty string when there are no fields.
pub fn build_suffix<'a>(
    cli_fields: &[String],
    cfg_fields: impl IntoIterator<Item = (&'a str, &'a str)>,
    add_host_field: bool,
    hostname: &str,
) -> String {
    let mut fields: Vec<String> = Vec::new();
    let mut keys: HashSet<String> = HashSet::new();

    for field in cli_fields {
        let key = field.split_once('=').map_or(field.as_str(), |(k, _)| k);
        if keys.insert(key.to_string()) {
            fields.push(field.clone());
        }
    }

    for (key, value) in cfg_fields {
        if value.contains(PLACEHOLDER) {
            error!("set a value for the `{key}` field in the configuration file");
            continue;
        }
        if !value.is_empty() && keys.insert(key.to_string()) {
            fields.push(format!("{key}={value}"));
        }
    }

    if add_host_field && !keys.contains("host") {
        fields.push(format!("host={hostname}"));
    }

    if fields.is_empty() {
        return String::new();
    }
    let joined: Vec<String> = fields.iter().map(|f| sanitize(f)).collect();
    format!(",{}", joined.join(","))
}
