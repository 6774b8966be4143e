// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::cli::Args;
use crate::error::ConfigError;
use crate::tags;
use log::debug;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::time::Duration;

const DEFAULT_CONFIG_PATH: &str = "/etc/datadog-agent/statsd-agent.yaml";

/// Shorter intervals make the 1s CPU sampling window overlap the next cycle.
pub const MIN_INTERVAL_SECS: u64 = 3;

fn default_host() -> String {
    "localhost".to_string()
}

fn default_port() -> u16 {
    8125
}

fn default_interval() -> u64 {
    10
}

fn default_docker_address() -> PathBuf {
    PathBuf::from("/var/run/docker.sock")
}

fn default_docker_interval() -> u64 {
    15
}

fn default_docker_timeout() -> u64 {
    10
}

fn default_max_response_bytes() -> usize {
    4 * 1024 * 1024
}

#[derive(Debug, Deserialize)]
pub struct FileConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default)]
    pub prefix: String,
    #[serde(default = "default_interval")]
    pub interval: u64,
    pub nic: Option<String>,
    #[serde(default)]
    pub add_host_field: bool,
    #[serde(default)]
    pub debug: bool,
    #[serde(default)]
    pub fields: BTreeMap<String, serde_yaml::Value>,
    #[serde(default)]
    pub docker: DockerConfig,
}

impl Default for FileConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            prefix: String::new(),
            interval: default_interval(),
            nic: None,
            add_host_field: false,
            debug: false,
            fields: BTreeMap::new(),
            docker: DockerConfig::default(),
        }
    }
}

impl FileConfig {
    /// Scalar field values rendered as strings; other YAML shapes are skipped.
    fn field_pairs(&self) -> Vec<(&str, String)> {
        self.fields
            .iter()
            .filter_map(|(k, v)| {
                let value = match v {
                    serde_yaml::Value::String(s) => s.clone(),
                    serde_yaml::Value::Number(n) => n.to_string(),
                    serde_yaml::Value::Bool(b) => b.to_string(),
                    _ => {
                        debug!("skipping non-scalar field {k}");
                        return None;
                    }
                };
                Some((k.as_str(), value))
            })
            .collect()
    }
}

#[derive(Debug, Deserialize)]
pub struct DockerConfig {
    #[serde(default)]
    pub enabled: bool,
    #[serde(default = "default_docker_address")]
    pub address: PathBuf,
    #[serde(default = "default_docker_interval")]
    pub interval: u64,
    #[serde(default = "default_docker_timeout")]
    pub timeout_secs: u64,
    #[serde(default = "default_max_response_bytes")]
    pub max_response_bytes: usize,
}

impl Default for DockerConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            address: default_docker_address(),
            interval: default_docker_interval(),
            timeout_secs: default_docker_timeout(),
            max_response_bytes: default_max_response_bytes(),
        }
    }
}

pub fn config_path(args: &Args) -> PathBuf {
    args.config
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

/// Read the config file. A missing file yields the defaults.
pub fn load_config(path: &Path) -> Result<FileConfig, ConfigError> {
    let contents = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            debug!("{} not found, using defaults", path.display());
            return Ok(FileConfig::default());
        }
        Err(source) => {
            return Err(ConfigError::Read {
                path: path.to_path_buf(),
                source,
            });
        }
    };
    if contents.trim().is_empty() {
        return Ok(FileConfig::default());
    }
    serde_yaml::from_str(&contents).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DockerSettings {
    pub address: PathBuf,
    pub interval: Duration,
    pub timeout: Duration,
    pub max_response_bytes: usize,
}

/// Effective settings after merging flags over the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub statsd_host: String,
    pub statsd_port: u16,
    pub prefix: String,
    pub interval: Duration,
    pub nic: Option<String>,
    pub tags: String,
    pub debug: bool,
    pub docker: Option<DockerSettings>,
}

fn check_interval(domain: &'static str, secs: u64) -> Result<Duration, ConfigError> {
    if secs < MIN_INTERVAL_SECS {
        return Err(ConfigError::InvalidInterval {
            domain,
            secs,
            min: MIN_INTERVAL_SECS,
        });
    }
    Ok(Duration::from_secs(secs))
}

impl Settings {
    pub fn resolve(args: &Args, file: FileConfig, hostname: &str) -> Result<Self, ConfigError> {
        if let Some(bad) = args.fields.iter().find(|f| !f.contains('=')) {
            return Err(ConfigError::InvalidField(bad.clone()));
        }

        let interval = check_interval("system", args.interval.unwrap_or(file.interval))?;

        let docker_enabled = args.docker || file.docker.enabled;
        let docker_interval = check_interval(
            "docker",
            args.docker_interval.unwrap_or(file.docker.interval),
        )?;
        let docker = docker_enabled.then(|| DockerSettings {
            address: args
                .docker_addr
                .clone()
                .unwrap_or_else(|| file.docker.address.clone()),
            interval: docker_interval,
            timeout: Duration::from_secs(file.docker.timeout_secs),
            max_response_bytes: file.docker.max_response_bytes,
        });

        let field_pairs = file.field_pairs();
        let tags = tags::build_suffix(
            &args.fields,
            field_pairs.iter().map(|(k, v)| (*k, v.as_str())),
            args.add_host_field || file.add_host_field,
            hostname,
        );

        Ok(Self {
            statsd_host: args.host.clone().unwrap_or(file.host),
            statsd_port: args.port.unwrap_or(file.port),
            prefix: args.prefix.clone().unwrap_or(file.prefix),
            interval,
            nic: args.nic.clone().or(file.nic),
            tags,
            debug: args.debug || file.debug,
            docker,
        })
    }
}
