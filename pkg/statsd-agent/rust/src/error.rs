// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use hyper::StatusCode;
use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// Startup configuration problems. Any of these aborts the process.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse config file {path}")]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
    #[error("invalid {domain} interval ({secs}s < {min}s)")]
    InvalidInterval {
        domain: &'static str,
        secs: u64,
        min: u64,
    },
    #[error("invalid field {0:?}, expected key=value")]
    InvalidField(String),
    #[error("unknown network interface {0:?}")]
    UnknownInterface(String),
    #[error("could not locate a 10.x.x.x network interface")]
    NoInterface,
}

/// Failures talking to the container runtime. Callers treat all of them as
/// "nothing this cycle".
#[derive(Debug, Error)]
pub enum DockerError {
    #[error("connecting to {path}")]
    Connect {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("building request")]
    Request(#[from] hyper::http::Error),
    #[error("HTTP exchange failed")]
    Http(#[from] hyper::Error),
    #[error("unexpected status {0}")]
    Status(StatusCode),
    #[error("response body exceeds {0} bytes")]
    TooLarge(usize),
    #[error("reading response body: {0}")]
    Body(String),
    #[error("request timed out after {0:?}")]
    Timeout(Duration),
    #[error("decoding JSON payload")]
    Decode(#[from] serde_json::Error),
}
