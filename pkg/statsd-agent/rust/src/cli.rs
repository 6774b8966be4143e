// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use clap::Parser;
use std::path::PathBuf;

/// Command-line flags. Every value left unset falls back to the config file.
#[derive(Parser, Debug, Default, Clone)]
#[command(name = "dd-statsd-agent")]
#[command(about = "Sample host and container metrics and push them to statsd")]
#[command(version)]
pub struct Args {
    /// Path to the YAML configuration file
    #[arg(short = 'c', long, env = "DD_STATSD_AGENT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Hostname or IP of the statsd server
    #[arg(short = 't', long)]
    pub host: Option<String>,

    /// UDP port of the statsd server
    #[arg(short, long)]
    pub port: Option<u16>,

    /// Prefix prepended to every host metric
    #[arg(short = 'x', long)]
    pub prefix: Option<String>,

    /// `key=value` field appended to every host metric (repeatable)
    #[arg(short = 'f', long = "field")]
    pub fields: Vec<String>,

    /// Network interface to measure
    #[arg(short = 'n', long = "nic", visible_alias = "network")]
    pub nic: Option<String>,

    /// Seconds between host measurements (>= 3)
    #[arg(short, long)]
    pub interval: Option<u64>,

    /// Append host=<hostname> to the fields
    #[arg(short, long)]
    pub add_host_field: bool,

    /// Enable debug logging
    #[arg(short = 'g', long)]
    pub debug: bool,

    /// Enable container metrics
    #[arg(short, long)]
    pub docker: bool,

    /// Path of the container runtime's Unix socket
    #[arg(short = 'D', long)]
    pub docker_addr: Option<PathBuf>,

    /// Seconds between container measurements (>= 3)
    #[arg(short = 'I', long)]
    pub docker_interval: Option<u64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_short_flags() {
        let args = Args::try_parse_from([
            "dd-statsd-agent",
            "-t",
            "statsd.local",
            "-p",
            "9125",
            "-f",
            "service=web",
            "-f",
            "env=prod",
            "-n",
            "eth1",
            "-i",
            "5",
            "-a",
            "-d",
            "-I",
            "20",
        ])
        .unwrap();

        assert_eq!(args.host.as_deref(), Some("statsd.local"));
        assert_eq!(args.port, Some(9125));
        assert_eq!(args.fields, vec!["service=web", "env=prod"]);
        assert_eq!(args.nic.as_deref(), Some("eth1"));
        assert_eq!(args.interval, Some(5));
        assert!(args.add_host_field);
        assert!(args.docker);
        assert!(!args.debug);
        assert_eq!(args.docker_interval, Some(20));
    }

    #[test]
    fn test_network_alias() {
        let args = Args::try_parse_from(["dd-statsd-agent", "--network", "bond0"]).unwrap();
        assert_eq!(args.nic.as_deref(), Some("bond0"));
    }

    #[test]
    fn test_defaults_are_unset() {
        let args = Args::try_parse_from(["dd-statsd-agent"]).unwrap();
        assert!(args.host.is_none());
        assert!(args.interval.is_none());
        assert!(args.fields.is_empty());
        assert!(!args.docker);
    }
}
