// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

use crate::metric::DerivedMetric;
use cadence::prelude::*;
use cadence::{BufferedUdpMetricSink, StatsdClient};
use log::{debug, warn};
use std::io;
use std::net::{SocketAddr, ToSocketAddrs, UdpSocket};

/// Destination of derived metrics. Emission is fire-and-forget; an `Err` is
/// logged by the caller and the cycle moves on.
pub trait MetricSink: Send + Sync {
    fn emit(&self, metrics: &[DerivedMetric]) -> io::Result<()>;
}

/// Plain statsd over UDP. Names already carry their prefix and tag suffix, so
/// the client is built without a prefix of its own.
pub struct StatsdSink {
    client: StatsdClient,
}

impl StatsdSink {
    pub fn connect(host: &str, port: u16) -> io::Result<Self> {
        let target = (host, port).to_socket_addrs()?.next().ok_or_else(|| {
            io::Error::new(io::ErrorKind::NotFound, format!("no address for {host}"))
        })?;
        let bind: SocketAddr = if target.is_ipv4() {
            ([0, 0, 0, 0], 0).into()
        } else {
            ([0u16; 8], 0).into()
        };
        let socket = UdpSocket::bind(bind)?;
        socket.set_nonblocking(true)?;
        let sink = BufferedUdpMetricSink::from(target, socket).map_err(io::Error::other)?;
        let client = StatsdClient::from_sink("", sink);
        debug!("statsd client sending to {target}");
        Ok(Self { client })
    }
}

impl MetricSink for StatsdSink {
    fn emit(&self, metrics: &[DerivedMetric]) -> io::Result<()> {
        for metric in metrics {
            if !metric.value.is_finite() {
                warn!("dropping {}: non-finite value {}", metric.name, metric.value);
                continue;
            }
            self.client
                .gauge(&metric.name, metric.value)
                .map_err(io::Error::other)?;
        }
        self.client.flush().map_err(io::Error::other)
    }
}
