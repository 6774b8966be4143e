// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

#![allow(dead_code)]

use dd_statsd_agent::DerivedMetric;
use dd_statsd_agent::sink::MetricSink;
use nix::sys::signal::{self, Signal};
use nix::unistd::Pid;
use serde_json::{Value, json};
use std::collections::HashMap;
use std::io::{self, BufRead, BufReader, Read, Write};
use std::net::UdpSocket;
use std::os::unix::net::{UnixListener, UnixStream};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(15);

// ---------------------------------------------------------------------------
// Daemon process
// ---------------------------------------------------------------------------

/// Handle to a running dd-statsd-agent process.
pub struct DaemonHandle {
    child: Child,
    log_lines: Arc<Mutex<Vec<String>>>,
    _reader_threads: Vec<std::thread::JoinHandle<()>>,
}

impl DaemonHandle {
    /// Start the agent with the given flags. `DD_STATSD_AGENT_CONFIG` points
    /// at a path that does not exist unless `-c` is passed.
    pub fn start(args: &[&str]) -> Self {
        let bin = env!("CARGO_BIN_EXE_dd-statsd-agent");
        let mut child = Command::new(bin)
            .args(args)
            .env("DD_STATSD_AGENT_CONFIG", "/nonexistent/statsd-agent.yaml")
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .expect("failed to start dd-statsd-agent");

        let log_lines = Arc::new(Mutex::new(Vec::<String>::new()));
        let stdout = child.stdout.take().expect("failed to capture stdout");
        let stderr = child.stderr.take().expect("failed to capture stderr");
        // simple_logger writes INFO to stdout, WARN/ERROR to stderr.
        let threads = vec![
            spawn_reader("daemon", stdout, Arc::clone(&log_lines)),
            spawn_reader("daemon:err", stderr, Arc::clone(&log_lines)),
        ];

        Self {
            child,
            log_lines,
            _reader_threads: threads,
        }
    }

    /// Wait until a log line containing `pattern` appears, or timeout.
    pub fn wait_for_log(&self, pattern: &str, timeout: Duration) -> bool {
        wait_until(timeout, || self.count_log_matches(pattern) > 0)
    }

    pub fn wait_for_log_default(&self, pattern: &str) -> bool {
        self.wait_for_log(pattern, DEFAULT_TIMEOUT)
    }

    pub fn count_log_matches(&self, pattern: &str) -> usize {
        let lines = self.log_lines.lock().unwrap();
        lines.iter().filter(|l| l.contains(pattern)).count()
    }

    pub fn send_signal(&self, sig: Signal) {
        let pid = self.child.id() as i32;
        signal::kill(Pid::from_raw(pid), sig).expect("failed to send signal to daemon");
    }

    /// Send SIGTERM and wait for the agent to exit.
    pub fn stop(&mut self) -> std::process::ExitStatus {
        self.send_signal(Signal::SIGTERM);
        self.wait_with_timeout(DEFAULT_TIMEOUT)
    }

    /// Wait for the agent to exit on its own, killing it after `timeout`.
    pub fn wait_with_timeout(&mut self, timeout: Duration) -> std::process::ExitStatus {
        let deadline = Instant::now() + timeout;
        loop {
            match self.child.try_wait().expect("failed to check daemon status") {
                Some(status) => return status,
                None => {
                    if Instant::now() >= deadline {
                        self.child.kill().ok();
                        return self.child.wait().expect("failed to wait on killed daemon");
                    }
                    std::thread::sleep(Duration::from_millis(50));
                }
            }
        }
    }
}

impl Drop for DaemonHandle {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

fn spawn_reader<R: Read + Send + 'static>(
    tag: &'static str,
    source: R,
    lines: Arc<Mutex<Vec<String>>>,
) -> std::thread::JoinHandle<()> {
    std::thread::spawn(move || {
        for line in BufReader::new(source).lines() {
            match line {
                Ok(l) => {
                    eprintln!("[{tag}] {l}");
                    lines.lock().unwrap().push(l);
                }
                Err(_) => break,
            }
        }
    })
}

pub fn wait_until(timeout: Duration, mut done: impl FnMut() -> bool) -> bool {
    let deadline = Instant::now() + timeout;
    loop {
        if done() {
            return true;
        }
        if Instant::now() >= deadline {
            return false;
        }
        std::thread::sleep(Duration::from_millis(50));
    }
}

// ---------------------------------------------------------------------------
// statsd server
// ---------------------------------------------------------------------------

/// UDP listener that keeps every received statsd line.
pub struct StatsdReceiver {
    port: u16,
    lines: Arc<Mutex<Vec<String>>>,
}

impl StatsdReceiver {
    pub fn start() -> Self {
        let socket = UdpSocket::bind("127.0.0.1:0").expect("failed to bind statsd receiver");
        let port = socket.local_addr().unwrap().port();
        let lines = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&lines);
        std::thread::spawn(move || {
            let mut buf = [0u8; 2048];
            while let Ok(n) = socket.recv(&mut buf) {
                let packet = String::from_utf8_lossy(&buf[..n]).into_owned();
                assert!(n <= 512, "datagram of {n} bytes");
                sink.lock()
                    .unwrap()
                    .extend(packet.lines().map(String::from));
            }
        });
        Self { port, lines }
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub fn lines(&self) -> Vec<String> {
        self.lines.lock().unwrap().clone()
    }

    /// Wait for a line whose metric name starts with `name`.
    pub fn wait_for_metric(&self, name: &str, timeout: Duration) -> bool {
        wait_until(timeout, || self.lines().iter().any(|l| l.starts_with(name)))
    }
}

// ---------------------------------------------------------------------------
// Container runtime
// ---------------------------------------------------------------------------

#[derive(Default)]
struct FakeState {
    containers: Vec<Value>,
    stats: HashMap<String, Value>,
    stats_delay: Duration,
    requests: Vec<String>,
}

/// Minimal container runtime API on a Unix socket, answering one HTTP/1.0
/// request per connection.
pub struct FakeDocker {
    _dir: tempfile::TempDir,
    socket: PathBuf,
    state: Arc<Mutex<FakeState>>,
}

impl FakeDocker {
    pub fn start() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let socket = dir.path().join("docker.sock");
        let listener = UnixListener::bind(&socket).expect("failed to bind fake runtime");
        let state = Arc::new(Mutex::new(FakeState::default()));
        let shared = Arc::clone(&state);
        std::thread::spawn(move || {
            for stream in listener.incoming() {
                let Ok(stream) = stream else { break };
                if let Err(e) = serve(stream, &shared) {
                    eprintln!("[fake-docker] {e}");
                }
            }
        });
        Self {
            _dir: dir,
            socket,
            state,
        }
    }

    pub fn socket_path(&self) -> &Path {
        &self.socket
    }

    /// Add or replace a container in the listing.
    pub fn set_container(&self, id: &str, name: &str, state: &str) {
        let mut s = self.state.lock().unwrap();
        let status = if state == "running" {
            "Up 5 minutes"
        } else {
            "Exited (0) 1 minute ago"
        };
        s.containers.retain(|c| c["Id"] != id);
        s.containers.push(json!({
            "Id": id,
            "Names": [format!("/{name}")],
            "State": state,
            "Status": status,
        }));
    }

    pub fn remove_container(&self, id: &str) {
        let mut s = self.state.lock().unwrap();
        s.containers.retain(|c| c["Id"] != id);
        s.stats.remove(id);
    }

    pub fn set_stats(&self, id: &str, stats: Value) {
        self.state.lock().unwrap().stats.insert(id.to_string(), stats);
    }

    /// Hold every stats response back by `delay`.
    pub fn set_stats_delay(&self, delay: Duration) {
        self.state.lock().unwrap().stats_delay = delay;
    }

    pub fn requests(&self) -> Vec<String> {
        self.state.lock().unwrap().requests.clone()
    }
}

fn serve(mut stream: UnixStream, state: &Mutex<FakeState>) -> io::Result<()> {
    let mut buf = Vec::new();
    let mut chunk = [0u8; 1024];
    while !buf.windows(4).any(|w| w == b"\r\n\r\n") {
        let n = stream.read(&mut chunk)?;
        if n == 0 {
            break;
        }
        buf.extend_from_slice(&chunk[..n]);
    }
    let request = String::from_utf8_lossy(&buf).into_owned();
    let request_line = request.lines().next().unwrap_or_default().to_string();
    let path = request_line.split_whitespace().nth(1).unwrap_or("/").to_string();

    let (status, body, delay) = {
        let mut s = state.lock().unwrap();
        s.requests.push(request_line);
        if path.starts_with("/containers/json") {
            ("200 OK", Value::Array(s.containers.clone()), Duration::ZERO)
        } else if let Some(id) = path
            .strip_prefix("/containers/")
            .and_then(|rest| rest.split_once("/stats"))
            .map(|(id, _)| id.to_string())
        {
            match s.stats.get(&id) {
                Some(stats) => ("200 OK", stats.clone(), s.stats_delay),
                None => (
                    "404 Not Found",
                    json!({"message": format!("No such container: {id}")}),
                    Duration::ZERO,
                ),
            }
        } else {
            ("404 Not Found", json!({"message": "page not found"}), Duration::ZERO)
        }
    };
    std::thread::sleep(delay);

    let body = serde_json::to_vec(&body)?;
    write!(
        stream,
        "HTTP/1.0 {status}\r\nContent-Type: application/json\r\nContent-Length: {}\r\n\r\n",
        body.len()
    )?;
    stream.write_all(&body)?;
    stream.flush()
}

/// Counters of one container, the way `/containers/<id>/stats?stream=0`
/// reports them.
#[derive(Debug, Clone, Copy, Default)]
pub struct Counters {
    pub total_usage: u64,
    pub system_usage: u64,
    pub num_cpus: usize,
    pub mem_usage: u64,
    pub mem_limit: u64,
    pub tx_bytes: u64,
    pub rx_bytes: u64,
    pub tx_errors: u64,
    pub rx_errors: u64,
}

pub fn stats_json(c: Counters) -> Value {
    json!({
        "read": "2026-10-17T12:00:00.000000000Z",
        "memory_stats": {"usage": c.mem_usage, "limit": c.mem_limit},
        "cpu_stats": {
            "cpu_usage": {
                "total_usage": c.total_usage,
                "percpu_usage": vec![c.total_usage / c.num_cpus.max(1) as u64; c.num_cpus],
            },
            "system_cpu_usage": c.system_usage,
        },
        "networks": {
            "eth0": {
                "rx_bytes": c.rx_bytes,
                "tx_bytes": c.tx_bytes,
                "rx_errors": c.rx_errors,
                "tx_errors": c.tx_errors,
            }
        }
    })
}

// ---------------------------------------------------------------------------
// Sink
// ---------------------------------------------------------------------------

/// Keeps every batch handed to it.
#[derive(Default)]
pub struct RecordingSink {
    batches: Mutex<Vec<Vec<DerivedMetric>>>,
}

impl RecordingSink {
    pub fn batches(&self) -> Vec<Vec<DerivedMetric>> {
        self.batches.lock().unwrap().clone()
    }
}

impl MetricSink for RecordingSink {
    fn emit(&self, metrics: &[DerivedMetric]) -> io::Result<()> {
        self.batches.lock().unwrap().push(metrics.to_vec());
        Ok(())
    }
}

/// Value of the metric called `name`, if present.
pub fn value(metrics: &[DerivedMetric], name: &str) -> Option<f64> {
    metrics.iter().find(|m| m.name == name).map(|m| m.value)
}
