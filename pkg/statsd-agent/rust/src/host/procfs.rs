// Unless explicitly stated otherwise all files in this repository are licensed
// under the Apache License Version 2.0.
// This product includes software developed at Datadog (https://www.datadoghq.com/).
// Copyright 2026-present Datadog, Inc.

//! Readers for the handful of `/proc` files sysinfo does not expose.

use std::env;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::OnceLock;

static PROC_ROOT: OnceLock<PathBuf> = OnceLock::new();
static SYS_ROOT: OnceLock<PathBuf> = OnceLock::new();

const DEFAULT_CLK_TCK: f64 = 100.0;
const SECTOR_FIELDS: usize = 14;

const UTMP_PATH: &str = "/var/run/utmp";
/// `sizeof(struct utmp)` with glibc on 64-bit Linux.
const UTMP_RECORD_LEN: usize = 384;
const UTMP_USER_OFFSET: usize = 44;
const UTMP_USER_LEN: usize = 32;
const USER_PROCESS: i16 = 7;

pub fn root_path() -> &'static Path {
    PROC_ROOT.get_or_init(|| {
        if let Ok(v) = env::var("HOST_PROC") {
            return v.into();
        }
        "/proc".into()
    })
}

fn sys_path() -> &'static Path {
    SYS_ROOT.get_or_init(|| {
        if let Ok(v) = env::var("HOST_SYS") {
            return v.into();
        }
        "/sys".into()
    })
}

/// Kernel clock ticks per second.
pub fn clock_ticks() -> f64 {
    match nix::unistd::sysconf(nix::unistd::SysconfVar::CLK_TCK) {
        Ok(Some(v)) if v > 0 => v as f64,
        _ => DEFAULT_CLK_TCK,
    }
}

/// Aggregate CPU times in seconds, from the `cpu` line of `/proc/stat`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CpuTimes {
    pub user: f64,
    pub nice: f64,
    pub system: f64,
    pub idle: f64,
    pub iowait: f64,
    pub irq: f64,
    pub softirq: f64,
    pub steal: f64,
    pub guest: f64,
    pub guest_nice: f64,
}

impl CpuTimes {
    pub fn read() -> io::Result<Self> {
        let content = fs::read_to_string(root_path().join("stat"))?;
        parse_stat(&content, clock_ticks())
            .ok_or_else(|| io::Error::new(io::ErrorKind::InvalidData, "no cpu line in stat"))
    }

    pub fn fields(&self) -> [(&'static str, f64); 10] {
        [
            ("user", self.user),
            ("nice", self.nice),
            ("system", self.system),
            ("idle", self.idle),
            ("iowait", self.iowait),
            ("irq", self.irq),
            ("softirq", self.softirq),
            ("steal", self.steal),
            ("guest", self.guest),
            ("guest_nice", self.guest_nice),
        ]
    }

    /// The kernel already counts guest time inside user and nice.
    fn total(&self) -> f64 {
        self.fields().iter().map(|(_, v)| v).sum::<f64>() - self.guest - self.guest_nice
    }

    /// Share of each mode over the window since `prev`, in percent. `None`
    /// when no time has passed.
    pub fn percent_since(&self, prev: &CpuTimes) -> Option<Vec<(&'static str, f64)>> {
        let total = self.total() - prev.total();
        if total <= 0.0 {
            return None;
        }
        Some(
            self.fields()
                .iter()
                .zip(prev.fields())
                .map(|((name, now), (_, before))| {
                    (*name, ((now - before).max(0.0) / total * 100.0).clamp(0.0, 100.0))
                })
                .collect(),
        )
    }
}

pub fn parse_stat(content: &str, ticks: f64) -> Option<CpuTimes> {
    let line = content.lines().find(|l| l.starts_with("cpu "))?;
    let mut values = line
        .split_whitespace()
        .skip(1)
        .map(|v| v.parse::<u64>().map(|t| t as f64 / ticks).unwrap_or(0.0));
    let mut next = || values.next().unwrap_or(0.0);
    Some(CpuTimes {
        user: next(),
        nice: next(),
        system: next(),
        idle: next(),
        iowait: next(),
        irq: next(),
        softirq: next(),
        steal: next(),
        guest: next(),
        guest_nice: next(),
    })
}

/// Memory breakdown sysinfo does not report, in bytes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MemoryBreakdown {
    pub active: u64,
    pub inactive: u64,
    pub buffers: u64,
    pub cached: u64,
}

impl MemoryBreakdown {
    pub fn read() -> io::Result<Self> {
        Ok(parse_meminfo(&fs::read_to_string(root_path().join("meminfo"))?))
    }
}

pub fn parse_meminfo(content: &str) -> MemoryBreakdown {
    let mut mem = MemoryBreakdown::default();
    for line in content.lines() {
        let Some((key, rest)) = line.split_once(':') else {
            continue;
        };
        let kib = rest
            .split_whitespace()
            .next()
            .and_then(|v| v.parse::<u64>().ok())
            .unwrap_or(0);
        let slot = match key {
            "Active" => &mut mem.active,
            "Inactive" => &mut mem.inactive,
            "Buffers" => &mut mem.buffers,
            "Cached" => &mut mem.cached,
            _ => continue,
        };
        *slot = kib * 1024;
    }
    mem
}

/// Cumulative I/O times in milliseconds, summed over whole block devices.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DiskTimes {
    pub read_time: u64,
    pub write_time: u64,
    pub busy_time: u64,
}

impl DiskTimes {
    pub fn read() -> io::Result<Self> {
        let content = fs::read_to_string(root_path().join("diskstats"))?;
        let block = sys_path().join("block");
        Ok(parse_diskstats(&content, |name| block.join(name).exists()))
    }
}

/// Partitions are skipped so their time is not counted twice.
pub fn parse_diskstats(content: &str, is_whole_device: impl Fn(&str) -> bool) -> DiskTimes {
    let mut times = DiskTimes::default();
    for line in content.lines() {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < SECTOR_FIELDS || !is_whole_device(fields[2]) {
            continue;
        }
        let field = |i: usize| fields[i].parse::<u64>().unwrap_or(0);
        times.read_time += field(6);
        times.write_time += field(10);
        times.busy_time += field(12);
    }
    times
}

/// Number of login sessions, or zero when the system keeps no utmp file.
pub fn logged_in_users() -> io::Result<u64> {
    match fs::read(UTMP_PATH) {
        Ok(raw) => Ok(count_user_sessions(&raw)),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(0),
        Err(e) => Err(e),
    }
}

/// Counts `USER_PROCESS` records with a user name. A trailing partial record
/// is ignored.
pub fn count_user_sessions(raw: &[u8]) -> u64 {
    raw.chunks_exact(UTMP_RECORD_LEN)
        .filter(|record| {
            let ut_type = i16::from_ne_bytes([record[0], record[1]]);
            let first_user_byte = record[UTMP_USER_OFFSET];
            ut_type == USER_PROCESS && first_user_byte != 0
        })
        .count() as u64
}
