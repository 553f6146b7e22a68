use std::path::PathBuf;
use sysinfo::System;
use tracing::debug;

/// Result of one platform probe.
#[derive(Debug, Clone, PartialEq)]
pub enum Probe<T> {
    Gathered(T),
    Fallback { value: T, reason: String },
}

impl<T> Probe<T> {
    fn fallback(value: T, reason: impl Into<String>) -> Self {
        let reason = reason.into();
        debug!("probe fell back: {reason}");
        Probe::Fallback { value, reason }
    }

    pub fn value(&self) -> &T {
        match self {
            Probe::Gathered(value) | Probe::Fallback { value, .. } => value,
        }
    }

    pub fn is_fallback(&self) -> bool {
        matches!(self, Probe::Fallback { .. })
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Memory {
    pub used_mb: u64,
    pub total_mb: u64,
    pub percent: f64,
}

#[derive(Debug, Clone)]
pub struct SystemInfo {
    pub os: Probe<String>,
    pub user: Probe<String>,
    pub hostname: Probe<String>,
    pub uptime: Probe<String>,
    pub memory: Probe<Memory>,
    pub cpu: Probe<String>,
    pub kernel: Probe<String>,
    pub shell: Probe<String>,
}

impl SystemInfo {
    pub fn fallbacks(&self) -> usize {
        [
            self.os.is_fallback(),
            self.user.is_fallback(),
            self.hostname.is_fallback(),
            self.uptime.is_fallback(),
            self.memory.is_fallback(),
            self.cpu.is_fallback(),
            self.kernel.is_fallback(),
            self.shell.is_fallback(),
        ]
        .into_iter()
        .filter(|f| *f)
        .count()
    }
}

/// Reads host facts. `proc_root` is where the Linux pseudo-files live.
#[derive(Debug, Clone)]
pub struct Collector {
    proc_root: PathBuf,
}

impl Default for Collector {
    fn default() -> Self {
        Self::new("/proc")
    }
}

impl Collector {
    pub fn new(proc_root: impl Into<PathBuf>) -> Self {
        Self {
            proc_root: proc_root.into(),
        }
    }

    pub fn collect(&self) -> SystemInfo {
        SystemInfo {
            os: os_name(),
            user: env_or_unknown("USER", |v| v),
            hostname: hostname(),
            uptime: self.uptime(),
            memory: self.memory(),
            cpu: self.cpu(),
            kernel: kernel(),
            shell: env_or_unknown("SHELL", shell_name),
        }
    }

    fn read(&self, name: &str) -> Result<String, String> {
        let path = self.proc_root.join(name);
        std::fs::read_to_string(&path).map_err(|e| format!("{}: {e}", path.display()))
    }

    pub fn uptime(&self) -> Probe<String> {
        if cfg!(target_os = "linux") {
            match self.read("uptime") {
                Ok(content) => match parse_uptime(&content) {
                    Some(secs) => Probe::Gathered(format_uptime(secs)),
                    None => Probe::fallback("N/A".to_string(), "unparseable uptime"),
                },
                Err(e) => Probe::fallback("N/A".to_string(), e),
            }
        } else if cfg!(target_os = "macos") {
            Probe::fallback("Available".to_string(), "uptime not computed on macOS")
        } else {
            Probe::fallback("N/A".to_string(), "uptime unsupported on this platform")
        }
    }

    pub fn memory(&self) -> Probe<Memory> {
        if !cfg!(target_os = "linux") {
            return Probe::fallback(Memory::default(), "meminfo unsupported on this platform");
        }
        match self.read("meminfo") {
            Ok(content) => match parse_meminfo(&content) {
                Some(memory) => Probe::Gathered(memory),
                None => Probe::fallback(Memory::default(), "unparseable meminfo"),
            },
            Err(e) => Probe::fallback(Memory::default(), e),
        }
    }

    pub fn cpu(&self) -> Probe<String> {
        let reason = if cfg!(target_os = "linux") {
            match self.read("cpuinfo") {
                Ok(content) => match parse_cpu_model(&content) {
                    Some(model) => return Probe::Gathered(model),
                    None => "no model name in cpuinfo".to_string(),
                },
                Err(e) => e,
            }
        } else {
            "cpuinfo unsupported on this platform".to_string()
        };

        let mut sys = System::new();
        sys.refresh_cpu();
        match sys.cpus().first().map(|c| c.brand().trim().to_string()) {
            Some(brand) if !brand.is_empty() => Probe::fallback(brand, reason),
            _ => Probe::fallback("Unknown CPU".to_string(), reason),
        }
    }
}

fn os_name() -> Probe<String> {
    let os = os_info::get();
    Probe::Gathered(format!("{} {}", os.os_type(), os.version()))
}

fn hostname() -> Probe<String> {
    match whoami::fallible::hostname() {
        Ok(name) => Probe::Gathered(name),
        Err(e) => Probe::fallback("Unknown".to_string(), e.to_string()),
    }
}

fn kernel() -> Probe<String> {
    match System::kernel_version() {
        Some(version) => Probe::Gathered(version),
        None => Probe::fallback("N/A".to_string(), "kernel version unavailable"),
    }
}

fn env_or_unknown(var: &str, shape: impl Fn(String) -> String) -> Probe<String> {
    match std::env::var(var) {
        Ok(value) => Probe::Gathered(shape(value)),
        Err(e) => Probe::fallback("Unknown".to_string(), format!("{var}: {e}")),
    }
}

/// `/usr/bin/zsh` -> `zsh`
pub fn shell_name(path: String) -> String {
    path.rsplit('/').next().unwrap_or_default().to_string()
}

/// Seconds since boot: the first token of `/proc/uptime`.
pub fn parse_uptime(content: &str) -> Option<f64> {
    content.split_whitespace().next()?.parse().ok()
}

pub fn format_uptime(secs: f64) -> String {
    let secs = secs as u64;
    let hours = secs / 3600;
    let minutes = (secs % 3600) / 60;
    format!("{}h {}m", hours, minutes)
}

fn meminfo_kb(content: &str, key: &str) -> Option<u64> {
    content
        .lines()
        .find_map(|line| line.strip_prefix(key)?.strip_prefix(':'))
        .and_then(|rest| rest.split_whitespace().next())
        .and_then(|kb| kb.parse().ok())
}

pub fn parse_meminfo(content: &str) -> Option<Memory> {
    let total = meminfo_kb(content, "MemTotal")?;
    let available = meminfo_kb(content, "MemAvailable")?;
    if total == 0 {
        return None;
    }
    let used = total.saturating_sub(available);
    Some(Memory {
        used_mb: used / 1024,
        total_mb: total / 1024,
        percent: used as f64 / total as f64 * 100.0,
    })
}

pub fn parse_cpu_model(content: &str) -> Option<String> {
    content
        .lines()
        .find(|line| line.starts_with("model name"))
        .and_then(|line| line.split_once(':'))
        .map(|(_, model)| model.trim().to_string())
}
