//! Sample source backed by the system `ping` command
//!
//! The actual ICMP/UDP exchange is delegated to `ping -n`, which works without
//! elevated privileges on the platforms we care about. Each reply line is parsed
//! into an integer millisecond RTT and handed to the monitor one at a time.

use crate::monitor::constants::SOURCE_CHANNEL_CAPACITY;
use crate::monitor::source::SampleSource;
use crate::probe::error::ProbeError;
use std::io;
use std::net::{IpAddr, ToSocketAddrs};
use std::process::Stdio;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStderr, ChildStdout, Command};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{debug, error, warn};

const PING_PROGRAM: &str = "ping";

/// Pings a single target with the system `ping` command
#[derive(Debug, Clone)]
pub struct PingSource {
    address: String,
}

impl PingSource {
    /// Create a source for the given host or address
    pub fn new(address: impl Into<String>) -> Result<Self, ProbeError> {
        let address = address.into();
        // an address starting with '-' would be read by ping as an option
        if address.is_empty()
            || address.starts_with('-')
            || address.chars().any(char::is_whitespace)
        {
            return Err(ProbeError::InvalidTarget(address));
        }
        Ok(Self { address })
    }

    /// Resolve the target to the first address the system resolver returns
    pub fn resolve(&self) -> Result<IpAddr, ProbeError> {
        let resolve_error = |source: io::Error| ProbeError::Resolve {
            address: self.address.clone(),
            source,
        };
        (self.address.as_str(), 0)
            .to_socket_addrs()
            .map_err(resolve_error)?
            .next()
            .map(|socket| socket.ip())
            .ok_or_else(|| {
                resolve_error(io::Error::new(
                    io::ErrorKind::NotFound,
                    "no addresses returned",
                ))
            })
    }
}

impl SampleSource for PingSource {
    fn address(&self) -> &str {
        &self.address
    }

    fn start(&self, cancel: CancellationToken) -> crate::monitor::Result<mpsc::Receiver<u64>> {
        let resolved = self.resolve()?;
        debug!(addr = %self.address, ip = %resolved, "Spawning ping");
        let mut child = Command::new(PING_PROGRAM)
            .arg("-n")
            .arg(&self.address)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|source| ProbeError::Spawn {
                program: PING_PROGRAM.to_string(),
                source,
            })?;

        let stdout = child
            .stdout
            .take()
            .ok_or(ProbeError::MissingPipe("stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or(ProbeError::MissingPipe("stderr"))?;

        let (tx, rx) = mpsc::channel(SOURCE_CHANNEL_CAPACITY);

        tokio::spawn(report_stderr(self.address.clone(), stderr));
        tokio::spawn(forward_replies(
            self.address.clone(),
            child,
            stdout,
            tx,
            cancel,
        ));

        Ok(rx)
    }
}

async fn forward_replies(
    address: String,
    mut child: Child,
    stdout: ChildStdout,
    tx: mpsc::Sender<u64>,
    cancel: CancellationToken,
) {
    let mut lines = BufReader::new(stdout).lines();
    let mut cancelled = false;

    loop {
        tokio::select! {
            biased;
            _ = cancel.cancelled() => {
                cancelled = true;
                break;
            }
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    let Some(rtt_ms) = parse_rtt_ms(&line) else {
                        continue;
                    };
                    debug!(addr = %address, rtt_ms = rtt_ms, "Reply received");
                    tokio::select! {
                        biased;
                        _ = cancel.cancelled() => {
                            cancelled = true;
                            break;
                        }
                        sent = tx.send(rtt_ms) => {
                            if sent.is_err() {
                                debug!(addr = %address, "Receiver dropped, stopping ping");
                                cancelled = true;
                                break;
                            }
                        }
                    }
                }
                Ok(None) => break,
                Err(e) => {
                    warn!(addr = %address, error = %e, "Failed to read ping output");
                    break;
                }
            }
        }
    }

    if cancelled {
        if let Err(e) = child.kill().await {
            warn!(addr = %address, error = %e, "Failed to stop ping");
        }
        debug!(addr = %address, "Ping stopped");
        return;
    }

    match child.wait().await {
        Ok(status) if status.success() => debug!(addr = %address, "Ping finished"),
        Ok(status) => error!(addr = %address, status = %status, "Ping exited unexpectedly"),
        Err(e) => error!(addr = %address, error = %e, "Failed to wait for ping"),
    }
}

async fn report_stderr(address: String, stderr: ChildStderr) {
    let mut lines = BufReader::new(stderr).lines();
    while let Ok(Some(line)) = lines.next_line().await {
        let line = line.trim();
        if !line.is_empty() {
            warn!(addr = %address, "ping: {}", line);
        }
    }
}

/// Extract the round-trip time from one line of `ping` output
///
/// Understands `time=12.3 ms` (Linux, BSD, macOS) as well as `time=12ms` and
/// `time<1ms`. Fractions are truncated to whole milliseconds.
pub fn parse_rtt_ms(line: &str) -> Option<u64> {
    if line.contains("time<") {
        return Some(0);
    }

    let start = line.find("time=")?;
    let rest = &line[start + "time=".len()..];
    let end = rest
        .find(|c: char| !(c.is_ascii_digit() || c == '.'))
        .unwrap_or(rest.len());
    let value: f64 = rest[..end].parse().ok()?;

    if !value.is_finite() || value < 0.0 {
        return None;
    }

    Some(value.trunc() as u64)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::monitor::MonitorError;

    #[test]
    fn test_parse_linux_reply() {
        let line = "64 bytes from 1.1.1.1: icmp_seq=1 ttl=57 time=12.7 ms";
        assert_eq!(parse_rtt_ms(line), Some(12));
    }

    #[test]
    fn test_parse_macos_reply() {
        let line = "64 bytes from 192.168.1.1: icmp_seq=0 ttl=64 time=3.482 ms";
        assert_eq!(parse_rtt_ms(line), Some(3));
    }

    #[test]
    fn test_parse_compact_reply() {
        assert_eq!(parse_rtt_ms("Reply from 1.1.1.1: bytes=32 time=14ms TTL=57"), Some(14));
        assert_eq!(parse_rtt_ms("Reply from 10.0.0.1: bytes=32 time<1ms TTL=64"), Some(0));
    }

    #[test]
    fn test_parse_ignores_non_reply_lines() {
        assert_eq!(parse_rtt_ms("PING 1.1.1.1 (1.1.1.1) 56(84) bytes of data."), None);
        assert_eq!(
            parse_rtt_ms("rtt min/avg/max/mdev = 11.2/12.0/13.1/0.6 ms"),
            None
        );
        assert_eq!(parse_rtt_ms("Request timeout for icmp_seq 4"), None);
    }

    #[test]
    fn test_new_rejects_option_like_target() {
        assert!(PingSource::new("-f").is_err());
        assert!(PingSource::new("").is_err());
        assert!(PingSource::new("1.1.1.1 -c 1").is_err());
        assert_eq!(PingSource::new("1.1.1.1").unwrap().address(), "1.1.1.1");
    }

    #[test]
    fn test_resolve_literal_address() {
        let source = PingSource::new("127.0.0.1").unwrap();
        assert_eq!(source.resolve().unwrap(), "127.0.0.1".parse::<IpAddr>().unwrap());
    }

    #[tokio::test]
    async fn test_start_fails_for_unresolvable_target() {
        // .invalid never resolves
        let source = PingSource::new("no-such-host.invalid").unwrap();
        let cancel = CancellationToken::new();

        match source.start(cancel) {
            Err(MonitorError::Probe(ProbeError::Resolve { address, .. })) => {
                assert_eq!(address, "no-such-host.invalid")
            }
            Err(other) => panic!("expected resolve failure, got {other:?}"),
            Ok(_) => panic!("unresolvable target started"),
        }
    }
}
