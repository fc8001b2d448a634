//! Default gateway discovery
//!
//! One-shot lookup of the local default gateway, used as the first monitored
//! target. Linux exposes the routing table in `/proc/net/route`; everywhere else
//! (and as a Linux fallback) the system route tools are asked instead.

use crate::probe::error::{ProbeError, Result};
use std::fs;
use std::net::{IpAddr, Ipv4Addr};
use std::process::Command;
use tracing::{debug, info};

const PROC_NET_ROUTE: &str = "/proc/net/route";

/// `RTF_GATEWAY` from `<linux/route.h>`
const RTF_GATEWAY: u32 = 0x0002;

/// Discover the default gateway address
pub fn discover_gateway() -> Result<IpAddr> {
    match fs::read_to_string(PROC_NET_ROUTE) {
        Ok(contents) => {
            if let Some(gateway) = parse_proc_net_route(&contents) {
                info!(gateway = %gateway, source = PROC_NET_ROUTE, "Default gateway discovered");
                return Ok(IpAddr::V4(gateway));
            }
            debug!("No default route with a gateway in {}", PROC_NET_ROUTE);
        }
        Err(e) => debug!(error = %e, "Routing table not readable, asking route tools"),
    }

    if let Some(output) = run_route_tool("route", &["-n", "get", "default"]) {
        if let Some(gateway) = parse_route_get_default(&output) {
            info!(gateway = %gateway, source = "route", "Default gateway discovered");
            return Ok(gateway);
        }
    }

    if let Some(output) = run_route_tool("ip", &["route", "show", "default"]) {
        if let Some(gateway) = parse_ip_route_default(&output) {
            info!(gateway = %gateway, source = "ip", "Default gateway discovered");
            return Ok(gateway);
        }
    }

    Err(ProbeError::Discovery(
        "no default route with a gateway found (use --gateway to set one)".into(),
    ))
}

fn run_route_tool(program: &str, args: &[&str]) -> Option<String> {
    let output = match Command::new(program).args(args).output() {
        Ok(output) => output,
        Err(e) => {
            debug!(program = program, error = %e, "Route tool unavailable");
            return None;
        }
    };

    if !output.status.success() {
        debug!(program = program, status = %output.status, "Route tool failed");
        return None;
    }

    Some(String::from_utf8_lossy(&output.stdout).into_owned())
}

/// Parse the Linux `/proc/net/route` table and return the gateway of the default route
pub fn parse_proc_net_route(contents: &str) -> Option<Ipv4Addr> {
    for line in contents.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }

        let (Ok(destination), Ok(gateway), Ok(flags)) = (
            u32::from_str_radix(fields[1], 16),
            u32::from_str_radix(fields[2], 16),
            u32::from_str_radix(fields[3], 16),
        ) else {
            continue;
        };

        if destination != 0 || flags & RTF_GATEWAY == 0 || gateway == 0 {
            continue;
        }

        // the kernel prints the address in host byte order
        return Some(Ipv4Addr::from(gateway.to_le_bytes()));
    }

    None
}

/// Parse the output of `route -n get default` (macOS and the BSDs)
pub fn parse_route_get_default(output: &str) -> Option<IpAddr> {
    output.lines().find_map(|line| {
        let value = line.trim().strip_prefix("gateway:")?;
        value.trim().parse().ok()
    })
}

/// Parse the output of `ip route show default`
pub fn parse_ip_route_default(output: &str) -> Option<IpAddr> {
    output.lines().find_map(|line| {
        let mut tokens = line.split_whitespace();
        if tokens.next()? != "default" {
            return None;
        }
        tokens
            .skip_while(|token| *token != "via")
            .nth(1)?
            .parse()
            .ok()
    })
}
