//! Probe module: the transport-side collaborators of the monitor

pub mod error;
pub mod gateway;
pub mod ping;

pub use error::{ProbeError, Result as ProbeResult};
pub use gateway::{
    discover_gateway, parse_ip_route_default, parse_proc_net_route, parse_route_get_default,
};
pub use ping::{parse_rtt_ms, PingSource};
