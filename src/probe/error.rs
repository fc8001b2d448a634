use thiserror::Error;

/// Probe-level errors for ping transport and gateway discovery
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("Failed to spawn {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Missing {0} pipe on ping process")]
    MissingPipe(&'static str),

    #[error("Gateway discovery failed: {0}")]
    Discovery(String),

    #[error("Invalid target address: {0:?}")]
    InvalidTarget(String),

    #[error("Failed to resolve {address}: {source}")]
    Resolve {
        address: String,
        #[source]
        source: std::io::Error,
    },
}

pub type Result<T> = std::result::Result<T, ProbeError>;
