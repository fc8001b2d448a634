use crate::probe::ProbeError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum MonitorError {
    #[error("Terminal I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to start sample source {target}: {source}")]
    SourceStart {
        target: String,
        #[source]
        source: Box<MonitorError>,
    },

    #[error("Probe error: {0}")]
    Probe(#[from] ProbeError),

    #[error("Configuration error: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, MonitorError>;
