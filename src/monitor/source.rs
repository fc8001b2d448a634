use crate::monitor::error::Result;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

/// Trait for a producer of RTT samples for one target
///
/// A started source delivers samples in the order its transport produced them
/// and closes the channel when it stops, either because `cancel` fired or
/// because the transport ended. Failing to start is reported by `start` itself,
/// never through the channel.
pub trait SampleSource: Send + Sync {
    /// Address or host name of the target
    fn address(&self) -> &str;

    /// Start producing RTT samples in milliseconds
    fn start(&self, cancel: CancellationToken) -> Result<mpsc::Receiver<u64>>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use mockall::mock;

    mock! {
        pub SampleSource {}

        impl SampleSource for SampleSource {
            fn address(&self) -> &str;
            fn start(&self, cancel: CancellationToken) -> Result<mpsc::Receiver<u64>>;
        }
    }
}

#[cfg(test)]
pub use tests::MockSampleSource;
