use anyhow::{Context, Result};
use clap::Parser;
use pingplot::monitor::{
    init_logging_with_config, run_loop, Config, CursorGuard, SampleSource, TerminalDisplay,
};
use pingplot::probe::{discover_gateway, PingSource};
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

fn main() {
    // Parse CLI arguments
    let config = Config::parse();

    // Initialize structured logging with config options
    init_logging_with_config(&config.log_level, config.is_json_format());

    if let Err(e) = config.validate() {
        eprintln!("{}", e);
        std::process::exit(1);
    }

    if let Err(e) = run(config) {
        error!(error = %e, "Monitor failed");
        eprintln!("Error: {:#}", e);
        std::process::exit(1);
    }
}

fn run(config: Config) -> Result<()> {
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("Failed to start async runtime")?;

    // discovery reads the routing table and runs route tools synchronously
    let gateway = match &config.gateway {
        Some(gateway) => gateway.clone(),
        None => discover_gateway()
            .context("Failed to discover the default gateway")?
            .to_string(),
    };

    runtime.block_on(monitor(config, gateway))
}

async fn monitor(config: Config, gateway: String) -> Result<()> {
    let mut sources: Vec<Box<dyn SampleSource>> = Vec::with_capacity(config.target_count());
    for address in std::iter::once(gateway).chain(config.remote_targets()) {
        let source = PingSource::new(address.as_str())
            .with_context(|| format!("Invalid target address {:?}", address))?;
        sources.push(Box::new(source));
    }

    info!(
        targets = sources.len(),
        interval_ms = config.interval_ms,
        window = config.window,
        frames = config.frames,
        "Starting latency monitor"
    );

    let cancel = CancellationToken::new();
    let on_interrupt = cancel.clone();
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                info!("Interrupted, shutting down");
                on_interrupt.cancel();
            }
            Err(e) => warn!(error = %e, "Failed to listen for Control-C"),
        }
    });

    let _cursor = CursorGuard::hide().context("Failed to hide the cursor")?;
    let mut display = TerminalDisplay::stdout();

    let summary = run_loop(
        &cancel,
        &mut display,
        &sources,
        &config.loop_settings(),
        &config.render_options(),
    )
    .await?;

    info!(frames = summary.frames, reason = ?summary.reason, "Monitor finished");
    Ok(())
}
