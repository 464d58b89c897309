//! Signal handling for graceful shutdown

use signal_hook_tokio::Signals;
use futures::stream::StreamExt;
use tracing::info;

/// Wait for a shutdown signal (SIGTERM, SIGINT) and return its number
pub async fn shutdown_signal() -> anyhow::Result<i32> {
    let mut signals = Signals::new([
        signal_hook::consts::SIGTERM,
        signal_hook::consts::SIGINT,
    ])?;
    let handle = signals.handle();

    let signal = signals.next().await
        .ok_or_else(|| anyhow::anyhow!("signal stream closed"))?;
    info!("Received signal: {}", signal);

    handle.close();
    Ok(signal)
}
