//! Ctrl+C signal handler utilities.

/// Waits for Ctrl+C signal.
///
/// # Errors
///
/// Returns an error if the signal handler could not be installed.
pub async fn wait_for_ctrlc() -> std::io::Result<()> {
    tokio::signal::ctrl_c().await?;
    tracing::info!("Received Ctrl+C, shutting down");
    Ok(())
}
