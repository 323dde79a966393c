//! Optional TCP report stream: renders the monitor's current snapshot as
//! a plain-text table to any connecting consumer (spec §4.8, §6:
//! `monitor-port`).

// Layer 1: Standard library imports
use std::fmt::Write as _;
use std::sync::Arc;

// Layer 2: Third-party crate imports
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;
use tracing::{debug, warn};

// Layer 3: Internal module imports
use super::Monitor;

/// Render the monitor's current snapshot as a fixed-width table.
pub fn render_table(monitor: &Monitor) -> String {
    let mut out = String::new();
    let _ = writeln!(
        out,
        "{:<32} {:>5} {:>10} {:>10} {:>10} {:>12} {:>12}",
        "path", "level", "heartbeat", "msgs", "unresp", "mean(ns)", "stddev(ns)"
    );
    for stat in monitor.snapshot() {
        let _ = writeln!(
            out,
            "{:<32} {:>5} {:>10} {:>10} {:>10} {:>12.1} {:>12.1}",
            stat.path.to_string(),
            stat.level,
            stat.last_heartbeat,
            stat.msg_count,
            stat.unresponsive,
            stat.latency.mean_ns(),
            stat.latency.stddev_ns(),
        );
    }
    out
}

/// Accept connections on `port` and write one rendered table per
/// connection, then close it. Runs until the listener fails to bind;
/// intended to be spawned as a background task and aborted on universe
/// termination.
pub async fn serve_reports(monitor: Arc<Monitor>, port: u16) -> std::io::Result<()> {
    let listener = TcpListener::bind(("0.0.0.0", port)).await?;
    debug!(port, "monitor report stream listening");
    loop {
        let (mut stream, peer) = listener.accept().await?;
        let table = render_table(&monitor);
        if let Err(err) = stream.write_all(table.as_bytes()).await {
            warn!(%peer, error = %err, "failed to write monitor report");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::actor::KernelCommand;
    use crate::util::ActorPath;
    use tokio::sync::mpsc;

    #[tokio::test]
    async fn test_render_table_contains_registered_path() {
        let monitor = Monitor::new();
        let (tx, _rx) = mpsc::channel::<KernelCommand>(1);
        monitor.register(ActorPath::root("race").child("a"), tx, 0);

        let table = render_table(&monitor);
        assert!(table.contains("/race/a"));
        assert!(table.contains("heartbeat"));
    }

    #[tokio::test]
    async fn test_empty_monitor_renders_header_only() {
        let monitor = Monitor::new();
        let table = render_table(&monitor);
        assert_eq!(table.lines().count(), 1);
    }
}
