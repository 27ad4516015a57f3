use reqwest::StatusCode;
use std::time::Duration;
use tracing::{info, warn};
use url::Url;

use crate::relay::AnalysisRelay;

/// Probe budget for the startup check, looser than the per-analysis probe.
pub const STARTUP_PROBE_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServerStatus {
    Running,
    Unhealthy(StatusCode),
    Unreachable,
}

impl ServerStatus {
    pub fn is_running(self) -> bool {
        matches!(self, Self::Running)
    }
}

/// Check once whether the sentiment server is up and log the answer.
pub async fn check_server(relay: &AnalysisRelay, server_base: &Url) -> ServerStatus {
    match relay.probe(server_base, STARTUP_PROBE_TIMEOUT).await {
        Ok(status) if status.is_success() => {
            info!(server = %server_base, "Finanswer server is running");
            ServerStatus::Running
        }
        Ok(status) => {
            warn!(server = %server_base, %status, "Finanswer server responded with error");
            ServerStatus::Unhealthy(status)
        }
        Err(e) => {
            warn!(
                server = %server_base,
                error = %e,
                "Finanswer server is not running. Please start the server first."
            );
            ServerStatus::Unreachable
        }
    }
}
