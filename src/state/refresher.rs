use crate::state::messages::NetworkRequest;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio::time::interval;

/// Scoreboard polls every 10 seconds while a board is open; standings,
/// bracket, and summary change far less often and refresh every minute.
const SCOREBOARD_REFRESH: Duration = Duration::from_secs(10);
const SLOW_REFRESH: Duration = Duration::from_secs(60);

pub struct PeriodicRefresher {
    network_requests: mpsc::Sender<NetworkRequest>,
}

impl PeriodicRefresher {
    pub fn new(network_requests: mpsc::Sender<NetworkRequest>) -> Self {
        Self { network_requests }
    }

    pub async fn run(self) {
        let mut scoreboard_interval = interval(SCOREBOARD_REFRESH);
        let mut slow_interval = interval(SLOW_REFRESH);
        // Skip the immediate first ticks so startup loading isn't double-triggered.
        scoreboard_interval.tick().await;
        slow_interval.tick().await;

        loop {
            tokio::select! {
                _ = scoreboard_interval.tick() => {
                    let _ = self
                        .network_requests
                        .send(NetworkRequest::RefreshScoreboard)
                        .await;
                }
                _ = slow_interval.tick() => {
                    for request in [
                        NetworkRequest::RefreshStandings,
                        NetworkRequest::RefreshBracket,
                        NetworkRequest::RefreshSummary,
                    ] {
                        let _ = self.network_requests.send(request).await;
                    }
                }
            }
        }
    }
}
