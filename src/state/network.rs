use crate::state::messages::{NetworkRequest, NetworkResponse};
use courtside_api::client::{ApiError, TournamentApi};
use log::{debug, error};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::sync::mpsc;

const SPINNER_CHARS: [char; 10] = ['⠋', '⠙', '⠹', '⠸', '⠼', '⠴', '⠦', '⠧', '⠇', '⠏'];
pub const ERROR_CHAR: char = '!';

#[derive(Debug, Copy, Clone)]
pub struct LoadingState {
    pub is_loading: bool,
    pub spinner_char: char,
}

impl Default for LoadingState {
    fn default() -> Self {
        Self { is_loading: false, spinner_char: ' ' }
    }
}

pub struct NetworkWorker {
    client: TournamentApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    is_loading: Arc<AtomicBool>,
}

impl NetworkWorker {
    /// The API client is built by the composition root and handed in, so a
    /// test harness can point the worker at any backend.
    pub fn new(
        client: TournamentApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
    ) -> Self {
        Self {
            client,
            requests,
            responses,
            is_loading: Arc::new(AtomicBool::new(false)),
        }
    }

    pub async fn run(mut self) {
        while let Some(request) = self.requests.recv().await {
            // View pings are quiet: no spinner, no response, errors only logged.
            if let NetworkRequest::ViewPing { view } = &request {
                if let Err(e) = self.client.post_view_ping(view).await {
                    debug!("view ping failed: {e}");
                }
                continue;
            }

            self.start_loading_animation().await;

            let result = match request {
                NetworkRequest::RefreshScoreboard => self.handle_refresh_scoreboard().await,
                NetworkRequest::RefreshStandings => self.handle_refresh_standings().await,
                NetworkRequest::RefreshBracket => self.handle_refresh_bracket().await,
                NetworkRequest::RefreshSummary => self.handle_refresh_summary().await,
                NetworkRequest::ViewPing { .. } => unreachable!("handled above"),
            };

            debug!("network request complete");
            self.stop_loading_animation(result.is_ok()).await;

            let response = result.unwrap_or_else(|err| NetworkResponse::Error {
                message: err.to_string(),
            });

            if let Err(e) = self.responses.send(response).await {
                error!("Failed to send network response: {e}");
                break;
            }
        }
    }

    async fn handle_refresh_scoreboard(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing scoreboard");
        let scoreboard = self.client.fetch_scoreboard().await?;
        Ok(NetworkResponse::ScoreboardLoaded { scoreboard })
    }

    async fn handle_refresh_standings(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing standings");
        let standings = self.client.fetch_standings().await?;
        Ok(NetworkResponse::StandingsLoaded { standings })
    }

    async fn handle_refresh_bracket(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing bracket");
        let bracket = self.client.fetch_bracket().await?;
        Ok(NetworkResponse::BracketLoaded { bracket })
    }

    async fn handle_refresh_summary(&self) -> Result<NetworkResponse, ApiError> {
        debug!("refreshing tournament summary");
        let summary = self.client.fetch_summary().await?;
        Ok(NetworkResponse::SummaryLoaded { summary })
    }

    async fn start_loading_animation(&self) {
        self.is_loading.store(true, Ordering::Relaxed);

        let mut loading_state =
            LoadingState { is_loading: true, spinner_char: SPINNER_CHARS[0] };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged { loading_state })
            .await;

        let responses = self.responses.clone();
        let is_loading = self.is_loading.clone();

        tokio::spawn(async move {
            let mut spinner_index = 1;
            let mut interval = tokio::time::interval(Duration::from_millis(33));
            loop {
                interval.tick().await;
                if !is_loading.load(Ordering::Relaxed) {
                    break;
                }
                loading_state.spinner_char = SPINNER_CHARS[spinner_index];
                spinner_index = (spinner_index + 1) % SPINNER_CHARS.len();
                let _ = responses
                    .send(NetworkResponse::LoadingStateChanged { loading_state })
                    .await;
            }
        });
    }

    async fn stop_loading_animation(&self, is_ok: bool) {
        self.is_loading.store(false, Ordering::Relaxed);
        tokio::time::sleep(Duration::from_millis(15)).await;

        let spinner_char = if is_ok { ' ' } else { ERROR_CHAR };
        let _ = self
            .responses
            .send(NetworkResponse::LoadingStateChanged {
                loading_state: LoadingState { is_loading: false, spinner_char },
            })
            .await;
    }
}
