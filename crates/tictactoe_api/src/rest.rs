//! reqwest-backed implementation of [`GameService`].

use async_trait::async_trait;
use reqwest::RequestBuilder;
use serde::de::DeserializeOwned;
use tracing::{debug, info, instrument, warn};

use crate::error::ApiError;
use crate::error_body::extract_error_message;
use crate::service::GameService;
use crate::types::{
    Credentials, GameDetail, GameId, GameStatus, GameSummary, LoginResponse, MoveRequest, Page,
    RankingEntry,
};

/// HTTP client for the game service.
#[derive(Debug, Clone)]
pub struct RestGameClient {
    /// Base URL without a trailing slash.
    base_url: String,
    /// HTTP client.
    client: reqwest::Client,
}

impl RestGameClient {
    /// Creates a client for the service at `base_url`.
    #[instrument(skip(base_url))]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self::with_client(base_url, reqwest::Client::new())
    }

    /// Creates a client that reuses an existing [`reqwest::Client`].
    #[instrument(skip(base_url, client))]
    pub fn with_client(base_url: impl Into<String>, client: reqwest::Client) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        info!(base_url = %base_url, "Creating RestGameClient");
        Self { base_url, client }
    }

    /// Returns the base URL requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Sends a request and returns the raw body of a 2xx response.
    #[instrument(skip(self, request))]
    async fn send(&self, request: RequestBuilder) -> Result<String, ApiError> {
        let response = request.send().await.map_err(|e| {
            warn!(error = %e, "Request failed before a response arrived");
            ApiError::transport(e.to_string())
        })?;

        let status = response.status();
        let body = response.text().await.map_err(|e| {
            warn!(error = %e, status = %status, "Failed to read response body");
            ApiError::transport(e.to_string())
        })?;
        debug!(status = %status, body_len = body.len(), "Received response");

        if !status.is_success() {
            let message = extract_error_message(&body);
            warn!(status = %status, message = ?message, "Service rejected request");
            return Err(ApiError::rejected(status.as_u16(), message));
        }

        Ok(body)
    }

    /// Sends a request and decodes the JSON body of a 2xx response.
    #[instrument(skip(self, request))]
    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T, ApiError> {
        let body = self.send(request).await?;
        serde_json::from_str(&body).map_err(|e| {
            warn!(error = %e, "Response body did not match expected shape");
            ApiError::decode(e.to_string())
        })
    }
}

#[async_trait]
impl GameService for RestGameClient {
    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, ApiError> {
        info!("Logging in");
        let request = self.client.post(self.url("/login/")).json(credentials);
        let response: LoginResponse = self.send_json(request).await?;
        info!(username = %response.username(), "Login accepted");
        Ok(response)
    }

    #[instrument(skip(self, credentials), fields(username = %credentials.username()))]
    async fn register(&self, credentials: &Credentials) -> Result<(), ApiError> {
        info!("Registering account");
        let request = self.client.post(self.url("/register/")).json(credentials);
        self.send(request).await?;
        info!("Registration accepted");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn list_games(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
        status: Option<GameStatus>,
    ) -> Result<Page<GameSummary>, ApiError> {
        debug!("Listing games");
        let mut request = self
            .client
            .get(self.url("/games"))
            .bearer_auth(token)
            .query(&[("limit", limit), ("offset", offset)]);
        if let Some(status) = status {
            request = request.query(&[("status", status.to_string())]);
        }

        let page: Page<GameSummary> = self.send_json(request).await?;
        debug!(
            count = page.count(),
            rows = page.results().len(),
            has_next = page.next().is_some(),
            has_previous = page.previous().is_some(),
            "Got games page"
        );
        Ok(page)
    }

    #[instrument(skip(self, token))]
    async fn create_game(&self, token: &str) -> Result<GameDetail, ApiError> {
        info!("Creating game");
        let request = self.client.post(self.url("/games/")).bearer_auth(token);
        let game: GameDetail = self.send_json(request).await?;
        info!(game_id = game.id(), "Game created");
        Ok(game)
    }

    #[instrument(skip(self, token))]
    async fn get_game(&self, token: &str, game_id: GameId) -> Result<GameDetail, ApiError> {
        debug!("Fetching game detail");
        let request = self
            .client
            .get(self.url(&format!("/games/{}", game_id)))
            .bearer_auth(token);
        let game: GameDetail = self.send_json(request).await?;
        debug!(status = %game.status(), "Got game detail");
        Ok(game)
    }

    #[instrument(skip(self, token))]
    async fn join_game(&self, token: &str, game_id: GameId) -> Result<(), ApiError> {
        info!("Joining game");
        let request = self
            .client
            .post(self.url(&format!("/games/{}/join/", game_id)))
            .bearer_auth(token);
        self.send(request).await?;
        info!("Joined game");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn make_move(
        &self,
        token: &str,
        game_id: GameId,
        request: MoveRequest,
    ) -> Result<(), ApiError> {
        info!(row = request.row(), col = request.col(), "Submitting move");
        let http_request = self
            .client
            .post(self.url(&format!("/games/{}/move/", game_id)))
            .bearer_auth(token)
            .json(&request);
        self.send(http_request).await?;
        info!("Move accepted");
        Ok(())
    }

    #[instrument(skip(self, token))]
    async fn rankings(
        &self,
        token: &str,
        limit: u32,
        offset: u32,
    ) -> Result<Page<RankingEntry>, ApiError> {
        debug!("Fetching rankings");
        let request = self
            .client
            .get(self.url("/users"))
            .bearer_auth(token)
            .query(&[("limit", limit), ("offset", offset)]);
        let page: Page<RankingEntry> = self.send_json(request).await?;
        debug!(rows = page.results().len(), "Got rankings page");
        Ok(page)
    }
}
