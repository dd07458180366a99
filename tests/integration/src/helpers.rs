//! Test helpers for integration tests
//!
//! Provides utilities for spawning test servers on ephemeral ports and
//! making HTTP requests against them.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use family_api::{create_app, create_app_state_with};
use family_common::{AppConfig, DirectoryConfig};
use family_directory::InMemoryDirectory;
use reqwest::{Client, Response, StatusCode};
use serde::{de::DeserializeOwned, Serialize};
use tokio::net::TcpListener;
use tokio::task::JoinHandle;

use crate::fixtures::StateResponse;

/// How long `wait_for_state` polls before giving up
const WAIT_TIMEOUT: Duration = Duration::from_secs(5);

/// Test server instance that manages lifecycle
pub struct TestServer {
    pub addr: SocketAddr,
    pub client: Client,
    /// Handle on the server's directory, for seeding and fault injection
    pub directory: InMemoryDirectory,
    _handle: JoinHandle<()>,
}

impl TestServer {
    /// Start a server signed in as `device1` over the sample family
    pub async fn start() -> Result<Self> {
        Self::start_with_config(test_config("device1", true)).await
    }

    /// Start a test server with custom config
    pub async fn start_with_config(config: AppConfig) -> Result<Self> {
        let directory = InMemoryDirectory::from_config(&config.directory);
        let state = create_app_state_with(config, Arc::new(directory.clone()))?;
        let app = create_app(state);

        // Ephemeral port so tests can run in parallel
        let listener = TcpListener::bind(SocketAddr::from(([127, 0, 0, 1], 0))).await?;
        let addr = listener.local_addr()?;

        let handle = tokio::spawn(async move {
            axum::serve(listener, app).await.ok();
        });

        let client = Client::builder().timeout(Duration::from_secs(10)).build()?;

        Ok(Self {
            addr,
            client,
            directory,
            _handle: handle,
        })
    }

    /// Get base URL for the server
    pub fn base_url(&self) -> String {
        format!("http://{}", self.addr)
    }

    /// WebSocket URL of the event stream
    pub fn events_url(&self) -> String {
        format!("ws://{}/api/v1/events", self.addr)
    }

    /// Make a GET request
    pub async fn get(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.get(&url).send().await?)
    }

    /// Make a POST request with JSON body
    pub async fn post<T: Serialize>(&self, path: &str, body: &T) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).json(body).send().await?)
    }

    /// Make a POST request without a body
    pub async fn post_empty(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.post(&url).send().await?)
    }

    /// Make a DELETE request
    pub async fn delete(&self, path: &str) -> Result<Response> {
        let url = format!("{}{}", self.base_url(), path);
        Ok(self.client.delete(&url).send().await?)
    }

    /// Fetch the current sync state
    pub async fn state(&self) -> Result<StateResponse> {
        let response = self.get("/api/v1/state").await?;
        assert_json(response, StatusCode::OK).await
    }

    /// Poll the sync state until `ready` holds
    pub async fn wait_for_state<F>(&self, ready: F) -> Result<StateResponse>
    where
        F: Fn(&StateResponse) -> bool,
    {
        let deadline = tokio::time::Instant::now() + WAIT_TIMEOUT;
        loop {
            let state = self.state().await?;
            if ready(&state) {
                return Ok(state);
            }
            if tokio::time::Instant::now() >= deadline {
                anyhow::bail!("Timed out waiting for state, last seen: {state:?}");
            }
            tokio::time::sleep(Duration::from_millis(20)).await;
        }
    }

    /// Start the account check and wait until the current account is a member
    pub async fn sign_in(&self) -> Result<StateResponse> {
        let response = self.post_empty("/api/v1/account/check").await?;
        assert_status(response, StatusCode::ACCEPTED).await?;
        self.wait_for_state(|s| s.is_current_user_member && !s.loading)
            .await
    }
}

/// Test configuration for the given account, with the startup check off
pub fn test_config(account_id: &str, seed_sample: bool) -> AppConfig {
    let mut config = AppConfig::default();
    config.api.port = 0;
    config.sync.check_on_startup = false;
    config.directory = DirectoryConfig {
        account_id: account_id.to_string(),
        seed_sample,
        ..Default::default()
    };
    config
}

/// Assert response status and parse JSON body
pub async fn assert_json<T: DeserializeOwned>(
    response: Response,
    expected_status: StatusCode,
) -> Result<T> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(response.json().await?)
}

/// Assert response status without parsing body
pub async fn assert_status(response: Response, expected_status: StatusCode) -> Result<()> {
    let status = response.status();
    if status != expected_status {
        let body = response.text().await?;
        anyhow::bail!(
            "Expected status {}, got {}. Body: {}",
            expected_status,
            status,
            body
        );
    }
    Ok(())
}
