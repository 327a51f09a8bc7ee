//! HTTP client for the simulation backend.

use reqwest::Client as HttpClient;
use serde::Deserialize;
use tracing::{debug, info};

use evogames::form::simulate_form_fields;
use evogames::model::{Results, SimulationConfig};

pub use evogames::form::{CONFIG_PATH, SIMULATE_PATH};

use crate::error::{ClientError, Result};
use crate::settings::ClientSettings;

#[derive(Debug, Deserialize)]
struct SaveResponse {
    success: bool,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SimulateResponse {
    success: bool,
    #[serde(default)]
    results: Option<Results>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    filename: Option<String>,
}

/// A finished run as returned by the backend.
#[derive(Debug)]
pub struct SimulationRun {
    pub results: Results,
    pub filename: Option<String>,
}

pub struct BackendClient {
    http: HttpClient,
    base_url: String,
}

impl BackendClient {
    pub fn new(settings: &ClientSettings) -> Result<Self> {
        let http = HttpClient::builder()
            .timeout(settings.request_timeout())
            .build()?;
        Ok(Self {
            http,
            base_url: settings.backend_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Store a configuration on the backend. Returns the filename it chose.
    pub async fn save_config(&self, config: &SimulationConfig) -> Result<Option<String>> {
        let response = self.http.post(self.url(CONFIG_PATH)).json(config).send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, "config save answered");

        let parsed: SaveResponse =
            serde_json::from_str(&body).map_err(|_| ClientError::Status { status })?;
        if !parsed.success {
            return Err(ClientError::Rejected(parsed.error.unwrap_or_default()));
        }
        info!(filename = ?parsed.filename, "configuration saved");
        Ok(parsed.filename)
    }

    /// Run a simulation. The request is the same form post the browser makes,
    /// marked as an XHR so the backend answers with JSON instead of a redirect.
    pub async fn simulate(&self, config: &SimulationConfig) -> Result<SimulationRun> {
        let fields = simulate_form_fields(config)?;
        let response = self
            .http
            .post(self.url(SIMULATE_PATH))
            .header("X-Requested-With", "XMLHttpRequest")
            .form(&fields)
            .send()
            .await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        debug!(status, bytes = body.len(), "simulation answered");

        let parsed: SimulateResponse =
            serde_json::from_str(&body).map_err(|_| ClientError::Status { status })?;
        if !parsed.success {
            return Err(ClientError::Rejected(parsed.error.unwrap_or_default()));
        }
        let results = parsed.results.ok_or(ClientError::MissingResults)?;
        info!(rounds = results.total_rounds(), "simulation finished");
        Ok(SimulationRun {
            results,
            filename: parsed.filename,
        })
    }
}
