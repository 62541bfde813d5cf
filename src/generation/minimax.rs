//! MiniMax video generation backend
//!
//! Implements `VideoGenerator` against the MiniMax video API:
//! submit a task, poll it until it settles, then resolve the file id to a
//! download URL. Every HTTP call carries its own timeout and nothing is
//! retried; each provider problem becomes a typed generation error.

use async_trait::async_trait;
use reqwest::{Client, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

use crate::config::MiniMaxSettings;
use crate::error::{Error, Result};

use super::{GeneratedVideo, GenerationRequest, VideoGenerator};

const PROVIDER: &str = "minimax";

/// `base_resp.status_code` values MiniMax uses for rate limiting and balance
const QUOTA_STATUS_CODES: [i64; 2] = [1002, 1008];

// ─────────────────────────────────────────────────────────────────
// Configuration
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MiniMaxConfig {
    pub base_url: String,
    pub api_key: String,
    pub model: String,
    pub request_timeout: Duration,
    pub poll_interval: Duration,
    pub max_poll_attempts: u32,
}

impl From<&MiniMaxSettings> for MiniMaxConfig {
    fn from(settings: &MiniMaxSettings) -> Self {
        Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            request_timeout: Duration::from_secs(settings.request_timeout_secs),
            poll_interval: Duration::from_millis(settings.poll_interval_ms),
            max_poll_attempts: settings.max_poll_attempts,
        }
    }
}

// ─────────────────────────────────────────────────────────────────
// MiniMax API types (request/response)
// ─────────────────────────────────────────────────────────────────

#[derive(Debug, Serialize)]
struct SubmitRequest<'a> {
    model: &'a str,
    prompt: &'a str,
}

#[derive(Debug, Deserialize)]
struct BaseResp {
    status_code: i64,
    #[serde(default)]
    status_msg: String,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    #[serde(default)]
    task_id: String,
    base_resp: BaseResp,
}

#[derive(Debug, Deserialize)]
struct QueryResponse {
    #[serde(default)]
    status: String,
    #[serde(default)]
    file_id: String,
    base_resp: BaseResp,
}

#[derive(Debug, Deserialize)]
struct RetrieveResponse {
    file: Option<FileObject>,
    base_resp: BaseResp,
}

#[derive(Debug, Deserialize)]
struct FileObject {
    download_url: String,
}

// ─────────────────────────────────────────────────────────────────
// MiniMax Generator
// ─────────────────────────────────────────────────────────────────

pub struct MiniMaxGenerator {
    config: MiniMaxConfig,
    client: Client,
}

impl MiniMaxGenerator {
    pub fn new(config: MiniMaxConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| Error::Internal(format!("Failed to create HTTP client: {}", e)))?;

        info!(
            base_url = %config.base_url,
            model = %config.model,
            "MiniMax video generator created"
        );

        Ok(Self { config, client })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url, path)
    }

    async fn submit(&self, prompt: &str) -> Result<String> {
        let body = SubmitRequest {
            model: &self.config.model,
            prompt,
        };
        let response: SubmitResponse = self
            .send(self.client.post(self.endpoint("/v1/video_generation")).json(&body))
            .await?;
        check_base_resp(&response.base_resp)?;

        if response.task_id.is_empty() {
            return Err(Error::generation_malformed(PROVIDER, "response carried no task_id"));
        }
        Ok(response.task_id)
    }

    /// Poll the task until it succeeds, fails, or the attempt budget runs out
    async fn wait_for_file(&self, task_id: &str) -> Result<String> {
        for attempt in 1..=self.config.max_poll_attempts {
            let response: QueryResponse = self
                .send(
                    self.client
                        .get(self.endpoint("/v1/query/video_generation"))
                        .query(&[("task_id", task_id)]),
                )
                .await?;
            check_base_resp(&response.base_resp)?;

            match response.status.as_str() {
                "Success" if response.file_id.is_empty() => {
                    return Err(Error::generation_malformed(
                        PROVIDER,
                        format!("task {} succeeded without a file_id", task_id),
                    ));
                }
                "Success" => return Ok(response.file_id),
                "Fail" => {
                    return Err(Error::generation_failed(
                        PROVIDER,
                        format!("task {} failed", task_id),
                    ));
                }
                status => debug!(task_id, attempt, status, "Video task still running"),
            }

            if attempt < self.config.max_poll_attempts {
                tokio::time::sleep(self.config.poll_interval).await;
            }
        }

        Err(Error::generation_timeout(PROVIDER, self.poll_budget().as_secs()))
    }

    /// Longest time spent polling before giving up
    fn poll_budget(&self) -> Duration {
        self.config
            .poll_interval
            .saturating_mul(self.config.max_poll_attempts)
    }

    async fn download_url(&self, file_id: &str) -> Result<String> {
        let response: RetrieveResponse = self
            .send(
                self.client
                    .get(self.endpoint("/v1/files/retrieve"))
                    .query(&[("file_id", file_id)]),
            )
            .await?;
        check_base_resp(&response.base_resp)?;

        response
            .file
            .map(|f| f.download_url)
            .filter(|url| !url.is_empty())
            .ok_or_else(|| {
                Error::generation_malformed(PROVIDER, format!("file {} has no download_url", file_id))
            })
    }

    /// Send an authorized request and decode its JSON body
    async fn send<T: DeserializeOwned>(&self, request: RequestBuilder) -> Result<T> {
        let response = request
            .bearer_auth(&self.config.api_key)
            .send()
            .await
            .map_err(|e| self.transport_error(e))?;

        let status = response.status();
        let body = response.text().await.map_err(|e| self.transport_error(e))?;

        if status == StatusCode::TOO_MANY_REQUESTS {
            return Err(Error::generation_quota(PROVIDER, format!("HTTP {}: {}", status, body)));
        }
        if !status.is_success() {
            return Err(Error::generation_failed(PROVIDER, format!("HTTP {}: {}", status, body)));
        }

        serde_json::from_str(&body).map_err(|e| Error::generation_malformed(PROVIDER, e.to_string()))
    }

    fn transport_error(&self, e: reqwest::Error) -> Error {
        if e.is_timeout() {
            Error::generation_timeout(PROVIDER, self.config.request_timeout.as_secs())
        } else {
            Error::generation_failed(PROVIDER, format!("request error: {}", e))
        }
    }
}

fn check_base_resp(base: &BaseResp) -> Result<()> {
    match base.status_code {
        0 => Ok(()),
        code if QUOTA_STATUS_CODES.contains(&code) => Err(Error::generation_quota(
            PROVIDER,
            format!("{} (code {})", base.status_msg, code),
        )),
        code => Err(Error::generation_failed(
            PROVIDER,
            format!("{} (code {})", base.status_msg, code),
        )),
    }
}

#[async_trait]
impl VideoGenerator for MiniMaxGenerator {
    async fn generate(&self, request: &GenerationRequest) -> Result<GeneratedVideo> {
        let task_id = self.submit(&request.prompt).await?;
        info!(task_id = %task_id, "Video task submitted");

        let file_id = self.wait_for_file(&task_id).await?;
        let video_url = self.download_url(&file_id).await?;

        Ok(GeneratedVideo {
            video_url,
            persona: request.prompt.clone(),
        })
    }
}

// ─────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────
