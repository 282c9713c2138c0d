//! HTTP client for the generation gateway

use async_trait::async_trait;
use futures_util::StreamExt;
use serde::Serialize;

use crate::core::session::{BatchStatus, SessionHandle};
use crate::core::stream::StreamConsumer;
use crate::core::workspace::Workspace;
use crate::error::{StudioError, StudioResult};
use crate::traits::GenerationGateway;
use crate::types::{RequestOptions, SingleGeneration};
use shared::{BatchOutcome, GenerationRequest, ProgressEvent};

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct BulkPayload<'a> {
    requests: &'a [GenerationRequest],
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instructions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

impl<'a> BulkPayload<'a> {
    fn new(requests: &'a [GenerationRequest], options: &'a RequestOptions) -> Self {
        Self {
            requests,
            system_instructions: options.system_instructions.as_deref(),
            api_key: options.api_key.as_deref(),
        }
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SinglePayload<'a> {
    prompt: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    design_brief: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    project_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system_instructions: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    api_key: Option<&'a str>,
}

/// Real gateway client over HTTP.
pub struct RealGatewayClient {
    http: reqwest::Client,
    base_url: String,
}

impl RealGatewayClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }

    /// Turn a non-2xx gateway response into a readable error, preferring
    /// the gateway's own `error` message over the bare status line.
    async fn check_status(response: reqwest::Response) -> StudioResult<reqwest::Response> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }
        let message = response
            .json::<serde_json::Value>()
            .await
            .ok()
            .and_then(|body| body.get("error")?.as_str().map(String::from))
            .unwrap_or_else(|| status.to_string());
        Err(StudioError::Gateway {
            status: status.as_u16(),
            message,
        })
    }

    /// Streaming mode: open the bulk-stream connection and materialize
    /// each successful item into `workspace` as its frame arrives.
    ///
    /// `on_event` observes every decoded frame synchronously. Returns the
    /// authoritative outcome from the `complete` frame, or the partial
    /// outcome accumulated so far when the run was cancelled.
    pub async fn run_streamed<F>(
        &self,
        requests: Vec<GenerationRequest>,
        options: RequestOptions,
        session: &SessionHandle,
        workspace: &mut Workspace,
        on_event: F,
    ) -> StudioResult<BatchOutcome>
    where
        F: FnMut(&ProgressEvent),
    {
        session.begin(requests.len())?;

        let send_result = self
            .http
            .post(self.url("/api/claude/bulk-stream"))
            .json(&BulkPayload::new(&requests, &options))
            .send()
            .await;

        let response = match send_result {
            Ok(response) => match Self::check_status(response).await {
                Ok(response) => response,
                Err(e) => {
                    session.abort_request();
                    return Err(e);
                }
            },
            Err(e) => {
                session.abort_request();
                return Err(e.into());
            }
        };

        session.start_streaming()?;

        let mut consumer =
            StreamConsumer::new(session.clone(), workspace, requests.len(), on_event);
        let mut body = response.bytes_stream();

        while let Some(chunk) = body.next().await {
            match chunk {
                Ok(bytes) => {
                    if !consumer.process_chunk(&bytes) {
                        break;
                    }
                }
                Err(e) => {
                    // Transport dropped mid-batch: best-effort, keep
                    // everything already materialized.
                    tracing::warn!(error = %e, "stream transport failed mid-batch");
                    session.mark_cancelled();
                    return Err(e.into());
                }
            }
        }

        let outcome = consumer.into_outcome();
        if matches!(session.status(), BatchStatus::Streaming { .. }) {
            // Stream ended without a complete frame.
            session.mark_cancelled();
        }
        Ok(outcome)
    }
}

#[async_trait]
impl GenerationGateway for RealGatewayClient {
    async fn check_health(&self) -> StudioResult<()> {
        let response = self.http.get(self.url("/api/health")).send().await?;
        Self::check_status(response).await?;
        Ok(())
    }

    async fn generate_single(
        &self,
        request: GenerationRequest,
        options: RequestOptions,
    ) -> StudioResult<SingleGeneration> {
        let payload = SinglePayload {
            prompt: &request.prompt,
            design_brief: request.design_brief.as_deref(),
            project_name: request.project_name.as_deref(),
            system_instructions: options.system_instructions.as_deref(),
            api_key: options.api_key.as_deref(),
        };
        let response = self
            .http
            .post(self.url("/api/claude"))
            .json(&payload)
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }

    async fn run_batch(
        &self,
        requests: Vec<GenerationRequest>,
        options: RequestOptions,
    ) -> StudioResult<BatchOutcome> {
        let response = self
            .http
            .post(self.url("/api/claude/bulk"))
            .json(&BulkPayload::new(&requests, &options))
            .send()
            .await?;
        Ok(Self::check_status(response).await?.json().await?)
    }
}
