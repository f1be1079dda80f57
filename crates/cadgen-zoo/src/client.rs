use cadgen_core::{GenerationRequest, JobHandle, JobStatus, RemoteCadService, ServiceError};
use reqwest::blocking::{Client, Response};
use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use tracing::debug;

use crate::config::{ConfigError, ZooConfig};
use crate::schemas::{ApiCallStatus, ApiErrorBody, TextToCadCreateBody, TextToCadJob};

/// Blocking HTTP client for the Zoo text-to-CAD endpoints.
///
/// Safe to share between threads; every call is independent.
pub struct ZooClient {
    client: Client,
    base_url: String,
}

impl ZooClient {
    pub fn new(config: ZooConfig) -> Result<Self, ConfigError> {
        let mut auth = HeaderValue::from_str(&format!("Bearer {}", config.api_token.expose()))
            .map_err(|_| ConfigError::InvalidValue {
                key: "ZOO_API_TOKEN",
                value: "<redacted>".into(),
            })?;
        auth.set_sensitive(true);

        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, auth);

        let client = Client::builder()
            .default_headers(headers)
            .timeout(config.request_timeout)
            .build()?;

        Ok(Self {
            client,
            base_url: config.base_url,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Start a text-to-CAD job and return the full job document.
    pub fn create_job(&self, request: &GenerationRequest) -> Result<TextToCadJob, ServiceError> {
        let url = format!(
            "{}/ai/text-to-cad/{}",
            self.base_url,
            request.output_format().extension()
        );
        debug!(%url, "Submitting text-to-CAD prompt");

        let response = self
            .client
            .post(&url)
            .json(&TextToCadCreateBody {
                prompt: request.prompt(),
            })
            .send()
            .map_err(transport_error)?;

        read_job(response)
    }

    /// Fetch the current job document.
    pub fn get_job(&self, handle: &JobHandle) -> Result<TextToCadJob, ServiceError> {
        let url = format!("{}/user/text-to-cad/{}", self.base_url, handle);
        debug!(%url, "Fetching text-to-CAD job");

        let response = self.client.get(&url).send().map_err(transport_error)?;

        read_job(response)
    }
}

impl RemoteCadService for ZooClient {
    fn submit(&self, request: &GenerationRequest) -> Result<JobHandle, ServiceError> {
        let job = self.create_job(request)?;
        if job.status == ApiCallStatus::Failed {
            return Err(ServiceError::Rejected(job.failure_message()));
        }
        Ok(JobHandle::new(job.id.to_string()))
    }

    fn fetch_status(&self, handle: &JobHandle) -> Result<JobStatus, ServiceError> {
        let job = self.get_job(handle)?;
        if let (Some(created), Some(completed)) = (job.created_at, job.completed_at) {
            debug!(
                job_id = %job.id,
                elapsed_secs = (completed - created).num_seconds(),
                "Job finished on the service",
            );
        }
        job.into_status()
    }
}

fn transport_error(err: reqwest::Error) -> ServiceError {
    ServiceError::Transport(err.to_string())
}

/// Turn an HTTP response into a job document, classifying error statuses.
fn read_job(response: Response) -> Result<TextToCadJob, ServiceError> {
    let status = response.status();
    let body = response.text().map_err(transport_error)?;

    if !status.is_success() {
        let message = serde_json::from_str::<ApiErrorBody>(&body)
            .map(|err| err.describe())
            .unwrap_or_else(|_| {
                if body.trim().is_empty() {
                    status.canonical_reason().unwrap_or("no response body").to_string()
                } else {
                    body
                }
            });
        return Err(ServiceError::Api {
            status: status.as_u16(),
            message,
        });
    }

    if body.trim().is_empty() {
        return Err(ServiceError::Malformed("empty response body".into()));
    }

    serde_json::from_str(&body)
        .map_err(|e| ServiceError::Malformed(format!("unexpected job document: {e}")))
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use cadgen_core::OutputFormat;
    use mockito::{Matcher, Server};
    use serde_json::json;

    use super::*;
    use crate::config::ApiToken;

    const ID: &str = "6b0d0b27-4d3b-4f79-8f0e-1f3c2b1c9a10";

    fn client_for(server: &Server) -> ZooClient {
        let config = ZooConfig::new(ApiToken::new("test-token").unwrap())
            .with_base_url(server.url())
            .with_request_timeout(Duration::from_secs(5));
        ZooClient::new(config).unwrap()
    }

    #[test]
    fn test_submit_posts_prompt_with_bearer_token() {
        let mut server = Server::new();
        let mock = server
            .mock("POST", "/ai/text-to-cad/stl")
            .match_header("authorization", "Bearer test-token")
            .match_body(Matcher::Json(json!({ "prompt": "a simple wrench" })))
            .with_status(201)
            .with_header("content-type", "application/json")
            .with_body(json!({ "id": ID, "status": "queued" }).to_string())
            .create();

        let client = client_for(&server);
        let handle = client
            .submit(&GenerationRequest::new("a simple wrench", OutputFormat::Stl))
            .unwrap();

        assert_eq!(handle.as_str(), ID);
        mock.assert();
    }

    #[test]
    fn test_submit_rejected_job() {
        let mut server = Server::new();
        server
            .mock("POST", "/ai/text-to-cad/step")
            .with_status(201)
            .with_body(json!({ "id": ID, "status": "failed", "error": "prompt too vague" }).to_string())
            .create();

        let err = client_for(&server)
            .submit(&GenerationRequest::new("thing", OutputFormat::Step))
            .unwrap_err();

        assert_eq!(err, ServiceError::Rejected("prompt too vague".into()));
    }

    #[test]
    fn test_submit_api_error_uses_service_message() {
        let mut server = Server::new();
        server
            .mock("POST", "/ai/text-to-cad/step")
            .with_status(401)
            .with_body(
                json!({
                    "error_code": "unauthorized",
                    "message": "invalid API token",
                    "request_id": "req-1"
                })
                .to_string(),
            )
            .create();

        let err = client_for(&server)
            .submit(&GenerationRequest::new("a cube", OutputFormat::Step))
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Api {
                status: 401,
                message: "invalid API token (request req-1)".into()
            }
        );
    }

    #[test]
    fn test_plain_text_error_body_is_kept() {
        let mut server = Server::new();
        server
            .mock("GET", format!("/user/text-to-cad/{ID}").as_str())
            .with_status(502)
            .with_body("upstream unavailable")
            .create();

        let err = client_for(&server)
            .fetch_status(&JobHandle::new(ID))
            .unwrap_err();

        assert_eq!(
            err,
            ServiceError::Api {
                status: 502,
                message: "upstream unavailable".into()
            }
        );
    }

    #[test]
    fn test_fetch_status_completed() {
        let mut server = Server::new();
        let mock = server
            .mock("GET", format!("/user/text-to-cad/{ID}").as_str())
            .match_header("authorization", "Bearer test-token")
            .with_status(200)
            .with_body(
                json!({
                    "id": ID,
                    "status": "completed",
                    "completed_at": "2026-10-19T10:01:00Z",
                    "outputs": { "source.stl": "c29saWQgY3ViZQ==" }
                })
                .to_string(),
            )
            .create();

        let status = client_for(&server).fetch_status(&JobHandle::new(ID)).unwrap();

        let JobStatus::Completed { outputs } = status else {
            panic!("expected completed status");
        };
        assert_eq!(outputs["source.stl"], b"solid cube");
        mock.assert();
    }

    #[test]
    fn test_fetch_status_malformed_body() {
        let mut server = Server::new();
        server
            .mock("GET", format!("/user/text-to-cad/{ID}").as_str())
            .with_status(200)
            .with_body("<html>maintenance</html>")
            .create();

        let err = client_for(&server)
            .fetch_status(&JobHandle::new(ID))
            .unwrap_err();

        assert!(matches!(err, ServiceError::Malformed(_)));
    }

    #[test]
    fn test_fetch_status_empty_body() {
        let mut server = Server::new();
        server
            .mock("GET", format!("/user/text-to-cad/{ID}").as_str())
            .with_status(200)
            .create();

        let err = client_for(&server)
            .fetch_status(&JobHandle::new(ID))
            .unwrap_err();

        assert_eq!(err, ServiceError::Malformed("empty response body".into()));
    }

    #[test]
    fn test_unreachable_service_is_transport_error() {
        let config = ZooConfig::new(ApiToken::new("test-token").unwrap())
            .with_base_url("http://127.0.0.1:9")
            .with_request_timeout(Duration::from_secs(2));
        let client = ZooClient::new(config).unwrap();

        let err = client.fetch_status(&JobHandle::new(ID)).unwrap_err();

        assert!(matches!(err, ServiceError::Transport(_)));
    }
}
