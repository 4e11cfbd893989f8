use crate::config::HttpConfig;
use anyhow::{Context, Result};
use async_trait::async_trait;
use cardpull_model::ExtractError;
use reqwest::header::CONTENT_TYPE;

/// A fetched response, body fully read.
#[derive(Debug, Clone, Default)]
pub struct HttpResponse {
    pub status: u16,
    pub content_type: Option<String>,
    pub body: Vec<u8>,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }

    /// Whether the declared content type is JSON (`application/json`, `*+json`).
    pub fn is_json(&self) -> bool {
        self.content_type
            .as_deref()
            .map(|ct| {
                let mime = ct.split(';').next().unwrap_or("").trim().to_ascii_lowercase();
                mime == "application/json" || mime.ends_with("+json")
            })
            .unwrap_or(false)
    }
}

/// The transport the pipeline fetches through.
#[async_trait]
pub trait HttpClient: Send + Sync {
    /// GET `url`. Transport failures are `ExtractError::Fetch`; any status is returned as-is.
    async fn get(&self, url: &str) -> Result<HttpResponse, ExtractError>;
}

/// GET `url` and reject non-2xx statuses.
pub async fn fetch(client: &dyn HttpClient, url: &str) -> Result<HttpResponse, ExtractError> {
    let response = client.get(url).await?;
    if !response.is_success() {
        return Err(ExtractError::fetch(url, format!("HTTP {}", response.status)));
    }
    Ok(response)
}

/// `reqwest`-backed client with a fixed timeout and redirect limit.
#[derive(Debug, Clone)]
pub struct ReqwestClient {
    client: reqwest::Client,
}

impl ReqwestClient {
    pub fn new(config: &HttpConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .build()
            .context("Failed to build HTTP client")?;
        Ok(Self { client })
    }
}

#[async_trait]
impl HttpClient for ReqwestClient {
    async fn get(&self, url: &str) -> Result<HttpResponse, ExtractError> {
        tracing::debug!(url = %url, "GET");
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ExtractError::fetch(url, describe(&e)))?;

        let status = response.status().as_u16();
        let content_type = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);
        let body = response
            .bytes()
            .await
            .map_err(|e| ExtractError::fetch(url, describe(&e)))?
            .to_vec();

        tracing::debug!(url = %url, status, bytes = body.len(), "Response");
        Ok(HttpResponse {
            status,
            content_type,
            body,
        })
    }
}

fn describe(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!("request timed out ({err})")
    } else if err.is_redirect() {
        format!("redirect limit exceeded ({err})")
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_json() {
        let mut response = HttpResponse {
            status: 200,
            content_type: Some("application/json; charset=utf-8".into()),
            body: Vec::new(),
        };
        assert!(response.is_json());
        response.content_type = Some("application/vnd.api+json".into());
        assert!(response.is_json());
        response.content_type = Some("text/html".into());
        assert!(!response.is_json());
        response.content_type = None;
        assert!(!response.is_json());
    }

    #[test]
    fn test_is_success() {
        let ok = HttpResponse { status: 204, ..Default::default() };
        let missing = HttpResponse { status: 404, ..Default::default() };
        assert!(ok.is_success());
        assert!(!missing.is_success());
    }
}
