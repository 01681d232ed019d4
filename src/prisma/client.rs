use reqwest::header::{AUTHORIZATION, HeaderMap, HeaderValue};
use reqwest::{Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;

use super::PrismaError;
use crate::config::ProviderConfig;

const API_PREFIX: &str = "api/v1";
const AUTHENTICATE_ENDPOINT: &str = "authenticate";

#[derive(Clone)]
pub struct PrismaClient {
    client: reqwest::Client,
    base_url: String,
    project: Option<String>,
}

impl PrismaClient {
    /// Logs in with username/password and returns a client carrying the
    /// issued bearer token.
    pub async fn connect(config: &ProviderConfig) -> Result<Self, PrismaError> {
        let login = Self::build_http(None, config.skip_cert_verification)?;
        let url = endpoint_url(&config.console_url, AUTHENTICATE_ENDPOINT, config.project.as_deref());

        tracing::debug!(console = %config.console_url, "authenticating");

        let response = login
            .post(&url)
            .json(&serde_json::json!({
                "username": config.username,
                "password": config.password,
            }))
            .send()
            .await?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(PrismaError::Auth {
                message: error_message(response).await,
            });
        }
        let response = check_status(response, AUTHENTICATE_ENDPOINT).await?;

        let body: serde_json::Value = response.json().await.map_err(|e| PrismaError::Auth {
            message: format!("Failed to parse response: {}", e),
        })?;

        let token = body
            .get("token")
            .and_then(|t| t.as_str())
            .filter(|t| !t.is_empty())
            .ok_or_else(|| PrismaError::Auth {
                message: "No token in authentication response".to_string(),
            })?;

        tracing::info!("Prisma Cloud Compute authentication succeeded");

        let client = Self::build_http(Some(token), config.skip_cert_verification)?;
        Ok(Self {
            client,
            base_url: config.console_url.clone(),
            project: config.project.clone(),
        })
    }

    /// NOTE: Primarily used for testing with mock servers.
    pub fn with_token(
        base_url: String,
        token: &str,
        project: Option<String>,
    ) -> Result<Self, PrismaError> {
        let client = Self::build_http(Some(token), false)?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            project,
        })
    }

    fn build_http(token: Option<&str>, insecure: bool) -> Result<reqwest::Client, PrismaError> {
        let mut headers = HeaderMap::new();
        if let Some(token) = token {
            let mut header_value = HeaderValue::from_str(&format!("Bearer {}", token))
                .map_err(|_| PrismaError::Auth {
                    message: "Invalid token format".to_string(),
                })?;
            header_value.set_sensitive(true);
            headers.insert(AUTHORIZATION, header_value);
        }

        reqwest::Client::builder()
            .default_headers(headers)
            .danger_accept_invalid_certs(insecure)
            .build()
            .map_err(PrismaError::Network)
    }

    pub fn api_base(&self) -> &str {
        &self.base_url
    }

    fn url(&self, endpoint: &str) -> String {
        endpoint_url(&self.base_url, endpoint, self.project.as_deref())
    }

    pub async fn get_json<T: DeserializeOwned>(&self, endpoint: &str) -> Result<T, PrismaError> {
        tracing::debug!(endpoint, "GET");
        let response = self.client.get(self.url(endpoint)).send().await?;
        let response = check_status(response, endpoint).await?;

        response.json().await.map_err(|e| PrismaError::Decode {
            endpoint: endpoint.to_string(),
            message: e.to_string(),
        })
    }

    pub async fn put_json<B: Serialize + ?Sized>(
        &self,
        endpoint: &str,
        body: &B,
    ) -> Result<(), PrismaError> {
        tracing::debug!(endpoint, "PUT");
        let response = self.client.put(self.url(endpoint)).json(body).send().await?;
        check_status(response, endpoint).await?;
        Ok(())
    }
}

fn endpoint_url(base_url: &str, endpoint: &str, project: Option<&str>) -> String {
    match project {
        Some(project) => format!(
            "{}/{}/{}?project={}",
            base_url,
            API_PREFIX,
            endpoint,
            urlencoding::encode(project)
        ),
        None => format!("{}/{}/{}", base_url, API_PREFIX, endpoint),
    }
}

async fn check_status(response: Response, endpoint: &str) -> Result<Response, PrismaError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    if status == StatusCode::NOT_FOUND {
        return Err(PrismaError::NotFound {
            endpoint: endpoint.to_string(),
        });
    }

    Err(PrismaError::Api {
        status: status.as_u16(),
        message: error_message(response).await,
    })
}

// NOTE: The console reports failures as {"err": "..."}; fall back to the raw body.
async fn error_message(response: Response) -> String {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();

    let message = serde_json::from_str::<serde_json::Value>(&text)
        .ok()
        .and_then(|body| body.get("err").and_then(|e| e.as_str()).map(str::to_string))
        .unwrap_or_else(|| text.trim().to_string());

    if message.is_empty() {
        status
            .canonical_reason()
            .unwrap_or("Unknown error")
            .to_string()
    } else {
        message
    }
}

impl std::fmt::Debug for PrismaClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrismaClient")
            .field("base_url", &self.base_url)
            .field("project", &self.project)
            .field("token", &"[REDACTED]")
            .finish()
    }
}
