//! Export backend seam
//!
//! The backend turns an [`ExportRequest`] into the raw bytes of one artifact.
//! [`HttpExportBackend`] talks to the spreadsheet export endpoint; tests plug
//! in their own implementation.

use crate::request::ExportRequest;
use crate::types::*;

pub trait ExportBackend {
    fn fetch(&self, request: &ExportRequest) -> impl Future<Output = Result<Vec<u8>>> + Send;
}

/// Source of the bearer token attached to each request
pub trait CredentialSource {
    fn bearer_token(&self) -> Result<String>;
}

/// Reads the token from an environment variable on every call
#[derive(Debug, Clone)]
pub struct EnvCredential {
    pub var: String,
}

impl EnvCredential {
    pub fn new(var: impl Into<String>) -> Self {
        Self { var: var.into() }
    }
}

impl CredentialSource for EnvCredential {
    fn bearer_token(&self) -> Result<String> {
        match std::env::var(&self.var) {
            Ok(token) if !token.trim().is_empty() => Ok(token.trim().to_string()),
            _ => Err(ExportError::Fetch {
                label: "credentials".to_string(),
                message: format!("environment variable {} is not set", self.var),
            }),
        }
    }
}

/// Fixed token
#[derive(Debug, Clone)]
pub struct StaticCredential(pub String);

impl CredentialSource for StaticCredential {
    fn bearer_token(&self) -> Result<String> {
        Ok(self.0.clone())
    }
}

pub struct HttpExportBackend<C> {
    http: reqwest::Client,
    credentials: C,
}

impl<C: CredentialSource> HttpExportBackend<C> {
    pub fn new(credentials: C) -> Self {
        Self {
            http: reqwest::Client::new(),
            credentials,
        }
    }
}

impl<C: CredentialSource + Sync> ExportBackend for HttpExportBackend<C> {
    async fn fetch(&self, request: &ExportRequest) -> Result<Vec<u8>> {
        let label = request.label();
        let token = self.credentials.bearer_token()?;
        log::debug!("Fetching {} from {}", label, request.url);

        let response = self
            .http
            .get(&request.url)
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ExportError::Fetch {
                label: label.clone(),
                message: e.to_string(),
            })?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            let body: String = body.chars().take(200).collect();
            return Err(ExportError::Fetch {
                label,
                message: format!("HTTP {}: {}", status, body),
            });
        }

        let bytes = response.bytes().await.map_err(|e| ExportError::Fetch {
            label: label.clone(),
            message: e.to_string(),
        })?;
        log::debug!("Fetched {} ({} bytes)", label, bytes.len());
        Ok(bytes.to_vec())
    }
}
