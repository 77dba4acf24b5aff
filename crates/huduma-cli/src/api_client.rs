//! HTTP client for the Huduma API.

use anyhow::{Context, Result};
use huduma_core::DocumentRecord;
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

pub const DEFAULT_API_URL: &str = "http://localhost:3000";

#[derive(Debug, Deserialize)]
pub struct UploadResponse {
    pub success: bool,
    pub data: DocumentRecord,
}

#[derive(Debug, Deserialize)]
pub struct DocumentListResponse {
    pub data: Vec<DocumentRecord>,
}

#[derive(Debug, Deserialize)]
pub struct ChatResponse {
    pub reply: String,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    error: String,
    #[serde(default)]
    code: Option<String>,
}

/// MIME type sent with an upload, from the file extension.
pub fn content_type_for(path: &Path) -> &'static str {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_ascii_lowercase);
    match extension.as_deref() {
        Some("pdf") => "application/pdf",
        Some("doc") => "application/msword",
        Some("docx") => {
            "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
        }
        Some("txt") | Some("text") => "text/plain",
        _ => "application/octet-stream",
    }
}

#[derive(Clone, Debug)]
pub struct ApiClient {
    client: Client,
    base_url: String,
}

impl ApiClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(60))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Server from `HUDUMA_API_URL`, defaulting to [`DEFAULT_API_URL`].
    pub fn from_env() -> Result<Self> {
        let base_url =
            std::env::var("HUDUMA_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());
        Self::new(base_url)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn build_url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn parse<T: DeserializeOwned>(response: Response) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            let message = match serde_json::from_str::<ErrorBody>(&text) {
                Ok(ErrorBody {
                    error,
                    code: Some(code),
                }) => format!("{} ({})", error, code),
                Ok(ErrorBody { error, code: None }) => error,
                Err(_) => text,
            };
            return Err(anyhow::anyhow!("{}: {}", status, message));
        }

        response
            .json()
            .await
            .context("Failed to parse response as JSON")
    }

    /// Upload one file under a service label.
    pub async fn upload_document(&self, path: &Path, service: &str) -> Result<DocumentRecord> {
        let file_name = path
            .file_name()
            .and_then(|n| n.to_str())
            .map(str::to_string)
            .with_context(|| format!("Invalid file name: {}", path.display()))?;
        let data = tokio::fs::read(path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?;

        tracing::debug!(file = %path.display(), size = data.len(), "Uploading");

        let part = Part::bytes(data)
            .file_name(file_name)
            .mime_str(content_type_for(path))
            .context("Invalid content type")?;
        let form = Form::new()
            .text("service", service.to_string())
            .part("file", part);

        let response = self
            .client
            .post(self.build_url("/api/upload"))
            .multipart(form)
            .send()
            .await
            .context("Failed to send request")?;

        let body: UploadResponse = Self::parse(response).await?;
        Ok(body.data)
    }

    pub async fn list_documents(&self) -> Result<Vec<DocumentRecord>> {
        let response = self
            .client
            .get(self.build_url("/api/documents"))
            .send()
            .await
            .context("Failed to send request")?;
        let body: DocumentListResponse = Self::parse(response).await?;
        Ok(body.data)
    }

    pub async fn chat(&self, message: &str) -> Result<String> {
        let response = self
            .client
            .post(self.build_url("/api/chat"))
            .json(&serde_json::json!({ "message": message }))
            .send()
            .await
            .context("Failed to send request")?;
        let body: ChatResponse = Self::parse(response).await?;
        Ok(body.reply)
    }
}
