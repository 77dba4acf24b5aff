//! Multipart form parsing for document uploads

use axum::body::Body;
use axum::extract::multipart::{Field, MultipartError};
use axum::extract::{FromRequest, Multipart, Request};
use axum::http::StatusCode;
use bytes::{Bytes, BytesMut};
use futures::StreamExt;
use huduma_core::validation::{validate_service_label, validate_upload};
use huduma_core::{AppError, UploadPolicy};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use crate::error::HttpAppError;
use crate::services::UploadedFile;

pub const FILE_FIELD: &str = "file";
pub const SERVICE_FIELD: &str = "service";

/// Multipart slack allowed on top of the file size ceiling.
pub const MULTIPART_OVERHEAD_BYTES: u64 = 1024 * 1024;

/// Body limit for upload requests.
pub fn upload_body_limit(max_upload_size_bytes: u64) -> usize {
    usize::try_from(max_upload_size_bytes.saturating_add(MULTIPART_OVERHEAD_BYTES))
        .unwrap_or(usize::MAX)
}

/// The upload form: exactly one `file` part and at most one `service` part.
///
/// `service` stays optional here so a blank or missing label is reported as
/// `MissingService` by the ingestion pipeline.
#[derive(Debug)]
pub struct UploadForm {
    pub file: UploadedFile,
    pub service: Option<String>,
}

impl UploadForm {
    /// Read the form from an upload request. Unknown and duplicate fields are rejected.
    ///
    /// File bytes past the policy ceiling are counted but not buffered. The body is
    /// cut at [`upload_body_limit`]; when that cuts the form short, whatever was read
    /// so far is checked in pipeline order (service, type, size) to pick the rejection.
    pub async fn from_request(request: Request, policy: &UploadPolicy) -> Result<Self, HttpAppError> {
        let overflow_at = Arc::new(AtomicU64::new(0));
        let limit = upload_body_limit(policy.max_size_bytes);
        let request = request.map(|body| cap_body(body, limit, overflow_at.clone()));

        let multipart = Multipart::from_request(request, &()).await?;

        let mut partial = PartialForm::default();
        let outcome = partial.read(multipart, policy.max_size_bytes).await;
        let overflow_at = match overflow_at.load(Ordering::Relaxed) {
            0 => None,
            received => Some(received),
        };
        match outcome {
            Ok(()) => Ok(partial.finish()?),
            Err(FormError::Rejected(err)) => Err(err.into()),
            Err(FormError::Multipart(err)) => Err(partial.reject(err, policy, overflow_at).into()),
        }
    }
}

/// Pass at most `limit` body bytes. The frame that crosses the limit is truncated, the
/// stream ends there, and `overflow_at` records how many bytes had arrived by then.
fn cap_body(body: Body, limit: usize, overflow_at: Arc<AtomicU64>) -> Body {
    let stream = body
        .into_data_stream()
        .scan((limit, 0u64), move |state: &mut (usize, u64), frame| {
            let item = match frame {
                Ok(_) if overflow_at.load(Ordering::Relaxed) > 0 => None,
                Ok(mut bytes) => {
                    let (remaining, seen) = state;
                    *seen += bytes.len() as u64;
                    if bytes.len() > *remaining {
                        overflow_at.store(*seen, Ordering::Relaxed);
                        bytes.truncate(*remaining);
                    }
                    *remaining -= bytes.len();
                    Some(Ok(bytes))
                }
                Err(err) => Some(Err(err)),
            };
            futures::future::ready(item)
        });
    Body::from_stream(stream)
}

enum FormError {
    Rejected(AppError),
    Multipart(MultipartError),
}

impl From<AppError> for FormError {
    fn from(err: AppError) -> Self {
        FormError::Rejected(err)
    }
}

impl From<MultipartError> for FormError {
    fn from(err: MultipartError) -> Self {
        FormError::Multipart(err)
    }
}

/// Form state as it is being read.
#[derive(Default)]
struct PartialForm {
    file: Option<UploadedFile>,
    service: Option<String>,
    /// Name and content type of the file part being read, once its headers arrive.
    file_header: Option<(String, Option<String>)>,
    file_bytes: u64,
}

impl PartialForm {
    async fn read(&mut self, mut multipart: Multipart, max_file_size: u64) -> Result<(), FormError> {
        while let Some(field) = multipart.next_field().await? {
            let name = field.name().unwrap_or_default().to_string();
            match name.as_str() {
                FILE_FIELD => {
                    if self.file_header.is_some() {
                        return Err(AppError::InvalidInput(
                            "Multiple file fields are not allowed; send exactly one field named 'file'"
                                .to_string(),
                        )
                        .into());
                    }
                    let file = self.read_file(field, max_file_size).await?;
                    self.file = Some(file);
                }
                SERVICE_FIELD => {
                    if self.service.is_some() {
                        return Err(AppError::InvalidInput(
                            "Multiple service fields are not allowed".to_string(),
                        )
                        .into());
                    }
                    self.service = Some(field.text().await?);
                }
                other => {
                    return Err(AppError::InvalidInput(format!(
                        "Unexpected form field '{}'",
                        other
                    ))
                    .into());
                }
            }
        }
        Ok(())
    }

    async fn read_file(
        &mut self,
        mut field: Field<'_>,
        max_file_size: u64,
    ) -> Result<UploadedFile, FormError> {
        let name = field
            .file_name()
            .map(str::to_string)
            .filter(|n| !n.trim().is_empty())
            .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
        let content_type = field.content_type().map(str::to_string);
        self.file_header = Some((name.clone(), content_type.clone()));

        let mut buffer = BytesMut::new();
        while let Some(chunk) = field.chunk().await? {
            self.file_bytes += chunk.len() as u64;
            if self.file_bytes <= max_file_size {
                buffer.extend_from_slice(&chunk);
            }
        }

        let data: Bytes = if self.file_bytes <= max_file_size {
            buffer.freeze()
        } else {
            Bytes::new()
        };

        Ok(UploadedFile {
            name,
            content_type,
            data,
            size: self.file_bytes,
        })
    }

    fn finish(self) -> Result<UploadForm, AppError> {
        let file = self
            .file
            .ok_or_else(|| AppError::InvalidInput("No file provided".to_string()))?;
        Ok(UploadForm {
            file,
            service: self.service,
        })
    }

    /// Body-limit hits are size violations unless an earlier check already fails;
    /// anything else is a malformed request.
    ///
    /// `overflow_at` is the request bytes received when the body was cut; it is the
    /// size reported for the file, since the file part is where the excess lands.
    fn reject(
        &self,
        error: MultipartError,
        policy: &UploadPolicy,
        overflow_at: Option<u64>,
    ) -> AppError {
        let over_limit =
            overflow_at.is_some() || error.status() == StatusCode::PAYLOAD_TOO_LARGE;
        if !over_limit {
            return AppError::InvalidInput(format!(
                "Failed to read multipart: {}",
                error.body_text()
            ));
        }

        if let Some(service) = &self.service {
            if let Err(err) = validate_service_label(Some(service.as_str())) {
                return err;
            }
        }

        let received = overflow_at.unwrap_or(0).max(self.file_bytes);
        if let Some((name, content_type)) = &self.file_header {
            if let Err(rejection) =
                validate_upload(policy, name, content_type.as_deref(), received)
            {
                return rejection.into();
            }
        }

        AppError::InvalidInput(format!(
            "Request body exceeds the {} byte upload limit",
            upload_body_limit(policy.max_size_bytes)
        ))
    }
}
