use axum::extract::Multipart;
use axum::http::StatusCode;
use thiserror::Error;

/// An uploaded file with its data and metadata.
pub struct UploadedFile {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Parsed form fields from the multipart upload.
pub struct FormFields {
    pub file: UploadedFile,
    pub job_description: Option<String>,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("No file uploaded")]
    MissingFile,
    #[error("{message}")]
    Read { status: StatusCode, message: String },
}

impl UploadError {
    pub fn status(&self) -> StatusCode {
        match self {
            UploadError::MissingFile => StatusCode::UNPROCESSABLE_ENTITY,
            UploadError::Read { status, .. } => *status,
        }
    }
}

fn read_error(what: &str, e: axum::extract::multipart::MultipartError) -> UploadError {
    UploadError::Read {
        status: e.status(),
        message: format!("Failed to read {}: {}", what, e.body_text()),
    }
}

/// Parse a multipart form upload into structured form fields.
///
/// Expects a `file` part and an optional `job_description` text part. An
/// empty job description counts as absent. Unknown fields are drained.
pub async fn parse_multipart(mut multipart: Multipart) -> Result<FormFields, UploadError> {
    let mut file: Option<UploadedFile> = None;
    let mut job_description: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| read_error("form field", e))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "file" => {
                let filename = field.file_name().unwrap_or("upload.pdf").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| read_error("file data", e))?
                    .to_vec();

                file = Some(UploadedFile { filename, data });
            }
            "job_description" => {
                let val = field
                    .text()
                    .await
                    .map_err(|e| read_error("job_description", e))?;
                if !val.trim().is_empty() {
                    job_description = Some(val);
                }
            }
            _ => {
                // Ignore unknown fields
                let _ = field.bytes().await;
            }
        }
    }

    let file = file.ok_or(UploadError::MissingFile)?;

    Ok(FormFields {
        file,
        job_description,
    })
}
