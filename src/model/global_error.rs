use reqwest::StatusCode;
use thiserror::Error;

/// Lark media API code returned when image uploads are being throttled.
pub const UPLOAD_THROTTLED_CODE: i64 = 40010;

#[derive(Error, Debug)]
pub enum NotificationError {
    #[error("invalid recipient config: {0}")]
    InvalidRecipient(String),

    #[error("no attachment to upload")]
    NothingToUpload,

    #[error("upload image error, error code: 40010, response: {body}")]
    UploadThrottled { body: String },

    #[error("upload image error, response code: {status}, response body: {body}")]
    UploadRejected { status: StatusCode, body: String },

    #[error("lark api request error, response code: {status}, text: {body}")]
    Status { status: StatusCode, body: String },

    #[error("lark api returned a non-json body: {0}")]
    InvalidResponse(#[from] serde_json::Error),

    #[error("lark api request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("attachment file error: {0}")]
    Io(#[from] std::io::Error),
}

impl NotificationError {
    /// Network or filesystem failures; the whole send is re-run for these.
    pub fn is_transport(&self) -> bool {
        matches!(self, NotificationError::Transport(_) | NotificationError::Io(_))
    }

    /// Failures the image upload step retries on its own.
    pub fn is_retryable_upload(&self) -> bool {
        matches!(
            self,
            NotificationError::UploadThrottled { .. } | NotificationError::Status { .. }
        )
    }
}
