use reqwest::StatusCode;
use thiserror::Error;

/// Why a call to the rewards service did not produce a usable payload.
#[derive(Error, Debug)]
pub enum ApiError {
    #[error("request timed out")]
    Timeout,

    #[error("network error: {0}")]
    Network(#[source] reqwest::Error),

    #[error("unauthorized (status {0}), token may be expired")]
    Unauthorized(u16),

    #[error("rate limited by the service")]
    RateLimited,

    #[error("unexpected status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("failed to parse response: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("response carried no data")]
    MissingData,
}

const MAX_BODY_IN_ERROR: usize = 200;

impl ApiError {
    pub fn from_transport(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout
        } else {
            Self::Network(err)
        }
    }

    pub fn from_status(status: StatusCode, body: &str) -> Self {
        match status {
            StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => Self::Unauthorized(status.as_u16()),
            StatusCode::TOO_MANY_REQUESTS => Self::RateLimited,
            _ => Self::Status {
                status: status.as_u16(),
                body: body.chars().take(MAX_BODY_IN_ERROR).collect(),
            },
        }
    }

    /// Failures that are likely to clear up on a later tick without operator action.
    pub fn is_transient(&self) -> bool {
        match self {
            Self::Timeout | Self::Network(_) | Self::RateLimited => true,
            Self::Status { status, .. } => *status >= 500,
            Self::Unauthorized(_) | Self::Parse(_) | Self::MissingData => false,
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;
