use thiserror::Error;

#[derive(Error, Debug)]
pub enum MLError {
    #[error("HTTP request failed: {0}")]
    RequestFailed(reqwest::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,
}

impl From<reqwest::Error> for MLError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_timeout() {
            MLError::Timeout
        } else if e.is_decode() {
            MLError::InvalidResponse(e.to_string())
        } else {
            MLError::RequestFailed(e)
        }
    }
}

pub type MLResult<T> = Result<T, MLError>;
