//! Uniform success/failure envelope for hosting operations.
//!
//! Expected failures - HTTP errors, backend refusals, transport faults -
//! travel inside this envelope instead of `Err`, so callers get one error
//! taxonomy across all four backends. Classification derives solely from the
//! HTTP status code; no body parsing is needed to classify.

/// Outcome of a hosting operation, optionally carrying typed data.
///
/// `data` is populated only on success.
#[derive(Debug, Clone)]
pub struct OperationResult<T = ()> {
    pub success: bool,
    pub error_message: Option<String>,
    pub http_status: Option<u16>,
    pub data: Option<T>,
}

impl<T> OperationResult<T> {
    /// Successful result carrying `data`.
    pub fn ok_with(data: T) -> Self {
        Self {
            success: true,
            error_message: None,
            http_status: None,
            data: Some(data),
        }
    }

    /// Failure with no HTTP status (validation refusal, transport fault).
    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            http_status: None,
            data: None,
        }
    }

    /// Failure classified by an HTTP status code.
    pub fn http_error(status: u16, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_message: Some(message.into()),
            http_status: Some(status),
            data: None,
        }
    }

    /// 401 or 403: surface to the user, do not retry without new
    /// credentials.
    pub fn is_authentication_error(&self) -> bool {
        matches!(self.http_status, Some(401) | Some(403))
    }

    /// 404: usually expected when probing for existence.
    pub fn is_not_found(&self) -> bool {
        self.http_status == Some(404)
    }

    /// 429: the caller may back off and retry.
    pub fn is_rate_limited(&self) -> bool {
        self.http_status == Some(429)
    }

    /// Drop the payload, keeping outcome and classification.
    pub fn into_unit(self) -> OperationResult {
        OperationResult {
            success: self.success,
            error_message: self.error_message,
            http_status: self.http_status,
            data: self.success.then_some(()),
        }
    }
}

impl OperationResult {
    /// Successful result with no payload.
    pub fn ok() -> Self {
        Self::ok_with(())
    }
}
