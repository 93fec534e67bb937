use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

pub const CONNECTIVITY_MESSAGE: &str =
    "Unable to connect to server. Please check your internet connection.";
pub const SUBMISSION_FALLBACK_MESSAGE: &str = "Error submitting donation. Please try again.";
pub const SESSION_EXPIRED_MESSAGE: &str = "Your admin session is no longer valid. Please sign in again.";
pub const SUBMISSION_SUCCESS_MESSAGE: &str =
    "Donation submitted successfully! Tickets will be sent to your email after confirmation.";

/// Failure of a REST call, classified by what the user can do about it.
#[derive(Debug, Error)]
pub enum ApiError {
    /// The backend answered with an error payload.
    #[error("{message}")]
    ServerRejection { status: u16, message: String },
    /// No response arrived (refused connection, DNS, timeout).
    #[error("Connection failed: {0}")]
    Connectivity(String),
    #[error("Unexpected failure: {0}")]
    Unexpected(String),
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl ApiError {
    /// Classifies a transport error raised before a usable response arrived.
    pub fn from_transport(error: reqwest::Error) -> Self {
        if error.is_timeout() || error.is_connect() || error.is_request() {
            ApiError::Connectivity(error.to_string())
        } else {
            ApiError::Unexpected(error.to_string())
        }
    }

    /// Classifies a non-success response from its status and body.
    pub fn from_status(status: StatusCode, body: &[u8]) -> Self {
        match serde_json::from_slice::<ErrorBody>(body) {
            Ok(parsed) if !parsed.error.trim().is_empty() => ApiError::ServerRejection {
                status: status.as_u16(),
                message: parsed.error,
            },
            _ if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN => {
                ApiError::ServerRejection {
                    status: status.as_u16(),
                    message: SESSION_EXPIRED_MESSAGE.to_string(),
                }
            }
            _ => ApiError::Unexpected(format!("HTTP {}", status)),
        }
    }

    pub fn is_connectivity(&self) -> bool {
        matches!(self, ApiError::Connectivity(_))
    }

    pub fn is_unauthorized(&self) -> bool {
        matches!(
            self,
            ApiError::ServerRejection {
                status: 401 | 403,
                ..
            }
        )
    }

    /// Message shown to the user; server messages are passed through verbatim.
    pub fn user_message_or(&self, fallback: &str) -> String {
        match self {
            ApiError::ServerRejection { message, .. } => message.clone(),
            ApiError::Connectivity(_) => CONNECTIVITY_MESSAGE.to_string(),
            ApiError::Unexpected(_) => fallback.to_string(),
        }
    }

    /// Emits the log line matching the failure class.
    pub fn log(&self, operation: &str) {
        match self {
            ApiError::ServerRejection { status, message } => {
                tracing::info!(operation, status, message = %message, "request rejected by server")
            }
            ApiError::Connectivity(detail) => {
                tracing::warn!(operation, detail = %detail, "server unreachable")
            }
            ApiError::Unexpected(detail) => {
                tracing::error!(operation, detail = %detail, "unexpected API failure")
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_field_becomes_server_rejection() {
        let error = ApiError::from_status(
            StatusCode::BAD_REQUEST,
            br#"{ "error": "Screenshot is required" }"#,
        );
        assert!(matches!(
            error,
            ApiError::ServerRejection { status: 400, .. }
        ));
        assert_eq!(
            error.user_message_or(SUBMISSION_FALLBACK_MESSAGE),
            "Screenshot is required"
        );
    }

    #[test]
    fn body_without_error_field_is_unexpected() {
        let error = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR, b"<html>oops</html>");
        assert!(matches!(error, ApiError::Unexpected(_)));
        assert_eq!(
            error.user_message_or(SUBMISSION_FALLBACK_MESSAGE),
            SUBMISSION_FALLBACK_MESSAGE
        );
    }

    #[test]
    fn connectivity_uses_fixed_message() {
        let error = ApiError::Connectivity("timed out".into());
        assert_eq!(error.user_message_or("ignored"), CONNECTIVITY_MESSAGE);
        assert!(error.is_connectivity());
    }

    #[test]
    fn unauthorized_statuses() {
        let error = ApiError::from_status(StatusCode::UNAUTHORIZED, br#"{"error":"Token expired"}"#);
        assert!(error.is_unauthorized());

        let bare = ApiError::from_status(StatusCode::FORBIDDEN, b"");
        assert!(bare.is_unauthorized());
        assert_eq!(bare.user_message_or("ignored"), SESSION_EXPIRED_MESSAGE);
    }
}
