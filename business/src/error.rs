//! Errors raised while talking to the ledger backend.

use serde::Deserialize;

use crate::http::{HttpError, Response};
use crate::session::TokenStoreError;

pub const MSG_SESSION_EXPIRED: &str = "Sesión expirada. Por favor, inicie sesión nuevamente.";
pub const MSG_FORBIDDEN: &str = "No tiene permisos para realizar esta acción.";
pub const MSG_NOT_FOUND: &str = "Recurso no encontrado.";
pub const MSG_SERVER_ERROR: &str = "Error interno del servidor.";
pub const MSG_UNEXPECTED: &str = "Ha ocurrido un error inesperado";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ApiError {
    /// The request never produced a response.
    #[error(transparent)]
    Transport(#[from] HttpError),
    /// Non-2xx status, with the backend's own message when it sent one.
    #[error("API returned status {status}")]
    Status {
        status: u16,
        message: Option<String>,
    },
    /// 2xx response whose envelope carried `success: false`.
    #[error("request rejected: {message}")]
    Rejected { message: String },
    #[error("failed to decode {what}: {reason}")]
    Decode { what: &'static str, reason: String },
    #[error("failed to encode request body: {0}")]
    Encode(String),
    #[error(transparent)]
    Store(#[from] TokenStoreError),
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Error body shapes the backend uses: `{"message": ...}` or DRF's `{"detail": ...}`.
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    detail: Option<String>,
}

impl ApiError {
    /// Builds a [`ApiError::Status`] from a failed response, keeping any backend message.
    pub fn from_response(response: &Response) -> Self {
        let message = response
            .json::<ErrorBody>()
            .ok()
            .and_then(|body| body.message.or(body.detail))
            .map(|m| m.trim().to_owned())
            .filter(|m| !m.is_empty());

        Self::Status {
            status: response.status,
            message,
        }
    }

    pub fn decode(what: &'static str, err: impl std::fmt::Display) -> Self {
        Self::Decode {
            what,
            reason: err.to_string(),
        }
    }

    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Status { status, .. } => Some(*status),
            _ => None,
        }
    }

    pub fn is_unauthorized(&self) -> bool {
        self.status() == Some(401)
    }

    /// The message the backend attached to the failure, if any.
    pub fn backend_message(&self) -> Option<&str> {
        match self {
            Self::Status {
                message: Some(message),
                ..
            } => Some(message),
            Self::Rejected { message } if !message.trim().is_empty() => Some(message),
            _ => None,
        }
    }

    /// The message to show the user.
    ///
    /// A backend-supplied message wins, then a status-specific message, then a
    /// generic fallback.
    pub fn user_message(&self) -> String {
        if let Some(message) = self.backend_message() {
            return message.to_owned();
        }
        match self {
            Self::Status { status, .. } => match status {
                401 => MSG_SESSION_EXPIRED.to_owned(),
                403 => MSG_FORBIDDEN.to_owned(),
                404 => MSG_NOT_FOUND.to_owned(),
                500..=599 => MSG_SERVER_ERROR.to_owned(),
                _ => MSG_UNEXPECTED.to_owned(),
            },
            Self::Transport(err) => format!("Error: {}", err.message),
            _ => MSG_UNEXPECTED.to_owned(),
        }
    }
}
