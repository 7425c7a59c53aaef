use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Response};
use thiserror::Error;
use tracing::error;

use crate::error::ContactError;

/// Errors returned by handlers, rendered as an HTML error fragment.
#[derive(Debug, Error)]
pub enum ApiError {
    #[error(transparent)]
    Contact(#[from] ContactError),

    #[error("Template rendering failed: {0}")]
    Render(#[from] tera::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Contact(ContactError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Contact(ContactError::Validation { .. }) => StatusCode::BAD_REQUEST,
            Self::Contact(ContactError::Persistence { .. }) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Contact(ContactError::Transport { .. }) => StatusCode::BAD_GATEWAY,
            Self::Render(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = match &self {
            Self::Contact(ContactError::NotFound { .. } | ContactError::Validation { .. }) => {
                self.to_string()
            }
            Self::Contact(ContactError::Transport { .. }) => {
                error!(error = ?self, "Delivery error while handling request");
                "A downstream service is unavailable".to_string()
            }
            _ => {
                error!(error = ?self, "Internal error while handling request");
                "An internal error occurred".to_string()
            }
        };

        (status, Html(error_fragment(status, &message))).into_response()
    }
}

/// Error panel swapped into the page in place of the requested fragment.
pub fn error_fragment(status: StatusCode, message: &str) -> String {
    format!(
        "<div class=\"error\" data-status=\"{}\">\n  <h2>{}</h2>\n  <p>{}</p>\n</div>\n",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error"),
        tera::escape_html(message),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            ApiError::from(ContactError::not_found("x")).status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ApiError::from(ContactError::validation("bad")).status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ApiError::from(ContactError::persistence("locked")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ApiError::from(ContactError::transport("refused")).status(),
            StatusCode::BAD_GATEWAY
        );
    }

    #[test]
    fn test_fragment_escapes_message() {
        let html = error_fragment(StatusCode::NOT_FOUND, "Contact not found: <script>");
        assert!(html.contains("data-status=\"404\""));
        assert!(html.contains("Not Found"));
        assert!(html.contains("&lt;script&gt;"));
        assert!(!html.contains("<script>"));
    }

    #[test]
    fn test_internal_details_are_hidden() {
        let response = ApiError::from(ContactError::persistence("secret path /var/db")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
