//! Error responses.
//!
//! Every failure leaves the API as `{ "error": CODE, "message": reason }`
//! with the status of its category.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use orgdesk_core::OnboardingError;
use orgdesk_shared::AppError;
use serde_json::json;
use tracing::error;

/// An error on its way to the client.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    code: &'static str,
    message: String,
}

impl ApiError {
    /// Builds an error from its parts.
    #[must_use]
    pub fn new(status: StatusCode, code: &'static str, message: impl Into<String>) -> Self {
        Self {
            status,
            code,
            message: message.into(),
        }
    }

    /// Malformed request input.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        AppError::Validation(message.into()).into()
    }

    /// Returns the HTTP status.
    #[must_use]
    pub const fn status(&self) -> StatusCode {
        self.status
    }

    /// Returns the error code.
    #[must_use]
    pub const fn code(&self) -> &'static str {
        self.code
    }
}

fn status_from(code: u16) -> StatusCode {
    StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl From<OnboardingError> for ApiError {
    fn from(err: OnboardingError) -> Self {
        Self::new(status_from(err.status_code()), err.error_code(), err.to_string())
    }
}

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self::new(status_from(err.status_code()), err.error_code(), err.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if self.status.is_server_error() {
            error!(code = self.code, message = %self.message, "Request failed");
        }
        (
            self.status,
            Json(json!({ "error": self.code, "message": self.message })),
        )
            .into_response()
    }
}

/// Result alias for handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use orgdesk_core::payment::PaymentError;
    use orgdesk_core::store::StoreError;
    use orgdesk_shared::types::OrganizationId;
    use rstest::rstest;

    #[rstest]
    #[case(OnboardingError::OrganizationNotFound(OrganizationId::new()), StatusCode::NOT_FOUND, "ORGANIZATION_NOT_FOUND")]
    #[case(OnboardingError::Payment(PaymentError::NoActivation), StatusCode::UNPROCESSABLE_ENTITY, "NO_ACTIVATION")]
    #[case(OnboardingError::Store(StoreError::Backend("down".into())), StatusCode::SERVICE_UNAVAILABLE, "PERSISTENCE_ERROR")]
    #[case(OnboardingError::Forbidden("reviewers only".into()), StatusCode::FORBIDDEN, "FORBIDDEN")]
    fn test_onboarding_errors_map_to_status(
        #[case] err: OnboardingError,
        #[case] status: StatusCode,
        #[case] code: &str,
    ) {
        let api: ApiError = err.into();
        assert_eq!(api.status(), status);
        assert_eq!(api.code(), code);
    }

    #[test]
    fn test_validation_is_bad_request() {
        let api = ApiError::validation("unknown term");
        assert_eq!(api.status(), StatusCode::BAD_REQUEST);
        assert_eq!(api.code(), "VALIDATION_ERROR");
    }
}
