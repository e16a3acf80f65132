use thiserror::Error;

use crate::api::ApiError;
use crate::validate::ValidationError;

/// Failures of `SessionStore::login`. None of them touch the stored session.
#[derive(Error, Debug)]
pub enum AuthError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("Invalid credentials: {0}")]
    InvalidCredentials(String),

    #[error("Unable to reach server: {0}")]
    Network(#[source] reqwest::Error),

    #[error("Server error: {0}")]
    Server(String),

    #[error("Failed to persist session: {0}")]
    Storage(#[source] anyhow::Error),

    #[error(transparent)]
    Api(ApiError),
}

impl From<ApiError> for AuthError {
    fn from(err: ApiError) -> Self {
        match err {
            ApiError::Unauthorized => {
                AuthError::InvalidCredentials("Incorrect email or password".to_string())
            }
            // The token endpoint answers bad credentials and inactive accounts with 400
            ApiError::Rejected { status: 400, detail } => AuthError::InvalidCredentials(detail),
            ApiError::NetworkError(e) => AuthError::Network(e),
            ApiError::ServerError(body) => AuthError::Server(body),
            other => AuthError::Api(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_api_error_mapping() {
        assert!(matches!(
            AuthError::from(ApiError::Unauthorized),
            AuthError::InvalidCredentials(_)
        ));
        match AuthError::from(ApiError::Rejected {
            status: 400,
            detail: "Inactive user".to_string(),
        }) {
            AuthError::InvalidCredentials(detail) => assert_eq!(detail, "Inactive user"),
            other => panic!("unexpected error: {:?}", other),
        }
        assert!(matches!(
            AuthError::from(ApiError::ServerError("boom".to_string())),
            AuthError::Server(_)
        ));
        assert!(matches!(
            AuthError::from(ApiError::Rejected {
                status: 422,
                detail: "field required".to_string(),
            }),
            AuthError::Api(ApiError::Rejected { status: 422, .. })
        ));
    }
}
