// Maps rejections to JSON error bodies

use crate::message_store;
use crate::models::ErrorBody;
use crate::relay::RelayError;
use std::convert::Infallible;
use thiserror::Error;
use tracing::{error, warn};
use warp::http::StatusCode;
use warp::{Rejection, Reply};

/// Failures a handler reports through a rejection
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Conversation not found")]
    ConversationNotFound,

    #[error("{0}")]
    Store(#[from] message_store::Error),

    #[error("{0}")]
    Relay(#[from] RelayError),
}

impl warp::reject::Reject for ApiError {}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::ConversationNotFound => StatusCode::NOT_FOUND,
            ApiError::Store(_) | ApiError::Relay(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn code(&self) -> &'static str {
        match self {
            ApiError::ConversationNotFound => "not_found",
            ApiError::Store(_) | ApiError::Relay(_) => "internal_error",
        }
    }
}

pub async fn handle_rejection(err: Rejection) -> Result<impl Reply, Infallible> {
    let (status, code, message) = if let Some(api_error) = err.find::<ApiError>() {
        if api_error.status().is_server_error() {
            error!(error = %api_error, "request failed");
        }
        (api_error.status(), api_error.code(), api_error.to_string())
    } else if let Some(e) = err.find::<warp::filters::body::BodyDeserializeError>() {
        warn!(error = %e, "rejected request body");
        (
            StatusCode::UNPROCESSABLE_ENTITY,
            "validation_error",
            e.to_string(),
        )
    } else if err.find::<warp::reject::UnsupportedMediaType>().is_some() {
        (
            StatusCode::UNSUPPORTED_MEDIA_TYPE,
            "unsupported_media_type",
            "Expected a JSON body".to_string(),
        )
    } else if err.is_not_found() {
        (StatusCode::NOT_FOUND, "not_found", "Not found".to_string())
    } else if err.find::<warp::reject::MethodNotAllowed>().is_some() {
        (
            StatusCode::METHOD_NOT_ALLOWED,
            "method_not_allowed",
            "Method not allowed".to_string(),
        )
    } else {
        error!(rejection = ?err, "unhandled rejection");
        (
            StatusCode::INTERNAL_SERVER_ERROR,
            "internal_error",
            "Internal server error".to_string(),
        )
    };

    let body = ErrorBody {
        error: code.to_string(),
        message,
    };
    Ok(warp::reply::with_status(warp::reply::json(&body), status))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_maps_to_404() {
        let err = ApiError::ConversationNotFound;
        assert_eq!(err.status(), StatusCode::NOT_FOUND);
        assert_eq!(err.code(), "not_found");
        assert_eq!(err.to_string(), "Conversation not found");
    }

    #[test]
    fn test_store_failure_maps_to_500() {
        let err = ApiError::from(message_store::Error::ConnectionError("refused".to_string()));
        assert_eq!(err.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.to_string(), "Connection error: refused");
    }

    #[tokio::test]
    async fn test_handle_custom_rejection() {
        let reply = handle_rejection(warp::reject::custom(ApiError::ConversationNotFound))
            .await
            .unwrap()
            .into_response();
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_handle_unknown_route() {
        let reply = handle_rejection(warp::reject::not_found())
            .await
            .unwrap()
            .into_response();
        assert_eq!(reply.status(), StatusCode::NOT_FOUND);
    }
}
