// POST /chatbot/message handler

use crate::models::{FailedMessageResponse, SendMessageRequest, SendMessageResponse};
use crate::relay::{ChatRelay, RelayError};
use tracing::info;
use warp::http::StatusCode;
use warp::Reply;

use super::ApiError;

pub async fn send_message_handler(
    request: SendMessageRequest,
    relay: ChatRelay,
) -> Result<warp::reply::Response, warp::Rejection> {
    info!(conversation_id = %request.conversation_id, "POST /chatbot/message");

    match relay
        .process_message(&request.conversation_id, &request.message)
        .await
    {
        Ok(reply) => {
            let body = SendMessageResponse::from(reply);
            Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::OK).into_response())
        }
        Err(RelayError::Exchange(err)) => {
            // The user message is stored; report the failure in the body
            let body = FailedMessageResponse::new(request.conversation_id, err.to_string());
            Ok(warp::reply::with_status(warp::reply::json(&body), StatusCode::OK).into_response())
        }
        Err(err) => Err(warp::reject::custom(ApiError::from(err))),
    }
}
