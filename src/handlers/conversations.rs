// Conversation listing, history and deletion

use crate::models::DeleteConversationResponse;
use crate::relay::ChatRelay;
use tracing::info;
use warp::Reply;

use super::{no_store, ApiError};

// GET /chatbot/conversations
pub async fn list_conversations_handler(
    relay: ChatRelay,
) -> Result<warp::reply::Response, warp::Rejection> {
    let conversations = relay
        .store()
        .list_conversations()
        .await
        .map_err(|err| warp::reject::custom(ApiError::from(err)))?;

    Ok(no_store(warp::reply::json(&conversations)).into_response())
}

// GET /chatbot/history/{conversationId}
pub async fn get_history_handler(
    conversation_id: String,
    relay: ChatRelay,
) -> Result<warp::reply::Response, warp::Rejection> {
    let turns = relay
        .store()
        .find_turns_by_conversation(&conversation_id)
        .await
        .map_err(|err| warp::reject::custom(ApiError::from(err)))?;

    Ok(no_store(warp::reply::json(&turns)).into_response())
}

// POST /chatbot/conversations/{conversationId}/delete
pub async fn delete_conversation_handler(
    conversation_id: String,
    relay: ChatRelay,
) -> Result<warp::reply::Response, warp::Rejection> {
    let deleted = relay
        .store()
        .delete_conversation(&conversation_id)
        .await
        .map_err(|err| warp::reject::custom(ApiError::from(err)))?;

    if deleted == 0 {
        return Err(warp::reject::custom(ApiError::ConversationNotFound));
    }

    info!(conversation_id = %conversation_id, deleted, "conversation deleted");

    let body = DeleteConversationResponse {
        success: true,
        message: "Conversation deleted successfully".to_string(),
    };
    Ok(warp::reply::json(&body).into_response())
}
