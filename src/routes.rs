// Route definitions

use crate::handlers;
use crate::relay::ChatRelay;
use std::convert::Infallible;
use warp::Filter;

pub fn configure_routes(
    relay: ChatRelay,
    cors_origins: &[String],
) -> impl Filter<Extract = impl warp::Reply, Error = warp::Rejection> + Clone {
    let chatbot = warp::path("chatbot");

    // GET /
    let welcome = warp::path::end()
        .and(warp::get())
        .and_then(handlers::welcome_handler);

    // POST /chatbot/message
    let send_message = chatbot
        .and(warp::path("message"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_relay(relay.clone()))
        .and_then(handlers::send_message_handler);

    // POST /chatbot/message/stream
    let stream_message = chatbot
        .and(warp::path("message"))
        .and(warp::path("stream"))
        .and(warp::path::end())
        .and(warp::post())
        .and(warp::body::json())
        .and(with_relay(relay.clone()))
        .and_then(handlers::stream_message_handler);

    // GET /chatbot/conversations
    let list_conversations = chatbot
        .and(warp::path("conversations"))
        .and(warp::path::end())
        .and(warp::get())
        .and(with_relay(relay.clone()))
        .and_then(handlers::list_conversations_handler);

    // GET /chatbot/history/{conversationId}
    let history = chatbot
        .and(warp::path("history"))
        .and(warp::path::param::<String>())
        .and(warp::path::end())
        .and(warp::get())
        .and(with_relay(relay.clone()))
        .and_then(handlers::get_history_handler);

    // POST /chatbot/conversations/{conversationId}/delete
    let delete_conversation = chatbot
        .and(warp::path("conversations"))
        .and(warp::path::param::<String>())
        .and(warp::path("delete"))
        .and(warp::path::end())
        .and(warp::post())
        .and(with_relay(relay))
        .and_then(handlers::delete_conversation_handler);

    // GET /chatbot/health
    let health = chatbot
        .and(warp::path("health"))
        .and(warp::path::end())
        .and(warp::get())
        .and_then(handlers::health_handler);

    welcome
        .or(send_message)
        .or(stream_message)
        .or(list_conversations)
        .or(history)
        .or(delete_conversation)
        .or(health)
        .recover(handlers::handle_rejection)
        .with(cors(cors_origins))
}

fn with_relay(relay: ChatRelay) -> impl Filter<Extract = (ChatRelay,), Error = Infallible> + Clone {
    warp::any().map(move || relay.clone())
}

/// CORS policy; `*` among the origins allows any origin
fn cors(origins: &[String]) -> warp::filters::cors::Builder {
    let builder = warp::cors()
        .allow_credentials(true)
        .allow_methods(vec!["GET", "POST", "OPTIONS"])
        .allow_headers(vec!["content-type", "accept"]);

    if origins.iter().any(|origin| origin == "*") {
        builder.allow_any_origin()
    } else {
        builder.allow_origins(origins.iter().map(String::as_str))
    }
}
