// Handlers module

pub mod conversations;
pub mod health;
pub mod rejection;
pub mod send_message;
pub mod stream_message;

pub use conversations::{delete_conversation_handler, get_history_handler, list_conversations_handler};
pub use health::{health_handler, welcome_handler};
pub use rejection::{handle_rejection, ApiError};
pub use send_message::send_message_handler;
pub use stream_message::stream_message_handler;

/// Headers that keep browsers and proxies from caching a listing
pub(crate) fn no_store<T: warp::Reply>(reply: T) -> impl warp::Reply {
    let reply = warp::reply::with_header(reply, "Cache-Control", "no-store, no-cache, must-revalidate");
    let reply = warp::reply::with_header(reply, "Pragma", "no-cache");
    warp::reply::with_header(reply, "Expires", "0")
}
