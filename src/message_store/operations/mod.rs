pub mod delete;
pub mod query;
pub mod read;
pub mod write;

pub use delete::delete_conversation;
pub use query::list_conversations;
pub use read::find_turns_by_conversation;
pub use write::insert_turn;
