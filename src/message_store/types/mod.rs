pub mod conversation;
pub mod turn;

pub use conversation::ConversationSummary;
pub use turn::{now, NewTurn, Role, Turn};
