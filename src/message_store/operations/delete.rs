use crate::message_store::error::Result;
use deadpool_postgres::Pool;

/// Remove every turn of a conversation
///
/// Returns the number of deleted turns; zero means the conversation did not exist.
pub async fn delete_conversation(pool: &Pool, conversation_id: &str) -> Result<u64> {
    let conn = pool.get().await?;

    let deleted = conn
        .execute(
            "DELETE FROM messages WHERE conversation_id = $1",
            &[&conversation_id],
        )
        .await?;

    Ok(deleted)
}
