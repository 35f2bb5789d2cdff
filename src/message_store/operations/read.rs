use crate::message_store::{
    error::{Error, Result},
    types::{Role, Turn},
};
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;
use uuid::Uuid;

/// Retrieve every turn of a conversation in ascending creation order
///
/// Turns stamped with the same time are returned in insertion order.
/// An unknown conversation yields an empty list, not an error.
pub async fn find_turns_by_conversation(pool: &Pool, conversation_id: &str) -> Result<Vec<Turn>> {
    let conn = pool.get().await?;

    let rows = conn
        .query(
            "SELECT id, conversation_id, role, content, created_at, updated_at \
             FROM messages \
             WHERE conversation_id = $1 \
             ORDER BY created_at ASC, seq ASC",
            &[&conversation_id],
        )
        .await?;

    rows.iter().map(parse_turn_row).collect()
}

/// Parse a turn row from the database
pub(crate) fn parse_turn_row(row: &Row) -> Result<Turn> {
    let id: Uuid = row.try_get("id")?;
    let conversation_id: String = row.try_get("conversation_id")?;
    let role: String = row.try_get("role")?;
    let content: String = row.try_get("content")?;
    let created_at: DateTime<Utc> = row.try_get("created_at")?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at")?;

    let role = role
        .parse::<Role>()
        .map_err(|e| Error::DatabaseError(format!("Invalid role in database: {}", e)))?;

    Ok(Turn {
        id,
        conversation_id,
        role,
        content,
        created_at,
        updated_at,
    })
}
