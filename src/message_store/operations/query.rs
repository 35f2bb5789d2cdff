use crate::message_store::{
    error::{Error, Result},
    types::{ConversationSummary, Role},
};
use chrono::{DateTime, Utc};
use deadpool_postgres::Pool;
use tokio_postgres::Row;

/// One grouped pass over the table; `seq` keeps first/last stable under equal timestamps
const LIST_CONVERSATIONS_SQL: &str = r#"
SELECT
    conversation_id,
    (array_agg(content ORDER BY created_at DESC, seq DESC))[1] AS last_message,
    (array_agg(role ORDER BY created_at DESC, seq DESC))[1]    AS last_message_role,
    MAX(created_at)                                            AS last_message_time,
    COUNT(*)                                                   AS message_count,
    (array_agg(content ORDER BY created_at ASC, seq ASC))[1]   AS first_message
FROM messages
GROUP BY conversation_id
ORDER BY last_message_time DESC, conversation_id ASC
"#;

/// Summarize every conversation, most recently active first
///
/// # Returns
///
/// One `ConversationSummary` per distinct conversation id. The `last_*`
/// fields describe the newest turn and `first_message` the oldest one.
pub async fn list_conversations(pool: &Pool) -> Result<Vec<ConversationSummary>> {
    let conn = pool.get().await?;

    let rows = conn.query(LIST_CONVERSATIONS_SQL, &[]).await?;

    rows.iter().map(parse_summary_row).collect()
}

fn parse_summary_row(row: &Row) -> Result<ConversationSummary> {
    let role: String = row.try_get("last_message_role")?;
    let last_message_role = role
        .parse::<Role>()
        .map_err(|e| Error::DatabaseError(format!("Invalid role in database: {}", e)))?;
    let last_message_time: DateTime<Utc> = row.try_get("last_message_time")?;

    Ok(ConversationSummary {
        conversation_id: row.try_get("conversation_id")?,
        last_message: row.try_get("last_message")?,
        last_message_role,
        last_message_time,
        message_count: row.try_get("message_count")?,
        first_message: row.try_get("first_message")?,
    })
}
