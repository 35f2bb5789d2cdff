use deadpool_postgres::Pool;
use tracing::debug;

use crate::message_store::error::Result;

/// Table and index backing the message store
///
/// `seq` only exists to break ties between turns stamped in the same microsecond.
pub const SCHEMA_SQL: &str = r#"
CREATE TABLE IF NOT EXISTS messages (
    id              UUID PRIMARY KEY,
    seq             BIGSERIAL NOT NULL,
    conversation_id TEXT NOT NULL,
    role            TEXT NOT NULL CHECK (role IN ('system', 'user', 'assistant')),
    content         TEXT NOT NULL,
    created_at      TIMESTAMPTZ NOT NULL,
    updated_at      TIMESTAMPTZ NOT NULL
);

CREATE INDEX IF NOT EXISTS messages_conversation_order_idx
    ON messages (conversation_id, created_at, seq);
"#;

/// Create the messages table and its index if they don't exist yet
pub async fn ensure_schema(pool: &Pool) -> Result<()> {
    let conn = pool.get().await?;
    conn.batch_execute(SCHEMA_SQL).await?;
    debug!("message store schema is in place");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schema_is_idempotent_sql() {
        assert!(SCHEMA_SQL.contains("CREATE TABLE IF NOT EXISTS messages"));
        assert!(SCHEMA_SQL.contains("CREATE INDEX IF NOT EXISTS"));
    }

    #[test]
    fn test_schema_restricts_roles() {
        assert!(SCHEMA_SQL.contains("'system', 'user', 'assistant'"));
    }
}
