use crate::message_store::{
    error::Result,
    types::{NewTurn, Turn},
};
use deadpool_postgres::Pool;

/// Append a turn to its conversation
///
/// # Arguments
///
/// * `pool` - Database connection pool
/// * `turn` - The turn to insert; its `created_at` becomes both timestamps
///
/// # Returns
///
/// Returns the stored turn, including its generated id
///
/// # Behavior
///
/// Turns are append-only: there is no upsert and nothing already stored is
/// touched. A single attempt is made; failures are returned, not retried.
///
/// # Errors
///
/// * `Error::ValidationError` - If the database rejects the role
/// * `Error::PoolError` / `Error::ConnectionError` - If no connection is available
/// * `Error::DatabaseError` - For other SQL errors
pub async fn insert_turn(pool: &Pool, turn: NewTurn) -> Result<Turn> {
    let conn = pool.get().await?;

    let turn = turn.into_turn();

    conn.execute(
        "INSERT INTO messages (id, conversation_id, role, content, created_at, updated_at) \
         VALUES ($1, $2, $3, $4, $5, $6)",
        &[
            &turn.id,
            &turn.conversation_id,
            &turn.role.as_str(),
            &turn.content,
            &turn.created_at,
            &turn.updated_at,
        ],
    )
    .await?;

    Ok(turn)
}
