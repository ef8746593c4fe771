use chrono::Utc;
use rusqlite::{params, Connection, OptionalExtension};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::User;

use super::user::user_from_row;

/// Persist a login session. Only the token hash is stored; the bearer token
/// itself never touches the database.
pub fn insert_session(
    conn: &Connection,
    token_hash: &str,
    user_id: &Uuid,
) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO sessions (token_hash, user_id, created_at) VALUES (?1, ?2, ?3)",
        params![token_hash, user_id.to_string(), Utc::now().to_rfc3339()],
    )?;
    Ok(())
}

/// Resolve a token hash to its active user, or `None` for unknown tokens
/// and deactivated accounts.
pub fn user_for_token(
    conn: &Connection,
    token_hash: &str,
) -> Result<Option<User>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT u.id, u.username, u.email, u.password_hash, u.role, u.date_joined,
                u.is_active, u.is_staff
         FROM users u
         JOIN sessions s ON s.user_id = u.id
         WHERE s.token_hash = ?1 AND u.is_active = 1",
    )?;
    let found = stmt
        .query_row(params![token_hash], user_from_row)
        .optional()?;
    Ok(found.map(|(user, _)| user))
}

pub fn delete_session(conn: &Connection, token_hash: &str) -> Result<(), DatabaseError> {
    conn.execute(
        "DELETE FROM sessions WHERE token_hash = ?1",
        params![token_hash],
    )?;
    Ok(())
}
