pub mod repository;
pub mod sqlite;

pub use repository::*;
pub use sqlite::*;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum DatabaseError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    #[error("Entity not found: {entity_type} with id {id}")]
    NotFound { entity_type: String, id: String },

    #[error("Invalid enum value for {field}: {value}")]
    InvalidEnum { field: String, value: String },

    #[error("A record with that {field} already exists")]
    Duplicate { field: String },

    #[error("Migration failed at version {version}: {reason}")]
    MigrationFailed { version: i64, reason: String },

    #[error("Constraint violated: {0}")]
    ConstraintViolation(String),
}

impl DatabaseError {
    /// Map a rusqlite UNIQUE-constraint failure to `Duplicate` naming the
    /// offending column, so the API can report the field. Other errors pass
    /// through unchanged.
    pub fn from_unique(err: rusqlite::Error, fields: &[&str]) -> Self {
        if let rusqlite::Error::SqliteFailure(e, Some(msg)) = &err {
            if e.code == rusqlite::ErrorCode::ConstraintViolation {
                for field in fields {
                    if msg.contains(&format!(".{field}")) {
                        return DatabaseError::Duplicate {
                            field: (*field).to_string(),
                        };
                    }
                }
            }
        }
        DatabaseError::Sqlite(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unique_violation_names_the_field() {
        let conn = sqlite::open_memory_database().unwrap();
        conn.execute(
            "INSERT INTO users (id, username, email, password_hash, role, date_joined)
             VALUES ('u1', '1234567890', 'a@clinic.test', 'x', 'manager', '2026-01-01T00:00:00Z')",
            [],
        )
        .unwrap();

        let err = conn
            .execute(
                "INSERT INTO users (id, username, email, password_hash, role, date_joined)
                 VALUES ('u2', '1234567890', 'b@clinic.test', 'x', 'manager', '2026-01-01T00:00:00Z')",
                [],
            )
            .unwrap_err();

        match DatabaseError::from_unique(err, &["username", "email"]) {
            DatabaseError::Duplicate { field } => assert_eq!(field, "username"),
            other => panic!("expected Duplicate, got {other:?}"),
        }
    }

    #[test]
    fn non_unique_errors_pass_through() {
        let err = rusqlite::Error::QueryReturnedNoRows;
        assert!(matches!(
            DatabaseError::from_unique(err, &["email"]),
            DatabaseError::Sqlite(_)
        ));
    }
}
