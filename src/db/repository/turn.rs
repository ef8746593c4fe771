use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row, TransactionBehavior};
use thiserror::Error;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

/// A turn operation failed either on its state precondition or in the store.
#[derive(Debug, Error)]
pub enum TurnActionError {
    #[error(transparent)]
    State(#[from] TurnStateError),
    #[error(transparent)]
    Database(#[from] DatabaseError),
}

pub(crate) fn turn_from_row(row: &Row<'_>) -> rusqlite::Result<Turn> {
    Ok(Turn {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        patient_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        doctor_id: Uuid::parse_str(&row.get::<_, String>(2)?).unwrap_or_default(),
        requested_at: row
            .get::<_, String>(3)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
        state: TurnState::from_str(&row.get::<_, String>(4)?).unwrap_or(TurnState::Pending),
    })
}

const TURN_COLUMNS: &str = "id, patient_id, doctor_id, requested_at, state";

/// Create a pending turn for a patient. State always starts at `pending`
/// regardless of anything the caller sent.
pub fn create_turn(
    conn: &Connection,
    patient_id: &Uuid,
    doctor_id: &Uuid,
) -> Result<Turn, DatabaseError> {
    let turn = Turn {
        id: Uuid::new_v4(),
        patient_id: *patient_id,
        doctor_id: *doctor_id,
        requested_at: Utc::now(),
        state: TurnState::Pending,
    };
    conn.execute(
        "INSERT INTO turns (id, patient_id, doctor_id, requested_at, state)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            turn.id.to_string(),
            turn.patient_id.to_string(),
            turn.doctor_id.to_string(),
            turn.requested_at.to_rfc3339(),
            turn.state.as_str(),
        ],
    )?;
    Ok(turn)
}

pub fn get_turn(conn: &Connection, id: &Uuid) -> Result<Turn, DatabaseError> {
    let mut stmt = conn.prepare(&format!("SELECT {TURN_COLUMNS} FROM turns WHERE id = ?1"))?;
    stmt.query_row(params![id.to_string()], turn_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "turn".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

pub fn list_turns_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Turn>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TURN_COLUMNS} FROM turns WHERE doctor_id = ?1 ORDER BY requested_at"
    ))?;
    let rows = stmt.query_map(params![doctor_id.to_string()], turn_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_turns_for_patient(
    conn: &Connection,
    patient_id: &Uuid,
) -> Result<Vec<Turn>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {TURN_COLUMNS} FROM turns WHERE patient_id = ?1 ORDER BY requested_at"
    ))?;
    let rows = stmt.query_map(params![patient_id.to_string()], turn_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

/// Doctor accepts a pending turn. Runs under an immediate transaction so the
/// state check and the update see the same committed row even with
/// concurrent writers.
pub fn accept_turn(conn: &mut Connection, id: &Uuid) -> Result<Turn, TurnActionError> {
    let tx = conn.transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(DatabaseError::from)?;

    let mut turn = {
        let mut stmt = tx
            .prepare(&format!("SELECT {TURN_COLUMNS} FROM turns WHERE id = ?1"))
            .map_err(DatabaseError::from)?;
        stmt.query_row(params![id.to_string()], turn_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                    entity_type: "turn".into(),
                    id: id.to_string(),
                },
                other => other.into(),
            })?
    };

    turn.state = turn.state.accept()?;

    tx.execute(
        "UPDATE turns SET state = ?1 WHERE id = ?2",
        params![turn.state.as_str(), turn.id.to_string()],
    )
    .map_err(DatabaseError::from)?;
    tx.commit().map_err(DatabaseError::from)?;
    Ok(turn)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::testutil::{register_doctor, register_patient};
    use crate::db::sqlite::open_memory_database;

    #[test]
    fn create_starts_pending() {
        let mut conn = open_memory_database().unwrap();
        let doctor = register_doctor(&mut conn, "1111111111", "doc@clinic.test");
        let patient = register_patient(&mut conn, "2222222222", "pat@clinic.test");

        let turn = create_turn(&conn, &patient.id, &doctor.id).unwrap();
        assert_eq!(turn.state, TurnState::Pending);

        let reloaded = get_turn(&conn, &turn.id).unwrap();
        assert_eq!(reloaded.state, TurnState::Pending);
        assert_eq!(reloaded.patient_id, patient.id);
    }

    #[test]
    fn accept_moves_to_accepted_once() {
        let mut conn = open_memory_database().unwrap();
        let doctor = register_doctor(&mut conn, "1111111111", "doc@clinic.test");
        let patient = register_patient(&mut conn, "2222222222", "pat@clinic.test");
        let turn = create_turn(&conn, &patient.id, &doctor.id).unwrap();

        let accepted = accept_turn(&mut conn, &turn.id).unwrap();
        assert_eq!(accepted.state, TurnState::Accepted);

        match accept_turn(&mut conn, &turn.id) {
            Err(TurnActionError::State(TurnStateError::AlreadyAccepted)) => {}
            other => panic!("expected AlreadyAccepted, got {other:?}"),
        }
    }

    #[test]
    fn accept_unknown_turn_is_not_found() {
        let mut conn = open_memory_database().unwrap();
        match accept_turn(&mut conn, &Uuid::new_v4()) {
            Err(TurnActionError::Database(DatabaseError::NotFound { .. })) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn lists_are_scoped() {
        let mut conn = open_memory_database().unwrap();
        let doctor = register_doctor(&mut conn, "1111111111", "doc@clinic.test");
        let other = register_doctor(&mut conn, "3333333333", "doc2@clinic.test");
        let patient = register_patient(&mut conn, "2222222222", "pat@clinic.test");

        create_turn(&conn, &patient.id, &doctor.id).unwrap();
        create_turn(&conn, &patient.id, &other.id).unwrap();

        assert_eq!(list_turns_for_doctor(&conn, &doctor.id).unwrap().len(), 1);
        assert_eq!(list_turns_for_patient(&conn, &patient.id).unwrap().len(), 2);
    }
}
