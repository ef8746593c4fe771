use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, TransactionBehavior};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

use super::annotation;
use super::turn::{turn_from_row, TurnActionError};

/// Create the appointment for a turn, consuming the turn in the same
/// transaction.
///
/// Preconditions against the referenced turn, in order: a pending turn fails
/// with "turn not yet accepted"; a consumed turn fails with "turn already
/// has an appointment". Neither failure mutates anything.
///
/// The transaction is `Immediate`: the write lock is taken before the state
/// is read, so of two concurrent attempts one serializes after the other's
/// commit and fails the consumed check. "Turn consumed" and "appointment
/// exists" are never observable apart.
pub fn create_appointment(
    conn: &mut Connection,
    new: &NewAppointment,
) -> Result<Appointment, TurnActionError> {
    let tx = conn
        .transaction_with_behavior(TransactionBehavior::Immediate)
        .map_err(DatabaseError::from)?;

    let state: String = tx
        .query_row(
            "SELECT state FROM turns WHERE id = ?1",
            params![new.turn_id.to_string()],
            |row| row.get(0),
        )
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "turn".into(),
                id: new.turn_id.to_string(),
            },
            other => other.into(),
        })?;
    let consumed = TurnState::from_str(&state)
        .map_err(TurnActionError::Database)?
        .consume()?;

    tx.execute(
        "UPDATE turns SET state = ?1 WHERE id = ?2",
        params![consumed.as_str(), new.turn_id.to_string()],
    )
    .map_err(DatabaseError::from)?;

    let appointment = Appointment {
        id: Uuid::new_v4(),
        turn_id: new.turn_id,
        created_at: Utc::now(),
    };
    tx.execute(
        "INSERT INTO appointments (id, turn_id, created_at) VALUES (?1, ?2, ?3)",
        params![
            appointment.id.to_string(),
            appointment.turn_id.to_string(),
            appointment.created_at.to_rfc3339(),
        ],
    )
    .map_err(|e| TurnActionError::Database(map_reference_error(e)))?;

    attach(&tx, &appointment.id, "appointment_symptoms", "symptom_id", &new.symptom_ids)?;
    attach(&tx, &appointment.id, "appointment_diseases", "disease_id", &new.disease_ids)?;
    attach(&tx, &appointment.id, "appointment_advices", "advice_id", &new.advice_ids)?;
    attach(&tx, &appointment.id, "appointment_medicines", "medicine_id", &new.medicine_ids)?;

    tx.commit().map_err(DatabaseError::from)?;
    Ok(appointment)
}

fn attach(
    conn: &Connection,
    appointment_id: &Uuid,
    table: &str,
    column: &str,
    ids: &[Uuid],
) -> Result<(), TurnActionError> {
    let mut stmt = conn
        .prepare(&format!(
            "INSERT INTO {table} (appointment_id, {column}) VALUES (?1, ?2)"
        ))
        .map_err(DatabaseError::from)?;
    for id in ids {
        stmt.execute(params![appointment_id.to_string(), id.to_string()])
            .map_err(|e| TurnActionError::Database(map_reference_error(e)))?;
    }
    Ok(())
}

// A failed FK here means the caller referenced a record that does not
// exist; surface that as a constraint problem, not an internal error.
fn map_reference_error(err: rusqlite::Error) -> DatabaseError {
    if let rusqlite::Error::SqliteFailure(e, _) = &err {
        if e.code == rusqlite::ErrorCode::ConstraintViolation {
            return DatabaseError::ConstraintViolation(
                "referenced record does not exist".into(),
            );
        }
    }
    DatabaseError::Sqlite(err)
}

pub fn get_appointment(conn: &Connection, id: &Uuid) -> Result<Appointment, DatabaseError> {
    conn.query_row(
        "SELECT id, turn_id, created_at FROM appointments WHERE id = ?1",
        params![id.to_string()],
        appointment_from_row,
    )
    .map_err(|e| match e {
        rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
            entity_type: "appointment".into(),
            id: id.to_string(),
        },
        other => other.into(),
    })
}

fn appointment_from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Appointment> {
    Ok(Appointment {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        turn_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        created_at: row
            .get::<_, String>(2)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
    })
}

/// The recursive read shape: appointment with its turn and the full
/// annotation records embedded.
pub fn get_appointment_detail(
    conn: &Connection,
    id: &Uuid,
) -> Result<AppointmentDetail, DatabaseError> {
    let appointment = get_appointment(conn, id)?;
    let turn = conn
        .query_row(
            "SELECT id, patient_id, doctor_id, requested_at, state FROM turns WHERE id = ?1",
            params![appointment.turn_id.to_string()],
            turn_from_row,
        )
        .map_err(DatabaseError::from)?;

    Ok(AppointmentDetail {
        id: appointment.id,
        turn,
        created_at: appointment.created_at,
        symptoms: annotation::symptoms_for_appointment(conn, &appointment.id)?,
        diseases: annotation::diseases_for_appointment(conn, &appointment.id)?,
        advices: annotation::advices_for_appointment(conn, &appointment.id)?,
        medicines: annotation::medicines_for_appointment(conn, &appointment.id)?,
    })
}

pub fn list_appointments_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Appointment>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT a.id, a.turn_id, a.created_at
         FROM appointments a
         JOIN turns t ON t.id = a.turn_id
         WHERE t.doctor_id = ?1
         ORDER BY a.created_at DESC",
    )?;
    let rows = stmt.query_map(params![doctor_id.to_string()], appointment_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repository::testutil::{accepted_turn, clinic_fixture, record_symptom};
    use crate::db::repository::turn::{accept_turn, create_turn, get_turn};
    use crate::db::sqlite::open_memory_database;

    fn input(turn_id: Uuid) -> NewAppointment {
        NewAppointment {
            turn_id,
            symptom_ids: vec![],
            disease_ids: vec![],
            advice_ids: vec![],
            medicine_ids: vec![],
        }
    }

    #[test]
    fn pending_turn_fails_not_yet_accepted() {
        let mut conn = open_memory_database().unwrap();
        let clinic = clinic_fixture(&mut conn);
        let turn = create_turn(&conn, &clinic.patient.id, &clinic.doctor.id).unwrap();

        match create_appointment(&mut conn, &input(turn.id)) {
            Err(TurnActionError::State(TurnStateError::NotYetAccepted)) => {}
            other => panic!("expected NotYetAccepted, got {other:?}"),
        }
        // No mutation: the turn is still pending and no appointment exists.
        assert_eq!(get_turn(&conn, &turn.id).unwrap().state, TurnState::Pending);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn accepted_turn_succeeds_and_consumes() {
        let mut conn = open_memory_database().unwrap();
        let clinic = clinic_fixture(&mut conn);
        let turn = accepted_turn(&mut conn, &clinic);

        let appointment = create_appointment(&mut conn, &input(turn.id)).unwrap();
        assert_eq!(appointment.turn_id, turn.id);
        assert_eq!(get_turn(&conn, &turn.id).unwrap().state, TurnState::Consumed);
    }

    #[test]
    fn second_attempt_fails_already_visited() {
        let mut conn = open_memory_database().unwrap();
        let clinic = clinic_fixture(&mut conn);
        let turn = accepted_turn(&mut conn, &clinic);

        create_appointment(&mut conn, &input(turn.id)).unwrap();
        match create_appointment(&mut conn, &input(turn.id)) {
            Err(TurnActionError::State(TurnStateError::AlreadyVisited)) => {}
            other => panic!("expected AlreadyVisited, got {other:?}"),
        }
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 1);
    }

    #[test]
    fn unknown_turn_is_not_found() {
        let mut conn = open_memory_database().unwrap();
        match create_appointment(&mut conn, &input(Uuid::new_v4())) {
            Err(TurnActionError::Database(DatabaseError::NotFound { .. })) => {}
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn full_scenario_walk() {
        let mut conn = open_memory_database().unwrap();
        let clinic = clinic_fixture(&mut conn);
        let turn = create_turn(&conn, &clinic.patient.id, &clinic.doctor.id).unwrap();

        assert!(matches!(
            create_appointment(&mut conn, &input(turn.id)),
            Err(TurnActionError::State(TurnStateError::NotYetAccepted))
        ));

        accept_turn(&mut conn, &turn.id).unwrap();
        create_appointment(&mut conn, &input(turn.id)).unwrap();
        assert_eq!(get_turn(&conn, &turn.id).unwrap().state, TurnState::Consumed);

        assert!(matches!(
            create_appointment(&mut conn, &input(turn.id)),
            Err(TurnActionError::State(TurnStateError::AlreadyVisited))
        ));
    }

    #[test]
    fn annotations_attach_and_load_in_detail() {
        let mut conn = open_memory_database().unwrap();
        let clinic = clinic_fixture(&mut conn);
        let turn = accepted_turn(&mut conn, &clinic);
        let symptom = record_symptom(&conn, &clinic.doctor.id, "fever");

        let mut new = input(turn.id);
        new.symptom_ids.push(symptom.id);
        let appointment = create_appointment(&mut conn, &new).unwrap();

        let detail = get_appointment_detail(&conn, &appointment.id).unwrap();
        assert_eq!(detail.turn.id, turn.id);
        assert_eq!(detail.symptoms.len(), 1);
        assert_eq!(detail.symptoms[0].name, "fever");
        assert!(detail.medicines.is_empty());
    }

    #[test]
    fn unknown_annotation_reference_rolls_everything_back() {
        let mut conn = open_memory_database().unwrap();
        let clinic = clinic_fixture(&mut conn);
        let turn = accepted_turn(&mut conn, &clinic);

        let mut new = input(turn.id);
        new.symptom_ids.push(Uuid::new_v4());
        match create_appointment(&mut conn, &new) {
            Err(TurnActionError::Database(DatabaseError::ConstraintViolation(_))) => {}
            other => panic!("expected ConstraintViolation, got {other:?}"),
        }
        // The turn must not have been consumed by the failed attempt.
        assert_eq!(get_turn(&conn, &turn.id).unwrap().state, TurnState::Accepted);
        let count: i64 = conn
            .query_row("SELECT COUNT(*) FROM appointments", [], |r| r.get(0))
            .unwrap();
        assert_eq!(count, 0);
    }

    #[test]
    fn concurrent_attempts_one_wins() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");

        let mut conn = crate::db::sqlite::open_database(&path).unwrap();
        let clinic = clinic_fixture(&mut conn);
        let turn = accepted_turn(&mut conn, &clinic);
        drop(conn);

        let mut handles = Vec::new();
        for _ in 0..4 {
            let path = path.clone();
            let turn_id = turn.id;
            handles.push(std::thread::spawn(move || {
                let mut conn = crate::db::sqlite::open_database(&path).unwrap();
                create_appointment(&mut conn, &input(turn_id)).is_ok()
            }));
        }

        let successes = handles
            .into_iter()
            .map(|h| h.join().unwrap())
            .filter(|ok| *ok)
            .count();
        assert_eq!(successes, 1);

        let conn = crate::db::sqlite::open_database(&path).unwrap();
        let count: i64 = conn
            .query_row(
                "SELECT COUNT(*) FROM appointments WHERE turn_id = ?1",
                params![turn.id.to_string()],
                |r| r.get(0),
            )
            .unwrap();
        assert_eq!(count, 1);
    }
}
