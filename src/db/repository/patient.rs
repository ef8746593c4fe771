use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

const PATIENT_COLUMNS: &str =
    "id, user_id, first_name, last_name, mobile_number, address, birth_date, gender, avatar";

pub(crate) fn patient_from_row(row: &Row<'_>) -> rusqlite::Result<Patient> {
    Ok(Patient {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        user_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        mobile_number: row.get(4)?,
        address: row.get(5)?,
        birth_date: NaiveDate::parse_from_str(&row.get::<_, String>(6)?, "%Y-%m-%d")
            .unwrap_or_default(),
        gender: Gender::from_str(&row.get::<_, String>(7)?).unwrap_or(Gender::Female),
        avatar: row.get(8)?,
    })
}

pub(crate) fn insert_patient(conn: &Connection, patient: &Patient) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO patients (id, user_id, first_name, last_name, mobile_number,
                               address, birth_date, gender, avatar)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
        params![
            patient.id.to_string(),
            patient.user_id.to_string(),
            patient.first_name,
            patient.last_name,
            patient.mobile_number,
            patient.address,
            patient.birth_date.to_string(),
            patient.gender.as_str(),
            patient.avatar,
        ],
    )?;
    Ok(())
}

pub fn get_patient(conn: &Connection, id: &Uuid) -> Result<Patient, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {PATIENT_COLUMNS} FROM patients WHERE id = ?1"))?;
    stmt.query_row(params![id.to_string()], patient_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "patient".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

pub fn get_patient_by_user(conn: &Connection, user_id: &Uuid) -> Result<Patient, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {PATIENT_COLUMNS} FROM patients WHERE user_id = ?1"
    ))?;
    stmt.query_row(params![user_id.to_string()], patient_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "patient profile".into(),
                id: user_id.to_string(),
            },
            other => other.into(),
        })
}

pub fn update_patient_avatar(
    conn: &Connection,
    id: &Uuid,
    avatar: &str,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE patients SET avatar = ?1 WHERE id = ?2",
        params![avatar, id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "patient".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
