use chrono::NaiveDate;
use rusqlite::{params, Connection, Row};
use std::str::FromStr;
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

const DOCTOR_COLUMNS: &str = "id, user_id, first_name, last_name, phone_number, mobile_number,
                              address, birth_date, speciality, bio, gender, avatar";

pub(crate) fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<Doctor> {
    Ok(Doctor {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        user_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        first_name: row.get(2)?,
        last_name: row.get(3)?,
        phone_number: row.get(4)?,
        mobile_number: row.get(5)?,
        address: row.get(6)?,
        birth_date: NaiveDate::parse_from_str(&row.get::<_, String>(7)?, "%Y-%m-%d")
            .unwrap_or_default(),
        speciality: row.get(8)?,
        bio: row.get(9)?,
        gender: Gender::from_str(&row.get::<_, String>(10)?).unwrap_or(Gender::Male),
        avatar: row.get(11)?,
    })
}

pub(crate) fn insert_doctor(conn: &Connection, doctor: &Doctor) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO doctors (id, user_id, first_name, last_name, phone_number, mobile_number,
                              address, birth_date, speciality, bio, gender, avatar)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12)",
        params![
            doctor.id.to_string(),
            doctor.user_id.to_string(),
            doctor.first_name,
            doctor.last_name,
            doctor.phone_number,
            doctor.mobile_number,
            doctor.address,
            doctor.birth_date.to_string(),
            doctor.speciality,
            doctor.bio,
            doctor.gender.as_str(),
            doctor.avatar,
        ],
    )?;
    Ok(())
}

pub fn get_doctor(conn: &Connection, id: &Uuid) -> Result<Doctor, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {DOCTOR_COLUMNS} FROM doctors WHERE id = ?1"))?;
    stmt.query_row(params![id.to_string()], doctor_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "doctor".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

pub fn get_doctor_by_user(conn: &Connection, user_id: &Uuid) -> Result<Doctor, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors WHERE user_id = ?1"
    ))?;
    stmt.query_row(params![user_id.to_string()], doctor_from_row)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "doctor profile".into(),
                id: user_id.to_string(),
            },
            other => other.into(),
        })
}

pub fn list_doctors(conn: &Connection) -> Result<Vec<Doctor>, DatabaseError> {
    let mut stmt = conn.prepare(&format!(
        "SELECT {DOCTOR_COLUMNS} FROM doctors ORDER BY last_name, first_name"
    ))?;
    let rows = stmt.query_map([], doctor_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn update_doctor_avatar(
    conn: &Connection,
    id: &Uuid,
    avatar: &str,
) -> Result<(), DatabaseError> {
    let changed = conn.execute(
        "UPDATE doctors SET avatar = ?1 WHERE id = ?2",
        params![avatar, id.to_string()],
    )?;
    if changed == 0 {
        return Err(DatabaseError::NotFound {
            entity_type: "doctor".into(),
            id: id.to_string(),
        });
    }
    Ok(())
}
