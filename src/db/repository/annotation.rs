//! Persistence for the four doctor-authored annotation kinds. The shapes
//! only differ in their free-text columns, so each kind gets the same three
//! operations: insert, list by author, fetch for an appointment.

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

fn symptom_from_row(row: &Row<'_>) -> rusqlite::Result<Symptom> {
    Ok(Symptom {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        doctor_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        name: row.get(2)?,
        description: row.get(3)?,
        recorded_at: row
            .get::<_, String>(4)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
    })
}

fn disease_from_row(row: &Row<'_>) -> rusqlite::Result<Disease> {
    Ok(Disease {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        doctor_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        name: row.get(2)?,
        description: row.get(3)?,
        recorded_at: row
            .get::<_, String>(4)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
    })
}

fn advice_from_row(row: &Row<'_>) -> rusqlite::Result<Advice> {
    Ok(Advice {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        doctor_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        text: row.get(2)?,
        recorded_at: row
            .get::<_, String>(3)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
    })
}

fn medicine_from_row(row: &Row<'_>) -> rusqlite::Result<Medicine> {
    Ok(Medicine {
        id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
        doctor_id: Uuid::parse_str(&row.get::<_, String>(1)?).unwrap_or_default(),
        name: row.get(2)?,
        dosage: row.get(3)?,
        recorded_at: row
            .get::<_, String>(4)?
            .parse::<DateTime<Utc>>()
            .unwrap_or_default(),
    })
}

pub fn insert_symptom(conn: &Connection, symptom: &Symptom) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO symptoms (id, doctor_id, name, description, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            symptom.id.to_string(),
            symptom.doctor_id.to_string(),
            symptom.name,
            symptom.description,
            symptom.recorded_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_disease(conn: &Connection, disease: &Disease) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO diseases (id, doctor_id, name, description, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            disease.id.to_string(),
            disease.doctor_id.to_string(),
            disease.name,
            disease.description,
            disease.recorded_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_advice(conn: &Connection, advice: &Advice) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO advices (id, doctor_id, text, recorded_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            advice.id.to_string(),
            advice.doctor_id.to_string(),
            advice.text,
            advice.recorded_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn insert_medicine(conn: &Connection, medicine: &Medicine) -> Result<(), DatabaseError> {
    conn.execute(
        "INSERT INTO medicines (id, doctor_id, name, dosage, recorded_at)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![
            medicine.id.to_string(),
            medicine.doctor_id.to_string(),
            medicine.name,
            medicine.dosage,
            medicine.recorded_at.to_rfc3339(),
        ],
    )?;
    Ok(())
}

pub fn list_symptoms_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Symptom>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, doctor_id, name, description, recorded_at
         FROM symptoms WHERE doctor_id = ?1 ORDER BY recorded_at DESC",
    )?;
    let rows = stmt.query_map(params![doctor_id.to_string()], symptom_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_diseases_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Disease>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, doctor_id, name, description, recorded_at
         FROM diseases WHERE doctor_id = ?1 ORDER BY recorded_at DESC",
    )?;
    let rows = stmt.query_map(params![doctor_id.to_string()], disease_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_advices_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Advice>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, doctor_id, text, recorded_at
         FROM advices WHERE doctor_id = ?1 ORDER BY recorded_at DESC",
    )?;
    let rows = stmt.query_map(params![doctor_id.to_string()], advice_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn list_medicines_for_doctor(
    conn: &Connection,
    doctor_id: &Uuid,
) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT id, doctor_id, name, dosage, recorded_at
         FROM medicines WHERE doctor_id = ?1 ORDER BY recorded_at DESC",
    )?;
    let rows = stmt.query_map(params![doctor_id.to_string()], medicine_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn symptoms_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<Symptom>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT s.id, s.doctor_id, s.name, s.description, s.recorded_at
         FROM symptoms s
         JOIN appointment_symptoms a ON a.symptom_id = s.id
         WHERE a.appointment_id = ?1",
    )?;
    let rows = stmt.query_map(params![appointment_id.to_string()], symptom_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn diseases_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<Disease>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT d.id, d.doctor_id, d.name, d.description, d.recorded_at
         FROM diseases d
         JOIN appointment_diseases a ON a.disease_id = d.id
         WHERE a.appointment_id = ?1",
    )?;
    let rows = stmt.query_map(params![appointment_id.to_string()], disease_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn advices_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<Advice>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT v.id, v.doctor_id, v.text, v.recorded_at
         FROM advices v
         JOIN appointment_advices a ON a.advice_id = v.id
         WHERE a.appointment_id = ?1",
    )?;
    let rows = stmt.query_map(params![appointment_id.to_string()], advice_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}

pub fn medicines_for_appointment(
    conn: &Connection,
    appointment_id: &Uuid,
) -> Result<Vec<Medicine>, DatabaseError> {
    let mut stmt = conn.prepare(
        "SELECT m.id, m.doctor_id, m.name, m.dosage, m.recorded_at
         FROM medicines m
         JOIN appointment_medicines a ON a.medicine_id = m.id
         WHERE a.appointment_id = ?1",
    )?;
    let rows = stmt.query_map(params![appointment_id.to_string()], medicine_from_row)?;
    rows.map(|r| r.map_err(DatabaseError::from)).collect()
}
