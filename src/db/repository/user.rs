use std::str::FromStr;

use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use uuid::Uuid;

use crate::db::DatabaseError;
use crate::models::*;

use super::doctor::insert_doctor;
use super::patient::insert_patient;

pub(crate) fn user_from_row(row: &Row<'_>) -> rusqlite::Result<(User, String)> {
    Ok((
        User {
            id: Uuid::parse_str(&row.get::<_, String>(0)?).unwrap_or_default(),
            username: row.get(1)?,
            email: row.get(2)?,
            role: Role::from_str(&row.get::<_, String>(4)?).unwrap_or(Role::Patient),
            date_joined: row
                .get::<_, String>(5)?
                .parse::<DateTime<Utc>>()
                .unwrap_or_default(),
            is_active: row.get::<_, i32>(6)? != 0,
            is_staff: row.get::<_, i32>(7)? != 0,
        },
        row.get(3)?,
    ))
}

const USER_COLUMNS: &str =
    "id, username, email, password_hash, role, date_joined, is_active, is_staff";

/// Create the account and its profile as one unit. Either both rows exist
/// afterwards or neither does.
pub fn create_identity(
    conn: &mut Connection,
    reg: &NewIdentity,
    password_hash: &str,
) -> Result<(User, Identity), DatabaseError> {
    let tx = conn.transaction()?;

    let user = User {
        id: Uuid::new_v4(),
        username: reg.user().username.clone(),
        email: reg.user().email.clone(),
        role: reg.role(),
        date_joined: Utc::now(),
        is_active: true,
        is_staff: reg.role() == Role::Manager,
    };

    tx.execute(
        "INSERT INTO users (id, username, email, password_hash, role, date_joined, is_active, is_staff)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
        params![
            user.id.to_string(),
            user.username,
            user.email,
            password_hash,
            user.role.as_str(),
            user.date_joined.to_rfc3339(),
            user.is_active as i32,
            user.is_staff as i32,
        ],
    )
    .map_err(|e| DatabaseError::from_unique(e, &["username", "email"]))?;

    let identity = match reg {
        NewIdentity::Manager { .. } => Identity::Manager,
        NewIdentity::Doctor { profile, .. } => {
            let doctor = Doctor {
                id: Uuid::new_v4(),
                user_id: user.id,
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                phone_number: profile.phone_number.clone(),
                mobile_number: profile.mobile_number.clone(),
                address: profile.address.clone(),
                birth_date: profile.birth_date,
                speciality: profile.speciality.clone(),
                bio: profile.bio.clone(),
                gender: profile.gender,
                avatar: crate::config::DEFAULT_AVATAR.to_string(),
            };
            insert_doctor(&tx, &doctor)?;
            Identity::Doctor(doctor)
        }
        NewIdentity::Patient { profile, .. } => {
            let patient = Patient {
                id: Uuid::new_v4(),
                user_id: user.id,
                first_name: profile.first_name.clone(),
                last_name: profile.last_name.clone(),
                mobile_number: profile.mobile_number.clone(),
                address: profile.address.clone(),
                birth_date: profile.birth_date,
                gender: profile.gender,
                avatar: crate::config::DEFAULT_AVATAR.to_string(),
            };
            insert_patient(&tx, &patient)?;
            Identity::Patient(patient)
        }
    };

    tx.commit()?;
    Ok((user, identity))
}

pub fn get_user(conn: &Connection, id: &Uuid) -> Result<User, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?1"))?;
    stmt.query_row(params![id.to_string()], user_from_row)
        .map(|(user, _)| user)
        .map_err(|e| match e {
            rusqlite::Error::QueryReturnedNoRows => DatabaseError::NotFound {
                entity_type: "user".into(),
                id: id.to_string(),
            },
            other => other.into(),
        })
}

/// Look up a user plus stored password hash for login. `None` when the
/// username is unknown, so login can fail without leaking which part was
/// wrong.
pub fn credentials_by_username(
    conn: &Connection,
    username: &str,
) -> Result<Option<(User, String)>, DatabaseError> {
    let mut stmt =
        conn.prepare(&format!("SELECT {USER_COLUMNS} FROM users WHERE username = ?1"))?;
    match stmt.query_row(params![username], user_from_row) {
        Ok(found) => Ok(Some(found)),
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e.into()),
    }
}

/// Resolve which profile the user carries.
pub fn load_identity(conn: &Connection, user: &User) -> Result<Identity, DatabaseError> {
    match user.role {
        Role::Manager => Ok(Identity::Manager),
        Role::Doctor => super::doctor::get_doctor_by_user(conn, &user.id).map(Identity::Doctor),
        Role::Patient => super::patient::get_patient_by_user(conn, &user.id).map(Identity::Patient),
    }
}
