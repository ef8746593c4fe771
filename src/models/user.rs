use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::doctor::{Doctor, NewDoctor};
use super::enums::Role;
use super::patient::{NewPatient, Patient};
use crate::validate;
use crate::validate::FieldError;

/// Identity record. The password hash never leaves the store and is not a
/// field here; login reads it directly in the repository.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    pub username: String,
    pub email: String,
    pub role: Role,
    pub date_joined: DateTime<Utc>,
    pub is_active: bool,
    pub is_staff: bool,
}

/// What a user *is*: managers carry no profile, doctors and patients carry
/// exactly one. Loading an identity can never observe a user with both
/// profiles or a doctor without one.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum Identity {
    Manager,
    Doctor(Doctor),
    Patient(Patient),
}

impl Identity {
    pub fn role(&self) -> Role {
        match self {
            Identity::Manager => Role::Manager,
            Identity::Doctor(_) => Role::Doctor,
            Identity::Patient(_) => Role::Patient,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password: String,
}

/// Registration input. The role tag selects which profile fields must
/// accompany the account, so "both profiles" and "doctor with no profile"
/// cannot be expressed by any payload.
#[derive(Debug, Clone, Deserialize)]
#[serde(tag = "role", rename_all = "lowercase")]
pub enum NewIdentity {
    Manager {
        #[serde(flatten)]
        user: NewUser,
    },
    Doctor {
        #[serde(flatten)]
        user: NewUser,
        profile: NewDoctor,
    },
    Patient {
        #[serde(flatten)]
        user: NewUser,
        profile: NewPatient,
    },
}

impl NewIdentity {
    pub fn user(&self) -> &NewUser {
        match self {
            NewIdentity::Manager { user }
            | NewIdentity::Doctor { user, .. }
            | NewIdentity::Patient { user, .. } => user,
        }
    }

    pub fn role(&self) -> Role {
        match self {
            NewIdentity::Manager { .. } => Role::Manager,
            NewIdentity::Doctor { .. } => Role::Doctor,
            NewIdentity::Patient { .. } => Role::Patient,
        }
    }

    /// Field-shape checks for the account and its profile.
    pub fn validate(&self) -> Result<(), FieldError> {
        let user = self.user();
        validate::username(&user.username)?;
        validate::email(&user.email)?;
        match self {
            NewIdentity::Manager { .. } => Ok(()),
            NewIdentity::Doctor { profile, .. } => profile.validate(),
            NewIdentity::Patient { profile, .. } => profile.validate(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_tag_selects_profile_shape() {
        let payload = serde_json::json!({
            "role": "patient",
            "username": "1234567890",
            "email": "sara@clinic.test",
            "password": "secret-pw",
            "profile": {
                "first_name": "Sara",
                "last_name": "Moradi",
                "mobile_number": "09123456789",
                "address": "Valiasr St 12, Tehran",
                "birth_date": "1990-04-02",
                "gender": "female"
            }
        });
        let reg: NewIdentity = serde_json::from_value(payload).unwrap();
        assert_eq!(reg.role(), Role::Patient);
        assert!(reg.validate().is_ok());
    }

    #[test]
    fn manager_needs_no_profile() {
        let payload = serde_json::json!({
            "role": "manager",
            "username": "1112223334",
            "email": "admin@clinic.test",
            "password": "secret-pw"
        });
        let reg: NewIdentity = serde_json::from_value(payload).unwrap();
        assert_eq!(reg.role(), Role::Manager);
        assert!(reg.validate().is_ok());
    }

    #[test]
    fn doctor_without_profile_is_unrepresentable() {
        let payload = serde_json::json!({
            "role": "doctor",
            "username": "1234567890",
            "email": "reza@clinic.test",
            "password": "secret-pw"
        });
        assert!(serde_json::from_value::<NewIdentity>(payload).is_err());
    }

    #[test]
    fn validation_reports_username_field() {
        let payload = serde_json::json!({
            "role": "manager",
            "username": "12345",
            "email": "admin@clinic.test",
            "password": "secret-pw"
        });
        let reg: NewIdentity = serde_json::from_value(payload).unwrap();
        assert_eq!(reg.validate().unwrap_err().field, "username");
    }
}
