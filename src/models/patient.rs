use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Gender;
use crate::validate;
use crate::validate::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
    /// Media reference, relative to the media dir.
    pub avatar: String,
}

/// Patient profile input. The avatar starts as the shared placeholder and is
/// never part of registration input.
#[derive(Debug, Clone, Deserialize)]
pub struct NewPatient {
    pub first_name: String,
    pub last_name: String,
    pub mobile_number: String,
    pub address: String,
    pub birth_date: NaiveDate,
    pub gender: Gender,
}

impl NewPatient {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate::name("first_name", &self.first_name)?;
        validate::name("last_name", &self.last_name)?;
        validate::mobile_number(&self.mobile_number)?;
        validate::address(&self.address)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewPatient {
        NewPatient {
            first_name: "Sara".into(),
            last_name: "Moradi".into(),
            mobile_number: "09123456789".into(),
            address: "Valiasr St 12, Tehran".into(),
            birth_date: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
            gender: Gender::Female,
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn bad_mobile_rejected_with_field() {
        let mut p = valid();
        p.mobile_number = "08123456789".into();
        assert_eq!(p.validate().unwrap_err().field, "mobile_number");
    }

    #[test]
    fn short_name_rejected() {
        let mut p = valid();
        p.first_name = "Sa".into();
        assert_eq!(p.validate().unwrap_err().field, "first_name");
    }

    #[test]
    fn short_address_rejected() {
        let mut p = valid();
        p.address = "Tehran".into();
        assert_eq!(p.validate().unwrap_err().field, "address");
    }
}
