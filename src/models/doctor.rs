use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::enums::Gender;
use crate::validate;
use crate::validate::FieldError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub id: Uuid,
    pub user_id: Uuid,
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    pub mobile_number: Option<String>,
    pub address: String,
    pub birth_date: NaiveDate,
    pub speciality: String,
    pub bio: Option<String>,
    pub gender: Gender,
    /// Media reference, relative to the media dir.
    pub avatar: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDoctor {
    pub first_name: String,
    pub last_name: String,
    pub phone_number: String,
    #[serde(default)]
    pub mobile_number: Option<String>,
    pub address: String,
    pub birth_date: NaiveDate,
    pub speciality: String,
    #[serde(default)]
    pub bio: Option<String>,
    pub gender: Gender,
}

impl NewDoctor {
    pub fn validate(&self) -> Result<(), FieldError> {
        validate::name("first_name", &self.first_name)?;
        validate::name("last_name", &self.last_name)?;
        validate::phone_number(&self.phone_number)?;
        if let Some(mobile) = &self.mobile_number {
            validate::mobile_number(mobile)?;
        }
        validate::address(&self.address)?;
        validate::speciality(&self.speciality)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid() -> NewDoctor {
        NewDoctor {
            first_name: "Reza".into(),
            last_name: "Karimi".into(),
            phone_number: "021-12345678".into(),
            mobile_number: None,
            address: "Enghelab Ave 4, Tehran".into(),
            birth_date: NaiveDate::from_ymd_opt(1975, 9, 20).unwrap(),
            speciality: "cardiology".into(),
            bio: None,
            gender: Gender::Male,
        }
    }

    #[test]
    fn valid_profile_passes() {
        assert!(valid().validate().is_ok());
    }

    #[test]
    fn bad_phone_rejected_with_field() {
        let mut d = valid();
        d.phone_number = "0211234567".into();
        assert_eq!(d.validate().unwrap_err().field, "phone_number");
    }

    #[test]
    fn mobile_optional_but_checked_when_present() {
        let mut d = valid();
        d.mobile_number = Some("09123456789".into());
        assert!(d.validate().is_ok());

        d.mobile_number = Some("12345".into());
        assert_eq!(d.validate().unwrap_err().field, "mobile_number");
    }

    #[test]
    fn short_speciality_rejected() {
        let mut d = valid();
        d.speciality = "gp".into();
        assert_eq!(d.validate().unwrap_err().field, "speciality");
    }
}
