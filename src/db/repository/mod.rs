pub mod annotation;
pub mod appointment;
pub mod doctor;
pub mod patient;
pub mod session;
pub mod turn;
pub mod user;

#[cfg(test)]
pub(crate) mod testutil {
    //! Shared fixtures for repository and API tests: a registered doctor,
    //! a registered patient, and turns in known states.

    use chrono::{NaiveDate, Utc};
    use rusqlite::Connection;
    use uuid::Uuid;

    use crate::models::*;

    use super::annotation::insert_symptom;
    use super::turn::{accept_turn, create_turn};
    use super::user::create_identity;

    pub struct ClinicFixture {
        pub doctor: Doctor,
        pub patient: Patient,
    }

    pub fn register_doctor(conn: &mut Connection, username: &str, email: &str) -> Doctor {
        let reg = NewIdentity::Doctor {
            user: NewUser {
                username: username.into(),
                email: email.into(),
                password: "secret-pw".into(),
            },
            profile: NewDoctor {
                first_name: "Reza".into(),
                last_name: "Karimi".into(),
                phone_number: "021-12345678".into(),
                mobile_number: None,
                address: "Enghelab Ave 4, Tehran".into(),
                birth_date: NaiveDate::from_ymd_opt(1975, 9, 20).unwrap(),
                speciality: "cardiology".into(),
                bio: None,
                gender: Gender::Male,
            },
        };
        match create_identity(conn, &reg, "hash").unwrap() {
            (_, Identity::Doctor(doctor)) => doctor,
            _ => unreachable!(),
        }
    }

    pub fn register_patient(conn: &mut Connection, username: &str, email: &str) -> Patient {
        let reg = NewIdentity::Patient {
            user: NewUser {
                username: username.into(),
                email: email.into(),
                password: "secret-pw".into(),
            },
            profile: NewPatient {
                first_name: "Sara".into(),
                last_name: "Moradi".into(),
                mobile_number: "09123456789".into(),
                address: "Valiasr St 12, Tehran".into(),
                birth_date: NaiveDate::from_ymd_opt(1990, 4, 2).unwrap(),
                gender: Gender::Female,
            },
        };
        match create_identity(conn, &reg, "hash").unwrap() {
            (_, Identity::Patient(patient)) => patient,
            _ => unreachable!(),
        }
    }

    pub fn clinic_fixture(conn: &mut Connection) -> ClinicFixture {
        ClinicFixture {
            doctor: register_doctor(conn, "1111111111", "doc@clinic.test"),
            patient: register_patient(conn, "2222222222", "pat@clinic.test"),
        }
    }

    pub fn accepted_turn(conn: &mut Connection, clinic: &ClinicFixture) -> Turn {
        let turn = create_turn(conn, &clinic.patient.id, &clinic.doctor.id).unwrap();
        accept_turn(conn, &turn.id).unwrap()
    }

    pub fn record_symptom(conn: &Connection, doctor_id: &Uuid, name: &str) -> Symptom {
        let symptom = Symptom {
            id: Uuid::new_v4(),
            doctor_id: *doctor_id,
            name: name.into(),
            description: None,
            recorded_at: Utc::now(),
        };
        insert_symptom(conn, &symptom).unwrap();
        symptom
    }
}
