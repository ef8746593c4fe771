//! Doctor-authored clinical annotations: symptoms, diseases, advice,
//! medicines. All four share the same ownership rule: the doctor reference
//! is stamped from the authenticated caller and is absent from the input
//! types, so authoring under another doctor's name cannot be expressed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Symptom {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewSymptom {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Disease {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub name: String,
    pub description: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewDisease {
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Advice {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub text: String,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewAdvice {
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Medicine {
    pub id: Uuid,
    pub doctor_id: Uuid,
    pub name: String,
    pub dosage: Option<String>,
    pub recorded_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewMedicine {
    pub name: String,
    #[serde(default)]
    pub dosage: Option<String>,
}
