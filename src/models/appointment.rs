use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::annotation::{Advice, Disease, Medicine, Symptom};
use super::turn::Turn;

/// The realized clinical visit. Exactly one per turn, ever.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
    pub id: Uuid,
    pub turn_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// Appointment creation input: the turn plus the annotation ids to attach.
#[derive(Debug, Clone, Deserialize)]
pub struct NewAppointment {
    pub turn_id: Uuid,
    #[serde(default)]
    pub symptom_ids: Vec<Uuid>,
    #[serde(default)]
    pub disease_ids: Vec<Uuid>,
    #[serde(default)]
    pub advice_ids: Vec<Uuid>,
    #[serde(default)]
    pub medicine_ids: Vec<Uuid>,
}

/// Read representation with the turn and annotation records embedded.
#[derive(Debug, Clone, Serialize)]
pub struct AppointmentDetail {
    pub id: Uuid,
    pub turn: Turn,
    pub created_at: DateTime<Utc>,
    pub symptoms: Vec<Symptom>,
    pub diseases: Vec<Disease>,
    pub advices: Vec<Advice>,
    pub medicines: Vec<Medicine>,
}
