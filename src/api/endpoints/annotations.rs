//! Clinical annotation endpoints: symptoms, diseases, advice, medicines.
//!
//! All four creators stamp the doctor reference from the authenticated
//! caller; the input types carry no doctor field at all.

use axum::extract::State;
use axum::{Extension, Json};
use chrono::Utc;
use serde::Serialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::{ApiContext, Caller};
use crate::db::repository::annotation;
use crate::models::*;

/// `POST /api/symptoms`
pub async fn create_symptom(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Json(new): Json<NewSymptom>,
) -> Result<Json<Symptom>, ApiError> {
    let doctor = caller.doctor()?;
    let symptom = Symptom {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        name: new.name,
        description: new.description,
        recorded_at: Utc::now(),
    };
    let conn = ctx.open_db()?;
    annotation::insert_symptom(&conn, &symptom)?;
    Ok(Json(symptom))
}

/// `POST /api/diseases`
pub async fn create_disease(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Json(new): Json<NewDisease>,
) -> Result<Json<Disease>, ApiError> {
    let doctor = caller.doctor()?;
    let disease = Disease {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        name: new.name,
        description: new.description,
        recorded_at: Utc::now(),
    };
    let conn = ctx.open_db()?;
    annotation::insert_disease(&conn, &disease)?;
    Ok(Json(disease))
}

/// `POST /api/advices`
pub async fn create_advice(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Json(new): Json<NewAdvice>,
) -> Result<Json<Advice>, ApiError> {
    let doctor = caller.doctor()?;
    let advice = Advice {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        text: new.text,
        recorded_at: Utc::now(),
    };
    let conn = ctx.open_db()?;
    annotation::insert_advice(&conn, &advice)?;
    Ok(Json(advice))
}

/// `POST /api/medicines`
pub async fn create_medicine(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
    Json(new): Json<NewMedicine>,
) -> Result<Json<Medicine>, ApiError> {
    let doctor = caller.doctor()?;
    let medicine = Medicine {
        id: Uuid::new_v4(),
        doctor_id: doctor.id,
        name: new.name,
        dosage: new.dosage,
        recorded_at: Utc::now(),
    };
    let conn = ctx.open_db()?;
    annotation::insert_medicine(&conn, &medicine)?;
    Ok(Json(medicine))
}

#[derive(Serialize)]
pub struct SymptomsResponse {
    pub symptoms: Vec<Symptom>,
}

/// `GET /api/symptoms` — the caller's own annotations.
pub async fn list_symptoms(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<SymptomsResponse>, ApiError> {
    let doctor = caller.doctor()?;
    let conn = ctx.open_db()?;
    Ok(Json(SymptomsResponse {
        symptoms: annotation::list_symptoms_for_doctor(&conn, &doctor.id)?,
    }))
}

#[derive(Serialize)]
pub struct DiseasesResponse {
    pub diseases: Vec<Disease>,
}

/// `GET /api/diseases`
pub async fn list_diseases(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<DiseasesResponse>, ApiError> {
    let doctor = caller.doctor()?;
    let conn = ctx.open_db()?;
    Ok(Json(DiseasesResponse {
        diseases: annotation::list_diseases_for_doctor(&conn, &doctor.id)?,
    }))
}

#[derive(Serialize)]
pub struct AdvicesResponse {
    pub advices: Vec<Advice>,
}

/// `GET /api/advices`
pub async fn list_advices(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<AdvicesResponse>, ApiError> {
    let doctor = caller.doctor()?;
    let conn = ctx.open_db()?;
    Ok(Json(AdvicesResponse {
        advices: annotation::list_advices_for_doctor(&conn, &doctor.id)?,
    }))
}

#[derive(Serialize)]
pub struct MedicinesResponse {
    pub medicines: Vec<Medicine>,
}

/// `GET /api/medicines`
pub async fn list_medicines(
    State(ctx): State<ApiContext>,
    Extension(caller): Extension<Caller>,
) -> Result<Json<MedicinesResponse>, ApiError> {
    let doctor = caller.doctor()?;
    let conn = ctx.open_db()?;
    Ok(Json(MedicinesResponse {
        medicines: annotation::list_medicines_for_doctor(&conn, &doctor.id)?,
    }))
}
