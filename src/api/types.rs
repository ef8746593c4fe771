//! Shared types for the API layer.

use std::path::PathBuf;
use std::sync::Arc;

use rusqlite::Connection;

use crate::api::error::ApiError;
use crate::db::sqlite::open_database;
use crate::db::DatabaseError;
use crate::models::{Doctor, Identity, Patient, User};

/// Shared context for routes and middleware. Handlers open their own store
/// connection per request; no mutable state lives here.
#[derive(Clone)]
pub struct ApiContext {
    pub db_path: Arc<PathBuf>,
    pub media_dir: Arc<PathBuf>,
}

impl ApiContext {
    pub fn new(db_path: PathBuf, media_dir: PathBuf) -> Self {
        Self {
            db_path: Arc::new(db_path),
            media_dir: Arc::new(media_dir),
        }
    }

    pub fn open_db(&self) -> Result<Connection, DatabaseError> {
        open_database(&self.db_path)
    }
}

/// Authenticated caller, injected into request extensions by the auth
/// middleware. Carries the identity so handlers never re-derive it.
#[derive(Debug, Clone)]
pub struct Caller {
    pub user: User,
    pub identity: Identity,
}

impl Caller {
    /// The caller's doctor profile, or 403 for everyone else.
    pub fn doctor(&self) -> Result<&Doctor, ApiError> {
        match &self.identity {
            Identity::Doctor(doctor) => Ok(doctor),
            _ => Err(ApiError::Forbidden("doctor account required".into())),
        }
    }

    /// The caller's patient profile, or 403 for everyone else.
    pub fn patient(&self) -> Result<&Patient, ApiError> {
        match &self.identity {
            Identity::Patient(patient) => Ok(patient),
            _ => Err(ApiError::Forbidden("patient account required".into())),
        }
    }

    pub fn is_manager(&self) -> bool {
        matches!(self.identity, Identity::Manager)
    }
}
