//! API endpoint handlers, one module per resource.

pub mod annotations;
pub mod appointments;
pub mod auth;
pub mod avatar;
pub mod doctors;
pub mod health;
pub mod patients;
pub mod turns;
