//! Staff dashboard: role-scoped views over the three collections.
//!
//! Every query takes an explicit [`Scope`]. Filtering and aggregation are
//! pure functions over loaded collections; only the registry operations
//! touch the store.

pub mod aggregates;
pub mod registry;
pub mod scope;

pub use aggregates::*;
pub use registry::*;
pub use scope::*;

use crate::db::DatabaseError;

#[derive(Debug, thiserror::Error)]
pub enum DashboardError {
    #[error("Invalid scope: {0}")]
    InvalidScope(String),
    #[error("Not allowed in the current scope: {0}")]
    ScopeViolation(String),
    #[error("Field is required: {0}")]
    MissingField(&'static str),
    #[error("Unknown specialty: {0}")]
    UnknownSpecialty(String),
    #[error("Clinic not found: {0}")]
    ClinicNotFound(String),
    #[error("Doctor not found: {0}")]
    DoctorNotFound(String),
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}
