//! Self-service endpoints ("Minhas Consultas").
//!
//! The national ID travels in the body of every call; responses carry the
//! refreshed result set for that ID.

use axum::extract::State;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::content;
use crate::models::Appointment;
use crate::national_id;
use crate::self_service::{self, LookupEntry};

#[derive(Serialize)]
pub struct LookupResponse {
    /// Search value, masked.
    pub national_id: String,
    pub results: Vec<LookupEntry>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<&'static str>,
}

impl LookupResponse {
    fn new(query: &str, results: Vec<Appointment>) -> Self {
        Self {
            national_id: national_id::mask(query),
            results: results.into_iter().map(LookupEntry::from).collect(),
            message: None,
        }
    }

    fn with_message(mut self, message: &'static str) -> Self {
        self.message = Some(message);
        self
    }
}

#[derive(Deserialize)]
pub struct LookupRequest {
    pub national_id: String,
}

/// `POST /api/lookup`
pub async fn search(
    State(ctx): State<ApiContext>,
    Json(req): Json<LookupRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let results = self_service::lookup(ctx.core.store(), &req.national_id)?;
    Ok(Json(LookupResponse::new(&req.national_id, results)))
}

#[derive(Deserialize)]
pub struct CancelRequest {
    pub national_id: String,
    pub appointment_id: String,
    #[serde(default)]
    pub confirm: bool,
}

/// `POST /api/lookup/cancel`
pub async fn cancel(
    State(ctx): State<ApiContext>,
    Json(req): Json<CancelRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let results = self_service::cancel(
        ctx.core.store(),
        &req.national_id,
        &req.appointment_id,
        req.confirm,
    )?;
    Ok(Json(LookupResponse::new(&req.national_id, results)))
}

#[derive(Deserialize)]
pub struct CompleteRequest {
    pub national_id: String,
    pub appointment_id: String,
}

/// `POST /api/lookup/complete`
pub async fn complete(
    State(ctx): State<ApiContext>,
    Json(req): Json<CompleteRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let results = self_service::complete(ctx.core.store(), &req.national_id, &req.appointment_id)?;
    Ok(Json(LookupResponse::new(&req.national_id, results)))
}

#[derive(Deserialize)]
pub struct RateRequest {
    pub national_id: String,
    pub appointment_id: String,
    pub stars: u8,
    pub comment: Option<String>,
}

/// `POST /api/lookup/rate`
pub async fn rate(
    State(ctx): State<ApiContext>,
    Json(req): Json<RateRequest>,
) -> Result<Json<LookupResponse>, ApiError> {
    let results = self_service::rate(
        ctx.core.store(),
        &req.national_id,
        &req.appointment_id,
        req.stars,
        req.comment.as_deref(),
    )?;
    Ok(Json(
        LookupResponse::new(&req.national_id, results).with_message(content::RATING_THANKS),
    ))
}

#[derive(Deserialize)]
pub struct EraseRequest {
    pub national_id: String,
    #[serde(default)]
    pub confirm: bool,
}

#[derive(Serialize)]
pub struct EraseResponse {
    pub removed: usize,
    pub message: &'static str,
}

/// `POST /api/lookup/erase`: right to be forgotten. The client clears
/// its search afterwards.
pub async fn erase(
    State(ctx): State<ApiContext>,
    Json(req): Json<EraseRequest>,
) -> Result<Json<EraseResponse>, ApiError> {
    let removed = self_service::erase_all(ctx.core.store(), &req.national_id, req.confirm)?;
    Ok(Json(EraseResponse {
        removed,
        message: content::ERASE_DONE,
    }))
}
