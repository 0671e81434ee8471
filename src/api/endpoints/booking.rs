//! Booking wizard endpoints, one session per citizen visit.
//!
//! Every step endpoint returns the refreshed `WizardView`.

use axum::extract::{Path, State};
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Json;
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::booking::{self, PatientUpdate, StepEdit, WizardView};

type ViewResult = Result<Json<WizardView>, ApiError>;

/// `POST /api/booking`
pub async fn start(State(ctx): State<ApiContext>) -> Result<(StatusCode, Json<WizardView>), ApiError> {
    let view = booking::start(&ctx.core, ctx.today())?;
    Ok((StatusCode::CREATED, Json(view)))
}

/// `GET /api/booking/:id`
pub async fn view(State(ctx): State<ApiContext>, Path(id): Path<Uuid>) -> ViewResult {
    Ok(Json(booking::view(&ctx.core, id, ctx.today())?))
}

/// `DELETE /api/booking/:id`: return home, discarding the session.
pub async fn abandon(State(ctx): State<ApiContext>, Path(id): Path<Uuid>) -> Result<StatusCode, ApiError> {
    booking::abandon(&ctx.core, id)?;
    Ok(StatusCode::NO_CONTENT)
}

fn apply(ctx: &ApiContext, id: Uuid, edit: StepEdit) -> ViewResult {
    Ok(Json(booking::edit(&ctx.core, id, edit, ctx.today())?))
}

#[derive(Deserialize)]
pub struct ConsentRequest {
    pub accepted: bool,
}

/// `POST /api/booking/:id/consent`
pub async fn consent(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<ConsentRequest>,
) -> ViewResult {
    apply(&ctx, id, StepEdit::Consent { accepted: req.accepted })
}

#[derive(Deserialize)]
pub struct LocationRequest {
    pub region: Option<String>,
    pub locality: Option<String>,
}

/// `POST /api/booking/:id/location`
pub async fn location(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<LocationRequest>,
) -> ViewResult {
    apply(
        &ctx,
        id,
        StepEdit::Location {
            region: req.region,
            locality: req.locality,
        },
    )
}

#[derive(Deserialize)]
pub struct ClinicRequest {
    pub clinic_id: String,
}

/// `POST /api/booking/:id/clinic`
pub async fn clinic(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<ClinicRequest>,
) -> ViewResult {
    apply(&ctx, id, StepEdit::Clinic { clinic_id: req.clinic_id })
}

#[derive(Deserialize)]
pub struct SlotRequest {
    pub specialty: Option<String>,
    /// YYYY-MM-DD
    pub date: Option<NaiveDate>,
    pub time: Option<String>,
}

/// `POST /api/booking/:id/slot`
pub async fn slot(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<SlotRequest>,
) -> ViewResult {
    apply(
        &ctx,
        id,
        StepEdit::Slot {
            specialty: req.specialty,
            date: req.date,
            time: req.time,
        },
    )
}

/// `POST /api/booking/:id/patient`
pub async fn patient(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<PatientUpdate>,
) -> ViewResult {
    apply(&ctx, id, StepEdit::Patient(req))
}

/// `POST /api/booking/:id/advance`
pub async fn advance(State(ctx): State<ApiContext>, Path(id): Path<Uuid>) -> ViewResult {
    Ok(Json(booking::advance(&ctx.core, id, ctx.today())?))
}

/// `POST /api/booking/:id/back`
pub async fn back(State(ctx): State<ApiContext>, Path(id): Path<Uuid>) -> ViewResult {
    Ok(Json(booking::back(&ctx.core, id, ctx.today())?))
}

#[derive(Deserialize)]
pub struct TriageRequest {
    pub symptoms: String,
}

/// `POST /api/booking/:id/triage`: resolves once the assistant answers
/// or falls back.
pub async fn triage(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
    Json(req): Json<TriageRequest>,
) -> ViewResult {
    let view = booking::request_triage(&ctx.core, id, &req.symptoms, ctx.today()).await?;
    Ok(Json(view))
}

/// `GET /api/booking/:id/receipt`: PDF, confirmed sessions only.
pub async fn receipt(
    State(ctx): State<ApiContext>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let pdf = booking::receipt_pdf(&ctx.core, id)?;
    Ok((
        [
            (header::CONTENT_TYPE, "application/pdf"),
            (
                header::CONTENT_DISPOSITION,
                "attachment; filename=\"comprovante-upa.pdf\"",
            ),
        ],
        pdf,
    ))
}
