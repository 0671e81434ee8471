//! Staff dashboard endpoints. The scope comes from the query string
//! (`role`, `region`, `clinic_id`) on every call.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::error::ApiError;
use crate::api::types::ApiContext;
use crate::dashboard::{
    self, ClinicDraft, ClinicPatch, DashboardSummary, DoctorDraft, DoctorRow, Scope, ScopePreset,
    SCOPE_PRESETS,
};
use crate::models::{Clinic, Doctor};
use crate::reference;

#[derive(Debug, Default, Deserialize)]
pub struct ScopeQuery {
    pub role: Option<String>,
    pub region: Option<String>,
    pub clinic_id: Option<String>,
    pub specialty: Option<String>,
}

impl ScopeQuery {
    fn scope(&self) -> Result<Scope, ApiError> {
        Ok(Scope::from_params(
            self.role.as_deref(),
            self.region.as_deref(),
            self.clinic_id.as_deref(),
        )?)
    }
}

#[derive(Serialize)]
pub struct SummaryResponse {
    #[serde(flatten)]
    pub summary: DashboardSummary,
    pub presets: &'static [ScopePreset],
}

/// `GET /api/dashboard/summary`
pub async fn summary(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<SummaryResponse>, ApiError> {
    let scope = query.scope()?;
    let store = ctx.core.store();
    let clinics = store.clinics().load_all()?;
    let appointments = store.appointments().load_all()?;
    Ok(Json(SummaryResponse {
        summary: dashboard::summarize(&scope, &clinics, &appointments),
        presets: SCOPE_PRESETS,
    }))
}

#[derive(Serialize)]
pub struct ClinicsResponse {
    pub can_create: bool,
    pub specialties: &'static [&'static str],
    pub clinics: Vec<Clinic>,
}

/// `GET /api/dashboard/clinics`
pub async fn list_clinics(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<ClinicsResponse>, ApiError> {
    let scope = query.scope()?;
    let clinics = dashboard::list_clinics(ctx.core.store(), &scope)?;
    Ok(Json(ClinicsResponse {
        can_create: scope.can_create_clinics(),
        specialties: reference::SPECIALTIES,
        clinics,
    }))
}

/// `POST /api/dashboard/clinics`
pub async fn create_clinic(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
    Json(draft): Json<ClinicDraft>,
) -> Result<(StatusCode, Json<Clinic>), ApiError> {
    let scope = query.scope()?;
    let clinic = dashboard::create_clinic(ctx.core.store(), &scope, draft)?;
    Ok((StatusCode::CREATED, Json(clinic)))
}

/// `PUT /api/dashboard/clinics/:id`
pub async fn update_clinic(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
    Path(id): Path<String>,
    Json(patch): Json<ClinicPatch>,
) -> Result<Json<Clinic>, ApiError> {
    let scope = query.scope()?;
    Ok(Json(dashboard::update_clinic(ctx.core.store(), &scope, &id, patch)?))
}

#[derive(Serialize)]
pub struct DoctorsResponse {
    pub doctors: Vec<DoctorRow>,
}

/// `GET /api/dashboard/doctors`: optional exact `specialty` filter.
pub async fn list_doctors(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
) -> Result<Json<DoctorsResponse>, ApiError> {
    let scope = query.scope()?;
    let doctors = dashboard::list_doctors(ctx.core.store(), &scope, query.specialty.as_deref())?;
    Ok(Json(DoctorsResponse { doctors }))
}

/// `POST /api/dashboard/doctors`
pub async fn create_doctor(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
    Json(draft): Json<DoctorDraft>,
) -> Result<(StatusCode, Json<Doctor>), ApiError> {
    let scope = query.scope()?;
    let doctor = dashboard::create_doctor(ctx.core.store(), &scope, draft)?;
    Ok((StatusCode::CREATED, Json(doctor)))
}

/// `POST /api/dashboard/doctors/:id/toggle`
pub async fn toggle_doctor(
    State(ctx): State<ApiContext>,
    Query(query): Query<ScopeQuery>,
    Path(id): Path<String>,
) -> Result<Json<Doctor>, ApiError> {
    let scope = query.scope()?;
    Ok(Json(dashboard::toggle_doctor(ctx.core.store(), &scope, &id)?))
}
